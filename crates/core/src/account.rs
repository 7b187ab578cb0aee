//! Steam account creation date and age

use chrono::{DateTime, Datelike, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::hint_data::format_date;

/// Calendar difference between account creation and now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAge {
    pub years: i32,
    pub months: i32,
    pub days: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCreation {
    pub date: Option<String>,
    pub age: Option<AccountAge>,
}

/// Creation date and age for a `timecreated` stamp.
/// Both are `None` for a missing, zero or negative timestamp.
pub fn account_creation(timestamp: Option<i64>, now: DateTime<Utc>) -> AccountCreation {
    let created = timestamp
        .filter(|&t| t > 0)
        .and_then(|t| DateTime::from_timestamp(t, 0));

    AccountCreation {
        date: format_date(timestamp),
        age: created.map(|created| account_age(created, now)),
    }
}

fn account_age(created: DateTime<Utc>, now: DateTime<Utc>) -> AccountAge {
    if now <= created {
        return AccountAge { years: 0, months: 0, days: 0 };
    }

    // Whole months first; adding months clamps to the end of shorter months
    let mut months = (now.year() - created.year()) * 12 + now.month() as i32 - created.month() as i32;
    let mut anchor = add_months(created, months);
    while months > 0 && anchor.map_or(true, |anchor| anchor > now) {
        months -= 1;
        anchor = add_months(created, months);
    }

    let days = anchor.map_or(0, |anchor| (now - anchor).num_days() as i32);

    AccountAge {
        years: months / 12,
        months: months % 12,
        days,
    }
}

fn add_months(date: DateTime<Utc>, months: i32) -> Option<DateTime<Utc>> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}
