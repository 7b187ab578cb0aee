//! Outcome of a profile validation request

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// No resolvable numeric Steam ID
    Invalid,
    /// Resolved, but the profile is not public
    Private,
    Public,
}

impl ValidationStatus {
    pub fn determine(steam_id: Option<&str>, is_public: bool) -> Self {
        match steam_id {
            None | Some("") => ValidationStatus::Invalid,
            Some(_) if !is_public => ValidationStatus::Private,
            Some(_) => ValidationStatus::Public,
        }
    }

    /// Legacy numeric response code (1 = invalid, 2 = private, 3 = public)
    pub fn code(self) -> u8 {
        match self {
            ValidationStatus::Invalid => 1,
            ValidationStatus::Private => 2,
            ValidationStatus::Public => 3,
        }
    }
}
