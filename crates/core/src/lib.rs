//! SteamGuessr core - shared types and pure game-library logic
//!
//! Everything in here is free of network and session I/O so the backend
//! handlers stay thin and the calculations can be tested directly.

pub mod account;
pub mod catalog;
pub mod error;
pub mod hint_data;
pub mod identity;
pub mod models;
pub mod stats;
pub mod validation;

pub use catalog::HintCatalog;
pub use error::*;
pub use models::*;
pub use validation::ValidationStatus;
