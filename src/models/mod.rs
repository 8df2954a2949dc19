//! Data models
//!
//! Rust structs representing database entities.

pub(crate) mod calorie_entry;
pub(crate) mod profile;
pub(crate) mod weight_entry;

pub use calorie_entry::{CalorieEntry, LedgerKind};
pub use profile::{ActivityLevel, Gender, ProfileCreate, UserProfile};
pub use weight_entry::WeightEntry;
