//! DietMaster Library
//!
//! Personal diet and activity tracking: a user profile with derived health
//! metrics, daily calorie ledgers, weight history and a PDF progress report.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod report;
pub mod storage;
pub mod tools;
pub mod units;

pub use error::{Error, Result};
