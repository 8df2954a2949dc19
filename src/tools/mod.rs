//! DietMaster operations
//!
//! Every operation takes a `&dyn Storage`, converts between the user's unit
//! system and metric at the boundary, and returns a serializable response.

pub mod entries;
pub mod profile;
pub mod reports;
pub mod summary;

use crate::error::Error;
use crate::models::UserProfile;
use crate::storage::Storage;
use crate::Result;

/// Load the profile or fail with [`Error::ProfileMissing`]
pub fn require_profile(storage: &dyn Storage) -> Result<UserProfile> {
    storage.load_profile()?.ok_or(Error::ProfileMissing)
}

/// Most recent logged weight in kg, falling back to the profile weight
pub fn latest_weight_kg(storage: &dyn Storage, profile: &UserProfile) -> Result<f64> {
    let entries = storage.get_weight_entries()?;
    Ok(entries.last().map_or(profile.weight_kg, |&(_, kg)| kg))
}

/// Round for display (two decimals)
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::profile::tests::sample_profile;
    use chrono::NaiveDate;

    #[test]
    fn test_require_profile_missing() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(require_profile(&db), Err(Error::ProfileMissing)));
    }

    #[test]
    fn test_latest_weight_falls_back_to_profile() {
        let db = Database::open_in_memory().unwrap();
        let profile = sample_profile();
        assert_eq!(latest_weight_kg(&db, &profile).unwrap(), 80.0);

        let d = |n| NaiveDate::from_ymd_opt(2024, 3, n).unwrap();
        db.save_weight_entry(d(2), 79.0).unwrap();
        db.save_weight_entry(d(9), 78.2).unwrap();
        assert_eq!(latest_weight_kg(&db, &profile).unwrap(), 78.2);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(-0.004), -0.0);
    }
}
