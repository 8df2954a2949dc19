//! Report Tools
//!
//! PDF report generation.

use std::path::Path;

use serde::Serialize;

use super::require_profile;
use crate::metrics::GoalStatus;
use crate::report::{compile_report, pdf, ReportInput};
use crate::storage::Storage;
use crate::Result;

/// Response for generate_report
#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub output_path: String,
    pub days_charted: usize,
    pub weight_entries: usize,
    pub goal_status: GoalStatus,
    pub summary: Vec<String>,
}

/// Compile the progress report and write it as a PDF to `output_path`
pub fn generate_report(storage: &dyn Storage, output_path: &Path) -> Result<GenerateReportResponse> {
    let profile = require_profile(storage)?;
    let input = ReportInput::gather(storage)?;
    let report = compile_report(&profile, &input);

    pdf::render_pdf(&report, output_path)?;

    Ok(GenerateReportResponse {
        success: true,
        output_path: output_path.display().to_string(),
        days_charted: report.calorie_series.len(),
        weight_entries: report.weight_series.len(),
        goal_status: report.summary.goal_status,
        summary: report.summary_lines(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::error::Error;
    use crate::models::profile::tests::sample_profile;
    use chrono::NaiveDate;

    #[test]
    fn test_generate_report_requires_profile() {
        let db = Database::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = generate_report(&db, &dir.path().join("report.pdf"));
        assert!(matches!(result, Err(Error::ProfileMissing)));
    }

    #[test]
    fn test_generate_report_writes_pdf() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample_profile();
        let d = |n| NaiveDate::from_ymd_opt(2024, 1, n).unwrap();
        profile.set_weight_loss_goal_on(70.0, 0.5, d(1));
        db.save_profile(&profile).unwrap();
        db.save_calorie_intake(d(1), 2000.0).unwrap();
        db.save_calories_burned(d(2), 400.0).unwrap();
        db.save_weight_entry(d(1), 80.0).unwrap();
        db.save_weight_entry(d(3), 79.2).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let response = generate_report(&db, &path).unwrap();

        assert!(response.success);
        assert_eq!(response.days_charted, 3);
        assert_eq!(response.weight_entries, 2);
        assert!(matches!(response.goal_status, GoalStatus::InProgress { .. }));

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
