//! Runtime configuration from the environment

use std::path::{Path, PathBuf};

pub const DATABASE_PATH_VAR: &str = "DIETMASTER_DATABASE_PATH";
pub const REPORT_PATH_VAR: &str = "DIETMASTER_REPORT_PATH";

pub const DEFAULT_REPORT_FILE: &str = "dietmaster_report.pdf";

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var_os(DATABASE_PATH_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("."));
            default_database_path(&exe_dir)
        })
}

/// `data/dietmaster.db` beside the project root when `exe_dir` is a cargo
/// `target/{debug,release}` directory, otherwise beside the executable
pub fn default_database_path(exe_dir: &Path) -> PathBuf {
    let mut path = exe_dir.to_path_buf();

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("dietmaster.db");
    path
}

/// Default location of the generated PDF report
pub fn report_path() -> PathBuf {
    std::env::var_os(REPORT_PATH_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE))
}
