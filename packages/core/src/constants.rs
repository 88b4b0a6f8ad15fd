// ABOUTME: Shared constants and well-known paths for Planora
// ABOUTME: Resolves the Planora data directory and default planning parameters

use std::env;
use std::path::PathBuf;

/// Default monthly delivery capacity in hours, used when a project does not
/// override it. One full-time engineer-month.
pub const DEFAULT_MONTHLY_CAPACITY_HOURS: f64 = 160.0;

/// Get the path to the Planora directory (~/.planora)
pub fn planora_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".planora")
    } else {
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".planora")
    }
}

/// Get the path to the SQLite database file (~/.planora/planora.db)
pub fn planora_db_file() -> PathBuf {
    planora_dir().join("planora.db")
}
