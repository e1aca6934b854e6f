use std::env;
use std::path::PathBuf;

/// Get the path to the Cadence directory (~/.cadence)
pub fn cadence_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".cadence")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".cadence")
    }
}

/// Get the path to the default database file (~/.cadence/cadence.db)
pub fn database_file() -> PathBuf {
    cadence_dir().join("cadence.db")
}
