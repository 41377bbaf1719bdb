// RepoScout platform paths for Windows
// Config: %APPDATA%/RepoScout
// Data:   %APPDATA%/RepoScout

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for RepoScout on Windows.
/// `%APPDATA%/RepoScout`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("RepoScout")
}

/// Returns the data directory for RepoScout on Windows.
/// `%APPDATA%/RepoScout`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("RepoScout")
}
