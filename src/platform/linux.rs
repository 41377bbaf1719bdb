// RepoScout platform paths for Linux
// Config: ~/.config/reposcout
// Data:   ~/.local/share/reposcout

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for RepoScout on Linux.
/// Uses `$XDG_CONFIG_HOME/reposcout` if set, otherwise `~/.config/reposcout`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("reposcout")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("reposcout")
    }
}

/// Returns the data directory for RepoScout on Linux.
/// Uses `$XDG_DATA_HOME/reposcout` if set, otherwise `~/.local/share/reposcout`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("reposcout")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("reposcout")
    }
}
