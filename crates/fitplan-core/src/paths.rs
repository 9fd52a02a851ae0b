//! On-disk locations for fitplan state.

use std::path::PathBuf;

/// Return the fitplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fitplan` or `~/.config/fitplan`,
/// never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fitplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fitplan")
}

/// Path to the TOML config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Path to the saved session.
pub fn session_path() -> PathBuf {
    config_dir().join("session.json")
}
