//! Platform configuration locations.
//!
//! - Linux: `~/.config/screamer/`
//! - macOS: `~/Library/Application Support/screamer/`
//! - Windows: `%APPDATA%\screamer\`

use std::path::PathBuf;

const APP_NAME: &str = "screamer";
const CONFIG_FILE: &str = "config.toml";

/// Per-user configuration directory, `./screamer` when the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default engine configuration file.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_inside_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("screamer/config.toml"));
        assert!(path.starts_with(user_config_dir()));
    }
}
