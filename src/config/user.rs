//! User configuration loading for rangekeeper.
//!
//! User config location: $XDG_CONFIG_HOME/rangekeeper/rangekeeper.toml
//! Fallback: the platform config directory (`~/.config` on Linux)

use std::path::PathBuf;

use super::settings::{SettingsError, SettingsFile};

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/rangekeeper/rangekeeper.toml
/// 2. Otherwise: <platform config dir>/rangekeeper/rangekeeper.toml
///
/// Returns None if neither can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join("rangekeeper").join("rangekeeper.toml"))
}

/// Load the user layer. A missing file is not an error.
pub fn load_user_config() -> Result<Option<SettingsFile>, SettingsError> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    SettingsFile::load(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn with_xdg_config_home<T>(value: &std::path::Path, f: impl FnOnce() -> T) -> T {
        let original = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: #[serial(xdg_env)] prevents concurrent modification of XDG_CONFIG_HOME
        unsafe {
            env::set_var("XDG_CONFIG_HOME", value);
        }
        let result = f();
        // SAFETY: Same as above - restoring original env state
        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_path_uses_xdg_config_home_when_set() {
        let path = with_xdg_config_home(std::path::Path::new("/custom/config"), user_config_path);
        assert_eq!(
            path,
            Some(PathBuf::from("/custom/config/rangekeeper/rangekeeper.toml"))
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn missing_user_config_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let loaded = with_xdg_config_home(dir.path(), load_user_config).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("rangekeeper")).unwrap();
        std::fs::write(
            dir.path().join("rangekeeper/rangekeeper.toml"),
            "flash-delay-ms = 5\n",
        )
        .unwrap();

        let loaded = with_xdg_config_home(dir.path(), load_user_config)
            .unwrap()
            .unwrap();
        assert_eq!(loaded.flash_delay_ms, Some(5));
    }
}
