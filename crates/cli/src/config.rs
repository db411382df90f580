//! Configuration file loading and environment variable handling.
//!
//! Precedence: CLI args > Environment vars > Config file > Defaults

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use tempex_core::Locale;

/// Default config file content for `--config-init`.
pub const DEFAULT_CONFIG: &str = r#"# tempex configuration
# See: tempex --help for all options

# Locale used when -L is not given (en-us, fr-fr, ja-jp)
locale = "en-us"

# Disable colored output
no_color = false

# Highlight recognized spans inline in tee mode
highlight = false
"#;

/// Configuration loaded from file and environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: Option<String>,
    pub no_color: Option<bool>,
    pub highlight: Option<bool>,
}

impl Config {
    /// Get the config file path.
    ///
    /// - Linux/macOS: `~/.config/tempex/config.toml`
    /// - Windows: `%APPDATA%\tempex\config.toml`
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tempex").join("config.toml"))
    }

    /// Load config from file. Returns default if file doesn't exist.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(contents) = fs::read_to_string(&path) else {
            return Self::default();
        };

        toml::from_str(&contents).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Read value from environment variable.
    fn env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok()?.parse().ok()
    }

    /// Get locale with precedence: env > config > default.
    ///
    /// An unknown locale in the config file is reported and ignored.
    pub fn locale(&self) -> Locale {
        Self::env_var("TEMPEX_LOCALE")
            .or_else(|| {
                let id = self.locale.as_deref()?;
                id.parse()
                    .map_err(|e| eprintln!("Warning: {e} in config file, using default"))
                    .ok()
            })
            .unwrap_or(Locale::English)
    }

    /// Get no_color with precedence: env > config > default.
    ///
    /// Respects the `NO_COLOR` standard (https://no-color.org/).
    pub fn no_color(&self) -> bool {
        if std::env::var("NO_COLOR").is_ok() {
            return true;
        }
        if std::env::var("TEMPEX_NO_COLOR").is_ok() {
            return true;
        }
        self.no_color.unwrap_or(false)
    }

    pub fn highlight(&self) -> bool {
        Self::env_var("TEMPEX_HIGHLIGHT")
            .or(self.highlight)
            .unwrap_or(false)
    }
}

/// Create a default config file at the standard location.
pub fn init_config() -> Result<PathBuf, String> {
    let path = Config::path().ok_or("Cannot determine config directory")?;

    if path.exists() {
        return Err(format!("Config file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create directory: {}", e))?;
    }

    fs::write(&path, DEFAULT_CONFIG).map_err(|e| format!("Failed to write config: {}", e))?;

    Ok(path)
}
