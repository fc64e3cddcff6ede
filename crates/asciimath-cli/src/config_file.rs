use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use asciimath_core::AsciiMathConfig;
use serde::Deserialize;

/// Settings read from a TOML file.
///
/// Converter settings live at the top level, so a file looks like this:
///
/// ```toml
/// pretty-print = "auto"
/// xml-namespace = true
/// annotation = false
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub asciimath: AsciiMathConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, io::Error),
    Toml(PathBuf, toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, err) => write!(f, "cannot read '{}': {err}", path.display()),
            ConfigError::Toml(path, err) => {
                write!(f, "invalid TOML in '{}': {err}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, err) => Some(err),
            ConfigError::Toml(_, err) => Some(err),
        }
    }
}

impl Config {
    /// Read the configuration from the TOML file at `path`. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io(path.into(), err))?;
        Self::from_toml(&text).map_err(|err| ConfigError::Toml(path.into(), err))
    }

    fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
