//! Shell configuration via `.colshell.toml`
//!
//! Looked up in `$HOME` unless a path is given with `--config`. A missing
//! default file is not an error; every key has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Config file name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".colshell.toml";

/// Settings handed to the store client when it is constructed.
///
/// Retry counts are deliberately lower than the store's defaults so that
/// an operator at the prompt is not kept waiting through silent retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client retries per operation (default: 7)
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Connection attempts to the RPC layer (default: 3)
    #[serde(default = "default_ipc_retries")]
    pub ipc_connect_max_retries: u32,
}

fn default_retries() -> u32 {
    7
}

fn default_ipc_retries() -> u32 {
    3
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            ipc_connect_max_retries: default_ipc_retries(),
        }
    }
}

/// Shell configuration loaded from `.colshell.toml`.
///
/// # Example
///
/// ```toml
/// format_width = 110
/// debug = false
///
/// [client]
/// retries = 7
/// ipc_connect_max_retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Width of table output, in characters (default: 110)
    #[serde(default = "default_format_width")]
    pub format_width: usize,
    /// Log at DEBUG level and report error details
    #[serde(default)]
    pub debug: bool,
    /// REPL history file; defaults to `$HOME/.colshell_history`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
    /// Store client settings
    #[serde(default)]
    pub client: ClientConfig,
}

fn default_format_width() -> usize {
    110
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            format_width: default_format_width(),
            debug: false,
            history_file: None,
            client: ClientConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# colshell configuration
#
# Width of table output in characters (default: 110)
format_width = 110

# Log at DEBUG level and print error details (default: false)
debug = false

# REPL history file (default: $HOME/.colshell_history)
# history_file = "/home/me/.colshell_history"

[client]
# Retries per client operation. Kept low so the prompt does not hang.
retries = 7
# Connection attempts to the RPC layer.
ipc_connect_max_retries = 3
"#
    }

    /// Default location: `$HOME/.colshell.toml`.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| Path::new(&home).join(CONFIG_FILE_NAME))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            reason: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;
        let config: ShellConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_type(
                format!("config file '{}'", path.display()),
                "valid colshell TOML",
                e.to_string(),
            )
        })?;
        if config.format_width == 0 {
            return Err(Error::invalid_type(
                "format_width",
                "a positive integer",
                "0",
            ));
        }
        Ok(config)
    }

    /// Load the explicit path if given, else the default path if it exists,
    /// else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(target: "colshell::config", path = %path.display(), "Loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| Error::Io {
                reason: format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ),
            })?;
        }
        Ok(())
    }

    /// History file to use for the REPL.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            std::env::var_os("HOME").map(|home| Path::new(&home).join(".colshell_history"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_lowers_retries() {
        let config = ShellConfig::default();
        assert_eq!(config.client.retries, 7);
        assert_eq!(config.client.ipc_connect_max_retries, 3);
        assert_eq!(config.format_width, 110);
        assert!(!config.debug);
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config: ShellConfig = toml::from_str(ShellConfig::default_toml()).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let config: ShellConfig = toml::from_str("debug = true").unwrap();
        assert!(config.debug);
        assert_eq!(config.client.retries, 7);
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        ShellConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = ShellConfig::from_file(&path).unwrap();
        assert_eq!(config.format_width, 110);
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "format_width = 80\n").unwrap();

        ShellConfig::write_default_if_missing(&path).unwrap();

        let config = ShellConfig::from_file(&path).unwrap();
        assert_eq!(config.format_width, 80);
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "format_width = \"wide\"\n").unwrap();
        assert!(ShellConfig::from_file(&path).is_err());

        std::fs::write(&path, "format_width = 0\n").unwrap();
        assert!(ShellConfig::from_file(&path).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            ShellConfig::load(Some(&path)),
            Err(Error::Io { .. })
        ));
    }
}
