//! Two-line `KEY=VALUE` configuration written by `smgithub init`.
//!
//! ```text
//! USERNAME=octocat
//! LIMIT=3
//! ```

use std::{
    fs,
    io::ErrorKind,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/smgithub.conf";
pub const DEFAULT_LIMIT: u32 = 3;

const USERNAME_KEY: &str = "USERNAME";
const LIMIT_KEY: &str = "LIMIT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration at {}; run `smgithub init --username <name>` first", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read configuration at {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write configuration at {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration line {line_number} is not KEY=VALUE: {line:?}; re-run `smgithub init`")]
    InvalidLine { line_number: usize, line: String },

    #[error("configuration is missing {key}; re-run `smgithub init`")]
    MissingKey { key: &'static str },

    #[error("invalid username {0:?}; re-run `smgithub init`")]
    InvalidUsername(String),

    #[error("invalid LIMIT {value:?}; re-run `smgithub init`")]
    InvalidLimit {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Whose feed to watch and how many commits a day are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub username: String,
    pub limit: u32,
}

impl Config {
    pub fn new(username: impl Into<String>, limit: u32) -> Result<Self, ConfigError> {
        let username = username.into();
        validate_username(&username)?;
        Ok(Self { username, limit })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut username = None;
        let mut limit = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line_number: index + 1,
                    line: raw.to_string(),
                });
            };
            let value = value.trim();

            match key.trim() {
                USERNAME_KEY => username = Some(value.to_string()),
                LIMIT_KEY => {
                    let parsed = value.parse().map_err(|source| ConfigError::InvalidLimit {
                        value: value.to_string(),
                        source,
                    })?;
                    limit = Some(parsed);
                }
                other => warn!(key = other, "Ignoring unknown configuration key"),
            }
        }

        let username = username.ok_or(ConfigError::MissingKey { key: USERNAME_KEY })?;
        let limit = limit.ok_or(ConfigError::MissingKey { key: LIMIT_KEY })?;
        Self::new(username, limit)
    }

    pub fn render(&self) -> String {
        format!(
            "{USERNAME_KEY}={}\n{LIMIT_KEY}={}\n",
            self.username, self.limit
        )
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(&text)
    }

    /// Writes the file, replacing any previous configuration.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, self.render()).map_err(write_error)
    }
}

/// GitHub logins are ASCII alphanumerics and hyphens; managed-user logins add
/// an `_shortcode` suffix.
fn validate_username(username: &str) -> Result<(), ConfigError> {
    let valid = !username.is_empty()
        && !username.starts_with('-')
        && !username.ends_with('-')
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidUsername(username.to_string()))
    }
}
