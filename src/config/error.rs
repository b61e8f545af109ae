//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading `scconf.toml`.
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file `{0}` could not be parsed")]
    Toml(PathBuf, #[source] toml::de::Error),
}
