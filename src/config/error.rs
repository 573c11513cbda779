use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: FormatError,
    },

    #[error("config file '{path}' must contain a mapping at its root, found {found}")]
    MalformedDocument { path: PathBuf, found: &'static str },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize effective config: {0}")]
    SerializeError(#[source] serde_yaml::Error),

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[source] serde_yaml::Error),
}

/// Grammar error from one of the supported serialization formats.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
