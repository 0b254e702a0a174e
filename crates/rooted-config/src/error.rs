//! Errors raised while loading or saving `config.ron`.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadError {
        /// File that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config directory or file could not be written.
    #[error("cannot write {}: {source}", path.display())]
    WriteError {
        /// File that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("malformed config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The config could not be encoded as RON.
    #[error("cannot encode config: {0}")]
    SerializeError(#[source] ron::Error),

    /// A setting parsed fine but is outside the range the game accepts.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending setting, or the section name.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}
