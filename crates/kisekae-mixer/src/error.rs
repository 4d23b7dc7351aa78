//! Error types for the mixer.
//!
//! All errors use thiserror for consistent error handling across the codebase.

use kisekae_formats::FormatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, enumerating or writing mixer programs.
#[derive(Debug, Error)]
pub enum MixerError {
    /// Code or registry parsing failed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Failed to read an input file
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        /// File that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Mixer program JSON does not match the schema
    #[error("Invalid mixer program: {0}")]
    InvalidProgram(#[from] serde_json::Error),

    /// Source path is not a valid glob pattern
    #[error("Invalid source pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Directory traversal failed
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// External session reported a transport failure
    #[error("Session error: {0}")]
    Session(String),

    /// Separator specifier contains an unknown letter or is empty
    #[error("Invalid split specifier '{spec}': {reason}")]
    InvalidSplitSpec {
        /// The specifier as given
        spec: String,
        /// Reason for rejection
        reason: String,
    },

    /// Configuration value missing or inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Type alias for mixer operation results
pub type Result<T> = std::result::Result<T, MixerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MixerError::InvalidSplitSpec {
            spec: "cx".to_string(),
            reason: "unknown letter 'x'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid split specifier 'cx': unknown letter 'x'"
        );
    }

    #[test]
    fn test_format_error_conversion() {
        let err: MixerError = FormatError::UnknownTag("zz".to_string()).into();
        assert!(err.to_string().contains("Unknown subcode tag: zz"));
    }
}
