//! Error types for code parsing and registry loading

use thiserror::Error;

/// Errors that can occur when loading registries or parsing codes
#[derive(Error, Debug)]
pub enum FormatError {
    /// Subcode token too short to carry a tag
    #[error("Invalid subcode token: {0:?}")]
    InvalidToken(String),

    /// Tag not owned by any component kind
    #[error("Unknown subcode tag: {0}")]
    UnknownTag(String),

    /// Component kind name not present in the registry
    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    /// Subcode kind name not present in the registry
    #[error("Unknown subcode type: {0}")]
    UnknownSubcodeType(String),

    /// Index digits could not be parsed
    #[error("Invalid index digits in subcode token: {0:?}")]
    InvalidIndex(String),

    /// Version prefix is not a number
    #[error("Invalid code version: {0:?}")]
    InvalidVersion(String),

    /// More model segments than character slots
    #[error("Too many model slots: {0} (maximum 9)")]
    TooManySlots(usize),

    /// Merge between instances of different subcode kinds
    #[error("Subcode types do not match: {expected} vs {actual}")]
    TypeMismatch {
        /// Kind of the destination subcode
        expected: String,
        /// Kind of the merged-in subcode
        actual: String,
    },

    /// Two registry entries claim the same name or tag
    #[error("Duplicate {kind} definition: {name}")]
    DuplicateDefinition {
        /// What was duplicated ("subcode type", "component", "tag")
        kind: &'static str,
        /// The duplicated name
        name: String,
    },

    /// Text did not survive a parse and rebuild cycle
    #[error("Round-trip verification failed: {0}")]
    RoundTrip(String),

    /// Malformed registry JSON
    #[error("Invalid registry data: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for format operation results
pub type Result<T> = std::result::Result<T, FormatError>;
