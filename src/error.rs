//! Error types.
//!
//! None of these cross the read/write path of the overlay: decode failures are
//! folded into [`SidDecoding`](crate::SidDecoding) and property failures are
//! logged. Only configuration errors reach a caller as `Err`.

use parsing::TruncatedSid;
use thiserror::Error;

/// Why a raw `objectSid` value could not be decoded in full.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The transport encoding (base64) could not be reversed.
    #[error("raw objectSid value is not valid base64: {0}")]
    TransportEncoding(#[from] base64::DecodeError),

    /// The binary value ended inside a field.
    #[error(transparent)]
    Truncated(#[from] TruncatedSid),
}

/// Invalid mapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The property naming the user model attribute is absent.
    #[error("mapper configuration is missing '{0}'")]
    MissingModelAttribute(&'static str),

    /// The property naming the user model attribute is empty or whitespace.
    #[error("mapper configuration property '{0}' is blank")]
    BlankModelAttribute(&'static str),
}

/// A typed property assignment that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The property's declared type has no conversion from a directory string.
    #[error("don't know how to set property '{property}' of type {type_name}")]
    UnsupportedType {
        /// Name of the skipped property.
        property: String,
        /// Declared type of the property.
        type_name: &'static str,
    },
}
