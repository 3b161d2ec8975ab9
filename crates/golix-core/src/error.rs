//! Error types for Golix object handling

use thiserror::Error;

/// Main error type for Golix operations.
///
/// Every error is scoped to the single object or operation that raised it.
/// Nothing here is recovered inside the crate; callers decide whether to
/// discard the object, retry with other keys, or distrust the peer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GolixError {
    /// Malformed, truncated or overlong bytes, or an unknown
    /// magic / version / cipher / address algorithm tag.
    #[error("Format error: {0}")]
    Format(String),

    /// An embedded address does not match the digest recomputed from the
    /// record's own bytes.
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Signature, MAC or AEAD verification failed, or the object does not
    /// belong to the identity it was checked against.
    #[error("Security error: {0}")]
    Security(String),

    /// Semantically invalid construction request (bad lengths, unsupported
    /// cipher selection, history/dynamic address mismatch, ...).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl GolixError {
    /// Returns true for [`GolixError::Format`].
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Returns true for [`GolixError::Integrity`].
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    /// Returns true for [`GolixError::Security`].
    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security(_))
    }

    /// Returns true for [`GolixError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Re-label a registry rejection as a parse failure.
    ///
    /// Registry lookups report unsupported tags as validation errors; when
    /// the tag came off the wire the same condition is a format error.
    pub(crate) fn into_format(self) -> Self {
        match self {
            Self::Validation(msg) => Self::Format(msg),
            other => other,
        }
    }
}

/// Result type alias using GolixError
pub type GolixResult<T> = Result<T, GolixError>;
