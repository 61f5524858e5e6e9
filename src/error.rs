//! Error type shared by every operation in this crate.

use thiserror::Error;

/// TOTP error type.
///
/// Every failure is deterministic: calling again with the same input fails the same way, so none
/// of these are worth retrying.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// An argument was outside of its documented domain (empty secret, zero period, etc.).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// A Base32 display key could not be decoded.
    #[error("malformed Base32 input: {0}")]
    Format(#[from] data_encoding::DecodeError),
    /// A hash mode name did not match any supported algorithm.
    #[error("unknown hash algorithm {0:?}")]
    UnknownAlgorithm(String),
    /// The system random number generator failed.
    #[error("random number generator failure")]
    Random,
}

impl From<ring::error::Unspecified> for Error {
    fn from(_: ring::error::Unspecified) -> Self {
        Error::Random
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
