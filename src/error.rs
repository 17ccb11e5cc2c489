/* src/error.rs */

use thiserror::Error;

/// Result type alias for operations that may fail with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building the detector's fixed tables.
///
/// The detection functions themselves never return these; malformed request
/// data degrades to an empty or fallback value instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A hard-coded CIDR literal failed to parse.
    #[error("Invalid CIDR literal {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// A peer address could not be split into host and port.
    #[error("Invalid peer address {addr:?}: {kind}")]
    InvalidPeerAddr { addr: String, kind: AddrError },
}

/// Why a `host:port` string could not be split.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrError {
    #[error("missing port in address")]
    MissingPort,

    #[error("too many colons in address")]
    TooManyColons,

    #[error("missing ']' in address")]
    MissingBracket,

    #[error("unexpected '[' in address")]
    UnexpectedOpenBracket,

    #[error("unexpected ']' in address")]
    UnexpectedCloseBracket,
}
