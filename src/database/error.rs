//! Error conditions raised by this crate itself.
//!
//! Driver failures (sqlx, tiberius) are never rewrapped: they travel inside
//! `anyhow::Error` untouched and can be recovered with `downcast_ref`.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbxError {
    /// The connection URL does not start with a scheme any driver handles.
    UnrecognizedProtocol(String),
    /// The connection URL could not be parsed.
    InvalidUrl(String),
    /// An operation needed an open connection and there was none.
    NotConnected,
    /// A single-row query returned no rows.
    RowNotFound,
    /// A single-row query returned NULL where a value was required.
    UnexpectedNull,
}

impl fmt::Display for DbxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedProtocol(scheme) => {
                write!(f, "unrecognized protocol: {scheme:?}")
            }
            Self::InvalidUrl(reason) => write!(f, "invalid connection url: {reason}"),
            Self::NotConnected => f.write_str("database not connected"),
            Self::RowNotFound => f.write_str("no rows returned by a query that expected one"),
            Self::UnexpectedNull => f.write_str("unexpected NULL in a non-nullable column"),
        }
    }
}

impl StdError for DbxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_does_not_leak_url() {
        let err = DbxError::UnrecognizedProtocol("redis".to_string());
        assert_eq!(err.to_string(), "unrecognized protocol: \"redis\"");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = DbxError::RowNotFound.into();
        assert_eq!(err.downcast_ref::<DbxError>(), Some(&DbxError::RowNotFound));
    }
}
