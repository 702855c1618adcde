//! Structured error reporting for the table engine.
//!
//! Every fallible public operation returns `Result<T, TableError>`.
//! `TableError` carries a `Kind` plus an optional owned diagnostic message,
//! the common kind-plus-message shape used by on-disk key-value engines in
//! this space, but without the "null message means the reporter itself ran
//! out of memory" convention a manually-memory-managed ancestor would need.

use std::fmt;

pub type Result<T> = std::result::Result<T, TableError>;

/// The distinguished failure kinds a table operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Key too long, null key, options mismatch, indexed ordinal out of range.
    InvalidArgument,
    /// Mutation requested on a read-only handle.
    PermissionDenied,
    /// File extension, mapping, or rehash allocation failed.
    OutOfMemory,
    /// Indexed lookup landed on a retired ordinal.
    Vacant,
    /// `load_to_memory` called twice, or on a writable handle.
    ImpossibleOperation,
    /// Header magic/version mismatch, or an unreachable probe state.
    Corruption,
    /// Underlying file I/O failure.
    Io,
}

/// A structured table error: a `Kind` plus an optional diagnostic string.
#[derive(Debug)]
pub struct TableError {
    kind: Kind,
    message: Option<String>,
}

impl TableError {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        TableError { kind, message: Some(message.into()) }
    }

    pub fn bare(kind: Kind) -> Self {
        TableError { kind, message: None }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Kind::InvalidArgument, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(Kind::PermissionDenied, message)
    }

    pub fn out_of_memory(message: impl Into<String>) -> Self {
        Self::new(Kind::OutOfMemory, message)
    }

    pub fn vacant() -> Self {
        Self::bare(Kind::Vacant)
    }

    pub fn impossible_operation(message: impl Into<String>) -> Self {
        Self::new(Kind::ImpossibleOperation, message)
    }

    pub fn corruption(message: impl Into<String>) -> Self {
        Self::new(Kind::Corruption, message)
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.kind, msg),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl std::error::Error for TableError {}

impl From<std::io::Error> for TableError {
    fn from(err: std::io::Error) -> Self {
        TableError::new(Kind::Io, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message_when_present() {
        let err = TableError::invalid_argument("key too long");
        assert_eq!(err.kind(), Kind::InvalidArgument);
        assert_eq!(format!("{}", err), "InvalidArgument: key too long");
    }

    #[test]
    fn bare_error_has_no_message() {
        let err = TableError::vacant();
        assert_eq!(err.kind(), Kind::Vacant);
        assert_eq!(err.message(), None);
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err: TableError = io_err.into();
        assert_eq!(err.kind(), Kind::Io);
    }
}
