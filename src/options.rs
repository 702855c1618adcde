//! Open-time configuration for a [`crate::table::Table`].

/// `{key_maxlen, object_datalen}` — the open-time schema contract.
///
/// Either field may be left `0` to mean "infer from the file's header"; an
/// existing file's header wins reconciliation unless the caller supplies a
/// conflicting non-zero value, in which case `open` fails with
/// [`crate::error::Kind::InvalidArgument`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Maximum key length in bytes, excluding the NUL terminator.
    pub key_maxlen: u64,
    /// Fixed payload size in bytes for every record.
    pub object_datalen: u64,
}

impl Options {
    pub fn new(key_maxlen: u64, object_datalen: u64) -> Self {
        Options { key_maxlen, object_datalen }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.key_maxlen == 0 && self.object_datalen == 0
    }
}

/// Access mode a table is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

impl AccessMode {
    pub fn is_read_only(self) -> bool {
        matches!(self, AccessMode::ReadOnly)
    }
}

/// Whether `open` may create a new file when none exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Fail if the file does not already exist.
    MustExist,
    /// Create a new file (requires both [`Options`] fields to be non-zero).
    CreateIfMissing,
}
