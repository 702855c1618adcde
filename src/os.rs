//! Thin OS abstraction: open/close a file, resize it, map/unmap a region,
//! sync. Implemented directly against `std::fs` and `memmap2` — no extra
//! trait indirection, since there is exactly one implementation in this
//! crate and no CLI or test double needs to swap it out.

use memmap2::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{Result, TableError};

/// Open a file for read-write, creating it if `create` is set.
pub fn open_read_write(path: &Path, create: bool) -> Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(create)
        .open(path)
        .map_err(TableError::from)
}

/// Open a file for read-only access. Fails if the file does not exist.
pub fn open_read_only(path: &Path) -> Result<File> {
    OpenOptions::new().read(true).open(path).map_err(TableError::from)
}

/// Resize the underlying file to exactly `len` bytes.
pub fn truncate(file: &File, len: u64) -> Result<()> {
    file.set_len(len).map_err(|e| TableError::out_of_memory(e.to_string()))
}

pub fn file_len(file: &File) -> Result<u64> {
    Ok(file.metadata()?.len())
}

/// Map the whole file read-write. Safety: the caller must ensure no other
/// process/thread writes to the file through an incompatible mapping while
/// this one is alive — the same discipline `MmapMut::map_mut` always asks of
/// its caller.
pub fn map_mut(file: &File) -> Result<MmapMut> {
    unsafe { MmapMut::map_mut(file) }.map_err(|e| TableError::out_of_memory(e.to_string()))
}

/// Map the whole file read-only.
pub fn map_read_only(file: &File) -> Result<Mmap> {
    unsafe { Mmap::map(file) }.map_err(|e| TableError::out_of_memory(e.to_string()))
}

/// Flush dirty mapped pages back to the file. A no-op for read-only mappings.
pub fn sync_mut(mmap: &MmapMut) -> Result<()> {
    mmap.flush().map_err(TableError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_create_truncate_and_map_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.bin");
        let file = open_read_write(&path, true).unwrap();
        truncate(&file, 64).unwrap();
        assert_eq!(file_len(&file).unwrap(), 64);
        let mut mmap = map_mut(&file).unwrap();
        mmap[0] = 7;
        sync_mut(&mmap).unwrap();
        drop(mmap);

        let file2 = open_read_only(&path).unwrap();
        let mmap2 = map_read_only(&file2).unwrap();
        assert_eq!(mmap2[0], 7);
    }

    #[test]
    fn open_read_only_on_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        assert!(open_read_only(&path).is_err());
    }
}
