//! On-disk file layout: header encode/decode and region offset arithmetic.
//!
//! ```text
//! [ Header (64B) | Slot Array (capacity x 8B) | Store Directory (capacity x 8B) | Record Arena (slots_used x record_stride) ]
//! ```
//!
//! All region boundaries are 8-byte aligned by construction: `HEADER_SIZE`,
//! slot words, and directory words are all multiples of 8, and
//! [`record_stride`] itself rounds up to a multiple of 8.

use crate::error::{Result, TableError};

/// ASCII magic stamped at byte 0, followed by a one-byte format version.
pub const MAGIC: [u8; 6] = *b"DHASH1";
pub const VERSION: u8 = 1;

pub const HEADER_SIZE: usize = 64;
pub const WORD_SIZE: usize = 8;

pub const MIN_CAPACITY: u64 = 8;

const OFF_MAGIC: usize = 0;
const OFF_VERSION: usize = 6;
// byte 7 reserved
const OFF_KEY_MAXLEN: usize = 8;
const OFF_OBJECT_DATALEN: usize = 16;
const OFF_CAPACITY: usize = 24;
const OFF_SIZE: usize = 32;
const OFF_SLOTS_USED: usize = 40;
// bytes 48..64 reserved/padding

/// Round `n` up to the next multiple of 8.
#[inline]
pub fn align8(n: u64) -> u64 {
    (n + 7) & !7
}

/// Byte stride of one arena record: the NUL-terminated, 8-byte-aligned key
/// region followed by exactly `object_datalen` payload bytes, with the whole
/// stride itself rounded up to 8 so every record in the arena keeps
/// subsequent offsets 8-byte aligned.
#[inline]
pub fn record_stride(key_maxlen: u64, object_datalen: u64) -> u64 {
    align8(align8(key_maxlen + 1) + object_datalen)
}

#[inline]
pub fn slot_array_offset() -> u64 {
    HEADER_SIZE as u64
}

#[inline]
pub fn store_dir_offset(capacity: u64) -> u64 {
    slot_array_offset() + capacity * WORD_SIZE as u64
}

#[inline]
pub fn arena_offset(capacity: u64) -> u64 {
    store_dir_offset(capacity) + capacity * WORD_SIZE as u64
}

/// Total file length required to hold `capacity` slots and `slots_used`
/// arena records under the given schema.
#[inline]
pub fn file_len(capacity: u64, slots_used: u64, key_maxlen: u64, object_datalen: u64) -> u64 {
    arena_offset(capacity) + slots_used * record_stride(key_maxlen, object_datalen)
}

/// A read-only view over the 64-byte header embedded in a mapped region.
pub struct HeaderView<'a>(&'a [u8]);

impl<'a> HeaderView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() >= HEADER_SIZE);
        HeaderView(&bytes[..HEADER_SIZE])
    }

    pub fn check_magic_and_version(&self) -> Result<()> {
        if self.0[OFF_MAGIC..OFF_MAGIC + MAGIC.len()] != MAGIC {
            return Err(TableError::corruption("magic mismatch: not a table file"));
        }
        if self.0[OFF_VERSION] != VERSION {
            return Err(TableError::corruption(format!(
                "unsupported version {} (expected {})",
                self.0[OFF_VERSION], VERSION
            )));
        }
        Ok(())
    }

    fn read_u64(&self, off: usize) -> u64 {
        u64::from_le_bytes(self.0[off..off + 8].try_into().unwrap())
    }

    pub fn key_maxlen(&self) -> u64 {
        self.read_u64(OFF_KEY_MAXLEN)
    }

    pub fn object_datalen(&self) -> u64 {
        self.read_u64(OFF_OBJECT_DATALEN)
    }

    pub fn capacity(&self) -> u64 {
        self.read_u64(OFF_CAPACITY)
    }

    pub fn size(&self) -> u64 {
        self.read_u64(OFF_SIZE)
    }

    pub fn slots_used(&self) -> u64 {
        self.read_u64(OFF_SLOTS_USED)
    }
}

/// A mutable view over the 64-byte header, for initialization and updates.
pub struct HeaderViewMut<'a>(&'a mut [u8]);

impl<'a> HeaderViewMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        debug_assert!(bytes.len() >= HEADER_SIZE);
        HeaderViewMut(&mut bytes[..HEADER_SIZE])
    }

    fn write_u64(&mut self, off: usize, value: u64) {
        self.0[off..off + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Stamp a fresh header for a newly created file.
    pub fn init(&mut self, key_maxlen: u64, object_datalen: u64, capacity: u64) {
        self.0[OFF_MAGIC..OFF_MAGIC + MAGIC.len()].copy_from_slice(&MAGIC);
        self.0[OFF_VERSION] = VERSION;
        self.write_u64(OFF_KEY_MAXLEN, key_maxlen);
        self.write_u64(OFF_OBJECT_DATALEN, object_datalen);
        self.write_u64(OFF_CAPACITY, capacity);
        self.write_u64(OFF_SIZE, 0);
        self.write_u64(OFF_SLOTS_USED, 0);
    }

    pub fn set_capacity(&mut self, capacity: u64) {
        self.write_u64(OFF_CAPACITY, capacity);
    }

    pub fn set_size(&mut self, size: u64) {
        self.write_u64(OFF_SIZE, size);
    }

    pub fn set_slots_used(&mut self, slots_used: u64) {
        self.write_u64(OFF_SLOTS_USED, slots_used);
    }

    pub fn as_view(&self) -> HeaderView<'_> {
        HeaderView(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_stride_rounds_up_to_8() {
        // key_maxlen=15 -> 16 bytes (15+1, already aligned) + 8 data = 24, already aligned
        assert_eq!(record_stride(15, 8), 24);
        // key_maxlen=10 -> 11 rounds to 16, + 5 data = 21, rounds up again to 24
        assert_eq!(record_stride(10, 5), 24);
    }

    #[test]
    fn offsets_are_8_byte_aligned_and_increasing() {
        let cap = 64u64;
        assert_eq!(slot_array_offset() % 8, 0);
        assert_eq!(store_dir_offset(cap) % 8, 0);
        assert_eq!(arena_offset(cap) % 8, 0);
        assert!(slot_array_offset() < store_dir_offset(cap));
        assert!(store_dir_offset(cap) < arena_offset(cap));
    }

    #[test]
    fn header_roundtrip() {
        let mut buf = vec![0u8; HEADER_SIZE];
        {
            let mut h = HeaderViewMut::new(&mut buf);
            h.init(15, 8, 8);
        }
        let view = HeaderView::new(&buf);
        view.check_magic_and_version().unwrap();
        assert_eq!(view.key_maxlen(), 15);
        assert_eq!(view.object_datalen(), 8);
        assert_eq!(view.capacity(), 8);
        assert_eq!(view.size(), 0);
        assert_eq!(view.slots_used(), 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let buf = vec![0u8; HEADER_SIZE];
        let view = HeaderView::new(&buf);
        assert!(view.check_magic_and_version().is_err());
    }
}
