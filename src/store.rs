//! Store directory and record arena: the insertion-order secondary index.
//!
//! The store directory maps a dense ordinal to its current slot index (or
//! `VACANT` once the ordinal is retired); the record arena holds the actual
//! `(key, data)` bytes for each ordinal, addressed directly by ordinal — no
//! indirection beyond simple multiplication by `record_stride`.

pub const WORD_SIZE: usize = 8;

/// Sentinel store-directory word meaning "this ordinal has no live slot".
pub const VACANT_WORD: u64 = 0;

/// Read-only view over the store directory region (`capacity` words).
#[derive(Clone, Copy)]
pub struct StoreDirectory<'a> {
    bytes: &'a [u8],
}

impl<'a> StoreDirectory<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        StoreDirectory { bytes }
    }

    /// The slot index currently holding ordinal `ord`, or `None` if retired.
    #[inline]
    pub fn slot_of(&self, ord: u64) -> Option<u64> {
        let off = ord as usize * WORD_SIZE;
        let word = u64::from_le_bytes(self.bytes[off..off + WORD_SIZE].try_into().unwrap());
        if word == VACANT_WORD {
            None
        } else {
            Some(word - 1)
        }
    }
}

/// Mutable view over the store directory region.
pub struct StoreDirectoryMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> StoreDirectoryMut<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        StoreDirectoryMut { bytes }
    }

    pub fn as_ref(&self) -> StoreDirectory<'_> {
        StoreDirectory::new(self.bytes)
    }

    #[inline]
    pub fn slot_of(&self, ord: u64) -> Option<u64> {
        self.as_ref().slot_of(ord)
    }

    #[inline]
    pub fn set_slot(&mut self, ord: u64, slot: u64) {
        let off = ord as usize * WORD_SIZE;
        self.bytes[off..off + WORD_SIZE].copy_from_slice(&(slot + 1).to_le_bytes());
    }

    #[inline]
    pub fn set_vacant(&mut self, ord: u64) {
        let off = ord as usize * WORD_SIZE;
        self.bytes[off..off + WORD_SIZE].copy_from_slice(&VACANT_WORD.to_le_bytes());
    }
}

/// Layout parameters for one arena record: an 8-byte-aligned, NUL-terminated
/// key region followed by a fixed-size data region.
#[derive(Debug, Clone, Copy)]
pub struct RecordShape {
    pub key_region: usize,
    pub object_datalen: usize,
    pub stride: usize,
}

impl RecordShape {
    pub fn new(key_maxlen: u64, object_datalen: u64) -> Self {
        let key_region = crate::layout::align8(key_maxlen + 1) as usize;
        let object_datalen = object_datalen as usize;
        let stride = crate::layout::record_stride(key_maxlen, object_datalen) as usize;
        RecordShape { key_region, object_datalen, stride }
    }
}

/// Read-only view over the record arena.
#[derive(Clone, Copy)]
pub struct Arena<'a> {
    bytes: &'a [u8],
    shape: RecordShape,
}

impl<'a> Arena<'a> {
    pub fn new(bytes: &'a [u8], shape: RecordShape) -> Self {
        Arena { bytes, shape }
    }

    fn record_bytes(&self, ord: u64) -> &[u8] {
        let off = ord as usize * self.shape.stride;
        &self.bytes[off..off + self.shape.stride]
    }

    /// The stored key for ordinal `ord`, trimmed at its NUL terminator.
    pub fn key(&self, ord: u64) -> &[u8] {
        let rec = self.record_bytes(ord);
        let key_field = &rec[..self.shape.key_region];
        let len = key_field.iter().position(|&b| b == 0).unwrap_or(key_field.len());
        &key_field[..len]
    }

    /// The fixed-size data payload for ordinal `ord`.
    pub fn data(&self, ord: u64) -> &[u8] {
        let rec = self.record_bytes(ord);
        &rec[self.shape.key_region..self.shape.key_region + self.shape.object_datalen]
    }

    pub fn key_matches(&self, ord: u64, key: &[u8]) -> bool {
        self.key(ord) == key
    }
}

/// Mutable view over the record arena.
pub struct ArenaMut<'a> {
    bytes: &'a mut [u8],
    shape: RecordShape,
}

impl<'a> ArenaMut<'a> {
    pub fn new(bytes: &'a mut [u8], shape: RecordShape) -> Self {
        ArenaMut { bytes, shape }
    }

    pub fn as_ref(&self) -> Arena<'_> {
        Arena::new(self.bytes, self.shape)
    }

    /// Write a fresh record: zeroes the key region, then stores `key`
    /// (NUL-implied by zero padding) and `data`.
    pub fn write_record(&mut self, ord: u64, key: &[u8], data: &[u8]) {
        debug_assert!(key.len() < self.shape.key_region);
        debug_assert_eq!(data.len(), self.shape.object_datalen);
        let off = ord as usize * self.shape.stride;
        let rec = &mut self.bytes[off..off + self.shape.stride];
        for b in rec[..self.shape.key_region].iter_mut() {
            *b = 0;
        }
        rec[..key.len()].copy_from_slice(key);
        rec[self.shape.key_region..self.shape.key_region + self.shape.object_datalen].copy_from_slice(data);
    }

    /// Overwrite just the data payload of an existing record, in place.
    pub fn write_data(&mut self, ord: u64, data: &[u8]) {
        debug_assert_eq!(data.len(), self.shape.object_datalen);
        let off = ord as usize * self.shape.stride + self.shape.key_region;
        self.bytes[off..off + self.shape.object_datalen].copy_from_slice(data);
    }

    /// A mutable view into the data payload, for in-place caller mutation
    /// via `Table::lookup_mut`.
    pub fn data_mut(&mut self, ord: u64) -> &mut [u8] {
        let off = ord as usize * self.shape.stride + self.shape.key_region;
        &mut self.bytes[off..off + self.shape.object_datalen]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_roundtrip() {
        let mut buf = vec![0u8; 8 * WORD_SIZE];
        let mut dir = StoreDirectoryMut::new(&mut buf);
        assert_eq!(dir.slot_of(2), None);
        dir.set_slot(2, 5);
        assert_eq!(dir.slot_of(2), Some(5));
        dir.set_vacant(2);
        assert_eq!(dir.slot_of(2), None);
    }

    #[test]
    fn arena_write_and_read_record() {
        let shape = RecordShape::new(15, 4);
        let mut buf = vec![0u8; shape.stride * 4];
        {
            let mut arena = ArenaMut::new(&mut buf, shape);
            arena.write_record(0, b"alpha", &[1, 2, 3, 4]);
        }
        let arena = Arena::new(&buf, shape);
        assert_eq!(arena.key(0), b"alpha");
        assert_eq!(arena.data(0), &[1, 2, 3, 4]);
        assert!(arena.key_matches(0, b"alpha"));
        assert!(!arena.key_matches(0, b"beta"));
    }

    #[test]
    fn arena_write_data_inplace() {
        let shape = RecordShape::new(15, 4);
        let mut buf = vec![0u8; shape.stride];
        let mut arena = ArenaMut::new(&mut buf, shape);
        arena.write_record(0, b"k", &[0, 0, 0, 0]);
        arena.write_data(0, &[9, 9, 9, 9]);
        assert_eq!(arena.as_ref().data(0), &[9, 9, 9, 9]);
    }

    #[test]
    fn record_shape_rounds_key_region_and_stride_to_8() {
        let shape = RecordShape::new(10, 5);
        assert_eq!(shape.key_region, 16);
        assert_eq!(shape.stride, 24);
    }
}
