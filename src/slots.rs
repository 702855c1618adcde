//! Open-addressed hash index: slot encoding, probe sequence, and the
//! lookup/insert/delete traversals.
//!
//! A slot is one 8-byte little-endian word. This module only knows how to
//! encode/decode that word and walk the probe sequence; key comparison is
//! supplied by the caller (the [`crate::table::Table`] engine), since only it
//! has access to the record arena that stores the actual key bytes.

pub const WORD_SIZE: usize = 8;

/// Sentinel word meaning "slot holds a tombstone" (`u64::MAX - 1`).
pub const TOMBSTONE_WORD: u64 = u64::MAX - 1;
/// Sentinel word meaning "slot is empty" — zero, so a freshly `ftruncate`'d
/// (zero-filled) region is already a valid empty slot array.
pub const EMPTY_WORD: u64 = 0;

/// The decoded contents of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Tombstone,
    Occupied(u64),
}

impl Slot {
    #[inline]
    pub fn decode(word: u64) -> Slot {
        match word {
            EMPTY_WORD => Slot::Empty,
            TOMBSTONE_WORD => Slot::Tombstone,
            other => Slot::Occupied(other - 1),
        }
    }

    #[inline]
    pub fn encode(self) -> u64 {
        match self {
            Slot::Empty => EMPTY_WORD,
            Slot::Tombstone => TOMBSTONE_WORD,
            Slot::Occupied(ord) => ord + 1,
        }
    }

    pub fn is_occupied(self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Read-only view over the slot array region of a mapped file.
#[derive(Clone, Copy)]
pub struct SlotArray<'a> {
    bytes: &'a [u8],
    capacity: u64,
}

impl<'a> SlotArray<'a> {
    pub fn new(bytes: &'a [u8], capacity: u64) -> Self {
        debug_assert!(bytes.len() as u64 >= capacity * WORD_SIZE as u64);
        SlotArray { bytes, capacity }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    #[inline]
    pub fn read(&self, idx: u64) -> Slot {
        let off = idx as usize * WORD_SIZE;
        let word = u64::from_le_bytes(self.bytes[off..off + WORD_SIZE].try_into().unwrap());
        Slot::decode(word)
    }

    /// Walk the probe sequence for `hash`, stopping at the first `Empty`
    /// slot. `key_matches(ordinal)` decides whether an `Occupied` slot along
    /// the way is the one being searched for.
    pub fn find(&self, hash: u64, mut key_matches: impl FnMut(u64) -> bool) -> Option<u64> {
        let mask = self.capacity - 1;
        let mut pos = hash & mask;
        for _ in 0..self.capacity {
            match self.read(pos) {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied(ord) => {
                    if key_matches(ord) {
                        return Some(pos);
                    }
                }
            }
            pos = (pos + 1) & mask;
        }
        None
    }
}

/// Mutable view over the slot array region, used by insert/delete/rehash.
pub struct SlotArrayMut<'a> {
    bytes: &'a mut [u8],
    capacity: u64,
}

/// Outcome of probing for an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertProbe {
    /// The key is already present at this slot, with this ordinal.
    AlreadyPresent { slot: u64, ordinal: u64 },
    /// No matching key found; this slot (`Empty` or `Tombstone`) may be used.
    Vacant { slot: u64 },
    /// The probe sequence wrapped without finding an empty or tombstoned
    /// slot — invariant 2 says this must be unreachable in practice.
    TableFull,
}

impl<'a> SlotArrayMut<'a> {
    pub fn new(bytes: &'a mut [u8], capacity: u64) -> Self {
        debug_assert!(bytes.len() as u64 >= capacity * WORD_SIZE as u64);
        SlotArrayMut { bytes, capacity }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn as_ref(&self) -> SlotArray<'_> {
        SlotArray::new(self.bytes, self.capacity)
    }

    #[inline]
    pub fn read(&self, idx: u64) -> Slot {
        self.as_ref().read(idx)
    }

    #[inline]
    pub fn write(&mut self, idx: u64, slot: Slot) {
        let off = idx as usize * WORD_SIZE;
        self.bytes[off..off + WORD_SIZE].copy_from_slice(&slot.encode().to_le_bytes());
    }

    /// Find where `hash`/`key_matches` would land for an insert: either an
    /// existing occupied slot with a matching key, or the first
    /// empty-or-tombstone slot along the probe sequence.
    pub fn probe_for_insert(&self, hash: u64, mut key_matches: impl FnMut(u64) -> bool) -> InsertProbe {
        let mask = self.capacity - 1;
        let mut pos = hash & mask;
        for _ in 0..self.capacity {
            match self.read(pos) {
                Slot::Empty | Slot::Tombstone => return InsertProbe::Vacant { slot: pos },
                Slot::Occupied(ord) => {
                    if key_matches(ord) {
                        return InsertProbe::AlreadyPresent { slot: pos, ordinal: ord };
                    }
                }
            }
            pos = (pos + 1) & mask;
        }
        InsertProbe::TableFull
    }

    /// Find the slot holding `hash`/`key_matches`, for delete/update. Returns
    /// `None` if the probe sequence reaches an `Empty` slot first.
    pub fn find(&self, hash: u64, key_matches: impl FnMut(u64) -> bool) -> Option<u64> {
        self.as_ref().find(hash, key_matches)
    }
}
