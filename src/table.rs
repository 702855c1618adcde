//! The table engine: the public [`Table`] type that orchestrates
//! [`crate::os`], [`crate::layout`], [`crate::slots`], and [`crate::store`]
//! into the open/insert/lookup/delete/reserve/iterate surface.
//!
//! This is the one module in the crate that touches more than one on-disk
//! region at a time. Everywhere else splits the mapped byte slice into
//! disjoint `&[u8]`/`&mut [u8]` sub-slices up front so the slot array, store
//! directory, and record arena can be borrowed simultaneously without
//! aliasing.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};

use crate::error::{Result, TableError};
use crate::hash::{KeyHasher, SeaKeyHasher};
use crate::layout;
use crate::options::{AccessMode, CreateMode, Options};
use crate::os;
use crate::slots::{InsertProbe, Slot, SlotArray, SlotArrayMut};
use crate::store::{Arena, ArenaMut, RecordShape, StoreDirectory, StoreDirectoryMut};

/// Grow when the next insertion would push `slots_used` to or past
/// `capacity * GROW_NUM / GROW_DEN` (70% load factor).
const GROW_NUM: u64 = 7;
const GROW_DEN: u64 = 10;

/// The three states a handle's bytes can live in. Plain file-backed mappings
/// are split by mutability at the type level, so a read-only handle simply
/// cannot obtain a `&mut [u8]` into the file — there is no separate runtime
/// check standing in for what the borrow checker already refuses.
enum Backing {
    ReadWrite(MmapMut),
    ReadOnly(Mmap),
    InMemory(Vec<u8>),
}

impl Backing {
    fn bytes(&self) -> &[u8] {
        match self {
            Backing::ReadWrite(m) => &m[..],
            Backing::ReadOnly(m) => &m[..],
            Backing::InMemory(b) => &b[..],
        }
    }

    fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        match self {
            Backing::ReadWrite(m) => Some(&mut m[..]),
            Backing::ReadOnly(_) | Backing::InMemory(_) => None,
        }
    }
}

/// A persistent, memory-mapped hash table.
///
/// One file holds the header, slot array, store directory, and record arena
/// described in `layout`. A handle is either a read-write mapping (mutations
/// allowed) or a read-only mapping (mutations rejected with
/// [`crate::error::Kind::PermissionDenied`]); [`Table::load_to_memory`] can
/// additionally pull a read-only handle's bytes into an anonymous buffer to
/// avoid repeat page faults on a hot read path.
pub struct Table {
    path: PathBuf,
    file: File,
    backing: Backing,
    access_mode: AccessMode,
    key_maxlen: u64,
    object_datalen: u64,
    shape: RecordShape,
    capacity: u64,
    size: u64,
    slots_used: u64,
    poisoned: bool,
    loaded_to_memory: bool,
    hasher: SeaKeyHasher,
}

/// Split a mapped region into its three disjoint, independently-mutable
/// sub-slices, given the current capacity and record shape.
fn split_regions_mut(bytes: &mut [u8], capacity: u64, shape: RecordShape) -> (SlotArrayMut<'_>, StoreDirectoryMut<'_>, ArenaMut<'_>) {
    let slot_words = (capacity * layout::WORD_SIZE as u64) as usize;
    let dir_words = slot_words;
    let (_header, rest) = bytes.split_at_mut(layout::HEADER_SIZE);
    let (slot_bytes, rest) = rest.split_at_mut(slot_words);
    let (dir_bytes, arena_bytes) = rest.split_at_mut(dir_words);
    (SlotArrayMut::new(slot_bytes, capacity), StoreDirectoryMut::new(dir_bytes), ArenaMut::new(arena_bytes, shape))
}

impl Table {
    /// Open (and optionally create) a table file.
    pub fn open<P: AsRef<Path>>(path: P, options: Options, access_mode: AccessMode, create: CreateMode) -> Result<Table> {
        let path = path.as_ref().to_path_buf();
        let existed = path.exists();

        if !existed {
            if create != CreateMode::CreateIfMissing {
                return Err(TableError::invalid_argument("file does not exist and create was not requested"));
            }
            if access_mode.is_read_only() {
                return Err(TableError::permission_denied("cannot create a new table with a read-only handle"));
            }
            if options.is_empty() {
                return Err(TableError::invalid_argument(
                    "creating a new table requires a non-zero key_maxlen and object_datalen",
                ));
            }
        }

        match access_mode {
            AccessMode::ReadWrite => {
                let file = os::open_read_write(&path, create == CreateMode::CreateIfMissing)?;
                if existed {
                    Self::open_existing_read_write(path, file, options)
                } else {
                    Self::create_new(path, file, options)
                }
            }
            AccessMode::ReadOnly => {
                let file = os::open_read_only(&path)?;
                let mmap = os::map_read_only(&file)?;
                let (key_maxlen, object_datalen, capacity, size, slots_used) = reconcile_header(&mmap[..], &options)?;
                log::debug!(
                    target: "diskhash::table",
                    "{}: opened read-only (capacity={}, size={}, slots_used={})",
                    path.display(), capacity, size, slots_used,
                );
                let shape = RecordShape::new(key_maxlen, object_datalen);
                Ok(Table {
                    path,
                    file,
                    backing: Backing::ReadOnly(mmap),
                    access_mode,
                    key_maxlen,
                    object_datalen,
                    shape,
                    capacity,
                    size,
                    slots_used,
                    poisoned: false,
                    loaded_to_memory: false,
                    hasher: SeaKeyHasher,
                })
            }
        }
    }

    fn create_new(path: PathBuf, file: File, options: Options) -> Result<Table> {
        let capacity = layout::MIN_CAPACITY;
        // Pre-allocate arena room for the full `capacity`, not just the zero
        // records that exist yet: `slots_used` only ever grows one record at a
        // time on insert, and nothing else extends the file, so the arena must
        // already have room for every ordinal an insert could append before the
        // next grow. `free` truncates back down to the exact `slots_used`-sized
        // arena `layout::file_len` describes for a persisted file.
        let len = layout::file_len(capacity, capacity, options.key_maxlen, options.object_datalen);
        os::truncate(&file, len)?;
        let mut mmap = os::map_mut(&file)?;
        {
            let mut header = layout::HeaderViewMut::new(&mut mmap);
            header.init(options.key_maxlen, options.object_datalen, capacity);
        }
        log::info!(
            target: "diskhash::table",
            "{}: created (key_maxlen={}, object_datalen={}, capacity={})",
            path.display(), options.key_maxlen, options.object_datalen, capacity,
        );
        let shape = RecordShape::new(options.key_maxlen, options.object_datalen);
        Ok(Table {
            path,
            file,
            backing: Backing::ReadWrite(mmap),
            access_mode: AccessMode::ReadWrite,
            key_maxlen: options.key_maxlen,
            object_datalen: options.object_datalen,
            shape,
            capacity,
            size: 0,
            slots_used: 0,
            poisoned: false,
            loaded_to_memory: false,
            hasher: SeaKeyHasher,
        })
    }

    fn open_existing_read_write(path: PathBuf, file: File, options: Options) -> Result<Table> {
        let mmap = os::map_mut(&file)?;
        let (key_maxlen, object_datalen, capacity, size, slots_used) = reconcile_header(&mmap, &options)?;
        drop(mmap);

        // A freshly reopened file may only be sized for its persisted
        // `slots_used` records (as `free` leaves it). Re-extend the arena to
        // the full `capacity` before handing back a writable handle, so the
        // very next insert has room to append without re-truncating the file.
        let needed_len = layout::file_len(capacity, capacity, key_maxlen, object_datalen);
        if os::file_len(&file)? < needed_len {
            os::truncate(&file, needed_len)?;
        }
        let mmap = os::map_mut(&file)?;

        log::debug!(
            target: "diskhash::table",
            "{}: opened read-write (capacity={}, size={}, slots_used={})",
            path.display(), capacity, size, slots_used,
        );
        let shape = RecordShape::new(key_maxlen, object_datalen);
        Ok(Table {
            path,
            file,
            backing: Backing::ReadWrite(mmap),
            access_mode: AccessMode::ReadWrite,
            key_maxlen,
            object_datalen,
            shape,
            capacity,
            size,
            slots_used,
            poisoned: false,
            loaded_to_memory: false,
            hasher: SeaKeyHasher,
        })
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.poisoned {
            return Err(TableError::impossible_operation("handle is poisoned; free it without further use"));
        }
        if self.access_mode.is_read_only() {
            return Err(TableError::permission_denied("mutation requested on a read-only handle"));
        }
        Ok(())
    }

    fn validate_key(&self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(TableError::invalid_argument("key must not be empty"));
        }
        if key.len() as u64 >= self.key_maxlen {
            return Err(TableError::invalid_argument(format!(
                "key length {} exceeds key_maxlen {}",
                key.len(),
                self.key_maxlen
            )));
        }
        Ok(())
    }

    fn validate_data(&self, data: &[u8]) -> Result<()> {
        if data.len() as u64 != self.object_datalen {
            return Err(TableError::invalid_argument(format!(
                "data length {} does not match object_datalen {}",
                data.len(),
                self.object_datalen
            )));
        }
        Ok(())
    }

    fn regions(&self) -> (SlotArray<'_>, StoreDirectory<'_>, Arena<'_>) {
        let bytes = self.backing.bytes();
        let slot_start = layout::slot_array_offset() as usize;
        let dir_start = layout::store_dir_offset(self.capacity) as usize;
        let arena_start = layout::arena_offset(self.capacity) as usize;
        (
            SlotArray::new(&bytes[slot_start..dir_start], self.capacity),
            StoreDirectory::new(&bytes[dir_start..arena_start]),
            Arena::new(&bytes[arena_start..], self.shape),
        )
    }

    fn write_header_counters(&mut self) {
        let capacity = self.capacity;
        let size = self.size;
        let slots_used = self.slots_used;
        if let Some(bytes) = self.backing.bytes_mut() {
            let mut header = layout::HeaderViewMut::new(bytes);
            header.set_capacity(capacity);
            header.set_size(size);
            header.set_slots_used(slots_used);
        }
    }

    /// Current number of live (non-deleted) records.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current slot array capacity, always a power of two.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Total ordinals ever assigned since the last rehash, live or deleted.
    pub fn slots_used(&self) -> u64 {
        self.slots_used
    }

    /// Retired ordinals awaiting reclamation at the next rehash.
    pub fn dirty_slots(&self) -> u64 {
        self.slots_used - self.size
    }

    pub fn access_mode(&self) -> AccessMode {
        self.access_mode
    }

    /// Look up `key`, returning a borrowed view of its data if present.
    ///
    /// Oversized or empty keys simply cannot be present, so they report
    /// `None` rather than an error — matching how an out-of-range ordinal
    /// passed to [`Table::indexed_lookup`] is distinguished from a genuinely
    /// retired one.
    pub fn lookup(&self, key: &[u8]) -> Option<&[u8]> {
        if key.is_empty() || key.len() as u64 >= self.key_maxlen {
            return None;
        }
        let hash = self.hasher.hash_key(key);
        let (slots, _dir, arena) = self.regions();
        let slot_idx = slots.find(hash, |ord| arena.key_matches(ord, key))?;
        let ord = match slots.read(slot_idx) {
            Slot::Occupied(ord) => ord,
            _ => return None,
        };
        Some(arena.data(ord))
    }

    /// Like [`Table::lookup`], but returns a mutable view for in-place
    /// updates. Requires a read-write handle.
    pub fn lookup_mut(&mut self, key: &[u8]) -> Result<Option<&mut [u8]>> {
        self.ensure_writable()?;
        if key.is_empty() || key.len() as u64 >= self.key_maxlen {
            return Ok(None);
        }
        let hash = self.hasher.hash_key(key);
        let capacity = self.capacity;
        let shape = self.shape;
        let bytes = self.backing.bytes_mut().expect("ensure_writable guarantees a read-write backing");
        let (slots, _dir, mut arena) = split_regions_mut(bytes, capacity, shape);
        let found = {
            let arena_ref = arena.as_ref();
            slots.find(hash, |ord| arena_ref.key_matches(ord, key))
        };
        match found {
            None => Ok(None),
            Some(slot_idx) => {
                let ord = match slots.read(slot_idx) {
                    Slot::Occupied(ord) => ord,
                    _ => return Err(TableError::corruption("lookup_mut: slot not occupied after a successful find")),
                };
                Ok(Some(arena.data_mut(ord)))
            }
        }
    }

    /// Insert `key` -> `data`. Returns `Ok(false)` without modifying
    /// anything if `key` is already present.
    pub fn insert(&mut self, key: &[u8], data: &[u8]) -> Result<bool> {
        self.ensure_writable()?;
        self.validate_key(key)?;
        self.validate_data(data)?;
        self.maybe_grow()?;

        let hash = self.hasher.hash_key(key);
        let capacity = self.capacity;
        let shape = self.shape;
        let bytes = self.backing.bytes_mut().expect("ensure_writable guarantees a read-write backing");
        let (mut slots, mut dir, mut arena) = split_regions_mut(bytes, capacity, shape);

        let probe = {
            let arena_ref = arena.as_ref();
            slots.probe_for_insert(hash, |ord| arena_ref.key_matches(ord, key))
        };
        match probe {
            InsertProbe::AlreadyPresent { .. } => Ok(false),
            InsertProbe::Vacant { slot } => {
                let ordinal = self.slots_used;
                arena.write_record(ordinal, key, data);
                slots.write(slot, Slot::Occupied(ordinal));
                dir.set_slot(ordinal, slot);
                self.slots_used += 1;
                self.size += 1;
                self.write_header_counters();
                log::trace!(target: "diskhash::table", "{}: insert ordinal {} -> slot {}", self.path.display(), ordinal, slot);
                Ok(true)
            }
            InsertProbe::TableFull => Err(TableError::corruption(
                "probe sequence exhausted the slot array; the load-factor grow threshold should have prevented this",
            )),
        }
    }

    /// Overwrite the data for an existing key. Returns `Ok(false)` if `key`
    /// is not present.
    pub fn update(&mut self, key: &[u8], data: &[u8]) -> Result<bool> {
        self.ensure_writable()?;
        self.validate_key(key)?;
        self.validate_data(data)?;

        let hash = self.hasher.hash_key(key);
        let capacity = self.capacity;
        let shape = self.shape;
        let bytes = self.backing.bytes_mut().expect("ensure_writable guarantees a read-write backing");
        let (slots, _dir, mut arena) = split_regions_mut(bytes, capacity, shape);

        let found = {
            let arena_ref = arena.as_ref();
            slots.find(hash, |ord| arena_ref.key_matches(ord, key))
        };
        match found {
            None => Ok(false),
            Some(slot_idx) => {
                let ord = match slots.read(slot_idx) {
                    Slot::Occupied(ord) => ord,
                    _ => return Err(TableError::corruption("update: slot not occupied after a successful find")),
                };
                arena.write_data(ord, data);
                Ok(true)
            }
        }
    }

    /// Remove `key`, tombstoning its slot and retiring its ordinal. Returns
    /// `Ok(false)` if `key` is not present.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        self.ensure_writable()?;
        self.validate_key(key)?;

        let hash = self.hasher.hash_key(key);
        let capacity = self.capacity;
        let shape = self.shape;
        let bytes = self.backing.bytes_mut().expect("ensure_writable guarantees a read-write backing");
        let (mut slots, mut dir, arena) = split_regions_mut(bytes, capacity, shape);

        let found = {
            let arena_ref = arena.as_ref();
            slots.find(hash, |ord| arena_ref.key_matches(ord, key))
        };
        match found {
            None => Ok(false),
            Some(slot_idx) => {
                let ord = match slots.read(slot_idx) {
                    Slot::Occupied(ord) => ord,
                    _ => return Err(TableError::corruption("delete: slot not occupied after a successful find")),
                };
                slots.write(slot_idx, Slot::Tombstone);
                dir.set_vacant(ord);
                self.size -= 1;
                self.write_header_counters();
                log::trace!(target: "diskhash::table", "{}: delete ordinal {} (slot {})", self.path.display(), ord, slot_idx);
                Ok(true)
            }
        }
    }

    /// Fetch the `(key, data)` pair for ordinal `ordinal`, in insertion
    /// order. Returns [`crate::error::Kind::Vacant`] if that ordinal has
    /// been deleted and not yet reclaimed by a rehash.
    pub fn indexed_lookup(&self, ordinal: u64) -> Result<(Vec<u8>, Vec<u8>)> {
        if ordinal >= self.slots_used {
            return Err(TableError::invalid_argument(format!(
                "ordinal {} out of range (slots_used={})",
                ordinal, self.slots_used
            )));
        }
        let (_slots, dir, arena) = self.regions();
        if dir.slot_of(ordinal).is_none() {
            return Err(TableError::vacant());
        }
        Ok((arena.key(ordinal).to_vec(), arena.data(ordinal).to_vec()))
    }

    /// Iterate all live records in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter { table: self, next: 0 }
    }

    /// Ensure capacity is at least `requested_capacity` (rounded up to a
    /// power of two), rehashing if a grow is needed. Returns the resulting
    /// capacity, which may be unchanged.
    pub fn reserve(&mut self, requested_capacity: u64) -> Result<u64> {
        self.ensure_writable()?;
        let requested = requested_capacity.max(layout::MIN_CAPACITY).next_power_of_two();
        if requested <= self.capacity {
            return Ok(self.capacity);
        }
        self.grow_to(requested)?;
        Ok(self.capacity)
    }

    fn maybe_grow(&mut self) -> Result<()> {
        if (self.slots_used + 1) * GROW_DEN >= self.capacity * GROW_NUM {
            self.grow_to(self.capacity * 2)?;
        }
        Ok(())
    }

    /// Rehash into a table of `new_capacity`: gather every live record (in
    /// ordinal order) from the current mapping, extend the file, then
    /// rebuild the slot array, store directory, and record arena from
    /// scratch by reinserting each key. The old mapping is only replaced
    /// once the gather step has already succeeded, so a failure here leaves
    /// the existing handle untouched.
    fn grow_to(&mut self, new_capacity: u64) -> Result<()> {
        debug_assert!(new_capacity > self.capacity);

        let mut live: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(self.size as usize);
        {
            let (_slots, dir, arena) = self.regions();
            for ord in 0..self.slots_used {
                if dir.slot_of(ord).is_some() {
                    live.push((arena.key(ord).to_vec(), arena.data(ord).to_vec()));
                }
            }
        }
        let new_slots_used = live.len() as u64;
        // Pre-allocate arena room for the full `new_capacity`, not just the
        // `new_slots_used` records being replayed right now: the same reason
        // `create_new` pre-sizes to `capacity` applies here, since nothing
        // else extends the file before a later fresh-append insert writes
        // past `new_slots_used`. `free` truncates back down to the exact
        // logical size on close.
        let new_len = layout::file_len(new_capacity, new_capacity, self.key_maxlen, self.object_datalen);

        os::truncate(&self.file, new_len)?;
        let new_mmap = os::map_mut(&self.file)?;
        self.backing = Backing::ReadWrite(new_mmap);

        {
            let bytes = self.backing.bytes_mut().expect("just mapped read-write");
            let mut header = layout::HeaderViewMut::new(bytes);
            header.init(self.key_maxlen, self.object_datalen, new_capacity);
            header.set_size(self.size);
            header.set_slots_used(new_slots_used);
        }

        // The new slot array and store directory occupy byte ranges that
        // overlap the old (smaller-capacity) slot array and store directory
        // plus whatever arena bytes used to sit past them; `set_len` carries
        // that old content forward verbatim rather than zeroing it. Wipe the
        // whole region before replaying inserts so every slot/directory word
        // starts out as a genuine `Empty` sentinel, not a stale byte pattern
        // misread as an `Occupied` entry.
        {
            let bytes = self.backing.bytes_mut().expect("just mapped read-write");
            let start = layout::slot_array_offset() as usize;
            let end = layout::arena_offset(new_capacity) as usize;
            bytes[start..end].fill(0);
        }

        let shape = self.shape;
        let bytes = self.backing.bytes_mut().expect("just mapped read-write");
        let (mut slots, mut dir, mut arena) = split_regions_mut(bytes, new_capacity, shape);
        for (ord, (key, data)) in live.iter().enumerate() {
            let ord = ord as u64;
            arena.write_record(ord, key, data);
            let hash = self.hasher.hash_key(key);
            let probe = {
                let arena_ref = arena.as_ref();
                slots.probe_for_insert(hash, |cand| arena_ref.key_matches(cand, key))
            };
            let slot_idx = match probe {
                InsertProbe::Vacant { slot } => slot,
                _ => {
                    // The new mapping is already live and only partially rebuilt at
                    // this point; there is no consistent state left to roll back to.
                    self.poisoned = true;
                    return Err(TableError::corruption(
                        "rehash: a freshly rebuilt slot array must only ever report Vacant",
                    ));
                }
            };
            slots.write(slot_idx, Slot::Occupied(ord));
            dir.set_slot(ord, slot_idx);
        }

        let old_capacity = self.capacity;
        self.capacity = new_capacity;
        self.slots_used = new_slots_used;
        log::debug!(
            target: "diskhash::table",
            "{}: rehashed {} -> {} (slots_used {} -> {}, size {})",
            self.path.display(), old_capacity, new_capacity, live.len(), new_slots_used, self.size,
        );
        Ok(())
    }

    /// Copy the whole mapped file into an anonymous in-memory buffer, so
    /// subsequent reads avoid page faults against the backing file. Only
    /// permitted once, and only on a read-only handle; a later
    /// `load_to_memory` call on an already-loaded handle is rejected but
    /// leaves the handle otherwise usable.
    pub fn load_to_memory(&mut self) -> Result<()> {
        if self.poisoned {
            return Err(TableError::impossible_operation("handle is poisoned"));
        }
        if self.access_mode != AccessMode::ReadOnly {
            return Err(TableError::impossible_operation("load_to_memory requires a read-only handle"));
        }
        if self.loaded_to_memory {
            return Err(TableError::impossible_operation("load_to_memory was already performed on this handle"));
        }
        let buf = match &self.backing {
            Backing::ReadOnly(mmap) => mmap.to_vec(),
            _ => return Err(TableError::impossible_operation("handle is not a file-mapped read-only handle")),
        };
        log::debug!(target: "diskhash::table", "{}: loaded {} bytes into memory", self.path.display(), buf.len());
        self.backing = Backing::InMemory(buf);
        self.loaded_to_memory = true;
        Ok(())
    }

    /// Release the handle: flush any dirty pages, unmap, truncate the file
    /// down to its exact logical size, then drop the file descriptor. Taking
    /// `self` by value means a second `free()` call is a compile error
    /// rather than a runtime one.
    pub fn free(mut self) -> Result<()> {
        if let Backing::ReadWrite(mmap) = &self.backing {
            os::sync_mut(mmap)?;
        }
        let exact_len = if self.access_mode == AccessMode::ReadWrite {
            Some(layout::file_len(self.capacity, self.slots_used, self.key_maxlen, self.object_datalen))
        } else {
            None
        };
        // The arena is kept pre-allocated to `capacity` while the handle is
        // open so fresh-append inserts never need to extend the file
        // mid-operation; drop the mapping before truncating (required on
        // platforms that refuse to shrink a file under a live mapping) so the
        // persisted file matches the slots_used-sized arena this format
        // describes.
        self.backing = Backing::InMemory(Vec::new());
        if let Some(exact_len) = exact_len {
            os::truncate(&self.file, exact_len)?;
        }
        log::debug!(target: "diskhash::table", "{}: closed", self.path.display());
        Ok(())
    }
}

/// Reconcile an opened file's header against caller-supplied `options`,
/// returning `(key_maxlen, object_datalen, capacity, size, slots_used)`.
fn reconcile_header(bytes: &[u8], options: &Options) -> Result<(u64, u64, u64, u64, u64)> {
    let view = layout::HeaderView::new(bytes);
    view.check_magic_and_version()?;
    let key_maxlen = view.key_maxlen();
    let object_datalen = view.object_datalen();
    if options.key_maxlen != 0 && options.key_maxlen != key_maxlen {
        return Err(TableError::invalid_argument(format!(
            "key_maxlen {} does not match the file's header ({})",
            options.key_maxlen, key_maxlen
        )));
    }
    if options.object_datalen != 0 && options.object_datalen != object_datalen {
        return Err(TableError::invalid_argument(format!(
            "object_datalen {} does not match the file's header ({})",
            options.object_datalen, object_datalen
        )));
    }
    Ok((key_maxlen, object_datalen, view.capacity(), view.size(), view.slots_used()))
}

/// Iterator over all live records, in insertion order, built on
/// [`Table::indexed_lookup`].
pub struct Iter<'a> {
    table: &'a Table,
    next: u64,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.table.slots_used {
            let ord = self.next;
            self.next += 1;
            if let Ok(pair) = self.table.indexed_lookup(ord) {
                return Some(pair);
            }
        }
        None
    }
}
