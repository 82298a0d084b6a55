use alloc::vec::Vec;
use core::fmt::Debug;
use core::sync::atomic::AtomicU64;
use core::sync::atomic::Ordering;

use crate::error::TableError;

/// Source of backing-array generations. Shared by every table in the
/// process so a cursor issued by one array never matches another.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

#[inline]
fn fresh_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Capacity of a freshly built table.
const INITIAL_CAPACITY: usize = 8;

/// Every growth multiplies the capacity by this factor.
const GROWTH_FACTOR: usize = 4;

/// Maximum number of occupied slots before the next new key forces a growth:
/// `floor(0.7 * capacity)`.
#[inline(always)]
fn fill_threshold(capacity: usize) -> usize {
    ((capacity as u128 * 7) / 10) as usize
}

/// Capacity the table grows to from `capacity`.
fn next_capacity(capacity: usize) -> Result<usize, TableError> {
    if capacity == 0 {
        return Ok(INITIAL_CAPACITY);
    }

    capacity
        .checked_mul(GROWTH_FACTOR)
        // One extra slot is always allocated for the end sentinel.
        .filter(|c| c.checked_add(1).is_some())
        .ok_or(TableError::CapacityOverflow { capacity })
}

/// Allocates `capacity` empty slots plus the end sentinel. Allocation
/// failures are reported as overflow of `reported_capacity`.
fn allocate_slots<K, V>(
    capacity: usize,
    reported_capacity: usize,
) -> Result<Vec<Slot<K, V>>, TableError> {
    let overflow = TableError::CapacityOverflow {
        capacity: reported_capacity,
    };
    let total = capacity.checked_add(1).ok_or(overflow.clone())?;

    let mut slots = Vec::new();
    slots.try_reserve_exact(total).map_err(|_| overflow)?;
    slots.resize_with(capacity, Slot::empty);
    slots.push(Slot::end());
    Ok(slots)
}

/// Occupancy tag of a [`Slot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotState {
    /// Never held an entry since the last growth. Ends every probe.
    Empty,
    /// Holds a live key/value pair.
    Occupied,
    /// Held an entry that was erased. Probes walk past it; insertions may
    /// reuse it.
    Tombstone,
    /// The sentinel one past the last real slot.
    End,
}

#[derive(Clone)]
enum Contents<K, V> {
    Empty,
    Occupied { key: K, value: V },
    Tombstone,
    End,
}

/// A single storage cell of the table.
///
/// The cached hash is only meaningful for occupied and tombstoned slots.
/// The stamp identifies the entry currently stored in the slot; it is zero
/// for free slots and the end sentinel.
#[derive(Clone)]
pub struct Slot<K, V> {
    hash: u32,
    stamp: u64,
    contents: Contents<K, V>,
}

impl<K, V> Slot<K, V> {
    #[inline(always)]
    fn empty() -> Self {
        Slot {
            hash: 0,
            stamp: 0,
            contents: Contents::Empty,
        }
    }

    #[inline(always)]
    fn end() -> Self {
        Slot {
            hash: 0,
            stamp: 0,
            contents: Contents::End,
        }
    }

    /// Returns the occupancy tag of this slot.
    #[inline]
    pub fn state(&self) -> SlotState {
        match self.contents {
            Contents::Empty => SlotState::Empty,
            Contents::Occupied { .. } => SlotState::Occupied,
            Contents::Tombstone => SlotState::Tombstone,
            Contents::End => SlotState::End,
        }
    }

    /// Returns the cached hash for occupied and tombstoned slots.
    #[inline]
    pub fn cached_hash(&self) -> Option<u32> {
        match self.contents {
            Contents::Occupied { .. } | Contents::Tombstone => Some(self.hash),
            Contents::Empty | Contents::End => None,
        }
    }

    /// Returns the key stored in an occupied slot.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        match &self.contents {
            Contents::Occupied { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Returns the value stored in an occupied slot.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match &self.contents {
            Contents::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline(always)]
    fn is_occupied(&self) -> bool {
        matches!(self.contents, Contents::Occupied { .. })
    }

    #[inline(always)]
    fn pair(&self) -> Option<(&K, &V)> {
        match &self.contents {
            Contents::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }

    #[inline(always)]
    fn pair_mut(&mut self) -> Option<(&K, &mut V)> {
        match &mut self.contents {
            Contents::Occupied { key, value } => Some((&*key, value)),
            _ => None,
        }
    }
}

/// A position inside a table's slot array.
///
/// Cursors are plain positions: they do not borrow the table, so they can be
/// kept across calls and handed back to [`HashTable::erase_at`]. A cursor
/// remembers which backing array it was issued for and which entry sat in
/// its slot. It is rejected with [`TableError::InvalidCursor`] after a
/// growth, by any other table (clones included), and once its entry has
/// been erased, even if a later insertion reuses the slot.
///
/// Two cursors are equal when they designate the same entry in the same slot
/// of the same backing array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    index: usize,
    generation: u64,
    stamp: u64,
}

impl Cursor {
    /// Slot index the cursor designates. The end cursor's index equals the
    /// table capacity.
    pub fn index(&self) -> usize {
        self.index
    }
}

enum Probe {
    Found(usize),
    Vacant(usize),
}

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries.
    pub populated: usize,
    /// Number of slots, excluding the end sentinel.
    pub capacity: usize,
    /// Entry count that triggers the next growth.
    pub fill_threshold: usize,
    /// Number of tombstoned slots.
    pub tombstones: usize,
    /// Number of never-used slots.
    pub empty_slots: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Longest distance of an entry from its home slot.
    pub max_probe: usize,
    /// Mean distance of entries from their home slot.
    pub mean_probe: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor, threshold {})",
            self.populated,
            self.capacity,
            self.load_factor * 100.0,
            self.fill_threshold
        );
        println!(
            "Slots: {} empty, {} tombstones",
            self.empty_slots,
            self.tombstones
        );
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_probe,
            self.mean_probe
        );
    }
}

/// An open-addressing hash table with linear probing.
///
/// `HashTable<K, V>` stores key/value pairs in one contiguous slot array.
/// Like a raw table it does not hash keys itself: every operation takes the
/// 32-bit hash of the key and an equality predicate. [`HashMap`] layers key
/// hashing on top.
///
/// - Capacity starts at 8 slots and is multiplied by 4 whenever a new key
///   arrives while `len() >= floor(0.7 * capacity)`.
/// - Erased entries leave a tombstone that keeps probe chains intact until
///   the next growth drops it.
/// - One extra sentinel slot marks the end of storage for cursors.
///
/// [`HashMap`]: crate::HashMap
///
/// ## Example
///
/// ```rust
/// use lin_hash::HashStrategy;
/// use lin_hash::hash_table::HashTable;
///
/// let mut table = HashTable::new();
/// let hash = HashStrategy::Djb2.hash(b"alice");
///
/// table.entry(hash, |k: &&str| *k == "alice").or_insert("alice", 30);
/// assert_eq!(table.get(hash, |k| *k == "alice"), Some((&"alice", &30)));
/// ```
pub struct HashTable<K, V> {
    slots: Vec<Slot<K, V>>,
    capacity: usize,

    populated: usize,
    max_pop: usize,
    tombstones: usize,

    generation: u64,
    last_stamp: u64,
}

impl<K: Clone, V: Clone> Clone for HashTable<K, V> {
    /// The clone gets its own generation, so cursors issued by `self` are
    /// rejected by the clone and the other way around.
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            capacity: self.capacity,
            populated: self.populated,
            max_pop: self.max_pop,
            tombstones: self.tombstones,
            generation: fresh_generation(),
            last_stamp: self.last_stamp,
        }
    }
}

impl<K, V> Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self.slots[..self.capacity]
                    .chunks(16)
                    .map(|w| {
                        let mut row = String::new();
                        for slot in w {
                            match slot.contents {
                                Contents::Empty => row.push_str(".. "),
                                Contents::Tombstone => row.push_str("xx "),
                                Contents::Occupied { .. } => {
                                    row.push_str(&format!("{:02x} ", slot.hash as u8))
                                }
                                Contents::End => row.push_str("$$ "),
                            }
                        }
                        row.truncate(row.trim_end().len());
                        row
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity)
            .field("fill_threshold", &self.max_pop)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty table with the initial capacity of 8 slots.
    pub fn new() -> Self {
        Self::with_slots(INITIAL_CAPACITY)
    }

    /// Creates an empty table that can hold at least `capacity` entries
    /// before it has to grow.
    ///
    /// The slot count is the smallest `8 * 4^k` whose fill threshold covers
    /// `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if the required slot count overflows `usize` or cannot be
    /// allocated; see [`try_with_capacity`].
    ///
    /// [`try_with_capacity`]: HashTable::try_with_capacity
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u32, u32> = HashTable::with_capacity(100);
    /// assert!(table.fill_threshold() >= 100);
    /// assert_eq!(table.capacity(), 512);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(table) => table,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`with_capacity`], reporting [`TableError::CapacityOverflow`]
    /// instead of panicking.
    ///
    /// [`with_capacity`]: HashTable::with_capacity
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::TableError;
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let table = HashTable::<u8, u8>::try_with_capacity(usize::MAX);
    /// assert!(matches!(table, Err(TableError::CapacityOverflow { .. })));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        let mut slots = INITIAL_CAPACITY;
        while fill_threshold(slots) < capacity {
            slots = next_capacity(slots)?;
        }
        Ok(Self::from_slots(allocate_slots(slots, slots)?))
    }

    fn with_slots(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.resize_with(capacity, Slot::empty);
        slots.push(Slot::end());
        Self::from_slots(slots)
    }

    fn from_slots(slots: Vec<Slot<K, V>>) -> Self {
        let capacity = slots.len() - 1;
        Self {
            slots,
            capacity,
            populated: 0,
            max_pop: fill_threshold(capacity),
            tombstones: 0,
            generation: fresh_generation(),
            last_stamp: 0,
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots, not counting the end sentinel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of entries the table holds before the next new key
    /// makes it grow.
    pub fn fill_threshold(&self) -> usize {
        self.max_pop
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the slot array, without the end sentinel.
    pub fn slots(&self) -> &[Slot<K, V>] {
        &self.slots[..self.capacity]
    }

    /// Removes all entries and tombstones, keeping the capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.slots[..self.capacity] {
            *slot = Slot::empty();
        }
        self.populated = 0;
        self.tombstones = 0;
    }

    #[inline(always)]
    fn mask(&self) -> usize {
        // Capacities are powers of two, so masking is `hash mod capacity`.
        self.capacity - 1
    }

    /// Walks the probe chain of `hash` until an empty slot, looking for an
    /// entry accepted by `eq`. Remembers the first free slot on the way.
    fn probe(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Result<Probe, TableError> {
        let mask = self.mask();
        let mut index = hash as usize & mask;
        let mut first_free = None;

        for _ in 0..self.capacity {
            let slot = &self.slots[index];
            match &slot.contents {
                Contents::Empty => return Ok(Probe::Vacant(first_free.unwrap_or(index))),
                Contents::Tombstone => {
                    if first_free.is_none() {
                        first_free = Some(index);
                    }
                }
                Contents::Occupied { key, .. } => {
                    if slot.hash == hash && eq(key) {
                        return Ok(Probe::Found(index));
                    }
                }
                Contents::End => unreachable!("end sentinel inside the probe range"),
            }
            index = (index + 1) & mask;
        }

        log::trace!(
            "probe for hash {hash:#010x} wrapped around {} slots",
            self.capacity
        );
        match first_free {
            Some(index) => Ok(Probe::Vacant(index)),
            None => Err(self.probe_exhausted()),
        }
    }

    /// Finds the first empty slot on the probe chain of `hash`.
    fn vacant_index(&self, hash: u32) -> Result<usize, TableError> {
        let mask = self.mask();
        let mut index = hash as usize & mask;
        for _ in 0..self.capacity {
            if let Contents::Empty = self.slots[index].contents {
                return Ok(index);
            }
            index = (index + 1) & mask;
        }
        Err(self.probe_exhausted())
    }

    #[cold]
    fn probe_exhausted(&self) -> TableError {
        log::error!(
            "probe visited all {} slots without a free one ({} occupied, {} tombstones, threshold {})",
            self.capacity,
            self.populated,
            self.tombstones,
            self.max_pop
        );
        TableError::ProbeExhausted {
            capacity: self.capacity,
            occupied: self.populated,
        }
    }

    fn find_index(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<usize> {
        if self.populated == 0 {
            return None;
        }
        match self.probe(hash, eq) {
            Ok(Probe::Found(index)) => Some(index),
            // A probe that saw every slot without a match proves absence.
            Ok(Probe::Vacant(_)) | Err(_) => None,
        }
    }

    /// Returns a cursor to the entry accepted by `eq`, or [`end`] if there
    /// is none.
    ///
    /// [`end`]: HashTable::end
    pub fn find(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Cursor {
        match self.find_index(hash, eq) {
            Some(index) => self.cursor(index),
            None => self.end(),
        }
    }

    /// Returns the entry accepted by `eq`.
    pub fn get(&self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].pair()
    }

    /// Returns the entry accepted by `eq` with a mutable value.
    pub fn get_mut(&mut self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].pair_mut()
    }

    /// Gets the entry for `hash`/`eq`, growing the table first if the key is
    /// new and the table is at its fill threshold.
    ///
    /// # Panics
    ///
    /// Panics with the message of the [`TableError`] that [`try_entry`]
    /// would have returned.
    ///
    /// [`try_entry`]: HashTable::try_entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::hash_table::Entry;
    /// # use lin_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(17, |k: &u32| *k == 17) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert(17, "seventeen");
    ///     }
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "updated";
    ///     }
    /// }
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn entry(&mut self, hash: u32, eq: impl Fn(&K) -> bool) -> Entry<'_, K, V> {
        match self.try_entry(hash, eq) {
            Ok(entry) => entry,
            Err(err) => panic!("{err}"),
        }
    }

    /// Gets the entry for `hash`/`eq`, reporting growth and probing failures.
    ///
    /// On error the table is left unchanged.
    pub fn try_entry(
        &mut self,
        hash: u32,
        eq: impl Fn(&K) -> bool,
    ) -> Result<Entry<'_, K, V>, TableError> {
        let index = match self.probe(hash, &eq)? {
            Probe::Found(index) => {
                return Ok(Entry::Occupied(OccupiedEntry { table: self, index }));
            }
            Probe::Vacant(index) if self.populated < self.max_pop => index,
            Probe::Vacant(_) => {
                self.try_grow()?;
                self.vacant_index(hash)?
            }
        };

        Ok(Entry::Vacant(VacantEntry {
            table: self,
            hash,
            index,
        }))
    }

    /// Removes the entry accepted by `eq`, leaving a tombstone in its slot.
    pub fn remove(&mut self, hash: u32, eq: impl Fn(&K) -> bool) -> Option<(K, V)> {
        let index = self.find_index(hash, eq)?;
        self.release(index)
    }

    fn occupy(&mut self, index: usize, hash: u32, key: K, value: V) -> &mut V {
        let slot = &mut self.slots[index];
        debug_assert!(matches!(
            slot.contents,
            Contents::Empty | Contents::Tombstone
        ));
        if let Contents::Tombstone = slot.contents {
            self.tombstones -= 1;
        }
        self.populated += 1;
        self.last_stamp += 1;

        slot.hash = hash;
        slot.stamp = self.last_stamp;
        slot.contents = Contents::Occupied { key, value };
        match &mut slot.contents {
            Contents::Occupied { value, .. } => value,
            _ => unreachable!(),
        }
    }

    fn release(&mut self, index: usize) -> Option<(K, V)> {
        let slot = &mut self.slots[index];
        if !slot.is_occupied() {
            return None;
        }

        self.populated -= 1;
        self.tombstones += 1;
        slot.stamp = 0;
        match core::mem::replace(&mut slot.contents, Contents::Tombstone) {
            Contents::Occupied { key, value } => Some((key, value)),
            _ => None,
        }
    }

    /// Replaces the slot array with one four times larger, moving every live
    /// entry by its cached hash and dropping all tombstones.
    fn try_grow(&mut self) -> Result<(), TableError> {
        let new_capacity = next_capacity(self.capacity)?;
        let slots = allocate_slots(new_capacity, self.capacity)?;

        let old_slots = core::mem::replace(&mut self.slots, slots);
        let old_capacity = core::mem::replace(&mut self.capacity, new_capacity);
        let dropped = core::mem::take(&mut self.tombstones);
        self.max_pop = fill_threshold(new_capacity);
        self.generation = fresh_generation();

        let mask = self.mask();
        for slot in old_slots {
            if let Contents::Occupied { key, value } = slot.contents {
                let mut index = slot.hash as usize & mask;
                while !matches!(self.slots[index].contents, Contents::Empty) {
                    index = (index + 1) & mask;
                }
                self.slots[index] = Slot {
                    hash: slot.hash,
                    stamp: slot.stamp,
                    contents: Contents::Occupied { key, value },
                };
            }
        }

        log::debug!(
            "grew from {old_capacity} to {new_capacity} slots: {} entries moved, {dropped} tombstones dropped",
            self.populated
        );
        Ok(())
    }

    #[inline(always)]
    fn cursor(&self, index: usize) -> Cursor {
        Cursor {
            index,
            generation: self.generation,
            stamp: self.slots[index].stamp,
        }
    }

    fn invalid_cursor(cursor: Cursor) -> TableError {
        TableError::InvalidCursor {
            index: cursor.index,
            generation: cursor.generation,
        }
    }

    /// Returns the slot index of a cursor that designates a live entry.
    fn live_index(&self, cursor: Cursor) -> Result<usize, TableError> {
        if cursor.generation == self.generation
            && cursor.index < self.capacity
            && self.slots[cursor.index].is_occupied()
            && self.slots[cursor.index].stamp == cursor.stamp
        {
            Ok(cursor.index)
        } else {
            Err(Self::invalid_cursor(cursor))
        }
    }

    /// Returns a cursor to the first live entry, or [`end`] if the table is
    /// empty.
    ///
    /// [`end`]: HashTable::end
    pub fn begin(&self) -> Cursor {
        let index = self.slots[..self.capacity]
            .iter()
            .position(Slot::is_occupied)
            .unwrap_or(self.capacity);
        self.cursor(index)
    }

    /// Returns the cursor of the end sentinel.
    pub fn end(&self) -> Cursor {
        self.cursor(self.capacity)
    }

    /// Moves `cursor` to the next live entry, or to [`end`] when there is
    /// none. The end cursor and stale cursors advance to [`end`].
    ///
    /// [`end`]: HashTable::end
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        if cursor.generation != self.generation || cursor.index >= self.capacity {
            return self.end();
        }

        let mut index = cursor.index + 1;
        while !matches!(
            self.slots[index].contents,
            Contents::Occupied { .. } | Contents::End
        ) {
            index += 1;
        }
        self.cursor(index)
    }

    /// Returns the entry a cursor designates.
    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V), TableError> {
        let index = self.live_index(cursor)?;
        self.slots[index]
            .pair()
            .ok_or(Self::invalid_cursor(cursor))
    }

    /// Returns the entry a cursor designates with a mutable value.
    pub fn entry_at_mut(&mut self, cursor: Cursor) -> Result<(&K, &mut V), TableError> {
        let index = self.live_index(cursor)?;
        self.slots[index]
            .pair_mut()
            .ok_or(Self::invalid_cursor(cursor))
    }

    /// Erases the entry a cursor designates, leaving a tombstone.
    ///
    /// Fails with [`TableError::InvalidCursor`] for the end cursor, for
    /// cursors issued before the last growth, and for entries that were
    /// already erased.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<(K, V), TableError> {
        let index = self.live_index(cursor)?;
        self.release(index).ok_or(Self::invalid_cursor(cursor))
    }

    /// Returns an iterator over all entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots[..self.capacity].iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over all entries in slot order, with mutable
    /// values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            slots: self.slots[..self.capacity].iter_mut(),
            remaining: self.populated,
        }
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Bin `d` counts the entries that sit `d` slots after their home slot
    /// (`hash mod capacity`).
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        let mask = self.mask();
        for (index, slot) in self.slots[..self.capacity].iter().enumerate() {
            if slot.is_occupied() {
                let distance = index.wrapping_sub(slot.hash as usize) & mask;
                if hist.len() <= distance {
                    hist.resize(distance + 1, 0);
                }
                hist[distance] += 1;
            }
        }
        hist
    }

    /// Returns occupancy and probe-length statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let hist = self.probe_histogram();
        let total_distance: usize = hist.iter().enumerate().map(|(d, n)| d * n).sum();

        DebugStats {
            populated: self.populated,
            capacity: self.capacity,
            fill_threshold: self.max_pop,
            tombstones: self.tombstones,
            empty_slots: self.capacity - self.populated - self.tombstones,
            load_factor: self.populated as f64 / self.capacity as f64,
            max_probe: hist.len().saturating_sub(1),
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_distance as f64 / self.populated as f64
            },
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry - the key is not present in the table
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry - the key is present in the table
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `key` and `value` if the entry is vacant and returns a mutable
    /// reference to the value in the table.
    pub fn or_insert(self, key: K, value: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(key, value),
        }
    }

    /// Like [`or_insert`](Entry::or_insert), building the pair lazily.
    pub fn or_insert_with(self, default: impl FnOnce() -> (K, V)) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (key, value) = default();
                entry.insert(key, value)
            }
        }
    }
}

/// A view into a vacant slot chosen for a new key.
pub struct VacantEntry<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    hash: u32,
    index: usize,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Stores `key` and `value` in the chosen slot.
    ///
    /// The caller guarantees that `key` is the key the entry was looked up
    /// with; otherwise later lookups will not find it.
    pub fn insert(self, key: K, value: V) -> &'a mut V {
        self.table.occupy(self.index, self.hash, key, value)
    }
}

/// A view into an occupied slot.
pub struct OccupiedEntry<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    index: usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    fn pair(&self) -> (&K, &V) {
        match &self.table.slots[self.index].contents {
            Contents::Occupied { key, value } => (key, value),
            _ => unreachable!("occupied entry over a free slot"),
        }
    }

    /// Returns the stored key.
    pub fn key(&self) -> &K {
        self.pair().0
    }

    /// Returns the stored value.
    pub fn get(&self) -> &V {
        self.pair().1
    }

    /// Returns the stored value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        match &mut self.table.slots[self.index].contents {
            Contents::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry over a free slot"),
        }
    }

    /// Converts the entry into a mutable reference bound to the table.
    pub fn into_mut(self) -> &'a mut V {
        match &mut self.table.slots[self.index].contents {
            Contents::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry over a free slot"),
        }
    }

    /// Replaces the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Returns a cursor to this entry.
    pub fn cursor(&self) -> Cursor {
        self.table.cursor(self.index)
    }

    /// Erases the entry, leaving a tombstone, and returns the pair.
    pub fn remove(self) -> (K, V) {
        match self.table.release(self.index) {
            Some(pair) => pair,
            None => unreachable!("occupied entry over a free slot"),
        }
    }
}

/// An iterator over the entries of a [`HashTable`], in slot order.
pub struct Iter<'a, K, V> {
    slots: core::slice::Iter<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pair = self.slots.by_ref().find_map(Slot::pair)?;
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

/// A mutable-value iterator over the entries of a [`HashTable`].
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pair = self.slots.by_ref().find_map(Slot::pair_mut)?;
        self.remaining -= 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
