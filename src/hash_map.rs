use core::borrow::Borrow;
use core::fmt::Debug;
use core::ops::Index;

use crate::error::TableError;
use crate::hash_table::Cursor;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hash_table::Iter;
use crate::hash_table::IterMut;
use crate::hash_table::OccupiedEntry as TableOccupiedEntry;
use crate::hash_table::VacantEntry as TableVacantEntry;
use crate::key::TableKey;
use crate::strategy::HashStrategy;

/// A hash map built on the linear-probing [`HashTable`].
///
/// `HashMap<K, V>` hashes keys through their [`TableKey`] implementation
/// with the map's [`HashStrategy`] and keeps them in a single slot array.
///
/// # Examples
///
/// ```rust
/// use lin_hash::HashMap;
///
/// let mut counts: HashMap<String, u32> = HashMap::new();
/// for word in ["to", "be", "or", "not", "to", "be"] {
///     *counts.get_mut(word.to_string()) += 1;
/// }
///
/// assert_eq!(counts.get("to"), Ok(&2));
/// assert_eq!(counts.size(), 4);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V> {
    table: HashTable<K, V>,
    strategy: HashStrategy,
}

impl<K, V> Debug for HashMap<K, V>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map with the default strategy and initial capacity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// #
    /// let map: HashMap<String, i32> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 8);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity_and_strategy(0, HashStrategy::default())
    }

    /// Creates an empty map that holds at least `capacity` entries before
    /// growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_strategy(capacity, HashStrategy::default())
    }

    /// Creates an empty map probing with `strategy`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// # use lin_hash::HashStrategy;
    /// #
    /// let mut map = HashMap::with_strategy(HashStrategy::Sdbm);
    /// map.insert("k", 1);
    /// assert_eq!(map.hash_strategy().name(), "sdbm");
    /// ```
    pub fn with_strategy(strategy: HashStrategy) -> Self {
        Self::with_capacity_and_strategy(0, strategy)
    }

    /// Creates an empty map with room for `capacity` entries, probing with
    /// `strategy`.
    pub fn with_capacity_and_strategy(capacity: usize, strategy: HashStrategy) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            strategy,
        }
    }

    /// Like [`with_capacity`], reporting [`TableError::CapacityOverflow`]
    /// instead of panicking when the slot array cannot be sized or allocated.
    ///
    /// [`with_capacity`]: HashMap::with_capacity
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_strategy(capacity, HashStrategy::default())
    }

    /// Fallible form of [`with_capacity_and_strategy`].
    ///
    /// [`with_capacity_and_strategy`]: HashMap::with_capacity_and_strategy
    pub fn try_with_capacity_and_strategy(
        capacity: usize,
        strategy: HashStrategy,
    ) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::try_with_capacity(capacity)?,
            strategy,
        })
    }

    /// Returns the strategy used to hash keys.
    pub fn hash_strategy(&self) -> HashStrategy {
        self.strategy
    }

    /// Replaces the strategy used to hash keys.
    ///
    /// Entries already in the map are **not** rehashed. Their slots were
    /// chosen by the old strategy, so lookups of those keys through the new
    /// one will usually miss them, and inserting them again will store
    /// duplicates. This is intended for comparing strategies on an empty map.
    pub fn set_hash_strategy(&mut self, strategy: HashStrategy) {
        if !self.is_empty() {
            log::warn!(
                "switching hash strategy from {} to {} with {} live entries; they will not be rehashed",
                self.strategy.name(),
                strategy.name(),
                self.len()
            );
        }
        self.strategy = strategy;
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of entries in the map. Same as [`len`].
    ///
    /// [`len`]: HashMap::len
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the entry count at which the next new key makes the map grow.
    pub fn fill_threshold(&self) -> usize {
        self.table.fill_threshold()
    }

    /// Removes all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Returns a cursor to the first entry, or [`end`] if the map is empty.
    ///
    /// [`end`]: HashMap::end
    pub fn begin(&self) -> Cursor {
        self.table.begin()
    }

    /// Returns the end cursor.
    pub fn end(&self) -> Cursor {
        self.table.end()
    }

    /// Moves `cursor` to the next entry, or to [`end`].
    ///
    /// [`end`]: HashMap::end
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        self.table.advance(cursor)
    }

    /// Returns the entry a cursor designates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("one", 1);
    /// map.insert("two", 2);
    ///
    /// let mut sum = 0;
    /// let mut cursor = map.begin();
    /// while cursor != map.end() {
    ///     sum += map.entry_at(cursor).unwrap().1;
    ///     cursor = map.advance(cursor);
    /// }
    /// assert_eq!(sum, 3);
    /// ```
    pub fn entry_at(&self, cursor: Cursor) -> Result<(&K, &V), TableError> {
        self.table.entry_at(cursor)
    }

    /// Returns the entry a cursor designates with a mutable value.
    pub fn entry_at_mut(&mut self, cursor: Cursor) -> Result<(&K, &mut V), TableError> {
        self.table.entry_at_mut(cursor)
    }

    /// Erases the entry a cursor designates.
    pub fn erase_at(&mut self, cursor: Cursor) -> Result<(), TableError> {
        self.table.erase_at(cursor).map(|_| ())
    }

    /// Returns an iterator over all entries.
    ///
    /// The order is the slot order: arbitrary, but stable while the map is
    /// not modified.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Returns an iterator over all entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over mutable values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &HashTable<K, V> {
        &self.table
    }
}

impl<K, V> HashMap<K, V>
where
    K: TableKey,
{
    #[inline]
    fn hash<Q>(&self, key: &Q) -> u32
    where
        Q: TableKey + ?Sized,
    {
        key.table_hash(self.strategy)
    }

    /// Returns a cursor to the entry for `key`, or [`end`] if it is absent.
    ///
    /// [`end`]: HashMap::end
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.table.find(self.hash(key), |k| key.eq(k.borrow()))
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.get(key).is_ok()
    }

    /// Returns the value for `key`, or [`TableError::NotFound`]. Never
    /// inserts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// # use lin_hash::TableError;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("abc".to_string(), 123);
    ///
    /// assert_eq!(map.get("abc"), Ok(&123));
    /// assert_eq!(map.get("xyz"), Err(TableError::NotFound));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<&V, TableError>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.table
            .get(self.hash(key), |k| key.eq(k.borrow()))
            .map(|(_, v)| v)
            .ok_or(TableError::NotFound)
    }

    /// Returns the value for `key`, or `default` if it is absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.table.get(self.hash(key), |k| key.eq(k.borrow()))
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// # Panics
    ///
    /// Panics if growing the map fails; see [`try_get_mut`].
    ///
    /// [`try_get_mut`]: HashMap::try_get_mut
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// #
    /// let mut map: HashMap<&str, i32> = HashMap::new();
    /// *map.get_mut("abc") = 123;
    /// *map.get_mut("abc") += 1;
    /// assert_eq!(map.get("abc"), Ok(&124));
    /// ```
    pub fn get_mut(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Like [`get_mut`], reporting growth failures instead of panicking.
    ///
    /// [`get_mut`]: HashMap::get_mut
    pub fn try_get_mut(&mut self, key: K) -> Result<&mut V, TableError>
    where
        V: Default,
    {
        Ok(self.try_entry(key)?.or_default())
    }

    /// Inserts `value` for `key`, returning the previous value if the key
    /// was present. An existing key keeps its slot and its stored key.
    ///
    /// # Panics
    ///
    /// Panics if growing the map fails; see [`try_insert`].
    ///
    /// [`try_insert`]: HashMap::try_insert
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.entry(key) {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Like [`insert`], reporting growth failures instead of panicking.
    ///
    /// [`insert`]: HashMap::insert
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        Ok(match self.try_entry(key)? {
            Entry::Occupied(mut entry) => Some(entry.insert(value)),
            Entry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        })
    }

    /// Erases the entry for `key`, or reports [`TableError::NotFound`].
    ///
    /// The slot becomes a tombstone until the next growth.
    pub fn erase<Q>(&mut self, key: &Q) -> Result<(), TableError>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.remove_entry(key)
            .map(|_| ())
            .ok_or(TableError::NotFound)
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes the entry for `key` and returns the stored pair.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: TableKey + ?Sized,
    {
        let hash = self.hash(key);
        self.table.remove(hash, |k| key.eq(k.borrow()))
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Panics
    ///
    /// Panics if growing the map fails; see [`try_entry`].
    ///
    /// [`try_entry`]: HashMap::try_entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lin_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.entry("apple").or_insert(0);
    /// *map.entry("apple").or_insert(0) += 5;
    /// assert_eq!(map.get("apple"), Ok(&5));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.try_entry(key) {
            Ok(entry) => entry,
            Err(err) => panic!("{err}"),
        }
    }

    /// Gets the entry for `key`, growing the map first if the key is new
    /// and the map is at its fill threshold.
    pub fn try_entry(&mut self, key: K) -> Result<Entry<'_, K, V>, TableError> {
        let hash = self.hash(&key);
        Ok(match self.table.try_entry(hash, |k| *k == key)? {
            TableEntry::Occupied(inner) => Entry::Occupied(OccupiedEntry { inner }),
            TableEntry::Vacant(inner) => Entry::Vacant(VacantEntry { inner, key }),
        })
    }

    /// Computes probe statistics for the current map state.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Computes a histogram of probe lengths for the current map state.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }
}

impl<K, V, Q> Index<&Q> for HashMap<K, V>
where
    K: TableKey + Borrow<Q>,
    Q: TableKey + ?Sized,
{
    type Output = V;

    /// Returns the value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is absent.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<K, V> Extend<(K, V)> for HashMap<K, V>
where
    K: TableKey,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashMap<K, V>
where
    K: TableKey,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = HashMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashMap<K, V> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns the key of this entry.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts `V::default()` if the entry is vacant.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry of a [`HashMap`].
pub struct VacantEntry<'a, K, V> {
    inner: TableVacantEntry<'a, K, V>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes back ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `value` under the entry's key.
    pub fn insert(self, value: V) -> &'a mut V {
        self.inner.insert(self.key, value)
    }
}

/// A view into an occupied entry of a [`HashMap`].
pub struct OccupiedEntry<'a, K, V> {
    inner: TableOccupiedEntry<'a, K, V>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        self.inner.key()
    }

    /// Returns the value.
    pub fn get(&self) -> &V {
        self.inner.get()
    }

    /// Returns the value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        self.inner.get_mut()
    }

    /// Converts the entry into a mutable reference bound to the map.
    pub fn into_mut(self) -> &'a mut V {
        self.inner.into_mut()
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        self.inner.insert(value)
    }

    /// Returns a cursor to this entry.
    pub fn cursor(&self) -> Cursor {
        self.inner.cursor()
    }

    /// Erases the entry and returns its value.
    pub fn remove(self) -> V {
        self.inner.remove().1
    }

    /// Erases the entry and returns the stored pair.
    pub fn remove_entry(self) -> (K, V) {
        self.inner.remove()
    }
}

/// An iterator over the keys of a [`HashMap`].
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the values of a [`HashMap`].
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over mutable values of a [`HashMap`].
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
