use core::fmt::Debug;
use core::fmt::Display;

use crate::error::TableError;
use crate::hash_table::DEFAULT_SIZE;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::key::KeyEq;
use crate::key::KeyHasher;
use crate::key::StdEq;

/// The result of [`HashMap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome<V> {
    /// The key was not present and a new entry was added.
    Inserted,
    /// The key was present. Its value was overwritten; the previous value is
    /// returned.
    Updated(V),
}

impl<V> InsertOutcome<V> {
    /// Returns `true` if a new entry was added.
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }

    /// Returns `true` if an existing entry was overwritten.
    pub fn is_updated(&self) -> bool {
        matches!(self, InsertOutcome::Updated(_))
    }

    /// Returns the overwritten value, if any.
    pub fn into_previous(self) -> Option<V> {
        match self {
            InsertOutcome::Inserted => None,
            InsertOutcome::Updated(previous) => Some(previous),
        }
    }
}

/// A hash map backed by the separate-chaining [`HashTable`].
///
/// `HashMap<K, V, S, E>` stores key-value pairs. Keys are hashed by the
/// [`KeyHasher`] `S` and compared by the [`KeyEq`] `E`. Any `BuildHasher` works
/// as `S` for keys implementing `Hash`, and `E` defaults to [`StdEq`], which
/// uses the key's `Eq`.
///
/// The map is not `Clone`; rebuild it from [`iter`](HashMap::iter) to copy it.
///
/// # Performance Characteristics
///
/// - **Memory**: one `u64` hash per entry plus the size of `(K, V)`, and one
///   chain header per bucket
/// - **Lookup**: one hash, then a scan of a single chain whose expected length
///   stays below one entry per bucket
pub struct HashMap<K, V, S, E = StdEq> {
    table: HashTable<(K, V)>,
    hash_builder: S,
    key_eq: E,
}

impl<K, V, S, E> Debug for HashMap<K, V, S, E>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMap<K, V, S, StdEq> {
    /// Creates a new hash map with the given hasher builder and
    /// [`DEFAULT_SIZE`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 11);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_hasher_and_eq(hash_builder, StdEq)
    }

    /// Creates a new hash map with at least `initial_size` buckets and the
    /// given hasher builder.
    ///
    /// The bucket count is rounded up to the next prime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_capacity_and_hasher(100, SimpleHasher);
    /// assert_eq!(map.capacity(), 101);
    /// ```
    pub fn with_capacity_and_hasher(initial_size: usize, hash_builder: S) -> Self {
        Self::with_capacity_hasher_and_eq(initial_size, hash_builder, StdEq)
    }

    /// Fallible version of
    /// [`with_capacity_and_hasher`](HashMap::with_capacity_and_hasher).
    pub fn try_with_capacity_and_hasher(
        initial_size: usize,
        hash_builder: S,
    ) -> Result<Self, TableError> {
        Self::try_with_capacity_hasher_and_eq(initial_size, hash_builder, StdEq)
    }
}

impl<K, V, S, E> HashMap<K, V, S, E> {
    /// Creates a new hash map with the given hash and equality capabilities
    /// and [`DEFAULT_SIZE`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    /// use chain_hash::key::EqFn;
    /// use chain_hash::key::HashFn;
    ///
    /// let mut map = HashMap::with_hasher_and_eq(
    ///     HashFn(|k: &String| k.to_ascii_lowercase().bytes().map(u64::from).sum::<u64>()),
    ///     EqFn(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
    /// );
    ///
    /// map.insert("Key".to_string(), 1);
    /// assert_eq!(map.get(&"KEY".to_string()), Some(&1));
    /// ```
    pub fn with_hasher_and_eq(hash_builder: S, key_eq: E) -> Self {
        Self::with_capacity_hasher_and_eq(DEFAULT_SIZE, hash_builder, key_eq)
    }

    /// Creates a new hash map with at least `initial_size` buckets and the
    /// given hash and equality capabilities.
    pub fn with_capacity_hasher_and_eq(initial_size: usize, hash_builder: S, key_eq: E) -> Self {
        Self {
            table: HashTable::with_capacity(initial_size),
            hash_builder,
            key_eq,
        }
    }

    /// Fallible version of
    /// [`with_capacity_hasher_and_eq`](HashMap::with_capacity_hasher_and_eq).
    pub fn try_with_capacity_hasher_and_eq(
        initial_size: usize,
        hash_builder: S,
        key_eq: E,
    ) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::try_with_capacity(initial_size)?,
            hash_builder,
            key_eq,
        })
    }

    /// Returns the map's hash capability.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the map's key equality capability.
    pub fn key_eq(&self) -> &E {
        &self.key_eq
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of buckets. Always prime.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Clears the map, removing all key-value pairs.
    ///
    /// The bucket count is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// let capacity = map.capacity();
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the map.
    ///
    /// The iterator yields `(&K, &V)` pairs in an arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns a [`Display`] view of the bucket layout.
    ///
    /// One line is written per bucket, listing the hash and value of every
    /// entry in its chain, most recently inserted first:
    ///
    /// ```text
    /// 0 :{ key=}
    /// 1 :{ key=12 ; b 1 ; a }
    /// ```
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::HashMap;
    /// use chain_hash::key::HashFn;
    ///
    /// let mut map = HashMap::with_capacity_hasher_and_eq(
    ///     3,
    ///     HashFn(|k: &u64| *k),
    ///     chain_hash::StdEq,
    /// );
    /// map.insert(1u64, "a");
    /// map.insert(4, "b");
    ///
    /// assert_eq!(
    ///     map.structure().to_string(),
    ///     "0 :{ key=}\n1 :{ key=4 ; b 1 ; a }\n2 :{ key=}\n"
    /// );
    /// ```
    pub fn structure(&self) -> Structure<'_, K, V>
    where
        V: Display,
    {
        Structure { table: &self.table }
    }

    /// Prints the bucket layout from [`structure`](HashMap::structure) to
    /// stdout.
    #[cfg(feature = "std")]
    pub fn show_structure(&self)
    where
        V: Display,
    {
        print!("{}", self.structure());
    }

    /// Returns chain-length statistics for the map.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn stats(&self) -> crate::hash_table::ChainStats {
        self.table.stats()
    }
}

impl<K, V, S, E> HashMap<K, V, S, E>
where
    S: KeyHasher<K>,
    E: KeyEq<K>,
{
    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, [`InsertOutcome::Inserted`]
    /// is returned. If the key was present, the value is overwritten and the
    /// old value is returned in [`InsertOutcome::Updated`]; the stored key is
    /// kept and the map never grows for an update.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts on allocation failure. Use
    /// [`try_insert`](HashMap::try_insert) to handle both.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// # use chain_hash::InsertOutcome;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// assert_eq!(map.insert(37, "a"), InsertOutcome::Inserted);
    /// assert_eq!(map.insert(37, "b"), InsertOutcome::Updated("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome<V> {
        let hash = self.hash_builder.hash_key(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.key_eq(k, &key)) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                InsertOutcome::Updated(old_value)
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                InsertOutcome::Inserted
            }
        }
    }

    /// Inserts a key-value pair, reporting allocation failure or capacity
    /// overflow instead of aborting.
    ///
    /// On error the map is unchanged and the pair is dropped.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<InsertOutcome<V>, TableError> {
        let hash = self.hash_builder.hash_key(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.key_eq(k, &key)) {
            TableEntry::Occupied(mut entry) => {
                let old_value = core::mem::replace(&mut entry.get_mut().1, value);
                Ok(InsertOutcome::Updated(old_value))
            }
            TableEntry::Vacant(entry) => {
                entry.try_insert((key, value))?;
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    /// Returns a copy of the value corresponding to the key.
    ///
    /// The returned value is independent of the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, vec![1, 2]);
    ///
    /// let mut copy = map.retrieve(&1).unwrap();
    /// copy.push(3);
    /// assert_eq!(map.get(&1), Some(&vec![1, 2]));
    /// assert_eq!(map.retrieve(&2), None);
    /// ```
    pub fn retrieve(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.get(key).cloned()
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_key(key);
        self.table
            .find(hash, |(k, _)| self.key_eq.key_eq(k, key))
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_key(key);
        let key_eq = &self.key_eq;
        self.table
            .find_mut(hash, |(k, _)| key_eq.key_eq(k, key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// The bucket count is never reduced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_key(key);
        let key_eq = &self.key_eq;
        self.table.remove(hash, |(k, _)| key_eq.key_eq(k, key))
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let mut map = HashMap::with_hasher(SimpleHasher);
    ///
    /// map.entry(1).or_insert("a");
    /// map.entry(2).or_insert("b");
    ///
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), Some(&"b"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_builder.hash_key(&key);
        let key_eq = &self.key_eq;
        match self.table.entry(hash, |(k, _)| key_eq.key_eq(k, &key)) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }
}

impl<K, V, S> HashMap<K, V, S, StdEq>
where
    S: Default,
{
    /// Creates an empty map with a default hasher builder and
    /// [`DEFAULT_SIZE`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chain_hash::DefaultHashBuilder;
    /// use chain_hash::HashMap;
    ///
    /// let mut map: HashMap<&str, i32, DefaultHashBuilder> = HashMap::new();
    /// map.insert("a", 1);
    /// assert_eq!(map.get(&"a"), Some(&1));
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates an empty map with at least `initial_size` buckets and a default
    /// hasher builder.
    pub fn with_capacity(initial_size: usize) -> Self {
        Self::with_capacity_and_hasher(initial_size, S::default())
    }
}

impl<K, V, S, E> Default for HashMap<K, V, S, E>
where
    S: Default,
    E: Default,
{
    fn default() -> Self {
        Self::with_hasher_and_eq(S::default(), E::default())
    }
}

impl<K, V, S, E> Extend<(K, V)> for HashMap<K, V, S, E>
where
    S: KeyHasher<K>,
    E: KeyEq<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S, E> FromIterator<(K, V)> for HashMap<K, V, S, E>
where
    S: KeyHasher<K> + Default,
    E: KeyEq<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S, E> IntoIterator for &'a HashMap<K, V, S, E> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
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
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
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

    /// Returns a reference to this entry's key.
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
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }

    /// Inserts the value into the map, reporting allocation failure instead of
    /// aborting.
    pub fn try_insert(self, value: V) -> Result<&'a mut V, TableError> {
        Ok(&mut self.entry.try_insert((self.key, value))?.1)
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// Bucket layout of a [`HashMap`], created by [`HashMap::structure`].
pub struct Structure<'a, K, V> {
    table: &'a HashTable<(K, V)>,
}

impl<K, V> Display for Structure<'_, K, V>
where
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, chain) in self.table.chains() {
            write!(f, "{index} :{{ key=")?;
            for (hash, (_, value)) in chain {
                write!(f, "{hash} ; {value} ")?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
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

/// An iterator over the values of a `HashMap`.
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

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::key::EqFn;
    use crate::key::HashFn;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    fn assert_keys_in_home_buckets<K, V, S: KeyHasher<K>, E>(map: &HashMap<K, V, S, E>) {
        for (index, chain) in map.table.chains() {
            for (hash, (key, _)) in chain {
                assert_eq!(map.hasher().hash_key(key), hash);
                assert_eq!((hash % map.capacity() as u64) as usize, index);
            }
        }
        map.table.assert_invariants();
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), DEFAULT_SIZE);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.len(), 0);
    }

    #[test]
    fn test_with_capacity() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::with_capacity(100);
        assert_eq!(map.capacity(), 101);
        assert!(map.is_empty());

        let map2 =
            HashMap::<i32, String, _>::with_capacity_and_hasher(200, SipHashBuilder::default());
        assert_eq!(map2.capacity(), 211);
        assert!(map2.is_empty());

        let map3 =
            HashMap::<i32, String, _>::with_capacity_and_hasher(0, SipHashBuilder::default());
        assert_eq!(map3.capacity(), 2);
    }

    #[test]
    fn test_try_with_capacity() {
        let map = HashMap::<i32, i32, _>::try_with_capacity_and_hasher(
            12,
            SipHashBuilder::default(),
        )
        .unwrap();
        assert_eq!(map.capacity(), 13);

        let err = HashMap::<i32, i32, _>::try_with_capacity_and_hasher(
            usize::MAX,
            SipHashBuilder::default(),
        )
        .err();
        assert_eq!(err, Some(TableError::CapacityOverflow));
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert_eq!(map.insert(1, "hello".to_string()), InsertOutcome::Inserted);
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());

        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert_eq!(
            map.insert(1, "world".to_string()),
            InsertOutcome::Updated("hello".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"world".to_string()));
    }

    #[test]
    fn test_insert_outcome_helpers() {
        let inserted: InsertOutcome<i32> = InsertOutcome::Inserted;
        assert!(inserted.is_inserted());
        assert!(!inserted.is_updated());
        assert_eq!(inserted.into_previous(), None);

        let updated = InsertOutcome::Updated(3);
        assert!(updated.is_updated());
        assert_eq!(updated.into_previous(), Some(3));
    }

    #[test]
    fn test_update_does_not_grow() {
        let mut map = HashMap::with_capacity_and_hasher(2, SipHashBuilder::default());
        map.insert(1, 1);
        assert_eq!(map.capacity(), 2);

        for value in 0..10 {
            assert!(map.insert(1, value).is_updated());
        }
        assert_eq!(map.capacity(), 2);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_try_insert() {
        let mut map = HashMap::with_capacity_and_hasher(2, SipHashBuilder::default());
        for i in 0..20 {
            assert_eq!(map.try_insert(i, i * 3), Ok(InsertOutcome::Inserted));
        }
        assert_eq!(map.try_insert(5, 0), Ok(InsertOutcome::Updated(15)));
        assert_eq!(map.len(), 20);
        assert_keys_in_home_buckets(&map);
    }

    #[test]
    fn test_retrieve_returns_copy() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("k".to_string(), vec![1, 2, 3]);

        let mut copy = map.retrieve(&"k".to_string()).unwrap();
        copy.clear();

        assert_eq!(map.get(&"k".to_string()), Some(&vec![1, 2, 3]));
        assert_eq!(map.retrieve(&"missing".to_string()), None);
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert!(!map.contains_key(&1));

        map.insert(1, "value".to_string());
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());
        let capacity = map.capacity();

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));
        assert_eq!(map.capacity(), capacity);

        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        assert_eq!(map.remove_entry(&1), Some((1, "hello".to_string())));
        assert_eq!(map.len(), 0);
        assert_eq!(map.remove_entry(&1), None);
    }

    #[test]
    fn test_clear() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..30 {
            map.insert(i, i.to_string());
        }
        let capacity = map.capacity();

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        for i in 0..30 {
            assert!(!map.contains_key(&i));
        }
    }

    #[test]
    fn test_growth_from_two_buckets() {
        let mut map = HashMap::with_capacity_and_hasher(2, SipHashBuilder::default());
        assert_eq!(map.capacity(), 2);

        let mut capacities = vec![map.capacity()];
        for i in 0..6 {
            assert!(map.insert(i, i * 100).is_inserted());
            if capacities.last() != Some(&map.capacity()) {
                capacities.push(map.capacity());
            }
        }

        assert_eq!(capacities, [2, 5, 11]);
        assert_eq!(map.len(), 6);
        for i in 0..6 {
            assert_eq!(map.retrieve(&i), Some(i * 100));
        }
        assert_keys_in_home_buckets(&map);
    }

    #[test]
    fn test_entry_api() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.get(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: HashMap<i32, Vec<i32>, SipHashBuilder> =
            HashMap::with_hasher(SipHashBuilder::default());

        map.entry(1).or_default().push(42);
        assert_eq!(map.get(&1), Some(&vec![42]));

        map.entry(1).or_default().push(24);
        assert_eq!(map.get(&1), Some(&vec![42, 24]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"hello".to_string());

                *entry.get_mut() = "world".to_string();
                assert_eq!(entry.get(), &"world".to_string());

                let old_value = entry.insert("new".to_string());
                assert_eq!(old_value, "world".to_string());
                assert_eq!(entry.get(), &"new".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);

                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        match map.entry(2) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.try_insert("two".to_string()), Ok(&mut "two".to_string()));
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        match map.entry(3) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), 3),
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_iterators() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        assert_eq!(map.iter().len(), 3);
        let pairs: std::collections::HashMap<i32, String> =
            map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get(&1), Some(&"one".to_string()));
        assert_eq!(pairs.get(&2), Some(&"two".to_string()));
        assert_eq!(pairs.get(&3), Some(&"three".to_string()));

        let keys: std::collections::HashSet<i32> = map.keys().copied().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&1));
        assert!(keys.contains(&2));
        assert!(keys.contains(&3));

        let values: std::collections::HashSet<String> = map.values().cloned().collect();
        assert_eq!(values.len(), 3);
        assert!(values.contains("one"));
        assert!(values.contains("two"));
        assert!(values.contains("three"));

        let mut count = 0;
        for (_, _) in &map {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_drain() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());
        let capacity = map.capacity();

        let drained: std::collections::HashMap<i32, String> = map.drain().collect();
        assert_eq!(drained.len(), 3);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);

        assert_eq!(drained.get(&1), Some(&"one".to_string()));
        assert_eq!(drained.get(&2), Some(&"two".to_string()));
        assert_eq!(drained.get(&3), Some(&"three".to_string()));
    }

    #[test]
    fn test_multiple_insertions() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        for i in 0..100 {
            map.insert(i, format!("value_{}", i));
        }

        assert_eq!(map.len(), 100);
        assert!(map.capacity() > 100);

        for i in 0..100 {
            assert_eq!(map.get(&i), Some(&format!("value_{}", i)));
        }
        assert_keys_in_home_buckets(&map);
    }

    #[test]
    fn test_collision_handling() {
        let mut map = HashMap::with_hasher_and_eq(HashFn(|_: &i32| 7u64), StdEq);

        for i in 0..200 {
            map.insert(i, i * 2);
        }

        assert_eq!(map.len(), 200);
        assert_eq!(map.stats().longest_chain, 200);

        for i in 0..200 {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }

        for i in (0..200).step_by(2) {
            assert_eq!(map.remove(&i), Some(i * 2));
        }

        assert_eq!(map.len(), 100);

        for i in (1..200).step_by(2) {
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }
        for i in (0..200).step_by(2) {
            assert_eq!(map.get(&i), None);
        }
    }

    #[test]
    fn test_custom_equality() {
        let mut map = HashMap::with_hasher_and_eq(
            HashFn(|k: &String| {
                k.bytes()
                    .map(|b| u64::from(b.to_ascii_lowercase()))
                    .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b))
            }),
            EqFn(|a: &String, b: &String| a.eq_ignore_ascii_case(b)),
        );

        assert!(map.insert("Hello".to_string(), 1).is_inserted());
        assert_eq!(
            map.insert("HELLO".to_string(), 2),
            InsertOutcome::Updated(1)
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"hello".to_string()), Some(&2));

        // The first spelling of the key is kept.
        assert_eq!(map.keys().next(), Some(&"Hello".to_string()));
        assert_eq!(
            map.remove_entry(&"hElLo".to_string()),
            Some(("Hello".to_string(), 2))
        );
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        map.insert("rust".to_string(), 3);

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_default_trait() {
        let map: HashMap<i32, String, SipHashBuilder> = HashMap::default();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), DEFAULT_SIZE);
    }

    #[test]
    fn test_extend_and_from_iter() {
        let mut map: HashMap<i32, i32, SipHashBuilder> = (0..10).map(|i| (i, i)).collect();
        assert_eq!(map.len(), 10);

        map.extend((5..15).map(|i| (i, -i)));
        assert_eq!(map.len(), 15);
        assert_eq!(map.get(&4), Some(&4));
        assert_eq!(map.get(&5), Some(&-5));
        assert_eq!(map.get(&14), Some(&-14));
    }

    #[test]
    fn test_structure_format() {
        let mut map = HashMap::with_capacity_hasher_and_eq(5, HashFn(|k: &u64| *k), StdEq);
        map.insert(1u64, "a");
        map.insert(6, "b");
        map.insert(3, "c");

        assert_eq!(
            map.structure().to_string(),
            "0 :{ key=}\n\
             1 :{ key=6 ; b 1 ; a }\n\
             2 :{ key=}\n\
             3 :{ key=3 ; c }\n\
             4 :{ key=}\n"
        );
    }

    #[test]
    fn test_structure_after_rehash() {
        let mut map = HashMap::with_capacity_hasher_and_eq(2, HashFn(|k: &u64| *k), StdEq);
        map.insert(0u64, 0);
        map.insert(5, 5);
        assert_eq!(map.capacity(), 5);

        let lines: Vec<String> = map.structure().to_string().lines().map(String::from).collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "0 :{ key=5 ; 5 0 ; 0 }");
    }

    #[test]
    fn test_debug_output() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "one");
        assert_eq!(format!("{map:?}"), r#"{1: "one"}"#);
    }

    #[test]
    fn test_complex_values() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        let vec1 = vec![1, 2, 3];
        let vec2 = vec![4, 5, 6];

        map.insert("first".to_string(), vec1.clone());
        map.insert("second".to_string(), vec2.clone());

        assert_eq!(map.get(&"first".to_string()), Some(&vec1));
        assert_eq!(map.get(&"second".to_string()), Some(&vec2));

        if let Some(v) = map.get_mut(&"first".to_string()) {
            v.push(4);
        }

        assert_eq!(map.get(&"first".to_string()), Some(&vec![1, 2, 3, 4]));
    }
}
