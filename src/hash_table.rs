//! The raw separate-chaining hash table.
//!
//! [`HashTable<V>`] stores values of type `V` in a prime-sized array of
//! buckets. Each bucket holds a chain of the values whose hash reduces to its
//! index under `hash % capacity`. Callers supply the hash and an equality
//! predicate for every operation, which lets the same engine back keyed maps,
//! sets, or records that carry their own key.
//!
//! The table grows before the number of entries reaches the number of
//! buckets: inserting a new entry into a table holding `capacity - 1` entries
//! first rehashes into `next_prime(capacity * 2)` buckets. The table never
//! shrinks.

use alloc::alloc::handle_alloc_error;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;

use crate::error::TableError;
use crate::prime::checked_next_prime;

/// Bucket count requested when a table is created without an explicit size.
pub const DEFAULT_SIZE: usize = 11;

#[inline(always)]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    // The remainder is below `capacity`, so it always fits back in `usize`.
    (hash % capacity as u64) as usize
}

/// Whether an allocation failure is reported to the caller or is fatal.
#[derive(Clone, Copy)]
enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    #[cold]
    #[inline(never)]
    fn capacity_overflow(self) -> TableError {
        match self {
            Fallibility::Fallible => TableError::CapacityOverflow,
            Fallibility::Infallible => panic!("hash table capacity overflow"),
        }
    }

    #[cold]
    #[inline(never)]
    fn alloc_err<T>(self, len: usize) -> TableError {
        match Layout::array::<T>(len) {
            Ok(layout) => match self {
                Fallibility::Fallible => TableError::AllocationFailure {
                    bytes: layout.size(),
                },
                Fallibility::Infallible => handle_alloc_error(layout),
            },
            Err(_) => self.capacity_overflow(),
        }
    }
}

fn try_alloc_vec<T>(len: usize, fallibility: Fallibility) -> Result<Vec<T>, TableError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)
        .map_err(|_| fallibility.alloc_err::<T>(len))?;
    Ok(vec)
}

/// An entry together with the hash it was inserted under.
struct Slot<V> {
    hash: u64,
    value: V,
}

/// A collision chain.
///
/// Slots are appended, so walking the chain back to front visits the most
/// recently inserted entry first. That back-to-front order is the chain order
/// exposed by iteration and diagnostics.
struct Chain<V> {
    slots: Vec<Slot<V>>,
}

impl<V> Chain<V> {
    const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    #[inline]
    fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.hash == hash && eq(&slot.value))
    }

    fn try_reserve(
        &mut self,
        additional: usize,
        fallibility: Fallibility,
    ) -> Result<(), TableError> {
        self.slots.try_reserve(additional).map_err(|_| {
            fallibility.alloc_err::<Slot<V>>(self.slots.len().saturating_add(additional))
        })
    }
}

fn try_alloc_buckets<V>(
    capacity: usize,
    fallibility: Fallibility,
) -> Result<Vec<Chain<V>>, TableError> {
    let mut buckets = try_alloc_vec(capacity, fallibility)?;
    buckets.resize_with(capacity, Chain::new);
    Ok(buckets)
}

/// Chain-length statistics for a [`HashTable`].
///
/// Requires the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of entries stored in the table.
    pub populated: usize,
    /// Number of buckets.
    pub capacity: usize,
    /// Number of buckets whose chain is empty.
    pub empty_buckets: usize,
    /// Length of the longest chain.
    pub longest_chain: usize,
    /// Load factor (populated / capacity).
    pub load_factor: f64,
    /// `chain_lengths[n]` is the number of buckets holding exactly `n`
    /// entries.
    pub chain_lengths: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ChainStats {
    /// Average length of the non-empty chains, i.e. the expected number of
    /// comparisons for a successful lookup of a random bucket's entry.
    pub fn mean_chain_length(&self) -> f64 {
        let occupied = self.capacity - self.empty_buckets;
        if occupied == 0 {
            0.0
        } else {
            self.populated as f64 / occupied as f64
        }
    }

    /// Pretty-print the statistics and a horizontal chain-length histogram.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Chain Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Buckets: {} empty, longest chain {}, mean chain {:.2}",
            self.empty_buckets,
            self.longest_chain,
            self.mean_chain_length()
        );

        let max = self.chain_lengths.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                0 => {}
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                _ => bar.push('▉'),
            }
            bar
        };

        for (len, &count) in self.chain_lengths.iter().enumerate() {
            println!("{:>3} | {} ({})", len, make_bar(count), count);
        }
    }
}

/// A hash table using separate chaining over a prime number of buckets.
///
/// `HashTable<V>` stores values of type `V`. Like `hashbrown::HashTable`, it
/// does not know how to hash or compare values: every operation takes the
/// hash of the entry in question and a predicate that recognises it. The hash
/// must be the same every time a given entry is looked up, and the predicate
/// must only accept entries with that hash.
///
/// The table does not implement `Clone`. To duplicate one, rebuild it from
/// [`iter`](HashTable::iter).
///
/// ## Example
///
/// ```rust
/// # use core::hash::Hash;
/// # use core::hash::Hasher;
/// #
/// # use chain_hash::hash_table::HashTable;
/// # use siphasher::sip::SipHasher;
/// #
/// # #[derive(Debug, PartialEq)]
/// # struct Person {
/// #     id: u64,
/// #     name: String,
/// # }
/// #
/// # fn hash_id(id: u64) -> u64 {
/// #     let mut hasher = SipHasher::new();
/// #     id.hash(&mut hasher);
/// #     hasher.finish()
/// # }
///
/// let mut table = HashTable::with_capacity(100);
/// let hash = hash_id(123);
///
/// match table.entry(hash, |p: &Person| p.id == 123) {
///     chain_hash::hash_table::Entry::Vacant(entry) => {
///         entry.insert(Person {
///             id: 123,
///             name: "Alice".to_string(),
///         });
///     }
///     chain_hash::hash_table::Entry::Occupied(_) => {
///         println!("Person already exists");
///     }
/// }
///
/// assert_eq!(table.capacity(), 101);
/// ```
pub struct HashTable<V> {
    buckets: Vec<Chain<V>>,
    populated: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self
                    .buckets
                    .iter()
                    .map(|chain| chain.slots.len())
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_SIZE`] buckets.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SIZE)
    }

    /// Creates an empty table with at least `initial_size` buckets.
    ///
    /// The bucket count is rounded up to the next prime, and is never below 2.
    ///
    /// # Panics
    ///
    /// Panics if the bucket count overflows, and aborts through the global
    /// allocation error handler if the bucket array cannot be allocated. Use
    /// [`try_with_capacity`](HashTable::try_with_capacity) to handle both.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::with_capacity(100);
    /// assert_eq!(table.capacity(), 101);
    ///
    /// let table: HashTable<String> = HashTable::with_capacity(0);
    /// assert_eq!(table.capacity(), 2);
    /// ```
    pub fn with_capacity(initial_size: usize) -> Self {
        match Self::with_capacity_inner(initial_size, Fallibility::Infallible) {
            Ok(table) => table,
            Err(_) => unreachable!("infallible allocation reported an error"),
        }
    }

    /// Creates an empty table with at least `initial_size` buckets, reporting
    /// allocation failure instead of aborting.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::TableError;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::try_with_capacity(12)?;
    /// assert_eq!(table.capacity(), 13);
    ///
    /// let too_big = HashTable::<u64>::try_with_capacity(usize::MAX);
    /// assert_eq!(too_big.err(), Some(TableError::CapacityOverflow));
    /// # Ok::<(), TableError>(())
    /// ```
    pub fn try_with_capacity(initial_size: usize) -> Result<Self, TableError> {
        Self::with_capacity_inner(initial_size, Fallibility::Fallible)
    }

    fn with_capacity_inner(
        initial_size: usize,
        fallibility: Fallibility,
    ) -> Result<Self, TableError> {
        let capacity =
            checked_next_prime(initial_size).ok_or_else(|| fallibility.capacity_overflow())?;
        let buckets = try_alloc_buckets(capacity, fallibility)?;
        log::trace!("created hash table with {capacity} buckets (requested {initial_size})");

        Ok(Self {
            buckets,
            populated: 0,
        })
    }

    /// Returns an iterator over all values in the table.
    ///
    /// Buckets are visited in index order and each chain from its most
    /// recently inserted entry. Callers should not rely on the order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use chain_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table
    ///     .entry(hash_str("key1"), |s: &String| s == "key1")
    ///     .or_insert("key1".to_string());
    /// table
    ///     .entry(hash_str("key2"), |s: &String| s == "key2")
    ///     .or_insert("key2".to_string());
    ///
    /// assert_eq!(table.iter().count(), 2);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// The bucket array is kept. Dropping the iterator early still empties
    /// the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(7, |&n: &u64| n == 7).or_insert(7);
    /// table.entry(8, |&n: &u64| n == 8).or_insert(8);
    ///
    /// let mut values: Vec<u64> = table.drain().collect();
    /// values.sort();
    /// assert_eq!(values, [7, 8]);
    /// assert!(table.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket_index: 0,
        }
    }

    /// Returns an iterator over every bucket and its chain, for diagnostics.
    ///
    /// Each item is the bucket index and an iterator over `(hash, &value)` for
    /// the entries of that bucket, most recently inserted first. Empty buckets
    /// are included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(5);
    /// table.entry(1, |&v: &&str| v == "a").or_insert("a");
    /// table.entry(6, |&v: &&str| v == "b").or_insert("b");
    ///
    /// let dump: Vec<(usize, Vec<(u64, &&str)>)> = table
    ///     .chains()
    ///     .map(|(index, chain)| (index, chain.collect()))
    ///     .collect();
    /// assert_eq!(dump.len(), 5);
    /// assert_eq!(dump[1], (1, vec![(6, &"b"), (1, &"a")]));
    /// ```
    pub fn chains(&self) -> Chains<'_, V> {
        Chains {
            inner: self.buckets.iter().enumerate(),
        }
    }

    /// Returns `true` if the table contains no elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<i32> = HashTable::with_capacity(10);
    /// assert!(table.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// assert_eq!(table.len(), 0);
    ///
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of buckets.
    ///
    /// This is always a prime number, and always greater than
    /// [`len`](HashTable::len).
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Removes all elements from the table.
    ///
    /// The bucket array and capacity are preserved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(1, |&n: &u64| n == 1).or_insert(1);
    /// table.entry(2, |&n: &u64| n == 2).or_insert(2);
    /// let capacity = table.capacity();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), capacity);
    /// ```
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.slots.clear();
        }
        self.populated = 0;
    }

    /// Removes and returns a value from the table.
    ///
    /// The value is identified by its hash and an equality predicate. Returns
    /// `None`, leaving the table untouched, if no value matches. Removal never
    /// shrinks the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use chain_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_u64(n: u64) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     n.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(hash_u64(42), |&n: &u64| n == 42).or_insert(42);
    ///
    /// let removed = table.remove(hash_u64(42), |&n| n == 42);
    /// assert_eq!(removed, Some(42));
    /// assert!(table.is_empty());
    ///
    /// let not_found = table.remove(hash_u64(99), |&n| n == 99);
    /// assert_eq!(not_found, None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        if self.populated == 0 {
            return None;
        }

        let bucket = bucket_index(hash, self.capacity());
        let chain = &mut self.buckets[bucket];
        let slot = chain.position(hash, eq)?;
        self.populated -= 1;
        Some(chain.slots.remove(slot).value)
    }

    /// Gets an entry for the given hash and equality predicate.
    ///
    /// Looking up the entry never resizes the table; a rehash can only happen
    /// when a [`VacantEntry`] is filled.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::Hash;
    /// # use core::hash::Hasher;
    /// #
    /// # use chain_hash::hash_table::HashTable;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # fn hash_str(s: &str) -> u64 {
    /// #     let mut hasher = SipHasher::new();
    /// #     s.hash(&mut hasher);
    /// #     hasher.finish()
    /// # }
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// let hash = hash_str("hello");
    ///
    /// match table.entry(hash, |s: &String| s.starts_with("hello")) {
    ///     chain_hash::hash_table::Entry::Vacant(entry) => {
    ///         entry.insert("hello world".to_string());
    ///     }
    ///     chain_hash::hash_table::Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() = "hello again".to_string();
    ///     }
    /// }
    ///
    /// assert_eq!(
    ///     table.find(hash, |s| s.starts_with("hello")),
    ///     Some(&"hello world".to_string())
    /// );
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        let bucket = bucket_index(hash, self.capacity());
        match self.buckets[bucket].position(hash, eq) {
            Some(slot) => Entry::Occupied(OccupiedEntry {
                table: self,
                bucket,
                slot,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Finds a value in the table by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.find(42, |&n| n == 42), Some(&42));
    /// assert_eq!(table.find(99, |&n| n == 99), None);
    /// ```
    #[inline]
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        if self.populated == 0 {
            return None;
        }

        let chain = &self.buckets[bucket_index(hash, self.capacity())];
        chain
            .position(hash, eq)
            .map(|slot| &chain.slots[slot].value)
    }

    /// Finds a value in the table by hash and equality predicate, returning a
    /// mutable reference.
    ///
    /// The predicate identifies the entry, so changing the parts of the value
    /// that feed its hash or equality leaves the table inconsistent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(1, |v: &(u64, u32)| v.0 == 1).or_insert((1, 10));
    ///
    /// if let Some(value) = table.find_mut(1, |v| v.0 == 1) {
    ///     value.1 += 5;
    /// }
    /// assert_eq!(table.find(1, |v| v.0 == 1), Some(&(1, 15)));
    /// ```
    #[inline]
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        if self.populated == 0 {
            return None;
        }

        let bucket = bucket_index(hash, self.capacity());
        let chain = &mut self.buckets[bucket];
        let slot = chain.position(hash, eq)?;
        Some(&mut chain.slots[slot].value)
    }

    /// Appends a value that is known not to be present.
    ///
    /// Grows the table first if storing one more entry would fill every
    /// bucket. All allocation happens before any state changes, so on error
    /// the table is exactly as it was and `value` is dropped.
    fn insert_vacant(
        &mut self,
        hash: u64,
        value: V,
        fallibility: Fallibility,
    ) -> Result<&mut V, TableError> {
        if self.populated + 1 >= self.capacity() {
            self.rehash(hash, fallibility)?;
        } else {
            let bucket = bucket_index(hash, self.capacity());
            self.buckets[bucket].try_reserve(1, fallibility)?;
        }

        let bucket = bucket_index(hash, self.capacity());
        self.populated += 1;

        let chain = &mut self.buckets[bucket];
        let slot = chain.slots.len();
        chain.slots.push(Slot { hash, value });
        Ok(&mut chain.slots[slot].value)
    }

    /// Moves every entry into a new bucket array of
    /// `next_prime(capacity * 2)` buckets.
    ///
    /// The new array and the storage for every new chain are allocated before
    /// any entry moves, with room for one more entry of hash `pending`.
    /// Nothing after that point allocates, so a failure leaves the current
    /// buckets untouched.
    fn rehash(&mut self, pending: u64, fallibility: Fallibility) -> Result<(), TableError> {
        let old_capacity = self.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .and_then(checked_next_prime)
            .ok_or_else(|| fallibility.capacity_overflow())?;

        let mut lengths: Vec<usize> = try_alloc_vec(new_capacity, fallibility)?;
        lengths.resize(new_capacity, 0);
        for slot in self.buckets.iter().flat_map(|chain| chain.slots.iter()) {
            lengths[bucket_index(slot.hash, new_capacity)] += 1;
        }
        lengths[bucket_index(pending, new_capacity)] += 1;

        let mut buckets = try_alloc_buckets::<V>(new_capacity, fallibility)?;
        for (chain, &len) in buckets.iter_mut().zip(&lengths) {
            if len > 0 {
                chain.try_reserve(len, fallibility)?;
            }
        }

        for chain in &mut self.buckets {
            for slot in chain.slots.drain(..) {
                buckets[bucket_index(slot.hash, new_capacity)]
                    .slots
                    .push(slot);
            }
        }
        self.buckets = buckets;

        log::debug!(
            "rehashed {} entries from {} to {} buckets",
            self.populated,
            old_capacity,
            new_capacity
        );

        Ok(())
    }

    /// Returns chain-length statistics for the current table state.
    ///
    /// Requires the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn stats(&self) -> ChainStats {
        let longest_chain = self
            .buckets
            .iter()
            .map(|chain| chain.slots.len())
            .max()
            .unwrap_or(0);

        let mut chain_lengths = alloc::vec![0usize; longest_chain + 1];
        for chain in &self.buckets {
            chain_lengths[chain.slots.len()] += 1;
        }

        ChainStats {
            populated: self.populated,
            capacity: self.capacity(),
            empty_buckets: chain_lengths[0],
            longest_chain,
            load_factor: self.populated as f64 / self.capacity() as f64,
            chain_lengths,
        }
    }

    /// Checks every structural invariant of the table.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(crate::prime::is_prime(capacity), "capacity {capacity} is not prime");
        assert!(
            self.populated < capacity,
            "{} entries in {} buckets",
            self.populated,
            capacity
        );

        let mut counted = 0;
        for (index, chain) in self.buckets.iter().enumerate() {
            for slot in &chain.slots {
                assert_eq!(bucket_index(slot.hash, capacity), index);
            }
            counted += chain.slots.len();
        }
        assert_eq!(counted, self.populated);
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
///
/// # Examples
///
/// ```rust
/// # use chain_hash::hash_table::Entry;
/// # use chain_hash::hash_table::HashTable;
/// #
/// let mut table = HashTable::with_capacity(10);
///
/// match table.entry(3, |s: &String| s == "key") {
///     Entry::Vacant(entry) => {
///         entry.insert("key".to_string());
///     }
///     Entry::Occupied(entry) => {
///         println!("Key already exists with value: {}", entry.get());
///     }
/// }
/// ```
pub enum Entry<'a, V> {
    /// A vacant entry - no stored value matches
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a stored value matches
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the stored value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    ///
    /// let value = table.entry(5, |s: &String| s == "key").or_insert("key".to_string());
    /// assert_eq!(value, "key");
    ///
    /// let existing = table.entry(5, |s: &String| s == "key").or_insert("other".to_string());
    /// assert_eq!(existing, "key");
    /// ```
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the value computed by `default` if the entry is vacant and
    /// returns a mutable reference to the stored value.
    ///
    /// The closure is only called for a vacant entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to an occupied entry and returns a mutable reference to
    /// it. Returns `None` without inserting anything if the entry is vacant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    ///
    /// let result = table.entry(42, |v: &(u64, u32)| v.0 == 42).and_modify(|v| v.1 += 1);
    /// assert!(result.is_none());
    ///
    /// table.entry(42, |v: &(u64, u32)| v.0 == 42).or_insert((42, 0));
    /// let result = table.entry(42, |v: &(u64, u32)| v.0 == 42).and_modify(|v| v.1 += 1);
    /// assert_eq!(result, Some(&mut (42, 1)));
    /// ```
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// Created by [`HashTable::entry`] when no stored value matched.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry will be stored under.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts a value into the vacant entry and returns a mutable reference
    /// to it.
    ///
    /// If the table holds `capacity - 1` entries, it is rehashed into
    /// `next_prime(capacity * 2)` buckets first.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts if allocation fails. Use
    /// [`try_insert`](VacantEntry::try_insert) to handle both.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(2);
    /// assert_eq!(table.capacity(), 2);
    ///
    /// for n in 0..2u64 {
    ///     match table.entry(n, |&v: &u64| v == n) {
    ///         Entry::Vacant(entry) => {
    ///             entry.insert(n);
    ///         }
    ///         Entry::Occupied(_) => unreachable!("Entry should be vacant"),
    ///     }
    /// }
    ///
    /// // The second insert would have filled both buckets.
    /// assert_eq!(table.capacity(), 5);
    /// ```
    pub fn insert(self, value: V) -> &'a mut V {
        match self
            .table
            .insert_vacant(self.hash, value, Fallibility::Infallible)
        {
            Ok(value) => value,
            Err(_) => unreachable!("infallible allocation reported an error"),
        }
    }

    /// Inserts a value into the vacant entry, reporting allocation failure or
    /// capacity overflow instead of aborting.
    ///
    /// On error the table is unchanged and `value` is dropped.
    pub fn try_insert(self, value: V) -> Result<&'a mut V, TableError> {
        self.table
            .insert_vacant(self.hash, value, Fallibility::Fallible)
    }
}

/// A view into an occupied entry in the hash table.
///
/// Created by [`HashTable::entry`] when a stored value matched.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    bucket: usize,
    slot: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    fn stored(&self) -> &Slot<V> {
        &self.table.buckets[self.bucket].slots[self.slot]
    }

    /// Returns the hash the value is stored under.
    pub fn hash(&self) -> u64 {
        self.stored().hash
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.stored().value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.bucket].slots[self.slot].value
    }

    /// Converts the entry into a mutable reference to the value, bound to the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.bucket].slots[self.slot].value
    }

    /// Removes the entry from the table and returns the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(10);
    /// table.entry(9, |&v: &u64| v == 9).or_insert(9);
    ///
    /// match table.entry(9, |&v: &u64| v == 9) {
    ///     Entry::Occupied(entry) => assert_eq!(entry.remove(), 9),
    ///     Entry::Vacant(_) => unreachable!("Entry should be occupied"),
    /// }
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(self) -> V {
        self.table.populated -= 1;
        self.table.buckets[self.bucket]
            .slots
            .remove(self.slot)
            .value
    }
}

/// An iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Chain<V>>,
    chain: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(slot) = self.chain.next_back() {
                self.remaining -= 1;
                return Some(&slot.value);
            }
            if self.remaining == 0 {
                return None;
            }
            self.chain = self.buckets.next()?.slots.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> core::iter::FusedIterator for Iter<'_, V> {}

/// A draining iterator over the values of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. The table
/// stays consistent after every step, and dropping the iterator removes
/// whatever it has not yet yielded.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for _ in &mut *self {}
    }
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.table.populated > 0 && self.bucket_index < self.table.buckets.len() {
            if let Some(slot) = self.table.buckets[self.bucket_index].slots.pop() {
                self.table.populated -= 1;
                return Some(slot.value);
            }
            self.bucket_index += 1;
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}

/// An iterator over the buckets of a [`HashTable`] and their chains.
///
/// This struct is created by the [`chains`] method on [`HashTable`].
///
/// [`chains`]: HashTable::chains
pub struct Chains<'a, V> {
    inner: core::iter::Enumerate<core::slice::Iter<'a, Chain<V>>>,
}

impl<'a, V> Iterator for Chains<'a, V> {
    type Item = (usize, ChainIter<'a, V>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(index, chain)| {
            (
                index,
                ChainIter {
                    inner: chain.slots.iter(),
                },
            )
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Chains<'_, V> {}

/// An iterator over one bucket's chain, yielding `(hash, &value)` from the
/// most recently inserted entry.
pub struct ChainIter<'a, V> {
    inner: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (u64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|slot| (slot.hash, &slot.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for ChainIter<'_, V> {}
