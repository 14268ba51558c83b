use crate::error::TableError;
use crate::hash_map::HashMap;
use crate::hash_table::DEFAULT_SIZE;
use crate::key::KeyEq;
use crate::key::KeyHasher;
use crate::key::StdEq;

/// Construction-time configuration for a [`HashMap`].
///
/// A builder starts with [`DEFAULT_SIZE`] buckets, no hash function and
/// [`StdEq`] key equality. [`build`](Builder::build) fails with
/// [`TableError::UndefinedHashFunction`] if no hash function was supplied.
///
/// # Examples
///
/// ```rust
/// use chain_hash::Builder;
/// use chain_hash::key::EqFn;
/// use chain_hash::key::HashFn;
///
/// let mut map = Builder::new()
///     .initial_size(2)
///     .with_hasher(HashFn(|k: &(u32, u32)| u64::from(k.0) * 37 + u64::from(k.1)))
///     .with_key_eq(EqFn(|a: &(u32, u32), b: &(u32, u32)| a == b))
///     .build()?;
///
/// map.insert((1, 2), "one-two");
/// assert_eq!(map.capacity(), 2);
/// assert_eq!(map.get(&(1, 2)), Some(&"one-two"));
/// # Ok::<(), chain_hash::TableError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder<S = NoHasher, E = StdEq> {
    initial_size: usize,
    hash_builder: Option<S>,
    key_eq: E,
}

/// The hash function slot of a [`Builder`] that has not been given one.
///
/// No value of this type exists.
#[derive(Debug, Clone, Copy)]
pub enum NoHasher {}

impl<K: ?Sized> KeyHasher<K> for NoHasher {
    fn hash_key(&self, _key: &K) -> u64 {
        match *self {}
    }
}

impl Default for Builder<NoHasher, StdEq> {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_SIZE,
            hash_builder: None,
            key_eq: StdEq,
        }
    }
}

impl Builder<NoHasher, StdEq> {
    /// Creates a builder with the default size and no hash function.
    pub fn new() -> Self {
        Default::default()
    }
}

impl<S, E> Builder<S, E> {
    /// Sets the requested number of buckets. The map rounds it up to the next
    /// prime, and never below 2.
    pub fn initial_size(mut self, initial_size: usize) -> Self {
        self.initial_size = initial_size;
        self
    }

    /// Sets the hash function.
    pub fn with_hasher<T>(self, hash_builder: T) -> Builder<T, E> {
        Builder {
            initial_size: self.initial_size,
            hash_builder: Some(hash_builder),
            key_eq: self.key_eq,
        }
    }

    /// Uses `T::default()` as the hash function.
    pub fn with_default_hasher<T>(self) -> Builder<T, E>
    where
        T: Default,
    {
        self.with_hasher(T::default())
    }

    /// Sets the key equality.
    pub fn with_key_eq<T>(self, key_eq: T) -> Builder<S, T> {
        Builder {
            initial_size: self.initial_size,
            hash_builder: self.hash_builder,
            key_eq,
        }
    }

    /// Build the configured map.
    ///
    /// Fails with [`TableError::UndefinedHashFunction`] if no hash function
    /// was supplied, or with an allocation error if the bucket array cannot be
    /// allocated.
    pub fn build<K, V>(self) -> Result<HashMap<K, V, S, E>, TableError>
    where
        S: KeyHasher<K>,
        E: KeyEq<K>,
    {
        let hash_builder = self
            .hash_builder
            .ok_or(TableError::UndefinedHashFunction)?;
        HashMap::try_with_capacity_hasher_and_eq(self.initial_size, hash_builder, self.key_eq)
    }
}
