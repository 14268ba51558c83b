//! Hash and equality capabilities for keyed tables.
//!
//! A [`HashMap`](crate::HashMap) is generic over a pair of capabilities: a
//! [`KeyHasher`] that maps a key to a `u64`, and a [`KeyEq`] that decides
//! whether two keys are the same. Both are resolved at compile time.
//!
//! Any [`BuildHasher`] is a `KeyHasher` for keys implementing [`Hash`], and
//! [`StdEq`] compares keys with [`Eq`], so primitive keys need nothing
//! special. Structured keys can supply closures through [`HashFn`] and
//! [`EqFn`].
//!
//! The two capabilities must agree: keys that compare equal must hash to the
//! same value, and a key's hash must not change while it is stored.

use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

/// Maps keys to unsigned 64-bit hash values.
pub trait KeyHasher<K: ?Sized> {
    /// Returns the hash of `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, S> KeyHasher<K> for S
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.hash_one(key)
    }
}

/// Decides whether two keys are equal.
pub trait KeyEq<K: ?Sized> {
    /// Returns `true` if `a` and `b` denote the same key.
    fn key_eq(&self, a: &K, b: &K) -> bool;
}

/// Key equality through the key type's own [`Eq`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StdEq;

impl<K> KeyEq<K> for StdEq
where
    K: Eq + ?Sized,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Adapts a closure `Fn(&K) -> u64` into a [`KeyHasher`].
///
/// # Examples
///
/// ```rust
/// use chain_hash::key::HashFn;
/// use chain_hash::key::KeyHasher;
///
/// let by_len = HashFn(|s: &String| s.len() as u64);
/// assert_eq!(by_len.hash_key(&"four".to_string()), 4);
/// ```
#[derive(Clone, Copy)]
pub struct HashFn<F>(pub F);

impl<F> Debug for HashFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HashFn(..)")
    }
}

impl<K, F> KeyHasher<K> for HashFn<F>
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        (self.0)(key)
    }
}

/// Adapts a closure `Fn(&K, &K) -> bool` into a [`KeyEq`].
///
/// # Examples
///
/// ```rust
/// use chain_hash::key::EqFn;
/// use chain_hash::key::KeyEq;
///
/// let ignore_case = EqFn(|a: &str, b: &str| a.eq_ignore_ascii_case(b));
/// assert!(ignore_case.key_eq("Rust", "rUST"));
/// ```
#[derive(Clone, Copy)]
pub struct EqFn<F>(pub F);

impl<F> Debug for EqFn<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("EqFn(..)")
    }
}

impl<K, F> KeyEq<K> for EqFn<F>
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn key_eq(&self, a: &K, b: &K) -> bool {
        (self.0)(a, b)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when a map is created without an explicit
        /// one.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when a map is created without an explicit
        /// one.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
