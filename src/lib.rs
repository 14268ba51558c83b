#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A HashMap implementation backed by the separate-chaining table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with pluggable hash and equality capabilities.
pub mod hash_map;

pub mod hash_table;

pub mod key;

pub mod prime;

mod builder;
mod error;

pub use builder::Builder;
pub use builder::NoHasher;
pub use error::TableError;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_map::InsertOutcome;
pub use hash_table::DEFAULT_SIZE;
pub use hash_table::HashTable;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use key::DefaultHashBuilder;
pub use key::EqFn;
pub use key::HashFn;
pub use key::KeyEq;
pub use key::KeyHasher;
pub use key::StdEq;
