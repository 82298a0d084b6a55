#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;

/// A keyed map over the linear-probing table.
///
/// This module provides a `HashMap` that hashes keys through [`TableKey`]
/// with a per-instance [`HashStrategy`] and stores them in a [`HashTable`].
pub mod hash_map;

/// The linear-probing table core.
///
/// [`HashTable`] takes precomputed 32-bit hashes and equality predicates; it
/// owns growth, tombstones, cursors and iteration.
pub mod hash_table;

pub mod key;
pub mod strategy;
pub mod word_count;

pub use error::TableError;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::Cursor;
pub use hash_table::HashTable;
pub use hash_table::SlotState;
pub use key::TableKey;
pub use strategy::HashStrategy;
