//! Error definitions.
use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) and
/// [`HashMap`](crate::HashMap) operations.
///
/// Every mutating operation that fails leaves the table exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A read-only lookup or an erase was asked for a key the table does not
    /// hold.
    #[error("key not found")]
    NotFound,

    /// The cursor does not designate a live entry of the current backing
    /// array: it was issued before a growth, points at the end sentinel, or
    /// its entry has already been erased.
    #[error("invalid cursor: slot {index} of generation {generation}")]
    InvalidCursor {
        /// Slot index the cursor points at.
        index: usize,
        /// Backing array generation the cursor was issued for.
        generation: u64,
    },

    /// Growing past `capacity` would overflow the size arithmetic or the
    /// allocator refused the new array.
    #[error("capacity overflow while growing from {capacity} slots")]
    CapacityOverflow {
        /// Capacity of the table when growth was attempted.
        capacity: usize,
    },

    /// A probe visited every slot without finding the key or a free slot.
    /// The fill threshold guarantees this cannot happen, so seeing it means
    /// the occupancy accounting is broken.
    #[error("probe sequence exhausted after {capacity} slots ({occupied} occupied)")]
    ProbeExhausted {
        /// Capacity of the scanned array.
        capacity: usize,
        /// Occupied entry count at the time of the scan.
        occupied: usize,
    },
}
