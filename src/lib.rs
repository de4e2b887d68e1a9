//! chain-table: a string-keyed hash table with separate chaining and
//! automatic growth, suited for symbol tables in assemblers and similar
//! front ends.
//!
//! Internal Design:
//!
//! Summary
//! - Keys are owned `String`s; values are any `V` the caller chooses
//!   (plain data, `&T`, `Rc<T>`, ids). The table never inspects values and
//!   hands them back on delete or replace.
//! - Layers:
//!   - `key_hash`: `KeyHasher` trait and the default base-31 polynomial
//!     hash, plus Euclidean bucket indexing.
//!   - `HashTable<V, H>`: bucket array of chain head/tail links over a
//!     generational slot arena of entries.
//!   - `TableConfig`: initial bucket count and growth threshold.
//!
//! Constraints
//! - Single-threaded by contract: every mutation takes `&mut self`, so the
//!   borrow checker serializes mutators and rules out mutation during
//!   iteration. No internal locking.
//! - Keys within a chain are pairwise distinct; inserting an existing key
//!   replaces its value in place.
//! - After an insert that adds a key, `len / num_buckets` never exceeds the
//!   configured maximum load factor (0.75 by default).
//! - Deletion never shrinks the bucket array; only an explicit `resize` does.
//!
//! Chains and ownership
//! - Entries live in a `SlotMap`; a bucket stores the first and last slot key
//!   of its chain and each entry stores its successor's slot key. Unlinking
//!   and resizing rewrite keys only, so there are no raw pointers to dangle
//!   and no manual frees.
//! - Generational keys also back `EntryHandle`, which survives resizes and
//!   stops resolving once its entry is deleted.
//!
//! Hashing and rehashing
//! - Each entry caches its 32-bit hash. Resizing recomputes the bucket
//!   index from the cached hash and never calls the hasher again.
//! - `bucket_index` uses the Euclidean remainder, so negative hashes map into
//!   range.
//!
//! Failure model
//! - `TableError::InvalidBucketCount` / `InvalidLoadFactor` for bad
//!   arguments; `TableError::AllocationFailure` when the bucket array or a
//!   key copy cannot be allocated, or the bucket count would overflow.
//! - Resize allocates the new bucket array before moving anything, so a
//!   failed resize (or a failed growth step inside insert) leaves the table
//!   unchanged.
//! - A missing key is `None`, not an error.
//!
//! Notes and non-goals
//! - No persistence, no generic key types, no ordering guarantees for
//!   iteration.
//! - A key that should map to "no value" is modeled with `V = Option<T>`,
//!   which keeps it distinguishable from an absent key.
//!
//! ```
//! use chain_table::HashTable;
//!
//! let mut symbols = HashTable::create(4)?;
//! symbols.insert("start", 0x0100u16)?;
//! symbols.insert("loop", 0x0104)?;
//! assert_eq!(symbols.get("loop"), Some(&0x0104));
//! assert_eq!(symbols.delete("start"), Some(0x0100));
//! assert_eq!(symbols.get("start"), None);
//! # Ok::<(), chain_table::TableError>(())
//! ```

mod config;
mod error;
mod hash_table;
mod hash_table_proptest;
pub mod key_hash;

// Public surface
pub use config::TableConfig;
pub use error::{ErrorKind, TableError};
pub use hash_table::{ChainIter, EntryHandle, HashTable, Iter};
pub use key_hash::{KeyHasher, Polynomial31};
