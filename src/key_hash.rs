//! Key hashing and bucket indexing.
//!
//! The default hash is the base-31 polynomial over the key's bytes with
//! 32-bit signed wrapping arithmetic, the same recurrence as Java's
//! `String::hashCode` for ASCII keys. Bytes are read as unsigned values, so
//! the result does not depend on the platform's `char` signedness.

/// Maps a key to a 32-bit hash. The table stores the hash per entry and
/// never calls the hasher again for that entry, including during resize.
pub trait KeyHasher {
    fn hash_key(&self, key: &str) -> i32;
}

/// Default hasher: `h = h * 31 + b` over every byte of the key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Polynomial31;

impl KeyHasher for Polynomial31 {
    #[inline]
    fn hash_key(&self, key: &str) -> i32 {
        polynomial31(key.as_bytes())
    }
}

/// Base-31 polynomial rolling hash with wrapping `i32` semantics.
#[inline]
pub fn polynomial31(bytes: &[u8]) -> i32 {
    bytes
        .iter()
        .fold(0i32, |h, &b| h.wrapping_mul(31).wrapping_add(i32::from(b)))
}

/// Bucket for `hash` among `num_buckets` buckets.
///
/// Uses the Euclidean remainder, so negative hashes still land in
/// `[0, num_buckets)`.
#[inline]
pub fn bucket_index(hash: i32, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0, "bucket count must be positive");
    // A Vec never holds more than isize::MAX elements, so this fits in i64.
    i64::from(hash).rem_euclid(num_buckets as i64) as usize
}
