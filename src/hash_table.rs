//! HashTable: string keys, separate chaining, load-factor driven growth.
//!
//! Entries live in a generational slot arena. Each bucket keeps the head
//! and tail of a singly linked chain whose links are arena keys, so
//! unlinking and resizing only rewrite keys and never move or free an entry
//! behind a live link.

use crate::config::TableConfig;
use crate::error::TableError;
use crate::key_hash::{bucket_index, KeyHasher, Polynomial31};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};
use tracing::{debug, trace, warn};

/// Stable reference to one entry.
///
/// Survives growth and explicit resizes. Stops resolving once the entry is
/// deleted or the table is cleared, and never aliases a later entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryHandle(DefaultKey);

impl EntryHandle {
    pub fn key<'a, V, H>(&self, table: &'a HashTable<V, H>) -> Option<&'a str> {
        table.slots.get(self.0).map(|e| e.key.as_str())
    }

    pub fn value<'a, V, H>(&self, table: &'a HashTable<V, H>) -> Option<&'a V> {
        table.slots.get(self.0).map(|e| &e.value)
    }

    pub fn value_mut<'a, V, H>(&self, table: &'a mut HashTable<V, H>) -> Option<&'a mut V> {
        table.slots.get_mut(self.0).map(|e| &mut e.value)
    }
}

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    hash: i32,
    next: Option<DefaultKey>,
}

#[derive(Copy, Clone, Debug, Default)]
struct Bucket {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

pub struct HashTable<V, H = Polynomial31> {
    hasher: H,
    buckets: Vec<Bucket>,
    slots: SlotMap<DefaultKey, Entry<V>>, // entry storage; chains link slot keys
    max_load_factor: f64,
}

impl<V> HashTable<V> {
    /// Empty table with the default bucket count and load factor.
    pub fn new() -> Self {
        Self::with_hasher(Polynomial31)
    }

    /// Empty table with `initial_bucket_count` buckets.
    pub fn create(initial_bucket_count: usize) -> Result<Self, TableError> {
        Self::with_config(TableConfig::new().with_initial_buckets(initial_bucket_count))
    }

    pub fn with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::with_config_and_hasher(config, Polynomial31)
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a single chain, head to tail.
pub struct ChainIter<'a, V> {
    links: Links<'a, V>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.links
            .next()
            .map(|(_, e)| (e.key.as_str(), &e.value))
    }
}

/// Iterator over every entry: buckets in index order, each chain head to
/// tail. Callers should not rely on the order; it changes with every resize.
pub struct Iter<'a, V> {
    slots: &'a SlotMap<DefaultKey, Entry<V>>,
    buckets: core::slice::Iter<'a, Bucket>,
    cursor: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(k) = self.cursor {
                let e = &self.slots[k];
                self.cursor = e.next;
                self.remaining -= 1;
                return Some((e.key.as_str(), &e.value));
            }
            self.cursor = self.buckets.next()?.head;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, H> IntoIterator for &'a HashTable<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Walks chain links, yielding slot keys alongside entries.
struct Links<'a, V> {
    slots: &'a SlotMap<DefaultKey, Entry<V>>,
    cursor: Option<DefaultKey>,
}

impl<'a, V> Iterator for Links<'a, V> {
    type Item = (DefaultKey, &'a Entry<V>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let e = &self.slots[k];
        self.cursor = e.next;
        Some((k, e))
    }
}

impl<V, H> HashTable<V, H> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.num_buckets() as f64
    }
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: &self.slots,
            buckets: self.buckets.iter(),
            cursor: None,
            remaining: self.slots.len(),
        }
    }

    /// Chain stored in `bucket`, or `None` if the index is out of range.
    pub fn chain(&self, bucket: usize) -> Option<ChainIter<'_, V>> {
        self.buckets.get(bucket).map(|b| ChainIter {
            links: self.links(b.head),
        })
    }

    /// Drops every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        trace!(entries = self.len(), buckets = self.num_buckets(), "clearing table");
        self.slots.clear();
        self.buckets.fill(Bucket::default());
    }

    /// Consumes the table, dropping every entry and the bucket array.
    pub fn destroy(self) {
        trace!(entries = self.len(), buckets = self.num_buckets(), "destroying table");
        drop(self);
    }

    fn links(&self, head: Option<DefaultKey>) -> Links<'_, V> {
        Links {
            slots: &self.slots,
            cursor: head,
        }
    }
}

impl<V, H> HashTable<V, H>
where
    H: KeyHasher,
{
    /// Empty table with the default configuration and a custom hasher.
    pub fn with_hasher(hasher: H) -> Self {
        Self {
            hasher,
            // Fixed small default; allocated infallibly like any other Vec.
            buckets: vec![Bucket::default(); TableConfig::DEFAULT_INITIAL_BUCKETS],
            slots: SlotMap::with_key(),
            max_load_factor: TableConfig::DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: H) -> Result<Self, TableError> {
        config.validate()?;
        let buckets = alloc_buckets(config.initial_buckets)?;
        trace!(
            buckets = config.initial_buckets,
            max_load_factor = config.max_load_factor,
            "created table"
        );
        Ok(Self {
            hasher,
            buckets,
            slots: SlotMap::with_key(),
            max_load_factor: config.max_load_factor,
        })
    }

    /// Bucket that `key` maps to under the current bucket count.
    pub fn bucket_of(&self, key: &str) -> usize {
        bucket_index(self.hasher.hash_key(key), self.buckets.len())
    }

    fn find_slot(&self, key: &str, hash: i32) -> Option<DefaultKey> {
        let bucket = self.buckets[bucket_index(hash, self.buckets.len())];
        self.links(bucket.head)
            .find(|(_, e)| e.hash == hash && e.key == key)
            .map(|(k, _)| k)
    }

    pub fn find(&self, key: &str) -> Option<EntryHandle> {
        let hash = self.hasher.hash_key(key);
        self.find_slot(key, hash).map(EntryHandle)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let hash = self.hasher.hash_key(key);
        self.find_slot(key, hash).map(|k| &self.slots[k].value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let hash = self.hasher.hash_key(key);
        let k = self.find_slot(key, hash)?;
        self.slots.get_mut(k).map(|e| &mut e.value)
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its entry and gets the new value; the previous
    /// value is returned. A new key may first grow the table so that the
    /// load factor stays within the configured maximum, then joins the tail
    /// of its chain. Fails only when an allocation fails, in which case the
    /// key is not inserted.
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, TableError> {
        let hash = self.hasher.hash_key(key);
        if let Some(k) = self.find_slot(key, hash) {
            return Ok(Some(core::mem::replace(&mut self.slots[k].value, value)));
        }

        self.reserve_one()?;

        // Bucket count may have changed above.
        let index = bucket_index(hash, self.buckets.len());
        let key = own_key(key)?;
        let k = self.slots.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        push_back(&mut self.slots, &mut self.buckets[index], k);
        Ok(None)
    }

    /// Removes `key` and hands its value back. Never shrinks the table.
    pub fn delete(&mut self, key: &str) -> Option<V> {
        let hash = self.hasher.hash_key(key);
        let index = bucket_index(hash, self.buckets.len());

        let mut prev: Option<DefaultKey> = None;
        let mut cursor = self.buckets[index].head;
        while let Some(k) = cursor {
            let entry = &self.slots[k];
            if entry.hash == hash && entry.key == key {
                let next = entry.next;
                let bucket = &mut self.buckets[index];
                match prev {
                    Some(p) => self.slots[p].next = next,
                    None => bucket.head = next,
                }
                if bucket.tail == Some(k) {
                    bucket.tail = prev;
                }
                return self.slots.remove(k).map(|e| e.value);
            }
            prev = Some(k);
            cursor = entry.next;
        }
        None
    }

    /// Rebuilds the bucket array with `new_bucket_count` buckets.
    ///
    /// Entries are relinked in old-bucket order, head to tail, onto the tails
    /// of their new chains. The new array is allocated before any entry is
    /// touched, so a failed allocation leaves the table as it was.
    pub fn resize(&mut self, new_bucket_count: usize) -> Result<(), TableError> {
        if new_bucket_count < 1 {
            return Err(TableError::InvalidBucketCount {
                requested: new_bucket_count,
            });
        }
        let mut buckets = alloc_buckets(new_bucket_count)?;

        for bucket in &self.buckets {
            let mut cursor = bucket.head;
            while let Some(k) = cursor {
                let entry = &mut self.slots[k];
                cursor = entry.next.take();
                let index = bucket_index(entry.hash, new_bucket_count);
                push_back(&mut self.slots, &mut buckets[index], k);
            }
        }

        debug!(
            from = self.buckets.len(),
            to = new_bucket_count,
            entries = self.len(),
            "resized bucket array"
        );
        self.buckets = buckets;
        Ok(())
    }

    // Grows the bucket array, doubling as often as needed, so that one more
    // entry keeps the load factor within bounds.
    fn reserve_one(&mut self) -> Result<(), TableError> {
        let needed = self.len() + 1;
        let mut target = self.buckets.len();
        while exceeds(needed, target, self.max_load_factor) {
            target = match target.checked_mul(2) {
                Some(t) => t,
                None => {
                    warn!(buckets = self.buckets.len(), "bucket count overflow while growing");
                    return Err(TableError::AllocationFailure {
                        context: "growing bucket array",
                    });
                }
            };
        }
        if target != self.buckets.len() {
            self.resize(target)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::BTreeSet;

        let n = self.buckets.len();
        assert!(n >= 1, "table must have at least one bucket");
        let mut reachable = 0;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let mut keys = BTreeSet::new();
            let mut last = None;
            for (k, e) in self.links(bucket.head) {
                assert_eq!(e.hash, self.hasher.hash_key(&e.key), "stale cached hash");
                assert_eq!(bucket_index(e.hash, n), i, "entry in wrong bucket");
                assert!(keys.insert(e.key.as_str()), "duplicate key in chain");
                last = Some(k);
                reachable += 1;
            }
            assert_eq!(bucket.tail, last, "tail does not match last chain entry");
        }
        assert_eq!(reachable, self.slots.len(), "unreachable entries");
    }
}

impl<V: fmt::Debug, H> fmt::Debug for HashTable<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn exceeds(entries: usize, buckets: usize, max_load_factor: f64) -> bool {
    entries as f64 / buckets as f64 > max_load_factor
}

fn alloc_buckets(count: usize) -> Result<Vec<Bucket>, TableError> {
    let mut buckets = Vec::new();
    if buckets.try_reserve_exact(count).is_err() {
        warn!(buckets = count, "bucket array allocation failed");
        return Err(TableError::AllocationFailure {
            context: "allocating bucket array",
        });
    }
    buckets.resize(count, Bucket::default());
    Ok(buckets)
}

fn own_key(key: &str) -> Result<String, TableError> {
    let mut owned = String::new();
    if owned.try_reserve_exact(key.len()).is_err() {
        warn!(len = key.len(), "key allocation failed");
        return Err(TableError::AllocationFailure {
            context: "copying key",
        });
    }
    owned.push_str(key);
    Ok(owned)
}

fn push_back<V>(slots: &mut SlotMap<DefaultKey, Entry<V>>, bucket: &mut Bucket, k: DefaultKey) {
    slots[k].next = None;
    match bucket.tail {
        Some(t) => slots[t].next = Some(k),
        None => bucket.head = Some(k),
    }
    bucket.tail = Some(k);
}
