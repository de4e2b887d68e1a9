// HashTable integration suite.
//
// Each test documents the behavior verified through the public API. Core
// invariants exercised:
// - Lookup: every present key yields exactly the value last stored for it.
// - Updates: re-inserting a key replaces its value without growing len.
// - Deletion: returns the value, leaves other keys alone, never shrinks.
// - Growth: load factor stays within bounds after inserts; values survive.
// - Ownership: the table drops values only for entries it releases, and
//   hands values back on delete/replace.
use chain_table::{ErrorKind, HashTable, KeyHasher, Polynomial31, TableConfig, TableError};
use std::collections::BTreeMap;
use std::rc::Rc;

// Test: the worked growth example.
// Verifies: three keys fit in four buckets; the fourth doubles the array.
#[test]
fn growth_example() {
    let mut t = HashTable::create(4).unwrap();
    t.insert("a", 1).unwrap();
    t.insert("b", 2).unwrap();
    t.insert("c", 3).unwrap();
    assert_eq!(t.len(), 3);
    assert_eq!(t.num_buckets(), 4);

    t.insert("d", 4).unwrap();
    assert_eq!(t.num_buckets(), 8);
    assert_eq!(t.get("a"), Some(&1));
}

// Test: argument validation at construction and resize.
// Verifies: zero buckets and bad load factors are InvalidArgument errors.
#[test]
fn invalid_arguments_rejected() {
    let err = HashTable::<i32>::create(0).unwrap_err();
    assert_eq!(err, TableError::InvalidBucketCount { requested: 0 });
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = HashTable::<i32>::with_config(TableConfig::new().with_max_load_factor(0.0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let mut t: HashTable<i32> = HashTable::create(1).unwrap();
    assert_eq!(
        t.resize(0),
        Err(TableError::InvalidBucketCount { requested: 0 })
    );
    assert_eq!(t.num_buckets(), 1);
}

// Test: an impossible bucket array is an allocation failure, not a panic.
// Verifies: table contents and bucket count are unchanged afterwards.
#[test]
fn oversized_resize_reports_allocation_failure() {
    let mut t = HashTable::create(2).unwrap();
    t.insert("x", 1).unwrap();
    let err = t.resize(usize::MAX).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AllocationFailure);
    assert_eq!(t.num_buckets(), 2);
    assert_eq!(t.get("x"), Some(&1));
}

// Test: distinct inserts, then mixed updates and deletes.
// Verifies: len tracks distinct keys; updates return the previous value.
#[test]
fn len_tracks_distinct_keys() {
    let mut t = HashTable::create(1).unwrap();
    for i in 0..500 {
        assert_eq!(t.insert(&format!("sym{i}"), i).unwrap(), None);
        assert!(t.load_factor() <= 0.75);
    }
    assert_eq!(t.len(), 500);

    for i in 0..500 {
        assert_eq!(t.insert(&format!("sym{i}"), -i).unwrap(), Some(i));
    }
    assert_eq!(t.len(), 500);

    for i in (0..500).step_by(2) {
        assert_eq!(t.delete(&format!("sym{i}")), Some(-i));
    }
    assert_eq!(t.len(), 250);
    for i in 0..500 {
        let expected = if i % 2 == 0 { None } else { Some(-i) };
        assert_eq!(t.get(&format!("sym{i}")).copied(), expected);
    }
}

// Test: deletion never shrinks the bucket array.
#[test]
fn delete_does_not_shrink() {
    let mut t = HashTable::create(1).unwrap();
    for i in 0..64 {
        t.insert(&i.to_string(), i).unwrap();
    }
    let buckets = t.num_buckets();
    for i in 0..64 {
        t.delete(&i.to_string());
    }
    assert!(t.is_empty());
    assert_eq!(t.num_buckets(), buckets);
    assert_eq!(t.delete("0"), None);
}

// Test: keys compare exactly.
// Verifies: case, whitespace and the empty key are all distinct keys.
#[test]
fn keys_are_exact_and_case_sensitive() {
    let mut t = HashTable::new();
    for k in ["label", "Label", "LABEL", "label ", ""] {
        t.insert(k, k.to_string()).unwrap();
    }
    assert_eq!(t.len(), 5);
    assert_eq!(t.get("Label").map(String::as_str), Some("Label"));
    assert_eq!(t.get("").map(String::as_str), Some(""));
    assert_eq!(t.get("label  "), None);
}

// Test: explicit pre-sizing and shrinking.
// Verifies: num_buckets equals the request and every value survives.
#[test]
fn resize_preserves_contents() {
    let mut t = HashTable::new();
    for i in 0..40 {
        t.insert(&format!("k{i}"), i * 3).unwrap();
    }
    for n in [1, 7, 1000, 3] {
        t.resize(n).unwrap();
        assert_eq!(t.num_buckets(), n);
        assert_eq!(t.len(), 40);
        for i in 0..40 {
            assert_eq!(t.get(&format!("k{i}")), Some(&(i * 3)));
        }
    }
}

// Test: clear then reuse.
// Verifies: every previous key is absent and len is zero; buckets kept.
#[test]
fn clear_then_reuse() {
    let mut t = HashTable::create(8).unwrap();
    for i in 0..20 {
        t.insert(&format!("k{i}"), i).unwrap();
    }
    let buckets = t.num_buckets();
    t.clear();
    assert_eq!(t.len(), 0);
    assert_eq!(t.num_buckets(), buckets);
    for i in 0..20 {
        assert!(t.get(&format!("k{i}")).is_none());
    }
    t.insert("again", 1).unwrap();
    assert_eq!(t.iter().collect::<Vec<_>>(), vec![("again", &1)]);
}

// Test: value ownership with reference-counted payloads.
// Assumes: the table holds exactly one strong count per stored clone.
// Verifies: replace/delete hand values back; clear and destroy release
// whatever is still stored.
#[test]
fn values_released_with_entries() {
    let payload = Rc::new("symbol record");
    let mut t = HashTable::create(2).unwrap();
    t.insert("a", payload.clone()).unwrap();
    t.insert("b", payload.clone()).unwrap();
    t.insert("c", payload.clone()).unwrap();
    assert_eq!(Rc::strong_count(&payload), 4);

    let old = t.insert("a", payload.clone()).unwrap().expect("replaced");
    assert_eq!(Rc::strong_count(&payload), 5);
    drop(old);
    assert_eq!(Rc::strong_count(&payload), 4);

    let removed = t.delete("b").expect("present");
    assert!(Rc::ptr_eq(&removed, &payload));
    drop(removed);
    assert_eq!(Rc::strong_count(&payload), 3);

    t.clear();
    assert_eq!(Rc::strong_count(&payload), 1);

    t.insert("d", payload.clone()).unwrap();
    t.insert("e", payload.clone()).unwrap();
    assert_eq!(Rc::strong_count(&payload), 3);
    t.destroy();
    assert_eq!(Rc::strong_count(&payload), 1);
}

// Test: the table as a symbol table over caller-owned records.
// Assumes: records outlive the table (enforced by the borrow checker).
// Verifies: stored references point at the caller's records.
#[test]
fn symbol_table_of_borrowed_records() {
    #[derive(Debug, PartialEq)]
    struct Symbol {
        address: u32,
        global: bool,
    }

    let records = vec![
        ("main", Symbol { address: 0x1000, global: true }),
        ("loop", Symbol { address: 0x1010, global: false }),
        ("exit", Symbol { address: 0x1040, global: false }),
    ];

    let mut table: HashTable<&Symbol> = HashTable::create(2).unwrap();
    for (name, sym) in &records {
        table.insert(name, sym).unwrap();
    }
    let main = table.get("main").copied().expect("defined");
    assert!(std::ptr::eq(main, &records[0].1));
    assert_eq!(main.address, 0x1000);
    assert!(main.global);
    assert_eq!(table.get("loop").map(|s| s.address), Some(0x1010));
    assert_eq!(table.get("undefined"), None);
}

// Test: present-but-empty values.
// Verifies: with V = Option<T>, an explicit None is distinguishable from a
// missing key.
#[test]
fn explicit_empty_value_differs_from_absent() {
    let mut t: HashTable<Option<u32>> = HashTable::new();
    t.insert("forward_ref", None).unwrap();
    assert_eq!(t.get("forward_ref"), Some(&None));
    assert_eq!(t.get("unknown"), None);

    t.insert("forward_ref", Some(0x2000)).unwrap();
    assert_eq!(t.get("forward_ref"), Some(&Some(0x2000)));
}

// Test: handles across growth, update and deletion.
// Verifies: a handle keeps resolving while its entry lives, and never
// resolves to a different entry afterwards.
#[test]
fn entry_handles() {
    let mut t = HashTable::create(1).unwrap();
    t.insert("label", 0u32).unwrap();
    let h = t.find("label").expect("present");

    for i in 0..50 {
        t.insert(&format!("other{i}"), i).unwrap();
    }
    t.insert("label", 7).unwrap();
    assert_eq!(h.value(&t), Some(&7));
    assert_eq!(h.key(&t), Some("label"));

    *h.value_mut(&mut t).unwrap() = 9;
    assert_eq!(t.get("label"), Some(&9));

    t.delete("label");
    t.insert("label", 11).unwrap();
    assert!(h.value(&t).is_none());
    assert_ne!(t.find("label"), Some(h));
    assert!(t.find("missing").is_none());
}

// Test: chain inspection agrees with bucket_of and the default hash.
#[test]
fn chain_inspection() {
    let mut t = HashTable::create(8).unwrap();
    // "Aa" and "BB" share a polynomial hash; "Ab" does not.
    t.insert("Aa", 1).unwrap();
    t.insert("BB", 2).unwrap();
    t.insert("Ab", 3).unwrap();
    assert_eq!(Polynomial31.hash_key("Aa"), 2112);

    let b = t.bucket_of("Aa");
    assert_eq!(b, 2112 % 8);
    assert_eq!(t.bucket_of("BB"), b);
    let chain: Vec<_> = t.chain(b).unwrap().collect();
    assert_eq!(chain, vec![("Aa", &1), ("BB", &2)]);

    let other: Vec<_> = t.chain(t.bucket_of("Ab")).unwrap().collect();
    assert_eq!(other, vec![("Ab", &3)]);
    assert!(t.chain(8).is_none());
}

// Test: iteration and Debug output.
// Verifies: iteration yields each pair exactly once.
#[test]
fn iteration_and_debug() {
    let mut t = HashTable::new();
    let mut expected = BTreeMap::new();
    for i in 0..30 {
        let k = format!("k{i:02}");
        t.insert(&k, i).unwrap();
        expected.insert(k, i);
    }
    let seen: BTreeMap<String, i32> = t.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    assert_eq!(seen, expected);

    let mut single = HashTable::create(1).unwrap();
    single.insert("only", 'x').unwrap();
    assert_eq!(format!("{single:?}"), r#"{"only": 'x'}"#);
}

// Test: a user-supplied hasher drives bucket placement.
#[test]
fn custom_hasher() {
    #[derive(Default)]
    struct LengthHash;
    impl KeyHasher for LengthHash {
        fn hash_key(&self, key: &str) -> i32 {
            key.len() as i32
        }
    }

    let config = TableConfig::new().with_initial_buckets(16);
    let mut t = HashTable::with_config_and_hasher(config, LengthHash).unwrap();
    t.insert("ab", 1).unwrap();
    t.insert("cd", 2).unwrap();
    t.insert("efg", 3).unwrap();
    assert_eq!(t.bucket_of("zz"), 2);
    assert_eq!(t.chain(2).unwrap().count(), 2);
    assert_eq!(t.chain(3).unwrap().count(), 1);
    assert_eq!(t.get("cd"), Some(&2));

    let d: HashTable<u8, LengthHash> = HashTable::with_hasher(LengthHash);
    assert_eq!(d.num_buckets(), TableConfig::DEFAULT_INITIAL_BUCKETS);
    assert_eq!(d.max_load_factor(), TableConfig::DEFAULT_MAX_LOAD_FACTOR);
}
