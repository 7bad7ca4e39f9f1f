mod common;

use kwsearch::index::{PostingCache, CACHE_CAPACITY};
use kwsearch::{DiskIndex, IdfTable, IndexReader, KeywordIndex, Posting};
use std::sync::Arc;
use tempfile::tempdir;

fn pairs(postings: &[Posting]) -> Vec<(u32, f32)> {
    postings.iter().map(|p| (p.item, p.weight)).collect()
}

#[test]
fn sequential_load_round_trips_every_class() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    let classes = vec![
        (3, vec![(1u32, 0.5f32), (2, 0.25)]),
        (7, vec![(9, 0.125)]),
        (11, vec![]),
    ];
    common::write_index_file(&path, &classes);

    let index = KeywordIndex::load(&path).unwrap();
    assert_eq!(index.len(), 3);
    for (class_id, expected) in &classes {
        let postings = index.postings(*class_id).unwrap();
        assert_eq!(&pairs(&postings), expected, "class {}", class_id);
    }
    assert!(!index.contains(42));
    assert!(index.postings(42).is_none());
}

#[test]
fn random_access_reads_single_classes_on_demand() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    let classes = vec![(3, vec![(1u32, 0.5f32), (2, 0.25)]), (7, vec![(9, 0.125)])];
    common::write_index_file(&path, &classes);

    let reader = IndexReader::open(&path).unwrap();
    assert!(reader.contains(7));
    let postings = reader.read_postings(7).unwrap().unwrap();
    assert_eq!(pairs(&postings), vec![(9, 0.125)]);
    assert!(reader.read_postings(42).unwrap().is_none());
}

#[test]
fn empty_index_sentinel_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    std::fs::write(&path, (-1i64).to_le_bytes()).unwrap();

    let index = KeywordIndex::load(&path).unwrap();
    assert!(index.is_empty());

    let reader = IndexReader::open(&path).unwrap();
    assert!(!reader.contains(1));
}

#[test]
fn bad_magic_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    std::fs::write(&path, b"GARBAGE!rest of the file").unwrap();

    let err = KeywordIndex::load(&path).unwrap_err();
    assert!(err.to_string().contains("invalid index file format"));
    assert!(IndexReader::open(&path).is_err());
}

#[test]
fn block_start_missing_from_offset_table_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    let mut bytes = common::index_bytes(&[(3, vec![(1, 0.5)])]);
    // shift the recorded block offset by one byte so the real block
    // start is no longer present in the table
    let recorded = i32::from_le_bytes(bytes[12..16].try_into().unwrap());
    bytes[12..16].copy_from_slice(&(recorded + 1).to_le_bytes());
    std::fs::write(&path, bytes).unwrap();

    let err = KeywordIndex::load(&path).unwrap_err();
    assert!(err.to_string().contains("missing from offset table"));
}

#[test]
fn truncation_mid_field_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    let bytes = common::index_bytes(&[(3, vec![(1, 0.5), (2, 0.25)])]);
    std::fs::write(&path, &bytes[..bytes.len() - 4]).unwrap();

    let err = KeywordIndex::load(&path).unwrap_err();
    assert!(err.to_string().contains("unexpected end of index file"));

    let reader = IndexReader::open(&path).unwrap();
    assert!(reader.read_postings(3).is_err());
}

#[test]
fn posting_cache_stays_bounded_under_random_eviction() {
    let cache = PostingCache::new();
    let inserts = CACHE_CAPACITY + 5;
    for class_id in 0..inserts as i32 {
        cache
            .get_or_load(class_id, || {
                Ok(Some(vec![Posting {
                    item: class_id as u32,
                    weight: 1.0,
                }]))
            })
            .unwrap();
        assert!(cache.len() <= CACHE_CAPACITY);
    }
    // something had to go to make room
    assert!(cache.len() < inserts);
}

#[test]
fn disk_index_caches_decoded_lists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(&path, &[(3, vec![(1, 0.5)])]);

    let index = DiskIndex::open(&path).unwrap();
    let first = index.postings(3).unwrap().unwrap();
    let second = index.postings(3).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(index.cache().len(), 1);
    assert!(index.postings(42).unwrap().is_none());
}

#[test]
fn idf_values_are_rescaled_against_the_maximum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.idf");
    common::write_idf_file(&path, &[1.0, 2.0, 4.0]);

    let idf = IdfTable::load(&path).unwrap();
    assert_eq!(idf.len(), 3);
    assert!((idf.weight(0) - (4.0f32.ln() + 1.0)).abs() < 1e-6);
    assert!((idf.weight(1) - (2.0f32.ln() + 1.0)).abs() < 1e-6);
    assert!((idf.weight(2) - 1.0).abs() < 1e-6);
    // ids outside the table weigh neutrally
    assert_eq!(idf.weight(17), 1.0);
    assert_eq!(idf.weight(-1), 1.0);
}

#[test]
fn idf_header_mismatch_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.idf");
    common::write_idf_file(&path, &[1.0]);
    let mut bytes = std::fs::read(&path).unwrap();
    bytes[0] = b'X';
    std::fs::write(&path, bytes).unwrap();

    let err = IdfTable::load(&path).unwrap_err();
    assert!(err.to_string().contains("header mismatch"));
}
