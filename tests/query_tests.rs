mod common;

use kwsearch::{
    CancelToken, DiskIndex, IdfTable, IndexSource, KeywordIndex, LabelCatalog, Posting,
    QueryResolver, SearchError,
};
use std::path::Path;
use tempfile::tempdir;

fn memory_resolver(path: &Path) -> QueryResolver {
    QueryResolver::new(IndexSource::Memory(KeywordIndex::load(path).unwrap()))
}

fn pairs(postings: &[Posting]) -> Vec<(u32, f32)> {
    postings.iter().map(|p| (p.item, p.weight)).collect()
}

fn assert_ranked(actual: &[Posting], expected: &[(u32, f32)]) {
    assert_eq!(actual.len(), expected.len(), "got {:?}", pairs(actual));
    for (got, want) in actual.iter().zip(expected) {
        assert_eq!(got.item, want.0, "got {:?}", pairs(actual));
        assert!(
            (got.weight - want.1).abs() < 1e-6,
            "item {}: weight {} != {}",
            want.0,
            got.weight,
            want.1
        );
    }
}

#[test]
fn and_of_single_label_clauses_multiplies_weights() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(
        &path,
        &[
            (10, vec![(1, 0.5), (2, 0.3)]),
            (20, vec![(2, 0.4), (3, 0.1)]),
        ],
    );
    let resolver = memory_resolver(&path);

    let ranked = resolver
        .search(&[vec![10], vec![20]], &CancelToken::new())
        .unwrap()
        .unwrap();
    // only item 2 appears in both clauses; 0.3 * 0.4
    assert_ranked(&ranked, &[(2, 0.12)]);
}

#[test]
fn or_clause_unions_and_sums_weights() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(&path, &[(10, vec![(1, 0.5)]), (20, vec![(1, 0.2), (2, 0.3)])]);
    let resolver = memory_resolver(&path);

    let ranked = resolver
        .search(&[vec![10, 20]], &CancelToken::new())
        .unwrap()
        .unwrap();
    assert_ranked(&ranked, &[(1, 0.7), (2, 0.3)]);
}

#[test]
fn single_clause_returns_the_list_ranked() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(&path, &[(10, vec![(2, 0.3), (1, 0.5)])]);
    let resolver = memory_resolver(&path);

    let ranked = resolver
        .search(&[vec![10]], &CancelToken::new())
        .unwrap()
        .unwrap();
    assert_ranked(&ranked, &[(1, 0.5), (2, 0.3)]);
}

#[test]
fn empty_query_yields_no_results() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(&path, &[(10, vec![(1, 0.5)])]);
    let resolver = memory_resolver(&path);

    let ranked = resolver.search(&[], &CancelToken::new()).unwrap().unwrap();
    assert!(ranked.is_empty());
}

fn fixture(dir: &Path) -> (QueryResolver, LabelCatalog) {
    let index_path = dir.join("files.index");
    common::write_index_file(
        &index_path,
        &[
            (10, vec![(1, 0.5), (2, 0.3)]),
            (20, vec![(2, 0.4), (3, 0.1)]),
        ],
    );
    let labels_path = dir.join("classes.labels");
    common::write_labels_file(
        &labels_path,
        &[
            "10~101~cat~a small feline",
            "20~102~dog~a canine",
            "30~103~ghost~present in the catalog, absent from the index",
        ],
    );
    (
        memory_resolver(&index_path),
        LabelCatalog::load(&labels_path).unwrap(),
    )
}

#[test]
fn text_query_and_or_combination() {
    let dir = tempdir().unwrap();
    let (resolver, catalog) = fixture(dir.path());
    let token = CancelToken::new();

    let ranked = resolver.search_text("cat*dog", &catalog, &token).unwrap().unwrap();
    assert_ranked(&ranked, &[(2, 0.12)]);

    let ranked = resolver.search_text("cat+dog", &catalog, &token).unwrap().unwrap();
    assert_ranked(&ranked, &[(2, 0.7), (1, 0.5), (3, 0.1)]);

    // whitespace around terms is trimmed
    let ranked = resolver
        .search_text(" cat * dog ", &catalog, &token)
        .unwrap()
        .unwrap();
    assert_ranked(&ranked, &[(2, 0.12)]);
}

#[test]
fn trailing_empty_member_is_invalid_format() {
    let dir = tempdir().unwrap();
    let (resolver, catalog) = fixture(dir.path());

    let err = resolver
        .search_text("cat+", &catalog, &CancelToken::new())
        .unwrap_err();
    assert_eq!(err, SearchError::InvalidFormat("cat+".to_string()));
}

#[test]
fn unknown_label_is_reported_with_the_term() {
    let dir = tempdir().unwrap();
    let (resolver, catalog) = fixture(dir.path());

    let err = resolver
        .search_text("bird", &catalog, &CancelToken::new())
        .unwrap_err();
    assert_eq!(err, SearchError::InvalidLabel("bird".to_string()));
}

#[test]
fn catalog_only_labels_drop_silently_but_empty_groups_fail() {
    let dir = tempdir().unwrap();
    let (resolver, catalog) = fixture(dir.path());
    let token = CancelToken::new();

    // "ghost" exists in the catalog but has no posting list; alone in
    // its OR-group, the group empties out
    let err = resolver.search_text("ghost", &catalog, &token).unwrap_err();
    assert_eq!(err, SearchError::NotFound("ghost".to_string()));

    let err = resolver.search_text("ghost*cat", &catalog, &token).unwrap_err();
    assert_eq!(err, SearchError::NotFound("ghost".to_string()));

    // alongside an indexed label it just drops out of the group
    let ranked = resolver.search_text("cat+ghost", &catalog, &token).unwrap().unwrap();
    assert_ranked(&ranked, &[(1, 0.5), (2, 0.3)]);
}

#[test]
fn idf_factor_scales_weights_during_the_union() {
    let dir = tempdir().unwrap();
    let index_path = dir.path().join("files.index");
    common::write_index_file(&index_path, &[(0, vec![(1, 0.5)]), (1, vec![(1, 0.2), (2, 0.3)])]);
    let idf_path = dir.path().join("weights.idf");
    common::write_idf_file(&idf_path, &[1.0, 2.0]);

    let resolver = QueryResolver::with_idf(
        IndexSource::Memory(KeywordIndex::load(&index_path).unwrap()),
        IdfTable::load(&idf_path).unwrap(),
    );
    // idf[0] = ln(2/1)+1, idf[1] = ln(2/2)+1 = 1.0
    let idf0 = 2.0f32.ln() + 1.0;

    let ranked = resolver
        .search(&[vec![0, 1]], &CancelToken::new())
        .unwrap()
        .unwrap();
    assert_ranked(&ranked, &[(1, 0.5 * idf0 + 0.2), (2, 0.3)]);

    // IDF applies to singleton clauses as well
    let ranked = resolver
        .search(&[vec![0]], &CancelToken::new())
        .unwrap()
        .unwrap();
    assert_ranked(&ranked, &[(1, 0.5 * idf0)]);
}

#[test]
fn cancelled_query_returns_the_none_sentinel() {
    let dir = tempdir().unwrap();
    let (resolver, catalog) = fixture(dir.path());
    let token = CancelToken::new();
    token.cancel();

    assert!(resolver.search(&[vec![10], vec![20]], &token).unwrap().is_none());
    assert!(resolver
        .search_text("cat+dog", &catalog, &token)
        .unwrap()
        .is_none());
}

#[test]
fn disk_mode_matches_memory_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(
        &path,
        &[
            (10, vec![(1, 0.5), (2, 0.3)]),
            (20, vec![(2, 0.4), (3, 0.1)]),
        ],
    );
    let resolver = QueryResolver::new(IndexSource::Disk(DiskIndex::open(&path).unwrap()));
    let token = CancelToken::new();

    let ranked = resolver.search(&[vec![10], vec![20]], &token).unwrap().unwrap();
    assert_ranked(&ranked, &[(2, 0.12)]);

    let ranked = resolver.search(&[vec![10, 20]], &token).unwrap().unwrap();
    assert_ranked(&ranked, &[(2, 0.7), (1, 0.5), (3, 0.1)]);
}

#[test]
fn repeated_clauses_come_back_identical_from_the_cache() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("files.index");
    common::write_index_file(&path, &[(10, vec![(1, 0.5)]), (20, vec![(1, 0.2), (2, 0.3)])]);
    let resolver = memory_resolver(&path);
    let token = CancelToken::new();

    let first = resolver.search(&[vec![10, 20]], &token).unwrap().unwrap();
    let second = resolver.search(&[vec![10, 20]], &token).unwrap().unwrap();
    assert_eq!(pairs(&first), pairs(&second));
}
