use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

use super::parse::parse_filter;
use crate::cancel::CancelToken;
use crate::catalog::LabelCatalog;
use crate::error::SearchError;
use crate::index::{ClauseCache, DiskIndex, IdfTable, KeywordIndex, PostingList};
use crate::types::Posting;

/// Where posting lists come from: the fully-loaded in-memory index, or
/// the random-access reader behind its bounded cache.
pub enum IndexSource {
    Memory(KeywordIndex),
    Disk(DiskIndex),
}

impl IndexSource {
    pub fn contains(&self, class_id: i32) -> bool {
        match self {
            IndexSource::Memory(idx) => idx.contains(class_id),
            IndexSource::Disk(idx) => idx.contains(class_id),
        }
    }

    fn postings(&self, class_id: i32) -> Result<Option<Arc<PostingList>>> {
        match self {
            IndexSource::Memory(idx) => Ok(idx.postings(class_id)),
            IndexSource::Disk(idx) => idx.postings(class_id),
        }
    }
}

/// A clause after its OR-union. Singleton clauses borrow the posting
/// list as-is instead of materializing a weight map.
enum ResolvedClause {
    Single(Arc<PostingList>),
    Combined(Arc<HashMap<u32, f32>>),
}

/// Intersection accumulator: starts out borrowing a resolved clause,
/// owns its map after the first intersection step.
enum Acc {
    Shared(Arc<HashMap<u32, f32>>),
    Owned(HashMap<u32, f32>),
}

impl Acc {
    fn get(&self, item: u32) -> Option<f32> {
        match self {
            Acc::Shared(map) => map.get(&item).copied(),
            Acc::Owned(map) => map.get(&item).copied(),
        }
    }
}

/// Resolves queries over one index source: per-clause OR-union summing
/// weights (times the label's IDF factor when a table is configured),
/// cross-clause AND-intersection multiplying weights, ranked output.
pub struct QueryResolver {
    source: IndexSource,
    idf: Option<IdfTable>,
    clause_cache: ClauseCache,
}

impl QueryResolver {
    pub fn new(source: IndexSource) -> Self {
        QueryResolver {
            source,
            idf: None,
            clause_cache: ClauseCache::new(),
        }
    }

    pub fn with_idf(source: IndexSource, idf: IdfTable) -> Self {
        QueryResolver {
            source,
            idf: Some(idf),
            clause_cache: ClauseCache::new(),
        }
    }

    /// String front door: parse `filter`, drop label ids the index has
    /// no postings for, fail an OR-group that empties out, then rank.
    /// `Ok(None)` means the query was cancelled.
    pub fn search_text(
        &self,
        filter: &str,
        catalog: &LabelCatalog,
        token: &CancelToken,
    ) -> Result<Option<Vec<Posting>>, SearchError> {
        let parsed = parse_filter(filter, catalog)?;
        let mut clauses: Vec<Vec<i32>> = Vec::with_capacity(parsed.len());
        for clause in parsed {
            let ids: Vec<i32> = clause
                .ids
                .into_iter()
                .filter(|&id| self.source.contains(id))
                .collect();
            if ids.is_empty() {
                return Err(SearchError::NotFound(clause.text.trim().to_string()));
            }
            clauses.push(ids);
        }
        self.search(&clauses, token).map_err(SearchError::from)
    }

    /// Structural entry point for pre-parsed queries: a list of
    /// OR-clauses to intersect. Ids without postings contribute
    /// nothing. `Ok(None)` means the query was cancelled.
    pub fn search(
        &self,
        clauses: &[Vec<i32>],
        token: &CancelToken,
    ) -> Result<Option<Vec<Posting>>> {
        if clauses.is_empty() {
            return Ok(Some(Vec::new()));
        }
        let mut resolved = Vec::with_capacity(clauses.len());
        for ids in clauses {
            match self.resolve_clause(ids, token)? {
                Some(clause) => resolved.push(clause),
                None => return Ok(None),
            }
        }
        Ok(self.intersect(resolved, token))
    }

    /// OR-union of one clause. A singleton clause reuses its posting
    /// list by reference — unless IDF weighting applies, which has to
    /// rescale every weight and therefore always builds a map.
    fn resolve_clause(
        &self,
        ids: &[i32],
        token: &CancelToken,
    ) -> Result<Option<ResolvedClause>> {
        if ids.len() == 1 && self.idf.is_none() {
            return match self.source.postings(ids[0])? {
                Some(list) => Ok(Some(ResolvedClause::Single(list))),
                None => Ok(Some(ResolvedClause::Combined(Arc::new(HashMap::new())))),
            };
        }

        if let Some(cached) = self.clause_cache.get(ids) {
            return Ok(Some(ResolvedClause::Combined(cached)));
        }

        let mut union: HashMap<u32, f32> = HashMap::new();
        for &id in ids {
            let Some(list) = self.source.postings(id)? else {
                continue;
            };
            let factor = self.idf.as_ref().map_or(1.0, |t| t.weight(id));
            for posting in list.iter() {
                if token.is_cancelled() {
                    return Ok(None);
                }
                *union.entry(posting.item).or_insert(0.0) += posting.weight * factor;
            }
        }
        let union = Arc::new(union);
        self.clause_cache.put(ids.to_vec(), union.clone());
        Ok(Some(ResolvedClause::Combined(union)))
    }

    /// AND-intersection across resolved clauses: keep items present in
    /// every clause, multiplying their weights, then rank descending.
    fn intersect(
        &self,
        mut clauses: Vec<ResolvedClause>,
        token: &CancelToken,
    ) -> Option<Vec<Posting>> {
        if clauses.len() == 1 {
            let ranked = match clauses.pop().unwrap() {
                ResolvedClause::Single(list) => (*list).clone(),
                ResolvedClause::Combined(map) => map
                    .iter()
                    .map(|(&item, &weight)| Posting { item, weight })
                    .collect(),
            };
            return rank(ranked, token);
        }

        // start from a clause that is already a map when one exists,
        // otherwise materialize the last singleton list
        let start = clauses
            .iter()
            .position(|c| matches!(c, ResolvedClause::Combined(_)))
            .unwrap_or(clauses.len() - 1);
        let mut acc = match clauses.swap_remove(start) {
            ResolvedClause::Combined(map) => Acc::Shared(map),
            ResolvedClause::Single(list) => Acc::Owned(
                list.iter().map(|p| (p.item, p.weight)).collect(),
            ),
        };

        for clause in clauses {
            let mut narrowed: HashMap<u32, f32> = HashMap::new();
            match clause {
                ResolvedClause::Single(list) => {
                    for posting in list.iter() {
                        if token.is_cancelled() {
                            return None;
                        }
                        if let Some(weight) = acc.get(posting.item) {
                            narrowed.insert(posting.item, weight * posting.weight);
                        }
                    }
                }
                ResolvedClause::Combined(map) => {
                    for (&item, &clause_weight) in map.iter() {
                        if token.is_cancelled() {
                            return None;
                        }
                        if let Some(weight) = acc.get(item) {
                            narrowed.insert(item, weight * clause_weight);
                        }
                    }
                }
            }
            acc = Acc::Owned(narrowed);
        }

        let ranked: Vec<Posting> = match acc {
            Acc::Owned(map) => map
                .into_iter()
                .map(|(item, weight)| Posting { item, weight })
                .collect(),
            Acc::Shared(map) => map
                .iter()
                .map(|(&item, &weight)| Posting { item, weight })
                .collect(),
        };
        rank(ranked, token)
    }
}

fn rank(mut postings: Vec<Posting>, token: &CancelToken) -> Option<Vec<Posting>> {
    if token.is_cancelled() {
        return None;
    }
    postings.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    Some(postings)
}
