//! Ranked keyword search over a precomputed binary index of weighted
//! item postings, plus typeahead label suggestions.
//!
//! Two engines make up the crate. [`query::QueryResolver`] answers
//! boolean-ish keyword queries (`a+b*c` — `+` unions postings summing
//! weights, `*` intersects clauses multiplying weights) against a
//! posting-list index loaded either fully into memory or lazily through
//! a bounded cache. [`suggest::SuggestionEngine`] answers "which labels
//! contain this substring" while the user types, with highlighting and
//! length-normalized relevance ranking.

pub mod cancel;
pub mod catalog;
pub mod error;
pub mod index;
pub mod load;
pub mod provider;
pub mod query;
pub mod suggest;
pub mod textsearch;
pub mod types;

pub use crate::cancel::CancelToken;
pub use crate::catalog::LabelCatalog;
pub use crate::error::{MessageKind, SearchError};
pub use crate::index::{DiskIndex, IdfTable, IndexReader, KeywordIndex, PostingCache};
pub use crate::load::{Background, LoadState};
pub use crate::provider::{SearchProvider, SuggestionProvider};
pub use crate::query::{IndexSource, QueryResolver};
pub use crate::suggest::SuggestionEngine;
pub use crate::textsearch::{MatcherBuilder, MultiPatternMatcher};
pub use crate::types::{Label, NameBonus, Occurrence, Posting, Relevance, SuggestionItem};

/// Convenience: start loading a label catalog on a background thread.
pub fn load_catalog(path: impl AsRef<std::path::Path>) -> Background<LabelCatalog> {
    let path = path.as_ref().to_path_buf();
    Background::spawn(move || LabelCatalog::load(&path))
}
