//! Typeahead suggestions: substring-match the tail of the typed query
//! against every label's name and description, highlight the hits, and
//! rank by length-normalized relevance.

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::catalog::LabelCatalog;
use crate::textsearch::{highlight_and_rank, MatcherBuilder};
use crate::types::{Occurrence, Relevance, SuggestionItem};

pub struct SuggestionEngine {
    catalog: Arc<LabelCatalog>,
}

impl SuggestionEngine {
    pub fn new(catalog: Arc<LabelCatalog>) -> Self {
        SuggestionEngine { catalog }
    }

    /// Suggestions for the typed text, best first. Only the tail after
    /// the last `+`/`*` is searched; everything up to and including
    /// that separator is preserved verbatim in each suggestion's
    /// `searchable_text`. Returns `None` when cancelled mid-scan,
    /// `Some(empty)` when the search tail is empty.
    pub fn suggest(&self, filter: &str, token: &CancelToken) -> Option<Vec<SuggestionItem>> {
        let tail_start = filter
            .rfind(|c| c == '+' || c == '*')
            .map(|i| i + 1)
            .unwrap_or(0);
        let (keep, tail) = filter.split_at(tail_start);
        let needle = tail.trim();
        if needle.is_empty() {
            return Some(Vec::new());
        }

        let mut builder = MatcherBuilder::new();
        builder.add(needle);
        let matcher = builder.build();

        let mut items = Vec::new();
        for label in self.catalog.labels() {
            if token.is_cancelled() {
                return None;
            }

            let name_hits: Vec<Occurrence> = matcher.find(&label.name).collect();
            let description_hits: Vec<Occurrence> = matcher.find(&label.description).collect();
            if name_hits.is_empty() && description_hits.is_empty() {
                continue;
            }

            let name = highlight_and_rank(name_hits, &label.name);
            let description = highlight_and_rank(description_hits, &label.description);

            let is_hypernym = label.id == -1;
            let searchable_text = if is_hypernym {
                // a hypernym-only label stands for the OR of its
                // children, so picking it types out all of them
                let hyponym_names: Vec<&str> = label
                    .hyponyms
                    .iter()
                    .filter_map(|&id| self.catalog.lookup_synset(id))
                    .map(|l| l.names[0].as_str())
                    .collect();
                format!("{}{}", keep, hyponym_names.join("+"))
            } else {
                format!("{}{}", keep, label.name)
            };

            items.push(SuggestionItem {
                synset_id: label.synset_id,
                is_hypernym,
                searchable_text,
                name: name.text,
                description: description.text,
                name_len_words: label.name_len_words,
                relevance: Relevance {
                    name_hits: name.hits,
                    description_hits: description.hits,
                    bonus: name.bonus,
                },
            });
        }

        if token.is_cancelled() {
            return None;
        }
        items.sort_by(|a, b| b.score().total_cmp(&a.score()));
        Some(items)
    }
}
