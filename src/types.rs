use serde::{Deserialize, Serialize};

/// One weighted item association inside a posting list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub item: u32,
    /// Probability/relevance mass; results rank descending by weight.
    pub weight: f32,
}

/// One entry of the label dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Direct class id in the posting index, or -1 for hypernym-only
    /// labels that exist purely as a group of hyponyms.
    pub id: i32,
    /// Stable external key.
    pub synset_id: i32,
    /// All names, first is canonical.
    pub names: Vec<String>,
    /// Display/lookup name: `names` joined with ", " (4-field files
    /// carry the joined form verbatim).
    pub name: String,
    pub description: String,
    /// Child synset ids, empty if none.
    pub hyponyms: Vec<i32>,
    /// Parent synset ids, empty if none.
    pub hypernyms: Vec<i32>,
    /// min over `names` of the per-name word count; normalizes the
    /// suggestion score so short names outrank long ones.
    pub name_len_words: u32,
}

/// A single pattern hit reported by the multi-pattern matcher.
/// Offsets are in characters, matching what the highlighter consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub word: String,
    pub starts_at: u32,
}

/// Categorical boost for where a match starts relative to a label name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub enum NameBonus {
    None = 0,
    StartsWord = 1,
    StartsName = 2,
    StartsNameAlone = 4,
    FullName = 5,
    FullNameAlone = 10,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    pub name_hits: u8,
    pub description_hits: u8,
    pub bonus: NameBonus,
}

/// One row of the suggestion popup. Transient: built per request,
/// discarded after rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub synset_id: i32,
    pub is_hypernym: bool,
    /// Text to place into the query box when picked: the preserved
    /// prefix plus the label name (or `+`-joined hyponym names for a
    /// hypernym-only label).
    pub searchable_text: String,
    /// Label name with `$~START~$`/`$~END~$` highlight tags around hits.
    pub name: String,
    /// Description, highlighted the same way.
    pub description: String,
    pub name_len_words: u32,
    pub relevance: Relevance,
}

impl SuggestionItem {
    /// Length-normalized relevance used for ranking, higher is better.
    pub fn score(&self) -> f32 {
        let name_part = (self.relevance.bonus as i32 + self.relevance.name_hits as i32) * 2;
        name_part as f32 / self.name_len_words as f32 + self.relevance.description_hits as f32
    }
}
