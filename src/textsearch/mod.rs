//! Multi-pattern substring search and relevance scoring for the
//! suggestion engine.

mod automaton;
pub mod scorer;

pub use automaton::{Find, MatcherBuilder, MultiPatternMatcher};
pub use scorer::{highlight_and_rank, Highlighted, HIGHLIGHT_END, HIGHLIGHT_START};
