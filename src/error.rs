use std::error::Error;
use std::fmt::{self, Display};

/// Typed errors surfaced to callers of the query and suggestion engines.
///
/// Cancellation is not represented here: a cancelled operation returns
/// the `None` sentinel from its entry point instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed label/index/IDF file. Fatal to that load.
    Format(String),
    /// Malformed query text, e.g. an empty term between separators.
    InvalidFormat(String),
    /// The query names a label absent from the catalog.
    InvalidLabel(String),
    /// An OR-group matched no posting lists at all.
    NotFound(String),
    /// Catalog or index is still loading; retry on a later keystroke.
    NotLoaded,
    /// A load failed earlier or an I/O error hit mid-query; repeated
    /// queries keep resurfacing the same message.
    Internal(String),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Format(s) => write!(f, "invalid file format: {}", s),
            SearchError::InvalidFormat(s) => write!(f, "input '{}' is incorrectly formatted", s),
            SearchError::InvalidLabel(s) => write!(f, "label '{}' does not exist", s),
            SearchError::NotFound(s) => write!(f, "no items of '{}' found", s),
            SearchError::NotLoaded => write!(f, "labels or index not loaded yet"),
            SearchError::Internal(s) => write!(f, "{}", s),
        }
    }
}

impl Error for SearchError {}

impl From<anyhow::Error> for SearchError {
    fn from(e: anyhow::Error) -> Self {
        SearchError::Internal(e.to_string())
    }
}

/// Message category handed to the caller's `on_message` callback; the
/// UI layer maps each kind to its own rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Exception,
    NotFound,
    InvalidLabel,
    InvalidFormat,
    ResourcesNotLoadedYet,
}

impl SearchError {
    pub fn message_kind(&self) -> MessageKind {
        match self {
            SearchError::Format(_) | SearchError::Internal(_) => MessageKind::Exception,
            SearchError::InvalidFormat(_) => MessageKind::InvalidFormat,
            SearchError::InvalidLabel(_) => MessageKind::InvalidLabel,
            SearchError::NotFound(_) => MessageKind::NotFound,
            SearchError::NotLoaded => MessageKind::ResourcesNotLoadedYet,
        }
    }
}
