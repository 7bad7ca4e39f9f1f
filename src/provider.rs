//! Callback front doors for the two engines. A provider checks that its
//! resources finished loading, cancels the request it supersedes, runs
//! the engine on a worker thread, and delivers through plain callbacks
//! so the core never references a UI framework.
//!
//! Ordering contract: a new request cancels the previous in-flight one,
//! and a cancelled worker simply never calls `on_ready`, so only the
//! most recent request can reach the caller.

use parking_lot::Mutex;
use std::thread;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::catalog::LabelCatalog;
use crate::error::{MessageKind, SearchError};
use crate::load::{Background, LoadState};
use crate::query::QueryResolver;
use crate::suggest::SuggestionEngine;
use crate::types::{Posting, SuggestionItem};

/// Typeahead front door over a background-loaded catalog.
pub struct SuggestionProvider {
    catalog: Background<LabelCatalog>,
    inflight: Mutex<Option<CancelToken>>,
}

impl SuggestionProvider {
    pub fn new(catalog: Background<LabelCatalog>) -> Self {
        SuggestionProvider {
            catalog,
            inflight: Mutex::new(None),
        }
    }

    /// Cancel the current in-flight request, if any.
    pub fn cancel(&self) {
        if let Some(token) = &*self.inflight.lock() {
            token.cancel();
        }
    }

    /// Start a suggestion scan for `filter`. The previous request is
    /// cancelled first. `on_ready` receives the ranked items together
    /// with the filter they were computed for, so the caller can drop
    /// results that no longer match its input box.
    pub fn request<R, M>(&self, filter: &str, on_ready: R, on_message: M) -> CancelToken
    where
        R: FnOnce(Vec<SuggestionItem>, String) + Send + 'static,
        M: FnOnce(MessageKind, String) + Send + 'static,
    {
        let token = CancelToken::new();
        if let Some(previous) = self.inflight.lock().replace(token.clone()) {
            previous.cancel();
        }

        match self.catalog.state() {
            LoadState::Failed(message) => {
                on_message(MessageKind::Exception, message);
            }
            LoadState::Loading => {
                on_message(
                    MessageKind::ResourcesNotLoadedYet,
                    SearchError::NotLoaded.to_string(),
                );
            }
            LoadState::Ready(catalog) => {
                let filter = filter.to_string();
                let worker_token = token.clone();
                thread::spawn(move || {
                    let engine = SuggestionEngine::new(catalog);
                    match engine.suggest(&filter, &worker_token) {
                        Some(items) => on_ready(items, filter),
                        None => debug!(filter = %filter, "suggestion scan cancelled"),
                    }
                });
            }
        }
        token
    }
}

/// Ranked-search front door over a background-loaded catalog and index.
pub struct SearchProvider {
    catalog: Background<LabelCatalog>,
    resolver: Background<QueryResolver>,
    inflight: Mutex<Option<CancelToken>>,
}

impl SearchProvider {
    pub fn new(catalog: Background<LabelCatalog>, resolver: Background<QueryResolver>) -> Self {
        SearchProvider {
            catalog,
            resolver,
            inflight: Mutex::new(None),
        }
    }

    pub fn cancel(&self) {
        if let Some(token) = &*self.inflight.lock() {
            token.cancel();
        }
    }

    /// Run a ranked query for `filter`, superseding the previous one.
    /// Query errors arrive through `on_message` with their category;
    /// a cancelled query delivers nothing.
    pub fn request<R, M>(&self, filter: &str, on_ready: R, on_message: M) -> CancelToken
    where
        R: FnOnce(Vec<Posting>, String) + Send + 'static,
        M: FnOnce(MessageKind, String) + Send + 'static,
    {
        let token = CancelToken::new();
        if let Some(previous) = self.inflight.lock().replace(token.clone()) {
            previous.cancel();
        }

        // a failed load stays failed; every request resurfaces it
        let catalog = match self.catalog.state() {
            LoadState::Failed(message) => {
                on_message(MessageKind::Exception, message);
                return token;
            }
            LoadState::Loading => {
                on_message(
                    MessageKind::ResourcesNotLoadedYet,
                    SearchError::NotLoaded.to_string(),
                );
                return token;
            }
            LoadState::Ready(catalog) => catalog,
        };
        let resolver = match self.resolver.state() {
            LoadState::Failed(message) => {
                on_message(MessageKind::Exception, message);
                return token;
            }
            LoadState::Loading => {
                on_message(
                    MessageKind::ResourcesNotLoadedYet,
                    SearchError::NotLoaded.to_string(),
                );
                return token;
            }
            LoadState::Ready(resolver) => resolver,
        };

        let filter = filter.to_string();
        let worker_token = token.clone();
        thread::spawn(move || {
            match resolver.search_text(&filter, &catalog, &worker_token) {
                Ok(Some(items)) => on_ready(items, filter),
                Ok(None) => debug!(filter = %filter, "search cancelled"),
                Err(e) => on_message(e.message_kind(), e.to_string()),
            }
        });
        token
    }
}
