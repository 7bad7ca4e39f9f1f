use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use tracing::warn;

/// Observable state of a background load.
pub enum LoadState<T> {
    Loading,
    Ready(Arc<T>),
    /// The load failed; the message sticks around so every later query
    /// can resurface the same underlying error.
    Failed(String),
}

impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(v) => LoadState::Ready(v.clone()),
            LoadState::Failed(m) => LoadState::Failed(m.clone()),
        }
    }
}

struct Inner<T> {
    state: Mutex<LoadState<T>>,
    done: Condvar,
}

/// A resource loaded once on a background thread. Callers must treat
/// the resource as unavailable until the state is `Ready`; lookups
/// never observe partial data.
pub struct Background<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Background<T> {
    fn clone(&self) -> Self {
        Background {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Background<T> {
    /// Run `load` on a new thread; the returned handle observes it.
    pub fn spawn<F>(load: F) -> Self
    where
        F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    {
        let inner = Arc::new(Inner {
            state: Mutex::new(LoadState::Loading),
            done: Condvar::new(),
        });
        let worker = inner.clone();
        std::thread::spawn(move || {
            let next = match load() {
                Ok(value) => LoadState::Ready(Arc::new(value)),
                Err(e) => {
                    warn!(error = %e, "background load failed");
                    LoadState::Failed(e.to_string())
                }
            };
            *worker.state.lock() = next;
            worker.done.notify_all();
        });
        Background { inner }
    }

    /// Wrap an already-loaded value; used by tests and synchronous
    /// callers that loaded inline.
    pub fn ready(value: T) -> Self {
        Background {
            inner: Arc::new(Inner {
                state: Mutex::new(LoadState::Ready(Arc::new(value))),
                done: Condvar::new(),
            }),
        }
    }

    pub fn state(&self) -> LoadState<T> {
        self.inner.state.lock().clone()
    }

    /// The loaded value, if the load has completed successfully.
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.inner.state.lock() {
            LoadState::Ready(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Block until the load settles; `Err` carries the load failure.
    pub fn wait(&self) -> Result<Arc<T>, String> {
        let mut state = self.inner.state.lock();
        while matches!(*state, LoadState::Loading) {
            self.inner.done.wait(&mut state);
        }
        match &*state {
            LoadState::Ready(v) => Ok(v.clone()),
            LoadState::Failed(m) => Err(m.clone()),
            LoadState::Loading => unreachable!("condvar woke while still loading"),
        }
    }
}
