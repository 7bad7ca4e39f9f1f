use anyhow::Result;
use parking_lot::Mutex;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use super::PostingList;

pub const CACHE_CAPACITY: usize = 100;
pub const CACHE_EVICT: usize = 10;
pub const CLAUSE_CACHE_CAPACITY: usize = 10;

/// Bounded cache of decoded posting lists, keyed by class id.
///
/// Eviction picks victims uniformly at random instead of tracking
/// recency: any class is about as likely as any other to be queried
/// again, so LRU bookkeeping buys nothing here. Entries are `Arc`s, so
/// a list evicted while another request still holds it stays valid.
pub struct PostingCache {
    entries: Mutex<HashMap<i32, Arc<PostingList>>>,
}

impl PostingCache {
    pub fn new() -> Self {
        PostingCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached postings for `class_id`, decoding through `load` on a
    /// miss. `load` returning `None` means the class has no posting
    /// list; that result is not cached.
    pub fn get_or_load<F>(&self, class_id: i32, load: F) -> Result<Option<Arc<PostingList>>>
    where
        F: FnOnce() -> Result<Option<PostingList>>,
    {
        if let Some(found) = self.entries.lock().get(&class_id) {
            return Ok(Some(found.clone()));
        }
        let Some(postings) = load()? else {
            return Ok(None);
        };
        let postings = Arc::new(postings);
        let mut entries = self.entries.lock();
        if entries.len() >= CACHE_CAPACITY {
            evict_random(&mut entries, CACHE_EVICT);
        }
        entries.insert(class_id, postings.clone());
        Ok(Some(postings))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for PostingCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoizes fully-resolved OR-clauses: the exact label-id sequence maps
/// to its unioned weight map. Keys are order-sensitive, so `[a, b]` and
/// `[b, a]` are distinct entries. Same random-eviction policy as the
/// posting cache, one entry at a time.
pub struct ClauseCache {
    entries: Mutex<HashMap<Vec<i32>, Arc<HashMap<u32, f32>>>>,
}

impl ClauseCache {
    pub fn new() -> Self {
        ClauseCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, ids: &[i32]) -> Option<Arc<HashMap<u32, f32>>> {
        let found = self.entries.lock().get(ids).cloned();
        if found.is_some() {
            debug!(clause = ?ids, "clause cache hit");
        }
        found
    }

    pub fn put(&self, ids: Vec<i32>, resolved: Arc<HashMap<u32, f32>>) {
        let mut entries = self.entries.lock();
        if entries.len() >= CLAUSE_CACHE_CAPACITY {
            evict_random(&mut entries, 1);
        }
        entries.insert(ids, resolved);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ClauseCache {
    fn default() -> Self {
        Self::new()
    }
}

fn evict_random<K: Clone + std::hash::Hash + Eq + std::fmt::Debug, V>(
    entries: &mut HashMap<K, V>,
    count: usize,
) {
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let keys: Vec<K> = entries.keys().cloned().collect();
        if keys.is_empty() {
            break;
        }
        let victim = &keys[rng.gen_range(0..keys.len())];
        entries.remove(victim);
        debug!(key = ?victim, "evicted cache entry");
    }
}
