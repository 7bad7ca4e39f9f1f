//! Binary posting-list index: file format constants, the buffered
//! stream used by the sequential loader, both access modes, the IDF
//! table, and the bounded caches.
//!
//! File layout (all integers little-endian):
//! - 8-byte header: `"KS INDEX"` read as an i64, or -1 for an
//!   explicitly-empty index;
//! - offset table: `(i32 class_id, i32 byte_offset)` pairs, terminated
//!   by a pair whose class_id is -1;
//! - posting blocks at the recorded offsets: `(u32 item, f32 weight)`
//!   pairs, terminated by item == 0xFFFF_FFFF.

mod cache;
mod idf;
mod reader;
mod stream;

pub use cache::{ClauseCache, PostingCache, CACHE_CAPACITY, CACHE_EVICT, CLAUSE_CACHE_CAPACITY};
pub use idf::IdfTable;
pub use reader::{IndexReader, KeywordIndex};
pub use stream::ByteStream;

use crate::types::Posting;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// `"KS INDEX"` interpreted as a little-endian 64-bit integer.
pub const MAGIC: i64 = 0x4b53_2049_4e44_4558;
/// Header sentinel for an index that is deliberately empty.
pub const EMPTY_MAGIC: i64 = -1;
/// Offset-table terminator class id.
pub const OFFSETS_END: i32 = -1;
/// Posting-block terminator item id.
pub const POSTINGS_END: u32 = 0xFFFF_FFFF;

pub type PostingList = Vec<Posting>;

/// Random-access index plus its bounded decode cache: posting lists are
/// read from disk on first use and shared as `Arc`s afterwards.
pub struct DiskIndex {
    reader: IndexReader,
    cache: PostingCache,
}

impl DiskIndex {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(DiskIndex {
            reader: IndexReader::open(path)?,
            cache: PostingCache::new(),
        })
    }

    pub fn contains(&self, class_id: i32) -> bool {
        self.reader.contains(class_id)
    }

    /// Cached postings for one class; `None` when the class has no
    /// posting list in this index.
    pub fn postings(&self, class_id: i32) -> Result<Option<Arc<PostingList>>> {
        self.cache
            .get_or_load(class_id, || self.reader.read_postings(class_id))
    }

    pub fn cache(&self) -> &PostingCache {
        &self.cache
    }
}
