use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{ByteStream, PostingList, EMPTY_MAGIC, MAGIC, OFFSETS_END, POSTINGS_END};
use crate::types::Posting;

/// Sequential full-load mode: stream the whole file once at startup and
/// keep every class's posting list in memory. Every posting block must
/// begin at a location recorded in the offset table.
#[derive(Debug)]
pub struct KeywordIndex {
    classes: HashMap<i32, Arc<PostingList>>,
}

impl KeywordIndex {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut stream = ByteStream::open(path)?;

        let magic = stream.read_i64()?;
        if magic == EMPTY_MAGIC {
            return Ok(KeywordIndex {
                classes: HashMap::new(),
            });
        }
        if magic != MAGIC {
            bail!("invalid index file format");
        }

        // offset -> class id, so block starts can be validated as the
        // stream walks the file front to back
        let mut locations: HashMap<u64, i32> = HashMap::new();
        loop {
            let class_id = stream.read_i32()?;
            let offset = stream.read_i32()?;
            if class_id == OFFSETS_END {
                break;
            }
            locations.insert(offset as u32 as u64, class_id);
        }

        let mut classes: HashMap<i32, Arc<PostingList>> =
            HashMap::with_capacity(locations.len());
        loop {
            if stream.is_end_of_stream()? {
                break;
            }
            let position = stream.position();
            let Some(&class_id) = locations.get(&position) else {
                bail!(
                    "invalid index file format: block at offset {} missing from offset table",
                    position
                );
            };
            let mut postings = PostingList::new();
            loop {
                let item = stream.read_u32()?;
                let weight = stream.read_f32()?;
                if item == POSTINGS_END {
                    break;
                }
                postings.push(Posting { item, weight });
            }
            classes.insert(class_id, Arc::new(postings));
        }

        info!(classes = classes.len(), path = %path.display(), "keyword index loaded");
        Ok(KeywordIndex { classes })
    }

    pub fn contains(&self, class_id: i32) -> bool {
        self.classes.contains_key(&class_id)
    }

    pub fn postings(&self, class_id: i32) -> Option<Arc<PostingList>> {
        self.classes.get(&class_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Random-access mode: the file stays mapped, only the offset table is
/// held in memory, and a class's posting block is decoded on demand.
/// Mapped reads are stateless, so concurrent lookups need no seek lock.
pub struct IndexReader {
    mmap: Mmap,
    offsets: HashMap<i32, usize>,
}

impl IndexReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open index file {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("cannot map index file {}", path.display()))?;
        if mmap.len() < 8 {
            bail!("invalid index file format: shorter than the header");
        }
        let magic = i64::from_le_bytes(mmap[0..8].try_into().unwrap());
        let mut offsets = HashMap::new();
        if magic == EMPTY_MAGIC {
            info!(classes = 0usize, path = %path.display(), "keyword index opened");
            return Ok(IndexReader { mmap, offsets });
        }
        if magic != MAGIC {
            bail!("invalid index file format");
        }

        let mut off = 8usize;
        loop {
            if off + 8 > mmap.len() {
                bail!("index truncated while reading offset table (offset {})", off);
            }
            let class_id = i32::from_le_bytes(mmap[off..off + 4].try_into().unwrap());
            let byte_offset = i32::from_le_bytes(mmap[off + 4..off + 8].try_into().unwrap());
            off += 8;
            if class_id == OFFSETS_END {
                break;
            }
            offsets.insert(class_id, byte_offset as u32 as usize);
        }

        info!(classes = offsets.len(), path = %path.display(), "keyword index opened");
        Ok(IndexReader { mmap, offsets })
    }

    pub fn contains(&self, class_id: i32) -> bool {
        self.offsets.contains_key(&class_id)
    }

    /// Decode one class's posting block at its recorded offset; stops
    /// at the terminator or a clean end of file. `None` when the class
    /// is not in the offset table.
    pub fn read_postings(&self, class_id: i32) -> Result<Option<PostingList>> {
        let Some(&start) = self.offsets.get(&class_id) else {
            return Ok(None);
        };
        if start > self.mmap.len() {
            bail!(
                "invalid index file format: class {} offset {} past end of file",
                class_id,
                start
            );
        }
        let mut off = start;
        let mut postings = PostingList::new();
        loop {
            if off == self.mmap.len() {
                break;
            }
            if off + 8 > self.mmap.len() {
                bail!("index truncated inside posting block of class {}", class_id);
            }
            let item = u32::from_le_bytes(self.mmap[off..off + 4].try_into().unwrap());
            let weight = f32::from_le_bytes(self.mmap[off + 4..off + 8].try_into().unwrap());
            off += 8;
            if item == POSTINGS_END {
                break;
            }
            postings.push(Posting { item, weight });
        }
        Ok(Some(postings))
    }
}
