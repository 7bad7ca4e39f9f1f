use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 4096;

/// Buffered little-endian reader for the sequential index loader.
/// Reads the file in fixed 4096-byte chunks and tracks the absolute
/// position of the next unread byte, which the loader compares against
/// the offset table to validate block starts.
pub struct ByteStream {
    file: File,
    buf: [u8; BUF_SIZE],
    /// Bytes of `buf` currently valid.
    filled: usize,
    /// Next unread byte within `buf`.
    cursor: usize,
    /// Absolute file offset of `buf[0]`.
    base: u64,
}

impl ByteStream {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open index file {}", path.display()))?;
        Ok(ByteStream {
            file,
            buf: [0u8; BUF_SIZE],
            filled: 0,
            cursor: 0,
            base: 0,
        })
    }

    /// Absolute offset of the next byte this stream will return.
    pub fn position(&self) -> u64 {
        self.base + self.cursor as u64
    }

    fn refill(&mut self) -> Result<()> {
        self.base += self.filled as u64;
        self.filled = self.file.read(&mut self.buf).context("index file read failed")?;
        self.cursor = 0;
        Ok(())
    }

    /// True only at a clean end of file. Probes the file with a refill
    /// when the buffer is exhausted rather than trusting stale state.
    pub fn is_end_of_stream(&mut self) -> Result<bool> {
        if self.cursor < self.filled {
            return Ok(false);
        }
        self.refill()?;
        Ok(self.filled == 0)
    }

    /// Fill `out` exactly; end of file mid-field is an error, never
    /// silently tolerated.
    fn read_exact(&mut self, out: &mut [u8]) -> Result<()> {
        let mut written = 0usize;
        while written < out.len() {
            if self.cursor == self.filled {
                self.refill()?;
                if self.filled == 0 {
                    bail!(
                        "unexpected end of index file at offset {}",
                        self.position()
                    );
                }
            }
            let take = (out.len() - written).min(self.filled - self.cursor);
            out[written..written + take]
                .copy_from_slice(&self.buf[self.cursor..self.cursor + take]);
            self.cursor += take;
            written += take;
        }
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(i32::from_le_bytes(b))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(f32::from_le_bytes(b))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let mut b = [0u8; 8];
        self.read_exact(&mut b)?;
        Ok(i64::from_le_bytes(b))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; len];
        self.read_exact(&mut out)?;
        Ok(out)
    }
}
