use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use super::ByteStream;

/// Fixed header every IDF file starts with: 36 ASCII bytes.
const IDF_HEADER: &[u8] =
    b"BC\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x002018-04-01 00:00:00\n";

/// Per-label inverse-document-frequency factors, indexed by class id.
/// Raw values are rescaled once at load: `idf[i] = ln(max / raw[i]) + 1`,
/// so the most common label lands at 1.0 and rarer labels score higher.
#[derive(Debug)]
pub struct IdfTable {
    weights: Vec<f32>,
}

impl IdfTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut stream = ByteStream::open(path)?;

        let header = stream.read_bytes(IDF_HEADER.len())?;
        if header != IDF_HEADER {
            bail!("IDF file header mismatch");
        }

        let dimension = stream.read_i32()?;
        if dimension < 0 {
            bail!("IDF file has negative dimension {}", dimension);
        }
        let mut weights = Vec::with_capacity(dimension as usize);
        let mut max = f32::MIN;
        for _ in 0..dimension {
            let raw = stream.read_f32()?;
            if raw > max {
                max = raw;
            }
            weights.push(raw);
        }
        for w in weights.iter_mut() {
            *w = (max / *w).ln() + 1.0;
        }

        info!(dimension, path = %path.display(), "idf table loaded");
        Ok(IdfTable { weights })
    }

    /// Factor for one class id; ids outside the table weigh neutrally.
    pub fn weight(&self, class_id: i32) -> f32 {
        usize::try_from(class_id)
            .ok()
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
