//! Label dictionary: one entry per searchable class, loaded once from a
//! `~`-delimited text file and immutable afterwards.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::types::Label;

/// Immutable label dictionary keyed by canonical name and by synset id.
/// Iteration order is insertion (file) order.
#[derive(Debug)]
pub struct LabelCatalog {
    labels: Vec<Label>,
    by_name: HashMap<String, usize>,
    by_synset: HashMap<i32, usize>,
}

impl LabelCatalog {
    /// Load with the lenient duplicate-name policy (first wins).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, false)
    }

    /// Load a label file. Lines may have 4 fields
    /// (`id~synset~commaNames~description`) or 6 fields
    /// (`idOrH~synset~hashNames~hyponyms~hypernyms~description`); any
    /// other shape fails the whole load. With `strict`, a duplicate
    /// canonical name in a 4-field line is an error instead of being
    /// dropped.
    pub fn load_with(path: impl AsRef<Path>, strict: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open label file {}", path.display()))?;
        let reader = BufReader::new(file);

        let mut catalog = LabelCatalog {
            labels: Vec::new(),
            by_name: HashMap::new(),
            by_synset: HashMap::new(),
        };

        for (lineno, line) in reader.lines().enumerate() {
            let lineno = lineno + 1;
            let line = line.with_context(|| format!("cannot read label file line {}", lineno))?;
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('~').collect();
            let (label, keyed_by_name) = match fields.len() {
                4 => (parse_short_line(&fields, lineno)?, true),
                6 => (parse_long_line(&fields, lineno)?, false),
                n => bail!("label file line {}: expected 4 or 6 fields, got {}", lineno, n),
            };

            if catalog.by_name.contains_key(&label.name) {
                if keyed_by_name {
                    // observed behavior of the 4-field dictionaries:
                    // later labels with an already-seen name are dropped
                    if strict {
                        bail!("label file line {}: duplicate name '{}'", lineno, label.name);
                    }
                    debug!(name = %label.name, line = lineno, "dropping duplicate label name");
                    continue;
                }
                // 6-field labels stay reachable by synset id so hyponym
                // expansion keeps working; only the name slot is taken
                if catalog.by_synset.contains_key(&label.synset_id) {
                    bail!(
                        "label file line {}: duplicate synset id {}",
                        lineno,
                        label.synset_id
                    );
                }
                let idx = catalog.labels.len();
                catalog.by_synset.insert(label.synset_id, idx);
                catalog.labels.push(label);
                continue;
            }

            if catalog.by_synset.contains_key(&label.synset_id) {
                bail!(
                    "label file line {}: duplicate synset id {}",
                    lineno,
                    label.synset_id
                );
            }
            let idx = catalog.labels.len();
            catalog.by_name.insert(label.name.clone(), idx);
            catalog.by_synset.insert(label.synset_id, idx);
            catalog.labels.push(label);
        }

        info!(labels = catalog.labels.len(), path = %path.display(), "label catalog loaded");
        Ok(catalog)
    }

    pub fn lookup(&self, name: &str) -> Option<&Label> {
        self.by_name.get(name).map(|&i| &self.labels[i])
    }

    pub fn lookup_synset(&self, synset_id: i32) -> Option<&Label> {
        self.by_synset.get(&synset_id).map(|&i| &self.labels[i])
    }

    /// All labels in file order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// `id~synset~commaNames~description`
fn parse_short_line(fields: &[&str], lineno: usize) -> Result<Label> {
    let id: i32 = fields[0]
        .parse()
        .with_context(|| format!("label file line {}: bad id '{}'", lineno, fields[0]))?;
    let synset_id: i32 = fields[1]
        .parse()
        .with_context(|| format!("label file line {}: bad synset id '{}'", lineno, fields[1]))?;
    let names: Vec<String> = fields[2].split(',').map(str::to_string).collect();
    Ok(Label {
        id,
        synset_id,
        name: fields[2].to_string(),
        name_len_words: min_words(&names),
        names,
        description: fields[3].to_string(),
        hyponyms: Vec::new(),
        hypernyms: Vec::new(),
    })
}

/// `idOrH~synset~hashNames~hyponyms~hypernyms~description`, where a
/// literal `H` id marks a hypernym-only label (mapped to -1).
fn parse_long_line(fields: &[&str], lineno: usize) -> Result<Label> {
    let id: i32 = if fields[0] == "H" {
        -1
    } else {
        fields[0]
            .parse()
            .with_context(|| format!("label file line {}: bad id '{}'", lineno, fields[0]))?
    };
    let synset_id: i32 = fields[1]
        .parse()
        .with_context(|| format!("label file line {}: bad synset id '{}'", lineno, fields[1]))?;
    let names: Vec<String> = fields[2].split('#').map(str::to_string).collect();
    Ok(Label {
        id,
        synset_id,
        name: names.join(", "),
        name_len_words: min_words(&names),
        names,
        hyponyms: parse_id_list(fields[3], lineno)?,
        hypernyms: parse_id_list(fields[4], lineno)?,
        description: fields[5].to_string(),
    })
}

/// `#`-joined synset ids; empty text means no links.
fn parse_id_list(text: &str, lineno: usize) -> Result<Vec<i32>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split('#')
        .map(|part| {
            part.parse()
                .with_context(|| format!("label file line {}: bad synset id '{}'", lineno, part))
        })
        .collect()
}

fn min_words(names: &[String]) -> u32 {
    names
        .iter()
        .map(|name| name.split_whitespace().count() as u32)
        .min()
        .unwrap_or(0)
}
