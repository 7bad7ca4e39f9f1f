use std::collections::{HashMap, VecDeque};

use crate::types::Occurrence;

/// Aho-Corasick automaton over a fixed pattern set.
///
/// Build one with [`MatcherBuilder`]; the built automaton is read-only
/// and can serve any number of [`MultiPatternMatcher::find`] scans.
/// Patterns and text are lowercased unless the builder was created
/// case-sensitive. Offsets are counted in characters.
pub struct MultiPatternMatcher {
    nodes: Vec<Node>,
    case_sensitive: bool,
}

struct Node {
    children: HashMap<char, usize>,
    /// Longest proper suffix of this node's path that is also a prefix
    /// of some pattern.
    fail: usize,
    /// Nearest node on the fail chain that ends a pattern.
    jump: Option<usize>,
    /// Pattern ending at this node (case-folded form).
    hit: Option<String>,
}

impl Node {
    fn new() -> Self {
        Node {
            children: HashMap::new(),
            fail: 0,
            jump: None,
            hit: None,
        }
    }
}

/// Accumulates patterns, then `build()` computes failure and dictionary
/// suffix links in BFS order. Consuming `self` makes "build exactly
/// once, after all adds" a compile-time guarantee.
pub struct MatcherBuilder {
    nodes: Vec<Node>,
    case_sensitive: bool,
}

impl MatcherBuilder {
    /// Case-insensitive builder (the default mode).
    pub fn new() -> Self {
        MatcherBuilder {
            nodes: vec![Node::new()],
            case_sensitive: false,
        }
    }

    pub fn new_case_sensitive() -> Self {
        MatcherBuilder {
            nodes: vec![Node::new()],
            case_sensitive: true,
        }
    }

    pub fn add(&mut self, pattern: &str) {
        let pattern = if self.case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        let mut node = 0usize;
        for ch in pattern.chars() {
            node = match self.nodes[node].children.get(&ch).copied() {
                Some(next) => next,
                None => {
                    self.nodes.push(Node::new());
                    let next = self.nodes.len() - 1;
                    self.nodes[node].children.insert(ch, next);
                    next
                }
            };
        }
        self.nodes[node].hit = Some(pattern);
    }

    pub fn build(mut self) -> MultiPatternMatcher {
        let mut queue = VecDeque::new();
        let root_children: Vec<usize> = self.nodes[0].children.values().copied().collect();
        for child in root_children {
            self.nodes[child].fail = 0;
            self.nodes[child].jump = None;
            queue.push_back(child);
        }

        while let Some(node) = queue.pop_front() {
            let children: Vec<(char, usize)> =
                self.nodes[node].children.iter().map(|(&c, &n)| (c, n)).collect();
            for (letter, child) in children {
                let mut fallback = self.nodes[node].fail;
                while !self.nodes[fallback].children.contains_key(&letter) && fallback != 0 {
                    fallback = self.nodes[fallback].fail;
                }
                let fallback = self.nodes[fallback].children.get(&letter).copied().unwrap_or(0);
                self.nodes[child].fail = fallback;
                self.nodes[child].jump = if self.nodes[fallback].hit.is_some() {
                    Some(fallback)
                } else {
                    self.nodes[fallback].jump
                };
                queue.push_back(child);
            }
        }

        MultiPatternMatcher {
            nodes: self.nodes,
            case_sensitive: self.case_sensitive,
        }
    }
}

impl Default for MatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiPatternMatcher {
    /// Scan `text` once, lazily yielding every pattern occurrence in
    /// increasing end-position order.
    pub fn find(&self, text: &str) -> Find<'_> {
        let folded: Vec<char> = if self.case_sensitive {
            text.chars().collect()
        } else {
            text.to_lowercase().chars().collect()
        };
        Find {
            matcher: self,
            chars: folded.into_iter(),
            node: 0,
            follow_jump: false,
            ends_at: 0,
        }
    }
}

/// Lazy scan state for one `find` call.
pub struct Find<'m> {
    matcher: &'m MultiPatternMatcher,
    chars: std::vec::IntoIter<char>,
    node: usize,
    follow_jump: bool,
    ends_at: u32,
}

impl Find<'_> {
    fn occurrence(&self, node: usize) -> Occurrence {
        let word = self.matcher.nodes[node]
            .hit
            .clone()
            .expect("jump/hit node always carries a pattern");
        let len = word.chars().count() as u32;
        Occurrence {
            starts_at: self.ends_at - len,
            word,
        }
    }
}

impl Iterator for Find<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        let matcher = self.matcher;
        loop {
            // finish emitting the dictionary-suffix chain for the
            // position we already consumed
            if self.follow_jump {
                if let Some(jump) = matcher.nodes[self.node].jump {
                    self.node = jump;
                    return Some(self.occurrence(jump));
                }
                self.follow_jump = false;
            }

            let ch = self.chars.next()?;
            self.ends_at += 1;
            let mut node = self.node;
            while !matcher.nodes[node].children.contains_key(&ch) && node != 0 {
                node = matcher.nodes[node].fail;
            }
            self.node = matcher.nodes[node].children.get(&ch).copied().unwrap_or(0);
            self.follow_jump = true;
            if matcher.nodes[self.node].hit.is_some() {
                return Some(self.occurrence(self.node));
            }
        }
    }
}
