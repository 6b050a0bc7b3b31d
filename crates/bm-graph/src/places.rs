//! Place-name index: normalized name → coordinates, plus a prefix trie over
//! the same names for autocomplete.
//!
//! Normalization keeps ASCII letters and spaces and lowercases them; every
//! other character is dropped.  `"St. Mary's"` and `"st marys"` therefore
//! name the same place.
//!
//! The index is an ordinary owned value.  Each [`RoadGraph`](crate::RoadGraph)
//! carries its own; nothing here is global.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use bm_core::GeoPoint;

/// Lowercase `name` and strip everything but ASCII letters and spaces.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Arena slot of the trie root.
const ROOT: usize = 0;

#[derive(Default)]
struct TrieNode {
    /// Ordered so that prefix listings come out alphabetically.
    children: BTreeMap<char, u32>,
    /// Raw (un-normalized) names whose normalized form ends here.
    names: Vec<String>,
}

/// Owned place-name index.
pub struct PlaceIndex {
    locations: FxHashMap<String, Vec<GeoPoint>>,
    trie: Vec<TrieNode>,
}

impl PlaceIndex {
    pub fn new() -> Self {
        Self { locations: FxHashMap::default(), trie: vec![TrieNode::default()] }
    }

    /// Number of distinct normalized names.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Record `name` at `pos`.
    ///
    /// Coordinates accumulate per normalized name with no deduplication.
    /// Returns `false` (and records nothing) when the name normalizes to the
    /// empty string.
    pub fn add(&mut self, name: &str, pos: GeoPoint) -> bool {
        let key = normalize_name(name);
        if key.is_empty() {
            return false;
        }
        self.insert_key(&key, name);
        self.locations.entry(key).or_default().push(pos);
        true
    }

    /// Insert a raw name into the prefix trie without a coordinate.
    pub fn insert(&mut self, name: &str) {
        let key = normalize_name(name);
        if !key.is_empty() {
            self.insert_key(&key, name);
        }
    }

    fn insert_key(&mut self, key: &str, raw: &str) {
        let mut cur = ROOT;
        for c in key.chars() {
            cur = match self.trie[cur].children.get(&c) {
                Some(&next) => next as usize,
                None => {
                    let next = self.trie.len();
                    self.trie.push(TrieNode::default());
                    self.trie[cur].children.insert(c, next as u32);
                    next
                }
            };
        }
        let names = &mut self.trie[cur].names;
        if !names.iter().any(|n| n == raw) {
            names.push(raw.to_owned());
        }
    }

    /// Trie slot reached by following `key` from the root.
    fn walk(&self, key: &str) -> Option<usize> {
        key.chars().try_fold(ROOT, |cur, c| self.trie[cur].children.get(&c).map(|&n| n as usize))
    }

    /// `true` if some inserted name starts with `query` (after normalization).
    ///
    /// The empty query matches as soon as anything has been inserted.
    pub fn has_prefix(&self, query: &str) -> bool {
        match self.walk(&normalize_name(query)) {
            Some(slot) => {
                let node = &self.trie[slot];
                !node.names.is_empty() || !node.children.is_empty()
            }
            None => false,
        }
    }

    /// Every raw name whose normalized form starts with `query`, ordered by
    /// normalized name.
    pub fn names_with_prefix(&self, query: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let Some(start) = self.walk(&normalize_name(query)) else {
            return out;
        };
        let mut stack = vec![start];
        while let Some(slot) = stack.pop() {
            let node = &self.trie[slot];
            out.extend(node.names.iter().map(String::as_str));
            // Reverse so the smallest child is popped first.
            stack.extend(node.children.values().rev().map(|&n| n as usize));
        }
        out
    }

    /// Coordinates registered under `name` (normalized before lookup).
    pub fn locations(&self, name: &str) -> &[GeoPoint] {
        self.locations
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for PlaceIndex {
    fn default() -> Self {
        Self::new()
    }
}
