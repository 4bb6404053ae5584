//! Inverted index for boolean candidate selection.
//!
//! Maps each token to the set of internal document ids containing it at
//! least once. Built once per corpus load; read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Token → set of internal u32 document ids.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, HashSet<u32>>,
}

impl InvertedIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `doc_id` contains each of `tokens`.
    pub fn add_document(&mut self, doc_id: u32, tokens: &[String]) {
        for token in tokens {
            self.postings.entry(token.clone()).or_default().insert(doc_id);
        }
    }

    /// The document-id set for a token, if any document contains it.
    pub fn postings(&self, token: &str) -> Option<&HashSet<u32>> {
        self.postings.get(token)
    }

    /// Number of distinct tokens indexed.
    pub fn vocabulary_len(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut idx = InvertedIndex::new();
        idx.add_document(0, &toks("celiac disease markers"));
        idx.add_document(1, &toks("celiac screening"));
        let hits = idx.postings("celiac").unwrap();
        assert!(hits.contains(&0) && hits.contains(&1));
        assert_eq!(idx.postings("disease").unwrap().len(), 1);
        assert!(idx.postings("absent").is_none());
    }

    #[test]
    fn test_duplicate_tokens_counted_once() {
        let mut idx = InvertedIndex::new();
        idx.add_document(3, &toks("mucosa mucosa mucosa"));
        assert_eq!(idx.postings("mucosa").unwrap().len(), 1);
        assert_eq!(idx.vocabulary_len(), 1);
    }
}
