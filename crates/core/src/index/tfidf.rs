//! Frozen TF-IDF vector space for one text field.
//!
//! Fit once over the whole corpus at load time and reused for every query.
//! Terms are lowercased word tokens of at least two characters plus their
//! adjacent bigrams; IDF is smoothed (`ln((1+n)/(1+df)) + 1`) and document
//! vectors are L2-normalized, so cosine similarity reduces to a sparse dot
//! product.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::config;
use crate::text::tokenize;

/// A sparse vector: `(term_id, weight)` pairs sorted by term id.
pub type SparseVector = Vec<(u32, f32)>;

/// TF-IDF vector space over a corpus text column.
#[derive(Debug, Serialize, Deserialize)]
pub struct TfidfSpace {
    /// Term → column id. Ids follow lexicographic term order.
    vocabulary: HashMap<String, u32>,
    /// Smoothed inverse document frequency per column id.
    idf: Vec<f32>,
    /// One normalized vector per corpus row, aligned with row order.
    doc_vectors: Vec<SparseVector>,
}

impl TfidfSpace {
    /// Fit the space over one text column (empty strings allowed).
    pub fn fit(texts: &[String]) -> Self {
        let n = texts.len();
        let term_lists: Vec<Vec<String>> = texts.iter().map(|t| ngrams(t)).collect();

        // Document frequencies over distinct per-document terms.
        let mut df: HashMap<&str, u32> = HashMap::new();
        for terms in &term_lists {
            let distinct: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
            for term in distinct {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        // Lexicographic vocabulary order keeps column ids reproducible.
        let sorted_terms: BTreeSet<&str> = df.keys().copied().collect();
        let mut vocabulary = HashMap::with_capacity(sorted_terms.len());
        let mut idf = Vec::with_capacity(sorted_terms.len());
        for (id, term) in sorted_terms.into_iter().enumerate() {
            let term_df = df[term] as f32;
            idf.push(((1.0 + n as f32) / (1.0 + term_df)).ln() + 1.0);
            vocabulary.insert(term.to_string(), id as u32);
        }

        let doc_vectors = term_lists
            .iter()
            .map(|terms| weigh(terms, &vocabulary, &idf))
            .collect();

        Self {
            vocabulary,
            idf,
            doc_vectors,
        }
    }

    /// Build a normalized query vector. Terms outside the vocabulary are
    /// dropped; a query with no known terms yields the zero vector.
    pub fn query_vector(&self, text: &str) -> SparseVector {
        weigh(&ngrams(text), &self.vocabulary, &self.idf)
    }

    /// Cosine similarity between a query vector and the vector of corpus
    /// row `doc_id`. Both sides are L2-normalized, so this is a dot product.
    pub fn cosine(&self, query: &[(u32, f32)], doc_id: u32) -> f32 {
        let doc = &self.doc_vectors[doc_id as usize];
        let mut dot = 0.0f32;
        let (mut i, mut j) = (0, 0);
        while i < query.len() && j < doc.len() {
            match query[i].0.cmp(&doc[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    dot += query[i].1 * doc[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }

    /// Number of terms in the fitted vocabulary.
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Unigrams of at least [`config::TFIDF_MIN_TOKEN_CHARS`] characters plus
/// adjacent bigrams joined with a space.
fn ngrams(text: &str) -> Vec<String> {
    let unigrams: Vec<String> = tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= config::TFIDF_MIN_TOKEN_CHARS)
        .collect();
    let mut terms = Vec::with_capacity(unigrams.len() * 2);
    for pair in unigrams.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    let mut all = unigrams;
    all.append(&mut terms);
    all
}

/// Count terms, weigh by IDF, and L2-normalize into a sorted sparse vector.
fn weigh(terms: &[String], vocabulary: &HashMap<String, u32>, idf: &[f32]) -> SparseVector {
    let mut counts: HashMap<u32, f32> = HashMap::new();
    for term in terms {
        if let Some(&id) = vocabulary.get(term) {
            *counts.entry(id).or_insert(0.0) += 1.0;
        }
    }
    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(id, tf)| (id, tf * idf[id as usize]))
        .collect();
    vector.sort_unstable_by_key(|&(id, _)| id);

    let norm = vector.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut vector {
            *w /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_identical_text_has_unit_cosine() {
        let space = TfidfSpace::fit(&texts(&[
            "microRNA biomarkers in celiac disease",
            "unrelated cancer imaging study",
        ]));
        let q = space.query_vector("microRNA biomarkers in celiac disease");
        assert!((space.cosine(&q, 0) - 1.0).abs() < 1e-5);
        assert!(space.cosine(&q, 1) < 0.1);
    }

    #[test]
    fn test_bigrams_are_indexed() {
        let space = TfidfSpace::fit(&texts(&["inflammatory bowel disease", "bowel surgery"]));
        let q = space.query_vector("inflammatory bowel");
        // The bigram "inflammatory bowel" only matches document 0.
        assert!(space.cosine(&q, 0) > space.cosine(&q, 1));
    }

    #[test]
    fn test_unknown_terms_drop_to_zero_vector() {
        let space = TfidfSpace::fit(&texts(&["mucosal immunity"]));
        assert!(space.query_vector("zebrafish").is_empty());
        assert_eq!(space.cosine(&Vec::new(), 0), 0.0);
    }

    #[test]
    fn test_single_char_tokens_excluded() {
        let space = TfidfSpace::fit(&texts(&["a t cell response"]));
        let q = space.query_vector("a");
        assert!(q.is_empty());
        assert!(space.vocabulary_len() > 0);
    }

    #[test]
    fn test_empty_documents_allowed() {
        let space = TfidfSpace::fit(&texts(&["", "tight junction proteins", ""]));
        let q = space.query_vector("tight junction");
        assert_eq!(space.cosine(&q, 0), 0.0);
        assert!(space.cosine(&q, 1) > 0.0);
        assert_eq!(space.cosine(&q, 2), 0.0);
    }

    #[test]
    fn test_rare_terms_outweigh_common() {
        let space = TfidfSpace::fit(&texts(&[
            "barrier autophagy",
            "barrier mucosa",
            "barrier smad2",
        ]));
        // "autophagy" appears once, "barrier" in every document; a query for
        // each against doc 0 favors the rarer term.
        let rare = space.query_vector("autophagy");
        let common = space.query_vector("barrier");
        assert!(space.cosine(&rare, 0) > space.cosine(&common, 0));
    }
}
