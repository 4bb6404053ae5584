//! Index structures built once per corpus load.
//!
//! [`InvertedIndex`] maps tokens to document-id sets for boolean candidate
//! selection; [`TfidfSpace`] holds a frozen unigram+bigram vector space per
//! text field for cosine scoring. Documents are identified by internal u32
//! row ids.

/// Token → document-id postings sets.
pub mod inverted;
/// TF-IDF vector space: vocabulary, IDF weights, document vectors.
pub mod tfidf;

pub use inverted::InvertedIndex;
pub use tfidf::TfidfSpace;
