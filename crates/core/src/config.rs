//! Global configuration constants for papersrch.
//!
//! All scoring weights, bonus values, and query defaults are defined here.
//! These are compile-time constants; per-query parameters are carried by
//! `SearchQuery` from CLI arguments or the embedding application.

/// Weight of the title cosine component in the base score.
///
/// Titles are weighted 50% above abstracts: a strong title match is the
/// best single relevance signal in this corpus.
pub const TITLE_COSINE_WEIGHT: f32 = 1.2;

/// Weight of the abstract cosine component in the base score.
pub const ABSTRACT_COSINE_WEIGHT: f32 = 0.8;

/// Bonus added when any query variant appears as an exact title token.
pub const TITLE_MATCH_BONUS: f32 = 0.2;

/// Maximum recency bonus, reached at [`RECENCY_YEAR_CEIL`] and later.
pub const RECENCY_BONUS_MAX: f32 = 0.2;

/// Publication year at (and below) which the recency bonus is zero.
pub const RECENCY_YEAR_FLOOR: i32 = 2020;

/// Publication year at (and above) which the recency bonus saturates.
pub const RECENCY_YEAR_CEIL: i32 = 2025;

/// Bonus added when any publication-type label marks a review or meta-analysis.
pub const REVIEW_BONUS: f32 = 0.2;

/// Bonus per distinct domain keyword found in the abstract.
pub const DOMAIN_KEYWORD_BONUS: f32 = 0.1;

/// Cap on the total domain-keyword bonus.
pub const DOMAIN_BONUS_CAP: f32 = 0.2;

/// Bonus added when one sentence contains at least
/// [`PROXIMITY_MIN_SHARED_TERMS`] distinct query variants.
pub const PROXIMITY_BONUS: f32 = 0.15;

/// Minimum distinct query variants that must co-occur in a single sentence
/// to trigger the proximity bonus.
pub const PROXIMITY_MIN_SHARED_TERMS: usize = 2;

/// Default number of results returned by a search.
pub const DEFAULT_RESULT_LIMIT: usize = 30;

/// Default minimum publication year for searches.
pub const DEFAULT_YEAR_MIN: i32 = 2020;

/// Number of rows returned by a facet aggregation.
pub const FACET_TOP_N: usize = 20;

/// Minimum year included in year facets and yearly counts.
pub const ANALYTICS_YEAR_FLOOR: i32 = 2020;

/// Minimum token length (in characters) admitted to the TF-IDF vocabulary.
///
/// The inverted indices keep 1-character tokens; the vector spaces drop them.
pub const TFIDF_MIN_TOKEN_CHARS: usize = 2;

/// Biomedical terms used as relevance-boost signals against the abstract.
/// Substring matches, not filters.
pub const DOMAIN_KEYWORDS: [&str; 11] = [
    "nf-kb",
    "tgf-beta",
    "il-6",
    "tnf",
    "t cell",
    "epithelial barrier",
    "autophagy",
    "mucosa",
    "tight junction",
    "smad2",
    "smad3",
];
