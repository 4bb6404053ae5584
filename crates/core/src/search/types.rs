//! Ranked result records.

use serde::Serialize;

/// One ranked search hit: document metadata plus score components and the
/// list of bonuses that fired. Ephemeral — derived per query, never stored
/// by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// PubMed identifier of the matched article.
    pub pmid: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub journal: String,
    pub year: Option<i32>,
    pub doi: String,
    pub citation_apa: String,
    /// Final relevance score: weighted cosines plus bonuses.
    pub score: f32,
    /// Raw title cosine component (0.0 when the title field is unselected).
    pub cos_title: f32,
    /// Raw abstract cosine component (0.0 when unselected).
    pub cos_abstract: f32,
    /// Sorted query variants found among the document's own tokens.
    pub matched_terms: Vec<String>,
    /// Human-readable labels of the bonuses that fired, in scoring order.
    pub explanation: Vec<String>,
    /// Character length of the abstract (ranking tie-break).
    pub abstract_len: usize,
    /// 1 when a DOI is present, 0 otherwise (ranking tie-break).
    pub has_doi: u8,
}
