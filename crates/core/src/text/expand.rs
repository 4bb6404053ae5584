//! Query-term expansion against a fixed domain-synonym table.
//!
//! Each raw term expands independently into a sorted set of variants; a
//! document matches a group when it contains any variant. The table is
//! closed and hardcoded — extend it here, not from data.

use std::collections::BTreeSet;

use crate::text::normalize;

/// Expand raw query terms into per-term variant groups.
///
/// Term order is preserved; each group is sorted for deterministic output.
pub fn expand_query_terms(terms: &[String]) -> Vec<Vec<String>> {
    terms
        .iter()
        .map(|term| {
            let norm = normalize(term).to_lowercase();
            let mut variants = BTreeSet::new();
            variants.insert(norm.clone());
            if ["microrna", "mirna", "mir-"].iter().any(|t| norm.contains(t)) {
                variants.insert("microrna".to_string());
                variants.insert("mirna".to_string());
                variants.insert("mir".to_string());
            }
            if norm == "ibd" || norm == "inflammatory bowel disease" {
                variants.insert("ibd".to_string());
                variants.insert("inflammatory bowel disease".to_string());
            }
            if norm.contains("celiac") || norm.contains("coeliac") {
                variants.insert("celiac".to_string());
                variants.insert("coeliac".to_string());
            }
            variants.into_iter().collect()
        })
        .collect()
}
