//! The `Article` record and raw-record field coercion.
//!
//! An `Article` is an immutable per-document row of the corpus. Raw JSONL
//! records arrive with loosely typed fields (numeric-or-string PMIDs and
//! years, list-or-string publication types); coercion and normalization
//! happen once, at load time.

use serde::{Deserialize, Serialize};

use crate::text::normalize;

/// One article of the corpus, normalized and ready for indexing.
///
/// PMID is unique within a loaded corpus (the loader keeps the last
/// occurrence of a duplicate). `year` is either a valid integer or absent —
/// absent years never satisfy a minimum-year filter and sort lowest in
/// ranking tie-breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// PubMed identifier, treated as an opaque string key.
    pub pmid: String,
    /// Normalized title.
    pub title: String,
    /// Normalized abstract.
    pub abstract_text: String,
    /// Author display names, in publication order.
    pub authors: Vec<String>,
    /// Normalized journal name.
    pub journal: String,
    /// Publication year, when one could be coerced.
    pub year: Option<i32>,
    /// DOI, possibly empty.
    pub doi: String,
    /// Prebuilt APA citation string, passed through untouched.
    pub citation_apa: String,
    /// Publication-type labels (e.g. "Review", "Meta-Analysis").
    pub publication_types: Vec<String>,
    /// Cached character length of the normalized abstract.
    pub abstract_len: usize,
}

impl Article {
    /// Author names joined back into a single `"; "`-separated display
    /// string, as used for author substring filtering.
    pub fn authors_joined(&self) -> String {
        self.authors.join("; ")
    }

    /// True when any publication-type label marks a review or meta-analysis.
    pub fn is_review_or_meta(&self) -> bool {
        self.publication_types.iter().any(|pt| {
            let pt = pt.to_lowercase();
            pt.contains("review") || pt.contains("meta-analysis")
        })
    }
}

/// A corpus record as it appears on disk, before coercion.
///
/// Unknown fields are ignored; missing text fields are treated as empty.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "PMID", default)]
    pub pmid: Option<StringOrNumber>,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(rename = "Authors", default)]
    pub authors: Option<String>,
    #[serde(rename = "Journal", default)]
    pub journal: Option<String>,
    #[serde(rename = "Year", default)]
    pub year: Option<StringOrNumber>,
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub citation_apa: Option<String>,
    #[serde(rename = "PublicationTypes", default)]
    pub publication_types: Option<ListOrString>,
}

/// A JSON field that may be a string or a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

impl StringOrNumber {
    fn as_string(&self) -> String {
        match self {
            StringOrNumber::Text(s) => s.trim().to_string(),
            StringOrNumber::Int(i) => i.to_string(),
            // Integral floats come from tabular exports where a nullable
            // integer column was widened to float.
            StringOrNumber::Float(f) => {
                if f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            StringOrNumber::Text(s) => s.trim().parse::<i32>().ok().or_else(|| {
                s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i32)
            }),
            StringOrNumber::Int(i) => i32::try_from(*i).ok(),
            StringOrNumber::Float(f) if f.is_finite() => Some(*f as i32),
            StringOrNumber::Float(_) => None,
        }
    }
}

/// A JSON field that may be a list of strings or a single delimited string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListOrString {
    List(Vec<String>),
    Text(String),
}

impl ListOrString {
    /// Normalize into a label list: lists are trimmed, strings are split on
    /// `;` or `,`.
    fn into_labels(self) -> Vec<String> {
        match self {
            ListOrString::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ListOrString::Text(s) => s
                .split([';', ','])
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

impl RawRecord {
    /// Coerce and normalize into an `Article`.
    ///
    /// Returns `None` when the record has no PMID — such lines carry no
    /// usable identity and are skipped by the loader.
    pub fn into_article(self) -> Option<Article> {
        let pmid = self.pmid?.as_string();
        if pmid.is_empty() {
            return None;
        }
        let abstract_text = normalize(self.abstract_text.as_deref().unwrap_or(""));
        let authors = normalize(self.authors.as_deref().unwrap_or(""))
            .split(';')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        let abstract_len = abstract_text.chars().count();
        Some(Article {
            pmid,
            title: normalize(self.title.as_deref().unwrap_or("")),
            abstract_text,
            authors,
            journal: normalize(self.journal.as_deref().unwrap_or("")),
            year: self.year.and_then(|y| y.as_year()),
            doi: normalize(self.doi.as_deref().unwrap_or("")),
            citation_apa: self.citation_apa.unwrap_or_default(),
            publication_types: self
                .publication_types
                .map(ListOrString::into_labels)
                .unwrap_or_default(),
            abstract_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> Option<Article> {
        serde_json::from_str::<RawRecord>(json).unwrap().into_article()
    }

    #[test]
    fn test_minimal_record() {
        let art = record(r#"{"PMID": "12345"}"#).unwrap();
        assert_eq!(art.pmid, "12345");
        assert_eq!(art.title, "");
        assert_eq!(art.abstract_len, 0);
        assert!(art.year.is_none());
        assert!(art.authors.is_empty());
    }

    #[test]
    fn test_numeric_pmid_and_year() {
        let art = record(r#"{"PMID": 99, "Year": 2021.0}"#).unwrap();
        assert_eq!(art.pmid, "99");
        assert_eq!(art.year, Some(2021));
    }

    #[test]
    fn test_year_from_string() {
        let art = record(r#"{"PMID": "1", "Year": "2023"}"#).unwrap();
        assert_eq!(art.year, Some(2023));
        let art = record(r#"{"PMID": "1", "Year": "n.d."}"#).unwrap();
        assert_eq!(art.year, None);
        let art = record(r#"{"PMID": "1", "Year": null}"#).unwrap();
        assert_eq!(art.year, None);
    }

    #[test]
    fn test_authors_split_and_normalized() {
        let art = record(r#"{"PMID": "1", "Authors": "Smith J;  Doe  A ; "}"#).unwrap();
        assert_eq!(art.authors, vec!["Smith J", "Doe A"]);
        assert_eq!(art.authors_joined(), "Smith J; Doe A");
    }

    #[test]
    fn test_publication_types_list_or_string() {
        let art = record(r#"{"PMID": "1", "PublicationTypes": ["Review", "Journal Article"]}"#)
            .unwrap();
        assert_eq!(art.publication_types, vec!["Review", "Journal Article"]);
        assert!(art.is_review_or_meta());

        let art = record(r#"{"PMID": "1", "PublicationTypes": "Meta-Analysis; Journal Article"}"#)
            .unwrap();
        assert_eq!(art.publication_types, vec!["Meta-Analysis", "Journal Article"]);
        assert!(art.is_review_or_meta());

        let art = record(r#"{"PMID": "1", "PublicationTypes": "Clinical Trial, Phase II"}"#)
            .unwrap();
        assert_eq!(art.publication_types, vec!["Clinical Trial", "Phase II"]);
        assert!(!art.is_review_or_meta());
    }

    #[test]
    fn test_missing_pmid_is_skipped() {
        assert!(record(r#"{"Title": "orphan"}"#).is_none());
        assert!(record(r#"{"PMID": "  "}"#).is_none());
    }

    #[test]
    fn test_text_fields_normalized() {
        let art = record(r#"{"PMID": "1", "Title": "NF-κB  in   mucosa", "Abstract": " A  B "}"#)
            .unwrap();
        assert_eq!(art.title, "NF-kappaB in mucosa");
        assert_eq!(art.abstract_text, "A B");
        assert_eq!(art.abstract_len, 3);
    }
}
