//! Facet aggregations and yearly publication counts.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::Serialize;

use crate::article::Article;
use crate::config;
use crate::error::EngineError;
use crate::search::engine::SearchEngine;

/// A categorical dimension the corpus can be faceted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetDimension {
    Journal,
    /// Restricted to years ≥ [`config::ANALYTICS_YEAR_FLOOR`].
    Year,
    /// Counts an heuristic surname: the last whitespace token of each
    /// author display string.
    Author,
}

impl FromStr for FacetDimension {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "journal" => Ok(FacetDimension::Journal),
            "year" => Ok(FacetDimension::Year),
            "author" => Ok(FacetDimension::Author),
            _ => Err(EngineError::InvalidFacet(s.to_string())),
        }
    }
}

/// One facet row: a value, its document count, and its share of the
/// returned rows (percent of the top-N sum, not of the whole corpus).
#[derive(Debug, Clone, Serialize)]
pub struct FacetRow {
    pub value: String,
    pub count: usize,
    pub pct: f32,
}

impl SearchEngine {
    /// Facet counts over one dimension: top
    /// [`config::FACET_TOP_N`] values by frequency, ties broken by value so
    /// the cut is deterministic.
    pub fn facets(&self, by: FacetDimension) -> Vec<FacetRow> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        match by {
            FacetDimension::Journal => {
                for art in &self.articles {
                    *counts.entry(art.journal.clone()).or_insert(0) += 1;
                }
            }
            FacetDimension::Year => {
                for art in &self.articles {
                    if let Some(y) = art.year {
                        if y >= config::ANALYTICS_YEAR_FLOOR {
                            *counts.entry(y.to_string()).or_insert(0) += 1;
                        }
                    }
                }
            }
            FacetDimension::Author => {
                for art in &self.articles {
                    for author in &art.authors {
                        if let Some(surname) = author.split_whitespace().last() {
                            *counts.entry(surname.to_string()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }

        let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows.truncate(config::FACET_TOP_N);

        let total: usize = rows.iter().map(|(_, c)| c).sum();
        rows.into_iter()
            .map(|(value, count)| FacetRow {
                value,
                count,
                pct: count as f32 / total as f32 * 100.0,
            })
            .collect()
    }

    /// Publication counts per year (≥ the analytics floor), ascending.
    ///
    /// With `pmids` given, only those documents are counted.
    pub fn yearly_counts(&self, pmids: Option<&[String]>) -> BTreeMap<i32, usize> {
        let articles: Vec<&Article> = match pmids {
            Some(ids) => self.subset(ids),
            None => self.articles.iter().collect(),
        };
        let mut counts = BTreeMap::new();
        for art in articles {
            if let Some(y) = art.year {
                if y >= config::ANALYTICS_YEAR_FLOOR {
                    *counts.entry(y).or_insert(0) += 1;
                }
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;

    fn article(pmid: &str, journal: &str, year: Option<i32>, authors: &[&str]) -> Article {
        Article {
            pmid: pmid.into(),
            title: format!("paper {pmid}"),
            abstract_text: String::new(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            journal: journal.into(),
            year,
            doi: String::new(),
            citation_apa: String::new(),
            publication_types: Vec::new(),
            abstract_len: 0,
        }
    }

    fn engine() -> SearchEngine {
        SearchEngine::new(vec![
            article("1", "Gut", Some(2021), &["Ana Smith", "Li Wei"]),
            article("2", "Gut", Some(2022), &["Ana Smith"]),
            article("3", "Nature", Some(2019), &["Jo Garcia Lopez"]),
            article("4", "Cell", None, &[]),
        ])
        .unwrap()
    }

    #[test]
    fn test_journal_facet_counts_and_order() {
        let rows = engine().facets(FacetDimension::Journal);
        assert_eq!(rows[0].value, "Gut");
        assert_eq!(rows[0].count, 2);
        // The Cell/Nature tie breaks by value ascending.
        assert!(rows[1].value < rows[2].value);
    }

    #[test]
    fn test_year_facet_floor() {
        let rows = engine().facets(FacetDimension::Year);
        assert!(rows.iter().all(|r| r.value.parse::<i32>().unwrap() >= 2020));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_author_facet_uses_surname() {
        let rows = engine().facets(FacetDimension::Author);
        let smith = rows.iter().find(|r| r.value == "Smith").unwrap();
        assert_eq!(smith.count, 2);
        assert!(rows.iter().any(|r| r.value == "Lopez"));
    }

    #[test]
    fn test_facet_percentages_sum_to_100() {
        for by in [FacetDimension::Journal, FacetDimension::Year, FacetDimension::Author] {
            let total: f32 = engine().facets(by).iter().map(|r| r.pct).sum();
            assert!((total - 100.0).abs() < 1e-3, "{by:?} summed to {total}");
        }
    }

    #[test]
    fn test_yearly_counts_sorted_and_filtered() {
        let eng = engine();
        let counts = eng.yearly_counts(None);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&2021], 1);
        assert_eq!(counts[&2022], 1);

        let subset = vec!["2".to_string()];
        let counts = eng.yearly_counts(Some(&subset));
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&2022], 1);
    }

    #[test]
    fn test_invalid_facet_rejected() {
        assert!(matches!(
            "pmid".parse::<FacetDimension>(),
            Err(EngineError::InvalidFacet(_))
        ));
    }
}
