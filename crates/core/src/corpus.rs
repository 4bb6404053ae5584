//! Corpus loading from line-delimited JSON.
//!
//! One record per line; malformed lines are skipped rather than failing the
//! load. PMID duplicates keep the last occurrence, preserving the order the
//! surviving rows had in the file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::article::{Article, RawRecord};
use crate::error::EngineError;

/// Load a corpus from a JSONL file.
///
/// Fails with [`EngineError::NoCorpus`] when the file does not exist and
/// [`EngineError::EmptyCorpus`] when no usable records survive parsing.
pub fn load_jsonl(path: &Path) -> Result<Vec<Article>, EngineError> {
    if !path.exists() {
        return Err(EngineError::NoCorpus(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let articles = dedup_keep_last(parse_jsonl(&content));
    if articles.is_empty() {
        return Err(EngineError::EmptyCorpus);
    }
    tracing::info!("Loaded {} articles from {}", articles.len(), path.display());
    Ok(articles)
}

/// Parse JSONL content into articles, skipping malformed lines and records
/// without a PMID.
pub fn parse_jsonl(content: &str) -> Vec<Article> {
    let mut skipped = 0usize;
    let articles: Vec<Article> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<RawRecord>(line) {
            Ok(raw) => raw.into_article(),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        tracing::debug!("Skipped {skipped} malformed corpus lines");
    }
    articles
}

/// Deduplicate by PMID, keeping the last occurrence of each.
pub fn dedup_keep_last(articles: Vec<Article>) -> Vec<Article> {
    let mut last: HashMap<String, usize> = HashMap::with_capacity(articles.len());
    for (i, art) in articles.iter().enumerate() {
        last.insert(art.pmid.clone(), i);
    }
    articles
        .into_iter()
        .enumerate()
        .filter(|(i, art)| last[&art.pmid] == *i)
        .map(|(_, art)| art)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_malformed_lines() {
        let content = r#"{"PMID": "1", "Title": "first"}
not json at all
{"PMID": "2", "Title": "second"}
"#;
        let articles = parse_jsonl(content);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].pmid, "1");
        assert_eq!(articles[1].pmid, "2");
    }

    #[test]
    fn test_dedup_keeps_last_occurrence() {
        let content = r#"{"PMID": "1", "Title": "stale"}
{"PMID": "2", "Title": "kept"}
{"PMID": "1", "Title": "fresh"}
"#;
        let articles = dedup_keep_last(parse_jsonl(content));
        assert_eq!(articles.len(), 2);
        // Row order follows surviving positions: 2 first, then the late 1.
        assert_eq!(articles[0].pmid, "2");
        assert_eq!(articles[1].pmid, "1");
        assert_eq!(articles[1].title, "fresh");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_jsonl(Path::new("/nonexistent/papers.jsonl")).unwrap_err();
        assert!(matches!(err, EngineError::NoCorpus(_)));
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("papersrch_corpus_{}.jsonl", std::process::id()));
        fs::write(&path, "{\"PMID\": \"7\", \"Title\": \"only\"}\n").unwrap();
        let articles = load_jsonl(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].pmid, "7");
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("papersrch_empty_{}.jsonl", std::process::id()));
        fs::write(&path, "garbage\n").unwrap();
        let err = load_jsonl(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, EngineError::EmptyCorpus));
    }
}
