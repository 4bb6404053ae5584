//! Metadata filtering for search queries.
//!
//! Evaluates the [`SearchQuery`] metadata predicates against one article.
//! All predicates are AND-ed; the first failing one rejects the document.

use crate::article::Article;
use crate::search::query::SearchQuery;

/// Check whether an article passes every metadata predicate of the query.
pub fn matches_filters(article: &Article, query: &SearchQuery) -> bool {
    if let Some(min) = query.year_min {
        // A missing year never satisfies a minimum-year filter.
        match article.year {
            Some(y) if y >= min => {}
            _ => return false,
        }
    }
    if let (Some(max), Some(y)) = (query.year_max, article.year) {
        if y > max {
            return false;
        }
    }

    if !query.journal_include.is_empty() || !query.journal_exclude.is_empty() {
        let journal = article.journal.to_lowercase();
        if !query.journal_include.is_empty()
            && !query
                .journal_include
                .iter()
                .any(|j| journal.contains(&j.to_lowercase()))
        {
            return false;
        }
        if query
            .journal_exclude
            .iter()
            .any(|j| journal.contains(&j.to_lowercase()))
        {
            return false;
        }
    }

    if let Some(author) = query.author.as_deref() {
        if !author.is_empty()
            && !article
                .authors_joined()
                .to_lowercase()
                .contains(&author.to_lowercase())
        {
            return false;
        }
    }

    if query.require_doi && article.doi.is_empty() {
        return false;
    }

    if !query.exclude_terms.is_empty() {
        let mut content = String::new();
        if query.fields.includes_title() {
            content.push_str(&article.title);
        }
        if query.fields.includes_abstract() {
            content.push(' ');
            content.push_str(&article.abstract_text);
        }
        let content = content.to_lowercase();
        if query
            .exclude_terms
            .iter()
            .any(|t| content.contains(&t.to_lowercase()))
        {
            return false;
        }
    }

    true
}
