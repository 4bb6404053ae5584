//! The search engine: one-shot index construction and ranked retrieval.
//!
//! All index structures are built once from a corpus snapshot and frozen;
//! every query operation takes `&self` and runs to completion with no
//! interior mutability, so independent queries may run concurrently without
//! locks.

use std::collections::{BTreeSet, HashMap, HashSet};

use ordered_float::OrderedFloat;

use crate::article::Article;
use crate::config;
use crate::error::EngineError;
use crate::index::{InvertedIndex, TfidfSpace};
use crate::search::filter::matches_filters;
use crate::search::query::{BoolOp, FieldSelect, SearchQuery};
use crate::search::types::SearchResult;
use crate::text::{expand_query_terms, normalize, tokenize};

/// Immutable search engine over one corpus snapshot.
///
/// Construction tokenizes every document, builds three inverted indices
/// (title, abstract, and their permanent union), fits one TF-IDF space per
/// field, and caches per-sentence tokenizations for proximity scoring.
#[derive(Debug)]
pub struct SearchEngine {
    pub(crate) articles: Vec<Article>,
    pub(crate) pmid_to_pos: HashMap<String, u32>,
    title_tokens: Vec<HashSet<String>>,
    abstract_tokens: Vec<HashSet<String>>,
    /// Tokenized sentences per document, used only for proximity scoring.
    sentences: Vec<Vec<Vec<String>>>,
    inv_title: InvertedIndex,
    inv_abstract: InvertedIndex,
    /// Prebuilt title∪abstract index, so "tiab" queries never re-merge maps.
    inv_combined: InvertedIndex,
    tfidf_title: TfidfSpace,
    tfidf_abstract: TfidfSpace,
}

impl SearchEngine {
    /// Build an engine from a loaded corpus.
    ///
    /// Text fields are re-normalized defensively regardless of what the
    /// loader did. Fails with [`EngineError::EmptyCorpus`] on zero rows.
    pub fn new(mut articles: Vec<Article>) -> Result<Self, EngineError> {
        if articles.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        for art in &mut articles {
            art.title = normalize(&art.title);
            art.abstract_text = normalize(&art.abstract_text);
            art.journal = normalize(&art.journal);
            art.doi = normalize(&art.doi);
            for author in &mut art.authors {
                *author = normalize(author);
            }
            art.abstract_len = art.abstract_text.chars().count();
        }

        let n = articles.len();
        let mut pmid_to_pos = HashMap::with_capacity(n);
        let mut title_tokens = Vec::with_capacity(n);
        let mut abstract_tokens = Vec::with_capacity(n);
        let mut sentences = Vec::with_capacity(n);
        let mut inv_title = InvertedIndex::new();
        let mut inv_abstract = InvertedIndex::new();
        let mut inv_combined = InvertedIndex::new();

        for (pos, art) in articles.iter().enumerate() {
            let pos = pos as u32;
            pmid_to_pos.insert(art.pmid.clone(), pos);

            let ti = tokenize(&art.title);
            let ab = tokenize(&art.abstract_text);
            inv_title.add_document(pos, &ti);
            inv_combined.add_document(pos, &ti);
            inv_abstract.add_document(pos, &ab);
            inv_combined.add_document(pos, &ab);
            title_tokens.push(ti.into_iter().collect());
            abstract_tokens.push(ab.into_iter().collect());

            sentences.push(
                art.abstract_text
                    .split(['.', '!', '?'])
                    .filter(|s| !s.trim().is_empty())
                    .map(tokenize)
                    .collect(),
            );
        }

        let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
        let abstracts: Vec<String> = articles.iter().map(|a| a.abstract_text.clone()).collect();
        let tfidf_title = TfidfSpace::fit(&titles);
        let tfidf_abstract = TfidfSpace::fit(&abstracts);

        tracing::info!(
            "Indexed {} articles ({} title terms, {} abstract terms)",
            n,
            tfidf_title.vocabulary_len(),
            tfidf_abstract.vocabulary_len(),
        );

        Ok(Self {
            articles,
            pmid_to_pos,
            title_tokens,
            abstract_tokens,
            sentences,
            inv_title,
            inv_abstract,
            inv_combined,
            tfidf_title,
            tfidf_abstract,
        })
    }

    /// The indexed corpus, in row order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Always false: an engine cannot be built over an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles for a PMID subset, in corpus row order.
    ///
    /// Unknown PMIDs are ignored; duplicates collapse to one row.
    pub(crate) fn subset(&self, pmids: &[String]) -> Vec<&Article> {
        let mut positions: Vec<u32> = pmids
            .iter()
            .filter_map(|p| self.pmid_to_pos.get(p))
            .copied()
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions
            .into_iter()
            .map(|p| &self.articles[p as usize])
            .collect()
    }

    /// Evaluate the boolean candidate set for expanded term groups.
    ///
    /// Empty `groups` selects the whole corpus. A document matches a group
    /// when it contains any variant in the selected field index; groups
    /// combine per `op`.
    pub fn candidates(
        &self,
        groups: &[Vec<String>],
        op: BoolOp,
        fields: FieldSelect,
    ) -> HashSet<u32> {
        let universe: HashSet<u32> = (0..self.articles.len() as u32).collect();
        if groups.is_empty() {
            return universe;
        }

        let index = match fields {
            FieldSelect::Title => &self.inv_title,
            FieldSelect::Abstract => &self.inv_abstract,
            FieldSelect::TitleAbstract => &self.inv_combined,
        };

        let group_sets: Vec<HashSet<u32>> = groups
            .iter()
            .map(|group| {
                let mut set = HashSet::new();
                for variant in group {
                    set.extend(variant_postings(index, variant));
                }
                set
            })
            .collect();

        match op {
            BoolOp::And => group_sets
                .iter()
                .fold(universe, |acc, s| acc.intersection(s).copied().collect()),
            BoolOp::Or => group_sets.into_iter().flatten().collect(),
            BoolOp::Not => {
                let union: HashSet<u32> = group_sets.into_iter().flatten().collect();
                universe.difference(&union).copied().collect()
            }
        }
    }

    /// Ranked search: expansion, boolean selection, metadata filtering,
    /// TF-IDF scoring with heuristic bonuses, deterministic sort, truncate.
    ///
    /// A query that matches nothing returns an empty vector.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchResult> {
        let groups = expand_query_terms(&query.terms);
        let mut positions: Vec<u32> = self
            .candidates(&groups, query.op, query.fields)
            .into_iter()
            .filter(|&pos| matches_filters(&self.articles[pos as usize], query))
            .collect();
        if positions.is_empty() {
            return Vec::new();
        }
        // Visit candidates in corpus row order so scoring and tie-breaks
        // are reproducible.
        positions.sort_unstable();

        let flat_terms: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.iter().map(String::as_str))
            .collect();
        let distinct_terms: BTreeSet<&str> = flat_terms.iter().copied().collect();
        let query_text = flat_terms.join(" ");

        let query_ti = query
            .fields
            .includes_title()
            .then(|| self.tfidf_title.query_vector(&query_text));
        let query_ab = query
            .fields
            .includes_abstract()
            .then(|| self.tfidf_abstract.query_vector(&query_text));

        let mut results: Vec<SearchResult> = positions
            .into_iter()
            .map(|pos| {
                self.score_candidate(
                    pos,
                    query_ti.as_deref(),
                    query_ab.as_deref(),
                    &flat_terms,
                    &distinct_terms,
                )
            })
            .collect();

        results.sort_by(|a, b| {
            OrderedFloat(b.score)
                .cmp(&OrderedFloat(a.score))
                .then_with(|| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0)))
                .then_with(|| b.abstract_len.cmp(&a.abstract_len))
                .then_with(|| b.has_doi.cmp(&a.has_doi))
        });
        results.truncate(query.limit);
        results
    }

    fn score_candidate(
        &self,
        pos: u32,
        query_ti: Option<&[(u32, f32)]>,
        query_ab: Option<&[(u32, f32)]>,
        flat_terms: &[&str],
        distinct_terms: &BTreeSet<&str>,
    ) -> SearchResult {
        let art = &self.articles[pos as usize];
        let idx = pos as usize;

        let cos_title = query_ti.map_or(0.0, |q| self.tfidf_title.cosine(q, pos));
        let cos_abstract = query_ab.map_or(0.0, |q| self.tfidf_abstract.cosine(q, pos));
        let mut score = config::TITLE_COSINE_WEIGHT * cos_title
            + config::ABSTRACT_COSINE_WEIGHT * cos_abstract;
        let mut explanation = Vec::new();

        let matched_terms: Vec<String> = distinct_terms
            .iter()
            .filter(|t| {
                self.title_tokens[idx].contains(**t) || self.abstract_tokens[idx].contains(**t)
            })
            .map(|t| t.to_string())
            .collect();

        if flat_terms.iter().any(|t| self.title_tokens[idx].contains(*t)) {
            score += config::TITLE_MATCH_BONUS;
            explanation.push("title".to_string());
        }

        if let Some(year) = art.year {
            let rec = recency_bonus(year);
            score += rec;
            if rec > 0.0 {
                explanation.push(format!("recency+{rec:.2}"));
            }
        }

        if art.is_review_or_meta() {
            score += config::REVIEW_BONUS;
            explanation.push("review".to_string());
        }

        let dom = domain_boost(&art.abstract_text);
        if dom > 0.0 {
            score += dom;
            explanation.push(format!("domain+{dom:.2}"));
        }

        if self.proximity(idx, distinct_terms) {
            score += config::PROXIMITY_BONUS;
            explanation.push("proximity".to_string());
        }

        SearchResult {
            pmid: art.pmid.clone(),
            title: art.title.clone(),
            abstract_text: art.abstract_text.clone(),
            journal: art.journal.clone(),
            year: art.year,
            doi: art.doi.clone(),
            citation_apa: art.citation_apa.clone(),
            score,
            cos_title,
            cos_abstract,
            matched_terms,
            explanation,
            abstract_len: art.abstract_len,
            has_doi: u8::from(!art.doi.is_empty()),
        }
    }

    /// True when any single cached sentence contains at least
    /// [`config::PROXIMITY_MIN_SHARED_TERMS`] distinct query variants.
    fn proximity(&self, idx: usize, distinct_terms: &BTreeSet<&str>) -> bool {
        self.sentences[idx].iter().any(|sent| {
            distinct_terms
                .iter()
                .filter(|t| sent.iter().any(|tok| tok == *t))
                .count()
                >= config::PROXIMITY_MIN_SHARED_TERMS
        })
    }
}

/// Documents containing a variant.
///
/// A single-token variant is a plain postings lookup. A multi-token variant
/// (an expanded phrase like "inflammatory bowel disease", or a hyphenated
/// term that tokenizes apart) matches documents containing every one of its
/// tokens.
fn variant_postings(index: &InvertedIndex, variant: &str) -> HashSet<u32> {
    let tokens = tokenize(variant);
    let Some((first, rest)) = tokens.split_first() else {
        return HashSet::new();
    };
    let Some(seed) = index.postings(first) else {
        return HashSet::new();
    };
    let mut acc = seed.clone();
    for token in rest {
        match index.postings(token) {
            Some(ids) => acc.retain(|id| ids.contains(id)),
            None => return HashSet::new(),
        }
        if acc.is_empty() {
            break;
        }
    }
    acc
}

/// Recency bonus: 0 at or below the floor year, saturated at the ceiling,
/// linear in between.
pub(crate) fn recency_bonus(year: i32) -> f32 {
    if year <= config::RECENCY_YEAR_FLOOR {
        0.0
    } else if year >= config::RECENCY_YEAR_CEIL {
        config::RECENCY_BONUS_MAX
    } else {
        let span = (config::RECENCY_YEAR_CEIL - config::RECENCY_YEAR_FLOOR) as f32;
        ((year - config::RECENCY_YEAR_FLOOR) as f32 / span) * config::RECENCY_BONUS_MAX
    }
}

/// Domain-keyword bonus against the lowercased abstract, capped.
pub(crate) fn domain_boost(abstract_text: &str) -> f32 {
    let text = abstract_text.to_lowercase();
    let count = config::DOMAIN_KEYWORDS
        .iter()
        .filter(|kw| text.contains(**kw))
        .count();
    (config::DOMAIN_KEYWORD_BONUS * count as f32).min(config::DOMAIN_BONUS_CAP)
}
