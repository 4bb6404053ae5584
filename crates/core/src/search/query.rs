//! Query parameters and the operator/field selector enums.
//!
//! Operator and field strings are validated at the parse boundary: anything
//! outside the closed vocabularies is rejected instead of silently falling
//! back to a default behavior.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::EngineError;

/// How expanded term groups combine into a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOp {
    /// Documents matching every group.
    And,
    /// Documents matching any group.
    Or,
    /// Documents matching none of the groups.
    Not,
}

impl FromStr for BoolOp {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(BoolOp::And),
            "OR" => Ok(BoolOp::Or),
            "NOT" => Ok(BoolOp::Not),
            _ => Err(EngineError::InvalidOperator(s.to_string())),
        }
    }
}

/// Which text field(s) a query consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSelect {
    /// Title only ("ti").
    Title,
    /// Abstract only ("ab").
    Abstract,
    /// Union of both ("tiab").
    TitleAbstract,
}

impl FieldSelect {
    /// True when the title participates in this selection.
    pub fn includes_title(self) -> bool {
        matches!(self, FieldSelect::Title | FieldSelect::TitleAbstract)
    }

    /// True when the abstract participates in this selection.
    pub fn includes_abstract(self) -> bool {
        matches!(self, FieldSelect::Abstract | FieldSelect::TitleAbstract)
    }
}

impl FromStr for FieldSelect {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ti" => Ok(FieldSelect::Title),
            "ab" => Ok(FieldSelect::Abstract),
            "tiab" => Ok(FieldSelect::TitleAbstract),
            _ => Err(EngineError::InvalidFields(s.to_string())),
        }
    }
}

/// All parameters of one ranked search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Raw query terms; each expands into a synonym-variant group.
    pub terms: Vec<String>,
    /// Inter-group boolean operator.
    pub op: BoolOp,
    /// Which field indices to consult.
    pub fields: FieldSelect,
    /// Minimum publication year; documents without a year never pass it.
    pub year_min: Option<i32>,
    /// Maximum publication year, checked only when a year is present.
    pub year_max: Option<i32>,
    /// Journal must contain at least one of these substrings, when any given.
    pub journal_include: Vec<String>,
    /// Journal must contain none of these substrings.
    pub journal_exclude: Vec<String>,
    /// Case-insensitive substring of the joined author string.
    pub author: Option<String>,
    /// Require a non-empty DOI.
    pub require_doi: bool,
    /// None of these may occur in the selected text fields.
    pub exclude_terms: Vec<String>,
    /// Maximum number of results returned.
    pub limit: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            terms: Vec::new(),
            op: BoolOp::And,
            fields: FieldSelect::TitleAbstract,
            year_min: Some(config::DEFAULT_YEAR_MIN),
            year_max: None,
            journal_include: Vec::new(),
            journal_exclude: Vec::new(),
            author: None,
            require_doi: false,
            exclude_terms: Vec::new(),
            limit: config::DEFAULT_RESULT_LIMIT,
        }
    }
}

impl SearchQuery {
    /// A query over `terms` with the default operator, fields, and filters.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parsing() {
        assert_eq!("AND".parse::<BoolOp>().unwrap(), BoolOp::And);
        assert_eq!("or".parse::<BoolOp>().unwrap(), BoolOp::Or);
        assert_eq!(" not ".parse::<BoolOp>().unwrap(), BoolOp::Not);
        assert!(matches!(
            "XOR".parse::<BoolOp>(),
            Err(EngineError::InvalidOperator(_))
        ));
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("ti".parse::<FieldSelect>().unwrap(), FieldSelect::Title);
        assert_eq!("AB".parse::<FieldSelect>().unwrap(), FieldSelect::Abstract);
        assert_eq!("tiab".parse::<FieldSelect>().unwrap(), FieldSelect::TitleAbstract);
        // Unknown selectors are rejected, not treated as the merged union.
        assert!(matches!(
            "title".parse::<FieldSelect>(),
            Err(EngineError::InvalidFields(_))
        ));
    }

    #[test]
    fn test_query_defaults() {
        let q = SearchQuery::new(["microRNA"]);
        assert_eq!(q.op, BoolOp::And);
        assert_eq!(q.fields, FieldSelect::TitleAbstract);
        assert_eq!(q.year_min, Some(2020));
        assert_eq!(q.limit, 30);
        assert!(!q.require_doi);
    }
}
