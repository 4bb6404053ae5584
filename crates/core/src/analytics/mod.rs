//! Corpus analytics derived from the same frozen engine state.
//!
//! Facet counts, yearly publication counts, and the co-authorship graph
//! with degree and betweenness metrics. All functions return plain data
//! structures; rendering and export belong to the caller.

/// Co-author graph construction and centrality metrics.
pub mod coauthor;
/// Facet aggregations and yearly counts.
pub mod facets;

pub use coauthor::{AuthorMetrics, CoauthorGraph};
pub use facets::{FacetDimension, FacetRow};
