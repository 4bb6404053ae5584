//! Co-authorship graph and centrality metrics.
//!
//! An undirected weighted graph whose nodes are author display strings and
//! whose edge weights count shared documents. Betweenness centrality uses
//! unweighted shortest paths (Brandes), normalized by `1/((n-1)(n-2))` over
//! double-counted pairs for n > 2 — the conventional normalization for
//! undirected graphs.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::Serialize;

use crate::search::engine::SearchEngine;

/// Undirected weighted co-author graph.
///
/// Nodes are kept in first-seen insertion order; adjacency uses ordered
/// maps so traversal (and therefore centrality accumulation) is
/// deterministic.
#[derive(Debug, Default)]
pub struct CoauthorGraph {
    names: Vec<String>,
    index: HashMap<String, u32>,
    /// Per-node neighbor → shared-document count.
    adjacency: Vec<BTreeMap<u32, u32>>,
}

/// Per-author centrality metrics, in node insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorMetrics {
    pub author: String,
    /// Number of distinct co-authors.
    pub degree: usize,
    /// Normalized betweenness centrality.
    pub betweenness: f64,
}

impl CoauthorGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn node_id(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.adjacency.push(BTreeMap::new());
        id
    }

    /// Add one shared document between two authors, creating the nodes and
    /// edge as needed.
    pub fn add_coauthorship(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        let ia = self.node_id(a);
        let ib = self.node_id(b);
        *self.adjacency[ia as usize].entry(ib).or_insert(0) += 1;
        *self.adjacency[ib as usize].entry(ia).or_insert(0) += 1;
    }

    /// Number of authors in the graph.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Author names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Shared-document count between two authors, if they are connected.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.adjacency[ia as usize].get(&ib).copied()
    }

    /// Number of distinct co-authors of a node.
    pub fn degree(&self, name: &str) -> Option<usize> {
        let id = *self.index.get(name)?;
        Some(self.adjacency[id as usize].len())
    }

    /// All edges as `(author, co-author, weight)` with each pair listed
    /// once, in node order.
    pub fn edges(&self) -> Vec<(String, String, u32)> {
        let mut out = Vec::with_capacity(self.edge_count());
        for (ia, neighbors) in self.adjacency.iter().enumerate() {
            for (&ib, &w) in neighbors {
                if (ia as u32) < ib {
                    out.push((
                        self.names[ia].clone(),
                        self.names[ib as usize].clone(),
                        w,
                    ));
                }
            }
        }
        out
    }

    /// Betweenness centrality for every node (Brandes, unweighted).
    pub fn betweenness(&self) -> Vec<f64> {
        let n = self.names.len();
        let mut centrality = vec![0.0f64; n];

        for s in 0..n {
            // Single-source shortest paths by BFS.
            let mut stack = Vec::with_capacity(n);
            let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
            let mut sigma = vec![0.0f64; n];
            let mut dist = vec![-1i64; n];
            sigma[s] = 1.0;
            dist[s] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(s);
            while let Some(v) = queue.pop_front() {
                stack.push(v);
                for &w in self.adjacency[v].keys() {
                    let w = w as usize;
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }
            // Dependency accumulation in reverse BFS order.
            let mut delta = vec![0.0f64; n];
            while let Some(w) = stack.pop() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    centrality[w] += delta[w];
                }
            }
        }

        if n > 2 {
            let scale = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
            for c in &mut centrality {
                *c *= scale;
            }
        }
        centrality
    }
}

impl SearchEngine {
    /// Build the co-author graph over a document subset and compute per-
    /// author degree and betweenness.
    ///
    /// Documents with a single author contribute no nodes; unknown PMIDs
    /// are ignored.
    pub fn coauthor_network(&self, pmids: &[String]) -> (CoauthorGraph, Vec<AuthorMetrics>) {
        let mut graph = CoauthorGraph::new();
        for art in self.subset(pmids) {
            for (i, a) in art.authors.iter().enumerate() {
                for b in &art.authors[i + 1..] {
                    graph.add_coauthorship(a, b);
                }
            }
        }

        let betweenness = graph.betweenness();
        let metrics = graph
            .names
            .iter()
            .enumerate()
            .map(|(id, name)| AuthorMetrics {
                author: name.clone(),
                degree: graph.adjacency[id].len(),
                betweenness: betweenness[id],
            })
            .collect();
        (graph, metrics)
    }
}
