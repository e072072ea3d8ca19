use log::{debug, warn};
use serde::Serialize;

use crate::collections::FxIndexMap;
use crate::graph::{Graph, is_valid_weight};
use super::dijkstra::dijkstra;


/// Outcome of a shortest path query
/// An unreachable target is a normal result: empty sequence, infinite cost
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PathResult {
    pub sequence: Vec<String>,
    pub total_cost: f64,
}

impl PathResult {

    pub fn unreachable() -> Self {
        Self { sequence: Vec::new(), total_cost: f64::INFINITY }
    }

    pub fn is_reachable(&self) -> bool {
        !self.sequence.is_empty()
    }

    pub fn source(&self) -> Option<&str> {
        self.sequence.first().map(String::as_str)
    }

    pub fn target(&self) -> Option<&str> {
        self.sequence.last().map(String::as_str)
    }

    /// Consecutive vertex pairs along the path
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sequence.windows(2).map(|w| (w[0].as_str(), w[1].as_str()))
    }
}

impl Default for PathResult {
    fn default() -> Self {
        Self::unreachable()
    }
}


/// Cheapest route from source to target over the current state of the graph
///
/// Every undirected edge is traversable both ways at its weight. Adjacency is
/// rebuilt on every call, so weight changes are always seen by the next solve.
/// Among equal-cost routes the one found first wins, which depends on edge load order.
pub fn solve(graph: &Graph, source: &str, target: &str) -> PathResult {
    if !graph.contains_vertex(source) || !graph.contains_vertex(target) {
        debug!("solve {source} -> {target}: unknown endpoint");
        return PathResult::unreachable();
    }

    // adjacency in vertex load order, then edge load order
    let mut adjacency: FxIndexMap<&str, Vec<(&str, f64)>> = graph
        .vertices()
        .map(|v| (v.id.as_str(), Vec::new()))
        .collect();

    for (id, edge) in graph.edges() {
        if !is_valid_weight(edge.weight) {
            warn!("ignoring edge {id:?} with weight {}", edge.weight);
            continue;
        }
        if let Some(list) = adjacency.get_mut(edge.a.as_str()) {
            list.push((edge.b.as_str(), edge.weight));
        }
        if edge.a != edge.b {
            if let Some(list) = adjacency.get_mut(edge.b.as_str()) {
                list.push((edge.a.as_str(), edge.weight));
            }
        }
    }

    let neighbors = |node: &&str| {
        adjacency
            .get(*node)
            .into_iter()
            .flatten()
            .copied()
    };

    match dijkstra(source, neighbors, |node| *node == target) {
        Some((path, cost)) => {
            debug!("solve {source} -> {target}: {} vertices, cost {cost}", path.len());
            PathResult {
                sequence: path.into_iter().map(String::from).collect(),
                total_cost: cost,
            }
        }
        None => {
            debug!("solve {source} -> {target}: unreachable");
            PathResult::unreachable()
        }
    }
}
