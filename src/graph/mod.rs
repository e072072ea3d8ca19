pub mod document;
pub mod weights;

use std::f64::consts::PI;

use log::{debug, warn};
use serde::Serialize;

use crate::collections::FxIndexMap;
use crate::errors::GraphError;
use crate::geometry::Point;
use crate::projector::Projector;
use document::{GraphDocument, WeightsDocument, WeightRecord};


/// City on the map
/// position is always normalized into [0,1]²
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Vertex {
    pub id: String,
    pub label: String,
    pub position: Point,
}

/// Index of an edge in the graph's edge list
/// Stable until the next load
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// Order-independent key of an endpoint pair
/// EdgeKey::new(a, b) == EdgeKey::new(b, a)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(String, String);

impl EdgeKey {

    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// Undirected weighted connection between two vertices
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub a: String,
    pub b: String,
    pub weight: f64,
    pub annotation: Option<String>,
}

impl Edge {

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.a, &self.b)
    }

    /// True if the edge joins u and v, in either order
    pub fn connects(&self, u: &str, v: &str) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}

/// Weights are costs for the shortest path solver, it needs them finite and non-negative
pub fn is_valid_weight(weight: f64) -> bool {
    weight.is_finite() && weight >= 0.0
}


/// Counts of what a load kept and what it dropped
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub vertices: usize,
    pub edges: usize,
    pub dropped_vertices: usize,
    pub dropped_edges: usize,
}

/// Counts of weight overrides applied and skipped
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WeightsReport {
    pub applied: usize,
    pub skipped: usize,
}


/// Graph model - single source of truth for vertices, edges and weights
///
/// Edges are kept in load order and indexed by their unordered endpoint pair.
/// Parallel edges are allowed, the pair index keeps all of them.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    vertices: FxIndexMap<String, Vertex>,
    edges: Vec<Edge>,
    pairs: FxIndexMap<EdgeKey, Vec<EdgeId>>,
}

impl Graph {

    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole model with the contents of a document
    /// Raw positions are normalized into the unit square using their bounding box.
    /// Duplicate vertex ids keep the first record; edges with unknown endpoints
    /// or invalid weights are dropped. Edges without a weight get weight 1.
    pub fn load(&mut self, doc: &GraphDocument) -> LoadReport {
        self.vertices.clear();
        self.edges.clear();
        self.pairs.clear();

        let mut report = LoadReport {
            dropped_vertices: doc.malformed_vertices,
            dropped_edges: doc.malformed_edges,
            ..LoadReport::default()
        };

        // bounding box of incoming positions
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for v in &doc.vertices {
            x_min = x_min.min(v.x);
            x_max = x_max.max(v.x);
            y_min = y_min.min(v.y);
            y_max = y_max.max(v.y);
        }

        // zero extent in a dimension uses a unit span
        let span = |min: f64, max: f64| if max - min > 0.0 { max - min } else { 1.0 };
        let (x_span, y_span) = (span(x_min, x_max), span(y_min, y_max));

        for raw in &doc.vertices {
            if self.vertices.contains_key(&raw.id) {
                warn!("dropping duplicate vertex id {}", raw.id);
                report.dropped_vertices += 1;
                continue;
            }
            self.vertices.insert(raw.id.clone(), Vertex {
                id: raw.id.clone(),
                label: raw.label.clone(),
                position: Point::new((raw.x - x_min) / x_span, (raw.y - y_min) / y_span),
            });
        }

        for raw in &doc.edges {
            if !self.vertices.contains_key(&raw.a) || !self.vertices.contains_key(&raw.b) {
                warn!("dropping edge {} - {}: unknown endpoint", raw.a, raw.b);
                report.dropped_edges += 1;
                continue;
            }
            let weight = raw.weight.unwrap_or(1.0);
            if !is_valid_weight(weight) {
                warn!("dropping edge {} - {}: invalid weight {weight}", raw.a, raw.b);
                report.dropped_edges += 1;
                continue;
            }
            self.push_edge(Edge {
                a: raw.a.clone(),
                b: raw.b.clone(),
                weight,
                annotation: raw.annotation.clone(),
            });
        }

        report.vertices = self.vertices.len();
        report.edges = self.edges.len();
        debug!("loaded graph: {report:?}");
        report
    }

    /// Override weights and annotations of every edge matching each record's pair
    /// Later records win over earlier ones for the same pair
    pub fn apply_weights(&mut self, weights: &WeightsDocument) -> WeightsReport {
        let mut report = WeightsReport { skipped: weights.malformed, ..WeightsReport::default() };

        for record in &weights.records {
            if !is_valid_weight(record.weight) {
                warn!("skipping weight {} for {} - {}", record.weight, record.a, record.b);
                report.skipped += 1;
                continue;
            }
            let Some(ids) = self.pairs.get(&EdgeKey::new(&record.a, &record.b)) else {
                debug!("no edge for weight record {} - {}", record.a, record.b);
                report.skipped += 1;
                continue;
            };
            for id in ids {
                let edge = &mut self.edges[id.0];
                edge.weight = record.weight;
                edge.annotation = record.annotation.clone();
            }
            report.applied += 1;
        }

        report
    }

    /// Current weights as a companion weights document
    pub fn weights_document(&self) -> WeightsDocument {
        WeightsDocument {
            records: self.edges.iter().map(|e| WeightRecord {
                a: e.a.clone(),
                b: e.b.clone(),
                weight: e.weight,
                annotation: e.annotation.clone(),
            }).collect(),
            malformed: 0,
        }
    }

    /// Set an edge weight in place
    /// Any solved path is left alone, re-solving is up to the caller
    pub fn update_weight(&mut self, id: EdgeId, weight: f64) -> Result<(), GraphError> {
        if !is_valid_weight(weight) {
            return Err(GraphError::InvalidWeight(weight));
        }
        let edge = self.edges.get_mut(id.0).ok_or(GraphError::UnknownEdge(id.0))?;
        edge.weight = weight;
        Ok(())
    }

    pub fn set_annotation(&mut self, id: EdgeId, annotation: Option<String>) -> Result<(), GraphError> {
        let edge = self.edges.get_mut(id.0).ok_or(GraphError::UnknownEdge(id.0))?;
        edge.annotation = annotation;
        Ok(())
    }

    /// Move a vertex to a point given in canvas coordinates
    /// The point is mapped back through the projector and clamped to the unit square.
    /// Returns the stored normalized position.
    pub fn set_position(&mut self, id: &str, canvas: Point, projector: &Projector) -> Result<Point, GraphError> {
        let normalized = projector.inverse(&canvas);
        self.set_normalized_position(id, normalized)
    }

    /// Move a vertex to a normalized position, clamped to the unit square
    pub fn set_normalized_position(&mut self, id: &str, position: Point) -> Result<Point, GraphError> {
        let vertex = self.vertices
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownVertex(id.to_string()))?;
        vertex.position = Point::new(position.x.clamp(0.0, 1.0), position.y.clamp(0.0, 1.0));
        Ok(vertex.position)
    }

    /// Place vertices evenly on a circle around the center of the unit square
    /// Vertex i of n sits at angle 2πi/n. radius is in normalized units and capped at 0.5.
    pub fn apply_circular_layout(&mut self, radius: f64) {
        let radius = radius.clamp(0.0, 0.5);
        let n = self.vertices.len() as f64;
        for (i, vertex) in self.vertices.values_mut().enumerate() {
            let theta = 2.0 * PI * i as f64 / n;
            vertex.position = Point::new(0.5 + radius * theta.cos(), 0.5 + radius * theta.sin());
        }
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Vertices in load order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Vertices sorted by label, for populating selectors
    pub fn vertices_by_label(&self) -> Vec<&Vertex> {
        let mut list: Vec<&Vertex> = self.vertices.values().collect();
        list.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    /// Edges in load order with their ids
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + use<> {
        (0..self.edges.len()).map(EdgeId)
    }

    /// All edges joining u and v, in load order
    pub fn edges_between(&self, u: &str, v: &str) -> &[EdgeId] {
        self.pairs
            .get(&EdgeKey::new(u, v))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First edge joining u and v
    /// With parallel edges this is only the first by load order, not necessarily the cheapest
    pub fn first_edge_between(&self, u: &str, v: &str) -> Option<(EdgeId, &Edge)> {
        let id = *self.edges_between(u, v).first()?;
        Some((id, &self.edges[id.0]))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn push_edge(&mut self, edge: Edge) {
        let id = EdgeId(self.edges.len());
        self.pairs.entry(edge.key()).or_default().push(id);
        self.edges.push(edge);
    }
}
