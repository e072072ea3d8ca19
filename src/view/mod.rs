mod snapshot;

pub use snapshot::{RenderSnapshot, RenderedEdge, RenderedVertex};

use std::fmt;

use serde::Serialize;

use crate::collections::FxIndexSet;
use crate::graph::{EdgeId, EdgeKey, Graph};
use crate::graph_algos::PathResult;


/// One step of a route, as shown in the route details
/// The edge is the first one joining the pair in load order. With parallel
/// edges it may not be the one the solver priced; this only affects display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HopDetail {
    pub from: String,
    pub to: String,
    pub from_label: String,
    pub to_label: String,
    pub edge: Option<EdgeId>,
    pub weight: Option<f64>,
    pub annotation: Option<String>,
}

/// Highlighting and route details derived from the graph and the last path result
///
/// Derived state only: rebuild it whenever the path, weights or annotations change.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub route: Vec<String>,
    pub route_labels: Vec<String>,
    pub details: Vec<HopDetail>,
    /// None means there is no route, distinct from a zero-cost route
    pub cost: Option<f64>,
    vertex_on_path: FxIndexSet<String>,
    edge_on_path: Vec<bool>,
}

impl ViewState {

    /// Nothing highlighted, no route
    pub fn empty(graph: &Graph) -> Self {
        Self {
            edge_on_path: vec![false; graph.edge_count()],
            ..Self::default()
        }
    }

    pub fn derive(graph: &Graph, path: &PathResult) -> Self {
        if !path.is_reachable() {
            return Self::empty(graph);
        }

        let label = |id: &str| {
            graph.vertex(id).map(|v| v.label.clone()).unwrap_or_else(|| id.to_string())
        };

        let vertex_on_path: FxIndexSet<String> = path.sequence.iter().cloned().collect();
        let hop_keys: FxIndexSet<EdgeKey> = path.hops().map(|(u, v)| EdgeKey::new(u, v)).collect();
        let edge_on_path = graph.edges().map(|(_, e)| hop_keys.contains(&e.key())).collect();

        let details = path.hops().map(|(u, v)| {
            let edge = graph.first_edge_between(u, v);
            HopDetail {
                from: u.to_string(),
                to: v.to_string(),
                from_label: label(u),
                to_label: label(v),
                edge: edge.map(|(id, _)| id),
                weight: edge.map(|(_, e)| e.weight),
                annotation: edge.and_then(|(_, e)| e.annotation.clone()),
            }
        }).collect();

        Self {
            route: path.sequence.clone(),
            route_labels: path.sequence.iter().map(|id| label(id)).collect(),
            details,
            cost: Some(path.total_cost),
            vertex_on_path,
            edge_on_path,
        }
    }

    pub fn has_route(&self) -> bool {
        self.cost.is_some()
    }

    pub fn is_vertex_on_path(&self, id: &str) -> bool {
        self.vertex_on_path.contains(id)
    }

    pub fn is_edge_on_path(&self, id: EdgeId) -> bool {
        self.edge_on_path.get(id.0).copied().unwrap_or(false)
    }
}

/// Printable route summary
impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(cost) = self.cost else {
            return writeln!(f, "No route available between the selected points.");
        };

        writeln!(f, "Route: {}", self.route_labels.join(" → "))?;
        if !self.details.is_empty() {
            writeln!(f)?;
            writeln!(f, "Route details:")?;
            for (i, hop) in self.details.iter().enumerate() {
                writeln!(f, "{}. {} → {}", i + 1, hop.from_label, hop.to_label)?;
                match hop.weight {
                    Some(w) => writeln!(f, "   Weight: {w}")?,
                    None => writeln!(f, "   Weight: —")?,
                }
                writeln!(f, "   Condition: {}", hop.annotation.as_deref().unwrap_or("—"))?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Total cost: {cost:.2}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::document::{GraphDocument, RawEdge, RawVertex};
    use crate::graph_algos::solve;

    fn graph() -> Graph {
        let vertex = |id: &str, label: &str| RawVertex { id: id.into(), label: label.into(), x: 0.0, y: 0.0 };
        let edge = |a: &str, b: &str, w: f64, note: Option<&str>| RawEdge {
            a: a.into(),
            b: b.into(),
            weight: Some(w),
            annotation: note.map(String::from),
        };
        let doc = GraphDocument {
            vertices: vec![vertex("a", "Alpha"), vertex("b", "Bravo"), vertex("c", "Charlie"), vertex("d", "Delta")],
            edges: vec![
                edge("a", "b", 4.0, Some("Free flow")),
                edge("c", "b", 1.0, None),
                edge("a", "c", 10.0, Some("Roadworks")),
                edge("c", "d", 3.0, None),
            ],
            ..GraphDocument::default()
        };
        let mut graph = Graph::new();
        graph.load(&doc);
        graph
    }

    #[test]
    fn test_on_path_flags() {
        let graph = graph();
        let path = solve(&graph, "a", "c");
        let view = ViewState::derive(&graph, &path);

        assert!(view.is_edge_on_path(EdgeId(0)));
        // c - b is stored reversed, still on the path a b c
        assert!(view.is_edge_on_path(EdgeId(1)));
        assert!(!view.is_edge_on_path(EdgeId(2)));
        assert!(!view.is_edge_on_path(EdgeId(3)));
        assert!(!view.is_edge_on_path(EdgeId(99)));

        assert!(view.is_vertex_on_path("a"));
        assert!(view.is_vertex_on_path("b"));
        assert!(view.is_vertex_on_path("c"));
        assert!(!view.is_vertex_on_path("d"));
    }

    #[test]
    fn test_details() {
        let graph = graph();
        let view = ViewState::derive(&graph, &solve(&graph, "a", "c"));

        assert_eq!(view.route_labels, vec!["Alpha", "Bravo", "Charlie"]);
        assert_eq!(view.cost, Some(5.0));
        assert_eq!(view.details.len(), 2);
        assert_eq!(view.details[0].weight, Some(4.0));
        assert_eq!(view.details[0].annotation.as_deref(), Some("Free flow"));
        assert_eq!(view.details[1].from_label, "Bravo");
        assert_eq!(view.details[1].to_label, "Charlie");
        assert_eq!(view.details[1].edge, Some(EdgeId(1)));
        assert_eq!(view.details[1].annotation, None);
    }

    #[test]
    fn test_details_with_parallel_edges_use_first_match() {
        let mut graph = graph();
        let mut doc = GraphDocument {
            vertices: graph.vertices().map(|v| RawVertex { id: v.id.clone(), label: v.label.clone(), x: 0.0, y: 0.0 }).collect(),
            ..GraphDocument::default()
        };
        doc.edges = vec![
            RawEdge { a: "a".into(), b: "b".into(), weight: Some(9.0), annotation: Some("first".into()) },
            RawEdge { a: "b".into(), b: "a".into(), weight: Some(2.0), annotation: Some("second".into()) },
        ];
        graph.load(&doc);

        let path = solve(&graph, "a", "b");
        assert_eq!(path.total_cost, 2.0);

        let view = ViewState::derive(&graph, &path);
        assert_eq!(view.details[0].edge, Some(EdgeId(0)));
        assert_eq!(view.details[0].weight, Some(9.0));
        assert_eq!(view.details[0].annotation.as_deref(), Some("first"));
        assert!(view.is_edge_on_path(EdgeId(0)) && view.is_edge_on_path(EdgeId(1)));
    }

    #[test]
    fn test_no_route_is_not_zero_cost() {
        let graph = graph();
        let none = ViewState::derive(&graph, &PathResult::unreachable());
        assert!(!none.has_route());
        assert_eq!(none.cost, None);
        assert!(none.details.is_empty());
        assert!(graph.edges().all(|(id, _)| !none.is_edge_on_path(id)));

        let same = ViewState::derive(&graph, &solve(&graph, "d", "d"));
        assert!(same.has_route());
        assert_eq!(same.cost, Some(0.0));
        assert!(same.details.is_empty());
        assert!(same.is_vertex_on_path("d"));
    }

    #[test]
    fn test_view_follows_weight_changes() {
        let mut graph = graph();
        let path = solve(&graph, "a", "c");
        graph.update_weight(EdgeId(0), 6.5).unwrap();
        graph.set_annotation(EdgeId(0), Some("Heavy traffic".into())).unwrap();

        let view = ViewState::derive(&graph, &path);
        assert_eq!(view.details[0].weight, Some(6.5));
        assert_eq!(view.details[0].annotation.as_deref(), Some("Heavy traffic"));
    }

    #[test]
    fn test_summary_text() {
        let graph = graph();
        let text = ViewState::derive(&graph, &solve(&graph, "a", "c")).to_string();
        assert!(text.starts_with("Route: Alpha → Bravo → Charlie"));
        assert!(text.contains("1. Alpha → Bravo"));
        assert!(text.contains("Condition: Free flow"));
        assert!(text.contains("Condition: —"));
        assert!(text.contains("Total cost: 5.00"));

        let none = ViewState::empty(&graph).to_string();
        assert!(none.starts_with("No route available"));
    }
}
