use serde::Serialize;

use crate::geometry::Point;
use crate::graph::{EdgeId, Graph};
use crate::projector::Projector;
use super::ViewState;


#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedVertex {
    pub id: String,
    pub label: String,
    pub position: Point,
    pub on_path: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedEdge {
    pub id: EdgeId,
    pub from: Point,
    pub to: Point,
    pub on_path: bool,
    pub weight: f64,
    /// Where the weight label goes, the midpoint of the edge
    pub label_position: Point,
}

/// Everything a renderer needs for one frame, in canvas coordinates
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub width: f64,
    pub height: f64,
    pub vertices: Vec<RenderedVertex>,
    pub edges: Vec<RenderedEdge>,
    pub marker: Option<Point>,
}

impl RenderSnapshot {

    pub fn build(graph: &Graph, view: &ViewState, projector: &Projector) -> Self {
        let edges = graph.edges().filter_map(|(id, edge)| {
            let from = projector.forward(&graph.vertex(&edge.a)?.position);
            let to = projector.forward(&graph.vertex(&edge.b)?.position);
            Some(RenderedEdge {
                id,
                from,
                to,
                on_path: view.is_edge_on_path(id),
                weight: edge.weight,
                label_position: from.midpoint(&to),
            })
        }).collect();

        let vertices = graph.vertices().map(|v| RenderedVertex {
            id: v.id.clone(),
            label: v.label.clone(),
            position: projector.forward(&v.position),
            on_path: view.is_vertex_on_path(&v.id),
        }).collect();

        Self {
            width: projector.width(),
            height: projector.height(),
            vertices,
            edges,
            marker: None,
        }
    }

    /// Projected positions along a route, in route order
    pub fn route_geometry(graph: &Graph, route: &[String], projector: &Projector) -> Vec<Point> {
        route
            .iter()
            .filter_map(|id| graph.vertex(id))
            .map(|v| projector.forward(&v.position))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::document::{GraphDocument, RawEdge, RawVertex};
    use crate::graph_algos::solve;

    fn graph() -> Graph {
        let doc = GraphDocument {
            vertices: vec![
                RawVertex { id: "a".into(), label: "A".into(), x: 0.0, y: 0.0 },
                RawVertex { id: "b".into(), label: "B".into(), x: 10.0, y: 0.0 },
                RawVertex { id: "c".into(), label: "C".into(), x: 10.0, y: 10.0 },
            ],
            edges: vec![
                RawEdge { a: "a".into(), b: "b".into(), weight: Some(1.0), annotation: None },
                RawEdge { a: "b".into(), b: "c".into(), weight: Some(2.5), annotation: None },
                RawEdge { a: "a".into(), b: "c".into(), weight: Some(9.0), annotation: None },
            ],
            ..GraphDocument::default()
        };
        let mut graph = Graph::new();
        graph.load(&doc);
        graph
    }

    #[test]
    fn test_snapshot_geometry() {
        let graph = graph();
        let projector = Projector::new(1000.0, 700.0, 150.0);
        let view = ViewState::derive(&graph, &solve(&graph, "a", "c"));
        let snapshot = RenderSnapshot::build(&graph, &view, &projector);

        assert_eq!(snapshot.vertices.len(), 3);
        assert_eq!(snapshot.vertices[1].position, Point::new(850.0, 150.0));
        assert!(snapshot.vertices.iter().all(|v| v.on_path));

        let ab = &snapshot.edges[0];
        assert_eq!(ab.from, Point::new(150.0, 150.0));
        assert_eq!(ab.to, Point::new(850.0, 150.0));
        assert_eq!(ab.label_position, Point::new(500.0, 150.0));
        assert!(ab.on_path);
        assert!(snapshot.edges[1].on_path);
        assert!(!snapshot.edges[2].on_path);
        assert_eq!(snapshot.edges[1].weight, 2.5);
        assert_eq!(snapshot.marker, None);
    }

    #[test]
    fn test_route_geometry() {
        let graph = graph();
        let projector = Projector::new(1000.0, 700.0, 150.0);
        let route: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let points = RenderSnapshot::route_geometry(&graph, &route, &projector);
        assert_eq!(points, vec![
            Point::new(150.0, 150.0),
            Point::new(850.0, 150.0),
            Point::new(850.0, 550.0),
        ]);
    }
}
