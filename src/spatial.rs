use kdtree::KdTree;
use kdtree::distance::squared_euclidean as kt_squared_euclidean;

use crate::errors::SpatialError;
use crate::geometry::Point;
use crate::graph::Graph;
use crate::projector::Projector;


/// Nearest-vertex lookup over projected vertex positions
/// Built from a snapshot of the graph, rebuild after vertices move
pub struct VertexLocator {
    tree: KdTree<f64, usize, [f64; 2]>, // stores canvas point -> index in ids
    ids: Vec<String>,
}

impl VertexLocator {

    /// Index every vertex at its canvas position
    pub fn build(graph: &Graph, projector: &Projector) -> Result<Self, SpatialError> {
        let mut tree = KdTree::new(2);
        let mut ids = Vec::with_capacity(graph.vertex_count());

        for vertex in graph.vertices() {
            let p = projector.forward(&vertex.position);
            tree.add([p.x, p.y], ids.len())?;
            ids.push(vertex.id.clone());
        }

        Ok(Self { tree, ids })
    }

    /// Id of the vertex closest to point, if it lies within radius
    pub fn pick(&self, point: &Point, radius: f64) -> Result<Option<&str>, SpatialError> {
        if self.ids.is_empty() {
            return Ok(None);
        }

        let nearest = self.tree.nearest(&[point.x, point.y], 1, &kt_squared_euclidean)?;
        let Some(&(distance_sq, &idx)) = nearest.first() else {
            return Ok(None);
        };

        // tree reports squared distances
        if distance_sq > radius * radius {
            return Ok(None);
        }
        Ok(self.ids.get(idx).map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
