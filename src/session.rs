use log::{debug, info};
use rand::Rng;

use crate::animator::{Frame, PathAnimator, RunId};
use crate::config::Config;
use crate::errors::{ConfigError, GraphError, LoadError, SpatialError};
use crate::geometry::Point;
use crate::graph::document::{GraphDocument, RouteExport, WeightsDocument};
use crate::graph::{EdgeId, Graph, LoadReport, WeightsReport, weights};
use crate::graph_algos::{PathResult, solve};
use crate::projector::Projector;
use crate::spatial::VertexLocator;
use crate::view::{RenderSnapshot, ViewState};


/// Pointer drag in progress, one vertex at a time
/// offset is the pointer's canvas offset from the vertex when it was grabbed
#[derive(Clone, Debug, PartialEq)]
struct DragState {
    vertex: String,
    offset: Point,
}

/// Route planner session
///
/// Owns the graph model and everything derived from it. Every mutation goes
/// through here so the path, view state and animation never go stale:
/// - load replaces the graph and clears the route
/// - weight changes re-solve the current query and restart the animation
/// - drags and layouts stop the animation and re-derive the view
pub struct RouteMap {
    config: Config,
    graph: Graph,
    projector: Projector,
    query: Option<(String, String)>,
    path: PathResult,
    view: ViewState,
    animator: PathAnimator,
    drag: Option<DragState>,
}

impl RouteMap {

    /// Session over a validated config
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: Config) -> Self {
        let projector = Projector::from_config(&config.canvas);
        let animator = PathAnimator::new(config.animation.speed);
        Self {
            config,
            graph: Graph::new(),
            projector,
            query: None,
            path: PathResult::unreachable(),
            view: ViewState::default(),
            animator,
            drag: None,
        }
    }

    /// Replace the graph, optionally applying a weights document on top
    pub fn load(&mut self, doc: &GraphDocument, weights: Option<&WeightsDocument>) -> LoadReport {
        self.animator.stop();
        self.drag = None;
        self.query = None;
        self.path = PathResult::unreachable();

        let report = self.graph.load(doc);
        if let Some(weights) = weights {
            let applied = self.graph.apply_weights(weights);
            debug!("weights document: {applied:?}");
        }
        self.view = ViewState::empty(&self.graph);

        info!(
            "loaded {} vertices and {} edges ({} vertex and {} edge records dropped)",
            report.vertices, report.edges, report.dropped_vertices, report.dropped_edges
        );
        report
    }

    /// Parse and load JSON documents
    /// Nothing changes unless both documents parse
    pub fn load_json(&mut self, graph_json: &str, weights_json: Option<&str>) -> Result<LoadReport, LoadError> {
        let doc = GraphDocument::from_json(graph_json)?;
        let weights = weights_json.map(WeightsDocument::from_json).transpose()?;
        Ok(self.load(&doc, weights.as_ref()))
    }

    /// Override weights on the loaded graph, then refresh any active route
    pub fn apply_weights(&mut self, weights: &WeightsDocument) -> WeightsReport {
        let report = self.graph.apply_weights(weights);
        self.resolve(true);
        report
    }

    /// Solve for the cheapest route and start animating it
    pub fn calculate(&mut self, source: &str, target: &str) -> &PathResult {
        self.query = Some((source.to_string(), target.to_string()));
        self.resolve(true);
        &self.path
    }

    /// Forget the current route
    pub fn clear_route(&mut self) {
        self.animator.stop();
        self.query = None;
        self.path = PathResult::unreachable();
        self.view = ViewState::empty(&self.graph);
    }

    pub fn update_weight(&mut self, edge: EdgeId, weight: f64) -> Result<(), GraphError> {
        self.graph.update_weight(edge, weight)?;
        self.resolve(true);
        Ok(())
    }

    /// Nudge all weights by the configured jitter and re-solve the current route
    pub fn jitter_weights<R: Rng>(&mut self, rng: &mut R) -> Result<(), GraphError> {
        let cfg = &self.config.weights;
        weights::jitter_weights(&mut self.graph, rng, cfg.jitter, cfg.min_weight)?;
        self.resolve(true);
        Ok(())
    }

    /// Draw a random street condition for every edge and re-solve the current route
    pub fn assign_conditions<R: Rng>(&mut self, rng: &mut R) -> Result<(), GraphError> {
        weights::assign_conditions(&mut self.graph, rng)?;
        self.resolve(true);
        Ok(())
    }

    /// Arrange vertices on a circle
    pub fn auto_layout(&mut self) {
        self.animator.stop();
        self.graph.apply_circular_layout(self.config.layout.circle_radius);
        self.resolve(false);
    }

    /// Pick up the vertex under the pointer, if any
    pub fn begin_drag(&mut self, pointer: Point) -> Result<Option<String>, SpatialError> {
        let locator = VertexLocator::build(&self.graph, &self.projector)?;
        let Some(id) = locator.pick(&pointer, self.config.layout.hit_radius)? else {
            self.drag = None;
            return Ok(None);
        };
        let id = id.to_string();
        let Some(vertex) = self.graph.vertex(&id) else {
            self.drag = None;
            return Ok(None);
        };
        let grabbed = self.projector.forward(&vertex.position);
        let offset = Point::new(pointer.x - grabbed.x, pointer.y - grabbed.y);

        // geometry is about to change under the marker
        self.animator.stop();
        self.drag = Some(DragState { vertex: id.clone(), offset });
        debug!("dragging {id}");
        Ok(Some(id))
    }

    /// Move the dragged vertex under the pointer, keeping the grab offset
    /// The vertex stays clamped to the canvas and follows the pointer back in.
    /// Returns false when no drag is in progress
    pub fn drag_to(&mut self, pointer: Point) -> Result<bool, GraphError> {
        let Some(drag) = &self.drag else {
            return Ok(false);
        };
        let target = Point::new(pointer.x - drag.offset.x, pointer.y - drag.offset.y);
        self.graph.set_position(&drag.vertex, target, &self.projector)?;
        self.resolve(false);
        Ok(true)
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_vertex(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.vertex.as_str())
    }

    /// Advance the route animation by dt seconds
    pub fn tick(&mut self, dt: f64) -> Frame {
        match self.animator.current_run() {
            Some(run) => self.animator.tick(run, dt),
            None => Frame::Inactive,
        }
    }

    /// Advance a specific run, for hosts that schedule frames per run
    pub fn tick_run(&mut self, run: RunId, dt: f64) -> Frame {
        self.animator.tick(run, dt)
    }

    /// Current frame for the renderer
    pub fn snapshot(&self) -> RenderSnapshot {
        let mut snapshot = RenderSnapshot::build(&self.graph, &self.view, &self.projector);
        snapshot.marker = self.animator.marker();
        snapshot
    }

    /// Result document for the current route, None without a route
    pub fn export(&self) -> Option<RouteExport> {
        let (source, target) = self.query.as_ref()?;
        if !self.path.is_reachable() {
            return None;
        }
        Some(RouteExport {
            source: source.clone(),
            target: target.clone(),
            path: self.path.sequence.clone(),
            cost: self.path.total_cost,
        })
    }

    pub fn weights_document(&self) -> WeightsDocument {
        self.graph.weights_document()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn path(&self) -> &PathResult {
        &self.path
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn animator(&self) -> &PathAnimator {
        &self.animator
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn query(&self) -> Option<(&str, &str)> {
        self.query.as_ref().map(|(s, t)| (s.as_str(), t.as_str()))
    }

    /// Re-solve the active query and re-derive the view
    /// restart_animation replays the route from its start when one exists
    fn resolve(&mut self, restart_animation: bool) {
        self.path = match &self.query {
            Some((source, target)) => solve(&self.graph, source, target),
            None => PathResult::unreachable(),
        };
        self.view = ViewState::derive(&self.graph, &self.path);

        if restart_animation {
            let points = RenderSnapshot::route_geometry(&self.graph, &self.path.sequence, &self.projector);
            match self.animator.start(&points) {
                Some(run) => debug!("animation {run:?} over {} points", points.len()),
                None => debug!("no route to animate"),
            }
        }
    }
}

impl Default for RouteMap {
    fn default() -> Self {
        Self::with_config(Config::default())
    }
}
