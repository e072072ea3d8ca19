//! Cheapest-route planning over a small city graph, with the state needed to
//! draw the graph, highlight the route and animate a marker along it.
//!
//! The [`graph::Graph`] is the single source of truth. [`graph_algos::solve`]
//! answers route queries against it, [`view::ViewState`] and
//! [`view::RenderSnapshot`] derive what to draw, and [`animator::PathAnimator`]
//! moves the marker. [`session::RouteMap`] ties these together and keeps the
//! derived state in step with every change to the graph.

pub mod animator;
pub mod collections;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod graph_algos;
pub mod projector;
pub mod session;
pub mod spatial;
pub mod view;

pub use animator::{AnimatorState, Frame, PathAnimator, RunId};
pub use config::Config;
pub use errors::{ConfigError, GraphError, LoadError, SpatialError};
pub use geometry::Point;
pub use graph::document::{GraphDocument, RouteExport, WeightsDocument};
pub use graph::{Edge, EdgeId, Graph, LoadReport, Vertex};
pub use graph_algos::{PathResult, solve};
pub use projector::Projector;
pub use session::RouteMap;
pub use view::{RenderSnapshot, ViewState};
