//! transitroute library entry points.
//!
//! This crate models a road network as a weighted directed multigraph and
//! plans routes over it: A* search guided by a great-circle heuristic, plain
//! Dijkstra, and Yen's k-shortest loopless alternatives. Higher-level
//! consumers (the CLI) should only depend on the items exported here.
//!

pub mod error;
pub mod graph;
pub mod graph_diff;
pub mod heuristic;
pub mod loader;
pub mod output;
pub mod path;
pub mod routing;

pub use error::{Error, Result};
pub use graph::{
    EdgeAttributes, Graph, GraphBuilder, Node, NodeId, NodeIndex, WeightFunction,
    DEFAULT_EMISSIONS_FACTOR,
};
pub use graph_diff::GraphDiff;
pub use heuristic::{CostEstimator, GreatCircleEstimator, ZeroEstimator, DEFAULT_MAX_SPEED_KMH};
pub use loader::{load_graph, parse_graph};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::{find_route_a_star, find_route_dijkstra, Route, SearchOptions};
pub use routing::{
    k_shortest_paths, plan_route, select_planner, AStarPlanner, DijkstraPlanner, RouteAlgorithm,
    RoutePlan, RoutePlanner, RouteRequest, SearchConfig,
};
