//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and implementations for
//! the supported search algorithms (Dijkstra, A*). The k-shortest-paths
//! planner drives whichever strategy the request selects.

use crate::error::Result;
use crate::graph::{Graph, NodeIndex, WeightFunction};
use crate::heuristic::{GreatCircleEstimator, ZeroEstimator};
use crate::path::{search, IndexedPath, SearchOptions};

use super::{RouteAlgorithm, RouteRequest};

/// Trait for route planning strategies.
///
/// Implementations must be read-only with respect to the graph so they can be
/// run repeatedly against a graph under a transient diff.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search on the given graph.
    ///
    /// Returns `Ok(None)` when the goal is unreachable.
    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        weight: WeightFunction,
        options: &SearchOptions,
    ) -> Result<Option<IndexedPath>>;
}

/// Uninformed shortest-path planner.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        weight: WeightFunction,
        options: &SearchOptions,
    ) -> Result<Option<IndexedPath>> {
        search(graph, start, goal, weight, &ZeroEstimator, options)
    }
}

/// A* planner guided by great-circle distance.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    estimator: GreatCircleEstimator,
}

impl AStarPlanner {
    pub fn new(estimator: GreatCircleEstimator) -> Self {
        Self { estimator }
    }

    /// Planner whose heuristic matches the graph's emissions factor.
    pub fn for_graph(graph: &Graph, assumed_max_speed_kmh: f64) -> Self {
        Self::new(GreatCircleEstimator::for_graph(graph, assumed_max_speed_kmh))
    }
}

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        weight: WeightFunction,
        options: &SearchOptions,
    ) -> Result<Option<IndexedPath>> {
        search(graph, start, goal, weight, &self.estimator, options)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest, graph: &Graph) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
        RouteAlgorithm::AStar => Box::new(AStarPlanner::for_graph(
            graph,
            request.config.assumed_max_speed_kmh,
        )),
    }
}
