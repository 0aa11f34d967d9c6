//! Route planning module for road-network pathfinding.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`SearchConfig`] - Heuristic and deadline configuration
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Planned routes, best first
//! - [`plan_route`] - Main entry point for computing routes
//! - [`k_shortest_paths`] - Yen's alternatives on top of any [`RoutePlanner`]
//!
//! # Example
//!
//! ```ignore
//! use transitroute_lib::{load_graph, plan_route, RouteRequest, WeightFunction};
//!
//! let mut graph = load_graph("network.json".as_ref())?;
//! let request = RouteRequest::a_star(1, 9)
//!     .with_weight(WeightFunction::TravelTime)
//!     .with_alternatives(3);
//! let plan = plan_route(&mut graph, &request)?;
//! println!("best route costs {}", plan.best().map_or(0.0, |r| r.cost));
//! ```

mod planner;
pub mod yen;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};
pub use yen::k_shortest_paths;

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, WeightFunction};
use crate::heuristic::DEFAULT_MAX_SPEED_KMH;
use crate::path::{Route, SearchOptions};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm (uninformed).
    Dijkstra,
    /// A* search (great-circle heuristic).
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// Tuning applied to every search of a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Top speed the travel-time heuristic assumes, in km/h.
    pub assumed_max_speed_kmh: f64,
    /// Wall-clock budget for the whole request.
    pub timeout: Option<Duration>,
}

impl SearchConfig {
    /// Options for searches started now.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            deadline: self.timeout.map(|timeout| Instant::now() + timeout),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            assumed_max_speed_kmh: DEFAULT_MAX_SPEED_KMH,
            timeout: None,
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub algorithm: RouteAlgorithm,
    pub weight: WeightFunction,
    /// Number of routes wanted (1 = shortest path only).
    pub alternatives: usize,
    pub config: SearchConfig,
}

impl RouteRequest {
    /// A* request for the single fastest route.
    pub fn a_star(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::AStar,
            weight: WeightFunction::TravelTime,
            alternatives: 1,
            config: SearchConfig::default(),
        }
    }

    /// Dijkstra request for the single fastest route.
    pub fn dijkstra(start: NodeId, goal: NodeId) -> Self {
        Self {
            algorithm: RouteAlgorithm::Dijkstra,
            ..Self::a_star(start, goal)
        }
    }

    pub fn with_weight(mut self, weight: WeightFunction) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_alternatives(mut self, alternatives: usize) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }
}

/// Planned routes returned by the library, cheapest first.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub weight: WeightFunction,
    pub start: NodeId,
    pub goal: NodeId,
    pub routes: Vec<Route>,
}

impl RoutePlan {
    pub fn best(&self) -> Option<&Route> {
        self.routes.first()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Compute one or more routes for the request.
///
/// Takes the graph mutably because alternatives are explored by detaching
/// edges; the graph is restored before this returns.
pub fn plan_route(graph: &mut Graph, request: &RouteRequest) -> Result<RoutePlan> {
    if request.alternatives == 0 {
        return Err(Error::InvalidRouteCount { k: 0 });
    }

    let start = graph.index_of(request.start)?;
    let goal = graph.index_of(request.goal)?;
    let planner = select_planner(request, graph);
    let options = request.config.search_options();

    debug!(
        start = request.start,
        goal = request.goal,
        algorithm = %request.algorithm,
        weight = %request.weight,
        alternatives = request.alternatives,
        "planning route"
    );

    let routes = if request.alternatives == 1 {
        let graph: &Graph = graph;
        match planner.find_path(graph, start, goal, request.weight, &options)? {
            Some(path) => vec![path.into_route(graph, request.weight)],
            None => Vec::new(),
        }
    } else {
        k_shortest_paths(
            graph,
            request.start,
            request.goal,
            request.alternatives,
            request.weight,
            planner.as_ref(),
            &options,
        )?
    };

    if routes.is_empty() {
        return Err(Error::NoPathExists {
            start: request.start,
            goal: request.goal,
        });
    }

    Ok(RoutePlan {
        algorithm: planner.algorithm(),
        weight: request.weight,
        start: request.start,
        goal: request.goal,
        routes,
    })
}
