//! Route command handler for planning paths between network nodes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use transitroute_lib::{
    load_graph, plan_route, Error as RouteError, NodeId, RouteRequest, RouteSummary, SearchConfig,
};

use crate::output::{AlgorithmArg, OutputFormat, WeightArg};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting node id.
    pub from: NodeId,
    /// Destination node id.
    pub to: NodeId,
    /// Edge attribute to minimise.
    pub weight: WeightArg,
    /// Algorithm to use when planning the route.
    pub algorithm: AlgorithmArg,
    /// Number of alternative routes to return.
    pub alternatives: usize,
    /// Top speed assumed by the travel-time heuristic, in km/h.
    pub max_speed: f64,
    /// Optional wall-clock budget in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest {
            start: self.from,
            goal: self.to,
            algorithm: self.algorithm.into(),
            weight: self.weight.into(),
            alternatives: self.alternatives,
            config: SearchConfig {
                assumed_max_speed_kmh: self.max_speed,
                timeout: self.timeout_ms.map(Duration::from_millis),
            },
        }
    }
}

/// Handle the route subcommand.
///
/// Loads the network, plans the requested routes and prints them in `format`.
pub fn handle_route_command(
    graph_path: &Path,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let mut graph = load_graph(graph_path)
        .with_context(|| format!("failed to load network from {}", graph_path.display()))?;

    let request = args.to_request();
    debug!(?request, "planning route");

    let plan = match plan_route(&mut graph, &request) {
        Ok(plan) => plan,
        Err(err) => return Err(handle_route_failure(err)),
    };

    let summary = RouteSummary::from_plan(&graph, &plan)
        .context("failed to build route summary for display")?;
    format
        .render_route(&summary)
        .context("failed to write route output")
}

fn handle_route_failure(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::NodeNotFound { id } => {
            anyhow::anyhow!("Unknown node {id}; it is not part of the loaded network.")
        }
        RouteError::NoPathExists { start, goal } => {
            anyhow::anyhow!("No route found between {start} and {goal}.")
        }
        RouteError::Timeout { start, goal } => anyhow::anyhow!(
            "Route search between {start} and {goal} exceeded the time limit; try a larger --timeout-ms."
        ),
        other => anyhow::Error::new(other),
    }
}
