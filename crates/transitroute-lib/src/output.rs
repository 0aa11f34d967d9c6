use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, WeightFunction};
use crate::path::Route;
use crate::routing::{RouteAlgorithm, RoutePlan};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRenderMode {
    /// One line per node with coordinates.
    #[default]
    PlainText,
    /// One line per route, node ids joined by arrows.
    Compact,
}

/// Node visited by a route, with the coordinates renderers need.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

/// One of the alternatives in a plan.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteOption {
    /// 1-based position in the plan (1 = cheapest).
    pub rank: usize,
    pub cost: f64,
    pub hops: usize,
    pub steps: Vec<RouteStep>,
}

/// Structured representation of a plan that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub algorithm: RouteAlgorithm,
    pub weight: WeightFunction,
    pub start: NodeId,
    pub goal: NodeId,
    pub routes: Vec<RouteOption>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with resolved coordinates.
    pub fn from_plan(graph: &Graph, plan: &RoutePlan) -> Result<Self> {
        if plan.is_empty() {
            return Err(Error::EmptyRoutePlan);
        }

        let routes = plan
            .routes
            .iter()
            .enumerate()
            .map(|(position, route)| route_option(graph, position + 1, route))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            algorithm: plan.algorithm,
            weight: plan.weight,
            start: plan.start,
            goal: plan.goal,
            routes,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Compact => self.render_compact(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Routes: {} -> {} ({} found, algorithm: {}, weight: {})",
            self.start,
            self.goal,
            self.routes.len(),
            self.algorithm,
            self.weight
        );

        for option in &self.routes {
            let _ = writeln!(
                buffer,
                "Route {}: cost {:.2} ({} hops)",
                option.rank, option.cost, option.hops
            );
            for step in &option.steps {
                let _ = writeln!(
                    buffer,
                    "{:>5}: {} ({:.6}, {:.6})",
                    step.index, step.id, step.lat, step.lon
                );
            }
        }
        buffer
    }

    fn render_compact(&self) -> String {
        let mut buffer = String::new();
        for option in &self.routes {
            let joined = option
                .steps
                .iter()
                .map(|step| step.id.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            let _ = writeln!(buffer, "{:.2}\t{joined}", option.cost);
        }
        buffer
    }
}

fn route_option(graph: &Graph, rank: usize, route: &Route) -> Result<RouteOption> {
    let steps = route
        .nodes
        .iter()
        .enumerate()
        .map(|(index, id)| -> Result<RouteStep> {
            let node = graph.node(graph.index_of(*id)?);
            Ok(RouteStep {
                index,
                id: node.id,
                lat: node.lat,
                lon: node.lon,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RouteOption {
        rank,
        cost: route.cost,
        hops: route.hop_count(),
        steps,
    })
}
