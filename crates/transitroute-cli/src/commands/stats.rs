//! Stats command handler summarising a loaded network.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use transitroute_lib::{load_graph, Graph};

use crate::output::{render_json, OutputFormat};

/// Aggregate figures for a network file.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub emissions_factor: f64,
    pub total_length_m: f64,
    pub total_travel_time_s: f64,
    /// Nodes without outgoing edges.
    pub dead_ends: usize,
}

impl NetworkStats {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut sources = HashSet::new();
        let mut total_length_m = 0.0;
        let mut total_travel_time_s = 0.0;
        for (from, _, attrs) in graph.edges() {
            sources.insert(from);
            total_length_m += attrs.length();
            total_travel_time_s += attrs.travel_time();
        }

        Self {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            emissions_factor: graph.emissions_factor(),
            total_length_m,
            total_travel_time_s,
            dead_ends: graph.node_count() - sources.len(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Nodes: {}", self.nodes);
        let _ = writeln!(buffer, "Edges: {}", self.edges);
        let _ = writeln!(buffer, "Emissions factor: {:.2}", self.emissions_factor);
        let _ = writeln!(buffer, "Total length: {:.2} m", self.total_length_m);
        let _ = writeln!(buffer, "Total travel time: {:.2} s", self.total_travel_time_s);
        let _ = writeln!(buffer, "Dead ends: {}", self.dead_ends);
        buffer
    }
}

/// Handle the stats subcommand.
pub fn handle_stats_command(graph_path: &Path, format: OutputFormat) -> Result<()> {
    let graph = load_graph(graph_path)
        .with_context(|| format!("failed to load network from {}", graph_path.display()))?;
    let stats = NetworkStats::from_graph(&graph);

    match format {
        OutputFormat::Json => render_json(&stats).context("failed to write stats output"),
        OutputFormat::Text | OutputFormat::Compact => {
            print!("{}", stats.render_text());
            Ok(())
        }
    }
}
