//! JSON interchange format for pre-built road networks.
//!
//! Network preparation (map download, projection, nearest-node snapping)
//! happens elsewhere; this module only turns its output into a [`Graph`].

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphBuilder, NodeId, DEFAULT_EMISSIONS_FACTOR};
use crate::heuristic::{kmh_to_mps, DEFAULT_MAX_SPEED_KMH};

#[derive(Debug, Deserialize)]
struct NetworkDocument {
    #[serde(default)]
    emissions_factor: Option<f64>,
    /// Speed used to derive travel times for edges that lack one.
    #[serde(default)]
    average_speed_kmh: Option<f64>,
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    edges: Vec<EdgeRecord>,
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    id: NodeId,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: NodeId,
    to: NodeId,
    length: f64,
    #[serde(default)]
    travel_time: Option<f64>,
}

/// Load a network document from disk.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let contents = fs::read_to_string(path).map_err(|source| Error::NetworkRead {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = parse_graph(&contents)?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded road network"
    );
    Ok(graph)
}

/// Parse a network document from a JSON string.
pub fn parse_graph(json: &str) -> Result<Graph> {
    let document: NetworkDocument = serde_json::from_str(json)?;
    let emissions_factor = document
        .emissions_factor
        .unwrap_or(DEFAULT_EMISSIONS_FACTOR);
    let average_speed_mps =
        kmh_to_mps(document.average_speed_kmh.unwrap_or(DEFAULT_MAX_SPEED_KMH));

    let mut builder = GraphBuilder::with_emissions_factor(emissions_factor);
    for node in &document.nodes {
        builder.add_node(node.id, node.lat, node.lon)?;
    }

    let mut derived = 0usize;
    for edge in &document.edges {
        let travel_time = match edge.travel_time {
            Some(seconds) => seconds,
            None => {
                derived += 1;
                edge.length / average_speed_mps
            }
        };
        builder.add_edge(edge.from, edge.to, edge.length, travel_time)?;
    }
    if derived > 0 {
        debug!(derived, average_speed_mps, "derived missing travel times");
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::WeightFunction;
    use std::io::Write;

    const SMALL_NETWORK: &str = r#"{
        "emissions_factor": 0.5,
        "nodes": [
            {"id": 10, "lat": 1.30, "lon": 103.80},
            {"id": 11, "lat": 1.31, "lon": 103.80}
        ],
        "edges": [
            {"from": 10, "to": 11, "length": 1000.0, "travel_time": 60.0},
            {"from": 11, "to": 10, "length": 1000.0}
        ]
    }"#;

    #[test]
    fn parses_nodes_edges_and_factor() {
        let graph = parse_graph(SMALL_NETWORK).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.emissions_factor(), 0.5);

        let a = graph.index_of(10).unwrap();
        let b = graph.index_of(11).unwrap();
        let forward = graph.cheapest_edge(a, b, WeightFunction::Length).unwrap();
        assert_eq!(forward.attributes().travel_time(), 60.0);
        assert_eq!(forward.attributes().combined_weight(), 1500.0);
    }

    #[test]
    fn derives_missing_travel_time_from_average_speed() {
        let graph = parse_graph(SMALL_NETWORK).unwrap();
        let a = graph.index_of(10).unwrap();
        let b = graph.index_of(11).unwrap();
        let back = graph.cheapest_edge(b, a, WeightFunction::Length).unwrap();
        // 1 km at 50 km/h takes 72 seconds.
        assert!((back.attributes().travel_time() - 72.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_edges_to_unknown_nodes() {
        let json = r#"{"nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}],
                       "edges": [{"from": 1, "to": 2, "length": 5.0}]}"#;
        assert!(matches!(
            parse_graph(json),
            Err(Error::NodeNotFound { id: 2 })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(parse_graph("{ nodes: }"), Err(Error::Json(_))));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL_NETWORK.as_bytes()).unwrap();
        let graph = load_graph(file.path()).unwrap();
        assert!(graph.contains(10));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            load_graph(&missing),
            Err(Error::NetworkRead { .. })
        ));
    }
}
