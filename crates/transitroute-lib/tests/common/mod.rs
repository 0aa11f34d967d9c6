#![allow(dead_code)]

use std::path::PathBuf;

use transitroute_lib::heuristic::{great_circle_distance, kmh_to_mps};
use transitroute_lib::{load_graph, Graph, GraphBuilder, Node, NodeId, DEFAULT_MAX_SPEED_KMH};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// `A→B 10, A→C 4, C→B 4, B→D 1, C→D 10` with ids A=1, B=2, C=3, D=4 and
/// lengths equal to travel times.
pub fn four_node_graph() -> Graph {
    load_graph(&fixtures_dir().join("four_node.json")).expect("four_node fixture loads")
}

/// Two connected nodes (100, 101) and an isolated node (200).
pub fn disconnected_graph() -> Graph {
    load_graph(&fixtures_dir().join("disconnected.json")).expect("disconnected fixture loads")
}

/// Grid node id for row `r`, column `c`.
pub fn grid_id(r: usize, c: usize) -> NodeId {
    (r * 100 + c) as NodeId
}

/// Bidirectional `size × size` street grid about 111 m apart.
///
/// Lengths never undercut the straight-line distance and travel times never
/// beat the default speed bound, so the great-circle heuristic stays
/// admissible for every weight function.
pub fn grid_graph(size: usize) -> Graph {
    let mut builder = GraphBuilder::new();
    let mut nodes = Vec::new();
    for r in 0..size {
        for c in 0..size {
            let lat = 1.30 + r as f64 * 0.001;
            let lon = 103.80 + c as f64 * 0.001;
            builder.add_node(grid_id(r, c), lat, lon).unwrap();
            nodes.push(Node {
                id: grid_id(r, c),
                lat,
                lon,
            });
        }
    }

    let node_at = |r: usize, c: usize| nodes[r * size + c];
    let speed = kmh_to_mps(DEFAULT_MAX_SPEED_KMH);
    let mut connect = |(r1, c1): (usize, usize), (r2, c2): (usize, usize)| {
        let straight = great_circle_distance(&node_at(r1, c1), &node_at(r2, c2));
        let detour = 1.0 + ((r1 * 7 + c1 * 13 + r2 * 3 + c2) % 5) as f64 * 0.1;
        let congestion = 1.0 + ((r1 * c2 + c1 * r2) % 3) as f64 * 0.25;
        let length = straight * detour;
        builder
            .add_edge(
                grid_id(r1, c1),
                grid_id(r2, c2),
                length,
                length / speed * congestion,
            )
            .unwrap();
    };

    for r in 0..size {
        for c in 0..size {
            if c + 1 < size {
                connect((r, c), (r, c + 1));
                connect((r, c + 1), (r, c));
            }
            if r + 1 < size {
                connect((r, c), (r + 1, c));
                connect((r + 1, c), (r, c));
            }
        }
    }

    builder.build()
}

/// Bit-level snapshot of every edge, in adjacency order.
pub fn edge_snapshot(graph: &Graph) -> Vec<(NodeId, NodeId, [u64; 4])> {
    graph
        .edges()
        .map(|(from, to, attrs)| {
            (
                from,
                to,
                [
                    attrs.length().to_bits(),
                    attrs.travel_time().to_bits(),
                    attrs.carbon_emissions().to_bits(),
                    attrs.combined_weight().to_bits(),
                ],
            )
        })
        .collect()
}
