//! Yen's k-shortest loopless paths on top of a [`RoutePlanner`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, NodeIndex, WeightFunction};
use crate::graph_diff::GraphDiff;
use crate::path::{FloatOrd, IndexedPath, Route, SearchOptions};

use super::planner::RoutePlanner;

/// Find up to `k` distinct loopless routes ordered by non-decreasing cost.
///
/// The graph is mutated while alternatives are explored and is returned in
/// exactly its original state, whatever the outcome. An unreachable goal
/// yields an empty list.
pub fn k_shortest_paths(
    graph: &mut Graph,
    start: NodeId,
    goal: NodeId,
    k: usize,
    weight: WeightFunction,
    planner: &dyn RoutePlanner,
    options: &SearchOptions,
) -> Result<Vec<Route>> {
    if k == 0 {
        return Err(Error::InvalidRouteCount { k });
    }
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;

    let paths = k_shortest_indexed(graph, start_index, goal_index, k, weight, planner, options)?;
    Ok(paths
        .into_iter()
        .map(|path| path.into_route(graph, weight))
        .collect())
}

fn k_shortest_indexed(
    graph: &mut Graph,
    start: NodeIndex,
    goal: NodeIndex,
    k: usize,
    weight: WeightFunction,
    planner: &dyn RoutePlanner,
    options: &SearchOptions,
) -> Result<Vec<IndexedPath>> {
    let Some(shortest) = planner.find_path(graph, start, goal, weight, options)? else {
        return Ok(Vec::new());
    };

    let mut seen: HashSet<Vec<NodeIndex>> = HashSet::new();
    seen.insert(shortest.nodes.clone());
    let mut accepted = vec![shortest];
    let mut candidates = BinaryHeap::new();
    let mut sequence = 0u64;

    while accepted.len() < k {
        let last = accepted[accepted.len() - 1].nodes.clone();

        for spur_position in 0..last.len().saturating_sub(1) {
            let spur_node = last[spur_position];
            let root = &last[..=spur_position];
            let root_cost = root_path_cost(graph, root, weight)?;

            let spur_path = {
                let mut diff = GraphDiff::new(graph);
                for path in &accepted {
                    if path.nodes.len() > spur_position + 1
                        && path.nodes[..=spur_position] == *root
                    {
                        diff.remove_edges_between(
                            path.nodes[spur_position],
                            path.nodes[spur_position + 1],
                        )?;
                    }
                }
                for &node in &root[..spur_position] {
                    diff.suspend_node(node);
                }

                debug!(
                    spur = diff.graph().node(spur_node).id,
                    removed_edges = diff.removed_edges(),
                    suspended_nodes = diff.suspended_nodes(),
                    "searching spur"
                );
                let found = planner.find_path(diff.graph(), spur_node, goal, weight, options);
                diff.restore()?;
                found?
            };

            let Some(spur_path) = spur_path else {
                continue;
            };

            let mut nodes = root[..spur_position].to_vec();
            nodes.extend_from_slice(&spur_path.nodes);
            if !seen.insert(nodes.clone()) {
                continue;
            }

            candidates.push(Candidate {
                cost: FloatOrd(root_cost + spur_path.cost),
                sequence,
                path: IndexedPath {
                    nodes,
                    cost: root_cost + spur_path.cost,
                },
            });
            sequence += 1;
        }

        debug!(
            accepted = accepted.len(),
            candidates = candidates.len(),
            "k-shortest-paths iteration finished"
        );

        match candidates.pop() {
            Some(candidate) => accepted.push(candidate.path),
            None => break,
        }
    }

    Ok(accepted)
}

/// Cost of an already-accepted prefix on the unmodified graph.
fn root_path_cost(graph: &Graph, root: &[NodeIndex], weight: WeightFunction) -> Result<f64> {
    graph.path_cost(root, weight).ok_or_else(|| {
        let from = root.first().map_or(-1, |index| graph.node(*index).id);
        let to = root.last().map_or(-1, |index| graph.node(*index).id);
        Error::GraphMutationFailure {
            from,
            to,
            reason: "edge on an accepted route is missing".to_string(),
        }
    })
}

#[derive(Debug)]
struct Candidate {
    cost: FloatOrd,
    sequence: u64,
    path: IndexedPath,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost; earlier candidates win ties.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
