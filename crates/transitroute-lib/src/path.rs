use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, NodeIndex, WeightFunction};
use crate::heuristic::{CostEstimator, ZeroEstimator};

/// Per-call knobs for a single search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Abort with [`Error::Timeout`] once this instant passes.
    pub deadline: Option<Instant>,
}

/// Route expressed in node ids, with its total cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub cost: f64,
    pub weight: WeightFunction,
}

impl Route {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Route expressed in arena indices, as produced by the search core.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPath {
    pub nodes: Vec<NodeIndex>,
    pub cost: f64,
}

impl IndexedPath {
    pub fn into_route(self, graph: &Graph, weight: WeightFunction) -> Route {
        Route {
            nodes: self
                .nodes
                .into_iter()
                .map(|index| graph.node(index).id)
                .collect(),
            cost: self.cost,
            weight,
        }
    }
}

/// Run A* search guided by `estimator`.
///
/// Returns `Ok(None)` when the goal is unreachable.
pub fn find_route_a_star(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    weight: WeightFunction,
    estimator: &dyn CostEstimator,
    options: &SearchOptions,
) -> Result<Option<Route>> {
    let start_index = graph.index_of(start)?;
    let goal_index = graph.index_of(goal)?;
    let path = search(graph, start_index, goal_index, weight, estimator, options)?;
    Ok(path.map(|path| path.into_route(graph, weight)))
}

/// Run Dijkstra's algorithm (A* with a zero heuristic).
pub fn find_route_dijkstra(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    weight: WeightFunction,
    options: &SearchOptions,
) -> Result<Option<Route>> {
    find_route_a_star(graph, start, goal, weight, &ZeroEstimator, options)
}

/// Search core shared by every planner.
///
/// Suspended nodes are never entered. Each node is expanded at most once,
/// which is optimal as long as `estimator` is consistent.
pub fn search(
    graph: &Graph,
    start: NodeIndex,
    goal: NodeIndex,
    weight: WeightFunction,
    estimator: &dyn CostEstimator,
    options: &SearchOptions,
) -> Result<Option<IndexedPath>> {
    if graph.is_suspended(start) || graph.is_suspended(goal) {
        return Ok(None);
    }
    if start == goal {
        return Ok(Some(IndexedPath {
            nodes: vec![start],
            cost: 0.0,
        }));
    }

    let node_count = graph.node_count();
    let mut g_score = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<NodeIndex>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut queue = BinaryHeap::new();

    g_score[start.index()] = 0.0;
    let start_estimate = estimator.estimate(graph, start, goal, weight);
    queue.push(AStarEntry::new(start, 0.0, start_estimate));

    while let Some(entry) = queue.pop() {
        if let Some(deadline) = options.deadline {
            if Instant::now() >= deadline {
                return Err(Error::Timeout {
                    start: graph.node(start).id,
                    goal: graph.node(goal).id,
                });
            }
        }

        let current = entry.node;
        if closed[current.index()] || entry.cost.0 > g_score[current.index()] {
            continue;
        }

        if current == goal {
            return Ok(Some(IndexedPath {
                nodes: reconstruct_path(&parents, start, goal),
                cost: g_score[goal.index()],
            }));
        }
        closed[current.index()] = true;

        let current_score = g_score[current.index()];
        for edge in graph.neighbours(current) {
            let next = edge.target();
            if closed[next.index()] || graph.is_suspended(next) {
                continue;
            }

            let cost = edge.attributes().weight(weight);
            if !cost.is_finite() || cost < 0.0 {
                return Err(Error::InvalidWeight {
                    from: graph.node(current).id,
                    to: graph.node(next).id,
                    attribute: weight.attribute(),
                    value: cost,
                });
            }

            let tentative_g = current_score + cost;
            if tentative_g < g_score[next.index()] {
                g_score[next.index()] = tentative_g;
                parents[next.index()] = Some(current);
                let heuristic = estimator.estimate(graph, next, goal, weight);
                queue.push(AStarEntry::new(next, tentative_g, heuristic));
            }
        }
    }

    Ok(None)
}

fn reconstruct_path(
    parents: &[Option<NodeIndex>],
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node.index()];
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct FloatOrd(pub(crate) f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: NodeIndex,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: NodeIndex, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::heuristic::GreatCircleEstimator;

    fn chain_with_shortcut() -> Graph {
        let mut builder = GraphBuilder::new();
        for id in 1..=4 {
            builder.add_node(id, 0.0, 0.0).unwrap();
        }
        builder.add_edge(1, 2, 1.0, 1.0).unwrap();
        builder.add_edge(2, 3, 1.0, 1.0).unwrap();
        builder.add_edge(3, 4, 1.0, 1.0).unwrap();
        builder.add_edge(1, 4, 5.0, 5.0).unwrap();
        builder.build()
    }

    #[test]
    fn single_node_route_has_zero_cost() {
        let graph = chain_with_shortcut();
        let route = find_route_dijkstra(
            &graph,
            2,
            2,
            WeightFunction::Length,
            &SearchOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(route.nodes, vec![2]);
        assert_eq!(route.cost, 0.0);
        assert_eq!(route.hop_count(), 0);
    }

    #[test]
    fn a_star_prefers_cheaper_multi_hop_path() {
        let graph = chain_with_shortcut();
        let route = find_route_a_star(
            &graph,
            1,
            4,
            WeightFunction::TravelTime,
            &GreatCircleEstimator::default(),
            &SearchOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(route.nodes, vec![1, 2, 3, 4]);
        assert_eq!(route.cost, 3.0);
        assert_eq!(route.weight, WeightFunction::TravelTime);
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let graph = chain_with_shortcut();
        let route = find_route_dijkstra(
            &graph,
            4,
            1,
            WeightFunction::Length,
            &SearchOptions::default(),
        )
        .unwrap();
        assert!(route.is_none());
    }

    #[test]
    fn unknown_node_is_reported() {
        let graph = chain_with_shortcut();
        let err = find_route_dijkstra(
            &graph,
            1,
            42,
            WeightFunction::Length,
            &SearchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NodeNotFound { id: 42 }));
    }

    #[test]
    fn suspended_nodes_are_avoided() {
        let mut graph = chain_with_shortcut();
        let hidden = graph.index_of(3).unwrap();
        graph.suspend_node(hidden);

        let start = graph.index_of(1).unwrap();
        let goal = graph.index_of(4).unwrap();
        let path = search(
            &graph,
            start,
            goal,
            WeightFunction::Length,
            &ZeroEstimator,
            &SearchOptions::default(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path.nodes, vec![start, goal]);
        assert_eq!(path.cost, 5.0);
    }

    #[test]
    fn expired_deadline_times_out() {
        let graph = chain_with_shortcut();
        let options = SearchOptions {
            deadline: Some(Instant::now()),
        };
        let err = find_route_dijkstra(&graph, 1, 4, WeightFunction::Length, &options)
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { start: 1, goal: 4 }));
    }

    #[test]
    fn heap_pops_lowest_estimate_first() {
        let mut heap = BinaryHeap::new();
        let graph = chain_with_shortcut();
        let a = graph.index_of(1).unwrap();
        let b = graph.index_of(2).unwrap();
        heap.push(AStarEntry::new(b, 2.0, 0.0));
        heap.push(AStarEntry::new(a, 1.0, 0.5));
        heap.push(AStarEntry::new(b, 1.0, 0.5));

        assert_eq!(heap.pop().unwrap().node, a);
        assert_eq!(heap.pop().unwrap().node, b);
        assert_eq!(heap.pop().unwrap().estimate.0, 2.0);
    }
}
