//! Scoped, self-reverting mutations of a [`Graph`].
//!
//! A [`GraphDiff`] borrows the graph exclusively, records every edge it
//! detaches and every node it suspends, and puts them all back when it is
//! restored or dropped. Callers get the same graph back on every exit path,
//! including `?` propagation out of the scope that owns the guard.

use tracing::{debug, error};

use crate::error::Result;
use crate::graph::{EdgeAttributes, Graph, NodeIndex, RemovedEdge};

/// Guard over a set of transient graph mutations.
#[derive(Debug)]
pub struct GraphDiff<'g> {
    graph: &'g mut Graph,
    removed: Vec<RemovedEdge>,
    suspended: Vec<NodeIndex>,
}

impl<'g> GraphDiff<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        Self {
            graph,
            removed: Vec::new(),
            suspended: Vec::new(),
        }
    }

    /// Read access to the graph in its current, modified state.
    pub fn graph(&self) -> &Graph {
        &*self.graph
    }

    /// Detach one `from -> to` edge with the given attributes.
    pub fn remove_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        attributes: &EdgeAttributes,
    ) -> Result<()> {
        let removed = self.graph.remove_edge(from, to, attributes)?;
        self.removed.push(removed);
        Ok(())
    }

    /// Detach every parallel `from -> to` edge. Returns how many were removed.
    ///
    /// Edges already detached by an earlier call are skipped silently.
    pub fn remove_edges_between(&mut self, from: NodeIndex, to: NodeIndex) -> Result<usize> {
        let snapshots: Vec<EdgeAttributes> = self
            .graph
            .edges_between(from, to)
            .map(|edge| *edge.attributes())
            .collect();

        let mut count = 0;
        for attributes in &snapshots {
            match self.remove_edge(from, to, attributes) {
                Ok(()) => count += 1,
                Err(err) if !err.is_fatal() => {
                    debug!(%err, "edge already detached");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(count)
    }

    /// Hide a node from searches until the diff is restored.
    pub fn suspend_node(&mut self, index: NodeIndex) {
        if self.graph.suspend_node(index) {
            self.suspended.push(index);
        }
    }

    /// Number of edges currently detached through this diff.
    pub fn removed_edges(&self) -> usize {
        self.removed.len()
    }

    /// Number of nodes currently suspended through this diff.
    pub fn suspended_nodes(&self) -> usize {
        self.suspended.len()
    }

    /// Undo every mutation, surfacing the first restoration failure.
    pub fn restore(mut self) -> Result<()> {
        self.rollback()
    }

    fn rollback(&mut self) -> Result<()> {
        let mut first_failure = None;

        // Reverse order reproduces the original adjacency slots.
        while let Some(removed) = self.removed.pop() {
            if let Err(err) = self.graph.restore_edge(removed) {
                error!(%err, "failed to restore detached edge");
                first_failure.get_or_insert(err);
            }
        }
        for index in self.suspended.drain(..) {
            self.graph.resume_node(index);
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for GraphDiff<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.rollback() {
            error!(%err, "graph left modified after an aborted mutation scope");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::graph::{GraphBuilder, WeightFunction};

    fn diamond() -> Graph {
        let mut builder = GraphBuilder::new();
        for id in 1..=4 {
            builder.add_node(id, 0.0, 0.0).unwrap();
        }
        builder.add_edge(1, 2, 10.0, 1.0).unwrap();
        builder.add_edge(1, 2, 12.0, 2.0).unwrap();
        builder.add_edge(1, 3, 5.0, 3.0).unwrap();
        builder.add_edge(2, 4, 5.0, 3.0).unwrap();
        builder.add_edge(3, 4, 5.0, 3.0).unwrap();
        builder.build()
    }

    #[test]
    fn restore_returns_graph_to_original_state() {
        let mut graph = diamond();
        let before = graph.clone();
        let a = graph.index_of(1).unwrap();
        let b = graph.index_of(2).unwrap();
        let c = graph.index_of(3).unwrap();

        let mut diff = GraphDiff::new(&mut graph);
        assert_eq!(diff.remove_edges_between(a, b).unwrap(), 2);
        diff.suspend_node(c);
        assert_eq!(diff.graph().edge_count(), 3);
        assert!(diff.graph().is_suspended(c));
        assert_eq!(diff.removed_edges(), 2);
        assert_eq!(diff.suspended_nodes(), 1);
        diff.restore().unwrap();

        assert_eq!(graph, before);
    }

    #[test]
    fn drop_restores_on_early_exit() {
        fn fails_midway(graph: &mut Graph) -> Result<()> {
            let a = graph.index_of(1)?;
            let c = graph.index_of(3)?;
            let mut diff = GraphDiff::new(graph);
            diff.remove_edges_between(a, c)?;
            diff.suspend_node(a);
            diff.graph().index_of(99)?;
            diff.restore()
        }

        let mut graph = diamond();
        let before = graph.clone();
        assert!(matches!(
            fails_midway(&mut graph),
            Err(Error::NodeNotFound { id: 99 })
        ));
        assert_eq!(graph, before);
    }

    #[test]
    fn repeated_removal_is_a_no_op() {
        let mut graph = diamond();
        let a = graph.index_of(1).unwrap();
        let b = graph.index_of(2).unwrap();
        let attrs = *graph
            .cheapest_edge(a, b, WeightFunction::TravelTime)
            .unwrap()
            .attributes();

        let mut diff = GraphDiff::new(&mut graph);
        diff.remove_edge(a, b, &attrs).unwrap();
        assert!(matches!(
            diff.remove_edge(a, b, &attrs),
            Err(Error::EdgeNotFound { from: 1, to: 2 })
        ));
        assert_eq!(diff.remove_edges_between(a, b).unwrap(), 1);
        assert_eq!(diff.removed_edges(), 2);
    }
}
