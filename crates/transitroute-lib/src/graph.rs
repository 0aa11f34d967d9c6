use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for a road-network node (e.g. an OSM node id).
pub type NodeId = i64;

/// Multiplier turning edge length (meters) into the emissions penalty.
///
/// The value is uncalibrated; override it through [`GraphBuilder`] or the
/// network document.
pub const DEFAULT_EMISSIONS_FACTOR: f64 = 0.2;

/// Dense arena index of a node inside a single [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Position in the graph's dense node arrays.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Edge attribute selected as the cost of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightFunction {
    /// Seconds needed to traverse the edge.
    #[default]
    TravelTime,
    /// Physical length in meters.
    Length,
    /// Length plus the distance-proportional emissions penalty.
    CombinedWeight,
}

impl WeightFunction {
    /// Name of the edge attribute backing this weight function.
    pub fn attribute(self) -> &'static str {
        match self {
            WeightFunction::TravelTime => "travel_time",
            WeightFunction::Length => "length",
            WeightFunction::CombinedWeight => "combined_weight",
        }
    }
}

impl fmt::Display for WeightFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Intersection or endpoint in the road network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Cost attributes attached to a directed edge.
///
/// `carbon_emissions` and `combined_weight` are always derived from `length`,
/// so the struct can only be created through [`EdgeAttributes::derive`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeAttributes {
    length: f64,
    travel_time: f64,
    carbon_emissions: f64,
    combined_weight: f64,
}

impl EdgeAttributes {
    /// Compute the derived attributes from measured length and travel time.
    pub fn derive(length: f64, travel_time: f64, emissions_factor: f64) -> Self {
        let carbon_emissions = length * emissions_factor;
        Self {
            length,
            travel_time,
            carbon_emissions,
            combined_weight: length + carbon_emissions,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    pub fn carbon_emissions(&self) -> f64 {
        self.carbon_emissions
    }

    pub fn combined_weight(&self) -> f64 {
        self.combined_weight
    }

    /// Cost of the edge under the given weight function.
    pub fn weight(&self, weight: WeightFunction) -> f64 {
        match weight {
            WeightFunction::TravelTime => self.travel_time,
            WeightFunction::Length => self.length,
            WeightFunction::CombinedWeight => self.combined_weight,
        }
    }

    /// Total order between parallel edges under the given weight function.
    pub fn compare_by(&self, other: &Self, weight: WeightFunction) -> Ordering {
        self.weight(weight).total_cmp(&other.weight(weight))
    }

    /// Bit-for-bit equality of all four attributes.
    pub fn bitwise_eq(&self, other: &Self) -> bool {
        self.length.to_bits() == other.length.to_bits()
            && self.travel_time.to_bits() == other.travel_time.to_bits()
            && self.carbon_emissions.to_bits() == other.carbon_emissions.to_bits()
            && self.combined_weight.to_bits() == other.combined_weight.to_bits()
    }

    fn named_values(&self) -> [(&'static str, f64); 4] {
        [
            ("length", self.length),
            ("travel_time", self.travel_time),
            ("carbon_emissions", self.carbon_emissions),
            ("combined_weight", self.combined_weight),
        ]
    }
}

/// Directed edge stored in the adjacency list of its source node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    target: NodeIndex,
    attributes: EdgeAttributes,
}

impl Edge {
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    pub fn attributes(&self) -> &EdgeAttributes {
        &self.attributes
    }
}

/// Record of an edge detached by [`Graph::remove_edge`].
///
/// Holds everything needed to put the edge back exactly where it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovedEdge {
    source: NodeIndex,
    slot: usize,
    edge: Edge,
    from_id: NodeId,
    to_id: NodeId,
}

impl RemovedEdge {
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn target(&self) -> NodeIndex {
        self.edge.target
    }

    pub fn attributes(&self) -> &EdgeAttributes {
        &self.edge.attributes
    }
}

/// Directed road-network multigraph.
///
/// Nodes live in a dense arena addressed by [`NodeIndex`]; the original ids are
/// translated through an index table.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<NodeId, NodeIndex>,
    adjacency: Vec<Vec<Edge>>,
    suspended: Vec<bool>,
    edge_count: usize,
    emissions_factor: f64,
}

impl Graph {
    /// Number of nodes, including suspended ones.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges currently attached.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Emissions factor the edge attributes were derived with.
    pub fn emissions_factor(&self) -> f64 {
        self.emissions_factor
    }

    /// Translate a node id into its arena index.
    pub fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.index
            .get(&id)
            .copied()
            .ok_or(Error::NodeNotFound { id })
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Node stored at `index`.
    ///
    /// Indices are only handed out by this graph, so a foreign index panics.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0]
    }

    /// Nodes in arena order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Outgoing edges of a node (possibly empty).
    pub fn neighbours(&self, index: NodeIndex) -> &[Edge] {
        self.adjacency
            .get(index.0)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every edge as `(from, to, attributes)` in adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttributes)> {
        self.edge_nodes()
            .map(|(from, to, attributes)| (from.id, to.id, attributes))
    }

    /// Every edge with its endpoint nodes, in adjacency order.
    pub fn edge_nodes(&self) -> impl Iterator<Item = (&Node, &Node, &EdgeAttributes)> {
        self.adjacency.iter().enumerate().flat_map(move |(source, edges)| {
            let from = &self.nodes[source];
            edges
                .iter()
                .map(move |edge| (from, &self.nodes[edge.target.0], &edge.attributes))
        })
    }

    /// Parallel edges from `from` to `to`, in insertion order.
    pub fn edges_between(&self, from: NodeIndex, to: NodeIndex) -> impl Iterator<Item = &Edge> {
        self.neighbours(from)
            .iter()
            .filter(move |edge| edge.target == to)
    }

    /// Cheapest parallel edge under `weight`; the earliest inserted wins ties.
    pub fn cheapest_edge(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        weight: WeightFunction,
    ) -> Option<&Edge> {
        self.edges_between(from, to)
            .min_by(|a, b| a.attributes.compare_by(&b.attributes, weight))
    }

    /// Sum of the cheapest parallel edge along consecutive nodes.
    ///
    /// Returns `None` when any hop has no edge. A single node costs 0.
    pub fn path_cost(&self, path: &[NodeIndex], weight: WeightFunction) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, pair| {
            self.cheapest_edge(pair[0], pair[1], weight)
                .map(|edge| total + edge.attributes.weight(weight))
        })
    }

    /// Whether the node is temporarily hidden from searches.
    pub fn is_suspended(&self, index: NodeIndex) -> bool {
        self.suspended.get(index.0).copied().unwrap_or(false)
    }

    /// Hide a node from searches. Returns `false` if it was already hidden.
    pub(crate) fn suspend_node(&mut self, index: NodeIndex) -> bool {
        match self.suspended.get_mut(index.0) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn resume_node(&mut self, index: NodeIndex) {
        if let Some(flag) = self.suspended.get_mut(index.0) {
            *flag = false;
        }
    }

    /// Detach exactly one `from -> to` edge whose attributes match `attributes`
    /// bit for bit.
    pub fn remove_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        attributes: &EdgeAttributes,
    ) -> Result<RemovedEdge> {
        let not_found = || Error::EdgeNotFound {
            from: self.nodes.get(from.0).map_or(-1, |node| node.id),
            to: self.nodes.get(to.0).map_or(-1, |node| node.id),
        };

        let slot = self
            .adjacency
            .get(from.0)
            .and_then(|edges| {
                edges.iter().position(|edge| {
                    edge.target == to && edge.attributes.bitwise_eq(attributes)
                })
            })
            .ok_or_else(not_found)?;

        let edge = self.adjacency[from.0].remove(slot);
        self.edge_count -= 1;

        Ok(RemovedEdge {
            source: from,
            slot,
            edge,
            from_id: self.nodes[from.0].id,
            to_id: self.nodes[to.0].id,
        })
    }

    /// Reinsert a detached edge at its original adjacency position.
    pub fn restore_edge(&mut self, removed: RemovedEdge) -> Result<()> {
        let failure = |reason: &str| Error::GraphMutationFailure {
            from: removed.from_id,
            to: removed.to_id,
            reason: reason.to_string(),
        };

        if removed.edge.target.0 >= self.nodes.len() {
            return Err(failure("target node is no longer addressable"));
        }
        let Some(edges) = self.adjacency.get_mut(removed.source.0) else {
            return Err(failure("source node is no longer addressable"));
        };

        let slot = removed.slot.min(edges.len());
        edges.insert(slot, removed.edge);
        self.edge_count += 1;
        Ok(())
    }
}

/// Incremental constructor for [`Graph`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<NodeId, NodeIndex>,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
    emissions_factor: f64,
}

impl GraphBuilder {
    /// Builder using [`DEFAULT_EMISSIONS_FACTOR`].
    pub fn new() -> Self {
        Self::with_emissions_factor(DEFAULT_EMISSIONS_FACTOR)
    }

    pub fn with_emissions_factor(emissions_factor: f64) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            adjacency: Vec::new(),
            edge_count: 0,
            emissions_factor,
        }
    }

    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> Result<NodeIndex> {
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateNode { id });
        }

        let index = NodeIndex(self.nodes.len());
        self.nodes.push(Node { id, lat, lon });
        self.index.insert(id, index);
        self.adjacency.push(Vec::new());
        Ok(index)
    }

    /// Add a directed edge, deriving emissions and combined weight from `length`.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length: f64,
        travel_time: f64,
    ) -> Result<()> {
        let source = self
            .index
            .get(&from)
            .copied()
            .ok_or(Error::NodeNotFound { id: from })?;
        let target = self
            .index
            .get(&to)
            .copied()
            .ok_or(Error::NodeNotFound { id: to })?;

        let attributes = EdgeAttributes::derive(length, travel_time, self.emissions_factor);
        for (attribute, value) in attributes.named_values() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight {
                    from,
                    to,
                    attribute,
                    value,
                });
            }
        }

        self.adjacency[source.0].push(Edge { target, attributes });
        self.edge_count += 1;
        Ok(())
    }

    pub fn build(self) -> Graph {
        let suspended = vec![false; self.nodes.len()];
        Graph {
            nodes: self.nodes,
            index: self.index,
            adjacency: self.adjacency,
            suspended,
            edge_count: self.edge_count,
            emissions_factor: self.emissions_factor,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
