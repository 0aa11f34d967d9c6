use geo::{Distance, Haversine};
use tracing::{debug, warn};

use crate::graph::{Graph, Node, NodeIndex, WeightFunction};

/// Assumed top speed used to turn distance into a travel-time lower bound.
///
/// The loader derives missing travel times from this speed. Networks with
/// faster edges are handled by [`GreatCircleEstimator::for_graph`].
pub const DEFAULT_MAX_SPEED_KMH: f64 = 50.0;

/// Convert km/h to m/s.
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh * 1000.0 / 3600.0
}

/// Haversine great-circle distance between two nodes in meters.
pub fn great_circle_distance(from: &Node, to: &Node) -> f64 {
    Haversine.distance(from.point(), to.point())
}

/// Lower bound on the remaining cost from a node to the goal.
///
/// Implementations must be admissible and consistent for every weight function
/// they are queried with; returning 0 is always safe.
pub trait CostEstimator: Send + Sync {
    fn estimate(
        &self,
        graph: &Graph,
        from: NodeIndex,
        goal: NodeIndex,
        weight: WeightFunction,
    ) -> f64;
}

/// Estimator that never informs the search (Dijkstra behaviour).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroEstimator;

impl CostEstimator for ZeroEstimator {
    fn estimate(&self, _: &Graph, _: NodeIndex, _: NodeIndex, _: WeightFunction) -> f64 {
        0.0
    }
}

/// Straight-line estimator scaled into the unit of each weight function.
///
/// Each scale is a cost per straight-line meter. A scale of 0 means no
/// admissible bound exists and the estimate collapses to 0.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleEstimator {
    travel_time_scale: f64,
    length_scale: f64,
    combined_scale: f64,
}

impl GreatCircleEstimator {
    /// Estimator for networks whose edges are never shorter than the straight
    /// line between their endpoints nor faster than `assumed_max_speed_kmh`.
    pub fn new(assumed_max_speed_kmh: f64, emissions_factor: f64) -> Self {
        let assumed_max_speed_mps = kmh_to_mps(assumed_max_speed_kmh);
        let travel_time_scale =
            if assumed_max_speed_mps.is_finite() && assumed_max_speed_mps > 0.0 {
                1.0 / assumed_max_speed_mps
            } else {
                warn!(
                    assumed_max_speed_kmh,
                    "no usable speed bound; travel-time heuristic degrades to zero"
                );
                0.0
            };
        let combined_scale = if emissions_factor.is_finite() && emissions_factor >= 0.0 {
            1.0 + emissions_factor
        } else {
            warn!(
                emissions_factor,
                "unusable emissions factor; combined-weight heuristic degrades to zero"
            );
            0.0
        };

        Self {
            travel_time_scale,
            length_scale: 1.0,
            combined_scale,
        }
    }

    /// Estimator that stays admissible on `graph`.
    ///
    /// Starts from [`GreatCircleEstimator::new`] and lowers every scale to the
    /// cheapest cost per straight-line meter found on any edge, so roads faster
    /// than the assumed speed or shorter than their chord never make the
    /// estimate overshoot.
    pub fn for_graph(graph: &Graph, assumed_max_speed_kmh: f64) -> Self {
        let mut estimator = Self::new(assumed_max_speed_kmh, graph.emissions_factor());
        let defaults = estimator;

        for (from, to, attributes) in graph.edge_nodes() {
            let distance = great_circle_distance(from, to);
            if !(distance.is_finite() && distance > 0.0) {
                continue;
            }
            estimator.travel_time_scale = estimator
                .travel_time_scale
                .min(attributes.travel_time() / distance);
            estimator.length_scale = estimator.length_scale.min(attributes.length() / distance);
            estimator.combined_scale = estimator
                .combined_scale
                .min(attributes.combined_weight() / distance);
        }

        if estimator.travel_time_scale < defaults.travel_time_scale
            || estimator.length_scale < defaults.length_scale
            || estimator.combined_scale < defaults.combined_scale
        {
            debug!(
                travel_time_scale = estimator.travel_time_scale,
                length_scale = estimator.length_scale,
                combined_scale = estimator.combined_scale,
                "heuristic tightened to the network's fastest and shortest edges"
            );
        }
        estimator
    }

    /// Cost per straight-line meter, or 0 when no admissible bound exists.
    fn scale(&self, weight: WeightFunction) -> f64 {
        match weight {
            WeightFunction::TravelTime => self.travel_time_scale,
            WeightFunction::Length => self.length_scale,
            WeightFunction::CombinedWeight => self.combined_scale,
        }
    }
}

impl Default for GreatCircleEstimator {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_SPEED_KMH,
            crate::graph::DEFAULT_EMISSIONS_FACTOR,
        )
    }
}

impl CostEstimator for GreatCircleEstimator {
    fn estimate(
        &self,
        graph: &Graph,
        from: NodeIndex,
        goal: NodeIndex,
        weight: WeightFunction,
    ) -> f64 {
        let scale = self.scale(weight);
        if scale <= 0.0 || from == goal {
            return 0.0;
        }
        let distance = great_circle_distance(graph.node(from), graph.node(goal));
        if distance.is_finite() {
            distance * scale
        } else {
            0.0
        }
    }
}
