//! Edge weight functions: [`Shortest`], [`Heuristic`], [`Fastest`], [`Custom`].
//!
//! All weights are evaluated per-edge during search, given the road network
//! context (`from`, `to`, and the vertex that led to `from`, if any — used
//! for turn-angle penalties).

use route_core::{HighwayKind, Point};

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use route_core::VertexId;

const TURN_ANGLE_LIMIT: f32 = std::f32::consts::PI / 3.0;

/// Computes an edge's cost for a search algorithm to minimise.
pub trait Weight {
    /// `prev` is the vertex the search arrived at `from` from, if any — used
    /// for turn-angle penalties. `None` for the very first edge out of the
    /// source.
    fn get(&self, graph: &Graph, from: VertexId, to: VertexId, prev: Option<VertexId>) -> f32;
}

/// Angle (radians, `0..=PI`) of the turn from segment `prev->from` to
/// segment `from->to`. Returns `0` if any two of the three points coincide
/// (straight-through or degenerate segments never incur a turn penalty).
pub fn angle(from: Point, to: Point, prev: Point) -> f32 {
    if from == to || to == prev || from == prev {
        return 0.0;
    }

    let side_a = Point::haversine(prev, from);
    let side_b = Point::haversine(from, to);
    let side_c = Point::haversine(prev, to);

    ((side_c * side_c - side_a * side_a - side_b * side_b) / (-2.0 * side_a * side_b)).acos()
}

/// `true` if `highway` is not practically usable by a car.
pub fn is_nonroad(highway: HighwayKind) -> bool {
    use HighwayKind::*;
    matches!(
        highway,
        Pedestrian
            | Footway
            | Cycleway
            | Path
            | Bridleway
            | Steps
            | Track
            | Busway
            | Escape
            | Raceway
            | Construction
            | Proposed
            | Unclassified
            | Service
            | Unknown
    )
}

/// Weight that goes for the shortest path: haversine distance plus a tiny
/// constant so a zero-length edge never has exactly zero cost.
pub struct Shortest;

impl Weight for Shortest {
    fn get(&self, graph: &Graph, from: VertexId, to: VertexId, _prev: Option<VertexId>) -> f32 {
        0.1 + Point::haversine(graph.point_of(from), graph.point_of(to))
    }
}

/// Cheap lower-bound estimate of remaining cost, for A*'s heuristic slot.
/// Deliberately avoids the trig in [`Point::haversine`].
pub struct Heuristic;

impl Weight for Heuristic {
    fn get(&self, graph: &Graph, from: VertexId, to: VertexId, _prev: Option<VertexId>) -> f32 {
        1.0 + 1000.0 * Point::distance_sq(graph.point_of(from), graph.point_of(to))
    }
}

/// Finds the fastest, most sane route: considers speed limits, road class,
/// turn angles, and whether a turn keeps the route on the same road.
pub struct Fastest;

impl Weight for Fastest {
    fn get(&self, graph: &Graph, from: VertexId, to: VertexId, prev: Option<VertexId>) -> f32 {
        let from_road = graph.road_of(from);
        let to_road = graph.road_of(to);

        let mut extra = 0.0;

        if let Some(prev) = prev {
            let alpha = angle(graph.point_of(from), graph.point_of(to), graph.point_of(prev));
            if alpha != 0.0 && alpha < TURN_ANGLE_LIMIT {
                extra += 15000.0 * (TURN_ANGLE_LIMIT - alpha);
            }
        }

        let speed_avg = (from_road.maxspeed + to_road.maxspeed) as f32 / 2.0;
        let rating_avg = ((from_road.rating() + to_road.rating()) / 2.0).max(1.0);

        let s = Point::haversine(graph.point_of(from), graph.point_of(to));
        let v = speed_avg.max(30.0) / 3.6;

        if from_road.id != to_road.id {
            extra += 200.0;
        }

        if is_nonroad(from_road.highway) && is_nonroad(to_road.highway) {
            extra += 1000.0;
        }

        extra + (s / v) * 500.0 + 1.0 / rating_avg * 100.0
    }
}

/// User-adjustable weight multipliers. Every field is a coefficient on one
/// term of [`Custom`]'s cost function; `0.0` disables that term entirely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Inverse road speed multiplier — penalises slow roads.
    pub slow: f32,
    /// Time multiplier, in seconds.
    pub time: f32,
    /// Distance multiplier, in metres.
    pub distance: f32,
    /// Turn-angle multiplier (angle is `0..=PI/3`; sharper turns cost more).
    pub turn_penalty: f32,
    /// Penalty for roads not usable by cars.
    pub nonroad_penalty: f32,
    /// Road-rating multiplier (base roads 64, motorways scaled down to 1).
    pub rating: f32,
    /// Penalty for toll roads.
    pub tolls: f32,
}

impl Coefficients {
    pub const DEFAULT: Coefficients = Coefficients {
        slow: 100.0,
        time: 1000.0,
        distance: 200.0,
        turn_penalty: 1000.0,
        nonroad_penalty: 10_000_000.0,
        rating: 1000.0,
        tolls: 0.0,
    };

    /// Parse 7 floats separated by `,` or `|`, in order: slow, time,
    /// distance, turn_penalty, nonroad_penalty, rating, tolls. Separators may
    /// be freely intermixed within one string (`"1,2|3,4|5|6,7"` is valid).
    pub fn parse(s: &str) -> GraphResult<Coefficients> {
        let parts: Vec<&str> = s.split([',', '|']).map(str::trim).collect();
        if parts.len() != 7 {
            return Err(GraphError::InvalidArgument(format!(
                "expected 7 coefficients separated by ',' or '|', got {}",
                parts.len()
            )));
        }

        let mut values = [0.0f32; 7];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .parse()
                .map_err(|_| GraphError::InvalidArgument(format!("not a number: '{part}'")))?;
        }

        Ok(Coefficients {
            slow: values[0],
            time: values[1],
            distance: values[2],
            turn_penalty: values[3],
            nonroad_penalty: values[4],
            rating: values[5],
            tolls: values[6],
        })
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// User-configurable linear combination of distance, time, turn angle, road
/// rating, toll avoidance and non-road avoidance.
pub struct Custom {
    pub coeffs: Coefficients,
}

impl Custom {
    pub fn new(coeffs: Coefficients) -> Self {
        Self { coeffs }
    }
}

impl Weight for Custom {
    fn get(&self, graph: &Graph, from: VertexId, to: VertexId, prev: Option<VertexId>) -> f32 {
        let coeffs = &self.coeffs;
        let from_road = graph.road_of(from);
        let to_road = graph.road_of(to);

        let distance = Point::haversine(graph.point_of(from), graph.point_of(to));
        let speed = ((from_road.maxspeed + to_road.maxspeed) as f32 / 2.0).max(30.0) / 3.6;
        let time = distance / speed;

        let mut total = coeffs.distance * distance + coeffs.slow * speed + coeffs.time * time;

        if coeffs.rating != 0.0 {
            let rating_avg = ((from_road.rating() + to_road.rating()) / 2.0).max(1.0);
            total += coeffs.rating * 64.0 / rating_avg;
        }

        if coeffs.nonroad_penalty != 0.0 && is_nonroad(from_road.highway) && is_nonroad(to_road.highway) {
            total += coeffs.nonroad_penalty;
        }

        if coeffs.tolls != 0.0 && from_road.toll && to_road.toll {
            total += coeffs.tolls;
        }

        if coeffs.turn_penalty != 0.0 {
            if let Some(prev) = prev {
                let alpha = angle(graph.point_of(from), graph.point_of(to), graph.point_of(prev));
                if alpha != 0.0 && alpha < TURN_ANGLE_LIMIT {
                    total += coeffs.turn_penalty * (TURN_ANGLE_LIMIT - alpha);
                }
            }
        }

        total
    }
}

/// Routing mode selector, matching the `--route` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOpt {
    Shortest,
    Fastest,
    Custom,
}

/// Build the `Weight` implementation for a routing mode.
pub fn create(kind: RouteOpt, coeffs: Option<Coefficients>) -> Box<dyn Weight> {
    match kind {
        RouteOpt::Shortest => Box::new(Shortest),
        RouteOpt::Fastest => Box::new(Fastest),
        RouteOpt::Custom => Box::new(Custom::new(coeffs.unwrap_or(Coefficients::DEFAULT))),
    }
}
