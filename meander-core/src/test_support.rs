//! Test-only oracle implementations used by unit and behaviour tests.
//!
//! [`GridOracle`] models a synthetic street grid with exact, deterministic
//! path distances; [`ScriptedOracle`] replays pre-configured responses and
//! counts calls, for tests that pin down call ordering and failure paths.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    trace_length_m, NetworkOracle, OracleError, Point, PointKey, Profile, RingPoint, RoundTrip,
    RouteSegment, TrackPoint,
};

/// Metres per degree of latitude.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Walking speed used to derive durations, in metres per second.
const WALKING_SPEED_MPS: f64 = 1.4;

fn walking_duration(distance_m: f64) -> Duration {
    Duration::from_secs_f64(distance_m / WALKING_SPEED_MPS)
}

/// A deterministic oracle over a rectangular street grid.
///
/// Nodes sit on a lattice with a fixed spacing around an origin; the
/// shortest path between nodes is the Manhattan path along grid edges, so
/// ring distances and route distances agree exactly. The grid is unbounded.
#[derive(Debug, Clone)]
pub struct GridOracle {
    origin: Point,
    spacing_m: f64,
}

impl GridOracle {
    /// A grid centred on `origin` with the given edge length in metres.
    #[must_use]
    pub const fn new(origin: Point, spacing_m: f64) -> Self {
        Self { origin, spacing_m }
    }

    fn meters_per_degree_lon(&self) -> f64 {
        METERS_PER_DEGREE_LAT * self.origin.lat.to_radians().cos()
    }

    /// Position of the node at grid coordinates `(i, j)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn node_point(&self, i: i64, j: i64) -> Point {
        Point::new(
            self.origin.lat + (j as f64) * self.spacing_m / METERS_PER_DEGREE_LAT,
            self.origin.lon + (i as f64) * self.spacing_m / self.meters_per_degree_lon(),
        )
    }

    /// Grid coordinates of the node nearest to `point`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn nearest_node(&self, point: Point) -> (i64, i64) {
        let i = ((point.lon - self.origin.lon) * self.meters_per_degree_lon() / self.spacing_m)
            .round() as i64;
        let j = ((point.lat - self.origin.lat) * METERS_PER_DEGREE_LAT / self.spacing_m).round()
            as i64;
        (i, j)
    }

    #[allow(clippy::cast_precision_loss)]
    fn manhattan_m(&self, a: (i64, i64), b: (i64, i64)) -> f64 {
        (((a.0 - b.0).abs() + (a.1 - b.1).abs()) as f64) * self.spacing_m
    }

    /// Grid nodes along the L-shaped path from `a` to `b` (east-west first),
    /// both endpoints included.
    fn l_path(a: (i64, i64), b: (i64, i64)) -> Vec<(i64, i64)> {
        let mut nodes = vec![a];
        let (mut i, mut j) = a;
        while i != b.0 {
            i += (b.0 - i).signum();
            nodes.push((i, j));
        }
        while j != b.1 {
            j += (b.1 - j).signum();
            nodes.push((i, j));
        }
        nodes
    }
}

impl NetworkOracle for GridOracle {
    fn ring(
        &self,
        _profile: &Profile,
        center: Point,
        distance_limit_m: f64,
    ) -> Result<Vec<RingPoint>, OracleError> {
        if distance_limit_m <= 0.0 {
            return Ok(Vec::new());
        }
        let (ci, cj) = self.nearest_node(center);
        #[allow(clippy::cast_possible_truncation)]
        let radius = (distance_limit_m / self.spacing_m).floor() as i64;
        let mut reachable = Vec::new();
        for dj in -radius..=radius {
            for di in -radius..=radius {
                let steps = di.abs() + dj.abs();
                if steps == 0 || steps > radius {
                    continue;
                }
                #[allow(clippy::cast_precision_loss)]
                let distance_m = (steps as f64) * self.spacing_m;
                reachable.push(RingPoint::new(self.node_point(ci + di, cj + dj), distance_m));
            }
        }
        Ok(reachable)
    }

    fn route(
        &self,
        _profile: &Profile,
        points: &[Point],
        round_trip: Option<RoundTrip>,
    ) -> Result<Option<RouteSegment>, OracleError> {
        if round_trip.is_some() {
            return Err(OracleError::InvalidRequest {
                message: "grid oracle does not implement round trips".into(),
            });
        }
        if points.len() < 2 {
            return Err(OracleError::InvalidRequest {
                message: "at least two points are required to fetch a route".into(),
            });
        }

        let mut distance_m = 0.0;
        let mut trace: Vec<TrackPoint> = Vec::new();
        let mut previous = self.nearest_node(points[0]);
        trace.push(TrackPoint::new(self.node_point(previous.0, previous.1)));
        for point in &points[1..] {
            let next = self.nearest_node(*point);
            distance_m += self.manhattan_m(previous, next);
            for node in Self::l_path(previous, next).into_iter().skip(1) {
                trace.push(TrackPoint::new(self.node_point(node.0, node.1)));
            }
            previous = next;
        }

        Ok(Some(RouteSegment {
            distance_m,
            duration: walking_duration(distance_m),
            elevation_gain_m: 0.0,
            elevation_loss_m: 0.0,
            trace,
        }))
    }
}

/// Scripted route behaviour for [`ScriptedOracle`]; absent means routes are
/// synthesised as straight-line segments through the requested points.
#[derive(Debug, Clone)]
enum RouteScript {
    /// Report that the network connects no route.
    NoRoute,
    /// Fail with the given error.
    Fail(OracleError),
}

/// An oracle replaying pre-configured responses.
///
/// Ring responses are keyed by the centre's quantised position; unknown
/// centres yield an empty reachable set. Routes are synthesised as
/// straight-line traces through the requested points unless scripted
/// otherwise. Call counters let tests assert how many network round trips a
/// component performed.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    rings: HashMap<PointKey, Vec<RingPoint>>,
    ring_error: Option<OracleError>,
    route_script: Option<RouteScript>,
    round_trip_segment: Option<RouteSegment>,
    ring_calls: Cell<usize>,
    route_calls: Cell<usize>,
    ring_requests: RefCell<Vec<RingRequest>>,
}

/// One recorded ring query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingRequest {
    /// Centre the query was issued around.
    pub center: Point,
    /// Distance limit passed to the oracle, in metres.
    pub distance_limit_m: f64,
}

impl ScriptedOracle {
    /// An oracle with no data: every ring is empty, routes are synthesised.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reachable set around `center`.
    #[must_use]
    pub fn with_ring(mut self, center: Point, reachable: Vec<RingPoint>) -> Self {
        self.rings.insert(center.key(), reachable);
        self
    }

    /// Fail every ring query with `error`.
    #[must_use]
    pub fn with_ring_error(mut self, error: OracleError) -> Self {
        self.ring_error = Some(error);
        self
    }

    /// Answer every route query with "no route".
    #[must_use]
    pub fn without_routes(mut self) -> Self {
        self.route_script = Some(RouteScript::NoRoute);
        self
    }

    /// Fail every route query with `error`.
    #[must_use]
    pub fn with_route_error(mut self, error: OracleError) -> Self {
        self.route_script = Some(RouteScript::Fail(error));
        self
    }

    /// Support round trips, answering them with `segment`.
    #[must_use]
    pub fn with_round_trip(mut self, segment: RouteSegment) -> Self {
        self.round_trip_segment = Some(segment);
        self
    }

    /// Number of ring queries received so far.
    #[must_use]
    pub fn ring_calls(&self) -> usize {
        self.ring_calls.get()
    }

    /// Number of route queries received so far.
    #[must_use]
    pub fn route_calls(&self) -> usize {
        self.route_calls.get()
    }

    /// Every ring query received so far, in call order.
    #[must_use]
    pub fn ring_requests(&self) -> Vec<RingRequest> {
        self.ring_requests.borrow().clone()
    }

    fn synthesize_route(points: &[Point]) -> RouteSegment {
        let trace: Vec<TrackPoint> = points.iter().copied().map(TrackPoint::new).collect();
        let distance_m = trace_length_m(&trace);
        RouteSegment {
            distance_m,
            duration: walking_duration(distance_m),
            elevation_gain_m: 0.0,
            elevation_loss_m: 0.0,
            trace,
        }
    }
}

impl NetworkOracle for ScriptedOracle {
    fn ring(
        &self,
        _profile: &Profile,
        center: Point,
        distance_limit_m: f64,
    ) -> Result<Vec<RingPoint>, OracleError> {
        self.ring_calls.set(self.ring_calls.get() + 1);
        self.ring_requests.borrow_mut().push(RingRequest {
            center,
            distance_limit_m,
        });
        if let Some(error) = &self.ring_error {
            return Err(error.clone());
        }
        Ok(self.rings.get(&center.key()).cloned().unwrap_or_default())
    }

    fn route(
        &self,
        _profile: &Profile,
        points: &[Point],
        round_trip: Option<RoundTrip>,
    ) -> Result<Option<RouteSegment>, OracleError> {
        self.route_calls.set(self.route_calls.get() + 1);
        if round_trip.is_some() {
            return Ok(self.round_trip_segment.clone());
        }
        if points.len() < 2 {
            return Err(OracleError::InvalidRequest {
                message: "at least two points are required to fetch a route".into(),
            });
        }
        match &self.route_script {
            Some(RouteScript::NoRoute) => Ok(None),
            Some(RouteScript::Fail(error)) => Err(error.clone()),
            None => Ok(Some(Self::synthesize_route(points))),
        }
    }

    fn supports_round_trip(&self) -> bool {
        self.round_trip_segment.is_some()
    }
}
