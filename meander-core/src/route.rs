//! Composed routes and the control points that shaped them.

use std::time::Duration;

use crate::{Point, TrackPoint};

/// Role of a control point within a composed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ControlPointKind {
    /// User-mandated: an anchor or an ordered waypoint.
    Waypoint,
    /// Synthetic: sampled from ring intersections (or from a delegated
    /// round-trip trace) to stretch the route toward its target distance.
    Detour,
}

/// A point explicitly used to shape a route, as opposed to the dense trace.
///
/// Presentation collaborators need the distinction: true waypoints are marked
/// on maps, synthetic detours are not.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// Position of the control point.
    pub point: Point,
    /// Whether the caller mandated it or the sampler invented it.
    pub kind: ControlPointKind,
}

impl ControlPoint {
    /// A user-mandated control point.
    #[must_use]
    pub const fn waypoint(point: Point) -> Self {
        Self {
            point,
            kind: ControlPointKind::Waypoint,
        }
    }

    /// A synthetic, sampled control point.
    #[must_use]
    pub const fn detour(point: Point) -> Self {
        Self {
            point,
            kind: ControlPointKind::Detour,
        }
    }
}

/// One leg of a composition plan and the distance it is responsible for.
///
/// A stage's endpoints are always the most recently resolved control points;
/// composers construct stages on the fly and never from stale positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// Start of the leg.
    pub start: Point,
    /// End of the leg.
    pub end: Point,
    /// Distance this leg should contribute to the final route, in metres.
    pub target_m: f64,
}

/// The finished product: one continuous trace plus the control points used
/// to produce it and the aggregate metrics summed over its stages.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use meander_core::{ComposedRoute, ControlPoint, Point, TrackPoint};
///
/// let anchor = Point::new(51.9086, -2.0864);
/// let route = ComposedRoute {
///     control_points: vec![ControlPoint::waypoint(anchor), ControlPoint::waypoint(anchor)],
///     trace: vec![TrackPoint::new(anchor)],
///     distance_m: 0.0,
///     duration: Duration::ZERO,
///     elevation_gain_m: 0.0,
///     elevation_loss_m: 0.0,
/// };
/// assert!(route.closes_loop());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComposedRoute {
    /// Ordered control points, waypoints and synthetic detours tagged apart.
    pub control_points: Vec<ControlPoint>,
    /// Continuous coordinate trace with junctions de-duplicated.
    pub trace: Vec<TrackPoint>,
    /// Total path distance in metres.
    pub distance_m: f64,
    /// Total travel duration.
    pub duration: Duration,
    /// Total elevation gain in metres.
    pub elevation_gain_m: f64,
    /// Total elevation loss in metres.
    pub elevation_loss_m: f64,
}

impl ComposedRoute {
    /// Whether the control-point list starts and ends at the same position
    /// (quantised identity).
    #[must_use]
    pub fn closes_loop(&self) -> bool {
        match (self.control_points.first(), self.control_points.last()) {
            (Some(first), Some(last)) => first.point.key() == last.point.key(),
            _ => false,
        }
    }
}
