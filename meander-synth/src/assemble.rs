//! Route assembly: concatenating stage segments into one continuous route.

use std::time::Duration;

use meander_core::{ComposedRoute, ControlPoint, RouteSegment};

/// Concatenate per-stage segments into a [`ComposedRoute`].
///
/// Traces are joined end to end; when a stage starts where the previous one
/// ended (quantised identity) the shared junction sample appears once.
/// Distance, duration and elevation are summed over the stages. No routing
/// decisions happen here.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use meander_core::{ControlPoint, Point, RouteSegment, TrackPoint};
/// use meander_synth::assemble;
///
/// let a = Point::new(51.90, -2.0);
/// let b = Point::new(51.91, -2.0);
/// let c = Point::new(51.92, -2.0);
/// let leg = |from: Point, to: Point| RouteSegment {
///     distance_m: 1_100.0,
///     duration: Duration::from_secs(800),
///     elevation_gain_m: 5.0,
///     elevation_loss_m: 2.0,
///     trace: vec![TrackPoint::new(from), TrackPoint::new(to)],
/// };
///
/// let route = assemble(
///     vec![leg(a, b), leg(b, c)],
///     vec![ControlPoint::waypoint(a), ControlPoint::waypoint(b), ControlPoint::waypoint(c)],
/// );
/// assert_eq!(route.trace.len(), 3); // the shared junction at b appears once
/// assert_eq!(route.distance_m, 2_200.0);
/// assert_eq!(route.duration, Duration::from_secs(1_600));
/// ```
#[must_use]
pub fn assemble(segments: Vec<RouteSegment>, control_points: Vec<ControlPoint>) -> ComposedRoute {
    let mut trace = Vec::new();
    let mut distance_m = 0.0;
    let mut duration = Duration::ZERO;
    let mut elevation_gain_m = 0.0;
    let mut elevation_loss_m = 0.0;

    for segment in segments {
        distance_m += segment.distance_m;
        duration += segment.duration;
        elevation_gain_m += segment.elevation_gain_m;
        elevation_loss_m += segment.elevation_loss_m;

        let mut samples = segment.trace.into_iter();
        if let Some(first) = samples.next() {
            let duplicate_junction = trace
                .last()
                .is_some_and(|previous: &meander_core::TrackPoint| {
                    previous.point.key() == first.point.key()
                });
            if !duplicate_junction {
                trace.push(first);
            }
            trace.extend(samples);
        }
    }

    ComposedRoute {
        control_points,
        trace,
        distance_m,
        duration,
        elevation_gain_m,
        elevation_loss_m,
    }
}
