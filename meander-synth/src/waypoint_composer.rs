//! Route composition through an ordered list of mandated waypoints.

use meander_core::{
    CancelToken, ComposedRoute, ControlPoint, NetworkOracle, Point, Profile, RouteSegment, Stage,
};
use rand::Rng;

use crate::assemble::assemble;
use crate::sampler::RingSampler;
use crate::{SampleError, SynthesisError, DEFAULT_TOLERANCE_M};

/// Builds a route visiting required waypoints in order, stretched toward a
/// target distance by one sampled detour per leg.
///
/// Legs are never shortened: when the direct concatenation already meets the
/// target it is returned untouched. Sampling failures are local to their leg
/// — the leg stays direct and composition continues.
#[derive(Debug)]
pub struct WaypointComposer<'o, O> {
    oracle: &'o O,
    sampler: RingSampler<'o, O>,
}

impl<'o, O: NetworkOracle> WaypointComposer<'o, O> {
    /// A composer with the default ring tolerance.
    #[must_use]
    pub const fn new(oracle: &'o O) -> Self {
        Self::with_tolerance(oracle, DEFAULT_TOLERANCE_M)
    }

    /// A composer with an explicit ring tolerance in metres.
    #[must_use]
    pub const fn with_tolerance(oracle: &'o O, tolerance_m: f64) -> Self {
        Self {
            oracle,
            sampler: RingSampler::with_tolerance(oracle, tolerance_m),
        }
    }

    /// Compose a route through `waypoints` approximating `target_m` metres.
    ///
    /// With `close_loop` set, the first waypoint is appended when the list
    /// does not already end where it starts. Detour points are sampled with
    /// the injected `rng` in leg order, so a fixed seed fixes the route.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        waypoints: &[Point],
        target_m: f64,
        close_loop: bool,
        cancel: &CancelToken,
        rng: &mut R,
    ) -> Result<ComposedRoute, SynthesisError> {
        let ordered = close_waypoints(waypoints, close_loop);

        let legs = self.direct_legs(profile, &ordered, cancel)?;
        let direct_total: f64 = legs.iter().map(|leg| leg.distance_m).sum();

        // The direct concatenation already meets or exceeds the target, or
        // is too degenerate to scale: hand it back untouched.
        if direct_total >= target_m || direct_total <= 0.0 {
            log::debug!(
                "direct legs total {direct_total:.0} m against target {target_m:.0} m; no detours"
            );
            let control_points = ordered.into_iter().map(ControlPoint::waypoint).collect();
            return Ok(assemble(legs, control_points));
        }

        let multiplier = target_m / direct_total;
        log::debug!("stretching legs by {multiplier:.3} toward {target_m:.0} m");
        let control_points =
            self.detoured_control_points(profile, &ordered, &legs, multiplier, cancel, rng)?;

        let points: Vec<Point> = control_points.iter().map(|control| control.point).collect();
        let segment = self
            .oracle
            .route(profile, &points, None)?
            .ok_or(SynthesisError::RouteSynthesisFailed { source: None })?;
        Ok(assemble(vec![segment], control_points))
    }

    /// Shortest direct route for each consecutive waypoint pair.
    ///
    /// A leg the network cannot connect is fatal: the waypoints are
    /// user-mandated and cannot be dropped.
    fn direct_legs(
        &self,
        profile: &Profile,
        ordered: &[Point],
        cancel: &CancelToken,
    ) -> Result<Vec<RouteSegment>, SynthesisError> {
        let mut legs = Vec::with_capacity(ordered.len().saturating_sub(1));
        for pair in ordered.windows(2) {
            if cancel.is_cancelled() {
                return Err(SynthesisError::Cancelled);
            }
            let segment = self
                .oracle
                .route(profile, pair, None)?
                .ok_or(SynthesisError::RouteSynthesisFailed { source: None })?;
            legs.push(segment);
        }
        Ok(legs)
    }

    /// Interleave waypoints with one sampled detour per leg.
    fn detoured_control_points<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        ordered: &[Point],
        legs: &[RouteSegment],
        multiplier: f64,
        cancel: &CancelToken,
        rng: &mut R,
    ) -> Result<Vec<ControlPoint>, SynthesisError> {
        let mut control_points = vec![ControlPoint::waypoint(ordered[0])];
        for (index, pair) in ordered.windows(2).enumerate() {
            if cancel.is_cancelled() {
                return Err(SynthesisError::Cancelled);
            }
            let stage = Stage {
                start: pair[0],
                end: pair[1],
                target_m: legs[index].distance_m * multiplier,
            };
            // The detour sits on the intersection of rings of half the
            // stage target around both endpoints.
            let half_stage_m = stage.target_m / 2.0;
            match self
                .sampler
                .sample_intersection(profile, stage.start, stage.end, half_stage_m, rng)
            {
                Ok(detour) => control_points.push(ControlPoint::detour(detour)),
                Err(SampleError::Oracle(error)) => return Err(error.into()),
                Err(error) => {
                    log::warn!("leg {index} stays direct: {error}");
                }
            }
            control_points.push(ControlPoint::waypoint(pair[1]));
        }
        Ok(control_points)
    }
}

/// Append the first waypoint when loop closure is requested and the list
/// does not already close (quantised identity).
fn close_waypoints(waypoints: &[Point], close_loop: bool) -> Vec<Point> {
    let mut ordered = waypoints.to_vec();
    if close_loop
        && let (Some(first), Some(last)) = (ordered.first().copied(), ordered.last())
        && first.key() != last.key()
    {
        ordered.push(first);
    }
    ordered
}
