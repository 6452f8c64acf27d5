//! Loop composition from a single anchor point.

use meander_core::{
    CancelToken, ComposedRoute, ControlPoint, NetworkOracle, Point, Profile, RoundTrip, TrackPoint,
};
use rand::Rng;

use crate::assemble::assemble;
use crate::sampler::RingSampler;
use crate::{SynthesisError, DEFAULT_TOLERANCE_M};

/// Number of equal stages a self-composed loop is divided into.
const LOOP_STAGES: f64 = 3.0;

/// Upper bound on presentation control points derived from a delegated
/// round-trip trace.
const MAX_PRESENTATION_POINTS: usize = 8;

/// How a single-anchor loop is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStrategy {
    /// Hand the whole problem to the oracle's native round-trip primitive.
    Delegated,
    /// Chain ring samples into three stages and route through them.
    SelfComposed,
}

/// Builds a closed route from one anchor point.
///
/// Two strategies are supported. The delegated round trip forwards the
/// target distance and a fresh seed to the oracle; the self-composed loop
/// divides the target into three equal stages and samples the two
/// intermediate control points from isodistance rings.
#[derive(Debug)]
pub struct LoopComposer<'o, O> {
    oracle: &'o O,
    sampler: RingSampler<'o, O>,
}

impl<'o, O: NetworkOracle> LoopComposer<'o, O> {
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

    /// Compose a loop of approximately `target_m` metres from `anchor`.
    ///
    /// Any sampling failure or a final route request that finds no route is
    /// fatal and surfaces as [`SynthesisError::RouteSynthesisFailed`];
    /// transport failures keep [`SynthesisError::Oracle`].
    pub fn compose<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        anchor: Point,
        target_m: f64,
        strategy: LoopStrategy,
        cancel: &CancelToken,
        rng: &mut R,
    ) -> Result<ComposedRoute, SynthesisError> {
        match strategy {
            LoopStrategy::Delegated => self.compose_delegated(profile, anchor, target_m, rng),
            LoopStrategy::SelfComposed => {
                self.compose_self(profile, anchor, target_m, cancel, rng)
            }
        }
    }

    /// Delegate the loop to the oracle's round-trip primitive.
    fn compose_delegated<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        anchor: Point,
        target_m: f64,
        rng: &mut R,
    ) -> Result<ComposedRoute, SynthesisError> {
        // A fresh seed per invocation; loop shape varies across calls while
        // staying reproducible for a seeded request.
        let round_trip = RoundTrip {
            distance_m: target_m,
            seed: rng.gen_range(i64::MIN..=i64::MAX),
        };
        log::debug!(
            "delegated round trip for '{profile}': target {target_m:.0} m, seed {}",
            round_trip.seed
        );
        let segment = self
            .oracle
            .route(profile, &[anchor], Some(round_trip))?
            .ok_or(SynthesisError::RouteSynthesisFailed { source: None })?;

        let mut control_points = vec![ControlPoint::waypoint(anchor)];
        control_points.extend(
            presentation_points(&segment.trace)
                .into_iter()
                .map(ControlPoint::detour),
        );
        control_points.push(ControlPoint::waypoint(anchor));
        Ok(assemble(vec![segment], control_points))
    }

    /// Compose the loop from three equal ring-sampled stages.
    fn compose_self<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        anchor: Point,
        target_m: f64,
        cancel: &CancelToken,
        rng: &mut R,
    ) -> Result<ComposedRoute, SynthesisError> {
        let stage_m = target_m / LOOP_STAGES;
        log::debug!(
            "self-composed loop for '{profile}': target {target_m:.0} m, stage {stage_m:.0} m"
        );

        let anchor_ring = self
            .sampler
            .ring(profile, anchor, stage_m)
            .map_err(SynthesisError::from_fatal_sample)?;
        let outbound = self
            .sampler
            .pick(&anchor_ring, rng)
            .map_err(SynthesisError::from_fatal_sample)?;

        if cancel.is_cancelled() {
            return Err(SynthesisError::Cancelled);
        }

        // The closing point comes from the intersection of the outbound
        // point's ring with the anchor ring at the same stage radius; the
        // anchor ring is reused rather than fetched twice.
        let outbound_ring = self
            .sampler
            .ring(profile, outbound, stage_m)
            .map_err(SynthesisError::from_fatal_sample)?;
        let closing = self
            .sampler
            .pick_intersection(&anchor_ring, &outbound_ring, rng)
            .map_err(SynthesisError::from_fatal_sample)?;

        if cancel.is_cancelled() {
            return Err(SynthesisError::Cancelled);
        }

        let segment = self
            .oracle
            .route(profile, &[anchor, outbound, closing, anchor], None)?
            .ok_or(SynthesisError::RouteSynthesisFailed { source: None })?;

        let control_points = vec![
            ControlPoint::waypoint(anchor),
            ControlPoint::detour(outbound),
            ControlPoint::detour(closing),
            ControlPoint::waypoint(anchor),
        ];
        Ok(assemble(vec![segment], control_points))
    }
}

/// Up to [`MAX_PRESENTATION_POINTS`] evenly spaced positions from a trace.
///
/// Used only to decorate delegated round trips for presentation; these
/// points never steer routing.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn presentation_points(trace: &[TrackPoint]) -> Vec<Point> {
    let len = trace.len();
    if len == 0 {
        return Vec::new();
    }
    let samples = MAX_PRESENTATION_POINTS.min(len);
    if samples == len {
        return trace.iter().map(|sample| sample.point).collect();
    }
    (0..samples)
        .map(|i| {
            let index = ((i * (len - 1)) as f64 / (samples - 1) as f64).round() as usize;
            trace[index].point
        })
        .collect()
}
