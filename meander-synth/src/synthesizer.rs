//! The synthesis entry point: validation, dispatch, and cleanup.

use meander_core::{
    elevation_totals, trace_length_m, CancelToken, ComposedRoute, NetworkOracle, Point, Profile,
};
use rand::Rng;

use crate::cleaner::SpurCleaner;
use crate::loop_composer::{LoopComposer, LoopStrategy};
use crate::waypoint_composer::WaypointComposer;
use crate::{
    SynthesisError, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_SPUR_FRACTION, DEFAULT_TOLERANCE_M,
};

/// Tuning knobs for [`Synthesizer`].
#[derive(Debug, Clone)]
pub struct SynthesizerConfig {
    /// Ring tolerance band half-width in metres.
    pub ring_tolerance_m: f64,
    /// Spur threshold as a fraction of total route length.
    pub min_spur_fraction: f64,
    /// Bound on spur-cleanup passes.
    pub max_clean_iterations: usize,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            ring_tolerance_m: DEFAULT_TOLERANCE_M,
            min_spur_fraction: DEFAULT_MIN_SPUR_FRACTION,
            max_clean_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Parameters for one synthesis request.
///
/// The request captures the routing profile, the mandated waypoints, the
/// target distance, and a cancellation token; the random source is injected
/// separately so callers control reproducibility per request.
///
/// # Examples
/// ```
/// use meander_core::{CancelToken, Point, Profile};
/// use meander_synth::SynthesisRequest;
///
/// # fn main() -> Result<(), meander_core::ProfileError> {
/// let request = SynthesisRequest {
///     profile: Profile::new("foot")?,
///     waypoints: vec![Point::new(51.9086, -2.0864)],
///     target_distance_m: 6_000.0,
///     close_loop: true,
///     cancel: CancelToken::new(),
/// };
/// assert_eq!(request.waypoints.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Routing profile forwarded to the oracle.
    pub profile: Profile,
    /// Ordered waypoints; a single entry requests an anchor loop.
    pub waypoints: Vec<Point>,
    /// Target route distance in metres.
    pub target_distance_m: f64,
    /// Whether a multi-waypoint route should return to its start.
    pub close_loop: bool,
    /// Cooperative cancellation, checked between stages.
    pub cancel: CancelToken,
}

/// Master entry point dispatching between the loop and waypoint composers.
///
/// A single waypoint becomes an anchor loop — delegated to the oracle's
/// round-trip primitive when available, self-composed from ring samples
/// otherwise. Multiple waypoints become an ordered waypoint route. Either
/// way the assembled trace is swept by the [`SpurCleaner`] before it is
/// returned.
#[derive(Debug)]
pub struct Synthesizer<O> {
    oracle: O,
    config: SynthesizerConfig,
}

impl<O: NetworkOracle> Synthesizer<O> {
    /// A synthesizer with default configuration.
    pub fn new(oracle: O) -> Self {
        Self::with_config(oracle, SynthesizerConfig::default())
    }

    /// A synthesizer with explicit configuration.
    pub const fn with_config(oracle: O, config: SynthesizerConfig) -> Self {
        Self { oracle, config }
    }

    /// The oracle this synthesizer routes through.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Synthesize a route for `request`.
    ///
    /// Input is validated before any oracle call; stage-local sampling
    /// failures in the waypoint path are absorbed, everything else surfaces
    /// as a typed [`SynthesisError`].
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        request: &SynthesisRequest,
        rng: &mut R,
    ) -> Result<ComposedRoute, SynthesisError> {
        validate(request)?;
        if request.cancel.is_cancelled() {
            return Err(SynthesisError::Cancelled);
        }

        let route = if let [anchor] = request.waypoints.as_slice() {
            let strategy = if self.oracle.supports_round_trip() {
                LoopStrategy::Delegated
            } else {
                LoopStrategy::SelfComposed
            };
            log::info!(
                "anchor loop for '{}': target {:.0} m via {strategy:?}",
                request.profile,
                request.target_distance_m
            );
            LoopComposer::with_tolerance(&self.oracle, self.config.ring_tolerance_m).compose(
                &request.profile,
                *anchor,
                request.target_distance_m,
                strategy,
                &request.cancel,
                rng,
            )?
        } else {
            log::info!(
                "waypoint route for '{}': {} waypoints, target {:.0} m",
                request.profile,
                request.waypoints.len(),
                request.target_distance_m
            );
            WaypointComposer::with_tolerance(&self.oracle, self.config.ring_tolerance_m).compose(
                &request.profile,
                &request.waypoints,
                request.target_distance_m,
                request.close_loop,
                &request.cancel,
                rng,
            )?
        };

        Ok(self.remove_spurs(route, request.target_distance_m))
    }

    /// Sweep the assembled trace for spurs and rescale metrics when the
    /// geometry shrank.
    fn remove_spurs(&self, route: ComposedRoute, target_m: f64) -> ComposedRoute {
        let cleaner = SpurCleaner::new()
            .with_min_spur_fraction(self.config.min_spur_fraction)
            .with_max_iterations(self.config.max_clean_iterations);
        let original_length_m = trace_length_m(&route.trace);
        let outcome = cleaner.clean(&route.trace, target_m);
        if outcome.trace.len() == route.trace.len() || original_length_m <= 0.0 {
            return route;
        }

        log::info!(
            "spur cleanup removed {} samples over {} passes ({:.0} m -> {:.0} m)",
            route.trace.len() - outcome.trace.len(),
            outcome.passes,
            original_length_m,
            outcome.length_m
        );

        // Oracle metrics refer to the uncleaned geometry; scale them by the
        // measured shrinkage. Elevation is recomputed exactly when the trace
        // carries elevations.
        let ratio = outcome.length_m / original_length_m;
        let (elevation_gain_m, elevation_loss_m) = if outcome
            .trace
            .iter()
            .any(|sample| sample.elevation_m.is_some())
        {
            elevation_totals(&outcome.trace)
        } else {
            (
                route.elevation_gain_m * ratio,
                route.elevation_loss_m * ratio,
            )
        };
        ComposedRoute {
            control_points: route.control_points,
            trace: outcome.trace,
            distance_m: route.distance_m * ratio,
            duration: route.duration.mul_f64(ratio),
            elevation_gain_m,
            elevation_loss_m,
        }
    }
}

fn validate(request: &SynthesisRequest) -> Result<(), SynthesisError> {
    if request.waypoints.is_empty() {
        return Err(SynthesisError::NoWaypoints);
    }
    if !request.target_distance_m.is_finite() || request.target_distance_m <= 0.0 {
        return Err(SynthesisError::InvalidTargetDistance {
            target_m: request.target_distance_m,
        });
    }
    Ok(())
}
