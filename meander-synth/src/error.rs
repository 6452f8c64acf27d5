//! Error types for the synthesis pipeline.

use meander_core::{OracleError, Point};
use thiserror::Error;

/// Errors from a single ring-sampling operation.
///
/// Empty rings and missing intersections are stage-local conditions: the
/// multi-waypoint composer absorbs them (the leg stays direct) while the
/// self-composed loop treats them as fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// The tolerance band around the centre contained no candidates.
    #[error("ring around {center:?} at {target_m:.0} m has no candidates")]
    EmptyRing {
        /// Centre the ring was requested around.
        center: Point,
        /// Target path distance in metres.
        target_m: f64,
    },
    /// Both rings held candidates but shared none.
    #[error("the sampled rings share no common point")]
    NoIntersection,
    /// The oracle failed outright; always fatal to the request.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Errors surfaced by the composers and the synthesis entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthesisError {
    /// The request held no waypoints at all.
    #[error("at least one waypoint is required")]
    NoWaypoints,
    /// The target distance was zero, negative, or not finite.
    #[error("target distance must be positive and finite, got {target_m} m")]
    InvalidTargetDistance {
        /// The rejected value in metres.
        target_m: f64,
    },
    /// A network-oracle call failed; not retried here.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// Control points could not be resolved, or the final aggregate route
    /// request found no route through them.
    #[error("route synthesis failed")]
    RouteSynthesisFailed {
        /// The sampling failure that triggered this, when there was one.
        #[source]
        source: Option<SampleError>,
    },
    /// The request's cancellation token tripped between stages.
    #[error("composition request was cancelled")]
    Cancelled,
}

impl SynthesisError {
    /// Map a sampling failure in a context where it is fatal.
    ///
    /// Oracle transport failures keep their own variant; empty rings and
    /// missing intersections become [`SynthesisError::RouteSynthesisFailed`].
    #[must_use]
    pub fn from_fatal_sample(error: SampleError) -> Self {
        match error {
            SampleError::Oracle(oracle) => Self::Oracle(oracle),
            other => Self::RouteSynthesisFailed {
                source: Some(other),
            },
        }
    }
}
