//! Route-synthesis algorithms for the Meander engine.
//!
//! This crate turns an anchor point or an ordered waypoint list into a
//! closed route approximating a target distance, using only the
//! [`NetworkOracle`](meander_core::NetworkOracle) primitives: isodistance
//! rings and ordered shortest-route requests. The pieces compose bottom-up:
//!
//! - [`RingSampler`] draws candidate control points from ring intersections;
//! - [`LoopComposer`] builds a loop from a single anchor (delegated to the
//!   oracle's round-trip primitive, or self-composed from three stages);
//! - [`WaypointComposer`] threads mandated waypoints and stretches each leg
//!   toward a scaled stage target;
//! - [`SpurCleaner`] removes short out-and-back excursions from the result;
//! - [`Synthesizer`] validates input, dispatches, and runs the cleanup.
//!
//! All randomness flows through an injected [`rand::Rng`], so a fixed seed
//! yields a fixed route.

#![forbid(unsafe_code)]

mod assemble;
mod cleaner;
mod error;
mod loop_composer;
mod sampler;
mod synthesizer;
mod waypoint_composer;

pub use assemble::assemble;
pub use cleaner::{
    CleanOutcome, CleanTermination, SpurCleaner, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_SPUR_FRACTION,
};
pub use error::{SampleError, SynthesisError};
pub use loop_composer::{LoopComposer, LoopStrategy};
pub use sampler::{RingSampler, DEFAULT_TOLERANCE_M};
pub use synthesizer::{SynthesisRequest, Synthesizer, SynthesizerConfig};
pub use waypoint_composer::WaypointComposer;
