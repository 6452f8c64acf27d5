//! Facade crate for the Meander route-synthesis engine.
//!
//! This crate re-exports the core domain types and exposes the synthesis
//! algorithms and the HTTP network-oracle adapter behind feature flags.

#![forbid(unsafe_code)]

pub use meander_core::{
    CancelToken, ComposedRoute, ControlPoint, ControlPointKind, NetworkOracle, OracleError, Point,
    PointKey, Profile, ProfileError, Ring, RingPoint, RoundTrip, RouteSegment, Stage, TrackPoint,
};

#[cfg(feature = "synth")]
pub use meander_synth::{
    LoopComposer, LoopStrategy, RingSampler, SampleError, SpurCleaner, SynthesisError,
    SynthesisRequest, Synthesizer, SynthesizerConfig, WaypointComposer,
};

#[cfg(feature = "oracle-http")]
pub use meander_data::{GraphHopperConfig, GraphHopperOracle, OracleBuildError};
