//! HTTP-based `NetworkOracle` backed by a GraphHopper instance.
//!
//! # Architecture
//!
//! The [`NetworkOracle`](meander_core::NetworkOracle) trait is synchronous
//! to keep the engine embeddable in synchronous contexts. This adapter
//! bridges the async HTTP calls to the sync interface by blocking on a
//! Tokio runtime internally.

mod http;
mod response;
mod spt;

pub use http::{GraphHopperConfig, GraphHopperOracle, OracleBuildError, DEFAULT_USER_AGENT};
