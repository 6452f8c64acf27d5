//! Network-oracle adapters for the Meander engine.
//!
//! This crate connects the engine to real routing services. The only
//! adapter today is [`GraphHopperOracle`], which implements
//! [`NetworkOracle`](meander_core::NetworkOracle) against a GraphHopper
//! instance: isodistance rings come from the `/spt` endpoint (CSV) and
//! routes from the `/route` endpoint (JSON).

#![forbid(unsafe_code)]

pub mod oracle;

pub use oracle::{GraphHopperConfig, GraphHopperOracle, OracleBuildError, DEFAULT_USER_AGENT};
