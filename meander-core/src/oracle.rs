//! The network oracle: the routable-network abstraction the engine consumes.

use thiserror::Error;

use crate::{Point, Profile, RingPoint, RouteSegment};

/// Parameters for a delegated round-trip request.
///
/// When supplied to [`NetworkOracle::route`], the point list holds exactly
/// one anchor and the oracle closes a loop of approximately the given
/// distance using the supplied seed. Callers must draw a fresh seed from
/// their injected random source per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    /// Approximate loop distance in metres.
    pub distance_m: f64,
    /// Seed forwarded to the oracle's own loop-shaping randomness.
    pub seed: i64,
}

/// Errors surfaced by a network oracle.
///
/// All variants are fatal to the current composition request; the core never
/// retries (retry policy, if any, belongs to the oracle adapter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// The request did not complete within the adapter's timeout.
    #[error("oracle request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The requested URL.
        url: String,
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The oracle answered with an HTTP error status.
    #[error("oracle request to {url} failed with status {status}: {message}")]
    Http {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail from the transport layer.
        message: String,
    },
    /// The oracle could not be reached.
    #[error("failed to reach oracle at {url}: {message}")]
    Network {
        /// The requested URL.
        url: String,
        /// Error detail from the transport layer.
        message: String,
    },
    /// The oracle's response could not be decoded.
    #[error("failed to decode oracle response: {message}")]
    Parse {
        /// Decoding error detail.
        message: String,
    },
    /// The request was malformed before it left the adapter.
    #[error("invalid oracle request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
}

/// A routable network able to answer isodistance and shortest-route queries.
///
/// Both calls are synchronous, idempotent, and side-effect-free from the
/// engine's perspective. Implementations are per-request collaborators; the
/// engine holds no connection state across requests.
///
/// # Examples
/// ```
/// use meander_core::{NetworkOracle, OracleError, Point, Profile, RingPoint, RoundTrip, RouteSegment};
///
/// /// An oracle for a network with no data at all.
/// struct EmptyNetwork;
///
/// impl NetworkOracle for EmptyNetwork {
///     fn ring(
///         &self,
///         _profile: &Profile,
///         _center: Point,
///         _distance_limit_m: f64,
///     ) -> Result<Vec<RingPoint>, OracleError> {
///         // No data is an empty set, not an error.
///         Ok(Vec::new())
///     }
///
///     fn route(
///         &self,
///         _profile: &Profile,
///         _points: &[Point],
///         _round_trip: Option<RoundTrip>,
///     ) -> Result<Option<RouteSegment>, OracleError> {
///         Ok(None)
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let oracle = EmptyNetwork;
/// let profile = Profile::new("foot")?;
/// assert!(oracle.ring(&profile, Point::new(51.9, -2.0), 2_500.0)?.is_empty());
/// assert!(!oracle.supports_round_trip());
/// # Ok(())
/// # }
/// ```
pub trait NetworkOracle {
    /// Points reachable from `center` up to `distance_limit_m` path metres.
    ///
    /// An empty set is a normal signal (no data around the centre), not an
    /// error; errors are reserved for transport and decoding failures.
    fn ring(
        &self,
        profile: &Profile,
        center: Point,
        distance_limit_m: f64,
    ) -> Result<Vec<RingPoint>, OracleError>;

    /// Shortest route visiting `points` in order.
    ///
    /// Returns `Ok(None)` when the network connects no such route. With
    /// `round_trip` supplied, `points` must hold exactly the anchor and the
    /// oracle produces a closed loop of approximately the requested
    /// distance.
    fn route(
        &self,
        profile: &Profile,
        points: &[Point],
        round_trip: Option<RoundTrip>,
    ) -> Result<Option<RouteSegment>, OracleError>;

    /// Whether this oracle implements the round-trip primitive natively.
    ///
    /// Composers use this to pick between the delegated and self-composed
    /// loop strategies.
    fn supports_round_trip(&self) -> bool {
        false
    }
}
