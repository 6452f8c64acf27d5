//! HTTP `NetworkOracle` implementation against a GraphHopper instance.

use std::time::Duration;

use meander_core::{
    NetworkOracle, OracleError, Point, Profile, RingPoint, RoundTrip, RouteSegment,
};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::response::RouteResponse;
use super::spt::parse_spt;

/// Default user agent for GraphHopper requests.
pub const DEFAULT_USER_AGENT: &str = "meander-routing/0.1";

/// Default ring (`/spt`) request timeout in seconds.
const DEFAULT_RING_TIMEOUT_SECS: u64 = 10;

/// Default route (`/route`) request timeout in seconds.
const DEFAULT_ROUTE_TIMEOUT_SECS: u64 = 20;

/// Error type for [`GraphHopperOracle`] construction failures.
#[derive(Debug, Error)]
pub enum OracleBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`GraphHopperOracle`].
#[derive(Debug, Clone)]
pub struct GraphHopperConfig {
    /// Base URL of the GraphHopper instance (e.g. `"http://localhost:8989"`).
    pub base_url: String,
    /// Timeout for isodistance (`/spt`) requests.
    pub ring_timeout: Duration,
    /// Timeout for routing (`/route`) requests.
    pub route_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8989".to_string(),
            ring_timeout: Duration::from_secs(DEFAULT_RING_TIMEOUT_SECS),
            route_timeout: Duration::from_secs(DEFAULT_ROUTE_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl GraphHopperConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the ring request timeout.
    #[must_use]
    pub const fn with_ring_timeout(mut self, timeout: Duration) -> Self {
        self.ring_timeout = timeout;
        self
    }

    /// Set the route request timeout.
    #[must_use]
    pub const fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP-based network oracle using GraphHopper's `/spt` and `/route` APIs.
///
/// This oracle implements the synchronous
/// [`NetworkOracle`](meander_core::NetworkOracle) trait by internally
/// blocking on asynchronous HTTP requests. It owns a Tokio runtime that is
/// reused across calls, avoiding the overhead of creating a new runtime per
/// request.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the oracle uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. Within a
/// `current_thread` runtime it falls back to its own internal runtime,
/// which may deadlock if the caller's runtime drives IO this request
/// depends on.
///
/// # Example
///
/// ```no_run
/// use meander_core::{NetworkOracle, Point, Profile};
/// use meander_data::GraphHopperOracle;
///
/// let oracle = GraphHopperOracle::new("http://localhost:8989")?;
/// let profile = Profile::new("foot")?;
/// let reachable = oracle.ring(&profile, Point::new(51.8940, -2.0786), 2_500.0)?;
/// println!("{} reachable nodes", reachable.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct GraphHopperOracle {
    client: Client,
    config: GraphHopperConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for GraphHopperOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphHopperOracle")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl GraphHopperOracle {
    /// Create a new oracle with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, OracleBuildError> {
        Self::with_config(GraphHopperConfig::new(base_url))
    }

    /// Create a new oracle with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: GraphHopperConfig) -> Result<Self, OracleBuildError> {
        let connect_timeout = config.ring_timeout.min(config.route_timeout);
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(OracleBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(OracleBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Fetch the reachable set asynchronously.
    async fn fetch_ring_async(
        &self,
        profile: &Profile,
        center: Point,
        distance_limit_m: f64,
    ) -> Result<Vec<RingPoint>, OracleError> {
        let url = self.endpoint("spt");
        let params = ring_params(profile, center, distance_limit_m);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .timeout(self.config.ring_timeout)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.ring_timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.ring_timeout))?;

        let body = response.text().await.map_err(|err| OracleError::Parse {
            message: err.to_string(),
        })?;
        let reachable = parse_spt(&body);
        log::debug!("/spt returned {} reachable nodes", reachable.len());
        Ok(reachable)
    }

    /// Fetch a route asynchronously.
    async fn fetch_route_async(
        &self,
        profile: &Profile,
        points: &[Point],
        round_trip: Option<RoundTrip>,
    ) -> Result<Option<RouteSegment>, OracleError> {
        let url = self.endpoint("route");
        let params = route_params(profile, points, round_trip);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .timeout(self.config.route_timeout)
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.route_timeout))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &url, self.config.route_timeout))?;

        let payload: RouteResponse =
            response.json().await.map_err(|err| OracleError::Parse {
                message: err.to_string(),
            })?;
        payload.into_segment()
    }

    /// Block on a future using whichever runtime is appropriate.
    fn run_blocking<F, T>(&self, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own.
            _ => self.runtime.block_on(future),
        }
    }
}

/// Query parameters for an `/spt` request.
fn ring_params(profile: &Profile, center: Point, distance_limit_m: f64) -> Vec<(&'static str, String)> {
    #[allow(clippy::cast_possible_truncation)]
    let distance_limit = distance_limit_m.round() as i64;
    vec![
        ("profile", profile.as_str().to_string()),
        ("point", format_point(center)),
        ("distance_limit", distance_limit.to_string()),
    ]
}

/// Query parameters for a `/route` request.
fn route_params(
    profile: &Profile,
    points: &[Point],
    round_trip: Option<RoundTrip>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("profile", profile.as_str().to_string()),
        ("points_encoded", "false".to_string()),
        ("elevation", "true".to_string()),
        ("instructions", "false".to_string()),
    ];
    if let Some(round_trip) = round_trip {
        params.push(("algorithm", "round_trip".to_string()));
        params.push(("round_trip.distance", format!("{:.0}", round_trip.distance_m)));
        params.push(("round_trip.seed", round_trip.seed.to_string()));
    }
    for point in points {
        params.push(("point", format_point(*point)));
    }
    params
}

fn format_point(point: Point) -> String {
    format!("{},{}", point.lat, point.lon)
}

fn convert_reqwest_error(error: &reqwest::Error, url: &str, timeout: Duration) -> OracleError {
    if error.is_timeout() {
        return OracleError::Timeout {
            url: url.to_owned(),
            timeout_secs: timeout.as_secs(),
        };
    }

    if let Some(status) = error.status() {
        return OracleError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    OracleError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

impl NetworkOracle for GraphHopperOracle {
    fn ring(
        &self,
        profile: &Profile,
        center: Point,
        distance_limit_m: f64,
    ) -> Result<Vec<RingPoint>, OracleError> {
        self.run_blocking(self.fetch_ring_async(profile, center, distance_limit_m))
    }

    fn route(
        &self,
        profile: &Profile,
        points: &[Point],
        round_trip: Option<RoundTrip>,
    ) -> Result<Option<RouteSegment>, OracleError> {
        if round_trip.is_some() {
            if points.len() != 1 {
                return Err(OracleError::InvalidRequest {
                    message: "round-trip requests take exactly one anchor point".into(),
                });
            }
        } else if points.len() < 2 {
            return Err(OracleError::InvalidRequest {
                message: "at least two points are required to fetch a route".into(),
            });
        }
        self.run_blocking(self.fetch_route_async(profile, points, round_trip))
    }

    fn supports_round_trip(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn foot() -> Profile {
        Profile::new("foot").expect("valid profile")
    }

    #[rstest]
    fn endpoint_trims_trailing_slashes() {
        let oracle = GraphHopperOracle::new("http://localhost:8989/")
            .expect("oracle should build");
        assert_eq!(oracle.endpoint("spt"), "http://localhost:8989/spt");
    }

    #[rstest]
    fn ring_params_round_the_distance_limit(foot: Profile) {
        let params = ring_params(&foot, Point::new(51.894, -2.0786), 2_499.6);
        assert_eq!(
            params,
            vec![
                ("profile", "foot".to_string()),
                ("point", "51.894,-2.0786".to_string()),
                ("distance_limit", "2500".to_string()),
            ]
        );
    }

    #[rstest]
    fn route_params_list_points_in_order(foot: Profile) {
        let points = [Point::new(51.894, -2.0786), Point::new(51.9086, -2.0864)];
        let params = route_params(&foot, &points, None);
        let point_values: Vec<&String> = params
            .iter()
            .filter(|(name, _)| *name == "point")
            .map(|(_, value)| value)
            .collect();
        assert_eq!(point_values.len(), 2);
        assert_eq!(point_values[0], "51.894,-2.0786");
        assert!(params.contains(&("points_encoded", "false".to_string())));
        assert!(params.contains(&("elevation", "true".to_string())));
    }

    #[rstest]
    fn round_trip_params_carry_distance_and_seed(foot: Profile) {
        let anchor = [Point::new(51.9086, -2.0864)];
        let round_trip = RoundTrip {
            distance_m: 6_000.0,
            seed: -42,
        };
        let params = route_params(&foot, &anchor, Some(round_trip));
        assert!(params.contains(&("algorithm", "round_trip".to_string())));
        assert!(params.contains(&("round_trip.distance", "6000".to_string())));
        assert!(params.contains(&("round_trip.seed", "-42".to_string())));
    }

    #[rstest]
    fn round_trip_with_extra_points_is_rejected(foot: Profile) {
        let oracle = GraphHopperOracle::new("http://localhost:8989")
            .expect("oracle should build");
        let points = [Point::new(51.9, -2.0), Point::new(51.91, -2.0)];
        let error = oracle
            .route(
                &foot,
                &points,
                Some(RoundTrip {
                    distance_m: 6_000.0,
                    seed: 1,
                }),
            )
            .expect_err("two points cannot round-trip");
        assert!(matches!(error, OracleError::InvalidRequest { .. }));
    }

    #[rstest]
    fn single_point_routes_are_rejected(foot: Profile) {
        let oracle = GraphHopperOracle::new("http://localhost:8989")
            .expect("oracle should build");
        let error = oracle
            .route(&foot, &[Point::new(51.9, -2.0)], None)
            .expect_err("one point cannot route");
        assert!(matches!(error, OracleError::InvalidRequest { .. }));
    }

    #[rstest]
    fn config_builders_override_defaults() {
        let config = GraphHopperConfig::new("http://gh.example:8989")
            .with_ring_timeout(Duration::from_secs(3))
            .with_route_timeout(Duration::from_secs(7))
            .with_user_agent("meander-tests/0.0");
        assert_eq!(config.base_url, "http://gh.example:8989");
        assert_eq!(config.ring_timeout, Duration::from_secs(3));
        assert_eq!(config.route_timeout, Duration::from_secs(7));
        assert_eq!(config.user_agent, "meander-tests/0.0");
    }
}
