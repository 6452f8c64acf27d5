//! Geographic positions and the dense coordinate traces built from them.

use geo::line_measures::Distance;
use geo::Haversine;

/// Quantisation applied when deriving a [`PointKey`]: one key unit is a
/// micro-degree, roughly 0.11 m of latitude.
const KEY_SCALE: f64 = 1e6;

/// A WGS84 position in degrees.
///
/// Immutable value type. Equality on raw floats is fragile across a network
/// boundary, so identity comparisons (ring intersection, spur detection) go
/// through [`Point::key`] instead of `PartialEq`.
///
/// # Examples
/// ```
/// use meander_core::Point;
///
/// let cheltenham = Point::new(51.9086, -2.0864);
/// assert_eq!(cheltenham.lat, 51.9086);
/// assert_eq!(cheltenham.key(), Point::new(51.908_600_4, -2.086_400_4).key());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Point {
    /// Construct a point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Quantised identity key for this point.
    ///
    /// Coordinates are rounded to micro-degrees so that the same network node
    /// reported twice with float noise still compares equal.
    #[must_use]
    pub fn key(&self) -> PointKey {
        PointKey {
            lat_micro: quantise(self.lat),
            lon_micro: quantise(self.lon),
        }
    }

    /// Great-circle distance to `other` in metres.
    #[must_use]
    pub fn haversine_distance_m(&self, other: &Self) -> f64 {
        Haversine.distance(geo::Point::from(*self), geo::Point::from(*other))
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(point: Point) -> Self {
        Self::new(point.lon, point.lat)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn quantise(degrees: f64) -> i64 {
    (degrees * KEY_SCALE).round() as i64
}

/// Micro-degree identity key derived from a [`Point`].
///
/// Hashable and totally ordered, so it can index maps and produce
/// deterministic iteration orders where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    lat_micro: i64,
    lon_micro: i64,
}

/// One sample of a dense route trace: a position with optional elevation.
///
/// # Examples
/// ```
/// use meander_core::{Point, TrackPoint};
///
/// let flat = TrackPoint::new(Point::new(51.9, -2.0));
/// assert!(flat.elevation_m.is_none());
///
/// let hill = TrackPoint::with_elevation(Point::new(51.9, -2.0), 104.5);
/// assert_eq!(hill.elevation_m, Some(104.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackPoint {
    /// Position of the sample.
    pub point: Point,
    /// Elevation above sea level in metres, when the oracle provides it.
    pub elevation_m: Option<f64>,
}

impl TrackPoint {
    /// A trace sample without elevation.
    #[must_use]
    pub const fn new(point: Point) -> Self {
        Self {
            point,
            elevation_m: None,
        }
    }

    /// A trace sample with a known elevation in metres.
    #[must_use]
    pub const fn with_elevation(point: Point, elevation_m: f64) -> Self {
        Self {
            point,
            elevation_m: Some(elevation_m),
        }
    }
}

/// Haversine length in metres of a trace, summed over consecutive samples.
///
/// Returns `0.0` for traces with fewer than two samples.
#[must_use]
pub fn trace_length_m(trace: &[TrackPoint]) -> f64 {
    trace
        .windows(2)
        .map(|pair| pair[0].point.haversine_distance_m(&pair[1].point))
        .sum()
}
