//! GraphHopper `/route` response types.
//!
//! Deserialisation types for the routing endpoint's JSON format. With
//! `points_encoded=false` the geometry arrives as a GeoJSON-style
//! coordinate array of `[longitude, latitude, elevation?]` triples.

use std::time::Duration;

use meander_core::{OracleError, Point, RouteSegment, TrackPoint};
use serde::Deserialize;

/// Top-level `/route` response.
///
/// GraphHopper reports "no route" as an empty `paths` array (or an error
/// payload without one); both decode to an empty list here.
#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    /// Candidate paths, best first. Only the first is consumed.
    #[serde(default)]
    pub paths: Vec<RoutePath>,
}

impl RouteResponse {
    /// The best path, converted to a [`RouteSegment`].
    pub(crate) fn into_segment(self) -> Result<Option<RouteSegment>, OracleError> {
        self.paths
            .into_iter()
            .next()
            .map(RoutePath::into_segment)
            .transpose()
    }
}

/// One routed path.
#[derive(Debug, Deserialize)]
pub(crate) struct RoutePath {
    /// Path distance in metres.
    pub distance: f64,
    /// Travel time in milliseconds.
    pub time: u64,
    /// Total elevation gain in metres.
    #[serde(default)]
    pub ascend: f64,
    /// Total elevation loss in metres.
    #[serde(default)]
    pub descend: f64,
    /// Path geometry.
    pub points: PathPoints,
}

/// Geometry container within a path.
#[derive(Debug, Deserialize)]
pub(crate) struct PathPoints {
    /// `[longitude, latitude, elevation?]` rows.
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

impl RoutePath {
    fn into_segment(self) -> Result<RouteSegment, OracleError> {
        let trace = self
            .points
            .coordinates
            .into_iter()
            .map(|row| match row.as_slice() {
                [lon, lat] => Ok(TrackPoint::new(Point::new(*lat, *lon))),
                [lon, lat, elevation, ..] => {
                    Ok(TrackPoint::with_elevation(Point::new(*lat, *lon), *elevation))
                }
                _ => Err(OracleError::Parse {
                    message: format!("coordinate row has {} values, expected 2 or 3", row.len()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteSegment {
            distance_m: self.distance,
            duration: Duration::from_millis(self.time),
            elevation_gain_m: self.ascend,
            elevation_loss_m: self.descend,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_route_with_elevation() {
        let json = r#"{
            "paths": [{
                "distance": 5873.4,
                "time": 4205000,
                "ascend": 61.0,
                "descend": 61.0,
                "bbox": [-2.12, 51.88, -2.04, 51.93],
                "points": {
                    "type": "LineString",
                    "coordinates": [
                        [-2.0864, 51.9086, 104.0],
                        [-2.0871, 51.9091, 106.5],
                        [-2.0883, 51.9099, 109.0]
                    ]
                }
            }]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        let segment = response
            .into_segment()
            .expect("rows are well formed")
            .expect("one path present");

        assert!((segment.distance_m - 5873.4).abs() < 1e-9);
        assert_eq!(segment.duration, Duration::from_millis(4_205_000));
        assert!((segment.elevation_gain_m - 61.0).abs() < 1e-9);
        assert_eq!(segment.trace.len(), 3);
        assert_eq!(segment.trace[0].elevation_m, Some(104.0));
        assert!((segment.trace[0].point.lat - 51.9086).abs() < 1e-9);
    }

    #[test]
    fn deserialise_route_without_elevation() {
        let json = r#"{
            "paths": [{
                "distance": 1200.0,
                "time": 900000,
                "points": { "coordinates": [[-2.0864, 51.9086], [-2.0871, 51.9091]] }
            }]
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        let segment = response
            .into_segment()
            .expect("rows are well formed")
            .expect("one path present");

        assert_eq!(segment.elevation_gain_m, 0.0);
        assert!(segment.trace.iter().all(|s| s.elevation_m.is_none()));
    }

    #[test]
    fn empty_paths_mean_no_route() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"paths": []}"#).expect("should deserialise");
        assert!(response.into_segment().expect("no rows to fail").is_none());
    }

    #[test]
    fn error_payloads_without_paths_mean_no_route() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"message": "Point 0 is out of bounds"}"#)
                .expect("should deserialise");
        assert!(response.into_segment().expect("no rows to fail").is_none());
    }

    #[test]
    fn short_coordinate_rows_are_a_parse_error() {
        let json = r#"{
            "paths": [{
                "distance": 10.0,
                "time": 1000,
                "points": { "coordinates": [[-2.0864]] }
            }]
        }"#;
        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");
        assert!(matches!(
            response.into_segment(),
            Err(OracleError::Parse { .. })
        ));
    }
}
