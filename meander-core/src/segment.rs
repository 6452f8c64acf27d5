//! Route segments: the oracle's response for one ordered point list.

use std::time::Duration;

use crate::TrackPoint;

/// Aggregate metrics and dense geometry for one routed leg or full route.
///
/// Fixed-shape value type validated at the oracle boundary; the composers
/// never see loosely-typed response maps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSegment {
    /// Path distance in metres.
    pub distance_m: f64,
    /// Travel duration.
    pub duration: Duration,
    /// Total elevation gain in metres.
    pub elevation_gain_m: f64,
    /// Total elevation loss in metres.
    pub elevation_loss_m: f64,
    /// Ordered coordinate trace, with elevation when the oracle provides it.
    pub trace: Vec<TrackPoint>,
}

/// Sum of positive and negative elevation deltas along a trace, in metres.
///
/// Samples without elevation are skipped; the returned pair is
/// `(gain, loss)` with loss reported as a positive magnitude.
#[must_use]
pub fn elevation_totals(trace: &[TrackPoint]) -> (f64, f64) {
    let mut gain = 0.0;
    let mut loss = 0.0;
    let elevations = trace.iter().filter_map(|sample| sample.elevation_m);
    let mut previous: Option<f64> = None;
    for elevation in elevations {
        if let Some(prev) = previous {
            let delta = elevation - prev;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
        previous = Some(elevation);
    }
    (gain, loss)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    fn sample(elevation_m: Option<f64>) -> TrackPoint {
        TrackPoint {
            point: Point::new(51.9, -2.0),
            elevation_m,
        }
    }

    #[test]
    fn totals_split_gain_and_loss() {
        let trace = vec![
            sample(Some(100.0)),
            sample(Some(130.0)),
            sample(Some(110.0)),
            sample(Some(115.0)),
        ];
        let (gain, loss) = elevation_totals(&trace);
        assert!((gain - 35.0).abs() < f64::EPSILON);
        assert!((loss - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn samples_without_elevation_are_skipped() {
        let trace = vec![
            sample(Some(100.0)),
            sample(None),
            sample(Some(90.0)),
        ];
        let (gain, loss) = elevation_totals(&trace);
        assert_eq!(gain, 0.0);
        assert!((loss - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_trace_has_no_elevation_change() {
        assert_eq!(elevation_totals(&[]), (0.0, 0.0));
    }
}
