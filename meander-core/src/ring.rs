//! Isodistance rings: reachable points at approximately a target path
//! distance from a centre.

use std::collections::HashSet;

use crate::{Point, PointKey};

/// One reachable point together with its path distance from the ring centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingPoint {
    /// Position of the reachable network node.
    pub point: Point,
    /// Path distance from the centre in metres (not straight-line).
    pub distance_m: f64,
}

impl RingPoint {
    /// Construct a ring point.
    #[must_use]
    pub const fn new(point: Point, distance_m: f64) -> Self {
        Self { point, distance_m }
    }
}

/// An immutable snapshot of the points whose path distance from a centre
/// falls inside the tolerance band `[target - tol, target + tol]`.
///
/// Built by band-filtering the oracle's reachable set; members are kept in
/// the order the oracle reported them (no ordering guarantee beyond that),
/// which keeps sampling reproducible for a fixed seed.
///
/// # Examples
/// ```
/// use meander_core::{Point, Ring, RingPoint};
///
/// let centre = Point::new(51.9, -2.0);
/// let reachable = vec![
///     RingPoint::new(Point::new(51.91, -2.0), 1_600.0),
///     RingPoint::new(Point::new(51.92, -2.0), 2_400.0),
///     RingPoint::new(Point::new(51.93, -2.0), 3_100.0), // outside the band
/// ];
/// let ring = Ring::from_reachable(centre, 2_000.0, 500.0, reachable);
/// assert_eq!(ring.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    center: Point,
    target_m: f64,
    tolerance_m: f64,
    points: Vec<RingPoint>,
}

impl Ring {
    /// Band-filter a reachable set into a ring.
    #[must_use]
    pub fn from_reachable(
        center: Point,
        target_m: f64,
        tolerance_m: f64,
        reachable: Vec<RingPoint>,
    ) -> Self {
        let lower = target_m - tolerance_m;
        let upper = target_m + tolerance_m;
        let points = reachable
            .into_iter()
            .filter(|p| p.distance_m >= lower && p.distance_m <= upper)
            .collect();
        Self {
            center,
            target_m,
            tolerance_m,
            points,
        }
    }

    /// The centre the distances are measured from.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The target path distance in metres.
    #[must_use]
    pub const fn target_m(&self) -> f64 {
        self.target_m
    }

    /// The tolerance band half-width in metres.
    #[must_use]
    pub const fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    /// Members of the ring, in oracle-reported order.
    #[must_use]
    pub fn points(&self) -> &[RingPoint] {
        &self.points
    }

    /// Whether the band filter left no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of candidates in the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Points present in both rings under quantised-key identity.
    ///
    /// The result preserves this ring's member order and contains each shared
    /// key once, so a seeded random pick over it is deterministic.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Vec<Point> {
        let other_keys: HashSet<PointKey> = other.points.iter().map(|p| p.point.key()).collect();
        let mut seen: HashSet<PointKey> = HashSet::new();
        self.points
            .iter()
            .filter(|p| {
                let key = p.point.key();
                other_keys.contains(&key) && seen.insert(key)
            })
            .map(|p| p.point)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ring_of(center: Point, target_m: f64, tolerance_m: f64, members: &[(f64, f64, f64)]) -> Ring {
        let reachable = members
            .iter()
            .map(|&(lat, lon, d)| RingPoint::new(Point::new(lat, lon), d))
            .collect();
        Ring::from_reachable(center, target_m, tolerance_m, reachable)
    }

    #[test]
    fn band_filter_keeps_members_within_tolerance() {
        let ring = ring_of(
            Point::new(51.9, -2.0),
            2_000.0,
            500.0,
            &[
                (51.91, -2.0, 1_499.9), // just below the band
                (51.92, -2.0, 1_500.0), // inclusive lower bound
                (51.93, -2.0, 2_500.0), // inclusive upper bound
                (51.94, -2.0, 2_500.1),
            ],
        );
        assert_eq!(ring.len(), 2);
        for member in ring.points() {
            assert!(member.distance_m >= 1_500.0 && member.distance_m <= 2_500.0);
        }
    }

    #[rstest]
    fn intersection_matches_on_quantised_keys() {
        let shared = Point::new(51.915, -2.005);
        let a = ring_of(
            Point::new(51.9, -2.0),
            2_000.0,
            500.0,
            &[(51.91, -2.0, 1_800.0), (shared.lat, shared.lon, 2_100.0)],
        );
        // The shared point comes back with float noise well below a
        // micro-degree; the quantised key still matches.
        let b = ring_of(
            Point::new(51.93, -2.0),
            2_000.0,
            500.0,
            &[(shared.lat + 2e-7, shared.lon - 2e-7, 1_900.0)],
        );
        let common = a.intersection(&b);
        assert_eq!(common.len(), 1);
        assert_eq!(common[0].key(), shared.key());
    }

    #[test]
    fn intersection_of_disjoint_rings_is_empty() {
        let a = ring_of(Point::new(51.9, -2.0), 2_000.0, 500.0, &[(51.91, -2.0, 1_800.0)]);
        let b = ring_of(Point::new(51.93, -2.0), 2_000.0, 500.0, &[(51.95, -2.1, 1_900.0)]);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn intersection_deduplicates_repeated_members() {
        let shared = (51.915, -2.005, 2_000.0);
        let a = ring_of(
            Point::new(51.9, -2.0),
            2_000.0,
            500.0,
            &[shared, shared],
        );
        let b = ring_of(Point::new(51.93, -2.0), 2_000.0, 500.0, &[shared]);
        assert_eq!(a.intersection(&b).len(), 1);
    }
}
