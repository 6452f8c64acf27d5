//! Ring sampling: candidate control points drawn from isodistance rings.

use meander_core::{NetworkOracle, Point, Profile, Ring};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::SampleError;

/// Default half-width of the ring tolerance band in metres.
pub const DEFAULT_TOLERANCE_M: f64 = 500.0;

/// Draws candidate points from isodistance rings and their intersections.
///
/// The sampler owns no state beyond its tolerance; all randomness comes from
/// the `Rng` handed into each call, so a fixed seed reproduces the same
/// choices.
#[derive(Debug)]
pub struct RingSampler<'o, O> {
    oracle: &'o O,
    tolerance_m: f64,
}

impl<'o, O: NetworkOracle> RingSampler<'o, O> {
    /// A sampler with the default 500 m tolerance band.
    #[must_use]
    pub const fn new(oracle: &'o O) -> Self {
        Self::with_tolerance(oracle, DEFAULT_TOLERANCE_M)
    }

    /// A sampler with an explicit tolerance band half-width in metres.
    #[must_use]
    pub const fn with_tolerance(oracle: &'o O, tolerance_m: f64) -> Self {
        Self {
            oracle,
            tolerance_m,
        }
    }

    /// The tolerance band half-width in metres.
    #[must_use]
    pub const fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    /// Fetch the ring around `center` at `target_m` path metres.
    ///
    /// Queries the oracle up to `target_m + tolerance` and band-filters the
    /// reachable set; an empty band is reported as
    /// [`SampleError::EmptyRing`].
    pub fn ring(
        &self,
        profile: &Profile,
        center: Point,
        target_m: f64,
    ) -> Result<Ring, SampleError> {
        let reachable = self
            .oracle
            .ring(profile, center, target_m + self.tolerance_m)?;
        let ring = Ring::from_reachable(center, target_m, self.tolerance_m, reachable);
        if ring.is_empty() {
            return Err(SampleError::EmptyRing { center, target_m });
        }
        log::debug!(
            "ring at {target_m:.0} m holds {} candidates within ±{:.0} m",
            ring.len(),
            self.tolerance_m
        );
        Ok(ring)
    }

    /// Pick one ring member uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, ring: &Ring, rng: &mut R) -> Result<Point, SampleError> {
        ring.points()
            .choose(rng)
            .map(|member| member.point)
            .ok_or(SampleError::EmptyRing {
                center: ring.center(),
                target_m: ring.target_m(),
            })
    }

    /// Pick one point present in both rings uniformly at random.
    pub fn pick_intersection<R: Rng + ?Sized>(
        &self,
        ring_a: &Ring,
        ring_b: &Ring,
        rng: &mut R,
    ) -> Result<Point, SampleError> {
        let common = ring_a.intersection(ring_b);
        log::debug!("{} candidates shared between rings", common.len());
        common
            .choose(rng)
            .copied()
            .ok_or(SampleError::NoIntersection)
    }

    /// Find a point lying on both centres' rings at `target_m`.
    ///
    /// The first ring is fetched alone; when its band is already empty the
    /// second network call is skipped entirely.
    pub fn sample_intersection<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        center_a: Point,
        center_b: Point,
        target_m: f64,
        rng: &mut R,
    ) -> Result<Point, SampleError> {
        let ring_a = self.ring(profile, center_a, target_m)?;
        let ring_b = self.ring(profile, center_b, target_m)?;
        self.pick_intersection(&ring_a, &ring_b, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meander_core::test_support::ScriptedOracle;
    use meander_core::RingPoint;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    fn foot() -> Profile {
        Profile::new("foot").expect("valid profile")
    }

    fn ring_members(base: (f64, f64), count: usize, distance_m: f64) -> Vec<RingPoint> {
        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = (i as f64) * 1e-4;
                RingPoint::new(Point::new(base.0 + offset, base.1), distance_m)
            })
            .collect()
    }

    #[rstest]
    fn sampled_intersection_is_member_of_both_rings() {
        let a = Point::new(51.9, -2.0);
        let b = Point::new(51.92, -2.0);
        let shared = ring_members((51.91, -2.01), 5, 2_000.0);
        let mut a_members = ring_members((51.95, -2.0), 3, 1_800.0);
        a_members.extend(shared.clone());
        let mut b_members = ring_members((51.85, -2.0), 4, 2_400.0);
        b_members.extend(shared.clone());
        let oracle = ScriptedOracle::new()
            .with_ring(a, a_members)
            .with_ring(b, b_members);
        let sampler = RingSampler::new(&oracle);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let picked = sampler
            .sample_intersection(&foot(), a, b, 2_000.0, &mut rng)
            .expect("rings overlap");
        assert!(shared.iter().any(|m| m.point.key() == picked.key()));
    }

    #[rstest]
    fn fixed_seed_fixes_the_choice() {
        let a = Point::new(51.9, -2.0);
        let b = Point::new(51.92, -2.0);
        let shared = ring_members((51.91, -2.01), 12, 2_000.0);
        let oracle = ScriptedOracle::new()
            .with_ring(a, shared.clone())
            .with_ring(b, shared);
        let sampler = RingSampler::new(&oracle);

        let mut first_rng = ChaCha8Rng::seed_from_u64(42);
        let mut second_rng = ChaCha8Rng::seed_from_u64(42);
        let first = sampler
            .sample_intersection(&foot(), a, b, 2_000.0, &mut first_rng)
            .expect("overlap");
        let second = sampler
            .sample_intersection(&foot(), a, b, 2_000.0, &mut second_rng)
            .expect("overlap");
        assert_eq!(first.key(), second.key());
    }

    #[rstest]
    fn empty_first_ring_skips_the_second_query() {
        let a = Point::new(51.9, -2.0);
        let b = Point::new(51.92, -2.0);
        // Only b has data; a's band comes back empty.
        let oracle =
            ScriptedOracle::new().with_ring(b, ring_members((51.91, -2.01), 3, 2_000.0));
        let sampler = RingSampler::new(&oracle);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let error = sampler
            .sample_intersection(&foot(), a, b, 2_000.0, &mut rng)
            .expect_err("first ring is empty");
        assert!(matches!(error, SampleError::EmptyRing { .. }));
        assert_eq!(oracle.ring_calls(), 1, "second ring must not be fetched");
    }

    #[rstest]
    fn disjoint_rings_fail_deterministically() {
        let a = Point::new(51.9, -2.0);
        let b = Point::new(51.92, -2.0);
        let oracle = ScriptedOracle::new()
            .with_ring(a, ring_members((51.95, -2.0), 3, 2_000.0))
            .with_ring(b, ring_members((51.85, -2.0), 3, 2_000.0));
        let sampler = RingSampler::new(&oracle);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let error = sampler
            .sample_intersection(&foot(), a, b, 2_000.0, &mut rng)
            .expect_err("rings are disjoint");
        assert_eq!(error, SampleError::NoIntersection);
    }

    #[rstest]
    fn members_outside_the_band_are_rejected() {
        let center = Point::new(51.9, -2.0);
        let mut members = ring_members((51.91, -2.0), 3, 2_000.0);
        members.extend(ring_members((51.93, -2.0), 2, 3_200.0)); // outside ±500
        let oracle = ScriptedOracle::new().with_ring(center, members);
        let sampler = RingSampler::new(&oracle);

        let ring = sampler
            .ring(&foot(), center, 2_000.0)
            .expect("band has members");
        assert_eq!(ring.len(), 3);
        for member in ring.points() {
            assert!(member.distance_m >= 1_500.0 && member.distance_m <= 2_500.0);
        }
    }
}
