//! Spur removal: iterative cleanup of short out-and-back excursions.

use std::collections::HashMap;

use meander_core::{trace_length_m, PointKey, TrackPoint};

/// Default spur threshold as a fraction of total route length.
pub const DEFAULT_MIN_SPUR_FRACTION: f64 = 0.15;

/// Default bound on cleanup passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Why the cleanup loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanTermination {
    /// A pass failed to shorten the route; the output is a fixed point.
    Converged,
    /// The cleaned length reached or undercut the external target distance.
    ReachedTarget,
    /// The pass budget ran out before convergence.
    IterationsExhausted,
}

/// Result of a cleanup run.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    /// The cleaned trace; identical to the input when nothing was removed.
    pub trace: Vec<TrackPoint>,
    /// Haversine length of the cleaned trace in metres.
    pub length_m: f64,
    /// Number of scan passes performed.
    pub passes: usize,
    /// Why the loop stopped.
    pub termination: CleanTermination,
}

/// Greedy removal of short out-and-back sub-paths from a trace.
///
/// A spur is a sub-path that leaves a point and returns to the same point
/// (quantised identity) while staying shorter than `min_spur_fraction` of
/// the current total length. Each pass walks the trace once; passes repeat
/// until one fails to shorten the route, the external target is reached, or
/// `max_iterations` passes have run. Deliberately not globally optimal:
/// minor spurs below the detection threshold survive.
///
/// The cleaner never errors and never lengthens a route; degenerate inputs
/// come back unchanged.
///
/// # Examples
/// ```
/// use meander_core::{Point, TrackPoint};
/// use meander_synth::SpurCleaner;
///
/// // B -> C -> B is a short excursion off an otherwise straight path.
/// let [a, b, c, d] = [
///     Point::new(51.900, -2.0),
///     Point::new(51.910, -2.0),
///     Point::new(51.911, -2.001),
///     Point::new(51.990, -2.0),
/// ];
/// let trace: Vec<TrackPoint> = [a, b, c, b, d].into_iter().map(TrackPoint::new).collect();
///
/// let outcome = SpurCleaner::new().clean(&trace, 0.0);
/// let kept: Vec<_> = outcome.trace.iter().map(|s| s.point.key()).collect();
/// assert_eq!(kept, vec![a.key(), b.key(), d.key()]);
/// ```
#[derive(Debug, Clone)]
pub struct SpurCleaner {
    min_spur_fraction: f64,
    max_iterations: usize,
}

impl Default for SpurCleaner {
    fn default() -> Self {
        Self {
            min_spur_fraction: DEFAULT_MIN_SPUR_FRACTION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SpurCleaner {
    /// A cleaner with the default threshold and pass budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spur threshold as a fraction of total length.
    #[must_use]
    pub const fn with_min_spur_fraction(mut self, fraction: f64) -> Self {
        self.min_spur_fraction = fraction;
        self
    }

    /// Set the bound on cleanup passes.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Clean `trace`, stopping early once its length is at or below
    /// `target_m`.
    #[must_use]
    pub fn clean(&self, trace: &[TrackPoint], target_m: f64) -> CleanOutcome {
        let mut current = trace.to_vec();
        let mut length_m = trace_length_m(&current);
        if current.len() < 2 {
            return CleanOutcome {
                trace: current,
                length_m,
                passes: 0,
                termination: CleanTermination::Converged,
            };
        }

        let mut passes = 0;
        let mut termination = CleanTermination::IterationsExhausted;
        for _ in 0..self.max_iterations {
            let cleaned = self.scan_pass(&current, length_m);
            let cleaned_length_m = trace_length_m(&cleaned);
            passes += 1;
            if cleaned_length_m >= length_m {
                termination = CleanTermination::Converged;
                break;
            }
            current = cleaned;
            length_m = cleaned_length_m;
            log::debug!("spur pass {passes}: {length_m:.0} m");
            if length_m <= target_m {
                termination = CleanTermination::ReachedTarget;
                break;
            }
        }

        CleanOutcome {
            trace: current,
            length_m,
            passes,
            termination,
        }
    }

    /// One scan over the trace, dropping every spur below the threshold.
    fn scan_pass(&self, trace: &[TrackPoint], total_m: f64) -> Vec<TrackPoint> {
        let min_spur_m = self.min_spur_fraction * total_m;

        let keys: Vec<PointKey> = trace.iter().map(|sample| sample.point.key()).collect();
        let mut cumulative_m = Vec::with_capacity(trace.len());
        let mut acc = 0.0;
        cumulative_m.push(0.0);
        for pair in trace.windows(2) {
            acc += pair[0].point.haversine_distance_m(&pair[1].point);
            cumulative_m.push(acc);
        }
        let mut occurrences: HashMap<PointKey, Vec<usize>> = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            occurrences.entry(*key).or_default().push(index);
        }

        let mut cleaned: Vec<TrackPoint> = Vec::with_capacity(trace.len());
        let mut i = 0;
        while i < trace.len() {
            let revisit = occurrences.get(&keys[i]).and_then(|positions| {
                let next = positions.partition_point(|&index| index <= i);
                positions.get(next).copied()
            });
            match revisit {
                // A short excursion returning to the same point: discard it
                // and resume at the revisit.
                Some(j) if cumulative_m[j] - cumulative_m[i] < min_spur_m => i = j,
                _ => {
                    cleaned.push(trace[i]);
                    i += 1;
                }
            }
        }

        // The scan may drop the tail when the final point closed a spur;
        // the route must still end at its original endpoint.
        if let (Some(kept), Some(original)) = (cleaned.last(), trace.last())
            && kept.point.key() != original.point.key()
        {
            cleaned.push(*original);
        }
        cleaned
    }
}
