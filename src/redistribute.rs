//! Redistribution policies for linked value vectors.
//!
//! A linked value vector is a discrete probability distribution: entries are
//! non-negative and sum to one. When one entry is dragged to a new value a
//! policy decides how the other entries move. Policies always return a fresh
//! vector; the input snapshot is never modified.

use tracing::warn;

/// Tolerance used when checking that a vector sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Rule for adjusting the other entries when one entry changes.
pub trait RedistributePolicy {
    /// Produce the vector that results from setting `values[index]` to
    /// `new_value`.
    fn redistribute(&self, values: &[f64], index: usize, new_value: f64) -> Vec<f64>;
}

impl<F> RedistributePolicy for F
where
    F: Fn(&[f64], usize, f64) -> Vec<f64>,
{
    fn redistribute(&self, values: &[f64], index: usize, new_value: f64) -> Vec<f64> {
        self(values, index, new_value)
    }
}

/// Scale the other entries proportionally so the total stays at one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Proportional;

impl RedistributePolicy for Proportional {
    fn redistribute(&self, values: &[f64], index: usize, new_value: f64) -> Vec<f64> {
        redistribute_proportional(values, index, new_value)
    }
}

/// Set `values[index]` to `new_value` and rescale the rest proportionally.
///
/// When the dragged entry held all of the mass, the freed mass is split
/// evenly among the others. The result is clamped to be non-negative and
/// renormalized. If every entry ends up at zero the uniform distribution is
/// returned instead.
///
/// # Panics
///
/// Panics if `index` is out of bounds.
pub fn redistribute_proportional(values: &[f64], index: usize, new_value: f64) -> Vec<f64> {
    let old_value = values[index];
    let others = values.len() - 1;
    let freed = 1.0 - new_value;
    let degenerate = old_value >= 1.0 - f64::EPSILON;

    let mut next: Vec<f64> = values
        .iter()
        .enumerate()
        .map(|(j, &value)| {
            let value = if j == index {
                new_value
            } else if degenerate {
                freed / others as f64
            } else {
                value * freed / (1.0 - old_value)
            };
            value.max(0.0)
        })
        .collect();

    if !normalize(&mut next) {
        warn!(
            entries = next.len(),
            index, "redistribution collapsed to zero mass, resetting to uniform"
        );
        return uniform(next.len());
    }
    next
}

/// Divide every entry by the total. Returns `false` when the total is not
/// strictly positive, leaving the entries untouched.
pub fn normalize(values: &mut [f64]) -> bool {
    let sum: f64 = values.iter().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return false;
    }
    for value in values.iter_mut() {
        *value /= sum;
    }
    true
}

/// The uniform distribution over `len` entries.
pub fn uniform(len: usize) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    vec![1.0 / len as f64; len]
}

/// Whether the entries sum to one within [`SUM_TOLERANCE`].
pub fn sums_to_one(values: &[f64]) -> bool {
    let sum: f64 = values.iter().sum();
    (sum - 1.0).abs() <= SUM_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn scales_other_entries() {
        let next = redistribute_proportional(&[0.5, 0.3, 0.2], 0, 0.8);
        assert_close(&next, &[0.8, 0.12, 0.08]);
        assert!(sums_to_one(&next));
    }

    #[test]
    fn splits_freed_mass_when_entry_held_everything() {
        let next = redistribute_proportional(&[1.0, 0.0, 0.0], 0, 0.4);
        assert_close(&next, &[0.4, 0.3, 0.3]);
    }

    #[test]
    fn dragging_to_one_zeroes_the_rest() {
        let next = redistribute_proportional(&[0.25, 0.25, 0.5], 2, 1.0);
        assert_close(&next, &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn renormalizes_unnormalized_input() {
        let next = redistribute_proportional(&[0.2, 0.2, 0.2], 1, 0.5);
        assert!(sums_to_one(&next));
        assert!((next[0] - next[2]).abs() < 1e-12);
    }

    #[test]
    fn zero_mass_resets_to_uniform() {
        let next = redistribute_proportional(&[0.5, 0.0, 0.0], 0, 0.0);
        assert_close(&next, &[1.0 / 3.0; 3]);
    }

    #[test]
    fn single_entry_stays_whole() {
        assert_close(&redistribute_proportional(&[1.0], 0, 0.3), &[1.0]);
    }

    #[test]
    fn closures_act_as_policies() {
        let keep_others = |values: &[f64], index: usize, new_value: f64| {
            let mut next = values.to_vec();
            next[index] = new_value;
            next
        };
        let next = keep_others.redistribute(&[0.5, 0.5], 1, 0.9);
        assert_eq!(next, vec![0.5, 0.9]);
    }

    #[test]
    fn normalize_rejects_zero_sum() {
        let mut values = [0.0, 0.0];
        assert!(!normalize(&mut values));
        assert_eq!(values, [0.0, 0.0]);
        assert!(uniform(0).is_empty());
    }
}
