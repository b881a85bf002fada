//! Rounding and averaging helpers shared by the score computations

use num_traits::ToPrimitive;

/// Round to one decimal place
///
/// Rounds the exact stored value, so 0.15 (stored just below) gives 0.1 and
/// 0.05 (stored just above) gives 0.1. Only exactly representable halves such
/// as 0.25 fall back to the even digit.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Express a distance as a percentage of `base`, rounded to one decimal
pub fn percent_of(value: f64, base: f64) -> f64 {
    round_to_tenth(value / base * 100.0)
}

/// Arithmetic mean, or `None` for an empty slice
pub fn mean<T: ToPrimitive + Copy>(values: &[T]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().filter_map(ToPrimitive::to_f64).sum();
    Some(sum / values.len() as f64)
}

/// Mean of the `k` largest values
///
/// Averages every value when fewer than `k` exist. Returns `None` when the
/// slice is empty or `k` is zero.
pub fn top_k_mean<T: ToPrimitive + Copy + Ord>(values: &[T], k: usize) -> Option<f64> {
    if k == 0 {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.truncate(k);
    mean(&sorted)
}
