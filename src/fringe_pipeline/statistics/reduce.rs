//! Scalar reductions.

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Weighted arithmetic mean of `(value, weight)` pairs.
///
/// Returns `None` when the weights sum to zero.
pub fn weighted_mean(samples: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let (weighted_sum, total_weight) = samples
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), (value, weight)| {
            (sum + value * weight, total + weight)
        });
    if total_weight == 0.0 {
        return None;
    }
    Some(weighted_sum / total_weight)
}

/// Median: the middle element, or the mean of the two middle elements.
///
/// Reorders `values` in place (partial sort via quickselect).
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let len = values.len();
    let mid = len / 2;
    let (lower, upper_median, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper_median;

    if len % 2 == 1 {
        return Some(upper);
    }
    let lower = lower.iter().copied().reduce(f64::max)?;
    Some((lower + upper) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn test_weighted_mean() {
        let samples = vec![(10.0, 1.0), (20.0, 0.5), (1000.0, 0.0)];
        let value = weighted_mean(samples).unwrap();
        assert!((value - 40.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        assert_eq!(weighted_mean(vec![(1.0, 0.0)]), None);
        assert_eq!(weighted_mean(Vec::new()), None);
    }

    #[test]
    fn test_median_odd() {
        let mut values = [5.0, 1.0, 3.0];
        assert_eq!(median(&mut values), Some(3.0));
    }

    #[test]
    fn test_median_even() {
        let mut values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(median(&mut values), Some(2.5));
    }

    #[test]
    fn test_median_single_and_empty() {
        assert_eq!(median(&mut [7.0]), Some(7.0));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn test_median_negative_values() {
        let mut values = [-20.0, 5.0, -1.0, 0.0];
        assert_eq!(median(&mut values), Some(-0.5));
    }
}
