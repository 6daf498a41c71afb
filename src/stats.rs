//! Paired time-series statistics
//!
//! Small numeric helpers shared by the metrics: central tendency and
//! dispersion over turn sequences, lag-1 autocorrelation (predictability)
//! and Spearman rank correlation (adaptability). Every function returns
//! `Option<f64>`, with `None` standing for "undefined" (too few
//! observations or a degenerate denominator) rather than NaN.

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (average of the middle two for even-length input)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Sample standard deviation (n - 1 denominator). Undefined for fewer than
/// two observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Coefficient of variation: std / mean. Undefined when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    if m == 0.0 {
        return None;
    }
    std_dev(values).map(|s| s / m)
}

/// Pearson correlation over two equal-length slices. Undefined with fewer
/// than two pairs or zero variance in either slice.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n < 2 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Predictability: lag-1 autocorrelation of a speaker's turn sequence,
/// measuring self-consistency across turns.
///
/// Computed as the Pearson correlation of the sequence with itself shifted
/// by one. Needs at least three observations (two overlapping pairs); a
/// constant sequence has zero variance and is undefined.
pub fn predictability(values: &[f64]) -> Option<f64> {
    if values.len() < 3 {
        return None;
    }
    let n = values.len();
    pearson(&values[..n - 1], &values[1..])
}

/// Adaptability: Spearman rank correlation between two speakers'
/// turn-indexed sequences, measuring mutual convergence in behavior.
///
/// The series are aligned by turn index (the i-th turn of one speaker
/// against the i-th turn of the other, not by wall clock) and truncated to
/// the shorter length. Symmetric in its arguments.
pub fn adaptability(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let ranks_a = average_ranks(&a[..n]);
    let ranks_b = average_ranks(&b[..n]);
    pearson(&ranks_a, &ranks_b)
}

/// Fractional ranks (1-based), ties receiving the average of the ranks they
/// span.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // positions i..=j hold tied values; assign the mean rank
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_std_dev_sample() {
        assert_eq!(std_dev(&[1.0]), None);
        // sample std of [2, 4, 4, 4, 5, 5, 7, 9] is ~2.138
        let s = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s - 2.13809).abs() < 1e-4);
    }

    #[test]
    fn test_cv_undefined_for_zero_mean() {
        assert_eq!(coefficient_of_variation(&[-1.0, 1.0]), None);
        let cv = coefficient_of_variation(&[2.0, 4.0, 6.0]).unwrap();
        assert!((cv - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predictability_alternating_is_strongly_negative() {
        let alternating = [1.0, 5.0, 1.0, 5.0, 1.0, 5.0];
        let p = predictability(&alternating).unwrap();
        assert!(p < -0.9, "expected strongly negative, got {p}");
    }

    #[test]
    fn test_predictability_constant_is_undefined() {
        assert_eq!(predictability(&[3.0, 3.0, 3.0, 3.0]), None);
    }

    #[test]
    fn test_predictability_needs_three_turns() {
        assert_eq!(predictability(&[1.0, 2.0]), None);
        assert!(predictability(&[1.0, 2.0, 3.0]).is_some());
    }

    #[test]
    fn test_adaptability_monotone_agreement() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [10.0, 20.0, 30.0, 40.0];
        let r = adaptability(&a, &b).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let b_rev = [40.0, 30.0, 20.0, 10.0];
        let r = adaptability(&a, &b_rev).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_adaptability_is_symmetric() {
        let a = [2.1, 0.4, 3.3, 1.8, 0.9];
        let b = [1.0, 1.2, 2.9, 0.3, 2.2];
        let ab = adaptability(&a, &b).unwrap();
        let ba = adaptability(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_adaptability_truncates_to_shorter() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 1.0, 2.0, 99.0, -7.0];
        let truncated = adaptability(&a, &b);
        let exact = adaptability(&a, &b[..3]);
        assert_eq!(truncated, exact);
    }

    #[test]
    fn test_adaptability_undefined_cases() {
        assert_eq!(adaptability(&[1.0], &[2.0]), None);
        // constant series has zero rank variance
        assert_eq!(adaptability(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let ranks = average_ranks(&[10.0, 20.0, 20.0, 30.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
    }
}
