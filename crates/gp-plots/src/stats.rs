//! Statistical helpers shared by the recipes

use serde::{Deserialize, Serialize};

use gp_core::{PlotError, PlotResult};

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (`n - 1` denominator); `None` below two values
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quartiles `(q1, median, q3)` using linear interpolation between order
/// statistics
pub fn calculate_quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = (sorted.len() - 1) as f64;
    Some((
        interpolate(&sorted, last * 0.25),
        interpolate(&sorted, last * 0.5),
        interpolate(&sorted, last * 0.75),
    ))
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

/// 1-based ranks; tied values share the mean of the ranks they span
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1 ..= end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Five-number summary plus outliers for one box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub n: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub mean: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize `values`, placing whiskers at the most extreme data within
    /// `whis` interquartile ranges of the box. `NaN` values are ignored.
    pub fn from_values(values: &[f64], whis: f64) -> PlotResult<Self> {
        if !(whis.is_finite() && whis >= 0.0) {
            return Err(PlotError::invalid(format!("whisker range must be non-negative, got {}", whis)));
        }
        let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let values = values.as_slice();
        let (q1, median, q3) = calculate_quartiles(values)
            .ok_or_else(|| PlotError::invalid("cannot summarize an empty group"))?;
        let mean = mean(values).unwrap_or(median);

        let iqr = q3 - q1;
        let lower_fence = q1 - whis * iqr;
        let upper_fence = q3 + whis * iqr;

        let inside = values.iter().copied().filter(|v| *v >= lower_fence && *v <= upper_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);

        let mut outliers: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| *v < lower_fence || *v > upper_fence)
            .collect();
        outliers.sort_by(f64::total_cmp);

        Ok(Self {
            n: values.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            mean,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Sort labels numerically when every label parses as a number, otherwise
/// lexicographically.
///
/// `NaN` labels go last. Labels with the same value are ordered as text.
pub fn sort_labels(labels: &mut [String]) {
    let numeric: Option<Vec<f64>> = labels.iter().map(|l| l.trim().parse::<f64>().ok()).collect();
    let Some(numbers) = numeric else {
        labels.sort();
        return;
    };

    let mut keyed: Vec<(f64, String)> = numbers
        .into_iter()
        .zip(labels.iter_mut().map(std::mem::take))
        .collect();
    keyed.sort_by(|(a, a_text), (b, b_text)| {
        a.is_nan()
            .cmp(&b.is_nan())
            .then_with(|| a.total_cmp(b))
            .then_with(|| a_text.cmp(b_text))
    });
    for (slot, (_, label)) in labels.iter_mut().zip(keyed) {
        *slot = label;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_interpolate() {
        let (q1, median, q3) = calculate_quartiles(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!((q1, median, q3), (1.75, 2.5, 3.25));
        assert!(calculate_quartiles(&[]).is_none());
    }

    #[test]
    fn test_sample_std() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138089935299395).abs() < 1e-12);
        assert!(sample_std(&[1.0]).is_none());
    }

    #[test]
    fn test_average_ranks_with_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 10.0, 30.0]), vec![1.5, 3.0, 1.5, 4.0]);
        assert_eq!(average_ranks(&[5.0, 5.0, 5.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_box_stats_whiskers_and_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = BoxStats::from_values(&values, 1.5).unwrap();
        assert_eq!(stats.n, 9);
        assert_eq!((stats.q1, stats.median, stats.q3), (3.0, 5.0, 7.0));
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 8.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.iqr(), 4.0);
    }

    #[test]
    fn test_box_stats_single_value() {
        let stats = BoxStats::from_values(&[3.4], 1.5).unwrap();
        assert_eq!(stats.lower_whisker, 3.4);
        assert_eq!(stats.upper_whisker, 3.4);
        assert!(stats.outliers.is_empty());
        assert!(BoxStats::from_values(&[], 1.5).is_err());
        assert!(BoxStats::from_values(&[1.0], -1.0).is_err());
    }

    #[test]
    fn test_box_stats_ignore_nan() {
        let stats = BoxStats::from_values(&[1.0, f64::NAN, 2.0, 3.0, f64::NAN, 4.0, 5.0], 1.5).unwrap();
        assert_eq!(stats.n, 5);
        assert_eq!(stats.median, 3.0);
        assert_eq!((stats.lower_whisker, stats.upper_whisker), (1.0, 5.0));
        assert_eq!(stats.mean, 3.0);
        assert!(stats.outliers.is_empty());
        assert!(BoxStats::from_values(&[f64::NAN], 1.5).is_err());
    }

    #[test]
    fn test_sort_labels() {
        let mut years = vec!["1999".to_string(), "2004".to_string(), "200".to_string()];
        sort_labels(&mut years);
        assert_eq!(years, vec!["200", "1999", "2004"]);

        let mut names = vec!["suv".to_string(), "compact".to_string(), "2seater".to_string()];
        sort_labels(&mut names);
        assert_eq!(names, vec!["2seater", "compact", "suv"]);
    }

    #[test]
    fn test_sort_labels_puts_nan_last() {
        // Long enough to leave the small-slice insertion sort
        let mut labels: Vec<String> = (0..40).rev().map(|i| (i * 3).to_string()).collect();
        labels[7] = "NaN".to_string();
        labels[23] = "NaN".to_string();
        labels.push("1e0".to_string());
        labels.push("1".to_string());
        sort_labels(&mut labels);

        assert_eq!(&labels[40..], &["NaN", "NaN"]);
        let values: Vec<f64> = labels[..40].iter().map(|l| l.parse().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(&labels[1..3], &["1", "1e0"]);
    }
}
