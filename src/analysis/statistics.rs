//! Summary statistics over subroutine metrics.

/// Min/max/mean/median/standard deviation of a set of counts.
///
/// Every derived field is `None` when the input set is empty. Mean, median
/// and standard deviation are rounded to two decimal places.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStatistics {
    pub min: Option<u32>,
    pub max: Option<u32>,
    /// Input values in ascending order.
    pub sorted_values: Vec<u32>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Population standard deviation (divisor is the sample count).
    pub standard_deviation: Option<f64>,
}

impl SummaryStatistics {
    /// Compute statistics over the given values.
    pub fn from_values(values: impl IntoIterator<Item = u32>) -> Self {
        let mut sorted: Vec<u32> = values.into_iter().collect();
        sorted.sort();

        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Self::default();
        };

        let count = sorted.len() as f64;
        let mean = sorted.iter().map(|&v| f64::from(v)).sum::<f64>() / count;
        let variance = sorted
            .iter()
            .map(|&v| {
                let delta = f64::from(v) - mean;
                delta * delta
            })
            .sum::<f64>()
            / count;

        Self {
            min: Some(min),
            max: Some(max),
            mean: Some(round2(mean)),
            median: Some(round2(median_sorted(&sorted))),
            standard_deviation: Some(round2(variance.sqrt())),
            sorted_values: sorted,
        }
    }
}

fn median_sorted(sorted: &[u32]) -> f64 {
    debug_assert!(!sorted.is_empty());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        f64::from(sorted[mid])
    } else {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
