use std::cmp::Ordering;

/// Second central moments below this are treated as exactly zero.
const ZERO_VARIANCE_EPS: f64 = 1e-14;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1). NaN for a single value.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
}

impl ColumnStats {
    /// Compute statistics from column values, filtering out NaN.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let mean = vals.iter().sum::<f64>() / count as f64;
        let std = sample_std(&vals, mean);

        vals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let q1 = quantile_sorted(&vals, 0.25);
        let median = quantile_sorted(&vals, 0.5);
        let q3 = quantile_sorted(&vals, 0.75);

        Some(ColumnStats {
            count,
            mean,
            std,
            min: vals[0],
            q1,
            median,
            q3,
            max: vals[count - 1],
            iqr: q3 - q1,
        })
    }
}

/// Sample standard deviation around a precomputed mean.
pub fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Quantile of sorted data by linear interpolation between order statistics
/// (`h = (n - 1) p`). NaN for empty input.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let j = h.floor() as usize;
    let g = h - h.floor();
    if j + 1 >= n {
        sorted[n - 1]
    } else {
        sorted[j] + g * (sorted[j + 1] - sorted[j])
    }
}

/// Sums of the 2nd, 3rd and 4th powers of the deviations from the mean.
/// The 2nd is zeroed out when it is floating-point noise.
fn central_moments(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    if m2.abs() < ZERO_VARIANCE_EPS {
        m2 = 0.0;
    }
    (m2, m3, m4)
}

/// Adjusted Fisher-Pearson skewness (G1). `None` for fewer than 3 values,
/// 0 for zero-variance data.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values);
    if m2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    Some((n * (n - 1.0).sqrt() / (n - 2.0)) * (m3 / m2.powf(1.5)))
}

/// Bias-corrected excess kurtosis (G2, Fisher). `None` for fewer than 4
/// values, 0 for zero-variance data.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values);
    if m2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numerator = n * (n + 1.0) * (n - 1.0) * m4;
    let denominator = (n - 2.0) * (n - 3.0) * m2 * m2;
    Some(numerator / denominator - adj)
}

/// Round to `places` decimals, correctly rounding the binary value (ties to
/// even). Non-finite values pass through.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}
