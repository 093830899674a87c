use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::dataset::{ColumnData, Dataset};
use crate::processing::method_advisor::CorrelationMethod;

/// Default |r| above which two columns are flagged as potentially redundant.
pub const HIGH_CORRELATION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationOptions {
    /// Matrix method. `None` uses the most conservative suggested method.
    pub method: Option<CorrelationMethod>,
    pub high_threshold: f64,
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            method: None,
            high_threshold: HIGH_CORRELATION_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        let r = r.abs();
        if r < 0.3 {
            CorrelationStrength::Weak
        } else if r < 0.7 {
            CorrelationStrength::Moderate
        } else if r < 0.9 {
            CorrelationStrength::Strong
        } else {
            CorrelationStrength::VeryStrong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
            CorrelationStrength::VeryStrong => "very strong",
        }
    }
}

/// A pair of columns whose correlation exceeds the redundancy threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighCorrelation {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

/// Symmetric correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` is the coefficient of columns i and j.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Coefficients use pairwise-complete rows. Undefined pairs are NaN.
    pub fn compute(dataset: &Dataset, method: CorrelationMethod) -> Self {
        let numeric: Vec<(&str, &[Option<f64>])> = dataset
            .columns()
            .iter()
            .filter_map(|c| match &c.data {
                ColumnData::Numeric { values, .. } => Some((c.name.as_str(), values.as_slice())),
                _ => None,
            })
            .collect();

        let n = numeric.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            for j in i..n {
                let (x, y) = complete_pairs(numeric[i].1, numeric[j].1);
                let r = correlate(&x, &y, method);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        tracing::debug!("Computed {} correlation matrix over {} columns", method.label(), n);
        Self {
            method,
            columns: numeric.iter().map(|(name, _)| name.to_string()).collect(),
            values,
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Upper-triangle pairs with |r| strictly above `threshold`.
    pub fn high_correlations(&self, threshold: f64) -> Vec<HighCorrelation> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let r = self.values[i][j];
                if r.abs() > threshold {
                    pairs.push(HighCorrelation {
                        first: self.columns[i].clone(),
                        second: self.columns[j].clone(),
                        coefficient: r,
                        strength: CorrelationStrength::classify(r),
                    });
                }
            }
        }
        pairs
    }
}

/// Rows where both columns have a value.
fn complete_pairs(a: &[Option<f64>], b: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip()
}

pub fn correlate(x: &[f64], y: &[f64], method: CorrelationMethod) -> f64 {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => pearson(&average_ranks(x), &average_ranks(y)),
        CorrelationMethod::KendallTau => kendall_tau_b(x, y),
    }
}

pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (xv, yv) in x.iter().zip(y) {
        let dx = xv - mean_x;
        let dy = yv - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let denom = (sxx * syy).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (sxy / denom).clamp(-1.0, 1.0)
}

/// 1-based ranks, ties sharing the average of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end share rank (start + 1 + end) / 2.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Kendall's tau-b, adjusted for ties in either variable.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let (mut concordant, mut discordant) = (0i64, 0i64);
    let (mut ties_x, mut ties_y) = (0i64, 0i64);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 && dy == 0.0 {
                ties_x += 1;
                ties_y += 1;
            } else if dx == 0.0 {
                ties_x += 1;
            } else if dy == 0.0 {
                ties_y += 1;
            } else if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = (n * (n - 1) / 2) as i64;
    let denom = tau_b_denominator(pairs, ties_x, ties_y);
    if denom == 0.0 {
        return f64::NAN;
    }
    (concordant - discordant) as f64 / denom
}

/// `sqrt((P - Tx)(P - Ty))`, multiplied in floating point. The integer
/// product overflows `i64` past roughly 78k rows.
fn tau_b_denominator(pairs: i64, ties_x: i64, ties_y: i64) -> f64 {
    ((pairs - ties_x) as f64 * (pairs - ties_y) as f64).sqrt()
}
