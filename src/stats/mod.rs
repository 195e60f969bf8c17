//! Numeric building blocks: sample moments, the c4 bias-correction table and
//! the normal distribution helpers.

pub mod c4;
pub mod normal;

pub use c4::c4;
pub use normal::{erf, normal_cdf, normal_pdf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Standard deviations below this are treated as "no variation".
pub const ZERO_VARIATION_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevMode {
    /// n − 1 divisor.
    #[default]
    Sample,
    /// n divisor.
    Population,
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Returns `None` when the divisor would be zero.
pub fn std_dev(data: &[f64], mode: StdDevMode) -> Option<f64> {
    let m = mean(data)?;
    let n = data.len();
    let divisor = match mode {
        StdDevMode::Sample if n < 2 => return None,
        StdDevMode::Sample => (n - 1) as f64,
        StdDevMode::Population => n as f64,
    };
    let ss: f64 = data.iter().map(|x| (x - m).powi(2)).sum();
    Some((ss / divisor).sqrt())
}

pub fn min_max(data: &[f64]) -> Option<(f64, f64)> {
    let min = data.iter().copied().reduce(f64::min)?;
    let max = data.iter().copied().reduce(f64::max)?;
    Some((min, max))
}
