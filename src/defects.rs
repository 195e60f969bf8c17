//! Defect-rate estimation in parts per million.
//!
//! Each spec side contributes its own normal tail. The two tails are summed
//! even though that slightly double-counts when both limits are far from the
//! mean; the total is meant as a conservative figure.

use crate::capability::CapabilityResult;
use crate::stats::normal_cdf;
use serde::{Deserialize, Serialize};

pub const PPM: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefectEstimate {
    pub z_lower: f64,
    pub z_upper: f64,
    /// PPM below LSL.
    pub lower_ppm: f64,
    /// PPM above USL.
    pub upper_ppm: f64,
    pub total_ppm: f64,
}

/// `None` unless `std_dev > 0`.
pub fn estimate_defects(mean: f64, std_dev: f64, lsl: f64, usl: f64) -> Option<DefectEstimate> {
    if std_dev.is_nan() || std_dev <= 0.0 {
        return None;
    }
    let z_lower = (mean - lsl) / std_dev;
    let z_upper = (usl - mean) / std_dev;
    let lower_ppm = tail_ppm(z_lower);
    let upper_ppm = tail_ppm(z_upper);
    Some(DefectEstimate {
        z_lower,
        z_upper,
        lower_ppm,
        upper_ppm,
        total_ppm: lower_ppm + upper_ppm,
    })
}

pub fn estimate_for(result: &CapabilityResult) -> Option<DefectEstimate> {
    estimate_defects(
        result.mean,
        result.std_dev,
        result.lower_limit,
        result.upper_limit,
    )
}

/// One-sided tail beyond a standardized distance `z`, in PPM.
pub fn tail_ppm(z: f64) -> f64 {
    normal_cdf(-z) * PPM
}
