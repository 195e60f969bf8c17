//! Chart geometry for the capability histogram and the run chart.
//!
//! Everything here is plain data for an external renderer: bins, a scaled
//! normal curve, axis bounds, spec markers and ±3σ control limits.

use crate::capability::CapabilityResult;
use crate::error::{CpkError, CpkResult};
use crate::stats::{self, normal_pdf, ZERO_VARIATION_EPSILON};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIN_COUNT: usize = 20;
pub const DEFAULT_CURVE_POINTS: usize = 200;
/// Bin width used when every value is identical.
pub const MIN_BIN_WIDTH: f64 = 1e-9;
/// Fraction of the span added on each side of the axis.
pub const AXIS_PADDING: f64 = 0.05;
/// Below this sigma the fitted curve is too narrow to draw.
pub const CURVE_MIN_STD_DEV: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub center: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub bin_width: f64,
    pub min: f64,
    pub max: f64,
}

impl Histogram {
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn peak_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Bins `values` into exactly `bin_count` equal-width bins spanning
/// `[min, max]`. Returns `None` for empty input or zero bins.
pub fn histogram(values: &[f64], bin_count: usize) -> Option<Histogram> {
    if bin_count == 0 {
        return None;
    }
    let (min, max) = stats::min_max(values)?;

    let mut bin_width = (max - min) / bin_count as f64;
    if bin_width <= 0.0 {
        bin_width = MIN_BIN_WIDTH;
    }

    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            center: min + i as f64 * bin_width + bin_width / 2.0,
            count: 0,
        })
        .collect();

    for &v in values {
        // A value equal to `max` lands one past the last bin without the clamp.
        let idx = ((v - min) / bin_width).floor().max(0.0) as usize;
        bins[idx.min(bin_count - 1)].count += 1;
    }

    Some(Histogram {
        bins,
        bin_width,
        min,
        max,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Axis bounds covering both the data and every finite spec limit, padded by
/// 5% of the combined span on each side.
pub fn axis_range(data_min: f64, data_max: f64, lsl: f64, usl: f64) -> AxisRange {
    let lo = if lsl.is_finite() { data_min.min(lsl) } else { data_min };
    let hi = if usl.is_finite() { data_max.max(usl) } else { data_max };
    let padding = (hi - lo) * AXIS_PADDING;
    AxisRange {
        min: lo - padding,
        max: hi + padding,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// Samples the normal density at `intervals + 1` evenly spaced points across
/// `axis`, scaled by `sample_count * bin_width` so its area matches the
/// histogram. Non-finite points are dropped.
pub fn normal_curve(
    mean: f64,
    std_dev: f64,
    sample_count: usize,
    bin_width: f64,
    axis: AxisRange,
    intervals: usize,
) -> Vec<CurvePoint> {
    if intervals == 0 || std_dev <= CURVE_MIN_STD_DEV {
        return Vec::new();
    }
    let step = axis.span() / intervals as f64;
    let scale = sample_count as f64 * bin_width;

    (0..=intervals)
        .map(|i| {
            let x = axis.min + i as f64 * step;
            CurvePoint {
                x,
                y: normal_pdf(x, mean, std_dev) * scale,
            }
        })
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    pub center: f64,
    pub upper: f64,
    pub lower: f64,
    /// Lines run across sample indices `first_index..=last_index`.
    pub first_index: usize,
    pub last_index: usize,
}

pub fn control_limits(result: &CapabilityResult) -> ControlLimits {
    let spread = 3.0 * result.std_dev;
    ControlLimits {
        center: result.mean,
        upper: result.mean + spread,
        lower: result.mean - spread,
        first_index: 1,
        last_index: result.raw_values.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunPoint {
    pub index: usize,
    pub value: f64,
}

pub fn run_points(values: &[f64]) -> Vec<RunPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| RunPoint {
            index: i + 1,
            value,
        })
        .collect()
}

/// A vertical spec line drawn from zero up to `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecMarker {
    pub value: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub histogram: Histogram,
    pub curve: Vec<CurvePoint>,
    pub axis: AxisRange,
    pub lsl_marker: Option<SpecMarker>,
    pub usl_marker: Option<SpecMarker>,
    pub control_limits: ControlLimits,
    pub run_points: Vec<RunPoint>,
}

impl ChartGeometry {
    /// Fails with [`CpkError::NoVariation`] when there is nothing to plot.
    pub fn build(
        result: &CapabilityResult,
        bin_count: usize,
        curve_points: usize,
    ) -> CpkResult<Self> {
        if result.raw_values.is_empty() || result.std_dev < ZERO_VARIATION_EPSILON {
            return Err(CpkError::NoVariation);
        }
        if bin_count == 0 {
            return Err(CpkError::Config("bin count must be at least 1".into()));
        }

        let histogram =
            histogram(&result.raw_values, bin_count).ok_or(CpkError::NoVariation)?;
        let axis = axis_range(
            histogram.min,
            histogram.max,
            result.lower_limit,
            result.upper_limit,
        );
        let curve = normal_curve(
            result.mean,
            result.std_dev,
            result.raw_values.len(),
            histogram.bin_width,
            axis,
            curve_points,
        );

        let height = curve
            .iter()
            .map(|p| p.y)
            .fold(histogram.peak_count() as f64, f64::max);
        let marker = |value: f64| {
            value
                .is_finite()
                .then_some(SpecMarker { value, height })
        };

        Ok(Self {
            lsl_marker: marker(result.lower_limit),
            usl_marker: marker(result.upper_limit),
            control_limits: control_limits(result),
            run_points: run_points(&result.raw_values),
            histogram,
            curve,
            axis,
        })
    }
}
