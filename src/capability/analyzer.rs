use crate::error::{CpkError, CpkResult};
use crate::records::TestRecord;
use crate::spec_limits::LimitSide;
use crate::stats::{self, StdDevMode, ZERO_VARIATION_EPSILON};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, warn};

/// Minimum Cpk for a process to be called capable.
pub const CAPABLE_CPK: f64 = 1.33;
/// Minimum Cpk for a "fair" grade.
pub const FAIR_CPK: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CapabilityGrade {
    Good,
    Fair,
    Poor,
}

impl CapabilityGrade {
    pub fn from_cpk(cpk: f64) -> Self {
        if cpk >= CAPABLE_CPK {
            Self::Good
        } else if cpk >= FAIR_CPK {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::Good => "capable (Cpk ≥ 1.33)",
            Self::Fair => "marginal (improvement recommended)",
            Self::Poor => "not capable (immediate improvement required)",
        }
    }
}

/// Where a constant (zero-variation) sample sits relative to the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariation {
    #[strum(serialize = "within spec")]
    Within,
    #[strum(serialize = "out of spec")]
    OutOfSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub mean: f64,
    /// Within estimate used for Cp/Cpk.
    pub std_dev: f64,
    /// Overall (population) estimate used for Pp/Ppk.
    pub std_dev_overall: f64,
    pub cp: f64,
    pub cpk: f64,
    pub cpk_lower: f64,
    pub cpk_upper: f64,
    pub pp: f64,
    pub ppk: f64,
    pub sample_size: usize,
    pub lower_limit: f64,
    pub upper_limit: f64,
    pub is_capable: bool,
    pub raw_values: Vec<f64>,
    pub item_name: String,
    pub unit: String,
    pub step: String,
    /// Set when the sample has no variation; ratio indices are then NaN.
    pub zero_variation: Option<ZeroVariation>,
}

impl CapabilityResult {
    pub fn grade(&self) -> CapabilityGrade {
        CapabilityGrade::from_cpk(self.cpk)
    }

    pub fn has_variation(&self) -> bool {
        self.zero_variation.is_none()
    }

    pub fn spec_center(&self) -> f64 {
        (self.lower_limit + self.upper_limit) / 2.0
    }

    /// Signed distance of the mean from the spec center.
    pub fn center_offset(&self) -> f64 {
        self.mean - self.spec_center()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityAnalyzer {
    pub std_dev_mode: StdDevMode,
}

impl CapabilityAnalyzer {
    pub fn new(std_dev_mode: StdDevMode) -> Self {
        Self { std_dev_mode }
    }

    /// Analyzes a record's readings (zeros excluded) against its spec.
    pub fn analyze_record(&self, record: &TestRecord) -> CpkResult<CapabilityResult> {
        let readings = record.readings();
        let mut result = self.analyze(
            &readings,
            record.spec.lower_limit,
            record.spec.upper_limit,
        )?;
        result.item_name = record.item_name.clone();
        result.unit = record.unit.clone();
        result.step = record.step.clone();
        Ok(result)
    }

    pub fn analyze(&self, data: &[f64], lsl: f64, usl: f64) -> CpkResult<CapabilityResult> {
        if data.is_empty() {
            return Err(CpkError::EmptySample);
        }
        if usl <= lsl {
            return Err(CpkError::InvalidSpec { lsl, usl });
        }
        if !lsl.is_finite() {
            return Err(CpkError::MissingLimit(LimitSide::Lower));
        }
        if !usl.is_finite() {
            return Err(CpkError::MissingLimit(LimitSide::Upper));
        }
        let n = data.len();
        if n < 2 {
            return Err(CpkError::InsufficientData { n });
        }

        let mean = stats::mean(data).ok_or(CpkError::EmptySample)?;
        let std_within =
            stats::std_dev(data, self.std_dev_mode).ok_or(CpkError::InsufficientData { n })?;
        let std_overall =
            stats::std_dev(data, StdDevMode::Population).ok_or(CpkError::EmptySample)?;

        let mut result = CapabilityResult {
            mean,
            std_dev: std_within,
            std_dev_overall: std_overall,
            cp: f64::NAN,
            cpk: f64::NAN,
            cpk_lower: f64::NAN,
            cpk_upper: f64::NAN,
            pp: f64::NAN,
            ppk: f64::NAN,
            sample_size: n,
            lower_limit: lsl,
            upper_limit: usl,
            is_capable: false,
            raw_values: data.to_vec(),
            item_name: String::new(),
            unit: String::new(),
            step: String::new(),
            zero_variation: None,
        };

        if std_within < ZERO_VARIATION_EPSILON {
            let class = if mean >= lsl && mean <= usl {
                ZeroVariation::Within
            } else {
                ZeroVariation::OutOfSpec
            };
            debug!("Zero variation at {} ({})", mean, class);
            result.std_dev = 0.0;
            result.std_dev_overall = 0.0;
            result.zero_variation = Some(class);
            return Ok(result);
        }

        result.cp = (usl - lsl) / (6.0 * std_within);
        result.cpk_lower = (mean - lsl) / (3.0 * std_within);
        result.cpk_upper = (usl - mean) / (3.0 * std_within);
        result.cpk = result.cpk_lower.min(result.cpk_upper);

        result.pp = (usl - lsl) / (6.0 * std_overall);
        result.ppk = ((mean - lsl) / (3.0 * std_overall)).min((usl - mean) / (3.0 * std_overall));

        if !result.cp.is_finite() || !result.cpk.is_finite() {
            warn!(
                "Non-finite capability indices (std_dev = {:e}); refusing result",
                std_within
            );
            return Err(CpkError::NonFinite);
        }

        result.is_capable = result.cpk >= CAPABLE_CPK;
        Ok(result)
    }
}
