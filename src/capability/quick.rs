//! Quick capability triage used before any detailed analysis.
//!
//! The sample (n − 1) standard deviation is divided by `c4(n)` to approximate
//! the within-subgroup sigma, and the resulting Cpk is mapped to a band.

use crate::records::TestRecord;
use crate::spec_limits::SpecBound;
use crate::stats::{self, c4, StdDevMode, ZERO_VARIATION_EPSILON};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum QuickVerdict {
    #[strum(serialize = "≥2.0")]
    Excellent,
    #[strum(serialize = "≥1.67")]
    VeryGood,
    #[strum(serialize = "≥1.33")]
    Good,
    #[strum(serialize = "≥1.0")]
    Fair,
    #[strum(serialize = "≥0.67")]
    Poor,
    #[strum(serialize = "<0.67")]
    Inadequate,
    #[strum(serialize = "perfect")]
    Perfect,
    #[strum(serialize = "out-of-spec")]
    OutOfSpec,
    #[strum(serialize = "calc-error")]
    CalcError,
    #[strum(serialize = "insufficient-data")]
    InsufficientData,
}

/// Cpk bands, highest first. Thresholds are inclusive lower bounds.
const BANDS: [(f64, QuickVerdict); 5] = [
    (2.0, QuickVerdict::Excellent),
    (1.67, QuickVerdict::VeryGood),
    (1.33, QuickVerdict::Good),
    (1.0, QuickVerdict::Fair),
    (0.67, QuickVerdict::Poor),
];

impl QuickVerdict {
    pub fn from_cpk(cpk: f64) -> Self {
        if !cpk.is_finite() {
            return Self::CalcError;
        }
        BANDS
            .iter()
            .find(|(threshold, _)| cpk >= *threshold)
            .map(|(_, verdict)| *verdict)
            .unwrap_or(Self::Inadequate)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Excellent => "Cpk at or above 2.0",
            Self::VeryGood => "Cpk at or above 1.67",
            Self::Good => "Cpk at or above 1.33",
            Self::Fair => "Cpk at or above 1.0",
            Self::Poor => "Cpk at or above 0.67",
            Self::Inadequate => "Cpk below 0.67",
            Self::Perfect => "no variation, value within spec",
            Self::OutOfSpec => "no variation, value outside spec",
            Self::CalcError => "indices not finite",
            Self::InsufficientData => "fewer than 2 readings",
        }
    }
}

/// Sample std-dev with near-zero results snapped to exactly zero.
/// `None` for fewer than 2 values.
pub fn snapped_std_dev(values: &[f64]) -> Option<f64> {
    let sd = stats::std_dev(values, StdDevMode::Sample)?;
    Some(if sd < ZERO_VARIATION_EPSILON { 0.0 } else { sd })
}

/// Classifies `values` (already stripped of "no reading" zeros) against `spec`.
pub fn quick_verdict(values: &[f64], spec: &SpecBound) -> QuickVerdict {
    let (Some(mean), Some(sd)) = (stats::mean(values), snapped_std_dev(values)) else {
        return QuickVerdict::InsufficientData;
    };

    if sd == 0.0 {
        return if spec.contains(mean) {
            QuickVerdict::Perfect
        } else {
            QuickVerdict::OutOfSpec
        };
    }

    let within = sd / c4(values.len());
    let cpl = (mean - spec.lower_limit) / (3.0 * within);
    let cpu = (spec.upper_limit - mean) / (3.0 * within);
    QuickVerdict::from_cpk(cpl.min(cpu))
}

pub fn quick_evaluate(record: &TestRecord) -> QuickVerdict {
    quick_verdict(&record.readings(), &record.spec)
}

/// Summary statistics shown for a record before detailed analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPreview {
    pub sample_count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub verdict: QuickVerdict,
}

impl RecordPreview {
    pub fn from_record(record: &TestRecord) -> Self {
        let readings = record.readings();
        let range = stats::min_max(&readings);
        Self {
            sample_count: readings.len(),
            mean: stats::mean(&readings),
            std_dev: snapped_std_dev(&readings),
            min: range.map(|(lo, _)| lo),
            max: range.map(|(_, hi)| hi),
            verdict: quick_verdict(&readings, &record.spec),
        }
    }
}
