//! Process capability analysis.
//!
//! - [`CapabilityAnalyzer`] computes Cp, Cpk, Pp and Ppk for one sample.
//!   Cp/Cpk use the within estimate (n − 1 divisor unless configured
//!   otherwise), Pp/Ppk always use the overall (population) estimate.
//! - [`quick_verdict`] is the c4-corrected triage used to band many records
//!   at once.

mod analyzer;
mod quick;

pub use analyzer::{
    CapabilityAnalyzer, CapabilityGrade, CapabilityResult, ZeroVariation, CAPABLE_CPK, FAIR_CPK,
};
pub use quick::{quick_evaluate, quick_verdict, snapped_std_dev, QuickVerdict, RecordPreview};
