use crate::chart::{DEFAULT_BIN_COUNT, DEFAULT_CURVE_POINTS};
use crate::error::{CpkError, CpkResult};
use crate::records::DEFAULT_HEADER_PREFIX;
use crate::stats::StdDevMode;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // === PARSING ===
    /// Lines starting with this literal are skipped. Empty disables the check.
    #[arg(long, default_value = DEFAULT_HEADER_PREFIX)]
    pub header_prefix: String,

    // === CAPABILITY ===
    /// Use the population (n) divisor for the within standard deviation.
    #[arg(long, default_value_t = false)]
    pub population_std_dev: bool,

    // === CHART ===
    #[arg(long, default_value_t = DEFAULT_BIN_COUNT)]
    pub bin_count: usize,
    #[arg(long, default_value_t = DEFAULT_CURVE_POINTS)]
    pub curve_points: usize,

    // === OUTPUT ===
    #[arg(long, default_value_t = 4)]
    pub display_precision: usize,
    #[arg(long, default_value_t = 6)]
    pub export_precision: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
            population_std_dev: false,
            bin_count: DEFAULT_BIN_COUNT,
            curve_points: DEFAULT_CURVE_POINTS,
            display_precision: 4,
            export_precision: 6,
        }
    }
}

impl AnalysisConfig {
    pub fn std_dev_mode(&self) -> StdDevMode {
        if self.population_std_dev {
            StdDevMode::Population
        } else {
            StdDevMode::Sample
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CpkResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CpkResult<()> {
        if self.bin_count == 0 {
            return Err(CpkError::Config("bin_count must be at least 1".into()));
        }
        if self.curve_points == 0 {
            return Err(CpkError::Config("curve_points must be at least 1".into()));
        }
        Ok(())
    }

    /// Overlays only the flags the user actually typed.
    pub fn merge_from_cli(&mut self, cli: &AnalysisConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(header_prefix);
        update_if_present!(population_std_dev);
        update_if_present!(bin_count);
        update_if_present!(curve_points);
        update_if_present!(display_precision);
        update_if_present!(export_precision);
    }
}
