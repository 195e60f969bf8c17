//! Capability report: the fixed field list handed to export and display.

use crate::capability::{CapabilityGrade, CapabilityResult, ZeroVariation};
use crate::defects::{self, DefectEstimate};
use crate::error::CpkResult;
use crate::stats;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const NOT_AVAILABLE: &str = "n/a";
const RAW_DATA_LABEL: &str = "raw_data";

#[derive(Debug, Clone, Serialize)]
pub struct CapabilityReport {
    pub analyzed_at: NaiveDateTime,
    pub step: String,
    pub item_name: String,
    pub unit: String,
    pub sample_size: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub lsl: f64,
    pub usl: f64,
    pub cp: f64,
    pub cpk: f64,
    pub cpk_lower: f64,
    pub cpk_upper: f64,
    pub pp: f64,
    pub ppk: f64,
    pub verdict: String,
    pub zero_variation: Option<ZeroVariation>,
    pub defects: Option<DefectEstimate>,
    pub raw_values: Vec<f64>,
}

impl CapabilityReport {
    pub fn new(result: &CapabilityResult, analyzed_at: NaiveDateTime) -> Self {
        let verdict = match result.zero_variation {
            Some(zv) => zv.to_string(),
            None => result.grade().to_string(),
        };
        Self {
            analyzed_at,
            step: result.step.clone(),
            item_name: result.item_name.clone(),
            unit: result.unit.clone(),
            sample_size: result.sample_size,
            mean: result.mean,
            std_dev: result.std_dev,
            lsl: result.lower_limit,
            usl: result.upper_limit,
            cp: result.cp,
            cpk: result.cpk,
            cpk_lower: result.cpk_lower,
            cpk_upper: result.cpk_upper,
            pp: result.pp,
            ppk: result.ppk,
            verdict,
            zero_variation: result.zero_variation,
            defects: defects::estimate_for(result),
            raw_values: result.raw_values.clone(),
        }
    }

    /// Report fields in export order, numbers at `precision` decimals.
    pub fn fields(&self, precision: usize) -> Vec<(&'static str, String)> {
        let num = |v: f64| fmt_num(v, precision);

        vec![
            (
                "analyzed_at",
                self.analyzed_at.format(TIMESTAMP_FORMAT).to_string(),
            ),
            ("item_name", self.item_name.clone()),
            ("unit", self.unit.clone()),
            ("sample_size", self.sample_size.to_string()),
            ("mean", num(self.mean)),
            ("std_dev", num(self.std_dev)),
            ("lsl", num(self.lsl)),
            ("usl", num(self.usl)),
            ("cp", num(self.cp)),
            ("cpk", num(self.cpk)),
            ("cpk_lower", num(self.cpk_lower)),
            ("cpk_upper", num(self.cpk_upper)),
            ("pp", num(self.pp)),
            ("ppk", num(self.ppk)),
            ("verdict", self.verdict.clone()),
            ("defect_ppm", self.ppm_text(|d| d.total_ppm)),
            ("defect_ppm_lsl", self.ppm_text(|d| d.lower_ppm)),
            ("defect_ppm_usl", self.ppm_text(|d| d.upper_ppm)),
        ]
    }

    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        stats::min_max(&self.raw_values)
    }

    pub fn data_range(&self) -> f64 {
        self.value_bounds().map(|(lo, hi)| hi - lo).unwrap_or(0.0)
    }

    fn ppm_text(&self, side: fn(&DefectEstimate) -> f64) -> String {
        self.defects
            .as_ref()
            .map(|d| fmt_num(side(d), 2))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    /// Multi-line summary for interactive display.
    pub fn summary_text(&self, precision: usize) -> String {
        Summary {
            report: self,
            precision,
        }
        .to_string()
    }

    pub fn write_csv<W: Write>(&self, mut writer: W, precision: usize) -> CpkResult<()> {
        {
            let mut wtr = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(&mut writer);

            wtr.write_record(["field", "value"])?;
            for (key, value) in self.fields(precision) {
                wtr.write_record([key, value.as_str()])?;
            }
            wtr.flush()?;
        }
        // A truly empty line cannot be written as a csv record.
        writer.write_all(b"\n")?;

        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut writer);
        wtr.write_record([RAW_DATA_LABEL])?;
        wtr.write_record(["index", "value"])?;
        for (i, v) in self.raw_values.iter().enumerate() {
            wtr.write_record([(i + 1).to_string(), fmt_num(*v, precision)])?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Sectioned plain-text report followed by the raw readings.
    pub fn write_text<W: Write>(&self, mut w: W, precision: usize) -> CpkResult<()> {
        let num = |v: f64| fmt_num(v, precision);
        let bound = |v: Option<f64>| v.map(num).unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let bounds = self.value_bounds();

        writeln!(w, "=== CPK PROCESS CAPABILITY REPORT ===")?;
        text_row(&mut w, "analyzed_at", self.analyzed_at.format(TIMESTAMP_FORMAT))?;
        text_row(&mut w, "item_name", &self.item_name)?;
        text_row(&mut w, "unit", &self.unit)?;

        writeln!(w, "\n=== BASIC STATISTICS ===")?;
        text_row(&mut w, "sample_size", self.sample_size)?;
        text_row(&mut w, "mean", num(self.mean))?;
        text_row(&mut w, "std_dev", num(self.std_dev))?;
        text_row(&mut w, "min", bound(bounds.map(|(lo, _)| lo)))?;
        text_row(&mut w, "max", bound(bounds.map(|(_, hi)| hi)))?;
        text_row(&mut w, "range", num(self.data_range()))?;

        writeln!(w, "\n=== SPECIFICATION ===")?;
        text_row(&mut w, "lsl", num(self.lsl))?;
        text_row(&mut w, "usl", num(self.usl))?;
        text_row(&mut w, "spec_width", num(self.usl - self.lsl))?;

        writeln!(w, "\n=== CAPABILITY INDICES ===")?;
        text_row(&mut w, "cp", num(self.cp))?;
        text_row(&mut w, "cpk", num(self.cpk))?;
        text_row(&mut w, "cpk_lower", num(self.cpk_lower))?;
        text_row(&mut w, "cpk_upper", num(self.cpk_upper))?;
        text_row(&mut w, "pp", num(self.pp))?;
        text_row(&mut w, "ppk", num(self.ppk))?;

        writeln!(w, "\n=== CAPABILITY VERDICT ===")?;
        text_row(&mut w, "verdict", &self.verdict)?;
        text_row(&mut w, "defect_ppm", self.ppm_text(|d| d.total_ppm))?;
        text_row(&mut w, "defect_ppm_lsl", self.ppm_text(|d| d.lower_ppm))?;
        text_row(&mut w, "defect_ppm_usl", self.ppm_text(|d| d.upper_ppm))?;

        writeln!(w, "\n=== RAW DATA ===")?;
        for (i, v) in self.raw_values.iter().enumerate() {
            writeln!(w, "{:03}: {}", i + 1, num(*v))?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> CpkResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Picks the format from the extension: `.csv`, `.json`, otherwise text.
    pub fn export_to_path<P: AsRef<Path>>(&self, path: P, precision: usize) -> CpkResult<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let writer = BufWriter::new(File::create(path)?);

        match ext.as_deref() {
            Some("csv") => self.write_csv(writer, precision)?,
            Some("json") => self.write_json(writer)?,
            _ => self.write_text(writer, precision)?,
        }
        info!("💾 Exported report to {}", path.display());
        Ok(())
    }
}

struct Summary<'a> {
    report: &'a CapabilityReport,
    precision: usize,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let num = |v: f64| fmt_num(v, self.precision);

        if let Some(zv) = r.zero_variation {
            writeln!(f, "=== NO VARIATION: {} ===", r.item_name)?;
            writeln!(
                f,
                "All {} readings equal {} {}.",
                r.sample_size,
                num(r.mean),
                r.unit
            )?;
            writeln!(f, "LSL:         {} {}", num(r.lsl), r.unit)?;
            writeln!(f, "USL:         {} {}", num(r.usl), r.unit)?;
            writeln!(f)?;
            return match zv {
                ZeroVariation::Within => write!(
                    f,
                    "Verdict: every reading is within spec.\n\
                     Capability indices are not meaningful without variation; \
                     check gauge resolution and keep monitoring the mean."
                ),
                ZeroVariation::OutOfSpec => write!(
                    f,
                    "Verdict: every reading is outside spec.\n\
                     Inspect the process and bring the mean back within limits."
                ),
            };
        }

        let center = (r.lsl + r.usl) / 2.0;
        writeln!(f, "=== CPK ANALYSIS ===")?;
        writeln!(f, "Step:        {}", r.step)?;
        writeln!(f, "Item:        {}", r.item_name)?;
        writeln!(f, "Unit:        {}", r.unit)?;
        writeln!(f, "Samples:     {}", r.sample_size)?;
        writeln!(f, "Mean:        {}", num(r.mean))?;
        writeln!(f, "Std Dev:     {}", num(r.std_dev))?;
        writeln!(f, "Range:       {}", num(r.data_range()))?;
        writeln!(f, "LSL:         {}", num(r.lsl))?;
        writeln!(f, "USL:         {}", num(r.usl))?;
        writeln!(f, "Spec Width:  {}", num(r.usl - r.lsl))?;
        writeln!(f)?;
        writeln!(f, "=== CAPABILITY INDICES ===")?;
        writeln!(f, "Cp:          {}", num(r.cp))?;
        writeln!(f, "Cpk:         {}", num(r.cpk))?;
        writeln!(f, "  Cpk(Lower): {}", num(r.cpk_lower))?;
        writeln!(f, "  Cpk(Upper): {}", num(r.cpk_upper))?;
        writeln!(f, "Pp:          {}", num(r.pp))?;
        writeln!(f, "Ppk:         {}", num(r.ppk))?;
        writeln!(f)?;
        writeln!(f, "=== VERDICT ===")?;
        writeln!(
            f,
            "{}: {}",
            r.verdict,
            CapabilityGrade::from_cpk(r.cpk).advice()
        )?;
        writeln!(f)?;
        writeln!(f, "=== ESTIMATED DEFECT RATE ===")?;
        match &r.defects {
            Some(d) => {
                writeln!(f, "Total:       {:.2} PPM", d.total_ppm)?;
                writeln!(f, "  Below LSL: {:.2} PPM", d.lower_ppm)?;
                writeln!(f, "  Above USL: {:.2} PPM", d.upper_ppm)?;
            }
            None => writeln!(f, "{}", NOT_AVAILABLE)?,
        }
        writeln!(f)?;
        writeln!(f, "=== CENTERING ===")?;
        writeln!(f, "Target:      {}", num(center))?;
        writeln!(f, "Current:     {}", num(r.mean))?;
        write!(f, "Offset:      {}", num(r.mean - center))
    }
}

fn text_row<W: Write>(w: &mut W, key: &str, value: impl fmt::Display) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{}:", key), value)
}

/// `CPK_Analysis_<item>_<yyyyMMdd_HHmmss>` with spaces replaced by `_`.
pub fn suggested_file_name(item_name: &str, at: NaiveDateTime) -> String {
    format!(
        "CPK_Analysis_{}_{}",
        item_name.replace(' ', "_"),
        at.format(FILE_STAMP_FORMAT)
    )
}

pub fn fmt_num(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{:.*}", precision, v)
    } else {
        NOT_AVAILABLE.to_string()
    }
}
