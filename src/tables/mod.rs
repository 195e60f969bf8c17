use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use cpk_forge::api::BatchEntry;
use cpk_forge::capability::{CapabilityGrade, QuickVerdict, RecordPreview};
use cpk_forge::chart::ChartGeometry;
use cpk_forge::defects;
use cpk_forge::records::{ParsedLog, TestRecord};
use cpk_forge::report::fmt_num;
use strum::IntoEnumIterator;

const BAR_WIDTH: usize = 40;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn verdict_cell(verdict: QuickVerdict) -> Cell {
    let cell = Cell::new(verdict.to_string());
    match verdict {
        QuickVerdict::Excellent | QuickVerdict::VeryGood => {
            cell.fg(Color::Green).add_attribute(Attribute::Bold)
        }
        QuickVerdict::Good => cell.fg(Color::Green),
        QuickVerdict::Fair => cell.fg(Color::Yellow),
        QuickVerdict::Poor => cell.fg(Color::DarkYellow),
        QuickVerdict::Inadequate => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        QuickVerdict::Perfect => cell.fg(Color::Cyan).add_attribute(Attribute::Bold),
        QuickVerdict::OutOfSpec => cell.fg(Color::DarkRed).add_attribute(Attribute::Bold),
        QuickVerdict::CalcError | QuickVerdict::InsufficientData => cell.fg(Color::Grey),
    }
}

fn grade_cell(grade: CapabilityGrade) -> Cell {
    let cell = Cell::new(grade.to_string());
    match grade {
        CapabilityGrade::Good => cell.fg(Color::Green),
        CapabilityGrade::Fair => cell.fg(Color::Yellow),
        CapabilityGrade::Poor => cell.fg(Color::Red),
    }
}

fn opt_num(v: Option<f64>, precision: usize) -> String {
    v.map(|x| fmt_num(x, precision))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn records(records: &[TestRecord], previews: &[RecordPreview], precision: usize) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#"),
        Cell::new("Step").add_attribute(Attribute::Bold),
        Cell::new("Item").add_attribute(Attribute::Bold),
        Cell::new("Spec"),
        Cell::new("N"),
        Cell::new("Mean"),
        Cell::new("StdDev"),
        Cell::new("Quick").fg(Color::Cyan),
        Cell::new("Unit"),
    ]);

    for (i, (record, preview)) in records.iter().zip(previews).enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(&record.step),
            Cell::new(&record.item_name).add_attribute(Attribute::Bold),
            Cell::new(&record.spec_text),
            Cell::new(preview.sample_count),
            Cell::new(opt_num(preview.mean, precision)),
            Cell::new(opt_num(preview.std_dev, precision)),
            verdict_cell(preview.verdict),
            Cell::new(&record.unit),
        ]);
    }
    right_align(&mut table, 4..=6);
    println!("\n{}", table);
}

pub fn verdict_legend() {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Quick verdict").add_attribute(Attribute::Bold),
        Cell::new("Meaning"),
    ]);
    for verdict in QuickVerdict::iter() {
        table.add_row(vec![verdict_cell(verdict), Cell::new(verdict.describe())]);
    }
    println!("\n{}", table);
}

pub fn skipped(log: &ParsedLog) {
    if log.skipped.is_empty() {
        return;
    }
    println!(
        "\nScanned {} rows, kept {}, skipped {}:",
        log.lines_read,
        log.records.len(),
        log.skipped_total()
    );
    for (reason, count) in &log.skipped {
        println!("   {:>5} × {}", count, reason);
    }
}

pub fn preview(record: &TestRecord, p: &RecordPreview, precision: usize) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Item").add_attribute(Attribute::Bold),
        Cell::new(&record.item_name),
    ]);
    table.add_row(vec![
        Cell::new("Spec"),
        Cell::new(format!("{} {}", record.spec_text, record.unit)),
    ]);
    table.add_row(vec![Cell::new("Valid samples"), Cell::new(p.sample_count)]);
    table.add_row(vec![Cell::new("Mean"), Cell::new(opt_num(p.mean, precision))]);
    table.add_row(vec![
        Cell::new("Std Dev"),
        Cell::new(opt_num(p.std_dev, precision)),
    ]);
    table.add_row(vec![Cell::new("Min"), Cell::new(opt_num(p.min, precision))]);
    table.add_row(vec![Cell::new("Max"), Cell::new(opt_num(p.max, precision))]);
    table.add_row(vec![Cell::new("Quick verdict"), verdict_cell(p.verdict)]);
    println!("\n{}", table);
}

pub fn histogram(chart: &ChartGeometry, precision: usize) {
    let peak = chart.histogram.peak_count().max(1);
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Center").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new(""),
    ]);
    for bin in &chart.histogram.bins {
        let bar = "█".repeat(bin.count * BAR_WIDTH / peak);
        table.add_row(vec![
            Cell::new(fmt_num(bin.center, precision)),
            Cell::new(bin.count),
            Cell::new(bar).fg(Color::Blue),
        ]);
    }
    right_align(&mut table, 0..=1);
    println!("\n{}", table);

    let cl = &chart.control_limits;
    println!(
        "Control limits: LCL {}  CL {}  UCL {}  (samples {}..={})",
        fmt_num(cl.lower, precision),
        fmt_num(cl.center, precision),
        fmt_num(cl.upper, precision),
        cl.first_index,
        cl.last_index
    );
    println!(
        "Axis: {} .. {}",
        fmt_num(chart.axis.min, precision),
        fmt_num(chart.axis.max, precision)
    );
}

pub fn batch(entries: &[BatchEntry], precision: usize) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("#"),
        Cell::new("Item").add_attribute(Attribute::Bold),
        Cell::new("N"),
        Cell::new("Cp"),
        Cell::new("Cpk").fg(Color::Cyan),
        Cell::new("Pp"),
        Cell::new("Ppk"),
        Cell::new("PPM"),
        Cell::new("Grade").add_attribute(Attribute::Bold),
        Cell::new("Quick"),
    ]);

    for entry in entries {
        let mut row = vec![Cell::new(entry.index), Cell::new(&entry.item_name)];
        match &entry.outcome {
            Ok(r) => {
                let ppm = defects::estimate_for(r)
                    .map(|d| fmt_num(d.total_ppm, 2))
                    .unwrap_or_else(|| "N/A".to_string());
                let grade = match r.zero_variation {
                    Some(zv) => Cell::new(zv.to_string()),
                    None => grade_cell(r.grade()),
                };
                row.extend([
                    Cell::new(r.sample_size),
                    Cell::new(fmt_num(r.cp, precision)),
                    Cell::new(fmt_num(r.cpk, precision)).fg(Color::Cyan),
                    Cell::new(fmt_num(r.pp, precision)),
                    Cell::new(fmt_num(r.ppk, precision)),
                    Cell::new(ppm),
                    grade,
                ]);
            }
            Err(e) => {
                row.push(Cell::new(e.to_string()).fg(Color::Grey));
                row.extend((0..6).map(|_| Cell::new("")));
            }
        }
        row.push(verdict_cell(entry.verdict));
        table.add_row(row);
    }
    right_align(&mut table, 2..=7);
    println!("\n{}", table);
}
