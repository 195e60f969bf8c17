use super::{RecordParser, SkipReason, TestRecord};
use crate::error::CpkResult;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub records: Vec<TestRecord>,
    pub lines_read: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl ParsedLog {
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

pub fn load_records<P: AsRef<Path>>(path: P, header_prefix: &str) -> CpkResult<ParsedLog> {
    let path = path.as_ref();
    info!("📂 Loading test log: {}", path.display());
    let file = File::open(path)?;
    Ok(parse_reader(file, header_prefix))
}

pub fn parse_str(text: &str, header_prefix: &str) -> ParsedLog {
    parse_reader(text.as_bytes(), header_prefix)
}

/// Reads comma-separated rows. Never fails on content: fields are decoded
/// lossily, so a stray non-UTF-8 byte only spoils its own token. Only rows the
/// reader itself cannot produce are counted as unreadable.
///
/// `lines_read` counts physical lines, including the empty ones the csv
/// reader steps over (those are reported as [`SkipReason::Blank`]).
pub fn parse_reader<R: Read>(reader: R, header_prefix: &str) -> ParsedLog {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(LineCounter::new(reader));

    let mut parser = RecordParser::new(header_prefix);
    let mut log = ParsedLog::default();
    let mut row = csv::ByteRecord::new();

    loop {
        let outcome = match rdr.read_byte_record(&mut row) {
            Ok(false) => break,
            Ok(true) => {
                let fields: Vec<Cow<str>> = row.iter().map(String::from_utf8_lossy).collect();
                parser.parse_fields(fields.iter().map(|f| f.as_ref()))
            }
            Err(e) => {
                debug!("[Row {}] CSV Parse Error: {}", log.lines_read + 1, e);
                if e.is_io_error() {
                    log.lines_read += 1;
                    *log.skipped.entry(SkipReason::Unreadable).or_insert(0) += 1;
                    break;
                }
                Err(SkipReason::Unreadable)
            }
        };
        log.lines_read += 1;

        match outcome {
            Ok(record) => log.records.push(record),
            Err(reason) => *log.skipped.entry(reason).or_insert(0) += 1,
        }
    }

    let empty_lines = rdr.get_ref().lines().saturating_sub(log.lines_read);
    if empty_lines > 0 {
        log.lines_read += empty_lines;
        *log.skipped.entry(SkipReason::Blank).or_insert(0) += empty_lines;
    }

    debug!(
        "-> Scanned {} rows. Kept {} records, skipped {}.",
        log.lines_read,
        log.records.len(),
        log.skipped_total()
    );
    for (reason, count) in &log.skipped {
        debug!("   skipped {} x {}", count, reason);
    }

    log
}

/// Counts physical lines as bytes pass through to the csv reader.
struct LineCounter<R> {
    inner: R,
    newlines: usize,
    last_byte: Option<u8>,
}

impl<R: Read> LineCounter<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            newlines: 0,
            last_byte: None,
        }
    }

    /// A final line without a terminator still counts.
    fn lines(&self) -> usize {
        match self.last_byte {
            Some(b) if b != b'\n' => self.newlines + 1,
            _ => self.newlines,
        }
    }
}

impl<R: Read> Read for LineCounter<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.newlines += buf[..n].iter().filter(|&&b| b == b'\n').count();
            self.last_byte = Some(buf[n - 1]);
        }
        Ok(n)
    }
}
