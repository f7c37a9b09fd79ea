//! Single-pass transformation engine.
//!
//! Every mode reads its input once, front to back, and keeps at most a
//! [`SlidingWindow`] of records in memory. Output records always appear in
//! source order. Line 1 is copied verbatim into every file-producing mode
//! except `add-files`, which treats it as a number like any other line.

pub mod operation;
pub mod report;
pub mod window;

pub use operation::Operation;
pub use report::RunReport;
pub use window::SlidingWindow;

use crate::csv_processor::{
    analyze_columns, AppendWriter, CsvStreamReader, LineReader, LineSink, SnapshotWriter,
    DEFAULT_SAMPLE_ROWS,
};
use crate::state::CheckpointPolicy;
use crate::utils::{AppConfig, ChunkTailError, Result};
use crate::values::{parse_date, parse_numeric_or_zero, try_parse_numeric, Numeric};
use chrono::NaiveDate;
use std::io::{BufRead, Read};
use std::path::Path;
use tracing::{info, trace};

/// Text appended after the records of `tail`, `drop-last` and `interval`.
pub fn summary_trailer(total_lines: usize) -> String {
    format!("\nTotal lines in input: {}\n", total_lines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub checkpoint: CheckpointPolicy,
    pub sample_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checkpoint: CheckpointPolicy::default(),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl EngineConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            checkpoint: config.checkpoint_policy()?,
            sample_rows: config.analyze.sample_rows,
        })
    }
}

pub struct TransformEngine {
    config: EngineConfig,
}

impl TransformEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs `operation` over the file at `input`. Report-only modes ignore
    /// `output`.
    pub fn run(&self, operation: &Operation, input: &Path, output: &Path) -> Result<RunReport> {
        operation.validate()?;
        if !operation.is_report_only() {
            ensure_distinct(input, output)?;
            if let Operation::AddFiles { other } = operation {
                ensure_distinct(other, output)?;
            }
        }

        info!(
            operation = %operation,
            input = %input.display(),
            checkpoint_interval = self.config.checkpoint.interval(),
            "Starting run"
        );

        let report = match operation {
            Operation::Tail { n } => self.tail(LineReader::open(input)?, output, *n),
            Operation::DropLast { n } => self.drop_last(LineReader::open(input)?, output, *n),
            Operation::Interval { start, end } => {
                self.interval(LineReader::open(input)?, output, *start, *end)
            }
            Operation::DeleteInterval { start, end } => {
                self.delete_interval(LineReader::open(input)?, output, *start, *end)
            }
            Operation::Analyze => self.analyze(CsvStreamReader::open(input)?),
            Operation::FilterDate { column, start, end } => {
                self.filter_date(CsvStreamReader::open(input)?, output, column, *start, *end)
            }
            Operation::Count => self.count(LineReader::open(input)?),
            Operation::SumLines => self.sum_lines(LineReader::open(input)?),
            Operation::AddFiles { other } => {
                self.add_files(LineReader::open(input)?, LineReader::open(other)?, output)
            }
        }?;

        info!(operation = operation.name(), "Run finished");
        Ok(report)
    }

    /// Header plus the last `n` lines. The destination is replaced atomically
    /// at every checkpoint, so it always holds a complete snapshot.
    pub fn tail<R: BufRead>(
        &self,
        mut source: LineReader<R>,
        output: &Path,
        n: usize,
    ) -> Result<RunReport> {
        let header = source.read_header()?;
        let mut snapshot = SnapshotWriter::new(output, self.config.checkpoint)?;
        let mut window = SlidingWindow::new(n);

        // Line 1 counts towards the first checkpoint; the destination starts
        // out as a header-only snapshot.
        snapshot.record_consumed();
        snapshot.replace([header.as_str()], None)?;

        for line in &mut source {
            let (_, line) = line?;
            window.push(line);
            if snapshot.record_consumed() {
                snapshot.replace(snapshot_lines(&header, &window), None)?;
            }
        }

        let total_lines = source.line_number();
        snapshot.replace(
            snapshot_lines(&header, &window),
            Some(&summary_trailer(total_lines)),
        )?;

        Ok(RunReport::Written {
            output: output.to_path_buf(),
            total_lines,
            records_written: window.len(),
        })
    }

    /// Header plus everything except the last `n` lines. The newest `n` lines
    /// are held back in a window and only written once they are pushed out,
    /// so whatever remains in the window at end of input is dropped.
    pub fn drop_last<R: BufRead>(
        &self,
        mut source: LineReader<R>,
        output: &Path,
        n: usize,
    ) -> Result<RunReport> {
        let header = source.read_header()?;
        let mut writer = AppendWriter::lines(output, self.config.checkpoint)?;
        writer.write(header.as_str())?;
        writer.record_consumed()?;

        let mut held = SlidingWindow::new(n);
        let mut records_written = 0;
        for line in &mut source {
            let (_, line) = line?;
            if let Some(released) = held.push(line) {
                writer.write(released.as_str())?;
                records_written += 1;
            }
            writer.record_consumed()?;
        }

        let total_lines = source.line_number();
        write_trailer(&mut writer, total_lines)?;
        writer.finish()?;

        Ok(RunReport::Written {
            output: output.to_path_buf(),
            total_lines,
            records_written,
        })
    }

    /// Header plus lines whose 1-based file line number is in `start..=end`.
    pub fn interval<R: BufRead>(
        &self,
        source: LineReader<R>,
        output: &Path,
        start: usize,
        end: usize,
    ) -> Result<RunReport> {
        self.select_lines(source, output, true, |index| (start..=end).contains(&index))
    }

    /// Header plus every line outside `start..=end`.
    pub fn delete_interval<R: BufRead>(
        &self,
        source: LineReader<R>,
        output: &Path,
        start: usize,
        end: usize,
    ) -> Result<RunReport> {
        self.select_lines(source, output, false, |index| !(start..=end).contains(&index))
    }

    fn select_lines<R, F>(
        &self,
        mut source: LineReader<R>,
        output: &Path,
        with_trailer: bool,
        keep: F,
    ) -> Result<RunReport>
    where
        R: BufRead,
        F: Fn(usize) -> bool,
    {
        let header = source.read_header()?;
        let mut writer = AppendWriter::lines(output, self.config.checkpoint)?;
        writer.write(header.as_str())?;
        writer.record_consumed()?;

        let mut records_written = 0;
        for line in &mut source {
            let (index, line) = line?;
            if keep(index) {
                writer.write(line.as_str())?;
                records_written += 1;
            }
            writer.record_consumed()?;
        }

        let total_lines = source.line_number();
        if with_trailer {
            write_trailer(&mut writer, total_lines)?;
        }
        writer.finish()?;

        Ok(RunReport::Written {
            output: output.to_path_buf(),
            total_lines,
            records_written,
        })
    }

    /// Infers a type for every column from the first `sample_rows` rows.
    pub fn analyze<R: Read>(&self, source: CsvStreamReader<R>) -> Result<RunReport> {
        let columns = analyze_columns(source, self.config.sample_rows)?;
        let sampled_rows = columns.first().map(|c| c.samples).unwrap_or(0);
        Ok(RunReport::Analysis {
            sampled_rows,
            columns,
        })
    }

    /// Header plus rows whose `column` holds a date within `start..=end`.
    /// Rows whose value is not a recognised date are skipped.
    pub fn filter_date<R: Read>(
        &self,
        mut source: CsvStreamReader<R>,
        output: &Path,
        column: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RunReport> {
        let index = source.column_index(column)?;
        let mut writer = AppendWriter::csv(output, self.config.checkpoint)?;
        writer.write(source.headers())?;
        writer.record_consumed()?;

        let mut records_written = 0;
        let mut unparsed = 0usize;
        for row in &mut source {
            let (line, row) = row?;
            let value = row.get(index).map(String::as_str).unwrap_or_default();
            match parse_date(value) {
                Ok(date) if start <= date && date <= end => {
                    writer.write(row.as_slice())?;
                    records_written += 1;
                }
                Ok(_) => {}
                Err(_) => {
                    unparsed += 1;
                    trace!(record = line, value, "Skipping row without a valid date");
                }
            }
            writer.record_consumed()?;
        }
        writer.finish()?;

        let total_lines = source.records_read();
        info!(
            matched = records_written,
            unparsed,
            total = total_lines,
            "Date filter applied"
        );

        Ok(RunReport::Written {
            output: output.to_path_buf(),
            total_lines,
            records_written,
        })
    }

    /// Total number of lines, header included.
    pub fn count<R: BufRead>(&self, mut source: LineReader<R>) -> Result<RunReport> {
        source.read_header()?;
        for line in &mut source {
            line?;
        }
        Ok(RunReport::Count {
            total_lines: source.line_number(),
        })
    }

    /// Sums every line that parses as a number. Blank and non-numeric lines
    /// are left out of both the sum and the numeric line count.
    pub fn sum_lines<R: BufRead>(&self, mut source: LineReader<R>) -> Result<RunReport> {
        let mut numeric_lines = 0;
        let mut total = Numeric::ZERO;
        for line in &mut source {
            let (_, line) = line?;
            if let Some(value) = try_parse_numeric(&line) {
                numeric_lines += 1;
                total = total + value;
            }
        }
        if source.line_number() == 0 {
            return Err(ChunkTailError::EmptyInput(source.source().to_string()));
        }
        Ok(RunReport::Sum {
            numeric_lines,
            total,
        })
    }

    /// Writes `left[i] + right[i]` for every line up to the longer input.
    /// Missing lines and non-numeric text count as zero.
    pub fn add_files<L: BufRead, R: BufRead>(
        &self,
        mut left: LineReader<L>,
        mut right: LineReader<R>,
        output: &Path,
    ) -> Result<RunReport> {
        let (_, first) = left
            .next()
            .transpose()?
            .ok_or_else(|| ChunkTailError::EmptyInput(left.source().to_string()))?;

        let mut writer = AppendWriter::lines(output, self.config.checkpoint)?;
        let mut pending = Some(first);
        loop {
            let l = match pending.take() {
                Some(line) => Some(line),
                None => left.next().transpose()?.map(|(_, line)| line),
            };
            let r = right.next().transpose()?.map(|(_, line)| line);
            if l.is_none() && r.is_none() {
                break;
            }

            let sum = numeric_or_zero(l.as_deref()) + numeric_or_zero(r.as_deref());
            writer.write(sum.to_string().as_str())?;
            writer.record_consumed()?;
        }

        let records_written = writer.finish()?;
        Ok(RunReport::Written {
            output: output.to_path_buf(),
            total_lines: records_written,
            records_written,
        })
    }
}

fn numeric_or_zero(line: Option<&str>) -> Numeric {
    line.map(parse_numeric_or_zero).unwrap_or_default()
}

fn snapshot_lines<'a>(
    header: &'a str,
    window: &'a SlidingWindow<String>,
) -> impl Iterator<Item = &'a str> + 'a {
    std::iter::once(header).chain(window.iter().map(String::as_str))
}

fn write_trailer(writer: &mut AppendWriter<LineSink>, total_lines: usize) -> Result<()> {
    writer.write("")?;
    writer.write(format!("Total lines in input: {}", total_lines).as_str())
}

/// Refuses to truncate a file that is also being read.
fn ensure_distinct(input: &Path, output: &Path) -> Result<()> {
    if let (Ok(a), Ok(b)) = (input.canonicalize(), output.canonicalize()) {
        if a == b {
            return Err(ChunkTailError::InvalidArgument(format!(
                "output {} would overwrite input {}",
                output.display(),
                input.display()
            )));
        }
    }
    Ok(())
}
