use crate::utils::{ChunkTailError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

/// The single transformation selected for a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Tail { n: usize },
    DropLast { n: usize },
    Interval { start: usize, end: usize },
    DeleteInterval { start: usize, end: usize },
    Analyze,
    FilterDate {
        column: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    Count,
    SumLines,
    AddFiles { other: PathBuf },
}

impl Operation {
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Interval { start, end } | Operation::DeleteInterval { start, end }
                if start > end =>
            {
                Err(ChunkTailError::InvalidArgument(format!(
                    "interval start {} is after end {}",
                    start, end
                )))
            }
            Operation::FilterDate { start, end, .. } if start > end => {
                Err(ChunkTailError::InvalidArgument(format!(
                    "date range start {} is after end {}",
                    start, end
                )))
            }
            Operation::FilterDate { column, .. } if column.is_empty() => Err(
                ChunkTailError::InvalidArgument("filter column name is empty".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Modes that report on the console only and never touch the output path.
    pub fn is_report_only(&self) -> bool {
        matches!(
            self,
            Operation::Analyze | Operation::Count | Operation::SumLines
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Tail { .. } => "tail",
            Operation::DropLast { .. } => "drop-last",
            Operation::Interval { .. } => "interval",
            Operation::DeleteInterval { .. } => "delete-interval",
            Operation::Analyze => "analyze",
            Operation::FilterDate { .. } => "filter-date",
            Operation::Count => "count",
            Operation::SumLines => "sum-lines",
            Operation::AddFiles { .. } => "add-files",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Tail { n } | Operation::DropLast { n } => write!(f, "{}({})", self.name(), n),
            Operation::Interval { start, end } | Operation::DeleteInterval { start, end } => {
                write!(f, "{}({}, {})", self.name(), start, end)
            }
            Operation::FilterDate { column, start, end } => {
                write!(f, "{}({}, {}, {})", self.name(), column, start, end)
            }
            Operation::AddFiles { other } => write!(f, "{}({})", self.name(), other.display()),
            _ => write!(f, "{}", self.name()),
        }
    }
}
