use crate::csv_processor::ColumnReport;
use crate::values::Numeric;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunReport {
    Written {
        output: PathBuf,
        total_lines: usize,
        records_written: usize,
    },
    Analysis {
        sampled_rows: usize,
        columns: Vec<ColumnReport>,
    },
    Count {
        total_lines: usize,
    },
    Sum {
        numeric_lines: usize,
        total: Numeric,
    },
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Written {
                output,
                total_lines,
                records_written,
            } => write!(
                f,
                "Done! Result in \"{}\" ({} records written). Total lines in input: {}",
                output.display(),
                records_written,
                total_lines
            ),
            RunReport::Analysis {
                sampled_rows,
                columns,
            } => {
                write!(f, "Analysis of header + {} rows:", sampled_rows)?;
                for column in columns {
                    write!(f, "\n  {}: {}", column.name, column.column_type)?;
                }
                Ok(())
            }
            RunReport::Count { total_lines } => write!(f, "Total lines: {}", total_lines),
            RunReport::Sum {
                numeric_lines,
                total,
            } => write!(f, "Numeric lines: {}\nSum: {}", numeric_lines, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_processor::ColumnType;

    #[test]
    fn test_analysis_lists_columns_in_order() {
        let report = RunReport::Analysis {
            sampled_rows: 2,
            columns: vec![
                ColumnReport {
                    name: "id".into(),
                    column_type: ColumnType::Int,
                    samples: 2,
                },
                ColumnReport {
                    name: "when".into(),
                    column_type: ColumnType::Date,
                    samples: 2,
                },
            ],
        };
        assert_eq!(
            report.to_string(),
            "Analysis of header + 2 rows:\n  id: int\n  when: date"
        );
    }

    #[test]
    fn test_sum_serializes_plain_number() {
        let report = RunReport::Sum {
            numeric_lines: 3,
            total: Numeric::Float(17.5),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["kind"], "sum");
        assert_eq!(json["numeric_lines"], 3);
        assert_eq!(json["total"], 17.5);
    }
}
