use crate::csv_processor::reader::CsvStreamReader;
use crate::utils::Result;
use crate::values::{is_float, is_integer, shared_date_format};
use serde::Serialize;
use std::fmt;
use std::io::Read;

pub const DEFAULT_SAMPLE_ROWS: usize = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Date,
    String,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::String => write!(f, "string"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    pub column_type: ColumnType,
    pub samples: usize,
}

/// Classifies sampled values. Blank values are ignored; a single value that
/// does not fit disqualifies a type for the whole column.
pub fn infer_type<S: AsRef<str>>(values: &[S]) -> ColumnType {
    let mut non_blank = values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| !v.trim().is_empty())
        .peekable();

    if non_blank.peek().is_none() {
        return ColumnType::String;
    }
    if non_blank.clone().all(is_integer) {
        return ColumnType::Int;
    }
    if non_blank.clone().all(is_float) {
        return ColumnType::Float;
    }
    if shared_date_format(non_blank).is_some() {
        return ColumnType::Date;
    }
    ColumnType::String
}

/// Samples up to `sample_rows` data rows and infers a type per header column.
pub fn analyze_columns<R: Read>(
    mut reader: CsvStreamReader<R>,
    sample_rows: usize,
) -> Result<Vec<ColumnReport>> {
    let headers = reader.headers().to_vec();
    let mut samples: Vec<Vec<String>> = vec![Vec::with_capacity(sample_rows); headers.len()];

    for row in reader.by_ref().take(sample_rows) {
        let (_, row) = row?;
        for (column, value) in samples.iter_mut().zip(row) {
            column.push(value);
        }
    }

    let reports = headers
        .into_iter()
        .zip(samples)
        .map(|(name, values)| ColumnReport {
            column_type: infer_type(&values),
            samples: values.len(),
            name,
        })
        .collect();

    Ok(reports)
}
