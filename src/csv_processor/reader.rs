use crate::utils::{trim_line_terminator, ChunkTailError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Forward-only reader yielding `(line_number, line)` with terminators removed.
///
/// Line numbers are 1-based over the whole source, so the header is line 1.
pub struct LineReader<R> {
    reader: R,
    source: String,
    line_number: usize,
}

impl LineReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::with_source(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_source(reader, "<stream>".to_string())
    }

    pub fn with_source(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
            line_number: 0,
        }
    }

    /// Reads line 1. An empty source is an `EmptyInput` error.
    pub fn read_header(&mut self) -> Result<String> {
        match self.next() {
            Some(Ok((_, header))) => Ok(header),
            Some(Err(e)) => Err(e),
            None => Err(ChunkTailError::EmptyInput(self.source.clone())),
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                trim_line_terminator(&mut line);
                self.line_number += 1;
                Some(Ok((self.line_number, line)))
            }
            Err(e) => Some(Err(ChunkTailError::IoError(e))),
        }
    }
}

/// CSV reader that splits off the header row and aligns every record to it.
pub struct CsvStreamReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record_index: usize,
}

impl CsvStreamReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::with_source(file, path.display().to_string())
    }
}

impl<R: Read> CsvStreamReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_source(reader, "<stream>")
    }

    fn with_source(reader: R, source: impl Into<String>) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = string_record_to_vec(reader.headers()?);
        if headers.is_empty() {
            return Err(ChunkTailError::EmptyInput(source.into()));
        }
        Ok(Self {
            reader,
            headers,
            record_index: 1,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| ChunkTailError::ColumnNotFound {
                column: column.to_string(),
            })
    }

    /// Records consumed so far, counting the header as record 1.
    pub fn records_read(&self) -> usize {
        self.record_index
    }
}

impl<R: Read> Iterator for CsvStreamReader<R> {
    type Item = Result<(usize, Vec<String>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                self.record_index += 1;
                let mut row = string_record_to_vec(&record);
                if row.len() < self.headers.len() {
                    row.resize(self.headers.len(), String::new());
                }
                Some(Ok((self.record_index, row)))
            }
            Ok(false) => None,
            Err(e) => Some(Err(ChunkTailError::MalformedRecord(e))),
        }
    }
}

pub fn string_record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}
