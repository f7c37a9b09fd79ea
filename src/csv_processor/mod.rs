pub mod analyzer;
pub mod reader;
pub mod writer;

pub use analyzer::{analyze_columns, infer_type, ColumnReport, ColumnType, DEFAULT_SAMPLE_ROWS};
pub use reader::{string_record_to_vec, CsvStreamReader, LineReader};
pub use writer::{AppendWriter, CsvSink, LineSink, RecordSink, SnapshotWriter};
