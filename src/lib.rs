pub mod csv_processor;
pub mod engine;
pub mod state;
pub mod utils;
pub mod values;

pub use csv_processor::{
    AppendWriter, ColumnReport, ColumnType, CsvStreamReader, LineReader, SnapshotWriter,
};
pub use engine::{EngineConfig, Operation, RunReport, SlidingWindow, TransformEngine};
pub use state::{CheckpointCounter, CheckpointPolicy};
pub use utils::{AppConfig, ChunkTailError, Result};
pub use values::{parse_date, Numeric};
