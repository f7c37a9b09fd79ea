pub mod checkpoint;

pub use checkpoint::{CheckpointCounter, CheckpointPolicy, DEFAULT_CHECKPOINT_INTERVAL};
