use crate::utils::{ChunkTailError, Result};
use std::num::NonZeroUsize;

pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 1000;

/// How often a writer reaches a checkpoint, counted in source records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointPolicy {
    interval: NonZeroUsize,
    sync: bool,
}

impl CheckpointPolicy {
    pub fn new(interval: usize) -> Result<Self> {
        let interval = NonZeroUsize::new(interval).ok_or_else(|| {
            ChunkTailError::InvalidArgument("checkpoint interval must be at least 1".to_string())
        })?;
        Ok(Self {
            interval,
            sync: false,
        })
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn interval(&self) -> usize {
        self.interval.get()
    }

    pub fn sync(&self) -> bool {
        self.sync
    }

    pub fn counter(&self) -> CheckpointCounter {
        CheckpointCounter {
            interval: self.interval,
            consumed: 0,
            checkpoints: 0,
        }
    }
}

impl Default for CheckpointPolicy {
    fn default() -> Self {
        Self {
            interval: NonZeroUsize::new(DEFAULT_CHECKPOINT_INTERVAL).unwrap_or(NonZeroUsize::MIN),
            sync: false,
        }
    }
}

/// Monotonic count of source records consumed since stream start.
#[derive(Debug, Clone)]
pub struct CheckpointCounter {
    interval: NonZeroUsize,
    consumed: usize,
    checkpoints: usize,
}

impl CheckpointCounter {
    /// Counts one consumed record; returns true when it lands on a checkpoint.
    pub fn record_consumed(&mut self) -> bool {
        self.consumed += 1;
        let due = self.consumed % self.interval.get() == 0;
        if due {
            self.checkpoints += 1;
        }
        due
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn checkpoints(&self) -> usize {
        self.checkpoints
    }
}
