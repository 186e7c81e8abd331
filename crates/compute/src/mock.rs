//! A recording backend for exercising the frame protocol without a GPU.

use bytemuck::Pod;

use crate::{BufferSlot, ComputeBackend, ComputeError, DispatchPlan};

/// One call made against a [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Write { slot: BufferSlot, bytes: Vec<u8> },
    Submit(DispatchPlan),
}

/// Records every write and submit in order. A failure can be queued to be
/// returned by the next `submit`.
#[derive(Debug, Default)]
pub struct MockBackend {
    calls: Vec<BackendCall>,
    next_failure: Option<ComputeError>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn fail_next_submit(&mut self, error: ComputeError) {
        self.next_failure = Some(error);
    }

    /// Plans passed to `submit`, oldest first.
    #[must_use]
    pub fn submits(&self) -> Vec<DispatchPlan> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Submit(plan) => Some(*plan),
                BackendCall::Write { .. } => None,
            })
            .collect()
    }

    /// Number of writes to `slot` so far.
    #[must_use]
    pub fn write_count(&self, slot: BufferSlot) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BackendCall::Write { slot: s, .. } if *s == slot))
            .count()
    }

    /// The most recent bytes written to `slot`.
    #[must_use]
    pub fn last_write(&self, slot: BufferSlot) -> Option<&[u8]> {
        self.calls.iter().rev().find_map(|call| match call {
            BackendCall::Write { slot: s, bytes } if *s == slot => Some(bytes.as_slice()),
            _ => None,
        })
    }

    /// The most recent write to `slot` reinterpreted as `T` records.
    #[must_use]
    pub fn read_as<T: Pod>(&self, slot: BufferSlot) -> Vec<T> {
        self.last_write(slot)
            .map(|bytes| {
                bytes
                    .chunks_exact(std::mem::size_of::<T>())
                    .map(bytemuck::pod_read_unaligned::<T>)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ComputeBackend for MockBackend {
    fn write_buffer(&mut self, slot: BufferSlot, bytes: &[u8]) {
        self.calls.push(BackendCall::Write {
            slot,
            bytes: bytes.to_vec(),
        });
    }

    fn submit(&mut self, plan: &DispatchPlan) -> Result<(), ComputeError> {
        if let Some(error) = self.next_failure.take() {
            return Err(error);
        }
        self.calls.push(BackendCall::Submit(*plan));
        Ok(())
    }
}
