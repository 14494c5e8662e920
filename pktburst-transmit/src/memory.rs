//! In-memory sink
//!
//! Records the exact byte stream a burst produces, or just counts it. Used for
//! dry runs and as the observation point in tests.

use parking_lot::Mutex;
use pktburst_core::{CachedPass, MacAddr, PassError, RawSink, SinkError};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Recorded {
    stream: Vec<u8>,
    frame_lengths: Vec<usize>,
    frames: u64,
    bytes: u64,
}

/// Shared view of what a [`MemorySink`] has accepted
///
/// Stays valid after the sink itself has been moved into a running burst.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecording {
    inner: Arc<Mutex<Recorded>>,
}

impl MemoryRecording {
    /// Concatenation of every frame written (empty when not capturing)
    pub fn stream(&self) -> Vec<u8> {
        self.inner.lock().stream.clone()
    }

    /// Every frame written, split at frame boundaries (empty when not capturing)
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let recorded = self.inner.lock();
        let mut offset = 0;
        recorded
            .frame_lengths
            .iter()
            .map(|len| {
                let frame = recorded.stream[offset..offset + len].to_vec();
                offset += len;
                frame
            })
            .collect()
    }

    /// Number of frames accepted
    pub fn frame_count(&self) -> u64 {
        self.inner.lock().frames
    }

    /// Number of bytes accepted
    pub fn byte_count(&self) -> u64 {
        self.inner.lock().bytes
    }
}

/// [`RawSink`] that keeps frames in memory
#[derive(Debug)]
pub struct MemorySink {
    address: MacAddr,
    recording: MemoryRecording,
    capture: bool,
    fail_after: Option<u64>,
}

impl MemorySink {
    /// Sink that records every frame
    pub fn new(address: MacAddr) -> Self {
        Self {
            address,
            recording: MemoryRecording::default(),
            capture: true,
            fail_after: None,
        }
    }

    /// Sink that only counts frames and bytes, so unbounded bursts stay bounded in memory
    pub fn discarding(address: MacAddr) -> Self {
        Self {
            capture: false,
            ..Self::new(address)
        }
    }

    /// Reject every write once `frames` frames have been accepted
    pub fn fail_after(mut self, frames: u64) -> Self {
        self.fail_after = Some(frames);
        self
    }

    /// Handle for inspecting what this sink has accepted
    pub fn recording(&self) -> MemoryRecording {
        self.recording.clone()
    }

    fn remaining(&self, recorded: &Recorded) -> Option<u64> {
        self.fail_after
            .map(|limit| limit.saturating_sub(recorded.frames))
    }

    fn accept(&self, recorded: &mut Recorded, frame: &[u8]) {
        if self.capture {
            recorded.stream.extend_from_slice(frame);
            recorded.frame_lengths.push(frame.len());
        }
        recorded.frames += 1;
        recorded.bytes += frame.len() as u64;
    }
}

impl RawSink for MemorySink {
    fn write(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        let mut recorded = self.recording.inner.lock();
        if self.remaining(&recorded) == Some(0) {
            return Err(SinkError::Rejected(format!(
                "memory sink limit of {} frames reached",
                recorded.frames
            )));
        }
        self.accept(&mut recorded, frame);
        Ok(())
    }

    fn own_address(&self) -> MacAddr {
        self.address
    }

    fn write_pass(&mut self, pass: &CachedPass) -> Result<(), PassError> {
        let mut recorded = self.recording.inner.lock();

        let fits = self
            .remaining(&recorded)
            .map_or(true, |left| left >= pass.frame_count() as u64);

        if fits {
            if self.capture {
                recorded.stream.extend_from_slice(pass.as_bytes());
                recorded
                    .frame_lengths
                    .extend(pass.frames().map(<[u8]>::len));
            }
            recorded.frames += pass.frame_count() as u64;
            recorded.bytes += pass.byte_len() as u64;
            return Ok(());
        }

        for (index, frame) in pass.frames().enumerate() {
            if self.remaining(&recorded) == Some(0) {
                return Err(PassError {
                    frames_written: index,
                    source: SinkError::Rejected(format!(
                        "memory sink limit of {} frames reached",
                        recorded.frames
                    )),
                });
            }
            self.accept(&mut recorded, frame);
        }
        Ok(())
    }
}
