//! Raw frame sink abstraction
//!
//! A sink is the single serial output a burst is written to: a raw network
//! interface in production, or an in-memory recorder in tests. The core never
//! opens, configures or closes the underlying handle.

use crate::{MacAddr, SinkError};
use bytes::{Bytes, BytesMut};
use std::ops::Range;

/// Capability to write complete link-layer frames to a network interface
pub trait RawSink: Send {
    /// Write one complete frame
    fn write(&mut self, frame: &[u8]) -> Result<(), SinkError>;

    /// Hardware address of the interface behind this sink
    fn own_address(&self) -> MacAddr;

    /// Write one pre-serialized pass of frames, in order
    ///
    /// The default implementation walks the span table and writes each frame
    /// slice in turn. Sinks with a batched transmit path may override it.
    fn write_pass(&mut self, pass: &CachedPass) -> Result<(), PassError> {
        for (index, frame) in pass.frames().enumerate() {
            self.write(frame).map_err(|source| PassError {
                frames_written: index,
                source,
            })?;
        }
        Ok(())
    }
}

impl<S: RawSink + ?Sized> RawSink for Box<S> {
    fn write(&mut self, frame: &[u8]) -> Result<(), SinkError> {
        (**self).write(frame)
    }

    fn own_address(&self) -> MacAddr {
        (**self).own_address()
    }

    fn write_pass(&mut self, pass: &CachedPass) -> Result<(), PassError> {
        (**self).write_pass(pass)
    }
}

/// Failure part-way through a [`RawSink::write_pass`] call
#[derive(Debug)]
pub struct PassError {
    /// Frames of the pass written before the failure
    pub frames_written: usize,
    /// The underlying sink error
    pub source: SinkError,
}

/// One full pass of frames concatenated into a single contiguous buffer
///
/// Built once per transmission and replayed for every repetition.
#[derive(Debug, Clone)]
pub struct CachedPass {
    buffer: Bytes,
    spans: Vec<Range<usize>>,
}

impl CachedPass {
    /// Concatenate frames into one buffer, remembering each frame's span
    pub fn from_frames<'a, I>(frames: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut buffer = BytesMut::new();
        let mut spans = Vec::new();

        for frame in frames {
            let start = buffer.len();
            buffer.extend_from_slice(frame);
            spans.push(start..buffer.len());
        }

        Self {
            buffer: buffer.freeze(),
            spans,
        }
    }

    /// The whole pass as one byte sequence
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Iterate over the frames of the pass
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.spans.iter().map(move |span| &self.buffer[span.clone()])
    }

    /// Number of frames in the pass
    pub fn frame_count(&self) -> usize {
        self.spans.len()
    }

    /// Total bytes in the pass
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the pass holds no frames
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}
