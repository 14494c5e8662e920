//! Burst transmitter
//!
//! Replays a [`TransmissionPlan`] to a [`RawSink`] in one of two modes:
//!
//! - **Streaming**: every frame of every pass is handed to the sink on its own.
//!   Cancellation is checked before each frame.
//! - **Cached buffer**: one pass is concatenated into a contiguous buffer up
//!   front and the same buffer is handed to the sink for every repetition.
//!   Cancellation is checked once per pass.
//!
//! Both modes write the same bytes in the same order. The first sink error
//! aborts the burst; nothing is retried or skipped.

use crate::cancel::CancelToken;
use crate::plan::TransmissionPlan;
use crate::result::TransmissionResult;
use crate::stats::BurstStatsCounters;
use pktburst_core::{CachedPass, EngineConfig, Error, PassError, RawSink};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// How a run ended
enum Outcome {
    Completed,
    Cancelled,
    Failed(Error),
}

/// Progress tracked locally and mirrored into the shared counters
#[derive(Default)]
struct Progress {
    frames_sent: u64,
    bytes_sent: u64,
    passes_completed: u64,
}

/// Drives transmission plans out to a sink
///
/// The live counters are cumulative: every `transmit` call on this
/// transmitter, and on its clones, adds to the same totals. Use a fresh
/// transmitter per burst for per-burst figures; the returned
/// [`TransmissionResult`] always describes a single call.
#[derive(Debug, Clone)]
pub struct BurstTransmitter {
    config: EngineConfig,
    counters: Arc<BurstStatsCounters>,
}

impl BurstTransmitter {
    /// Create a transmitter with fresh counters
    pub fn new(config: EngineConfig) -> Self {
        Self::with_counters(config, Arc::new(BurstStatsCounters::default()))
    }

    /// Create a transmitter reporting into existing counters
    pub fn with_counters(config: EngineConfig, counters: Arc<BurstStatsCounters>) -> Self {
        Self { config, counters }
    }

    /// Live counters updated while `transmit` runs, accumulated across calls
    pub fn counters(&self) -> Arc<BurstStatsCounters> {
        self.counters.clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Transmit `plan` to `sink`, blocking until it completes, fails or is cancelled
    ///
    /// The sink must not be written by anyone else for the duration of the call.
    pub fn transmit(
        &self,
        plan: &TransmissionPlan,
        sink: &mut dyn RawSink,
        cancel: &CancelToken,
    ) -> TransmissionResult {
        let started = Instant::now();
        let mut progress = Progress::default();

        let outcome = if plan.repeat_count().is_unbounded() && !self.config.allow_unbounded {
            Outcome::Failed(Error::UnboundedNotPermitted)
        } else if plan.is_empty() {
            debug!(repeat = %plan.repeat_count(), frames = plan.frames().len(), "Nothing to transmit");
            Outcome::Completed
        } else {
            info!(
                frames = plan.frames().len(),
                pass_bytes = plan.pass_bytes(),
                repeat = %plan.repeat_count(),
                cached = plan.uses_cache(),
                "Starting burst"
            );

            if plan.uses_cache() {
                self.run_cached(plan, sink, cancel, &mut progress)
            } else {
                self.run_streaming(plan, sink, cancel, &mut progress)
            }
        };

        let elapsed = started.elapsed();
        let mut result = TransmissionResult {
            frames_sent: progress.frames_sent,
            bytes_sent: progress.bytes_sent,
            passes_completed: progress.passes_completed,
            elapsed,
            cancelled: false,
            error: None,
        };

        match outcome {
            Outcome::Completed => {
                info!(
                    frames_sent = result.frames_sent,
                    bytes_sent = result.bytes_sent,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Burst completed"
                );
            }
            Outcome::Cancelled => {
                warn!(
                    frames_sent = result.frames_sent,
                    passes_completed = result.passes_completed,
                    "Burst cancelled"
                );
                result.cancelled = true;
            }
            Outcome::Failed(err) => {
                error!(
                    frames_sent = result.frames_sent,
                    error = %err,
                    "Burst failed"
                );
                result.error = Some(err);
            }
        }

        result
    }

    fn run_streaming(
        &self,
        plan: &TransmissionPlan,
        sink: &mut dyn RawSink,
        cancel: &CancelToken,
        progress: &mut Progress,
    ) -> Outcome {
        let repeat = plan.repeat_count();
        let mut pass = 0u64;

        while repeat.allows(pass) {
            for (frame_index, frame) in plan.frames().iter().enumerate() {
                if cancel.is_cancelled() {
                    return Outcome::Cancelled;
                }
                if let Err(source) = sink.write(frame) {
                    return Outcome::Failed(Error::Sink {
                        pass,
                        frame_index,
                        source,
                    });
                }
                progress.frames_sent += 1;
                progress.bytes_sent += frame.len() as u64;
                self.counters.add_frames(1, frame.len() as u64);
            }

            progress.passes_completed += 1;
            self.counters.increment_passes();
            trace!(pass, "Pass complete");
            pass += 1;
        }

        Outcome::Completed
    }

    fn run_cached(
        &self,
        plan: &TransmissionPlan,
        sink: &mut dyn RawSink,
        cancel: &CancelToken,
        progress: &mut Progress,
    ) -> Outcome {
        let cached = CachedPass::from_frames(plan.frames().iter().map(|frame| frame.as_bytes()));
        debug!(
            frames = cached.frame_count(),
            bytes = cached.byte_len(),
            "Pre-serialized pass"
        );

        let repeat = plan.repeat_count();
        let pass_frames = cached.frame_count() as u64;
        let pass_bytes = cached.byte_len() as u64;
        let mut pass = 0u64;

        while repeat.allows(pass) {
            if cancel.is_cancelled() {
                return Outcome::Cancelled;
            }

            match sink.write_pass(&cached) {
                Ok(()) => {
                    progress.frames_sent += pass_frames;
                    progress.bytes_sent += pass_bytes;
                    progress.passes_completed += 1;
                    self.counters.add_frames(pass_frames, pass_bytes);
                    self.counters.increment_passes();
                }
                Err(PassError {
                    frames_written,
                    source,
                }) => {
                    let bytes: u64 = cached
                        .frames()
                        .take(frames_written)
                        .map(|frame| frame.len() as u64)
                        .sum();
                    progress.frames_sent += frames_written as u64;
                    progress.bytes_sent += bytes;
                    self.counters.add_frames(frames_written as u64, bytes);
                    return Outcome::Failed(Error::Sink {
                        pass,
                        frame_index: frames_written,
                        source,
                    });
                }
            }

            trace!(pass, "Pass complete");
            pass += 1;
        }

        Outcome::Completed
    }
}
