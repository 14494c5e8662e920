//! Burst executor that runs a transmission in the background
//!
//! Transmission is a blocking loop over the sink, so the executor moves the
//! sink onto Tokio's blocking thread pool and hands back a [`BurstHandle`]
//! for observing, cancelling and awaiting the burst.

use crate::cancel::CancelToken;
use crate::plan::TransmissionPlan;
use crate::result::TransmissionResult;
use crate::stats::{BurstStats, BurstStatsCounters};
use crate::transmitter::BurstTransmitter;
use pktburst_core::{Error, RawSink, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Launches one burst
pub struct BurstExecutor {
    /// Unique identifier for this burst
    id: Uuid,
    /// Label used in log output
    label: String,
}

impl BurstExecutor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            label: label.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Start transmitting `plan` to `sink` and return a handle
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(
        self,
        transmitter: BurstTransmitter,
        plan: TransmissionPlan,
        mut sink: S,
    ) -> Result<BurstHandle>
    where
        S: RawSink + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::ExecutionFailed(format!("No Tokio runtime: {}", e)))?;

        let id = self.id;
        let label = self.label;
        let cancel = CancelToken::new();
        let counters = transmitter.counters();
        let started_at = Instant::now();

        info!(
            id = %id,
            label = %label,
            repeat = %plan.repeat_count(),
            cached = plan.uses_cache(),
            "Spawning burst"
        );

        let task_cancel = cancel.clone();
        let task_label = label.clone();
        let task = runtime.spawn_blocking(move || {
            let result = transmitter.transmit(&plan, &mut sink, &task_cancel);
            debug!(
                id = %id,
                label = %task_label,
                frames_sent = result.frames_sent,
                "Burst task finished"
            );
            result
        });

        Ok(BurstHandle {
            id,
            label,
            cancel,
            counters,
            started_at,
            task: Some(task),
        })
    }
}

/// Handle to a running burst
pub struct BurstHandle {
    pub id: Uuid,
    pub label: String,
    cancel: CancelToken,
    counters: Arc<BurstStatsCounters>,
    started_at: Instant,
    task: Option<JoinHandle<TransmissionResult>>,
}

impl BurstHandle {
    /// Request cancellation; the burst stops at its next check
    pub fn cancel(&self) {
        debug!(id = %self.id, "Cancelling burst");
        self.cancel.cancel();
    }

    /// Token that cancels this burst, for wiring into signal handlers
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Snapshot of live progress
    pub fn stats(&self) -> BurstStats {
        self.counters.to_stats(self.started_at, !self.is_finished())
    }

    /// Wait for the burst to end and return its result
    pub async fn wait(&mut self) -> Result<TransmissionResult> {
        let Some(task) = self.task.take() else {
            warn!(id = %self.id, "Burst task already joined");
            return Err(Error::ExecutionFailed(
                "Burst task already joined".to_string(),
            ));
        };

        match task.await {
            Ok(result) => Ok(result),
            Err(e) if e.is_panic() => {
                error!(id = %self.id, "Burst task panicked");
                Err(Error::ExecutionFailed("Burst task panicked".to_string()))
            }
            Err(e) => {
                error!(id = %self.id, error = %e, "Failed to join burst task");
                Err(Error::ExecutionFailed(format!(
                    "Failed to join burst task: {}",
                    e
                )))
            }
        }
    }

    /// Cancel the burst and wait for it to stop
    pub async fn cancel_and_wait(&mut self) -> Result<TransmissionResult> {
        self.cancel();
        self.wait().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySink;
    use pktburst_core::{EngineConfig, MacAddr, SinkError};
    use pktburst_packet::{FrameBuilder, FrameSpec, Payload};
    use std::time::Duration;

    const ADDR: MacAddr = MacAddr([0x02, 0, 0, 0, 0, 7]);

    fn plan() -> TransmissionPlan {
        let frame = FrameBuilder::default()
            .build(&FrameSpec::broadcast(0x1234).payload(Payload::text("burst")), ADDR)
            .unwrap();
        TransmissionPlan::single(frame)
    }

    struct PanickingSink;

    impl RawSink for PanickingSink {
        fn write(&mut self, _frame: &[u8]) -> std::result::Result<(), SinkError> {
            panic!("sink exploded");
        }

        fn own_address(&self) -> MacAddr {
            ADDR
        }
    }

    #[tokio::test]
    async fn test_executor_runs_to_completion() {
        let sink = MemorySink::new(ADDR);
        let recording = sink.recording();
        let transmitter = BurstTransmitter::new(EngineConfig::default());

        let mut handle = BurstExecutor::new("finite")
            .spawn(transmitter, plan().times(250).cached(true), sink)
            .unwrap();
        let result = handle.wait().await.unwrap();

        assert!(result.is_success());
        assert_eq!(result.frames_sent, 250);
        assert_eq!(recording.frame_count(), 250);
        assert!(handle.is_finished());
        assert_eq!(handle.stats().frames_sent, 250);
    }

    #[tokio::test]
    async fn test_executor_cancel_unbounded() {
        let transmitter = BurstTransmitter::new(EngineConfig::new().with_unbounded(true));
        let mut handle = BurstExecutor::new("unbounded")
            .spawn(transmitter, plan().unbounded(), MemorySink::discarding(ADDR))
            .unwrap();

        while handle.stats().frames_sent == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let result = handle.cancel_and_wait().await.unwrap();
        assert!(result.cancelled);
        assert!(result.is_success());
        assert!(result.frames_sent > 0);
    }

    #[tokio::test]
    async fn test_executor_reports_rejected_unbounded() {
        let mut handle = BurstExecutor::new("rejected")
            .spawn(
                BurstTransmitter::new(EngineConfig::default()),
                plan().unbounded(),
                MemorySink::new(ADDR),
            )
            .unwrap();

        let result = handle.wait().await.unwrap();
        assert!(matches!(result.error, Some(Error::UnboundedNotPermitted)));
    }

    #[tokio::test]
    async fn test_executor_handles_panic() {
        let mut handle = BurstExecutor::new("panic")
            .spawn(
                BurstTransmitter::new(EngineConfig::default()),
                plan(),
                PanickingSink,
            )
            .unwrap();

        assert!(matches!(
            handle.wait().await,
            Err(Error::ExecutionFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_wait_twice() {
        let mut handle = BurstExecutor::new("twice")
            .spawn(
                BurstTransmitter::new(EngineConfig::default()),
                plan(),
                MemorySink::new(ADDR),
            )
            .unwrap();

        assert!(handle.wait().await.is_ok());
        assert!(handle.wait().await.is_err());
    }

    #[test]
    fn test_spawn_without_runtime() {
        let result = BurstExecutor::new("no-runtime").spawn(
            BurstTransmitter::new(EngineConfig::default()),
            plan(),
            MemorySink::new(ADDR),
        );
        assert!(matches!(result, Err(Error::ExecutionFailed(_))));
    }
}
