//! Outcome of one transmit call

use pktburst_core::Error;
use std::time::Duration;

/// What a burst achieved before it finished, was cancelled, or failed
///
/// A failed burst still reports its partial progress; the requested count is
/// never silently truncated.
#[derive(Debug, Default)]
pub struct TransmissionResult {
    /// Frames the sink accepted
    pub frames_sent: u64,
    /// Bytes the sink accepted
    pub bytes_sent: u64,
    /// Full passes completed
    pub passes_completed: u64,
    /// Wall time spent in the transmit call
    pub elapsed: Duration,
    /// The burst stopped because it was cancelled
    pub cancelled: bool,
    /// First error encountered, if any
    pub error: Option<Error>,
}

impl TransmissionResult {
    /// True when no error occurred (completion or cancellation)
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Frames per second over the whole call
    pub fn frames_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_sent as f64 / secs
        } else {
            0.0
        }
    }

    /// Bits per second of frame data (no preamble, FCS or gaps)
    pub fn bits_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.bytes_sent * 8) as f64 / secs
        } else {
            0.0
        }
    }

    /// Convert into a `Result`, dropping progress on failure
    pub fn into_result(self) -> pktburst_core::Result<Self> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let result = TransmissionResult {
            frames_sent: 1000,
            bytes_sent: 64_000,
            passes_completed: 1000,
            elapsed: Duration::from_millis(500),
            ..Default::default()
        };
        assert!(result.is_success());
        assert_eq!(result.frames_per_second(), 2000.0);
        assert_eq!(result.bits_per_second(), 1_024_000.0);
    }

    #[test]
    fn test_zero_elapsed_rates() {
        let result = TransmissionResult::default();
        assert_eq!(result.frames_per_second(), 0.0);
        assert_eq!(result.bits_per_second(), 0.0);
    }

    #[test]
    fn test_into_result_error() {
        let result = TransmissionResult {
            frames_sent: 5,
            error: Some(Error::UnboundedNotPermitted),
            ..Default::default()
        };
        assert!(!result.is_success());
        assert!(matches!(
            result.into_result(),
            Err(Error::UnboundedNotPermitted)
        ));
    }
}
