//! Error types for pktburst

use thiserror::Error;

/// Result type alias for pktburst operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pktburst
#[derive(Error, Debug)]
pub enum Error {
    /// Frame description is malformed or would exceed the frame size limit
    #[error("Frame construction error: {0}")]
    Construction(String),

    /// The sink failed a write; the burst was aborted at this position
    #[error("Sink write failed at pass {pass}, frame {frame_index}: {source}")]
    Sink {
        pass: u64,
        frame_index: usize,
        #[source]
        source: SinkError,
    },

    /// An unbounded plan was submitted to an engine that does not allow it
    #[error("Unbounded transmission is not permitted by this configuration")]
    UnboundedNotPermitted,

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// Interface error
    #[error("Interface error: {0}")]
    Interface(String),

    /// Burst profile could not be read or understood
    #[error("Profile error: {0}")]
    Profile(String),

    /// I/O error outside of a sink write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl Error {
    /// Create a construction error with a custom message
    pub fn construction<S: Into<String>>(msg: S) -> Self {
        Error::Construction(msg.into())
    }

    /// Create a profile error with a custom message
    pub fn profile<S: Into<String>>(msg: S) -> Self {
        Error::Profile(msg.into())
    }

    /// True if this error came from the sink rejecting a write
    pub fn is_sink_error(&self) -> bool {
        matches!(self, Error::Sink { .. })
    }
}

/// Failure reported by a [`RawSink`](crate::RawSink) write
#[derive(Error, Debug)]
pub enum SinkError {
    /// The underlying handle returned an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The datalink layer had no transmit buffer available
    #[error("No transmit buffer available")]
    BufferUnavailable,

    /// The sink refused the frame
    #[error("Frame rejected: {0}")]
    Rejected(String),
}
