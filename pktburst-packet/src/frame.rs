//! Built, immutable frames

use crate::crc32::ethernet_fcs;
use bytes::Bytes;
use std::ops::Deref;

/// A complete link-layer frame ready for transmission
///
/// Backed by [`Bytes`]: cloning shares the buffer, and the contents can never
/// change after the builder hands the frame out, so one frame can be replayed
/// by any number of transmitters at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Bytes,
}

impl Frame {
    pub(crate) fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Frame bytes (no FCS)
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the underlying buffer
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Frame length in bytes (no FCS)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the frame is empty (never true for built frames)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// IEEE 802.3 frame check sequence the NIC will append on the wire
    pub fn fcs(&self) -> u32 {
        ethernet_fcs(&self.data)
    }
}

impl Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_buffer() {
        let frame = Frame::new(Bytes::from_static(&[1, 2, 3]));
        let copy = frame.clone();
        assert_eq!(frame.as_bytes().as_ptr(), copy.as_bytes().as_ptr());
        assert_eq!(copy.len(), 3);
        assert!(!copy.is_empty());
    }

    #[test]
    fn test_frame_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Frame>();
    }
}
