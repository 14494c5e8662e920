//! Payload sources for synthetic frames

use bytes::Bytes;
use pktburst_core::{Error, Result};

/// Frame payload: literal bytes or a repeat-then-truncate generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Bytes used as-is
    Literal(Bytes),
    /// Repeat `pattern` `target_length / pattern.len()` times, then keep at
    /// most `target_length` bytes
    Pattern {
        pattern: Bytes,
        target_length: usize,
    },
}

impl Payload {
    /// Literal payload from any byte source
    pub fn literal(data: impl Into<Bytes>) -> Self {
        Payload::Literal(data.into())
    }

    /// Literal payload from UTF-8 text
    pub fn text(text: &str) -> Self {
        Payload::Literal(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// Pattern payload
    pub fn pattern(pattern: impl Into<Bytes>, target_length: usize) -> Self {
        Payload::Pattern {
            pattern: pattern.into(),
            target_length,
        }
    }

    /// Produce the payload bytes
    ///
    /// The pattern form only ever repeats whole copies, so when the pattern
    /// length does not divide `target_length` the result is shorter than the
    /// target: `"AB"` with target 5 yields `"ABAB"`.
    pub fn resolve(&self) -> Result<Bytes> {
        match self {
            Payload::Literal(data) => Ok(data.clone()),
            Payload::Pattern {
                pattern,
                target_length,
            } => {
                if pattern.is_empty() {
                    return Err(Error::construction("payload pattern must not be empty"));
                }
                let repetitions = target_length / pattern.len();
                let mut data = pattern.repeat(repetitions);
                data.truncate(*target_length);
                Ok(Bytes::from(data))
            }
        }
    }

    /// Length `resolve` will produce, without allocating
    pub fn resolved_len(&self) -> usize {
        match self {
            Payload::Literal(data) => data.len(),
            Payload::Pattern {
                pattern,
                target_length,
            } => {
                if pattern.is_empty() {
                    0
                } else {
                    pattern.len() * (target_length / pattern.len())
                }
            }
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Literal(Bytes::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_MESSAGE: &str = "This is a testing packet of size 1500 bytes";

    #[test]
    fn test_literal_as_is() {
        let payload = Payload::text("This is a test IP packet!");
        assert_eq!(&payload.resolve().unwrap()[..], b"This is a test IP packet!");
    }

    #[test]
    fn test_pattern_evenly_divisible() {
        let payload = Payload::pattern(&b"AB"[..], 4);
        assert_eq!(&payload.resolve().unwrap()[..], b"ABAB");
    }

    #[test]
    fn test_pattern_not_divisible_never_pads() {
        let payload = Payload::pattern(&b"AB"[..], 5);
        let data = payload.resolve().unwrap();
        assert_eq!(&data[..], b"ABAB");
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_pattern_shorter_target_than_pattern() {
        let payload = Payload::pattern(&b"ABCDEF"[..], 4);
        assert!(payload.resolve().unwrap().is_empty());
    }

    #[test]
    fn test_mtu_sized_message() {
        // 1492 / 43 = 34 copies
        let payload = Payload::pattern(BASE_MESSAGE.as_bytes().to_vec(), 1492);
        let data = payload.resolve().unwrap();
        assert_eq!(data.len(), 1462);
        assert!(data.starts_with(BASE_MESSAGE.as_bytes()));
        assert!(data.ends_with(BASE_MESSAGE.as_bytes()));
        assert_eq!(payload.resolved_len(), 1462);
    }

    #[test]
    fn test_empty_pattern_is_error() {
        let payload = Payload::pattern(Bytes::new(), 10);
        assert!(matches!(payload.resolve(), Err(Error::Construction(_))));
    }

    #[test]
    fn test_zero_target() {
        let payload = Payload::pattern(&b"AB"[..], 0);
        assert!(payload.resolve().unwrap().is_empty());
    }
}
