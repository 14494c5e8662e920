//! Internet checksum (RFC 1071)

/// Calculates the Internet Checksum as defined in RFC 1071.
///
/// The data is treated as a sequence of big-endian 16-bit words which are
/// summed with end-around carry; the one's complement of the sum is returned.
/// An odd trailing byte is padded with zero on the right.
///
/// # Examples
///
/// ```
/// use pktburst_packet::checksum::internet_checksum;
///
/// let header = [0x45, 0x00, 0x00, 0x1c];
/// let checksum = internet_checksum(&header);
/// ```
pub fn internet_checksum(data: &[u8]) -> u16 {
    let sum = data.chunks(2).fold(0u64, |acc, pair| {
        let word = match *pair {
            [hi, lo] => u16::from_be_bytes([hi, lo]),
            [hi] => u16::from_be_bytes([hi, 0]),
            _ => 0,
        };
        acc + u64::from(word)
    });

    !fold_carries(sum)
}

/// End-around carry: add the overflow above bit 15 back into the low word
fn fold_carries(mut sum: u64) -> u16 {
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_header() {
        // Example header from RFC 1071 discussions, checksum field zeroed
        let header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        assert_eq!(internet_checksum(&header), 0xb861);
    }

    #[test]
    fn test_checksum_verifies_to_zero() {
        let mut header = [
            0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 0xc0, 0xa8,
            0x00, 0x01, 0xc0, 0xa8, 0x00, 0xc7,
        ];
        let checksum = internet_checksum(&header);
        header[10..12].copy_from_slice(&checksum.to_be_bytes());
        assert_eq!(internet_checksum(&header), 0);
    }

    #[test]
    fn test_checksum_odd_length() {
        assert_eq!(internet_checksum(&[0x01]), !0x0100u16);
    }

    #[test]
    fn test_fold_carries() {
        assert_eq!(fold_carries(0x1_FFFE), 0xFFFF);
        assert_eq!(fold_carries(0x2_0001), 0x0003);
    }

    #[test]
    fn test_checksum_empty() {
        assert_eq!(internet_checksum(&[]), 0xFFFF);
    }
}
