//! CRC-32 lookup table and Ethernet frame check sequence
//!
//! The table is the MSB-first form of the IEEE 802.3 polynomial, the layout
//! hardware CRC engines index by the top byte of the running register.
//! [`render_lut_bits`] prints it as one 32-character binary word per line,
//! suitable for initialising a ROM.

use std::fmt::Write;
use std::sync::OnceLock;

/// CRC-32 generator polynomial used by Ethernet
///
/// x^32 + x^26 + x^23 + x^22 + x^16 + x^12 + x^11 + x^10 + x^8 + x^7 + x^5 + x^4 + x^2 + x + 1
pub const CRC32_POLY: u32 = 0x04C1_1DB7;

/// Compute the 256-entry MSB-first CRC-32 lookup table
pub fn crc32_lut() -> [u32; 256] {
    let mut table = [0u32; 256];

    for (byte, entry) in table.iter_mut().enumerate() {
        let mut crc = (byte as u32) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ CRC32_POLY
            } else {
                crc << 1
            };
        }
        *entry = crc;
    }

    table
}

/// Render a table as 32-bit binary words, most significant bit first, one per line
pub fn render_lut_bits(table: &[u32]) -> String {
    let mut out = String::with_capacity(table.len() * 33);
    for value in table {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{:032b}", value);
    }
    out
}

fn table() -> &'static [u32; 256] {
    static TABLE: OnceLock<[u32; 256]> = OnceLock::new();
    TABLE.get_or_init(crc32_lut)
}

/// IEEE 802.3 frame check sequence of `data`
///
/// Ethernet sends bits least significant first, so the MSB-first table is
/// driven with bit-reversed input bytes and the final register is reflected
/// back before the output inversion. The value is transmitted little-endian.
pub fn ethernet_fcs(data: &[u8]) -> u32 {
    let table = table();
    let mut crc = 0xFFFF_FFFFu32;

    for &byte in data {
        let index = ((crc >> 24) as u8) ^ byte.reverse_bits();
        crc = (crc << 8) ^ table[index as usize];
    }

    crc.reverse_bits() ^ 0xFFFF_FFFF
}
