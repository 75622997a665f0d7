//! # Checksums
//!
//! CRC32 (IEEE 802.3, reversed polynomial) over a compile-time lookup table.
//! This is the integrity check stamped into current save files. A legacy
//! 4-byte-block XOR checksum is kept for comparison with old tooling; no
//! current writer uses it.

/// CRC32 polynomial (IEEE 802.3), reversed bit order.
const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;

/// Precomputed byte-at-a-time CRC32 table.
const CRC32_TABLE: [u32; 256] = build_crc32_table();

const fn build_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Computes the CRC32 checksum of a byte slice.
///
/// Initial value `0xFFFF_FFFF`, final XOR `0xFFFF_FFFF`, table-driven byte at
/// a time.
#[must_use]
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &byte in data {
        crc = (crc >> 8) ^ CRC32_TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize];
    }
    !crc
}

/// Legacy 4-byte-block XOR checksum.
///
/// Bytes are folded big-endian into 32-bit words; a trailing partial word is
/// packed into the high bits. Retained only for comparison against old files.
#[must_use]
pub fn xor_checksum(data: &[u8]) -> u32 {
    let mut checksum = 0u32;
    let mut chunks = data.chunks_exact(4);
    for word in &mut chunks {
        checksum ^= u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut word = 0u32;
        for (i, &byte) in rest.iter().enumerate() {
            word |= u32::from(byte) << (24 - 8 * i);
        }
        checksum ^= word;
    }
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        // Standard CRC-32/ISO-HDLC check vector.
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_crc32_empty() {
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn test_crc32_detects_single_bit_flip() {
        let mut data = vec![0u8; 128];
        data[64] = 0x5A;
        let before = crc32(&data);
        data[64] ^= 0x01;
        assert_ne!(before, crc32(&data));
    }

    #[test]
    fn test_xor_checksum_partial_block() {
        // 5 bytes: one full word plus one byte packed into the high bits.
        let data = [0x01, 0x02, 0x03, 0x04, 0xFF];
        let expected = 0x0102_0304u32 ^ 0xFF00_0000u32;
        assert_eq!(xor_checksum(&data), expected);
    }

    #[test]
    fn test_xor_checksum_self_cancel() {
        let data = [0xAB, 0xCD, 0xEF, 0x12, 0xAB, 0xCD, 0xEF, 0x12];
        assert_eq!(xor_checksum(&data), 0);
    }
}
