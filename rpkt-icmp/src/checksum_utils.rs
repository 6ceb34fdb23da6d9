//! Provide utilitiy functions for calculating ICMP checksums.

use byteorder::{ByteOrder, NetworkEndian};

/// Compute the RFC 1071 one's-complement sum of `data` (without the final
/// complement).
///
/// Bytes are summed as big-endian 16-bit words, a trailing odd byte is
/// padded with a zero byte on its right.
///
/// The chunked summing loop is taken from smoltcp.
pub fn from_slice(mut data: &[u8]) -> u16 {
    let mut accum: u64 = 0;

    // For each 32-byte chunk...
    const CHUNK_SIZE: usize = 32;
    while data.len() >= CHUNK_SIZE {
        let mut d = &data[..CHUNK_SIZE];
        // ... take by 2 bytes and sum them.
        while d.len() >= 2 {
            accum += NetworkEndian::read_u16(d) as u64;
            d = &d[2..];
        }

        data = &data[CHUNK_SIZE..];
    }

    while data.len() >= 2 {
        accum += NetworkEndian::read_u16(data) as u64;
        data = &data[2..];
    }

    if let Some(&value) = data.first() {
        accum += (value as u64) << 8;
    }

    fold_carries(accum)
}

/// Compute the value stored in an ICMP checksum field: the complement of
/// the one's-complement sum over `data`.
///
/// The checksum field inside `data` must be zeroed beforehand.
#[inline]
pub fn icmp_checksum(data: &[u8]) -> u16 {
    !from_slice(data)
}

/// Check that `data`, checksum field included, sums to `0xffff`.
#[inline]
pub fn verify(data: &[u8]) -> bool {
    from_slice(data) == 0xffff
}

// Add the high 16 bits back into the low 16 bits until no carry remains.
fn fold_carries(mut word: u64) -> u16 {
    while word >> 16 != 0 {
        word = (word & 0xffff) + (word >> 16);
    }
    word as u16
}
