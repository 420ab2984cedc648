//! Bit-packed Ising configurations.
//!
//! Spin `i` lives in bit `i % 8` (least significant first) of byte `i / 8`;
//! a set bit means -1, a clear bit +1. Trailing bits of the last byte are 0.

use crate::error::{Error, Result};

pub fn packed_len(n: usize) -> usize {
    (n + 7) / 8
}

pub fn pack_spins(spins: &[f64]) -> Vec<u8> {
    let mut buf = vec![0u8; packed_len(spins.len())];
    for (i, &s) in spins.iter().enumerate() {
        if s < 0.0 {
            buf[i / 8] |= 1 << (i % 8);
        }
    }
    buf
}

pub fn unpack_spins(buf: &[u8], n: usize) -> Result<Vec<f64>> {
    let expected = packed_len(n);
    if buf.len() < expected {
        return Err(Error::FieldLength { expected, found: buf.len() });
    }
    Ok((0..n)
        .map(|i| if buf[i / 8] & (1 << (i % 8)) != 0 { -1.0 } else { 1.0 })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_order_is_lsb_first() {
        let spins = [-1.0, 1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, -1.0];
        let buf = pack_spins(&spins);
        assert_eq!(buf, vec![0b0000_1001, 0b0000_0010]);
        assert_eq!(unpack_spins(&buf, spins.len()).unwrap(), spins.to_vec());
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(matches!(
            unpack_spins(&[0u8], 9),
            Err(Error::FieldLength { expected: 2, found: 1 })
        ));
    }
}
