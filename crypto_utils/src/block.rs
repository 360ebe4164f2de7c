//! A 128-bit value stored as two 64-bit lanes. Used for garbled-circuit
//! wire labels, AES blocks and derived symmetric keys.

use ark_std::rand::RngCore;
use byteorder::{ByteOrder, LittleEndian};
use core::ops::{BitXor, BitXorAssign};
use serde::{Deserialize, Serialize};

/// 128-bit opaque block. The byte representation is little-endian with the
/// low lane first, matching the wire format of the garbled-circuit engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block128 {
    pub hi: u64,
    pub lo: u64,
}

impl Block128 {
    pub const BYTES: usize = 16;

    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    pub const fn zero() -> Self {
        Self { hi: 0, lo: 0 }
    }

    pub fn random<R: RngCore>(rng: &mut R) -> Self {
        let mut bytes = [0u8; Self::BYTES];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8; Self::BYTES]) -> Self {
        Self {
            lo: LittleEndian::read_u64(&bytes[..8]),
            hi: LittleEndian::read_u64(&bytes[8..]),
        }
    }

    pub fn to_bytes(self) -> [u8; Self::BYTES] {
        let mut bytes = [0u8; Self::BYTES];
        LittleEndian::write_u64(&mut bytes[..8], self.lo);
        LittleEndian::write_u64(&mut bytes[8..], self.hi);
        bytes
    }

    /// The low bit, used as a permutation bit by the garbling schemes.
    pub const fn lsb(self) -> u8 {
        (self.lo & 1) as u8
    }

    pub const fn with_lsb_set(self) -> Self {
        Self {
            hi: self.hi,
            lo: self.lo | 1,
        }
    }

    pub const fn with_lsb_cleared(self) -> Self {
        Self {
            hi: self.hi,
            lo: self.lo & !1,
        }
    }
}

impl BitXor for Block128 {
    type Output = Block128;

    fn bitxor(self, rhs: Self) -> Self {
        Self {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }
}

impl BitXorAssign for Block128 {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.hi ^= rhs.hi;
        self.lo ^= rhs.lo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn byte_round_trip() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for _ in 0..20 {
            let b = Block128::random(&mut rng);
            assert_eq!(b, Block128::from_bytes(&b.to_bytes()));
        }
        // low lane occupies the first 8 bytes
        let b = Block128::new(0, 1);
        assert_eq!(b.to_bytes()[0], 1);
        assert_eq!(b.lsb(), 1);
    }

    #[test]
    fn lsb_manipulation() {
        let b = Block128::new(7, 6);
        assert_eq!(b.lsb(), 0);
        assert_eq!(b.with_lsb_set().lsb(), 1);
        assert_eq!(b.with_lsb_set().with_lsb_cleared(), b);
    }

    #[test]
    fn xor() {
        let a = Block128::new(0xff00, 0x0f0f);
        let b = Block128::new(0x00ff, 0x0ff0);
        assert_eq!(a ^ b, Block128::new(0xffff, 0x00ff));
        assert_eq!(a ^ b ^ b, a);
        let mut c = a;
        c ^= b;
        assert_eq!(c, a ^ b);
    }
}
