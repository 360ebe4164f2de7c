//! Fixed binary encodings: big-endian `u32` length prefixes, compressed
//! group elements, and a one-byte free/fixed flag per pattern slot.

use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr,
};
use ark_ff::One;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;

use super::{Ciphertext, MasterKey, Pattern, PrivateKey, PublicParams, Signature};
use crate::error::HibeError;

fn g1_size<E: Pairing>() -> usize {
    E::G1Affine::generator().compressed_size()
}

fn g2_size<E: Pairing>() -> usize {
    E::G2Affine::generator().compressed_size()
}

fn scalar_size<E: Pairing>() -> usize {
    E::ScalarField::one().compressed_size()
}

fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

fn write_elem<T: CanonicalSerialize>(buf: &mut Vec<u8>, elem: &T) -> Result<(), HibeError> {
    elem.serialize_compressed(&mut *buf)?;
    Ok(())
}

fn take<'a>(
    data: &'a [u8],
    offset: &mut usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], HibeError> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(HibeError::InvalidEncoding(what))?;
    let out = &data[*offset..end];
    *offset = end;
    Ok(out)
}

fn read_u32(data: &[u8], offset: &mut usize, what: &'static str) -> Result<u32, HibeError> {
    let bytes = take(data, offset, 4, what)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_elem<T: CanonicalDeserialize>(
    data: &[u8],
    offset: &mut usize,
    len: usize,
    what: &'static str,
) -> Result<T, HibeError> {
    Ok(T::deserialize_compressed(take(data, offset, len, what)?)?)
}

impl<E: Pairing> MasterKey<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf = Vec::with_capacity(g1_size::<E>());
        write_elem(&mut buf, &self.0)?;
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        Ok(Self(E::G1Affine::deserialize_compressed(data)?))
    }
}

impl<E: Pairing> PublicParams<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf =
            Vec::with_capacity(4 + 2 * g2_size::<E>() + (2 + self.max_depth) * g1_size::<E>());
        write_u32(&mut buf, self.max_depth as u32);
        write_elem(&mut buf, &self.g)?;
        write_elem(&mut buf, &self.g1)?;
        write_elem(&mut buf, &self.g2)?;
        write_elem(&mut buf, &self.g3)?;
        for h in &self.hs {
            write_elem(&mut buf, h)?;
        }
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        let mut offset = 0;
        let max_depth = read_u32(data, &mut offset, "public params depth")? as usize;

        let g = read_elem(data, &mut offset, g2_size::<E>(), "public params g")?;
        let g1 = read_elem(data, &mut offset, g2_size::<E>(), "public params g1")?;
        let g2 = read_elem(data, &mut offset, g1_size::<E>(), "public params g2")?;
        let g3 = read_elem(data, &mut offset, g1_size::<E>(), "public params g3")?;

        let mut hs = Vec::with_capacity(max_depth);
        for _ in 0..max_depth {
            hs.push(read_elem(data, &mut offset, g1_size::<E>(), "public params hs")?);
        }

        Ok(Self {
            max_depth,
            g,
            g1,
            g2,
            g3,
            hs,
        })
    }
}

fn write_pattern<E: Pairing>(buf: &mut Vec<u8>, pattern: &Pattern<E>) -> Result<(), HibeError> {
    write_u32(buf, pattern.slots.len() as u32);
    for slot in &pattern.slots {
        match slot {
            None => buf.push(0),
            Some(p) => {
                buf.push(1);
                write_elem(buf, p)?;
            }
        }
    }
    Ok(())
}

fn read_pattern<E: Pairing>(data: &[u8], offset: &mut usize) -> Result<Pattern<E>, HibeError> {
    let depth = read_u32(data, offset, "pattern depth")? as usize;
    let mut slots = Vec::with_capacity(depth);
    for _ in 0..depth {
        let flag = take(data, offset, 1, "pattern slot flag")?[0];
        slots.push(match flag {
            0 => None,
            1 => Some(read_elem(data, offset, scalar_size::<E>(), "pattern slot")?),
            _ => return Err(HibeError::InvalidEncoding("pattern slot flag")),
        });
    }
    Ok(Pattern { slots })
}

impl<E: Pairing> Pattern<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf = Vec::with_capacity(4 + self.slots.len() * (1 + scalar_size::<E>()));
        write_pattern(&mut buf, self)?;
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        read_pattern(data, &mut 0)
    }
}

impl<E: Pairing> PrivateKey<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf = Vec::new();
        write_elem(&mut buf, &self.k0)?;
        write_elem(&mut buf, &self.k1)?;
        write_u32(&mut buf, self.bs.len() as u32);
        for b in &self.bs {
            match b {
                None => buf.push(0),
                Some(b) => {
                    buf.push(1);
                    write_elem(&mut buf, b)?;
                }
            }
        }
        write_pattern(&mut buf, &self.pattern)?;
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        let mut offset = 0;
        let k0 = read_elem(data, &mut offset, g1_size::<E>(), "private key k0")?;
        let k1 = read_elem(data, &mut offset, g2_size::<E>(), "private key k1")?;

        let num_bs = read_u32(data, &mut offset, "private key bs length")? as usize;
        let mut bs = Vec::with_capacity(num_bs);
        for _ in 0..num_bs {
            let flag = take(data, &mut offset, 1, "private key bs flag")?[0];
            bs.push(match flag {
                0 => None,
                1 => Some(read_elem(data, &mut offset, g1_size::<E>(), "private key bs")?),
                _ => return Err(HibeError::InvalidEncoding("private key bs flag")),
            });
        }

        let pattern = read_pattern(data, &mut offset)?;
        Ok(Self {
            k0,
            k1,
            bs,
            pattern,
        })
    }
}

impl<E: Pairing> Ciphertext<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf = Vec::new();
        write_u32(&mut buf, self.x.compressed_size() as u32);
        write_elem(&mut buf, &self.x)?;
        write_elem(&mut buf, &self.y)?;
        write_elem(&mut buf, &self.z)?;
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        let mut offset = 0;
        let gt_len = read_u32(data, &mut offset, "ciphertext gt length")? as usize;
        let x: PairingOutput<E> = read_elem(data, &mut offset, gt_len, "ciphertext x")?;
        let y = read_elem(data, &mut offset, g2_size::<E>(), "ciphertext y")?;
        let z = read_elem(data, &mut offset, g1_size::<E>(), "ciphertext z")?;
        Ok(Self { x, y, z })
    }
}

impl<E: Pairing> Signature<E> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, HibeError> {
        let mut buf = Vec::with_capacity(g1_size::<E>() + g2_size::<E>());
        write_elem(&mut buf, &self.s0)?;
        write_elem(&mut buf, &self.s1)?;
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, HibeError> {
        let mut offset = 0;
        let s0 = read_elem(data, &mut offset, g1_size::<E>(), "signature s0")?;
        let s1 = read_elem(data, &mut offset, g2_size::<E>(), "signature s1")?;
        Ok(Self { s0, s1 })
    }
}
