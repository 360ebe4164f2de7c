//! Fixed record layouts: big-endian `u32` length prefixes followed by
//! compressed group elements and scalars. Decoders reject truncation,
//! length mismatches and trailing bytes.

use ark_ec::{pairing::Pairing, AffineRepr};
use ark_ff::One;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{vec::Vec};

use crate::{
    encryption::Ciphertext,
    error::ABKEError,
    keys::{PrivateKey, PublicKey},
    setup::MPK,
};

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

fn write_elem<T: CanonicalSerialize>(buf: &mut Vec<u8>, elem: &T) -> Result<(), ABKEError> {
    elem.serialize_compressed(&mut *buf)?;
    Ok(())
}

fn take<'a>(
    data: &'a [u8],
    offset: &mut usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], ABKEError> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or(ABKEError::InvalidEncoding(what))?;
    let out = &data[*offset..end];
    *offset = end;
    Ok(out)
}

fn read_u32(data: &[u8], offset: &mut usize, what: &'static str) -> Result<u32, ABKEError> {
    let bytes = take(data, offset, 4, what)?;
    Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_elem<T: CanonicalDeserialize>(
    data: &[u8],
    offset: &mut usize,
    len: usize,
    what: &'static str,
) -> Result<T, ABKEError> {
    Ok(T::deserialize_compressed(take(data, offset, len, what)?)?)
}

fn reject_trailing(data: &[u8], offset: usize, what: &'static str) -> Result<(), ABKEError> {
    if offset != data.len() {
        return Err(ABKEError::InvalidEncoding(what));
    }
    Ok(())
}

impl<E: Pairing> MPK<E> {
    /// `u32 numJ || G2(g) || G2(h) || G2(u) || G2(j_1..j_numJ)`
    pub fn to_bytes(&self) -> Result<Vec<u8>, ABKEError> {
        let mut buf = Vec::with_capacity(4 + (3 + self.js.len()) * g2_size::<E>());
        write_u32(&mut buf, self.js.len() as u32);
        write_elem(&mut buf, &self.g)?;
        write_elem(&mut buf, &self.h)?;
        write_elem(&mut buf, &self.u)?;
        for j in &self.js {
            write_elem(&mut buf, j)?;
        }
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ABKEError> {
        let mut offset = 0;
        let num_js = read_u32(data, &mut offset, "mpk numJ")? as usize;

        let g = read_elem(data, &mut offset, g2_size::<E>(), "mpk g")?;
        let h = read_elem(data, &mut offset, g2_size::<E>(), "mpk h")?;
        let u = read_elem(data, &mut offset, g2_size::<E>(), "mpk u")?;

        let mut js = Vec::with_capacity(num_js);
        for _ in 0..num_js {
            js.push(read_elem(data, &mut offset, g2_size::<E>(), "mpk j")?);
        }

        reject_trailing(data, offset, "mpk trailing bytes")?;
        Ok(Self { g, h, u, js })
    }
}

impl<E: Pairing> PublicKey<E> {
    /// `u32 |E| || u32 |ESig| || G1(g, gSig, h, hSig, u, uSig) || G1(E..) || G1(ESig..)`
    pub fn to_bytes(&self) -> Result<Vec<u8>, ABKEError> {
        let mut buf =
            Vec::with_capacity(8 + (6 + self.es.len() + self.e_sigs.len()) * g1_size::<E>());
        write_u32(&mut buf, self.es.len() as u32);
        write_u32(&mut buf, self.e_sigs.len() as u32);
        write_elem(&mut buf, &self.g)?;
        write_elem(&mut buf, &self.g_sig)?;
        write_elem(&mut buf, &self.h)?;
        write_elem(&mut buf, &self.h_sig)?;
        write_elem(&mut buf, &self.u)?;
        write_elem(&mut buf, &self.u_sig)?;
        for e in &self.es {
            write_elem(&mut buf, e)?;
        }
        for s in &self.e_sigs {
            write_elem(&mut buf, s)?;
        }
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ABKEError> {
        let mut offset = 0;
        let num_es = read_u32(data, &mut offset, "public key |E|")? as usize;
        let num_sigs = read_u32(data, &mut offset, "public key |ESig|")? as usize;
        if num_es != num_sigs {
            return Err(ABKEError::InvalidEncoding("public key length mismatch"));
        }

        let g = read_elem(data, &mut offset, g1_size::<E>(), "public key g")?;
        let g_sig = read_elem(data, &mut offset, g1_size::<E>(), "public key gSig")?;
        let h = read_elem(data, &mut offset, g1_size::<E>(), "public key h")?;
        let h_sig = read_elem(data, &mut offset, g1_size::<E>(), "public key hSig")?;
        let u = read_elem(data, &mut offset, g1_size::<E>(), "public key u")?;
        let u_sig = read_elem(data, &mut offset, g1_size::<E>(), "public key uSig")?;

        let mut es = Vec::with_capacity(num_es);
        for _ in 0..num_es {
            es.push(read_elem(data, &mut offset, g1_size::<E>(), "public key E")?);
        }
        let mut e_sigs = Vec::with_capacity(num_sigs);
        for _ in 0..num_sigs {
            e_sigs.push(read_elem(data, &mut offset, g1_size::<E>(), "public key ESig")?);
        }

        reject_trailing(data, offset, "public key trailing bytes")?;
        Ok(Self {
            g,
            h,
            u,
            g_sig,
            h_sig,
            u_sig,
            es,
            e_sigs,
        })
    }
}

impl<E: Pairing> PrivateKey<E> {
    /// `u32 numR || scalar(r_1..r_numR) || numR bytes of 0/1 attributes`
    pub fn to_bytes(&self) -> Result<Vec<u8>, ABKEError> {
        let mut buf =
            Vec::with_capacity(4 + self.rs.len() * scalar_size::<E>() + self.attrs.len());
        write_u32(&mut buf, self.rs.len() as u32);
        for r in &self.rs {
            write_elem(&mut buf, r)?;
        }
        for &a in &self.attrs {
            buf.push(u8::from(a));
        }
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ABKEError> {
        let mut offset = 0;
        let num_rs = read_u32(data, &mut offset, "private key numR")? as usize;

        let mut rs = Vec::with_capacity(num_rs);
        for _ in 0..num_rs {
            rs.push(read_elem(data, &mut offset, scalar_size::<E>(), "private key r")?);
        }

        let attr_bytes = take(data, &mut offset, num_rs, "private key attributes")?;
        let mut attrs = Vec::with_capacity(num_rs);
        for &b in attr_bytes {
            attrs.push(match b {
                0 => false,
                1 => true,
                _ => return Err(ABKEError::InvalidEncoding("private key attribute byte")),
            });
        }

        reject_trailing(data, offset, "private key trailing bytes")?;
        Ok(Self { rs, attrs })
    }
}

impl<E: Pairing> Ciphertext<E> {
    /// `u32 |C2| || G1(g) || G1(h) || G1(C2_1..)`. Every slot must be
    /// populated; attribute-selective ciphertexts do not serialize.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ABKEError> {
        let mut buf = Vec::with_capacity(4 + (2 + self.c2s.len()) * g1_size::<E>());
        write_u32(&mut buf, self.c2s.len() as u32);
        write_elem(&mut buf, &self.g)?;
        write_elem(&mut buf, &self.h)?;
        for (i, c2) in self.c2s.iter().enumerate() {
            let c2 = c2.as_ref().ok_or(ABKEError::IncompleteCiphertext(i))?;
            write_elem(&mut buf, c2)?;
        }
        Ok(buf)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ABKEError> {
        let mut offset = 0;
        let num_c2s = read_u32(data, &mut offset, "ciphertext |C2|")? as usize;

        let g = read_elem(data, &mut offset, g1_size::<E>(), "ciphertext g")?;
        let h = read_elem(data, &mut offset, g1_size::<E>(), "ciphertext h")?;

        let mut c2s = Vec::with_capacity(num_c2s);
        for _ in 0..num_c2s {
            c2s.push(Some(read_elem(data, &mut offset, g1_size::<E>(), "ciphertext c2")?));
        }

        reject_trailing(data, offset, "ciphertext trailing bytes")?;
        Ok(Self { g, h, c2s })
    }
}
