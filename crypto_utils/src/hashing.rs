//! Hashing into fields and groups, and derivation of byte strings from
//! target-group elements.

use ark_ec::{pairing::{Pairing, PairingOutput}, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use ark_std::vec::Vec;
use digest::Digest;
use hkdf::Hkdf;
use sha2::Sha256;

use crate::concat_slices;

/// The requested mask length exceeds what HKDF-SHA-256 can expand to
/// (255 hash blocks).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskTooLong;

/// Hash bytes to a group element, returned in projective coordinates.
/// Try-and-increment, so timing leaks the number of attempts; only use on
/// public inputs such as identities, setup labels and verification keys.
pub fn projective_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G::Group {
    let mut hash = D::digest(bytes);
    let mut g = G::from_random_bytes(&hash);
    let mut j = 1u64;
    while g.is_none() {
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        g = G::from_random_bytes(&hash);
        j += 1;
    }
    g.unwrap().mul_by_cofactor_to_group()
}

/// Hash bytes to a group element in affine coordinates.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    projective_group_elem_from_try_and_incr::<G, D>(bytes).into_affine()
}

/// Hash bytes to a field element. Same caveat as the group variants.
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut f = F::from_random_bytes(&hash);
    let mut j = 1u64;
    while f.is_none() {
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        f = F::from_random_bytes(&hash);
        j += 1;
    }
    f.unwrap()
}

/// SHA-256 of the compressed serialization of a target-group element.
pub fn hash_gt_to_bytes<E: Pairing>(elem: &PairingOutput<E>) -> [u8; 32] {
    let mut bytes = Vec::new();
    elem.serialize_compressed(&mut bytes)
        .expect("serialization to a Vec cannot fail");
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(&bytes));
    out
}

/// Derive `out_len` mask bytes from a target-group element with
/// HKDF-SHA-256 (no salt, empty info), keyed by the element's compressed
/// serialization.
pub fn gt_kdf<E: Pairing>(elem: &PairingOutput<E>, out_len: usize) -> Result<Vec<u8>, MaskTooLong> {
    let mut ikm = Vec::new();
    elem.serialize_compressed(&mut ikm)
        .expect("serialization to a Vec cannot fail");
    let hk = Hkdf::<Sha256>::new(None, &ikm);
    let mut out = ark_std::vec![0u8; out_len];
    hk.expand(&[], &mut out).map_err(|_| MaskTooLong)?;
    Ok(out)
}
