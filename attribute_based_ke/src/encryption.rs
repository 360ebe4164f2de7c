//! Attribute-selective encryption of `2m` plaintext slots, and the hash
//! binding recovered slots to 128-bit wire-label keys.

use ark_ec::{pairing::Pairing, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Neg, rand::RngCore, vec::Vec, UniformRand};
use crypto_utils::{concat_slices, serde_utils::ArkObjectBytes, Block128};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::{Digest, Sha256};

use crate::{
    error::ABKEError,
    keys::{PrivateKey, PublicKey},
    setup::PublicParams,
};

/// Ciphertext with one slot pair per attribute. Slots left unpopulated by
/// attribute-selective encryption are `None`; such ciphertexts cannot be
/// decrypted or serialized, only carried by a protocol layer that knows
/// which half it filled.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<E: Pairing> {
    /// `s * pk.g`
    #[serde_as(as = "ArkObjectBytes")]
    pub g: E::G1Affine,
    /// `t * pk.h`
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    /// Slot `2i` masks under `s * E_i`, slot `2i+1` under `t * E_i`
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub c2s: Vec<Option<E::G1Affine>>,
}

/// Encrypt `2m` plaintext slots. With `attrs = None` every slot is
/// populated; with an attribute vector only the slot matching each
/// attribute's value is, leaving the complementary slot `None`.
pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams,
    pk: &PublicKey<E>,
    attrs: Option<&[bool]>,
    plaintext: &[E::G1Affine],
) -> Result<Ciphertext<E>, ABKEError> {
    if plaintext.len() != 2 * pp.num_attrs {
        return Err(ABKEError::PlaintextLengthMismatch(
            2 * pp.num_attrs,
            plaintext.len(),
        ));
    }
    if let Some(attrs) = attrs {
        assert_eq!(attrs.len(), pp.num_attrs);
    }

    let s = E::ScalarField::rand(rng);
    let t = E::ScalarField::rand(rng);

    let mut c2s = ark_std::vec![None; 2 * pp.num_attrs];
    for i in 0..pp.num_attrs {
        if attrs.map_or(true, |a| !a[i]) {
            let idx = 2 * i;
            c2s[idx] = Some((pk.es[i] * s + plaintext[idx]).into_affine());
        }
        if attrs.map_or(true, |a| a[i]) {
            let idx = 2 * i + 1;
            c2s[idx] = Some((pk.es[i] * t + plaintext[idx]).into_affine());
        }
    }

    Ok(Ciphertext {
        g: (pk.g * s).into_affine(),
        h: (pk.h * t).into_affine(),
        c2s,
    })
}

/// Recover the `m` plaintext slots addressed by the private key's
/// attribute vector: slot `2i + a_i` for each attribute `i`.
pub fn decrypt<E: Pairing>(
    pp: &PublicParams,
    sk: &PrivateKey<E>,
    ct: &Ciphertext<E>,
) -> Result<Vec<E::G1Affine>, ABKEError> {
    if ct.c2s.len() != 2 * pp.num_attrs {
        return Err(ABKEError::AttributeCountMismatch(
            2 * pp.num_attrs,
            ct.c2s.len(),
        ));
    }
    assert_eq!(sk.attrs.len(), pp.num_attrs);

    let mut pt = Vec::with_capacity(pp.num_attrs);
    for (i, &held) in sk.attrs.iter().enumerate() {
        let idx = 2 * i + usize::from(held);
        let slot = ct.c2s[idx].ok_or(ABKEError::IncompleteCiphertext(idx))?;
        let base = if held { ct.h } else { ct.g };
        pt.push(((base * sk.rs[i]).neg() + slot).into_affine());
    }
    Ok(pt)
}

/// Hash a recovered G1 element together with its slot index and a bit
/// into a 128-bit AES key; higher-level protocols use it to tie circuit
/// wire labels to attribute slots.
pub fn hash_to_key<E: Pairing>(g: &E::G1Affine, idx: u32, bit: bool) -> Block128 {
    let mut point = Vec::new();
    g.serialize_compressed(&mut point)
        .expect("serialization to a Vec cannot fail");
    let digest = Sha256::digest(&concat_slices!(
        idx.to_be_bytes(),
        [u8::from(bit)],
        point
    ));
    let mut first_half = [0u8; 16];
    first_half.copy_from_slice(&digest[..16]);
    Block128::from_bytes(&first_half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::CertificateAuthority;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    fn random_plaintext<R: RngCore>(rng: &mut R, n: usize) -> Vec<<E as Pairing>::G1Affine> {
        (0..n)
            .map(|_| <E as Pairing>::G1::rand(rng).into_affine())
            .collect()
    }

    #[test]
    fn decrypt_selects_attribute_slots() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::new(4);
        let ca = CertificateAuthority::<E>::new(&mut rng, pp);

        let attrs = [true, false, false, true];
        let (pk, sk) = ca.gen_cert(&mut rng, &attrs);

        let pt = random_plaintext(&mut rng, 8);
        let ct = encrypt(&mut rng, &pp, &pk, None, &pt).unwrap();

        let out = decrypt(&pp, &sk, &ct).unwrap();
        assert_eq!(out, ark_std::vec![pt[1], pt[2], pt[4], pt[7]]);
    }

    #[test]
    fn selective_encryption_populates_matching_half() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::new(3);
        let ca = CertificateAuthority::<E>::new(&mut rng, pp);

        let attrs = [false, true, false];
        let (pk, sk) = ca.gen_cert(&mut rng, &attrs);

        let pt = random_plaintext(&mut rng, 6);
        let ct = encrypt(&mut rng, &pp, &pk, Some(&attrs), &pt).unwrap();

        for i in 0..3 {
            assert_eq!(ct.c2s[2 * i].is_some(), !attrs[i]);
            assert_eq!(ct.c2s[2 * i + 1].is_some(), attrs[i]);
        }

        // the populated halves are exactly what decryption needs
        let out = decrypt(&pp, &sk, &ct).unwrap();
        assert_eq!(out, ark_std::vec![pt[0], pt[3], pt[4]]);
    }

    #[test]
    fn incomplete_ciphertext_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::new(2);
        let ca = CertificateAuthority::<E>::new(&mut rng, pp);

        let (pk, sk) = ca.gen_cert(&mut rng, &[true, false]);
        let pt = random_plaintext(&mut rng, 4);

        // encrypt towards the complementary attribute vector, so the
        // slots the key needs are missing
        let ct = encrypt(&mut rng, &pp, &pk, Some(&[false, true]), &pt).unwrap();
        assert!(matches!(
            decrypt(&pp, &sk, &ct),
            Err(ABKEError::IncompleteCiphertext(_))
        ));
    }

    #[test]
    fn wrong_plaintext_length_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let pp = PublicParams::new(2);
        let ca = CertificateAuthority::<E>::new(&mut rng, pp);
        let (pk, _) = ca.gen_cert(&mut rng, &[true, false]);

        let pt = random_plaintext(&mut rng, 3);
        assert!(matches!(
            encrypt(&mut rng, &pp, &pk, None, &pt),
            Err(ABKEError::PlaintextLengthMismatch(4, 3))
        ));
    }

    #[test]
    fn hash_to_key_separates_inputs() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let g = <E as Pairing>::G1::rand(&mut rng).into_affine();

        let k = hash_to_key::<E>(&g, 0, false);
        assert_eq!(k, hash_to_key::<E>(&g, 0, false));
        assert_ne!(k, hash_to_key::<E>(&g, 0, true));
        assert_ne!(k, hash_to_key::<E>(&g, 1, false));

        let other = <E as Pairing>::G1::rand(&mut rng).into_affine();
        assert_ne!(k, hash_to_key::<E>(&other, 0, false));
    }
}
