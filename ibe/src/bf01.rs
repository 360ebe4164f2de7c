//! Identity-based encryption according to the paper: "Identity-Based
//! Encryption from the Weil Pairing" <https://eprint.iacr.org/2001/090>
//!
//! The basic (CPA) variant: the mask is an HKDF-SHA-256 expansion of
//! `e(H1(id), mpk)^r`, XORed over the message.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use blake2::Blake2b512;
use crypto_utils::{
    hashing::{affine_group_elem_from_try_and_incr, gt_kdf},
    serde_utils::ArkObjectBytes,
    xor_in_place,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::error::IBEError;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    /// `msk * g2`
    #[serde_as(as = "ArkObjectBytes")]
    pub mpk: E::G2Affine,
}

/// The key-generation authority: master secret plus the public params.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PrivateKeyGenerator<E: Pairing> {
    pub pp: PublicParams<E>,
    #[serde_as(as = "ArkObjectBytes")]
    msk: E::ScalarField,
}

#[serde_as]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
)]
pub struct PrivateKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

fn hash_id_to_g1<E: Pairing>(id: &[u8]) -> E::G1Affine {
    affine_group_elem_from_try_and_incr::<E::G1Affine, Blake2b512>(id)
}

impl<E: Pairing> PrivateKeyGenerator<E> {
    pub fn new<R: RngCore>(rng: &mut R) -> (Self, PublicParams<E>) {
        let msk = E::ScalarField::rand(rng);
        let pp = PublicParams {
            mpk: (E::G2Affine::generator() * msk).into_affine(),
        };
        (
            Self {
                pp: pp.clone(),
                msk,
            },
            pp,
        )
    }

    /// Extract the private key `msk * H1(id)` for an identity.
    pub fn extract(&self, id: &[u8]) -> PrivateKey<E> {
        PrivateKey((hash_id_to_g1::<E>(id) * self.msk).into_affine())
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<E: Pairing> {
    /// `r * g2`
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G2Affine,
    /// `msg XOR mask`
    pub v: Vec<u8>,
}

pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    id: &[u8],
    msg: &[u8],
) -> Result<Ciphertext<E>, IBEError> {
    let r = E::ScalarField::rand(rng);
    let u = (E::G2Affine::generator() * r).into_affine();

    let shared = E::pairing(hash_id_to_g1::<E>(id), pp.mpk) * r;
    let mut v = gt_kdf(&shared, msg.len())?;
    xor_in_place(&mut v, msg);

    Ok(Ciphertext { u, v })
}

pub fn decrypt<E: Pairing>(sk: &PrivateKey<E>, ct: &Ciphertext<E>) -> Result<Vec<u8>, IBEError> {
    let shared = E::pairing(sk.0, ct.u);
    let mut msg = gt_kdf(&shared, ct.v.len())?;
    xor_in_place(&mut msg, &ct.v);
    Ok(msg)
}
