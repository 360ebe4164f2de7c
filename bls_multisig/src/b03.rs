//! Multisignature according to the paper: "Threshold Signatures,
//! Multisignatures and Blind Signatures Based on the
//! Gap-Diffie-Hellman-Group Signature Scheme"
//! <https://eprint.iacr.org/2002/118>
//!
//! All signers sign the same message; the aggregate is the sum of the
//! individual signatures and verifies against the sum of the public keys.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::{
    error::MultisigError,
    setup::{hash_message, PublicKey, PublicParams, SecretKey},
};

/// A running aggregate, starting from the identity.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

impl<E: Pairing> Signature<E> {
    pub fn new() -> Self {
        Self(E::G1Affine::zero())
    }
}

impl<E: Pairing> Default for Signature<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// One signer's contribution: `sk * H(m)`.
pub fn sign_single<E: Pairing>(sk: &SecretKey<E>, msg: &[u8]) -> Signature<E> {
    Signature((hash_message::<E>(msg) * sk.0).into_affine())
}

/// Sum a batch of contributions.
pub fn aggregate<E: Pairing>(sigs: &[Signature<E>]) -> Signature<E> {
    let mut agg = E::G1::zero();
    for sig in sigs {
        agg += sig.0;
    }
    Signature(agg.into_affine())
}

/// Add this signer's contribution to the caller-owned running aggregate.
pub fn sign<E: Pairing>(sk: &SecretKey<E>, msg: &[u8], agg: &mut Signature<E>) {
    let own = sign_single(sk, msg);
    agg.0 = (agg.0.into_group() + own.0).into_affine();
}

/// `e(agg, g2) = e(H(m), sum of pks)`.
pub fn verify<E: Pairing>(
    pp: &PublicParams<E>,
    pks: &[PublicKey<E>],
    msg: &[u8],
    sig: &Signature<E>,
) -> Result<(), MultisigError> {
    let mut agg_pk = E::G2::zero();
    for pk in pks {
        agg_pk += pk.0;
    }

    let h = hash_message::<E>(msg);
    let neg_h = (-h.into_group()).into_affine();
    if !E::multi_pairing([sig.0, neg_h], [pp.g2.into_group(), agg_pk]).is_zero() {
        return Err(MultisigError::InvalidSignature);
    }
    Ok(())
}
