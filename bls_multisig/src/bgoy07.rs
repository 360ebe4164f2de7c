//! Ordered multisignature according to the paper: "Ordered
//! Multisignatures and Identity-Based Sequential Aggregate Signatures,
//! with Applications to Secure Routing" <https://eprint.iacr.org/2007/438>
//!
//! Signers contribute in sequence; the aggregate commits to the exact
//! signing order through per-position exponents. A signer receiving a
//! non-identity aggregate first re-verifies it against the previous
//! signers' public keys, which blocks concatenation attacks where a
//! malicious relay splices a foreign prefix onto the chain.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{collections::BTreeSet, rand::RngCore, vec::Vec, UniformRand};
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::{
    error::MultisigError,
    setup::{hash_message, PublicParams},
};

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
pub struct SecretKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub t: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::ScalarField,
}

impl<E: Pairing> Zeroize for SecretKey<E> {
    fn zeroize(&mut self) {
        self.s.zeroize();
        self.t.zeroize();
        self.u.zeroize();
    }
}

impl<E: Pairing> Drop for SecretKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub t: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
}

pub fn keygen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
) -> (PublicKey<E>, SecretKey<E>) {
    let s = E::ScalarField::rand(rng);
    let t = E::ScalarField::rand(rng);
    let u = E::ScalarField::rand(rng);
    (
        PublicKey {
            s: (pp.g2 * s).into_affine(),
            t: (pp.g1 * t).into_affine(),
            u: (pp.g1 * u).into_affine(),
        },
        SecretKey { s, t, u },
    )
}

/// Four-accumulator aggregate `(Q, X, Y, R)`, starting from the identity.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub q: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub y: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub r: E::G2Affine,
}

impl<E: Pairing> Signature<E> {
    pub fn new() -> Self {
        Self {
            q: E::G1Affine::zero(),
            x: E::G2Affine::zero(),
            y: E::G1Affine::zero(),
            r: E::G2Affine::zero(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.q.is_zero() && self.x.is_zero() && self.y.is_zero() && self.r.is_zero()
    }
}

impl<E: Pairing> Default for Signature<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// `sum of T_j + j*U_j` over the 1-based positions of `pks`.
fn position_weighted_keys<E: Pairing>(pks: &[PublicKey<E>]) -> E::G1 {
    let mut agg = E::G1::zero();
    for (j, pk) in pks.iter().enumerate() {
        let pos = E::ScalarField::from((j + 1) as u64);
        agg += pk.t;
        agg += pk.u * pos;
    }
    agg
}

/// Contribute to the running aggregate as the signer at position
/// `previous_pks.len() + 1`. A non-identity aggregate is first verified
/// against the previous signers; on failure the aggregate is left
/// untouched and no contribution is produced.
pub fn sign<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    sk: &SecretKey<E>,
    msg: &[u8],
    agg: &mut Signature<E>,
    previous_pks: &[PublicKey<E>],
) -> Result<(), MultisigError> {
    if !agg.is_identity() {
        verify(pp, previous_pks, msg, agg)?;
    }

    let r = E::ScalarField::rand(rng);

    // R' = R + r*g2
    let new_r = (pp.g2 * r + agg.r).into_affine();

    // X' = X + (t + i*u) * R'
    let position = E::ScalarField::from((previous_pks.len() + 1) as u64);
    let exp = sk.t + position * sk.u;
    let new_x = (new_r * exp + agg.x).into_affine();

    // Y' = Y + r * sum of (T_j + j*U_j) over previous signers
    let new_y = (position_weighted_keys(previous_pks) * r + agg.y).into_affine();

    // Q' = Q + s * H(m)
    let new_q = (hash_message::<E>(msg) * sk.s + agg.q).into_affine();

    agg.q = new_q;
    agg.x = new_x;
    agg.y = new_y;
    agg.r = new_r;
    Ok(())
}

/// Check the ordered aggregate against the public keys in signing order:
/// `e(Q, g2) * e(g1, X) * e(Y, g2) = e(H(m), sum S_j) * e(sum T_j + j*U_j, R)`.
/// Duplicate public keys are rejected first.
pub fn verify<E: Pairing>(
    pp: &PublicParams<E>,
    pks: &[PublicKey<E>],
    msg: &[u8],
    sig: &Signature<E>,
) -> Result<(), MultisigError> {
    let mut seen = BTreeSet::new();
    for pk in pks {
        let mut bytes = Vec::new();
        pk.serialize_compressed(&mut bytes)?;
        if !seen.insert(bytes) {
            return Err(MultisigError::PublicKeysNotDistinct);
        }
    }

    let mut agg_s = E::G2::zero();
    for pk in pks {
        agg_s += pk.s;
    }
    let agg_tu = position_weighted_keys(pks);

    let h = hash_message::<E>(msg);
    let lhs_minus_rhs = E::multi_pairing(
        [
            sig.q.into_group(),
            pp.g1.into_group(),
            sig.y.into_group(),
            -h.into_group(),
            -agg_tu,
        ],
        [
            pp.g2.into_group(),
            sig.x.into_group(),
            pp.g2.into_group(),
            agg_s,
            sig.r.into_group(),
        ],
    );
    if !lhs_minus_rhs.is_zero() {
        return Err(MultisigError::InvalidSignature);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    fn signer_chain(
        rng: &mut StdRng,
        pp: &PublicParams<E>,
        n: usize,
    ) -> Vec<(PublicKey<E>, SecretKey<E>)> {
        (0..n).map(|_| keygen(rng, pp)).collect()
    }

    #[test]
    fn ordered_signing_verifies() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::<E>::new();
        let msg = b"route announcement";

        for n in 1..=4 {
            let keys = signer_chain(&mut rng, &pp, n);
            let mut agg = Signature::new();
            for (i, (_, sk)) in keys.iter().enumerate() {
                let previous: Vec<_> = keys[..i].iter().map(|(pk, _)| pk.clone()).collect();
                sign(&mut rng, &pp, sk, msg, &mut agg, &previous).unwrap();
            }

            let pks: Vec<_> = keys.iter().map(|(pk, _)| pk.clone()).collect();
            assert!(verify(&pp, &pks, msg, &agg).is_ok());
        }
    }

    #[test]
    fn order_is_binding() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::<E>::new();
        let msg = b"hop order matters";

        let keys = signer_chain(&mut rng, &pp, 3);
        let mut agg = Signature::new();
        for (i, (_, sk)) in keys.iter().enumerate() {
            let previous: Vec<_> = keys[..i].iter().map(|(pk, _)| pk.clone()).collect();
            sign(&mut rng, &pp, sk, msg, &mut agg, &previous).unwrap();
        }

        // swap the claimed order of the first two signers
        let mut pks: Vec<_> = keys.iter().map(|(pk, _)| pk.clone()).collect();
        pks.swap(0, 1);
        assert!(matches!(
            verify(&pp, &pks, msg, &agg),
            Err(MultisigError::InvalidSignature)
        ));
    }

    #[test]
    fn corrupt_incoming_aggregate_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::<E>::new();
        let msg = b"prefix splice";

        let keys = signer_chain(&mut rng, &pp, 2);
        let mut agg = Signature::new();
        sign(&mut rng, &pp, &keys[0].1, msg, &mut agg, &[]).unwrap();

        // corrupt the running aggregate before the second signer
        let mut bad = agg.clone();
        bad.q = (bad.q.into_group() + pp.g1).into_affine();
        let previous = ark_std::vec![keys[0].0.clone()];
        let before = bad.clone();
        assert!(sign(&mut rng, &pp, &keys[1].1, msg, &mut bad, &previous).is_err());
        assert_eq!(bad, before);
    }

    #[test]
    fn duplicate_public_keys_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let pp = PublicParams::<E>::new();
        let msg = b"no double counting";

        let (pk, sk) = keygen(&mut rng, &pp);
        let mut agg = Signature::new();
        sign(&mut rng, &pp, &sk, msg, &mut agg, &[]).unwrap();

        assert!(matches!(
            verify(&pp, &[pk.clone(), pk], msg, &agg),
            Err(MultisigError::PublicKeysNotDistinct)
        ));
    }
}
