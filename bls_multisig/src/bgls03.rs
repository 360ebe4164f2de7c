//! Aggregate signature according to the paper: "Aggregate and Verifiably
//! Encrypted Signatures from Bilinear Maps"
//! <https://eprint.iacr.org/2002/175>
//!
//! Each signer signs its own message; the aggregate is the sum of the
//! signatures. Verification requires all messages to be pairwise
//! distinct: aggregating two signatures on the same message lets an
//! adversary cancel contributions and forge.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{collections::BTreeSet, vec::Vec};
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

/// Sign `msg` and fold the contribution `sk * H(msg)` into the
/// caller-owned aggregate.
pub fn sign<E: Pairing>(sk: &SecretKey<E>, msg: &[u8], agg: &mut Signature<E>) {
    let contribution = hash_message::<E>(msg) * sk.0;
    agg.0 = (contribution + agg.0).into_affine();
}

/// Sum a batch of signatures.
pub fn aggregate<E: Pairing>(sigs: &[Signature<E>]) -> Signature<E> {
    let mut agg = E::G1::zero();
    for sig in sigs {
        agg += sig.0;
    }
    Signature(agg.into_affine())
}

/// `e(agg, g2) = prod of e(H(m_i), pk_i)`, with `pks[i]` vouching for
/// `msgs[i]`. Duplicate messages are rejected before any pairing work.
pub fn verify<E: Pairing>(
    pp: &PublicParams<E>,
    pks: &[PublicKey<E>],
    msgs: &[&[u8]],
    agg: &Signature<E>,
) -> Result<(), MultisigError> {
    assert_eq!(pks.len(), msgs.len());

    let mut seen = BTreeSet::new();
    for msg in msgs {
        if !seen.insert(msg.to_vec()) {
            return Err(MultisigError::NotAllMessagesDistinct);
        }
    }

    let mut g1s: Vec<E::G1Affine> = Vec::with_capacity(pks.len() + 1);
    let mut g2s: Vec<E::G2Affine> = Vec::with_capacity(pks.len() + 1);
    g1s.push((-agg.0.into_group()).into_affine());
    g2s.push(pp.g2);
    for (pk, msg) in pks.iter().zip(msgs.iter()) {
        g1s.push(hash_message::<E>(msg));
        g2s.push(pk.0);
    }

    if !E::multi_pairing(g1s, g2s).is_zero() {
        return Err(MultisigError::InvalidSignature);
    }
    Ok(())
}
