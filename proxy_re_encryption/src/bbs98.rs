//! Bidirectional proxy re-encryption according to the paper: "Divertible
//! Protocols and Atomic Proxy Cryptography"
//! <https://link.springer.com/chapter/10.1007/BFb0054122>
//!
//! ElGamal-style scheme over a plain short-Weierstrass curve. The
//! re-encryption key `sk_B / sk_A` is symmetric: whoever holds it can
//! translate ciphertexts in either direction, so both parties must trust
//! each other.

use ark_ec::{
    short_weierstrass::{Affine, SWCurveConfig},
    AffineRepr, CurveGroup,
};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Neg, rand::RngCore, UniformRand};
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::error::PREError;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<P: SWCurveConfig> {
    #[serde_as(as = "ArkObjectBytes")]
    pub gen: Affine<P>,
}

impl<P: SWCurveConfig> PublicParams<P> {
    pub fn new() -> Self {
        Self {
            gen: Affine::<P>::generator(),
        }
    }
}

impl<P: SWCurveConfig> Default for PublicParams<P> {
    fn default() -> Self {
        Self::new()
    }
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
pub struct SecretKey<P: SWCurveConfig>(#[serde_as(as = "ArkObjectBytes")] pub P::ScalarField);

impl<P: SWCurveConfig> Zeroize for SecretKey<P> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<P: SWCurveConfig> Drop for SecretKey<P> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<P: SWCurveConfig>(#[serde_as(as = "ArkObjectBytes")] pub Affine<P>);

pub fn keygen<R: RngCore, P: SWCurveConfig>(
    rng: &mut R,
    pp: &PublicParams<P>,
) -> (PublicKey<P>, SecretKey<P>) {
    let k = P::ScalarField::rand(rng);
    (PublicKey((pp.gen * k).into_affine()), SecretKey(k))
}

/// `rk_{A<->B} = sk_B * sk_A^{-1}`. Deriving it requires both secret keys.
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
pub struct ReEncryptionKey<P: SWCurveConfig>(#[serde_as(as = "ArkObjectBytes")] pub P::ScalarField);

impl<P: SWCurveConfig> Zeroize for ReEncryptionKey<P> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<P: SWCurveConfig> Drop for ReEncryptionKey<P> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

pub fn re_encryption_key_gen<P: SWCurveConfig>(
    delegator_sk: &SecretKey<P>,
    delegatee_sk: &SecretKey<P>,
) -> Result<ReEncryptionKey<P>, PREError> {
    let a_inv = delegator_sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    Ok(ReEncryptionKey(delegatee_sk.0 * a_inv))
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<P: SWCurveConfig> {
    /// `r*gen + m`
    #[serde_as(as = "ArkObjectBytes")]
    pub c1: Affine<P>,
    /// `r*pk`
    #[serde_as(as = "ArkObjectBytes")]
    pub c2: Affine<P>,
}

/// Encrypt a message point. Fails with [`PREError::MessageNotOnCurve`]
/// when the point was assembled from raw coordinates that do not satisfy
/// the curve equation or lie outside the prime-order subgroup.
pub fn encrypt<R: RngCore, P: SWCurveConfig>(
    rng: &mut R,
    pp: &PublicParams<P>,
    pk: &PublicKey<P>,
    msg: &Affine<P>,
) -> Result<Ciphertext<P>, PREError> {
    if !msg.is_on_curve() || !msg.is_in_correct_subgroup_assuming_on_curve() {
        return Err(PREError::MessageNotOnCurve);
    }

    let r = P::ScalarField::rand(rng);
    Ok(Ciphertext {
        c1: (pp.gen * r + msg).into_affine(),
        c2: (pk.0 * r).into_affine(),
    })
}

/// Translate a ciphertext between the two keys the re-encryption key ties
/// together. Works in both directions.
pub fn re_encrypt<P: SWCurveConfig>(
    rk: &ReEncryptionKey<P>,
    ct: &Ciphertext<P>,
) -> Ciphertext<P> {
    Ciphertext {
        c1: ct.c1,
        c2: (ct.c2 * rk.0).into_affine(),
    }
}

pub fn decrypt<P: SWCurveConfig>(
    sk: &SecretKey<P>,
    ct: &Ciphertext<P>,
) -> Result<Affine<P>, PREError> {
    let k_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    let shared = ct.c2 * k_inv;
    Ok((shared.neg() + ct.c1).into_affine())
}
