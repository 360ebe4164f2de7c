#![cfg_attr(not(feature = "std"), no_std)]

//! Lifted ElGamal over a short-Weierstrass curve: messages are curve
//! points, ciphertexts are `(r*gen, r*pk + m)`. Homomorphic in the
//! message: adding two ciphertexts componentwise encrypts the sum of the
//! points.

extern crate alloc;

use ark_ec::{
    short_weierstrass::{Affine, SWCurveConfig},
    AffineRepr, CurveGroup,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{ops::Neg, rand::RngCore, UniformRand};
use crypto_utils::serde_utils::{ArkObjectBytes, ArkSerializationError};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use ark_serialize::SerializationError;

#[derive(Debug, Serialize)]
pub enum ElGamalError {
    /// The plaintext point does not lie on the configured curve
    MessageNotOnCurve,
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for ElGamalError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

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

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<P: SWCurveConfig> {
    /// `r * gen`
    #[serde_as(as = "ArkObjectBytes")]
    pub c1: Affine<P>,
    /// `r * pk + m`
    #[serde_as(as = "ArkObjectBytes")]
    pub c2: Affine<P>,
}

/// Encrypt a message point; rejects points assembled from coordinates
/// that are off the curve or outside the prime-order subgroup.
pub fn encrypt<R: RngCore, P: SWCurveConfig>(
    rng: &mut R,
    pp: &PublicParams<P>,
    pk: &PublicKey<P>,
    msg: &Affine<P>,
) -> Result<Ciphertext<P>, ElGamalError> {
    if !msg.is_on_curve() || !msg.is_in_correct_subgroup_assuming_on_curve() {
        return Err(ElGamalError::MessageNotOnCurve);
    }

    let r = P::ScalarField::rand(rng);
    Ok(Ciphertext {
        c1: (pp.gen * r).into_affine(),
        c2: (pk.0 * r + msg).into_affine(),
    })
}

pub fn decrypt<P: SWCurveConfig>(sk: &SecretKey<P>, ct: &Ciphertext<P>) -> Affine<P> {
    ((ct.c1 * sk.0).neg() + ct.c2).into_affine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ec::CurveConfig;
    use ark_secp256r1::Config as Secp256r1;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn random_point<R: RngCore>(rng: &mut R, pp: &PublicParams<Secp256r1>) -> Affine<Secp256r1> {
        let k = <Secp256r1 as CurveConfig>::ScalarField::rand(rng);
        (pp.gen * k).into_affine()
    }

    #[test]
    fn encrypt_decrypt() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::<Secp256r1>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = random_point(&mut rng, &pp);
        let ct = encrypt(&mut rng, &pp, &pk, &msg).unwrap();
        assert_eq!(decrypt(&sk, &ct), msg);
    }

    #[test]
    fn additively_homomorphic() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::<Secp256r1>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let m1 = random_point(&mut rng, &pp);
        let m2 = random_point(&mut rng, &pp);
        let ct1 = encrypt(&mut rng, &pp, &pk, &m1).unwrap();
        let ct2 = encrypt(&mut rng, &pp, &pk, &m2).unwrap();

        let sum = Ciphertext {
            c1: (ct1.c1.into_group() + ct2.c1).into_affine(),
            c2: (ct1.c2.into_group() + ct2.c2).into_affine(),
        };
        assert_eq!(decrypt(&sk, &sum), (m1.into_group() + m2).into_affine());
    }

    #[test]
    fn off_curve_message_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::<Secp256r1>::new();
        let (pk, _) = keygen(&mut rng, &pp);

        let mut msg = random_point(&mut rng, &pp);
        msg.y += <Secp256r1 as CurveConfig>::BaseField::from(1u64);
        assert!(matches!(
            encrypt(&mut rng, &pp, &pk, &msg),
            Err(ElGamalError::MessageNotOnCurve)
        ));
    }

    #[test]
    fn wrong_key_garbles() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let pp = PublicParams::<Secp256r1>::new();
        let (pk, _) = keygen(&mut rng, &pp);
        let (_, eve_sk) = keygen(&mut rng, &pp);

        let msg = random_point(&mut rng, &pp);
        let ct = encrypt(&mut rng, &pp, &pk, &msg).unwrap();
        assert_ne!(decrypt(&eve_sk, &ct), msg);
    }
}
