//! Parameters, single-scalar keys and message hashing shared by the
//! signature schemes.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use blake2::Blake2b512;
use crypto_utils::{hashing::affine_group_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
}

impl<E: Pairing> PublicParams<E> {
    pub fn new() -> Self {
        Self {
            g1: E::G1Affine::generator(),
            g2: E::G2Affine::generator(),
        }
    }
}

impl<E: Pairing> Default for PublicParams<E> {
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
pub struct SecretKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::ScalarField);

impl<E: Pairing> Zeroize for SecretKey<E> {
    fn zeroize(&mut self) {
        self.0.zeroize();
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
pub struct PublicKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

pub fn keygen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
) -> (PublicKey<E>, SecretKey<E>) {
    let x = E::ScalarField::rand(rng);
    (PublicKey((pp.g2 * x).into_affine()), SecretKey(x))
}

/// Hash a message into G1.
pub fn hash_message<E: Pairing>(msg: &[u8]) -> E::G1Affine {
    affine_group_elem_from_try_and_incr::<E::G1Affine, Blake2b512>(msg)
}
