//! Unidirectional single-hop proxy re-encryption according to the paper:
//! "Improved Proxy Re-encryption Schemes with Applications to Secure
//! Distributed Storage" <https://eprint.iacr.org/2005/028>
//!
//! First-level ciphertexts are decryptable by the delegator; the proxy
//! turns them into second-level ciphertexts decryptable by the delegatee.
//! Second-level ciphertexts cannot be re-encrypted again. Knowing
//! `rk_{A->B}` does not allow deriving `rk_{B->A}`.
//!
//! Public parameters cache `z = e(g1, g2)` so encryption costs one
//! exponentiation in the target group instead of a pairing.

use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::Field;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::error::PREError;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    /// Cached `e(g1, g2)`
    #[serde_as(as = "ArkObjectBytes")]
    pub z: PairingOutput<E>,
}

impl<E: Pairing> PublicParams<E> {
    pub fn new() -> Self {
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();
        Self {
            g1,
            g2,
            z: E::pairing(g1, g2),
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

/// The public key carries the secret exponent in both groups; the G2 half
/// is what a delegator needs to produce a re-encryption key towards this
/// key's owner.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1_a: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2_a: E::G2Affine,
}

pub fn keygen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
) -> (PublicKey<E>, SecretKey<E>) {
    let a = E::ScalarField::rand(rng);
    let pk = PublicKey {
        g1_a: (pp.g1 * a).into_affine(),
        g2_a: (pp.g2 * a).into_affine(),
    };
    (pk, SecretKey(a))
}

/// `rk_{A->B} = g2^{b/a}`, computed from Alice's secret and Bob's public
/// key only.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct ReEncryptionKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

pub fn re_encryption_key_gen<E: Pairing>(
    delegator_sk: &SecretKey<E>,
    delegatee_pk: &PublicKey<E>,
) -> Result<ReEncryptionKey<E>, PREError> {
    let a_inv = delegator_sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    Ok(ReEncryptionKey((delegatee_pk.g2_a * a_inv).into_affine()))
}

/// First-level ciphertext, addressed to the key under which it was
/// produced.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext1<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub alpha: PairingOutput<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub beta: E::G1Affine,
}

/// Second-level ciphertext produced by the proxy; only the delegatee can
/// decrypt it and it cannot be re-encrypted again.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext2<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub alpha: PairingOutput<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub beta: PairingOutput<E>,
}

pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    pk: &PublicKey<E>,
    msg: &PairingOutput<E>,
) -> Ciphertext1<E> {
    let r = E::ScalarField::rand(rng);
    Ciphertext1 {
        alpha: pp.z * r + msg,
        beta: (pk.g1_a * r).into_affine(),
    }
}

pub fn decrypt1<E: Pairing>(
    pp: &PublicParams<E>,
    sk: &SecretKey<E>,
    ct: &Ciphertext1<E>,
) -> Result<PairingOutput<E>, PREError> {
    let a_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    let g2_a_inv = (pp.g2 * a_inv).into_affine();
    Ok(ct.alpha - E::pairing(ct.beta, g2_a_inv))
}

pub fn re_encrypt<E: Pairing>(rk: &ReEncryptionKey<E>, ct: &Ciphertext1<E>) -> Ciphertext2<E> {
    Ciphertext2 {
        alpha: ct.alpha,
        beta: E::pairing(ct.beta, rk.0),
    }
}

pub fn decrypt2<E: Pairing>(
    sk: &SecretKey<E>,
    ct: &Ciphertext2<E>,
) -> Result<PairingOutput<E>, PREError> {
    let b_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    Ok(ct.alpha - ct.beta * b_inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn encrypt_decrypt_without_proxy() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &alice_pk, &msg);
        assert_eq!(decrypt1(&pp, &alice_sk, &ct).unwrap(), msg);
    }

    #[test]
    fn re_encrypt_round_trip() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);
        let (bob_pk, bob_sk) = keygen(&mut rng, &pp);

        let rk = re_encryption_key_gen(&alice_sk, &bob_pk).unwrap();

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct1 = encrypt(&mut rng, &pp, &alice_pk, &msg);
        let ct2 = re_encrypt(&rk, &ct1);

        assert_eq!(decrypt2(&bob_sk, &ct2).unwrap(), msg);
        // the delegator cannot read the transformed ciphertext
        assert_ne!(decrypt2(&alice_sk, &ct2).unwrap(), msg);
    }

    #[test]
    fn wrong_recipient_fails() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, _) = keygen(&mut rng, &pp);
        let (_, eve_sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &alice_pk, &msg);
        assert_ne!(decrypt1(&pp, &eve_sk, &ct).unwrap(), msg);
    }
}
