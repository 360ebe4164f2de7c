//! Bidirectional multi-hop CCA-secure proxy re-encryption according to the
//! paper: "Chosen-Ciphertext Secure Proxy Re-Encryption"
//! <https://eprint.iacr.org/2007/171>
//!
//! Every ciphertext carries a fresh Ed25519 one-time verification key and
//! a signature over its mutable payload; re-encryption and decryption both
//! verify the signature and two pairing equations binding the payload to
//! the verification key before touching the plaintext. Re-encrypted
//! ciphertexts keep the same shape, so they can hop through several
//! proxies.

use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{Field, Zero};
use ark_serialize::CanonicalSerialize;
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
    UniformRand,
};
use blake2::Blake2b512;
use crypto_utils::{hashing::affine_group_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::error::PREError;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

impl<E: Pairing> SecretKey<E> {
    pub fn public_key(&self, pp: &PublicParams<E>) -> PublicKey<E> {
        PublicKey((pp.g1 * self.0).into_affine())
    }
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

pub fn keygen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
) -> (PublicKey<E>, SecretKey<E>) {
    let x = E::ScalarField::rand(rng);
    (PublicKey((pp.g1 * x).into_affine()), SecretKey(x))
}

/// `rk_{A<->B} = sk_B * sk_A^{-1}`; symmetric, both secret keys required.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReEncryptionKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::ScalarField);

impl<E: Pairing> Zeroize for ReEncryptionKey<E> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<E: Pairing> Drop for ReEncryptionKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

pub fn re_encryption_key_gen<E: Pairing>(
    delegator_sk: &SecretKey<E>,
    delegatee_sk: &SecretKey<E>,
) -> Result<ReEncryptionKey<E>, PREError> {
    let a_inv = delegator_sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    Ok(ReEncryptionKey(delegatee_sk.0 * a_inv))
}

/// Hash the one-time verification key into G2.
fn hash_svk_to_g2<E: Pairing>(svk: &VerifyingKey) -> E::G2Affine {
    affine_group_elem_from_try_and_incr::<E::G2Affine, Blake2b512>(svk.as_bytes())
}

#[derive(Clone, Debug)]
pub struct Ciphertext<E: Pairing> {
    /// One-time Ed25519 verification key
    pub svk: VerifyingKey,
    /// `r * pk`; the only component a proxy transforms
    pub b: E::G1Affine,
    /// `e(g1, H(svk))^r * m`
    pub c: PairingOutput<E>,
    /// `r * H(svk)`
    pub d: E::G2Affine,
    /// `r * g2`
    pub e: E::G2Affine,
    /// One-time signature over `c || d || e`
    pub sig: ed25519_dalek::Signature,
}

/// The mutable payload the one-time signature commits to.
fn message_to_sign<E: Pairing>(
    c: &PairingOutput<E>,
    d: &E::G2Affine,
    e: &E::G2Affine,
) -> Vec<u8> {
    let mut m = Vec::new();
    c.serialize_compressed(&mut m)
        .expect("serialization to a Vec cannot fail");
    d.serialize_compressed(&mut m)
        .expect("serialization to a Vec cannot fail");
    e.serialize_compressed(&mut m)
        .expect("serialization to a Vec cannot fail");
    m
}

impl<E: Pairing> Ciphertext<E> {
    /// Verify the one-time signature, then the two pairing equations
    /// `e(B, H(svk)) = e(Y, D)` and `e(B, g2) = e(Y, E)` binding the
    /// payload to `svk` under the public key `pk`.
    pub fn check(&self, pp: &PublicParams<E>, pk: &PublicKey<E>) -> Result<(), PREError> {
        let m = message_to_sign::<E>(&self.c, &self.d, &self.e);
        if self.svk.verify(&m, &self.sig).is_err() {
            return Err(PREError::InvalidSignature);
        }

        let neg_y = (-pk.0.into_group()).into_affine();
        let h = hash_svk_to_g2::<E>(&self.svk);
        if !E::multi_pairing([self.b, neg_y], [h, self.d]).is_zero() {
            return Err(PREError::InvalidCiphertext);
        }
        if !E::multi_pairing([self.b, neg_y], [pp.g2, self.e]).is_zero() {
            return Err(PREError::InvalidCiphertext);
        }

        Ok(())
    }
}

pub fn encrypt<R: RngCore + CryptoRng, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    pk: &PublicKey<E>,
    msg: &PairingOutput<E>,
) -> Ciphertext<E> {
    let ssk = SigningKey::generate(rng);
    let svk = ssk.verifying_key();
    let h = hash_svk_to_g2::<E>(&svk);

    let r = E::ScalarField::rand(rng);
    let b = (pk.0 * r).into_affine();
    let c = E::pairing(pp.g1, h) * r + msg;
    let d = (h * r).into_affine();
    let e = (pp.g2 * r).into_affine();
    let sig = ssk.sign(&message_to_sign::<E>(&c, &d, &e));

    Ciphertext { svk, b, c, d, e, sig }
}

/// Transform a ciphertext towards the delegatee and verify the result
/// before releasing it; a ciphertext failing its checks yields an error
/// and no output.
pub fn re_encrypt<E: Pairing>(
    pp: &PublicParams<E>,
    rk: &ReEncryptionKey<E>,
    delegatee_pk: &PublicKey<E>,
    ct: &Ciphertext<E>,
) -> Result<Ciphertext<E>, PREError> {
    let mut out = ct.clone();
    out.b = (ct.b * rk.0).into_affine();
    out.check(pp, delegatee_pk)?;
    Ok(out)
}

pub fn decrypt<E: Pairing>(
    pp: &PublicParams<E>,
    sk: &SecretKey<E>,
    ct: &Ciphertext<E>,
) -> Result<PairingOutput<E>, PREError> {
    ct.check(pp, &sk.public_key(pp))?;

    let x_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    let h = hash_svk_to_g2::<E>(&ct.svk);
    Ok(ct.c - E::pairing(ct.b, h) * x_inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn encrypt_decrypt() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &pk, &msg);
        assert_eq!(decrypt(&pp, &sk, &ct).unwrap(), msg);
    }

    #[test]
    fn multi_hop_re_encryption() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);
        let (_, bob_sk) = keygen(&mut rng, &pp);
        let (_, carol_sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &alice_pk, &msg);

        let rk_ab = re_encryption_key_gen(&alice_sk, &bob_sk).unwrap();
        let ct_b = re_encrypt(&pp, &rk_ab, &bob_sk.public_key(&pp), &ct).unwrap();
        assert_eq!(decrypt(&pp, &bob_sk, &ct_b).unwrap(), msg);

        // re-encrypted ciphertexts keep their shape and can hop again
        let rk_bc = re_encryption_key_gen(&bob_sk, &carol_sk).unwrap();
        let ct_c = re_encrypt(&pp, &rk_bc, &carol_sk.public_key(&pp), &ct_b).unwrap();
        assert_eq!(decrypt(&pp, &carol_sk, &ct_c).unwrap(), msg);
    }

    #[test]
    fn tampered_payload_rejected() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let mut ct = encrypt(&mut rng, &pp, &pk, &msg);
        ct.c = ct.c + PairingOutput::<Bls12_381>::rand(&mut rng);
        assert!(matches!(
            decrypt(&pp, &sk, &ct),
            Err(PREError::InvalidSignature)
        ));
    }

    #[test]
    fn mismatched_recipient_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);
        let (_, bob_sk) = keygen(&mut rng, &pp);
        let (_, eve_sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &alice_pk, &msg);

        // a re-encryption towards Bob does not verify under Eve's key
        let rk_ab = re_encryption_key_gen(&alice_sk, &bob_sk).unwrap();
        assert!(matches!(
            re_encrypt(&pp, &rk_ab, &eve_sk.public_key(&pp), &ct),
            Err(PREError::InvalidCiphertext)
        ));
    }
}
