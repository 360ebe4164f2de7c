//! Unidirectional single-hop CCA-secure proxy re-encryption according to
//! the paper: "Unidirectional Chosen-Ciphertext Secure Proxy
//! Re-Encryption" <https://link.springer.com/chapter/10.1007/978-3-540-78440-1_21>
//!
//! Second-level ciphertexts are produced by encryption and can be
//! re-encrypted once; first-level ciphertexts are the re-encrypted (or
//! directly produced) form and cannot be transformed again. Both levels
//! carry a one-time Ed25519 signature and pairing checks binding the
//! payload to the one-time key.

use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{Field, PrimeField, Zero};
use ark_serialize::CanonicalSerialize;
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
    UniformRand,
};
use crypto_utils::serde_utils::ArkObjectBytes;
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
        PublicKey {
            y1: (pp.g1 * self.0).into_affine(),
            y2: (pp.g2 * self.0).into_affine(),
        }
    }
}

/// The secret exponent in both groups; the G1 half feeds re-encryption
/// key generation, the G2 half the ciphertext validity checks.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub y1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub y2: E::G2Affine,
}

pub fn keygen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
) -> (PublicKey<E>, SecretKey<E>) {
    let x = E::ScalarField::rand(rng);
    let sk = SecretKey(x);
    (sk.public_key(pp), sk)
}

/// `rk_{A->B} = g1^{b/a}`, plus the delegator's public key so the proxy
/// can pre-verify incoming second-level ciphertexts.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ReEncryptionKey<E: Pairing> {
    pub delegator_pk: PublicKey<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub rk: E::G1Affine,
}

pub fn re_encryption_key_gen<E: Pairing>(
    pp: &PublicParams<E>,
    delegator_sk: &SecretKey<E>,
    delegatee_pk: &PublicKey<E>,
) -> Result<ReEncryptionKey<E>, PREError> {
    let a_inv = delegator_sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    Ok(ReEncryptionKey {
        delegator_pk: delegator_sk.public_key(pp),
        rk: (delegatee_pk.y1 * a_inv).into_affine(),
    })
}

/// The one-time verification key reduced to a scalar (little-endian mod r).
fn svk_scalar<E: Pairing>(svk: &VerifyingKey) -> E::ScalarField {
    E::ScalarField::from_le_bytes_mod_order(svk.as_bytes())
}

/// `(1 + svk) * g1`, the G1 element the checks tie to the one-time key.
fn svk_base<E: Pairing>(pp: &PublicParams<E>, svk: &VerifyingKey) -> E::G1Affine {
    (pp.g1 * svk_scalar::<E>(svk) + pp.g1).into_affine()
}

fn message_to_sign<E: Pairing>(c3: &PairingOutput<E>, c4: &E::G1Affine) -> Vec<u8> {
    let mut m = Vec::new();
    c3.serialize_compressed(&mut m)
        .expect("serialization to a Vec cannot fail");
    c4.serialize_compressed(&mut m)
        .expect("serialization to a Vec cannot fail");
    m
}

/// First-level ciphertext: the re-encrypted destination form. Cannot be
/// re-encrypted again.
#[derive(Clone, Debug)]
pub struct Ciphertext1<E: Pairing> {
    pub svk: VerifyingKey,
    /// `t * Y2_A`
    pub c2_prime: E::G2Affine,
    /// `t^{-1} * g1` (or `t^{-1} * rk` after re-encryption)
    pub c2_double_prime: E::G1Affine,
    /// `r*t * Y2_A`
    pub c2_triple_prime: E::G2Affine,
    /// `e(g1, g2)^r * m`
    pub c3: PairingOutput<E>,
    /// `r * (1 + svk) * g1`
    pub c4: E::G1Affine,
    pub sig: ed25519_dalek::Signature,
}

impl<E: Pairing> Ciphertext1<E> {
    /// First-level validity: the one-time signature over `c3 || c4`, then
    /// `e(C''2, C'2) = e(g1, Y2)` and `e((1+svk)g1, C'''2) = e(C4, C'2)`.
    pub fn check(&self, pp: &PublicParams<E>, pk: &PublicKey<E>) -> Result<(), PREError> {
        let m = message_to_sign::<E>(&self.c3, &self.c4);
        if self.svk.verify(&m, &self.sig).is_err() {
            return Err(PREError::InvalidSignature);
        }

        let neg_g1 = (-pp.g1.into_group()).into_affine();
        if !E::multi_pairing([self.c2_double_prime, neg_g1], [self.c2_prime, pk.y2]).is_zero() {
            return Err(PREError::InvalidFirstLevelCiphertext);
        }

        let base = svk_base::<E>(pp, &self.svk);
        let neg_c4 = (-self.c4.into_group()).into_affine();
        if !E::multi_pairing([base, neg_c4], [self.c2_triple_prime, self.c2_prime]).is_zero() {
            return Err(PREError::InvalidFirstLevelCiphertext);
        }

        Ok(())
    }
}

/// Second-level ciphertext: the form produced by [`encrypt2`], eligible
/// for one re-encryption hop.
#[derive(Clone, Debug)]
pub struct Ciphertext2<E: Pairing> {
    pub svk: VerifyingKey,
    /// `r * Y2`
    pub c2: E::G2Affine,
    /// `e(g1, g2)^r * m`
    pub c3: PairingOutput<E>,
    /// `r * (1 + svk) * g1`
    pub c4: E::G1Affine,
    pub sig: ed25519_dalek::Signature,
}

impl<E: Pairing> Ciphertext2<E> {
    /// Second-level validity: the one-time signature over `c3 || c4`,
    /// then `e((1+svk)g1, C2) = e(C4, Y2)`.
    pub fn check(&self, pp: &PublicParams<E>, pk: &PublicKey<E>) -> Result<(), PREError> {
        let m = message_to_sign::<E>(&self.c3, &self.c4);
        if self.svk.verify(&m, &self.sig).is_err() {
            return Err(PREError::InvalidSignature);
        }

        let base = svk_base::<E>(pp, &self.svk);
        let neg_c4 = (-self.c4.into_group()).into_affine();
        if !E::multi_pairing([base, neg_c4], [self.c2, pk.y2]).is_zero() {
            return Err(PREError::InvalidSecondLevelCiphertext);
        }

        Ok(())
    }
}

/// Produce a first-level ciphertext directly (not re-encryptable).
pub fn encrypt1<R: RngCore + CryptoRng, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    pk: &PublicKey<E>,
    msg: &PairingOutput<E>,
) -> Ciphertext1<E> {
    let ssk = SigningKey::generate(rng);
    let svk = ssk.verifying_key();

    let r = E::ScalarField::rand(rng);
    let t = E::ScalarField::rand(rng);
    // t is uniform and nonzero with overwhelming probability
    let t_inv = t.inverse().unwrap();

    let c2_prime = (pk.y2 * t).into_affine();
    let c2_double_prime = (pp.g1 * t_inv).into_affine();
    let c2_triple_prime = (pk.y2 * (r * t)).into_affine();
    let c3 = E::pairing(pp.g1, pp.g2) * r + msg;
    let c4 = (svk_base::<E>(pp, &svk) * r).into_affine();
    let sig = ssk.sign(&message_to_sign::<E>(&c3, &c4));

    Ciphertext1 {
        svk,
        c2_prime,
        c2_double_prime,
        c2_triple_prime,
        c3,
        c4,
        sig,
    }
}

pub fn decrypt1<E: Pairing>(
    pp: &PublicParams<E>,
    sk: &SecretKey<E>,
    ct: &Ciphertext1<E>,
) -> Result<PairingOutput<E>, PREError> {
    ct.check(pp, &sk.public_key(pp))?;

    let x_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    let z = E::pairing(ct.c2_double_prime, ct.c2_triple_prime) * x_inv;
    Ok(ct.c3 - z)
}

/// Produce a second-level ciphertext that a proxy may re-encrypt once.
pub fn encrypt2<R: RngCore + CryptoRng, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    pk: &PublicKey<E>,
    msg: &PairingOutput<E>,
) -> Ciphertext2<E> {
    let ssk = SigningKey::generate(rng);
    let svk = ssk.verifying_key();

    let r = E::ScalarField::rand(rng);
    let c2 = (pk.y2 * r).into_affine();
    let c3 = E::pairing(pp.g1, pp.g2) * r + msg;
    let c4 = (svk_base::<E>(pp, &svk) * r).into_affine();
    let sig = ssk.sign(&message_to_sign::<E>(&c3, &c4));

    Ciphertext2 {
        svk,
        c2,
        c3,
        c4,
        sig,
    }
}

pub fn decrypt2<E: Pairing>(
    pp: &PublicParams<E>,
    sk: &SecretKey<E>,
    ct: &Ciphertext2<E>,
) -> Result<PairingOutput<E>, PREError> {
    ct.check(pp, &sk.public_key(pp))?;

    let x_inv = sk.0.inverse().ok_or(PREError::CannotInvertZero)?;
    let z = E::pairing(pp.g1, ct.c2) * x_inv;
    Ok(ct.c3 - z)
}

/// Transform a second-level ciphertext addressed to the delegator into a
/// first-level ciphertext addressed to the delegatee. The incoming
/// ciphertext is verified against the delegator key recorded in the
/// re-encryption key; on failure no output is produced.
pub fn re_encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    rk: &ReEncryptionKey<E>,
    ct: &Ciphertext2<E>,
) -> Result<Ciphertext1<E>, PREError> {
    ct.check(pp, &rk.delegator_pk)?;

    let t = E::ScalarField::rand(rng);
    let t_inv = t.inverse().ok_or(PREError::CannotInvertZero)?;

    Ok(Ciphertext1 {
        svk: ct.svk,
        c2_prime: (rk.delegator_pk.y2 * t).into_affine(),
        c2_double_prime: (rk.rk * t_inv).into_affine(),
        c2_triple_prime: (ct.c2 * t).into_affine(),
        c3: ct.c3,
        c4: ct.c4,
        sig: ct.sig,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn first_level_round_trip() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt1(&mut rng, &pp, &pk, &msg);
        assert_eq!(decrypt1(&pp, &sk, &ct).unwrap(), msg);
    }

    #[test]
    fn second_level_round_trip() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct = encrypt2(&mut rng, &pp, &pk, &msg);
        assert_eq!(decrypt2(&pp, &sk, &ct).unwrap(), msg);
    }

    #[test]
    fn re_encrypt_round_trip() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);
        let (bob_pk, bob_sk) = keygen(&mut rng, &pp);

        let rk = re_encryption_key_gen(&pp, &alice_sk, &bob_pk).unwrap();

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let ct2 = encrypt2(&mut rng, &pp, &alice_pk, &msg);
        let ct1 = re_encrypt(&mut rng, &pp, &rk, &ct2).unwrap();

        assert_eq!(decrypt1(&pp, &bob_sk, &ct1).unwrap(), msg);
    }

    #[test]
    fn tampered_second_level_rejected() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (alice_pk, alice_sk) = keygen(&mut rng, &pp);
        let (bob_pk, _) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let mut ct2 = encrypt2(&mut rng, &pp, &alice_pk, &msg);
        ct2.c3 = ct2.c3 + PairingOutput::<Bls12_381>::rand(&mut rng);

        let rk = re_encryption_key_gen(&pp, &alice_sk, &bob_pk).unwrap();
        assert!(matches!(
            re_encrypt(&mut rng, &pp, &rk, &ct2),
            Err(PREError::InvalidSignature)
        ));
    }

    #[test]
    fn swapped_component_fails_pairing_check() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let pp = PublicParams::<Bls12_381>::new();
        let (pk, sk) = keygen(&mut rng, &pp);

        let msg = PairingOutput::<Bls12_381>::rand(&mut rng);
        let mut ct = encrypt2(&mut rng, &pp, &pk, &msg);
        // re-randomize c2 without re-signing: signature still verifies
        // (it does not cover c2) but the pairing check must catch it
        ct.c2 = (ct.c2 * <Bls12_381 as Pairing>::ScalarField::from(2u64)).into_affine();
        assert!(matches!(
            decrypt2(&pp, &sk, &ct),
            Err(PREError::InvalidSecondLevelCiphertext)
        ));
    }
}
