//! Matchmaking encryption according to the paper: "Match Me if You Can:
//! Matchmaking Encryption and its Applications"
//! <https://eprint.iacr.org/2018/1094>
//!
//! The authority issues a send key bound to the sender's identity and a
//! receive key bound to the receiver's. The ciphertext is masked under
//! two pairing values; decryption recovers the message only when the
//! receiver holds the key for the identity the sender addressed, and the
//! sender's claimed identity matches the key it encrypted with.

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
use zeroize::Zeroize;

use crate::error::IBEError;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub p: E::G1Affine,
    /// `r * p`
    #[serde_as(as = "ArkObjectBytes")]
    pub p0: E::G1Affine,
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
pub struct MasterSecretKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub r: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s: E::ScalarField,
}

impl<E: Pairing> Zeroize for MasterSecretKey<E> {
    fn zeroize(&mut self) {
        self.r.zeroize();
        self.s.zeroize();
    }
}

impl<E: Pairing> Drop for MasterSecretKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

pub fn setup<R: RngCore, E: Pairing>(rng: &mut R) -> (MasterSecretKey<E>, PublicParams<E>) {
    let r = E::ScalarField::rand(rng);
    let s = E::ScalarField::rand(rng);

    let p = E::G1Affine::generator();
    let pp = PublicParams {
        p,
        p0: (p * r).into_affine(),
    };
    (MasterSecretKey { r, s }, pp)
}

fn hash_id_to_g1<E: Pairing>(id: &[u8]) -> E::G1Affine {
    affine_group_elem_from_try_and_incr::<E::G1Affine, Blake2b512>(id)
}

fn hash_id_to_g2<E: Pairing>(id: &[u8]) -> E::G2Affine {
    affine_group_elem_from_try_and_incr::<E::G2Affine, Blake2b512>(id)
}

/// Sender-side key for an identity: `s * H1(id)`.
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
pub struct EncryptionKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

pub fn sk_gen<E: Pairing>(msk: &MasterSecretKey<E>, id: &[u8]) -> EncryptionKey<E> {
    EncryptionKey((hash_id_to_g1::<E>(id) * msk.s).into_affine())
}

/// Receiver-side key: `(r * H2(id), s * H2(id), H2(id))`.
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
pub struct DecryptionKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub dk1: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub dk2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub dk3: E::G2Affine,
}

pub fn rk_gen<E: Pairing>(msk: &MasterSecretKey<E>, id: &[u8]) -> DecryptionKey<E> {
    let h = hash_id_to_g2::<E>(id);
    DecryptionKey {
        dk1: (h * msk.r).into_affine(),
        dk2: (h * msk.s).into_affine(),
        dk3: h,
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<E: Pairing> {
    /// `t * p`
    #[serde_as(as = "ArkObjectBytes")]
    pub t: E::G1Affine,
    /// `u * p`
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    pub v: Vec<u8>,
}

/// Encrypt towards a receiver identity, authenticating as the identity
/// behind `ek`.
pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    ek: &EncryptionKey<E>,
    receiver_id: &[u8],
    msg: &[u8],
) -> Result<Ciphertext<E>, IBEError> {
    let t = E::ScalarField::rand(rng);
    let u = E::ScalarField::rand(rng);

    let ct_t = (pp.p * t).into_affine();
    let ct_u = (pp.p * u).into_affine();

    let h = hash_id_to_g2::<E>(receiver_id);
    // receiver mask: e(u * p0, H2(rcv))
    let k_r = E::pairing((pp.p0 * u).into_affine(), h);
    // sender mask: e(t*p + ek, H2(rcv))
    let k_s = E::pairing((ct_t.into_group() + ek.0).into_affine(), h);

    let mut v = msg.to_vec();
    xor_in_place(&mut v, &gt_kdf(&k_r, msg.len())?);
    xor_in_place(&mut v, &gt_kdf(&k_s, msg.len())?);

    Ok(Ciphertext {
        t: ct_t,
        u: ct_u,
        v,
    })
}

/// Decrypt, authenticating the sender as `sender_id`. A mismatch on
/// either identity yields garbage rather than an error; the protocol
/// layer decides what the plaintext must look like.
pub fn decrypt<E: Pairing>(
    dk: &DecryptionKey<E>,
    sender_id: &[u8],
    ct: &Ciphertext<E>,
) -> Result<Vec<u8>, IBEError> {
    let k_r = E::pairing(ct.u, dk.dk1);

    let h = hash_id_to_g1::<E>(sender_id);
    let k_s = E::pairing(h, dk.dk2) + E::pairing(ct.t, dk.dk3);

    let mut msg = ct.v.clone();
    xor_in_place(&mut msg, &gt_kdf(&k_r, ct.v.len())?);
    xor_in_place(&mut msg, &gt_kdf(&k_s, ct.v.len())?);
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    #[test]
    fn matching_identities_decrypt() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (msk, pp) = setup::<_, E>(&mut rng);

        let ek = sk_gen(&msk, b"sender@org");
        let dk = rk_gen(&msk, b"receiver@org");

        let msg = b"the meeting is on";
        let ct = encrypt(&mut rng, &pp, &ek, b"receiver@org", msg).unwrap();
        assert_eq!(decrypt(&dk, b"sender@org", &ct).unwrap(), msg);
    }

    #[test]
    fn wrong_sender_claim_garbles() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (msk, pp) = setup::<_, E>(&mut rng);

        let ek = sk_gen(&msk, b"mallory");
        let dk = rk_gen(&msk, b"receiver");

        let msg = b"pretending to be alice";
        let ct = encrypt(&mut rng, &pp, &ek, b"receiver", msg).unwrap();
        // receiver expects alice; mallory's key produced the sender mask
        assert_ne!(decrypt(&dk, b"alice", &ct).unwrap(), msg);
    }

    #[test]
    fn wrong_receiver_garbles() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (msk, pp) = setup::<_, E>(&mut rng);

        let ek = sk_gen(&msk, b"sender");
        let eve_dk = rk_gen(&msk, b"eve");

        let msg = b"addressed to receiver";
        let ct = encrypt(&mut rng, &pp, &ek, b"receiver", msg).unwrap();
        assert_ne!(decrypt(&eve_dk, b"sender", &ct).unwrap(), msg);
    }
}
