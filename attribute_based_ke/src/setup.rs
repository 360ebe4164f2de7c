//! Public parameters and the certificate authority's ELH key material.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

/// System-wide parameters: just the attribute count `m`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize,
    Deserialize,
)]
pub struct PublicParams {
    pub num_attrs: usize,
}

impl PublicParams {
    pub fn new(num_attrs: usize) -> Self {
        assert_ne!(num_attrs, 0);
        Self { num_attrs }
    }
}

/// An ELH signature of a G1 message `M` under scalar key `x` is `x * M`;
/// verification checks `e(sig, g2) = e(M, x * g2)`.
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
pub struct ElhSecretKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::ScalarField);

impl<E: Pairing> Zeroize for ElhSecretKey<E> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<E: Pairing> Drop for ElhSecretKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct ElhKeyPair<E: Pairing> {
    pub sk: ElhSecretKey<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub pk: E::G2Affine,
}

impl<E: Pairing> ElhKeyPair<E> {
    pub fn generate<R: RngCore>(rng: &mut R) -> Self {
        let sk = E::ScalarField::rand(rng);
        Self {
            sk: ElhSecretKey(sk),
            pk: (E::G2Affine::generator() * sk).into_affine(),
        }
    }

    pub fn sign(&self, msg: &E::G1Affine) -> E::G1Affine {
        elh_sign::<E>(&self.sk, msg)
    }
}

pub fn elh_sign<E: Pairing>(sk: &ElhSecretKey<E>, msg: &E::G1Affine) -> E::G1Affine {
    (*msg * sk.0).into_affine()
}

pub fn elh_verify<E: Pairing>(pk: &E::G2Affine, sig: &E::G1Affine, msg: &E::G1Affine) -> bool {
    let neg_msg = (-msg.into_group()).into_affine();
    E::multi_pairing([*sig, neg_msg], [E::G2Affine::generator(), *pk]).is_zero()
}

/// The CA's full key material: three system pairs certifying `(g, h, u)`
/// and one pair per attribute.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct MasterKey<E: Pairing> {
    pub g_pair: ElhKeyPair<E>,
    pub h_pair: ElhKeyPair<E>,
    pub u_pair: ElhKeyPair<E>,
    pub j_pairs: Vec<ElhKeyPair<E>>,
}

impl<E: Pairing> MasterKey<E> {
    pub fn new<R: RngCore>(rng: &mut R, pp: &PublicParams) -> Self {
        Self {
            g_pair: ElhKeyPair::generate(rng),
            h_pair: ElhKeyPair::generate(rng),
            u_pair: ElhKeyPair::generate(rng),
            j_pairs: (0..pp.num_attrs).map(|_| ElhKeyPair::generate(rng)).collect(),
        }
    }

    /// The secret halves only.
    pub fn msk(&self) -> MSK<E> {
        MSK {
            g: self.g_pair.sk.clone(),
            h: self.h_pair.sk.clone(),
            u: self.u_pair.sk.clone(),
            js: self.j_pairs.iter().map(|p| p.sk.clone()).collect(),
        }
    }

    /// The public halves only; what verifiers need.
    pub fn mpk(&self) -> MPK<E> {
        MPK {
            g: self.g_pair.pk,
            h: self.h_pair.pk,
            u: self.u_pair.pk,
            js: self.j_pairs.iter().map(|p| p.pk).collect(),
        }
    }
}

#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct MSK<E: Pairing> {
    pub g: ElhSecretKey<E>,
    pub h: ElhSecretKey<E>,
    pub u: ElhSecretKey<E>,
    pub js: Vec<ElhSecretKey<E>>,
}

/// Master verification key, also called MVK.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct MPK<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G2Affine,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub js: Vec<E::G2Affine>,
}
