//! Public-key encryption with keyword search according to the paper:
//! "Public Key Encryption with Keyword Search"
//! <https://eprint.iacr.org/2003/195>
//!
//! A sender attaches searchable tags for chosen keywords to its
//! messages; the receiver hands a gateway a trapdoor for one keyword and
//! the gateway can test tags for that keyword without learning it.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, UniformRand};
use blake2::Blake2b512;
use crypto_utils::{
    hashing::{affine_group_elem_from_try_and_incr, hash_gt_to_bytes},
    serde_utils::ArkObjectBytes,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

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
pub struct PrivateKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub alpha: E::ScalarField,
}

impl<E: Pairing> Zeroize for PrivateKey<E> {
    fn zeroize(&mut self) {
        self.alpha.zeroize();
    }
}

impl<E: Pairing> Drop for PrivateKey<E> {
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
    pub gen: E::G1Affine,
    /// `alpha * gen`
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
}

pub fn keygen<R: RngCore, E: Pairing>(rng: &mut R) -> (PublicKey<E>, PrivateKey<E>) {
    let alpha = E::ScalarField::rand(rng);
    let gen = E::G1Affine::generator();
    (
        PublicKey {
            gen,
            h: (gen * alpha).into_affine(),
        },
        PrivateKey { alpha },
    )
}

fn hash_keyword<E: Pairing>(keyword: &[u8]) -> E::G2Affine {
    affine_group_elem_from_try_and_incr::<E::G2Affine, Blake2b512>(keyword)
}

/// A searchable tag: `(r * gen, H2(e(r * h, H1(w))))`.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SearchableTag<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub a: E::G1Affine,
    pub b: [u8; 32],
}

pub fn peks<R: RngCore, E: Pairing>(
    rng: &mut R,
    pk: &PublicKey<E>,
    keyword: &[u8],
) -> SearchableTag<E> {
    let r = E::ScalarField::rand(rng);
    let shared = E::pairing((pk.h * r).into_affine(), hash_keyword::<E>(keyword));
    SearchableTag {
        a: (pk.gen * r).into_affine(),
        b: hash_gt_to_bytes(&shared),
    }
}

/// `alpha * H1(w)`; lets a gateway match tags for `w` and nothing else.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Trapdoor<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

pub fn trapdoor<E: Pairing>(sk: &PrivateKey<E>, keyword: &[u8]) -> Trapdoor<E> {
    Trapdoor((hash_keyword::<E>(keyword) * sk.alpha).into_affine())
}

/// Does the tag match the trapdoor's keyword?
pub fn test<E: Pairing>(tag: &SearchableTag<E>, td: &Trapdoor<E>) -> bool {
    hash_gt_to_bytes(&E::pairing(tag.a, td.0)) == tag.b
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    #[test]
    fn matching_keyword_tests_true() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (pk, sk) = keygen::<_, E>(&mut rng);

        let tag = peks(&mut rng, &pk, b"urgent");
        let td = trapdoor(&sk, b"urgent");
        assert!(test(&tag, &td));
    }

    #[test]
    fn non_matching_keyword_tests_false() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (pk, sk) = keygen::<_, E>(&mut rng);

        let tag = peks(&mut rng, &pk, b"urgent");
        assert!(!test(&tag, &trapdoor(&sk, b"routine")));
    }

    #[test]
    fn trapdoor_is_key_specific() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (pk, _) = keygen::<_, E>(&mut rng);
        let (_, other_sk) = keygen::<_, E>(&mut rng);

        let tag = peks(&mut rng, &pk, b"urgent");
        assert!(!test(&tag, &trapdoor(&other_sk, b"urgent")));
    }

    #[test]
    fn tags_for_same_keyword_are_randomized() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let (pk, sk) = keygen::<_, E>(&mut rng);

        let tag1 = peks(&mut rng, &pk, b"urgent");
        let tag2 = peks(&mut rng, &pk, b"urgent");
        assert_ne!(tag1, tag2);

        let td = trapdoor(&sk, b"urgent");
        assert!(test(&tag1, &td) && test(&tag2, &td));
    }
}
