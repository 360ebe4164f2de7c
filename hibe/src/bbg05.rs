//! Hierarchical IBE with constant-size ciphertexts according to the
//! paper: "Hierarchical Identity Based Encryption with Constant Size
//! Ciphertext" <https://eprint.iacr.org/2005/015>
//!
//! Identities are contiguous prefixes of hashed components. A key for
//! `(I_1, ..., I_k)` derives a key for `(I_1, ..., I_k, I_{k+1})`; the
//! derived key is re-randomized and distributed like a freshly issued
//! one. Group assignment mirrors [`crate::akn07`]: here `g, g1` live in
//! G1 and `g2, g3, H_i` in G2.

use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use blake2::Blake2b512;
use crypto_utils::{hashing::field_elem_from_try_and_incr, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

use crate::error::HibeError;

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    pub max_depth: usize,
    #[serde_as(as = "ArkObjectBytes")]
    pub g: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g3: E::G2Affine,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub hs: Vec<E::G2Affine>,
}

/// `g2^alpha`, kept by the authority.
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
pub struct MasterKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G2Affine);

pub fn setup<R: RngCore, E: Pairing>(
    rng: &mut R,
    max_depth: usize,
) -> (PublicParams<E>, MasterKey<E>) {
    assert_ne!(max_depth, 0);

    let alpha = E::ScalarField::rand(rng);
    let g = E::G1Affine::generator();
    let g1 = (g * alpha).into_affine();
    let g2 = E::G2::rand(rng).into_affine();
    let g3 = E::G2::rand(rng).into_affine();
    let hs = (0..max_depth)
        .map(|_| E::G2::rand(rng).into_affine())
        .collect();

    let msk = MasterKey((g2 * alpha).into_affine());
    (
        PublicParams {
            max_depth,
            g,
            g1,
            g2,
            g3,
            hs,
        },
        msk,
    )
}

/// An identity: a prefix of hashed components, at most `max_depth` long.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Id<E: Pairing> {
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub components: Vec<E::ScalarField>,
}

impl<E: Pairing> Id<E> {
    pub fn new(pp: &PublicParams<E>, components: &[&[u8]]) -> Result<Self, HibeError> {
        if components.len() > pp.max_depth {
            return Err(HibeError::IdExceedsMaxDepth);
        }
        Ok(Self {
            components: components
                .iter()
                .map(|c| field_elem_from_try_and_incr::<E::ScalarField, Blake2b512>(c))
                .collect(),
        })
    }

    pub fn from_strings(pp: &PublicParams<E>, components: &[&str]) -> Result<Self, HibeError> {
        let bytes: Vec<&[u8]> = components.iter().map(|c| c.as_bytes()).collect();
        Self::new(pp, &bytes)
    }

    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Is `child` exactly one component longer, agreeing on the shared
    /// prefix?
    pub fn is_parent_of(&self, child: &Id<E>) -> bool {
        child.depth() == self.depth() + 1
            && self
                .components
                .iter()
                .zip(child.components.iter())
                .all(|(a, b)| a == b)
    }
}

/// `g3 + sum of I_i * H_i` over the identity's components.
fn id_base<E: Pairing>(pp: &PublicParams<E>, id: &Id<E>) -> E::G2 {
    let mut agg: E::G2 = pp.g3.into();
    for (i, c) in id.components.iter().enumerate() {
        agg += pp.hs[i] * c;
    }
    agg
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct PrivateKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub a0: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub a1: E::G1Affine,
    /// `r * H_i` for the levels below the identity's depth, consumed as
    /// derivation extends the identity
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub bs: Vec<E::G2Affine>,
    pub id: Id<E>,
}

pub fn key_gen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    msk: &MasterKey<E>,
    id: &Id<E>,
) -> Result<PrivateKey<E>, HibeError> {
    if id.depth() > pp.max_depth {
        return Err(HibeError::IdExceedsMaxDepth);
    }

    let r = E::ScalarField::rand(rng);

    let a0 = (id_base(pp, id) * r + msk.0).into_affine();
    let a1 = (pp.g * r).into_affine();
    let bs = pp.hs[id.depth()..]
        .iter()
        .map(|h| (*h * r).into_affine())
        .collect();

    Ok(PrivateKey {
        a0,
        a1,
        bs,
        id: id.clone(),
    })
}

/// Derive a key for a child identity extending the parent's by exactly
/// one component. Re-randomized with fresh `t`.
pub fn key_der<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    parent: &PrivateKey<E>,
    child: &Id<E>,
) -> Result<PrivateKey<E>, HibeError> {
    if child.depth() > pp.max_depth {
        return Err(HibeError::IdExceedsMaxDepth);
    }
    if !parent.id.is_parent_of(child) {
        return Err(HibeError::NotAChildId);
    }

    let t = E::ScalarField::rand(rng);

    // the parent's first B element corresponds to the newly fixed level
    let new_component = child.components[child.depth() - 1];
    let a0 = (id_base(pp, child) * t + parent.bs[0] * new_component + parent.a0).into_affine();
    let a1 = (pp.g * t + parent.a1).into_affine();

    let bs = pp.hs[child.depth()..]
        .iter()
        .zip(parent.bs[1..].iter())
        .map(|(h, b)| (*h * t + *b).into_affine())
        .collect();

    Ok(PrivateKey {
        a0,
        a1,
        bs,
        id: child.clone(),
    })
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub a: PairingOutput<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub b: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::G2Affine,
}

pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    id: &Id<E>,
    msg: &PairingOutput<E>,
) -> Result<Ciphertext<E>, HibeError> {
    if id.depth() > pp.max_depth {
        return Err(HibeError::IdExceedsMaxDepth);
    }

    let s = E::ScalarField::rand(rng);
    Ok(Ciphertext {
        a: E::pairing(pp.g1, pp.g2) * s + msg,
        b: (pp.g * s).into_affine(),
        c: (id_base(pp, id) * s).into_affine(),
    })
}

pub fn decrypt<E: Pairing>(sk: &PrivateKey<E>, ct: &Ciphertext<E>) -> PairingOutput<E> {
    ct.a + E::pairing(sk.a1, ct.c) - E::pairing(ct.b, sk.a0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    #[test]
    fn encrypt_decrypt() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (pp, msk) = setup::<_, E>(&mut rng, 5);

        let id = Id::from_strings(&pp, &["com", "example"]).unwrap();
        let sk = key_gen(&mut rng, &pp, &msk, &id).unwrap();

        let msg = PairingOutput::<E>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &id, &msg).unwrap();
        assert_eq!(decrypt(&sk, &ct), msg);
    }

    #[test]
    fn derive_down_to_max_depth() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let (pp, msk) = setup::<_, E>(&mut rng, 4);

        let components = ["a", "b", "c", "d"];
        let root_id = Id::from_strings(&pp, &components[..1]).unwrap();
        let mut key = key_gen(&mut rng, &pp, &msk, &root_id).unwrap();

        for depth in 2..=components.len() {
            let child_id = Id::from_strings(&pp, &components[..depth]).unwrap();
            key = key_der(&mut rng, &pp, &key, &child_id).unwrap();

            let msg = PairingOutput::<E>::rand(&mut rng);
            let ct = encrypt(&mut rng, &pp, &child_id, &msg).unwrap();
            assert_eq!(decrypt(&key, &ct), msg);
        }
    }

    #[test]
    fn key_der_must_extend_by_one() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let (pp, msk) = setup::<_, E>(&mut rng, 4);

        let id_a = Id::from_strings(&pp, &["a"]).unwrap();
        let key_a = key_gen(&mut rng, &pp, &msk, &id_a).unwrap();

        // two levels at once
        let id_abc = Id::from_strings(&pp, &["a", "b", "c"]).unwrap();
        assert!(matches!(
            key_der(&mut rng, &pp, &key_a, &id_abc),
            Err(HibeError::NotAChildId)
        ));

        // same depth
        assert!(matches!(
            key_der(&mut rng, &pp, &key_a, &id_a),
            Err(HibeError::NotAChildId)
        ));

        // diverging prefix
        let id_xb = Id::from_strings(&pp, &["x", "b"]).unwrap();
        assert!(matches!(
            key_der(&mut rng, &pp, &key_a, &id_xb),
            Err(HibeError::NotAChildId)
        ));
    }

    #[test]
    fn id_depth_bound() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let (pp, _) = setup::<_, E>(&mut rng, 2);
        assert!(matches!(
            Id::from_strings(&pp, &["a", "b", "c"]),
            Err(HibeError::IdExceedsMaxDepth)
        ));
    }

    #[test]
    fn sibling_key_cannot_decrypt() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let (pp, msk) = setup::<_, E>(&mut rng, 3);

        let id_ab = Id::from_strings(&pp, &["a", "b"]).unwrap();
        let id_ac = Id::from_strings(&pp, &["a", "c"]).unwrap();
        let key_ac = key_gen(&mut rng, &pp, &msk, &id_ac).unwrap();

        let msg = PairingOutput::<E>::rand(&mut rng);
        let ct = encrypt(&mut rng, &pp, &id_ab, &msg).unwrap();
        assert_ne!(decrypt(&key_ac, &ct), msg);
    }
}
