//! Certificate issuance, user key verification and re-randomization.

use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{rand::RngCore, vec::Vec, UniformRand};
use crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::Zeroize;

use crate::setup::{elh_verify, MasterKey, PublicParams, MPK};

/// A user's certified public key: random bases `(g, h, u)`, one element
/// per attribute, and ELH signatures tying everything to the CA.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g_sig: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h_sig: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u_sig: E::G1Affine,
    /// `E_i = r_i * h` when attribute `i` is held, else `r_i * g`
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub es: Vec<E::G1Affine>,
    /// ELH signature over `E_i + u` under the attribute key `J_i`
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub e_sigs: Vec<E::G1Affine>,
}

impl<E: Pairing> PublicKey<E> {
    /// Check non-triviality of the bases, the three system signatures,
    /// and every attribute signature.
    pub fn verify(&self, pp: &PublicParams, mpk: &MPK<E>) -> bool {
        if self.g.is_zero() || self.h.is_zero() || self.u.is_zero() {
            return false;
        }
        if self.es.len() != pp.num_attrs || self.e_sigs.len() != pp.num_attrs {
            return false;
        }

        if !elh_verify::<E>(&mpk.g, &self.g_sig, &self.g) {
            return false;
        }
        if !elh_verify::<E>(&mpk.h, &self.h_sig, &self.h) {
            return false;
        }
        if !elh_verify::<E>(&mpk.u, &self.u_sig, &self.u) {
            return false;
        }

        for i in 0..pp.num_attrs {
            let bound = (self.es[i].into_group() + self.u).into_affine();
            if !elh_verify::<E>(&mpk.js[i], &self.e_sigs[i], &bound) {
                return false;
            }
        }

        true
    }
}

/// The attribute scalars and the attribute vector itself.
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
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub rs: Vec<E::ScalarField>,
    pub attrs: Vec<bool>,
}

impl<E: Pairing> Zeroize for PrivateKey<E> {
    fn zeroize(&mut self) {
        self.rs.zeroize();
        self.attrs.zeroize();
    }
}

impl<E: Pairing> Drop for PrivateKey<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// The CA: public parameters plus the ELH master key.
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct CertificateAuthority<E: Pairing> {
    pub pp: PublicParams,
    pub master_key: MasterKey<E>,
}

impl<E: Pairing> CertificateAuthority<E> {
    pub fn new<R: RngCore>(rng: &mut R, pp: PublicParams) -> Self {
        let master_key = MasterKey::new(rng, &pp);
        Self { pp, master_key }
    }

    pub fn mpk(&self) -> MPK<E> {
        self.master_key.mpk()
    }

    /// Issue a certified key pair for an attribute vector.
    pub fn gen_cert<R: RngCore>(
        &self,
        rng: &mut R,
        attrs: &[bool],
    ) -> (PublicKey<E>, PrivateKey<E>) {
        assert_eq!(attrs.len(), self.pp.num_attrs);

        let g = E::G1::rand(rng).into_affine();
        let h = E::G1::rand(rng).into_affine();
        let u = E::G1::rand(rng).into_affine();

        let mut rs = Vec::with_capacity(self.pp.num_attrs);
        let mut es = Vec::with_capacity(self.pp.num_attrs);
        let mut e_sigs = Vec::with_capacity(self.pp.num_attrs);
        for (i, &held) in attrs.iter().enumerate() {
            let r = E::ScalarField::rand(rng);
            let base = if held { h } else { g };
            let e_i = base * r;
            let bound = (e_i + u).into_affine();
            e_sigs.push(self.master_key.j_pairs[i].sign(&bound));
            es.push(e_i.into_affine());
            rs.push(r);
        }

        let pk = PublicKey {
            g,
            h,
            u,
            g_sig: self.master_key.g_pair.sign(&g),
            h_sig: self.master_key.h_pair.sign(&h),
            u_sig: self.master_key.u_pair.sign(&u),
            es,
            e_sigs,
        };
        let sk = PrivateKey {
            rs,
            attrs: attrs.to_vec(),
        };
        (pk, sk)
    }
}

/// Re-randomize a certified public key by a fresh scalar. The result
/// verifies under the same CA but cannot be linked to the original; the
/// private scalars are unchanged.
pub fn unlink<R: RngCore, E: Pairing>(
    rng: &mut R,
    pk: &PublicKey<E>,
    sk: &PrivateKey<E>,
) -> (PublicKey<E>, PrivateKey<E>) {
    let r = E::ScalarField::rand(rng);

    let scale = |p: &E::G1Affine| (*p * r).into_affine();
    let new_pk = PublicKey {
        g: scale(&pk.g),
        h: scale(&pk.h),
        u: scale(&pk.u),
        g_sig: scale(&pk.g_sig),
        h_sig: scale(&pk.h_sig),
        u_sig: scale(&pk.u_sig),
        es: pk.es.iter().map(|e| scale(e)).collect(),
        e_sigs: pk.e_sigs.iter().map(|s| scale(s)).collect(),
    };
    (new_pk, sk.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_serialization;
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    type E = Bls12_381;

    #[test]
    fn issued_keys_verify() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let ca = CertificateAuthority::<E>::new(&mut rng, PublicParams::new(4));
        let mpk = ca.mpk();

        let (pk, sk) = ca.gen_cert(&mut rng, &[true, false, false, true]);
        assert!(pk.verify(&ca.pp, &mpk));
        assert_eq!(sk.attrs, &[true, false, false, true]);

        // a key from a different CA fails
        let other_ca = CertificateAuthority::<E>::new(&mut rng, PublicParams::new(4));
        assert!(!pk.verify(&ca.pp, &other_ca.mpk()));
    }

    #[test]
    fn forged_attribute_element_fails() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let ca = CertificateAuthority::<E>::new(&mut rng, PublicParams::new(2));
        let mpk = ca.mpk();

        let (mut pk, _) = ca.gen_cert(&mut rng, &[true, true]);
        pk.es[0] = (pk.es[0].into_group() + pk.g).into_affine();
        assert!(!pk.verify(&ca.pp, &mpk));
    }

    #[test]
    fn unlinked_key_still_verifies() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let ca = CertificateAuthority::<E>::new(&mut rng, PublicParams::new(3));
        let mpk = ca.mpk();

        let (pk, sk) = ca.gen_cert(&mut rng, &[false, true, false]);
        let (new_pk, new_sk) = unlink(&mut rng, &pk, &sk);

        assert!(new_pk.verify(&ca.pp, &mpk));
        assert_ne!(new_pk, pk);
        assert_eq!(new_sk, sk);
    }

    #[test]
    fn serialization() {
        use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

        let mut rng = StdRng::seed_from_u64(3u64);
        let ca = CertificateAuthority::<E>::new(&mut rng, PublicParams::new(2));
        let (pk, sk) = ca.gen_cert(&mut rng, &[true, false]);

        test_serialization!(PublicKey<E>, pk);
        test_serialization!(PrivateKey<E>, sk);
    }
}
