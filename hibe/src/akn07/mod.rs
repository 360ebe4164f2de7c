//! HIBE with wildcards according to the paper: "Identity-Based Encryption
//! Gone Wild" <https://eprint.iacr.org/2006/304>
//!
//! An identity is a pattern of exactly `max_depth` slots, each either
//! fixed (the hash of a byte component) or free (a wildcard). A key
//! issued for a pattern decrypts ciphertexts under any pattern it
//! matches, and can derive keys for such patterns; derivation
//! re-randomizes so derived keys are unlinkable from their parent.
//!
//! The last slot is reserved as a signature slot: a key whose final slot
//! is free can sign scalar messages, reusing the key-derivation algebra
//! with the message occupying the reserved slot.

mod serialization;

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

/// Master public parameters. `hs` has one element per slot; the last one
/// backs the signature mode.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct PublicParams<E: Pairing> {
    pub max_depth: usize,
    #[serde_as(as = "ArkObjectBytes")]
    pub g: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g3: E::G1Affine,
    #[serde_as(as = "Vec<ArkObjectBytes>")]
    pub hs: Vec<E::G1Affine>,
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
pub struct MasterKey<E: Pairing>(#[serde_as(as = "ArkObjectBytes")] pub E::G1Affine);

pub fn setup<R: RngCore, E: Pairing>(
    rng: &mut R,
    max_depth: usize,
) -> (PublicParams<E>, MasterKey<E>) {
    assert_ne!(max_depth, 0);

    let alpha = E::ScalarField::rand(rng);
    let g = E::G2Affine::generator();
    let g1 = (g * alpha).into_affine();
    let g2 = E::G1::rand(rng).into_affine();
    let g3 = E::G1::rand(rng).into_affine();
    let hs = (0..max_depth)
        .map(|_| E::G1::rand(rng).into_affine())
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

/// A fixed-depth identity pattern: `None` slots are wildcards, `Some`
/// slots carry the hash of a component.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Pattern<E: Pairing> {
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub slots: Vec<Option<E::ScalarField>>,
}

impl<E: Pairing> Pattern<E> {
    /// Build a pattern from optional byte components; `None` marks a free
    /// slot. The component list must cover every slot.
    pub fn new(pp: &PublicParams<E>, components: &[Option<&[u8]>]) -> Result<Self, HibeError> {
        if components.len() != pp.max_depth {
            return Err(HibeError::PatternInvalidDepth);
        }
        Ok(Self {
            slots: components
                .iter()
                .map(|c| c.map(field_elem_from_try_and_incr::<E::ScalarField, Blake2b512>))
                .collect(),
        })
    }

    /// Convenience builder: an empty string marks a free slot and the
    /// list is right-padded with free slots up to `max_depth`.
    pub fn from_strings(pp: &PublicParams<E>, components: &[&str]) -> Result<Self, HibeError> {
        if components.len() > pp.max_depth {
            return Err(HibeError::PatternExceedsMaxDepth);
        }
        let mut padded: Vec<Option<&[u8]>> = components
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.as_bytes()) })
            .collect();
        padded.resize(pp.max_depth, None);
        Self::new(pp, &padded)
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    /// Does every fixed slot of `self` agree with `other`? Free slots of
    /// `self` impose no constraint, so the all-free pattern matches
    /// everything.
    pub fn matches(&self, other: &Pattern<E>) -> bool {
        self.slots
            .iter()
            .zip(other.slots.iter())
            .all(|(mine, theirs)| match (mine, theirs) {
                (None, _) => true,
                (Some(a), Some(b)) => a == b,
                (Some(_), None) => false,
            })
    }

    pub fn fixed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
    }

    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| if s.is_none() { Some(i) } else { None })
    }
}

/// `g3 + sum of P_i * H_i` over the fixed slots, the G1 base every
/// operation ties a pattern to.
fn pattern_base<E: Pairing>(pp: &PublicParams<E>, pattern: &Pattern<E>) -> E::G1 {
    let mut agg: E::G1 = pp.g3.into();
    for (i, slot) in pattern.slots.iter().enumerate() {
        if let Some(p) = slot {
            agg += pp.hs[i] * p;
        }
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
    pub k0: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub k1: E::G2Affine,
    /// `r * H_i` for every free slot `i`, consumed when derivation fixes
    /// the slot
    #[serde_as(as = "Vec<Option<ArkObjectBytes>>")]
    pub bs: Vec<Option<E::G1Affine>>,
    pub pattern: Pattern<E>,
}

pub fn key_gen<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    msk: &MasterKey<E>,
    pattern: &Pattern<E>,
) -> Result<PrivateKey<E>, HibeError> {
    if pattern.depth() != pp.max_depth {
        return Err(HibeError::PatternInvalidDepth);
    }

    let r = E::ScalarField::rand(rng);

    let k0 = (pattern_base(pp, pattern) * r + msk.0).into_affine();
    let k1 = (pp.g * r).into_affine();

    let bs = pattern
        .slots
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            None => Some((pp.hs[i] * r).into_affine()),
            Some(_) => None,
        })
        .collect();

    Ok(PrivateKey {
        k0,
        k1,
        bs,
        pattern: pattern.clone(),
    })
}

/// Derive a key for `child` from a key whose pattern matches it. The
/// result is re-randomized with fresh `t`, so it is distributed exactly
/// like a key from [`key_gen`] with randomness `r + t` and cannot be
/// linked to its parent.
pub fn key_der<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    parent: &PrivateKey<E>,
    child: &Pattern<E>,
) -> Result<PrivateKey<E>, HibeError> {
    if child.depth() != pp.max_depth {
        return Err(HibeError::PatternInvalidDepth);
    }
    if !parent.pattern.matches(child) {
        return Err(HibeError::PatternDoesNotMatch);
    }

    let t = E::ScalarField::rand(rng);

    let mut k0 = pattern_base(pp, child) * t + parent.k0;
    for (i, slot) in child.slots.iter().enumerate() {
        // slots fixed by the child but free in the parent absorb the
        // parent's B_i
        if let (Some(p), None) = (slot, &parent.pattern.slots[i]) {
            let b = parent.bs[i].expect("free parent slots carry a B element");
            k0 += b * *p;
        }
    }

    let k1 = (pp.g * t + parent.k1).into_affine();

    let mut bs = ark_std::vec![None; pp.max_depth];
    for i in child.free_indices() {
        // a slot free in the child is free in the parent too
        let parent_b = parent.bs[i].expect("free parent slots carry a B element");
        bs[i] = Some((pp.hs[i] * t + parent_b).into_affine());
    }

    Ok(PrivateKey {
        k0: k0.into_affine(),
        k1,
        bs,
        pattern: child.clone(),
    })
}

#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Ciphertext<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub x: PairingOutput<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub y: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub z: E::G1Affine,
}

pub fn encrypt<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    pattern: &Pattern<E>,
    msg: &PairingOutput<E>,
) -> Result<Ciphertext<E>, HibeError> {
    if pattern.depth() != pp.max_depth {
        return Err(HibeError::PatternInvalidDepth);
    }

    let s = E::ScalarField::rand(rng);
    Ok(Ciphertext {
        x: E::pairing(pp.g2, pp.g1) * s + msg,
        y: (pp.g * s).into_affine(),
        z: (pattern_base(pp, pattern) * s).into_affine(),
    })
}

pub fn decrypt<E: Pairing>(sk: &PrivateKey<E>, ct: &Ciphertext<E>) -> PairingOutput<E> {
    ct.x + E::pairing(ct.z, sk.k1) - E::pairing(sk.k0, ct.y)
}

/// Signature under a pattern: the reserved last slot absorbs the message
/// scalar.
#[serde_as]
#[derive(
    Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct Signature<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub s0: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub s1: E::G2Affine,
}

/// Sign a scalar message. The signer's pattern must leave the final slot
/// free; the message occupies it.
pub fn sign<R: RngCore, E: Pairing>(
    rng: &mut R,
    pp: &PublicParams<E>,
    sk: &PrivateKey<E>,
    msg: &E::ScalarField,
) -> Result<Signature<E>, HibeError> {
    let last = pp.max_depth - 1;
    let b_last = match (&sk.pattern.slots[last], &sk.bs[last]) {
        (None, Some(b)) => *b,
        _ => return Err(HibeError::SignatureSlotOccupied),
    };

    let t = E::ScalarField::rand(rng);

    let base = pattern_base(pp, &sk.pattern) + pp.hs[last] * msg;
    let s0 = (base * t + sk.k0 + b_last * msg).into_affine();
    let s1 = (pp.g * t + sk.k1).into_affine();

    Ok(Signature { s0, s1 })
}

/// Check `e(S0, g) = e(g2, g1) * e(g3 + sum P_i H_i + m*H_last, S1)`
/// against the signer's pattern.
pub fn verify<E: Pairing>(
    pp: &PublicParams<E>,
    signer_pattern: &Pattern<E>,
    sig: &Signature<E>,
    msg: &E::ScalarField,
) -> Result<(), HibeError> {
    let last = pp.max_depth - 1;
    let base = (pattern_base(pp, signer_pattern) + pp.hs[last] * msg).into_affine();

    let lhs = E::pairing(sig.s0, pp.g);
    let rhs = E::pairing(pp.g2, pp.g1) + E::pairing(base, sig.s1);
    if lhs != rhs {
        return Err(HibeError::InvalidSignature);
    }
    Ok(())
}
