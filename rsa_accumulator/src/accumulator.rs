//! The manager's accumulator state, membership witnesses and witness
//! aggregation via Shamir's trick.

use num_bigint_dig::{BigInt, BigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Signed};
use rand::{CryptoRng, RngCore};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::{error::AccumulatorError, hash_to_prime::hash_to_prime};

/// The accumulator's fixed starting base.
const ACCUMULATOR_BASE: u32 = 65537;

/// Membership witness: `a^x mod n` must equal the current accumulator
/// value. `a` is the accumulator value from just before the member was
/// added, updated once per subsequent addition or removal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    /// The member's prime exponent, reduced mod the totient
    pub x: BigUint,
    /// The witness base
    pub a: BigUint,
    pub n: BigUint,
}

impl Witness {
    /// Fold in the update value returned by a later addition or removal.
    pub fn update(&mut self, update: &BigUint) {
        self.a = self.a.modpow(update, &self.n);
    }
}

/// The trusted manager: knows the totient, so additions and removals are
/// single modular exponentiations.
pub struct AccumulatorManager {
    modulus: BigUint,
    totient: BigUint,
    value: BigUint,
}

impl Drop for AccumulatorManager {
    fn drop(&mut self) {
        self.totient.zeroize();
    }
}

impl AccumulatorManager {
    /// Generate a fresh RSA modulus of `rsa_bits` and start from the
    /// fixed base.
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        rsa_bits: usize,
    ) -> Result<Self, AccumulatorError> {
        let key = RsaPrivateKey::new(rng, rsa_bits).map_err(|_| AccumulatorError::KeyGeneration)?;

        let primes = key.primes();
        let one = BigUint::one();
        let totient: BigUint = primes.iter().map(|p| p - &one).product();

        Ok(Self {
            modulus: key.n().clone(),
            totient,
            value: BigUint::from(ACCUMULATOR_BASE),
        })
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Add an item. Returns the new member's witness and the update value
    /// for refreshing every existing witness.
    pub fn add(&mut self, item: &[u8]) -> (Witness, BigUint) {
        let x = hash_to_prime(item) % &self.totient;
        let witness = Witness {
            x: x.clone(),
            a: self.value.clone(),
            n: self.modulus.clone(),
        };
        self.value = self.value.modpow(&x, &self.modulus);
        (witness, x)
    }

    /// Remove an item. Returns the update value (`x^-1 mod totient`) for
    /// refreshing the remaining witnesses.
    pub fn remove(&mut self, item: &[u8]) -> Result<BigUint, AccumulatorError> {
        let x = hash_to_prime(item) % &self.totient;
        let x_inv = x
            .mod_inverse(&self.totient)
            .and_then(|i| i.to_biguint())
            .ok_or(AccumulatorError::CannotInvert)?;
        self.value = self.value.modpow(&x_inv, &self.modulus);
        Ok(x_inv)
    }

    /// Does the witness open the current accumulator value?
    pub fn verify_witness(&self, w: &Witness) -> bool {
        w.a.modpow(&w.x, &self.modulus) == self.value
    }
}

/// `base^exp mod n` for a possibly negative exponent; negative exponents
/// go through the modular inverse of the base.
fn modpow_signed(base: &BigUint, exp: &BigInt, n: &BigUint) -> Result<BigUint, AccumulatorError> {
    let magnitude = exp
        .abs()
        .to_biguint()
        .ok_or(AccumulatorError::CannotInvert)?;
    if exp.is_negative() {
        let inv = base
            .mod_inverse(n)
            .and_then(|i| i.to_biguint())
            .ok_or(AccumulatorError::CannotInvert)?;
        Ok(inv.modpow(&magnitude, n))
    } else {
        Ok(base.modpow(&magnitude, n))
    }
}

/// Combine witnesses for coprime exponents `x` and `y` into a witness
/// for `x*y`, given that both open the same aggregated value. With
/// Bezout coefficients `a*x + b*y = 1` the combined base is
/// `w1.a^b * w2.a^a mod n`.
pub fn shamir_trick(w1: &Witness, w2: &Witness) -> Result<Witness, AccumulatorError> {
    if w1.n != w2.n {
        return Err(AccumulatorError::ShamirTrickInconsistent);
    }
    let opened1 = w1.a.modpow(&w1.x, &w1.n);
    let opened2 = w2.a.modpow(&w2.x, &w2.n);
    if opened1 != opened2 {
        return Err(AccumulatorError::ShamirTrickInconsistent);
    }

    let x = BigInt::from(w1.x.clone());
    let y = BigInt::from(w2.x.clone());
    let gcd = x.extended_gcd(&y);
    if !gcd.gcd.is_one() {
        return Err(AccumulatorError::ShamirTrickInconsistent);
    }

    let lhs = modpow_signed(&w1.a, &gcd.y, &w1.n)?;
    let rhs = modpow_signed(&w2.a, &gcd.x, &w1.n)?;
    Ok(Witness {
        x: &w1.x * &w2.x,
        a: (lhs * rhs) % &w1.n,
        n: w1.n.clone(),
    })
}

/// Left-fold a list of witnesses into one via Shamir's trick.
pub fn aggregate_witnesses(witnesses: &[Witness]) -> Result<Witness, AccumulatorError> {
    assert!(!witnesses.is_empty());
    let mut agg = witnesses[0].clone();
    for w in &witnesses[1..] {
        agg = shamir_trick(&agg, w)?;
    }
    Ok(agg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const TEST_RSA_BITS: usize = 1024;

    #[test]
    fn fresh_witness_verifies() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mut mgr = AccumulatorManager::new(&mut rng, TEST_RSA_BITS).unwrap();

        let (w, _) = mgr.add(b"item-1");
        assert!(mgr.verify_witness(&w));
    }

    #[test]
    fn stale_witness_fails_until_updated() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let mut mgr = AccumulatorManager::new(&mut rng, TEST_RSA_BITS).unwrap();

        let (mut w1, _) = mgr.add(b"x1");
        let (_, update) = mgr.add(b"x2");

        assert!(!mgr.verify_witness(&w1));
        w1.update(&update);
        assert!(mgr.verify_witness(&w1));
    }

    #[test]
    fn removal_updates_remaining_witnesses() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let mut mgr = AccumulatorManager::new(&mut rng, TEST_RSA_BITS).unwrap();

        let (mut w1, _) = mgr.add(b"keep");
        let (_, u2) = mgr.add(b"drop");
        w1.update(&u2);

        let u3 = mgr.remove(b"drop").unwrap();
        assert!(!mgr.verify_witness(&w1));
        w1.update(&u3);
        assert!(mgr.verify_witness(&w1));
    }

    #[test]
    fn aggregation() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let mut mgr = AccumulatorManager::new(&mut rng, TEST_RSA_BITS).unwrap();

        let (mut w1, _) = mgr.add(b"a");
        let (mut w2, u2) = mgr.add(b"b");
        w1.update(&u2);
        let (w3, u3) = mgr.add(b"c");
        w1.update(&u3);
        w2.update(&u3);

        let agg = aggregate_witnesses(&[w1, w2, w3]).unwrap();
        assert!(mgr.verify_witness(&agg));
    }

    #[test]
    fn inconsistent_pair_is_rejected() {
        let mut rng = StdRng::seed_from_u64(4u64);
        let mut mgr = AccumulatorManager::new(&mut rng, TEST_RSA_BITS).unwrap();

        let (w1, _) = mgr.add(b"a");
        let (w2, _) = mgr.add(b"b");
        // w1 was not updated for the second addition, so the two open
        // different accumulator values
        assert_eq!(
            shamir_trick(&w1, &w2),
            Err(AccumulatorError::ShamirTrickInconsistent)
        );
    }
}
