//! Non-interactive proof of exponentiation: a succinct certificate that
//! `a^x mod n` equals the accumulator value without shipping `x`.

use num_bigint_dig::{BigUint, RandPrime};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::accumulator::Witness;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoEProof {
    /// Fresh random 256-bit prime acting as the challenge
    pub prime: BigUint,
    /// `a^(x div h) mod n` where `h` hashes the challenge
    pub q: BigUint,
}

fn challenge_hash(prime: &BigUint) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(&prime.to_bytes_be()))
}

/// Prove that the witness opens to `a^x`.
pub fn ni_poe<R: RngCore>(rng: &mut R, w: &Witness) -> PoEProof {
    let prime = rng.gen_prime(256);
    let h = challenge_hash(&prime);
    let quotient = &w.x / &h;
    PoEProof {
        q: w.a.modpow(&quotient, &w.n),
        prime,
    }
}

/// Check `acc_value = q^h * a^(x mod h) mod n`.
pub fn verify_ni_poe(acc_value: &BigUint, w: &Witness, proof: &PoEProof) -> bool {
    let h = challenge_hash(&proof.prime);
    let r = &w.x % &h;
    let recombined = (proof.q.modpow(&h, &w.n) * w.a.modpow(&r, &w.n)) % &w.n;
    *acc_value == recombined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::{aggregate_witnesses, AccumulatorManager};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn proof_round_trip() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mut mgr = AccumulatorManager::new(&mut rng, 1024).unwrap();

        let (w, _) = mgr.add(b"member");
        let proof = ni_poe(&mut rng, &w);
        assert!(verify_ni_poe(mgr.value(), &w, &proof));
    }

    #[test]
    fn aggregated_witness_proof() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let mut mgr = AccumulatorManager::new(&mut rng, 1024).unwrap();

        let (mut w1, _) = mgr.add(b"a");
        let (w2, u2) = mgr.add(b"b");
        w1.update(&u2);

        let agg = aggregate_witnesses(&[w1, w2]).unwrap();
        let proof = ni_poe(&mut rng, &agg);
        assert!(verify_ni_poe(mgr.value(), &agg, &proof));
    }

    #[test]
    fn proof_does_not_transfer() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let mut mgr = AccumulatorManager::new(&mut rng, 1024).unwrap();

        let (w1, _) = mgr.add(b"a");
        let proof = ni_poe(&mut rng, &w1);

        let (w2, _) = mgr.add(b"b");
        // the proof speaks for w1's opening, not the new accumulator
        assert!(!verify_ni_poe(mgr.value(), &w1, &proof));
        // and not for another witness
        assert!(!verify_ni_poe(mgr.value(), &w2, &proof));
    }
}
