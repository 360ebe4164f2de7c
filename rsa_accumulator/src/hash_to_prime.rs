use num_bigint_dig::{prime::probably_prime, BigUint};
use num_integer::Integer;
use num_traits::One;
use sha2::{Digest, Sha256};

/// Miller-Rabin rounds; the false-positive probability is at most 4^-20.
const PRIME_TEST_ROUNDS: usize = 20;

/// Deterministically map bytes to an odd prime: SHA-256 the input, force
/// the result odd, and re-hash until Miller-Rabin accepts. The same input
/// always yields the same prime, which keeps independently computed
/// witnesses portable.
pub fn hash_to_prime(data: &[u8]) -> BigUint {
    let mut x = BigUint::from_bytes_be(&Sha256::digest(data));
    if x.is_even() {
        x += BigUint::one();
    }
    while !probably_prime(&x, PRIME_TEST_ROUNDS) {
        x = BigUint::from_bytes_be(&Sha256::digest(&x.to_bytes_be()));
        if x.is_even() {
            x += BigUint::one();
        }
    }
    x
}
