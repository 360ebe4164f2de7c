//! Trusted-manager RSA accumulator after Benaloh-de Mare
//! <https://link.springer.com/chapter/10.1007/3-540-48285-7_24>, with the
//! witness-aggregation and proof-of-exponentiation extensions of
//! Boneh-Bunz-Fisch <https://eprint.iacr.org/2018/1188>.
//!
//! The manager knows the factorization of the modulus and reduces all
//! exponents mod Euler's totient; members are represented by primes
//! derived deterministically from their bytes, so independently computed
//! witnesses stay compatible. Witnesses must be refreshed with the
//! update value returned by every addition or removal.

pub mod accumulator;
pub mod error;
pub mod hash_to_prime;
pub mod poe;

pub use accumulator::{aggregate_witnesses, shamir_trick, AccumulatorManager, Witness};
pub use error::AccumulatorError;
pub use hash_to_prime::hash_to_prime;
pub use poe::{ni_poe, verify_ni_poe, PoEProof};
