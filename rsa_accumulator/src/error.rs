use serde::Serialize;
use std::fmt::Debug;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub enum AccumulatorError {
    /// The two witnesses do not aggregate to the same accumulator value,
    /// or their exponents are not coprime
    ShamirTrickInconsistent,
    /// A value had no inverse modulo the totient or the modulus
    CannotInvert,
    /// RSA modulus generation failed
    KeyGeneration,
}
