#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Proxy re-encryption: a proxy holding a re-encryption key transforms a
//! ciphertext addressed to a delegator into one addressed to a delegatee
//! without learning the plaintext.
//!
//! Four schemes with different properties:
//! - [`afgh05`]: unidirectional, single-hop, CPA-secure, pairing-based.
//! - [`bbs98`]: bidirectional, multi-hop, CPA-secure, over a plain
//!   short-Weierstrass curve.
//! - [`ch07`]: bidirectional, multi-hop, CCA-secure; ciphertexts carry a
//!   one-time Ed25519 signature.
//! - [`lv08`]: unidirectional, single-hop, CCA-secure; distinguishes
//!   first-level (re-encrypted) from second-level (original) ciphertexts.

extern crate alloc;

pub mod afgh05;
pub mod bbs98;
pub mod ch07;
pub mod error;
pub mod lv08;
