#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Attribute-based key exchange according to the paper: "Attribute-based
//! Key Exchange with General Policies" <https://eprint.iacr.org/2016/518>
//!
//! A certificate authority certifies per-user attribute keys with ELH
//! (BLS-flavored) homomorphic signatures. A user's public key encodes one
//! group element per attribute whose discrete-log base depends on whether
//! the attribute is held; encryption fills `2m` plaintext slots so that
//! decryption can only open the slot matching each attribute's value.
//! Higher-level protocols bind the recovered slots to garbled-circuit
//! wire labels via [`encryption::hash_to_key`].

extern crate alloc;

pub mod encryption;
pub mod error;
pub mod keys;
pub mod serialization;
pub mod setup;
