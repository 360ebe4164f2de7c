#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Hierarchical identity-based encryption.
//!
//! - [`akn07`]: HIBE with wildcards. Identities are fixed-depth patterns
//!   whose slots are either fixed (a hashed component) or free; a key for
//!   a pattern derives keys for any pattern it matches. The last slot
//!   doubles as a signature slot.
//! - [`bbg05`]: constant-size-ciphertext HIBE where identities are
//!   contiguous component prefixes and derivation extends a prefix by one
//!   component.

extern crate alloc;

pub mod akn07;
pub mod bbg05;
pub mod error;
