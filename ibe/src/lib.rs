#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Identity-bound encryption primitives.
//!
//! - [`bf01`]: Boneh-Franklin identity-based encryption; the message is
//!   XOR-masked with an HKDF expansion of a pairing value.
//! - [`matchmaking`]: matchmaking encryption where decryption succeeds
//!   only when the sender and receiver identities both match the keys in
//!   play.
//! - [`keyword_search`]: public-key encryption with keyword search; a
//!   trapdoor tests a searchable tag for a keyword without revealing it.

extern crate alloc;

pub mod bf01;
pub mod error;
pub mod keyword_search;
pub mod matchmaking;
