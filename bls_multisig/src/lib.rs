#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! Multisignatures and aggregate signatures over BLS-style pairings.
//!
//! - [`b03`]: n-of-n multisignature on a single message; the aggregate
//!   verifies against the sum of the public keys.
//! - [`bgls03`]: aggregate signature over distinct messages; verification
//!   rejects duplicate messages, which would otherwise enable a rogue-key
//!   style forgery.
//! - [`bgoy07`]: ordered multisignature; the aggregate commits to the
//!   exact sequence of signers, and each signer re-verifies the running
//!   aggregate before contributing.

extern crate alloc;

pub mod b03;
pub mod bgls03;
pub mod bgoy07;
pub mod error;
pub mod setup;
