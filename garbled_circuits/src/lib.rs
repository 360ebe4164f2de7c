#![cfg_attr(not(feature = "std"), no_std)]

//! Garbled Boolean circuits with fixed-key AES, following the
//! "Efficient Garbling from a Fixed-Key Blockcipher" line of work
//! <https://eprint.iacr.org/2013/426>.
//!
//! A circuit is built gate by gate (AND, XOR, NOT plus two constant
//! wires), then garbled into a table and two 128-bit labels per wire
//! under one of three schemes:
//!
//! - **standard**: GRR3 row reduction, three table rows per AND, free
//!   XOR;
//! - **half-gates**: two rows per AND, free XOR;
//! - **privacy-free**: one row per AND, for verifiable-computation style
//!   uses where the evaluator knows its inputs.
//!
//! The evaluator receives the garbled tables, one label per input wire
//! ([`extract_labels`]) and either the output permutation bits or the
//! output label pairs ([`map_outputs`]) to translate its computed labels
//! back to cleartext bits.

extern crate alloc;

pub mod circuit;
pub mod error;
pub mod eval;
pub mod garble;
pub mod serialization;

pub use circuit::{GarbleType, GarbledCircuit, Gate, GateType};
pub use error::GarbleError;
pub use eval::{extract_labels, map_outputs};
