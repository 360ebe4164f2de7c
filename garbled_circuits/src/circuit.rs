//! Circuit representation and the builder API.

use ark_std::{rand::RngCore, vec::Vec};
use crypto_utils::{aes::BlockPrg, Block128};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GarbleType {
    /// GRR3 row reduction: three table rows per AND gate
    Standard,
    /// Two table rows per AND gate
    HalfGates,
    /// One table row per AND gate; only hides the inputs' labels, not
    /// their values
    PrivacyFree,
}

impl GarbleType {
    /// Table rows reserved per non-XOR gate.
    pub const fn table_rows(self) -> usize {
        match self {
            GarbleType::Standard => 3,
            GarbleType::HalfGates => 2,
            GarbleType::PrivacyFree => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateType {
    And,
    Xor,
    Not,
}

/// A gate over wire indices. NOT gates carry their input in both slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub gate_type: GateType,
    pub input0: usize,
    pub input1: usize,
    pub output: usize,
}

/// A Boolean circuit together with its garbling state. Wires `0 ..
/// num_inputs` are the inputs; the next two wires are the constants 0
/// and 1; gate outputs follow.
///
/// Building mutates the circuit in place and requires exclusive access,
/// as does the deterministic random-block generator used while garbling.
pub struct GarbledCircuit {
    pub garble_type: GarbleType,
    pub num_inputs: usize,
    pub num_outputs: usize,
    /// Frozen by [`Self::finish_building`]
    pub num_wires: usize,
    pub num_xors: usize,
    pub gates: Vec<Gate>,
    /// `table_rows()` blocks per non-XOR gate, in gate order
    pub table: Vec<Block128>,
    /// Two labels per wire, filled by garbling
    pub wires: Vec<Block128>,
    pub outputs: Vec<usize>,
    /// Low bit of each output wire's zero-label
    pub output_perms: Vec<bool>,
    /// Base label for the two constant wires
    pub fixed_label: Block128,
    /// Key for the fixed-key AES used by garbling and evaluation
    pub global_key: Block128,
    /// Next wire index handed out by the builder
    pub wire_index: usize,
    pub(crate) rand_source: Option<BlockPrg>,
}

impl GarbledCircuit {
    /// Create an empty circuit whose random blocks are drawn from an
    /// AES-CTR stream seeded from `rng`.
    pub fn new<R: RngCore>(
        rng: &mut R,
        num_inputs: usize,
        num_outputs: usize,
        garble_type: GarbleType,
    ) -> Self {
        let mut seed = [0u8; 16];
        rng.fill_bytes(&mut seed);
        Self::with_seed(num_inputs, num_outputs, garble_type, seed)
    }

    /// Like [`Self::new`] but with a caller-chosen generator seed, so a
    /// garbling can be reproduced exactly.
    pub fn with_seed(
        num_inputs: usize,
        num_outputs: usize,
        garble_type: GarbleType,
        seed: [u8; 16],
    ) -> Self {
        Self {
            garble_type,
            num_inputs,
            num_outputs,
            num_wires: 0,
            num_xors: 0,
            gates: Vec::new(),
            table: Vec::new(),
            wires: Vec::new(),
            outputs: Vec::new(),
            output_perms: ark_std::vec![false; num_outputs],
            fixed_label: Block128::zero(),
            global_key: Block128::zero(),
            wire_index: 0,
            rand_source: Some(BlockPrg::from_key_bytes(seed)),
        }
    }

    /// Position the wire cursor past the inputs and the two constant
    /// wires.
    pub fn start_building(&mut self) {
        self.wire_index = self.num_inputs + 2;
    }

    /// Hand out the next fresh wire index.
    pub fn next_wire(&mut self) -> usize {
        let index = self.wire_index;
        self.wire_index += 1;
        index
    }

    /// The wire carrying constant 0.
    pub fn wire_zero(&self) -> usize {
        self.num_inputs
    }

    /// The wire carrying constant 1.
    pub fn wire_one(&self) -> usize {
        self.num_inputs + 1
    }

    fn push_gate(&mut self, gate_type: GateType, input0: usize, input1: usize, output: usize) {
        self.gates.push(Gate {
            gate_type,
            input0,
            input1,
            output,
        });
    }

    pub fn gate_and(&mut self, input0: usize, input1: usize, output: usize) {
        self.push_gate(GateType::And, input0, input1, output);
    }

    pub fn gate_xor(&mut self, input0: usize, input1: usize, output: usize) {
        self.num_xors += 1;
        self.push_gate(GateType::Xor, input0, input1, output);
    }

    pub fn gate_not(&mut self, input: usize, output: usize) {
        self.push_gate(GateType::Not, input, input, output);
    }

    /// Left-fold of AND gates over two or more input wires; returns the
    /// output wire.
    pub fn circuit_and(&mut self, inputs: &[usize]) -> usize {
        assert!(inputs.len() >= 2, "circuit_and needs at least two inputs");

        let mut out = self.next_wire();
        self.gate_and(inputs[0], inputs[1], out);
        for &input in &inputs[2..] {
            let wire = self.next_wire();
            self.gate_and(input, out, wire);
            out = wire;
        }
        out
    }

    /// OR as De Morgan over AND and NOT; returns the output wire. Only
    /// sound under the standard scheme: privacy-free evaluation reads
    /// permutation bits as cleartext values, which a NOT output breaks.
    pub fn circuit_or(&mut self, inputs: &[usize]) -> usize {
        assert!(inputs.len() >= 2, "circuit_or needs at least two inputs");
        assert!(
            self.garble_type == GarbleType::Standard,
            "circuit_or requires the standard garbling scheme"
        );

        let negated: Vec<usize> = inputs
            .iter()
            .map(|&input| {
                let wire = self.next_wire();
                self.gate_not(input, wire);
                wire
            })
            .collect();
        let all_negated = self.circuit_and(&negated);
        let out = self.next_wire();
        self.gate_not(all_negated, out);
        out
    }

    /// Freeze the wire count and record the output wires.
    pub fn finish_building(&mut self, outputs: &[usize]) {
        assert_eq!(outputs.len(), self.num_outputs);
        self.num_wires = self.wire_index;
        self.outputs = outputs.to_vec();
    }

    /// The two labels of each input wire, available after garbling.
    pub fn input_label_pairs(&self) -> &[Block128] {
        &self.wires[..2 * self.num_inputs]
    }

    /// The two labels of each output wire, available after garbling.
    pub fn output_label_pairs(&self) -> Vec<Block128> {
        let mut pairs = Vec::with_capacity(2 * self.outputs.len());
        for &o in &self.outputs {
            pairs.push(self.wires[2 * o]);
            pairs.push(self.wires[2 * o + 1]);
        }
        pairs
    }

    /// Reinitialize the random-block generator, required after
    /// deserialization before the circuit can be garbled again.
    pub fn init_runtime_state(&mut self, seed: [u8; 16]) {
        self.rand_source = Some(BlockPrg::from_key_bytes(seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn wire_layout() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let mut gc = GarbledCircuit::new(&mut rng, 3, 1, GarbleType::Standard);

        assert_eq!(gc.wire_zero(), 3);
        assert_eq!(gc.wire_one(), 4);

        gc.start_building();
        assert_eq!(gc.next_wire(), 5);
        assert_eq!(gc.next_wire(), 6);

        let out = gc.next_wire();
        gc.gate_and(0, 1, out);
        gc.finish_building(&[out]);
        assert_eq!(gc.num_wires, 8);
    }

    #[test]
    fn xor_gates_are_counted() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let mut gc = GarbledCircuit::new(&mut rng, 2, 1, GarbleType::Standard);
        gc.start_building();

        let w1 = gc.next_wire();
        gc.gate_xor(0, 1, w1);
        let w2 = gc.next_wire();
        gc.gate_and(0, w1, w2);
        gc.finish_building(&[w2]);

        assert_eq!(gc.num_xors, 1);
        assert_eq!(gc.gates.len(), 2);
    }

    #[test]
    #[should_panic]
    fn circuit_and_needs_two_inputs() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let mut gc = GarbledCircuit::new(&mut rng, 1, 1, GarbleType::Standard);
        gc.start_building();
        gc.circuit_and(&[0]);
    }

    #[test]
    #[should_panic]
    fn circuit_or_rejects_half_gates() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let mut gc = GarbledCircuit::new(&mut rng, 2, 1, GarbleType::HalfGates);
        gc.start_building();
        gc.circuit_or(&[0, 1]);
    }
}
