//! Garbling: assign two labels per wire and emit the per-gate tables.

use ark_std::vec;
use crypto_utils::{
    aes::{aes128_from_block, encrypt_blocks, Aes128},
    Block128,
};

use crate::{
    circuit::{GarbleType, GarbledCircuit, GateType},
    error::GarbleError,
};

/// Shift each 64-bit lane left by one; the cheap "doubling" applied to
/// labels before fixed-key AES.
pub(crate) fn double(b: Block128) -> Block128 {
    Block128::new(b.hi << 1, b.lo << 1)
}

impl GarbledCircuit {
    fn random_block(&mut self) -> Result<Block128, GarbleError> {
        match self.rand_source.as_mut() {
            Some(prg) => Ok(prg.next_block()),
            None => Err(GarbleError::RandomSourceNotSeeded),
        }
    }

    /// The free-XOR offset: random with the low bit forced to 1 so the
    /// two labels of every wire differ in their permutation bit.
    fn create_delta(&mut self) -> Result<Block128, GarbleError> {
        Ok(self.random_block()?.with_lsb_set())
    }

    /// Garble the finished circuit. With `input_labels` the caller
    /// supplies the two labels per input wire (all sharing one XOR
    /// offset); otherwise fresh labels are drawn from the circuit's
    /// block generator. Fills `wires`, `table` and `output_perms`.
    pub fn garble(&mut self, input_labels: Option<&[Block128]>) -> Result<(), GarbleError> {
        self.wires = vec![Block128::zero(); 2 * self.num_wires];
        self.table = vec![
            Block128::zero();
            (self.gates.len() - self.num_xors) * self.garble_type.table_rows()
        ];

        let delta = match input_labels {
            Some(labels) => {
                self.wires[..2 * self.num_inputs].copy_from_slice(&labels[..2 * self.num_inputs]);
                self.wires[0] ^ self.wires[1]
            }
            None => {
                let delta = self.create_delta()?;
                for i in 0..self.num_inputs {
                    let mut label0 = self.random_block()?;
                    if self.garble_type == GarbleType::PrivacyFree {
                        // canonical permutation bits: the zero-label's
                        // low bit is the wire's cleartext value
                        label0 = label0.with_lsb_cleared();
                    }
                    self.wires[2 * i] = label0;
                    self.wires[2 * i + 1] = label0 ^ delta;
                }
                delta
            }
        };

        // constant wires: the 0-wire's zero-label and the 1-wire's
        // one-label share the fixed label
        let fixed_label = self.random_block()?;
        self.fixed_label = fixed_label;
        let low = fixed_label.with_lsb_cleared();
        let high = fixed_label.with_lsb_set();
        self.wires[2 * self.num_inputs] = low;
        self.wires[2 * self.num_inputs + 1] = low ^ delta;
        self.wires[2 * (self.num_inputs + 1)] = high ^ delta;
        self.wires[2 * (self.num_inputs + 1) + 1] = high;

        self.global_key = self.random_block()?;
        let cipher = aes128_from_block(&self.global_key);

        match self.garble_type {
            GarbleType::Standard => self.garble_standard(&cipher, delta),
            GarbleType::HalfGates => self.garble_half_gates(&cipher, delta),
            GarbleType::PrivacyFree => self.garble_privacy_free(&cipher, delta),
        }

        for (i, &o) in self.outputs.iter().enumerate() {
            self.output_perms[i] = self.wires[2 * o].lsb() == 1;
        }

        Ok(())
    }

    fn garble_standard(&mut self, cipher: &Aes128, delta: Block128) {
        let mut non_xor_idx = 0;
        for idx in 0..self.gates.len() {
            let gate = self.gates[idx];
            let a0 = self.wires[2 * gate.input0];
            let a1 = self.wires[2 * gate.input0 + 1];
            let b0 = self.wires[2 * gate.input1];
            let b1 = self.wires[2 * gate.input1 + 1];

            match gate.gate_type {
                GateType::Xor => {
                    let out0 = a0 ^ b0;
                    self.wires[2 * gate.output] = out0;
                    self.wires[2 * gate.output + 1] = out0 ^ delta;
                    continue;
                }
                GateType::Not => {
                    self.wires[2 * gate.output] = a1;
                    self.wires[2 * gate.output + 1] = a0;
                }
                GateType::And => {
                    let base = 3 * non_xor_idx;
                    let tweak = Block128::new(idx as u64, 0);
                    let lsb0 = a0.lsb() as usize;
                    let lsb1 = b0.lsb() as usize;

                    let da0 = double(a0);
                    let da1 = double(a1);
                    let db0 = double(double(b0));
                    let db1 = double(double(b1));

                    let mut keys = [
                        da0 ^ db0 ^ tweak,
                        da0 ^ db1 ^ tweak,
                        da1 ^ db0 ^ tweak,
                        da1 ^ db1 ^ tweak,
                    ];
                    let mut masks = keys;
                    encrypt_blocks(cipher, &mut keys);
                    for k in 0..4 {
                        masks[k] ^= keys[k];
                    }

                    // the row the evaluator reconstructs without a table
                    // entry carries the output label directly (GRR3)
                    let new_token = masks[2 * lsb0 + lsb1];
                    let new_token2 = delta ^ new_token;
                    let (label0, label1) = if lsb0 & lsb1 == 1 {
                        (new_token2, new_token)
                    } else {
                        (new_token, new_token2)
                    };
                    self.wires[2 * gate.output] = label0;
                    self.wires[2 * gate.output + 1] = label1;

                    // AND outputs the one-label only for input pair (1,1)
                    let blocks = [label0, label0, label0, label1];
                    let rows = [
                        2 * lsb0 + lsb1,
                        2 * lsb0 + 1 - lsb1,
                        2 * (1 - lsb0) + lsb1,
                        2 * (1 - lsb0) + (1 - lsb1),
                    ];
                    for k in 0..4 {
                        if rows[k] != 0 {
                            self.table[base + rows[k] - 1] = blocks[k] ^ masks[k];
                        }
                    }
                }
            }
            non_xor_idx += 1;
        }
    }

    fn garble_half_gates(&mut self, cipher: &Aes128, delta: Block128) {
        let mut non_xor_idx = 0;
        for idx in 0..self.gates.len() {
            let gate = self.gates[idx];
            let a0 = self.wires[2 * gate.input0];
            let a1 = self.wires[2 * gate.input0 + 1];
            let b0 = self.wires[2 * gate.input1];
            let b1 = self.wires[2 * gate.input1 + 1];

            match gate.gate_type {
                GateType::Xor => {
                    let out0 = a0 ^ b0;
                    self.wires[2 * gate.output] = out0;
                    self.wires[2 * gate.output + 1] = out0 ^ delta;
                    continue;
                }
                GateType::Not => {
                    self.wires[2 * gate.output] = a1;
                    self.wires[2 * gate.output + 1] = a0;
                }
                GateType::And => {
                    let base = 2 * non_xor_idx;
                    let pa = a0.lsb() == 1;
                    let pb = b0.lsb() == 1;
                    let tweak1 = Block128::new(2 * idx as u64, 0);
                    let tweak2 = Block128::new(2 * idx as u64 + 1, 0);

                    let mut keys = [
                        double(a0) ^ tweak1,
                        double(a1) ^ tweak1,
                        double(b0) ^ tweak2,
                        double(b1) ^ tweak2,
                    ];
                    let masks = keys;
                    encrypt_blocks(cipher, &mut keys);
                    let ha0 = keys[0] ^ masks[0];
                    let ha1 = keys[1] ^ masks[1];
                    let hb0 = keys[2] ^ masks[2];
                    let hb1 = keys[3] ^ masks[3];

                    // generator half gate
                    let mut row0 = ha0 ^ ha1;
                    if pb {
                        row0 ^= delta;
                    }
                    let mut w0 = ha0;
                    if pa {
                        w0 ^= row0;
                    }
                    // evaluator half gate
                    let row1 = hb0 ^ hb1 ^ a0;
                    w0 ^= hb0;
                    if pb {
                        w0 ^= row1 ^ a0;
                    }

                    self.table[base] = row0;
                    self.table[base + 1] = row1;
                    self.wires[2 * gate.output] = w0;
                    self.wires[2 * gate.output + 1] = w0 ^ delta;
                }
            }
            non_xor_idx += 1;
        }
    }

    fn garble_privacy_free(&mut self, cipher: &Aes128, delta: Block128) {
        let mut non_xor_idx = 0;
        for idx in 0..self.gates.len() {
            let gate = self.gates[idx];
            let a0 = self.wires[2 * gate.input0];
            let a1 = self.wires[2 * gate.input0 + 1];
            let b0 = self.wires[2 * gate.input1];

            match gate.gate_type {
                GateType::Xor => {
                    let out0 = a0 ^ b0;
                    self.wires[2 * gate.output] = out0;
                    self.wires[2 * gate.output + 1] = out0 ^ delta;
                    continue;
                }
                GateType::Not => {
                    self.wires[2 * gate.output] = a1;
                    self.wires[2 * gate.output + 1] = a0;
                }
                GateType::And => {
                    let base = non_xor_idx;
                    let tweak = Block128::new(2 * idx as u64, 0);

                    let mut keys = [double(a0) ^ tweak, double(a1) ^ tweak];
                    let masks = keys;
                    encrypt_blocks(cipher, &mut keys);
                    // forced low bits make the hash outputs carry their
                    // input's cleartext value
                    let ha0 = (keys[0] ^ masks[0]).with_lsb_cleared();
                    let ha1 = (keys[1] ^ masks[1]).with_lsb_set();

                    self.table[base] = ha0 ^ ha1 ^ b0;
                    self.wires[2 * gate.output] = ha0;
                    self.wires[2 * gate.output + 1] = ha0 ^ delta;
                }
            }
            non_xor_idx += 1;
        }
    }
}
