//! Evaluation of a garbled circuit on extracted input labels, plus the
//! label utilities shared between garbler and evaluator.

use ark_std::{vec, vec::Vec};
use crypto_utils::{
    aes::{aes128_from_block, encrypt_block, Aes128},
    Block128,
};

use crate::{
    circuit::{GarbleType, GarbledCircuit, GateType},
    error::GarbleError,
    garble::double,
};

impl GarbledCircuit {
    /// Evaluate on one label per input wire. Returns the computed output
    /// labels and the cleartext output bits (the label's low bit XOR the
    /// recorded permutation bit).
    pub fn eval(&self, input_labels: &[Block128]) -> (Vec<Block128>, Vec<bool>) {
        assert_eq!(input_labels.len(), self.num_inputs);

        let mut labels = vec![Block128::zero(); self.num_wires];
        labels[..self.num_inputs].copy_from_slice(input_labels);
        labels[self.num_inputs] = self.fixed_label.with_lsb_cleared();
        labels[self.num_inputs + 1] = self.fixed_label.with_lsb_set();

        let cipher = aes128_from_block(&self.global_key);
        match self.garble_type {
            GarbleType::Standard => self.eval_standard(&cipher, &mut labels),
            GarbleType::HalfGates => self.eval_half_gates(&cipher, &mut labels),
            GarbleType::PrivacyFree => self.eval_privacy_free(&cipher, &mut labels),
        }

        let output_labels: Vec<Block128> = self.outputs.iter().map(|&o| labels[o]).collect();
        let outputs: Vec<bool> = output_labels
            .iter()
            .zip(self.output_perms.iter())
            .map(|(label, &perm)| (label.lsb() == 1) != perm)
            .collect();
        (output_labels, outputs)
    }

    fn eval_standard(&self, cipher: &Aes128, labels: &mut [Block128]) {
        let mut non_xor_idx = 0;
        for (idx, gate) in self.gates.iter().enumerate() {
            let a = labels[gate.input0];
            let b = labels[gate.input1];
            match gate.gate_type {
                GateType::Xor => {
                    labels[gate.output] = a ^ b;
                    continue;
                }
                GateType::Not => {
                    labels[gate.output] = a;
                }
                GateType::And => {
                    let base = 3 * non_xor_idx;
                    let row = 2 * a.lsb() as usize + b.lsb() as usize;

                    let tweak = Block128::new(idx as u64, 0);
                    let val = double(a) ^ double(double(b)) ^ tweak;
                    let mask = if row > 0 {
                        self.table[base + row - 1] ^ val
                    } else {
                        val
                    };
                    labels[gate.output] = encrypt_block(cipher, val) ^ mask;
                }
            }
            non_xor_idx += 1;
        }
    }

    fn eval_half_gates(&self, cipher: &Aes128, labels: &mut [Block128]) {
        let mut non_xor_idx = 0;
        for (idx, gate) in self.gates.iter().enumerate() {
            let a = labels[gate.input0];
            let b = labels[gate.input1];
            match gate.gate_type {
                GateType::Xor => {
                    labels[gate.output] = a ^ b;
                    continue;
                }
                GateType::Not => {
                    labels[gate.output] = a;
                }
                GateType::And => {
                    let base = 2 * non_xor_idx;
                    let sa = a.lsb() == 1;
                    let sb = b.lsb() == 1;
                    let tweak1 = Block128::new(2 * idx as u64, 0);
                    let tweak2 = Block128::new(2 * idx as u64 + 1, 0);

                    let ka = double(a) ^ tweak1;
                    let kb = double(b) ^ tweak2;
                    let ha = encrypt_block(cipher, ka) ^ ka;
                    let hb = encrypt_block(cipher, kb) ^ kb;

                    let mut w = ha ^ hb;
                    if sa {
                        w ^= self.table[base];
                    }
                    if sb {
                        w ^= self.table[base + 1] ^ a;
                    }
                    labels[gate.output] = w;
                }
            }
            non_xor_idx += 1;
        }
    }

    fn eval_privacy_free(&self, cipher: &Aes128, labels: &mut [Block128]) {
        let mut non_xor_idx = 0;
        for (idx, gate) in self.gates.iter().enumerate() {
            let a = labels[gate.input0];
            let b = labels[gate.input1];
            match gate.gate_type {
                GateType::Xor => {
                    labels[gate.output] = a ^ b;
                    continue;
                }
                GateType::Not => {
                    labels[gate.output] = a;
                }
                GateType::And => {
                    let base = non_xor_idx;
                    let sa = a.lsb() == 1;
                    let tweak = Block128::new(2 * idx as u64, 0);

                    let k = double(a) ^ tweak;
                    let h = encrypt_block(cipher, k) ^ k;
                    labels[gate.output] = if sa {
                        h.with_lsb_set() ^ b ^ self.table[base]
                    } else {
                        h.with_lsb_cleared()
                    };
                }
            }
            non_xor_idx += 1;
        }
    }
}

/// Select one label per input wire for a concrete input assignment.
/// `label_pairs` holds two labels per wire.
pub fn extract_labels(label_pairs: &[Block128], bits: &[bool]) -> Vec<Block128> {
    assert_eq!(label_pairs.len(), 2 * bits.len());
    bits.iter()
        .enumerate()
        .map(|(i, &bit)| label_pairs[2 * i + usize::from(bit)])
        .collect()
}

/// Translate computed output labels back to bits by lookup in the output
/// label pairs. A label matching neither stored label signals a
/// corrupted evaluation.
pub fn map_outputs(
    output_label_pairs: &[Block128],
    computed: &[Block128],
) -> Result<Vec<bool>, GarbleError> {
    assert_eq!(output_label_pairs.len(), 2 * computed.len());

    let mut bits = Vec::with_capacity(computed.len());
    for (i, label) in computed.iter().enumerate() {
        if *label == output_label_pairs[2 * i] {
            bits.push(false);
        } else if *label == output_label_pairs[2 * i + 1] {
            bits.push(true);
        } else {
            return Err(GarbleError::OutputLabelNotRecognized);
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    const ALL_TYPES: [GarbleType; 3] = [
        GarbleType::Standard,
        GarbleType::HalfGates,
        GarbleType::PrivacyFree,
    ];

    fn bits(n: usize, value: usize) -> Vec<bool> {
        (0..n).map(|i| (value >> i) & 1 == 1).collect()
    }

    /// Garble a single-gate circuit and evaluate it on all input
    /// combinations, checking both the direct output bits and the
    /// mapped ones.
    fn check_gate<F>(garble_type: GarbleType, num_inputs: usize, build: F, truth: &[bool])
    where
        F: Fn(&mut GarbledCircuit) -> usize,
    {
        let mut rng = StdRng::seed_from_u64(42u64);
        let mut gc = GarbledCircuit::new(&mut rng, num_inputs, 1, garble_type);
        gc.start_building();
        let out = build(&mut gc);
        gc.finish_building(&[out]);

        gc.garble(None).unwrap();
        let input_pairs = gc.input_label_pairs().to_vec();
        let output_pairs = gc.output_label_pairs();

        for (value, &expected) in truth.iter().enumerate() {
            let extracted = extract_labels(&input_pairs, &bits(num_inputs, value));
            let (output_labels, outputs) = gc.eval(&extracted);
            assert_eq!(outputs, [expected], "type {garble_type:?} input {value:b}");
            assert_eq!(
                map_outputs(&output_pairs, &output_labels).unwrap(),
                [expected]
            );
        }
    }

    #[test]
    fn and_gate_truth_table() {
        for garble_type in ALL_TYPES {
            check_gate(
                garble_type,
                2,
                |gc| {
                    let out = gc.next_wire();
                    gc.gate_and(0, 1, out);
                    out
                },
                &[false, false, false, true],
            );
        }
    }

    #[test]
    fn xor_gate_truth_table() {
        for garble_type in ALL_TYPES {
            check_gate(
                garble_type,
                2,
                |gc| {
                    let out = gc.next_wire();
                    gc.gate_xor(0, 1, out);
                    out
                },
                &[false, true, true, false],
            );
        }
    }

    #[test]
    fn not_gate_truth_table() {
        for garble_type in ALL_TYPES {
            check_gate(
                garble_type,
                1,
                |gc| {
                    let out = gc.next_wire();
                    gc.gate_not(0, out);
                    out
                },
                &[true, false],
            );
        }
    }

    #[test]
    fn multi_input_and() {
        for garble_type in ALL_TYPES {
            for num_inputs in 2..=5 {
                let truth: Vec<bool> = (0..1usize << num_inputs)
                    .map(|v| v == (1 << num_inputs) - 1)
                    .collect();
                check_gate(garble_type, num_inputs, |gc| gc.circuit_and(&(0..num_inputs).collect::<Vec<_>>()), &truth);
            }
        }
    }

    #[test]
    fn or_circuit() {
        for num_inputs in 2..=4 {
            let truth: Vec<bool> = (0..1usize << num_inputs).map(|v| v != 0).collect();
            check_gate(
                GarbleType::Standard,
                num_inputs,
                |gc| gc.circuit_or(&(0..num_inputs).collect::<Vec<_>>()),
                &truth,
            );
        }
    }

    #[test]
    fn constant_wires_feed_gates() {
        for garble_type in ALL_TYPES {
            let mut rng = StdRng::seed_from_u64(7u64);
            let mut gc = GarbledCircuit::new(&mut rng, 1, 2, garble_type);
            gc.start_building();

            // x AND 1 = x; x AND 0 = 0
            let w_one = gc.next_wire();
            gc.gate_and(0, gc.wire_one(), w_one);
            let w_zero = gc.next_wire();
            gc.gate_and(0, gc.wire_zero(), w_zero);
            gc.finish_building(&[w_one, w_zero]);

            gc.garble(None).unwrap();
            let input_pairs = gc.input_label_pairs().to_vec();

            for x in [false, true] {
                let extracted = extract_labels(&input_pairs, &[x]);
                let (_, outputs) = gc.eval(&extracted);
                assert_eq!(outputs, [x, false], "type {garble_type:?}");
            }
        }
    }

    #[test]
    fn mixed_gate_circuit() {
        // f(x, y, z) = (x XOR y) AND (NOT z)
        for garble_type in [GarbleType::Standard, GarbleType::HalfGates] {
            let mut rng = StdRng::seed_from_u64(9u64);
            let mut gc = GarbledCircuit::new(&mut rng, 3, 1, garble_type);
            gc.start_building();

            let w_xor = gc.next_wire();
            gc.gate_xor(0, 1, w_xor);
            let w_not = gc.next_wire();
            gc.gate_not(2, w_not);
            let w_out = gc.next_wire();
            gc.gate_and(w_xor, w_not, w_out);
            gc.finish_building(&[w_out]);

            gc.garble(None).unwrap();
            let input_pairs = gc.input_label_pairs().to_vec();

            for value in 0..8 {
                let input = bits(3, value);
                let expected = (input[0] != input[1]) && !input[2];
                let extracted = extract_labels(&input_pairs, &input);
                let (_, outputs) = gc.eval(&extracted);
                assert_eq!(outputs, [expected], "type {garble_type:?} input {value:b}");
            }
        }
    }

    #[test]
    fn caller_supplied_input_labels() {
        let mut rng = StdRng::seed_from_u64(11u64);
        let mut gc = GarbledCircuit::new(&mut rng, 2, 1, GarbleType::HalfGates);
        gc.start_building();
        let out = gc.next_wire();
        gc.gate_and(0, 1, out);
        gc.finish_building(&[out]);

        // one shared offset across all wires, low bit set
        let delta = Block128::random(&mut rng).with_lsb_set();
        let mut labels = Vec::new();
        for _ in 0..2 {
            let l0 = Block128::random(&mut rng);
            labels.push(l0);
            labels.push(l0 ^ delta);
        }

        gc.garble(Some(&labels)).unwrap();
        assert_eq!(gc.input_label_pairs(), &labels[..]);

        for value in 0..4 {
            let input = bits(2, value);
            let extracted = extract_labels(&labels, &input);
            let (_, outputs) = gc.eval(&extracted);
            assert_eq!(outputs, [value == 3]);
        }
    }

    #[test]
    fn corrupted_output_label_detected() {
        let mut rng = StdRng::seed_from_u64(13u64);
        let mut gc = GarbledCircuit::new(&mut rng, 2, 1, GarbleType::Standard);
        gc.start_building();
        let out = gc.next_wire();
        gc.gate_and(0, 1, out);
        gc.finish_building(&[out]);

        gc.garble(None).unwrap();
        let input_pairs = gc.input_label_pairs().to_vec();
        let output_pairs = gc.output_label_pairs();

        let extracted = extract_labels(&input_pairs, &[true, true]);
        let (mut output_labels, _) = gc.eval(&extracted);
        output_labels[0] ^= Block128::new(0, 1 << 17);
        assert_eq!(
            map_outputs(&output_pairs, &output_labels),
            Err(GarbleError::OutputLabelNotRecognized)
        );
    }
}
