//! Little-endian binary format for shipping a garbled circuit to the
//! evaluator. The runtime random-block generator is not part of the
//! format; a deserialized circuit must be reseeded via
//! [`GarbledCircuit::init_runtime_state`] before it can garble again.

use ark_std::{vec, vec::Vec};
use byteorder::{ByteOrder, LittleEndian};
use crypto_utils::Block128;

use crate::{
    circuit::{GarbleType, GarbledCircuit, Gate, GateType},
    error::GarbleError,
};

impl GarbleType {
    fn to_u32(self) -> u32 {
        match self {
            GarbleType::Standard => 0,
            GarbleType::HalfGates => 1,
            GarbleType::PrivacyFree => 2,
        }
    }

    fn from_u32(v: u32) -> Result<Self, GarbleError> {
        match v {
            0 => Ok(GarbleType::Standard),
            1 => Ok(GarbleType::HalfGates),
            2 => Ok(GarbleType::PrivacyFree),
            _ => Err(GarbleError::InvalidEncoding("garble type")),
        }
    }
}

impl GateType {
    fn to_u32(self) -> u32 {
        match self {
            GateType::And => 0,
            GateType::Xor => 1,
            GateType::Not => 2,
        }
    }

    fn from_u32(v: u32) -> Result<Self, GarbleError> {
        match v {
            0 => Ok(GateType::And),
            1 => Ok(GateType::Xor),
            2 => Ok(GateType::Not),
            _ => Err(GarbleError::InvalidEncoding("gate type")),
        }
    }
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    let mut bytes = [0u8; 4];
    LittleEndian::write_u32(&mut bytes, v);
    buf.extend_from_slice(&bytes);
}

fn get_u32(data: &[u8], offset: &mut usize, what: &'static str) -> Result<u32, GarbleError> {
    if *offset + 4 > data.len() {
        return Err(GarbleError::InvalidEncoding(what));
    }
    let v = LittleEndian::read_u32(&data[*offset..*offset + 4]);
    *offset += 4;
    Ok(v)
}

fn get_block(data: &[u8], offset: &mut usize, what: &'static str) -> Result<Block128, GarbleError> {
    if *offset + Block128::BYTES > data.len() {
        return Err(GarbleError::InvalidEncoding(what));
    }
    let mut bytes = [0u8; Block128::BYTES];
    bytes.copy_from_slice(&data[*offset..*offset + Block128::BYTES]);
    *offset += Block128::BYTES;
    Ok(Block128::from_bytes(&bytes))
}

impl GarbledCircuit {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            4 * 6
                + self.gates.len() * 16
                + (self.table.len() + self.wires.len()) * Block128::BYTES
                + self.outputs.len() * 4
                + 4
                + (self.output_perms.len() + 7) / 8
                + 2 * Block128::BYTES
                + 4,
        );

        put_u32(&mut buf, self.garble_type.to_u32());
        put_u32(&mut buf, self.num_inputs as u32);
        put_u32(&mut buf, self.num_wires as u32);
        put_u32(&mut buf, self.num_xors as u32);

        put_u32(&mut buf, self.gates.len() as u32);
        for gate in &self.gates {
            put_u32(&mut buf, gate.gate_type.to_u32());
            put_u32(&mut buf, gate.input0 as u32);
            put_u32(&mut buf, gate.input1 as u32);
            put_u32(&mut buf, gate.output as u32);
        }

        put_u32(&mut buf, self.table.len() as u32);
        for block in &self.table {
            buf.extend_from_slice(&block.to_bytes());
        }

        put_u32(&mut buf, self.wires.len() as u32);
        for block in &self.wires {
            buf.extend_from_slice(&block.to_bytes());
        }

        put_u32(&mut buf, self.outputs.len() as u32);
        for &o in &self.outputs {
            put_u32(&mut buf, o as u32);
        }

        // permutation bits packed eight per byte, LSB first
        put_u32(&mut buf, self.output_perms.len() as u32);
        for chunk in self.output_perms.chunks(8) {
            let mut packed = 0u8;
            for (j, &bit) in chunk.iter().enumerate() {
                if bit {
                    packed |= 1 << j;
                }
            }
            buf.push(packed);
        }

        buf.extend_from_slice(&self.fixed_label.to_bytes());
        buf.extend_from_slice(&self.global_key.to_bytes());
        put_u32(&mut buf, self.wire_index as u32);

        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, GarbleError> {
        let mut offset = 0;

        let garble_type = GarbleType::from_u32(get_u32(data, &mut offset, "type")?)?;
        let num_inputs = get_u32(data, &mut offset, "num inputs")? as usize;
        let num_wires = get_u32(data, &mut offset, "num wires")? as usize;
        let num_xors = get_u32(data, &mut offset, "num xors")? as usize;

        let gate_count = get_u32(data, &mut offset, "gate count")? as usize;
        if offset + gate_count * 16 > data.len() {
            return Err(GarbleError::InvalidEncoding("gates"));
        }
        let mut gates = Vec::with_capacity(gate_count);
        for _ in 0..gate_count {
            let gate_type = GateType::from_u32(get_u32(data, &mut offset, "gate")?)?;
            let input0 = get_u32(data, &mut offset, "gate")? as usize;
            let input1 = get_u32(data, &mut offset, "gate")? as usize;
            let output = get_u32(data, &mut offset, "gate")? as usize;
            gates.push(Gate {
                gate_type,
                input0,
                input1,
                output,
            });
        }

        let table_count = get_u32(data, &mut offset, "table count")? as usize;
        if offset + table_count * Block128::BYTES > data.len() {
            return Err(GarbleError::InvalidEncoding("table"));
        }
        let mut table = Vec::with_capacity(table_count);
        for _ in 0..table_count {
            table.push(get_block(data, &mut offset, "table")?);
        }

        let wire_count = get_u32(data, &mut offset, "wire count")? as usize;
        if offset + wire_count * Block128::BYTES > data.len() {
            return Err(GarbleError::InvalidEncoding("wires"));
        }
        let mut wires = Vec::with_capacity(wire_count);
        for _ in 0..wire_count {
            wires.push(get_block(data, &mut offset, "wires")?);
        }

        let output_count = get_u32(data, &mut offset, "output count")? as usize;
        if offset + output_count * 4 > data.len() {
            return Err(GarbleError::InvalidEncoding("outputs"));
        }
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(get_u32(data, &mut offset, "outputs")? as usize);
        }

        let perm_count = get_u32(data, &mut offset, "perm count")? as usize;
        let packed_len = (perm_count + 7) / 8;
        if offset + packed_len > data.len() {
            return Err(GarbleError::InvalidEncoding("output perms"));
        }
        let mut output_perms = vec![false; perm_count];
        for (i, perm) in output_perms.iter_mut().enumerate() {
            *perm = data[offset + i / 8] & (1 << (i % 8)) != 0;
        }
        offset += packed_len;

        let fixed_label = get_block(data, &mut offset, "fixed label")?;
        let global_key = get_block(data, &mut offset, "global key")?;
        let wire_index = get_u32(data, &mut offset, "wire index")? as usize;

        Ok(Self {
            garble_type,
            num_inputs,
            num_outputs: outputs.len(),
            num_wires,
            num_xors,
            gates,
            table,
            wires,
            outputs,
            output_perms,
            fixed_label,
            global_key,
            wire_index,
            rand_source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::extract_labels;
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    fn sample_circuit(garble_type: GarbleType) -> GarbledCircuit {
        let mut rng = StdRng::seed_from_u64(5u64);
        let mut gc = GarbledCircuit::new(&mut rng, 3, 1, garble_type);
        gc.start_building();
        let w = gc.next_wire();
        gc.gate_xor(0, 1, w);
        let out = gc.next_wire();
        gc.gate_and(w, 2, out);
        gc.finish_building(&[out]);
        gc.garble(None).unwrap();
        gc
    }

    #[test]
    fn round_trip_preserves_evaluation() {
        for garble_type in [
            GarbleType::Standard,
            GarbleType::HalfGates,
            GarbleType::PrivacyFree,
        ] {
            let gc = sample_circuit(garble_type);
            let bytes = gc.to_bytes();
            let decoded = GarbledCircuit::from_bytes(&bytes).unwrap();

            assert_eq!(decoded.garble_type, gc.garble_type);
            assert_eq!(decoded.num_inputs, gc.num_inputs);
            assert_eq!(decoded.num_wires, gc.num_wires);
            assert_eq!(decoded.num_xors, gc.num_xors);
            assert_eq!(decoded.gates, gc.gates);
            assert_eq!(decoded.table, gc.table);
            assert_eq!(decoded.wires, gc.wires);
            assert_eq!(decoded.outputs, gc.outputs);
            assert_eq!(decoded.output_perms, gc.output_perms);
            assert_eq!(decoded.fixed_label, gc.fixed_label);
            assert_eq!(decoded.global_key, gc.global_key);
            assert_eq!(decoded.wire_index, gc.wire_index);

            // the decoded circuit evaluates identically
            let pairs = gc.input_label_pairs().to_vec();
            for value in 0..8usize {
                let input: Vec<bool> = (0..3).map(|i| (value >> i) & 1 == 1).collect();
                let extracted = extract_labels(&pairs, &input);
                assert_eq!(gc.eval(&extracted), decoded.eval(&extracted));
            }
        }
    }

    #[test]
    fn reseeded_circuit_garbles_again() {
        let gc = sample_circuit(GarbleType::HalfGates);
        let mut decoded = GarbledCircuit::from_bytes(&gc.to_bytes()).unwrap();

        assert!(matches!(
            decoded.garble(None),
            Err(GarbleError::RandomSourceNotSeeded)
        ));

        decoded.init_runtime_state([3u8; 16]);
        decoded.garble(None).unwrap();

        let pairs = decoded.input_label_pairs().to_vec();
        let extracted = extract_labels(&pairs, &[true, false, true]);
        let (_, outputs) = decoded.eval(&extracted);
        // (1 XOR 0) AND 1
        assert_eq!(outputs, [true]);
    }

    #[test]
    fn truncation_rejected() {
        let gc = sample_circuit(GarbleType::Standard);
        let bytes = gc.to_bytes();
        for cut in [0, 3, 10, bytes.len() / 2, bytes.len() - 1] {
            assert!(GarbledCircuit::from_bytes(&bytes[..cut]).is_err());
        }
    }

    #[test]
    fn junk_type_fields_rejected() {
        let gc = sample_circuit(GarbleType::Standard);
        let mut bytes = gc.to_bytes();
        bytes[0] = 9;
        assert!(matches!(
            GarbledCircuit::from_bytes(&bytes),
            Err(GarbleError::InvalidEncoding("garble type"))
        ));

        let mut bytes = gc.to_bytes();
        // first gate's type field
        bytes[20] = 7;
        assert!(matches!(
            GarbledCircuit::from_bytes(&bytes),
            Err(GarbleError::InvalidEncoding("gate type"))
        ));
    }
}
