// -*- mode: rust; -*-
//
// This file is part of `croesus`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! The fixed two-bit comparator `(x0 > y0) OR ((x0 = y0) AND (x1 >= y1))`,
//! expressed as a small arena of gate records over shared wire slots.

use crate::{
    errors::GarbleError,
    gate::{decode_plain, GarbledGate, TruthTable, WireKeyPair},
};
use barnacle::{AbstractChannel, WireKey};
use rand::{CryptoRng, Rng};
use std::collections::HashMap;

/// Number of input bits per party. Bit 0 is the most significant.
pub const INPUT_BITS: usize = 2;

/// Largest private input the comparator accepts.
pub const MAX_INPUT: u64 = (1 << INPUT_BITS) - 1;

/// Index of a wire slot in a topology. Gates that share a slot are chained:
/// the producer's output keys are the consumer's input keys.
pub type WireId = usize;

/// The boolean functions available as gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOp {
    /// `l AND r`
    And,
    /// `l OR r`
    Or,
    /// `l > r`, i.e. `l AND NOT r`
    Gt,
    /// `l = r`
    Eq,
    /// `l >= r`, i.e. `l OR NOT r`
    Geq,
}

impl GateOp {
    /// Evaluate the op on plain bits.
    pub fn eval(&self, l: bool, r: bool) -> bool {
        match self {
            GateOp::And => l && r,
            GateOp::Or => l || r,
            GateOp::Gt => l && !r,
            GateOp::Eq => l == r,
            GateOp::Geq => l || !r,
        }
    }

    fn truth_table(&self, out: Option<&WireKeyPair>) -> TruthTable {
        TruthTable::from_fn(|l, r| self.eval(l, r), out)
    }
}

/// One gate record: an op plus the wire slots it reads and feeds. The final
/// gate has no output slot and is garbled with a plain table instead.
#[derive(Clone, Copy, Debug)]
pub struct Gate {
    /// The boolean function this gate computes.
    pub op: GateOp,
    /// Wire slot of the left input.
    pub left: WireId,
    /// Wire slot of the right input.
    pub right: WireId,
    /// Wire slot the output key lands in; `None` marks the output gate.
    pub out: Option<WireId>,
}

/// One use of a party's input bit as the input of a specific gate. A bit
/// that fans out into several gates has one occurrence per gate, each with
/// an independently sampled key pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputBit {
    /// Bit position, 0 being the most significant.
    pub bit: usize,
    /// Fan-out occurrence index within that bit.
    pub occurrence: usize,
}

/// Wiring of a garbleable circuit: wire slots, gate records in evaluation
/// order, and both parties' input occurrences.
pub struct Topology {
    wires: usize,
    gates: Vec<Gate>,
    garbler_inputs: Vec<(InputBit, WireId)>,
    evaluator_inputs: Vec<(InputBit, WireId)>,
}

impl Topology {
    /// The two-bit `x >= y` comparator.
    ///
    /// Slot layout: `0` or.left, `1` or.right, `2` gt.left, `3` gt.right,
    /// `4` and.left, `5` and.right, `6` eq.left, `7` eq.right, `8` geq.left,
    /// `9` geq.right. The or gate is the output gate, so no slot is
    /// allocated for its own output keys.
    pub fn comparator() -> Self {
        let gates = vec![
            Gate {
                op: GateOp::Geq,
                left: 8,
                right: 9,
                out: Some(5),
            },
            Gate {
                op: GateOp::Eq,
                left: 6,
                right: 7,
                out: Some(4),
            },
            Gate {
                op: GateOp::And,
                left: 4,
                right: 5,
                out: Some(1),
            },
            Gate {
                op: GateOp::Gt,
                left: 2,
                right: 3,
                out: Some(0),
            },
            Gate {
                op: GateOp::Or,
                left: 0,
                right: 1,
                out: None,
            },
        ];
        // x0 fans out into gt and eq; x1 feeds geq only. Same on the right
        // for y.
        let garbler_inputs = vec![
            (
                InputBit {
                    bit: 0,
                    occurrence: 0,
                },
                2,
            ),
            (
                InputBit {
                    bit: 0,
                    occurrence: 1,
                },
                6,
            ),
            (
                InputBit {
                    bit: 1,
                    occurrence: 0,
                },
                8,
            ),
        ];
        let evaluator_inputs = vec![
            (
                InputBit {
                    bit: 0,
                    occurrence: 0,
                },
                3,
            ),
            (
                InputBit {
                    bit: 0,
                    occurrence: 1,
                },
                7,
            ),
            (
                InputBit {
                    bit: 1,
                    occurrence: 0,
                },
                9,
            ),
        ];
        Self {
            wires: 10,
            gates,
            garbler_inputs,
            evaluator_inputs,
        }
    }

    /// Gate records in evaluation order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of wire slots.
    pub fn wires(&self) -> usize {
        self.wires
    }

    /// The garbler's input occurrences, in disclosure order.
    pub fn garbler_inputs(&self) -> &[(InputBit, WireId)] {
        &self.garbler_inputs
    }

    /// The evaluator's input occurrences, in transfer order.
    pub fn evaluator_inputs(&self) -> &[(InputBit, WireId)] {
        &self.evaluator_inputs
    }
}

/// Big-endian bit decomposition of a two-bit input; index 0 is the most
/// significant bit.
pub fn bits(value: u64) -> [bool; INPUT_BITS] {
    [(value >> 1) & 1 == 1, value & 1 == 1]
}

/// A party's view of its input wires: a flat map from `(bit, occurrence)`
/// to the key pair sampled for that occurrence.
pub struct KeyMap {
    keys: HashMap<InputBit, WireKeyPair>,
    order: Vec<InputBit>,
}

impl KeyMap {
    fn new(inputs: &[(InputBit, WireId)], pairs: &[WireKeyPair]) -> Self {
        let mut keys = HashMap::with_capacity(inputs.len());
        let mut order = Vec::with_capacity(inputs.len());
        for (input, wire) in inputs.iter() {
            keys.insert(*input, pairs[*wire]);
            order.push(*input);
        }
        Self { keys, order }
    }

    /// Look up the pair for one occurrence.
    pub fn get(&self, bit: usize, occurrence: usize) -> Option<&WireKeyPair> {
        self.keys.get(&InputBit { bit, occurrence })
    }

    /// Key pairs in topology order.
    pub fn pairs(&self) -> Vec<(InputBit, WireKeyPair)> {
        self.order
            .iter()
            .map(|input| (*input, self.keys[input]))
            .collect()
    }

    /// The keys this party discloses for its input `bits`, one per
    /// occurrence, in topology order.
    pub fn select(&self, bits: &[bool; INPUT_BITS]) -> Vec<WireKey> {
        self.order
            .iter()
            .map(|input| self.keys[input].select(bits[input.bit]))
            .collect()
    }
}

/// The garbled gates of one topology, in evaluation order.
pub struct GarbledCircuit {
    gates: Vec<GarbledGate>,
}

/// Garble `topology`: sample a fresh key pair for every wire slot, build
/// each gate's table, and split out the two parties' input key maps.
///
/// Slots are sampled in index order, output-side gates first, so a gate's
/// keyed truth table always refers to an already-sampled downstream pair.
pub fn garble<RNG: CryptoRng + Rng>(
    topology: &Topology,
    rng: &mut RNG,
) -> Result<(GarbledCircuit, KeyMap, KeyMap), GarbleError> {
    let pairs = (0..topology.wires())
        .map(|_| WireKeyPair::rand(rng))
        .collect::<Result<Vec<WireKeyPair>, GarbleError>>()?;
    let gates = topology
        .gates()
        .iter()
        .map(|gate| {
            let table = gate.op.truth_table(gate.out.map(|wire| &pairs[wire]));
            GarbledGate::garble(&pairs[gate.left], &pairs[gate.right], &table, rng)
        })
        .collect::<Result<Vec<GarbledGate>, GarbleError>>()?;
    let garbler_keys = KeyMap::new(topology.garbler_inputs(), &pairs);
    let evaluator_keys = KeyMap::new(topology.evaluator_inputs(), &pairs);
    Ok((GarbledCircuit { gates }, garbler_keys, evaluator_keys))
}

impl GarbledCircuit {
    /// Evaluate the circuit given one key per input wire slot.
    ///
    /// Gates run in stored order; each internal gate's output key lands in
    /// its output slot for the gates downstream, and the output gate's
    /// plain cell decodes to the circuit result.
    pub fn evaluate(
        &self,
        topology: &Topology,
        inputs: &HashMap<WireId, WireKey>,
    ) -> Result<bool, GarbleError> {
        if self.gates.len() != topology.gates().len() {
            return Err(GarbleError::GateCountMismatch {
                got: self.gates.len(),
                needed: topology.gates().len(),
            });
        }
        let mut slots: Vec<Option<WireKey>> = vec![None; topology.wires()];
        for (wire, key) in inputs.iter() {
            slots[*wire] = Some(*key);
        }
        let mut output = None;
        for (gate, garbled) in topology.gates().iter().zip(self.gates.iter()) {
            let left = slots[gate.left].ok_or(GarbleError::UninitializedWire(gate.left))?;
            let right = slots[gate.right].ok_or(GarbleError::UninitializedWire(gate.right))?;
            let value = garbled.evaluate(&left, &right)?;
            match gate.out {
                Some(wire) => {
                    let key = WireKey::try_from(&value[..]).map_err(|_| {
                        GarbleError::InvalidValueLength {
                            got: value.len(),
                            needed: WireKey::LEN,
                        }
                    })?;
                    slots[wire] = Some(key);
                }
                None => output = Some(decode_plain(&value)?),
            }
        }
        output.ok_or(GarbleError::NoOutputGate)
    }

    /// Write all gate tables to `channel`.
    pub fn write<C: AbstractChannel>(&self, channel: &mut C) -> std::io::Result<()> {
        for gate in self.gates.iter() {
            gate.write(channel)?;
        }
        Ok(())
    }

    /// Read a circuit's gate tables from `channel`.
    pub fn read<C: AbstractChannel>(
        topology: &Topology,
        channel: &mut C,
    ) -> std::io::Result<Self> {
        let gates = (0..topology.gates().len())
            .map(|_| GarbledGate::read(channel))
            .collect::<std::io::Result<Vec<GarbledGate>>>()?;
        Ok(Self { gates })
    }
}
