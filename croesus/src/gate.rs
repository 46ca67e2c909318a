// -*- mode: rust; -*-
//
// This file is part of `croesus`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! Single garbled gates: four ciphertext rows addressed by a hash of the two
//! input wire keys, each row double-encrypted under those keys.

use crate::errors::GarbleError;
use barnacle::{AbstractChannel, WireKey};
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Width of the per-layer encryption nonce in bytes.
const NONCE_LEN: usize = 8;

/// Width of a plain output cell: a big-endian 0 or 1.
const PLAIN_LEN: usize = 2;

/// The two keys bound to one wire occurrence.
#[derive(Clone, Copy, Debug)]
pub struct WireKeyPair {
    zero: WireKey,
    one: WireKey,
}

impl WireKeyPair {
    /// Sample two fresh, independent keys.
    pub fn rand<RNG: CryptoRng + Rng>(rng: &mut RNG) -> Result<Self, GarbleError> {
        Ok(Self {
            zero: WireKey::rand(rng)?,
            one: WireKey::rand(rng)?,
        })
    }

    /// The key encoding `bit` on this occurrence.
    pub fn select(&self, bit: bool) -> WireKey {
        if bit {
            self.one
        } else {
            self.zero
        }
    }
}

/// A 2×2 truth table. `Plain` cells carry the literal output encoding and
/// appear only in the circuit's final gate; `Keyed` cells carry the
/// downstream wire key selected by the gate's output bit, which is how
/// gates chain without ever revealing intermediate values.
#[derive(Clone, Debug)]
pub enum TruthTable {
    /// Cells are literal booleans, encoded as 2-byte big-endian integers.
    Plain([[bool; 2]; 2]),
    /// Cells are the downstream wire's keys.
    Keyed([[WireKey; 2]; 2]),
}

impl TruthTable {
    /// Build the table for the boolean function `f`, keyed on `out`'s pair
    /// when given and plain otherwise.
    pub fn from_fn<F: Fn(bool, bool) -> bool>(f: F, out: Option<&WireKeyPair>) -> Self {
        match out {
            None => TruthTable::Plain([
                [f(false, false), f(false, true)],
                [f(true, false), f(true, true)],
            ]),
            Some(pair) => TruthTable::Keyed([
                [pair.select(f(false, false)), pair.select(f(false, true))],
                [pair.select(f(true, false)), pair.select(f(true, true))],
            ]),
        }
    }

    fn cell_bytes(&self, l: bool, r: bool) -> Vec<u8> {
        match self {
            TruthTable::Plain(cells) => {
                (cells[l as usize][r as usize] as u16).to_be_bytes().to_vec()
            }
            TruthTable::Keyed(cells) => cells[l as usize][r as usize].as_ref().to_vec(),
        }
    }
}

/// Decode a plain output cell into its boolean.
pub(crate) fn decode_plain(value: &[u8]) -> Result<bool, GarbleError> {
    if value.len() != PLAIN_LEN {
        return Err(GarbleError::InvalidValueLength {
            got: value.len(),
            needed: PLAIN_LEN,
        });
    }
    Ok(u16::from_be_bytes([value[0], value[1]]) != 0)
}

/// Computes the table index `Sha256(left ‖ right)`.
fn table_index(left: &WireKey, right: &WireKey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left.as_ref());
    hasher.update(right.as_ref());
    hasher.finalize().into()
}

/// XOR `data` against the keystream derived from `key` and `nonce`; block
/// `i` of the stream is `Sha256(key ‖ nonce ‖ i)`.
fn xor_stream(key: &WireKey, nonce: &[u8], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for (i, chunk) in data.chunks(32).enumerate() {
        let mut hasher = Sha256::new();
        hasher.update(key.as_ref());
        hasher.update(nonce);
        hasher.update((i as u64).to_le_bytes());
        let pad = hasher.finalize();
        out.extend(chunk.iter().zip(pad.iter()).map(|(d, p)| d ^ p));
    }
    out
}

/// A garbled gate: an opaque table mapping the digest of an input key pair
/// to the double-encrypted cell those keys open.
#[derive(Clone, Debug)]
pub struct GarbledGate {
    table: HashMap<[u8; 32], Vec<u8>>,
}

impl GarbledGate {
    /// Garble `table` under the given input key pairs.
    ///
    /// Each cell is encrypted under the left key and then under the right
    /// key, each layer with a fresh random nonce; the stored row is
    /// `nonce_inner ‖ nonce_outer ‖ ct_outer`. Exactly four rows are
    /// inserted; an index collision between distinct cells aborts the
    /// construction.
    pub fn garble<RNG: CryptoRng + Rng>(
        left: &WireKeyPair,
        right: &WireKeyPair,
        table: &TruthTable,
        rng: &mut RNG,
    ) -> Result<Self, GarbleError> {
        let mut rows = HashMap::with_capacity(4);
        for l in [false, true] {
            for r in [false, true] {
                let left_key = left.select(l);
                let right_key = right.select(r);
                let value = table.cell_bytes(l, r);
                let mut nonce_inner = [0u8; NONCE_LEN];
                rng.try_fill_bytes(&mut nonce_inner)?;
                let mut nonce_outer = [0u8; NONCE_LEN];
                rng.try_fill_bytes(&mut nonce_outer)?;
                let ct_inner = xor_stream(&left_key, &nonce_inner, &value);
                let ct_outer = xor_stream(&right_key, &nonce_outer, &ct_inner);
                let mut row = Vec::with_capacity(2 * NONCE_LEN + ct_outer.len());
                row.extend_from_slice(&nonce_inner);
                row.extend_from_slice(&nonce_outer);
                row.extend_from_slice(&ct_outer);
                if rows.insert(table_index(&left_key, &right_key), row).is_some() {
                    return Err(GarbleError::IndexCollision);
                }
            }
        }
        Ok(Self { table: rows })
    }

    /// Decrypt the row addressed by `left` and `right`, peeling the right
    /// (outer) layer before the left (inner) one.
    ///
    /// Keys that address no row fail with `LookupFailed`. The rows carry no
    /// integrity tag, so a key pair that somehow addressed a foreign row
    /// would decrypt to garbage rather than an error.
    pub fn evaluate(&self, left: &WireKey, right: &WireKey) -> Result<Vec<u8>, GarbleError> {
        let row = self
            .table
            .get(&table_index(left, right))
            .ok_or(GarbleError::LookupFailed)?;
        if row.len() < 2 * NONCE_LEN {
            return Err(GarbleError::InvalidValueLength {
                got: row.len(),
                needed: 2 * NONCE_LEN,
            });
        }
        let nonce_inner = &row[..NONCE_LEN];
        let nonce_outer = &row[NONCE_LEN..2 * NONCE_LEN];
        let ct_outer = &row[2 * NONCE_LEN..];
        let ct_inner = xor_stream(right, nonce_outer, ct_outer);
        Ok(xor_stream(left, nonce_inner, &ct_inner))
    }

    /// Write the four rows to `channel`.
    pub fn write<C: AbstractChannel>(&self, channel: &mut C) -> std::io::Result<()> {
        for (index, row) in self.table.iter() {
            channel.write_digest(index)?;
            channel.write_usize(row.len())?;
            channel.write_bytes(row)?;
        }
        Ok(())
    }

    /// Read a gate's four rows from `channel`.
    pub fn read<C: AbstractChannel>(channel: &mut C) -> std::io::Result<Self> {
        let mut rows = HashMap::with_capacity(4);
        for _ in 0..4 {
            let index = channel.read_digest()?;
            let len = channel.read_usize()?;
            let row = channel.read_vec(len)?;
            rows.insert(index, row);
        }
        Ok(Self { table: rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateOp;
    use rand::rngs::OsRng;

    fn rand_pair() -> WireKeyPair {
        WireKeyPair::rand(&mut OsRng).unwrap()
    }

    #[test]
    fn plain_gates_compute_their_op() {
        let mut rng = OsRng;
        for op in [GateOp::And, GateOp::Or, GateOp::Gt, GateOp::Eq, GateOp::Geq] {
            let left = rand_pair();
            let right = rand_pair();
            let table = TruthTable::from_fn(|l, r| op.eval(l, r), None);
            let gate = GarbledGate::garble(&left, &right, &table, &mut rng).unwrap();
            for l in [false, true] {
                for r in [false, true] {
                    let value = gate.evaluate(&left.select(l), &right.select(r)).unwrap();
                    assert_eq!(decode_plain(&value).unwrap(), op.eval(l, r), "{:?}", op);
                }
            }
        }
    }

    #[test]
    fn keyed_gates_yield_the_downstream_key() {
        let mut rng = OsRng;
        let left = rand_pair();
        let right = rand_pair();
        let out = rand_pair();
        let table = TruthTable::from_fn(|l, r| l && r, Some(&out));
        let gate = GarbledGate::garble(&left, &right, &table, &mut rng).unwrap();
        for l in [false, true] {
            for r in [false, true] {
                let value = gate.evaluate(&left.select(l), &right.select(r)).unwrap();
                let key = WireKey::try_from(&value[..]).unwrap();
                assert_eq!(key, out.select(l && r));
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mut rng = OsRng;
        let left = rand_pair();
        let right = rand_pair();
        let table = TruthTable::from_fn(|l, r| l || r, None);
        let gate = GarbledGate::garble(&left, &right, &table, &mut rng).unwrap();
        let once = gate.evaluate(&left.select(true), &right.select(false)).unwrap();
        let twice = gate.evaluate(&left.select(true), &right.select(false)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn foreign_keys_fail_the_lookup() {
        let mut rng = OsRng;
        let left = rand_pair();
        let right = rand_pair();
        let table = TruthTable::from_fn(|l, r| l && r, None);
        let gate = GarbledGate::garble(&left, &right, &table, &mut rng).unwrap();
        let stray = rand_pair();
        assert!(matches!(
            gate.evaluate(&stray.select(false), &right.select(false)),
            Err(GarbleError::LookupFailed)
        ));
    }

    #[test]
    fn roundtrips_through_a_channel() {
        use barnacle::unix_channel_pair;
        let mut rng = OsRng;
        let left = rand_pair();
        let right = rand_pair();
        let table = TruthTable::from_fn(|l, r| l == r, None);
        let gate = GarbledGate::garble(&left, &right, &table, &mut rng).unwrap();
        let expected = gate.evaluate(&left.select(true), &right.select(true)).unwrap();
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            gate.write(&mut sender).unwrap();
            sender.flush().unwrap();
        });
        let gate = GarbledGate::read(&mut receiver).unwrap();
        handle.join().unwrap();
        let value = gate.evaluate(&left.select(true), &right.select(true)).unwrap();
        assert_eq!(value, expected);
    }
}
