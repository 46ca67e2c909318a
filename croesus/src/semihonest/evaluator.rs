use crate::{
    circuit::{bits, GarbledCircuit, Topology, WireId, MAX_INPUT},
    errors::ProtocolError,
};
use barnacle::{AbstractChannel, SemiHonest, WireKey};
use margay::ot::Receiver as OtReceiver;
use rand::{CryptoRng, Rng};
use std::collections::HashMap;

/// Semi-honest evaluator for the two-bit comparison protocol.
pub struct Evaluator<C, RNG, OT> {
    channel: C,
    ot: OT,
    rng: RNG,
}

impl<C: AbstractChannel, RNG: CryptoRng + Rng, OT: OtReceiver<Msg = WireKey> + SemiHonest>
    Evaluator<C, RNG, OT>
{
    /// Make a new `Evaluator`.
    pub fn new(mut channel: C, mut rng: RNG) -> Result<Self, ProtocolError> {
        let ot = OT::init(&mut channel, &mut rng)?;
        Ok(Self { channel, ot, rng })
    }

    /// Get a reference to the internal channel.
    pub fn get_channel(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Run the evaluator's half of one comparison with private input `y`,
    /// returning whether `x >= y`.
    ///
    /// Reads the garbled tables and the garbler's disclosed keys, obtains
    /// the keys for `y`'s bits through oblivious transfer, evaluates the
    /// gates in topological order, and decodes the plain output.
    pub fn compare(&mut self, y: u64) -> Result<bool, ProtocolError> {
        if y > MAX_INPUT {
            return Err(ProtocolError::InputOutOfRange(y));
        }
        let topology = Topology::comparator();
        let circuit = GarbledCircuit::read(&topology, &mut self.channel)?;
        let mut assignment: HashMap<WireId, WireKey> = HashMap::new();
        for (_, wire) in topology.garbler_inputs().iter() {
            assignment.insert(*wire, self.channel.read_key()?);
        }
        let y_bits = bits(y);
        let choices = topology
            .evaluator_inputs()
            .iter()
            .map(|(input, _)| y_bits[input.bit])
            .collect::<Vec<bool>>();
        let keys = self.ot.receive(&mut self.channel, &choices, &mut self.rng)?;
        for ((_, wire), key) in topology.evaluator_inputs().iter().zip(keys.into_iter()) {
            assignment.insert(*wire, key);
        }
        let result = circuit.evaluate(&topology, &assignment)?;
        Ok(result)
    }
}

impl<C, RNG, OT> SemiHonest for Evaluator<C, RNG, OT> {}
