use crate::{
    circuit::{bits, garble, Topology, MAX_INPUT},
    errors::ProtocolError,
};
use barnacle::{AbstractChannel, SemiHonest, WireKey};
use margay::ot::Sender as OtSender;
use rand::{CryptoRng, Rng};

/// Semi-honest garbler for the two-bit comparison protocol.
pub struct Garbler<C, RNG, OT> {
    channel: C,
    ot: OT,
    rng: RNG,
}

impl<C: AbstractChannel, RNG: CryptoRng + Rng, OT: OtSender<Msg = WireKey> + SemiHonest>
    Garbler<C, RNG, OT>
{
    /// Make a new `Garbler`.
    pub fn new(mut channel: C, mut rng: RNG) -> Result<Self, ProtocolError> {
        let ot = OT::init(&mut channel, &mut rng)?;
        Ok(Garbler { channel, ot, rng })
    }

    /// Get a reference to the internal channel.
    pub fn get_channel(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Run the garbler's half of one comparison with private input `x`.
    ///
    /// Garbles a fresh circuit, publishes its gate tables, disclosing the
    /// keys selected by `x`'s bits (raw keys carry no bit information to an
    /// observer), and serves the evaluator's keys through oblivious
    /// transfer, one independent transfer per wire occurrence. Only the
    /// evaluator learns the result.
    ///
    /// Nothing garbled here survives the call, so every comparison runs on
    /// fresh key material.
    pub fn compare(&mut self, x: u64) -> Result<(), ProtocolError> {
        if x > MAX_INPUT {
            return Err(ProtocolError::InputOutOfRange(x));
        }
        let topology = Topology::comparator();
        let (circuit, x_keys, y_keys) = garble(&topology, &mut self.rng)?;
        circuit.write(&mut self.channel)?;
        for key in x_keys.select(&bits(x)) {
            self.channel.write_key(&key)?;
        }
        self.channel.flush()?;
        let inputs = y_keys
            .pairs()
            .into_iter()
            .map(|(_, pair)| (pair.select(false), pair.select(true)))
            .collect::<Vec<(WireKey, WireKey)>>();
        self.ot.send(&mut self.channel, &inputs, &mut self.rng)?;
        Ok(())
    }
}

impl<C, RNG, OT> SemiHonest for Garbler<C, RNG, OT> {}
