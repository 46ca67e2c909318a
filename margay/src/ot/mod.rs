//! Oblivious transfer traits + instantiations.
//!
//! This module provides traits for one-out-of-two oblivious transfer (OT),
//! alongside implementations of the following OT protocols:
//!
//! * `dummy`: a dummy and completely insecure OT for testing purposes.
//! * `offset`: semi-honest hashed-ElGamal OT with an offset-derived decoy
//!   key.

pub mod dummy;
pub mod offset;

use crate::errors::Error;
use barnacle::AbstractChannel;
use rand::{CryptoRng, Rng};

/// Instantiation of the dummy OT sender.
pub type DummySender = dummy::Sender;
/// Instantiation of the dummy OT receiver.
pub type DummyReceiver = dummy::Receiver;
/// Instantiation of the offset-key ElGamal OT sender.
pub type OffsetSender = offset::Sender;
/// Instantiation of the offset-key ElGamal OT receiver.
pub type OffsetReceiver = offset::Receiver;

/// Trait for one-out-of-two oblivious transfer from the sender's
/// point-of-view.
pub trait Sender
where
    Self: Sized,
{
    /// Message type, restricted to types that are mutably-dereferencable as
    /// `u8` arrays.
    type Msg: Sized + AsMut<[u8]>;
    /// Runs any one-time initialization to create the oblivious transfer
    /// object.
    fn init<C: AbstractChannel, RNG: CryptoRng + Rng>(
        channel: &mut C,
        rng: &mut RNG,
    ) -> Result<Self, Error>;
    /// Sends messages.
    fn send<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(Self::Msg, Self::Msg)],
        rng: &mut RNG,
    ) -> Result<(), Error>;
}

/// Trait for one-out-of-two oblivious transfer from the receiver's
/// point-of-view.
pub trait Receiver
where
    Self: Sized,
{
    /// Message type, restricted to types that are mutably-dereferencable as
    /// `u8` arrays.
    type Msg: Sized + AsMut<[u8]>;
    /// Runs any one-time initialization to create the oblivious transfer
    /// object.
    fn init<C: AbstractChannel, RNG: CryptoRng + Rng>(
        channel: &mut C,
        rng: &mut RNG,
    ) -> Result<Self, Error>;
    /// Receives messages.
    fn receive<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<Self::Msg>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use barnacle::{unix_channel_pair, WireKey};
    use rand::rngs::OsRng;
    use std::fmt::Display;

    fn rand_key_vec(size: usize) -> Vec<WireKey> {
        (0..size).map(|_| rand::random::<WireKey>()).collect()
    }

    fn rand_bool_vec(size: usize) -> Vec<bool> {
        (0..size).map(|_| rand::random::<bool>()).collect()
    }

    fn test_ot<OTSender: Sender<Msg = WireKey>, OTReceiver: Receiver<Msg = WireKey> + Display>() {
        let m0s = rand_key_vec(32);
        let m1s = rand_key_vec(32);
        let bs = rand_bool_vec(32);
        let m0s_ = m0s.clone();
        let m1s_ = m1s.clone();
        let (mut sender, mut receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let mut rng = OsRng;
            let mut ot = OTSender::init(&mut sender, &mut rng).unwrap();
            let ms = m0s
                .into_iter()
                .zip(m1s.into_iter())
                .collect::<Vec<(WireKey, WireKey)>>();
            ot.send(&mut sender, &ms, &mut rng).unwrap();
            ot.send(&mut sender, &ms, &mut rng).unwrap();
        });
        let mut rng = OsRng;
        let mut ot = OTReceiver::init(&mut receiver, &mut rng).unwrap();
        let result = ot.receive(&mut receiver, &bs, &mut rng).unwrap();
        for j in 0..32 {
            assert_eq!(result[j], if bs[j] { m1s_[j] } else { m0s_[j] });
        }
        let result = ot.receive(&mut receiver, &bs, &mut rng).unwrap();
        for j in 0..32 {
            assert_eq!(result[j], if bs[j] { m1s_[j] } else { m0s_[j] });
        }
        handle.join().unwrap();
    }

    #[test]
    fn test_dummy() {
        test_ot::<DummySender, DummyReceiver>();
    }

    #[test]
    fn test_offset() {
        test_ot::<OffsetSender, OffsetReceiver>();
    }
}
