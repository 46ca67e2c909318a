// -*- mode: rust; -*-
//
// This file is part of `croesus`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! Implementation of the semi-honest two-party comparison protocol.

mod evaluator;
mod garbler;

pub use evaluator::Evaluator;
pub use garbler::Garbler;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProtocolError;
    use barnacle::{unix_channel_pair, SemiHonest, UnixChannel, WireKey};
    use itertools::iproduct;
    use margay::ot::{
        DummyReceiver, DummySender, OffsetReceiver, OffsetSender, Receiver as OtReceiver,
        Sender as OtSender,
    };
    use rand::rngs::OsRng;

    fn compare_once<OTSender, OTReceiver>(x: u64, y: u64) -> bool
    where
        OTSender: OtSender<Msg = WireKey> + SemiHonest + 'static,
        OTReceiver: OtReceiver<Msg = WireKey> + SemiHonest + 'static,
    {
        let (sender, receiver) = unix_channel_pair();
        let handle = std::thread::spawn(move || {
            let mut gb = Garbler::<UnixChannel, OsRng, OTSender>::new(sender, OsRng).unwrap();
            gb.compare(x).unwrap();
        });
        let mut ev = Evaluator::<UnixChannel, OsRng, OTReceiver>::new(receiver, OsRng).unwrap();
        let result = ev.compare(y).unwrap();
        handle.join().unwrap();
        result
    }

    #[test]
    fn compares_all_two_bit_inputs() {
        for (x, y) in iproduct!(0..4u64, 0..4u64) {
            let result = compare_once::<OffsetSender, OffsetReceiver>(x, y);
            assert_eq!(result, x >= y, "{} >= {}", x, y);
        }
    }

    #[test]
    fn compares_with_the_dummy_ot() {
        for (x, y) in iproduct!(0..4u64, 0..4u64) {
            let result = compare_once::<DummySender, DummyReceiver>(x, y);
            assert_eq!(result, x >= y, "{} >= {}", x, y);
        }
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        let (sender, receiver) = unix_channel_pair();
        let mut gb =
            Garbler::<UnixChannel, OsRng, OffsetSender>::new(sender, OsRng).unwrap();
        assert!(matches!(
            gb.compare(4),
            Err(ProtocolError::InputOutOfRange(4))
        ));
        let mut ev =
            Evaluator::<UnixChannel, OsRng, OffsetReceiver>::new(receiver, OsRng).unwrap();
        assert!(matches!(
            ev.compare(17),
            Err(ProtocolError::InputOutOfRange(17))
        ));
    }
}
