// -*- mode: rust; -*-
//
// This file is part of `barnacle`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! Defines a wire key as a 128-bit value, and implements key-related
//! functions.

use curve25519_dalek::ristretto::RistrettoPoint;
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// A wire key is a 128-bit value bound to one boolean value on one wire
/// occurrence. Holding a key reveals nothing about which bit it encodes; the
/// only guarantee relied upon is the pseudorandomness of the sampling source.
#[derive(Clone, Copy, Default, Hash, Eq)]
pub struct WireKey([u8; 16]);

impl WireKey {
    /// Length of a wire key in bytes.
    pub const LEN: usize = 16;

    /// Sample a fresh wire key from `rng`.
    ///
    /// Key material comes straight from the entropy source; if the source
    /// fails the error propagates, and the caller must abort the current run
    /// rather than fall back to weaker randomness.
    pub fn rand<RNG: CryptoRng + Rng>(rng: &mut RNG) -> Result<Self, rand::Error> {
        let mut bytes = [0u8; 16];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Hash an elliptic curve point `pt`, tweaked by `tweak`, into a
    /// key-sized value.
    ///
    /// The tweak domain-separates instances so that repeated transfers of
    /// the same point produce unrelated pads.
    pub fn hash_pt(tweak: u128, pt: &RistrettoPoint) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(tweak.to_le_bytes());
        hasher.update(pt.compress().as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Self(bytes)
    }
}

impl AsRef<[u8]> for WireKey {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for WireKey {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl std::ops::BitXor for WireKey {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        let mut out = [0u8; 16];
        for (o, (a, b)) in out.iter_mut().zip(self.0.iter().zip(rhs.0.iter())) {
            *o = a ^ b;
        }
        Self(out)
    }
}

impl std::ops::BitXorAssign for WireKey {
    fn bitxor_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0.iter()) {
            *a ^= *b;
        }
    }
}

impl PartialEq for WireKey {
    fn eq(&self, other: &WireKey) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl From<[u8; 16]> for WireKey {
    #[inline]
    fn from(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl From<WireKey> for [u8; 16] {
    #[inline]
    fn from(key: WireKey) -> Self {
        key.0
    }
}

impl TryFrom<&[u8]> for WireKey {
    type Error = core::array::TryFromSliceError;

    #[inline]
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(<[u8; 16]>::try_from(bytes)?))
    }
}

impl std::fmt::Debug for WireKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for WireKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl rand::distributions::Distribution<WireKey> for rand::distributions::Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> WireKey {
        WireKey(rng.gen::<[u8; 16]>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use rand::rngs::OsRng;

    #[test]
    fn xor_is_an_involution() {
        let mut rng = OsRng;
        let a = WireKey::rand(&mut rng).unwrap();
        let b = WireKey::rand(&mut rng).unwrap();
        assert_eq!(a ^ b ^ b, a);
        assert_eq!(a ^ a, WireKey::default());
    }

    #[test]
    fn hash_pt_is_deterministic_and_tweaked() {
        let pt = RISTRETTO_BASEPOINT_POINT;
        assert_eq!(WireKey::hash_pt(0, &pt), WireKey::hash_pt(0, &pt));
        assert_ne!(WireKey::hash_pt(0, &pt), WireKey::hash_pt(1, &pt));
    }

    #[test]
    fn formats_as_hex() {
        let bytes = rand::random::<[u8; 16]>();
        let key = WireKey::from(bytes);
        assert_eq!(format!("{}", key), hex::encode(bytes));
    }
}
