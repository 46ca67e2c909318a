// -*- mode: rust; -*-
//
// This file is part of `barnacle`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

#![allow(clippy::many_single_char_names)]

//!

/// Module for encapsulating communication channels between the two parties.
pub mod channel;
mod key;

pub use crate::{
    channel::{AbstractChannel, Channel, SyncChannel},
    key::WireKey,
};

#[cfg(unix)]
pub use crate::channel::{unix_channel_pair, UnixChannel};

/// A marker trait denoting that the given scheme is semi-honest secure.
pub trait SemiHonest {}
