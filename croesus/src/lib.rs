// -*- mode: rust; -*-
//
// This file is part of `croesus`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

//! `croesus` provides garbled-circuit comparison of private two-bit inputs:
//! Yao's garbled gates, the fixed `x >= y` comparator circuit, and the
//! semi-honest two-party protocol that runs it.

#![allow(clippy::many_single_char_names)]

pub mod circuit;
pub mod errors;
pub mod gate;
pub mod semihonest;

pub use crate::errors::{GarbleError, ProtocolError};
