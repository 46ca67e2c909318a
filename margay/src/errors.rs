// -*- mode: rust; -*-
//
// This file is part of `margay`.
// Copyright © 2019 Galois, Inc.
// See LICENSE for licensing information.

/// Errors produced by `margay`.
#[derive(Debug)]
pub enum Error {
    /// The receiver's public keys do not differ by the expected offset.
    MalformedKey,
    /// The entropy source failed while generating key material.
    RandomnessFailure(rand::Error),
    /// An I/O error has occurred.
    IoError(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IoError(e)
    }
}

impl From<rand::Error> for Error {
    fn from(e: rand::Error) -> Error {
        Error::RandomnessFailure(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedKey => {
                "receiver public keys are not in arithmetic progression with the expected offset"
                    .fmt(f)
            }
            Error::RandomnessFailure(e) => write!(f, "randomness failure: {}", e),
            Error::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}
