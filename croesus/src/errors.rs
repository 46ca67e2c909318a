//! Errors that may be output by this library.

use std::fmt::{self, Display, Formatter};

/// Errors from garbled-gate construction and circuit evaluation.
#[derive(Debug)]
pub enum GarbleError {
    /// Two truth-table cells hashed to the same table index.
    IndexCollision,
    /// The presented keys address no row of the gate's table. Indicates
    /// protocol desynchronization or tampering.
    LookupFailed,
    /// A decrypted cell has the wrong width for its position.
    InvalidValueLength {
        /// Received width in bytes.
        got: usize,
        /// Expected width in bytes.
        needed: usize,
    },
    /// A gate read a wire slot that no key had reached.
    UninitializedWire(usize),
    /// The number of garbled gates does not match the topology.
    GateCountMismatch {
        /// Received number of gates.
        got: usize,
        /// Expected number of gates.
        needed: usize,
    },
    /// The topology has no plain-output gate.
    NoOutputGate,
    /// The entropy source failed while sampling keys or nonces.
    RandomnessFailure(rand::Error),
}

impl From<rand::Error> for GarbleError {
    fn from(e: rand::Error) -> GarbleError {
        GarbleError::RandomnessFailure(e)
    }
}

impl Display for GarbleError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            GarbleError::IndexCollision => "table index collision while garbling".fmt(f),
            GarbleError::LookupFailed => {
                "no table row matches the presented key pair".fmt(f)
            }
            GarbleError::InvalidValueLength { got, needed } => write!(
                f,
                "invalid cell width: needed {} bytes but got {}",
                needed, got
            ),
            GarbleError::UninitializedWire(wire) => write!(
                f,
                "no key available for wire slot {}. are the gates topologically sorted?",
                wire
            ),
            GarbleError::GateCountMismatch { got, needed } => write!(
                f,
                "invalid number of gates: needed {} but got {}",
                needed, got
            ),
            GarbleError::NoOutputGate => "topology has no plain-output gate".fmt(f),
            GarbleError::RandomnessFailure(e) => write!(f, "randomness failure: {}", e),
        }
    }
}

/// Errors produced by the semi-honest comparison protocol.
#[derive(Debug)]
pub enum ProtocolError {
    /// An I/O error has occurred.
    IoError(std::io::Error),
    /// An oblivious transfer error has occurred.
    OtError(margay::Error),
    /// Garbling or evaluation produced an error.
    GarbleError(GarbleError),
    /// The private input does not fit in the circuit's two bits.
    InputOutOfRange(u64),
}

impl std::error::Error for ProtocolError {}

impl From<std::io::Error> for ProtocolError {
    fn from(e: std::io::Error) -> ProtocolError {
        ProtocolError::IoError(e)
    }
}

impl From<margay::Error> for ProtocolError {
    fn from(e: margay::Error) -> ProtocolError {
        ProtocolError::OtError(e)
    }
}

impl From<GarbleError> for ProtocolError {
    fn from(e: GarbleError) -> ProtocolError {
        ProtocolError::GarbleError(e)
    }
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ProtocolError::IoError(e) => write!(f, "IO error: {}", e),
            ProtocolError::OtError(e) => write!(f, "oblivious transfer error: {}", e),
            ProtocolError::GarbleError(e) => write!(f, "garbling error: {}", e),
            ProtocolError::InputOutOfRange(x) => {
                write!(f, "input {} does not fit in two bits", x)
            }
        }
    }
}
