#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod key;
mod num;
mod range_index;
mod results;
mod sweep;
mod trace;
mod wire;

pub use key::WireKey;
pub use range_index::RangeIndex;
pub use results::ResultSet;
pub use sweep::CrossVerifier;
pub use trace::{NoTrace, SweepObserver, Trace, TraceDocument, TraceRecord};
pub use wire::{Wire, WireId, WireLayer};

/// The ways building or verifying a wire layer can fail.
///
/// None of these are recoverable: they all signal bad input or misuse of
/// the API, and verification is a one-shot batch computation with no
/// partial state worth resuming.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A wire is neither purely horizontal nor purely vertical, or has a
    /// non-finite coordinate.
    InvalidGeometry(String),
    /// Two wires in the same layer were given the same name.
    DuplicateName(String),
    /// A verifier's count or list method was invoked a second time.
    AlreadyComputed,
    /// A record in the textual wire-list input could not be parsed.
    BadRecord(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidGeometry(name) => {
                write!(f, "wire {name} is neither horizontal nor vertical")
            }
            Error::DuplicateName(name) => write!(f, "wire name {name} is not unique"),
            Error::AlreadyComputed => write!(f, "this verifier has already run"),
            Error::BadRecord(line) => write!(f, "malformed wire record: {line:?}"),
        }
    }
}

impl std::error::Error for Error {}
