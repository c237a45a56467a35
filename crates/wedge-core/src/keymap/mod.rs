//! Symbolic key codes and the payload decoding table.
//!
//! Host adapters translate their toolkit's key enumeration into [`Key`] at
//! the event boundary; everything past that boundary works on [`Key`] only.

pub mod decoder;
pub mod key;

pub use decoder::KeyDecoder;
pub use key::{Key, KeyParseError};
