//! # wedge-core
//!
//! Shared library for the keyboard-wedge barcode reader containing the
//! symbolic key codes, the key decoding table, and the plain value types
//! exchanged between the reader and its subscribers.
//!
//! It has zero dependencies on OS APIs or UI toolkits.
//!
//! # Architecture overview (for beginners)
//!
//! A "keyboard wedge" barcode scanner pretends to be a keyboard.  When it
//! reads a barcode it types a fixed *prefix* key, then one key per payload
//! character, then a fixed *suffix* key (usually Enter).  The reader in the
//! `wedge-reader` crate watches the key stream of a focused widget, spots
//! that framed burst, and hands the payload to whoever subscribed.
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`keymap`** – The [`Key`] enumeration (numbered by USB HID Usage ID so
//!   host adapters have a canonical code to translate into) and the
//!   [`KeyDecoder`] that turns keys back into payload text.
//!
//! - **`domain`** – Identity types for widgets and logical events, the
//!   [`DecodedResult`] delivered to subscribers, and the [`ReaderConfig`]
//!   framing/routing settings.

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `wedge_core::Key` instead of `wedge_core::keymap::key::Key`.
pub use domain::config::ReaderConfig;
pub use domain::result::DecodedResult;
pub use domain::{EventId, WidgetId};
pub use keymap::decoder::KeyDecoder;
pub use keymap::key::{Key, KeyParseError};
