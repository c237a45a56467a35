//! wedge-reader library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::reader::{BarcodeReader, ReaderError};
pub use application::router::{Delivery, DeliveryTarget, Dispatch};
pub use infrastructure::key_source::{KeyEvent, KeyNotificationSource, KeyPhase, SourceError};
