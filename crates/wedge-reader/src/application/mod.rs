//! Application layer of the reader.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure key and result types in `wedge_core`) and the infrastructure (the
//! host toolkit that raises key notifications, and the config file).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain objects to fulfil a user goal ("tell the widget
//!   that was scanned into what the barcode says").
//! - **Depends on abstractions** (the `KeyNotificationSource` trait) rather
//!   than a concrete toolkit.
//! - **Contains no OS calls and no file system access**.
//!
//! # Sub-modules
//!
//! - **`registry`** – In-memory table of element and event subscriptions
//!   plus the active-element and active-event markers.
//!
//! - **`capture`** – The per-keystroke state machine that tells scanner
//!   bursts apart from human typing, and learns the prefix on request.
//!
//! - **`router`** – Decides which subscribers receive a decoded scan and
//!   snapshots them into a `Dispatch`.
//!
//! - **`reader`** – The `BarcodeReader` facade that ties the three together
//!   and manages key-notification subscriptions.

pub mod capture;
pub mod reader;
pub mod registry;
pub mod router;
