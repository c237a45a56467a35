//! Infrastructure layer for the reader.
//!
//! Contains the host-facing adapters: the key notification source boundary
//! and TOML configuration loading.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `wedge_core`, but MUST NOT be imported by the `application` layer except
//! through the [`key_source::KeyNotificationSource`] trait and its event types.

pub mod key_source;
pub mod storage;
