//! Domain value types for the barcode reader.
//!
//! This module contains plain data with no infrastructure dependencies.
//!
//! # Identities (for beginners)
//!
//! The reader never holds a reference to a real toolkit widget.  Instead the
//! host gives every widget it wants to watch a [`WidgetId`], and the reader
//! compares ids.  Logical subscribers ("whoever is handling the stock-taking
//! screen right now") are identified by an [`EventId`], which is a UUID so
//! independent parts of an application can pick ids without coordinating.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Framing and routing settings.
pub mod config;

/// The value delivered to subscribers.
pub mod result;

/// Opaque, equality-comparable handle of a host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// Unique identifier of a logical event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Generates a fresh random id.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
