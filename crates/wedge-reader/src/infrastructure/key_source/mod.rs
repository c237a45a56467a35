//! Key notification source: the boundary to the host GUI toolkit.
//!
//! A toolkit adapter implements [`KeyNotificationSource`] by attaching
//! key-down/key-up handlers to the widget behind a [`WidgetId`], and forwards
//! every notification to the reader as a [`KeyEvent`].  The reader decides
//! whether the event is part of a scan and sets [`KeyEvent::handled`] so the
//! adapter can stop the key from reaching the widget.
//!
//! # Testability
//!
//! The reader depends only on this trait.  Tests use [`mock::MockKeySource`],
//! which records subscriptions and synthesizes key events without a toolkit.

use thiserror::Error;
use wedge_core::{Key, WidgetId};

pub mod mock;

/// Which half of a keystroke a notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    /// The key went down.
    Press,
    /// The key came back up.
    Release,
}

/// One key notification from the host toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Symbolic key code.
    pub key: Key,
    /// Press or release.
    pub phase: KeyPhase,
    /// Widget the notification was raised on.
    pub source: WidgetId,
    /// Widget the key originated from before bubbling, when the origin is a
    /// widget the host can identify.
    pub original_source: Option<WidgetId>,
    /// Set by the reader to suppress further propagation to the widget.
    pub handled: bool,
}

impl KeyEvent {
    /// A key-down notification raised and originating on `source`.
    pub fn press(key: Key, source: WidgetId) -> Self {
        Self {
            key,
            phase: KeyPhase::Press,
            source,
            original_source: Some(source),
            handled: false,
        }
    }

    /// A key-up notification raised and originating on `source`.
    pub fn release(key: Key, source: WidgetId) -> Self {
        Self {
            phase: KeyPhase::Release,
            ..Self::press(key, source)
        }
    }

    /// Replaces the origin widget (an event bubbled up from a child).
    pub fn with_original_source(mut self, original_source: Option<WidgetId>) -> Self {
        self.original_source = original_source;
        self
    }
}

/// Error type for key subscription operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("widget {0} is not known to the host toolkit")]
    UnknownWidget(WidgetId),
    #[error("failed to attach key handlers to {widget}: {reason}")]
    AttachFailed { widget: WidgetId, reason: String },
}

/// Trait abstracting subscription to host key notifications.
///
/// Implementations use interior mutability; the reader holds the source
/// behind an `Arc` and calls it through `&self`.
#[cfg_attr(test, mockall::automock)]
pub trait KeyNotificationSource: Send + Sync {
    /// Starts delivering key-down/key-up notifications raised on `widget`.
    fn subscribe(&self, widget: WidgetId) -> Result<(), SourceError>;
    /// Stops delivering notifications for `widget`.  No-op if not subscribed.
    fn unsubscribe(&self, widget: WidgetId);
}
