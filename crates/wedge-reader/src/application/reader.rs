//! BarcodeReader: the facade a host application talks to.
//!
//! The reader owns the subscription registry, the capture state machine and
//! the framing configuration, and keeps the host toolkit's key notifications
//! in sync with the registered widgets through a [`KeyNotificationSource`].
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! BarcodeReader::new(source)
//!   .with_element(widget, always_notify, callback)?   -- who wants scans
//!   .with_event(id, "label", listener)?               -- logical listeners
//!   .with_prefix(Key::F12).with_suffix(Key::Enter)    -- scanner framing
//!   .start_listening()?                               -- attach to widgets
//!
//! for every key notification:  reader.handle_key(&mut event)
//! ```
//!
//! Registering a widget while the reader is listening attaches it at once;
//! while stopped, attaching waits for `start_listening`.  Key events that
//! arrive while stopped are ignored.
//!
//! # Re-entrant callbacks
//!
//! [`BarcodeReader::process_key`] never calls a subscriber.  It returns a
//! [`Dispatch`] snapshot that the host delivers after releasing its borrow of
//! the reader, so a callback may register or remove bindings on the same
//! reader.  [`BarcodeReader::handle_key`] is the shortcut for hosts that
//! don't need that.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use wedge_core::{DecodedResult, EventId, Key, ReaderConfig, WidgetId};

use super::capture::{CaptureOutcome, CaptureState, CaptureStateMachine};
use super::registry::{BindingRegistry, PrefixCallback, RegistryError};
use super::router::{Dispatch, NotificationRouter};
use crate::infrastructure::key_source::{KeyEvent, KeyNotificationSource, SourceError};

/// Error type for reader configuration and subscription operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReaderError {
    /// An event listener with this id is already registered.
    #[error("there is a barcode event registered with id {0}")]
    DuplicateEventId(EventId),

    /// The key source refused to attach to a widget.
    #[error("key source error: {0}")]
    Source(#[from] SourceError),
}

impl From<RegistryError> for ReaderError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::DuplicateEventId(id) => ReaderError::DuplicateEventId(id),
        }
    }
}

/// Keyboard-wedge barcode reader bound to one key notification source.
pub struct BarcodeReader {
    source: Arc<dyn KeyNotificationSource>,
    config: ReaderConfig,
    registry: BindingRegistry,
    capture: CaptureStateMachine,
    prefix_listener: Option<PrefixCallback>,
    listening: bool,
}

impl BarcodeReader {
    /// Creates a stopped reader with the default framing (`F12` … `Enter`).
    pub fn new(source: Arc<dyn KeyNotificationSource>) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    /// Creates a stopped reader with explicit framing and routing settings.
    pub fn with_config(source: Arc<dyn KeyNotificationSource>, config: ReaderConfig) -> Self {
        Self {
            source,
            config,
            registry: BindingRegistry::new(),
            capture: CaptureStateMachine::new(),
            prefix_listener: None,
            listening: false,
        }
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Subscribes `widget` to scans typed into it.
    ///
    /// Re-registering a widget replaces its binding in place.  With
    /// `always_notify` the widget also receives unclaimed scans and becomes
    /// the active element.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Source`] if the reader is listening and the key
    /// source cannot attach to `widget`.  The registry and the active element
    /// are then left unchanged.
    pub fn with_element<F>(
        &mut self,
        widget: WidgetId,
        always_notify: bool,
        callback: F,
    ) -> Result<&mut Self, ReaderError>
    where
        F: Fn(DecodedResult) + Send + Sync + 'static,
    {
        // Attach before touching the registry so a refusal leaves the
        // bindings and the active element as they were.
        if self.listening && !self.registry.is_element_registered(widget) {
            if let Err(e) = self.source.subscribe(widget) {
                warn!(%widget, "failed to attach key handlers: {e}");
                return Err(e.into());
            }
        }

        let replaced = self
            .registry
            .register_element(widget, always_notify, Arc::new(callback));
        debug!(%widget, always_notify, replaced, "element registered");
        Ok(self)
    }

    /// Registers a logical event listener labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::DuplicateEventId`] if `id` is already taken.
    pub fn with_event<F>(
        &mut self,
        id: EventId,
        label: impl Into<String>,
        listener: F,
    ) -> Result<&mut Self, ReaderError>
    where
        F: Fn(DecodedResult) + Send + Sync + 'static,
    {
        let label = label.into();
        self.registry
            .register_event(id, label.clone(), Arc::new(listener))?;
        debug!(%id, %label, "event registered");
        Ok(self)
    }

    /// Removes the binding for `widget` and detaches from it.  No-op if absent.
    pub fn remove_element(&mut self, widget: WidgetId) -> &mut Self {
        if self.registry.unregister_element(widget).is_some() {
            if self.listening {
                self.source.unsubscribe(widget);
            }
            debug!(%widget, "element removed");
        }
        self
    }

    /// Removes the event listener `id`.  No-op if absent.
    pub fn remove_event(&mut self, id: EventId) -> &mut Self {
        if self.registry.unregister_event(id).is_some() {
            debug!(%id, "event removed");
        }
        self
    }

    /// Removes every event listener.
    pub fn remove_all_events(&mut self) -> &mut Self {
        self.registry.clear_events();
        debug!("all events removed");
        self
    }

    /// Returns `true` if `widget` has an element binding.
    pub fn is_element_registered(&self, widget: WidgetId) -> bool {
        self.registry.is_element_registered(widget)
    }

    // ── Framing and routing settings ──────────────────────────────────────────

    pub fn with_prefix(&mut self, prefix: Key) -> &mut Self {
        self.config.prefix = Some(prefix);
        self
    }

    pub fn with_suffix(&mut self, suffix: Key) -> &mut Self {
        self.config.suffix = suffix;
        self
    }

    pub fn notify_only_active_event(&mut self, enabled: bool) -> &mut Self {
        self.config.notify_only_active_event = enabled;
        self
    }

    pub fn notify_callback_only(&mut self, enabled: bool) -> &mut Self {
        self.config.notify_callbacks_only = enabled;
        self
    }

    /// Marks `id` as the active event and turns on only-active-event routing.
    pub fn set_active_event(&mut self, id: EventId) -> &mut Self {
        self.registry.set_active_event(id);
        self.config.notify_only_active_event = true;
        self
    }

    /// Marks `widget` as the active element; clears the mark if `widget` is
    /// not registered.
    pub fn set_active_element(&mut self, widget: WidgetId) -> &mut Self {
        self.registry.set_active_element(widget);
        self
    }

    // ── Listening ─────────────────────────────────────────────────────────────

    /// Forgets the prefix and learns it from the first key of the next scan.
    ///
    /// `listener` (if any) receives the decoded prefix once learned.  Starts
    /// listening if the reader was stopped.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Source`] if attaching to a widget fails.
    pub fn detect_prefix(
        &mut self,
        listener: Option<PrefixCallback>,
    ) -> Result<&mut Self, ReaderError> {
        self.config.prefix = None;
        self.config.detect_prefix = true;
        self.prefix_listener = listener;
        self.capture.reset();
        debug!("prefix discovery started");
        self.start_listening()
    }

    /// Attaches to every registered widget.  No-op if already listening.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Source`] if attaching to a widget fails.  The
    /// widgets attached before the failure are detached again and the reader
    /// stays stopped.
    pub fn start_listening(&mut self) -> Result<&mut Self, ReaderError> {
        if self.listening {
            return Ok(self);
        }

        let widgets = self.registry.widgets();
        for (attached, &widget) in widgets.iter().enumerate() {
            if let Err(e) = self.source.subscribe(widget) {
                warn!(%widget, "failed to attach key handlers: {e}");
                for &done in &widgets[..attached] {
                    self.source.unsubscribe(done);
                }
                return Err(e.into());
            }
        }

        self.listening = true;
        debug!(widgets = widgets.len(), "listening started");
        Ok(self)
    }

    /// Detaches from every registered widget and drops any scan in progress.
    pub fn stop_listening(&mut self) -> &mut Self {
        if self.listening {
            for widget in self.registry.widgets() {
                self.source.unsubscribe(widget);
            }
            self.listening = false;
            debug!("listening stopped");
        }
        self.capture.reset();
        self
    }

    // ── Per-keystroke entry points ────────────────────────────────────────────

    /// Feeds one key notification through the capture machine.
    ///
    /// May set `event.handled`.  Returns the deliveries the event triggered
    /// without invoking them.
    pub fn process_key(&mut self, event: &mut KeyEvent) -> Dispatch {
        if !self.listening {
            return Dispatch::empty();
        }

        match self.capture.process(&mut self.config, event) {
            None => Dispatch::empty(),
            Some(CaptureOutcome::Decoded(code)) => {
                NotificationRouter::route_code(&self.registry, &self.config, &code, event)
            }
            Some(CaptureOutcome::PrefixLearned(prefix)) => NotificationRouter::route_prefix(
                &self.registry,
                &self.config,
                self.prefix_listener.as_ref(),
                prefix,
                event,
            ),
        }
    }

    /// Processes `event` and delivers the result immediately.
    ///
    /// Returns the number of callbacks invoked.
    pub fn handle_key(&mut self, event: &mut KeyEvent) -> usize {
        self.process_key(event).deliver()
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state(&self.config)
    }

    /// The configured or learned prefix; `None` while it is being learned.
    pub fn prefix(&self) -> Option<Key> {
        self.config.prefix
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn element_count(&self) -> usize {
        self.registry.elements().len()
    }

    pub fn event_count(&self) -> usize {
        self.registry.events().len()
    }

    pub fn active_event(&self) -> Option<EventId> {
        self.registry.active_event()
    }

    pub fn active_element(&self) -> Option<WidgetId> {
        self.registry.active_element()
    }
}

impl std::fmt::Debug for BarcodeReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarcodeReader")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("capture", &self.capture)
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}
