//! BindingRegistry: element and event subscriptions of one reader.
//!
//! The registry is the reader's in-memory table of everyone who wants scans:
//!
//! - **Element bindings** tie a host widget to a callback.  A scan typed into
//!   that widget goes to its callback.  Bindings flagged `always_notify` also
//!   receive scans typed anywhere else that no widget claimed.
//! - **Event bindings** are logical listeners identified by an [`EventId`]
//!   and labelled with a free-form source string.  They are not tied to any
//!   widget.
//!
//! Two single-slot markers narrow the fallback broadcast: the *active
//! element* (which always-notify element wins) and the *active event* (which
//! event listener wins when only-active-event routing is on).
//!
//! # Vec choice
//!
//! Both collections are `Vec`s: routing picks the *first* matching element,
//! so registration order is observable and must be preserved.  A reader has
//! a handful of bindings, so linear lookup is fine.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use wedge_core::{DecodedResult, EventId, WidgetId};

/// Callback receiving decoded results.
pub type ResultCallback = Arc<dyn Fn(DecodedResult) + Send + Sync>;

/// Callback receiving the decoded text of a freshly learned prefix key.
pub type PrefixCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Error type for registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("there is a barcode event registered with id {0}")]
    DuplicateEventId(EventId),
}

/// A widget subscribed to scans typed into it.
#[derive(Clone)]
pub struct ElementBinding {
    pub widget: WidgetId,
    pub always_notify: bool,
    pub callback: ResultCallback,
}

impl fmt::Debug for ElementBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementBinding")
            .field("widget", &self.widget)
            .field("always_notify", &self.always_notify)
            .finish_non_exhaustive()
    }
}

/// A logical listener identified by an [`EventId`].
#[derive(Clone)]
pub struct EventBinding {
    pub id: EventId,
    pub label: String,
    pub listener: ResultCallback,
}

impl fmt::Debug for EventBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// In-memory registry of element and event bindings.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    elements: Vec<ElementBinding>,
    events: Vec<EventBinding>,
    active_element: Option<WidgetId>,
    active_event: Option<EventId>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget, replacing any existing binding for it in place.
    ///
    /// An `always_notify` binding becomes the active element.  Returns `true`
    /// if an existing binding was replaced.
    pub fn register_element(
        &mut self,
        widget: WidgetId,
        always_notify: bool,
        callback: ResultCallback,
    ) -> bool {
        let binding = ElementBinding {
            widget,
            always_notify,
            callback,
        };
        let replaced = match self.elements.iter_mut().find(|b| b.widget == widget) {
            Some(existing) => {
                *existing = binding;
                true
            }
            None => {
                self.elements.push(binding);
                false
            }
        };
        if always_notify {
            self.active_element = Some(widget);
        }
        replaced
    }

    /// Removes the binding for `widget`, returning it if present.
    pub fn unregister_element(&mut self, widget: WidgetId) -> Option<ElementBinding> {
        let index = self.elements.iter().position(|b| b.widget == widget)?;
        if self.active_element == Some(widget) {
            self.active_element = None;
        }
        Some(self.elements.remove(index))
    }

    /// Returns `true` if `widget` has a binding.
    pub fn is_element_registered(&self, widget: WidgetId) -> bool {
        self.elements.iter().any(|b| b.widget == widget)
    }

    /// Registers an event listener.
    ///
    /// The first listener registered into an empty set becomes the active
    /// event.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateEventId`] if `id` is already taken;
    /// the new listener is not added.
    pub fn register_event(
        &mut self,
        id: EventId,
        label: impl Into<String>,
        listener: ResultCallback,
    ) -> Result<(), RegistryError> {
        if self.events.iter().any(|e| e.id == id) {
            return Err(RegistryError::DuplicateEventId(id));
        }
        self.events.push(EventBinding {
            id,
            label: label.into(),
            listener,
        });
        if self.events.len() == 1 {
            self.active_event = Some(id);
        }
        Ok(())
    }

    /// Removes the listener with `id`, returning it if present.
    pub fn unregister_event(&mut self, id: EventId) -> Option<EventBinding> {
        let index = self.events.iter().position(|e| e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Removes every event listener.  The active event id is kept.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Marks `widget` as the active element, or clears the mark if `widget`
    /// is not registered.
    pub fn set_active_element(&mut self, widget: WidgetId) {
        self.active_element = self.is_element_registered(widget).then_some(widget);
    }

    /// Marks `id` as the active event.  The id need not be registered yet.
    pub fn set_active_event(&mut self, id: EventId) {
        self.active_event = Some(id);
    }

    pub fn active_element(&self) -> Option<WidgetId> {
        self.active_element
    }

    pub fn active_event(&self) -> Option<EventId> {
        self.active_event
    }

    /// Element bindings in registration order.
    pub fn elements(&self) -> &[ElementBinding] {
        &self.elements
    }

    /// Event bindings in registration order.
    pub fn events(&self) -> &[EventBinding] {
        &self.events
    }

    /// Widgets of all element bindings in registration order.
    pub fn widgets(&self) -> Vec<WidgetId> {
        self.elements.iter().map(|b| b.widget).collect()
    }
}
