//! NotificationRouter: decides who receives a decoded scan.
//!
//! Routing never calls a subscriber directly.  It snapshots the matching
//! callbacks together with the results they should receive into a
//! [`Dispatch`], which the caller delivers once the reader's own state update
//! is complete.  A callback may therefore re-enter the reader and add or
//! remove bindings without disturbing the iteration that selected it.
//!
//! # Element routing
//!
//! 1. The first element whose widget is the event's source or original
//!    source receives the scan, and element routing stops there.
//! 2. Otherwise the scan falls back to the `always_notify` elements: only the
//!    active element if it is one of them, else all of them.
//!
//! # Event routing
//!
//! Independent of element routing and skipped entirely in callbacks-only
//! mode: either the active event alone, or every event, receives the scan
//! labelled with its own source label.

use tracing::trace;
use wedge_core::{DecodedResult, EventId, Key, KeyDecoder, ReaderConfig, WidgetId};

use super::registry::{BindingRegistry, ElementBinding, PrefixCallback, ResultCallback};
use crate::infrastructure::key_source::KeyEvent;

/// Who a [`Delivery`] is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryTarget {
    Element(WidgetId),
    Event(EventId),
    PrefixListener,
}

/// One pending callback invocation.
pub enum Delivery {
    /// A decoded result for an element or event subscriber.
    Result {
        target: DeliveryTarget,
        callback: ResultCallback,
        result: DecodedResult,
    },
    /// A learned prefix for the prefix-discovery listener.
    Prefix {
        listener: PrefixCallback,
        prefix: String,
    },
}

impl Delivery {
    pub fn target(&self) -> DeliveryTarget {
        match self {
            Delivery::Result { target, .. } => *target,
            Delivery::Prefix { .. } => DeliveryTarget::PrefixListener,
        }
    }

    /// The result carried by this delivery, if it is not a prefix notice.
    pub fn result(&self) -> Option<&DecodedResult> {
        match self {
            Delivery::Result { result, .. } => Some(result),
            Delivery::Prefix { .. } => None,
        }
    }

    fn invoke(self) {
        match self {
            Delivery::Result {
                callback, result, ..
            } => callback(result),
            Delivery::Prefix { listener, prefix } => listener(prefix),
        }
    }
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Delivery::Result { target, result, .. } => f
                .debug_struct("Result")
                .field("target", target)
                .field("result", result)
                .finish_non_exhaustive(),
            Delivery::Prefix { prefix, .. } => f
                .debug_struct("Prefix")
                .field("prefix", prefix)
                .finish_non_exhaustive(),
        }
    }
}

/// Snapshot of the callbacks selected for one key event.
#[derive(Debug, Default)]
pub struct Dispatch {
    deliveries: Vec<Delivery>,
}

impl Dispatch {
    /// A dispatch that delivers nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    /// Targets in delivery order.
    pub fn targets(&self) -> Vec<DeliveryTarget> {
        self.deliveries.iter().map(Delivery::target).collect()
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Invokes every callback in order and returns how many ran.
    pub fn deliver(self) -> usize {
        let count = self.deliveries.len();
        for delivery in self.deliveries {
            delivery.invoke();
        }
        count
    }

    fn push_element(&mut self, binding: &ElementBinding, result: DecodedResult) {
        self.deliveries.push(Delivery::Result {
            target: DeliveryTarget::Element(binding.widget),
            callback: binding.callback.clone(),
            result,
        });
    }
}

/// Stateless routing policy over a [`BindingRegistry`].
pub struct NotificationRouter;

impl NotificationRouter {
    /// Selects the subscribers of a decoded scan.
    pub fn route_code(
        registry: &BindingRegistry,
        config: &ReaderConfig,
        code: &str,
        event: &KeyEvent,
    ) -> Dispatch {
        let mut dispatch = Dispatch::empty();
        Self::route_to_elements(registry, code, event, &mut dispatch);
        if !config.notify_callbacks_only {
            Self::route_to_events(registry, config, code, event, &mut dispatch);
        }
        trace!(code, targets = dispatch.len(), "scan routed");
        dispatch
    }

    /// Selects the subscribers of a freshly learned prefix.
    ///
    /// The prefix-discovery listener (unless callbacks-only) and every element
    /// that is the event's widget or is `always_notify` are told.
    pub fn route_prefix(
        registry: &BindingRegistry,
        config: &ReaderConfig,
        listener: Option<&PrefixCallback>,
        prefix: Key,
        event: &KeyEvent,
    ) -> Dispatch {
        let text = KeyDecoder::decode(prefix);
        let mut dispatch = Dispatch::empty();

        if !config.notify_callbacks_only {
            if let Some(listener) = listener {
                dispatch.deliveries.push(Delivery::Prefix {
                    listener: listener.clone(),
                    prefix: text.to_string(),
                });
            }
        }

        for binding in registry.elements() {
            if is_event_widget(binding.widget, event) || binding.always_notify {
                let notice = DecodedResult::prefix_detected(text, binding.widget);
                dispatch.push_element(binding, notice);
            }
        }
        dispatch
    }

    fn route_to_elements(
        registry: &BindingRegistry,
        code: &str,
        event: &KeyEvent,
        dispatch: &mut Dispatch,
    ) {
        let elements = registry.elements();

        if let Some(owner) = elements.iter().find(|b| is_event_widget(b.widget, event)) {
            dispatch.push_element(owner, DecodedResult::for_element(code, owner.widget));
            return;
        }

        let always: Vec<&ElementBinding> = elements.iter().filter(|b| b.always_notify).collect();
        let active = registry
            .active_element()
            .and_then(|w| always.iter().find(|b| b.widget == w));

        match active {
            Some(binding) => {
                dispatch.push_element(binding, DecodedResult::for_element(code, binding.widget));
            }
            None => {
                for binding in &always {
                    let result = DecodedResult::for_element(code, binding.widget);
                    dispatch.push_element(binding, result);
                }
            }
        }
    }

    fn route_to_events(
        registry: &BindingRegistry,
        config: &ReaderConfig,
        code: &str,
        event: &KeyEvent,
        dispatch: &mut Dispatch,
    ) {
        let events = registry.events();
        let selected: Vec<_> = if config.notify_only_active_event {
            events
                .iter()
                .filter(|e| Some(e.id) == registry.active_event())
                .take(1)
                .collect()
        } else {
            events.iter().collect()
        };

        for binding in selected {
            dispatch.deliveries.push(Delivery::Result {
                target: DeliveryTarget::Event(binding.id),
                callback: binding.listener.clone(),
                result: DecodedResult::for_event(
                    code,
                    binding.label.clone(),
                    event.original_source,
                ),
            });
        }
    }
}

fn is_event_widget(widget: WidgetId, event: &KeyEvent) -> bool {
    widget == event.source || Some(widget) == event.original_source
}
