//! Mock key source for unit and integration testing.
//!
//! Records which widgets are subscribed and plays the host toolkit's part of
//! delivering key events: events raised on a widget that is not subscribed
//! never reach the reader, exactly as with a real toolkit after its handlers
//! were detached.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use wedge_core::{Key, WidgetId};

use super::{KeyEvent, KeyNotificationSource, SourceError};
use crate::application::reader::BarcodeReader;

#[derive(Default)]
struct MockState {
    subscribed: BTreeSet<WidgetId>,
    subscribe_calls: u32,
    unsubscribe_calls: u32,
    rejected: BTreeSet<WidgetId>,
}

/// A mock implementation of [`KeyNotificationSource`].
///
/// Clones share state, so a test can hand one clone to the reader and keep
/// another for inspection and event injection.
#[derive(Clone, Default)]
pub struct MockKeySource {
    state: Arc<Mutex<MockState>>,
}

impl MockKeySource {
    /// Creates a new mock source with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `subscribe(widget)` call fail.
    pub fn reject_widget(&self, widget: WidgetId) {
        self.lock().rejected.insert(widget);
    }

    /// Returns `true` if `widget` currently receives key notifications.
    pub fn is_subscribed(&self, widget: WidgetId) -> bool {
        self.lock().subscribed.contains(&widget)
    }

    /// Returns the subscribed widgets in ascending id order.
    pub fn subscribed(&self) -> Vec<WidgetId> {
        self.lock().subscribed.iter().copied().collect()
    }

    /// Returns the number of `subscribe` calls, successful or not.
    pub fn subscribe_calls(&self) -> u32 {
        self.lock().subscribe_calls
    }

    /// Returns the number of `unsubscribe` calls.
    pub fn unsubscribe_calls(&self) -> u32 {
        self.lock().unsubscribe_calls
    }

    /// Delivers one event to `reader` if its widget is subscribed.
    ///
    /// Returns the event as the toolkit would see it afterwards (with the
    /// `handled` flag possibly set), or `None` if it was never delivered.
    pub fn deliver(&self, reader: &mut BarcodeReader, mut event: KeyEvent) -> Option<KeyEvent> {
        if !self.is_subscribed(event.source) {
            return None;
        }
        reader.handle_key(&mut event);
        Some(event)
    }

    /// Types `keys` on `widget`, one press and one release per key.
    ///
    /// Returns every delivered event in order.
    pub fn type_keys(
        &self,
        reader: &mut BarcodeReader,
        widget: WidgetId,
        keys: &[Key],
    ) -> Vec<KeyEvent> {
        keys.iter()
            .flat_map(|&key| [KeyEvent::press(key, widget), KeyEvent::release(key, widget)])
            .filter_map(|event| self.deliver(reader, event))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("lock poisoned")
    }
}

impl KeyNotificationSource for MockKeySource {
    fn subscribe(&self, widget: WidgetId) -> Result<(), SourceError> {
        let mut state = self.lock();
        state.subscribe_calls += 1;
        if state.rejected.contains(&widget) {
            return Err(SourceError::UnknownWidget(widget));
        }
        state.subscribed.insert(widget);
        Ok(())
    }

    fn unsubscribe(&self, widget: WidgetId) {
        let mut state = self.lock();
        state.unsubscribe_calls += 1;
        state.subscribed.remove(&widget);
    }
}
