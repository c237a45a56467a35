//! Integration tests for the scan pipeline.
//!
//! These tests exercise wedge-reader end-to-end: `BarcodeReader` +
//! `CaptureStateMachine` + `NotificationRouter` driven by the mock key source,
//! the same way a host toolkit adapter would drive it.

use std::sync::{Arc, Mutex};

use wedge_core::{DecodedResult, EventId, Key, KeyDecoder, WidgetId};
use wedge_reader::application::capture::CaptureState;
use wedge_reader::application::registry::PrefixCallback;
use wedge_reader::infrastructure::key_source::mock::MockKeySource;
use wedge_reader::{
    BarcodeReader, DeliveryTarget, KeyEvent, KeyNotificationSource, KeyPhase, ReaderError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const INPUT: WidgetId = WidgetId(1);
const OTHER: WidgetId = WidgetId(2);

type Seen = Arc<Mutex<Vec<DecodedResult>>>;

fn recorder() -> (impl Fn(DecodedResult) + Send + Sync + 'static, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (move |r: DecodedResult| sink.lock().unwrap().push(r), seen)
}

fn barcodes(seen: &Seen) -> Vec<String> {
    seen.lock().unwrap().iter().map(|r| r.barcode.clone()).collect()
}

/// Prefix F12, payload, suffix Enter.
fn framed(payload: &[Key]) -> Vec<Key> {
    let mut keys = vec![Key::F12];
    keys.extend_from_slice(payload);
    keys.push(Key::Enter);
    keys
}

fn listening_reader(source: &MockKeySource) -> BarcodeReader {
    let mut reader = BarcodeReader::new(Arc::new(source.clone()));
    reader.start_listening().expect("start listening");
    reader
}

// ── Decoding ──────────────────────────────────────────────────────────────────

#[test]
fn test_digit_row_and_numpad_decode_identically() {
    for value in 0..=9u8 {
        let row = Key::ALL
            .iter()
            .copied()
            .find(|k| k.digit_value() == Some(value) && k.name().starts_with('D'));
        let pad = Key::ALL
            .iter()
            .copied()
            .find(|k| k.digit_value() == Some(value) && k.name().starts_with("NumPad"));
        let (row, pad) = (row.expect("row digit"), pad.expect("pad digit"));

        assert_eq!(KeyDecoder::decode(row), KeyDecoder::decode(pad));
        assert_eq!(KeyDecoder::decode(row), value.to_string());
    }
}

#[test]
fn test_framed_scan_emits_exactly_the_payload() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();

    // Act
    let events = source.type_keys(&mut reader, INPUT, &framed(&[Key::D1, Key::D2, Key::D3]));

    // Assert
    assert_eq!(barcodes(&seen), vec!["123"]);
    let presses: Vec<_> = events.iter().filter(|e| e.phase == KeyPhase::Press).collect();
    assert!(presses.iter().all(|e| e.handled), "every scan key press must be consumed");
    assert!(events.last().is_some_and(|e| e.handled), "suffix release must be consumed");
}

#[test]
fn test_mixed_digit_sources_and_letters_decode() {
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();

    source.type_keys(
        &mut reader,
        INPUT,
        &framed(&[Key::A, Key::NumPad4, Key::D2, Key::Minus, Key::Z]),
    );

    assert_eq!(barcodes(&seen), vec!["A42MinusZ"]);
}

#[test]
fn test_empty_frame_emits_nothing() {
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();

    source.type_keys(&mut reader, INPUT, &framed(&[]));

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(reader.capture_state(), CaptureState::Idle);
}

#[test]
fn test_ordinary_typing_passes_through_untouched() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, true, cb).unwrap();

    // Act
    let events = source.type_keys(
        &mut reader,
        INPUT,
        &[Key::H, Key::I, Key::D1, Key::Enter],
    );

    // Assert
    assert_eq!(events.len(), 8);
    assert!(events.iter().all(|e| !e.handled), "typing must not be consumed");
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(reader.capture_state(), CaptureState::Idle);
}

#[test]
fn test_back_to_back_scans_each_emit() {
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();

    source.type_keys(&mut reader, INPUT, &framed(&[Key::D1]));
    source.type_keys(&mut reader, INPUT, &[Key::X]);
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D2, Key::D3]));

    assert_eq!(barcodes(&seen), vec!["1", "23"]);
}

#[test]
fn test_custom_framing_keys() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader
        .with_prefix(Key::F2)
        .with_suffix(Key::Tab)
        .with_element(INPUT, false, cb)
        .unwrap();

    // Act – the old framing no longer captures
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D9]));
    source.type_keys(&mut reader, INPUT, &[Key::F2, Key::D7, Key::Tab]);

    // Assert
    assert_eq!(barcodes(&seen), vec!["7"]);
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[test]
fn test_duplicate_event_id_keeps_first_listener() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let id = EventId::new_v4();
    let (first, first_seen) = recorder();
    let (second, second_seen) = recorder();
    reader.with_element(INPUT, false, |_| {}).unwrap();
    reader.with_event(id, "first", first).unwrap();

    // Act
    let err = reader.with_event(id, "second", second).map(|_| ()).unwrap_err();
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D5]));

    // Assert
    assert_eq!(err, ReaderError::DuplicateEventId(id));
    assert_eq!(barcodes(&first_seen), vec!["5"]);
    assert!(second_seen.lock().unwrap().is_empty());
}

#[test]
fn test_only_active_event_receives_scan() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (a_cb, a_seen) = recorder();
    let (b_cb, b_seen) = recorder();
    let a = EventId::new_v4();
    let b = EventId::new_v4();
    reader.with_element(INPUT, false, |_| {}).unwrap();
    reader.with_event(a, "a", a_cb).unwrap();
    reader.with_event(b, "b", b_cb).unwrap();
    reader.notify_only_active_event(true);

    // Act – the first registered event is active
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D1]));
    reader.set_active_event(b);
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D2]));

    // Assert
    assert_eq!(barcodes(&a_seen), vec!["1"]);
    assert_eq!(barcodes(&b_seen), vec!["2"]);
    assert_eq!(b_seen.lock().unwrap()[0].source_label, "b");
    assert_eq!(b_seen.lock().unwrap()[0].reader_source, Some(INPUT));
}

#[test]
fn test_callbacks_only_mode_skips_events() {
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (element_cb, element_seen) = recorder();
    let (event_cb, event_seen) = recorder();
    reader.with_element(INPUT, false, element_cb).unwrap();
    reader.with_event(EventId::new_v4(), "e", event_cb).unwrap();
    reader.notify_callback_only(true);

    source.type_keys(&mut reader, INPUT, &framed(&[Key::D3]));

    assert_eq!(barcodes(&element_seen), vec!["3"]);
    assert!(event_seen.lock().unwrap().is_empty());
}

#[test]
fn test_scan_in_unclaimed_widget_falls_back_to_always_notify() {
    // Arrange – OTHER raises notifications (e.g. a container the host
    // attached itself) but has no binding, so nobody claims it by widget
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (fallback_cb, fallback_seen) = recorder();
    let (plain_cb, plain_seen) = recorder();
    reader.with_element(INPUT, true, fallback_cb).unwrap();
    reader.with_element(WidgetId(3), false, plain_cb).unwrap();
    source.subscribe(OTHER).unwrap();

    // Act
    source.type_keys(&mut reader, OTHER, &framed(&[Key::D6]));

    // Assert
    assert_eq!(barcodes(&fallback_seen), vec!["6"]);
    assert_eq!(fallback_seen.lock().unwrap()[0].reader_source, Some(INPUT));
    assert!(plain_seen.lock().unwrap().is_empty());
}

#[test]
fn test_dispatch_targets_can_be_inspected_before_delivery() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let id = EventId::new_v4();
    reader.with_element(INPUT, false, |_| {}).unwrap();
    reader.with_event(id, "e", |_| {}).unwrap();
    for key in framed(&[Key::D4]) {
        reader.process_key(&mut KeyEvent::press(key, INPUT));
        if key != Key::Enter {
            reader.process_key(&mut KeyEvent::release(key, INPUT));
        }
    }

    // Act
    let dispatch = reader.process_key(&mut KeyEvent::release(Key::Enter, INPUT));

    // Assert
    assert_eq!(
        dispatch.targets(),
        vec![DeliveryTarget::Element(INPUT), DeliveryTarget::Event(id)]
    );
    assert_eq!(dispatch.deliver(), 2);
}

// ── Registration lifecycle ────────────────────────────────────────────────────

#[test]
fn test_removed_element_is_detached_and_unreachable() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();

    // Act
    reader.remove_element(INPUT);
    let delivered = source.type_keys(&mut reader, INPUT, &framed(&[Key::D1]));

    // Assert
    assert!(!source.is_subscribed(INPUT));
    assert!(delivered.is_empty(), "no notification reaches a detached widget");
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_reregistration_replaces_callback() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (old_cb, old_seen) = recorder();
    let (new_cb, new_seen) = recorder();
    reader.with_element(INPUT, false, old_cb).unwrap();

    // Act
    reader.with_element(INPUT, false, new_cb).unwrap();
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D8]));

    // Assert
    assert_eq!(reader.element_count(), 1);
    assert!(old_seen.lock().unwrap().is_empty());
    assert_eq!(barcodes(&new_seen), vec!["8"]);
}

#[test]
fn test_stop_and_start_reattach_without_reregistering() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = listening_reader(&source);
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();
    reader.with_element(OTHER, false, |_| {}).unwrap();
    source.type_keys(&mut reader, INPUT, &[Key::F12, Key::D1]);

    // Act – stop mid-scan
    reader.stop_listening();
    let while_stopped = source.type_keys(&mut reader, INPUT, &framed(&[Key::D2]));
    reader.start_listening().unwrap();
    source.type_keys(&mut reader, INPUT, &[Key::D3, Key::Enter]);
    source.type_keys(&mut reader, INPUT, &framed(&[Key::D4]));

    // Assert
    assert!(while_stopped.is_empty());
    assert_eq!(source.subscribed(), vec![INPUT, OTHER]);
    // The partial scan was dropped; only the fresh frame decodes.
    assert_eq!(barcodes(&seen), vec!["4"]);
}

// ── Prefix discovery ──────────────────────────────────────────────────────────

#[test]
fn test_prefix_discovery_learns_then_frames_with_learned_prefix() {
    // Arrange
    let source = MockKeySource::new();
    let mut reader = BarcodeReader::new(Arc::new(source.clone()));
    let (cb, seen) = recorder();
    reader.with_element(INPUT, false, cb).unwrap();
    let learned = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&learned);
    let listener: PrefixCallback = Arc::new(move |p: String| sink.lock().unwrap().push(p));

    // Act
    reader.detect_prefix(Some(listener)).unwrap();
    source.type_keys(&mut reader, INPUT, &[Key::F7, Key::D1, Key::D2, Key::Enter]);
    source.type_keys(&mut reader, INPUT, &[Key::F12, Key::D5, Key::Enter]);
    source.type_keys(&mut reader, INPUT, &[Key::F7, Key::D9, Key::Enter]);

    // Assert
    assert_eq!(reader.prefix(), Some(Key::F7));
    assert_eq!(*learned.lock().unwrap(), vec!["F7".to_string()]);
    let results = seen.lock().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_prefix_detection);
    assert_eq!(results[0].barcode, "F7");
    assert!(!results[1].is_prefix_detection);
    assert_eq!(results[1].barcode, "9");
}

// ── Re-entrant callbacks ──────────────────────────────────────────────────────

#[test]
fn test_callback_can_modify_reader_after_dispatch() {
    // Arrange – a shared reader whose element callback removes itself
    let source = MockKeySource::new();
    let reader = Arc::new(Mutex::new(listening_reader(&source)));
    let hits = Arc::new(Mutex::new(0u32));
    {
        let reader_in_cb = Arc::clone(&reader);
        let hits_in_cb = Arc::clone(&hits);
        reader
            .lock()
            .unwrap()
            .with_element(INPUT, false, move |_| {
                *hits_in_cb.lock().unwrap() += 1;
                reader_in_cb.lock().unwrap().remove_element(INPUT);
            })
            .unwrap();
    }

    // Act – process under the lock, deliver after releasing it
    for key in framed(&[Key::D1]) {
        for mut event in [KeyEvent::press(key, INPUT), KeyEvent::release(key, INPUT)] {
            let dispatch = reader.lock().unwrap().process_key(&mut event);
            dispatch.deliver();
        }
    }

    // Assert
    assert_eq!(*hits.lock().unwrap(), 1);
    assert!(!reader.lock().unwrap().is_element_registered(INPUT));
    assert!(!source.is_subscribed(INPUT));
}
