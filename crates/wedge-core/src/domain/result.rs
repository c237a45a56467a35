use serde::Serialize;

use super::WidgetId;

/// A decoded scan as delivered to one subscriber.
///
/// Built once per delivery; element subscribers and event subscribers get
/// differently populated copies of the same barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedResult {
    /// Decoded payload text, without the framing keys.
    pub barcode: String,
    /// Widget the scan is attributed to, if it is a known widget.
    pub reader_source: Option<WidgetId>,
    /// Label of the event subscription; empty for element deliveries.
    pub source_label: String,
    /// `true` when `barcode` holds a freshly learned prefix key, not a scan.
    pub is_prefix_detection: bool,
}

impl DecodedResult {
    /// Result for an element subscriber.
    pub fn for_element(barcode: impl Into<String>, widget: WidgetId) -> Self {
        Self {
            barcode: barcode.into(),
            reader_source: Some(widget),
            source_label: String::new(),
            is_prefix_detection: false,
        }
    }

    /// Result for an event subscriber.
    pub fn for_event(
        barcode: impl Into<String>,
        label: impl Into<String>,
        reader_source: Option<WidgetId>,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            reader_source,
            source_label: label.into(),
            is_prefix_detection: false,
        }
    }

    /// Prefix-detection notice for an element subscriber.
    pub fn prefix_detected(prefix: impl Into<String>, widget: WidgetId) -> Self {
        Self {
            is_prefix_detection: true,
            ..Self::for_element(prefix, widget)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_result_has_no_label() {
        let r = DecodedResult::for_element("123", WidgetId(1));
        assert_eq!(r.barcode, "123");
        assert_eq!(r.reader_source, Some(WidgetId(1)));
        assert!(r.source_label.is_empty());
        assert!(!r.is_prefix_detection);
    }

    #[test]
    fn test_event_result_carries_label_and_optional_source() {
        let r = DecodedResult::for_event("ABC", "inventory", None);
        assert_eq!(r.source_label, "inventory");
        assert_eq!(r.reader_source, None);
    }

    #[test]
    fn test_prefix_detected_sets_flag() {
        let r = DecodedResult::prefix_detected("F12", WidgetId(3));
        assert!(r.is_prefix_detection);
        assert_eq!(r.barcode, "F12");
        assert_eq!(r.reader_source, Some(WidgetId(3)));
    }
}
