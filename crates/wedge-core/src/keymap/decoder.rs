//! Key-to-text decoding for captured scanner payloads.

use super::key::Key;

/// Stateless decoder turning captured keys back into payload text.
pub struct KeyDecoder;

impl KeyDecoder {
    /// Renders one key as text.
    ///
    /// Digit-row and numeric-pad digits both decode to their digit character;
    /// every other key decodes to its symbolic name (`Key::A` → `"A"`,
    /// `Key::Enter` → `"Enter"`).
    pub fn decode(key: Key) -> &'static str {
        match key.digit_value() {
            Some(d) => DIGITS[usize::from(d)],
            None => key.name(),
        }
    }

    /// Decodes a run of keys and concatenates the results.
    pub fn decode_sequence(keys: &[Key]) -> String {
        keys.iter().map(|&k| Self::decode(k)).collect()
    }
}

const DIGITS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
