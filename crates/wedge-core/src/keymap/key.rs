//! Symbolic key codes delivered by the host toolkit.
//!
//! Each variant is numbered with its USB HID Usage ID (page 0x07,
//! Keyboard/Keypad) so host adapters have one canonical numeric code to
//! translate their native key enumeration into.
//!
//! # Why do digits appear twice? (for beginners)
//!
//! A keyboard has two physically different sets of digit keys: the row above
//! the letters ([`Key::D0`]–[`Key::D9`]) and the numeric keypad
//! ([`Key::NumPad0`]–[`Key::NumPad9`]).  Scanners are configured to emit one
//! or the other, so both must decode to the same digit character.
//!
//! # The `Unknown` sentinel
//!
//! Keys that have no standard mapping arrive as [`Key::Unknown`].  They are
//! never a valid prefix or suffix but may still appear inside a payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a key name cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown key name: {0:?}")]
pub struct KeyParseError(pub String);

/// Symbolic key code (HID Usage ID on the keyboard/keypad page).
///
/// Serializes by variant name, so configuration files say `prefix = "F12"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Key {
    // Letters (HID 0x04–0x1D)
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    // Digit row (HID 0x1E–0x27)
    D1 = 0x1E,
    D2 = 0x1F,
    D3 = 0x20,
    D4 = 0x21,
    D5 = 0x22,
    D6 = 0x23,
    D7 = 0x24,
    D8 = 0x25,
    D9 = 0x26,
    D0 = 0x27,

    // Control and punctuation keys (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46–0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Numeric pad (HID 0x53–0x63)
    NumLock = 0x53,
    NumPadDivide = 0x54,
    NumPadMultiply = 0x55,
    NumPadSubtract = 0x56,
    NumPadAdd = 0x57,
    NumPadEnter = 0x58,
    NumPad1 = 0x59,
    NumPad2 = 0x5A,
    NumPad3 = 0x5B,
    NumPad4 = 0x5C,
    NumPad5 = 0x5D,
    NumPad6 = 0x5E,
    NumPad7 = 0x5F,
    NumPad8 = 0x60,
    NumPad9 = 0x61,
    NumPad0 = 0x62,
    NumPadDecimal = 0x63,

    ContextMenu = 0x65,

    // Modifier keys (HID 0xE0–0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,

    /// Sentinel for keys with no mapping.
    Unknown = 0x0000,
}

impl Key {
    /// Every key variant, in HID order, with [`Key::Unknown`] last.
    pub const ALL: &'static [Key] = &[
        Key::A,
        Key::B,
        Key::C,
        Key::D,
        Key::E,
        Key::F,
        Key::G,
        Key::H,
        Key::I,
        Key::J,
        Key::K,
        Key::L,
        Key::M,
        Key::N,
        Key::O,
        Key::P,
        Key::Q,
        Key::R,
        Key::S,
        Key::T,
        Key::U,
        Key::V,
        Key::W,
        Key::X,
        Key::Y,
        Key::Z,
        Key::D1,
        Key::D2,
        Key::D3,
        Key::D4,
        Key::D5,
        Key::D6,
        Key::D7,
        Key::D8,
        Key::D9,
        Key::D0,
        Key::Enter,
        Key::Escape,
        Key::Backspace,
        Key::Tab,
        Key::Space,
        Key::Minus,
        Key::Equal,
        Key::BracketLeft,
        Key::BracketRight,
        Key::Backslash,
        Key::Semicolon,
        Key::Quote,
        Key::Backquote,
        Key::Comma,
        Key::Period,
        Key::Slash,
        Key::CapsLock,
        Key::F1,
        Key::F2,
        Key::F3,
        Key::F4,
        Key::F5,
        Key::F6,
        Key::F7,
        Key::F8,
        Key::F9,
        Key::F10,
        Key::F11,
        Key::F12,
        Key::PrintScreen,
        Key::ScrollLock,
        Key::Pause,
        Key::Insert,
        Key::Home,
        Key::PageUp,
        Key::Delete,
        Key::End,
        Key::PageDown,
        Key::ArrowRight,
        Key::ArrowLeft,
        Key::ArrowDown,
        Key::ArrowUp,
        Key::NumLock,
        Key::NumPadDivide,
        Key::NumPadMultiply,
        Key::NumPadSubtract,
        Key::NumPadAdd,
        Key::NumPadEnter,
        Key::NumPad1,
        Key::NumPad2,
        Key::NumPad3,
        Key::NumPad4,
        Key::NumPad5,
        Key::NumPad6,
        Key::NumPad7,
        Key::NumPad8,
        Key::NumPad9,
        Key::NumPad0,
        Key::NumPadDecimal,
        Key::ContextMenu,
        Key::ControlLeft,
        Key::ShiftLeft,
        Key::AltLeft,
        Key::MetaLeft,
        Key::ControlRight,
        Key::ShiftRight,
        Key::AltRight,
        Key::MetaRight,
        Key::Unknown,
    ];

    /// Converts a raw HID Usage ID to a [`Key`].
    ///
    /// This is the translation entry point for host adapters: an adapter maps
    /// its toolkit's key code to the HID usage and builds its `KeyEvent` from
    /// the result.  Returns [`Key::Unknown`] if the value is not assigned to
    /// any variant.
    pub fn from_hid_usage(value: u16) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_hid_usage() == value)
            .unwrap_or(Key::Unknown)
    }

    /// Returns the raw HID Usage ID for this key, the inverse of
    /// [`Key::from_hid_usage`] used by adapters that emit keys back to a host.
    pub fn as_hid_usage(self) -> u16 {
        self as u16
    }

    /// Returns the symbolic name of the key (identical to the variant name).
    pub fn name(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::B => "B",
            Key::C => "C",
            Key::D => "D",
            Key::E => "E",
            Key::F => "F",
            Key::G => "G",
            Key::H => "H",
            Key::I => "I",
            Key::J => "J",
            Key::K => "K",
            Key::L => "L",
            Key::M => "M",
            Key::N => "N",
            Key::O => "O",
            Key::P => "P",
            Key::Q => "Q",
            Key::R => "R",
            Key::S => "S",
            Key::T => "T",
            Key::U => "U",
            Key::V => "V",
            Key::W => "W",
            Key::X => "X",
            Key::Y => "Y",
            Key::Z => "Z",
            Key::D1 => "D1",
            Key::D2 => "D2",
            Key::D3 => "D3",
            Key::D4 => "D4",
            Key::D5 => "D5",
            Key::D6 => "D6",
            Key::D7 => "D7",
            Key::D8 => "D8",
            Key::D9 => "D9",
            Key::D0 => "D0",
            Key::Enter => "Enter",
            Key::Escape => "Escape",
            Key::Backspace => "Backspace",
            Key::Tab => "Tab",
            Key::Space => "Space",
            Key::Minus => "Minus",
            Key::Equal => "Equal",
            Key::BracketLeft => "BracketLeft",
            Key::BracketRight => "BracketRight",
            Key::Backslash => "Backslash",
            Key::Semicolon => "Semicolon",
            Key::Quote => "Quote",
            Key::Backquote => "Backquote",
            Key::Comma => "Comma",
            Key::Period => "Period",
            Key::Slash => "Slash",
            Key::CapsLock => "CapsLock",
            Key::F1 => "F1",
            Key::F2 => "F2",
            Key::F3 => "F3",
            Key::F4 => "F4",
            Key::F5 => "F5",
            Key::F6 => "F6",
            Key::F7 => "F7",
            Key::F8 => "F8",
            Key::F9 => "F9",
            Key::F10 => "F10",
            Key::F11 => "F11",
            Key::F12 => "F12",
            Key::PrintScreen => "PrintScreen",
            Key::ScrollLock => "ScrollLock",
            Key::Pause => "Pause",
            Key::Insert => "Insert",
            Key::Home => "Home",
            Key::PageUp => "PageUp",
            Key::Delete => "Delete",
            Key::End => "End",
            Key::PageDown => "PageDown",
            Key::ArrowRight => "ArrowRight",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowUp => "ArrowUp",
            Key::NumLock => "NumLock",
            Key::NumPadDivide => "NumPadDivide",
            Key::NumPadMultiply => "NumPadMultiply",
            Key::NumPadSubtract => "NumPadSubtract",
            Key::NumPadAdd => "NumPadAdd",
            Key::NumPadEnter => "NumPadEnter",
            Key::NumPad1 => "NumPad1",
            Key::NumPad2 => "NumPad2",
            Key::NumPad3 => "NumPad3",
            Key::NumPad4 => "NumPad4",
            Key::NumPad5 => "NumPad5",
            Key::NumPad6 => "NumPad6",
            Key::NumPad7 => "NumPad7",
            Key::NumPad8 => "NumPad8",
            Key::NumPad9 => "NumPad9",
            Key::NumPad0 => "NumPad0",
            Key::NumPadDecimal => "NumPadDecimal",
            Key::ContextMenu => "ContextMenu",
            Key::ControlLeft => "ControlLeft",
            Key::ShiftLeft => "ShiftLeft",
            Key::AltLeft => "AltLeft",
            Key::MetaLeft => "MetaLeft",
            Key::ControlRight => "ControlRight",
            Key::ShiftRight => "ShiftRight",
            Key::AltRight => "AltRight",
            Key::MetaRight => "MetaRight",
            Key::Unknown => "Unknown",
        }
    }

    /// Returns the digit value for digit-row and numeric-pad digit keys.
    pub fn digit_value(self) -> Option<u8> {
        match self {
            Key::D0 | Key::NumPad0 => Some(0),
            Key::D1 | Key::NumPad1 => Some(1),
            Key::D2 | Key::NumPad2 => Some(2),
            Key::D3 | Key::NumPad3 => Some(3),
            Key::D4 | Key::NumPad4 => Some(4),
            Key::D5 | Key::NumPad5 => Some(5),
            Key::D6 | Key::NumPad6 => Some(6),
            Key::D7 | Key::NumPad7 => Some(7),
            Key::D8 | Key::NumPad8 => Some(8),
            Key::D9 | Key::NumPad9 => Some(9),
            _ => None,
        }
    }

}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    /// Parses a key name case-insensitively.
    ///
    /// A bare digit `"0"`–`"9"` parses as the digit-row key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let [b @ b'0'..=b'9'] = s.as_bytes() {
            let digit_row = [
                Key::D0, Key::D1, Key::D2, Key::D3, Key::D4, Key::D5, Key::D6, Key::D7, Key::D8,
                Key::D9,
            ];
            return Ok(digit_row[usize::from(b - b'0')]);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| KeyParseError(s.to_string()))
    }
}
