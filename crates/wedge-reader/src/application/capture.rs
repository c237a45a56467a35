//! CaptureStateMachine: separates scanner bursts from human typing.
//!
//! The machine watches every key notification of the subscribed widgets and
//! keeps a buffer of the keys that belong to a scan in progress.
//!
//! # How a scan is framed (for beginners)
//!
//! With prefix `F12` and suffix `Enter`, scanning "123" produces
//!
//! ```text
//! press F12, release F12, press 1, release 1, ... press Enter, release Enter
//! ```
//!
//! - A **press** is captured only if it is the prefix or the buffer already
//!   starts with the prefix.  Anything else is ordinary typing and passes
//!   through untouched.
//! - A **release** of the suffix closes the frame: if the buffer reads
//!   `prefix, payload.., suffix` with a non-empty payload, the payload is
//!   decoded and emitted.  The buffer is cleared either way.
//!
//! # States
//!
//! ```text
//!            prefix press             suffix release
//!   Idle  ───────────────►  Capturing  ───────────────►  Idle
//!     ▲
//!     │ suffix release (prefix learned)
//!   PrefixLearning
//! ```
//!
//! In `PrefixLearning` every press is captured and the first one becomes the
//! prefix.  The suffix release confirms it and returns the machine to normal
//! framing with the learned prefix.
//!
//! Nothing here can fail: malformed bursts are dropped silently.

use tracing::{debug, trace};
use wedge_core::{Key, KeyDecoder, ReaderConfig};

use crate::infrastructure::key_source::{KeyEvent, KeyPhase};

/// Observable state of the capture machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Buffer empty, waiting for a prefix.
    Idle,
    /// Buffer holds a prefix-led sequence.
    Capturing,
    /// Prefix discovery is running.
    PrefixLearning,
}

/// What a processed key event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A complete frame was decoded into this payload.
    Decoded(String),
    /// Prefix discovery finished and learned this key.
    PrefixLearned(Key),
}

/// The capture buffer plus the logic that feeds and drains it.
#[derive(Debug, Default)]
pub struct CaptureStateMachine {
    buffer: Vec<Key>,
}

impl CaptureStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state under `config`.
    pub fn state(&self, config: &ReaderConfig) -> CaptureState {
        if config.detect_prefix {
            CaptureState::PrefixLearning
        } else if self.buffer.is_empty() {
            CaptureState::Idle
        } else {
            CaptureState::Capturing
        }
    }

    /// Keys captured since the last reset.
    pub fn buffer(&self) -> &[Key] {
        &self.buffer
    }

    /// Discards any scan in progress.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Feeds one key event through the machine.
    ///
    /// May set `event.handled`, and updates `config.prefix` and
    /// `config.detect_prefix` while learning a prefix.
    pub fn process(
        &mut self,
        config: &mut ReaderConfig,
        event: &mut KeyEvent,
    ) -> Option<CaptureOutcome> {
        match event.phase {
            KeyPhase::Press => {
                self.on_press(config, event);
                None
            }
            KeyPhase::Release => self.on_release(config, event),
        }
    }

    fn on_press(&mut self, config: &mut ReaderConfig, event: &mut KeyEvent) {
        if config.detect_prefix {
            event.handled = true;
            if self.buffer.is_empty() {
                config.prefix = Some(event.key);
            }
            self.buffer.push(event.key);
            trace!(key = %event.key, len = self.buffer.len(), "learning: key captured");
            return;
        }

        let Some(prefix) = config.prefix else {
            return;
        };
        if event.key == prefix || self.buffer.first() == Some(&prefix) {
            event.handled = true;
            self.buffer.push(event.key);
            trace!(key = %event.key, len = self.buffer.len(), "key captured");
        }
    }

    fn on_release(
        &mut self,
        config: &mut ReaderConfig,
        event: &mut KeyEvent,
    ) -> Option<CaptureOutcome> {
        let mut outcome = None;

        if event.key == config.suffix {
            if config.detect_prefix {
                if let Some(&first) = self.buffer.first() {
                    config.prefix = Some(first);
                    config.detect_prefix = false;
                    debug!(prefix = %first, "prefix learned");
                    outcome = Some(CaptureOutcome::PrefixLearned(first));
                }
            } else if let Some(code) = self.framed_payload(config) {
                event.handled = true;
                debug!(code = %code, "scan decoded");
                outcome = Some(CaptureOutcome::Decoded(code));
            } else if !self.buffer.is_empty() {
                debug!(len = self.buffer.len(), "malformed frame discarded");
            }
            self.buffer.clear();
        }

        // Unrelated keystrokes interleaved with a capture can leave a buffer
        // that no longer starts with the prefix.
        if !self.buffer.is_empty() && self.buffer.first() != config.prefix.as_ref() {
            trace!(len = self.buffer.len(), "buffer lost its prefix; cleared");
            self.buffer.clear();
        }

        outcome
    }

    /// Decodes the buffer if it is a complete `prefix, payload.., suffix`
    /// frame with at least one payload key.
    ///
    /// Framing keys are stripped by position, so payload keys equal to the
    /// prefix or suffix are kept.
    fn framed_payload(&self, config: &ReaderConfig) -> Option<String> {
        let prefix = config.prefix?;
        match self.buffer.as_slice() {
            [first, payload @ .., last]
                if *first == prefix && *last == config.suffix && !payload.is_empty() =>
            {
                Some(KeyDecoder::decode_sequence(payload))
            }
            _ => None,
        }
    }
}
