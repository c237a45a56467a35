//! `wedge-replay`: drives a barcode reader from a key event script.
//!
//! Each input line lists key names separated by whitespace; every key is
//! typed as a press followed by a release on one simulated widget.  Decoded
//! scans are printed to stdout as JSON lines, one per delivered callback.
//!
//! ```text
//! $ printf 'F12 4 0 0 6 3 8 1 Enter\nH e l l o\n' | wedge-replay
//! {"subscriber":"element","result":{"barcode":"4006381",...}}
//! {"subscriber":"event","result":{"barcode":"4006381","source_label":"replay",...}}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.  This exercises the
//! whole capture and routing pipeline without a GUI toolkit.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config_from / load_config   -- framing settings + log level
//!  └─ BarcodeReader::with_config       -- backed by a MockKeySource
//!       ├─ element  widget#1 (always notify)
//!       └─ event    "replay"
//!  └─ for each script line: MockKeySource::type_keys
//! ```

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wedge_core::{DecodedResult, EventId, Key, WidgetId};
use wedge_reader::application::registry::PrefixCallback;
use wedge_reader::infrastructure::key_source::mock::MockKeySource;
use wedge_reader::infrastructure::storage::config::{load_config, load_config_from, AppConfig};
use wedge_reader::BarcodeReader;

/// The simulated widget every script line is typed into.
const REPLAY_WIDGET: WidgetId = WidgetId(1);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays key event scripts through a keyboard-wedge barcode reader.
#[derive(Debug, Parser)]
#[command(
    name = "wedge-replay",
    about = "Replay key name scripts through a keyboard-wedge barcode reader",
    version
)]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, env = "WEDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Learn the prefix from the first key of the first scan.
    #[arg(long)]
    detect_prefix: bool,

    /// Script file to read; stdin when absent.
    script: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().unwrap_or_else(|e| {
            eprintln!("wedge-replay: {e}; using default configuration");
            AppConfig::default()
        }),
    };

    // `RUST_LOG` wins over the configured level.  Logs go to stderr so
    // stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = MockKeySource::new();
    let mut reader = build_reader(&source, &config, cli.detect_prefix)?;
    info!(prefix = ?reader.prefix(), suffix = %reader.config().suffix, "reader ready");

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read script line")?;
        let keys = parse_script_line(&line)
            .with_context(|| format!("script line {}", index + 1))?;
        source.type_keys(&mut reader, REPLAY_WIDGET, &keys);
    }

    reader.stop_listening();
    Ok(())
}

/// Builds a listening reader with one always-notify element and one event,
/// both printing what they receive.
fn build_reader(
    source: &MockKeySource,
    config: &AppConfig,
    detect_prefix: bool,
) -> anyhow::Result<BarcodeReader> {
    let mut reader = BarcodeReader::with_config(Arc::new(source.clone()), config.reader.clone());
    reader
        .with_element(REPLAY_WIDGET, true, |r| print_result("element", &r))?
        .with_event(EventId::new_v4(), "replay", |r| print_result("event", &r))?;

    if detect_prefix || config.reader.detect_prefix {
        let listener: PrefixCallback = Arc::new(|prefix: String| {
            println!("{}", json!({ "subscriber": "prefix", "prefix": prefix }));
        });
        reader.detect_prefix(Some(listener))?;
    } else {
        reader.start_listening()?;
    }
    Ok(reader)
}

fn print_result(subscriber: &str, result: &DecodedResult) {
    match serde_json::to_value(result) {
        Ok(value) => println!("{}", json!({ "subscriber": subscriber, "result": value })),
        Err(e) => warn!("failed to encode result: {e}"),
    }
}

/// Splits a script line into keys.  Blank and `#` comment lines are empty.
fn parse_script_line(line: &str) -> anyhow::Result<Vec<Key>> {
    let line = line.trim();
    if line.starts_with('#') {
        return Ok(Vec::new());
    }
    line.split_whitespace()
        .map(|name| name.parse::<Key>().map_err(anyhow::Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_line_reads_key_names_and_digits() {
        let keys = parse_script_line("F12 4 0 NumPad7 Enter").unwrap();
        assert_eq!(
            keys,
            vec![Key::F12, Key::D4, Key::D0, Key::NumPad7, Key::Enter]
        );
    }

    #[test]
    fn test_parse_script_line_skips_blank_and_comment_lines() {
        assert!(parse_script_line("   ").unwrap().is_empty());
        assert!(parse_script_line("# a comment F12").unwrap().is_empty());
    }

    #[test]
    fn test_parse_script_line_rejects_unknown_names() {
        assert!(parse_script_line("F12 Hyper Enter").is_err());
    }

    #[test]
    fn test_build_reader_listens_on_replay_widget() {
        // Arrange
        let source = MockKeySource::new();

        // Act
        let reader = build_reader(&source, &AppConfig::default(), false).unwrap();

        // Assert
        assert!(reader.is_listening());
        assert!(source.is_subscribed(REPLAY_WIDGET));
        assert_eq!(reader.event_count(), 1);
    }

    #[test]
    fn test_build_reader_in_detect_mode_forgets_prefix() {
        let source = MockKeySource::new();

        let reader = build_reader(&source, &AppConfig::default(), true).unwrap();

        assert_eq!(reader.prefix(), None);
        assert!(reader.config().detect_prefix);
    }
}
