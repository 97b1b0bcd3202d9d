//! Argument parsing and output helpers for iemctl

use anyhow::{Context, Result};
use colored::Colorize;

/// Parse a byte written as decimal (`98`) or hex (`0x62`)
pub fn parse_byte(s: &str) -> Result<u8> {
    let trimmed = s.trim();
    let value = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => trimmed.parse::<u8>(),
    };
    value.with_context(|| format!("'{s}' is not a byte (0..=255 or 0x00..=0xFF)"))
}

/// clap value parser wrapper around [`parse_byte`]
pub fn byte_arg(s: &str) -> std::result::Result<u8, String> {
    parse_byte(s).map_err(|e| e.to_string())
}

/// Space separated uppercase hex, e.g. `F5 02 01 F6`
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a frame with delimiters and escape markers highlighted
pub fn highlight_frame(frame: &[u8]) -> String {
    use iem_protocol::constants::{END_DELIMITER, ESCAPE_MARKER, START_DELIMITER};

    frame
        .iter()
        .map(|&b| {
            let text = format!("{b:02X}");
            match b {
                START_DELIMITER | END_DELIMITER => text.cyan().to_string(),
                ESCAPE_MARKER => text.yellow().to_string(),
                _ => text,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
