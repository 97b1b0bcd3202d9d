//! Console logging for iemctl
//!
//! Lines look like `2026-01-02T03:04:05.000000Z [DEBUG] transport: TX: F50201...`.
//! `RUST_LOG`, when set, replaces the configured level.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Module part of an event target, without the crate prefix
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

/// Timestamp, bracketed level, originating module, then the message
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *metadata.level();
        let target = short_target(metadata.target());
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            // Target dimmed
            write!(
                writer,
                "{}{}\x1b[0m \x1b[2m{}:\x1b[0m ",
                color,
                format_level(&level),
                target
            )?;
        } else {
            write!(writer, "{} {}: ", format_level(&level), target)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Build the filter: `RUST_LOG` first, then the configured level
pub fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        if !env.is_empty() {
            return EnvFilter::try_new(&env).with_context(|| format!("Invalid RUST_LOG '{env}'"));
        }
    }
    EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{level}'"))
}

/// Install the stderr subscriber. Call once, before any exchange.
pub fn init(level: &str, ansi: bool) -> Result<()> {
    let filter = build_filter(level)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .event_format(BracketedLevelFormat);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .context("Failed to install log subscriber")
}
