use crate::traits::MintLog;
use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target of the orchestrator's error/warn/info channels.
pub const MINTER_TARGET: &str = "minter";
/// Target of the success channel; rendered as its own level.
pub const SUCCESS_TARGET: &str = "mint_success";

pub fn setup_logger() -> Option<WorkerGuard> {
    // Create logs directory
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "minter");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(targets());

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(targets());

    // Combine both layers
    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init();

    if installed.is_err() {
        return None;
    }

    // Return guard - MUST be kept alive by caller
    Some(guard)
}

/// Our crates at INFO, dependencies (ethers, hyper, ...) at WARN.
fn targets() -> tracing_subscriber::filter::Targets {
    tracing_subscriber::filter::Targets::new()
        .with_target(MINTER_TARGET, Level::INFO)
        .with_target(SUCCESS_TARGET, Level::INFO)
        .with_target("core_logic", Level::INFO)
        .with_target("evm_minter", Level::INFO)
        .with_default(Level::WARN)
}

/// [`MintLog`] backed by the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl MintLog for TracingLog {
    fn error(&self, message: &str) {
        tracing::error!(target: MINTER_TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: MINTER_TARGET, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: MINTER_TARGET, "{}", message);
    }

    fn success(&self, message: &str) {
        tracing::info!(target: SUCCESS_TARGET, "{}", message);
    }
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn extract_message(event: &Event<'_>) -> String {
    let mut msg_visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut msg_visitor);
    msg_visitor.message
}

/// Level name and color, with the success target standing in as a fifth level.
fn level_style(event: &Event<'_>) -> (&'static str, Color) {
    let metadata = event.metadata();
    if metadata.target() == SUCCESS_TARGET {
        return ("success", Color::Green);
    }
    match *metadata.level() {
        Level::ERROR => ("error", Color::Red),
        Level::WARN => ("warn", Color::Yellow),
        Level::INFO => ("info", Color::White),
        Level::DEBUG => ("debug", Color::Blue),
        _ => ("trace", Color::Purple),
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let (label, color) = level_style(event);
        let style = Style::new().fg(color);

        write!(
            writer,
            "{} | {}: {}",
            Color::Cyan.paint(timestamp),
            style.paint(label),
            style.paint(extract_message(event))
        )?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let (label, _) = level_style(event);

        writeln!(
            writer,
            "{} [{}] {}",
            timestamp,
            label.to_uppercase(),
            extract_message(event)
        )
    }
}
