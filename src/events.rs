//! User-facing event sink: info/success/warning/error messages.
//!
//! Components receive a `&dyn EventSink` instead of writing to a global
//! logger, so each stage can be exercised in tests with a [`MemorySink`].

use crossterm::style::Stylize;
use std::sync::Mutex;

/// Severity of a user-facing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

/// Receiver for user-facing events.
pub trait EventSink {
    fn emit(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }
}

/// Writes icon-prefixed lines to stderr, colored unless disabled.
pub struct ConsoleSink {
    use_color: bool,
}

impl ConsoleSink {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn format(&self, level: Level, message: &str) -> String {
        let icon = match level {
            Level::Info => "\u{2139}",    // ℹ
            Level::Success => "\u{2714}", // ✔
            Level::Warning => "\u{26a0}", // ⚠
            Level::Error => "\u{2716}",   // ✖
        };
        let line = format!("{icon} {message}");
        if !self.use_color {
            return line;
        }
        match level {
            Level::Info => line.blue().to_string(),
            Level::Success => line.green().to_string(),
            Level::Warning => line.yellow().to_string(),
            Level::Error => line.red().to_string(),
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, level: Level, message: &str) {
        eprintln!("{}", self.format(level, message));
    }
}

/// Records every event in memory.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events, oldest first.
    pub fn events(&self) -> Vec<(Level, String)> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages recorded at `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push((level, message.to_string()));
        }
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _level: Level, _message: &str) {}
}
