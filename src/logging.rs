// src/logging.rs
use std::fmt;

/// Reporting level of an [`EventLog`] entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        };
        f.write_str(name)
    }
}

/// Logging capability handed to the components that report events.
///
/// Built once at startup and shared by handle; nothing reaches for a global logger.
pub trait EventLog: Send + Sync {
    fn log(&self, severity: Severity, message: &str);

    fn trace(&self, message: &str) {
        self.log(Severity::Trace, message);
    }
    fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }
    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }
    fn warn(&self, message: &str) {
        self.log(Severity::Warn, message);
    }
    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }
    fn fatal(&self, message: &str) {
        self.log(Severity::Fatal, message);
    }
}

/// Forwards entries to the `log` facade (and whatever `env_logger` sink `main` installed).
pub struct LogSink {
    target: &'static str,
}

impl LogSink {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }
}

impl EventLog for LogSink {
    fn log(&self, severity: Severity, message: &str) {
        let target = self.target;
        match severity {
            Severity::Trace => log::trace!(target: target, "{message}"),
            Severity::Debug => log::debug!(target: target, "{message}"),
            Severity::Info => log::info!(target: target, "{message}"),
            Severity::Warn => log::warn!(target: target, "{message}"),
            Severity::Error => log::error!(target: target, "{message}"),
            // `log` has no level above error.
            Severity::Fatal => log::error!(target: target, "FATAL: {message}"),
        }
    }
}

/// Captures entries in memory so tests can assert on what was reported.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryLog {
    entries: std::sync::Mutex<Vec<(Severity, String)>>,
}

#[cfg(test)]
impl MemoryLog {
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.entries().iter().filter(|(s, _)| *s == severity).count()
    }
}

#[cfg(test)]
impl EventLog for MemoryLog {
    fn log(&self, severity: Severity, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((severity, message.to_owned()));
        }
    }
}
