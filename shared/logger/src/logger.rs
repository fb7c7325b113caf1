//! The main [`Logger`] handle.

use std::path::PathBuf;
use std::sync::mpsc::{Sender, channel};

use crate::error::Result;
use crate::level::LogLevel;
use crate::record::LogRecord;
use crate::writer::{self, WriterMessage};

/// Where log records go and which ones are kept.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LogLevel,
    /// Append records to this file. `None` disables file output.
    pub file_path: Option<PathBuf>,
    /// Echo records to stderr.
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file_path: None,
            console: false,
        }
    }
}

/// Cloneable, non-blocking logger.
///
/// All clones (including those produced by [`Logger::for_component`]) share a
/// single writer thread, so records from different components interleave in
/// one file in send order.
///
/// # Examples
///
/// ```
/// use logging::{LogLevel, LogSettings, Logger};
///
/// let logger = Logger::new(LogSettings {
///     level: LogLevel::Info,
///     file_path: None,
///     console: false,
/// })
/// .unwrap();
/// let store_logger = logger.for_component("Store");
/// store_logger.info("store opened");
/// ```
#[derive(Clone)]
pub struct Logger {
    sender: Option<Sender<WriterMessage>>,
    level: LogLevel,
    console: bool,
    component: Option<String>,
}

impl Logger {
    /// Creates a logger, spawning the writer thread when a file is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be created or opened.
    pub fn new(settings: LogSettings) -> Result<Self> {
        let sender = match settings.file_path {
            Some(ref path) => {
                let (sender, receiver) = channel();
                writer::spawn(path, receiver)?;
                Some(sender)
            }
            None => None,
        };
        Ok(Logger {
            sender,
            level: settings.level,
            console: settings.console,
            component: None,
        })
    }

    /// A logger that drops every record.
    pub fn disabled() -> Self {
        Logger {
            sender: None,
            level: LogLevel::Error,
            console: false,
            component: None,
        }
    }

    /// Same destination and level, tagged with another component name.
    pub fn for_component(&self, component: &str) -> Self {
        Logger {
            component: Some(component.to_string()),
            ..self.clone()
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.level || (self.sender.is_none() && !self.console) {
            return;
        }
        let record = LogRecord::now(level, self.component.as_deref(), message);

        if self.console {
            eprint!("{}", record.render());
        }
        if let Some(ref sender) = self.sender {
            // The writer only goes away at process exit.
            let _ = sender.send(WriterMessage::Record(record));
        }
    }

    /// Blocks until every record sent so far has been written.
    ///
    /// The writer thread is detached, so call this before the process exits
    /// to keep the last records.
    pub fn flush(&self) {
        if let Some(ref sender) = self.sender {
            let (ack, done) = channel();
            if sender.send(WriterMessage::Flush(ack)).is_ok() {
                let _ = done.recv();
            }
        }
    }
}
