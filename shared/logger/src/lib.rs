//! Thread-backed logging library.
//!
//! A [`Logger`] formats records on the caller's thread and hands them to a
//! dedicated writer thread, so appending to the log file never blocks the
//! operation being logged. Console echo and file output are switched
//! independently through [`LogSettings`].

pub mod error;
mod level;
mod logger;
mod record;
mod writer;

pub use error::{LoggingError, Result};
pub use level::LogLevel;
pub use logger::{LogSettings, Logger};
