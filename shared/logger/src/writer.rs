use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::error::{LoggingError, Result};
use crate::record::LogRecord;

/// What the writer thread receives.
pub(crate) enum WriterMessage {
    Record(LogRecord),
    /// Acknowledged once every earlier record is on disk.
    Flush(Sender<()>),
}

/// Owns the log file on the writer thread.
pub(crate) struct FileWriter {
    file: File,
}

impl FileWriter {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| LoggingError::OpenLogFile {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LoggingError::OpenLogFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { file })
    }

    fn write(&mut self, record: &LogRecord) {
        let result = self
            .file
            .write_all(record.render().as_bytes())
            .and_then(|_| self.file.flush());
        if let Err(e) = result {
            eprintln!("log write failed: {}", e);
        }
    }

    /// Drains the channel until every sender is dropped.
    fn run(mut self, receiver: Receiver<WriterMessage>) {
        for message in receiver {
            match message {
                WriterMessage::Record(record) => self.write(&record),
                WriterMessage::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    }
}

pub(crate) fn spawn(path: &Path, receiver: Receiver<WriterMessage>) -> Result<()> {
    let writer = FileWriter::open(path)?;
    thread::Builder::new()
        .name("log-writer".to_string())
        .spawn(move || writer.run(receiver))
        .map_err(|source| LoggingError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use std::fs;
    use std::sync::mpsc::channel;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("nested.log");

        assert!(FileWriter::open(&path).is_ok());
        assert!(path.exists());
    }

    #[test]
    fn test_writer_thread_drains_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thread.log");
        let (sender, receiver) = channel();

        spawn(&path, receiver).unwrap();
        sender
            .send(WriterMessage::Record(LogRecord::now(
                LogLevel::Info,
                None,
                "from thread",
            )))
            .unwrap();
        let (ack, done) = channel();
        sender.send(WriterMessage::Flush(ack)).unwrap();
        done.recv().unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("from thread"));
    }
}
