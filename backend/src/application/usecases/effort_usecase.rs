//! Effort logging: timing intervals and appending them to the identity file.

use std::sync::Arc;

use crate::domain::{EffortCategory, EffortRecord, LifeCyclePhase, UserSession};
use crate::error::Result;
use crate::infrastructure::record_codec::{decode_efforts, encode_effort, format_duration};
use crate::infrastructure::{Clock, EncryptedFileStore, RecordFormat};

pub struct EffortUseCase {
    store: EncryptedFileStore,
    clock: Arc<dyn Clock>,
    format: RecordFormat,
    logger: logging::Logger,
}

impl EffortUseCase {
    pub fn new(
        store: EncryptedFileStore,
        clock: Arc<dyn Clock>,
        format: RecordFormat,
        logger: logging::Logger,
    ) -> Self {
        EffortUseCase {
            store,
            clock,
            format,
            logger,
        }
    }

    /// Starts the session's timer; returns the entry's sequence number.
    pub fn start_timer(
        &self,
        session: &mut UserSession,
        phase: LifeCyclePhase,
        category: EffortCategory,
    ) -> Result<u32> {
        let sequence = session
            .timer
            .start(phase, category, self.clock.now())
            .inspect_err(|e| self.logger.warn(&format!("Start rejected: {}", e)))?;

        self.logger.info(&format!(
            "{} started entry {} ({}, {})",
            session.handle.display_name(),
            sequence,
            phase,
            category
        ));
        Ok(sequence)
    }

    /// Stops the timer and appends the finished entry.
    ///
    /// The timer only returns to idle once the entry is on disk, so a failed
    /// append can be retried with the same interval.
    pub fn stop_timer(&self, session: &mut UserSession) -> Result<EffortRecord> {
        let record = session
            .timer
            .finish(self.clock.now())
            .inspect_err(|e| self.logger.warn(&format!("Stop rejected: {}", e)))?;

        if let Err(e) = self
            .store
            .append(session.handle.path(), &encode_effort(&record, self.format))
        {
            self.logger
                .error(&format!("Failed to append entry {}: {}", record.sequence, e));
            return Err(e);
        }
        session.timer.reset();

        self.logger.info(&format!(
            "{} logged entry {} lasting {}",
            session.handle.display_name(),
            record.sequence,
            format_duration(record.duration_secs)
        ));
        Ok(record)
    }

    /// Seconds since the running interval started, `None` when idle.
    pub fn elapsed_secs(&self, session: &UserSession) -> Option<i64> {
        session.timer.elapsed_secs(self.clock.now())
    }

    /// The whole decrypted identity file: profile block followed by every
    /// logged entry.
    pub fn view_user_data(&self, session: &UserSession) -> Result<String> {
        self.store.read_all_decrypted(session.handle.path())
    }

    /// Effort entries found in the identity file, in the order logged.
    /// Lines that no longer decode are logged and left out.
    pub fn effort_history(&self, session: &UserSession) -> Result<Vec<EffortRecord>> {
        let content = self.store.read_all_decrypted(session.handle.path())?;
        let history = decode_efforts(&content);
        for (line, reason) in &history.malformed {
            self.logger.warn(&format!(
                "Skipping line {} of {}: {}",
                line,
                session.handle.path().display(),
                reason
            ));
        }
        Ok(history.records)
    }
}
