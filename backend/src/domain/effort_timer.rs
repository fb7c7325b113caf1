//! Effort timer state machine: `Idle -> Running -> Idle`

use chrono::{DateTime, FixedOffset};

use crate::domain::{EffortCategory, EffortRecord, LifeCyclePhase};
use crate::error::{EffortLoggerError, Result};

/// The open interval of a running timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningInterval {
    pub sequence: u32,
    pub started_at: DateTime<FixedOffset>,
    pub phase: LifeCyclePhase,
    pub category: EffortCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running(RunningInterval),
}

/// Live-only timing state for one session.
///
/// A second `start` while running is rejected rather than overwriting the
/// open interval. The sequence counter is handed out on `start`, so it
/// resets whenever a new timer (session) is created.
#[derive(Debug, Clone)]
pub struct EffortTimer {
    issued: u32,
    state: TimerState,
}

impl EffortTimer {
    pub fn new() -> Self {
        Self {
            issued: 0,
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running(_))
    }

    /// Opens an interval and returns its sequence number.
    pub fn start(
        &mut self,
        phase: LifeCyclePhase,
        category: EffortCategory,
        now: DateTime<FixedOffset>,
    ) -> Result<u32> {
        if let TimerState::Running(ref open) = self.state {
            return Err(EffortLoggerError::InvalidState(format!(
                "timer already running since {} (entry {})",
                open.started_at.format("%H:%M:%S"),
                open.sequence
            )));
        }
        self.issued += 1;
        self.state = TimerState::Running(RunningInterval {
            sequence: self.issued,
            started_at: now,
            phase,
            category,
        });
        Ok(self.issued)
    }

    /// Builds the record the open interval would produce if closed at `now`,
    /// leaving the timer running.
    ///
    /// Date and times are the wall-clock readings at each end; the duration
    /// is measured between the two instants, so an offset change in between
    /// does not distort it.
    pub fn finish(&self, now: DateTime<FixedOffset>) -> Result<EffortRecord> {
        let open = match self.state {
            TimerState::Running(ref open) => open,
            TimerState::Idle => {
                return Err(EffortLoggerError::InvalidState(
                    "timer not started".to_string(),
                ));
            }
        };
        Ok(EffortRecord {
            sequence: open.sequence,
            date: open.started_at.date_naive(),
            start: open.started_at.time(),
            end: now.time(),
            duration_secs: (now - open.started_at).num_seconds().max(0),
            phase: open.phase,
            category: open.category,
        })
    }

    /// Returns to `Idle`, discarding any open interval.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Closes the open interval.
    pub fn stop(&mut self, now: DateTime<FixedOffset>) -> Result<EffortRecord> {
        let record = self.finish(now)?;
        self.reset();
        Ok(record)
    }

    /// Whole seconds elapsed on the open interval.
    pub fn elapsed_secs(&self, now: DateTime<FixedOffset>) -> Option<i64> {
        match self.state {
            TimerState::Running(ref open) => Some((now - open.started_at).num_seconds().max(0)),
            TimerState::Idle => None,
        }
    }
}

impl Default for EffortTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        NaiveDate::from_ymd_opt(2023, 11, 28)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
            .and_utc()
            .fixed_offset()
    }

    #[test]
    fn test_start_stop_produces_record() {
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::Drafting, EffortCategory::Deliverables, at(10, 0, 0))
            .unwrap();
        let record = timer.stop(at(10, 1, 30)).unwrap();

        assert_eq!(record.sequence, 1);
        assert_eq!(record.duration_secs, 90);
        assert_eq!(record.start, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(record.end, NaiveTime::from_hms_opt(10, 1, 30).unwrap());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 11, 28).unwrap());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_double_start_rejected() {
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::Verifying, EffortCategory::Defects, at(9, 0, 0))
            .unwrap();
        let err = timer
            .start(LifeCyclePhase::Drafting, EffortCategory::Other, at(9, 5, 0))
            .unwrap_err();

        assert!(matches!(err, EffortLoggerError::InvalidState(_)));
        // The original interval is untouched.
        let record = timer.stop(at(9, 10, 0)).unwrap();
        assert_eq!(record.phase, LifeCyclePhase::Verifying);
        assert_eq!(record.duration_secs, 600);
    }

    #[test]
    fn test_stop_without_start_rejected() {
        let mut timer = EffortTimer::new();
        assert!(matches!(
            timer.stop(at(9, 0, 0)),
            Err(EffortLoggerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_sequence_increments_per_interval() {
        let mut timer = EffortTimer::new();
        for expected in 1..=3 {
            let seq = timer
                .start(LifeCyclePhase::Outlining, EffortCategory::Other, at(8, 0, 0))
                .unwrap();
            assert_eq!(seq, expected);
            timer.stop(at(8, 0, 1)).unwrap();
        }
    }

    #[test]
    fn test_finish_keeps_timer_running() {
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::TeamMeeting, EffortCategory::Other, at(14, 0, 0))
            .unwrap();
        let preview = timer.finish(at(14, 0, 59)).unwrap();

        assert_eq!(preview.duration_secs, 59);
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_secs(at(14, 2, 0)), Some(120));
    }

    #[test]
    fn test_backwards_clock_clamps_to_zero() {
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::Drafting, EffortCategory::Other, at(12, 0, 0))
            .unwrap();
        let record = timer.stop(at(11, 59, 0)).unwrap();
        assert_eq!(record.duration_secs, 0);
    }

    #[test]
    fn test_duration_spans_fall_back_transition() {
        // 01:50 EDT to 01:10 EST is twenty minutes of real time.
        let start = DateTime::parse_from_rfc3339("2023-11-05T01:50:00-04:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2023-11-05T01:10:00-05:00").unwrap();
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::Drafting, EffortCategory::Other, start)
            .unwrap();
        let record = timer.stop(end).unwrap();

        assert_eq!(record.duration_secs, 1200);
        assert_eq!(record.start, NaiveTime::from_hms_opt(1, 50, 0).unwrap());
        assert_eq!(record.end, NaiveTime::from_hms_opt(1, 10, 0).unwrap());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 11, 5).unwrap());
    }

    #[test]
    fn test_duration_spans_spring_forward_transition() {
        let start = DateTime::parse_from_rfc3339("2024-03-10T01:55:00-05:00").unwrap();
        let end = DateTime::parse_from_rfc3339("2024-03-10T03:05:00-04:00").unwrap();
        let mut timer = EffortTimer::new();
        timer
            .start(LifeCyclePhase::Outlining, EffortCategory::Interruptions, start)
            .unwrap();
        assert_eq!(timer.elapsed_secs(end), Some(600));
    }
}
