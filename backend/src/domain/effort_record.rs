//! One closed timing interval

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{EffortCategory, LifeCyclePhase};

/// Effort-log entry produced when a running timer is stopped.
///
/// Immutable once appended; the sequence number is only unique within the
/// session that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffortRecord {
    pub sequence: u32,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub duration_secs: i64,
    pub phase: LifeCyclePhase,
    pub category: EffortCategory,
}

pub(crate) fn split_seconds(total: i64) -> (i64, i64, i64) {
    let total = total.max(0);
    (total / 3600, (total % 3600) / 60, total % 60)
}
