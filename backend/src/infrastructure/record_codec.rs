//! Plaintext layout of everything the store writes, before ciphering.
//!
//! Effort entries come in two shapes:
//!
//! - legacy: fields concatenated with no separator,
//!   `<seq><MM/DD/YYYY><HH:MM:SS><HH:MM:SS><HH:MM:SS><phase><category>`
//! - delimited: `v2|<seq>|<MM/DD/YYYY>|<start>|<end>|<duration>|<phase>|<category>`
//!
//! Both end with `\n`. New entries use the delimited shape unless the store
//! is configured for legacy output; the decoder reads either.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::domain::{
    EffortCategory, EffortRecord, EstimateSummary, LifeCyclePhase, split_seconds,
};
use crate::error::{EffortLoggerError, Result};

const DATE_FORMAT: &str = "%m/%d/%Y";
const TIME_FORMAT: &str = "%H:%M:%S";
const DELIMITED_TAG: &str = "v2";
const DELIMITER: char = '|';

/// Layout used for newly written effort entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    Legacy,
    #[default]
    Delimited,
}

/// One line of a decrypted identity file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedLine {
    Effort(EffortRecord),
    /// Profile text or a legacy line whose boundaries cannot be recovered.
    Other(String),
}

pub fn format_duration(total_secs: i64) -> String {
    let (h, m, s) = split_seconds(total_secs);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

pub fn encode_effort(record: &EffortRecord, format: RecordFormat) -> String {
    let date = record.date.format(DATE_FORMAT);
    let start = record.start.format(TIME_FORMAT);
    let end = record.end.format(TIME_FORMAT);
    let duration = format_duration(record.duration_secs);

    match format {
        RecordFormat::Legacy => format!(
            "{}{}{}{}{}{}{}\n",
            record.sequence,
            date,
            start,
            end,
            duration,
            record.phase.label(),
            record.category.label()
        ),
        RecordFormat::Delimited => format!(
            "{tag}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}\n",
            record.sequence,
            date,
            start,
            end,
            duration,
            record.phase.label(),
            record.category.label(),
            tag = DELIMITED_TAG,
            d = DELIMITER
        ),
    }
}

/// Decodes one line (with or without its line terminator).
///
/// Only a malformed delimited entry is an error; anything else that does not
/// decode is handed back as [`DecodedLine::Other`].
pub fn decode_line(line: &str) -> Result<DecodedLine> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(rest) = line.strip_prefix(DELIMITED_TAG) {
        if let Some(fields) = rest.strip_prefix(DELIMITER) {
            return decode_delimited(fields).map(DecodedLine::Effort);
        }
    }

    Ok(decode_legacy(line)
        .map(DecodedLine::Effort)
        .unwrap_or_else(|| DecodedLine::Other(line.to_string())))
}

/// Effort entries read back from a decrypted file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffortHistory {
    /// Decoded entries, in file order.
    pub records: Vec<EffortRecord>,
    /// 1-based line number and reason for each delimited line that failed.
    pub malformed: Vec<(usize, String)>,
}

/// All effort entries found in a decrypted file.
///
/// Unlike [`decode_line`], a broken delimited line does not fail the whole
/// file: it is noted in [`EffortHistory::malformed`] and reading continues.
/// When a torn write was followed by another append on the same line, the
/// trailing entry is still recovered.
pub fn decode_efforts(content: &str) -> EffortHistory {
    let mut history = EffortHistory::default();
    for (index, line) in content.lines().enumerate() {
        match decode_line(line) {
            Ok(DecodedLine::Effort(record)) => history.records.push(record),
            Ok(DecodedLine::Other(_)) => {}
            Err(e) => {
                history.malformed.push((index + 1, e.to_string()));
                if let Some(record) = trailing_entry(line) {
                    history.records.push(record);
                }
            }
        }
    }
    history
}

fn trailing_entry(line: &str) -> Option<EffortRecord> {
    let marker = format!("{}{}", DELIMITED_TAG, DELIMITER);
    let at = line
        .rmatch_indices(marker.as_str())
        .map(|(at, _)| at)
        .find(|&at| at > 0)?;
    match decode_line(&line[at..]) {
        Ok(DecodedLine::Effort(record)) => Some(record),
        _ => None,
    }
}

fn decode_delimited(fields: &str) -> Result<EffortRecord> {
    let parts: Vec<&str> = fields.split(DELIMITER).collect();
    if parts.len() != 7 {
        return Err(EffortLoggerError::Decode(format!(
            "expected 7 fields in effort entry, found {}",
            parts.len()
        )));
    }

    let sequence = parts[0].parse::<u32>().map_err(|_| {
        EffortLoggerError::Decode(format!("bad sequence number '{}'", parts[0]))
    })?;
    let record = EffortRecord {
        sequence,
        date: parse_date(parts[1])?,
        start: parse_time(parts[2])?,
        end: parse_time(parts[3])?,
        duration_secs: parse_duration(parts[4])?,
        phase: parts[5]
            .parse::<LifeCyclePhase>()
            .map_err(|e| EffortLoggerError::Decode(e.to_string()))?,
        category: parts[6]
            .parse::<EffortCategory>()
            .map_err(|e| EffortLoggerError::Decode(e.to_string()))?,
    };
    Ok(record)
}

/// The sequence number has variable width, so the date (whose month always
/// has two digits) is located from its first `/`. Phase and category are
/// told apart by matching the known category labels as a suffix.
fn decode_legacy(line: &str) -> Option<EffortRecord> {
    let slash = line.find('/')?;
    let date_at = slash.checked_sub(2)?;
    let sequence_text = line.get(..date_at)?;
    if sequence_text.is_empty() || !sequence_text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |offset: usize, len: usize| line.get(date_at + offset..date_at + offset + len);
    let date = parse_date(field(0, 10)?).ok()?;
    let start = parse_time(field(10, 8)?).ok()?;
    let end = parse_time(field(18, 8)?).ok()?;
    let duration_secs = parse_duration(field(26, 8)?).ok()?;
    let labels = line.get(date_at + 34..)?;

    let category = EffortCategory::ALL
        .into_iter()
        .find(|c| labels.ends_with(c.label()))?;
    let phase = labels[..labels.len() - category.label().len()]
        .parse::<LifeCyclePhase>()
        .ok()?;

    Some(EffortRecord {
        sequence: sequence_text.parse().ok()?,
        date,
        start,
        end,
        duration_secs,
        phase,
        category,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|e| EffortLoggerError::Decode(format!("bad date '{}': {}", text, e)))
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, TIME_FORMAT)
        .map_err(|e| EffortLoggerError::Decode(format!("bad time '{}': {}", text, e)))
}

fn parse_duration(text: &str) -> Result<i64> {
    let bad = || EffortLoggerError::Decode(format!("bad duration '{}'", text));
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return Err(bad());
    }
    let mut numbers = [0i64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse::<i64>().map_err(|_| bad())?;
    }
    let [h, m, s] = numbers;
    if h < 0 || !(0..60).contains(&m) || !(0..60).contains(&s) {
        return Err(bad());
    }
    Ok(h * 3600 + m * 60 + s)
}

/// Labeled block written for a finalized backlog item.
pub fn encode_summary(summary: &EstimateSummary) -> String {
    format!(
        "Backlog Item: {}\nProject: {}\nLanguage: {}\nKeywords: {}\nUsers: {}\nAverage Estimate: {:.2}\n",
        summary.item.name,
        summary.item.project,
        summary.item.language,
        summary.item.keywords,
        summary.participants,
        summary.average
    )
}

/// Canonical identity block, CRLF-terminated lines.
///
/// Login lookup depends on the `Username: <name>\r` and `Password: <pass>`
/// fragments produced here.
pub fn encode_identity(
    display_name: &str,
    username: &str,
    password: &str,
    fields: &[(String, String)],
) -> String {
    let mut block = format!(
        "Name: {}\r\nUsername: {}\r\nPassword: {}\r\n",
        display_name, username, password
    );
    for (key, value) in fields {
        block.push_str(&format!("{}: {}\r\n", key, value));
    }
    block
}

/// The two fragments an identity file must contain for a login to match.
pub fn credential_fragments(username: &str, password: &str) -> (String, String) {
    (
        format!("Username: {}\r", username),
        format!("Password: {}", password),
    )
}
