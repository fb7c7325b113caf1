use chrono::Local;

use crate::level::LogLevel;

/// One formatted-on-demand log line.
#[derive(Debug, Clone)]
pub(crate) struct LogRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub component: Option<String>,
    pub message: String,
}

impl LogRecord {
    pub fn now(level: LogLevel, component: Option<&str>, message: &str) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level,
            component: component.map(str::to_string),
            message: message.to_string(),
        }
    }

    /// `[timestamp] LEVEL [component]: message\n`
    pub fn render(&self) -> String {
        match &self.component {
            Some(component) => format!(
                "[{}] {} [{}]: {}\n",
                self.timestamp, self.level, component, self.message
            ),
            None => format!("[{}] {}: {}\n", self.timestamp, self.level, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_component() {
        let record = LogRecord::now(LogLevel::Warn, Some("Store"), "append retried");
        let line = record.render();

        assert!(line.contains("WARN [Store]: append retried"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_render_without_component() {
        let record = LogRecord::now(LogLevel::Info, None, "ready");
        assert!(record.render().contains("INFO: ready"));
    }

    #[test]
    fn test_timestamp_has_millis() {
        let record = LogRecord::now(LogLevel::Debug, None, "x");
        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(record.timestamp.len(), 23);
        assert_eq!(&record.timestamp[19..20], ".");
    }
}
