//! Effort category domain model

use std::fmt;
use std::str::FromStr;

use crate::error::EffortLoggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffortCategory {
    Deliverables,
    Interruptions,
    Defects,
    Other,
}

impl EffortCategory {
    pub const ALL: [EffortCategory; 4] = [
        EffortCategory::Deliverables,
        EffortCategory::Interruptions,
        EffortCategory::Defects,
        EffortCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EffortCategory::Deliverables => "Deliverables",
            EffortCategory::Interruptions => "Interruptions",
            EffortCategory::Defects => "Defects",
            EffortCategory::Other => "Other",
        }
    }
}

impl fmt::Display for EffortCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EffortCategory {
    type Err = EffortLoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                EffortLoggerError::InvalidInput(format!("unknown effort category '{}'", wanted))
            })
    }
}
