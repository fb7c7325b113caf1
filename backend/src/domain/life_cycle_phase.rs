//! Life-cycle phase an effort is logged against

use std::fmt;
use std::str::FromStr;

use crate::error::EffortLoggerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifeCyclePhase {
    InformationGathering,
    InformationUnderstanding,
    Verifying,
    Outlining,
    Drafting,
    Finalizing,
    TeamMeeting,
    CoachMeeting,
    StakeholderMeeting,
}

impl LifeCyclePhase {
    pub const ALL: [LifeCyclePhase; 9] = [
        LifeCyclePhase::InformationGathering,
        LifeCyclePhase::InformationUnderstanding,
        LifeCyclePhase::Verifying,
        LifeCyclePhase::Outlining,
        LifeCyclePhase::Drafting,
        LifeCyclePhase::Finalizing,
        LifeCyclePhase::TeamMeeting,
        LifeCyclePhase::CoachMeeting,
        LifeCyclePhase::StakeholderMeeting,
    ];

    /// Label written into effort records.
    pub fn label(&self) -> &'static str {
        match self {
            LifeCyclePhase::InformationGathering => "Information Gathering",
            LifeCyclePhase::InformationUnderstanding => "Information Understanding",
            LifeCyclePhase::Verifying => "Verifying",
            LifeCyclePhase::Outlining => "Outlining",
            LifeCyclePhase::Drafting => "Drafting",
            LifeCyclePhase::Finalizing => "Finalizing",
            LifeCyclePhase::TeamMeeting => "Team Meeting",
            LifeCyclePhase::CoachMeeting => "Coach Meeting",
            LifeCyclePhase::StakeholderMeeting => "Stakeholder Meeting",
        }
    }
}

impl fmt::Display for LifeCyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LifeCyclePhase {
    type Err = EffortLoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|phase| phase.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                EffortLoggerError::InvalidInput(format!("unknown life cycle phase '{}'", wanted))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for phase in LifeCyclePhase::ALL {
            assert_eq!(phase.label().parse::<LifeCyclePhase>().unwrap(), phase);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "team meeting".parse::<LifeCyclePhase>().unwrap(),
            LifeCyclePhase::TeamMeeting
        );
    }

    #[test]
    fn test_unknown_phase_rejected() {
        assert!("Sleeping".parse::<LifeCyclePhase>().is_err());
    }
}
