//! Planning poker round: one card per participant, averaged at the end

use crate::domain::BacklogItem;
use crate::error::{EffortLoggerError, Result};

/// Card values a participant can play.
pub const POKER_DECK: [u32; 8] = [0, 1, 2, 3, 5, 8, 13, 20];

/// Finalized estimate for one backlog item.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateSummary {
    pub item: BacklogItem,
    pub participants: u32,
    pub average: f64,
}

/// Collects one estimate from each participant in turn.
#[derive(Debug, Clone)]
pub struct PokerRound {
    item: BacklogItem,
    participants: u32,
    estimates: Vec<u32>,
}

impl PokerRound {
    pub fn new(item: BacklogItem, participants: u32) -> Result<Self> {
        item.validate()?;
        if participants == 0 {
            return Err(EffortLoggerError::InvalidInput(
                "a round needs at least one participant".to_string(),
            ));
        }
        Ok(Self {
            item,
            participants,
            estimates: Vec::new(),
        })
    }

    pub fn item(&self) -> &BacklogItem {
        &self.item
    }

    pub fn estimates(&self) -> &[u32] {
        &self.estimates
    }

    /// 1-based number of the participant whose card is expected next.
    pub fn current_voter(&self) -> Option<u32> {
        if self.is_complete() {
            None
        } else {
            Some(self.estimates.len() as u32 + 1)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.estimates.len() as u32 >= self.participants
    }

    /// Records the next participant's card; returns how many votes remain.
    pub fn cast_vote(&mut self, card: u32) -> Result<u32> {
        if self.is_complete() {
            return Err(EffortLoggerError::InvalidState(format!(
                "all {} participants have already voted",
                self.participants
            )));
        }
        if !POKER_DECK.contains(&card) {
            return Err(EffortLoggerError::InvalidInput(format!(
                "{} is not a planning poker card (deck: {:?})",
                card, POKER_DECK
            )));
        }
        self.estimates.push(card);
        Ok(self.participants - self.estimates.len() as u32)
    }

    /// Replaces the item details; allowed at any point before finalizing.
    pub fn edit_item(&mut self, item: BacklogItem) -> Result<()> {
        item.validate()?;
        self.item = item;
        Ok(())
    }

    /// Mean of the collected estimates, `None` before the first vote.
    pub fn average(&self) -> Option<f64> {
        if self.estimates.is_empty() {
            return None;
        }
        let total: u64 = self.estimates.iter().map(|&e| u64::from(e)).sum();
        Some(total as f64 / self.estimates.len() as f64)
    }

    pub fn summary(&self) -> Result<EstimateSummary> {
        if !self.is_complete() {
            return Err(EffortLoggerError::InvalidState(format!(
                "{} of {} participants have voted",
                self.estimates.len(),
                self.participants
            )));
        }
        Ok(EstimateSummary {
            item: self.item.clone(),
            participants: self.participants,
            average: self.average().unwrap_or(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> BacklogItem {
        BacklogItem::new("Login page", "Portal", "Rust", "auth, ui")
    }

    #[test]
    fn test_round_averages_votes() {
        let mut round = PokerRound::new(item(), 3).unwrap();
        assert_eq!(round.cast_vote(3).unwrap(), 2);
        assert_eq!(round.cast_vote(5).unwrap(), 1);
        assert_eq!(round.cast_vote(8).unwrap(), 0);

        let summary = round.summary().unwrap();
        assert_eq!(summary.participants, 3);
        assert!((summary.average - 16.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_voter_numbering() {
        let mut round = PokerRound::new(item(), 2).unwrap();
        assert_eq!(round.current_voter(), Some(1));
        round.cast_vote(1).unwrap();
        assert_eq!(round.current_voter(), Some(2));
        round.cast_vote(2).unwrap();
        assert_eq!(round.current_voter(), None);
    }

    #[test]
    fn test_card_outside_deck_rejected() {
        let mut round = PokerRound::new(item(), 1).unwrap();
        assert!(matches!(
            round.cast_vote(4),
            Err(EffortLoggerError::InvalidInput(_))
        ));
        assert!(round.estimates().is_empty());
    }

    #[test]
    fn test_extra_vote_rejected() {
        let mut round = PokerRound::new(item(), 1).unwrap();
        round.cast_vote(13).unwrap();
        assert!(matches!(
            round.cast_vote(20),
            Err(EffortLoggerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_summary_requires_all_votes() {
        let mut round = PokerRound::new(item(), 2).unwrap();
        round.cast_vote(5).unwrap();
        assert!(round.summary().is_err());
    }

    #[test]
    fn test_zero_participants_rejected() {
        assert!(PokerRound::new(item(), 0).is_err());
    }

    #[test]
    fn test_huge_participant_count_allocates_lazily() {
        let mut round = PokerRound::new(item(), u32::MAX).unwrap();
        assert_eq!(round.cast_vote(5).unwrap(), u32::MAX - 1);
        assert_eq!(round.current_voter(), Some(2));
    }

    #[test]
    fn test_edit_item_before_finalize() {
        let mut round = PokerRound::new(item(), 1).unwrap();
        round.cast_vote(8).unwrap();
        round
            .edit_item(BacklogItem::new("Login form", "Portal", "Rust", "auth"))
            .unwrap();

        assert_eq!(round.summary().unwrap().item.name, "Login form");
        assert!(round.edit_item(BacklogItem::default()).is_err());
    }
}
