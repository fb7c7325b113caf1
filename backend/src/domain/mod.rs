//! Domain layer - Pure models with no filesystem access

mod backlog_item;
mod effort_category;
mod effort_record;
mod effort_timer;
mod identity;
mod life_cycle_phase;
mod poker_round;

pub use backlog_item::BacklogItem;
pub use effort_category::EffortCategory;
pub use effort_record::EffortRecord;
pub(crate) use effort_record::split_seconds;
pub use effort_timer::{EffortTimer, RunningInterval, TimerState};
pub use identity::{ENCRYPTED_SUFFIX, IdentityHandle, IdentityProfile, UserSession};
pub use life_cycle_phase::LifeCyclePhase;
pub use poker_round::{EstimateSummary, POKER_DECK, PokerRound};
