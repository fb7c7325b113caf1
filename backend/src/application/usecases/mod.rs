//! Use cases - Business logic operations
pub mod auth_usecase;
pub mod effort_usecase;
pub mod planning_poker_usecase;

pub use auth_usecase::AuthUseCase;
pub use effort_usecase::EffortUseCase;
pub use planning_poker_usecase::{PlanningPokerUseCase, SearchHit};
