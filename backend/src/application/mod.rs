//! Application layer - Use cases and the command handler that routes to them

pub mod handlers;
pub mod usecases;
