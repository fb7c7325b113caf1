//! Handlers - Orchestrate use cases for a front end

pub mod command_handler;

pub use command_handler::{CommandHandler, Reply};
