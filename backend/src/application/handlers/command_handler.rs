//! Command handler - Orchestrates usecases for the interactive console

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::usecases::{AuthUseCase, EffortUseCase, PlanningPokerUseCase, SearchHit};
use crate::config::StorageConfig;
use crate::console::Command;
use crate::domain::{
    EffortCategory, IdentityProfile, LifeCyclePhase, POKER_DECK, PokerRound, UserSession,
};
use crate::error::{EffortLoggerError, Result};
use crate::infrastructure::record_codec::format_duration;
use crate::infrastructure::{
    Clock, CredentialIndex, EncryptedFileStore, EntityKind, RecordFormat, ShiftCipher,
};

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// Holds the use cases plus the state of one console user: the logged-in
/// session, an open planning poker round and the last search results.
pub struct CommandHandler {
    auth_usecase: AuthUseCase,
    effort_usecase: EffortUseCase,
    poker_usecase: PlanningPokerUseCase,
    store: EncryptedFileStore,
    logger: logging::Logger,
    session: Option<UserSession>,
    round: Option<PokerRound>,
    last_hits: Vec<SearchHit>,
}

impl CommandHandler {
    pub fn new(
        store: EncryptedFileStore,
        clock: Arc<dyn Clock>,
        format: RecordFormat,
        logger: logging::Logger,
    ) -> Self {
        let store = store.with_logger(logger.for_component("Store"));
        let credentials = CredentialIndex::new(store.clone(), logger.for_component("Credentials"));

        CommandHandler {
            auth_usecase: AuthUseCase::new(credentials, logger.for_component("Auth Usecase")),
            effort_usecase: EffortUseCase::new(
                store.clone(),
                clock,
                format,
                logger.for_component("Effort Usecase"),
            ),
            poker_usecase: PlanningPokerUseCase::new(
                store.clone(),
                logger.for_component("Planning Poker Usecase"),
            ),
            store,
            logger: logger.for_component("Command Handler"),
            session: None,
            round: None,
            last_hits: Vec::new(),
        }
    }

    /// Builds the store and use cases described by `config`, seeding the
    /// default identity when enabled.
    pub fn from_config(
        config: &StorageConfig,
        clock: Arc<dyn Clock>,
        logger: logging::Logger,
    ) -> Result<Self> {
        let store = EncryptedFileStore::new(
            config.base_dir.clone(),
            Arc::new(ShiftCipher::new(config.cipher_key)),
        );
        store.ensure_directory(EntityKind::User)?;
        store.ensure_directory(EntityKind::PlanningPoker)?;

        let handler = Self::new(store, clock, config.record_format, logger);
        if config.seed_default_identity {
            handler.auth_usecase.seed_default_identity()?;
        }
        Ok(handler)
    }

    /// Runs one command. Errors leave the handler usable.
    pub fn process_command(&mut self, command: Command) -> Result<Reply> {
        self.logger.debug(&format!("Processing {:?}", redact(&command)));
        let text = match command {
            Command::Help => crate::console::HELP.to_string(),
            Command::Quit => {
                self.warn_if_running();
                return Ok(Reply::Quit);
            }
            Command::Phases => phases_text(),

            Command::Login { username, password } => self.login(&username, &password)?,
            Command::Register {
                username,
                password,
                display_name,
            } => {
                let profile = display_name
                    .map(|name| IdentityProfile::named(&name))
                    .unwrap_or_default();
                let handle = self.auth_usecase.register(&username, &password, profile)?;
                format!("Registered {}. You can now log in.", handle.display_name())
            }
            Command::Logout => {
                self.warn_if_running();
                match self.session.take() {
                    Some(session) => format!("Goodbye, {}.", session.handle.display_name()),
                    None => "Nobody is logged in.".to_string(),
                }
            }

            Command::Start { phase, category } => {
                let session = require_session(&mut self.session)?;
                let sequence = self.effort_usecase.start_timer(session, phase, category)?;
                format!("Entry {} started: {}, {}.", sequence, phase, category)
            }
            Command::Stop => {
                let session = require_session(&mut self.session)?;
                let record = self.effort_usecase.stop_timer(session)?;
                format!(
                    "Entry {} logged: {} to {} ({}).",
                    record.sequence,
                    record.start.format("%H:%M:%S"),
                    record.end.format("%H:%M:%S"),
                    format_duration(record.duration_secs)
                )
            }
            Command::Status => {
                let session = require_session(&mut self.session)?;
                match self.effort_usecase.elapsed_secs(session) {
                    Some(secs) => format!("Timer running for {}.", format_duration(secs)),
                    None => "Timer is stopped.".to_string(),
                }
            }
            Command::View => {
                let session = require_session(&mut self.session)?;
                self.effort_usecase.view_user_data(session)?
            }
            Command::History => {
                let session = require_session(&mut self.session)?;
                let history = self.effort_usecase.effort_history(session)?;
                if history.is_empty() {
                    "No effort logged yet.".to_string()
                } else {
                    let mut text = String::new();
                    for record in &history {
                        let _ = writeln!(
                            text,
                            "{:>3}  {}  {}-{}  {}  {} / {}",
                            record.sequence,
                            record.date.format("%m/%d/%Y"),
                            record.start.format("%H:%M:%S"),
                            record.end.format("%H:%M:%S"),
                            format_duration(record.duration_secs),
                            record.phase,
                            record.category
                        );
                    }
                    text.trim_end().to_string()
                }
            }
            Command::Export(destination) => {
                let session = require_session(&mut self.session)?;
                self.store
                    .export_plaintext(session.handle.path(), &destination)?;
                format!("Exported to {}.", destination.display())
            }

            Command::Poker { participants, item } => {
                let round = self.poker_usecase.new_round(item, participants)?;
                let name = round.item().name.clone();
                self.round = Some(round);
                format!(
                    "Estimating '{}'. Participant 1, play a card {:?}.",
                    name, POKER_DECK
                )
            }
            Command::Vote(card) => {
                let round = require_round(&mut self.round)?;
                let remaining = round.cast_vote(card)?;
                match round.current_voter() {
                    Some(next) => format!(
                        "Vote recorded, {} to go. Participant {}, play a card.",
                        remaining, next
                    ),
                    None => format!(
                        "All votes in, average {:.2}. Type 'finish' to store it.",
                        round.average().unwrap_or(0.0)
                    ),
                }
            }
            Command::Edit(item) => {
                let round = require_round(&mut self.round)?;
                round.edit_item(item)?;
                format!("Backlog item is now '{}'.", round.item().name)
            }
            Command::Finish => {
                let summary = require_round(&mut self.round)?.summary()?;
                let path = self.poker_usecase.append_planning_poker_result(&summary)?;
                self.round = None;
                format!(
                    "Stored average {:.2} for '{}' in {}.",
                    summary.average,
                    summary.item.name,
                    path.display()
                )
            }
            Command::Search(term) => {
                self.last_hits = self.poker_usecase.search_by_keyword(&term)?;
                if self.last_hits.is_empty() {
                    format!("Nothing matches '{}'.", term)
                } else {
                    let mut text = String::new();
                    for (i, hit) in self.last_hits.iter().enumerate() {
                        let _ = writeln!(text, "{:>3}. {}", i + 1, hit.name);
                    }
                    text.trim_end().to_string()
                }
            }
            Command::Open(number) => {
                let path = self.hit_path(number)?;
                self.poker_usecase.read_result(&path)?
            }
            Command::Import(source) => {
                let path = self
                    .store
                    .import_plaintext(EntityKind::PlanningPoker, &source)?;
                format!("Imported as {}.", path.display())
            }
        };
        Ok(Reply::Output(text))
    }

    fn login(&mut self, username: &str, password: &str) -> Result<String> {
        if self.session.as_ref().is_some_and(|s| s.timer.is_running()) {
            return Err(EffortLoggerError::InvalidState(
                "stop the running timer before switching user".to_string(),
            ));
        }
        match self.auth_usecase.authenticate(username, password)? {
            Some(session) => {
                let name = session.handle.display_name();
                self.session = Some(session);
                Ok(format!("Welcome, {}.", name))
            }
            None => Ok("Invalid username or password.".to_string()),
        }
    }

    fn hit_path(&self, number: usize) -> Result<PathBuf> {
        number
            .checked_sub(1)
            .and_then(|i| self.last_hits.get(i))
            .map(|hit| hit.path.clone())
            .ok_or_else(|| {
                EffortLoggerError::InvalidInput(format!(
                    "no search result number {} (last search found {})",
                    number,
                    self.last_hits.len()
                ))
            })
    }

    fn warn_if_running(&self) {
        if let Some(session) = self.session.as_ref().filter(|s| s.timer.is_running()) {
            self.logger.warn(&format!(
                "{} left with a running timer; the open interval is discarded",
                session.handle.display_name()
            ));
        }
    }
}

fn require_session(session: &mut Option<UserSession>) -> Result<&mut UserSession> {
    session
        .as_mut()
        .ok_or_else(|| EffortLoggerError::InvalidState("log in first".to_string()))
}

fn require_round(round: &mut Option<PokerRound>) -> Result<&mut PokerRound> {
    round.as_mut().ok_or_else(|| {
        EffortLoggerError::InvalidState("no planning poker round in progress".to_string())
    })
}

fn phases_text() -> String {
    let phases: Vec<&str> = LifeCyclePhase::ALL.iter().map(|p| p.label()).collect();
    let categories: Vec<&str> = EffortCategory::ALL.iter().map(|c| c.label()).collect();
    format!(
        "Phases: {}\nCategories: {}",
        phases.join(", "),
        categories.join(", ")
    )
}

/// Debug rendering without passwords.
fn redact(command: &Command) -> Command {
    match command {
        Command::Login { username, .. } => Command::Login {
            username: username.clone(),
            password: "***".to_string(),
        },
        Command::Register {
            username,
            display_name,
            ..
        } => Command::Register {
            username: username.clone(),
            password: "***".to_string(),
            display_name: display_name.clone(),
        },
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ManualClock;
    use chrono::{Duration, NaiveDate};

    fn handler(dir: &std::path::Path) -> (CommandHandler, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            NaiveDate::from_ymd_opt(2023, 11, 28)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
        ));
        let config = StorageConfig {
            base_dir: dir.to_path_buf(),
            ..StorageConfig::default()
        };
        let handler =
            CommandHandler::from_config(&config, clock.clone(), logging::Logger::disabled())
                .unwrap();
        (handler, clock)
    }

    fn output(reply: Result<Reply>) -> String {
        match reply.unwrap() {
            Reply::Output(text) => text,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_effort_commands_require_login() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handler, _) = handler(dir.path());
        assert!(matches!(
            handler.process_command(Command::Stop),
            Err(EffortLoggerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_seeded_user_logs_time() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handler, clock) = handler(dir.path());

        let welcome = output(handler.process_command(Command::Login {
            username: "user".to_string(),
            password: "password".to_string(),
        }));
        assert_eq!(welcome, "Welcome, TestUser.");

        handler
            .process_command(Command::Start {
                phase: LifeCyclePhase::Outlining,
                category: EffortCategory::Deliverables,
            })
            .unwrap();
        clock.advance(Duration::minutes(2));
        let logged = output(handler.process_command(Command::Stop));
        assert!(logged.contains("(00:02:00)"));

        let history = output(handler.process_command(Command::History));
        assert!(history.contains("Outlining / Deliverables"));
    }

    #[test]
    fn test_poker_flow_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handler, _) = handler(dir.path());

        let commands = [
            "poker 3; Login page; Portal; Rust; auth, ui",
            "vote 3",
            "vote 5",
            "vote 8",
            "finish",
        ];
        for line in commands {
            let command = Command::parse(line).unwrap().unwrap();
            handler.process_command(command).unwrap();
        }
        assert!(handler.process_command(Command::Finish).is_err());

        let listing = output(handler.process_command(Command::Search("auth".to_string())));
        assert_eq!(listing, "  1. Login_page");
        let content = output(handler.process_command(Command::Open(1)));
        assert!(content.contains("Average Estimate: 5.33"));
        assert!(handler.process_command(Command::Open(2)).is_err());
    }

    #[test]
    fn test_poker_with_huge_participant_count() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handler, _) = handler(dir.path());

        let command = Command::parse("poker 4000000000; Login page; Portal; Rust; auth")
            .unwrap()
            .unwrap();
        handler.process_command(command).unwrap();
        let reply = output(handler.process_command(Command::Vote(5)));
        assert!(reply.contains("3999999999 to go"));
        assert!(reply.contains("Participant 2"));
    }

    #[test]
    fn test_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handler, _) = handler(dir.path());
        assert_eq!(handler.process_command(Command::Quit).unwrap(), Reply::Quit);
    }
}
