//! Parsing of console input lines into commands.

use std::path::PathBuf;

use crate::domain::{BacklogItem, EffortCategory, LifeCyclePhase};
use crate::error::{EffortLoggerError, Result};

pub const HELP: &str = "\
Commands:
  login <username> <password>
  register <username> <password> [display name]
  logout
  start <phase>, <category>      e.g. start Drafting, Deliverables
  stop
  status
  view                           show your decrypted record file
  history                        list logged effort entries
  phases                         list phases and categories
  poker <participants>; <item>; <project>; <language>; <keywords>
  vote <card>
  edit <item>; <project>; <language>; <keywords>
  finish                         store the round's estimate
  search <keyword>
  open <n>                       show result n of the last search
  export <file>                  write your record file as plaintext
  import <file>                  store a plaintext planning poker result
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
        display_name: Option<String>,
    },
    Logout,
    Start {
        phase: LifeCyclePhase,
        category: EffortCategory,
    },
    Stop,
    Status,
    View,
    History,
    Phases,
    Poker {
        participants: u32,
        item: BacklogItem,
    },
    Vote(u32),
    Edit(BacklogItem),
    Finish,
    Search(String),
    Open(usize),
    Export(PathBuf),
    Import(PathBuf),
}

impl Command {
    /// Parses one input line; a blank line is `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "login" => {
                let (username, password) = two_words(rest, "login <username> <password>")?;
                Command::Login { username, password }
            }
            "register" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let username = parts.next().unwrap_or_default().to_string();
                let password = parts.next().unwrap_or_default().to_string();
                if username.is_empty() || password.is_empty() {
                    return Err(usage("register <username> <password> [display name]"));
                }
                let display_name = parts
                    .next()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                Command::Register {
                    username,
                    password,
                    display_name,
                }
            }
            "logout" => Command::Logout,
            "start" => {
                let (phase, category) = rest
                    .split_once(',')
                    .ok_or_else(|| usage("start <phase>, <category>"))?;
                Command::Start {
                    phase: phase.trim().parse()?,
                    category: category.trim().parse()?,
                }
            }
            "stop" => Command::Stop,
            "status" => Command::Status,
            "view" => Command::View,
            "history" => Command::History,
            "phases" => Command::Phases,
            "poker" => {
                let (count, item) = rest.split_once(';').ok_or_else(|| {
                    usage("poker <participants>; <item>; <project>; <language>; <keywords>")
                })?;
                Command::Poker {
                    participants: parse_number(count, "participant count")?,
                    item: parse_item(item)?,
                }
            }
            "vote" => Command::Vote(parse_number(rest, "card")?),
            "edit" => Command::Edit(parse_item(rest)?),
            "finish" => Command::Finish,
            "search" => {
                if rest.is_empty() {
                    return Err(usage("search <keyword>"));
                }
                Command::Search(rest.to_string())
            }
            "open" => Command::Open(parse_number(rest, "result number")?),
            "export" => Command::Export(path_argument(rest, "export <file>")?),
            "import" => Command::Import(path_argument(rest, "import <file>")?),
            other => {
                return Err(EffortLoggerError::InvalidInput(format!(
                    "unknown command '{}', type 'help' for a list",
                    other
                )));
            }
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> EffortLoggerError {
    EffortLoggerError::InvalidInput(format!("usage: {}", text))
}

fn two_words(rest: &str, usage_text: &str) -> Result<(String, String)> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(a), Some(b), None) => Ok((a.to_string(), b.to_string())),
        _ => Err(usage(usage_text)),
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, what: &str) -> Result<T> {
    text.trim()
        .parse()
        .map_err(|_| EffortLoggerError::InvalidInput(format!("'{}' is not a valid {}", text.trim(), what)))
}

fn parse_item(text: &str) -> Result<BacklogItem> {
    let fields: Vec<&str> = text.splitn(4, ';').collect();
    if fields.len() < 3 {
        return Err(usage("<item>; <project>; <language>; <keywords>"));
    }
    let keywords = fields.get(3).copied().unwrap_or_default();
    Ok(BacklogItem::new(fields[0], fields[1], fields[2], keywords))
}

fn path_argument(rest: &str, usage_text: &str) -> Result<PathBuf> {
    if rest.is_empty() {
        return Err(usage(usage_text));
    }
    Ok(PathBuf::from(rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_login() {
        assert_eq!(
            Command::parse("login alice secret").unwrap(),
            Some(Command::Login {
                username: "alice".to_string(),
                password: "secret".to_string()
            })
        );
        assert!(Command::parse("login alice").is_err());
    }

    #[test]
    fn test_register_with_display_name() {
        assert_eq!(
            Command::parse("register bob pw123 Bob Builder").unwrap(),
            Some(Command::Register {
                username: "bob".to_string(),
                password: "pw123".to_string(),
                display_name: Some("Bob Builder".to_string()),
            })
        );
    }

    #[test]
    fn test_start_with_spaced_labels() {
        assert_eq!(
            Command::parse("START team meeting, Interruptions").unwrap(),
            Some(Command::Start {
                phase: LifeCyclePhase::TeamMeeting,
                category: EffortCategory::Interruptions,
            })
        );
        assert!(Command::parse("start Drafting").is_err());
        assert!(Command::parse("start Napping, Other").is_err());
    }

    #[test]
    fn test_poker_round() {
        assert_eq!(
            Command::parse("poker 3; Login page; Portal; Rust; auth; ui").unwrap(),
            Some(Command::Poker {
                participants: 3,
                item: BacklogItem::new("Login page", "Portal", "Rust", "auth; ui"),
            })
        );
        assert!(Command::parse("poker three; a; b; c").is_err());
    }

    #[test]
    fn test_numbers_and_paths() {
        assert_eq!(Command::parse("vote 8").unwrap(), Some(Command::Vote(8)));
        assert_eq!(Command::parse("open 2").unwrap(), Some(Command::Open(2)));
        assert_eq!(
            Command::parse("export /tmp/me.txt").unwrap(),
            Some(Command::Export(PathBuf::from("/tmp/me.txt")))
        );
        assert!(Command::parse("vote").is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            Command::parse("dance"),
            Err(EffortLoggerError::InvalidInput(_))
        ));
    }
}
