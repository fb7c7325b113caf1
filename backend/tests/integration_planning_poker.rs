//! Integration tests for planning poker results and the console front end

use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use effort_logger::application::usecases::PlanningPokerUseCase;
use effort_logger::config::StorageConfig;
use effort_logger::console;
use effort_logger::domain::BacklogItem;
use effort_logger::infrastructure::{EncryptedFileStore, ManualClock, ShiftCipher};
use effort_logger::CommandHandler;

fn poker_usecase(base_dir: &std::path::Path) -> PlanningPokerUseCase {
    let store = EncryptedFileStore::new(base_dir, Arc::new(ShiftCipher::legacy()));
    PlanningPokerUseCase::new(store, logging::Logger::disabled())
}

#[test]
fn test_round_result_stored_and_found() {
    let dir = tempfile::tempdir().unwrap();
    let poker = poker_usecase(dir.path());

    let mut round = poker
        .new_round(BacklogItem::new("Login page", "Portal", "Rust", "auth, ui"), 3)
        .unwrap();
    for card in [3, 5, 8] {
        round.cast_vote(card).unwrap();
    }
    let path = poker
        .append_planning_poker_result(&round.summary().unwrap())
        .unwrap();

    assert_eq!(
        poker.read_result(&path).unwrap(),
        "Backlog Item: Login page\nProject: Portal\nLanguage: Rust\nKeywords: auth, ui\nUsers: 3\nAverage Estimate: 5.33\n"
    );

    let hits = poker.search_by_keyword("ui").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Login_page");
    assert!(poker.search_by_keyword("Python").unwrap().is_empty());
}

#[test]
fn test_console_session() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(2023, 11, 28)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap(),
    ));
    let config = StorageConfig {
        base_dir: dir.path().to_path_buf(),
        seed_default_identity: false,
        ..StorageConfig::default()
    };
    let mut handler =
        CommandHandler::from_config(&config, clock, logging::Logger::disabled()).unwrap();

    let script = "\
register carol pw Carol
login carol pw
start Drafting, Deliverables
start Drafting, Deliverables
stop
poker 2; Export; Reports; Rust; csv
vote 4
vote 5
vote 13
finish
search csv
open 1
bogus
quit
history
";
    let mut output = Vec::new();
    console::run(&mut handler, Cursor::new(script), &mut output).unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("Registered Carol."));
    assert!(output.contains("Welcome, Carol."));
    assert!(output.contains("Error: invalid state: timer already running"));
    assert!(output.contains("Entry 1 logged: 09:00:00 to 09:00:00 (00:00:00)."));
    assert!(output.contains("Error: invalid input: 4 is not a planning poker card"));
    assert!(output.contains("Average Estimate: 9.00"));
    assert!(output.contains("Error: invalid input: unknown command 'bogus'"));
    assert!(output.ends_with("Bye.\n"));
    assert!(!output.contains("No effort logged yet."));
    assert!(dir
        .path()
        .join("planning_poker_data_encrypted/Export_encrypted.txt")
        .is_file());
}
