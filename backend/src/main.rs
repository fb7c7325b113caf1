use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use effort_logger::config::{DEFAULT_CONFIG_FILE, EffortLoggerConfig};
use effort_logger::console;
use effort_logger::infrastructure::SystemClock;
use effort_logger::CommandHandler;

fn main() {
    // Load configuration
    let config = load_config();

    // Initialize logger
    let logger = initialize_logger(&config);
    logger.info("EffortLogger starting...");

    let mut handler = match CommandHandler::from_config(
        &config.storage,
        Arc::new(SystemClock),
        logger.clone(),
    ) {
        Ok(handler) => handler,
        Err(e) => {
            logger.error(&format!("Failed to open record store: {}", e));
            eprintln!("Failed to open record store at {}: {}", config.storage.base_dir.display(), e);
            logger.flush();
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = console::run(&mut handler, stdin.lock(), &mut stdout) {
        logger.error(&format!("Console I/O error: {}", e));
        logger.flush();
        std::process::exit(1);
    }
    logger.info("EffortLogger stopped");
    logger.flush();
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &EffortLoggerConfig) -> logging::Logger {
    let settings = config.logging.to_settings().unwrap_or_else(|e| {
        eprintln!("{}; logging at info level", e);
        logging::LogSettings {
            level: logging::LogLevel::Info,
            file_path: config
                .logging
                .enable_file
                .then(|| config.logging.log_file_path.clone().into()),
            console: config.logging.enable_console,
        }
    });

    match logging::Logger::new(settings) {
        Ok(logger) => logger.for_component("Main"),
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            std::process::exit(1);
        }
    }
}

/// Loads configuration from the environment, a file, or default values
fn load_config() -> EffortLoggerConfig {
    // Determine the configuration source in this order:
    // 1. CONFIG environment variable holding JSON
    // 2. First command-line argument as a file path
    // 3. "effort_logger_config.json" in ./config or the working directory
    if let Ok(json_str) = std::env::var("CONFIG") {
        match EffortLoggerConfig::from_json(&json_str) {
            Ok(cfg) => return cfg,
            Err(e) => eprintln!("CONFIG env is not valid JSON: {}", e),
        }
    }

    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => match config_loader::find_config_file(DEFAULT_CONFIG_FILE) {
            Ok(path) => path,
            Err(_) => return EffortLoggerConfig::default(),
        },
    };

    match EffortLoggerConfig::load_from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Failed to load configuration from {}: {}",
                config_path.display(),
                e
            );
            eprintln!("Using default values...");
            EffortLoggerConfig::default()
        }
    }
}
