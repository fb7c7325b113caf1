//! Line-oriented console front end.
//!
//! Reads one command per line, hands it to the [`CommandHandler`] and prints
//! the reply. Errors are printed and the loop continues.

mod command;

pub use command::{Command, HELP};

use std::io::{self, BufRead, Write};

use crate::application::handlers::{CommandHandler, Reply};

const PROMPT: &str = "effort> ";

/// Runs until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    handler: &mut CommandHandler,
    input: R,
    output: &mut W,
) -> io::Result<()> {
    writeln!(output, "EffortLogger. Type 'help' for commands.")?;
    prompt(output)?;

    for line in input.lines() {
        let line = line?;
        let reply = Command::parse(&line).and_then(|command| match command {
            Some(command) => handler.process_command(command).map(Some),
            None => Ok(None),
        });

        match reply {
            Ok(Some(Reply::Quit)) => {
                writeln!(output, "Bye.")?;
                return Ok(());
            }
            Ok(Some(Reply::Output(text))) => writeln!(output, "{}", text)?,
            Ok(None) => {}
            Err(e) => writeln!(output, "Error: {}", e)?,
        }
        prompt(output)?;
    }
    Ok(())
}

fn prompt<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "{}", PROMPT)?;
    output.flush()
}
