//! Settings commands typed on stdin.
//!
//! The console plays the settings form: each line becomes a validated
//! attribute update, or the retry action of the error view.
use std::io::{self, BufRead};
use std::thread;

use log::{debug, error};
use stock_common::settings::SettingsForm;
use stock_common::{ConfigUpdate, Ticker};
use tokio::sync::mpsc::Sender;

use crate::error::ClientError;

/// Help text listing the console commands.
pub const HELP: &str = "\
Commands:
  r              retry / refresh now
  a on|off       toggle auto-refresh
  i <secs>       auto-refresh interval (5-60)
  s <SYM,...>    symbols, at most 4 (empty clears)
  k <key>        API key (empty clears)
  h              this help
  q              quit";

/// One parsed console line.
#[derive(Debug, PartialEq)]
pub enum ConsoleCommand {
    /// Run a fetch cycle now.
    Retry,
    /// Change widget attributes.
    Settings(ConfigUpdate),
    /// Print the help text.
    Help,
    /// Leave the client.
    Quit,
}

/// Parses one line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, ClientError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "" => return Ok(None),
        "r" | "retry" => ConsoleCommand::Retry,
        "h" | "help" => ConsoleCommand::Help,
        "q" | "quit" => ConsoleCommand::Quit,
        "a" | "auto" => {
            let enabled = match rest {
                "on" | "true" | "1" => true,
                "off" | "false" | "0" => false,
                other => {
                    return Err(ClientError::Format(format!(
                        "Expected 'on' or 'off', got '{}'",
                        other
                    )));
                }
            };
            ConsoleCommand::Settings(SettingsForm::new().auto_refresh(enabled).build())
        }
        "i" | "interval" => {
            let secs: u32 = rest
                .parse()
                .map_err(|e| ClientError::Format(format!("Invalid interval '{}': {}", rest, e)))?;
            ConsoleCommand::Settings(SettingsForm::new().refresh_interval(secs)?.build())
        }
        "s" | "symbols" => {
            let symbols = Ticker::parse_list(rest)?;
            ConsoleCommand::Settings(SettingsForm::new().symbols(symbols)?.build())
        }
        "k" | "key" => ConsoleCommand::Settings(SettingsForm::new().credential(rest).build()),
        other => {
            return Err(ClientError::Format(format!(
                "Unknown command '{}', type 'h' for help",
                other
            )));
        }
    };
    Ok(Some(command))
}

/// Spawn a background thread forwarding stdin lines to `tx` until stdin closes
/// or the receiver is dropped.
pub fn spawn_stdin_reader(tx: Sender<String>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
        debug!("Stdin reader stopping...");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(line: &str) -> ConfigUpdate {
        match parse_command(line).unwrap() {
            Some(ConsoleCommand::Settings(update)) => update,
            other => panic!("expected settings, got {:?}", other),
        }
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("r").unwrap(), Some(ConsoleCommand::Retry));
        assert_eq!(parse_command("quit").unwrap(), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("h").unwrap(), Some(ConsoleCommand::Help));
    }

    #[test]
    fn settings_commands_build_updates() {
        assert_eq!(settings("a on").auto_refresh, Some(true));
        assert_eq!(settings("auto off").auto_refresh, Some(false));
        assert_eq!(settings("i 15").refresh_interval, Some(15));
        assert_eq!(
            settings("s aapl, nvda").symbols,
            Some(vec![Ticker::AAPL, Ticker::NVDA])
        );
        assert_eq!(settings("s").symbols, Some(vec![]));
        assert_eq!(settings("k  abc123 ").credential.as_deref(), Some("abc123"));
        assert_eq!(settings("k").credential.as_deref(), Some(""));
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(parse_command("a maybe").is_err());
        assert!(parse_command("i soon").is_err());
        assert!(parse_command("i 90").is_err());
        assert!(parse_command("s AAPL,MSFT,NVDA,TSLA,META").is_err());
        assert!(parse_command("s IBM").is_err());
        assert!(parse_command("x").is_err());
    }
}
