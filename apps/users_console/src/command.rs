//! Console input parsing into user-list intents.

use shared::domain::{ItemsPerPage, UserId, ViewKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    Page(u32),
    PageSize(ItemsPerPage),
    View(ViewKind),
    Delete(UserId),
    Show(UserId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}'; type 'help' for the list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid argument for '{command}': {reason}")]
    InvalidArgument {
        command: &'static str,
        reason: String,
    },
}

pub const HELP: &str = "\
commands:
  search [text]      filter by name (empty clears the filter)
  page <n>           go to page n
  size <5|10|20>     rows per page
  view <list|cards>  switch presentation
  delete <id>        remove a user
  show <id>          print one user
  help               this text
  quit               exit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "search" | "s" => Ok(ConsoleCommand::Search(rest.to_string())),
        "page" | "p" => {
            let page = required("page", rest)?
                .parse::<u32>()
                .map_err(|err| invalid("page", err.to_string()))?;
            Ok(ConsoleCommand::Page(page))
        }
        "size" => {
            let size = required("size", rest)?
                .parse::<u32>()
                .map_err(|err| invalid("size", err.to_string()))?;
            let size = ItemsPerPage::try_from(size).map_err(|err| invalid("size", err.message))?;
            Ok(ConsoleCommand::PageSize(size))
        }
        "view" => match required("view", rest)?.to_ascii_lowercase().as_str() {
            "list" => Ok(ConsoleCommand::View(ViewKind::List)),
            "cards" | "card" => Ok(ConsoleCommand::View(ViewKind::Cards)),
            other => Err(invalid("view", format!("expected list or cards, got '{other}'"))),
        },
        "delete" | "rm" => Ok(ConsoleCommand::Delete(UserId::from(required("delete", rest)?))),
        "show" => Ok(ConsoleCommand::Show(UserId::from(required("show", rest)?))),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn invalid(command: &'static str, reason: String) -> CommandError {
    CommandError::InvalidArgument { command, reason }
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
