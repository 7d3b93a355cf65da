//! Console command parsing / 콘솔 명령 해석
//!
//! One input line maps to one command. Lines starting with `:` are commands,
//! an empty line clears the search, anything else is a query.

use knowledge_finder::search::SearchMode;

pub const HELP: &str = "\
Type a query to search, or an empty line to clear it.
  :mode <question_or|question_and|answer_or|answer_and>
  :show <question>          show one entry in full
  :add <question> | <answer>
  :edit <question> | <new question> | <new answer>
  :del <question>
  :ask                      ask the AI about the current results
  :recent                   recent searches
  :refresh                  reload the dataset
  :save                     save the dataset
  :help
  :q                        quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Clear,
    Mode(SearchMode),
    Show(String),
    Add { question: String, answer: String },
    Edit { key: String, question: String, answer: String },
    Delete(String),
    Ask,
    Recent,
    Refresh,
    Save,
    Help,
    Quit,
}

/// Parse one input line. `Err` carries a usage message.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(Command::Clear);
    }

    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Ok(Command::Search(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "q" | "quit" => Ok(Command::Quit),
        "help" | "h" => Ok(Command::Help),
        "ask" => Ok(Command::Ask),
        "recent" => Ok(Command::Recent),
        "refresh" => Ok(Command::Refresh),
        "save" => Ok(Command::Save),
        "mode" if !args.is_empty() => Ok(Command::Mode(SearchMode::parse(args))),
        "show" if !args.is_empty() => Ok(Command::Show(args.to_string())),
        "del" if !args.is_empty() => Ok(Command::Delete(args.to_string())),
        "add" => match split_fields(args)[..] {
            [question, answer] => Ok(Command::Add {
                question: question.to_string(),
                answer: answer.to_string(),
            }),
            _ => Err("Usage: :add <question> | <answer>".to_string()),
        },
        "edit" => match split_fields(args)[..] {
            [key, question, answer] => Ok(Command::Edit {
                key: key.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
            }),
            _ => Err("Usage: :edit <question> | <new question> | <new answer>".to_string()),
        },
        "mode" | "show" | "del" => Err(format!("Usage: :{} <argument>", name)),
        _ => Err(format!("Unknown command :{} (try :help)", name)),
    }
}

fn split_fields(args: &str) -> Vec<&str> {
    args.split('|').map(str::trim).collect()
}
