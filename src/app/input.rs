#[cfg(test)]
#[path = "input_test.rs"]
mod tests;

use eyre::{Result, bail};

use crate::chart::ChartKind;

pub const HELP: &str = r#"Type a question to ask it. Commands:
  /new                   start a new conversation
  /history               list conversations
  /open <id>             switch to a conversation
  /rename <id> <title>   rename a conversation
  /delete <id>           delete a conversation
  /regen                 translate the last question again
  /edit <sql>            run edited SQL for the last answer
  /yes, /no              rate the last answer
  /chart [type]          chart the last result (bar, line, area, pie)
  /rows <start> <end>    chart rows start..end
  /page <n>              chart the n-th page of rows
  /export <path>         save the last result as CSV
  /help                  show this help
  /quit                  leave"#;

/// One line typed in an interactive session.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Question(String),
    NewConversation,
    History,
    Open(String),
    Rename { id: String, title: String },
    Delete(String),
    Regenerate,
    EditSql(String),
    Helpful(bool),
    Chart(Option<ChartKind>),
    Rows { start: String, end: String },
    Page(usize),
    Export(String),
    Help,
    Quit,
    Empty,
}

impl Input {
    pub fn parse(line: &str) -> Result<Input> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Input::Empty);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Input::Question(line.to_string()));
        };

        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };

        let input = match name.to_lowercase().as_str() {
            "new" => Input::NewConversation,
            "history" | "ls" => Input::History,
            "open" => Input::Open(required(name, rest)?),
            "delete" | "rm" => Input::Delete(required(name, rest)?),
            "rename" => {
                let Some((id, title)) = rest.split_once(char::is_whitespace) else {
                    bail!("usage: /rename <id> <title>");
                };
                Input::Rename {
                    id: id.to_string(),
                    title: title.trim().to_string(),
                }
            }
            "regen" | "regenerate" => Input::Regenerate,
            "edit" => Input::EditSql(required(name, rest)?),
            "yes" | "y" => Input::Helpful(true),
            "no" | "n" => Input::Helpful(false),
            "chart" => match rest {
                "" => Input::Chart(None),
                kind => Input::Chart(Some(kind.parse()?)),
            },
            "rows" => {
                let bounds = rest.split_whitespace().collect::<Vec<_>>();
                let [start, end] = bounds.as_slice() else {
                    bail!("usage: /rows <start> <end>");
                };
                Input::Rows {
                    start: start.to_string(),
                    end: end.to_string(),
                }
            }
            "page" => match rest.parse::<usize>() {
                Ok(page) => Input::Page(page),
                Err(_) => bail!("usage: /page <n>"),
            },
            "export" => Input::Export(required(name, rest)?),
            "help" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            other => bail!("unknown command /{}, try /help", other),
        };
        Ok(input)
    }
}

fn required(name: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("/{} needs an argument, try /help", name);
    }
    Ok(rest.to_string())
}
