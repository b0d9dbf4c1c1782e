use std::io::Write;

use chrono::Utc;
use eyre::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    app::{
        input::{HELP, Input},
        render::{render_chart, render_conversation, render_history, render_message, short_id},
    },
    chart::{ChartKind, ChartPanel, to_csv, write_csv},
    cli::Action,
    config::constants::TABLE_MAX_ROWS,
    models::{Conversation, Feedback, Message},
    store::{ArcStore, message_failure},
};

const PROMPT: &str = "sqlchat> ";

/// Text front end over the store: one-shot subcommands and an interactive
/// session reading questions from stdin.
pub struct App {
    store: ArcStore,
    max_rows: usize,
    chart: Option<ChartPanel>,
}

impl App {
    pub fn new(store: ArcStore) -> Self {
        Self {
            store,
            max_rows: TABLE_MAX_ROWS,
            chart: None,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub async fn run_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Ask {
                conversation,
                question,
            } => {
                match conversation {
                    Some(id) => {
                        let conversation = self.resolve_conversation(id).await?;
                        self.store.load_conversation(conversation.id()).await;
                    }
                    None => self.store.start_new_conversation().await,
                }
                let question = question.join(" ");
                self.ask(&question).await?;
            }

            Action::History => self.print_history().await,

            Action::Show { conversation } => {
                let conversation = self.resolve_conversation(conversation).await?;
                println!("{}", render_conversation(&conversation, self.max_rows));
            }

            Action::Regenerate { message } => {
                let message = self.activate_message(message).await?;
                let answer = self.store.regenerate_query(message.id()).await?;
                self.print_answer(answer)?;
            }

            Action::EditSql { message, sql } => {
                let message = self.activate_message(message).await?;
                let answer = self.store.regenerate_message(message.id(), sql).await?;
                self.print_answer(answer)?;
            }

            Action::Feedback { message, value } => {
                let (_, message) = self.resolve_message(message).await?;
                self.rate(message.id(), *value).await?;
            }

            Action::Delete { conversation } => {
                let conversation = self.resolve_conversation(conversation).await?;
                self.store.delete_conversation(conversation.id()).await;
                println!("Deleted \"{}\"", conversation.title());
            }

            Action::Rename {
                conversation,
                title,
            } => {
                let conversation = self.resolve_conversation(conversation).await?;
                if !self.store.rename_conversation(conversation.id(), title).await? {
                    bail!("title must not be empty");
                }
            }

            Action::Export { message, output } => {
                let (_, message) = self.resolve_message(message).await?;
                let Some(result) = message.result() else {
                    bail!("message {} has no result to export", message.id());
                };
                match output {
                    Some(path) => {
                        write_csv(result, std::path::Path::new(path))?;
                        println!("Wrote {} rows to {}", result.len(), path);
                    }
                    None => print!("{}", to_csv(result)?),
                }
            }

            Action::Chart {
                message,
                kind,
                start,
                end,
                page,
                json,
            } => {
                let (_, message) = self.resolve_message(message).await?;
                self.open_chart(message.id()).await?;
                if let (Some(start), Some(end)) = (start, end) {
                    self.set_rows(start, end)?;
                }
                if let Some(page) = page {
                    self.set_page(*page)?;
                }
                self.print_chart(*kind, *json).await?;
            }
        }
        Ok(())
    }

    /// Reads lines from stdin until `/quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        println!("Ask a question about your data, /help for commands.");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("{}", PROMPT);
            std::io::stdout().flush().wrap_err("flushing stdout")?;

            let Some(line) = lines.next_line().await.wrap_err("reading input")? else {
                println!();
                return Ok(());
            };

            let input = match Input::parse(&line) {
                Ok(input) => input,
                Err(err) => {
                    println!("{}", err);
                    continue;
                }
            };
            if input == Input::Quit {
                return Ok(());
            }
            if let Err(err) = self.handle_input(input).await {
                log::error!("Command failed: {:#}", err);
                println!("Error: {:#}", err);
            }
        }
    }

    async fn handle_input(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Empty | Input::Quit => {}
            Input::Help => println!("{}", HELP),
            Input::Question(question) => {
                self.store.set_current_query(question.as_str()).await;
                self.chart = None;
                if let Err(err) = self.ask(&question).await {
                    log::debug!("Question settled with an error: {:#}", err);
                }
            }
            Input::NewConversation => {
                self.store.start_new_conversation().await;
                self.chart = None;
                println!("Started a new conversation");
            }
            Input::History => self.print_history().await,
            Input::Open(id) => {
                let conversation = self.resolve_conversation(&id).await?;
                self.store.load_conversation(conversation.id()).await;
                self.chart = None;
                println!("{}", render_conversation(&conversation, self.max_rows));
            }
            Input::Rename { id, title } => {
                let conversation = self.resolve_conversation(&id).await?;
                self.store.rename_conversation(conversation.id(), &title).await?;
            }
            Input::Delete(id) => {
                let conversation = self.resolve_conversation(&id).await?;
                self.store.delete_conversation(conversation.id()).await;
                println!("Deleted \"{}\"", conversation.title());
            }
            Input::Regenerate => {
                let message = self.last_answer().await?;
                let answer = self.store.regenerate_query(message.id()).await?;
                self.chart = None;
                self.print_answer(answer).ok();
            }
            Input::EditSql(sql) => {
                let message = self.last_answer().await?;
                let answer = self.store.regenerate_message(message.id(), &sql).await?;
                self.chart = None;
                self.print_answer(answer).ok();
            }
            Input::Helpful(helpful) => {
                let message = self.last_answer().await?;
                let value = if helpful { Feedback::Yes } else { Feedback::No };
                self.rate(message.id(), value).await?;
                if !helpful {
                    println!("Use /edit <sql> to correct the query or /regen to try again.");
                }
            }
            Input::Chart(kind) => {
                if self.chart.is_none() {
                    let message = self.last_answer().await?;
                    self.open_chart(message.id()).await?;
                }
                if let Some(kind) = kind {
                    self.store.set_selected_chart_type(kind).await;
                }
                self.print_chart(kind, false).await?;
            }
            Input::Rows { start, end } => {
                self.ensure_chart().await?;
                self.set_rows(&start, &end)?;
                self.print_chart(None, false).await?;
            }
            Input::Page(page) => {
                self.ensure_chart().await?;
                self.set_page(page)?;
                self.print_chart(None, false).await?;
            }
            Input::Export(path) => {
                let message = self.last_answer().await?;
                let Some(result) = message.result() else {
                    bail!("the last answer has no result");
                };
                write_csv(result, std::path::Path::new(&path))?;
                println!("Wrote {} rows to {}", result.len(), path);
            }
        }
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<()> {
        let answer = self.store.submit_query(question).await?;
        self.print_answer(answer)
    }

    fn print_answer(&self, answer: Option<Message>) -> Result<()> {
        let Some(answer) = answer else {
            println!("The answer was replaced by a newer one.");
            return Ok(());
        };
        println!("{}", render_message(&answer, self.max_rows));
        match message_failure(&answer) {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    async fn print_history(&self) {
        let current = self.store.current_conversation().await;
        let conversations = self.store.conversations().await;
        println!(
            "{}",
            render_history(
                Utc::now(),
                &conversations,
                current.as_ref().map(|c| c.id())
            )
        );
    }

    async fn rate(&self, message_id: &str, value: Feedback) -> Result<()> {
        self.store.set_message_feedback(message_id, value).await?;
        if value == Feedback::Yes {
            if self.store.submit_feedback(message_id).await {
                println!("Thanks, the query was reported as a good answer.");
            } else {
                println!("Feedback saved, but reporting it failed. See the log for details.");
            }
        } else {
            println!("Feedback saved.");
        }
        Ok(())
    }

    async fn open_chart(&mut self, message_id: &str) -> Result<()> {
        if self.store.inspect_result(message_id).await.is_none() {
            bail!("message {} has no result to chart", message_id);
        }
        if !self.store.show_chart().await {
            self.store.toggle_chart().await;
        }
        self.chart = self.store.chart_panel().await;
        Ok(())
    }

    async fn ensure_chart(&mut self) -> Result<()> {
        if self.chart.is_none() {
            let message = self.last_answer().await?;
            self.open_chart(message.id()).await?;
        }
        Ok(())
    }

    fn set_rows(&mut self, start: &str, end: &str) -> Result<()> {
        let Some(panel) = self.chart.as_mut() else {
            bail!("no chart is open");
        };
        panel.set_range(start, end)?;
        Ok(())
    }

    fn set_page(&mut self, page: usize) -> Result<()> {
        let Some(panel) = self.chart.as_mut() else {
            bail!("no chart is open");
        };
        if page >= panel.total_pages() {
            bail!("page must be below {}", panel.total_pages());
        }
        panel.set_page(page);
        Ok(())
    }

    async fn print_chart(&self, kind: Option<ChartKind>, json: bool) -> Result<()> {
        let Some(panel) = self.chart.as_ref() else {
            bail!("no chart is open");
        };

        let suggestions = panel.suggestions();
        let kind = match kind {
            Some(kind) => kind,
            None => {
                let selected = self.store.selected_chart_type().await;
                if suggestions.contains(&selected) {
                    selected
                } else {
                    suggestions.first().copied().unwrap_or(selected)
                }
            }
        };

        let view = panel.render(kind)?;
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&view).wrap_err("encoding chart")?
            );
            return Ok(());
        }

        if !suggestions.is_empty() {
            let names = suggestions
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>();
            println!("Suggested: {}", names.join(", "));
        }
        println!(
            "{}",
            render_chart(&view, panel.range(), panel.total_rows())
        );
        Ok(())
    }

    /// The last assistant message of the active conversation.
    async fn last_answer(&self) -> Result<Message> {
        let Some(conversation) = self.store.current_conversation().await else {
            bail!("no active conversation, ask a question first");
        };
        conversation
            .messages()
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .cloned()
            .ok_or_else(|| eyre::eyre!("the active conversation has no answer yet"))
    }

    /// Finds a message by id or id prefix and makes its conversation active.
    async fn activate_message(&self, id: &str) -> Result<Message> {
        let (conversation, message) = self.resolve_message(id).await?;
        self.store.load_conversation(conversation.id()).await;
        Ok(message)
    }

    async fn resolve_conversation(&self, id: &str) -> Result<Conversation> {
        let conversations = self.store.conversations().await;
        if let Some(conversation) = conversations.iter().find(|c| c.id() == id) {
            return Ok(conversation.clone());
        }

        let mut matches = conversations.into_iter().filter(|c| c.id().starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(conversation), None) => Ok(conversation),
            (Some(_), Some(_)) => bail!("conversation id {} is ambiguous", id),
            (None, _) => bail!("conversation {} not found", id),
        }
    }

    async fn resolve_message(&self, id: &str) -> Result<(Conversation, Message)> {
        let conversations = self.store.conversations().await;
        let mut matches = vec![];
        for conversation in &conversations {
            for message in conversation.messages() {
                if message.is_assistant() && message.id().starts_with(id) {
                    if message.id() == id {
                        return Ok((conversation.clone(), message.clone()));
                    }
                    matches.push((conversation, message));
                }
            }
        }

        match matches.as_slice() {
            [(conversation, message)] => Ok(((*conversation).clone(), (*message).clone())),
            [] => bail!("message {} not found", id),
            _ => bail!(
                "message id {} is ambiguous, e.g. {}",
                id,
                short_id(matches[0].1.id())
            ),
        }
    }
}
