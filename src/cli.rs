use clap::{Parser, Subcommand};
use eyre::{Context, Result};

use crate::{
    chart::ChartKind,
    config::{self, Configuration, load_configuration, lookup_config_path},
    models::Feedback,
};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"Ask questions about your data in plain language, get SQL, results and charts back.

Without a subcommand an interactive session is started.

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/sqlchat/config.toml
    * $HOME/.config/sqlchat/config.toml
    * $HOME/.sqlchat.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,

    /// Print startup progress to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Ask a question, optionally continuing an existing conversation
    Ask {
        /// Conversation id (or id prefix) to continue
        #[arg(short = 'C', long, value_name = "ID")]
        conversation: Option<String>,

        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List conversations
    History,

    /// Print a conversation with its results
    Show { conversation: String },

    /// Translate a message's question again and re-run it
    Regenerate { message: String },

    /// Run edited SQL in place of a message's SQL
    EditSql { message: String, sql: String },

    /// Record whether an answer was helpful; `yes` also reports it upstream
    Feedback { message: String, value: Feedback },

    /// Delete a conversation
    Delete { conversation: String },

    /// Rename a conversation
    Rename { conversation: String, title: String },

    /// Export a message's result as CSV
    Export {
        message: String,

        /// Output file, stdout when omitted
        #[arg(short, long, value_name = "PATH")]
        output: Option<String>,
    },

    /// Chart a message's result
    Chart {
        message: String,

        /// Chart type, the first suggested one by default
        #[arg(short, long)]
        kind: Option<ChartKind>,

        /// First row of the window
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Row after the last one of the window
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Page of rows to chart, starting at 0
        #[arg(long, conflicts_with_all = ["start", "end"])]
        page: Option<usize>,

        /// Print the chart data as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        if config_path.is_empty() {
            // No config path is specified just use the default config
            return Ok(Configuration::default());
        }
        load_configuration(config_path.as_str()).wrap_err("loading configuration")
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
