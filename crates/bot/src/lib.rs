//! Chat bot that validates Google Tag Manager workspaces against naming
//! conventions and publishes passing workspaces as a pull request.
//!
//! Messages arrive one per line on stdin (plain text or a JSON
//! [`ChatMessage`]); replies go to stdout. Logs go to stderr.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

pub mod chat;
pub mod command;
pub mod config;
pub mod router;
pub mod small_talk;

pub use chat::{ChatMessage, ChatSink, MemorySink, StdoutSink};
pub use command::{CommandHandler, DispatchError, Outcome};
pub use config::BotConfig;
pub use router::{Route, Router};

const CONSOLE: &str = "console";

#[derive(Parser)]
#[command(name = "gtm-bot")]
#[command(about = "Validate and publish Tag Manager workspaces from chat", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Tag Manager account id
    #[arg(long, global = true, env = "GTM_ACCOUNT_ID")]
    account_id: Option<String>,

    /// OAuth bearer token for the Tag Manager API
    #[arg(long, global = true, env = "GTM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Tag Manager API base URL
    #[arg(long, global = true, env = "GTM_API_BASE", default_value = gtm_tagmanager::DEFAULT_BASE_URL)]
    api_base: String,

    /// Where the publish artifact is written
    #[arg(long, global = true, env = "GTM_ARTIFACT_PATH", default_value = "gtm-config.json")]
    artifact: PathBuf,

    /// Script that commits the artifact and prints the pull request link
    #[arg(long, global = true, env = "GTM_COMMIT_SCRIPT", default_value = "github-commit.sh")]
    commit_script: PathBuf,

    /// The bot's own chat user id; messages must mention it
    #[arg(long, global = true, env = "GTM_BOT_USER_ID")]
    bot_user_id: Option<String>,

    /// Serve Tag Manager data from a JSON fixture (offline mode)
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read messages from stdin, one per line, and reply on stdout
    Listen,

    /// Handle a single message and exit non-zero unless it succeeded
    Run {
        /// Sender shown in replies
        #[arg(long, default_value = CONSOLE)]
        user: String,

        /// Message text, e.g. `gtm validate acme-site`
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
}

impl Cli {
    fn config(&self) -> Result<BotConfig> {
        Ok(BotConfig {
            account_id: self.account_id.clone(),
            access_token: self.access_token.clone(),
            api_base: self.api_base.clone(),
            artifact_path: self.artifact.clone(),
            commit_script: self.commit_script.clone(),
            workdir: std::env::current_dir()?,
            bot_user_id: self.bot_user_id.clone(),
            fixture: self.fixture.clone(),
        })
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let router = Arc::new(cli.config()?.router()?);

    match cli.command {
        Commands::Listen => listen(router).await?,
        Commands::Run { user, text } => run_once(&router, user, text.join(" ")).await?,
    }

    Ok(())
}

async fn listen(router: Arc<Router>) -> Result<()> {
    let sink = Arc::new(StdoutSink);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    log::info!("Listening for messages on stdin");
    while let Some(line) = lines.next_line().await? {
        let Some(message) = parse_line(&line) else {
            continue;
        };
        let router = Arc::clone(&router);
        let sink = Arc::clone(&sink);
        tasks.spawn(async move {
            router.dispatch(&message, sink.as_ref()).await;
        });
        reap_finished(&mut tasks);
    }

    while let Some(joined) = tasks.join_next().await {
        log_task_result(joined);
    }
    Ok(())
}

/// Drop handles of message tasks that already finished. Returns how many.
fn reap_finished(tasks: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = tasks.try_join_next() {
        log_task_result(joined);
        reaped += 1;
    }
    reaped
}

fn log_task_result(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        log::error!("Message task failed: {err}");
    }
}

async fn run_once(router: &Router, user: String, text: String) -> Result<()> {
    let message = ChatMessage::new(user, CONSOLE, text);
    match router.dispatch(&message, &StdoutSink).await {
        Some(outcome) if outcome.is_success() => Ok(()),
        Some(outcome) => bail!("Command did not succeed: {}", serde_json::to_string(&outcome)?),
        None => bail!("Message was not addressed to the bot"),
    }
}

/// A line is either a JSON [`ChatMessage`] or plain text from the console.
fn parse_line(line: &str) -> Option<ChatMessage> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('{') {
        match serde_json::from_str(trimmed) {
            Ok(message) => return Some(message),
            Err(err) => {
                log::warn!("Skipping malformed message: {err}");
                return None;
            }
        }
    }
    Some(ChatMessage::new(CONSOLE, CONSOLE, trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_come_from_the_console() {
        assert_eq!(
            parse_line("  gtm validate acme-site \n"),
            Some(ChatMessage::new(CONSOLE, CONSOLE, "gtm validate acme-site"))
        );
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn json_lines_carry_sender_and_channel() {
        let message =
            parse_line(r#"{"user":"U1","channel":"C9","text":"<@UBOT> gtm publish acme-site"}"#);
        assert_eq!(
            message,
            Some(ChatMessage::new("U1", "C9", "<@UBOT> gtm publish acme-site"))
        );
        assert_eq!(parse_line("{not json"), None);
    }

    #[tokio::test]
    async fn finished_message_tasks_are_reaped() {
        let mut tasks = JoinSet::new();
        tasks.spawn(async {});
        tasks.spawn(async {});
        tasks.spawn(async { panic!("handler bug") });

        let mut reaped = 0;
        for _ in 0..100 {
            reaped += reap_finished(&mut tasks);
            if tasks.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(reaped, 3);
        assert!(tasks.is_empty());
        assert_eq!(reap_finished(&mut tasks), 0);
    }

    #[test]
    fn cli_reads_defaults() {
        let cli = Cli::try_parse_from(["gtm-bot", "run", "gtm", "validate", "acme-site"]).unwrap();
        assert_eq!(cli.artifact, PathBuf::from("gtm-config.json"));
        assert_eq!(cli.commit_script, PathBuf::from("github-commit.sh"));
        match cli.command {
            Commands::Run { user, text } => {
                assert_eq!(user, CONSOLE);
                assert_eq!(text.join(" "), "gtm validate acme-site");
            }
            Commands::Listen => panic!("expected run"),
        }
    }
}
