use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chatline_config::{load as load_config, AppConfig};
use chatline_model::entities::{
    detect_trigger, group_by_date, sort_contacts, suggest, user_suggestions,
};
use chatline_model::utils::timestamp::format_time;
use chatline_model::{import_transcript, DirectMessage, Message, Suggestion, SuggestionKind};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chatline")]
#[command(about = "Inspect chat transcripts stored as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a transcript to canonical JSON
    Import {
        file: PathBuf,
        /// Date for time-only timestamps (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Check every message against the configured limits
    Validate {
        file: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print messages bucketed by day
    Groups {
        file: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Day treated as "Today" when labelling groups
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Complete an @mention or #channel at the cursor
    Suggest {
        /// JSON array of direct-message contacts
        contacts: PathBuf,
        input: String,
        /// Byte offset of the cursor (default end of input)
        #[arg(long)]
        cursor: Option<usize>,
        /// Channel names offered for # completion
        #[arg(long = "channel")]
        channels: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing().context("failed to initialise tracing")?;

    let cli = Cli::parse();
    let config = load_config().context("failed to load configuration")?;

    let output = match cli.command {
        Commands::Import { file, date } => {
            let messages = read_transcript(&file, date).await?;
            serde_json::to_string_pretty(&messages).context("failed to serialize messages")?
        }
        Commands::Validate { file, date } => {
            let messages = read_transcript(&file, date).await?;
            let (report, invalid) = validate_report(&messages, &config);
            if invalid > 0 {
                print!("{report}");
                anyhow::bail!("{invalid} of {} messages are invalid", messages.len());
            }
            report
        }
        Commands::Groups { file, date, today } => {
            let messages = read_transcript(&file, date).await?;
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            render_groups(messages, &config, today)
        }
        Commands::Suggest {
            contacts,
            input,
            cursor,
            channels,
        } => {
            let raw = tokio::fs::read_to_string(&contacts)
                .await
                .with_context(|| format!("failed to read {}", contacts.display()))?;
            let contacts: Vec<DirectMessage> =
                serde_json::from_str(&raw).context("contacts file is not a DirectMessage array")?;
            let cursor = cursor.unwrap_or(input.len());
            render_suggestions(contacts, &channels, &input, cursor, &config)
        }
    };

    print!("{output}");
    Ok(())
}

async fn read_transcript(path: &Path, date: Option<NaiveDate>) -> anyhow::Result<Vec<Message>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let reference = date.unwrap_or_else(|| Utc::now().date_naive());

    let messages = import_transcript(&raw, reference)
        .with_context(|| format!("failed to import {}", path.display()))?;
    info!(path = %path.display(), count = messages.len(), "transcript loaded");
    Ok(messages)
}

fn validate_report(messages: &[Message], config: &AppConfig) -> (String, usize) {
    let mut report = String::new();
    let mut invalid = 0;

    for message in messages {
        if let Err(error) = message.validate(&config.limits) {
            invalid += 1;
            warn!(message_id = %message.id, %error, "invalid message");
            let _ = writeln!(report, "{}: {}", message.id, error);
        }
    }

    let _ = writeln!(
        report,
        "{} messages checked, {} invalid",
        messages.len(),
        invalid
    );
    (report, invalid)
}

fn render_groups(messages: Vec<Message>, config: &AppConfig, today: NaiveDate) -> String {
    let offset = config.display.offset();
    let mut output = String::new();

    for group in group_by_date(messages, offset) {
        let _ = writeln!(output, "{} ({} messages)", group.label(today), group.len());
        for message in &group.messages {
            let replies = message.thread_len();
            let suffix = if replies > 0 {
                format!(" [{} replies]", replies)
            } else {
                String::new()
            };
            let _ = writeln!(
                output,
                "  {} {}: {}{}",
                format_time(&message.timestamp, offset),
                message.user,
                message.content,
                suffix
            );
        }
    }

    output
}

fn render_suggestions(
    mut contacts: Vec<DirectMessage>,
    channels: &[String],
    input: &str,
    cursor: usize,
    config: &AppConfig,
) -> String {
    let Some(trigger) = detect_trigger(input, cursor) else {
        return "no mention at cursor\n".to_string();
    };

    sort_contacts(&mut contacts);
    let mut candidates = user_suggestions(&contacts);
    candidates.extend(channels.iter().cloned().map(Suggestion::channel));

    let results = suggest(&candidates, &trigger, config.suggestions.max_results);
    if results.is_empty() {
        let kind = match trigger.kind {
            SuggestionKind::User => "users",
            SuggestionKind::Channel => "channels",
        };
        return format!("no {} match '{}'\n", kind, trigger.query);
    }

    results
        .iter()
        .map(|s| format!("{}\n", s.insert_text().trim_end()))
        .collect()
}

mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}
