//! CLI entrypoint for lexora
//!
//! Wires the layers together with dependency injection: config →
//! HTTP adapters → cached dispatcher → research use case.

mod output;
mod progress;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use lexora_application::{ResearchConfig, RunResearchInput, RunResearchUseCase};
use lexora_domain::{DomainError, ResearchQuery};
use lexora_infrastructure::{
    CachedToolDispatcher, CourtListenerClient, EcfrClient, LexoraConfig, MessagesApiGateway,
    TtlToolCache,
};
use progress::ConsoleProgress;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexora", about = "Agentic legal research from the command line")]
struct Cli {
    /// The legal question to research
    question: Option<String>,

    /// Jurisdiction scope (e.g. "federal", "California")
    #[arg(short, long, default_value = "federal")]
    jurisdiction: String,

    /// Reference date for deadline arithmetic (YYYY-MM-DD; defaults to today)
    #[arg(long)]
    effective_date: Option<String>,

    /// Explicit config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit the finding as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(question) = cli.question else {
        bail!("A legal question is required. Example: lexora \"service deadline for a federal complaint\"");
    };

    let config = LexoraConfig::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    if config.completion.api_key.is_empty() {
        bail!("No completion API key configured. Set LEXORA_COMPLETION__API_KEY or add it to lexora.toml.");
    }

    info!("Starting lexora research session");

    // === Dependency injection ===
    let cache = Arc::new(TtlToolCache::new());
    let case_law = Arc::new(
        CourtListenerClient::new(
            &config.case_law.base_url,
            config.case_law.api_token.clone(),
            Duration::from_secs(config.case_law.timeout_secs),
        )
        .context("building case-law client")?,
    );
    let regulation = Arc::new(
        EcfrClient::new(
            &config.regulation.base_url,
            Duration::from_secs(config.regulation.timeout_secs),
        )
        .context("building regulation client")?,
    );
    let gateway = Arc::new(
        MessagesApiGateway::new(
            &config.completion.base_url,
            &config.completion.api_key,
            &config.completion.model,
            config.completion.max_tokens,
            Duration::from_secs(config.completion.timeout_secs),
        )
        .context("building completion gateway")?,
    );

    let mut query = ResearchQuery::new(question, cli.jurisdiction);
    if let Some(date) = &cli.effective_date {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("'{date}', expected YYYY-MM-DD")))?;
        query = query.with_effective_date(parsed);
    }
    query.validate()?;

    let mut dispatcher = CachedToolDispatcher::new(cache, case_law, regulation);
    if let Some(date) = query.effective_date {
        dispatcher = dispatcher.with_reference_date(date);
    }
    let dispatcher = Arc::new(dispatcher);

    // Ctrl-C cancels the session; in-flight work is discarded cleanly.
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        });
    }

    let research_config = ResearchConfig {
        max_tool_rounds: config.research.max_tool_rounds,
        completion_timeout: Duration::from_secs(config.completion.timeout_secs),
        max_follow_up_searches: config.research.max_follow_up_searches,
    };

    let use_case = RunResearchUseCase::new(gateway, dispatcher)
        .with_config(research_config)
        .with_cancellation(token);

    let input = RunResearchInput::new(query);
    let result = if cli.quiet {
        use_case.execute(input).await
    } else {
        use_case.execute_with_progress(input, &ConsoleProgress).await
    };

    match result {
        Ok(output) => {
            if cli.json {
                println!("{}", output::format_json(&output));
            } else {
                println!("{}", output::format_text(&output));
            }
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}
