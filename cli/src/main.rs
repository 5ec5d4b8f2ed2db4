//! CLI entrypoint for chorus
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod logging;

use anyhow::{Context, Result, bail};
use chorus_application::{
    AskInput, AskOutcome, AskUseCase, Clock, ConversationLogger, DEFAULT_PROVIDER_TIMEOUT,
    NoProgress, SessionStore, SystemClock,
};
use chorus_domain::Language;
use chorus_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, build_client, build_providers, build_scorer,
};
use chorus_presentation::{
    AppState, Cli, Command, ConsoleFormatter, OutputConfig, ProgressReporter,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Session key for one-shot questions from the terminal.
const CLI_SESSION: &str = "cli";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::config_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    let _log_guard = logging::init(cli.verbose, config.logging.file.as_deref())?;
    info!("Starting chorus");

    let issues = config.validate();
    for issue in &issues {
        eprintln!("{}", issue);
    }
    if issues.iter().any(|issue| issue.is_error()) {
        bail!("invalid configuration");
    }

    let Some(command) = cli.command.clone() else {
        bail!("No command given. Use `chorus ask <QUESTION>` or `chorus serve`.");
    };

    // === Dependency Injection ===
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let use_case = Arc::new(build_use_case(&config, Arc::clone(&clock))?);

    match command {
        Command::Ask { question, language } => {
            let output = OutputConfig::resolve(
                cli.output,
                config.output.format,
                config.output.color,
                cli.quiet,
            );
            ask(&use_case, question, language, output).await
        }
        Command::Serve { bind } => {
            let address = bind.unwrap_or_else(|| config.server.address());
            chorus_presentation::serve(&address, AppState::new(use_case, clock))
                .await
                .with_context(|| format!("chat server on {} failed", address))
        }
    }
}

fn build_use_case(config: &FileConfig, clock: Arc<dyn Clock>) -> Result<AskUseCase> {
    let client = build_client(client_timeout(config)).context("failed to build HTTP client")?;
    let providers = build_providers(config, &client);
    let scorer = build_scorer(&config.embedding, &client);
    let store = Arc::new(SessionStore::with_premium(config.rate_limit.premium_keys()));

    let mut use_case = AskUseCase::new(store, clock, providers, scorer, config.aggregation_config());

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!(path = %logger.path().display(), "Conversation log enabled");
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                use_case = use_case.with_conversation_logger(logger);
            }
            Err(e) => warn!(path = %path.display(), "Cannot open conversation log: {}", e),
        }
    }

    Ok(use_case)
}

/// Longest per-attempt budget across providers, the news lookup and the embedder.
fn client_timeout(config: &FileConfig) -> Duration {
    let mut floor = config.embedding.timeout().max(DEFAULT_PROVIDER_TIMEOUT);
    if config.news.enabled {
        floor = floor.max(config.news.timeout());
    }
    config
        .enabled_providers()
        .filter_map(|provider| provider.timeout())
        .fold(floor, Duration::max)
}

async fn ask(
    use_case: &AskUseCase,
    question: String,
    language: Option<String>,
    output: OutputConfig,
) -> Result<()> {
    if !output.color {
        colored::control::set_override(false);
    }

    let language = language
        .map(|name| name.parse::<Language>().unwrap_or_default())
        .unwrap_or_else(|| use_case.default_language().clone());
    let input = AskInput::new(CLI_SESSION, question.clone()).with_language(language.clone());

    let outcome = if output.show_progress {
        let progress = ProgressReporter::new();
        let outcome = use_case.execute_with_progress(input, &progress).await;
        progress.finish();
        outcome?
    } else {
        use_case.execute_with_progress(input, &NoProgress).await?
    };

    match outcome {
        AskOutcome::Answered(result) => {
            let formatter = ConsoleFormatter::new(language);
            println!("{}", formatter.render(output.format, &question, &result));
        }
        AskOutcome::Rejected(message) => println!("{}", message),
    }

    Ok(())
}
