//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for one-shot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final answer, contributions and every provider's raw answer
    Full,
    /// Only the final answer and contributions
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for chorus_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => chorus_domain::OutputFormat::Full,
            OutputFormat::Answer => chorus_domain::OutputFormat::Answer,
            OutputFormat::Json => chorus_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for chorus
#[derive(Parser, Debug)]
#[command(name = "chorus")]
#[command(author, version, about = "Ask several AI providers at once and reconcile their answers")]
#[command(long_about = r#"
Chorus sends your question to every configured provider concurrently, then
reconciles the answers into one response, reporting how much each provider
agreed with it.

Configuration files are loaded from (lowest to highest priority):
1. ~/.config/chorus/config.toml   Global config
2. ./chorus.toml                  Project-level config
3. --config <path>                Explicit config file
4. CHORUS_* environment variables (e.g. CHORUS_RATE_LIMIT__HOURLY_LIMIT=30)

Example:
  chorus ask "What is the capital of France?"
  chorus ask --language English -o full "Compare TCP and QUIC"
  chorus serve
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer one question and exit
    Ask {
        /// The question to ask every provider
        question: String,

        /// Response language (defaults to [aggregation] default_language)
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Run the HTTP chat server
    Serve {
        /// Address to bind (overrides [server] bind and PORT)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from(["chorus", "ask", "-l", "English", "What is Rust?"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Ask {
                question: "What is Rust?".to_string(),
                language: Some("English".to_string()),
            })
        );
        assert_eq!(cli.output, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["chorus", "ask", "hi", "-vv", "-o", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
    }

    #[test]
    fn test_parse_serve_with_bind() {
        let cli = Cli::try_parse_from(["chorus", "serve", "--bind", "127.0.0.1:3000"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Serve {
                bind: Some("127.0.0.1:3000".to_string())
            })
        );
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::try_parse_from(["chorus", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_output_format_into_domain() {
        let format: chorus_domain::OutputFormat = OutputFormat::Full.into();
        assert_eq!(format, chorus_domain::OutputFormat::Full);
    }
}
