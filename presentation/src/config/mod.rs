//! Presentation-level configuration
//!
//! Resolves how a one-shot answer is shown from the CLI flags and the
//! `[output]` config section. CLI flags win.

use crate::cli::commands::OutputFormat as CliOutputFormat;
use chorus_domain::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            show_progress: true,
        }
    }
}

impl OutputConfig {
    pub fn resolve(
        cli_format: Option<CliOutputFormat>,
        file_format: Option<OutputFormat>,
        color: bool,
        quiet: bool,
    ) -> Self {
        let format = cli_format
            .map(OutputFormat::from)
            .or(file_format)
            .unwrap_or_default();

        Self {
            format,
            color,
            // JSON goes to pipes; keep stdout clean.
            show_progress: !quiet && format != OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_format_wins() {
        let config = OutputConfig::resolve(
            Some(CliOutputFormat::Full),
            Some(OutputFormat::Json),
            true,
            false,
        );
        assert_eq!(config.format, OutputFormat::Full);
        assert!(config.show_progress);
    }

    #[test]
    fn test_file_format_used_without_flag() {
        let config = OutputConfig::resolve(None, Some(OutputFormat::Json), true, false);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let config = OutputConfig::resolve(None, None, false, true);
        assert_eq!(config.format, OutputFormat::Answer);
        assert!(!config.show_progress);
        assert!(!config.color);
    }
}
