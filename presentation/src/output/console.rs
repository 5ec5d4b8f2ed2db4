//! Console output formatter for aggregation results

use crate::output::formatter::OutputFormatter;
use chorus_domain::{AggregationResult, Contributions, ERROR_MARKER, Language, OutputFormat};
use colored::Colorize;

/// Formats aggregation results for console display
pub struct ConsoleFormatter {
    language: Language,
}

impl ConsoleFormatter {
    /// `language` picks the wording of the degraded-answer notice.
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Render `result` in the requested format
    pub fn render(&self, format: OutputFormat, question: &str, result: &AggregationResult) -> String {
        match format {
            OutputFormat::Full => self.format_full(question, result),
            OutputFormat::Answer => self.format_answer(result),
            OutputFormat::Json => self.format_json(result),
        }
    }

    /// `Name: 42.17%` lines, one per provider.
    pub fn contribution_lines(contributions: &Contributions) -> String {
        contributions
            .iter()
            .map(|(provider, share)| format!("  {}: {:.2}%\n", provider, share))
            .collect()
    }

    fn final_answer(&self, result: &AggregationResult) -> String {
        let mut output = String::new();
        if result.degraded
            && let Some(provider) = &result.reference
        {
            output.push_str(&format!(
                "{}\n",
                self.language.degraded_notice(provider.as_str()).yellow()
            ));
        }
        output.push_str(&result.final_text);
        output.push('\n');
        output
    }

    fn contributions_block(result: &AggregationResult) -> String {
        if result.contributions.is_empty() {
            return String::new();
        }
        format!(
            "\n{}\n{}",
            "Contributions:".cyan().bold(),
            Self::contribution_lines(&result.contributions)
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, question: &str, result: &AggregationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Chorus"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));
        output.push_str(&format!(
            "{} {}\n",
            "Policy:".cyan().bold(),
            result.policy
        ));

        output.push_str(&Self::section_header("Provider Answers"));
        for (provider, text) in &result.raw_responses {
            let title = format!("── {} ──", provider);
            let title = if text.starts_with(ERROR_MARKER) {
                title.red().bold()
            } else {
                title.yellow().bold()
            };
            output.push_str(&format!("\n{}\n{}\n", title, text));
        }

        output.push_str(&Self::section_header("Final Answer"));
        output.push('\n');
        output.push_str(&self.final_answer(result));
        output.push_str(&Self::contributions_block(result));
        output.push_str(&Self::footer());

        output
    }

    fn format_answer(&self, result: &AggregationResult) -> String {
        let mut output = self.final_answer(result);
        output.push_str(&Self::contributions_block(result));
        output
    }

    fn format_json(&self, result: &AggregationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chorus_domain::{ProviderName, ProviderResponse, SelectionPolicy};

    fn sample() -> AggregationResult {
        let responses = vec![
            ProviderResponse::answer("OpenAI", "Paris is the capital.", 0),
            ProviderResponse::failure("Cohere", "timed out after 30s", 1),
            ProviderResponse::answer("Gemini", "Paris.", 2),
        ];
        let contributions = Contributions::from_similarities(vec![
            (ProviderName::new("OpenAI"), 0.5),
            (ProviderName::new("Gemini"), 0.5),
        ]);
        AggregationResult::new(
            "Paris is the capital.",
            &responses,
            contributions,
            SelectionPolicy::Reference,
        )
    }

    #[test]
    fn test_contribution_lines() {
        let lines = ConsoleFormatter::contribution_lines(&sample().contributions);
        assert_eq!(lines, "  Gemini: 50.00%\n  OpenAI: 50.00%\n");
    }

    #[test]
    fn test_answer_format_has_text_and_contributions() {
        colored::control::set_override(false);
        let formatter = ConsoleFormatter::new(Language::English);
        let output = formatter.format_answer(&sample());

        assert!(output.starts_with("Paris is the capital.\n"));
        assert!(output.contains("OpenAI: 50.00%"));
        assert!(!output.contains("Cohere"));
    }

    #[test]
    fn test_full_format_lists_every_provider() {
        colored::control::set_override(false);
        let formatter = ConsoleFormatter::new(Language::English);
        let output = formatter.render(OutputFormat::Full, "Capital of France?", &sample());

        assert!(output.contains("Capital of France?"));
        assert!(output.contains("Error: Cohere did not respond: timed out after 30s"));
        assert!(output.contains("Paris."));
    }

    #[test]
    fn test_degraded_notice_is_shown() {
        colored::control::set_override(false);
        let result = sample()
            .with_reference(ProviderName::new("Gemini"))
            .degraded();
        let formatter = ConsoleFormatter::new(Language::Italian);

        let output = formatter.format_answer(&result);
        assert!(output.starts_with("[Risposta parziale da Gemini]\n"));
    }

    #[test]
    fn test_no_contributions_block_when_empty() {
        colored::control::set_override(false);
        let result = AggregationResult::no_valid_responses(
            &Language::English,
            &[ProviderResponse::failure("OpenAI", "boom", 0)],
            SelectionPolicy::Reference,
        );
        let output = ConsoleFormatter::new(Language::English).format_answer(&result);
        assert!(!output.contains("Contributions:"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let formatter = ConsoleFormatter::new(Language::English);
        let json = formatter.format_json(&sample());
        let parsed: AggregationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
