//! Output formatter trait

use chorus_domain::AggregationResult;

/// Trait for formatting aggregation results
pub trait OutputFormatter {
    /// Final answer, contributions and every raw provider answer
    fn format_full(&self, question: &str, result: &AggregationResult) -> String;

    /// Final answer and contributions only (concise output)
    fn format_answer(&self, result: &AggregationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &AggregationResult) -> String;
}
