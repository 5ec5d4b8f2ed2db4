//! Prompt templates for provider requests and re-synthesis

use crate::core::language::Language;
use crate::core::provider::ProviderName;
use crate::session::entities::{Conversation, Turn};

/// Templates for every prompt Chorus sends to a provider
pub struct PromptTemplate;

impl PromptTemplate {
    /// Final user turn: the question annotated with the target language.
    pub fn language_instruction(question: &str, language: &Language) -> String {
        format!("Respond in {}: {}", language, question)
    }

    /// Full turn list for one provider request: history followed by the
    /// annotated question.
    pub fn annotated_turns(
        history: &Conversation,
        question: &str,
        language: &Language,
    ) -> Vec<Turn> {
        let mut turns = history.turns().to_vec();
        turns.push(Turn::user(Self::language_instruction(question, language)));
        turns
    }

    /// Flattened `role: text` transcript for providers that take a single prompt.
    pub fn transcript(history: &Conversation, question: &str, language: &Language) -> String {
        Self::annotated_turns(history, question, language)
            .iter()
            .map(|turn| format!("{}: {}\n", turn.role.as_str(), turn.text))
            .collect()
    }

    /// System prompt for the re-synthesis call
    pub fn synthesis_system() -> &'static str {
        r#"You are combining answers from several independent assistants into one response.
Keep what the answers agree on, resolve disagreements in favour of the majority,
and drop anything that is unsupported. Do not mention the assistants or this process."#
    }

    /// User prompt for the re-synthesis call
    pub fn synthesis_prompt(
        question: &str,
        language: &Language,
        answers: &[(ProviderName, String)],
    ) -> String {
        let mut prompt = format!(
            "Question: {}\n\nAnswers to combine:\n",
            question
        );

        for (provider, answer) in answers {
            prompt.push_str(&format!("\n--- {} ---\n{}\n", provider, answer));
        }

        prompt.push_str(&format!(
            "\nWrite a single answer to the question in {}.",
            language
        ));
        prompt
    }
}
