//! Ask use case.
//!
//! Answers one question for one session:
//!
//! 1. Rate gate: reject before any provider is contacted
//! 2. Fanout the question with the session's history to every provider
//! 3. Collect one outcome per provider
//! 4. Embed valid answers and select/synthesize the final answer
//! 5. Append the exchange to the session's history
//!
//! Individual provider failures never abort the request; only the rate
//! gate short-circuits.

use crate::config::AggregationConfig;
use crate::ports::clock::Clock;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation::GenerationProvider;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::session::{RateGate, SessionStore};
use crate::use_cases::collector::collect;
use crate::use_cases::fanout::Fanout;
use crate::use_cases::scoring::EmbeddingScorer;
use crate::use_cases::selection::Selector;
use chorus_domain::{
    Admission, AggregationResult, DomainError, Language, ProviderResponse, Question, SelectionPolicy,
    preview,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during Ask execution.
///
/// Provider failures and rate rejections are not errors; see [`AskOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    #[error("No providers configured")]
    NoProviders,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the [`AskUseCase`].
#[derive(Debug, Clone)]
pub struct AskInput {
    /// Opaque session key supplied by the transport
    pub session: String,
    pub question: String,
    /// Target language; the configured default when `None`
    pub language: Option<Language>,
}

impl AskInput {
    pub fn new(session: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            question: question.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// Request-level result
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    Answered(AggregationResult),
    /// The rate gate refused the request; carries the user-facing message.
    Rejected(String),
}

/// Use case for answering a question through every provider at once.
pub struct AskUseCase {
    store: Arc<SessionStore>,
    gate: RateGate,
    fanout: Fanout,
    scorer: EmbeddingScorer,
    selector: Selector,
    default_language: Language,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl AskUseCase {
    pub fn new(
        store: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
        providers: Vec<Arc<dyn GenerationProvider>>,
        scorer: EmbeddingScorer,
        config: AggregationConfig,
    ) -> Self {
        let fanout = Fanout::new(providers, config.retry);
        let selector = match config.policy {
            SelectionPolicy::Reference => Selector::reference(),
            SelectionPolicy::Resynthesis => {
                let synthesizer = config
                    .synthesis_provider
                    .as_ref()
                    .and_then(|name| fanout.find(name.as_str()));
                if synthesizer.is_none() {
                    warn!("Synthesis provider not available, every answer will use the fallback");
                }
                Selector::resynthesis(synthesizer, config.fallback_order.clone(), config.retry)
            }
        };
        let gate = RateGate::new(Arc::clone(&store), clock).with_hourly_limit(config.hourly_limit);

        Self {
            store,
            gate,
            fanout,
            scorer,
            selector,
            default_language: config.default_language,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Builder: set conversation logger for structured event logging.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Execute with default (no-op) progress
    pub async fn execute(&self, input: AskInput) -> Result<AskOutcome, AskError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: AskInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<AskOutcome, AskError> {
        if self.fanout.is_empty() {
            return Err(AskError::NoProviders);
        }
        let question = Question::parse(input.question)?;
        let language = input
            .language
            .unwrap_or_else(|| self.default_language.clone());

        let (session, admission) = self.gate.admit(&input.session)?;
        if let Admission::Rejected(message) = admission {
            info!(session = %session, "Request rejected by rate gate");
            self.conversation_logger.log(ConversationEvent::new(
                "rate_rejected",
                serde_json::json!({
                    "session": session.as_str(),
                    "limit": self.gate.hourly_limit(),
                }),
            ));
            return Ok(AskOutcome::Rejected(message));
        }

        info!(
            session = %session,
            question = %preview(question.content(), 60),
            language = %language,
            "Answering question"
        );

        let history = self.store.history(&session);
        let dispatch = self
            .fanout
            .dispatch(&history, question.content(), &language);
        progress.on_fanout_start(dispatch.dispatched());

        let responses = collect(dispatch, progress).await;
        self.log_responses(&responses);

        progress.on_selection_start(self.selector.policy());
        let responses = self.scorer.embed_answers(responses).await;
        let result = self
            .selector
            .select(&self.scorer, question.content(), &language, &responses)
            .await;

        if responses.iter().any(|r| r.is_success() && r.scored) {
            self.store
                .record_exchange(&session, question.content(), &result.final_text);
        } else {
            warn!(session = %session, "No provider produced a valid answer");
        }

        self.conversation_logger.log(ConversationEvent::new(
            "aggregation_result",
            serde_json::json!({
                "session": session.as_str(),
                "policy": result.policy,
                "reference": result.reference,
                "degraded": result.degraded,
                "contributions": result.contributions,
                "text": result.final_text,
            }),
        ));

        Ok(AskOutcome::Answered(result))
    }

    fn log_responses(&self, responses: &[ProviderResponse]) {
        for response in responses {
            self.conversation_logger.log(ConversationEvent::new(
                "provider_response",
                serde_json::json!({
                    "provider": response.provider,
                    "arrival": response.arrival,
                    "success": response.is_success(),
                    "text": response.display_text(),
                }),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::embedding::{EmbeddingError, EmbeddingProvider};
    use crate::ports::generation::ProviderError;
    use crate::retry::RetryPolicy;
    use async_trait::async_trait;
    use chorus_domain::{Conversation, EmbeddingVector, ProviderName};
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Mock ports ====================

    struct MockProvider {
        name: ProviderName,
        delay: Duration,
        reply: Result<String, ProviderError>,
        scored: bool,
        calls: AtomicUsize,
        last_history_len: AtomicUsize,
    }

    impl MockProvider {
        fn new(name: &str, delay_ms: u64, reply: Result<&str, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                name: ProviderName::new(name),
                delay: Duration::from_millis(delay_ms),
                reply: reply.map(str::to_string),
                scored: true,
                calls: AtomicUsize::new(0),
                last_history_len: AtomicUsize::new(0),
            })
        }

        fn context(name: &str, delay_ms: u64, reply: &str) -> Arc<Self> {
            Arc::new(Self {
                name: ProviderName::new(name),
                delay: Duration::from_millis(delay_ms),
                reply: Ok(reply.to_string()),
                scored: false,
                calls: AtomicUsize::new(0),
                last_history_len: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationProvider for MockProvider {
        fn name(&self) -> &ProviderName {
            &self.name
        }

        fn scored(&self) -> bool {
            self.scored
        }

        async fn generate(
            &self,
            history: &Conversation,
            _question: &str,
            _language: &Language,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_history_len.store(history.len(), Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.clone()
        }
    }

    struct MockEmbedder(HashMap<String, Vec<f64>>);

    #[async_trait]
    impl EmbeddingProvider for MockEmbedder {
        fn model_name(&self) -> &str {
            "mock-embed"
        }

        async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
            self.0
                .get(text)
                .cloned()
                .map(EmbeddingVector::new)
                .ok_or_else(|| EmbeddingError::Request(format!("no vector for '{}'", text)))
        }
    }

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, by: ChronoDuration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct RecordingLogger(Mutex<Vec<&'static str>>);

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.0.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    fn use_case(
        providers: &[Arc<MockProvider>],
        embedder: Option<MockEmbedder>,
        clock: Arc<ManualClock>,
    ) -> AskUseCase {
        let providers: Vec<Arc<dyn GenerationProvider>> = providers
            .iter()
            .map(|p| Arc::clone(p) as Arc<dyn GenerationProvider>)
            .collect();
        let scorer = match embedder {
            Some(embedder) => EmbeddingScorer::new(Arc::new(embedder)),
            None => EmbeddingScorer::disabled(),
        };
        AskUseCase::new(
            Arc::new(SessionStore::new()),
            clock,
            providers,
            scorer,
            AggregationConfig::default().with_retry(RetryPolicy::none()),
        )
    }

    fn answered(outcome: AskOutcome) -> AggregationResult {
        match outcome {
            AskOutcome::Answered(result) => result,
            AskOutcome::Rejected(message) => panic!("unexpected rejection: {}", message),
        }
    }

    fn paris_embedder() -> MockEmbedder {
        // cos(A, C) = 0.95
        let c_y = (1.0_f64 - 0.95 * 0.95).sqrt();
        MockEmbedder(HashMap::from([
            ("Paris is the capital.".to_string(), vec![1.0, 0.0]),
            ("The capital of France is Paris.".to_string(), vec![0.95, c_y]),
        ]))
    }

    // ==================== Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_paris_scenario() {
        let a = MockProvider::new("A", 10, Ok("Paris is the capital."));
        let b = MockProvider::new("B", 20, Err(ProviderError::Timeout(Duration::from_secs(30))));
        let c = MockProvider::new("C", 30, Ok("The capital of France is Paris."));
        let use_case = use_case(&[a, b, c], Some(paris_embedder()), ManualClock::new());

        let result = answered(
            use_case
                .execute(AskInput::new("s1", "What is the capital of France?").with_language(Language::English))
                .await
                .unwrap(),
        );

        assert_eq!(result.final_text, "Paris is the capital.");
        assert_eq!(result.raw_responses.len(), 3);
        assert!(result.raw_responses[&ProviderName::new("B")].starts_with("Error:"));

        assert_eq!(result.contributions.len(), 2);
        assert!(result.contributions.get("B").is_none());
        assert!((result.contributions.total() - 100.0).abs() < 1e-9);
        for name in ["A", "C"] {
            let pct = result.contributions.get(name).unwrap();
            assert!((45.0..=55.0).contains(&pct), "{} got {}", name, pct);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_providers_three_valid() {
        let providers = vec![
            MockProvider::new("A", 10, Ok("Paris is the capital.")),
            MockProvider::new("B", 20, Err(ProviderError::Network("connection reset".into()))),
            MockProvider::new("C", 30, Ok("The capital of France is Paris.")),
            MockProvider::new("D", 40, Err(ProviderError::MissingCredential("D_KEY".into()))),
            MockProvider::new("E", 50, Ok("Paris, I think.")),
        ];
        // E has no vector: it is valid but unscored
        let use_case = use_case(&providers, Some(paris_embedder()), ManualClock::new());

        let result = answered(use_case.execute(AskInput::new("s1", "Capital of France?")).await.unwrap());

        assert_eq!(result.raw_responses.len(), 5);
        assert!(result.contributions.len() <= 3);
        assert!(result.contributions.get("B").is_none());
        assert!(result.contributions.get("D").is_none());
        assert!(providers.iter().all(|p| p.calls() == 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_embedder_means_no_contributions() {
        let providers = vec![
            MockProvider::new("A", 10, Ok("Paris is the capital.")),
            MockProvider::new("B", 20, Ok("The capital of France is Paris.")),
        ];
        let use_case = use_case(&providers, None, ManualClock::new());

        let result = answered(use_case.execute(AskInput::new("s1", "Capital of France?")).await.unwrap());

        assert_eq!(result.final_text, "Paris is the capital.");
        assert_eq!(result.raw_responses.len(), 2);
        assert!(result.contributions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_participant_is_reported_but_never_weighted() {
        let news = MockProvider::context("News", 5, "Recent News Context:\n1. Paris is the capital.");
        let providers = vec![
            Arc::clone(&news),
            MockProvider::new("A", 10, Ok("Paris is the capital.")),
            MockProvider::new("C", 30, Ok("The capital of France is Paris.")),
        ];
        let mut embedder = paris_embedder();
        embedder
            .0
            .insert("Recent News Context:\n1. Paris is the capital.".to_string(), vec![1.0, 0.0]);
        let use_case = use_case(&providers, Some(embedder), ManualClock::new());

        let result = answered(use_case.execute(AskInput::new("s1", "Capital of France?")).await.unwrap());

        // News arrived first but is not the reference
        assert_eq!(result.reference, Some(ProviderName::new("A")));
        assert_eq!(result.final_text, "Paris is the capital.");
        assert!(result.raw_responses[&ProviderName::new("News")].starts_with("Recent News Context:"));
        assert_eq!(result.contributions.get("News"), None);
        assert_eq!(result.contributions.len(), 2);
        assert_eq!(news.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_alone_is_not_a_valid_answer() {
        let providers = vec![
            MockProvider::context("News", 5, "Recent News Context:"),
            MockProvider::new("A", 10, Err(ProviderError::Empty)),
        ];
        let use_case = use_case(&providers, None, ManualClock::new());

        let result = answered(use_case.execute(AskInput::new("s1", "q")).await.unwrap());

        assert_eq!(result.final_text, Language::English.no_valid_responses());
        let key = chorus_domain::SessionKey::new("s1").unwrap();
        assert!(use_case.store().history(&key).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_request_dispatches_nothing() {
        let provider = MockProvider::new("A", 1, Ok("answer"));
        let use_case = use_case(&[Arc::clone(&provider)], None, ManualClock::new());

        for _ in 0..15 {
            answered(use_case.execute(AskInput::new("s1", "q")).await.unwrap());
        }
        assert_eq!(provider.calls(), 15);

        let first = use_case.execute(AskInput::new("s1", "anything")).await.unwrap();
        let second = use_case
            .execute(AskInput::new("s1", "something else entirely"))
            .await
            .unwrap();

        assert_eq!(first, AskOutcome::Rejected(
            "You have reached the hourly limit of 15 requests. Please try again later.".into()
        ));
        assert_eq!(first, second);
        assert_eq!(provider.calls(), 15);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_returns_after_one_hour() {
        let provider = MockProvider::new("A", 1, Ok("answer"));
        let clock = ManualClock::new();
        let use_case = use_case(&[Arc::clone(&provider)], None, Arc::clone(&clock));

        for _ in 0..16 {
            use_case.execute(AskInput::new("s1", "q")).await.unwrap();
        }
        clock.advance(ChronoDuration::hours(1));

        let outcome = use_case.execute(AskInput::new("s1", "q")).await.unwrap();
        assert!(matches!(outcome, AskOutcome::Answered(_)));
        assert_eq!(provider.calls(), 16);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_failed_returns_localized_message() {
        let providers = vec![
            MockProvider::new("A", 10, Err(ProviderError::Empty)),
            MockProvider::new("B", 20, Err(ProviderError::Status { status: 500, body: "oops".into() })),
        ];
        let use_case = use_case(&providers, Some(paris_embedder()), ManualClock::new());

        let result = answered(
            use_case
                .execute(AskInput::new("s1", "Wie spät ist es?").with_language(Language::German))
                .await
                .unwrap(),
        );

        assert_eq!(result.final_text, Language::German.no_valid_responses());
        assert!(result.contributions.is_empty());
        assert_eq!(result.raw_responses.len(), 2);

        let key = chorus_domain::SessionKey::new("s1").unwrap();
        assert!(use_case.store().history(&key).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_is_sent_on_next_request() {
        let provider = MockProvider::new("A", 1, Ok("Paris is the capital."));
        let use_case = use_case(&[Arc::clone(&provider)], None, ManualClock::new());

        use_case.execute(AskInput::new("s1", "Capital of France?")).await.unwrap();
        assert_eq!(provider.last_history_len.load(Ordering::SeqCst), 0);

        use_case.execute(AskInput::new("s1", "And of Italy?")).await.unwrap();
        assert_eq!(provider.last_history_len.load(Ordering::SeqCst), 2);

        // Another session starts fresh
        use_case.execute(AskInput::new("s2", "Hello")).await.unwrap();
        assert_eq!(provider.last_history_len.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_input_errors() {
        let provider = MockProvider::new("A", 0, Ok("x"));
        let use_case = use_case(&[Arc::clone(&provider)], None, ManualClock::new());

        assert_eq!(
            use_case.execute(AskInput::new("", "q")).await.unwrap_err(),
            AskError::Domain(DomainError::EmptySessionKey)
        );
        assert!(matches!(
            use_case.execute(AskInput::new("s1", "   ")).await.unwrap_err(),
            AskError::Domain(DomainError::InvalidQuestion(_))
        ));
        assert_eq!(provider.calls(), 0);

        let empty = use_case_without_providers();
        assert_eq!(
            empty.execute(AskInput::new("s1", "q")).await.unwrap_err(),
            AskError::NoProviders
        );
    }

    fn use_case_without_providers() -> AskUseCase {
        use_case(&[], None, ManualClock::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_conversation_events() {
        let logger = Arc::new(RecordingLogger::default());
        let use_case = use_case(
            &[MockProvider::new("A", 1, Ok("x")), MockProvider::new("B", 2, Err(ProviderError::Empty))],
            None,
            ManualClock::new(),
        )
        .with_conversation_logger(logger.clone());

        use_case.execute(AskInput::new("s1", "q")).await.unwrap();

        let events = logger.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["provider_response", "provider_response", "aggregation_result"]
        );
    }
}
