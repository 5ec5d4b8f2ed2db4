//! In-memory session store.
//!
//! Owns every piece of per-session state (conversation history, rate
//! trackers, premium identities) plus the shared conversation snapshots,
//! all behind one lock. Callers only see atomic operations; the maps
//! themselves never leave this module.

use chorus_domain::{Admission, Conversation, RateTracker, SessionKey, SharedConversation};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct SessionState {
    conversations: HashMap<SessionKey, Conversation>,
    trackers: HashMap<SessionKey, RateTracker>,
    premium: HashSet<SessionKey>,
    shared: HashMap<String, SharedConversation>,
}

/// Process-lifetime store for all sessions
///
/// Critical sections are short and synchronous; no lock is held across an
/// `.await`.
#[derive(Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose listed sessions are never rate limited
    pub fn with_premium<I>(premium: I) -> Self
    where
        I: IntoIterator<Item = SessionKey>,
    {
        let state = SessionState {
            premium: premium.into_iter().collect(),
            ..SessionState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panic while holding the lock leaves the maps consistent: every
        // mutation below is a single insert/update.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up or create the session's tracker and register one request.
    pub fn admit(&self, key: &SessionKey, now: DateTime<Utc>, hourly_limit: u32) -> Admission {
        let mut state = self.lock();
        let premium = state.premium.contains(key);
        let tracker = state
            .trackers
            .entry(key.clone())
            .or_insert_with(|| RateTracker::new(now, premium));
        let admission = tracker.register(now, hourly_limit);
        debug!(
            session = %key,
            count = tracker.count(),
            allowed = admission.is_allowed(),
            "Rate gate"
        );
        admission
    }

    /// Snapshot of the session's history (empty for unknown sessions).
    pub fn history(&self, key: &SessionKey) -> Conversation {
        self.lock()
            .conversations
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a completed question/answer pair to the session's history.
    pub fn record_exchange(&self, key: &SessionKey, question: &str, answer: &str) {
        self.lock()
            .conversations
            .entry(key.clone())
            .or_default()
            .record_exchange(question, answer);
    }

    /// Drop the session's history. The rate budget is left untouched.
    pub fn clear(&self, key: &SessionKey) {
        if let Some(conversation) = self.lock().conversations.get_mut(key) {
            conversation.clear();
        }
    }

    pub fn save_shared(&self, conversation: SharedConversation) {
        self.lock()
            .shared
            .insert(conversation.id.clone(), conversation);
    }

    pub fn shared(&self, id: &str) -> Option<SharedConversation> {
        self.lock().shared.get(id).cloned()
    }
}
