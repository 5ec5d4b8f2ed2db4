//! Rate gate: admits or rejects a request before any provider is contacted.

use crate::ports::clock::Clock;
use crate::session::store::SessionStore;
use chorus_domain::{Admission, DEFAULT_HOURLY_LIMIT, DomainError, SessionKey};
use std::sync::Arc;

pub struct RateGate {
    store: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    hourly_limit: u32,
}

impl RateGate {
    pub fn new(store: Arc<SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            hourly_limit: DEFAULT_HOURLY_LIMIT,
        }
    }

    pub fn with_hourly_limit(mut self, limit: u32) -> Self {
        self.hourly_limit = limit;
        self
    }

    pub fn hourly_limit(&self) -> u32 {
        self.hourly_limit
    }

    /// Admit one request for `session`.
    ///
    /// Blank keys are an error and leave the store untouched; running out
    /// of budget is an ordinary [`Admission::Rejected`].
    pub fn admit(&self, session: &str) -> Result<(SessionKey, Admission), DomainError> {
        let key = SessionKey::new(session)?;
        let admission = self
            .store
            .admit(&key, self.clock.now(), self.hourly_limit);
        Ok((key, admission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn gate() -> (RateGate, Arc<ManualClock>, Arc<SessionStore>) {
        let store = Arc::new(SessionStore::new());
        let clock = Arc::new(ManualClock::new());
        let gate = RateGate::new(Arc::clone(&store), clock.clone());
        (gate, clock, store)
    }

    #[test]
    fn test_blank_session_is_an_error() {
        let (gate, _, _) = gate();
        assert_eq!(gate.admit("").unwrap_err(), DomainError::EmptySessionKey);
    }

    #[test]
    fn test_sixteenth_request_is_rejected() {
        let (gate, _, _) = gate();
        for _ in 0..15 {
            assert!(gate.admit("s1").unwrap().1.is_allowed());
        }
        let (_, admission) = gate.admit("s1").unwrap();
        assert_eq!(admission, Admission::limit_reached(15));

        // Other sessions have their own budget
        assert!(gate.admit("s2").unwrap().1.is_allowed());
    }

    #[test]
    fn test_window_resets_after_exactly_one_hour() {
        let (gate, clock, store) = gate();
        for _ in 0..16 {
            gate.admit("s1").unwrap();
        }

        clock.advance(Duration::hours(1));
        let (key, admission) = gate.admit("s1").unwrap();
        assert!(admission.is_allowed());

        // Count restarts at 1: 14 more requests fit in the new window
        for _ in 0..14 {
            assert!(gate.admit("s1").unwrap().1.is_allowed());
        }
        assert!(!gate.admit("s1").unwrap().1.is_allowed());
        assert!(store.history(&key).is_empty());
    }

    #[test]
    fn test_configured_limit() {
        let (gate, _, _) = gate();
        let gate = gate.with_hourly_limit(2);
        assert!(gate.admit("s").unwrap().1.is_allowed());
        assert!(gate.admit("s").unwrap().1.is_allowed());
        assert!(!gate.admit("s").unwrap().1.is_allowed());
    }
}
