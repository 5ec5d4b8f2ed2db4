//! Session state and the rate gate guarding it.

pub mod rate_gate;
pub mod store;

pub use rate_gate::RateGate;
pub use store::SessionStore;
