//! Session domain: conversation history owned by one session key.

pub mod entities;

pub use entities::{Conversation, Role, SessionKey, Turn};
