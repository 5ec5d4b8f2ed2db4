//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::ProviderName`] - identity of a generation provider within a fanout
//! - [`question::Question`] - a validated question to pose to every provider
//! - [`language::Language`] - target response language and localized messages
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod language;
pub mod provider;
pub mod question;
pub mod string;
