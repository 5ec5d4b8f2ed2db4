//! Shared conversation snapshot, retrievable by id after a chat request.

use crate::scoring::Contributions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved answer that can be fetched later through its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConversation {
    pub id: String,
    pub response: String,
    pub contributions: Contributions,
    pub created_at: DateTime<Utc>,
}

impl SharedConversation {
    pub fn new(
        id: impl Into<String>,
        response: impl Into<String>,
        contributions: Contributions,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            response: response.into(),
            contributions,
            created_at,
        }
    }
}
