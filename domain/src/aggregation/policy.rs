//! Selection policy for turning many answers into one.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How the final answer is produced
///
/// - `Reference`: pick the answer that agrees most with the earliest valid one (default)
/// - `Resynthesis`: ask a designated provider to merge all valid answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    #[default]
    Reference,
    Resynthesis,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Reference => "reference",
            SelectionPolicy::Resynthesis => "resynthesis",
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectionPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reference" | "reference-similarity" | "select" => Ok(SelectionPolicy::Reference),
            "resynthesis" | "synthesis" | "synthesize" => Ok(SelectionPolicy::Resynthesis),
            other => Err(DomainError::UnknownPolicy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_policy() {
        assert_eq!("reference".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Reference);
        assert_eq!("Synthesis".parse::<SelectionPolicy>().unwrap(), SelectionPolicy::Resynthesis);
        assert!("best-pair".parse::<SelectionPolicy>().is_err());
    }

    #[test]
    fn test_default_is_reference() {
        assert_eq!(SelectionPolicy::default(), SelectionPolicy::Reference);
        assert_eq!(SelectionPolicy::default().to_string(), "reference");
    }
}
