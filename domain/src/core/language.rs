//! Response language value object and the messages localized per language.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Target language for provider answers (Value Object)
///
/// The display name is what gets injected into prompts
/// (`Respond in Italiano: ...`), so it stays the native spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Italian,
    English,
    German,
    Other(String),
}

impl Language {
    /// Native display name, as shown in the language picker
    pub fn as_str(&self) -> &str {
        match self {
            Language::Italian => "Italiano",
            Language::English => "English",
            Language::German => "Deutsch",
            Language::Other(s) => s,
        }
    }

    /// Message returned when no provider produced a usable answer.
    pub fn no_valid_responses(&self) -> String {
        match self {
            Language::Italian => {
                "Mi dispiace, non sono riuscito a ottenere risposte valide dai servizi di IA."
                    .to_string()
            }
            Language::English => {
                "I'm sorry, I couldn't get any valid responses from the AI services.".to_string()
            }
            Language::German => {
                "Es tut mir leid, ich konnte von den KI-Diensten keine gültigen Antworten erhalten."
                    .to_string()
            }
            Language::Other(name) => format!(
                "I'm sorry, I couldn't get any valid responses from the AI services. (in {})",
                name
            ),
        }
    }

    /// Label prepended to a re-synthesis answer that fell back to one provider.
    pub fn degraded_notice(&self, provider: &str) -> String {
        match self {
            Language::Italian => format!("[Risposta parziale da {}]", provider),
            Language::German => format!("[Teilantwort von {}]", provider),
            _ => format!("[Partial answer from {}]", provider),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_lowercase().as_str() {
            "" | "italiano" | "italian" | "it" => Language::Italian,
            "english" | "inglese" | "en" => Language::English,
            "deutsch" | "german" | "tedesco" | "de" => Language::German,
            _ => Language::Other(trimmed.to_string()),
        })
    }
}

impl Serialize for Language {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}
