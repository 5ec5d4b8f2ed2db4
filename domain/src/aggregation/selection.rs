//! Reference-similarity selection.
//!
//! The earliest valid answer is the reference. Every valid answer with an
//! embedding is scored by cosine similarity to the reference vector and the
//! best-scoring answer wins, ties going to the earlier arrival.

use crate::aggregation::value_objects::ProviderResponse;
use crate::core::provider::ProviderName;
use crate::scoring::{Contributions, EmbeddingVector};

/// Outcome of [`select_by_reference`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSelection {
    pub reference: ProviderName,
    pub chosen: ProviderName,
    pub final_text: String,
    pub contributions: Contributions,
}

/// Valid responses sorted by arrival order.
///
/// Context-only responses never count as valid answers.
pub fn valid_by_arrival(responses: &[ProviderResponse]) -> Vec<&ProviderResponse> {
    let mut valid: Vec<&ProviderResponse> = responses
        .iter()
        .filter(|r| r.is_success() && r.scored)
        .collect();
    valid.sort_by_key(|r| r.arrival);
    valid
}

/// Pick the answer that agrees most with the earliest valid one.
///
/// Returns `None` when no response is valid. If the reference has no
/// embedding its text is used verbatim and the providers that do have a
/// vector split the contributions equally.
pub fn select_by_reference(responses: &[ProviderResponse]) -> Option<ReferenceSelection> {
    let valid = valid_by_arrival(responses);
    let reference = *valid.first()?;
    let reference_text = reference.answer_text()?.to_string();

    let Some(reference_vec) = reference.embedding.as_ref() else {
        return Some(ReferenceSelection {
            reference: reference.provider.clone(),
            chosen: reference.provider.clone(),
            final_text: reference_text,
            contributions: embedded_equal_split(&valid),
        });
    };

    let scores = score_against(reference_vec, &valid);

    let mut best: Option<(&ProviderResponse, f64)> = None;
    for response in &valid {
        let Some(embedding) = response.embedding.as_ref() else {
            continue;
        };
        let score = reference_vec.similarity(embedding);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((response, score)),
        }
    }

    let (chosen, final_text) = match best {
        Some((winner, _)) => (
            winner.provider.clone(),
            winner.answer_text().unwrap_or(&reference_text).to_string(),
        ),
        None => (reference.provider.clone(), reference_text),
    };

    Some(ReferenceSelection {
        reference: reference.provider.clone(),
        chosen,
        final_text,
        contributions: Contributions::from_similarities(scores),
    })
}

/// Contributions of each valid answer measured against `target`.
///
/// Answers without an embedding are left out. With no target the answers
/// that have one split the contributions equally; empty if none do.
pub fn contributions_against(
    target: Option<&EmbeddingVector>,
    responses: &[ProviderResponse],
) -> Contributions {
    let valid = valid_by_arrival(responses);
    match target {
        Some(target) => Contributions::from_similarities(score_against(target, &valid)),
        None => embedded_equal_split(&valid),
    }
}

fn embedded_equal_split(valid: &[&ProviderResponse]) -> Contributions {
    Contributions::equal_split(
        valid
            .iter()
            .filter(|r| r.embedding.is_some())
            .map(|r| r.provider.clone()),
    )
}

fn score_against(target: &EmbeddingVector, valid: &[&ProviderResponse]) -> Vec<(ProviderName, f64)> {
    valid
        .iter()
        .filter_map(|r| {
            r.embedding
                .as_ref()
                .map(|e| (r.provider.clone(), target.similarity(e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(name: &str, text: &str, arrival: usize, vec: Option<Vec<f64>>) -> ProviderResponse {
        let response = ProviderResponse::answer(name, text, arrival);
        match vec {
            Some(v) => response.with_embedding(EmbeddingVector::new(v)),
            None => response,
        }
    }

    #[test]
    fn test_no_valid_responses() {
        let responses = vec![ProviderResponse::failure("A", "down", 0)];
        assert!(select_by_reference(&responses).is_none());
    }

    #[test]
    fn test_reference_is_earliest_valid_arrival() {
        let responses = vec![
            answer("Late", "Paris is the capital.", 2, Some(vec![1.0, 0.0])),
            ProviderResponse::failure("Broken", "timeout", 0),
            answer("Early", "Paris.", 1, Some(vec![1.0, 0.0])),
        ];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.reference.as_str(), "Early");
        // Equal similarity: the earlier arrival wins.
        assert_eq!(selection.chosen.as_str(), "Early");
        assert_eq!(selection.final_text, "Paris.");
    }

    #[test]
    fn test_highest_similarity_wins() {
        let responses = vec![
            answer("A", "Paris.", 0, Some(vec![1.0, 0.2])),
            answer("B", "The capital of France is Paris.", 1, Some(vec![1.0, 0.3])),
            answer("C", "Lyon.", 2, Some(vec![0.0, 1.0])),
        ];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.reference.as_str(), "A");
        // A scores exactly 1.0 against itself.
        assert_eq!(selection.chosen.as_str(), "A");
        assert_eq!(selection.contributions.len(), 3);
        assert!((selection.contributions.total() - 100.0).abs() < 1e-9);
        assert!(selection.contributions.get("C").unwrap() < selection.contributions.get("B").unwrap());
    }

    #[test]
    fn test_missing_reference_embedding_falls_back_to_reference_text() {
        let responses = vec![
            answer("A", "first", 0, None),
            answer("B", "second", 1, Some(vec![1.0])),
        ];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.final_text, "first");
        assert_eq!(selection.contributions.get("A"), None);
        assert_eq!(selection.contributions.get("B"), Some(100.0));
    }

    #[test]
    fn test_no_vectors_at_all_gives_empty_contributions() {
        let responses = vec![answer("A", "first", 0, None), answer("B", "second", 1, None)];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.chosen.as_str(), "A");
        assert!(selection.contributions.is_empty());
    }

    #[test]
    fn test_context_only_response_is_never_selected() {
        let responses = vec![
            answer("News", "Recent News Context:", 0, Some(vec![1.0, 0.0])).context_only(),
            answer("A", "Paris.", 1, Some(vec![1.0, 0.0])),
        ];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.reference.as_str(), "A");
        assert_eq!(selection.contributions.get("News"), None);
        assert_eq!(selection.contributions.get("A"), Some(100.0));
    }

    #[test]
    fn test_answers_without_embedding_are_not_scored() {
        let responses = vec![
            answer("A", "first", 0, Some(vec![1.0, 0.0])),
            answer("B", "second", 1, None),
        ];
        let selection = select_by_reference(&responses).unwrap();
        assert_eq!(selection.contributions.get("B"), None);
        assert_eq!(selection.contributions.get("A"), Some(100.0));
    }

    #[test]
    fn test_contributions_against_target() {
        let responses = vec![
            answer("A", "x", 0, Some(vec![1.0, 0.0])),
            answer("B", "y", 1, Some(vec![0.0, 1.0])),
        ];
        let target = EmbeddingVector::new(vec![1.0, 0.0]);
        let contributions = contributions_against(Some(&target), &responses);
        assert_eq!(contributions.get("A"), Some(100.0));
        assert_eq!(contributions.get("B"), Some(0.0));

        let equal = contributions_against(None, &responses);
        assert_eq!(equal.get("A"), Some(50.0));

        let bare = vec![answer("A", "x", 0, None), answer("B", "y", 1, None)];
        assert!(contributions_against(None, &bare).is_empty());
    }
}
