//! Response collector
//!
//! Barrier over a [`Dispatch`]: waits until every dispatched provider has
//! reported once and numbers the reports in arrival order.

use crate::ports::progress::ProgressNotifier;
use crate::use_cases::fanout::Dispatch;
use chorus_domain::{ProviderName, ProviderOutcome, ProviderResponse};
use tracing::warn;

/// Reason recorded for a provider task that ended without reporting
pub const TASK_ABORTED: &str = "task aborted";

/// Drain `dispatch` until every provider task has finished.
///
/// The result has exactly one entry per dispatched provider. Providers
/// that never reported are appended last as failures.
pub async fn collect(mut dispatch: Dispatch, progress: &dyn ProgressNotifier) -> Vec<ProviderResponse> {
    let mut pending: Vec<ProviderName> = dispatch.dispatched.clone();
    let mut responses = Vec::with_capacity(pending.len());

    // Every task holds a sender; the channel closes once all of them ended.
    while let Some((provider, outcome)) = dispatch.completions.recv().await {
        let Some(index) = pending.iter().position(|name| *name == provider) else {
            warn!(provider = %provider, "Ignoring duplicate report");
            continue;
        };
        pending.remove(index);

        let success = matches!(outcome, ProviderOutcome::Answer(_));
        progress.on_provider_complete(&provider, success);

        let arrival = responses.len();
        let response = match outcome {
            ProviderOutcome::Answer(text) => ProviderResponse::answer(provider, text, arrival),
            ProviderOutcome::Failed(reason) => ProviderResponse::failure(provider, reason, arrival),
        };
        if dispatch.is_context_only(&response.provider) {
            responses.push(response.context_only());
        } else {
            responses.push(response);
        }
    }

    while let Some(joined) = dispatch.tasks.join_next().await {
        if let Err(e) = joined {
            warn!("Provider task join error: {}", e);
        }
    }

    for provider in pending {
        warn!(provider = %provider, "Provider task ended without reporting");
        progress.on_provider_complete(&provider, false);
        let arrival = responses.len();
        responses.push(ProviderResponse::failure(provider, TASK_ABORTED, arrival));
    }

    progress.on_fanout_complete();
    responses
}
