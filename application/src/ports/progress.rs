//! Progress notification port
//!
//! Defines the interface for reporting progress while a question is fanned out.

use chorus_domain::{ProviderName, SelectionPolicy};

/// Callback for progress updates during one aggregation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, logs, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once the question has been dispatched to every provider
    fn on_fanout_start(&self, providers: &[ProviderName]);

    /// Called when a provider reports, in arrival order
    fn on_provider_complete(&self, provider: &ProviderName, success: bool);

    /// Called when every dispatched provider has reported
    fn on_fanout_complete(&self);

    /// Called before embedding and selection start.
    fn on_selection_start(&self, _policy: SelectionPolicy) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_fanout_start(&self, _providers: &[ProviderName]) {}
    fn on_provider_complete(&self, _provider: &ProviderName, _success: bool) {}
    fn on_fanout_complete(&self) {}
}
