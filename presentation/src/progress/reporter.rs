//! Progress reporting while a question is fanned out

use chorus_application::ProgressNotifier;
use chorus_domain::{ProviderName, SelectionPolicy};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports fanout progress with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn fanout_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn replace(&self, next: Option<ProgressBar>) -> Option<ProgressBar> {
        match self.bar.lock() {
            Ok(mut bar) => std::mem::replace(&mut *bar, next),
            Err(_) => None,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_fanout_start(&self, providers: &[ProviderName]) {
        let pb = ProgressBar::new(providers.len() as u64);
        pb.set_style(Self::fanout_style());
        pb.set_prefix("Asking providers");
        pb.set_message("waiting...");
        self.replace(Some(pb));
    }

    fn on_provider_complete(&self, provider: &ProviderName, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), provider)
            } else {
                format!("{} {}", "x".red(), provider)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_fanout_complete(&self) {
        if let Some(pb) = self.replace(None) {
            pb.finish_with_message(format!("{}", "all providers reported".green()));
        }
    }

    fn on_selection_start(&self, policy: SelectionPolicy) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Reconciling");
        pb.set_message(format!("({})", policy));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        if let Some(previous) = self.replace(Some(pb)) {
            previous.finish_and_clear();
        }
    }
}

impl ProgressReporter {
    /// Clear the reconciliation spinner before the answer is printed.
    pub fn finish(&self) {
        if let Some(pb) = self.replace(None) {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_fanout_start(&self, providers: &[ProviderName]) {
        println!(
            "{} {} ({} providers)",
            "->".cyan(),
            "Asking providers".bold(),
            providers.len()
        );
    }

    fn on_provider_complete(&self, provider: &ProviderName, success: bool) {
        if success {
            println!("  {} {}", "v".green(), provider);
        } else {
            println!("  {} {} (failed)", "x".red(), provider);
        }
    }

    fn on_fanout_complete(&self) {
        println!();
    }
}
