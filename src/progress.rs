//! Spinner shown while registry manifests resolve

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::error::Result;
use crate::registry::ResolvedRegistryItem;
use crate::registry::source::ManifestSource;

/// Spinner on stderr naming the spec being fetched
///
/// indicatif hides it when stderr is not a terminal.
pub struct ResolveProgress {
    spinner: ProgressBar,
}

impl ResolveProgress {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner} Resolving {msg}...")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    pub fn fetching(&self, spec: &str) {
        self.spinner.set_message(spec.trim().to_string());
    }

    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn abandon(&self) {
        self.spinner.abandon();
    }
}

impl Default for ResolveProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Reports every fetch of `inner` on a [`ResolveProgress`]
pub struct TrackedSource<'a> {
    inner: &'a dyn ManifestSource,
    progress: &'a ResolveProgress,
}

impl<'a> TrackedSource<'a> {
    pub fn new(inner: &'a dyn ManifestSource, progress: &'a ResolveProgress) -> Self {
        Self { inner, progress }
    }
}

impl ManifestSource for TrackedSource<'_> {
    fn fetch(&self, spec: &str) -> Result<ResolvedRegistryItem> {
        self.progress.fetching(spec);
        self.inner.fetch(spec)
    }
}
