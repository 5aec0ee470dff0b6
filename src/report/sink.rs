//! Load-failure reporting

use std::path::Path;

use crate::error::LoadError;

/// Receives one record per report file that could not be loaded
///
/// Injected into `ReportDoc` at construction so callers choose where load
/// failures go.
pub trait FailureSink {
    fn record_failure(&self, path: &Path, error: &LoadError);
}

/// Default sink: one `tracing` event at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn record_failure(&self, path: &Path, error: &LoadError) {
        tracing::error!(path = %path.display(), error = %error, "Failed to load report document");
    }
}

impl<S: FailureSink + ?Sized> FailureSink for &S {
    fn record_failure(&self, path: &Path, error: &LoadError) {
        (**self).record_failure(path, error);
    }
}
