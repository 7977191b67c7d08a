//! User-facing feedback around a dispatch.

/// Receives busy/success/error notifications for a dispatch.
///
/// This stands in for whatever UI the application has: a spinner and a
/// toast, a status bar, a log line. Implementations must be cheap and must
/// not block; `started` runs on the caller's task, the rest on the
/// background task.
pub trait ProgressSink: Send + Sync + 'static {
    /// The send is about to start. Show a busy indicator with `message`.
    fn started(&self, message: &str);

    /// The attempt finished. Hide the busy indicator.
    fn dismissed(&self) {}

    /// The mail was sent. Not called when the success text is empty.
    fn succeeded(&self, message: &str);

    /// Sending failed. Not called when the error text is empty.
    fn failed(&self, message: &str);
}

/// Reports progress as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn started(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn succeeded(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn failed(&self, message: &str) {
        tracing::warn!("{message}");
    }
}
