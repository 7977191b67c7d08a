//! Background dispatch of a single [`MailRequest`].
//!
//! [`Dispatcher::dispatch`] validates the request on the caller's task, then
//! spawns one tokio task per request that transmits the mail and runs the
//! terminal path: progress notification followed by exactly one callback.
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(SmtpMailer::gmail())
//!     .with_progress(LogProgress);
//!
//! let handle = dispatcher.dispatch(request)?;
//! if handle.outcome().await.is_success() {
//!     // ...
//! }
//! ```

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::connectivity::{Connectivity, SystemConnectivity};
use crate::mail::{Envelope, MailRequest, Mailer};
use crate::progress::ProgressSink;
use crate::MailError;

/// Terminal state of a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Self::Succeeded
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Completion notification for one dispatch.
///
/// Dropping the handle does not cancel the send.
#[derive(Debug)]
pub struct DispatchHandle {
    task: JoinHandle<Outcome>,
}

impl DispatchHandle {
    /// Wait for the attempt and its callback to finish.
    pub async fn outcome(self) -> Outcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "mail dispatch task aborted");
                Outcome::Failed
            }
        }
    }
}

/// Sends [`MailRequest`]s in the background through a [`Mailer`].
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    progress: Option<Arc<dyn ProgressSink>>,
    connectivity: Arc<dyn Connectivity>,
}

impl Dispatcher {
    pub fn new(mailer: impl Mailer) -> Self {
        Self {
            mailer: Arc::new(mailer),
            progress: None,
            connectivity: Arc::new(SystemConnectivity),
        }
    }

    /// Report busy/success/error through `sink` (default: no feedback).
    pub fn with_progress(mut self, sink: impl ProgressSink) -> Self {
        self.progress = Some(Arc::new(sink));
        self
    }

    /// Replace the connectivity probe (default: [`SystemConnectivity`]).
    pub fn with_connectivity(mut self, probe: impl Connectivity) -> Self {
        self.connectivity = Arc::new(probe);
        self
    }

    /// Validate `request` and start sending it in the background.
    ///
    /// A missing required field is returned as [`MailError::MissingField`]
    /// and nothing is spawned. Every other failure happens in the background
    /// and is reported as [`Outcome::Failed`].
    pub fn dispatch(&self, request: MailRequest) -> Result<DispatchHandle, MailError> {
        request.validate()?;

        if !self.connectivity.is_network_available() {
            tracing::debug!("no network connection available, sending anyway");
        }

        if let Some(progress) = &self.progress {
            progress.started(&request.ui.busy);
        }

        let envelope = Envelope::from_request(&request);
        let MailRequest { ui, callbacks, .. } = request;
        let mailer = self.mailer.clone();
        let progress = self.progress.clone();

        let span = tracing::info_span!("send_mail", to = %envelope.to);
        let task = tokio::spawn(
            async move {
                let attempt = tokio::spawn(
                    async move { mailer.send(&envelope).await }.in_current_span(),
                );

                let outcome = match attempt.await {
                    Ok(Ok(())) => {
                        tracing::info!("mail sent");
                        Outcome::Succeeded
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(error = %e, "failed to send mail");
                        Outcome::Failed
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "mailer panicked");
                        Outcome::Failed
                    }
                };

                if let Some(progress) = progress {
                    run_guarded("progress sink", || {
                        progress.dismissed();
                        match outcome {
                            Outcome::Succeeded if !ui.success.is_empty() => {
                                progress.succeeded(&ui.success)
                            }
                            Outcome::Failed if !ui.error.is_empty() => {
                                progress.failed(&ui.error)
                            }
                            _ => {}
                        }
                    });
                }

                let callback = match outcome {
                    Outcome::Succeeded => callbacks.on_success,
                    Outcome::Failed => callbacks.on_failure,
                };
                if let Some(callback) = callback {
                    run_guarded("callback", callback);
                }

                outcome
            }
            .instrument(span),
        );

        Ok(DispatchHandle { task })
    }
}

/// Run user-supplied terminal code. A panic is logged and swallowed so the
/// outcome already reached still reaches the handle.
fn run_guarded(what: &str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::error!("{what} panicked after the send attempt");
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}
