use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring or transmitting a mail.
///
/// Only [`MailError::MissingField`] ever reaches the caller of
/// [`Dispatcher::dispatch`](crate::Dispatcher::dispatch). Everything else is
/// raised inside the background task and reported as
/// [`Outcome::Failed`](crate::Outcome::Failed).
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    #[error("failed to read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

impl MailError {
    /// True for errors caused by an incomplete request rather than by the
    /// transmission attempt.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::MissingConfig(_))
    }
}
