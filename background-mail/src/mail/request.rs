//! Mail request type and builder.

use std::fmt;

use crate::dispatch::{DispatchHandle, Dispatcher};
use crate::MailError;

/// MIME type used for the body when none is set.
pub const TYPE_PLAIN: &str = "text/plain";

pub const DEFAULT_BUSY_MESSAGE: &str = "Sending email...";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Email sent successfully";
pub const DEFAULT_ERROR_MESSAGE: &str = "Error sending email";

/// One-shot callback fired when a dispatch reaches its terminal state.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Account used to authenticate against the SMTP server. The username is
/// also the sender address.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Text shown through the progress sink around a dispatch. An empty success
/// or error message suppresses that notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiText {
    pub busy: String,
    pub success: String,
    pub error: String,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            busy: DEFAULT_BUSY_MESSAGE.to_string(),
            success: DEFAULT_SUCCESS_MESSAGE.to_string(),
            error: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) on_success: Option<Callback>,
    pub(crate) on_failure: Option<Callback>,
}

/// A fully configured, immutable mail send attempt.
///
/// Built with [`MailRequest::builder`] and consumed by
/// [`Dispatcher::dispatch`], so each request is sent at most once.
pub struct MailRequest {
    pub(crate) credentials: Credentials,
    pub(crate) to: String,
    pub(crate) subject: String,
    pub(crate) body: String,
    pub(crate) content_type: String,
    pub(crate) attachments: Vec<String>,
    pub(crate) ui: UiText,
    pub(crate) callbacks: Callbacks,
}

impl MailRequest {
    /// Create a new request builder.
    pub fn builder() -> MailRequestBuilder {
        MailRequestBuilder::default()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Attachment paths as configured, including empty entries.
    pub fn attachments(&self) -> &[String] {
        &self.attachments
    }

    pub fn ui_text(&self) -> &UiText {
        &self.ui
    }

    /// Check that every field required for sending is non-empty.
    ///
    /// Fields are checked in a fixed order and the first missing one is
    /// reported.
    pub fn validate(&self) -> Result<(), MailError> {
        let required = [
            ("username", &self.credentials.username),
            ("password", &self.credentials.password),
            ("recipient", &self.to),
            ("body", &self.body),
            ("subject", &self.subject),
        ];

        for (name, value) in required {
            if value.is_empty() {
                return Err(MailError::MissingField(name));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for MailRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailRequest")
            .field("credentials", &self.credentials)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("content_type", &self.content_type)
            .field("attachments", &self.attachments)
            .field("ui", &self.ui)
            .field("on_success", &self.callbacks.on_success.is_some())
            .field("on_failure", &self.callbacks.on_failure.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`MailRequest`]. Each setter overwrites the previous value.
pub struct MailRequestBuilder {
    credentials: Credentials,
    to: String,
    subject: String,
    body: String,
    content_type: String,
    attachments: Vec<String>,
    ui: UiText,
    callbacks: Callbacks,
}

impl Default for MailRequestBuilder {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            to: String::new(),
            subject: String::new(),
            body: String::new(),
            content_type: TYPE_PLAIN.to_string(),
            attachments: Vec::new(),
            ui: UiText::default(),
            callbacks: Callbacks::default(),
        }
    }
}

impl MailRequestBuilder {
    /// Set the account username. It is also used as the sender address.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.credentials.username = username.into();
        self
    }

    /// Set the account password (for Gmail, an app password).
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.credentials.password = password.into();
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the recipient address.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = address.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the MIME type of the body (default: `text/plain`).
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Append one attachment path.
    pub fn attachment(mut self, path: impl Into<String>) -> Self {
        self.attachments.push(path.into());
        self
    }

    /// Replace the attachment list. Empty paths are kept here and skipped at
    /// send time.
    pub fn attachments(mut self, paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attachments = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn busy_message(mut self, message: impl Into<String>) -> Self {
        self.ui.busy = message.into();
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.ui.success = message.into();
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.ui.error = message.into();
        self
    }

    /// Register the callback fired once the mail has been sent.
    pub fn on_success(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_success = Some(Box::new(callback));
        self
    }

    /// Register the callback fired once sending has failed.
    pub fn on_failure(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_failure = Some(Box::new(callback));
        self
    }

    /// Freeze the configuration. No validation happens here.
    pub fn build(self) -> MailRequest {
        MailRequest {
            credentials: self.credentials,
            to: self.to,
            subject: self.subject,
            body: self.body,
            content_type: self.content_type,
            attachments: self.attachments,
            ui: self.ui,
            callbacks: self.callbacks,
        }
    }

    /// Build the request and hand it to `dispatcher` right away.
    pub fn send(self, dispatcher: &Dispatcher) -> Result<DispatchHandle, MailError> {
        dispatcher.dispatch(self.build())
    }
}
