//! Mailer trait and SMTP implementation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::request::{Credentials, MailRequest};
use crate::config::{SmtpConfig, TlsMode};
use crate::MailError;

/// Everything the transmission step needs, detached from callbacks and UI
/// text.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub credentials: Credentials,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub content_type: String,
    /// Non-empty attachment paths, in the order they were configured.
    pub attachments: Vec<PathBuf>,
}

impl Envelope {
    pub(crate) fn from_request(request: &MailRequest) -> Self {
        Self {
            credentials: request.credentials.clone(),
            from: request.credentials.username.clone(),
            to: request.to.clone(),
            subject: request.subject.clone(),
            body: request.body.clone(),
            content_type: request.content_type.clone(),
            attachments: request
                .attachments
                .iter()
                .filter(|path| !path.is_empty())
                .map(PathBuf::from)
                .collect(),
        }
    }
}

/// Async email transmission.
///
/// Implement this trait to provide alternative backends, or a stub in tests.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Build and transmit the message described by `envelope`.
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError>;
}

/// SMTP mailer using lettre. A fresh transport is opened per envelope with
/// that envelope's credentials.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Mailer for `smtp.gmail.com` over implicit TLS.
    pub fn gmail() -> Self {
        Self::from_config(SmtpConfig::default())
    }

    pub fn from_config(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Create a mailer from `SMTP_*` environment variables.
    pub fn from_env() -> Result<Self, MailError> {
        let config = SmtpConfig::from_env().map_err(|e| MailError::MissingConfig(e.to_string()))?;
        Ok(Self::from_config(config))
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn transport(
        &self,
        credentials: &Credentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let host = self.config.host.as_str();
        let builder = match self.config.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            TlsMode::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        Ok(builder
            .port(self.config.port)
            .timeout(Some(Duration::from_secs(self.config.timeout)))
            .credentials(SmtpCredentials::new(
                credentials.username.clone(),
                credentials.password.clone(),
            ))
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError> {
        let message = build_message(envelope).await?;
        let transport = self.transport(&envelope.credentials)?;

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}

/// Build a lettre [`Message`] from an envelope, reading attachments from
/// disk.
pub async fn build_message(envelope: &Envelope) -> Result<Message, MailError> {
    let from: Mailbox = envelope
        .from
        .parse()
        .map_err(|_| MailError::InvalidAddress(envelope.from.clone()))?;
    let to: Mailbox = envelope
        .to
        .parse()
        .map_err(|_| MailError::InvalidAddress(envelope.to.clone()))?;
    let content_type = ContentType::parse(&envelope.content_type)
        .map_err(|_| MailError::InvalidContentType(envelope.content_type.clone()))?;

    let builder = Message::builder()
        .from(from)
        .to(to)
        .subject(&envelope.subject);

    let body = SinglePart::builder()
        .header(content_type)
        .body(envelope.body.clone());

    let message = if envelope.attachments.is_empty() {
        builder.singlepart(body)
    } else {
        let mut parts = MultiPart::mixed().singlepart(body);
        for path in &envelope.attachments {
            parts = parts.singlepart(attachment_part(path).await?);
        }
        builder.multipart(parts)
    };

    message.map_err(|e| MailError::Build(e.to_string()))
}

async fn attachment_part(path: &Path) -> Result<SinglePart, MailError> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|source| MailError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let content_type = ContentType::parse(mime.essence_str())
        .map_err(|_| MailError::InvalidContentType(mime.to_string()))?;

    Ok(Attachment::new(filename).body(contents, content_type))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn envelope() -> Envelope {
        Envelope::from_request(
            &MailRequest::builder()
                .username("sender@gmail.com")
                .password("secret")
                .to("user@example.com")
                .subject("Report")
                .body("See attached.")
                .build(),
        )
    }

    #[test]
    fn envelope_skips_empty_attachments() {
        let request = MailRequest::builder()
            .username("sender@gmail.com")
            .attachments(["", "a.txt", "", "b.pdf"])
            .build();

        let envelope = Envelope::from_request(&request);

        assert_eq!(envelope.from, "sender@gmail.com");
        assert_eq!(
            envelope.attachments,
            vec![PathBuf::from("a.txt"), PathBuf::from("b.pdf")]
        );
    }

    #[tokio::test]
    async fn builds_single_part_message() {
        let message = build_message(&envelope()).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: sender@gmail.com"));
        assert!(raw.contains("To: user@example.com"));
        assert!(raw.contains("Subject: Report"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(!raw.contains("multipart/mixed"));
    }

    #[tokio::test]
    async fn builds_multipart_message_with_attachment() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "attached contents").unwrap();

        let mut envelope = envelope();
        envelope.attachments = vec![file.path().to_path_buf()];

        let message = build_message(&envelope).await.unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        let filename = file.path().file_name().unwrap().to_string_lossy();

        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains(filename.as_ref()));
    }

    #[tokio::test]
    async fn missing_attachment_is_an_error() {
        let mut envelope = envelope();
        envelope.attachments = vec![PathBuf::from("/nonexistent/report.pdf")];

        let result = build_message(&envelope).await;

        let err = result.err().unwrap();
        assert!(matches!(err, MailError::Attachment { .. }));
        assert!(!err.is_config());
    }

    #[tokio::test]
    async fn rejects_bad_addresses_and_content_type() {
        let mut bad_to = envelope();
        bad_to.to = "not an address".into();
        assert!(matches!(
            build_message(&bad_to).await,
            Err(MailError::InvalidAddress(_))
        ));

        let mut bad_type = envelope();
        bad_type.content_type = "not a mime type".into();
        assert!(matches!(
            build_message(&bad_type).await,
            Err(MailError::InvalidContentType(_))
        ));
    }

    #[test]
    fn gmail_mailer_uses_default_config() {
        let mailer = SmtpMailer::gmail();

        assert_eq!(mailer.config().host, "smtp.gmail.com");
        assert_eq!(mailer.config().tls, TlsMode::Tls);
    }
}
