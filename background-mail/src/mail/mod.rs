//! Mail requests and their transmission.
//!
//! This module provides a thin abstraction over [lettre](https://lettre.rs):
//! a [`MailRequest`] describes one message and its callbacks, and a
//! [`Mailer`] delivers the [`Envelope`] extracted from it.
//!
//! # Quick Start
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(SmtpMailer::gmail());
//!
//! let handle = MailRequest::builder()
//!     .username("me@gmail.com")
//!     .password("app-password")
//!     .to("user@example.com")
//!     .subject("Welcome!")
//!     .body("Thanks for signing up.")
//!     .on_success(|| println!("sent"))
//!     .on_failure(|| println!("failed"))
//!     .send(&dispatcher)?;
//!
//! let outcome = handle.outcome().await;
//! ```
//!
//! # Environment Variables
//!
//! [`SmtpMailer::from_env`] reads:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | No | SMTP server hostname (default: `smtp.gmail.com`) |
//! | `SMTP_PORT` | No | Port (default: 465) |
//! | `SMTP_TLS` | No | `tls` (default), `starttls`, or `none` |
//! | `SMTP_TIMEOUT` | No | Connection timeout in seconds (default: 10) |

mod mailer;
mod request;

pub use mailer::{build_message, Envelope, Mailer, SmtpMailer};
pub use request::{
    Callback, Credentials, MailRequest, MailRequestBuilder, UiText, DEFAULT_BUSY_MESSAGE,
    DEFAULT_ERROR_MESSAGE, DEFAULT_SUCCESS_MESSAGE, TYPE_PLAIN,
};
