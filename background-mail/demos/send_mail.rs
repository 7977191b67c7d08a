//! Send one mail through Gmail (or any `SMTP_*` configured server).
//!
//! ```bash
//! MAIL_USERNAME=me@gmail.com MAIL_PASSWORD=app-password MAIL_TO=you@example.com \
//!     cargo run --example send_mail -- ./report.pdf
//! ```

use anyhow::Context as _;
use background_mail::{Dispatcher, EnvConfig, LogProgress, MailRequest, SmtpMailer};
use serde::Deserialize;

#[derive(Deserialize)]
struct Account {
    username: String,
    password: String,
    to: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mailer = SmtpMailer::from_env()?;
    let account = Account::from_env_with_prefix("MAIL").context("MAIL_* variables not set")?;

    let dispatcher = Dispatcher::new(mailer).with_progress(LogProgress);

    let handle = MailRequest::builder()
        .username(account.username)
        .password(account.password)
        .to(account.to)
        .subject("Hello from background-mail")
        .body("This message was sent from a background task.")
        .attachments(std::env::args().skip(1))
        .on_success(|| println!("mail sent"))
        .on_failure(|| eprintln!("mail not sent"))
        .send(&dispatcher)?;

    let outcome = handle.outcome().await;
    tracing::info!(%outcome, "done");
    Ok(())
}
