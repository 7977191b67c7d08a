pub mod config;
pub mod connectivity;
pub mod dispatch;
pub mod error;
pub mod mail;
pub mod progress;

pub use self::config::{EnvConfig, SmtpConfig, TlsMode};
pub use connectivity::{AlwaysOnline, Connectivity, SystemConnectivity};
pub use dispatch::{DispatchHandle, Dispatcher, Outcome};
pub use error::MailError;
pub use mail::{Credentials, Envelope, MailRequest, MailRequestBuilder, Mailer, SmtpMailer};
pub use progress::{LogProgress, ProgressSink};
