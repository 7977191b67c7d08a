//! Environment-driven configuration.

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use config::ConfigError;

pub trait EnvConfig: Sized {
    fn from_env() -> Result<Self, ConfigError>;
    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError>;
}

impl<D> EnvConfig for D
where
    D: DeserializeOwned,
{
    fn from_env() -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()
    }
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Implicit TLS from the first byte (port 465).
    Tls,
    /// Plain connection upgraded with STARTTLS (port 587).
    Starttls,
    /// No encryption. Only for local relays and tests.
    None,
}

/// SMTP server settings. Credentials are not part of this; they travel with
/// each request.
///
/// Defaults target Gmail over implicit TLS.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server hostname (default: `smtp.gmail.com`).
    #[serde(default = "default_host")]
    pub host: String,

    /// SMTP server port (default: 465).
    #[serde(default = "default_port")]
    pub port: u16,

    /// TLS mode: `tls` (default), `starttls`, or `none`.
    #[serde(default = "default_tls")]
    pub tls: TlsMode,

    /// Connection timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

pub const GMAIL_HOST: &str = "smtp.gmail.com";

fn default_host() -> String {
    GMAIL_HOST.to_string()
}

fn default_port() -> u16 {
    465
}

fn default_tls() -> TlsMode {
    TlsMode::Tls
}

fn default_timeout() -> u64 {
    10
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tls: default_tls(),
            timeout: default_timeout(),
        }
    }
}

impl SmtpConfig {
    /// Load from `SMTP_HOST`, `SMTP_PORT`, `SMTP_TLS` and `SMTP_TIMEOUT`,
    /// reading a `.env` file first if one exists. Unset keys keep their
    /// Gmail defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        <Self as EnvConfig>::from_env_with_prefix("SMTP")
    }
}
