use serde::Deserialize;
use std::time::Duration;

pub const IPN_DOMAIN: &str = "notify.paypal.com";
pub const IPN_URL: &str = "https://ipnpb.paypal.com/cgi-bin/webscr";
pub const IPN_URL_SANDBOX: &str = "https://ipnpb.sandbox.paypal.com/cgi-bin/webscr";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`NotificationVerifier`](crate::application::verifier::NotificationVerifier).
///
/// Missing keys fall back to the production defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Use the sandbox endpoint and accept `INVALID` as verified.
    pub sandbox: bool,
    /// Upper bound for the whole verification round-trip.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Host name the notification's source address must reverse-resolve to.
    pub notify_domain: String,
    pub ipn_url: String,
    pub ipn_url_sandbox: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            sandbox: false,
            timeout: DEFAULT_TIMEOUT,
            notify_domain: IPN_DOMAIN.to_string(),
            ipn_url: IPN_URL.to_string(),
            ipn_url_sandbox: IPN_URL_SANDBOX.to_string(),
        }
    }
}

impl VerifierConfig {
    pub fn sandbox() -> Self {
        Self {
            sandbox: true,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The endpoint matching the configured mode.
    pub fn endpoint(&self) -> &str {
        if self.sandbox {
            &self.ipn_url_sandbox
        } else {
            &self.ipn_url
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
