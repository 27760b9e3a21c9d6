use crate::config::VerifierConfig;
use crate::domain::callback::CallbackFields;
use crate::domain::payment::VerifiedPayment;
use crate::domain::ports::{ResolverBox, TransportBox};
use crate::error::{PaypalError, Result};
use std::net::IpAddr;
use tracing::{debug, instrument, warn};
use url::form_urlencoded;

pub const RESPONSE_VERIFIED: &str = "VERIFIED";
pub const RESPONSE_INVALID: &str = "INVALID";
pub const VALIDATE_CMD: &str = "_notify-validate";

/// Authenticates PayPal IPN callbacks.
///
/// A notification is accepted only if its source address reverse-resolves to
/// PayPal's notify host and PayPal itself answers `VERIFIED` when the exact
/// payload is posted back. Holds no per-call state; share it behind an `Arc`.
pub struct NotificationVerifier {
    config: VerifierConfig,
    transport: TransportBox,
    resolver: ResolverBox,
}

impl NotificationVerifier {
    /// Creates a verifier from explicit ports.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint selection, sandbox leniency and expected host.
    /// * `transport` - Performs the echo-back POST.
    /// * `resolver` - Maps the caller-supplied peer address to a host name.
    pub fn new(config: VerifierConfig, transport: TransportBox, resolver: ResolverBox) -> Self {
        Self {
            config,
            transport,
            resolver,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Verifies one notification.
    ///
    /// `remote_addr` is the peer address of the inbound callback request, as
    /// seen by the hosting web server. At most one request reaches PayPal, and
    /// none if the origin check fails. Failures are final; nothing is retried.
    #[instrument(skip(self, notification), fields(sandbox = self.config.sandbox, field_count = notification.len()))]
    pub async fn verify(
        &self,
        notification: &CallbackFields,
        remote_addr: IpAddr,
    ) -> Result<VerifiedPayment> {
        self.check_origin(remote_addr).await?;

        let body = echo_back_body(notification);
        let response = self
            .transport
            .post_form(self.config.endpoint(), body)
            .await
            .map_err(|e| {
                warn!(error = %e, "IPN verification request failed");
                PaypalError::Verification(
                    "Verification request to PayPal server failed".to_string(),
                )
            })?;

        self.interpret(&response)?;
        debug!("IPN verified");
        Ok(VerifiedPayment::new(notification.clone()))
    }

    async fn check_origin(&self, remote_addr: IpAddr) -> Result<()> {
        let host = match self.resolver.reverse_lookup(remote_addr).await {
            Ok(host) => host,
            Err(e) => {
                warn!(%remote_addr, error = %e, "reverse lookup failed");
                // An unresolvable address is treated like any other stranger.
                remote_addr.to_string()
            }
        };

        if same_host(&host, &self.config.notify_domain) {
            Ok(())
        } else {
            warn!(%remote_addr, %host, "IPN from unknown domain");
            Err(PaypalError::Origin(
                "Received request from unknown domain".to_string(),
            ))
        }
    }

    fn interpret(&self, response: &str) -> Result<()> {
        // The sandbox answers INVALID for some legitimate test notifications.
        let response = if self.config.sandbox && response == RESPONSE_INVALID {
            RESPONSE_VERIFIED
        } else {
            response
        };

        match response {
            RESPONSE_VERIFIED => Ok(()),
            RESPONSE_INVALID => Err(PaypalError::Verification(
                "PayPal request is invalid".to_string(),
            )),
            other => Err(PaypalError::Verification(format!(
                "Unknown PayPal response \"{other}\""
            ))),
        }
    }
}

/// `cmd=_notify-validate` followed by the received fields in their original
/// order. A received `cmd` field is dropped in favour of ours.
pub fn echo_back_body(fields: &CallbackFields) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("cmd", VALIDATE_CMD)
        .extend_pairs(fields.iter().filter(|(name, _)| *name != "cmd"))
        .finish()
}

fn same_host(resolved: &str, expected: &str) -> bool {
    resolved.trim_end_matches('.').eq_ignore_ascii_case(expected)
}
