use crate::domain::ports::VerificationTransport;
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONNECTION, CONTENT_TYPE, HeaderValue};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTPS transport for the IPN echo-back, backed by `reqwest` over rustls.
///
/// Certificate and host name checks stay at reqwest's defaults (on). The client
/// speaks HTTP/1.1 only, keeps no idle connections and sends
/// `Connection: close`, so every verification opens and tears down its own
/// connection.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .http1_only()
            .https_only(true)
            .pool_max_idle_per_host(0)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VerificationTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<String, TransportError> {
        let url = Url::parse(url)?;
        debug!(%url, bytes = body.len(), "posting IPN echo-back");

        let response = self
            .client
            .post(url)
            .header(CONNECTION, HeaderValue::from_static("close"))
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(body)
            .send()
            .await?;

        // PayPal answers with a bare token; the status code carries nothing the
        // body doesn't.
        debug!(status = %response.status(), "IPN echo-back answered");
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_malformed_url() {
        let transport = ReqwestTransport::new(Duration::from_secs(1)).unwrap();
        let err = transport
            .post_form("not a url", String::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_refuses_plain_http() {
        let transport = ReqwestTransport::new(Duration::from_secs(1)).unwrap();
        let err = transport
            .post_form("http://127.0.0.1:9/cgi-bin/webscr", String::new())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Http(_)));
    }
}
