#![allow(dead_code)]

use async_trait::async_trait;
use paypal_ipn::domain::callback::CallbackFields;
use paypal_ipn::domain::ports::VerificationTransport;
use paypal_ipn::error::TransportError;
use paypal_ipn::infrastructure::dns::StaticResolver;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PAYPAL_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(173, 0, 82, 126));
pub const STRANGER_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));

/// Transport double that answers with a canned body and counts calls.
#[derive(Clone, Default)]
pub struct FakeTransport {
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(String, String)>>>,
}

impl FakeTransport {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    /// Every call fails as if the connection could not be made.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, String)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerificationTransport for FakeTransport {
    async fn post_form(&self, url: &str, body: String) -> Result<String, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((url.to_string(), body));
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(TransportError::InvalidUrl(url::ParseError::EmptyHost)),
        }
    }
}

pub fn paypal_resolver() -> StaticResolver {
    StaticResolver::new()
        .with_host(PAYPAL_ADDR, "notify.paypal.com")
        .with_host(STRANGER_ADDR, "mail.example.net")
}

pub fn sample_ipn() -> CallbackFields {
    [
        ("mc_gross", "19.95"),
        ("mc_currency", "EUR"),
        ("custom", "order-42"),
        ("payer_email", "buyer@example.com"),
        ("txn_id", "61E67681CH3238416"),
        ("option_name1", "color"),
        ("option_value1", "red"),
    ]
    .into_iter()
    .collect()
}
