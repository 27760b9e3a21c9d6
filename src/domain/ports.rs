use crate::error::TransportError;
use async_trait::async_trait;
use std::io;
use std::net::IpAddr;

/// Sends the echo-back body to PayPal and returns the raw response text.
#[async_trait]
pub trait VerificationTransport: Send + Sync {
    async fn post_form(&self, url: &str, body: String) -> Result<String, TransportError>;
}

/// Maps a peer address back to a host name (PTR lookup).
#[async_trait]
pub trait ReverseResolver: Send + Sync {
    async fn reverse_lookup(&self, addr: IpAddr) -> io::Result<String>;
}

pub type TransportBox = Box<dyn VerificationTransport>;
pub type ResolverBox = Box<dyn ReverseResolver>;
