use crate::domain::ports::ReverseResolver;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::net::IpAddr;

/// Reverse lookups through the system resolver (`getnameinfo`).
///
/// The libc call blocks, so it runs on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

impl SystemResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReverseResolver for SystemResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> io::Result<String> {
        tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr))
            .await
            .map_err(io::Error::other)?
    }
}

/// A fixed address-to-host table.
///
/// Useful behind a proxy that already authenticated PayPal's addresses, and in
/// tests. Unknown addresses fail with `NotFound`.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    hosts: HashMap<IpAddr, String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, addr: IpAddr, host: impl Into<String>) -> Self {
        self.hosts.insert(addr, host.into());
        self
    }
}

#[async_trait]
impl ReverseResolver for StaticResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> io::Result<String> {
        self.hosts.get(&addr).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no PTR record for {addr}"))
        })
    }
}
