//! Concrete adapters for the verifier's ports: HTTPS and reverse DNS.

pub mod dns;
pub mod http;
