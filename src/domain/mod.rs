//! Provider-facing data types and the ports the verifier talks through.

pub mod callback;
pub mod link;
pub mod payment;
pub mod ports;
