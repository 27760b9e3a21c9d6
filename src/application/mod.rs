//! Application layer: the IPN verification flow.
//!
//! `NotificationVerifier` orchestrates the origin check and the echo-back
//! round-trip over the ports in `domain::ports`.

pub mod verifier;
