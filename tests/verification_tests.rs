mod common;

use common::{FakeTransport, PAYPAL_ADDR, STRANGER_ADDR, paypal_resolver, sample_ipn};
use paypal_ipn::application::verifier::NotificationVerifier;
use paypal_ipn::config::{IPN_URL, VerifierConfig};
use paypal_ipn::error::ErrorKind;
use rust_decimal_macros::dec;
use std::net::{IpAddr, Ipv4Addr};

fn verifier(config: VerifierConfig, transport: &FakeTransport) -> NotificationVerifier {
    NotificationVerifier::new(
        config,
        Box::new(transport.clone()),
        Box::new(paypal_resolver()),
    )
}

#[tokio::test]
async fn test_verified_response_wraps_original_fields() {
    let transport = FakeTransport::replying("VERIFIED");
    let verifier = verifier(VerifierConfig::default(), &transport);
    let fields = sample_ipn();

    let payment = verifier.verify(&fields, PAYPAL_ADDR).await.unwrap();

    assert_eq!(payment.raw_data(), &fields);
    assert_eq!(payment.gross(), dec!(19.95));
    assert_eq!(payment.currency(), "EUR");
    assert_eq!(payment.custom(), "order-42");
    assert_eq!(payment.payer_email(), "buyer@example.com");
    assert_eq!(payment.custom_parameter("color"), Some("red"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_echo_back_request() {
    let transport = FakeTransport::replying("VERIFIED");
    let verifier = verifier(VerifierConfig::default(), &transport);

    verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap();

    let (url, body) = transport.last_request().unwrap();
    assert_eq!(url, IPN_URL);
    assert!(body.starts_with("cmd=_notify-validate&mc_gross=19.95&mc_currency=EUR"));
    assert!(body.contains("payer_email=buyer%40example.com"));
}

#[tokio::test]
async fn test_invalid_response_rejected_in_production() {
    let transport = FakeTransport::replying("INVALID");
    let verifier = verifier(VerifierConfig::default(), &transport);

    let err = verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
    assert!(err.to_string().contains("PayPal request is invalid"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_invalid_response_accepted_in_sandbox() {
    let transport = FakeTransport::replying("INVALID");
    let verifier = verifier(VerifierConfig::sandbox(), &transport);

    let payment = verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap();

    assert_eq!(payment.custom(), "order-42");
}

#[tokio::test]
async fn test_unknown_response() {
    let transport = FakeTransport::replying("<html>maintenance</html>");
    let verifier = verifier(VerifierConfig::sandbox(), &transport);

    let err = verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
    assert!(err.to_string().contains("<html>maintenance</html>"));
}

#[tokio::test]
async fn test_response_is_compared_byte_exact() {
    let transport = FakeTransport::replying("VERIFIED\n");
    let verifier = verifier(VerifierConfig::default(), &transport);

    let err = verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
}

#[tokio::test]
async fn test_foreign_origin_makes_no_request() {
    let transport = FakeTransport::replying("VERIFIED");
    let verifier = verifier(VerifierConfig::default(), &transport);

    let err = verifier.verify(&sample_ipn(), STRANGER_ADDR).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Origin);
    assert!(err.to_string().contains("unknown domain"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_unresolvable_origin_makes_no_request() {
    let transport = FakeTransport::replying("VERIFIED");
    let verifier = verifier(VerifierConfig::default(), &transport);
    let unknown = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1));

    let err = verifier.verify(&sample_ipn(), unknown).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Origin);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_transport_failure_is_terminal() {
    let transport = FakeTransport::failing();
    let verifier = verifier(VerifierConfig::default(), &transport);

    let err = verifier.verify(&sample_ipn(), PAYPAL_ADDR).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
    assert!(err.to_string().contains("Verification request to PayPal server failed"));
    assert_eq!(transport.calls(), 1);
}
