use thiserror::Error;

/// Coarse classification of a [`PaypalError`], for callers that branch on the
/// failure category rather than matching on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Origin,
    Verification,
    InvalidInput,
    Io,
}

#[derive(Error, Debug)]
pub enum PaypalError {
    /// The notification did not come from the provider's notify host.
    #[error("Origin error: {0}")]
    Origin(String),
    /// The provider did not confirm the notification.
    #[error("Verification error: {0}")]
    Verification(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PaypalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Origin(_) => ErrorKind::Origin,
            Self::Verification(_) => ErrorKind::Verification,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::IoError(_) => ErrorKind::Io,
        }
    }
}

/// Failure of the outbound verification round-trip itself.
///
/// Never surfaced to callers directly; the verifier folds it into
/// [`PaypalError::Verification`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PaypalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(
            PaypalError::Origin("x".to_string()).kind(),
            ErrorKind::Origin
        );
        assert_eq!(
            PaypalError::Verification("x".to_string()).kind(),
            ErrorKind::Verification
        );
        let io = std::io::Error::other("boom");
        assert_eq!(PaypalError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display_carries_message() {
        let err = PaypalError::Verification("PayPal request is invalid".to_string());
        assert_eq!(
            err.to_string(),
            "Verification error: PayPal request is invalid"
        );
    }
}
