use thiserror::Error;

/// Rejections raised while turning raw form input into a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("subscription name must not be empty")]
    EmptyName,
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("currency must not be empty")]
    EmptyCurrency,
    #[error("unknown billing cycle: {0}")]
    UnknownBillingCycle(String),
    #[error("invalid payment date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}
