//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Missing or invalid configuration (fatal, raised before any network call)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider rejected a checkout session
    #[error("Payment session creation failed: {status} {}", .message.as_deref().unwrap_or_default())]
    Session { status: u16, message: Option<String> },

    /// Provider rejected a payment link
    #[error("Payment link creation failed: {status} {}", .message.as_deref().unwrap_or_default())]
    Link { status: u16, message: Option<String> },

    /// Provider rejected a product listing or creation
    #[error("Product request failed: {status} {}", .message.as_deref().unwrap_or_default())]
    Product { status: u16, message: Option<String> },

    /// Transport failure (unreachable host, connection reset, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaymentError {
    /// HTTP status returned by the provider, if the failure came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            PaymentError::Session { status, .. }
            | PaymentError::Link { status, .. }
            | PaymentError::Product { status, .. } => Some(*status),
            PaymentError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Provider-supplied message, if one could be parsed
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            PaymentError::Session { message, .. }
            | PaymentError::Link { message, .. }
            | PaymentError::Product { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Config(_) => "Payments are not configured.",
            PaymentError::Session { .. } | PaymentError::Link { .. } => {
                "Failed to start checkout. Please try again."
            }
            PaymentError::Http(_) => "Payment provider is unreachable. Please try again.",
            _ => "An error occurred processing your request.",
        }
    }
}
