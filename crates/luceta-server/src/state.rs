//! Application State

use std::sync::Arc;

use luceta_payments::DodoPaymentsClient;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    /// Dodo Payments client (optional - None if not configured)
    pub payments: Option<Arc<DodoPaymentsClient>>,
}

impl AppState {
    pub fn new(payments: Option<DodoPaymentsClient>) -> Self {
        Self {
            payments: payments.map(Arc::new),
        }
    }
}
