use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceService;
use crate::error::ServiceError;
use tracing::{debug, warn};

/// Observable verification state.
///
/// `Verified` is the only state from which invoice fields may be shown or a
/// payment submitted.
#[derive(Debug, Default)]
pub enum AccessState {
    #[default]
    Unverified,
    Verifying,
    Verified(Invoice),
    Denied(String),
}

impl AccessState {
    pub fn is_verified(&self) -> bool {
        matches!(self, AccessState::Verified(_))
    }
}

/// True when the candidate PIN has the required 6-digit shape. Anything else
/// fails closed before a request is made.
pub fn pin_is_well_formed(pin: &str) -> bool {
    pin.len() == 6 && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Enforces that invoice data is only released after a server-confirmed PIN
/// match. The gate never compares the PIN against anything held locally and
/// never caches one; its only local check is the PIN shape.
#[derive(Debug, Default)]
pub struct AccessGate {
    state: AccessState,
}

impl AccessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AccessState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = AccessState::Unverified;
    }

    /// Verifies the credential against the backend.
    ///
    /// A malformed PIN is denied synchronously without a request. Otherwise
    /// the backend's answer is final: 200 verifies, 401/404 denies.
    pub async fn verify(
        &mut self,
        service: &dyn InvoiceService,
        invoice_id: &str,
        pin: &str,
    ) -> &AccessState {
        if !pin_is_well_formed(pin) {
            self.state = AccessState::Denied("the PIN must be exactly 6 digits".to_string());
            return &self.state;
        }

        self.state = AccessState::Verifying;
        self.state = match service.get_invoice(invoice_id, pin).await {
            Ok(invoice) => {
                debug!(invoice = %invoice_id, "PIN verified");
                AccessState::Verified(invoice)
            }
            Err(ServiceError::InvalidPin) => {
                AccessState::Denied("the PIN does not match this invoice".to_string())
            }
            Err(ServiceError::NotFound) => AccessState::Denied("no such invoice".to_string()),
            Err(err) => {
                warn!(invoice = %invoice_id, error = %err, "verification request failed");
                AccessState::Denied("the invoice service is temporarily unavailable".to_string())
            }
        };
        &self.state
    }
}
