use super::invoice::Invoice;
use crate::error::ServiceError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

/// Update sent to the backend when a payment is submitted or rescheduled.
///
/// The same shape covers the first submission and a later overwrite of an
/// existing schedule; collapsing the two into one record is the backend's
/// guarantee, not ours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentUpdate {
    pub pin: String,
    pub payment_method: String,
    pub payment_date: NaiveDate,
    pub status: String,
}

/// Typed boundary to the invoice backend.
///
/// Both operations authenticate with the invoice PIN and return the full
/// invoice record. Neither retries internally; every call is independently
/// retryable by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceService: Send + Sync {
    async fn get_invoice(&self, id: &str, pin: &str) -> Result<Invoice, ServiceError>;

    async fn update_invoice(&self, id: &str, update: PaymentUpdate)
    -> Result<Invoice, ServiceError>;
}

pub type InvoiceServiceBox = Box<dyn InvoiceService>;
