use crate::domain::invoice::{Invoice, InvoiceStatus, ScheduledPayment};
use crate::domain::payment::PaymentMethod;
use crate::domain::ports::{InvoiceService, PaymentUpdate};
use crate::error::ServiceError;
use async_trait::async_trait;
use chrono::{Days, Utc};
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

struct StoredInvoice {
    invoice: Invoice,
    pin: String,
}

/// A seeded stand-in for the real invoice backend.
///
/// PINs are checked against the seeded records, and updates echo the record
/// back with a generated control number, the same contract the real service
/// exposes. The optional artificial latency exists for demos only and is
/// never enabled in tests.
#[derive(Clone)]
pub struct InMemoryInvoiceService {
    records: Arc<RwLock<HashMap<String, StoredInvoice>>>,
    control_seq: Arc<AtomicU64>,
    latency: Option<Duration>,
}

impl Default for InMemoryInvoiceService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryInvoiceService {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            control_seq: Arc::new(AtomicU64::new(1001)),
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Three demo invoices covering the interesting shapes: an open invoice
    /// with every method available, one with card payments disabled, and one
    /// that already carries a scheduled payment.
    pub fn with_demo_data() -> Self {
        let mut records = HashMap::new();
        let today = Utc::now().date_naive();

        let mut open = Invoice {
            id: "1001".to_string(),
            customer: "Maple Leaf Farms".to_string(),
            number: "INV-2041".to_string(),
            issued_on: today - Days::new(14),
            due_on: today + Days::new(16),
            amount_due: dec!(2500.00),
            status: InvoiceStatus::Outstanding,
            scheduled: None,
            card_enabled: true,
            bank_debit_enabled: true,
            card_surcharge_rate: Some(dec!(0.029)),
            control_number: None,
        };
        records.insert(
            open.id.clone(),
            StoredInvoice {
                invoice: open.clone(),
                pin: "123456".to_string(),
            },
        );

        open.id = "1002".to_string();
        open.customer = "Hilltop Dairy".to_string();
        open.number = "INV-2042".to_string();
        open.amount_due = dec!(840.75);
        open.card_enabled = false;
        open.card_surcharge_rate = None;
        records.insert(
            open.id.clone(),
            StoredInvoice {
                invoice: open.clone(),
                pin: "222333".to_string(),
            },
        );

        open.id = "1003".to_string();
        open.customer = "Birchwood Mills".to_string();
        open.number = "INV-2043".to_string();
        open.amount_due = dec!(1200.00);
        open.card_enabled = true;
        open.card_surcharge_rate = Some(dec!(0.025));
        open.status = InvoiceStatus::Scheduled;
        open.scheduled = Some(ScheduledPayment {
            method: PaymentMethod::Check,
            date: today + Days::new(16),
        });
        records.insert(
            open.id.clone(),
            StoredInvoice {
                invoice: open,
                pin: "654321".to_string(),
            },
        );

        Self {
            records: Arc::new(RwLock::new(records)),
            control_seq: Arc::new(AtomicU64::new(1001)),
            latency: None,
        }
    }

    /// Inserts or replaces a record.
    pub async fn seed(&self, invoice: Invoice, pin: impl Into<String>) {
        let mut records = self.records.write().await;
        records.insert(
            invoice.id.clone(),
            StoredInvoice {
                invoice,
                pin: pin.into(),
            },
        );
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl InvoiceService for InMemoryInvoiceService {
    async fn get_invoice(&self, id: &str, pin: &str) -> Result<Invoice, ServiceError> {
        self.simulate_latency().await;
        let records = self.records.read().await;
        let record = records.get(id).ok_or(ServiceError::NotFound)?;
        if record.pin != pin {
            return Err(ServiceError::InvalidPin);
        }
        Ok(record.invoice.clone())
    }

    async fn update_invoice(
        &self,
        id: &str,
        update: PaymentUpdate,
    ) -> Result<Invoice, ServiceError> {
        self.simulate_latency().await;
        let mut records = self.records.write().await;
        let record = records.get_mut(id).ok_or(ServiceError::NotFound)?;
        if record.pin != update.pin {
            return Err(ServiceError::InvalidPin);
        }

        let method = PaymentMethod::from_str(&update.payment_method).ok_or_else(|| {
            ServiceError::Backend(format!("unknown payment method: {}", update.payment_method))
        })?;

        // resubmission overwrites the schedule; there is never a second record
        record.invoice.scheduled = Some(ScheduledPayment {
            method,
            date: update.payment_date,
        });
        record.invoice.status =
            InvoiceStatus::from_str(&update.status).unwrap_or(InvoiceStatus::Scheduled);
        let seq = self.control_seq.fetch_add(1, Ordering::Relaxed);
        record.invoice.control_number = Some(format!("CN-{seq}"));

        Ok(record.invoice.clone())
    }
}
