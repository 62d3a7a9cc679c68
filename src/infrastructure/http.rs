use crate::domain::invoice::{Invoice, InvoiceStatus, ScheduledPayment};
use crate::domain::payment::PaymentMethod;
use crate::domain::ports::{InvoiceService, PaymentUpdate};
use crate::error::ServiceError;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Wire shape of an invoice record as served by the backend. Amounts arrive
/// as decimal strings and stay exact through `rust_decimal`.
#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    id: String,
    customer: String,
    invoice_number: String,
    issued_on: NaiveDate,
    due_on: NaiveDate,
    amount_due: Decimal,
    status: String,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    payment_date: Option<NaiveDate>,
    #[serde(default)]
    cc_enabled: bool,
    #[serde(default)]
    bank_debit_enabled: bool,
    #[serde(default)]
    card_surcharge_rate: Option<Decimal>,
    #[serde(default)]
    control_number: Option<String>,
}

impl InvoiceRecord {
    fn into_domain(self) -> Invoice {
        // a schedule only exists when the backend sent both halves
        let scheduled = match (
            self.payment_method
                .as_deref()
                .and_then(PaymentMethod::from_str),
            self.payment_date,
        ) {
            (Some(method), Some(date)) => Some(ScheduledPayment { method, date }),
            _ => None,
        };
        Invoice {
            id: self.id,
            customer: self.customer,
            number: self.invoice_number,
            issued_on: self.issued_on,
            due_on: self.due_on,
            amount_due: self.amount_due,
            status: InvoiceStatus::from_str(&self.status).unwrap_or(InvoiceStatus::Outstanding),
            scheduled,
            card_enabled: self.cc_enabled,
            bank_debit_enabled: self.bank_debit_enabled,
            card_surcharge_rate: self.card_surcharge_rate,
            control_number: self.control_number,
        }
    }
}

/// REST client for the invoice backend.
///
/// Maps 401 to an invalid PIN and 404 to an unknown invoice; anything else
/// non-2xx becomes a backend failure. Nothing is retried here — each call is
/// independently retryable by the caller.
pub struct HttpInvoiceService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpInvoiceService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn invoice_url(&self, id: &str) -> String {
        format!("{}/invoices/{}", self.base_url, id)
    }

    async fn decode(response: reqwest::Response) -> Result<Invoice, ServiceError> {
        match response.status() {
            StatusCode::OK => Ok(response.json::<InvoiceRecord>().await?.into_domain()),
            StatusCode::UNAUTHORIZED => Err(ServiceError::InvalidPin),
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ServiceError::Backend(format!("{status}: {body}")))
            }
        }
    }
}

#[async_trait]
impl InvoiceService for HttpInvoiceService {
    async fn get_invoice(&self, id: &str, pin: &str) -> Result<Invoice, ServiceError> {
        let url = self.invoice_url(id);
        debug!(%url, "fetching invoice");
        let response = self.http.get(&url).query(&[("pin", pin)]).send().await?;
        Self::decode(response).await
    }

    async fn update_invoice(
        &self,
        id: &str,
        update: PaymentUpdate,
    ) -> Result<Invoice, ServiceError> {
        let url = self.invoice_url(id);
        debug!(%url, method = %update.payment_method, "updating invoice");
        let response = self.http.put(&url).json(&update).send().await?;
        Self::decode(response).await
    }
}
