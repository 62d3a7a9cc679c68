use super::payment::PaymentMethod;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Lifecycle reported by the backend for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Outstanding,
    Scheduled,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Outstanding => "outstanding",
            InvoiceStatus::Scheduled => "scheduled",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "outstanding" => Some(InvoiceStatus::Outstanding),
            "scheduled" => Some(InvoiceStatus::Scheduled),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment method and date already recorded against the invoice.
///
/// This is the "scheduled" sub-state: the payment is booked for a future
/// date, which is distinct from the invoice being paid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledPayment {
    pub method: PaymentMethod,
    pub date: NaiveDate,
}

/// An invoice as served by the backend.
///
/// `amount_due` is always >= 0 and stays in `Decimal` end to end; display
/// formatting happens only at the interface boundary. The capability flags
/// gate which payment methods the customer may pick, and
/// `card_surcharge_rate` is the per-invoice rate the backend quotes for card
/// payments (absent when the backend leaves it to the local fallback).
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: String,
    pub customer: String,
    pub number: String,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    pub amount_due: Decimal,
    pub status: InvoiceStatus,
    pub scheduled: Option<ScheduledPayment>,
    pub card_enabled: bool,
    pub bank_debit_enabled: bool,
    pub card_surcharge_rate: Option<Decimal>,
    pub control_number: Option<String>,
}

impl Invoice {
    /// True when a payment method and date are already recorded.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.is_some() || self.status == InvoiceStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            InvoiceStatus::Outstanding,
            InvoiceStatus::Scheduled,
            InvoiceStatus::Paid,
        ] {
            assert_eq!(InvoiceStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::from_str("void"), None);
    }
}
