#![allow(dead_code)]

use chrono::NaiveDate;
use payportal::domain::invoice::{Invoice, InvoiceStatus, ScheduledPayment};
use payportal::domain::payment::PaymentMethod;
use payportal::infrastructure::in_memory::InMemoryInvoiceService;
use rust_decimal_macros::dec;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn outstanding_invoice() -> Invoice {
    Invoice {
        id: "1".to_string(),
        customer: "Maple Leaf Farms".to_string(),
        number: "INV-2041".to_string(),
        issued_on: date(2026, 7, 15),
        due_on: date(2026, 8, 30),
        amount_due: dec!(2500.00),
        status: InvoiceStatus::Outstanding,
        scheduled: None,
        card_enabled: true,
        bank_debit_enabled: true,
        card_surcharge_rate: Some(dec!(0.029)),
        control_number: None,
    }
}

pub fn no_card_invoice() -> Invoice {
    let mut invoice = outstanding_invoice();
    invoice.id = "2".to_string();
    invoice.number = "INV-2042".to_string();
    invoice.card_enabled = false;
    invoice.card_surcharge_rate = None;
    invoice
}

pub fn scheduled_invoice() -> Invoice {
    let mut invoice = outstanding_invoice();
    invoice.id = "3".to_string();
    invoice.number = "INV-2043".to_string();
    invoice.status = InvoiceStatus::Scheduled;
    invoice.scheduled = Some(ScheduledPayment {
        method: PaymentMethod::Check,
        date: invoice.due_on,
    });
    invoice
}

pub async fn store_with(invoice: Invoice, pin: &str) -> InMemoryInvoiceService {
    let store = InMemoryInvoiceService::new();
    store.seed(invoice, pin).await;
    store
}
