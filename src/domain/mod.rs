//! Domain types and pure rules: invoices, payment selections, fee quoting,
//! form validity, and the invoice service port.

pub mod fees;
pub mod form;
pub mod invoice;
pub mod payment;
pub mod ports;
