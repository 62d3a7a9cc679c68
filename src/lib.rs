//! Customer-facing invoice payment workflow engine.
//!
//! A customer holding an invoice link and a 6-digit PIN can view the invoice
//! and submit or schedule a payment against it. The crate covers the guarded
//! state transitions from PIN verification through invoice review, live fee
//! quoting, submission, and confirmation, against a pluggable invoice
//! service. Transport, rendering, and the backend store itself stay outside.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
