use crate::application::gate::{AccessGate, AccessState};
use crate::domain::fees;
use crate::domain::form::{self, FormProjection};
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::payment::{
    PaymentMethod, PaymentOption, PaymentQuote, PaymentResult, PaymentSelection,
};
use crate::domain::ports::{InvoiceServiceBox, PaymentUpdate};
use crate::error::{Result, ServiceError, WorkflowError};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Where the session currently is.
///
/// Forward-only except for the single review -> PIN-entry back-edge. Every
/// transition happens in reaction to a user event or a completed service
/// call; there is no other way to move between stages.
#[derive(Debug)]
pub enum Stage {
    /// Waiting for a PIN. `notice` carries the inline access-denied message.
    PinEntry { notice: Option<String> },
    /// The invoice is on screen and the payment form is live.
    InvoiceReview {
        invoice: Invoice,
        selection: PaymentSelection,
        banner: Option<String>,
    },
    /// Terminal: the carried credential stopped working on re-entry.
    CannotAccess,
    /// Read-only receipt for a confirmed submission.
    Confirmation { result: PaymentResult },
}

/// Drives one payment session: verify -> review -> submit -> confirm.
///
/// The workflow owns the transient session state (selection, result,
/// credential) and the service handle. At most one verification and one
/// submission request may be in flight, and a response is only applied if
/// the session is still in the state that originated it — `epoch` is bumped
/// on every transition that invalidates outstanding requests.
pub struct PaymentWorkflow {
    service: InvoiceServiceBox,
    gate: AccessGate,
    invoice_id: String,
    pin: Option<String>,
    stage: Stage,
    epoch: u64,
    verify_in_flight: bool,
    submit_in_flight: bool,
}

impl PaymentWorkflow {
    /// A fresh session always starts at PIN entry; nothing is resurrected
    /// from outside the session.
    pub fn new(invoice_id: impl Into<String>, service: InvoiceServiceBox) -> Self {
        Self {
            service,
            gate: AccessGate::new(),
            invoice_id: invoice_id.into(),
            pin: None,
            stage: Stage::PinEntry { notice: None },
            epoch: 0,
            verify_in_flight: false,
            submit_in_flight: false,
        }
    }

    pub fn invoice_id(&self) -> &str {
        &self.invoice_id
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn access_state(&self) -> &AccessState {
        self.gate.state()
    }

    /// True while a verification request is out; the PIN control should be
    /// disabled for the duration.
    pub fn verify_in_flight(&self) -> bool {
        self.verify_in_flight
    }

    /// True while a submission request is out; the submit control should be
    /// disabled for the duration.
    pub fn submit_in_flight(&self) -> bool {
        self.submit_in_flight
    }

    /// Live projection of the payment form, present only during review.
    pub fn form(&self) -> Option<FormProjection> {
        match &self.stage {
            Stage::InvoiceReview {
                invoice, selection, ..
            } => Some(FormProjection::derive(selection, invoice)),
            _ => None,
        }
    }

    /// Live quote for the current selection. Pure computation, recomputed on
    /// every call, so it can back per-keystroke feedback.
    pub fn quote(&self) -> Option<PaymentQuote> {
        match &self.stage {
            Stage::InvoiceReview {
                invoice, selection, ..
            } => {
                let method = selection.method?;
                Some(fees::quote(
                    payment_base(invoice, selection),
                    method,
                    invoice.card_surcharge_rate,
                ))
            }
            _ => None,
        }
    }

    /// Handles the PIN form. On server confirmation the session moves to
    /// review, seeded with the invoice's initial selection; on denial it
    /// stays here with an inline notice.
    pub async fn submit_pin(&mut self, pin: &str) -> Result<()> {
        if !matches!(self.stage, Stage::PinEntry { .. }) {
            return Ok(());
        }
        if self.verify_in_flight {
            return Ok(());
        }

        self.verify_in_flight = true;
        let epoch = self.epoch;
        self.gate
            .verify(self.service.as_ref(), &self.invoice_id, pin)
            .await;
        self.verify_in_flight = false;

        if self.epoch != epoch {
            debug!("discarding stale verification response");
            return Ok(());
        }

        match self.gate.state() {
            AccessState::Verified(invoice) => {
                let invoice = invoice.clone();
                self.pin = Some(pin.to_string());
                let selection = form::initial_selection(&invoice);
                info!(invoice = %self.invoice_id, "entering invoice review");
                self.stage = Stage::InvoiceReview {
                    invoice,
                    selection,
                    banner: None,
                };
                Ok(())
            }
            AccessState::Denied(reason) => {
                let reason = reason.clone();
                self.stage = Stage::PinEntry {
                    notice: Some(reason.clone()),
                };
                Err(WorkflowError::AccessDenied(reason))
            }
            // verify always lands in Verified or Denied
            _ => Ok(()),
        }
    }

    pub fn choose_option(&mut self, option: PaymentOption) -> Result<()> {
        let Stage::InvoiceReview {
            selection, banner, ..
        } = &mut self.stage
        else {
            return Err(WorkflowError::Validation("no invoice under review".to_string()));
        };
        *banner = None;
        selection.option = Some(option);
        if option != PaymentOption::Partial {
            selection.partial_amount = None;
        }
        Ok(())
    }

    /// Only meaningful under the partial option; out-of-range values are
    /// accepted here and flagged by the form projection.
    pub fn set_partial_amount(&mut self, amount: Decimal) -> Result<()> {
        let Stage::InvoiceReview { selection, .. } = &mut self.stage else {
            return Err(WorkflowError::Validation("no invoice under review".to_string()));
        };
        if selection.option != Some(PaymentOption::Partial) {
            return Err(WorkflowError::Validation(
                "choose the partial payment option first".to_string(),
            ));
        }
        selection.partial_amount = Some(amount);
        Ok(())
    }

    pub fn choose_method(&mut self, method: PaymentMethod) -> Result<()> {
        let Stage::InvoiceReview {
            invoice, selection, ..
        } = &mut self.stage
        else {
            return Err(WorkflowError::Validation("no invoice under review".to_string()));
        };
        if selection.option.is_none() {
            return Err(WorkflowError::Validation(
                "choose a payment option first".to_string(),
            ));
        }
        if !form::enabled_methods(invoice).contains(&method) {
            return Err(WorkflowError::Validation(format!(
                "{} is not available for this invoice",
                method.label()
            )));
        }
        selection.method = Some(method);
        Ok(())
    }

    pub fn set_message(&mut self, message: String) -> Result<()> {
        let Stage::InvoiceReview { selection, .. } = &mut self.stage else {
            return Err(WorkflowError::Validation("no invoice under review".to_string()));
        };
        selection.message = if message.is_empty() {
            None
        } else {
            Some(message)
        };
        Ok(())
    }

    /// Submits the payment.
    ///
    /// Re-checks submittability even though the UI disables the control — the
    /// request is only built from a selection the validator accepts. Payment
    /// date is the submission date. On success the session moves to
    /// confirmation; on failure it stays here with a banner and nothing else
    /// changes.
    pub async fn submit_payment(&mut self) -> Result<()> {
        if self.submit_in_flight {
            return Ok(());
        }

        let (selection, option, method) = {
            let Stage::InvoiceReview {
                invoice, selection, ..
            } = &self.stage
            else {
                return Ok(());
            };
            let projection = FormProjection::derive(selection, invoice);
            if !projection.submittable {
                let reason = projection
                    .violations
                    .first()
                    .map(|v| v.reason.clone())
                    .unwrap_or_else(|| "the form is incomplete".to_string());
                return Err(WorkflowError::Validation(reason));
            }
            let (Some(option), Some(method)) = (selection.option, selection.method) else {
                return Err(WorkflowError::Validation(
                    "the form is incomplete".to_string(),
                ));
            };
            (selection.clone(), option, method)
        };

        let Some(pin) = self.pin.clone() else {
            return self.recover_navigation_guard();
        };
        let update = PaymentUpdate {
            pin,
            payment_method: method.as_str().to_string(),
            payment_date: today(),
            status: InvoiceStatus::Scheduled.as_str().to_string(),
        };

        self.submit_in_flight = true;
        let epoch = self.epoch;
        let outcome = self.service.update_invoice(&self.invoice_id, update).await;
        self.submit_in_flight = false;

        if self.epoch != epoch {
            debug!("discarding stale submission response");
            return Ok(());
        }

        match outcome {
            Ok(updated) => {
                let result = payment_result(&updated, &selection, option, method);
                info!(invoice = %self.invoice_id, total = %result.total, "payment scheduled");
                self.stage = Stage::Confirmation { result };
                Ok(())
            }
            Err(err) => {
                warn!(invoice = %self.invoice_id, error = %err, "payment submission failed");
                let message = submission_message(&err);
                if let Stage::InvoiceReview { banner, .. } = &mut self.stage {
                    *banner = Some(message.clone());
                }
                Err(WorkflowError::Submission(message))
            }
        }
    }

    /// Logical review route: entering review re-validates the carried
    /// credential by fetching the invoice again. A credential the backend no
    /// longer accepts lands in the terminal cannot-access view; entry without
    /// a credential at all is guarded.
    pub async fn open_review(&mut self) -> Result<()> {
        let Some(pin) = self.pin.clone() else {
            return self.recover_navigation_guard();
        };
        if self.verify_in_flight {
            return Ok(());
        }

        self.verify_in_flight = true;
        let epoch = self.epoch;
        let outcome = self.service.get_invoice(&self.invoice_id, &pin).await;
        self.verify_in_flight = false;

        if self.epoch != epoch {
            debug!("discarding stale review response");
            return Ok(());
        }

        match outcome {
            Ok(invoice) => {
                let selection = form::initial_selection(&invoice);
                self.stage = Stage::InvoiceReview {
                    invoice,
                    selection,
                    banner: None,
                };
                Ok(())
            }
            Err(ServiceError::InvalidPin) | Err(ServiceError::NotFound) => {
                warn!(invoice = %self.invoice_id, "credential no longer accepted");
                self.stage = Stage::CannotAccess;
                Err(WorkflowError::AccessDenied(
                    "this invoice can no longer be accessed".to_string(),
                ))
            }
            Err(err) => {
                warn!(invoice = %self.invoice_id, error = %err, "review fetch failed");
                Err(WorkflowError::AccessDenied(
                    "the invoice service is temporarily unavailable".to_string(),
                ))
            }
        }
    }

    /// Logical confirmation route. Reachable only with a result in hand;
    /// direct entry without one lands back at PIN entry with no error shown.
    pub fn open_confirmation(&mut self) -> Result<()> {
        match self.stage {
            Stage::Confirmation { .. } => Ok(()),
            _ => self.recover_navigation_guard(),
        }
    }

    /// The designated back-edge. From review the session returns to PIN
    /// entry; from confirmation it returns to review on the carried
    /// credential, without asking for the PIN again.
    pub async fn go_back(&mut self) -> Result<()> {
        match &self.stage {
            Stage::InvoiceReview { .. } | Stage::CannotAccess => {
                self.reset_to_pin_entry(None);
                Ok(())
            }
            Stage::Confirmation { .. } => self.open_review().await,
            Stage::PinEntry { .. } => Ok(()),
        }
    }

    fn reset_to_pin_entry(&mut self, notice: Option<String>) {
        // outstanding responses for the abandoned stage must not land here
        self.epoch += 1;
        self.pin = None;
        self.gate.reset();
        self.stage = Stage::PinEntry { notice };
    }

    fn recover_navigation_guard(&mut self) -> Result<()> {
        let violation = WorkflowError::NavigationGuard;
        debug!(error = %violation, "redirecting to PIN entry");
        self.reset_to_pin_entry(None);
        Ok(())
    }
}

/// Amount the customer is actually paying: the partial amount under the
/// partial option, the full amount due otherwise.
fn payment_base(invoice: &Invoice, selection: &PaymentSelection) -> Decimal {
    match (selection.option, selection.partial_amount) {
        (Some(PaymentOption::Partial), Some(amount)) => amount,
        _ => invoice.amount_due,
    }
}

/// Builds the confirmation receipt from the server-echoed record. Echoed
/// fields (amount due, surcharge rate, control number, booked date) win over
/// anything computed client-side.
fn payment_result(
    updated: &Invoice,
    selection: &PaymentSelection,
    option: PaymentOption,
    method: PaymentMethod,
) -> PaymentResult {
    let base = match (option, selection.partial_amount) {
        (PaymentOption::Partial, Some(amount)) => amount,
        _ => updated.amount_due,
    };
    let quote = fees::quote(base, method, updated.card_surcharge_rate);
    PaymentResult {
        invoice_number: updated.number.clone(),
        customer: updated.customer.clone(),
        option: option.label().to_string(),
        method: method.label().to_string(),
        amount: quote.base,
        fee: quote.surcharge,
        total: quote.total,
        transaction_date: updated
            .scheduled
            .as_ref()
            .map(|s| s.date)
            .unwrap_or_else(today),
        transaction_id: updated.control_number.clone(),
        success: true,
    }
}

fn submission_message(err: &ServiceError) -> String {
    match err {
        ServiceError::InvalidPin | ServiceError::NotFound => {
            "the invoice could not be updated with this credential".to_string()
        }
        ServiceError::Backend(_) | ServiceError::Transport(_) => {
            "the payment could not be submitted; please try again".to_string()
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
