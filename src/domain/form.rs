use super::invoice::{Invoice, InvoiceStatus};
use super::payment::{PaymentMethod, PaymentOption, PaymentSelection};
use rust_decimal::Decimal;

/// Longest note a customer may attach to a payment.
pub const MESSAGE_MAX_CHARS: usize = 100;

/// Form fields subject to requirement and validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Option,
    PartialAmount,
    Method,
    Message,
}

/// A single field-level rule violation, rendered inline by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: Field,
    pub reason: String,
}

/// Snapshot of what the payment form currently requires and allows.
///
/// Recomputed in full from the selection and invoice on every change; nothing
/// in here is mutated incrementally, so visibility can never go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct FormProjection {
    pub required: Vec<Field>,
    pub enabled_methods: Vec<PaymentMethod>,
    pub violations: Vec<FieldViolation>,
    pub submittable: bool,
}

/// Methods the customer may pick on this invoice. Card and bank debit follow
/// the invoice capability flags; check is always available.
pub fn enabled_methods(invoice: &Invoice) -> Vec<PaymentMethod> {
    let mut methods = Vec::new();
    if invoice.card_enabled {
        methods.push(PaymentMethod::Card);
    }
    if invoice.bank_debit_enabled {
        methods.push(PaymentMethod::BankDebit);
    }
    methods.push(PaymentMethod::Check);
    methods
}

/// Starting selection for a review session.
///
/// An invoice that already carries a scheduled payment pre-fills the form
/// instead of leaving it empty: on-due-date when the booked date is on or
/// after the due date (or the backend says scheduled), full otherwise. A UX
/// default only; every rule still applies on submission.
pub fn initial_selection(invoice: &Invoice) -> PaymentSelection {
    let mut selection = PaymentSelection::default();
    if let Some(scheduled) = &invoice.scheduled {
        let option = if scheduled.date >= invoice.due_on || invoice.status == InvoiceStatus::Scheduled {
            PaymentOption::OnDueDate
        } else {
            PaymentOption::Full
        };
        selection.option = Some(option);
        if enabled_methods(invoice).contains(&scheduled.method) {
            selection.method = Some(scheduled.method);
        }
    }
    selection
}

impl FormProjection {
    pub fn derive(selection: &PaymentSelection, invoice: &Invoice) -> Self {
        let enabled_methods = enabled_methods(invoice);
        let mut required = vec![Field::Option];
        let mut violations = Vec::new();
        let mut complete = true;

        match selection.option {
            None => complete = false,
            Some(option) => {
                if option == PaymentOption::Partial {
                    required.push(Field::PartialAmount);
                    match selection.partial_amount {
                        None => complete = false,
                        Some(amount) => {
                            if amount <= Decimal::ZERO {
                                violations.push(FieldViolation {
                                    field: Field::PartialAmount,
                                    reason: "amount must be greater than zero".to_string(),
                                });
                            } else if amount >= invoice.amount_due {
                                violations.push(FieldViolation {
                                    field: Field::PartialAmount,
                                    reason: "amount must be less than the amount due".to_string(),
                                });
                            }
                        }
                    }
                }
                // the method picker only opens once an option is chosen
                required.push(Field::Method);
                match selection.method {
                    None => complete = false,
                    Some(method) => {
                        if !enabled_methods.contains(&method) {
                            violations.push(FieldViolation {
                                field: Field::Method,
                                reason: format!(
                                    "{} is not available for this invoice",
                                    method.label()
                                ),
                            });
                        }
                    }
                }
            }
        }

        if let Some(message) = &selection.message
            && message.chars().count() > MESSAGE_MAX_CHARS
        {
            violations.push(FieldViolation {
                field: Field::Message,
                reason: format!("message is limited to {MESSAGE_MAX_CHARS} characters"),
            });
        }

        let submittable = complete && violations.is_empty();
        Self {
            required,
            enabled_methods,
            violations,
            submittable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::ScheduledPayment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> Invoice {
        Invoice {
            id: "1".to_string(),
            customer: "Maple Leaf Farms".to_string(),
            number: "INV-2041".to_string(),
            issued_on: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
            due_on: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            amount_due: dec!(2500.00),
            status: InvoiceStatus::Outstanding,
            scheduled: None,
            card_enabled: true,
            bank_debit_enabled: true,
            card_surcharge_rate: Some(dec!(0.029)),
            control_number: None,
        }
    }

    #[test]
    fn test_empty_selection_is_not_submittable() {
        let projection = FormProjection::derive(&PaymentSelection::default(), &invoice());
        assert!(!projection.submittable);
        assert_eq!(projection.required, vec![Field::Option]);
        assert!(projection.violations.is_empty());
    }

    #[test]
    fn test_option_and_method_complete_the_form() {
        let selection = PaymentSelection {
            option: Some(PaymentOption::Full),
            method: Some(PaymentMethod::Check),
            ..Default::default()
        };
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(projection.submittable);
        assert_eq!(projection.required, vec![Field::Option, Field::Method]);
    }

    #[test]
    fn test_partial_requires_amount_in_range() {
        let mut selection = PaymentSelection {
            option: Some(PaymentOption::Partial),
            method: Some(PaymentMethod::Check),
            ..Default::default()
        };

        let projection = FormProjection::derive(&selection, &invoice());
        assert!(!projection.submittable);
        assert!(projection.required.contains(&Field::PartialAmount));

        selection.partial_amount = Some(dec!(-5));
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(!projection.submittable);
        assert_eq!(projection.violations[0].field, Field::PartialAmount);

        selection.partial_amount = Some(dec!(2500.00));
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(!projection.submittable);

        selection.partial_amount = Some(dec!(40.00));
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(projection.submittable);
    }

    #[test]
    fn test_partial_amount_ignored_for_other_options() {
        // a stale out-of-range amount must not block full payment
        let selection = PaymentSelection {
            option: Some(PaymentOption::Full),
            partial_amount: Some(dec!(-5)),
            method: Some(PaymentMethod::Check),
            ..Default::default()
        };
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(projection.submittable);
        assert!(!projection.required.contains(&Field::PartialAmount));
    }

    #[test]
    fn test_disabled_card_is_excluded_from_enabled_set() {
        let mut invoice = invoice();
        invoice.card_enabled = false;
        let projection = FormProjection::derive(&PaymentSelection::default(), &invoice);
        assert!(!projection.enabled_methods.contains(&PaymentMethod::Card));
        assert!(projection.enabled_methods.contains(&PaymentMethod::Check));

        let selection = PaymentSelection {
            option: Some(PaymentOption::Full),
            method: Some(PaymentMethod::Card),
            ..Default::default()
        };
        let projection = FormProjection::derive(&selection, &invoice);
        assert!(!projection.submittable);
        assert_eq!(projection.violations[0].field, Field::Method);
    }

    #[test]
    fn test_message_length_limit() {
        let mut selection = PaymentSelection {
            option: Some(PaymentOption::Full),
            method: Some(PaymentMethod::Check),
            message: Some("a".repeat(MESSAGE_MAX_CHARS)),
            ..Default::default()
        };
        assert!(FormProjection::derive(&selection, &invoice()).submittable);

        selection.message = Some("a".repeat(MESSAGE_MAX_CHARS + 1));
        let projection = FormProjection::derive(&selection, &invoice());
        assert!(!projection.submittable);
        assert_eq!(projection.violations[0].field, Field::Message);
    }

    #[test]
    fn test_initial_selection_prefers_on_due_date_for_scheduled() {
        let mut invoice = invoice();
        invoice.status = InvoiceStatus::Scheduled;
        invoice.scheduled = Some(ScheduledPayment {
            method: PaymentMethod::Check,
            date: invoice.due_on,
        });
        let selection = initial_selection(&invoice);
        assert_eq!(selection.option, Some(PaymentOption::OnDueDate));
        assert_eq!(selection.method, Some(PaymentMethod::Check));
    }

    #[test]
    fn test_initial_selection_falls_back_to_full_for_early_schedule() {
        let mut invoice = invoice();
        invoice.scheduled = Some(ScheduledPayment {
            method: PaymentMethod::Card,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
        });
        let selection = initial_selection(&invoice);
        assert_eq!(selection.option, Some(PaymentOption::Full));
    }

    #[test]
    fn test_initial_selection_empty_without_schedule() {
        assert_eq!(initial_selection(&invoice()), PaymentSelection::default());
    }
}
