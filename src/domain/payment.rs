use chrono::NaiveDate;
use rust_decimal::Decimal;

/// How much of the invoice the customer wants to pay, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOption {
    Full,
    Partial,
    OnDueDate,
}

impl PaymentOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOption::Full => "full",
            PaymentOption::Partial => "partial",
            PaymentOption::OnDueDate => "on_due_date",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "full" => Some(PaymentOption::Full),
            "partial" => Some(PaymentOption::Partial),
            "on_due_date" => Some(PaymentOption::OnDueDate),
            _ => None,
        }
    }

    /// Human-readable label used on receipts and screens.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentOption::Full => "Pay in full",
            PaymentOption::Partial => "Partial payment",
            PaymentOption::OnDueDate => "Pay on due date",
        }
    }
}

impl std::fmt::Display for PaymentOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    BankDebit,
    Check,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::BankDebit => "bank_debit",
            PaymentMethod::Check => "check",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "card" => Some(PaymentMethod::Card),
            "bank_debit" => Some(PaymentMethod::BankDebit),
            "check" => Some(PaymentMethod::Check),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit card",
            PaymentMethod::BankDebit => "Bank debit",
            PaymentMethod::Check => "Check",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The customer's in-progress choices on the payment form.
///
/// Fields stay optional until chosen; `partial_amount` is only meaningful
/// while `option` is `Partial` and may hold an out-of-range value the form
/// projection will flag. One selection lives for one review session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentSelection {
    pub option: Option<PaymentOption>,
    pub partial_amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub message: Option<String>,
}

/// Derived per selection change, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentQuote {
    pub base: Decimal,
    pub surcharge: Decimal,
    pub total: Decimal,
}

/// Server-confirmed outcome of a submission.
///
/// Created only from a successful update response, never mutated, and held
/// only for the confirmation screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentResult {
    pub invoice_number: String,
    pub customer: String,
    pub option: String,
    pub method: String,
    pub amount: Decimal,
    pub fee: Decimal,
    pub total: Decimal,
    pub transaction_date: NaiveDate,
    pub transaction_id: Option<String>,
    pub success: bool,
}
