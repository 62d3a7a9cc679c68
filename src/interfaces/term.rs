use crate::application::workflow::{PaymentWorkflow, Stage};
use crate::domain::fees;
use crate::domain::form::Field;
use rust_decimal::Decimal;
use std::io::{self, Write};

/// Renders the current workflow stage as a plain-text screen.
pub struct ScreenWriter<W: Write> {
    out: W,
}

impl<W: Write> ScreenWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_stage(&mut self, workflow: &PaymentWorkflow) -> io::Result<()> {
        match workflow.stage() {
            Stage::PinEntry { notice } => self.write_pin_entry(workflow, notice.as_deref()),
            Stage::InvoiceReview {
                invoice, banner, ..
            } => self.write_review(workflow, invoice, banner.as_deref()),
            Stage::CannotAccess => self.write_cannot_access(),
            Stage::Confirmation { result } => self.write_confirmation(result),
        }
    }

    fn write_pin_entry(
        &mut self,
        workflow: &PaymentWorkflow,
        notice: Option<&str>,
    ) -> io::Result<()> {
        writeln!(self.out, "== PIN entry ==")?;
        writeln!(self.out, "invoice: {}", workflow.invoice_id())?;
        if let Some(notice) = notice {
            writeln!(self.out, "! {notice}")?;
        }
        if workflow.verify_in_flight() {
            writeln!(self.out, "(verifying...)")?;
        } else {
            writeln!(self.out, "enter `pin <6 digits>` to continue")?;
        }
        Ok(())
    }

    fn write_review(
        &mut self,
        workflow: &PaymentWorkflow,
        invoice: &crate::domain::invoice::Invoice,
        banner: Option<&str>,
    ) -> io::Result<()> {
        writeln!(self.out, "== Invoice {} ==", invoice.number)?;
        writeln!(self.out, "customer:   {}", invoice.customer)?;
        writeln!(self.out, "issued:     {}", invoice.issued_on)?;
        writeln!(self.out, "due:        {}", invoice.due_on)?;
        writeln!(self.out, "amount due: {}", money(invoice.amount_due))?;
        writeln!(self.out, "status:     {}", invoice.status)?;
        if let Some(scheduled) = &invoice.scheduled {
            writeln!(
                self.out,
                "scheduled:  {} on {}",
                scheduled.method.label(),
                scheduled.date
            )?;
        }
        if let Some(banner) = banner {
            writeln!(self.out, "! {banner}")?;
        }

        if let Some(form) = workflow.form() {
            let methods: Vec<&str> = form.enabled_methods.iter().map(|m| m.as_str()).collect();
            writeln!(self.out, "methods:    {}", methods.join(", "))?;
            let required: Vec<&str> = form.required.iter().map(|f| field_name(*f)).collect();
            writeln!(self.out, "required:   {}", required.join(", "))?;
            for violation in &form.violations {
                writeln!(
                    self.out,
                    "! {}: {}",
                    field_name(violation.field),
                    violation.reason
                )?;
            }
            if let Some(quote) = workflow.quote() {
                writeln!(
                    self.out,
                    "quote:      {} + {} fee = {}",
                    money(quote.base),
                    money(quote.surcharge),
                    money(quote.total)
                )?;
            }
            let state = if workflow.submit_in_flight() {
                "(submitting...)"
            } else if form.submittable {
                "ready to submit"
            } else {
                "form incomplete"
            };
            writeln!(self.out, "{state}")?;
        }
        Ok(())
    }

    fn write_cannot_access(&mut self) -> io::Result<()> {
        writeln!(self.out, "== Cannot access ==")?;
        writeln!(self.out, "This invoice can no longer be accessed.")
    }

    fn write_confirmation(
        &mut self,
        result: &crate::domain::payment::PaymentResult,
    ) -> io::Result<()> {
        writeln!(self.out, "== Payment confirmation ==")?;
        writeln!(self.out, "invoice:     {}", result.invoice_number)?;
        writeln!(self.out, "customer:    {}", result.customer)?;
        writeln!(self.out, "option:      {}", result.option)?;
        writeln!(self.out, "method:      {}", result.method)?;
        writeln!(self.out, "amount:      {}", money(result.amount))?;
        writeln!(self.out, "fee:         {}", money(result.fee))?;
        writeln!(self.out, "total:       {}", money(result.total))?;
        writeln!(self.out, "date:        {}", result.transaction_date)?;
        writeln!(
            self.out,
            "transaction: {}",
            result.transaction_id.as_deref().unwrap_or("-")
        )?;
        Ok(())
    }
}

fn field_name(field: Field) -> &'static str {
    match field {
        Field::Option => "option",
        Field::PartialAmount => "amount",
        Field::Method => "method",
        Field::Message => "message",
    }
}

fn money(value: Decimal) -> String {
    format!("{:.2}", fees::round_currency(value))
}
