mod common;

use common::{outstanding_invoice, store_with};
use payportal::application::workflow::{PaymentWorkflow, Stage};
use payportal::domain::payment::{PaymentMethod, PaymentOption};
use payportal::error::WorkflowError;
use payportal::infrastructure::in_memory::InMemoryInvoiceService;

#[tokio::test]
async fn test_confirmation_without_result_redirects_to_pin_entry() {
    let store = InMemoryInvoiceService::new();
    let mut workflow = PaymentWorkflow::new("1", Box::new(store));

    // deep link straight to the confirmation screen: silently bounced
    workflow.open_confirmation().unwrap();
    assert!(matches!(workflow.stage(), Stage::PinEntry { notice: None }));
}

#[tokio::test]
async fn test_review_without_credential_redirects_to_pin_entry() {
    let store = store_with(outstanding_invoice(), "123456").await;
    let mut workflow = PaymentWorkflow::new("1", Box::new(store));

    workflow.open_review().await.unwrap();
    assert!(matches!(workflow.stage(), Stage::PinEntry { notice: None }));
}

#[tokio::test]
async fn test_confirmation_survives_reopening_in_place() {
    let store = store_with(outstanding_invoice(), "123456").await;
    let mut workflow = PaymentWorkflow::new("1", Box::new(store));

    workflow.submit_pin("123456").await.unwrap();
    workflow.choose_option(PaymentOption::Full).unwrap();
    workflow.choose_method(PaymentMethod::Check).unwrap();
    workflow.submit_payment().await.unwrap();

    workflow.open_confirmation().unwrap();
    assert!(matches!(workflow.stage(), Stage::Confirmation { .. }));
}

#[tokio::test]
async fn test_revoked_credential_on_reentry_is_terminal() {
    let store = store_with(outstanding_invoice(), "123456").await;
    let mut workflow = PaymentWorkflow::new("1", Box::new(store.clone()));

    workflow.submit_pin("123456").await.unwrap();
    workflow.choose_option(PaymentOption::Full).unwrap();
    workflow.choose_method(PaymentMethod::Check).unwrap();
    workflow.submit_payment().await.unwrap();

    // the PIN changes out from under the session
    store.seed(outstanding_invoice(), "999999").await;

    let err = workflow.go_back().await.unwrap_err();
    assert!(matches!(err, WorkflowError::AccessDenied(_)));
    assert!(matches!(workflow.stage(), Stage::CannotAccess));

    // cannot-access only leads back to PIN entry
    workflow.go_back().await.unwrap();
    assert!(matches!(workflow.stage(), Stage::PinEntry { .. }));
}

#[tokio::test]
async fn test_fresh_workflow_always_starts_at_pin_entry() {
    let store = store_with(outstanding_invoice(), "123456").await;
    let mut first = PaymentWorkflow::new("1", Box::new(store.clone()));
    first.submit_pin("123456").await.unwrap();
    assert!(matches!(first.stage(), Stage::InvoiceReview { .. }));

    // no durable session: a new engine over the same store starts cold
    let second = PaymentWorkflow::new("1", Box::new(store));
    assert!(matches!(second.stage(), Stage::PinEntry { notice: None }));
}
