use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payportal::application::workflow::PaymentWorkflow;
use payportal::domain::ports::InvoiceServiceBox;
use payportal::infrastructure::http::HttpInvoiceService;
use payportal::infrastructure::in_memory::InMemoryInvoiceService;
use payportal::interfaces::script::{EventReader, ParseEventError, SessionEvent};
use payportal::interfaces::term::ScreenWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Invoice identifier from the payment link
    invoice_id: String,

    /// Backend base URL. Without it, a seeded in-memory store is used.
    #[arg(long)]
    base_url: Option<String>,

    /// Session script (newline-delimited events). Defaults to stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Artificial latency for the in-memory store, in milliseconds (demo only).
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let service: InvoiceServiceBox = match cli.base_url {
        Some(base_url) => Box::new(HttpInvoiceService::new(base_url)),
        None => {
            let mut store = InMemoryInvoiceService::with_demo_data();
            if let Some(ms) = cli.latency_ms {
                store = store.with_latency(Duration::from_millis(ms));
            }
            Box::new(store)
        }
    };

    let mut workflow = PaymentWorkflow::new(cli.invoice_id, service);

    let events: Box<dyn Iterator<Item = std::result::Result<SessionEvent, ParseEventError>>> =
        match cli.script {
            Some(path) => Box::new(EventReader::new(File::open(path).into_diagnostic()?).events()),
            None => Box::new(EventReader::new(io::stdin()).events()),
        };

    let stdout = io::stdout();
    let mut screen = ScreenWriter::new(stdout.lock());
    screen.write_stage(&workflow).into_diagnostic()?;

    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                eprintln!("Error reading event: {err}");
                continue;
            }
        };
        if event == SessionEvent::Quit {
            break;
        }
        if let Err(err) = apply_event(&mut workflow, event).await {
            eprintln!("Error: {err}");
        }
        screen.write_stage(&workflow).into_diagnostic()?;
    }

    Ok(())
}

async fn apply_event(
    workflow: &mut PaymentWorkflow,
    event: SessionEvent,
) -> payportal::error::Result<()> {
    match event {
        SessionEvent::Pin(pin) => workflow.submit_pin(&pin).await,
        SessionEvent::Option(option) => workflow.choose_option(option),
        SessionEvent::Amount(amount) => workflow.set_partial_amount(amount),
        SessionEvent::Method(method) => workflow.choose_method(method),
        SessionEvent::Message(text) => workflow.set_message(text),
        SessionEvent::Submit => workflow.submit_payment().await,
        SessionEvent::Back => workflow.go_back().await,
        SessionEvent::Review => workflow.open_review().await,
        SessionEvent::Confirm => workflow.open_confirmation(),
        SessionEvent::Quit => Ok(()),
    }
}
