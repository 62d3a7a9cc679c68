use crate::domain::payment::{PaymentMethod, PaymentOption};
use rust_decimal::Decimal;
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;

/// One user action in a payment session, as read from a script or stdin.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Pin(String),
    Option(PaymentOption),
    Amount(Decimal),
    Method(PaymentMethod),
    Message(String),
    Submit,
    Back,
    Review,
    Confirm,
    Quit,
}

#[derive(Error, Debug)]
#[error("line {line}: {reason}")]
pub struct ParseEventError {
    pub line: usize,
    pub reason: String,
}

/// Reads session events from a newline-delimited source.
///
/// Wraps any `Read` source and yields events lazily, one per line. Blank
/// lines and `#` comments are skipped, so scripts can be annotated.
pub struct EventReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> EventReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    pub fn events(self) -> impl Iterator<Item = Result<SessionEvent, ParseEventError>> {
        self.reader
            .lines()
            .enumerate()
            .filter_map(|(index, line)| match line {
                Err(err) => Some(Err(ParseEventError {
                    line: index + 1,
                    reason: err.to_string(),
                })),
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() || text.starts_with('#') {
                        None
                    } else {
                        Some(parse_event(text).map_err(|reason| ParseEventError {
                            line: index + 1,
                            reason,
                        }))
                    }
                }
            })
    }
}

fn parse_event(text: &str) -> Result<SessionEvent, String> {
    let (command, rest) = match text.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (text, ""),
    };
    match command {
        "pin" => Ok(SessionEvent::Pin(rest.to_string())),
        "option" => PaymentOption::from_str(rest)
            .map(SessionEvent::Option)
            .ok_or_else(|| format!("unknown payment option: {rest}")),
        "amount" => rest
            .parse::<Decimal>()
            .map(SessionEvent::Amount)
            .map_err(|err| format!("bad amount: {err}")),
        "method" => PaymentMethod::from_str(rest)
            .map(SessionEvent::Method)
            .ok_or_else(|| format!("unknown payment method: {rest}")),
        "message" => Ok(SessionEvent::Message(rest.to_string())),
        "submit" => Ok(SessionEvent::Submit),
        "back" => Ok(SessionEvent::Back),
        "review" => Ok(SessionEvent::Review),
        "confirm" => Ok(SessionEvent::Confirm),
        "quit" => Ok(SessionEvent::Quit),
        other => Err(format!("unknown command: {other}")),
    }
}
