use super::payment::{PaymentMethod, PaymentQuote};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Fallback card rate, applied only when the backend does not supply a
/// per-invoice rate on the invoice record.
pub const FALLBACK_CARD_RATE: Decimal = dec!(0.029);

/// Rounds a monetary value to cents, half away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Quotes the surcharge and total for paying `base` with `method`.
///
/// Card payments carry a percentage surcharge; bank debit and check are free.
/// Pure and synchronous: this runs on every selection change to drive live
/// feedback, so it must never touch the network.
pub fn quote(base: Decimal, method: PaymentMethod, card_rate: Option<Decimal>) -> PaymentQuote {
    let surcharge = match method {
        PaymentMethod::Card => {
            let rate = card_rate.unwrap_or(FALLBACK_CARD_RATE);
            round_currency(base * rate)
        }
        PaymentMethod::BankDebit | PaymentMethod::Check => Decimal::ZERO,
    };
    PaymentQuote {
        base,
        surcharge,
        total: round_currency(base + surcharge),
    }
}
