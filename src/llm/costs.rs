//! Per-token pricing for known Gemini models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const PER_MILLION: Decimal = dec!(1000000);

/// (input, output) USD per token for `model`, falling back to flash pricing.
pub fn model_cost(model: &str) -> (Decimal, Decimal) {
    let (input, output) = if model.contains("pro") {
        (dec!(2.00), dec!(12.00))
    } else if model.contains("flash-lite") {
        (dec!(0.10), dec!(0.40))
    } else {
        (dec!(0.50), dec!(3.00))
    };
    (input / PER_MILLION, output / PER_MILLION)
}

/// Total cost of a call given token counts.
pub fn call_cost(per_token: (Decimal, Decimal), input_tokens: u32, output_tokens: u32) -> Decimal {
    per_token.0 * Decimal::from(input_tokens) + per_token.1 * Decimal::from(output_tokens)
}
