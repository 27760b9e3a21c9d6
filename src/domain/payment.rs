use super::callback::CallbackFields;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Value of a text accessor whose field is missing from the notification.
pub const MISSING_FIELD: &str = "null";

const OPTION_NAME_PREFIX: &str = "option_name";
const OPTION_VALUE_PREFIX: &str = "option_value";

/// Typed view over the fields of a notification PayPal has confirmed.
///
/// Only [`NotificationVerifier`](crate::application::verifier::NotificationVerifier)
/// hands these out after a successful round-trip, but construction itself never
/// fails: every accessor has a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedPayment {
    gross: Decimal,
    currency: String,
    custom: String,
    payer_email: String,
    options: BTreeMap<String, String>,
    raw_data: CallbackFields,
}

impl VerifiedPayment {
    pub fn new(raw_data: CallbackFields) -> Self {
        let gross = raw_data
            .get("mc_gross")
            .map(parse_amount)
            .unwrap_or(Decimal::ZERO);
        let text = |name: &str| raw_data.get(name).unwrap_or(MISSING_FIELD).to_string();

        Self {
            gross,
            currency: text("mc_currency"),
            custom: text("custom"),
            payer_email: text("payer_email"),
            options: collect_options(&raw_data),
            raw_data,
        }
    }

    /// `mc_gross`, or zero.
    pub fn gross(&self) -> Decimal {
        self.gross
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// The opaque tracking token the merchant passed through the payment link.
    pub fn custom(&self) -> &str {
        &self.custom
    }

    pub fn payer_email(&self) -> &str {
        &self.payer_email
    }

    /// Looks up a buyer-selected option by its name, e.g. `"color"`.
    pub fn custom_parameter(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn custom_parameters(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn raw_data(&self) -> &CallbackFields {
        &self.raw_data
    }
}

/// Pairs every `option_nameN` field with its `option_valueN` sibling.
///
/// The name field's value becomes the key. Names without a sibling are dropped.
fn collect_options(fields: &CallbackFields) -> BTreeMap<String, String> {
    fields
        .iter()
        .filter(|(key, _)| key.starts_with(OPTION_NAME_PREFIX))
        .filter_map(|(key, option)| {
            let paired = key.replace(OPTION_NAME_PREFIX, OPTION_VALUE_PREFIX);
            fields
                .get(&paired)
                .map(|value| (option.to_string(), value.to_string()))
        })
        .collect()
}

/// Reads the longest numeric prefix of `raw`, with an optional exponent
/// (`1.5e2`), falling back to zero when there is none.
///
/// Magnitudes beyond `Decimal`'s range saturate to `Decimal::MAX` / `Decimal::MIN`
/// and digits past its 28-digit precision are rounded away. PayPal always
/// sends plain decimals; this only shapes what a malformed callback yields.
fn parse_amount(raw: &str) -> Decimal {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let at = |i: usize| bytes.get(i).copied();
    let skip_digits = |mut i: usize| {
        while at(i).is_some_and(|b| b.is_ascii_digit()) {
            i += 1;
        }
        i
    };

    let negative = at(0) == Some(b'-');
    let sign_len = usize::from(matches!(at(0), Some(b'+' | b'-')));
    let mut end = skip_digits(sign_len);
    if at(end) == Some(b'.') {
        end = skip_digits(end + 1);
    }
    let Some(mantissa) = raw.get(..end) else {
        return Decimal::ZERO;
    };
    if !mantissa.bytes().any(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    let mut exponent = 0i64;
    if matches!(at(end), Some(b'e' | b'E')) {
        let exp_sign_len = usize::from(matches!(at(end + 1), Some(b'+' | b'-')));
        let exp_end = skip_digits(end + 1 + exp_sign_len);
        if exp_end > end + 1 + exp_sign_len
            && let Some(digits) = raw.get(end + 1..exp_end)
        {
            let exp_negative = digits.starts_with('-');
            exponent = digits
                .parse()
                .unwrap_or(if exp_negative { i64::MIN } else { i64::MAX });
        }
    }

    let saturated = if negative { Decimal::MIN } else { Decimal::MAX };
    match Decimal::from_str(mantissa.trim_end_matches('.')) {
        Ok(value) => scale_by_power_of_ten(value, exponent).unwrap_or(saturated),
        // The prefix is well-formed, so the only failure left is overflow.
        Err(_) => saturated,
    }
}

/// `value * 10^exponent`, or `None` on overflow. Underflow rounds to zero.
fn scale_by_power_of_ten(mut value: Decimal, exponent: i64) -> Option<Decimal> {
    // Past 64 steps any non-zero value has overflowed or rounded to zero.
    for _ in 0..exponent.unsigned_abs().min(64) {
        if value.is_zero() {
            break;
        }
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN).unwrap_or(Decimal::ZERO)
        };
    }
    Some(value)
}
