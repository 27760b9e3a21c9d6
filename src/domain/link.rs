use rust_decimal::Decimal;
use std::fmt;
use url::form_urlencoded;

pub const LINK_URL: &str = "https://www.paypal.com/cgi-bin/webscr?";
pub const LINK_URL_SANDBOX: &str = "https://www.sandbox.paypal.com/cgi-bin/webscr?";

const CMD_SINGLE_ITEM: &str = "_xclick";
const CMD_CART: &str = "_cart";

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    /// Rendered as `1` / `0`.
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Bool(b) => f.write_str(if *b { "1" } else { "0" }),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Named link parameters.
///
/// Overwriting a key keeps its original position, so rendered links stay
/// stable no matter how often a setter runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Form-encodes every parameter, e.g. `cmd=_xclick&currency_code=USD`.
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter().map(|(k, v)| (k, v.to_string())))
            .finish()
    }
}

/// Renders `base_url` followed by the encoded parameters.
///
/// `base_url` is expected to carry its own `?` (or `&`) separator.
pub fn render_url(base_url: &str, parameters: &ParameterSet) -> String {
    format!("{base_url}{}", parameters.to_query())
}

/// Accumulates the parameters of a PayPal Payments Standard link.
///
/// Nothing is validated: value lengths, option indices and currency codes are
/// passed through exactly as given, and PayPal rejects what it doesn't accept.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base_url: String,
    parameters: ParameterSet,
    is_shopping_cart: bool,
    item_index: u32,
    custom_options: u32,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(LINK_URL, false)
    }
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>, is_shopping_cart: bool) -> Self {
        let mut parameters = ParameterSet::new();
        parameters.set(
            "cmd",
            if is_shopping_cart {
                CMD_CART
            } else {
                CMD_SINGLE_ITEM
            },
        );
        parameters.set("currency_code", "USD");
        parameters.set("no_shipping", true);
        parameters.set("no_note", true);
        parameters.set("charset", "utf-8");

        Self {
            base_url: base_url.into(),
            parameters,
            is_shopping_cart,
            item_index: 1,
            custom_options: 0,
        }
    }

    /// A builder pointed at the sandbox checkout.
    pub fn sandbox(is_shopping_cart: bool) -> Self {
        Self::new(LINK_URL_SANDBOX, is_shopping_cart)
    }

    /// Sets the IPN listener URL PayPal will POST payment events to.
    ///
    /// With `instant_callback`, PayPal also calls `url` synchronously during
    /// checkout (in addition to the IPN), waiting `timeout_secs` for an answer.
    /// PayPal accepts 1-6 seconds and defaults to 3.
    pub fn set_callback(&mut self, url: &str, instant_callback: bool, timeout_secs: u8) -> &mut Self {
        self.parameters.set("notify_url", url);
        if instant_callback {
            self.parameters.set("callback_url", url);
            self.parameters.set("callback_timeout", i64::from(timeout_secs));
        }
        self
    }

    /// Where the buyer lands after a completed payment.
    pub fn set_success_url(&mut self, url: &str) -> &mut Self {
        self.parameters.set("return", url);
        self
    }

    /// Where the buyer lands after cancelling.
    pub fn set_fail_url(&mut self, url: &str) -> &mut Self {
        self.parameters.set("cancel_return", url);
        self
    }

    pub fn set_currency_code(&mut self, currency_code: &str) -> &mut Self {
        self.parameters.set("currency_code", currency_code);
        self
    }

    /// Pass-through value echoed back in the IPN `custom` field.
    pub fn set_custom(&mut self, custom: &str) -> &mut Self {
        self.parameters.set("custom", custom);
        self
    }

    /// Writes the `bn` build-notation code: `company[_service][_product][_country]`.
    ///
    /// Optional parts that are empty or `"0"` are left out, like absent ones.
    pub fn set_store_info(
        &mut self,
        company: &str,
        service: Option<&str>,
        product: Option<&str>,
        country: Option<&str>,
    ) -> &mut Self {
        let info = std::iter::once(company)
            .chain(
                [service, product, country]
                    .into_iter()
                    .flatten()
                    .filter(|part| !part.is_empty() && *part != "0"),
            )
            .collect::<Vec<_>>()
            .join("_");
        self.parameters.set("bn", info);
        self
    }

    /// Checkout page language, e.g. `en_GB`.
    pub fn set_language(&mut self, language: &str) -> &mut Self {
        self.parameters.set("lc", language);
        self
    }

    pub fn set_charset(&mut self, charset: &str) -> &mut Self {
        self.parameters.set("charset", charset);
        self
    }

    /// Writes `no_note` as given.
    pub fn set_note(&mut self, enable_note: bool) -> &mut Self {
        self.parameters.set("no_note", enable_note);
        self
    }

    /// Writes `no_shipping` as given.
    pub fn set_shipping(&mut self, enable_shipping: bool) -> &mut Self {
        self.parameters.set("no_shipping", enable_shipping);
        self
    }

    /// Receiver email or merchant ID.
    pub fn set_account(&mut self, account: &str) -> &mut Self {
        self.parameters.set("business", account);
        self.parameters.set("receiver_email", account);
        self
    }

    /// Names the whole cart.
    ///
    /// The first item's name gets an `ss` suffix. Existing integrations match
    /// on that value, so it stays until live traffic shows nobody relies on it.
    pub fn set_cart_name(&mut self, cart_name: &str) -> &mut Self {
        self.parameters.set("item_name", cart_name);
        self.parameters.set("item_name_1", format!("{cart_name}ss"));
        self
    }

    pub fn set_quantity(&mut self, quantity: u32) -> &mut Self {
        self.parameters.set("quantity", quantity);
        self.parameters.set("quantity_1", quantity);
        self
    }

    pub fn set_cart_amount(&mut self, amount: Decimal) -> &mut Self {
        self.parameters.set("amount", amount);
        self.parameters.set("amount_1", amount);
        self
    }

    /// Appends a cart item and returns its reference token (`"i1"`, `"i2"`, ...).
    pub fn add_item(&mut self, item_name: &str, quantity: u32, price: Decimal) -> String {
        let index = self.item_index;
        self.parameters.set("upload", 1i64);
        self.parameters.set(format!("item_name_{index}"), item_name);
        self.parameters.set(format!("amount_{index}"), price);
        self.parameters.set(format!("quantity_{index}"), quantity);
        self.item_index += 1;

        format!("i{index}")
    }

    /// Sets the `on<index>` / `os<index>` option pair.
    ///
    /// PayPal allows indices 0-6 and 64 characters per name or value; neither
    /// limit is checked here. `option_index` receives the number of calls made
    /// so far, not `index`.
    pub fn set_custom_parameter(
        &mut self,
        index: u8,
        parameter_name: &str,
        value: impl Into<ParamValue>,
    ) -> &mut Self {
        self.custom_options += 1;
        self.parameters.set(format!("on{index}"), parameter_name);
        self.parameters.set(format!("os{index}"), value);
        self.parameters.set("option_index", self.custom_options);
        self
    }

    /// Logo shown in the checkout header, 150x50px.
    pub fn set_image(&mut self, url: &str) -> &mut Self {
        self.parameters.set("image_url", url);
        self
    }

    /// Records the cart flag. `cmd` becomes `_cart` even when `false` is passed.
    pub fn set_shopping_cart(&mut self, is_shopping_cart: bool) -> &mut Self {
        self.is_shopping_cart = is_shopping_cart;
        self.parameters.set("cmd", CMD_CART);
        self
    }

    pub fn is_shopping_cart(&self) -> bool {
        self.is_shopping_cart
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// An owned copy of the parameters, detached from further setter calls.
    pub fn snapshot(&self) -> ParameterSet {
        self.parameters.clone()
    }

    pub fn to_url(&self) -> String {
        render_url(&self.base_url, &self.parameters)
    }
}

impl fmt::Display for LinkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}
