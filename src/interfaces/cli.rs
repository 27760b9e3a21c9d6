use crate::config::{DEFAULT_TIMEOUT, VerifierConfig};
use crate::domain::link::{LINK_URL, LINK_URL_SANDBOX, LinkBuilder};
use crate::error::PaypalError;
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a PayPal payment link
    Link(LinkArgs),
    /// Verify a raw IPN body with PayPal and print the payment as JSON
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Default)]
pub struct LinkArgs {
    /// Build a multi-item cart link
    #[arg(long)]
    pub cart: bool,

    /// Target the sandbox checkout
    #[arg(long)]
    pub sandbox: bool,

    /// Checkout URL including the trailing `?`. Overrides --sandbox.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Receiver email or merchant ID
    #[arg(long)]
    pub account: Option<String>,

    #[arg(long)]
    pub currency: Option<String>,

    /// Pass-through value returned in the IPN `custom` field
    #[arg(long)]
    pub custom: Option<String>,

    /// IPN listener URL
    #[arg(long)]
    pub notify_url: Option<String>,

    #[arg(long)]
    pub return_url: Option<String>,

    #[arg(long)]
    pub cancel_url: Option<String>,

    /// Cart item as NAME:QUANTITY:PRICE (repeatable)
    #[arg(long = "item")]
    pub items: Vec<ItemSpec>,
}

impl LinkArgs {
    pub fn into_builder(self) -> LinkBuilder {
        let base_url = self.base_url.unwrap_or_else(|| {
            if self.sandbox {
                LINK_URL_SANDBOX
            } else {
                LINK_URL
            }
            .to_string()
        });

        let mut builder = LinkBuilder::new(base_url, self.cart);
        if let Some(account) = &self.account {
            builder.set_account(account);
        }
        if let Some(currency) = &self.currency {
            builder.set_currency_code(currency);
        }
        if let Some(custom) = &self.custom {
            builder.set_custom(custom);
        }
        if let Some(url) = &self.notify_url {
            builder.set_callback(url, false, 3);
        }
        if let Some(url) = &self.return_url {
            builder.set_success_url(url);
        }
        if let Some(url) = &self.cancel_url {
            builder.set_fail_url(url);
        }
        for item in &self.items {
            builder.add_item(&item.name, item.quantity, item.price);
        }
        builder
    }
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File holding the raw form-encoded IPN body. Reads stdin when omitted.
    pub input: Option<PathBuf>,

    /// Peer address the notification was received from
    #[arg(long)]
    pub remote_addr: IpAddr,

    /// Verify against the sandbox endpoint. The env var accepts 1/0, true/false, yes/no, on/off.
    #[arg(long, env = "PAYPAL_SANDBOX", value_parser = BoolishValueParser::new())]
    pub sandbox: bool,

    /// Verification request timeout in seconds
    #[arg(long, env = "PAYPAL_IPN_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl VerifyArgs {
    pub fn config(&self) -> VerifierConfig {
        VerifierConfig {
            sandbox: self.sandbox,
            ..VerifierConfig::default()
        }
        .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

/// One `--item NAME:QUANTITY:PRICE` argument.
///
/// Split from the right, so item names may contain `:`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl FromStr for ItemSpec {
    type Err = PaypalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            PaypalError::InvalidInput(format!("item '{s}': {reason}, expected NAME:QUANTITY:PRICE"))
        };

        let mut parts = s.rsplitn(3, ':');
        let price = parts.next().ok_or_else(|| invalid("missing price"))?;
        let quantity = parts.next().ok_or_else(|| invalid("missing quantity"))?;
        let name = parts.next().ok_or_else(|| invalid("missing name"))?;

        Ok(Self {
            name: name.to_string(),
            quantity: quantity
                .trim()
                .parse()
                .map_err(|_| invalid("quantity is not a whole number"))?,
            price: Decimal::from_str(price.trim()).map_err(|_| invalid("price is not a decimal"))?,
        })
    }
}
