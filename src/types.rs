//! Core type definitions for the Crypto Pay API.
//!
//! This module contains the records returned by the API (invoices and
//! transfers), the enumerated codes the API understands, and the parameter
//! records accepted by the typed methods of [`CryptoPay`](crate::api::CryptoPay).

use crate::errors::{CryptoPayError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $code)] $variant),+
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the code the API uses for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CryptoPayError;

            fn from_str(s: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| {
                        CryptoPayError::InvalidCode(format!("{} '{}'", stringify!($name), s))
                    })
            }
        }
    };
}

code_enum! {
    /// Currency codes supported by the API.
    ///
    /// `ETH` is available on testnet only.
    Asset {
        /// Bitcoin
        Btc => "BTC",
        /// Toncoin
        Ton => "TON",
        /// Ether (testnet only)
        Eth => "ETH",
        /// Tether
        Usdt => "USDT",
        /// USD Coin
        Usdc => "USDC",
        /// Binance USD
        Busd => "BUSD",
    }
}

code_enum! {
    /// Button shown to the payer once an invoice is paid.
    Button {
        /// "View Item"
        ViewItem => "viewItem",
        /// "Open Channel"
        OpenChannel => "openChannel",
        /// "Open Bot"
        OpenBot => "openBot",
        /// "Return"
        Callback => "callback",
    }
}

code_enum! {
    /// Invoice status used to filter [`get_invoices`](crate::api::CryptoPay::get_invoices).
    Status {
        /// Awaiting payment
        Active => "active",
        /// Paid
        Paid => "paid",
    }
}

code_enum! {
    /// Status of an [`Invoice`].
    InvoiceStatus {
        /// Awaiting payment
        Active => "active",
        /// Paid
        Paid => "paid",
        /// Expired before payment
        Expired => "expired",
    }
}

code_enum! {
    /// Status of a [`Transfer`].
    TransferStatus {
        /// The transfer went through
        Completed => "completed",
    }
}

/// A code read from a response.
///
/// Requests only take the closed enums, but the server may return codes this
/// crate does not know yet (a newly listed asset, say). Those are kept as
/// [`Code::Unknown`] instead of failing the whole record.
///
/// # Examples
///
/// ```
/// use crypto_pay::types::{Asset, Code};
///
/// let known: Code<Asset> = serde_json::from_str("\"TON\"").unwrap();
/// assert_eq!(known, Asset::Ton);
///
/// let new: Code<Asset> = serde_json::from_str("\"LTC\"").unwrap();
/// assert_eq!(new, Code::Unknown("LTC".to_string()));
/// assert_eq!(new.to_string(), "LTC");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Code<T> {
    /// A code this crate knows
    Known(T),
    /// Any other code, verbatim
    Unknown(String),
}

impl<T: Copy> Code<T> {
    /// Returns the known value, if any.
    pub fn known(&self) -> Option<T> {
        match self {
            Code::Known(value) => Some(*value),
            Code::Unknown(_) => None,
        }
    }
}

impl<T: FromStr> Code<T> {
    fn parse(raw: String) -> Self {
        match raw.parse() {
            Ok(value) => Code::Known(value),
            Err(_) => Code::Unknown(raw),
        }
    }
}

impl<T> From<T> for Code<T> {
    fn from(value: T) -> Self {
        Code::Known(value)
    }
}

impl<T: PartialEq> PartialEq<T> for Code<T> {
    fn eq(&self, other: &T) -> bool {
        matches!(self, Code::Known(value) if value == other)
    }
}

impl<T: fmt::Display> fmt::Display for Code<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Code::Known(value) => value.fmt(f),
            Code::Unknown(raw) => f.write_str(raw),
        }
    }
}

impl<T: fmt::Display> Serialize for Code<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de, T: FromStr> Deserialize<'de> for Code<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Code::parse)
    }
}

/// An invoice created through the API.
///
/// # Examples
///
/// ```
/// use crypto_pay::types::{Asset, Invoice, InvoiceStatus};
/// use serde_json::json;
///
/// let invoice: Invoice = serde_json::from_value(json!({
///     "invoice_id": 528,
///     "status": "active",
///     "hash": "IVcKhSGh244v",
///     "asset": "TON",
///     "amount": "1.5",
///     "pay_url": "https://t.me/CryptoTestnetBot?start=IVcKhSGh244v",
///     "created_at": "2022-06-01T10:00:00.000Z",
///     "allow_comments": true,
///     "allow_anonymous": true
/// })).unwrap();
///
/// assert_eq!(invoice.asset, Asset::Ton);
/// assert_eq!(invoice.status, InvoiceStatus::Active);
/// assert!(invoice.description.is_none());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Invoice {
    /// Unique ID for this invoice
    pub invoice_id: i64,

    /// Status of the invoice
    pub status: Code<InvoiceStatus>,

    /// Hash of the invoice
    pub hash: String,

    /// Currency code
    pub asset: Code<Asset>,

    /// Amount of the invoice, as a decimal string
    pub amount: String,

    /// URL the payer should open to pay the invoice
    pub pay_url: String,

    /// Description shown to the payer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation date in ISO 8601 format
    pub created_at: String,

    /// Whether the payer can add a comment
    pub allow_comments: bool,

    /// Whether the invoice can be paid anonymously
    pub allow_anonymous: bool,

    /// Expiration date in ISO 8601 format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Payment date in ISO 8601 format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,

    /// Whether the invoice was paid anonymously
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_anonymously: Option<bool>,

    /// Comment left by the payer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Message shown to the payer after payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_message: Option<String>,

    /// Data attached when the invoice was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,

    /// Button shown after payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_name: Option<Code<Button>>,

    /// URL opened by the paid button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_url: Option<String>,
}

impl Invoice {
    /// Returns true once the invoice has been paid.
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Parses `created_at`. Returns `None` if the server sent an unexpected format.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parses `paid_at`, if present.
    pub fn paid_at_utc(&self) -> Option<DateTime<Utc>> {
        self.paid_at.as_deref().and_then(parse_timestamp)
    }
}

/// A completed transfer from the app balance to a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transfer {
    /// Unique ID for this transfer
    pub transfer_id: i64,

    /// Telegram user ID the transfer was sent to
    #[serde(deserialize_with = "crate::utils::string_or_number")]
    pub user_id: String,

    /// Currency code
    pub asset: Code<Asset>,

    /// Amount of the transfer, as a decimal string
    pub amount: String,

    /// Status of the transfer
    pub status: Code<TransferStatus>,

    /// Completion date in ISO 8601 format
    pub completed_at: String,

    /// Comment sent along with the transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Transfer {
    /// Parses `completed_at`.
    pub fn completed_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.completed_at)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Parameters of `createInvoice`.
///
/// # Examples
///
/// ```
/// use crypto_pay::types::{Asset, Button, CreateInvoice};
///
/// let request = CreateInvoice::new(Asset::Ton, "1.5")
///     .with_description("Coffee")
///     .with_paid_button(Button::ViewItem, "https://example.com/receipt");
///
/// assert_eq!(request.paid_btn_name, Some(Button::ViewItem));
/// ```
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CreateInvoice {
    /// Currency code
    pub asset: Asset,

    /// Amount as a decimal string, e.g. "125.50"
    pub amount: String,

    /// Shown to the payer, up to 1024 characters
    pub description: Option<String>,

    /// Shown to the payer after payment, up to 2048 characters
    pub hidden_message: Option<String>,

    /// Button shown after payment
    pub paid_btn_name: Option<Button>,

    /// URL for the paid button; required when `paid_btn_name` is set
    pub paid_btn_url: Option<String>,

    /// Any data to attach, up to 4kb
    pub payload: Option<String>,

    /// Allow the payer to add a comment (server default: true)
    pub allow_comments: Option<bool>,

    /// Allow anonymous payment (server default: true)
    pub allow_anonymous: Option<bool>,

    /// Payment time limit in seconds, 1 to 2678400
    pub expires_in: Option<u32>,
}

impl CreateInvoice {
    /// Creates the request with the two required parameters.
    pub fn new(asset: Asset, amount: impl Into<String>) -> Self {
        Self {
            asset,
            amount: amount.into(),
            description: None,
            hidden_message: None,
            paid_btn_name: None,
            paid_btn_url: None,
            payload: None,
            allow_comments: None,
            allow_anonymous: None,
            expires_in: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the hidden message.
    pub fn with_hidden_message(mut self, message: impl Into<String>) -> Self {
        self.hidden_message = Some(message.into());
        self
    }

    /// Sets the paid button and its URL.
    pub fn with_paid_button(mut self, name: Button, url: impl Into<String>) -> Self {
        self.paid_btn_name = Some(name);
        self.paid_btn_url = Some(url.into());
        self
    }

    /// Sets the payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets whether comments are allowed.
    ///
    /// `false` is dropped before sending; see [`normalize_params`](crate::client::normalize_params).
    pub fn with_allow_comments(mut self, allow: bool) -> Self {
        self.allow_comments = Some(allow);
        self
    }

    /// Sets whether anonymous payment is allowed.
    ///
    /// `false` is dropped before sending; see [`normalize_params`](crate::client::normalize_params).
    pub fn with_allow_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = Some(allow);
        self
    }

    /// Sets the payment time limit in seconds.
    pub fn with_expires_in(mut self, seconds: u32) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

/// Parameters of `transfer`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Telegram user ID of the recipient
    pub user_id: String,

    /// Currency code
    pub asset: Asset,

    /// Amount as a decimal string
    pub amount: String,

    /// Idempotency key, up to 64 characters
    pub spend_id: String,

    /// Shown to the recipient, up to 1024 characters
    pub comment: Option<String>,

    /// Suppress the notification to the recipient
    pub disable_send_notification: Option<bool>,
}

impl TransferRequest {
    /// Creates the request with the four required parameters.
    ///
    /// See [`generate_spend_id`](crate::utils::generate_spend_id) for a ready-made `spend_id`.
    pub fn new(
        user_id: impl Into<String>,
        asset: Asset,
        amount: impl Into<String>,
        spend_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            asset,
            amount: amount.into(),
            spend_id: spend_id.into(),
            comment: None,
            disable_send_notification: None,
        }
    }

    /// Sets the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Suppresses the recipient notification.
    pub fn without_notification(mut self) -> Self {
        self.disable_send_notification = Some(true);
        self
    }
}

/// Parameters of `getInvoices`. Every field is optional.
///
/// List fields go over the wire comma separated.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct GetInvoices {
    /// Only invoices in these currencies (all when empty)
    #[serde(rename = "asset")]
    pub assets: Vec<Asset>,

    /// Only these invoice IDs
    pub invoice_ids: Vec<i64>,

    /// Only invoices with this status
    pub status: Option<Status>,

    /// Offset into the result set
    pub offset: Option<u32>,

    /// Number of invoices to return, 1 to 1000
    pub count: Option<u32>,
}

impl GetInvoices {
    /// Creates an unfiltered request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a currency to the filter.
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Restricts the result to the given invoice IDs.
    pub fn with_invoice_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.invoice_ids.extend(ids);
        self
    }

    /// Restricts the result to one status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the page size.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }
}
