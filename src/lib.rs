//! # crypto-pay-rs
//!
//! A typed Rust client for the [Crypto Pay](https://help.crypt.bot/crypto-pay-api) API,
//! the payment API of the Telegram `@CryptoBot`.
//!
//! ## Features
//!
//! - **Typed methods**: invoices and transfers decode into plain Rust records
//! - **Raw methods**: balance, exchange rates and currencies are returned as JSON
//! - **Any method**: operations without a wrapper are reachable by name
//! - **Pluggable transport**: the facade talks to a [`Transport`] trait object
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crypto_pay::{CryptoPay, Environment};
//! use crypto_pay::types::{Asset, CreateInvoice, GetInvoices, Status};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = CryptoPay::new("1234:AAAAAAA", Environment::Test)?;
//!
//! let invoice = api.create_invoice(&CreateInvoice::new(Asset::Usdt, "9.99")).await?;
//! println!("Pay at {}", invoice.pay_url);
//!
//! let paid = api
//!     .get_invoices(&GetInvoices::new().with_status(Status::Paid))
//!     .await?;
//! println!("{} paid invoices", paid.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocol Overview
//!
//! 1. Every method is an HTTP GET to `<base_url><methodName>`
//! 2. The app token travels in the `Crypto-Pay-API-Token` header
//! 3. Parameters go in the query string; empty values (`""`, `0`, `false`,
//!    `null`) are left out
//! 4. Responses are wrapped as `{"ok": true, "result": ...}` or
//!    `{"ok": false, "error": ...}`
//!
//! ## Errors
//!
//! Nothing is retried. Every failure surfaces as a [`CryptoPayError`] whose
//! [`kind`](CryptoPayError::kind) tells transport failures, API rejections and
//! decode failures apart.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use api::{CryptoPay, RemoteMethod};
pub use client::{ApiClient, Params, Transport};
pub use config::{Config, Environment};
pub use errors::{CryptoPayError, ErrorKind, Result};
pub use types::{
    Asset, Button, Code, CreateInvoice, GetInvoices, Invoice, InvoiceStatus, Status, Transfer,
    TransferRequest, TransferStatus,
};
