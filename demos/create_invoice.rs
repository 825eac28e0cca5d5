//! Example invoice flow.
//!
//! Creates an invoice and then lists the app's active invoices.
//!
//! Run with:
//! ```bash
//! cargo run --example create_invoice
//! ```
//!
//! Environment variables (a `.env` file works too):
//! - environment_type: `test` or `prod`
//! - token: Your app token
//! - AMOUNT: Invoice amount in TON (default: 1)

use crypto_pay::types::{Asset, Button, CreateInvoice, GetInvoices, Status};
use crypto_pay::CryptoPay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let api = CryptoPay::from_env()?;

    let amount = std::env::var("AMOUNT").unwrap_or_else(|_| "1".to_string());

    println!("🧾 Creating invoice for {} TON...", amount);

    let request = CreateInvoice::new(Asset::Ton, amount)
        .with_description("Example purchase")
        .with_paid_button(Button::ViewItem, "https://example.com/receipt")
        .with_expires_in(3600);

    let invoice = api.create_invoice(&request).await?;
    println!("✅ Invoice #{} created", invoice.invoice_id);
    println!("   Pay URL: {}", invoice.pay_url);

    let active = api
        .get_invoices(&GetInvoices::new().with_status(Status::Active).with_count(10))
        .await?;

    println!("\n📋 Active invoices:");
    for invoice in active {
        println!(
            "   #{} {} {} ({})",
            invoice.invoice_id, invoice.amount, invoice.asset, invoice.created_at
        );
    }

    println!("\n✨ Done!");
    Ok(())
}
