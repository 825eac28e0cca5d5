//! Example Crypto Pay client.
//!
//! Checks the app token and prints the app info, balance and exchange rates.
//!
//! Run with:
//! ```bash
//! cargo run --example get_me
//! ```
//!
//! Environment variables (a `.env` file works too):
//! - environment_type: `test` or `prod`
//! - token: Your app token from @CryptoBot / @CryptoTestnetBot

use crypto_pay::CryptoPay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let api = CryptoPay::from_env()?;

    println!("🔐 Crypto Pay Example Client");
    println!();

    match api.get_me().await {
        Ok(me) => {
            println!("✅ Token accepted");
            println!("{}", serde_json::to_string_pretty(&me)?);
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            return Err(e.into());
        }
    }

    println!("\n💰 Balance:");
    println!("{}", serde_json::to_string_pretty(&api.get_balance().await?)?);

    // Methods without a typed wrapper are reachable by name
    let stats = api.method("get_stats").call(&serde_json::json!({})).await;
    match stats {
        Ok(stats) => println!("\n📊 Stats:\n{}", serde_json::to_string_pretty(&stats)?),
        Err(e) => println!("\n📊 Stats unavailable: {}", e),
    }

    println!("\n✨ Done!");
    Ok(())
}
