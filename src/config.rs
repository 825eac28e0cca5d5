//! Environment selection and configuration loading.
//!
//! The Crypto Pay API runs a testnet and a mainnet instance. [`Environment`]
//! picks one; [`Config`] reads the environment and the app token from the
//! process environment (and a `.env` file, if present).

use crate::errors::{CryptoPayError, Result};
use std::fmt;
use std::str::FromStr;

/// Base URL of the testnet API.
pub const TESTNET_BASE_URL: &str = "https://testnet-pay.crypt.bot/api/";

/// Base URL of the mainnet API.
pub const MAINNET_BASE_URL: &str = "https://pay.crypt.bot/api/";

/// Variable selecting the environment (`test` or `prod`).
pub const ENVIRONMENT_VAR: &str = "environment_type";

/// Variable holding the app token.
pub const TOKEN_VAR: &str = "token";

/// Which Crypto Pay instance to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Testnet (`@CryptoTestnetBot`)
    Test,
    /// Mainnet (`@CryptoBot`)
    Prod,
}

impl Environment {
    /// Returns the API base URL for this environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypto_pay::config::Environment;
    ///
    /// assert_eq!(Environment::Prod.base_url(), "https://pay.crypt.bot/api/");
    /// ```
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Test => TESTNET_BASE_URL,
            Environment::Prod => MAINNET_BASE_URL,
        }
    }

    /// Returns the name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Prod => "prod",
        }
    }
}

impl FromStr for Environment {
    type Err = CryptoPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "test" => Ok(Environment::Test),
            "prod" => Ok(Environment::Prod),
            other => Err(CryptoPayError::Config(format!(
                "unknown environment '{}', expected 'test' or 'prod'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings needed to build a [`CryptoPay`](crate::api::CryptoPay) client.
#[derive(Clone)]
pub struct Config {
    /// Selected API instance
    pub environment: Environment,

    /// App token issued by the Crypto Pay bot
    pub token: String,
}

impl Config {
    /// Creates a configuration from explicit values.
    pub fn new(environment: Environment, token: impl Into<String>) -> Self {
        Self {
            environment,
            token: token.into(),
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(CryptoPayError::Config(format!("failed to read .env: {}", e)));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup(ENVIRONMENT_VAR)
            .ok_or_else(|| CryptoPayError::Config(format!("{} is not set", ENVIRONMENT_VAR)))?
            .parse()?;

        let token = lookup(TOKEN_VAR)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CryptoPayError::Config(format!("{} is not set", TOKEN_VAR)))?;

        Ok(Self { environment, token })
    }

    /// Returns the API base URL for the configured environment.
    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("token", &"<redacted>")
            .finish()
    }
}
