//! Typed facade over the Crypto Pay API.
//!
//! [`CryptoPay`] has one method per known API operation. Operations without a
//! dedicated wrapper are reachable through [`CryptoPay::call`] or
//! [`CryptoPay::method`].

use crate::client::{to_params, ApiClient, Params, Transport};
use crate::config::{Config, Environment};
use crate::errors::{CryptoPayError, Result};
use crate::types::{CreateInvoice, GetInvoices, Invoice, Transfer, TransferRequest};
use crate::utils::to_camel_case;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Crypto Pay API client.
///
/// Cheap to clone; clones share the underlying transport.
///
/// # Examples
///
/// ```no_run
/// use crypto_pay::api::CryptoPay;
/// use crypto_pay::config::Environment;
/// use crypto_pay::types::{Asset, CreateInvoice};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let api = CryptoPay::new("1234:AAA", Environment::Test)?;
///
/// let invoice = api
///     .create_invoice(&CreateInvoice::new(Asset::Ton, "1.5").with_description("Coffee"))
///     .await?;
/// println!("Pay here: {}", invoice.pay_url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CryptoPay {
    client: Arc<dyn Transport>,
}

impl CryptoPay {
    /// Creates a client for one of the public API instances.
    pub fn new(token: &str, environment: Environment) -> Result<Self> {
        Self::with_base_url(token, environment.base_url())
    }

    /// Creates a client for an arbitrary base URL.
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        Ok(Self::with_client(Arc::new(ApiClient::new(base_url, token)?)))
    }

    /// Creates a client on top of any [`Transport`].
    pub fn with_client(client: Arc<dyn Transport>) -> Self {
        Self { client }
    }

    /// Creates a client from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.token, config.environment)
    }

    /// Creates a client from `environment_type` and `token` in the process
    /// environment or a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&Config::from_env()?)
    }

    /// Tests the app token. Returns basic information about the app.
    pub async fn get_me(&self) -> Result<Value> {
        self.client.get("getMe", Params::new()).await
    }

    /// Creates a new invoice.
    pub async fn create_invoice(&self, request: &CreateInvoice) -> Result<Invoice> {
        let result = self.client.get("createInvoice", to_params(request)?).await?;
        decode(result)
    }

    /// Sends coins from the app balance to a user.
    ///
    /// Transfers with the same `spend_id` are accepted only once, so a failed
    /// call can be retried with the same request.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<Transfer> {
        let result = self.client.get("transfer", to_params(request)?).await?;
        decode(result)
    }

    /// Lists invoices of the app, in the order the API returns them.
    pub async fn get_invoices(&self, request: &GetInvoices) -> Result<Vec<Invoice>> {
        let mut result = self.client.get("getInvoices", to_params(request)?).await?;

        let items = result
            .get_mut("items")
            .map(Value::take)
            .ok_or_else(|| CryptoPayError::MissingField("items".to_string()))?;

        decode(items)
    }

    /// Returns the app balance as the API sends it.
    pub async fn get_balance(&self) -> Result<Value> {
        self.client.get("getBalance", Params::new()).await
    }

    /// Returns exchange rates of supported currencies as the API sends them.
    pub async fn get_exchange_rates(&self) -> Result<Value> {
        self.client.get("getExchangeRates", Params::new()).await
    }

    /// Returns the supported currencies as the API sends them.
    pub async fn get_currencies(&self) -> Result<Value> {
        self.client.get("getCurrencies", Params::new()).await
    }

    /// Calls any API method by its exact name.
    ///
    /// `params` must serialize to a JSON object.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use crypto_pay::api::CryptoPay;
    /// # use crypto_pay::config::Environment;
    /// use serde_json::json;
    ///
    /// # async fn example() -> crypto_pay::Result<()> {
    /// # let api = CryptoPay::new("1234:AAA", Environment::Test)?;
    /// let stats = api.call("getStats", &json!({"start_at": "2024-01-01T00:00:00Z"})).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> Result<Value> {
        self.client.get(method, to_params(params)?).await
    }

    /// Returns a handle for the API method named `name` in snake_case.
    ///
    /// `get_spend_history` becomes `getSpendHistory`. The handle owns the
    /// translated name, so several handles can be held and called in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crypto_pay::api::CryptoPay;
    /// # use crypto_pay::config::Environment;
    /// # fn example() -> crypto_pay::Result<()> {
    /// let api = CryptoPay::new("1234:AAA", Environment::Test)?;
    /// assert_eq!(api.method("delete_invoice").name(), "deleteInvoice");
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn method(&self, name: &str) -> RemoteMethod {
        RemoteMethod {
            client: Arc::clone(&self.client),
            name: to_camel_case(name),
        }
    }
}

/// An API method without a typed wrapper. See [`CryptoPay::method`].
#[derive(Clone)]
pub struct RemoteMethod {
    client: Arc<dyn Transport>,
    name: String,
}

impl RemoteMethod {
    /// The camelCase name sent to the API.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the method. `params` must serialize to a JSON object.
    pub async fn call<P: Serialize + ?Sized>(&self, params: &P) -> Result<Value> {
        self.client.get(&self.name, to_params(params)?).await
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(CryptoPayError::Decode)
}
