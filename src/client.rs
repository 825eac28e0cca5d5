//! HTTP transport for the Crypto Pay API.
//!
//! Every API method is a GET to `<base_url><methodName>` with the app token in
//! the `Crypto-Pay-API-Token` header. Responses share one envelope:
//! `{"ok": true, "result": ...}` or `{"ok": false, "error": ...}`.

use crate::errors::{CryptoPayError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

/// Name of the authentication header.
pub const TOKEN_HEADER: &str = "Crypto-Pay-API-Token";

/// Parameters of a single API call, keyed by the API's parameter names.
pub type Params = Map<String, Value>;

/// Something that can invoke a remote API method.
///
/// [`ApiClient`] is the HTTP implementation; the facade only depends on this
/// trait, so any other implementation can be plugged in through
/// [`CryptoPay::with_client`](crate::api::CryptoPay::with_client).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Calls `method` with `params` and returns the unwrapped `result`.
    async fn get(&self, method: &str, params: Params) -> Result<Value>;
}

#[derive(Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Value,
}

/// Performs one GET request and unwraps the response envelope.
///
/// The body is parsed whatever the HTTP status, since the API reports
/// failures inside the envelope.
///
/// # Errors
///
/// * [`CryptoPayError::Http`] if the request could not be completed
/// * [`CryptoPayError::InvalidBody`] if the body is not a JSON envelope
/// * [`CryptoPayError::Api`] if the envelope has `ok: false`
pub async fn fetch(
    http: &Client,
    url: Url,
    headers: HeaderMap,
    query: &[(String, String)],
) -> Result<Value> {
    let response = http.get(url).headers(headers).query(query).send().await?;
    let status = response.status();
    let body = response.text().await?;

    let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
        CryptoPayError::InvalidBody(format!("status {}: {}", status.as_u16(), e))
    })?;

    if envelope.ok {
        Ok(envelope.result)
    } else {
        Err(CryptoPayError::Api(envelope.error))
    }
}

/// Reports whether the API treats a parameter value as absent.
///
/// `null`, `""`, zero, `false` and empty lists or objects count as empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Drops empty parameters and renders the rest as query pairs, sorted by key.
///
/// Strings are sent as-is, numbers and booleans as their JSON text, lists
/// comma separated and objects as compact JSON.
///
/// Because empty values are dropped, a caller cannot send an explicit `0`,
/// `false` or `""`. The server default applies instead.
///
/// # Examples
///
/// ```
/// use crypto_pay::client::{normalize_params, Params};
/// use serde_json::json;
///
/// let params: Params = serde_json::from_value(json!({
///     "asset": "TON",
///     "description": "",
///     "offset": 0,
///     "allow_comments": false,
///     "count": 5
/// })).unwrap();
///
/// let query = normalize_params(&params);
/// assert_eq!(query, vec![
///     ("asset".to_string(), "TON".to_string()),
///     ("count".to_string(), "5".to_string()),
/// ]);
/// ```
pub fn normalize_params(params: &Params) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = params
        .iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), query_value(value)))
        .collect();
    query.sort();
    query
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(query_value)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Converts a serializable parameter record into [`Params`].
///
/// Failures are [`CryptoPayError::Config`]: they concern the caller's input,
/// not the server's answer.
pub fn to_params<T: Serialize + ?Sized>(request: &T) -> Result<Params> {
    let value = serde_json::to_value(request)
        .map_err(|e| CryptoPayError::Config(format!("parameters cannot be serialized: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(CryptoPayError::Config(format!(
            "parameters must serialize to an object, got {}",
            other
        ))),
    }
}

/// HTTP client bound to one API instance and one app token.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
}

impl ApiClient {
    /// Creates a client for `base_url` authenticating with `token`.
    ///
    /// A missing trailing `/` on the base URL is added.
    ///
    /// # Examples
    ///
    /// ```
    /// use crypto_pay::client::ApiClient;
    ///
    /// let client = ApiClient::new("https://testnet-pay.crypt.bot/api", "1234:AAA").unwrap();
    /// assert_eq!(client.base_url().as_str(), "https://testnet-pay.crypt.bot/api/");
    /// ```
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let mut token_value = HeaderValue::from_str(token).map_err(|_| {
            CryptoPayError::Config("token contains characters not allowed in a header".to_string())
        })?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token_value);

        Ok(Self {
            http: Client::new(),
            base_url,
            headers,
        })
    }

    /// Sets a custom HTTP client (timeouts, proxies and the like).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Returns the base URL every method name is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the full URL of `method`.
    ///
    /// `method` must be a bare name made of ASCII letters, digits and `_`;
    /// anything else could point the request, and the token, elsewhere.
    pub fn method_url(&self, method: &str) -> Result<Url> {
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CryptoPayError::Config(format!("invalid method name '{}'", method)));
        }

        let url = self.base_url.join(method)?;
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path()) {
            return Err(CryptoPayError::Config(format!(
                "method '{}' resolves outside {}",
                method, self.base_url
            )));
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn get(&self, method: &str, params: Params) -> Result<Value> {
        let url = self.method_url(method)?;
        let query = normalize_params(&params);

        tracing::debug!(
            method,
            params = ?query.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            "calling Crypto Pay API"
        );

        let result = fetch(&self.http, url, self.headers.clone(), &query).await;

        if let Err(CryptoPayError::Api(error)) = &result {
            tracing::warn!(method, %error, "Crypto Pay API rejected the call");
        }

        result
    }
}
