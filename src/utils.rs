//! Utility functions for Crypto Pay operations.
//!
//! Method-name translation, idempotency keys and small serde helpers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Translates an underscore-separated name into the API's camelCase form.
///
/// The first word is lowercased; every following word gets an upper-case
/// first letter and lower-case rest. Empty words are skipped.
///
/// # Examples
///
/// ```
/// use crypto_pay::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("get_spend_history"), "getSpendHistory");
/// assert_eq!(to_camel_case("create_invoice"), "createInvoice");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut words = name.split('_');
    let mut out = words.next().unwrap_or_default().to_lowercase();

    for word in words {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }

    out
}

/// Generates a random `spend_id` for [`transfer`](crate::api::CryptoPay::transfer).
///
/// The value is 20 random bytes, hex encoded (40 characters), well under the
/// API's 64 character limit.
///
/// # Examples
///
/// ```
/// use crypto_pay::utils::generate_spend_id;
///
/// let spend_id = generate_spend_id();
/// assert_eq!(spend_id.len(), 40);
/// ```
pub fn generate_spend_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 20] = rng.gen();
    hex::encode(bytes)
}

/// Deserializes a field the API may send either as a string or as a number.
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}
