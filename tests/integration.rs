//! Integration tests for the crypto-pay-rs library.
//!
//! These tests run the client against a local axum server that mimics the
//! Crypto Pay API, checking what goes over the wire and how responses are
//! unwrapped.

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use crypto_pay::{
    Asset, Button, Code, CreateInvoice, CryptoPay, CryptoPayError, ErrorKind, GetInvoices, Status,
    TransferRequest,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const TOKEN: &str = "1234:AAtesttoken";

enum MockBody {
    Json(StatusCode, Value),
    Text(String),
}

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    query: Option<String>,
    token: Option<String>,
}

impl Recorded {
    fn pairs(&self) -> Vec<(String, String)> {
        let query = self.query.as_deref().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param(&self, key: &str) -> Option<String> {
        self.pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<HashMap<String, MockBody>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

async fn handle_method(
    State(state): State<MockState>,
    Path(method): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let token = headers
        .get("crypto-pay-api-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        query,
        token,
    });

    match state.responses.get(&method) {
        Some(MockBody::Json(status, body)) => (*status, Json(body.clone())).into_response(),
        Some(MockBody::Text(text)) => (StatusCode::BAD_GATEWAY, text.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"ok": false, "error": {"code": 405, "name": "METHOD_NOT_FOUND"}})),
        )
            .into_response(),
    }
}

struct MockApi {
    base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    async fn start(responses: Vec<(&str, MockBody)>) -> Self {
        let state = MockState {
            responses: Arc::new(
                responses
                    .into_iter()
                    .map(|(method, body)| (method.to_string(), body))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = state.requests.clone();

        let app = Router::new()
            .route("/api/:method", get(handle_method))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/", addr),
            requests,
        }
    }

    fn client(&self) -> CryptoPay {
        CryptoPay::with_base_url(TOKEN, &self.base_url).unwrap()
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn ok(result: Value) -> MockBody {
    MockBody::Json(StatusCode::OK, json!({"ok": true, "result": result}))
}

fn invoice_json(id: i64, status: &str) -> Value {
    json!({
        "invoice_id": id,
        "status": status,
        "hash": format!("IV{}", id),
        "asset": "TON",
        "amount": "1",
        "pay_url": format!("https://t.me/CryptoTestnetBot?start=IV{}", id),
        "description": "test",
        "created_at": "2022-06-01T10:00:00.000Z",
        "allow_comments": true,
        "allow_anonymous": true,
        "paid_btn_name": "viewItem",
        "paid_btn_url": "https://test.com"
    })
}

#[tokio::test]
async fn test_get_me_sends_token_header() {
    let mock = MockApi::start(vec![(
        "getMe",
        ok(json!({"app_id": 42, "name": "shop", "payment_processing_bot_username": "CryptoTestnetBot"})),
    )])
    .await;

    let me = mock.client().get_me().await.unwrap();
    assert_eq!(me["app_id"], 42);

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "getMe");
    assert_eq!(requests[0].token.as_deref(), Some(TOKEN));
    assert!(requests[0].pairs().is_empty());
}

#[tokio::test]
async fn test_create_invoice_round_trip() {
    let mock = MockApi::start(vec![("createInvoice", ok(invoice_json(1, "active")))]).await;

    let request = CreateInvoice::new(Asset::Ton, "1")
        .with_description("test")
        .with_paid_button(Button::ViewItem, "https://test.com")
        .with_allow_comments(false);
    let invoice = mock.client().create_invoice(&request).await.unwrap();

    assert_eq!(invoice.invoice_id, 1);
    assert_eq!(invoice.asset, Asset::Ton);
    assert_eq!(invoice.paid_btn_url.as_deref(), Some("https://test.com"));
    assert!(invoice.comment.is_none());

    let sent = &mock.requests()[0];
    assert_eq!(sent.method, "createInvoice");
    assert_eq!(
        sent.pairs(),
        vec![
            ("amount".to_string(), "1".to_string()),
            ("asset".to_string(), "TON".to_string()),
            ("description".to_string(), "test".to_string()),
            ("paid_btn_name".to_string(), "viewItem".to_string()),
            ("paid_btn_url".to_string(), "https://test.com".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_get_invoices_filters_and_order() {
    let mock = MockApi::start(vec![(
        "getInvoices",
        ok(json!({"items": [invoice_json(10, "paid"), invoice_json(4, "expired")]})),
    )])
    .await;

    let request = GetInvoices::new()
        .with_asset(Asset::Btc)
        .with_asset(Asset::Ton)
        .with_status(Status::Paid)
        .with_offset(0)
        .with_count(2);
    let invoices = mock.client().get_invoices(&request).await.unwrap();

    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].invoice_id, 10);
    assert!(invoices[0].is_paid());
    assert_eq!(invoices[1].invoice_id, 4);

    let sent = &mock.requests()[0];
    assert_eq!(sent.param("asset").as_deref(), Some("BTC,TON"));
    assert_eq!(sent.param("status").as_deref(), Some("paid"));
    assert_eq!(sent.param("count").as_deref(), Some("2"));
    assert_eq!(sent.param("offset"), None);
    assert_eq!(sent.param("invoice_ids"), None);
}

#[tokio::test]
async fn test_get_invoices_keeps_items_with_unlisted_asset() {
    let mut unlisted = invoice_json(6, "active");
    unlisted["asset"] = json!("LTC");
    let mock = MockApi::start(vec![(
        "getInvoices",
        ok(json!({"items": [invoice_json(5, "paid"), unlisted]})),
    )])
    .await;

    let invoices = mock.client().get_invoices(&GetInvoices::new()).await.unwrap();

    assert_eq!(invoices.len(), 2);
    assert_eq!(invoices[0].asset, Asset::Ton);
    assert_eq!(invoices[1].asset, Code::Unknown("LTC".to_string()));
    assert_eq!(invoices[1].invoice_id, 6);
}

#[tokio::test]
async fn test_method_name_cannot_leave_base_url() {
    let mock = MockApi::start(vec![("getMe", ok(json!({})))]).await;
    let api = mock.client();

    for method in ["/getMe", "../getMe", "https://evil.example/x"] {
        let err = api.call(method, &json!({})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{}", method);
    }

    let err = api.method("../get_me").call(&json!({})).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_transfer_sends_required_params() {
    let mock = MockApi::start(vec![(
        "transfer",
        ok(json!({
            "transfer_id": 8,
            "user_id": 777,
            "asset": "USDT",
            "amount": "2.5",
            "status": "completed",
            "completed_at": "2022-06-01T10:00:00.000Z"
        })),
    )])
    .await;

    let request = TransferRequest::new("777", Asset::Usdt, "2.5", "withdrawal-1").without_notification();
    let transfer = mock.client().transfer(&request).await.unwrap();

    assert_eq!(transfer.user_id, "777");
    assert_eq!(transfer.amount, "2.5");

    let sent = &mock.requests()[0];
    assert_eq!(sent.param("spend_id").as_deref(), Some("withdrawal-1"));
    assert_eq!(sent.param("disable_send_notification").as_deref(), Some("true"));
    assert_eq!(sent.param("comment"), None);
}

#[tokio::test]
async fn test_raw_balance_is_unchanged() {
    let mock = MockApi::start(vec![("getBalance", ok(json!({"balance": []})))]).await;

    let balance = mock.client().get_balance().await.unwrap();
    assert_eq!(balance, json!({"balance": []}));
}

#[tokio::test]
async fn test_generic_method_query() {
    let mock = MockApi::start(vec![("getSpendHistory", ok(json!([])))]).await;

    let result = mock
        .client()
        .method("get_spend_history")
        .call(&json!({"count": 5}))
        .await
        .unwrap();
    assert_eq!(result, json!([]));

    let sent = &mock.requests()[0];
    assert_eq!(sent.method, "getSpendHistory");
    assert_eq!(sent.query.as_deref(), Some("count=5"));
}

#[tokio::test]
async fn test_api_error_envelope() {
    let mock = MockApi::start(vec![(
        "getExchangeRates",
        MockBody::Json(
            StatusCode::BAD_REQUEST,
            json!({"ok": false, "error": {"code": 400, "name": "X"}}),
        ),
    )])
    .await;

    let err = mock.client().get_exchange_rates().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.code(), Some(400));
    assert!(matches!(err, CryptoPayError::Api(ref e) if *e == json!({"code": 400, "name": "X"})));
}

#[tokio::test]
async fn test_unknown_method_is_api_error() {
    let mock = MockApi::start(vec![]).await;

    let err = mock.client().call("noSuchMethod", &json!({})).await.unwrap_err();
    assert_eq!(err.name(), Some("METHOD_NOT_FOUND"));
}

#[tokio::test]
async fn test_non_json_body_is_transport_error() {
    let mock = MockApi::start(vec![(
        "getCurrencies",
        MockBody::Text("<html>Bad Gateway</html>".to_string()),
    )])
    .await;

    let err = mock.client().get_currencies().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, CryptoPayError::InvalidBody(_)));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = CryptoPay::with_base_url(TOKEN, &format!("http://{}/api/", addr)).unwrap();
    let err = api.get_me().await.unwrap_err();

    assert!(matches!(err, CryptoPayError::Http(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_decode_error_on_wrong_shape() {
    let mock = MockApi::start(vec![("createInvoice", ok(json!({"invoice_id": 1})))]).await;

    let err = mock
        .client()
        .create_invoice(&CreateInvoice::new(Asset::Btc, "0.001"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(mock.requests().len(), 1);
}
