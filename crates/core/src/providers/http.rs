use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::JournalBackend;
use crate::errors::CoreError;
use crate::models::backtest::Backtest;
use crate::models::session::{Credentials, LoginResponse};
use crate::models::settings::Settings;
use crate::models::trade::Trade;

const LOGIN_PATH: &str = "/login_verification/";
const TRADES_PATH: &str = "/trades";
const BACKTESTS_PATH: &str = "/backtests";

/// REST client for the journal backend.
///
/// - `POST /login_verification/` → `{token, username, active}`
/// - `GET  /trades?username=…` → array of trades
/// - `GET  /backtests` → array of backtests
/// - `POST /trades`, `POST /backtests` → create
///
/// Authenticated calls carry `Authorization: Bearer <token>`.
pub struct HttpJournalBackend {
    client: Client,
    base_url: String,
}

impl HttpJournalBackend {
    pub fn new(settings: &Settings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs.max(1)));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_records<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<Vec<T>, CoreError> {
        let resp = check_status(request.send().await?, endpoint).await?;
        let body: Value = resp.json().await.map_err(|e| CoreError::Api {
            endpoint: endpoint.into(),
            message: format!("Failed to parse response: {e}"),
        })?;
        Ok(parse_records(body, endpoint))
    }
}

impl Default for HttpJournalBackend {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

/// Turn a non-2xx reply into a `CoreError::Api`, preferring the server's
/// own message.
async fn check_status(resp: Response, endpoint: &str) -> Result<Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(CoreError::Api {
        endpoint: endpoint.into(),
        message: error_message(status, &body),
    })
}

/// `{"detail": …}`, `{"error": …}` and `{"message": …}` bodies give their
/// text, a bare string body is used as is, anything else falls back to the
/// status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(text) = json.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
        if let Some(text) = json.as_str() {
            return text.to_string();
        }
    }
    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('<') {
        return body.to_string();
    }
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {reason}", status.as_u16()),
        None => format!("HTTP {}", status.as_u16()),
    }
}

/// Records from a list body. A `{"results": [...]}` envelope is unwrapped;
/// elements that fail to parse are logged and skipped.
pub(crate) fn parse_records<T: DeserializeOwned>(body: Value, endpoint: &str) -> Vec<T> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!(endpoint, "Expected a list of records, got an object");
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(endpoint, kind = %json_kind(&other), "Expected a list of records");
            return Vec::new();
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(endpoint, index = idx, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect();
    tracing::debug!(endpoint, total, kept = records.len(), "Parsed records");
    records
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl JournalBackend for HttpJournalBackend {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, CoreError> {
        let resp = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::Unauthorized(error_message(status, &body)));
        }
        let resp = check_status(resp, LOGIN_PATH).await?;

        let login: LoginResponse = resp.json().await.map_err(|e| CoreError::Api {
            endpoint: LOGIN_PATH.into(),
            message: format!("Failed to parse login reply: {e}"),
        })?;
        if login.token.is_empty() {
            return Err(CoreError::Api {
                endpoint: LOGIN_PATH.into(),
                message: "Login reply carried no token".into(),
            });
        }
        Ok(login)
    }

    async fn fetch_trades(
        &self,
        token: Option<&str>,
        username: Option<&str>,
    ) -> Result<Vec<Trade>, CoreError> {
        let mut request = self.client.get(self.url(TRADES_PATH));
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            request = request.query(&[("username", username)]);
        }
        self.fetch_records(Self::authorized(request, token), TRADES_PATH)
            .await
    }

    async fn fetch_backtests(&self, token: Option<&str>) -> Result<Vec<Backtest>, CoreError> {
        let request = self.client.get(self.url(BACKTESTS_PATH));
        self.fetch_records(Self::authorized(request, token), BACKTESTS_PATH)
            .await
    }

    async fn submit_trade(&self, token: Option<&str>, trade: &Trade) -> Result<(), CoreError> {
        let request = self.client.post(self.url(TRADES_PATH)).json(trade);
        check_status(Self::authorized(request, token).send().await?, TRADES_PATH).await?;
        Ok(())
    }

    async fn submit_backtest(&self, token: Option<&str>, backtest: &Backtest) -> Result<(), CoreError> {
        let request = self.client.post(self.url(BACKTESTS_PATH)).json(backtest);
        check_status(Self::authorized(request, token).send().await?, BACKTESTS_PATH).await?;
        Ok(())
    }
}
