use serde::{Deserialize, Serialize};

/// Default backend the journal talks to.
pub const DEFAULT_API_URL: &str = "https://ict-agentofgod.pythonanywhere.com";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend base URL, without trailing slash.
    pub api_url: String,

    /// Per-request timeout in seconds (ignored on WASM).
    pub request_timeout_secs: u64,

    /// Number of trading days shown in the recent-days table.
    pub recent_days: usize,

    /// Send `?username=` when fetching trades.
    pub filter_trades_by_username: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            recent_days: 14,
            filter_trades_by_username: true,
        }
    }
}

impl Settings {
    /// Defaults overlaid with `TRADE_JOURNAL_API_URL`,
    /// `TRADE_JOURNAL_TIMEOUT_SECS` and `TRADE_JOURNAL_RECENT_DAYS`.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(url) = lookup("TRADE_JOURNAL_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                settings.api_url = url.to_string();
            }
        }
        if let Some(secs) = lookup("TRADE_JOURNAL_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            settings.request_timeout_secs = secs;
        }
        if let Some(days) = lookup("TRADE_JOURNAL_RECENT_DAYS").and_then(|v| v.trim().parse().ok()) {
            settings.recent_days = days;
        }

        settings
    }
}
