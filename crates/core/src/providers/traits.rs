use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::backtest::Backtest;
use crate::models::session::{Credentials, LoginResponse};
use crate::models::trade::Trade;

/// The journal backend: authentication plus trade and backtest records.
///
/// The facade only talks to this trait, so tests swap in an in-memory
/// backend and a different server only needs a new implementation.
/// `token` is sent as a Bearer header when present.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait JournalBackend: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Exchange credentials for a token. An inactive account is still an
    /// `Ok` here; the caller decides whether to let it in.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, CoreError>;

    /// Trades visible to the caller, optionally filtered by owner.
    /// Records that don't look like trades are skipped.
    async fn fetch_trades(
        &self,
        token: Option<&str>,
        username: Option<&str>,
    ) -> Result<Vec<Trade>, CoreError>;

    async fn fetch_backtests(&self, token: Option<&str>) -> Result<Vec<Backtest>, CoreError>;

    async fn submit_trade(&self, token: Option<&str>, trade: &Trade) -> Result<(), CoreError>;

    async fn submit_backtest(&self, token: Option<&str>, backtest: &Backtest) -> Result<(), CoreError>;
}
