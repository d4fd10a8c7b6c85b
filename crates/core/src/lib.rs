pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use models::{
    analytics::{Bucket, FocusHint, OverallStats, RecentDay},
    backtest::Backtest,
    breakdown::{BacktestSetupStats, BacktestStats, IctFlagStats, ModificationGroup, SetupStats},
    chart::{EquityPoint, WeeklyPnlPoint},
    draft::{RiskEstimate, TradeDraft},
    import::TopstepFill,
    period::{DatedTrade, Timeframe},
    session::{Credentials, Session},
    settings::Settings,
    snapshot::{FetchTicket, Snapshot},
    trade::Trade,
};
use providers::{http::HttpJournalBackend, traits::JournalBackend};
use services::{
    analytics_service::AnalyticsService, breakdown_service::BreakdownService,
    chart_service::ChartService, grading, import_service::ImportService, position_service,
    validation,
};
use storage::session_store::SessionStore;

use errors::CoreError;

/// Main entry point for the trade journal core library.
///
/// Owns the login session, the last fetched trades and backtests, and the
/// services that turn them into analytics views. Views are recomputed from
/// the snapshot on every call and never cached.
#[must_use]
pub struct TradeJournal {
    settings: Settings,
    backend: Box<dyn JournalBackend>,
    store: Box<dyn SessionStore>,
    session: Option<Session>,
    trades: Snapshot<DatedTrade>,
    backtests: Snapshot<Backtest>,
    analytics_service: AnalyticsService,
    chart_service: ChartService,
    breakdown_service: BreakdownService,
    import_service: ImportService,
}

impl std::fmt::Debug for TradeJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeJournal")
            .field("backend", &self.backend.name())
            .field("user", &self.session.as_ref().map(|s| s.username.as_str()))
            .field("trades", &self.trades.records().len())
            .field("backtests", &self.backtests.records().len())
            .finish()
    }
}

impl TradeJournal {
    /// Build a journal on top of any backend and store.
    /// A session left in the store by an earlier run is picked up.
    pub fn new(
        settings: Settings,
        backend: Box<dyn JournalBackend>,
        store: Box<dyn SessionStore>,
    ) -> Self {
        let session = store.load_session();
        if let Some(s) = &session {
            tracing::debug!(username = %s.username, "Restored session from store");
        }
        Self {
            settings,
            backend,
            store,
            session,
            trades: Snapshot::new(),
            backtests: Snapshot::new(),
            analytics_service: AnalyticsService::new(),
            chart_service: ChartService::new(),
            breakdown_service: BreakdownService::new(),
            import_service: ImportService::new(),
        }
    }

    /// Journal talking to the REST backend at `settings.api_url`.
    pub fn with_http(settings: Settings, store: Box<dyn SessionStore>) -> Self {
        let backend = HttpJournalBackend::new(&settings);
        Self::new(settings, Box::new(backend), store)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Log in and persist the session.
    ///
    /// Accounts the backend reports as inactive are refused with
    /// `CoreError::Unauthorized` and nothing is stored.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&Session, CoreError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError(
                "Username and password are required".into(),
            ));
        }

        let reply = self
            .backend
            .login(&Credentials::new(username, password))
            .await?;
        if !reply.active {
            tracing::warn!(username, "Login refused: account inactive");
            return Err(CoreError::Unauthorized(
                "Account is not active yet. Contact the administrator.".into(),
            ));
        }

        let name = if reply.username.trim().is_empty() {
            username.to_string()
        } else {
            reply.username
        };
        let session = Session::new(reply.token, name);
        self.store.save_session(Some(&session))?;
        tracing::info!(username = %session.username, "Logged in");

        // A new user must not see the previous user's records.
        self.trades.clear();
        self.backtests.clear();
        Ok(self.session.insert(session))
    }

    /// Forget the session and drop all fetched records.
    /// The trade draft is kept.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        if let Some(s) = self.session.take() {
            tracing::info!(username = %s.username, "Logged out");
        }
        self.trades.clear();
        self.backtests.clear();
        self.store.clear_session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    // ── Fetching ────────────────────────────────────────────────────

    /// Fetch trades and install them as the current snapshot.
    /// Returns how many trades made it into the snapshot.
    pub async fn refresh_trades(&mut self) -> usize {
        let ticket = self.begin_trades_refresh();
        let trades = self.fetch_trades().await;
        self.apply_trades(ticket, trades);
        self.trades.records().len()
    }

    /// Take a ticket for a trade fetch. Only the newest ticket's result is
    /// applied by [`TradeJournal::apply_trades`].
    pub fn begin_trades_refresh(&mut self) -> FetchTicket {
        self.trades.begin()
    }

    /// Trades from the backend. A failed fetch is logged and reads as an
    /// empty list.
    pub async fn fetch_trades(&self) -> Vec<Trade> {
        let username = self
            .session
            .as_ref()
            .filter(|_| self.settings.filter_trades_by_username)
            .map(|s| s.username.as_str());

        match self.backend.fetch_trades(self.token(), username).await {
            Ok(trades) => trades,
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "Trade fetch failed, showing no data");
                Vec::new()
            }
        }
    }

    /// Install fetched trades if `ticket` is still current. Trades with
    /// unparseable dates are dropped here.
    pub fn apply_trades(&mut self, ticket: FetchTicket, trades: Vec<Trade>) -> bool {
        let fetched = trades.len();
        let dated = self.analytics_service.normalize(trades);
        let kept = dated.len();
        let applied = self.trades.apply(ticket, dated);
        if applied {
            if kept < fetched {
                tracing::warn!(dropped = fetched - kept, "Trades with unparseable dates excluded");
            }
            tracing::debug!(trades = kept, "Trade snapshot updated");
        } else {
            tracing::debug!(?ticket, "Stale trade fetch ignored");
        }
        applied
    }

    /// Fetch backtests and install them as the current snapshot.
    pub async fn refresh_backtests(&mut self) -> usize {
        let ticket = self.begin_backtests_refresh();
        let backtests = self.fetch_backtests().await;
        self.apply_backtests(ticket, backtests);
        self.backtests.records().len()
    }

    pub fn begin_backtests_refresh(&mut self) -> FetchTicket {
        self.backtests.begin()
    }

    /// Backtests from the backend, empty on failure.
    pub async fn fetch_backtests(&self) -> Vec<Backtest> {
        match self.backend.fetch_backtests(self.token()).await {
            Ok(backtests) => backtests,
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "Backtest fetch failed, showing no data");
                Vec::new()
            }
        }
    }

    pub fn apply_backtests(&mut self, ticket: FetchTicket, backtests: Vec<Backtest>) -> bool {
        let count = backtests.len();
        let applied = self.backtests.apply(ticket, backtests);
        if applied {
            tracing::debug!(backtests = count, "Backtest snapshot updated");
        } else {
            tracing::debug!(?ticket, "Stale backtest fetch ignored");
        }
        applied
    }

    /// Trades in the snapshot, oldest first.
    pub fn trades(&self) -> &[DatedTrade] {
        self.trades.records()
    }

    pub fn backtests(&self) -> &[Backtest] {
        self.backtests.records()
    }

    pub fn trades_loaded(&self) -> bool {
        self.trades.is_loaded()
    }

    pub fn backtests_loaded(&self) -> bool {
        self.backtests.is_loaded()
    }

    // ── Trade Analytics ─────────────────────────────────────────────

    pub fn overall_stats(&self) -> Option<OverallStats> {
        self.analytics_service
            .overall_stats(self.trades().iter().map(|t| &t.trade))
    }

    /// Overall stats restricted to one period, e.g. the grade of `2024-03`.
    pub fn period_stats(&self, timeframe: Timeframe, key: &str) -> Option<OverallStats> {
        self.analytics_service.overall_stats(
            self.trades()
                .iter()
                .filter(|t| t.keys.key(timeframe) == key)
                .map(|t| &t.trade),
        )
    }

    pub fn focus_hint(&self) -> Option<FocusHint> {
        self.overall_stats().map(|s| grading::focus_hint(&s))
    }

    pub fn buckets(&self, timeframe: Timeframe) -> Vec<Bucket> {
        self.analytics_service.buckets(self.trades(), timeframe)
    }

    pub fn bucket(&self, timeframe: Timeframe, key: &str) -> Option<Bucket> {
        self.analytics_service.bucket(self.trades(), timeframe, key)
    }

    /// The configured number of most recent trading days, newest first.
    pub fn recent_days(&self) -> Vec<RecentDay> {
        self.analytics_service
            .recent_days(self.trades(), self.settings.recent_days)
    }

    pub fn trades_on_day(&self, day_key: &str) -> Vec<&Trade> {
        self.analytics_service.trades_on_day(self.trades(), day_key)
    }

    // ── Charts ──────────────────────────────────────────────────────

    pub fn equity_curve(&self) -> Vec<EquityPoint> {
        self.chart_service.equity_curve(self.trades())
    }

    pub fn weekly_pnl(&self) -> Vec<WeeklyPnlPoint> {
        self.chart_service.weekly_pnl(self.trades())
    }

    // ── Strategy Breakdowns ─────────────────────────────────────────

    pub fn setup_stats(&self) -> Vec<SetupStats> {
        self.breakdown_service
            .setup_stats(self.trades().iter().map(|t| &t.trade))
    }

    pub fn flag_stats(&self) -> Option<IctFlagStats> {
        self.breakdown_service
            .flag_stats(self.trades().iter().map(|t| &t.trade))
    }

    pub fn backtest_stats(&self) -> Option<BacktestStats> {
        self.breakdown_service.backtest_stats(self.backtests())
    }

    pub fn backtest_setup_stats(&self) -> Vec<BacktestSetupStats> {
        self.breakdown_service.backtest_setup_stats(self.backtests())
    }

    pub fn modification_breakdown(&self) -> Vec<ModificationGroup> {
        self.breakdown_service.modification_breakdown(self.backtests())
    }

    // ── Trade Draft ─────────────────────────────────────────────────

    /// The unsent trade form, or a blank one.
    pub fn draft(&self) -> TradeDraft {
        self.store.load_draft().unwrap_or_default()
    }

    pub fn save_draft(&mut self, draft: &TradeDraft) -> Result<(), CoreError> {
        self.store.save_draft(Some(draft))
    }

    pub fn clear_draft(&mut self) -> Result<(), CoreError> {
        self.store.clear_draft()
    }

    /// Merge a pasted TopstepX row into the draft, recompute its PnL when
    /// the position size is known, and save it.
    pub fn import_topstep(&mut self, raw: &str) -> Result<TopstepFill, CoreError> {
        let mut draft = self.draft();
        let fill = self.import_service.apply_to_draft(&mut draft, raw)?;
        position_service::refresh_draft_pnl(&mut draft);
        self.save_draft(&draft)?;
        Ok(fill)
    }

    /// Fill the draft's risk % from its first stop and position size.
    pub fn apply_draft_risk(&mut self) -> Result<RiskEstimate, CoreError> {
        let mut draft = self.draft();
        let estimate = position_service::apply_risk_estimate(&mut draft)?;
        self.save_draft(&draft)?;
        Ok(estimate)
    }

    // ── Submissions ─────────────────────────────────────────────────

    /// Validate and post a trade under the logged-in user.
    /// The draft is cleared once the backend accepts it.
    pub async fn submit_trade(&mut self, mut trade: Trade) -> Result<(), CoreError> {
        let session = self.session.as_ref().ok_or(CoreError::NotAuthenticated)?;
        validation::validate_trade(&trade)?;
        trade.username = session.username.clone();

        self.backend
            .submit_trade(Some(session.token.as_str()), &trade)
            .await?;
        tracing::info!(date = %trade.date, symbol = %trade.symbol, "Trade submitted");

        self.clear_draft()
    }

    /// Submit the saved draft's trade.
    pub async fn submit_draft(&mut self) -> Result<(), CoreError> {
        let trade = self.draft().trade;
        self.submit_trade(trade).await
    }

    pub async fn submit_backtest(&mut self, backtest: &Backtest) -> Result<(), CoreError> {
        let session = self.session.as_ref().ok_or(CoreError::NotAuthenticated)?;
        validation::validate_backtest(backtest)?;

        self.backend
            .submit_backtest(Some(session.token.as_str()), backtest)
            .await?;
        tracing::info!(date = %backtest.date, setup = %backtest.ict_setup, "Backtest submitted");
        Ok(())
    }
}
