use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use trade_journal_core::errors::CoreError;
use trade_journal_core::models::analytics::{FocusHint, Grade};
use trade_journal_core::models::backtest::{Backtest, BacktestOutcome};
use trade_journal_core::models::period::Timeframe;
use trade_journal_core::models::session::{Credentials, LoginResponse, Session};
use trade_journal_core::models::settings::Settings;
use trade_journal_core::models::trade::{PriceLevel, Trade, TradeResult};
use trade_journal_core::providers::traits::JournalBackend;
use trade_journal_core::storage::session_store::{MemorySessionStore, SessionStore};
use trade_journal_core::TradeJournal;

// ═══════════════════════════════════════════════════════════════════
// Mock Backend (for testing without a server)
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct MockBackend {
    trades: Vec<Trade>,
    backtests: Vec<Backtest>,
    active: bool,
    fail_fetches: bool,
    /// (token, username) of every trade fetch
    fetch_calls: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
    submitted: Arc<Mutex<Vec<Trade>>>,
}

impl MockBackend {
    fn with_trades(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            active: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl JournalBackend for MockBackend {
    fn name(&self) -> &str {
        "MockBackend"
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, CoreError> {
        if credentials.password != "pw" {
            return Err(CoreError::Unauthorized("Invalid credentials".into()));
        }
        Ok(LoginResponse {
            token: format!("tok-{}", credentials.username),
            username: credentials.username.clone(),
            active: self.active,
        })
    }

    async fn fetch_trades(
        &self,
        token: Option<&str>,
        username: Option<&str>,
    ) -> Result<Vec<Trade>, CoreError> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((token.map(String::from), username.map(String::from)));
        if self.fail_fetches {
            return Err(CoreError::Network("connection reset".into()));
        }
        Ok(self.trades.clone())
    }

    async fn fetch_backtests(&self, _token: Option<&str>) -> Result<Vec<Backtest>, CoreError> {
        if self.fail_fetches {
            return Err(CoreError::Api {
                endpoint: "/backtests".into(),
                message: "HTTP 500".into(),
            });
        }
        Ok(self.backtests.clone())
    }

    async fn submit_trade(&self, _token: Option<&str>, trade: &Trade) -> Result<(), CoreError> {
        self.submitted.lock().unwrap().push(trade.clone());
        Ok(())
    }

    async fn submit_backtest(&self, _token: Option<&str>, _backtest: &Backtest) -> Result<(), CoreError> {
        Ok(())
    }
}

fn journal(backend: MockBackend) -> TradeJournal {
    TradeJournal::new(
        Settings::default(),
        Box::new(backend),
        Box::new(MemorySessionStore::new()),
    )
}

fn scenario_trades() -> Vec<Trade> {
    vec![
        Trade::new("2024-01-01", TradeResult::Win, 100.0).with_setup("OTE"),
        Trade::new("2024-01-02", TradeResult::Loss, -50.0).with_setup("OTE"),
        Trade::new("2024-01-08", TradeResult::Win, 75.0).with_setup("Silver Bullet"),
        Trade::new("garbage", TradeResult::Win, 1_000.0),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// Session lifecycle
// ═══════════════════════════════════════════════════════════════════

mod session {
    use super::*;

    #[tokio::test]
    async fn login_then_logout() {
        let mut j = journal(MockBackend::with_trades(scenario_trades()));
        assert!(!j.is_authenticated());

        let session = j.login("alice", "pw").await.unwrap();
        assert_eq!(session.username, "alice");
        assert!(j.is_authenticated());

        j.refresh_trades().await;
        assert!(!j.trades().is_empty());

        j.logout().unwrap();
        assert!(!j.is_authenticated());
        assert!(j.trades().is_empty());
        assert!(j.overall_stats().is_none());
    }

    #[tokio::test]
    async fn inactive_account_is_refused() {
        let backend = MockBackend {
            active: false,
            ..MockBackend::default()
        };
        let mut j = journal(backend);
        let err = j.login("alice", "pw").await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
        assert!(!j.is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password() {
        let mut j = journal(MockBackend::with_trades(vec![]));
        assert!(j.login("alice", "nope").await.is_err());
        assert!(j.session().is_none());
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_backend() {
        let mut j = journal(MockBackend::with_trades(vec![]));
        let err = j.login("  ", "pw").await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn session_is_restored_from_store() {
        let store = MemorySessionStore::with_session(Session::new("tok-bob", "bob"));
        let j = TradeJournal::new(
            Settings::default(),
            Box::new(MockBackend::default()),
            Box::new(store),
        );
        assert_eq!(j.session().map(|s| s.username.as_str()), Some("bob"));
    }

    #[tokio::test]
    async fn trade_fetch_sends_token_and_username() {
        let backend = MockBackend::with_trades(vec![]);
        let calls = Arc::clone(&backend.fetch_calls);
        let mut j = journal(backend);
        j.login("alice", "pw").await.unwrap();
        j.refresh_trades().await;

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            &[(Some("tok-alice".to_string()), Some("alice".to_string()))]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Analytics through the facade
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    async fn loaded() -> TradeJournal {
        let mut backend = MockBackend::with_trades(scenario_trades());
        backend.backtests = vec![
            Backtest::new("OTE", BacktestOutcome::Successful, true),
            Backtest::new("OTE", BacktestOutcome::Failed, false),
            Backtest::new("", BacktestOutcome::Partial, false),
        ];
        let mut j = journal(backend);
        j.login("alice", "pw").await.unwrap();
        j.refresh_trades().await;
        j.refresh_backtests().await;
        j
    }

    #[tokio::test]
    async fn bad_dates_are_excluded() {
        let j = loaded().await;
        assert_eq!(j.trades().len(), 3);
        assert!(j.trades_loaded());
    }

    #[tokio::test]
    async fn scenario_views() {
        let j = loaded().await;

        let equity: Vec<f64> = j.equity_curve().iter().map(|p| p.cumulative_pnl).collect();
        assert_eq!(equity, vec![100.0, 50.0, 125.0]);

        let weekly: Vec<f64> = j.buckets(Timeframe::Weekly).iter().map(|b| b.pnl).collect();
        assert_eq!(weekly, vec![50.0, 75.0]);

        let stats = j.overall_stats().unwrap();
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.total_pnl, 125.0);
        assert_eq!(stats.grade, Grade::A);
        assert_eq!(j.focus_hint(), Some(FocusHint::OnTrack));
    }

    #[tokio::test]
    async fn period_drill_down() {
        let j = loaded().await;
        let week1 = j.period_stats(Timeframe::Weekly, "2024-W1").unwrap();
        assert_eq!(week1.total_trades, 2);
        assert_eq!(week1.win_rate, 50.0);
        assert_eq!(week1.grade, Grade::C);

        assert_eq!(j.bucket(Timeframe::Daily, "2024-01-08").map(|b| b.pnl), Some(75.0));
        assert_eq!(j.trades_on_day("2024-01-02").len(), 1);
        assert_eq!(j.recent_days().len(), 3);
    }

    #[tokio::test]
    async fn breakdowns() {
        let j = loaded().await;
        let setups = j.setup_stats();
        assert_eq!(setups[0].setup, "OTE");
        assert_eq!(setups[0].total, 2);

        let bt = j.backtest_stats().unwrap();
        assert_eq!(bt.total, 3);
        assert_eq!(bt.could_have_modified, 1);
        assert_eq!(j.backtest_setup_stats().len(), 2);
        assert_eq!(j.modification_breakdown()[0].label, "Unmodified");
        assert!(j.flag_stats().is_some());
    }

    #[tokio::test]
    async fn backend_failure_reads_as_no_data() {
        let backend = MockBackend {
            fail_fetches: true,
            active: true,
            ..MockBackend::default()
        };
        let mut j = journal(backend);
        assert_eq!(j.refresh_trades().await, 0);
        assert_eq!(j.refresh_backtests().await, 0);
        assert!(j.trades_loaded());
        assert!(j.overall_stats().is_none());
        assert!(j.backtest_stats().is_none());
        assert!(j.equity_curve().is_empty());
    }

    #[tokio::test]
    async fn stale_fetch_is_ignored() {
        let mut j = journal(MockBackend::with_trades(scenario_trades()));
        let old = j.begin_trades_refresh();
        let new = j.begin_trades_refresh();

        assert!(j.apply_trades(new, vec![Trade::new("2024-05-01", TradeResult::Win, 5.0)]));
        assert!(!j.apply_trades(old, scenario_trades()));
        assert_eq!(j.trades().len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Draft & submissions
// ═══════════════════════════════════════════════════════════════════

mod submissions {
    use super::*;

    const TOPSTEP_ROW: &str = "987654\n/MNQH6\n2\nJanuary 6 2026 @ 9:31:02 am\n\
        January 6 2026 @ 9:48:40 am\n17m 38s\n21,500.00\n21,480.00\n-$80.00\n$1.48\n-$81.48\nLong";

    fn complete(mut trade: Trade) -> Trade {
        trade.time = "09:31".into();
        trade.symbol = "MNQH6".into();
        trade.session = "NY AM".into();
        trade.ict_setup = "OTE".into();
        trade.pre_trade_emotion = "Calm".into();
        trade.post_trade_emotion = "Annoyed".into();
        trade.trade_grade = "B".into();
        trade.notes = "Stopped out at the swing low.".into();
        trade.risk_percent = Some(0.3);
        trade.entry_price = Some(21500.0);
        trade.exit_price = Some(21480.0);
        trade.r_multiple = Some(-1.0);
        trade.stop_levels = vec![PriceLevel::new(21480.0, "swing low")];
        trade.take_profit_levels = vec![PriceLevel::new(21560.0, "BSL")];
        trade
    }

    #[tokio::test]
    async fn submit_requires_login() {
        let mut j = journal(MockBackend::with_trades(vec![]));
        let trade = complete(Trade::new("2024-01-01", TradeResult::Loss, -40.0));
        let err = j.submit_trade(trade).await.unwrap_err();
        assert!(matches!(err, CoreError::NotAuthenticated));
    }

    #[tokio::test]
    async fn invalid_trade_is_not_sent() {
        let backend = MockBackend::with_trades(vec![]);
        let submitted = Arc::clone(&backend.submitted);
        let mut j = journal(backend);
        j.login("alice", "pw").await.unwrap();

        let err = j
            .submit_trade(Trade::new("2024-01-01", TradeResult::Win, 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(submitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_fills_draft_then_submit_clears_it() {
        let backend = MockBackend::with_trades(vec![]);
        let submitted = Arc::clone(&backend.submitted);
        let mut j = journal(backend);
        j.login("alice", "pw").await.unwrap();

        let fill = j.import_topstep(TOPSTEP_ROW).unwrap();
        assert_eq!(fill.result, TradeResult::Loss);

        let draft = j.draft();
        assert_eq!(draft.trade.date, "2026-01-06");
        assert_eq!(draft.trade.time, "09:31");
        // 20 points × $2 × 2 contracts
        assert_eq!(draft.trade.pnl, -80.0);

        let mut finished = draft.clone();
        finished.trade = complete(finished.trade);
        finished.risk.account_balance = Some(50_000.0);
        j.save_draft(&finished).unwrap();
        let estimate = j.apply_draft_risk().unwrap();
        assert_eq!(estimate.risk_amount, 80.0);

        j.submit_draft().await.unwrap();

        let sent = submitted.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].username, "alice");
        assert_eq!(sent[0].risk_percent, Some(0.16));
        assert_eq!(j.draft().trade.date, "");
    }

    #[tokio::test]
    async fn draft_persists_in_store_across_journals() {
        let mut store = MemorySessionStore::new();
        let mut j = journal(MockBackend::default());
        j.import_topstep(TOPSTEP_ROW).unwrap();
        store.save_draft(Some(&j.draft())).unwrap();

        let j2 = TradeJournal::new(
            Settings::default(),
            Box::new(MockBackend::default()),
            Box::new(store),
        );
        assert_eq!(j2.draft().trade.symbol, "MNQH6");
    }

    #[tokio::test]
    async fn backtest_submission() {
        let mut j = journal(MockBackend::with_trades(vec![]));
        j.login("alice", "pw").await.unwrap();

        let mut bt = Backtest::new("OTE", BacktestOutcome::Successful, false);
        bt.date = "2024-02-01".into();
        bt.symbol = "NQ".into();
        j.submit_backtest(&bt).await.unwrap();

        bt.symbol.clear();
        assert!(j.submit_backtest(&bt).await.is_err());
    }
}
