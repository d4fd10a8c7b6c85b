use trade_journal_core::models::backtest::{Backtest, BacktestOutcome};
use trade_journal_core::models::draft::{RiskHelper, TradeDraft};
use trade_journal_core::models::instrument::Instrument;
use trade_journal_core::models::session::{Credentials, LoginResponse, Session};
use trade_journal_core::models::settings::{Settings, DEFAULT_API_URL};
use trade_journal_core::models::trade::{Direction, Trade, TradeResult};

// ═══════════════════════════════════════════════════════════════════
// Trade records from the backend
// ═══════════════════════════════════════════════════════════════════

mod trade {
    use super::*;

    #[test]
    fn full_record() {
        let json = r#"{
            "id": 17,
            "username": "cisco",
            "date": "2024-03-05",
            "time": "09:41",
            "symbol": "MNQZ4",
            "direction": "short",
            "result": "win",
            "pnl": 125.5,
            "ict_setup": "Silver Bullet",
            "ifvg_used": true,
            "emotional_trade": false,
            "stop_levels": [{"price": 18010.25, "reason": "above FVG"}],
            "take_profit_levels": [{"price": "17950", "reason": "SSL"}]
        }"#;
        let t: Trade = serde_json::from_str(json).unwrap();

        assert_eq!(t.id.as_deref(), Some("17"));
        assert_eq!(t.direction, Direction::Short);
        assert_eq!(t.result, TradeResult::Win);
        assert_eq!(t.pnl, 125.5);
        assert!(t.ifvg_used);
        assert_eq!(t.take_profit_levels[0].price, Some(17950.0));
    }

    #[test]
    fn null_levels_keep_the_trade() {
        let json = r#"{"date":"2024-03-01","result":"win","pnl":50,"stop_levels":null}"#;
        let t: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(t.pnl, 50.0);
        assert_eq!(t.result, TradeResult::Win);
        assert!(t.stop_levels.is_empty());
    }

    #[test]
    fn levels_stored_as_text() {
        let json = r#"{
            "date": "2024-03-01",
            "pnl": -20,
            "stop_levels": "[{\"price\": 101.5, \"reason\": \"swing\"}, 7, null]",
            "take_profit_levels": "not json"
        }"#;
        let t: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(t.stop_levels.len(), 1);
        assert_eq!(t.stop_levels[0].price, Some(101.5));
        assert_eq!(t.stop_levels[0].reason, "swing");
        assert!(t.take_profit_levels.is_empty());
    }

    #[test]
    fn sparse_record_gets_defaults() {
        let t: Trade = serde_json::from_str(r#"{"date": "2024-01-01"}"#).unwrap();
        assert_eq!(t.result, TradeResult::Pending);
        assert_eq!(t.pnl, 0.0);
        assert_eq!(t.direction, Direction::Long);
        assert!(t.followed_plan);
        assert!(!t.emotional_trade);
    }

    #[test]
    fn messy_values_are_coerced() {
        let json = r#"{
            "date": "2024-01-01",
            "result": "WIN",
            "pnl": "abc",
            "entry_price": "",
            "missed_trade": "true",
            "took_profit_early": 1,
            "emotional_trade": null,
            "notes": 42
        }"#;
        let t: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(t.result, TradeResult::Win);
        assert_eq!(t.pnl, 0.0);
        assert_eq!(t.entry_price, None);
        assert!(t.missed_trade);
        assert!(t.took_profit_early);
        assert!(!t.emotional_trade);
        assert_eq!(t.notes, "42");
    }

    #[test]
    fn unknown_result_is_not_finished() {
        let t: Trade = serde_json::from_str(r#"{"result": "scratched"}"#).unwrap();
        assert_eq!(t.result, TradeResult::Unknown);
        assert!(!t.result.is_finished());
    }

    #[test]
    fn serializes_lowercase_labels() {
        let t = Trade::new("2024-01-01", TradeResult::Breakeven, 0.0);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["result"], "breakeven");
        assert_eq!(v["direction"], "long");
        assert!(v.get("id").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Backtests
// ═══════════════════════════════════════════════════════════════════

mod backtest {
    use super::*;

    #[test]
    fn outcome_labels() {
        assert_eq!(BacktestOutcome::from_label("Successful"), BacktestOutcome::Successful);
        assert_eq!(BacktestOutcome::from_label(" partial "), BacktestOutcome::Partial);
        assert_eq!(BacktestOutcome::from_label("meh"), BacktestOutcome::Unknown);
    }

    #[test]
    fn missing_outcome_is_unknown() {
        let b: Backtest = serde_json::from_str(r#"{"ict_setup": "OTE"}"#).unwrap();
        assert_eq!(b.outcome, BacktestOutcome::Unknown);
        assert!(!b.strategy_modification);
    }

    #[test]
    fn modification_flag_from_string() {
        let b: Backtest =
            serde_json::from_str(r#"{"outcome": "failed", "strategy_modification": "yes"}"#)
                .unwrap();
        assert_eq!(b.outcome, BacktestOutcome::Failed);
        assert!(b.strategy_modification);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Instruments & position helper
// ═══════════════════════════════════════════════════════════════════

mod instrument {
    use super::*;

    #[test]
    fn point_values() {
        let table: Vec<(&str, f64)> = Instrument::ALL
            .iter()
            .map(|i| (i.code(), i.point_value()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("NQ", 20.0),
                ("MNQ", 2.0),
                ("ES", 50.0),
                ("MES", 5.0),
                ("GC", 100.0),
                ("MGC", 10.0)
            ]
        );
    }

    #[test]
    fn lookup_by_code() {
        assert_eq!(Instrument::from_code("/mnq"), Some(Instrument::Mnq));
        assert_eq!(Instrument::from_code("ES"), Some(Instrument::Es));
        assert_eq!(Instrument::from_code("CL"), None);
    }

    #[test]
    fn dated_contract_symbols() {
        assert_eq!(Instrument::from_symbol("MNQZ5"), Some(Instrument::Mnq));
        assert_eq!(Instrument::from_symbol("/NQH6"), Some(Instrument::Nq));
        assert_eq!(Instrument::from_symbol("MGCG6"), Some(Instrument::Mgc));
        assert_eq!(Instrument::from_symbol("6EH6"), None);
    }

    #[test]
    fn selecting_an_instrument_sets_point_value() {
        let mut risk = RiskHelper::default();
        risk.select_instrument(Instrument::Mes);
        assert_eq!(risk.point_value, Some(5.0));
        assert_eq!(risk.instrument, Some(Instrument::Mes));
    }

    #[test]
    fn draft_survives_json() {
        let mut draft = TradeDraft::default();
        draft.trade.symbol = "ESZ4".into();
        draft.risk.select_instrument(Instrument::Es);
        draft.risk.contracts = Some(2.0);

        let json = serde_json::to_string(&draft).unwrap();
        let back: TradeDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Session & settings
// ═══════════════════════════════════════════════════════════════════

mod session {
    use super::*;

    #[test]
    fn debug_redacts_secrets() {
        let s = format!("{:?}", Session::new("tok-123", "alice"));
        assert!(s.contains("alice"));
        assert!(!s.contains("tok-123"));

        let c = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(!c.contains("hunter2"));
    }

    #[test]
    fn login_reply_defaults() {
        let r: LoginResponse = serde_json::from_str(r#"{"token": "t"}"#).unwrap();
        assert_eq!(r.token, "t");
        assert!(r.username.is_empty());
        assert!(!r.active);
    }
}

mod settings {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.api_url, DEFAULT_API_URL);
        assert_eq!(s.recent_days, 14);
        assert_eq!(s.request_timeout_secs, 30);
        assert!(s.filter_trades_by_username);
    }

    #[test]
    fn env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TRADE_JOURNAL_API_URL", "http://localhost:8000/"),
            ("TRADE_JOURNAL_TIMEOUT_SECS", "5"),
            ("TRADE_JOURNAL_RECENT_DAYS", "not-a-number"),
        ]);
        let s = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(s.api_url, "http://localhost:8000");
        assert_eq!(s.request_timeout_secs, 5);
        assert_eq!(s.recent_days, 14);
    }
}
