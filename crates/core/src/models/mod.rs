pub mod analytics;
pub mod backtest;
pub mod breakdown;
pub mod chart;
pub mod draft;
pub mod import;
pub mod instrument;
pub(crate) mod lenient;
pub mod period;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod trade;

