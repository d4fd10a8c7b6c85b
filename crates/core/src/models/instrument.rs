use serde::{Deserialize, Serialize};

/// Futures contracts the journal knows the point value of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    /// Nasdaq-100 E-mini
    Nq,
    /// Micro Nasdaq-100
    Mnq,
    /// S&P 500 E-mini
    Es,
    /// Micro S&P 500
    Mes,
    /// Gold
    Gc,
    /// Micro Gold
    Mgc,
}

impl Instrument {
    pub const ALL: [Instrument; 6] = [
        Instrument::Nq,
        Instrument::Mnq,
        Instrument::Es,
        Instrument::Mes,
        Instrument::Gc,
        Instrument::Mgc,
    ];

    /// Look up by exchange code. Case-insensitive; a leading `/` (as broker
    /// platforms print it) is ignored.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().trim_start_matches('/');
        Self::ALL
            .into_iter()
            .find(|i| i.code().eq_ignore_ascii_case(code))
    }

    /// Root of a dated contract symbol such as `MNQZ5` or `/ESH6`.
    /// The longest matching code wins, so `MNQ…` is never read as `NQ`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let symbol = symbol.trim().trim_start_matches('/').to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .filter(|i| symbol.starts_with(i.code()))
            .max_by_key(|i| i.code().len())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Instrument::Nq => "NQ",
            Instrument::Mnq => "MNQ",
            Instrument::Es => "ES",
            Instrument::Mes => "MES",
            Instrument::Gc => "GC",
            Instrument::Mgc => "MGC",
        }
    }

    /// Dollars per full point of price movement, per contract.
    pub fn point_value(&self) -> f64 {
        match self {
            Instrument::Nq => 20.0,
            Instrument::Mnq => 2.0,
            Instrument::Es => 50.0,
            Instrument::Mes => 5.0,
            Instrument::Gc => 100.0,
            Instrument::Mgc => 10.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Instrument::Nq => "Nasdaq-100 (NQ) — Standard NQ: $20 per point",
            Instrument::Mnq => "Micro Nasdaq-100 (MNQ) — Micro MNQ: $2 per point",
            Instrument::Es => "S&P 500 (ES) — Standard ES: $50 per point",
            Instrument::Mes => "Micro S&P 500 (MES) — Micro MES: $5 per point",
            Instrument::Gc => "Gold (GC) — Standard GC: $100 per point",
            Instrument::Mgc => "Micro Gold (MGC) — Micro MGC: $10 per point",
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
