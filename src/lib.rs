//! Payout determination and position sizing for binary-options brokers.
//!
//! Given a timestamp, symbol, expiry duration, and a stake (or a target
//! win-rate and bankroll), the engine decides whether the broker accepts
//! the trade and what fraction of the stake a correct prediction pays.
//! Everything is computed from the explicit arguments and fixed catalogs;
//! no clock reads, no I/O, no state between calls.

pub mod brokers;
pub mod calendar;
pub mod config;
pub mod kelly;
pub mod logging;
pub mod status;
pub mod symbols;

use serde::Deserialize;

pub use brokers::grand_capital::GrandCapital;
pub use brokers::intrade_bar::{IntradeBar, RuleRevision};
pub use status::{PayoutQuote, StakeQuote, StakeRequest, Status};
pub use symbols::{Symbol, SymbolRef};

/// Supported broker profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Broker {
    IntradeBar,
    GrandCapital,
}

impl Broker {
    pub fn engine(self, currency: AccountCurrency, revision: RuleRevision) -> PayoutEngine {
        match self {
            Broker::IntradeBar => PayoutEngine::IntradeBar(IntradeBar::new(currency, revision)),
            Broker::GrandCapital => PayoutEngine::GrandCapital(GrandCapital::new(currency)),
        }
    }
}

/// Account currency; sets the minimum-stake and tier thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountCurrency {
    Rub,
    Usd,
}

impl AccountCurrency {
    /// Smallest stake the broker accepts in this currency.
    pub fn min_stake(self) -> f64 {
        match self {
            AccountCurrency::Rub => 50.0,
            AccountCurrency::Usd => 1.0,
        }
    }
}

/// The capability surface shared by all broker models.
pub trait PayoutModel {
    /// The broker's symbol catalog, in stable index order.
    fn symbols(&self) -> &[Symbol];

    /// Validate a symbol name or index against the catalog.
    fn resolve_symbol(&self, sym: SymbolRef<'_>) -> Result<usize, Status>;

    /// Payout fraction for a prospective trade, or why it is rejected.
    fn quote_payout(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        stake: f64,
    ) -> PayoutQuote;

    /// Largest admissible stake under a fractional-Kelly risk budget, with
    /// the payout fraction it self-consistently lands on.
    fn quote_stake(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        request: &StakeRequest,
    ) -> StakeQuote;
}

/// Broker dispatch over the shared capability surface.
#[derive(Debug)]
pub enum PayoutEngine {
    IntradeBar(IntradeBar),
    GrandCapital(GrandCapital),
}

impl PayoutModel for PayoutEngine {
    fn symbols(&self) -> &[Symbol] {
        match self {
            PayoutEngine::IntradeBar(m) => m.symbols(),
            PayoutEngine::GrandCapital(m) => m.symbols(),
        }
    }

    fn resolve_symbol(&self, sym: SymbolRef<'_>) -> Result<usize, Status> {
        match self {
            PayoutEngine::IntradeBar(m) => m.resolve_symbol(sym),
            PayoutEngine::GrandCapital(m) => m.resolve_symbol(sym),
        }
    }

    fn quote_payout(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        stake: f64,
    ) -> PayoutQuote {
        match self {
            PayoutEngine::IntradeBar(m) => m.quote_payout(sym, timestamp, duration_secs, stake),
            PayoutEngine::GrandCapital(m) => m.quote_payout(sym, timestamp, duration_secs, stake),
        }
    }

    fn quote_stake(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        request: &StakeRequest,
    ) -> StakeQuote {
        match self {
            PayoutEngine::IntradeBar(m) => m.quote_stake(sym, timestamp, duration_secs, request),
            PayoutEngine::GrandCapital(m) => m.quote_stake(sym, timestamp, duration_secs, request),
        }
    }
}
