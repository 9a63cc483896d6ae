use std::fmt;

use serde::Serialize;

/// Closed set of quote outcomes. Everything except `Ok` is a reason the
/// broker will not honor the trade as submitted; all are recoverable by
/// retrying with different inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    /// Weekend or fixed holiday (Jan 1, Dec 25).
    DayOff,
    /// Broker does not accept trades during its night window.
    NightHours,
    /// The suspended minutes around certain hour boundaries.
    ShoulderMinutes,
    TooLittleTime,
    TooMuchTime,
    CurrencyPairMissing,
    TooLittleMoney,
    /// No reference quotes from the external feed (Monday 00:xx UTC).
    FeedBlackout,
    /// Duration inside the broker's bounds but outside every payout bucket.
    ExpirationError,
    /// Target win-rate at or below breakeven for the applicable payout.
    TooLittleWinrate,
    /// Settlement instant falls on a closed market day.
    ExpiryPastMarketClose,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Ok => "ok",
            Status::DayOff => "day_off",
            Status::NightHours => "night_hours",
            Status::ShoulderMinutes => "shoulder_minutes",
            Status::TooLittleTime => "too_little_time",
            Status::TooMuchTime => "too_much_time",
            Status::CurrencyPairMissing => "currency_pair_missing",
            Status::TooLittleMoney => "too_little_money",
            Status::FeedBlackout => "feed_blackout",
            Status::ExpirationError => "expiration_error",
            Status::TooLittleWinrate => "too_little_winrate",
            Status::ExpiryPastMarketClose => "expiry_past_market_close",
        };
        write!(f, "{s}")
    }
}

/// Result of a payout query. On any non-`Ok` status the payout is 0 so the
/// number stays conservative even if the caller ignores the status.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PayoutQuote {
    pub payout: f64,
    pub status: Status,
}

impl PayoutQuote {
    pub fn ok(payout: f64) -> Self {
        Self {
            payout,
            status: Status::Ok,
        }
    }

    pub fn reject(status: Status) -> Self {
        Self {
            payout: 0.0,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Result of a stake-sizing query. Numerics are zeroed on failure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StakeQuote {
    pub stake: f64,
    pub payout: f64,
    pub status: Status,
}

impl StakeQuote {
    pub fn ok(stake: f64, payout: f64) -> Self {
        Self {
            stake,
            payout,
            status: Status::Ok,
        }
    }

    pub fn reject(status: Status) -> Self {
        Self {
            stake: 0.0,
            payout: 0.0,
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Inputs to the fractional-Kelly stake sizer.
///
/// `payout_cap` and `winrate_cap` clamp the values used inside the Kelly
/// formula for a conservative estimate; the reported payout fraction is
/// never clamped.
#[derive(Debug, Clone, Copy)]
pub struct StakeRequest {
    pub bankroll: f64,
    pub target_winrate: f64,
    /// Kelly de-rating factor in (0, 1], e.g. 0.5 for half-Kelly.
    pub attenuator: f64,
    pub payout_cap: f64,
    pub winrate_cap: f64,
}

impl StakeRequest {
    pub fn new(bankroll: f64, target_winrate: f64, attenuator: f64) -> Self {
        Self {
            bankroll,
            target_winrate,
            attenuator,
            payout_cap: 1.0,
            winrate_cap: 1.0,
        }
    }

    pub fn with_payout_cap(mut self, cap: f64) -> Self {
        self.payout_cap = cap;
        self
    }

    pub fn with_winrate_cap(mut self, cap: f64) -> Self {
        self.winrate_cap = cap;
        self
    }
}
