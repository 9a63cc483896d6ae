use serde::Deserialize;

use crate::calendar::{self, CalendarFields, CalendarRules, ShoulderRule, TimeWindow};
use crate::kelly;
use crate::status::{PayoutQuote, StakeQuote, StakeRequest, Status};
use crate::symbols::{Registry, Symbol, SymbolRef};
use crate::{AccountCurrency, PayoutModel};

pub const MIN_DURATION_SECS: u32 = 180;
pub const MAX_DURATION_SECS: u32 = 30_000;

/// 2019-01-09 00:00 UTC, the terms change that raised the payout tiers.
const TERMS_2019_EPOCH: i64 = 1_546_992_000;

/// The broker's symbol catalog. Indexes are stable for this catalog version.
pub const CATALOG: [Symbol; 26] = [
    Symbol::tradable("EURUSD"),
    Symbol::tradable("USDJPY"),
    Symbol::tradable("GBPUSD"),
    Symbol::tradable("USDCHF"),
    Symbol::tradable("USDCAD"),
    Symbol::tradable("EURJPY"),
    Symbol::tradable("AUDUSD"),
    Symbol::tradable("NZDUSD"),
    Symbol::tradable("EURGBP"),
    Symbol::tradable("EURCHF"),
    Symbol::tradable("AUDJPY"),
    Symbol::tradable("GBPJPY"),
    Symbol::tradable("CHFJPY"),
    Symbol::tradable("EURCAD"),
    Symbol::tradable("AUDCAD"),
    Symbol::tradable("CADJPY"),
    Symbol::tradable("NZDJPY"),
    Symbol::tradable("AUDNZD"),
    Symbol::tradable("GBPAUD"),
    Symbol::tradable("EURAUD"),
    Symbol::tradable("GBPCHF"),
    Symbol::tradable("EURNZD"),
    Symbol::tradable("AUDCHF"),
    Symbol::tradable("GBPNZD"),
    Symbol::tradable("GBPCAD"),
    Symbol::tradable("XAUUSD"),
];

/// Which historical rule set is in force. Backtesting a trade must use the
/// revision active at the trade's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleRevision {
    /// Original terms: calendar checked before duration bounds, weekend is
    /// an explicit rejection, night runs 21:00-01:00 UTC, wide shoulder
    /// windows, tier fractions switch at the 2019-01-09 terms change.
    Launch2018,
    /// Post-change terms: weekend quotes silently as zero payout, Monday
    /// 00:xx feed blackout, narrow shoulder rejection, strict tier buckets.
    Terms2019,
    /// As Terms2019 but the shoulder window discounts instead of rejecting
    /// (0.60, or 0.63 at the high-stake threshold).
    Current,
}

#[derive(Debug, Clone, Copy)]
struct TierSet {
    high: f64,
    mid: f64,
    low: f64,
}

const TIERS_LAUNCH: TierSet = TierSet {
    high: 0.84,
    mid: 0.80,
    low: 0.77,
};

const TIERS_2019: TierSet = TierSet {
    high: 0.85,
    mid: 0.82,
    low: 0.79,
};

impl RuleRevision {
    fn calendar(self) -> CalendarRules {
        match self {
            RuleRevision::Launch2018 => CalendarRules {
                night_start: 21,
                reopen_hour: 1,
                monday_blackout: false,
                shoulder: ShoulderRule::WideEvening,
            },
            RuleRevision::Terms2019 => CalendarRules {
                night_start: 21,
                reopen_hour: 0,
                monday_blackout: true,
                shoulder: ShoulderRule::LateMinutes,
            },
            RuleRevision::Current => CalendarRules {
                night_start: 21,
                reopen_hour: 0,
                monday_blackout: true,
                shoulder: ShoulderRule::None,
            },
        }
    }

    fn calendar_before_duration(self) -> bool {
        matches!(self, RuleRevision::Launch2018)
    }

    fn day_off_rejects(self) -> bool {
        matches!(self, RuleRevision::Launch2018)
    }

    fn has_discount_window(self) -> bool {
        matches!(self, RuleRevision::Current)
    }

    fn tiers(self, timestamp: i64) -> TierSet {
        match self {
            RuleRevision::Launch2018 if timestamp < TERMS_2019_EPOCH => TIERS_LAUNCH,
            _ => TIERS_2019,
        }
    }

    /// The mid payout bucket narrowed from 180-239 s to exactly 180 s at
    /// the 2019 terms change, opening an `ExpirationError` gap below 240 s.
    fn in_mid_bucket(self, duration_secs: u32) -> bool {
        match self {
            RuleRevision::Launch2018 => (180..240).contains(&duration_secs),
            _ => duration_secs == 180,
        }
    }
}

/// Payout resolver and stake sizer for the IntradeBar broker.
#[derive(Debug)]
pub struct IntradeBar {
    currency: AccountCurrency,
    revision: RuleRevision,
    registry: Registry,
}

impl IntradeBar {
    pub fn new(currency: AccountCurrency, revision: RuleRevision) -> Self {
        Self {
            currency,
            revision,
            registry: Registry::new(&CATALOG),
        }
    }

    pub fn revision(&self) -> RuleRevision {
        self.revision
    }

    /// Stake at or above which the top payout tier applies.
    fn high_stake_threshold(&self) -> f64 {
        match self.currency {
            AccountCurrency::Usd => 80.0,
            AccountCurrency::Rub => 5000.0,
        }
    }

    /// Hours 14:00-21:00 and 00:00-05:00 UTC pay a reduced uniform fraction
    /// in the minutes around the hour boundary (current terms only).
    fn in_discount_window(f: &CalendarFields) -> bool {
        (f.hour < 5 || f.hour >= 14) && (f.minute >= 57 || f.minute <= 3)
    }

    /// Fraction for a below-threshold stake, by duration bucket.
    fn low_tier_fraction(&self, timestamp: i64, duration_secs: u32) -> Result<f64, Status> {
        let tiers = self.revision.tiers(timestamp);
        if self.revision.in_mid_bucket(duration_secs) {
            Ok(tiers.mid)
        } else if (240..=MAX_DURATION_SECS).contains(&duration_secs) {
            Ok(tiers.low)
        } else {
            Err(Status::ExpirationError)
        }
    }
}

impl PayoutModel for IntradeBar {
    fn symbols(&self) -> &[Symbol] {
        self.registry.symbols()
    }

    fn resolve_symbol(&self, sym: SymbolRef<'_>) -> Result<usize, Status> {
        self.registry
            .resolve(sym)
            .ok_or(Status::CurrencyPairMissing)
    }

    fn quote_payout(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        stake: f64,
    ) -> PayoutQuote {
        let rules = self.revision.calendar();
        if self.revision.calendar_before_duration() {
            match calendar::classify(&rules, timestamp) {
                TimeWindow::Open => {}
                window => return PayoutQuote::reject(super::window_status(window)),
            }
        }
        if duration_secs < MIN_DURATION_SECS {
            return PayoutQuote::reject(Status::TooLittleTime);
        }
        if duration_secs > MAX_DURATION_SECS {
            return PayoutQuote::reject(Status::TooMuchTime);
        }
        if self.registry.resolve(sym).is_none() {
            return PayoutQuote::reject(Status::CurrencyPairMissing);
        }
        if stake < self.currency.min_stake() {
            return PayoutQuote::reject(Status::TooLittleMoney);
        }
        if !self.revision.calendar_before_duration() {
            match calendar::classify(&rules, timestamp) {
                TimeWindow::Open => {}
                // Closed-market days quote as a silent zero under these
                // terms; night/blackout stay explicit rejections.
                TimeWindow::DayOff => return PayoutQuote::ok(0.0),
                window => return PayoutQuote::reject(super::window_status(window)),
            }
        }

        if self.revision.has_discount_window() {
            if let Some(f) = calendar::fields(timestamp) {
                if Self::in_discount_window(&f) {
                    let payout = if stake >= self.high_stake_threshold() {
                        0.63
                    } else {
                        0.60
                    };
                    return PayoutQuote::ok(payout);
                }
            }
        }

        if stake >= self.high_stake_threshold() {
            return PayoutQuote::ok(self.revision.tiers(timestamp).high);
        }
        match self.low_tier_fraction(timestamp, duration_secs) {
            Ok(payout) => PayoutQuote::ok(payout),
            Err(status) => PayoutQuote::reject(status),
        }
    }

    fn quote_stake(
        &self,
        sym: SymbolRef<'_>,
        timestamp: i64,
        duration_secs: u32,
        request: &StakeRequest,
    ) -> StakeQuote {
        if duration_secs < MIN_DURATION_SECS {
            return StakeQuote::reject(Status::TooLittleTime);
        }
        if duration_secs > MAX_DURATION_SECS {
            return StakeQuote::reject(Status::TooMuchTime);
        }
        if self.registry.resolve(sym).is_none() {
            return StakeQuote::reject(Status::CurrencyPairMissing);
        }
        match calendar::classify(&self.revision.calendar(), timestamp) {
            TimeWindow::Open => {}
            TimeWindow::DayOff if self.revision.day_off_rejects() => {
                return StakeQuote::reject(Status::DayOff)
            }
            TimeWindow::DayOff => {
                return StakeQuote {
                    stake: 0.0,
                    payout: 0.0,
                    status: Status::Ok,
                }
            }
            window => return StakeQuote::reject(super::window_status(window)),
        }

        let discounted = self.revision.has_discount_window()
            && calendar::fields(timestamp).is_some_and(|f| Self::in_discount_window(&f));

        // The stake tier depends on the stake being computed, so evaluate
        // the high tier first and keep it only if the result clears the
        // threshold; otherwise redo with the duration-bucket fraction.
        let high = if discounted {
            0.63
        } else {
            self.revision.tiers(timestamp).high
        };
        let Some(fraction) = kelly::stake_fraction(
            high,
            request.target_winrate,
            request.attenuator,
            request.payout_cap,
            request.winrate_cap,
        ) else {
            return StakeQuote::reject(Status::TooLittleWinrate);
        };
        let mut stake = request.bankroll * fraction;
        let mut payout = high;

        if stake < self.high_stake_threshold() {
            let low = if discounted {
                0.60
            } else {
                match self.low_tier_fraction(timestamp, duration_secs) {
                    Ok(p) => p,
                    Err(status) => return StakeQuote::reject(status),
                }
            };
            let Some(fraction) = kelly::stake_fraction(
                low,
                request.target_winrate,
                request.attenuator,
                request.payout_cap,
                request.winrate_cap,
            ) else {
                return StakeQuote::reject(Status::TooLittleWinrate);
            };
            stake = request.bankroll * fraction;
            payout = low;
        }

        if stake < self.currency.min_stake() {
            return StakeQuote::reject(Status::TooLittleMoney);
        }
        StakeQuote::ok(stake, payout)
    }
}
