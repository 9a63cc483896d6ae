use crate::calendar::{self, CalendarRules, ShoulderRule, TimeWindow};
use crate::kelly;
use crate::status::{PayoutQuote, StakeQuote, StakeRequest, Status};
use crate::symbols::{Registry, Symbol, SymbolRef};
use crate::{AccountCurrency, PayoutModel};

pub const MIN_DURATION_SECS: u32 = 60;
pub const MAX_DURATION_SECS: u32 = 172_800;

const CALENDAR: CalendarRules = CalendarRules {
    night_start: 20,
    reopen_hour: 0,
    monday_blackout: false,
    shoulder: ShoulderRule::None,
};

/// Symbol catalog with the per-symbol base payout fraction. The payout is
/// flat per symbol; no stake or duration tiering.
pub const CATALOG: [Symbol; 31] = [
    Symbol::tradable("EURUSD"),
    Symbol::tradable("GBPUSD"),
    Symbol::tradable("USDJPY"),
    Symbol::tradable("USDCHF"),
    Symbol::tradable("USDCAD"),
    Symbol::tradable("AUDUSD"),
    Symbol::tradable("NZDUSD"),
    Symbol::tradable("EURGBP"),
    Symbol::tradable("EURJPY"),
    Symbol::tradable("EURCHF"),
    Symbol::tradable("EURCAD"),
    Symbol::tradable("EURAUD"),
    Symbol::tradable("EURNZD"),
    Symbol::tradable("GBPJPY"),
    Symbol::tradable("GBPCHF"),
    Symbol::tradable("GBPAUD"),
    Symbol::tradable("GBPCAD"),
    Symbol::tradable("GBPNZD"),
    Symbol::tradable("AUDJPY"),
    Symbol::tradable("AUDCAD"),
    Symbol::tradable("AUDCHF"),
    Symbol::tradable("AUDNZD"),
    Symbol::tradable("NZDJPY"),
    Symbol::tradable("NZDCAD"),
    Symbol::tradable("NZDCHF"),
    Symbol::tradable("CADJPY"),
    Symbol::suspended("CADCHF"),
    Symbol::tradable("CHFJPY"),
    Symbol::suspended("USDRUB"),
    Symbol::tradable("XAUUSD"),
    Symbol::tradable("XAGUSD"),
];

const BASE_PAYOUT: [f64; 31] = [
    0.80, // EURUSD
    0.80, // GBPUSD
    0.80, // USDJPY
    0.78, // USDCHF
    0.78, // USDCAD
    0.80, // AUDUSD
    0.78, // NZDUSD
    0.76, // EURGBP
    0.78, // EURJPY
    0.75, // EURCHF
    0.75, // EURCAD
    0.75, // EURAUD
    0.73, // EURNZD
    0.78, // GBPJPY
    0.74, // GBPCHF
    0.74, // GBPAUD
    0.74, // GBPCAD
    0.72, // GBPNZD
    0.76, // AUDJPY
    0.74, // AUDCAD
    0.74, // AUDCHF
    0.72, // AUDNZD
    0.74, // NZDJPY
    0.72, // NZDCAD
    0.72, // NZDCHF
    0.75, // CADJPY
    0.73, // CADCHF
    0.75, // CHFJPY
    0.70, // USDRUB
    0.72, // XAUUSD
    0.70, // XAGUSD
];

/// Payout resolver and stake sizer for the GrandCapital broker.
#[derive(Debug)]
pub struct GrandCapital {
    currency: AccountCurrency,
    registry: Registry,
}

impl GrandCapital {
    pub fn new(currency: AccountCurrency) -> Self {
        Self {
            currency,
            registry: Registry::new(&CATALOG),
        }
    }

    /// Expiries run to 48 h, long enough for a weekday trade to settle on
    /// a closed day.
    fn settles_on_closed_day(timestamp: i64, duration_secs: u32) -> bool {
        let settlement = timestamp.saturating_add(i64::from(duration_secs));
        calendar::classify(&CALENDAR, settlement) == TimeWindow::DayOff
    }
}

impl PayoutModel for GrandCapital {
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
        if duration_secs < MIN_DURATION_SECS {
            return PayoutQuote::reject(Status::TooLittleTime);
        }
        if duration_secs > MAX_DURATION_SECS {
            return PayoutQuote::reject(Status::TooMuchTime);
        }
        let Some(index) = self.registry.resolve(sym) else {
            return PayoutQuote::reject(Status::CurrencyPairMissing);
        };
        if stake < self.currency.min_stake() {
            return PayoutQuote::reject(Status::TooLittleMoney);
        }
        match calendar::classify(&CALENDAR, timestamp) {
            TimeWindow::Open => {}
            // Closed-market days are a silent zero payout here.
            TimeWindow::DayOff => return PayoutQuote::ok(0.0),
            window => return PayoutQuote::reject(super::window_status(window)),
        }
        if Self::settles_on_closed_day(timestamp, duration_secs) {
            return PayoutQuote::reject(Status::ExpiryPastMarketClose);
        }
        PayoutQuote::ok(BASE_PAYOUT[index])
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
        let Some(index) = self.registry.resolve(sym) else {
            return StakeQuote::reject(Status::CurrencyPairMissing);
        };
        match calendar::classify(&CALENDAR, timestamp) {
            TimeWindow::Open => {}
            TimeWindow::DayOff => {
                return StakeQuote {
                    stake: 0.0,
                    payout: 0.0,
                    status: Status::Ok,
                }
            }
            window => return StakeQuote::reject(super::window_status(window)),
        }
        if Self::settles_on_closed_day(timestamp, duration_secs) {
            return StakeQuote::reject(Status::ExpiryPastMarketClose);
        }

        let payout = BASE_PAYOUT[index];
        let Some(fraction) = kelly::stake_fraction(
            payout,
            request.target_winrate,
            request.attenuator,
            request.payout_cap,
            request.winrate_cap,
        ) else {
            return StakeQuote::reject(Status::TooLittleWinrate);
        };
        let stake = request.bankroll * fraction;
        if stake < self.currency.min_stake() {
            return StakeQuote::reject(Status::TooLittleMoney);
        }
        StakeQuote::ok(stake, payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2019-03-05 (Tuesday) 00:00 UTC
    const TUE: i64 = 1_551_744_000;
    // 2019-03-08 (Friday) 00:00 UTC
    const FRI: i64 = 1_552_003_200;
    // 2019-03-09 (Saturday) 00:00 UTC
    const SAT: i64 = 1_552_089_600;

    fn at(day: i64, hour: i64, minute: i64) -> i64 {
        day + hour * 3600 + minute * 60
    }

    fn usd() -> GrandCapital {
        GrandCapital::new(AccountCurrency::Usd)
    }

    #[test]
    fn payout_is_keyed_by_symbol() {
        let model = usd();
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 180, 100.0);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.payout, 0.80);
        let q = model.quote_payout("GBPNZD".into(), at(TUE, 10, 0), 180, 100.0);
        assert_eq!(q.payout, 0.72);
        // Stake and duration do not move the fraction.
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 3600, 5.0);
        assert_eq!(q.payout, 0.80);
    }

    #[test]
    fn one_minute_expiry_is_accepted() {
        let model = usd();
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 60, 100.0);
        assert_eq!(q.status, Status::Ok);
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 59, 100.0);
        assert_eq!(q.status, Status::TooLittleTime);
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 172_801, 100.0);
        assert_eq!(q.status, Status::TooMuchTime);
    }

    #[test]
    fn night_starts_at_twenty() {
        let model = usd();
        let q = model.quote_payout("EURUSD".into(), at(TUE, 20, 0), 180, 100.0);
        assert_eq!(q.status, Status::NightHours);
        assert_eq!(q.payout, 0.0);
        let q = model.quote_payout("EURUSD".into(), at(TUE, 19, 59), 180, 100.0);
        assert_eq!(q.status, Status::Ok);
    }

    #[test]
    fn weekend_quotes_silently_as_zero() {
        let q = usd().quote_payout("EURUSD".into(), at(SAT, 12, 0), 180, 100.0);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.payout, 0.0);
    }

    #[test]
    fn settlement_inside_weekend_is_rejected() {
        let model = usd();
        // Friday 10:00 with a 48 h expiry settles on Sunday.
        let q = model.quote_payout("EURUSD".into(), at(FRI, 10, 0), 172_800, 100.0);
        assert_eq!(q.status, Status::ExpiryPastMarketClose);
        assert_eq!(q.payout, 0.0);
        // The same expiry placed on Tuesday settles on Thursday.
        let q = model.quote_payout("EURUSD".into(), at(TUE, 10, 0), 172_800, 100.0);
        assert_eq!(q.status, Status::Ok);
    }

    #[test]
    fn suspended_symbols_are_missing() {
        let model = usd();
        let q = model.quote_payout("USDRUB".into(), at(TUE, 10, 0), 180, 100.0);
        assert_eq!(q.status, Status::CurrencyPairMissing);
        let q = model.quote_payout("CADCHF".into(), at(TUE, 10, 0), 180, 100.0);
        assert_eq!(q.status, Status::CurrencyPairMissing);
    }

    #[test]
    fn minimum_stake_per_currency() {
        let q = usd().quote_payout("EURUSD".into(), at(TUE, 10, 0), 180, 0.5);
        assert_eq!(q.status, Status::TooLittleMoney);
        let rub = GrandCapital::new(AccountCurrency::Rub);
        let q = rub.quote_payout("EURUSD".into(), at(TUE, 10, 0), 180, 40.0);
        assert_eq!(q.status, Status::TooLittleMoney);
        let q = rub.quote_payout("EURUSD".into(), at(TUE, 10, 0), 180, 50.0);
        assert_eq!(q.status, Status::Ok);
    }

    #[test]
    fn sized_stake_matches_flat_payout() {
        let model = usd();
        let req = StakeRequest::new(96_000.0, 0.6, 0.4);
        let q = model.quote_stake("EURUSD".into(), at(TUE, 10, 0), 180, &req);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.payout, 0.80);
        // ((1.8 * 0.6) - 1) / 0.8 * 0.4 = 0.04 of bankroll.
        assert!((q.stake - 3840.0).abs() < 1e-9, "stake {}", q.stake);
    }

    #[test]
    fn winrate_below_breakeven_rejected() {
        let model = usd();
        // Breakeven for 0.80 is 1/1.8 ~ 0.5556.
        let req = StakeRequest::new(96_000.0, 0.55, 0.4);
        let q = model.quote_stake("EURUSD".into(), at(TUE, 10, 0), 180, &req);
        assert_eq!(q.status, Status::TooLittleWinrate);
        assert_eq!(q.stake, 0.0);
    }

    #[test]
    fn capped_winrate_below_breakeven_rejected() {
        let model = usd();
        let req = StakeRequest::new(96_000.0, 0.9, 0.4).with_winrate_cap(0.5);
        let q = model.quote_stake("EURUSD".into(), at(TUE, 10, 0), 180, &req);
        assert_eq!(q.status, Status::TooLittleWinrate);
    }

    #[test]
    fn payout_cap_can_zero_the_stake() {
        let model = usd();
        // Cap below breakeven drives the Kelly fraction negative; the
        // stake is zeroed at the minimum-stake check.
        let req = StakeRequest::new(96_000.0, 0.6, 0.4).with_payout_cap(0.5);
        let q = model.quote_stake("EURUSD".into(), at(TUE, 10, 0), 180, &req);
        assert_eq!(q.status, Status::TooLittleMoney);
        assert_eq!(q.stake, 0.0);
    }

    #[test]
    fn sizing_respects_calendar() {
        let model = usd();
        let req = StakeRequest::new(96_000.0, 0.6, 0.4);
        let q = model.quote_stake("EURUSD".into(), at(TUE, 20, 30), 180, &req);
        assert_eq!(q.status, Status::NightHours);
        let q = model.quote_stake("EURUSD".into(), at(SAT, 12, 0), 180, &req);
        assert_eq!(q.status, Status::Ok);
        assert_eq!(q.stake, 0.0);
        let q = model.quote_stake("EURUSD".into(), at(FRI, 10, 0), 172_800, &req);
        assert_eq!(q.status, Status::ExpiryPastMarketClose);
    }
}
