//! Fractional-Kelly sizing for a binary payoff: fractional return `payout`
//! on a win, total loss of the stake otherwise.

/// Win-rate at which the expected edge is zero for a given payout fraction.
pub fn breakeven_winrate(payout: f64) -> f64 {
    1.0 / (1.0 + payout)
}

/// Attenuated Kelly bet fraction of bankroll, or `None` when the target
/// win-rate does not clear breakeven.
///
/// `payout_cap` and `winrate_cap` clamp the values fed into the formula to
/// model a conservative estimate. Both breakeven checks compare against the
/// uncapped payout, so a payout cap below breakeven can drive the fraction
/// negative; callers zero such stakes at the minimum-stake check.
pub fn stake_fraction(
    payout: f64,
    winrate: f64,
    attenuator: f64,
    payout_cap: f64,
    winrate_cap: f64,
) -> Option<f64> {
    if winrate <= breakeven_winrate(payout) {
        return None;
    }
    let calc_payout = payout_cap.min(payout);
    let calc_winrate = winrate_cap.min(winrate);
    if calc_winrate <= breakeven_winrate(payout) {
        return None;
    }
    Some(((1.0 + calc_payout) * calc_winrate - 1.0) / calc_payout * attenuator)
}
