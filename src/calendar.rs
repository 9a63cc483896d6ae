use chrono::{Datelike, TimeZone, Timelike, Utc, Weekday};

/// Where a timestamp falls in the broker's trading schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Open,
    /// Weekend or fixed holiday (Jan 1, Dec 25).
    DayOff,
    NightHours,
    ShoulderMinutes,
    /// Monday 00:xx UTC, no external reference quotes.
    FeedBlackout,
}

/// Shape of the suspended minutes around hour boundaries. Varies by broker
/// rule revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoulderRule {
    None,
    /// 13:59; hours 14-19 at :59, :00, :01; 21:00-:01.
    WideEvening,
    /// 13:59; hour >= 14 at :59 or <= :03.
    LateMinutes,
}

/// Calendar thresholds in force for one broker rule revision.
#[derive(Debug, Clone, Copy)]
pub struct CalendarRules {
    /// First closed hour of the night window, UTC.
    pub night_start: u32,
    /// First open hour after the night window, UTC. 0 means the window
    /// ends at midnight.
    pub reopen_hour: u32,
    /// Monday 00:xx UTC feed blackout.
    pub monday_blackout: bool,
    pub shoulder: ShoulderRule,
}

/// Calendar fields of a UTC timestamp, as the engine consumes them.
#[derive(Debug, Clone, Copy)]
pub struct CalendarFields {
    pub weekday: Weekday,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Decompose a Unix timestamp into UTC calendar fields. Returns `None` for
/// instants outside chrono's representable range.
pub fn fields(timestamp: i64) -> Option<CalendarFields> {
    let dt = Utc.timestamp_opt(timestamp, 0).single()?;
    Some(CalendarFields {
        weekday: dt.weekday(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
    })
}

/// Classify a timestamp against a revision's calendar. First match wins:
/// day off, feed blackout, night hours, shoulder minutes, open.
pub fn classify(rules: &CalendarRules, timestamp: i64) -> TimeWindow {
    let Some(f) = fields(timestamp) else {
        // Unrepresentable instant: the market is certainly not open.
        return TimeWindow::DayOff;
    };
    classify_fields(rules, &f)
}

pub fn classify_fields(rules: &CalendarRules, f: &CalendarFields) -> TimeWindow {
    if is_day_off(f) {
        return TimeWindow::DayOff;
    }
    if rules.monday_blackout && f.weekday == Weekday::Mon && f.hour == 0 {
        return TimeWindow::FeedBlackout;
    }
    if f.hour >= rules.night_start || f.hour < rules.reopen_hour {
        return TimeWindow::NightHours;
    }
    if in_shoulder(rules.shoulder, f.hour, f.minute) {
        return TimeWindow::ShoulderMinutes;
    }
    TimeWindow::Open
}

pub fn is_day_off(f: &CalendarFields) -> bool {
    f.weekday == Weekday::Sat
        || f.weekday == Weekday::Sun
        || (f.month == 1 && f.day == 1)
        || (f.month == 12 && f.day == 25)
}

fn in_shoulder(rule: ShoulderRule, hour: u32, minute: u32) -> bool {
    match rule {
        ShoulderRule::None => false,
        ShoulderRule::WideEvening => {
            (hour == 13 && minute == 59)
                || ((14..=19).contains(&hour) && (minute == 59 || minute <= 1))
                || (hour == 21 && minute <= 1)
        }
        ShoulderRule::LateMinutes => {
            (hour == 13 && minute == 59) || (hour >= 14 && (minute == 59 || minute <= 3))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_SHOULDER: CalendarRules = CalendarRules {
        night_start: 21,
        reopen_hour: 0,
        monday_blackout: true,
        shoulder: ShoulderRule::None,
    };

    // 2019-03-05 (Tuesday) 00:00 UTC
    const TUE: i64 = 1_551_744_000;
    // 2019-03-09 (Saturday) 00:00 UTC
    const SAT: i64 = 1_552_089_600;
    // 2019-03-04 (Monday) 00:00 UTC
    const MON: i64 = 1_551_657_600;

    fn at(day: i64, hour: i64, minute: i64) -> i64 {
        day + hour * 3600 + minute * 60
    }

    #[test]
    fn weekend_is_day_off() {
        assert_eq!(classify(&NO_SHOULDER, at(SAT, 12, 0)), TimeWindow::DayOff);
        assert_eq!(
            classify(&NO_SHOULDER, at(SAT + 86_400, 12, 0)),
            TimeWindow::DayOff
        );
    }

    #[test]
    fn fixed_holidays_are_day_off() {
        // 2019-01-01 was a Tuesday, 2019-12-25 a Wednesday.
        assert_eq!(
            classify(&NO_SHOULDER, at(1_546_300_800, 12, 0)),
            TimeWindow::DayOff
        );
        assert_eq!(
            classify(&NO_SHOULDER, at(1_577_232_000, 12, 0)),
            TimeWindow::DayOff
        );
    }

    #[test]
    fn monday_midnight_blackout() {
        assert_eq!(
            classify(&NO_SHOULDER, at(MON, 0, 30)),
            TimeWindow::FeedBlackout
        );
        assert_eq!(classify(&NO_SHOULDER, at(MON, 1, 0)), TimeWindow::Open);
        let no_blackout = CalendarRules {
            monday_blackout: false,
            ..NO_SHOULDER
        };
        assert_eq!(classify(&no_blackout, at(MON, 0, 30)), TimeWindow::Open);
    }

    #[test]
    fn night_window_with_reopen() {
        let rules = CalendarRules {
            night_start: 21,
            reopen_hour: 1,
            monday_blackout: false,
            shoulder: ShoulderRule::None,
        };
        assert_eq!(classify(&rules, at(TUE, 21, 0)), TimeWindow::NightHours);
        assert_eq!(classify(&rules, at(TUE, 23, 59)), TimeWindow::NightHours);
        assert_eq!(classify(&rules, at(TUE, 0, 30)), TimeWindow::NightHours);
        assert_eq!(classify(&rules, at(TUE, 1, 0)), TimeWindow::Open);
    }

    #[test]
    fn wide_evening_shoulder() {
        let rules = CalendarRules {
            night_start: 21,
            reopen_hour: 1,
            monday_blackout: false,
            shoulder: ShoulderRule::WideEvening,
        };
        assert_eq!(
            classify(&rules, at(TUE, 13, 59)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(
            classify(&rules, at(TUE, 15, 0)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(
            classify(&rules, at(TUE, 19, 59)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(classify(&rules, at(TUE, 15, 2)), TimeWindow::Open);
        assert_eq!(classify(&rules, at(TUE, 20, 0)), TimeWindow::Open);
        // Night takes precedence over the 21:00-:01 shoulder arm.
        assert_eq!(classify(&rules, at(TUE, 21, 1)), TimeWindow::NightHours);
    }

    #[test]
    fn late_minutes_shoulder() {
        let rules = CalendarRules {
            shoulder: ShoulderRule::LateMinutes,
            ..NO_SHOULDER
        };
        assert_eq!(
            classify(&rules, at(TUE, 13, 59)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(
            classify(&rules, at(TUE, 14, 3)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(
            classify(&rules, at(TUE, 18, 59)),
            TimeWindow::ShoulderMinutes
        );
        assert_eq!(classify(&rules, at(TUE, 14, 4)), TimeWindow::Open);
        assert_eq!(classify(&rules, at(TUE, 10, 59)), TimeWindow::Open);
    }

    #[test]
    fn weekday_morning_is_open() {
        assert_eq!(classify(&NO_SHOULDER, at(TUE, 10, 0)), TimeWindow::Open);
    }

    #[test]
    fn unrepresentable_timestamp_is_day_off() {
        assert_eq!(classify(&NO_SHOULDER, i64::MAX), TimeWindow::DayOff);
    }
}
