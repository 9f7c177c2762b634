//! Polish, Europe/Warsaw presentation of event dates.
//!
//! Whatever shape a date was normalized from, it is shown on the Warsaw civil
//! clock. Invalid dates render as nothing rather than failing.

use chrono::{Datelike, NaiveDate, Timelike, Utc};

use crate::date::{DISPLAY_TZ, EventDate};

const MONTHS_GENITIVE: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

/// Today's date on the Warsaw calendar.
pub fn today() -> NaiveDate {
    Utc::now().with_timezone(&DISPLAY_TZ).date_naive()
}

/// Long Polish date, e.g. `15 stycznia 2024`.
pub fn format_date(date: &EventDate) -> Option<String> {
    let local = date.local()?;
    let month = MONTHS_GENITIVE[local.month0() as usize];
    Some(format!("{} {} {}", local.day(), month, local.year()))
}

/// 24-hour `HH:MM`.
pub fn format_time(date: &EventDate) -> Option<String> {
    date.local().map(|local| local.format("%H:%M").to_string())
}

/// Whole calendar days from `today` until the event; `None` once it is past.
pub fn days_until(date: &EventDate, today: NaiveDate) -> Option<i64> {
    let days = (date.local()?.date() - today).num_days();
    (days >= 0).then_some(days)
}

/// Short countdown label: `Dzisiaj`, `Jutro`, `Za 3 d.`, `Za 2 tyg.`, `Za 4 m.`
pub fn days_until_label(date: &EventDate, today: NaiveDate) -> Option<String> {
    let label = match days_until(date, today)? {
        0 => "Dzisiaj".to_string(),
        1 => "Jutro".to_string(),
        days if days < 7 => format!("Za {} d.", days),
        days if days < 30 => format!("Za {} tyg.", ceil_div(days, 7)),
        days => format!("Za {} m.", ceil_div(days, 30)),
    };
    Some(label)
}

/// An event is shown without a time when it spans at least a day or starts
/// at midnight.
pub fn is_all_day(start: &EventDate, end: &EventDate) -> bool {
    let (Some(start_at), Some(end_at)) = (start.instant(), end.instant()) else {
        return false;
    };

    if (end_at - start_at).num_hours() >= 24 {
        return true;
    }

    start
        .local()
        .is_some_and(|local| local.hour() == 0 && local.minute() == 0)
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1) / divisor
}
