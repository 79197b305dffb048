use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};

/// The start and end of the calendar day containing `now` in the server's local time zone, as a half-open UTC range.
///
/// Returns `None` only if local midnight does not exist, which some time zones manage on a DST switch.
pub fn local_day_bounds(now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    day_bounds_in(&Local, now)
}

pub fn day_bounds_in<Tz: TimeZone>(tz: &Tz, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let today = now.with_timezone(tz).date_naive();
    let tomorrow = today.checked_add_days(Days::new(1))?;
    Some((midnight(tz, today)?, midnight(tz, tomorrow)?))
}

fn midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Utc>> {
    let start = day.and_hms_opt(0, 0, 0)?;
    tz.from_local_datetime(&start).earliest().map(|t| t.with_timezone(&Utc))
}
