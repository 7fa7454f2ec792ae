// --- File: crates/agendify_scheduling/src/slots.rs ---
//! The slot calculator's interval walk.
//!
//! Everything in here is pure time arithmetic: the caller anchors a work-day
//! template to a calendar date and passes the busy intervals in, so the walk
//! itself never touches a store.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

/// Parses a wall-clock `HH:MM` string.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// Anchors a wall-clock time to a calendar date in the given timezone.
///
/// Returns `None` for local times a DST gap skips over.
pub fn anchor_on(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

/// The UTC half-open window `[00:00 of date, 00:00 of the next day)` in the
/// given timezone. Used to fetch the day's appointments.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let midnight = NaiveTime::MIN;
    let start = anchor_on(date, midnight, tz)?;
    let end = anchor_on(date.succ_opt()?, midnight, tz)?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Walks candidate starts across a working window and returns the free ones
/// as ascending wall-clock `HH:MM` strings.
///
/// A candidate `s` survives when the whole of `[s, s + duration)` fits before
/// `window_end` and does not overlap any busy interval. Overlap is half-open,
/// so an appointment ending exactly at `s` does not block it. The walk stops
/// at the first candidate whose end would pass the window end, which makes
/// durations that do not divide the step yield unevenly spaced but still
/// valid slots.
pub fn calculate_free_starts(
    window_start: DateTime<Tz>,
    window_end: DateTime<Tz>,
    duration: Duration,
    step: Duration,
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> Vec<String> {
    // A zero step or duration would walk forever.
    if step <= Duration::zero() || duration <= Duration::zero() {
        return Vec::new();
    }

    debug!(
        "Walking slots in [{} .. {}) duration {}min step {}min against {} busy intervals",
        window_start,
        window_end,
        duration.num_minutes(),
        step.num_minutes(),
        busy.len()
    );

    let mut free = Vec::new();
    let mut candidate = window_start;
    while candidate + duration <= window_end {
        let start = candidate.with_timezone(&Utc);
        let end = (candidate + duration).with_timezone(&Utc);

        let taken = busy
            .iter()
            .any(|(busy_start, busy_end)| start < *busy_end && end > *busy_start);
        if !taken {
            free.push(candidate.format("%H:%M").to_string());
        }

        candidate += step;
    }
    free
}
