#[cfg(test)]
mod tests {
    use crate::slots::calculate_free_starts;
    use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // Helper function to build a same-day window on a fixed Monday
    fn window_on_test_day(start_hour: i64, length_hours: i64) -> (DateTime<Tz>, DateTime<Tz>) {
        let tz = Tz::America__Sao_Paulo;
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(); // Monday
        let start = tz
            .from_local_datetime(&date.and_hms_opt(start_hour as u32, 0, 0).unwrap())
            .unwrap();
        (start, start + Duration::hours(length_hours))
    }

    // Helper function to resolve an emitted "HH:MM" label back to an instant
    // on the window's civil day
    fn slot_instant(window_start: DateTime<Tz>, label: &str) -> DateTime<Utc> {
        let time = NaiveTime::parse_from_str(label, "%H:%M").expect("Emitted label must be HH:MM");
        window_start
            .timezone()
            .from_local_datetime(&window_start.date_naive().and_time(time))
            .unwrap()
            .with_timezone(&Utc)
    }

    // Helper function to lay out non-overlapping busy periods inside the day
    fn busy_chain(
        window_start: DateTime<Tz>,
        count: usize,
        length_minutes: i64,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let mut periods = Vec::new();
        let mut cursor = window_start.with_timezone(&Utc) + Duration::minutes(30);
        for _ in 0..count {
            let end = cursor + Duration::minutes(length_minutes);
            periods.push((cursor, end));
            cursor = end + Duration::minutes(45);
        }
        periods
    }

    proptest! {
        // Every emitted start stays inside the window and the list ascends
        // strictly, so labels are unique as well
        #[test]
        fn test_starts_ascend_within_the_window(
            start_hour in 5..12i64,
            length_hours in 1..8i64,
            duration_minutes in 15..120i64,
            step_minutes in 5..60i64,
        ) {
            let (window_start, window_end) = window_on_test_day(start_hour, length_hours);
            let duration = Duration::minutes(duration_minutes);

            let slots = calculate_free_starts(
                window_start,
                window_end,
                duration,
                Duration::minutes(step_minutes),
                &[],
            );

            let instants: Vec<DateTime<Utc>> = slots
                .iter()
                .map(|label| slot_instant(window_start, label))
                .collect();

            for instant in &instants {
                prop_assert!(*instant >= window_start.with_timezone(&Utc),
                    "Start {:?} precedes the window", instant);
                prop_assert!(*instant + duration <= window_end.with_timezone(&Utc),
                    "Interval starting {:?} leaks past the window end", instant);
            }
            for pair in instants.windows(2) {
                prop_assert!(pair[0] < pair[1],
                    "Starts must ascend strictly: {:?} then {:?}", pair[0], pair[1]);
            }
        }

        // No emitted interval may intersect any busy interval
        #[test]
        fn test_intervals_stay_clear_of_busy_periods(
            start_hour in 5..12i64,
            length_hours in 2..8i64,
            duration_minutes in 15..120i64,
            busy_count in 1..4usize,
            busy_length_minutes in 15..180i64,
        ) {
            let (window_start, window_end) = window_on_test_day(start_hour, length_hours);
            let duration = Duration::minutes(duration_minutes);
            let busy = busy_chain(window_start, busy_count, busy_length_minutes);

            let slots = calculate_free_starts(
                window_start,
                window_end,
                duration,
                Duration::minutes(15),
                &busy,
            );

            for label in &slots {
                let start = slot_instant(window_start, label);
                let end = start + duration;

                for (busy_start, busy_end) in &busy {
                    // Overlap check on half-open intervals
                    let overlaps = start < *busy_end && end > *busy_start;
                    prop_assert!(!overlaps,
                        "Slot {:?} to {:?} intersects busy period {:?} to {:?}",
                        start, end, busy_start, busy_end);
                }
            }
        }

        // With nothing booked, starts march in exact step increments from
        // the window start
        #[test]
        fn test_starts_align_to_the_step(
            start_hour in 5..12i64,
            length_hours in 1..6i64,
            duration_minutes in 15..90i64,
            step_minutes in 5..45i64,
        ) {
            let (window_start, window_end) = window_on_test_day(start_hour, length_hours);
            let step = Duration::minutes(step_minutes);

            let slots = calculate_free_starts(
                window_start,
                window_end,
                Duration::minutes(duration_minutes),
                step,
                &[],
            );

            let instants: Vec<DateTime<Utc>> = slots
                .iter()
                .map(|label| slot_instant(window_start, label))
                .collect();

            let origin = window_start.with_timezone(&Utc);
            for instant in &instants {
                let offset = *instant - origin;
                prop_assert_eq!(offset.num_minutes() % step_minutes, 0,
                    "Start {:?} is not a whole number of steps from the window start", instant);
            }
            for pair in instants.windows(2) {
                prop_assert_eq!(pair[1] - pair[0], step,
                    "Consecutive free starts of an empty window must be one step apart");
            }
        }
    }
}
