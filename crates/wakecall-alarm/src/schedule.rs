use chrono::{DateTime, Datelike, Duration, TimeZone};

/// Compute the next occurrence of `hour:minute` strictly after `now`, in
/// `now`'s timezone (the gateway passes local wall-clock time).
///
/// Today's HH:MM if it is still ahead, otherwise the same time tomorrow.
/// Returns `None` only when the local time does not exist (DST gap).
pub fn next_occurrence<Tz: TimeZone>(
    hour: u32,
    minute: u32,
    now: DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    let candidate = now
        .timezone()
        .with_ymd_and_hms(now.year(), now.month(), now.day(), hour, minute, 0)
        .single()?;
    if candidate > now {
        Some(candidate)
    } else {
        // Today's window has passed — wake up tomorrow.
        Some(candidate + Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    // Fixed date and offset so the assertions are deterministic regardless
    // of the host timezone or DST transitions.
    fn at(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 21, hour, minute, 30)
            .single()
            .unwrap()
    }

    #[test]
    fn later_today_stays_today() {
        let now = at(6, 0);
        let next = next_occurrence(7, 30, now).unwrap();
        assert_eq!((next.hour(), next.minute()), (7, 30));
        assert_eq!(next.date_naive(), now.date_naive());
    }

    #[test]
    fn earlier_time_rolls_to_tomorrow() {
        let now = at(8, 0);
        let next = next_occurrence(7, 30, now).unwrap();
        assert_eq!((next.hour(), next.minute()), (7, 30));
        assert_eq!(next.date_naive(), now.date_naive() + Duration::days(1));
    }

    #[test]
    fn same_minute_counts_as_passed() {
        // now is HH:MM:30, the candidate is HH:MM:00 — already behind us.
        let now = at(7, 30);
        let next = next_occurrence(7, 30, now).unwrap();
        assert_eq!(next.date_naive(), now.date_naive() + Duration::days(1));
    }

    #[test]
    fn result_is_always_in_the_future() {
        let now = at(12, 0);
        for (h, m) in [(0, 0), (12, 0), (23, 59)] {
            let next = next_occurrence(h, m, now).unwrap();
            assert!(next > now, "{h}:{m} resolved to {next}, not after {now}");
        }
    }
}
