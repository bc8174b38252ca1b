//! Alarm management routes — GET /setAlarm, /cancel, /test.
//!
//! This layer owns request parsing: it turns the user's "HH:MM" string into
//! an absolute future instant before handing it to the scheduler, which only
//! deals in absolute times.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::{DateTime, Local, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use wakecall_alarm::next_occurrence;

use crate::app::AppState;
use crate::http::ui::done_page;

#[derive(Deserialize)]
pub struct SetAlarmParams {
    time: Option<String>,
}

/// GET /setAlarm?time=HH:MM — arm the alarm for the next local occurrence.
pub async fn set_alarm_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SetAlarmParams>,
) -> Result<Html<String>, (StatusCode, String)> {
    let raw = params
        .time
        .ok_or((StatusCode::BAD_REQUEST, "missing time parameter".into()))?;

    let (hour, minute) = parse_hhmm(&raw).ok_or_else(|| {
        warn!(time = %raw, "rejected malformed alarm time");
        (
            StatusCode::BAD_REQUEST,
            format!("invalid time provided: {raw}"),
        )
    })?;

    let now = Local::now();
    let fire_at_local = next_occurrence(hour, minute, now).ok_or((
        StatusCode::BAD_REQUEST,
        format!("{hour:02}:{minute:02} does not exist today"),
    ))?;
    let fire_at = fire_at_local.with_timezone(&Utc);

    info!(now = %now, fire_at = %fire_at_local, "arming alarm");

    state.scheduler.arm(fire_at).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to arm alarm: {e}"),
        )
    })?;

    Ok(done_page(&format!(
        "Alarm set for {}.",
        format_local(fire_at)
    )))
}

/// GET /cancel — cancel the pending alarm, reporting what was cancelled.
pub async fn cancel_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let cancelled = state.scheduler.cancel().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to cancel alarm: {e}"),
        )
    })?;

    Ok(match cancelled {
        Some(t) => done_page(&format!("Cancelled the alarm set for {}.", format_local(t))),
        None => done_page("No alarm was set."),
    })
}

/// GET /test — place the wake-up call right now, bypassing the scheduler.
///
/// Deliberately leaves any armed alarm untouched: a test call verifies the
/// telephony path, it is not a wake-up, so it must not consume the pending
/// alarm or clear the persisted record.
pub async fn test_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    match state.action.wake().await {
        Ok(()) => Ok(done_page("Triggered call.")),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Error! {e}"))),
    }
}

/// Render a UTC instant in the server's local time for display.
pub fn format_local(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%H:%M (%a %d %b)").to_string()
}

/// Parse an "HH:MM" string into validated hour/minute components.
fn parse_hhmm(raw: &str) -> Option<(u32, u32)> {
    let (h, m) = raw.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_padded_time() {
        assert_eq!(parse_hhmm("07:30"), Some((7, 30)));
    }

    #[test]
    fn parses_unpadded_hour() {
        assert_eq!(parse_hhmm("7:05"), Some((7, 5)));
    }

    #[test]
    fn parses_midnight_and_last_minute() {
        assert_eq!(parse_hhmm("00:00"), Some((0, 0)));
        assert_eq!(parse_hhmm("23:59"), Some((23, 59)));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_hhmm(" 6:15 "), Some((6, 15)));
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm("12"), None);
        assert_eq!(parse_hhmm("12:3a"), None);
        assert_eq!(parse_hhmm("-1:30"), None);
    }
}
