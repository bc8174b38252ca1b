use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::app::AppState;
use crate::http::alarm::format_local;

static FORM_HTML: &str = include_str!("../../static/form.html");
static DONE_HTML: &str = include_str!("../../static/done.html");

/// Serve the alarm form at `GET /`, showing the currently armed time.
pub async fn form_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let status = match state.scheduler.current_alarm() {
        Some(t) => format!("Alarm is set for {}.", format_local(t)),
        None => "No alarm is currently set.".to_string(),
    };
    Html(FORM_HTML.replace("{{current_alarm}}", &status))
}

/// Render the confirmation page with `message` in place.
pub fn done_page(message: &str) -> Html<String> {
    Html(DONE_HTML.replace("{{message}}", message))
}
