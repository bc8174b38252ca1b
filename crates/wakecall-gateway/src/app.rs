use axum::{routing::get, Router};
use std::sync::Arc;
use wakecall_alarm::{AlarmScheduler, WakeAction};

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub scheduler: AlarmScheduler,
    /// Direct handle to the wake action for the /test route; fired alarms
    /// go through the scheduler instead.
    pub action: Arc<dyn WakeAction>,
}

impl AppState {
    pub fn new(scheduler: AlarmScheduler, action: Arc<dyn WakeAction>) -> Self {
        Self { scheduler, action }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::ui::form_handler))
        .route("/setAlarm", get(crate::http::alarm::set_alarm_handler))
        .route("/cancel", get(crate::http::alarm::cancel_handler))
        .route("/test", get(crate::http::alarm::test_handler))
        .route("/health", get(crate::http::health::health_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
