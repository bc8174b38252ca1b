use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod app;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wakecall=info,wakecall_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via WAKECALL_CONFIG > ~/.wakecall/wakecall.toml
    let config_path = std::env::var("WAKECALL_CONFIG").ok();
    let config = wakecall_core::config::WakecallConfig::load(config_path.as_deref())?;

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let conn = rusqlite::Connection::open(db_path)?;
    let store = wakecall_alarm::AlarmStore::new(conn)?;

    let caller: Arc<dyn wakecall_alarm::WakeAction> =
        Arc::new(wakecall_call::TwilioCaller::new(&config.twilio));

    let stale_after = chrono::Duration::seconds(config.alarm.stale_after_secs as i64);
    let scheduler =
        wakecall_alarm::AlarmScheduler::new(store, Arc::clone(&caller), stale_after);

    // Recover any alarm armed before the last shutdown / power loss,
    // before the first request can observe the state.
    match scheduler.restore() {
        Some(t) => info!(fire_at = %t, "restored alarm from previous run"),
        None => info!("no alarm to restore"),
    }

    let state = Arc::new(app::AppState::new(scheduler, caller));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Wakecall gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
