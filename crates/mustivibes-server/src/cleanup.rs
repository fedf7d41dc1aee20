use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use mustivibes_api::auth::AppStateInner;

/// Background task that drops expired admin sessions, so the session
/// table only holds tokens that could still be used.
pub async fn run_session_purge_loop(state: Arc<AppStateInner>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        match state.db.purge_expired_sessions() {
            Ok(count) => {
                if count > 0 {
                    info!("Cleanup: purged {} expired sessions", count);
                }
            }
            Err(e) => {
                warn!("Cleanup error: {}", e);
            }
        }
    }
}
