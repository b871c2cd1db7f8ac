use std::time::Duration;

use launchpad_db::{SessionRepository, VerificationRepository};
use tokio::task::JoinHandle;

/// Periodically delete expired sessions and verification tokens.
///
/// Returns `None` when `interval_secs` is 0, which disables the task.
pub fn spawn_expired_auth_cleanup(
    sessions: SessionRepository,
    verifications: VerificationRepository,
    interval_secs: u64,
) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        tracing::info!("Expired session cleanup disabled");
        return None;
    }

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match sessions.delete_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Deleted expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to delete expired sessions"),
            }

            match verifications.delete_expired().await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "Deleted expired verifications"),
                Err(e) => tracing::warn!(error = %e, "Failed to delete expired verifications"),
            }
        }
    });

    tracing::info!(interval_secs, "Expired session cleanup started");
    Some(handle)
}
