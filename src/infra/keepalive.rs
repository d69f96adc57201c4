//! Keep-alive pinger.
//!
//! Free hosting tiers put idle instances to sleep; hitting our own `/ping`
//! on a timer keeps the process warm. The task is owned by whoever spawns
//! it and stops when the shutdown channel fires.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::KEEPALIVE_PATH;

/// Handle to a running pinger task.
pub struct KeepAlive {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl KeepAlive {
    /// Spawn a task that GETs `<base_url>/ping` every `interval`.
    pub fn spawn(base_url: &str, interval: Duration) -> Self {
        let url = ping_url(base_url);
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let client = reqwest::Client::new();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the server is obviously awake now.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match client.get(&url).send().await {
                            Ok(resp) => tracing::debug!(url = %url, status = %resp.status(), "Keep-alive ping"),
                            Err(e) => tracing::warn!(url = %url, error = %e, "Keep-alive ping failed"),
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::debug!("Keep-alive pinger stopping");
                        break;
                    }
                }
            }
        });

        tracing::info!(interval_secs = interval.as_secs(), "Keep-alive pinger started");
        Self { shutdown, task }
    }

    /// Signal the task to stop and wait for it.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Keep-alive task ended abnormally");
        }
    }
}

fn ping_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), KEEPALIVE_PATH)
}
