// src/client.rs
//
// HTTP client for the replication controller's RL endpoints:
// - GET  /rl/system-state   -> ClusterSnapshot
// - POST /rl/execute-action <- ReplicationCommand
//
// Transport failures never reach the numeric pipeline: callers use
// `try_fetch_snapshot`, which collapses any fetch error into None so
// the tick degrades to the empty-snapshot case.

use std::time::Duration;

use crate::actions::ReplicationCommand;
use crate::config::ControllerConfig;
use crate::state::ClusterSnapshot;

pub struct ControllerClient {
    http: reqwest::Client,
    base_url: String,
}

impl ControllerClient {
    pub fn new(cfg: &ControllerConfig) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one telemetry snapshot.
    pub async fn fetch_snapshot(&self) -> reqwest::Result<ClusterSnapshot> {
        self.http
            .get(format!("{}/rl/system-state", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json::<ClusterSnapshot>()
            .await
    }

    /// Fetch a snapshot, mapping any transport/decode failure to None.
    pub async fn try_fetch_snapshot(&self) -> Option<ClusterSnapshot> {
        match self.fetch_snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                eprintln!("snapshot_fetch_failed error={err}");
                None
            }
        }
    }

    /// Dispatch a decoded command to the controller.
    pub async fn execute(&self, command: &ReplicationCommand) -> reqwest::Result<()> {
        self.http
            .post(format!("{}/rl/execute-action", self.base_url))
            .json(command)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Dispatch, reporting success as a bool. Failures are logged and
    /// swallowed; a missed command only costs this tick's effect.
    pub async fn try_execute(&self, command: &ReplicationCommand) -> bool {
        match self.execute(command).await {
            Ok(()) => true,
            Err(err) => {
                eprintln!("command_dispatch_failed error={err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let cfg = ControllerConfig {
            base_url: "http://controller:8080/".to_string(),
            ..ControllerConfig::default()
        };
        let client = ControllerClient::new(&cfg).unwrap();
        assert_eq!(client.base_url(), "http://controller:8080");
    }
}
