//! Periodic health check against the simulation API root endpoint.
//!
//! Each tick issues one bounded-timeout GET. Any 2xx means connected, any
//! other status or a transport failure means disconnected. Failed probes are
//! not retried; the next tick is the retry.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use gmxgui_common::error::{GmxGuiError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    Checking,
    Connected,
    Disconnected,
}

impl ConnectivityStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectivityStatus::Checking     => "checking",
            ConnectivityStatus::Connected    => "connected",
            ConnectivityStatus::Disconnected => "disconnected",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectivityStatus::Checking     => "Checking...",
            ConnectivityStatus::Connected    => "Connected",
            ConnectivityStatus::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityState {
    pub status: ConnectivityStatus,
    pub message: String,
    /// When the probe that produced this state finished. `None` before the first probe.
    pub checked_at: Option<DateTime<Utc>>,
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::checking()
    }
}

impl ConnectivityState {
    pub fn checking() -> Self {
        Self {
            status: ConnectivityStatus::Checking,
            message: "Checking connection...".to_string(),
            checked_at: None,
        }
    }

    pub fn connected() -> Self {
        Self {
            status: ConnectivityStatus::Connected,
            message: "Backend connected successfully".to_string(),
            checked_at: Some(Utc::now()),
        }
    }

    pub fn backend_error(code: StatusCode) -> Self {
        Self {
            status: ConnectivityStatus::Disconnected,
            message: format!("Backend error: {}", code.as_u16()),
            checked_at: Some(Utc::now()),
        }
    }

    pub fn not_responding() -> Self {
        Self {
            status: ConnectivityStatus::Disconnected,
            message: "Backend not responding".to_string(),
            checked_at: Some(Utc::now()),
        }
    }

    /// Map a response status: 2xx is connected, anything else carries the code.
    pub fn from_status(code: StatusCode) -> Self {
        if code.is_success() {
            Self::connected()
        } else {
            Self::backend_error(code)
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectivityStatus::Connected
    }

    /// Same status and message; the probe timestamp is ignored.
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.status == other.status && self.message == other.message
    }
}

/// A single GET against a fixed endpoint with a request timeout.
#[derive(Debug, Clone)]
pub struct HealthProbe {
    client: Client,
    endpoint: String,
}

impl HealthProbe {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GmxGuiError::Http)?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn probe(&self) -> ConnectivityState {
        match self.client.get(&self.endpoint).send().await {
            Ok(response) => {
                let state = ConnectivityState::from_status(response.status());
                debug!(endpoint = %self.endpoint, status = %response.status(), "Health probe answered");
                state
            }
            Err(e) => {
                debug!(endpoint = %self.endpoint, error = %e, "Health probe failed");
                ConnectivityState::not_responding()
            }
        }
    }
}

pub struct ConnectivityMonitor;

impl ConnectivityMonitor {
    /// Probe immediately, then once per `interval`, publishing each result.
    /// The loop stops when the returned handle is dropped.
    pub fn spawn(probe: HealthProbe, interval: Duration) -> MonitorHandle {
        let (tx, rx) = watch::channel(ConnectivityState::checking());

        let task = tokio::spawn(async move {
            info!(endpoint = %probe.endpoint(), "Started connectivity monitor (every {:?})", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let state = probe.probe().await;

                // Subscribers only wake when status or message differ; the timestamp updates silently.
                tx.send_if_modified(|current| {
                    let changed = !current.same_outcome(&state);
                    if changed && state.is_connected() {
                        info!("Simulation API reachable at {}", probe.endpoint());
                    } else if changed {
                        warn!("Simulation API unreachable: {}", state.message);
                    }
                    *current = state;
                    changed
                });
            }
        });

        MonitorHandle { rx, task }
    }
}

/// Owner of a running monitor loop.
pub struct MonitorHandle {
    rx: watch::Receiver<ConnectivityState>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn current(&self) -> ConnectivityState {
        self.rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectivityState> {
        self.rx.clone()
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
