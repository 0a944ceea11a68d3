//! Shared application state for the web server.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tracing::debug;

use gmxgui_common::error::Result;
use gmxgui_config::Config;
use gmxgui_monitoring::{ConnectivityMonitor, ConnectivityState, ConnectivityStatus, HealthProbe, MonitorHandle};
use gmxgui_projects::{Project, ProjectManager, ProjectStatus, SharedManager, SimulationRunner};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A project was added to the list
    ProjectCreated { project_id: String, name: String },
    /// A project was removed
    ProjectDeleted { project_id: String },
    /// A mock file was attached
    FileAttached { project_id: String, file_name: String },
    /// Lifecycle status changed (configure, start, completion)
    StatusChanged { project_id: String, status: ProjectStatus },
    /// Connectivity banner changed
    Connectivity { status: ConnectivityStatus, message: String },
}

/// Server-wide stop flag. Long-lived responses end once it is triggered,
/// which lets graceful shutdown complete while dashboards are still open.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self(Arc::new(tx))
    }

    pub fn trigger(&self) {
        self.0.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once `trigger` has been called, immediately if it already was.
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.0.subscribe();
        async move {
            let _ = rx.wait_for(|stopped| *stopped).await;
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub manager: SharedManager,
    pub runner: SimulationRunner,
    pub connectivity: watch::Receiver<ConnectivityState>,
    /// Endpoint the connectivity monitor probes, shown in the banner.
    pub api_endpoint: String,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
    shutdown: ShutdownHandle,
    /// Dropping the handle stops the probe loop.
    _monitor: Option<MonitorHandle>,
}

impl AppState {
    pub fn new(
        manager: ProjectManager,
        run_delay: Duration,
        connectivity: watch::Receiver<ConnectivityState>,
        api_endpoint: impl Into<String>,
    ) -> Self {
        let manager: SharedManager = Arc::new(RwLock::new(manager));
        let runner = SimulationRunner::new(manager.clone(), run_delay);
        let (event_tx, _) = broadcast::channel(256);
        Self {
            manager,
            runner,
            connectivity,
            api_endpoint: api_endpoint.into(),
            event_tx,
            shutdown: ShutdownHandle::new(),
            _monitor: None,
        }
    }

    /// Build the full state from configuration and start the connectivity monitor.
    /// Must be called inside a Tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        let manager = if config.projects.seed_demo {
            ProjectManager::with_demo_projects()
        } else {
            ProjectManager::new()
        };

        let probe = HealthProbe::new(config.monitor.endpoint.clone(), config.monitor.timeout())?;
        let monitor = ConnectivityMonitor::spawn(probe, config.monitor.interval());

        let mut state = Self::new(
            manager,
            config.simulation.run_delay(),
            monitor.subscribe(),
            config.monitor.endpoint.clone(),
        );
        state._monitor = Some(monitor);
        state.spawn_event_forwarders();
        Ok(state)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        // No subscribers is not an error
        let _ = self.event_tx.send(event);
    }

    pub fn connectivity(&self) -> ConnectivityState {
        self.connectivity.borrow().clone()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Apply a manager operation and announce `StatusChanged` only when the
    /// project's status actually moved. Returns the project as it is afterwards.
    pub async fn update_project<F>(&self, id: &str, op: F) -> Option<Project>
    where
        F: FnOnce(&mut ProjectManager) -> Option<&Project>,
    {
        let (before, after) = {
            let mut manager = self.manager.write().await;
            let before = manager.get(id).map(|p| p.status);
            let after = op(&mut *manager).cloned();
            (before, after)
        };

        if let Some(project) = &after {
            if before != Some(project.status) {
                self.emit(AppEvent::StatusChanged {
                    project_id: project.id.clone(),
                    status: project.status,
                });
            }
        }
        after
    }

    /// Relay runner status changes and connectivity updates onto the SSE channel.
    fn spawn_event_forwarders(&self) {
        let mut status_rx = self.runner.subscribe();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            loop {
                match status_rx.recv().await {
                    Ok(change) => {
                        let _ = event_tx.send(AppEvent::StatusChanged {
                            project_id: change.project_id,
                            status: change.status,
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!("Status relay lagged by {} events", n);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let mut connectivity_rx = self.connectivity.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            while connectivity_rx.changed().await.is_ok() {
                let state = connectivity_rx.borrow_and_update().clone();
                let _ = event_tx.send(AppEvent::Connectivity {
                    status: state.status,
                    message: state.message,
                });
            }
        });
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use gmxgui_projects::FileRecord;
    use tokio::sync::broadcast::error::TryRecvError;

    fn state_with(connectivity: watch::Receiver<ConnectivityState>) -> AppState {
        AppState::new(ProjectManager::new(), Duration::from_secs(5), connectivity, "http://localhost:8000/")
    }

    async fn ready_project(state: &AppState) -> String {
        let mut manager = state.manager.write().await;
        let id = manager.create(None).id.clone();
        manager.attach_file(&id, FileRecord::fabricate("protein.pdb", ".pdb"));
        manager.select_forcefield(&id, "oplsaa");
        id
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_status_changes_are_relayed() {
        let (_conn_tx, conn_rx) = watch::channel(ConnectivityState::checking());
        let state = state_with(conn_rx);
        state.spawn_event_forwarders();
        let mut events = state.subscribe();

        let id = ready_project(&state).await;
        assert!(state.runner.start(&id).await);
        tokio::time::sleep(Duration::from_secs(6)).await;

        let mut statuses = Vec::new();
        for _ in 0..2 {
            match events.recv().await.unwrap() {
                AppEvent::StatusChanged { project_id, status } => {
                    assert_eq!(project_id, id);
                    statuses.push(status);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(statuses, vec![ProjectStatus::Running, ProjectStatus::Completed]);
    }

    #[tokio::test]
    async fn test_connectivity_changes_are_relayed() {
        let (conn_tx, conn_rx) = watch::channel(ConnectivityState::checking());
        let state = state_with(conn_rx);
        state.spawn_event_forwarders();
        let mut events = state.subscribe();

        conn_tx.send(ConnectivityState::not_responding()).unwrap();
        match events.recv().await.unwrap() {
            AppEvent::Connectivity { status, message } => {
                assert_eq!(status, ConnectivityStatus::Disconnected);
                assert_eq!(message, "Backend not responding");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ignored_change_emits_nothing() {
        let (_conn_tx, conn_rx) = watch::channel(ConnectivityState::checking());
        let state = state_with(conn_rx);
        let id = ready_project(&state).await;
        state.manager.write().await.start(&id);
        let mut events = state.subscribe();

        let project = state.update_project(&id, |m| m.select_forcefield(&id, "gromos54a7")).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Running);
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_real_change_emits_status() {
        let (_conn_tx, conn_rx) = watch::channel(ConnectivityState::checking());
        let state = state_with(conn_rx);
        let id = state.manager.write().await.create(None).id.clone();
        let mut events = state.subscribe();

        state.update_project(&id, |m| m.select_forcefield(&id, "oplsaa")).await;
        assert!(matches!(
            events.try_recv(),
            Ok(AppEvent::StatusChanged { status: ProjectStatus::Configured, .. })
        ));

        // same force field again: status unchanged
        state.update_project(&id, |m| m.select_forcefield(&id, "oplsaa")).await;
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_shutdown_wait_resolves_after_trigger() {
        let (_conn_tx, conn_rx) = watch::channel(ConnectivityState::checking());
        let shutdown = state_with(conn_rx).shutdown_handle();
        let waiter = tokio::spawn(shutdown.wait());

        assert!(!shutdown.is_triggered());
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
        // already triggered: resolves at once
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait()).await.unwrap();
    }
}
