//! Mock simulation runs.
//!
//! A started project is flipped to `completed` by a timer once the run delay
//! elapses. Timers live in a `JoinSet` owned by the runner, so dropping the
//! runner cancels every pending completion.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::manager::SharedManager;
use crate::project::ProjectStatus;

/// Emitted whenever the runner moves a project between statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub project_id: String,
    pub status: ProjectStatus,
}

pub struct SimulationRunner {
    manager: SharedManager,
    run_delay: Duration,
    timers: Mutex<JoinSet<()>>,
    status_tx: broadcast::Sender<StatusChange>,
}

impl SimulationRunner {
    pub fn new(manager: SharedManager, run_delay: Duration) -> Self {
        let (status_tx, _) = broadcast::channel(64);
        Self {
            manager,
            run_delay,
            timers: Mutex::new(JoinSet::new()),
            status_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.status_tx.subscribe()
    }

    /// Completion timers that have not fired yet.
    pub fn pending_runs(&self) -> usize {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        while timers.try_join_next().is_some() {}
        timers.len()
    }

    /// Start a run. Returns `false` when the manager refused the transition
    /// (unknown id, no force field, or already running); no timer is armed then.
    pub async fn start(&self, project_id: &str) -> bool {
        let started = {
            let mut manager = self.manager.write().await;
            let before = manager.get(project_id).map(|p| p.status);
            let after = manager.start(project_id).map(|p| p.status);
            before != Some(ProjectStatus::Running) && after == Some(ProjectStatus::Running)
        };
        if !started {
            debug!(project_id, "Run not started");
            return false;
        }

        let _ = self.status_tx.send(StatusChange {
            project_id: project_id.to_string(),
            status: ProjectStatus::Running,
        });

        let manager = self.manager.clone();
        let status_tx = self.status_tx.clone();
        let delay = self.run_delay;
        let id = project_id.to_string();

        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        while timers.try_join_next().is_some() {}
        timers.spawn(async move {
            tokio::time::sleep(delay).await;

            let completed = manager
                .write()
                .await
                .complete(&id)
                .is_some_and(|p| p.status == ProjectStatus::Completed);

            if completed {
                info!(project_id = %id, "Mock run finished after {:?}", delay);
                let _ = status_tx.send(StatusChange { project_id: id, status: ProjectStatus::Completed });
            } else {
                debug!(project_id = %id, "Run timer fired for a project that is gone or no longer running");
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ProjectManager;
    use crate::project::FileRecord;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    const DELAY: Duration = Duration::from_secs(5);

    async fn setup() -> (SharedManager, SimulationRunner, String) {
        let manager: SharedManager = Arc::new(RwLock::new(ProjectManager::new()));
        let id = {
            let mut mgr = manager.write().await;
            let id = mgr.create(None).id.clone();
            mgr.attach_file(&id, FileRecord::fabricate("protein.pdb", ".pdb"));
            mgr.select_forcefield(&id, "amber99sb-ildn");
            id
        };
        let runner = SimulationRunner::new(manager.clone(), DELAY);
        (manager, runner, id)
    }

    async fn status_of(manager: &SharedManager, id: &str) -> ProjectStatus {
        manager.read().await.get(id).map(|p| p.status).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_then_completes_after_delay() {
        let (manager, runner, id) = setup().await;

        assert!(runner.start(&id).await);
        assert_eq!(status_of(&manager, &id).await, ProjectStatus::Running);

        tokio::time::sleep(DELAY - Duration::from_secs(1)).await;
        assert_eq!(status_of(&manager, &id).await, ProjectStatus::Running);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status_of(&manager, &id).await, ProjectStatus::Completed);
        assert_eq!(runner.pending_runs(), 0);

        let logs = manager.read().await.get(&id).map(|p| p.logs.clone()).unwrap();
        assert!(logs.last().unwrap().contains("Simulation completed for project"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_changes_are_broadcast_in_order() {
        let (_manager, runner, id) = setup().await;
        let mut rx = runner.subscribe();

        runner.start(&id).await;
        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;

        let statuses = vec![rx.recv().await.unwrap().status, rx.recv().await.unwrap().status];
        assert_eq!(statuses, vec![ProjectStatus::Running, ProjectStatus::Completed]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_arms_one_timer() {
        let (_manager, runner, id) = setup().await;
        assert!(runner.start(&id).await);
        assert!(!runner.start(&id).await);
        assert_eq!(runner.pending_runs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unconfigured_project_does_not_start() {
        let manager: SharedManager = Arc::new(RwLock::new(ProjectManager::new()));
        let id = manager.write().await.create(None).id.clone();
        let runner = SimulationRunner::new(manager.clone(), DELAY);

        assert!(!runner.start(&id).await);
        assert_eq!(status_of(&manager, &id).await, ProjectStatus::Created);
        assert_eq!(runner.pending_runs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_project_timer_is_harmless() {
        let (manager, runner, id) = setup().await;
        runner.start(&id).await;
        manager.write().await.delete(&id, |_: &str| true);

        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
        assert!(manager.read().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_runner_cancels_timers() {
        let (manager, runner, id) = setup().await;
        runner.start(&id).await;
        drop(runner);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(status_of(&manager, &id).await, ProjectStatus::Running);
    }
}
