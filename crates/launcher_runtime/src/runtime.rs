//! Process-level bootstrap: config, logging, schedulers and the live session.

use std::sync::Arc;

use platform_host::LauncherHostServices;
use tracing::info;

use crate::{
    config::RuntimeConfig,
    error::RuntimeResult,
    logging,
    preferences::LauncherPreferences,
    restart::{RestartCoordinator, ResumeAction},
    scheduler::{UiScheduler, WorkerPool},
    session::SessionController,
};

/// Owns the schedulers and the current [`SessionController`].
///
/// The restart coordinator and the preference bundle outlive individual sessions, so a session
/// recreated by [`LauncherRuntime::recreate_session`] observes requests left by its predecessor.
pub struct LauncherRuntime {
    host: LauncherHostServices,
    prefs: LauncherPreferences,
    restart: Arc<RestartCoordinator>,
    scheduler: UiScheduler,
    workers: WorkerPool,
    session: SessionController,
}

impl LauncherRuntime {
    /// Boots against the process-wide restart coordinator.
    pub fn boot(config: &RuntimeConfig, host: LauncherHostServices) -> RuntimeResult<Self> {
        Self::boot_with(config, host, RestartCoordinator::shared())
    }

    /// Validates `config`, installs logging and creates the first session.
    ///
    /// # Errors
    ///
    /// Fails on invalid config, when the worker pool cannot be created or when session
    /// startup fails.
    pub fn boot_with(
        config: &RuntimeConfig,
        host: LauncherHostServices,
        restart: Arc<RestartCoordinator>,
    ) -> RuntimeResult<Self> {
        config.validate()?;
        logging::init(&config.runtime.log_filter);

        restart.set_force_restart(config.runtime.force_restart);
        let workers = WorkerPool::new(config.runtime.background_workers)?;
        let scheduler = UiScheduler::new();
        let prefs = LauncherPreferences::from_snapshot(&config.preferences);

        let session = SessionController::create(
            host.clone(),
            prefs.clone(),
            Arc::clone(&restart),
            scheduler.handle(),
            workers.clone(),
        )?;
        info!(
            workers = workers.size(),
            force_restart = config.runtime.force_restart,
            "launcher runtime booted"
        );
        Ok(Self {
            host,
            prefs,
            restart,
            scheduler,
            workers,
            session,
        })
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn preferences(&self) -> &LauncherPreferences {
        &self.prefs
    }

    pub fn restart_coordinator(&self) -> &Arc<RestartCoordinator> {
        &self.restart
    }

    /// Delivers pending setting changes to the session's bindings.
    ///
    /// # Errors
    ///
    /// Returns the first binding effect failure.
    pub fn pump(&mut self) -> RuntimeResult<()> {
        self.scheduler.run_until_stalled()
    }

    /// Drains pending deliveries, then runs the session's resume check.
    pub fn resume(&mut self) -> RuntimeResult<ResumeAction> {
        self.pump()?;
        Ok(self.session.on_resume())
    }

    /// Replaces the current session with a freshly started one.
    ///
    /// Hosts call this from their rebuild primitive.
    pub fn recreate_session(&mut self) -> RuntimeResult<()> {
        self.session.destroy();
        self.pump()?;
        self.session = SessionController::create(
            self.host.clone(),
            self.prefs.clone(),
            Arc::clone(&self.restart),
            self.scheduler.handle(),
            self.workers.clone(),
        )?;
        Ok(())
    }

    /// Destroys the session and drains the scheduler.
    pub fn shutdown(mut self) -> RuntimeResult<()> {
        self.session.destroy();
        self.pump()
    }
}
