//! Process-wide rebuild/restart request coordination.
//!
//! Any component may request that the next resume rebuild the session or restart the process.
//! Requests accumulate in one atomic bitmask and are consumed exactly once by the session's resume
//! path. A restart dominates a rebuild.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc, OnceLock,
    },
};

use platform_host::{ProcessControl, SessionLifecycle};
use tracing::info;

/// Bitmask of pending reconfiguration requests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RestartRequest(u8);

impl RestartRequest {
    pub const NONE: Self = Self(0);
    pub const NEEDS_REBUILD: Self = Self(1 << 0);
    pub const NEEDS_PROCESS_RESTART: Self = Self(1 << 1);

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & (Self::NEEDS_REBUILD.0 | Self::NEEDS_PROCESS_RESTART.0))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl fmt::Debug for RestartRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::NEEDS_REBUILD) {
            set.entry(&"NeedsRebuild");
        }
        if self.contains(Self::NEEDS_PROCESS_RESTART) {
            set.entry(&"NeedsProcessRestart");
        }
        set.finish()
    }
}

/// What the resume path did with the pending requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeAction {
    None,
    Rebuilt,
    Restarted,
}

/// Owner of the pending-request bitmask.
#[derive(Debug, Default)]
pub struct RestartCoordinator {
    flags: AtomicU8,
    force_restart: AtomicBool,
}

static SHARED: OnceLock<Arc<RestartCoordinator>> = OnceLock::new();

impl RestartCoordinator {
    /// Creates an isolated coordinator. Sessions in one process share [`RestartCoordinator::shared`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_force_restart(force_restart: bool) -> Self {
        Self {
            flags: AtomicU8::new(0),
            force_restart: AtomicBool::new(force_restart),
        }
    }

    /// Sets the `force` argument passed to [`ProcessControl::restart`].
    pub fn set_force_restart(&self, force_restart: bool) {
        self.force_restart.store(force_restart, Ordering::Release);
    }

    /// Returns the process-wide coordinator, which outlives every session.
    pub fn shared() -> Arc<RestartCoordinator> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(RestartCoordinator::new())))
    }

    pub fn request_rebuild(&self) {
        self.flags
            .fetch_or(RestartRequest::NEEDS_REBUILD.bits(), Ordering::AcqRel);
    }

    pub fn request_restart(&self) {
        self.flags
            .fetch_or(RestartRequest::NEEDS_PROCESS_RESTART.bits(), Ordering::AcqRel);
    }

    pub fn pending(&self) -> RestartRequest {
        RestartRequest::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    /// Applies the pending request.
    ///
    /// A pending restart restarts the process and leaves the mask as is. A pending rebuild clears
    /// the mask before rebuilding. The clear only succeeds against the value that was inspected,
    /// so a restart requested concurrently is re-evaluated rather than lost.
    pub fn consume_on_resume(
        &self,
        lifecycle: &dyn SessionLifecycle,
        process: &dyn ProcessControl,
    ) -> ResumeAction {
        let mut observed = self.flags.load(Ordering::Acquire);
        loop {
            let request = RestartRequest::from_bits_truncate(observed);
            if request.contains(RestartRequest::NEEDS_PROCESS_RESTART) {
                let force = self.force_restart.load(Ordering::Acquire);
                info!(pending = ?request, force, "restarting process");
                process.restart(force);
                return ResumeAction::Restarted;
            }
            if !request.contains(RestartRequest::NEEDS_REBUILD) {
                return ResumeAction::None;
            }
            match self
                .flags
                .compare_exchange(observed, 0, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    info!(pending = ?request, "rebuilding session");
                    lifecycle.rebuild();
                    return ResumeAction::Rebuilt;
                }
                Err(current) => observed = current,
            }
        }
    }

    /// Rebuilds immediately unless a rebuild or restart is already pending.
    ///
    /// Returns whether a rebuild was performed.
    pub fn recreate_if_not_scheduled(&self, lifecycle: &dyn SessionLifecycle) -> bool {
        if !self.pending().is_empty() {
            return false;
        }
        info!("rebuilding session for configuration change");
        lifecycle.rebuild();
        true
    }
}
