//! Session rebuild and process restart primitives.

use std::cell::Cell;

/// Host primitives acting on the live session's view hierarchy.
pub trait SessionLifecycle {
    /// Destroys and reconstructs the view hierarchy and all session-scoped bindings.
    fn rebuild(&self);

    /// Reapplies theme colours to existing views without structural changes.
    fn reapply_theme(&self);

    /// Runs window-level destructor side effects after the session has released its bindings.
    fn on_destroyed(&self);
}

/// Host primitive terminating and relaunching the whole process.
pub trait ProcessControl {
    /// Restarts the process. `force` skips any graceful-shutdown grace period.
    fn restart(&self, force: bool);
}

#[derive(Debug, Default)]
/// Lifecycle adapter that records calls instead of touching a real window.
pub struct RecordingLifecycle {
    rebuilds: Cell<usize>,
    rethemes: Cell<usize>,
    destroyed: Cell<usize>,
}

impl RecordingLifecycle {
    /// Number of `rebuild` calls.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds.get()
    }

    /// Number of `reapply_theme` calls.
    pub fn rethemes(&self) -> usize {
        self.rethemes.get()
    }

    /// Number of `on_destroyed` calls.
    pub fn destroyed(&self) -> usize {
        self.destroyed.get()
    }
}

impl SessionLifecycle for RecordingLifecycle {
    fn rebuild(&self) {
        self.rebuilds.set(self.rebuilds.get() + 1);
    }

    fn reapply_theme(&self) {
        self.rethemes.set(self.rethemes.get() + 1);
    }

    fn on_destroyed(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

#[derive(Debug, Default)]
/// Process control adapter that records restart requests.
pub struct RecordingProcessControl {
    restarts: Cell<usize>,
    last_force: Cell<Option<bool>>,
}

impl RecordingProcessControl {
    /// Number of `restart` calls.
    pub fn restarts(&self) -> usize {
        self.restarts.get()
    }

    /// `force` argument of the most recent restart.
    pub fn last_force(&self) -> Option<bool> {
        self.last_force.get()
    }
}

impl ProcessControl for RecordingProcessControl {
    fn restart(&self, force: bool) {
        self.restarts.set(self.restarts.get() + 1);
        self.last_force.set(Some(force));
    }
}
