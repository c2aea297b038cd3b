//! Status bar visibility kept in sync with the "show status bar" setting.
//!
//! When the user hides the status bar, overview-like states still need it. A re-hide listener
//! registered with the launcher state machine shows the bar while entering overview and hides it
//! again once a transition settles anywhere else. The listener is registered exactly while the
//! setting is `false`.

use std::rc::Rc;

use platform_host::{LauncherState, StateListener, StateTransitions, SurfaceKind, WindowChrome};
use tracing::debug;

use crate::error::RuntimeResult;

/// Re-hides the status bar after overview transitions.
pub struct RehideStatusBarListener {
    chrome: Rc<dyn WindowChrome>,
}

impl RehideStatusBarListener {
    pub fn new(chrome: Rc<dyn WindowChrome>) -> Self {
        Self { chrome }
    }
}

impl StateListener for RehideStatusBarListener {
    fn on_transition_start(&self, to_state: LauncherState) {
        if to_state.is_overview() {
            self.chrome.show(SurfaceKind::StatusBars);
        }
    }

    fn on_transition_complete(&self, final_state: LauncherState) {
        if !final_state.is_overview() {
            self.chrome.hide(SurfaceKind::StatusBars);
        }
    }
}

/// Registration state of the re-hide listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehideRegistration {
    Unregistered,
    Registered,
}

pub struct StatusSurfaceSynchronizer {
    chrome: Rc<dyn WindowChrome>,
    transitions: Rc<dyn StateTransitions>,
    listener: Rc<dyn StateListener>,
    registration: RehideRegistration,
}

impl StatusSurfaceSynchronizer {
    pub fn new(chrome: Rc<dyn WindowChrome>, transitions: Rc<dyn StateTransitions>) -> Self {
        let listener: Rc<dyn StateListener> =
            Rc::new(RehideStatusBarListener::new(Rc::clone(&chrome)));
        Self {
            chrome,
            transitions,
            listener,
            registration: RehideRegistration::Unregistered,
        }
    }

    pub fn registration(&self) -> RehideRegistration {
        self.registration
    }

    pub fn is_registered(&self) -> bool {
        self.registration == RehideRegistration::Registered
    }

    /// Applies a new value of the "show status bar" setting.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects the registration, which means something else registered
    /// this synchronizer's listener behind its back.
    pub fn apply(&mut self, visible: bool) -> RuntimeResult<()> {
        if visible {
            self.chrome.show(SurfaceKind::StatusBars);
            self.unregister();
        } else {
            self.chrome.hide(SurfaceKind::StatusBars);
            self.register()?;
        }
        Ok(())
    }

    /// Unregisters the listener on session teardown.
    pub fn release(&mut self) {
        self.unregister();
    }

    fn register(&mut self) -> RuntimeResult<()> {
        match self.registration {
            RehideRegistration::Registered => Ok(()),
            RehideRegistration::Unregistered => {
                self.transitions
                    .add_state_listener(Rc::clone(&self.listener))?;
                self.registration = RehideRegistration::Registered;
                debug!("status bar re-hide listener registered");
                Ok(())
            }
        }
    }

    fn unregister(&mut self) {
        if let RehideRegistration::Registered = self.registration {
            self.transitions.remove_state_listener(&self.listener);
            self.registration = RehideRegistration::Unregistered;
            debug!("status bar re-hide listener unregistered");
        }
    }
}
