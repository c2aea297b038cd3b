//! Launcher state-transition contracts and the in-memory state manager.

use std::{cell::RefCell, fmt, rc::Rc};

/// Top-level launcher states driven by the host's state manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauncherState {
    /// Home screen with the workspace visible.
    Normal,
    /// Workspace shrunk while dragging an item.
    SpringLoaded,
    /// App drawer.
    AllApps,
    /// Swipe-up hint shown over the workspace.
    Hint,
    /// Recent-tasks overview.
    Overview,
    /// Overview with a modal task focused.
    OverviewModal,
    /// Quick-switch between recent tasks.
    QuickSwitch,
    /// Overview rendered behind a running app.
    BackgroundApp,
}

impl LauncherState {
    /// Returns whether the state is one of the overview-like states.
    pub const fn is_overview(self) -> bool {
        matches!(
            self,
            Self::Overview | Self::OverviewModal | Self::QuickSwitch | Self::BackgroundApp
        )
    }
}

/// Receiver of state-transition callbacks.
pub trait StateListener {
    /// Called when a transition towards `to_state` starts.
    fn on_transition_start(&self, to_state: LauncherState);

    /// Called when a transition settles in `final_state`.
    fn on_transition_complete(&self, final_state: LauncherState);
}

/// Rejection returned when a listener registration would create duplicate callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateListenerError {
    /// The same listener instance is already registered.
    AlreadyRegistered,
}

impl fmt::Display for StateListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered => write!(f, "state listener is already registered"),
        }
    }
}

impl std::error::Error for StateListenerError {}

/// Host state-transition system.
///
/// Listener identity is pointer identity of the shared handle.
pub trait StateTransitions {
    /// Registers `listener` for transition callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`StateListenerError::AlreadyRegistered`] when the same instance is registered.
    fn add_state_listener(&self, listener: Rc<dyn StateListener>) -> Result<(), StateListenerError>;

    /// Unregisters `listener`, returning whether it was registered.
    fn remove_state_listener(&self, listener: &Rc<dyn StateListener>) -> bool;
}

#[derive(Default)]
/// In-memory state manager that fires callbacks synchronously.
pub struct MemoryStateManager {
    current: RefCell<Option<LauncherState>>,
    listeners: RefCell<Vec<Rc<dyn StateListener>>>,
}

impl MemoryStateManager {
    /// Returns the last completed state, if any transition has completed.
    pub fn current(&self) -> Option<LauncherState> {
        *self.current.borrow()
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Fires `on_transition_start` for every listener.
    pub fn start_transition(&self, to_state: LauncherState) {
        for listener in self.snapshot() {
            listener.on_transition_start(to_state);
        }
    }

    /// Records `final_state` and fires `on_transition_complete` for every listener.
    pub fn complete_transition(&self, final_state: LauncherState) {
        *self.current.borrow_mut() = Some(final_state);
        for listener in self.snapshot() {
            listener.on_transition_complete(final_state);
        }
    }

    /// Runs a full transition: start, then complete.
    pub fn transition_to(&self, state: LauncherState) {
        self.start_transition(state);
        self.complete_transition(state);
    }

    // Listeners may add or remove listeners from inside a callback.
    fn snapshot(&self) -> Vec<Rc<dyn StateListener>> {
        self.listeners.borrow().clone()
    }
}

impl StateTransitions for MemoryStateManager {
    fn add_state_listener(
        &self,
        listener: Rc<dyn StateListener>,
    ) -> Result<(), StateListenerError> {
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|existing| Rc::ptr_eq(existing, &listener)) {
            return Err(StateListenerError::AlreadyRegistered);
        }
        listeners.push(listener);
        Ok(())
    }

    fn remove_state_listener(&self, listener: &Rc<dyn StateListener>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|existing| !Rc::ptr_eq(existing, listener));
        listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct CountingListener {
        starts: Cell<usize>,
        completes: Cell<usize>,
    }

    impl StateListener for CountingListener {
        fn on_transition_start(&self, _to_state: LauncherState) {
            self.starts.set(self.starts.get() + 1);
        }

        fn on_transition_complete(&self, _final_state: LauncherState) {
            self.completes.set(self.completes.get() + 1);
        }
    }

    #[test]
    fn overview_like_states_are_classified() {
        assert!(LauncherState::Overview.is_overview());
        assert!(LauncherState::QuickSwitch.is_overview());
        assert!(!LauncherState::Normal.is_overview());
        assert!(!LauncherState::AllApps.is_overview());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let manager = MemoryStateManager::default();
        let listener: Rc<dyn StateListener> = Rc::new(CountingListener::default());

        manager.add_state_listener(listener.clone()).expect("first add");
        assert_eq!(
            manager.add_state_listener(listener.clone()),
            Err(StateListenerError::AlreadyRegistered)
        );
        assert_eq!(manager.listener_count(), 1);

        assert!(manager.remove_state_listener(&listener));
        assert!(!manager.remove_state_listener(&listener));
    }

    #[test]
    fn transition_fires_start_then_complete_once_per_listener() {
        let manager = MemoryStateManager::default();
        let counting = Rc::new(CountingListener::default());
        let listener: Rc<dyn StateListener> = counting.clone();
        manager.add_state_listener(listener).expect("add");

        manager.transition_to(LauncherState::Overview);

        assert_eq!(counting.starts.get(), 1);
        assert_eq!(counting.completes.get(), 1);
        assert_eq!(manager.current(), Some(LauncherState::Overview));
    }
}
