//! Session-scoped registry of setting-to-effect bindings.
//!
//! A binding delivers a setting's value to one side effect: once at bind time, then again for
//! every observed change. Repeated values are filtered before the effect runs because host
//! notifications may fire without a real change. All bindings of a session share one scope that
//! is cancelled in a single step when the session goes away.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Debug,
    rc::{Rc, Weak},
};

use futures::{
    future::{AbortHandle, Abortable, Aborted},
    StreamExt,
};
use platform_host::Setting;
use tracing::{debug, trace};

use crate::{
    error::{RuntimeError, RuntimeResult},
    scheduler::UiHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BindingKey {
    setting: &'static str,
    effect: &'static str,
}

#[derive(Default)]
struct ScopeState {
    active: HashMap<BindingKey, AbortHandle>,
    closed: bool,
}

/// Cancellable handle for one binding. Dropping it leaves the binding running.
#[derive(Debug)]
pub struct BindingHandle {
    key: BindingKey,
    abort: AbortHandle,
    scope: Weak<RefCell<ScopeState>>,
}

impl BindingHandle {
    pub fn setting(&self) -> &'static str {
        self.key.setting
    }

    pub fn effect(&self) -> &'static str {
        self.key.effect
    }

    /// Cancels this binding only. Safe to call after the scope has been cancelled.
    pub fn cancel(&self) {
        self.abort.abort();
        if let Some(scope) = self.scope.upgrade() {
            scope.borrow_mut().active.remove(&self.key);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// Owner of every binding created by one session.
pub struct BindingRegistry {
    ui: UiHandle,
    scope: Rc<RefCell<ScopeState>>,
}

impl BindingRegistry {
    pub fn new(ui: UiHandle) -> Self {
        Self {
            ui,
            scope: Rc::new(RefCell::new(ScopeState::default())),
        }
    }

    /// Binds `effect` to `setting`, invoking it now with the current value and on every change.
    ///
    /// # Errors
    ///
    /// Fails when the scope is closed, when the same `(setting, effect_name)` pair is already
    /// bound, or when the initial delivery fails. Failures of later deliveries are reported by
    /// the UI scheduler.
    pub fn bind<T, S, F>(
        &self,
        setting: &S,
        effect_name: &'static str,
        effect: F,
    ) -> RuntimeResult<BindingHandle>
    where
        T: Clone + PartialEq + Debug + 'static,
        S: Setting<T> + ?Sized,
        F: FnMut(&T) -> RuntimeResult<()> + 'static,
    {
        self.wire(setting, effect_name, effect, true)
    }

    /// Like [`BindingRegistry::bind`] but skips the initial delivery.
    pub fn bind_changes<T, S, F>(
        &self,
        setting: &S,
        effect_name: &'static str,
        effect: F,
    ) -> RuntimeResult<BindingHandle>
    where
        T: Clone + PartialEq + Debug + 'static,
        S: Setting<T> + ?Sized,
        F: FnMut(&T) -> RuntimeResult<()> + 'static,
    {
        self.wire(setting, effect_name, effect, false)
    }

    /// Cancels every binding and closes the scope. Idempotent.
    pub fn unbind_all(&self) {
        let mut scope = self.scope.borrow_mut();
        if !scope.closed {
            debug!(bindings = scope.active.len(), "cancelling binding scope");
        }
        scope.closed = true;
        for (_, handle) in scope.active.drain() {
            handle.abort();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.scope.borrow().closed
    }

    pub fn active_count(&self) -> usize {
        self.scope
            .borrow()
            .active
            .values()
            .filter(|handle| !handle.is_aborted())
            .count()
    }

    fn wire<T, S, F>(
        &self,
        setting: &S,
        effect_name: &'static str,
        mut effect: F,
        deliver_initial: bool,
    ) -> RuntimeResult<BindingHandle>
    where
        T: Clone + PartialEq + Debug + 'static,
        S: Setting<T> + ?Sized,
        F: FnMut(&T) -> RuntimeResult<()> + 'static,
    {
        let key = BindingKey {
            setting: setting.key(),
            effect: effect_name,
        };
        {
            let scope = self.scope.borrow();
            if scope.closed {
                return Err(RuntimeError::ScopeClosed);
            }
            if scope.active.contains_key(&key) {
                return Err(RuntimeError::DuplicateBinding {
                    setting: key.setting,
                    effect: key.effect,
                });
            }
        }

        // Subscribe before reading so a change between the two cannot be missed.
        let mut changes = setting.changes();
        let initial = setting.get();
        debug!(setting = key.setting, effect = key.effect, value = ?initial, "binding wired");
        if deliver_initial {
            effect(&initial).map_err(|err| effect_failure(key, err))?;
        }

        let (abort, registration) = AbortHandle::new_pair();
        let deliveries = Abortable::new(
            async move {
                let mut last = initial;
                while let Some(value) = changes.next().await {
                    if value == last {
                        trace!(
                            setting = key.setting,
                            effect = key.effect,
                            "duplicate value suppressed"
                        );
                        continue;
                    }
                    last = value;
                    effect(&last).map_err(|err| effect_failure(key, err))?;
                }
                Ok::<(), RuntimeError>(())
            },
            registration,
        );
        // A task that ends without being aborted failed or lost its stream; free its key so
        // the pair can be bound again.
        let scope = Rc::downgrade(&self.scope);
        self.ui.spawn_fallible(async move {
            match deliveries.await {
                Ok(result) => {
                    if let Some(scope) = scope.upgrade() {
                        scope.borrow_mut().active.remove(&key);
                    }
                    result
                }
                Err(Aborted) => Ok(()),
            }
        })?;

        self.scope.borrow_mut().active.insert(key, abort.clone());
        Ok(BindingHandle {
            key,
            abort,
            scope: Rc::downgrade(&self.scope),
        })
    }
}

impl Drop for BindingRegistry {
    fn drop(&mut self) {
        self.unbind_all();
    }
}

fn effect_failure(key: BindingKey, err: RuntimeError) -> RuntimeError {
    match err {
        RuntimeError::Effect { .. } => err,
        other => RuntimeError::Effect {
            setting: key.setting,
            effect: key.effect,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use platform_host::Preference;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::scheduler::UiScheduler;

    fn recorder<T: Clone + 'static>(
    ) -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) -> RuntimeResult<()>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &T| {
            sink.borrow_mut().push(value.clone());
            Ok(())
        })
    }

    #[test]
    fn initial_value_is_delivered_synchronously() {
        let scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("window_corner_radius", 24);
        let (seen, effect) = recorder();

        registry.bind(&pref, "corner_radius", effect).expect("bind");

        assert_eq!(*seen.borrow(), vec![24]);
    }

    #[test]
    fn duplicate_values_are_suppressed() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("rounded_widgets", false);
        let (seen, effect) = recorder();
        registry.bind(&pref, "rounded_widgets", effect).expect("bind");

        pref.notify_current();
        pref.set(true);
        pref.set(true);
        pref.set(false);
        scheduler.run_until_stalled().expect("drive");

        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }

    #[test]
    fn bind_changes_skips_initial_delivery() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("icon_pack_package", String::new());
        let (seen, effect) = recorder();
        registry
            .bind_changes(&pref, "reload_icons", effect)
            .expect("bind");

        pref.notify_current();
        scheduler.run_until_stalled().expect("drive");
        assert!(seen.borrow().is_empty());

        pref.set("arcticons".to_string());
        scheduler.run_until_stalled().expect("drive");
        assert_eq!(*seen.borrow(), vec!["arcticons".to_string()]);
    }

    #[test]
    fn duplicate_binding_is_rejected() {
        let scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("show_status_bar", true);

        registry
            .bind(&pref, "status_surface", |_: &bool| Ok(()))
            .expect("first bind");
        let err = registry
            .bind(&pref, "status_surface", |_: &bool| Ok(()))
            .expect_err("second bind");
        assert!(matches!(
            err,
            RuntimeError::DuplicateBinding {
                setting: "show_status_bar",
                effect: "status_surface"
            }
        ));
        registry
            .bind(&pref, "other_effect", |_: &bool| Ok(()))
            .expect("different effect on same setting");
        assert_eq!(registry.active_count(), 2);
    }

    #[test]
    fn unbind_all_cancels_pending_deliveries_and_is_idempotent() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("dark_status_bar", false);
        let (seen, effect) = recorder();
        registry.bind(&pref, "dark_status_bar", effect).expect("bind");

        pref.set(true);
        registry.unbind_all();
        registry.unbind_all();
        scheduler.run_until_stalled().expect("drive");

        assert_eq!(*seen.borrow(), vec![false]);
        assert_eq!(registry.active_count(), 0);
        assert!(registry.is_closed());
        assert!(matches!(
            registry.bind(&pref, "late", |_: &bool| Ok(())),
            Err(RuntimeError::ScopeClosed)
        ));
    }

    #[test]
    fn single_handle_cancel_leaves_others_running() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("home_grid_columns", 4u8);
        let (first_seen, first) = recorder();
        let (second_seen, second) = recorder();
        let handle = registry.bind(&pref, "first", first).expect("bind");
        registry.bind(&pref, "second", second).expect("bind");

        handle.cancel();
        pref.set(5);
        scheduler.run_until_stalled().expect("drive");

        assert!(handle.is_cancelled());
        assert_eq!(*first_seen.borrow(), vec![4]);
        assert_eq!(*second_seen.borrow(), vec![4, 5]);
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn initial_failure_propagates_from_bind() {
        let scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("themed_icons", true);

        let err = registry
            .bind(&pref, "explode", |_: &bool| {
                Err(RuntimeError::Config("boom".to_string()))
            })
            .expect_err("initial delivery fails");
        match err {
            RuntimeError::Effect {
                setting,
                effect,
                message,
            } => {
                assert_eq!(setting, "themed_icons");
                assert_eq!(effect, "explode");
                assert_eq!(message, "config error: boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn later_failure_surfaces_from_scheduler() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("window_corner_radius", 8);
        registry
            .bind(&pref, "reject_negative", |radius: &i32| {
                if *radius < 0 {
                    Err(RuntimeError::Config("negative radius".to_string()))
                } else {
                    Ok(())
                }
            })
            .expect("bind");

        pref.set(-1);
        let err = scheduler.run_until_stalled().expect_err("effect failure");
        assert!(matches!(
            err,
            RuntimeError::Effect {
                setting: "window_corner_radius",
                ..
            }
        ));
    }

    #[test]
    fn failed_binding_frees_its_key() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("window_corner_radius", 8);
        registry
            .bind(&pref, "reject_negative", |radius: &i32| {
                if *radius < 0 {
                    Err(RuntimeError::Config("negative radius".to_string()))
                } else {
                    Ok(())
                }
            })
            .expect("bind");

        pref.set(-1);
        scheduler.run_until_stalled().expect_err("effect failure");
        assert_eq!(registry.active_count(), 0);

        let (seen, effect) = recorder();
        registry
            .bind(&pref, "reject_negative", effect)
            .expect("rebind after failure");
        pref.set(12);
        scheduler.run_until_stalled().expect("drive");
        assert_eq!(*seen.borrow(), vec![-1, 12]);
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn cancelled_then_rebound_pair_keeps_new_binding() {
        let mut scheduler = UiScheduler::new();
        let registry = BindingRegistry::new(scheduler.handle());
        let pref = Preference::new("rounded_widgets", true);

        let first = registry
            .bind(&pref, "rounded_widgets", |_: &bool| Ok(()))
            .expect("bind");
        first.cancel();
        let (seen, effect) = recorder();
        registry
            .bind(&pref, "rounded_widgets", effect)
            .expect("rebind after cancel");

        pref.set(false);
        scheduler.run_until_stalled().expect("drive");
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert_eq!(registry.active_count(), 1);
    }

    fn dedup(values: &[u8]) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        for value in values {
            if out.last() != Some(value) {
                out.push(*value);
            }
        }
        out
    }

    proptest! {
        #[test]
        fn effect_sees_deduplicated_stream(
            initial in 0u8..3,
            updates in proptest::collection::vec(0u8..3, 0..24)
        ) {
            let mut scheduler = UiScheduler::new();
            let registry = BindingRegistry::new(scheduler.handle());
            let pref = Preference::new("home_grid_columns", initial);
            let (seen, effect) = recorder();
            registry.bind(&pref, "grid", effect).expect("bind");

            for value in &updates {
                pref.set(*value);
            }
            scheduler.run_until_stalled().expect("drive");

            let mut expected_input = vec![initial];
            expected_input.extend(updates.iter().copied());
            prop_assert_eq!(seen.borrow().clone(), dedup(&expected_input));
        }
    }
}
