//! Session controller: startup wiring, resume-time restart checks and teardown.

use std::{
    cell::{Cell, RefCell},
    fmt::Debug,
    rc::Rc,
    sync::Arc,
};

use futures::future::{AbortHandle, Abortable};
use platform_host::{LauncherHostServices, Setting};
use tracing::{debug, info};

use crate::{
    binding::BindingRegistry,
    error::RuntimeResult,
    preferences::{ChangeImpact, GestureHandlerConfig, LauncherPreferences},
    restart::{RestartCoordinator, ResumeAction},
    scheduler::{UiHandle, WorkerPool},
    status_surface::StatusSurfaceSynchronizer,
    theme::{ThemeChangeDetector, ThemeInputs, ThemeOutcome, ThemeSnapshot},
};

/// Progress of the optional privileged-helper connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivilegedHelperStatus {
    /// `auto_launch_root` was off at startup.
    #[default]
    NotRequested,
    Connecting,
    Connected,
    /// The helper is absent or refused the connection. The feature stays disabled.
    Unavailable,
}

/// Window chrome constants driven by settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeOverrides {
    /// Corner radius override in dp, `None` when the device default applies.
    pub custom_corner_radius: Option<i32>,
    pub rounded_widgets: bool,
}

impl Default for ChromeOverrides {
    fn default() -> Self {
        Self {
            custom_corner_radius: None,
            rounded_widgets: true,
        }
    }
}

#[derive(Default)]
struct LiveState {
    overrides: Cell<ChromeOverrides>,
    back_gesture: Cell<bool>,
    helper: Cell<PrivilegedHelperStatus>,
}

/// One live launcher session.
///
/// Owns every binding the session wires. Bindings are cancelled on [`SessionController::destroy`]
/// and on drop, so no effect runs against a torn-down session.
pub struct SessionController {
    host: LauncherHostServices,
    prefs: LauncherPreferences,
    restart: Arc<RestartCoordinator>,
    workers: WorkerPool,
    registry: BindingRegistry,
    theme: Rc<RefCell<ThemeChangeDetector>>,
    status: Rc<RefCell<StatusSurfaceSynchronizer>>,
    live: Rc<LiveState>,
    helper_task: Option<AbortHandle>,
    destroyed: bool,
}

impl SessionController {
    /// Runs the startup sequence.
    ///
    /// The theme baseline is captured first, then every binding is wired, the themed-icon
    /// setting is corrected, the privileged helper is contacted if requested and icons are
    /// reloaded when an icon pack is active.
    ///
    /// # Errors
    ///
    /// Fails when a binding cannot be wired or its initial delivery fails.
    pub fn create(
        host: LauncherHostServices,
        prefs: LauncherPreferences,
        restart: Arc<RestartCoordinator>,
        ui: UiHandle,
        workers: WorkerPool,
    ) -> RuntimeResult<Self> {
        let theme = ThemeChangeDetector::new(
            ThemeInputs {
                launcher_theme: prefs.launcher_theme.clone(),
                accent_color: prefs.accent_color.clone(),
                system: Rc::clone(&host.system_theme),
            },
            Rc::clone(&host.lifecycle),
        );
        let status =
            StatusSurfaceSynchronizer::new(Rc::clone(&host.chrome), Rc::clone(&host.transitions));

        let mut session = Self {
            registry: BindingRegistry::new(ui.clone()),
            host,
            prefs,
            restart,
            workers,
            theme: Rc::new(RefCell::new(theme)),
            status: Rc::new(RefCell::new(status)),
            live: Rc::new(LiveState::default()),
            helper_task: None,
            destroyed: false,
        };

        session.wire_bindings()?;
        session.correct_themed_icons();
        if session.prefs.auto_launch_root.get() {
            session.connect_privileged_helper(&ui)?;
        }
        session.reload_icons_if_needed();

        info!(
            bindings = session.registry.active_count(),
            "launcher session created"
        );
        Ok(session)
    }

    /// Applies pending rebuild/restart requests. Must run before any other resume work.
    pub fn on_resume(&self) -> ResumeAction {
        let action = self
            .restart
            .consume_on_resume(self.host.lifecycle.as_ref(), self.host.process.as_ref());
        debug!(?action, "session resumed");
        action
    }

    /// System theme callback.
    pub fn on_system_theme_changed(&self) -> ThemeOutcome {
        self.theme.borrow_mut().on_theme_trigger()
    }

    /// Configuration change that is not a resume. Rebuilds unless a request is already pending.
    pub fn on_configuration_changed(&self) -> bool {
        self.restart
            .recreate_if_not_scheduled(self.host.lifecycle.as_ref())
    }

    /// Tears the session down.
    ///
    /// Bindings are cancelled and the status listener released before the host's destroy hook
    /// runs. Calling this twice is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.release();
        self.destroyed = true;
        self.host.lifecycle.on_destroyed();
        info!("launcher session destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn preferences(&self) -> &LauncherPreferences {
        &self.prefs
    }

    pub fn chrome_overrides(&self) -> ChromeOverrides {
        self.live.overrides.get()
    }

    pub fn has_back_gesture(&self) -> bool {
        self.live.back_gesture.get()
    }

    pub fn privileged_helper_status(&self) -> PrivilegedHelperStatus {
        self.live.helper.get()
    }

    /// Snapshot the next theme trigger is compared against.
    pub fn theme_snapshot(&self) -> ThemeSnapshot {
        self.theme.borrow().cached()
    }

    pub fn is_status_listener_registered(&self) -> bool {
        self.status.borrow().is_registered()
    }

    pub fn active_bindings(&self) -> usize {
        self.registry.active_count()
    }

    fn release(&mut self) {
        self.registry.unbind_all();
        if let Some(task) = self.helper_task.take() {
            task.abort();
        }
        self.status.borrow_mut().release();
    }

    fn wire_bindings(&self) -> RuntimeResult<()> {
        let prefs = &self.prefs;

        let status = Rc::clone(&self.status);
        self.registry
            .bind(&prefs.show_status_bar, "status_surface", move |visible: &bool| {
                status.borrow_mut().apply(*visible)
            })?;

        let chrome = Rc::clone(&self.host.chrome);
        self.registry
            .bind(&prefs.dark_status_bar, "status_content", move |dark: &bool| {
                chrome.set_dark_status_content(chrome.workspace_dark_text() || *dark);
                Ok(())
            })?;

        let live = Rc::clone(&self.live);
        let radius = prefs.window_corner_radius.clone();
        self.registry.bind(
            &prefs.override_window_corner_radius,
            "corner_radius",
            move |enabled: &bool| {
                set_corner_radius(&live, *enabled, radius.get());
                Ok(())
            },
        )?;

        let live = Rc::clone(&self.live);
        let enabled = prefs.override_window_corner_radius.clone();
        self.registry
            .bind(&prefs.window_corner_radius, "corner_radius", move |radius: &i32| {
                set_corner_radius(&live, enabled.get(), *radius);
                Ok(())
            })?;

        let live = Rc::clone(&self.live);
        self.registry
            .bind(&prefs.rounded_widgets, "rounded_widgets", move |rounded: &bool| {
                let mut overrides = live.overrides.get();
                overrides.rounded_widgets = *rounded;
                live.overrides.set(overrides);
                Ok(())
            })?;

        let live = Rc::clone(&self.live);
        self.registry
            .bind(
                &prefs.back_gesture_handler,
                "back_gesture",
                move |handler: &GestureHandlerConfig| {
                    live.back_gesture.set(!handler.is_noop());
                    Ok(())
                },
            )?;

        self.wire_theme_trigger(&prefs.launcher_theme)?;
        self.wire_theme_trigger(&prefs.accent_color)?;

        self.wire_icon_reload(&prefs.icon_pack_package)?;
        self.wire_icon_reload(&prefs.themed_icon_pack_package)?;

        self.wire_structural(&prefs.icon_shape)?;
        self.wire_structural(&prefs.home_grid_columns)?;
        self.wire_structural(&prefs.font_family)?;
        Ok(())
    }

    fn wire_theme_trigger<T, S>(&self, setting: &S) -> RuntimeResult<()>
    where
        T: Clone + PartialEq + Debug + 'static,
        S: Setting<T> + ?Sized,
    {
        let theme = Rc::clone(&self.theme);
        self.registry.bind_changes(setting, "theme", move |_: &T| {
            theme.borrow_mut().on_theme_trigger();
            Ok(())
        })?;
        Ok(())
    }

    fn wire_icon_reload<S>(&self, setting: &S) -> RuntimeResult<()>
    where
        S: Setting<String> + ?Sized,
    {
        let workers = self.workers.clone();
        let cache = Arc::clone(&self.host.icon_cache);
        self.registry
            .bind_changes(setting, "icon_reload", move |pack: &String| {
                debug!(pack = %pack, "icon pack changed, reloading icons");
                let cache = Arc::clone(&cache);
                workers.execute(move || cache.reload_icons());
                Ok(())
            })?;
        Ok(())
    }

    fn wire_structural<T, S>(&self, setting: &S) -> RuntimeResult<()>
    where
        T: Clone + PartialEq + Debug + 'static,
        S: Setting<T> + ?Sized,
    {
        let key = setting.key();
        let impact = LauncherPreferences::change_impact(key);
        let restart = Arc::clone(&self.restart);
        self.registry
            .bind_changes(setting, "structural", move |value: &T| {
                info!(setting = key, ?impact, ?value, "structural setting changed");
                match impact {
                    ChangeImpact::Rebuild => restart.request_rebuild(),
                    ChangeImpact::Restart => restart.request_restart(),
                    ChangeImpact::Live => {}
                }
                Ok(())
            })?;
        Ok(())
    }

    /// Turns off themed icons when no themed icon pack is installed anymore.
    fn correct_themed_icons(&self) {
        if !self.prefs.themed_icons.get() {
            return;
        }
        if self
            .host
            .icon_packs
            .themed_icon_packs_installed()
            .is_empty()
        {
            info!("no themed icon pack installed, disabling themed icons");
            self.prefs.themed_icons.set(false);
        }
    }

    fn connect_privileged_helper(&mut self, ui: &UiHandle) -> RuntimeResult<()> {
        let helper = Rc::clone(&self.host.privileged_helper);
        let live = Rc::clone(&self.live);
        live.helper.set(PrivilegedHelperStatus::Connecting);

        let (abort, registration) = AbortHandle::new_pair();
        let attempt = Abortable::new(
            async move {
                match helper.connect().await {
                    Ok(()) => {
                        debug!("privileged helper connected");
                        live.helper.set(PrivilegedHelperStatus::Connected);
                    }
                    Err(err) => {
                        debug!(error = %err, "privileged helper unavailable");
                        live.helper.set(PrivilegedHelperStatus::Unavailable);
                    }
                }
            },
            registration,
        );
        ui.spawn(async move {
            let _ = attempt.await;
        })?;
        self.helper_task = Some(abort);
        Ok(())
    }

    fn reload_icons_if_needed(&self) {
        if self.prefs.always_reload_icons.get() && self.prefs.has_icon_pack() {
            debug!("icon pack active, reloading icons");
            let cache = Arc::clone(&self.host.icon_cache);
            self.workers.execute(move || cache.reload_icons());
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.release();
    }
}

fn set_corner_radius(live: &LiveState, enabled: bool, radius: i32) {
    let mut overrides = live.overrides.get();
    overrides.custom_corner_radius = enabled.then_some(radius);
    live.overrides.set(overrides);
}
