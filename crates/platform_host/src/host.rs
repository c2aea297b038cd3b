//! The host service bundle injected into the launcher runtime.

use std::{rc::Rc, sync::Arc};

use crate::{
    CountingIconCache, IconCache, IconPackCatalog, MemoryIconPackCatalog, MemoryStateManager,
    MemorySystemThemeSource, MemoryWindowChrome, PrivilegedHelper, ProcessControl,
    RecordingLifecycle, RecordingProcessControl, SessionLifecycle, StateTransitions,
    SystemThemeSource, UnavailablePrivilegedHelper, WindowChrome,
};

/// Host service bundle injected into the launcher runtime.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `launcher_runtime`, which keeps the reconfiguration core decoupled from window plumbing.
#[derive(Clone)]
pub struct LauncherHostServices {
    /// Window inset and system-UI control.
    pub chrome: Rc<dyn WindowChrome>,
    /// Launcher state-transition system.
    pub transitions: Rc<dyn StateTransitions>,
    /// Session rebuild and in-place re-theme primitives.
    pub lifecycle: Rc<dyn SessionLifecycle>,
    /// Process restart primitive.
    pub process: Rc<dyn ProcessControl>,
    /// Optional privileged helper.
    pub privileged_helper: Rc<dyn PrivilegedHelper>,
    /// Installed icon resources.
    pub icon_packs: Rc<dyn IconPackCatalog>,
    /// Icon cache, reloaded from background workers.
    pub icon_cache: Arc<dyn IconCache>,
    /// System theme signals.
    pub system_theme: Rc<dyn SystemThemeSource>,
}

/// Concrete in-memory adapters behind an [`LauncherHostServices::in_memory`] bundle.
#[derive(Clone)]
pub struct MemoryHostHandles {
    /// Window chrome adapter.
    pub chrome: Rc<MemoryWindowChrome>,
    /// State manager adapter.
    pub transitions: Rc<MemoryStateManager>,
    /// Lifecycle recorder.
    pub lifecycle: Rc<RecordingLifecycle>,
    /// Process control recorder.
    pub process: Rc<RecordingProcessControl>,
    /// Icon cache counter.
    pub icon_cache: Arc<CountingIconCache>,
    /// Theme signal source.
    pub system_theme: Rc<MemorySystemThemeSource>,
}

impl LauncherHostServices {
    /// Builds a headless bundle from in-memory adapters and returns the concrete handles.
    pub fn in_memory(themed_icon_packs: &[&str]) -> (Self, MemoryHostHandles) {
        let handles = MemoryHostHandles {
            chrome: Rc::new(MemoryWindowChrome::new(false)),
            transitions: Rc::new(MemoryStateManager::default()),
            lifecycle: Rc::new(RecordingLifecycle::default()),
            process: Rc::new(RecordingProcessControl::default()),
            icon_cache: Arc::new(CountingIconCache::default()),
            system_theme: Rc::new(MemorySystemThemeSource::default()),
        };
        let services = Self {
            chrome: handles.chrome.clone(),
            transitions: handles.transitions.clone(),
            lifecycle: handles.lifecycle.clone(),
            process: handles.process.clone(),
            privileged_helper: Rc::new(UnavailablePrivilegedHelper),
            icon_packs: Rc::new(MemoryIconPackCatalog::with_themed_packs(
                themed_icon_packs.iter().copied(),
            )),
            icon_cache: handles.icon_cache.clone(),
            system_theme: handles.system_theme.clone(),
        };
        (services, handles)
    }

    /// Replaces the privileged helper adapter.
    pub fn with_privileged_helper(mut self, helper: Rc<dyn PrivilegedHelper>) -> Self {
        self.privileged_helper = helper;
        self
    }
}
