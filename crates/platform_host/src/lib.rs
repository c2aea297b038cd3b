//! Typed host-domain contracts and in-memory adapters for the launcher runtime.
//!
//! This crate is the API-first boundary for everything the live-reconfiguration core consumes
//! from the operating environment: observable settings, window chrome, the launcher state
//! machine, rebuild/restart primitives, the optional privileged helper, icon resources and
//! system theme signals. Concrete platform adapters live outside this workspace; the in-memory
//! adapters here back headless sessions and tests.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod chrome;
pub mod host;
pub mod icons;
pub mod lifecycle;
pub mod privileged;
pub mod settings;
pub mod state;
pub mod theme;

pub use chrome::{MemoryWindowChrome, SurfaceKind, WindowChrome};
pub use host::{LauncherHostServices, MemoryHostHandles};
pub use icons::{CountingIconCache, IconCache, IconPackCatalog, MemoryIconPackCatalog};
pub use lifecycle::{ProcessControl, RecordingLifecycle, RecordingProcessControl, SessionLifecycle};
pub use privileged::{
    PrivilegedHelper, PrivilegedHelperError, PrivilegedHelperFuture, StaticPrivilegedHelper,
    UnavailablePrivilegedHelper,
};
pub use settings::{Preference, Setting, SettingChanges};
pub use state::{
    LauncherState, MemoryStateManager, StateListener, StateListenerError, StateTransitions,
};
pub use theme::{
    MemorySystemThemeSource, Rgb, SystemThemeSignals, SystemThemeSource, DEFAULT_SYSTEM_ACCENT,
};
