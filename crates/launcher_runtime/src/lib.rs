//! Live-reconfiguration and restart coordination for a launcher session.
//!
//! The crate reacts to asynchronously changing user settings while a session is live. Each
//! change is applied in place when possible, or escalated to a view-hierarchy rebuild or a
//! process restart through the process-wide [`RestartCoordinator`]. Host services are injected
//! through [`platform_host::LauncherHostServices`].

pub mod binding;
pub mod config;
pub mod error;
pub mod logging;
pub mod preferences;
pub mod restart;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod status_surface;
pub mod theme;

pub use binding::{BindingHandle, BindingRegistry};
pub use config::{ConfigLoader, RuntimeConfig, RuntimeSection};
pub use error::{RuntimeError, RuntimeResult};
pub use preferences::{
    AccentColor, ChangeImpact, GestureHandlerConfig, IconShape, LauncherPreferences,
    LauncherTheme, PreferenceSnapshot,
};
pub use restart::{RestartCoordinator, RestartRequest, ResumeAction};
pub use runtime::LauncherRuntime;
pub use scheduler::{UiHandle, UiScheduler, WorkerPool};
pub use session::{ChromeOverrides, PrivilegedHelperStatus, SessionController};
pub use status_surface::{RehideRegistration, RehideStatusBarListener, StatusSurfaceSynchronizer};
pub use theme::{ThemeChangeDetector, ThemeInputs, ThemeOutcome, ThemeSnapshot};
