//! Resolved colour scheme snapshots and the cosmetic-vs-structural theme decision.

use std::rc::Rc;

use platform_host::{
    Preference, Rgb, SessionLifecycle, Setting, SystemThemeSignals, SystemThemeSource,
};
use tracing::{debug, info};

use crate::preferences::{AccentColor, LauncherTheme};

const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);
const LIGHT_ON_SURFACE: Rgb = Rgb::new(0x1c, 0x1b, 0x1f);
const DARK_ON_SURFACE: Rgb = Rgb::new(0xe6, 0xe1, 0xe5);

/// Positive weights lighten towards white, negative weights darken towards black.
const TONE_WEIGHTS: [f32; 5] = [0.8, 0.5, 0.0, -0.3, -0.6];

/// Fully resolved colour scheme.
///
/// Only resolved colours are stored, so two snapshots compare equal exactly when they theme the
/// views identically, whatever combination of settings produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThemeSnapshot {
    dark: bool,
    seed: Rgb,
    tones: [Rgb; 5],
    surface: Rgb,
    on_surface: Rgb,
}

impl ThemeSnapshot {
    pub fn resolve(
        theme: LauncherTheme,
        accent: AccentColor,
        signals: &SystemThemeSignals,
    ) -> Self {
        let dark = match theme {
            LauncherTheme::Light => false,
            LauncherTheme::Dark => true,
            LauncherTheme::System => signals.dark_mode,
        };
        let seed = match accent {
            AccentColor::Wallpaper => signals.wallpaper_primary.unwrap_or(signals.system_accent),
            AccentColor::System => signals.system_accent,
            AccentColor::Custom { color } => color,
        };
        let tones = TONE_WEIGHTS.map(|weight| {
            if weight >= 0.0 {
                seed.mix(WHITE, weight)
            } else {
                seed.mix(BLACK, -weight)
            }
        });
        let (surface, on_surface) = if dark {
            (seed.mix(BLACK, 0.9), DARK_ON_SURFACE)
        } else {
            (seed.mix(WHITE, 0.92), LIGHT_ON_SURFACE)
        };
        Self {
            dark,
            seed,
            tones,
            surface,
            on_surface,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn seed(&self) -> Rgb {
        self.seed
    }

    /// Accent colour with enough contrast against the surface.
    pub fn accent(&self) -> Rgb {
        if self.dark {
            self.tones[1]
        } else {
            self.tones[3]
        }
    }

    pub fn surface(&self) -> Rgb {
        self.surface
    }

    pub fn on_surface(&self) -> Rgb {
        self.on_surface
    }
}

/// Settings and system signals a [`ThemeSnapshot`] is derived from.
#[derive(Clone)]
pub struct ThemeInputs {
    pub launcher_theme: Preference<LauncherTheme>,
    pub accent_color: Preference<AccentColor>,
    pub system: Rc<dyn SystemThemeSource>,
}

impl ThemeInputs {
    pub fn resolve(&self) -> ThemeSnapshot {
        ThemeSnapshot::resolve(
            self.launcher_theme.get(),
            self.accent_color.get(),
            &self.system.signals(),
        )
    }
}

/// Result of a theme trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeOutcome {
    /// Colours were reapplied to the existing views.
    Reapplied,
    /// The scheme changed structurally and the session was rebuilt.
    Rebuilt,
}

/// Sole authority on whether a theme trigger patches colours or rebuilds the session.
///
/// The detector never touches the restart coordinator: pending requests stay for the resume path.
pub struct ThemeChangeDetector {
    inputs: ThemeInputs,
    cached: ThemeSnapshot,
    lifecycle: Rc<dyn SessionLifecycle>,
}

impl ThemeChangeDetector {
    /// Captures the current snapshot as the baseline.
    pub fn new(inputs: ThemeInputs, lifecycle: Rc<dyn SessionLifecycle>) -> Self {
        let cached = inputs.resolve();
        Self {
            inputs,
            cached,
            lifecycle,
        }
    }

    pub fn cached(&self) -> ThemeSnapshot {
        self.cached
    }

    /// Recomputes the live snapshot and reacts to the difference with the cached one.
    ///
    /// A mismatch is applied immediately rather than deferred to the next resume. The new
    /// snapshot becomes the baseline so further triggers before teardown do not rebuild again.
    pub fn on_theme_trigger(&mut self) -> ThemeOutcome {
        let live = self.inputs.resolve();
        if live == self.cached {
            debug!("theme unchanged, reapplying colours in place");
            self.lifecycle.reapply_theme();
            return ThemeOutcome::Reapplied;
        }

        info!(dark = live.is_dark(), seed = ?live.seed(), "colour scheme changed, rebuilding");
        self.cached = live;
        self.lifecycle.rebuild();
        ThemeOutcome::Rebuilt
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use platform_host::{
        MemorySystemThemeSource, RecordingLifecycle, RecordingProcessControl,
        DEFAULT_SYSTEM_ACCENT,
    };
    use pretty_assertions::{assert_eq, assert_ne};

    use super::*;
    use crate::restart::{RestartCoordinator, RestartRequest, ResumeAction};

    struct Fixture {
        detector: ThemeChangeDetector,
        inputs: ThemeInputs,
        system: Rc<MemorySystemThemeSource>,
        lifecycle: Rc<RecordingLifecycle>,
        coordinator: Arc<RestartCoordinator>,
    }

    fn fixture() -> Fixture {
        let system = Rc::new(MemorySystemThemeSource::default());
        let inputs = ThemeInputs {
            launcher_theme: Preference::new("launcher_theme", LauncherTheme::System),
            accent_color: Preference::new("accent_color", AccentColor::System),
            system: system.clone(),
        };
        let lifecycle = Rc::new(RecordingLifecycle::default());
        let coordinator = Arc::new(RestartCoordinator::new());
        let detector = ThemeChangeDetector::new(inputs.clone(), lifecycle.clone());
        Fixture {
            detector,
            inputs,
            system,
            lifecycle,
            coordinator,
        }
    }

    #[test]
    fn identical_inputs_resolve_equal() {
        let signals = SystemThemeSignals::default();
        assert_eq!(
            ThemeSnapshot::resolve(LauncherTheme::Dark, AccentColor::System, &signals),
            ThemeSnapshot::resolve(LauncherTheme::Dark, AccentColor::System, &signals)
        );
    }

    #[test]
    fn visually_identical_settings_compare_equal() {
        let signals = SystemThemeSignals {
            dark_mode: true,
            ..SystemThemeSignals::default()
        };
        assert_eq!(
            ThemeSnapshot::resolve(LauncherTheme::System, AccentColor::Wallpaper, &signals),
            ThemeSnapshot::resolve(
                LauncherTheme::Dark,
                AccentColor::Custom {
                    color: DEFAULT_SYSTEM_ACCENT
                },
                &signals
            )
        );
    }

    #[test]
    fn changed_accent_resolves_unequal() {
        let signals = SystemThemeSignals::default();
        assert_ne!(
            ThemeSnapshot::resolve(LauncherTheme::Light, AccentColor::System, &signals),
            ThemeSnapshot::resolve(
                LauncherTheme::Light,
                AccentColor::Custom {
                    color: Rgb::new(0xff, 0x57, 0x22)
                },
                &signals
            )
        );
    }

    #[test]
    fn unchanged_scheme_reapplies_in_place() {
        let mut fx = fixture();
        fx.inputs.launcher_theme.set(LauncherTheme::Light);

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Reapplied);
        assert_eq!(fx.lifecycle.rethemes(), 1);
        assert_eq!(fx.lifecycle.rebuilds(), 0);
    }

    #[test]
    fn changed_scheme_rebuilds_exactly_once() {
        let mut fx = fixture();
        fx.inputs.launcher_theme.set(LauncherTheme::Dark);

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Rebuilt);
        assert_eq!(fx.lifecycle.rebuilds(), 1);
        assert!(fx.coordinator.pending().is_empty());
        assert!(fx.detector.cached().is_dark());

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Reapplied);
        assert_eq!(fx.lifecycle.rebuilds(), 1);
    }

    #[test]
    fn system_night_mode_is_a_trigger_source() {
        let mut fx = fixture();
        fx.system.set_dark_mode(true);

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Rebuilt);
    }

    #[test]
    fn theme_rebuild_leaves_pending_requests_for_resume() {
        let mut fx = fixture();
        let process = RecordingProcessControl::default();
        fx.coordinator.request_restart();
        fx.inputs.launcher_theme.set(LauncherTheme::Dark);

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Rebuilt);
        assert_eq!(fx.lifecycle.rebuilds(), 1);
        assert_eq!(process.restarts(), 0);
        assert_eq!(fx.coordinator.pending(), RestartRequest::NEEDS_PROCESS_RESTART);

        assert_eq!(
            fx.coordinator.consume_on_resume(fx.lifecycle.as_ref(), &process),
            ResumeAction::Restarted
        );
        assert_eq!(process.restarts(), 1);
    }

    #[test]
    fn theme_rebuild_keeps_structural_rebuild_request() {
        let mut fx = fixture();
        fx.coordinator.request_rebuild();
        fx.system.set_dark_mode(true);

        assert_eq!(fx.detector.on_theme_trigger(), ThemeOutcome::Rebuilt);
        assert_eq!(fx.coordinator.pending(), RestartRequest::NEEDS_REBUILD);
    }
}
