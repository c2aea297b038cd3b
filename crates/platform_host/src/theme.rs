//! System theme signals consumed when resolving the launcher colour scheme.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Opaque 8-bit RGB colour.
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Builds a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linearly mixes `self` towards `other`; `weight` is clamped to `0.0..=1.0`.
    pub fn mix(self, other: Rgb, weight: f32) -> Rgb {
        let weight = weight.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| {
            let value = f32::from(a) + (f32::from(b) - f32::from(a)) * weight;
            value.round() as u8
        };
        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

/// Default system accent (Material baseline blue).
pub const DEFAULT_SYSTEM_ACCENT: Rgb = Rgb::new(0x1a, 0x73, 0xe8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Theme inputs published by the operating environment.
pub struct SystemThemeSignals {
    /// Whether the system night mode is active.
    pub dark_mode: bool,
    /// Primary colour extracted from the current wallpaper, when available.
    pub wallpaper_primary: Option<Rgb>,
    /// System-wide accent colour.
    pub system_accent: Rgb,
}

impl Default for SystemThemeSignals {
    fn default() -> Self {
        Self {
            dark_mode: false,
            wallpaper_primary: None,
            system_accent: DEFAULT_SYSTEM_ACCENT,
        }
    }
}

/// Host source of the current system theme signals.
pub trait SystemThemeSource {
    /// Returns the signals as of now.
    fn signals(&self) -> SystemThemeSignals;
}

#[derive(Debug, Default)]
/// Settable in-memory theme source.
pub struct MemorySystemThemeSource {
    signals: Cell<SystemThemeSignals>,
}

impl MemorySystemThemeSource {
    /// Replaces the published signals.
    pub fn set(&self, signals: SystemThemeSignals) {
        self.signals.set(signals);
    }

    /// Toggles only the night-mode flag.
    pub fn set_dark_mode(&self, dark_mode: bool) {
        let mut signals = self.signals.get();
        signals.dark_mode = dark_mode;
        self.signals.set(signals);
    }
}

impl SystemThemeSource for MemorySystemThemeSource {
    fn signals(&self) -> SystemThemeSignals {
        self.signals.get()
    }
}
