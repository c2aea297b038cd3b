//! Launcher preference bundle and its serializable seed snapshot.

use platform_host::{Preference, Rgb, Setting};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LauncherTheme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum AccentColor {
    /// Seeded from the wallpaper's primary colour, falling back to the system accent.
    #[default]
    Wallpaper,
    System,
    Custom { color: Rgb },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GestureHandlerConfig {
    #[default]
    NoOp,
    OpenNotifications,
    SleepScreen,
    OpenAppDrawer,
    OpenAppSearch,
}

impl GestureHandlerConfig {
    pub fn is_noop(self) -> bool {
        matches!(self, Self::NoOp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IconShape {
    #[default]
    Circle,
    Square,
    RoundedSquare,
    Squircle,
    Teardrop,
}

/// How far a change to a setting reaches into the live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeImpact {
    /// Applied in place by a bound effect.
    Live,
    /// Requires the view hierarchy to be rebuilt on the next resume.
    Rebuild,
    /// Requires the process to be restarted on the next resume.
    Restart,
}

pub const DEFAULT_WINDOW_CORNER_RADIUS: i32 = 80;
pub const DEFAULT_HOME_GRID_COLUMNS: u8 = 4;

/// Serializable values used to seed a [`LauncherPreferences`] bundle.
///
/// Every field falls back to its default so partial config tables stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSnapshot {
    pub launcher_theme: LauncherTheme,
    pub accent_color: AccentColor,
    pub show_status_bar: bool,
    pub dark_status_bar: bool,
    pub override_window_corner_radius: bool,
    pub window_corner_radius: i32,
    pub rounded_widgets: bool,
    pub back_gesture_handler: GestureHandlerConfig,
    pub themed_icons: bool,
    pub icon_pack_package: String,
    pub themed_icon_pack_package: String,
    pub always_reload_icons: bool,
    pub auto_launch_root: bool,
    pub icon_shape: IconShape,
    pub home_grid_columns: u8,
    pub font_family: String,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            launcher_theme: LauncherTheme::default(),
            accent_color: AccentColor::default(),
            show_status_bar: true,
            dark_status_bar: false,
            override_window_corner_radius: false,
            window_corner_radius: DEFAULT_WINDOW_CORNER_RADIUS,
            rounded_widgets: true,
            back_gesture_handler: GestureHandlerConfig::default(),
            themed_icons: false,
            icon_pack_package: String::new(),
            themed_icon_pack_package: String::new(),
            always_reload_icons: true,
            auto_launch_root: false,
            icon_shape: IconShape::default(),
            home_grid_columns: DEFAULT_HOME_GRID_COLUMNS,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Every observable setting a launcher session binds to.
///
/// The bundle is cheap to clone: each field is a shared handle onto the same cell, so the
/// preference screens and the live session observe one value.
#[derive(Debug, Clone)]
pub struct LauncherPreferences {
    pub launcher_theme: Preference<LauncherTheme>,
    pub accent_color: Preference<AccentColor>,
    pub show_status_bar: Preference<bool>,
    pub dark_status_bar: Preference<bool>,
    pub override_window_corner_radius: Preference<bool>,
    pub window_corner_radius: Preference<i32>,
    pub rounded_widgets: Preference<bool>,
    pub back_gesture_handler: Preference<GestureHandlerConfig>,
    pub themed_icons: Preference<bool>,
    pub icon_pack_package: Preference<String>,
    pub themed_icon_pack_package: Preference<String>,
    pub always_reload_icons: Preference<bool>,
    pub auto_launch_root: Preference<bool>,
    pub icon_shape: Preference<IconShape>,
    pub home_grid_columns: Preference<u8>,
    pub font_family: Preference<String>,
}

impl Default for LauncherPreferences {
    fn default() -> Self {
        Self::from_snapshot(&PreferenceSnapshot::default())
    }
}

impl LauncherPreferences {
    pub fn from_snapshot(seed: &PreferenceSnapshot) -> Self {
        Self {
            launcher_theme: Preference::new("launcher_theme", seed.launcher_theme),
            accent_color: Preference::new("accent_color", seed.accent_color),
            show_status_bar: Preference::new("show_status_bar", seed.show_status_bar),
            dark_status_bar: Preference::new("dark_status_bar", seed.dark_status_bar),
            override_window_corner_radius: Preference::new(
                "override_window_corner_radius",
                seed.override_window_corner_radius,
            ),
            window_corner_radius: Preference::new(
                "window_corner_radius",
                seed.window_corner_radius,
            ),
            rounded_widgets: Preference::new("rounded_widgets", seed.rounded_widgets),
            back_gesture_handler: Preference::new(
                "back_gesture_handler",
                seed.back_gesture_handler,
            ),
            themed_icons: Preference::new("themed_icons", seed.themed_icons),
            icon_pack_package: Preference::new("icon_pack_package", seed.icon_pack_package.clone()),
            themed_icon_pack_package: Preference::new(
                "themed_icon_pack_package",
                seed.themed_icon_pack_package.clone(),
            ),
            always_reload_icons: Preference::new("always_reload_icons", seed.always_reload_icons),
            auto_launch_root: Preference::new("auto_launch_root", seed.auto_launch_root),
            icon_shape: Preference::new("icon_shape", seed.icon_shape),
            home_grid_columns: Preference::new("home_grid_columns", seed.home_grid_columns),
            font_family: Preference::new("font_family", seed.font_family.clone()),
        }
    }

    /// Captures the current value of every setting.
    pub fn snapshot(&self) -> PreferenceSnapshot {
        PreferenceSnapshot {
            launcher_theme: self.launcher_theme.get(),
            accent_color: self.accent_color.get(),
            show_status_bar: self.show_status_bar.get(),
            dark_status_bar: self.dark_status_bar.get(),
            override_window_corner_radius: self.override_window_corner_radius.get(),
            window_corner_radius: self.window_corner_radius.get(),
            rounded_widgets: self.rounded_widgets.get(),
            back_gesture_handler: self.back_gesture_handler.get(),
            themed_icons: self.themed_icons.get(),
            icon_pack_package: self.icon_pack_package.get(),
            themed_icon_pack_package: self.themed_icon_pack_package.get(),
            always_reload_icons: self.always_reload_icons.get(),
            auto_launch_root: self.auto_launch_root.get(),
            icon_shape: self.icon_shape.get(),
            home_grid_columns: self.home_grid_columns.get(),
            font_family: self.font_family.get(),
        }
    }

    /// Returns whether any icon pack (regular or themed) is selected.
    pub fn has_icon_pack(&self) -> bool {
        !self.icon_pack_package.get().is_empty() || !self.themed_icon_pack_package.get().is_empty()
    }

    /// Returns how a change to the setting stored under `key` must be applied.
    pub fn change_impact(key: &str) -> ChangeImpact {
        match key {
            "icon_shape" | "home_grid_columns" => ChangeImpact::Rebuild,
            "font_family" => ChangeImpact::Restart,
            _ => ChangeImpact::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_snapshot_uses_defaults() {
        let seed: PreferenceSnapshot =
            toml::from_str("show_status_bar = false\nhome_grid_columns = 5\n").expect("parse");
        assert!(!seed.show_status_bar);
        assert_eq!(seed.home_grid_columns, 5);
        assert_eq!(seed.window_corner_radius, DEFAULT_WINDOW_CORNER_RADIUS);
        assert_eq!(seed.launcher_theme, LauncherTheme::System);
    }

    #[test]
    fn snapshot_reflects_live_values() {
        let prefs = LauncherPreferences::default();
        prefs.launcher_theme.set(LauncherTheme::Dark);
        prefs.accent_color.set(AccentColor::Custom {
            color: Rgb::new(0xff, 0x57, 0x22),
        });

        let snapshot = prefs.snapshot();
        assert_eq!(
            snapshot,
            PreferenceSnapshot {
                launcher_theme: LauncherTheme::Dark,
                accent_color: AccentColor::Custom {
                    color: Rgb::new(0xff, 0x57, 0x22),
                },
                ..PreferenceSnapshot::default()
            }
        );
    }

    #[test]
    fn accent_color_uses_tagged_representation() {
        let json = serde_json::to_string(&AccentColor::Custom {
            color: Rgb::new(1, 2, 3),
        })
        .expect("serialize");
        assert_eq!(json, r#"{"kind":"custom","color":{"r":1,"g":2,"b":3}}"#);
    }

    #[test]
    fn structural_settings_declare_their_impact() {
        assert_eq!(
            LauncherPreferences::change_impact("icon_shape"),
            ChangeImpact::Rebuild
        );
        assert_eq!(
            LauncherPreferences::change_impact("font_family"),
            ChangeImpact::Restart
        );
        assert_eq!(
            LauncherPreferences::change_impact("show_status_bar"),
            ChangeImpact::Live
        );
    }

    #[test]
    fn icon_pack_detection_covers_both_pack_kinds() {
        let prefs = LauncherPreferences::default();
        assert!(!prefs.has_icon_pack());
        prefs.themed_icon_pack_package.set("arcticons".to_string());
        assert!(prefs.has_icon_pack());
    }
}
