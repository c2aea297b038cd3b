//! Window chrome (system bar) control contracts and the in-memory adapter.

use std::cell::{Cell, RefCell};

/// System-level chrome surface whose visibility is controlled independently of the view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// The top status bar.
    StatusBars,
    /// The bottom navigation bar.
    NavigationBars,
}

/// Host service controlling window insets and base system-UI state.
pub trait WindowChrome {
    /// Shows the surface. No-op when it is already visible.
    fn show(&self, kind: SurfaceKind);

    /// Hides the surface. No-op when it is already hidden.
    fn hide(&self, kind: SurfaceKind);

    /// Updates the base window system-UI state: `true` requests dark status bar content.
    fn set_dark_status_content(&self, dark: bool);

    /// Returns whether the active workspace theme already renders dark text.
    fn workspace_dark_text(&self) -> bool;
}

#[derive(Debug, Default)]
/// In-memory window chrome used by headless sessions and tests.
pub struct MemoryWindowChrome {
    status_bars_visible: Cell<bool>,
    navigation_bars_visible: Cell<bool>,
    dark_status_content: Cell<bool>,
    workspace_dark_text: bool,
    calls: RefCell<Vec<(SurfaceKind, bool)>>,
}

impl MemoryWindowChrome {
    /// Creates chrome with both surfaces visible.
    pub fn new(workspace_dark_text: bool) -> Self {
        Self {
            status_bars_visible: Cell::new(true),
            navigation_bars_visible: Cell::new(true),
            workspace_dark_text,
            ..Self::default()
        }
    }

    /// Returns whether the surface is currently visible.
    pub fn is_visible(&self, kind: SurfaceKind) -> bool {
        self.cell(kind).get()
    }

    /// Returns the last base-window dark-content value.
    pub fn dark_status_content(&self) -> bool {
        self.dark_status_content.get()
    }

    /// Returns every show (`true`) / hide (`false`) request in call order.
    pub fn calls(&self) -> Vec<(SurfaceKind, bool)> {
        self.calls.borrow().clone()
    }

    fn cell(&self, kind: SurfaceKind) -> &Cell<bool> {
        match kind {
            SurfaceKind::StatusBars => &self.status_bars_visible,
            SurfaceKind::NavigationBars => &self.navigation_bars_visible,
        }
    }
}

impl WindowChrome for MemoryWindowChrome {
    fn show(&self, kind: SurfaceKind) {
        self.calls.borrow_mut().push((kind, true));
        self.cell(kind).set(true);
    }

    fn hide(&self, kind: SurfaceKind) {
        self.calls.borrow_mut().push((kind, false));
        self.cell(kind).set(false);
    }

    fn set_dark_status_content(&self, dark: bool) {
        self.dark_status_content.set(dark);
    }

    fn workspace_dark_text(&self) -> bool {
        self.workspace_dark_text
    }
}
