//! Icon pack discovery and icon cache contracts.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Host catalogue of installed icon resources.
pub trait IconPackCatalog {
    /// Returns package names of installed icon packs that provide themed (monochrome) icons.
    fn themed_icon_packs_installed(&self) -> Vec<String>;
}

/// Icon cache invalidation service.
///
/// Reloads are I/O bound and run on background workers, hence the `Send + Sync` bound.
pub trait IconCache: Send + Sync {
    /// Drops cached icons and reloads them from the active packs.
    fn reload_icons(&self);
}

#[derive(Debug, Clone, Default)]
/// Fixed in-memory icon pack catalogue.
pub struct MemoryIconPackCatalog {
    themed_packs: Vec<String>,
}

impl MemoryIconPackCatalog {
    /// Creates a catalogue listing `themed_packs` as installed.
    pub fn with_themed_packs(themed_packs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            themed_packs: themed_packs.into_iter().map(Into::into).collect(),
        }
    }
}

impl IconPackCatalog for MemoryIconPackCatalog {
    fn themed_icon_packs_installed(&self) -> Vec<String> {
        self.themed_packs.clone()
    }
}

#[derive(Debug, Default)]
/// Icon cache that only counts reload requests.
pub struct CountingIconCache {
    reloads: AtomicUsize,
}

impl CountingIconCache {
    /// Number of completed reloads.
    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl IconCache for CountingIconCache {
    fn reload_icons(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}
