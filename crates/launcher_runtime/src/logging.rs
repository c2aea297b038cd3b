//! Tracing subscriber installation for launcher processes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Default directive when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_LOG_FILTER: &str = "launcher_runtime=info";

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `filter`. Returns `false` when a global subscriber was already installed,
/// which happens when a rebuilt session re-runs process setup.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected_without_panicking() {
        let _first = init("launcher_runtime=debug");
        assert!(!init("launcher_runtime=debug"));
    }
}
