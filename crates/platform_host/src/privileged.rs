//! Optional privileged-helper connection contracts.

use std::{fmt, future::Future, pin::Pin};

/// Object-safe boxed future used by [`PrivilegedHelper`].
pub type PrivilegedHelperFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Failure to reach the privileged helper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegedHelperError {
    /// The device does not grant privileged access.
    NotAvailable,
    /// The helper exists but the connection attempt failed.
    ConnectionFailed(String),
}

impl fmt::Display for PrivilegedHelperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAvailable => write!(f, "privileged helper not available"),
            Self::ConnectionFailed(reason) => {
                write!(f, "privileged helper connection failed: {reason}")
            }
        }
    }
}

impl std::error::Error for PrivilegedHelperError {}

/// Host service that binds to an optional privileged helper process.
pub trait PrivilegedHelper {
    /// Attempts to connect to the helper.
    fn connect(&self) -> PrivilegedHelperFuture<'_, Result<(), PrivilegedHelperError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Helper adapter for hosts without privileged access.
pub struct UnavailablePrivilegedHelper;

impl PrivilegedHelper for UnavailablePrivilegedHelper {
    fn connect(&self) -> PrivilegedHelperFuture<'_, Result<(), PrivilegedHelperError>> {
        Box::pin(async { Err(PrivilegedHelperError::NotAvailable) })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Helper adapter that always connects.
pub struct StaticPrivilegedHelper;

impl PrivilegedHelper for StaticPrivilegedHelper {
    fn connect(&self) -> PrivilegedHelperFuture<'_, Result<(), PrivilegedHelperError>> {
        Box::pin(async { Ok(()) })
    }
}
