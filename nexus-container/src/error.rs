//! Error types for container operations.

use core::fmt;

/// Why a container operation failed.
///
/// Lookups (`peek_*`, `get_*`) never fail; they report "nothing found" as
/// `None`. Only operations that add or change payloads report an `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// No data was supplied (empty byte slice).
    #[error("data is empty")]
    DataInvalid,
    /// Size is zero or larger than the supplied data.
    #[error("data size is zero or exceeds the supplied data")]
    SizeInvalid,
    /// The container holds no elements.
    #[error("container is empty")]
    ContainerEmpty,
    /// No element matched the probe.
    #[error("no matching element")]
    ElementNotFound,
    /// Storage could not make room for a new element or buffer.
    #[error("out of memory")]
    OutOfMemory,
}

/// A failed insertion or replacement, handing the value back.
///
/// The container is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected<T> {
    /// What went wrong.
    pub error: Error,
    /// The value that was not stored.
    pub value: T,
}

impl<T> Rejected<T> {
    #[inline]
    pub(crate) const fn new(error: Error, value: T) -> Self {
        Self { error, value }
    }

    /// Returns the value that was not stored.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value rejected: {}", self.error)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejected<T>> for Error {
    #[inline]
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}
