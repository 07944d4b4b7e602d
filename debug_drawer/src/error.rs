//! Debug drawing error types.

use std::fmt;

use crate::sink::AdornmentHandle;

/// Errors surfaced by draw calls and instance setup.
///
/// Geometry and configuration never produce errors; malformed values simply
/// draw malformed adornments. Failures come from the drawable sink or from
/// misuse of the shared default instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// The sink could not create an adornment.
    CreationFailed(String),
    /// The sink ran out of room for new adornments.
    OutOfResources,
    /// The sink does not recognize the handle.
    InvalidHandle(AdornmentHandle),
    /// A sink mutator failed.
    Sink(String),
    /// A configuration override could not be parsed.
    InvalidConfig(String),
    /// The shared default instance has not been initialized.
    NotInitialized,
    /// The shared default instance was already initialized.
    AlreadyInitialized,
    /// The frame clock adapter is already subscribed to a clock.
    ClockAlreadyAttached,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed(msg) => write!(f, "adornment creation failed: {msg}"),
            Self::OutOfResources => write!(f, "out of adornment resources"),
            Self::InvalidHandle(handle) => write!(f, "invalid adornment handle: {handle}"),
            Self::Sink(msg) => write!(f, "sink error: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::NotInitialized => write!(f, "default visualizer not initialized"),
            Self::AlreadyInitialized => write!(f, "default visualizer already initialized"),
            Self::ClockAlreadyAttached => write!(f, "frame clock already attached"),
        }
    }
}

impl std::error::Error for DrawError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DrawError::OutOfResources;
        assert_eq!(err.to_string(), "out of adornment resources");

        let err = DrawError::CreationFailed("scene detached".to_string());
        assert_eq!(err.to_string(), "adornment creation failed: scene detached");

        let err = DrawError::InvalidHandle(AdornmentHandle::from_raw(7));
        assert_eq!(err.to_string(), "invalid adornment handle: #7");
    }
}
