//! Host-facing drawable interface.
//!
//! The [`DrawableSink`] trait isolates everything that touches the host's
//! scene: creating, mutating and destroying the primitives that actually
//! render. The drawer only sees opaque [`AdornmentHandle`]s.

use std::fmt;

use visualize_core::math::Pose;

use crate::config::{Color3, Configuration};
use crate::error::DrawError;

/// Draw order hint given to every adornment at creation.
pub const ADORNMENT_Z_INDEX: i32 = 2;

/// Shape of a drawable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdornmentKind {
    /// Arrow-like cone; its apex points along the pose's look axis.
    Cone,
    /// Cylinder (optionally hollow) centered on its pose, along the look axis.
    Cylinder,
    /// Sphere centered on its pose.
    Sphere,
}

impl AdornmentKind {
    /// Get the kind name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cone => "cone",
            Self::Cylinder => "cylinder",
            Self::Sphere => "sphere",
        }
    }
}

/// Opaque handle to an adornment owned by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdornmentHandle(u64);

impl AdornmentHandle {
    /// Wrap a sink-specific identifier.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the sink-specific identifier.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdornmentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Render properties fixed when an adornment is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdornmentStyle {
    pub color: Color3,
    pub transparency: f32,
    pub always_on_top: bool,
    pub visible: bool,
    pub z_index: i32,
}

impl AdornmentStyle {
    /// Creation style for the given configuration and initial color.
    pub fn from_config(config: &Configuration, color: Color3) -> Self {
        Self {
            color,
            transparency: config.transparency,
            always_on_top: config.always_on_top,
            visible: true,
            z_index: ADORNMENT_Z_INDEX,
        }
    }
}

/// Dimensions applied to an adornment on every draw.
///
/// Spheres ignore `length`; only cylinders use `inner_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdornmentSize {
    pub length: f32,
    pub radius: f32,
    pub inner_radius: Option<f32>,
}

/// Creates, mutates and destroys the host's drawable primitives.
///
/// Where the adornments are anchored in the host scene is up to the sink.
/// Failures are returned to the caller of the draw function that triggered
/// them; the drawer does not retry.
pub trait DrawableSink: Send {
    /// Allocate a new adornment of the given kind with its fixed properties.
    fn create(
        &mut self,
        kind: AdornmentKind,
        style: &AdornmentStyle,
    ) -> Result<AdornmentHandle, DrawError>;

    /// Remove an adornment from the scene.
    ///
    /// Called exactly once per handle.
    fn destroy(&mut self, handle: AdornmentHandle);

    /// Set position and orientation.
    fn set_pose(&mut self, handle: AdornmentHandle, pose: &Pose) -> Result<(), DrawError>;

    /// Set the color.
    fn set_color(&mut self, handle: AdornmentHandle, color: Color3) -> Result<(), DrawError>;

    /// Set length and radii.
    fn set_size(&mut self, handle: AdornmentHandle, size: &AdornmentSize)
    -> Result<(), DrawError>;

    /// Show or hide the adornment.
    fn set_visible(&mut self, handle: AdornmentHandle, visible: bool) -> Result<(), DrawError>;
}

impl<S: DrawableSink + ?Sized> DrawableSink for Box<S> {
    fn create(
        &mut self,
        kind: AdornmentKind,
        style: &AdornmentStyle,
    ) -> Result<AdornmentHandle, DrawError> {
        (**self).create(kind, style)
    }

    fn destroy(&mut self, handle: AdornmentHandle) {
        (**self).destroy(handle)
    }

    fn set_pose(&mut self, handle: AdornmentHandle, pose: &Pose) -> Result<(), DrawError> {
        (**self).set_pose(handle, pose)
    }

    fn set_color(&mut self, handle: AdornmentHandle, color: Color3) -> Result<(), DrawError> {
        (**self).set_color(handle, color)
    }

    fn set_size(
        &mut self,
        handle: AdornmentHandle,
        size: &AdornmentSize,
    ) -> Result<(), DrawError> {
        (**self).set_size(handle, size)
    }

    fn set_visible(&mut self, handle: AdornmentHandle, visible: bool) -> Result<(), DrawError> {
        (**self).set_visible(handle, visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_config() {
        let mut config = Configuration::default();
        config.transparency = 0.25;
        config.always_on_top = false;

        let style = AdornmentStyle::from_config(&config, Color3::CYAN);
        assert_eq!(style.color, Color3::CYAN);
        assert_eq!(style.transparency, 0.25);
        assert!(!style.always_on_top);
        assert!(style.visible);
        assert_eq!(style.z_index, ADORNMENT_Z_INDEX);
    }

    #[test]
    fn test_handle_raw_round_trip() {
        let handle = AdornmentHandle::from_raw(42);
        assert_eq!(handle.raw(), 42);
        assert_eq!(handle.to_string(), "#42");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AdornmentKind::Cone.name(), "cone");
        assert_eq!(AdornmentKind::Cylinder.name(), "cylinder");
        assert_eq!(AdornmentKind::Sphere.name(), "sphere");
    }
}
