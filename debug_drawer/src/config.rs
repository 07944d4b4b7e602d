//! Visual settings and the two-scope configuration overlay.
//!
//! Settings live at two scopes:
//!
//! - [`DefaultSettings`] — the process-wide defaults, shared by every
//!   [`Visualizer`](crate::Visualizer) bound to it.
//! - [`ConfigOverride`] — a per-instance partial overlay applied on top.
//!
//! Values are never validated. A negative radius or out-of-range
//! transparency is passed through to the sink as-is.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0);
    pub const CYAN: Self = Self::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0);

    /// Create a color from float components.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from 8-bit components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Convert to an `[r, g, b]` array.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color3 {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Complete set of visual and geometric settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Whether anything is drawn at all.
    pub enabled: bool,
    /// Color used when a draw call does not specify one.
    pub color: Color3,
    /// Draw adornments over scene geometry.
    pub always_on_top: bool,
    /// Transparency applied when an adornment is created.
    pub transparency: f32,
    /// Length of the forward vector drawn for a frame.
    pub frame_length: f32,
    /// Radius of vector adornments.
    pub vector_radius: f32,
    /// Radius of point adornments.
    pub point_radius: f32,
    /// Outer radius of line adornments.
    pub line_radius: f32,
    /// Inner radius of line adornments (0 = solid).
    pub line_inner_radius: f32,
    /// Draw vectors as a centered cylinder instead of an arrow cone.
    pub vector_line: bool,
    /// Reuse adornments left over from the previous tick.
    ///
    /// Reused adornments can flicker for a frame, so this is off by default.
    pub cache_adornments: bool,
}

impl Configuration {
    /// Built-in defaults.
    pub const DEFAULT: Self = Self {
        enabled: true,
        color: Color3::WHITE,
        always_on_top: true,
        transparency: 0.5,
        frame_length: 1.0,
        vector_radius: 0.1,
        point_radius: 0.1,
        line_radius: 0.02,
        line_inner_radius: 0.0,
        vector_line: false,
        cache_adornments: false,
    };

    /// Replace every field that `overlay` specifies.
    pub fn apply(&mut self, overlay: &ConfigOverride) {
        macro_rules! apply_fields {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = overlay.$field {
                    self.$field = value;
                })*
            };
        }
        apply_fields!(
            enabled,
            color,
            always_on_top,
            transparency,
            frame_length,
            vector_radius,
            point_radius,
            line_radius,
            line_inner_radius,
            vector_line,
            cache_adornments,
        );
    }

    /// Return a copy with `overlay` applied.
    pub fn with_override(mut self, overlay: &ConfigOverride) -> Self {
        self.apply(overlay);
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial configuration. Unset fields leave the target untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverride {
    pub enabled: Option<bool>,
    pub color: Option<Color3>,
    pub always_on_top: Option<bool>,
    pub transparency: Option<f32>,
    pub frame_length: Option<f32>,
    pub vector_radius: Option<f32>,
    pub point_radius: Option<f32>,
    pub line_radius: Option<f32>,
    pub line_inner_radius: Option<f32>,
    pub vector_line: Option<bool>,
    pub cache_adornments: Option<bool>,
}

impl ConfigOverride {
    /// Create an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `other` into `self`; fields set in `other` win.
    pub fn merge(&mut self, other: &ConfigOverride) {
        macro_rules! merge_fields {
            ($($field:ident),* $(,)?) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        merge_fields!(
            enabled,
            color,
            always_on_top,
            transparency,
            frame_length,
            vector_radius,
            point_radius,
            line_radius,
            line_inner_radius,
            vector_line,
            cache_adornments,
        );
    }

    /// Check if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set whether drawing is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set the default color.
    pub fn with_color(mut self, color: Color3) -> Self {
        self.color = Some(color);
        self
    }

    /// Set whether adornments draw over scene geometry.
    pub fn with_always_on_top(mut self, always_on_top: bool) -> Self {
        self.always_on_top = Some(always_on_top);
        self
    }

    /// Set the creation transparency.
    pub fn with_transparency(mut self, transparency: f32) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Set the frame vector length.
    pub fn with_frame_length(mut self, frame_length: f32) -> Self {
        self.frame_length = Some(frame_length);
        self
    }

    /// Set the vector radius.
    pub fn with_vector_radius(mut self, radius: f32) -> Self {
        self.vector_radius = Some(radius);
        self
    }

    /// Set the point radius.
    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = Some(radius);
        self
    }

    /// Set the line outer radius.
    pub fn with_line_radius(mut self, radius: f32) -> Self {
        self.line_radius = Some(radius);
        self
    }

    /// Set the line inner radius.
    pub fn with_line_inner_radius(mut self, radius: f32) -> Self {
        self.line_inner_radius = Some(radius);
        self
    }

    /// Draw vectors as cylinders instead of cones.
    pub fn with_vector_line(mut self, vector_line: bool) -> Self {
        self.vector_line = Some(vector_line);
        self
    }

    /// Set whether adornments are reused across ticks.
    pub fn with_cache_adornments(mut self, cache: bool) -> Self {
        self.cache_adornments = Some(cache);
        self
    }

    /// Parse an override from RON text.
    ///
    /// ```ignore
    /// let overlay = ConfigOverride::from_ron_str("(color: Some((r: 1.0, g: 0.0, b: 0.0)))")?;
    /// ```
    #[cfg(feature = "serialize-ron")]
    pub fn from_ron_str(text: &str) -> Result<Self, crate::DrawError> {
        ron::from_str(text)
            .map_err(|err| crate::DrawError::InvalidConfig(err.to_string()))
    }
}

impl From<Configuration> for ConfigOverride {
    fn from(config: Configuration) -> Self {
        Self {
            enabled: Some(config.enabled),
            color: Some(config.color),
            always_on_top: Some(config.always_on_top),
            transparency: Some(config.transparency),
            frame_length: Some(config.frame_length),
            vector_radius: Some(config.vector_radius),
            point_radius: Some(config.point_radius),
            line_radius: Some(config.line_radius),
            line_inner_radius: Some(config.line_inner_radius),
            vector_line: Some(config.vector_line),
            cache_adornments: Some(config.cache_adornments),
        }
    }
}

static GLOBAL_DEFAULTS: LazyLock<Arc<DefaultSettings>> =
    LazyLock::new(|| Arc::new(DefaultSettings::new()));

/// Process-wide default configuration.
///
/// Its `enabled` flag gates every instance bound to it: an instance can
/// narrow the defaults but never re-enable drawing that is globally off.
#[derive(Debug)]
pub struct DefaultSettings {
    config: RwLock<Configuration>,
}

impl DefaultSettings {
    /// Create defaults initialized to [`Configuration::DEFAULT`].
    pub fn new() -> Self {
        Self::with_config(Configuration::DEFAULT)
    }

    /// Create defaults from an explicit configuration.
    pub fn with_config(config: Configuration) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// The defaults shared by the whole process.
    pub fn global() -> Arc<DefaultSettings> {
        Arc::clone(&GLOBAL_DEFAULTS)
    }

    /// Merge an override into the defaults.
    pub fn configure(&self, overlay: &ConfigOverride) {
        self.config.write().apply(overlay);
    }

    /// Copy of the current defaults.
    pub fn snapshot(&self) -> Configuration {
        *self.config.read()
    }

    /// Check the global enable gate.
    pub fn is_enabled(&self) -> bool {
        self.config.read().enabled
    }

    /// Resolve the effective configuration for an instance overlay.
    ///
    /// Returns `None` when either scope disables drawing.
    pub fn resolve(&self, overlay: &ConfigOverride) -> Option<Configuration> {
        let defaults = self.snapshot();
        if !defaults.enabled {
            return None;
        }
        let effective = defaults.with_override(overlay);
        effective.enabled.then_some(effective)
    }
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Configuration::default();
        assert!(config.enabled);
        assert_eq!(config.color, Color3::WHITE);
        assert!(config.always_on_top);
        assert_eq!(config.transparency, 0.5);
        assert_eq!(config.frame_length, 1.0);
        assert_eq!(config.vector_radius, 0.1);
        assert_eq!(config.point_radius, 0.1);
        assert_eq!(config.line_radius, 0.02);
        assert_eq!(config.line_inner_radius, 0.0);
        assert!(!config.vector_line);
        assert!(!config.cache_adornments);
    }

    #[test]
    fn test_apply_leaves_unset_fields() {
        let mut config = Configuration::default();
        config.apply(&ConfigOverride::new().with_color(Color3::RED));
        assert_eq!(config.color, Color3::RED);

        config.apply(&ConfigOverride::new().with_transparency(0.9));
        assert_eq!(config.color, Color3::RED);
        assert_eq!(config.transparency, 0.9);
        assert_eq!(config.vector_radius, 0.1);
    }

    #[test]
    fn test_apply_accepts_out_of_range_values() {
        let config = Configuration::default().with_override(
            &ConfigOverride::new()
                .with_point_radius(-3.0)
                .with_transparency(7.5),
        );
        assert_eq!(config.point_radius, -3.0);
        assert_eq!(config.transparency, 7.5);
    }

    #[test]
    fn test_merge_overrides() {
        let mut overlay = ConfigOverride::new()
            .with_color(Color3::RED)
            .with_vector_line(true);
        overlay.merge(&ConfigOverride::new().with_color(Color3::BLUE));
        assert_eq!(overlay.color, Some(Color3::BLUE));
        assert_eq!(overlay.vector_line, Some(true));
        assert_eq!(overlay.transparency, None);
    }

    #[test]
    fn test_empty_override() {
        assert!(ConfigOverride::new().is_empty());
        assert!(!ConfigOverride::new().with_enabled(true).is_empty());
    }

    #[test]
    fn test_full_override_from_configuration() {
        let mut custom = Configuration::default();
        custom.line_radius = 0.5;
        custom.cache_adornments = true;

        let overlay = ConfigOverride::from(custom);
        assert_eq!(Configuration::default().with_override(&overlay), custom);
    }

    #[test]
    fn test_resolve_global_disable_wins() {
        let defaults = DefaultSettings::new();
        defaults.configure(&ConfigOverride::new().with_enabled(false));

        let overlay = ConfigOverride::new().with_enabled(true);
        assert!(defaults.resolve(&overlay).is_none());
        assert!(!defaults.is_enabled());
    }

    #[test]
    fn test_resolve_instance_disable() {
        let defaults = DefaultSettings::new();
        let overlay = ConfigOverride::new().with_enabled(false);
        assert!(defaults.resolve(&overlay).is_none());
        assert!(defaults.resolve(&ConfigOverride::new()).is_some());
    }

    #[test]
    fn test_resolve_layers_instance_over_defaults() {
        let defaults = DefaultSettings::new();
        defaults.configure(
            &ConfigOverride::new()
                .with_color(Color3::GREEN)
                .with_line_radius(0.3),
        );

        let overlay = ConfigOverride::new().with_line_radius(0.7);
        let effective = defaults.resolve(&overlay).unwrap();
        assert_eq!(effective.color, Color3::GREEN);
        assert_eq!(effective.line_radius, 0.7);
    }

    #[test]
    fn test_color_from_rgb8() {
        let color = Color3::from_rgb8(255, 0, 51);
        assert_eq!(color.to_array(), [1.0, 0.0, 0.2]);
    }

    #[cfg(feature = "serialize-ron")]
    #[test]
    fn test_from_ron_str() {
        let overlay = ConfigOverride::from_ron_str(
            "(color: Some((r: 1.0, g: 0.0, b: 0.0)), cache_adornments: Some(true))",
        )
        .unwrap();
        assert_eq!(overlay.color, Some(Color3::RED));
        assert_eq!(overlay.cache_adornments, Some(true));
        assert_eq!(overlay.transparency, None);

        assert!(matches!(
            ConfigOverride::from_ron_str("(color: 12"),
            Err(crate::DrawError::InvalidConfig(_))
        ));
    }
}
