//! Time-varying placement of a layer inside its composition.

use crate::{
    animation::motion::Motion,
    foundation::core::Vec2,
    foundation::error::{StrataError, StrataResult},
    foundation::math::f64_key_bits,
};

/// Position, anchor point, scale and opacity of a component, each possibly animated.
///
/// With the default `anchor_point` of `(0, 0)` the layer is centered on `position`; a non-zero
/// anchor shifts the painted layer by `anchor_point * scale` pixels from there.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Motion<Vec2>,
    pub anchor_point: Motion<Vec2>,
    pub scale: Motion<Vec2>,
    pub opacity: Motion<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Motion::constant(Vec2::ZERO),
            anchor_point: Motion::constant(Vec2::ZERO),
            scale: Motion::constant(Vec2::new(1.0, 1.0)),
            opacity: Motion::constant(1.0),
        }
    }
}

impl Transform {
    /// Static transform placing the layer's center at `position`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position: Motion::constant(position),
            ..Self::default()
        }
    }

    pub fn with_anchor_point(mut self, anchor_point: impl Into<Motion<Vec2>>) -> Self {
        self.anchor_point = anchor_point.into();
        self
    }

    pub fn with_scale(mut self, scale: impl Into<Motion<Vec2>>) -> Self {
        self.scale = scale.into();
        self
    }

    pub fn with_opacity(mut self, opacity: impl Into<Motion<f64>>) -> Self {
        self.opacity = opacity.into();
        self
    }

    pub fn resolve(&self, time: f64) -> TransformValue {
        TransformValue {
            position: self.position.sample(time),
            anchor_point: self.anchor_point.sample(time),
            scale: self.scale.sample(time),
            opacity: self.opacity.sample(time).clamp(0.0, 1.0),
        }
    }

    pub fn validate(&self) -> StrataResult<()> {
        self.position.validate()?;
        self.anchor_point.validate()?;
        self.scale.validate()?;
        self.opacity.validate()?;
        if let Motion::Constant(o) = self.opacity
            && o.is_nan()
        {
            return Err(StrataError::validation("opacity must not be NaN"));
        }
        Ok(())
    }
}

/// A [`Transform`] resolved at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformValue {
    pub position: Vec2,
    pub anchor_point: Vec2,
    pub scale: Vec2,
    pub opacity: f64,
}

impl TransformValue {
    /// Scaled size of a `width x height` layer, rounded to whole pixels. `None` when either side
    /// rounds to zero or below.
    pub fn scaled_size(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let w = (f64::from(width) * self.scale.x).round();
        let h = (f64::from(height) * self.scale.y).round();
        if !(w >= 1.0 && h >= 1.0) {
            return None;
        }
        Some((w as u32, h as u32))
    }

    /// Top-left paint position for a `width x height` layer (size before scaling).
    pub fn top_left(&self, width: u32, height: u32) -> (i64, i64) {
        let x = self.position.x + (self.anchor_point.x - f64::from(width) / 2.0) * self.scale.x;
        let y = self.position.y + (self.anchor_point.y - f64::from(height) / 2.0) * self.scale.y;
        (x.round() as i64, y.round() as i64)
    }

    pub fn is_unit_scale(&self) -> bool {
        self.scale.x == 1.0 && self.scale.y == 1.0
    }

    /// Hashable bit pattern of every field, used in cache keys.
    pub fn key_bits(&self) -> [u64; 7] {
        [
            f64_key_bits(self.position.x),
            f64_key_bits(self.position.y),
            f64_key_bits(self.anchor_point.x),
            f64_key_bits(self.anchor_point.y),
            f64_key_bits(self.scale.x),
            f64_key_bits(self.scale.y),
            f64_key_bits(self.opacity),
        ]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/transform.rs"]
mod tests;
