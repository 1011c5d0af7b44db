//! The [`Layer`] capability and a few stock implementations.

use std::sync::Arc;

use crate::{cache::key::LayerKey, foundation::core::Frame, foundation::error::StrataResult};

mod func;
mod solid;
mod still;

pub use func::FnLayer;
pub use solid::SolidLayer;
pub use still::ImageLayer;

/// Duration reported by layers that do not know their own length, in seconds.
pub const UNBOUNDED_DURATION: f64 = 1e6;

/// Anything that can produce pixels for a point in time.
///
/// Only [`Layer::render`] is required. Layers that can tell when their output repeats should
/// override [`Layer::cache_key`]; the default assumes every distinct time renders differently.
///
/// Rendering is synchronous. A layer backed by file IO or model inference does that work inside
/// `render`, and any failure it returns aborts the whole frame.
pub trait Layer: Send {
    /// Produce the frame at layer-local `time`, or `None` when there is nothing to draw.
    fn render(&mut self, time: f64) -> StrataResult<Option<Arc<Frame>>>;

    /// Length of the layer's content in seconds.
    fn duration(&self) -> f64 {
        UNBOUNDED_DURATION
    }

    /// Fingerprint of the output at `time`. Equal keys must mean identical frames.
    fn cache_key(&self, time: f64) -> LayerKey {
        LayerKey::time(time)
    }
}

impl<L: Layer + ?Sized> Layer for Box<L> {
    fn render(&mut self, time: f64) -> StrataResult<Option<Arc<Frame>>> {
        (**self).render(time)
    }

    fn duration(&self) -> f64 {
        (**self).duration()
    }

    fn cache_key(&self, time: f64) -> LayerKey {
        (**self).cache_key(time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/layer.rs"]
mod tests;
