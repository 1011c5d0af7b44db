use std::sync::Arc;

use crate::{
    cache::key::LayerKey,
    foundation::core::{Frame, Size},
    foundation::error::StrataResult,
    layer::{Layer, UNBOUNDED_DURATION},
};

/// A rectangle of one straight-alpha color.
#[derive(Clone, Debug)]
pub struct SolidLayer {
    frame: Arc<Frame>,
    duration: f64,
}

impl SolidLayer {
    pub fn new(size: Size, rgba: [u8; 4]) -> Self {
        Self {
            frame: Arc::new(Frame::filled(size.width, size.height, rgba)),
            duration: UNBOUNDED_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn color(&self) -> Option<[u8; 4]> {
        self.frame.pixel(0, 0)
    }
}

impl Layer for SolidLayer {
    fn render(&mut self, _time: f64) -> StrataResult<Option<Arc<Frame>>> {
        if self.frame.size().is_empty() {
            return Ok(None);
        }
        Ok(Some(Arc::clone(&self.frame)))
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn cache_key(&self, _time: f64) -> LayerKey {
        LayerKey::Static
    }
}
