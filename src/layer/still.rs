use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    cache::key::LayerKey,
    foundation::core::Frame,
    foundation::error::StrataResult,
    layer::{Layer, UNBOUNDED_DURATION},
};

/// A still image decoded once up front and held for its whole duration.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    frame: Arc<Frame>,
    duration: f64,
}

impl ImageLayer {
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frame: Arc::new(frame),
            duration: UNBOUNDED_DURATION,
        }
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) into straight RGBA8.
    pub fn decode(bytes: &[u8]) -> StrataResult<Self> {
        let img = image::load_from_memory(bytes).context("decode image from memory")?;
        Self::from_image(img)
    }

    pub fn open(path: &Path) -> StrataResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("decode image '{}'", path.display()))?;
        Self::from_image(img)
    }

    fn from_image(img: image::DynamicImage) -> StrataResult<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self::from_frame(Frame::from_rgba8(
            width,
            height,
            rgba.into_raw(),
        )?))
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }
}

impl Layer for ImageLayer {
    fn render(&mut self, _time: f64) -> StrataResult<Option<Arc<Frame>>> {
        Ok(Some(Arc::clone(&self.frame)))
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn cache_key(&self, _time: f64) -> LayerKey {
        LayerKey::Static
    }
}
