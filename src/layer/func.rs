use std::sync::Arc;

use crate::{
    cache::key::LayerKey,
    foundation::core::Frame,
    foundation::error::StrataResult,
    layer::{Layer, UNBOUNDED_DURATION},
};

type KeyFn = Box<dyn Fn(f64) -> LayerKey + Send>;

/// Adapts a closure into a [`Layer`].
///
/// Without [`FnLayer::with_key`] every distinct time gets its own cache key.
pub struct FnLayer<F> {
    render: F,
    duration: f64,
    key: Option<KeyFn>,
}

impl<F> FnLayer<F>
where
    F: FnMut(f64) -> StrataResult<Option<Arc<Frame>>> + Send,
{
    pub fn new(render: F) -> Self {
        Self {
            render,
            duration: UNBOUNDED_DURATION,
            key: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_key(mut self, key: impl Fn(f64) -> LayerKey + Send + 'static) -> Self {
        self.key = Some(Box::new(key));
        self
    }
}

impl<F> Layer for FnLayer<F>
where
    F: FnMut(f64) -> StrataResult<Option<Arc<Frame>>> + Send,
{
    fn render(&mut self, time: f64) -> StrataResult<Option<Arc<Frame>>> {
        (self.render)(time)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn cache_key(&self, time: f64) -> LayerKey {
        match &self.key {
            Some(key) => key(time),
            None => LayerKey::time(time),
        }
    }
}

impl<F> std::fmt::Debug for FnLayer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnLayer")
            .field("duration", &self.duration)
            .field("keyed", &self.key.is_some())
            .finish()
    }
}
