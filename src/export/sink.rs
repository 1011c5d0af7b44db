use std::sync::Arc;

use crate::foundation::core::Frame;
use crate::foundation::error::StrataResult;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Consumer of an ordered frame sequence, such as a video encoder.
///
/// Ordering contract: `push_frame` is called once per timestamp in strictly increasing `index`
/// (and therefore time) order.
pub trait FrameSink: Send {
    fn begin(&mut self, cfg: SinkConfig) -> StrataResult<()>;
    fn push_frame(&mut self, index: u64, time: f64, frame: &Frame) -> StrataResult<()>;
    fn end(&mut self) -> StrataResult<()>;
}

/// One frame captured by [`InMemorySink`].
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub index: u64,
    pub time: f64,
    pub frame: Arc<Frame>,
}

/// Sink that keeps every frame in memory; for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<CapturedFrame>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StrataResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, index: u64, time: f64, frame: &Frame) -> StrataResult<()> {
        self.frames.push(CapturedFrame {
            index,
            time,
            frame: Arc::new(frame.clone()),
        });
        Ok(())
    }

    fn end(&mut self) -> StrataResult<()> {
        self.ended = true;
        Ok(())
    }
}
