//! Strata is a time-indexed layer compositing engine for programmatic video.
//!
//! A [`Composition`] is an ordered stack of [`Component`]s. Each component wraps a [`Layer`] (any
//! type that can produce pixels for a point in time) and places it on the canvas with a
//! time-varying [`Transform`], a visibility window and a [`BlendMode`]. Compositions are layers
//! themselves, so scenes nest, and [`concatenate`] plays several of them back to back.
//!
//! # Rendering overview
//!
//! 1. **Key**: `Composition + time -> CacheKey`, built from every component's layer key,
//!    resolved transform and blend mode
//! 2. **Lookup**: equal keys return the cached frame without touching any layer
//! 3. **Composite**: on a miss, components paint bottom to top over a transparent canvas, with
//!    scaled layers resampled through the same LRU cache
//! 4. **Export** (optional): sampled timestamps stream into a [`FrameSink`] such as the
//!    `ffmpeg`-backed [`FfmpegSink`]
//!
//! Frames are straight-alpha RGBA8 throughout. `unsafe` is forbidden in this crate.
#![forbid(unsafe_code)]

mod animation;
mod audio;
mod cache;
mod composition;
mod export;
mod foundation;
mod layer;
mod render;
mod scene;
mod transform;

pub use animation::ease::Ease;
pub use animation::motion::{InterpMode, Keyframe, Keyframes, Lerp, Motion};
pub use audio::{AudioSpan, audio_spans, probe_duration, spans_from_durations};
pub use cache::key::{CacheKey, ComponentKey, LayerKey};
pub use cache::lru::{CacheStats, DEFAULT_CACHE_CAPACITY, LruCache};
pub use composition::component::{Component, ComponentOpts};
pub use composition::concat::{ConcatOpts, concatenate};
pub use composition::model::{Composition, CompositionOpts};
pub use export::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use export::pipeline::{
    ExportOpts, ExportStats, ParallelOpts, export, export_parallel, frame_times,
    render_frames_parallel,
};
pub use export::sink::{CapturedFrame, FrameSink, InMemorySink, SinkConfig};
pub use foundation::core::{Frame, Size, Vec2};
pub use foundation::error::{StrataError, StrataResult};
pub use layer::{FnLayer, ImageLayer, Layer, SolidLayer, UNBOUNDED_DURATION};
pub use render::blend::{BlendMode, blend_pixel};
pub use render::composite::composite_over;
pub use render::resize::resize_rgba8;
pub use scene::{LayerSpec, SceneFile, SourceSpec};
pub use transform::{Transform, TransformValue};
