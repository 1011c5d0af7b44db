//! Audio timing helpers for laying scenes out against narration tracks.
//!
//! Only durations are read; audio is never decoded or muxed.

pub mod probe;

pub use probe::{AudioSpan, audio_spans, probe_duration, spans_from_durations};
