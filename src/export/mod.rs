//! Export driver: timestamp sampling, frame sinks and the `ffmpeg` encoder.

/// `ffmpeg`-based MP4 output.
pub mod ffmpeg;
/// Sequential and chunked-parallel rendering over a timestamp range.
pub mod pipeline;
/// Sink trait and in-memory sink.
pub mod sink;
