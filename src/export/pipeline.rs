use std::sync::Arc;

use rayon::prelude::*;

use crate::cache::lru::CacheStats;
use crate::composition::model::Composition;
use crate::export::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Frame;
use crate::foundation::error::{StrataError, StrataResult};

/// Timestamp range and sampling rate for an export run.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOpts {
    /// First sampled time, in seconds.
    pub start_time: f64,
    /// Exclusive end time; `None` means the composition duration.
    pub end_time: Option<f64>,
    pub fps: f64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: None,
            fps: 30.0,
        }
    }
}

impl ExportOpts {
    pub fn with_fps(fps: f64) -> Self {
        Self {
            fps,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, start_time: f64, end_time: Option<f64>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    /// Resolve the exclusive end time against a composition duration and validate the range.
    pub fn resolve_end(&self, duration: f64) -> StrataResult<f64> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(StrataError::validation("export fps must be finite and > 0"));
        }
        if !self.start_time.is_finite() {
            return Err(StrataError::validation("export start_time must be finite"));
        }
        let end = self.end_time.unwrap_or(duration);
        if !end.is_finite() {
            return Err(StrataError::validation("export end_time must be finite"));
        }
        if self.start_time >= end {
            return Err(StrataError::validation(format!(
                "export range is empty: start_time {} >= end_time {}",
                self.start_time, end
            )));
        }
        Ok(end)
    }
}

/// Sampled timestamps `start + i / fps` for every `i` with a result below the end time.
pub fn frame_times(opts: &ExportOpts, duration: f64) -> StrataResult<Vec<f64>> {
    let end = opts.resolve_end(duration)?;
    let mut out = Vec::new();
    for i in 0u64.. {
        let t = opts.start_time + (i as f64) / opts.fps;
        if t >= end {
            break;
        }
        out.push(t);
    }
    Ok(out)
}

/// Counters reported by [`export`] and [`export_parallel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub frames: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

/// Render every sampled timestamp in increasing order and push it to `sink`.
///
/// The composition cache is cleared when the run ends, whether or not it succeeded.
#[tracing::instrument(skip(comp, sink), fields(size = ?comp.size()))]
pub fn export(
    comp: &mut Composition,
    opts: &ExportOpts,
    sink: &mut dyn FrameSink,
) -> StrataResult<ExportStats> {
    let times = frame_times(opts, comp.duration())?;
    let before = comp.cache_stats();
    let result = export_times(comp, &times, opts.fps, sink);
    let after = comp.cache_stats();
    comp.clear_cache();

    result?;
    let stats = ExportStats {
        frames: times.len() as u64,
        cache_hits: after.hits.saturating_sub(before.hits),
        cache_misses: after.misses.saturating_sub(before.misses),
    };
    tracing::info!(frames = stats.frames, hits = stats.cache_hits, "export finished");
    Ok(stats)
}

fn export_times(
    comp: &mut Composition,
    times: &[f64],
    fps: f64,
    sink: &mut dyn FrameSink,
) -> StrataResult<()> {
    let size = comp.size();
    sink.begin(SinkConfig {
        width: size.width,
        height: size.height,
        fps,
    })?;
    tracing::info!(frames = times.len(), fps, "export started");
    for (index, &time) in times.iter().enumerate() {
        let frame = comp.render(time)?;
        sink.push_frame(index as u64, time, &frame)?;
    }
    sink.end()
}

/// Threading and chunking controls for [`render_frames_parallel`] and [`export_parallel`].
#[derive(Clone, Debug)]
pub struct ParallelOpts {
    /// Consecutive timestamps rendered by one composition instance.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for ParallelOpts {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Render all sampled timestamps in parallel and return frames in timestamp order.
///
/// `factory` builds an independent composition for each chunk, so compositions and their caches
/// are never shared between threads. The first composition built decides the size and duration.
pub fn render_frames_parallel<F>(
    factory: F,
    opts: &ExportOpts,
    par: &ParallelOpts,
) -> StrataResult<Vec<Arc<Frame>>>
where
    F: Fn() -> StrataResult<Composition> + Sync,
{
    let probe = factory()?;
    let times = frame_times(opts, probe.duration())?;
    let pool = build_thread_pool(par.threads)?;
    render_batch(&factory, &times, normalized_chunk_size(par.chunk_size), &pool)
        .map(|(frames, _)| frames)
}

/// Parallel counterpart of [`export`]: frames are rendered in batches on a thread pool and pushed
/// to `sink` in timestamp order.
#[tracing::instrument(skip(factory, sink))]
pub fn export_parallel<F>(
    factory: F,
    opts: &ExportOpts,
    par: &ParallelOpts,
    sink: &mut dyn FrameSink,
) -> StrataResult<ExportStats>
where
    F: Fn() -> StrataResult<Composition> + Sync,
{
    let probe = factory()?;
    let times = frame_times(opts, probe.duration())?;
    let size = probe.size();
    drop(probe);

    let pool = build_thread_pool(par.threads)?;
    let chunk_size = normalized_chunk_size(par.chunk_size);
    let batch_len = chunk_size.saturating_mul(pool.current_num_threads().max(1));

    sink.begin(SinkConfig {
        width: size.width,
        height: size.height,
        fps: opts.fps,
    })?;
    tracing::info!(frames = times.len(), threads = pool.current_num_threads(), "export started");

    let mut stats = ExportStats::default();
    for batch in times.chunks(batch_len) {
        let (frames, batch_stats) = render_batch(&factory, batch, chunk_size, &pool)?;
        stats.cache_hits += batch_stats.cache_hits;
        stats.cache_misses += batch_stats.cache_misses;
        for (frame, &time) in frames.iter().zip(batch) {
            sink.push_frame(stats.frames, time, frame)?;
            stats.frames += 1;
        }
    }
    sink.end()?;

    tracing::info!(frames = stats.frames, hits = stats.cache_hits, "export finished");
    Ok(stats)
}

/// Render `times` chunk by chunk on `pool`. The returned stats sum the cache counters of every
/// chunk composition; `frames` is left at zero.
fn render_batch<F>(
    factory: &F,
    times: &[f64],
    chunk_size: usize,
    pool: &rayon::ThreadPool,
) -> StrataResult<(Vec<Arc<Frame>>, ExportStats)>
where
    F: Fn() -> StrataResult<Composition> + Sync,
{
    let chunks = pool.install(|| {
        times
            .par_chunks(chunk_size)
            .map(|chunk| -> StrataResult<(Vec<Arc<Frame>>, CacheStats)> {
                let mut comp = factory()?;
                let frames = chunk
                    .iter()
                    .map(|&t| comp.render(t))
                    .collect::<StrataResult<Vec<_>>>()?;
                Ok((frames, comp.cache_stats()))
            })
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(times.len());
    let mut stats = ExportStats::default();
    for chunk in chunks {
        let (frames, chunk_stats) = chunk?;
        out.extend(frames);
        stats.cache_hits += chunk_stats.hits;
        stats.cache_misses += chunk_stats.misses;
    }
    Ok((out, stats))
}

fn build_thread_pool(threads: Option<usize>) -> StrataResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StrataError::validation(
            "parallel 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StrataError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
