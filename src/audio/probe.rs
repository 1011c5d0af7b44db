use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{StrataError, StrataResult};

/// Placement of one audio file on a cumulative timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSpan {
    pub path: PathBuf,
    pub start_time: f64,
    pub end_time: f64,
}

impl AudioSpan {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Duration of a media file in seconds, read through `ffprobe`.
pub fn probe_duration(path: &Path) -> StrataResult<f64> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| StrataError::evaluation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(StrataError::evaluation(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }
    parse_probe_duration(&out.stdout)
}

/// Extract the duration from `ffprobe -print_format json` output.
///
/// The container duration wins; the first audio stream's duration is the fallback.
pub(crate) fn parse_probe_duration(json: &[u8]) -> StrataResult<f64> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        #[serde(default)]
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| StrataError::evaluation(format!("ffprobe json parse failed: {e}")))?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .or_else(|| {
            parsed
                .streams
                .into_iter()
                .find(|s| s.codec_type.as_deref() == Some("audio"))
                .and_then(|s| s.duration)
        })
        .ok_or_else(|| StrataError::evaluation("missing duration in ffprobe output"))?;

    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|e| StrataError::evaluation(format!("invalid ffprobe duration '{raw}': {e}")))?;
    if !(secs.is_finite() && secs >= 0.0) {
        return Err(StrataError::evaluation(format!(
            "invalid ffprobe duration '{raw}'"
        )));
    }
    Ok(secs)
}

/// Lay `(path, duration)` pairs back to back, starting at zero.
pub fn spans_from_durations(
    durations: impl IntoIterator<Item = (PathBuf, f64)>,
) -> StrataResult<Vec<AudioSpan>> {
    let mut t = 0.0;
    let mut out = Vec::new();
    for (path, duration) in durations {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(StrataError::validation(format!(
                "audio duration for '{}' must be finite and >= 0",
                path.display()
            )));
        }
        out.push(AudioSpan {
            path,
            start_time: t,
            end_time: t + duration,
        });
        t += duration;
    }
    Ok(out)
}

/// `.wav` files directly inside `dir`, sorted by file name.
pub(crate) fn list_wav_files(dir: &Path) -> StrataResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read audio directory '{}'", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list '{}'", dir.display()))?
            .path();
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Cumulative spans for every `.wav` file in `dir`, in file-name order.
#[tracing::instrument]
pub fn audio_spans(dir: &Path) -> StrataResult<Vec<AudioSpan>> {
    let files = list_wav_files(dir)?;
    let mut durations = Vec::with_capacity(files.len());
    for path in files {
        let d = probe_duration(&path)?;
        tracing::debug!(path = %path.display(), duration = d, "probed audio");
        durations.push((path, d));
    }
    spans_from_durations(durations)
}

#[cfg(test)]
#[path = "../../tests/unit/audio/probe.rs"]
mod tests;
