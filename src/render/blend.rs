use std::str::FromStr;

use crate::foundation::{
    error::{StrataError, StrataResult},
    math::mul_div255,
};

/// Per-channel color combination used when painting a layer over what is beneath it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Plain straight-alpha "over".
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    Difference,
}

impl BlendMode {
    pub const ALL: [BlendMode; 8] = [
        BlendMode::Normal,
        BlendMode::Add,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::Difference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::Difference => "difference",
        }
    }

    /// Blend normalized backdrop `cb` with normalized source `cs`.
    pub fn apply(self, cb: f32, cs: f32) -> f32 {
        match self {
            Self::Normal => cs,
            Self::Add => (cb + cs).min(1.0),
            Self::Multiply => cb * cs,
            Self::Screen => cb + cs - cb * cs,
            Self::Overlay => {
                if cb <= 0.5 {
                    2.0 * cb * cs
                } else {
                    1.0 - 2.0 * (1.0 - cb) * (1.0 - cs)
                }
            }
            Self::Darken => cb.min(cs),
            Self::Lighten => cb.max(cs),
            Self::Difference => (cb - cs).abs(),
        }
    }
}

impl FromStr for BlendMode {
    type Err = StrataError;

    fn from_str(s: &str) -> StrataResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == needle)
            .ok_or_else(|| StrataError::validation(format!("unknown blend mode '{s}'")))
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paint straight-alpha `src` over straight-alpha `dst`.
///
/// `opacity` multiplies the source alpha. Color channels are first combined with `mode`, weighted
/// by backdrop coverage, then mixed by source-over. A fully transparent backdrop therefore shows
/// the source color unchanged for every mode.
pub fn blend_pixel(dst: [u8; 4], src: [u8; 4], opacity: f32, mode: BlendMode) -> [u8; 4] {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa_u8 = mul_div255(u16::from(src[3]), op);
    if sa_u8 == 0 {
        return dst;
    }
    if sa_u8 == 255 && (mode == BlendMode::Normal || dst[3] == 0) {
        return [src[0], src[1], src[2], 255];
    }

    let sa = f32::from(sa_u8) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let oa = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let cs = f32::from(src[i]) / 255.0;
        let cb = f32::from(dst[i]) / 255.0;
        let mixed = (1.0 - da) * cs + da * mode.apply(cb, cs);
        let c = (sa * mixed + da * (1.0 - sa) * cb) / oa;
        out[i] = to_u8(c);
    }
    out[3] = to_u8(oa);
    out
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
