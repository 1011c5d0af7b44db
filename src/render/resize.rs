use anyhow::Context as _;
use image::imageops::FilterType;

use crate::foundation::{
    core::Frame,
    error::StrataResult,
    math::mul_div255,
};

/// Resample `frame` to `width x height` with bilinear filtering.
///
/// Filtering runs on premultiplied data and is converted back afterwards, so color from fully
/// transparent texels never bleeds into visible edges.
pub fn resize_rgba8(frame: &Frame, width: u32, height: u32) -> StrataResult<Frame> {
    if frame.width == width && frame.height == height {
        return Ok(frame.clone());
    }

    let mut data = frame.data.clone();
    premultiply_rgba8_in_place(&mut data);
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .context("wrap rgba8 frame for resizing")?;
    let resized = image::imageops::resize(&img, width, height, FilterType::Triangle);

    let mut data = resized.into_raw();
    unpremultiply_rgba8_in_place(&mut data);
    Frame::from_rgba8(width, height, data)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255(u16::from(px[0]), a) as u8;
        px[1] = mul_div255(u16::from(px[1]), a) as u8;
        px[2] = mul_div255(u16::from(px[2]), a) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/resize.rs"]
mod tests;
