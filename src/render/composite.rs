use crate::{
    foundation::core::Frame,
    render::blend::{BlendMode, blend_pixel},
};

/// Paint `src` onto `dst` with its top-left corner at `(x, y)`.
///
/// Regions of `src` falling outside `dst` are clipped; nothing wraps around.
pub fn composite_over(
    dst: &mut Frame,
    src: &Frame,
    x: i64,
    y: i64,
    opacity: f32,
    mode: BlendMode,
) {
    if opacity <= 0.0 {
        return;
    }

    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(dst_w);
    let y1 = (y + i64::from(src.height)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let span = ((x1 - x0) as usize) * 4;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_start = (sy * (src.width as usize) + sx) * 4;
        let d_start = ((dy as usize) * (dst.width as usize) + (x0 as usize)) * 4;

        let src_row = &src.data[s_start..s_start + span];
        let dst_row = &mut dst.data[d_start..d_start + span];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = blend_pixel(
                [d[0], d[1], d[2], d[3]],
                [s[0], s[1], s[2], s[3]],
                opacity,
                mode,
            );
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
