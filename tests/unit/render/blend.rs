use super::*;

#[test]
fn opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(blend_pixel(dst, src, 0.0, BlendMode::Normal), dst);
}

#[test]
fn src_alpha_0_is_noop_for_every_mode() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    for mode in BlendMode::ALL {
        assert_eq!(blend_pixel(dst, src, 1.0, mode), dst, "{mode}");
    }
}

#[test]
fn normal_opaque_replaces_dst() {
    let dst = [0, 0, 255, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(blend_pixel(dst, src, 1.0, BlendMode::Normal), src);
}

#[test]
fn any_mode_over_transparent_keeps_source_color() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    for mode in BlendMode::ALL {
        assert_eq!(blend_pixel(dst, src, 1.0, mode), src, "{mode}");
    }
}

#[test]
fn half_opacity_over_opaque_mixes_evenly() {
    let dst = [0, 0, 0, 255];
    let src = [255, 255, 255, 255];
    let out = blend_pixel(dst, src, 0.5, BlendMode::Normal);
    assert_eq!(out[3], 255);
    assert!((127..=129).contains(&out[0]));
}

#[test]
fn multiply_and_screen_on_opaque_backdrop() {
    let dst = [128, 255, 0, 255];
    let src = [255, 128, 128, 255];
    let m = blend_pixel(dst, src, 1.0, BlendMode::Multiply);
    assert_eq!(m, [128, 128, 0, 255]);
    let s = blend_pixel(dst, src, 1.0, BlendMode::Screen);
    assert_eq!(s, [255, 255, 128, 255]);
}

#[test]
fn add_saturates() {
    let out = blend_pixel([200, 10, 0, 255], [100, 10, 0, 255], 1.0, BlendMode::Add);
    assert_eq!(out, [255, 20, 0, 255]);
}

#[test]
fn difference_of_equal_colors_is_black() {
    let out = blend_pixel(
        [90, 90, 90, 255],
        [90, 90, 90, 255],
        1.0,
        BlendMode::Difference,
    );
    assert_eq!(out, [0, 0, 0, 255]);
}

#[test]
fn parse_names_round_trip_through_display() {
    for mode in BlendMode::ALL {
        assert_eq!(mode.to_string().parse::<BlendMode>().unwrap(), mode);
    }
    assert_eq!(" Screen ".parse::<BlendMode>().unwrap(), BlendMode::Screen);
    assert!("dodge".parse::<BlendMode>().is_err());
}
