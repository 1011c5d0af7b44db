use super::*;

#[test]
fn flatten_alpha_0_returns_bg() {
    let src = vec![200u8, 100, 50, 0];
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_half_alpha_over_black() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_over_bg_to_opaque_rgba8(&mut dst, &src, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_over_bg_to_opaque_rgba8(&mut dst, &[0; 4], [0, 0, 0, 255]).is_err());
}

#[test]
fn sink_config_validation() {
    let ok = SinkConfig {
        width: 4,
        height: 2,
        fps: 30.0,
    };
    assert!(validate_sink_config(&ok, "yuv420p").is_ok());
    assert!(validate_sink_config(&SinkConfig { width: 3, ..ok }, "yuv420p").is_err());
    assert!(validate_sink_config(&SinkConfig { width: 3, ..ok }, "rgb24").is_ok());
    assert!(validate_sink_config(&SinkConfig { fps: 0.0, ..ok }, "yuv420p").is_err());
    assert!(validate_sink_config(&SinkConfig { height: 0, ..ok }, "rgb24").is_err());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    assert!(sink.push_frame(0, 0.0, &Frame::transparent(2, 2)).is_err());
    assert!(sink.end().is_err());
}
