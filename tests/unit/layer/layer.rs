use super::*;
use crate::foundation::core::Size;

struct Blank;

impl Layer for Blank {
    fn render(&mut self, _time: f64) -> StrataResult<Option<Arc<Frame>>> {
        Ok(None)
    }
}

#[test]
fn defaults_are_worst_case() {
    let l = Blank;
    assert_eq!(l.duration(), UNBOUNDED_DURATION);
    assert_ne!(l.cache_key(1.0), l.cache_key(2.0));
    assert_eq!(l.cache_key(1.0), l.cache_key(1.0));
}

#[test]
fn boxed_layers_forward_every_method() {
    let solid = SolidLayer::new(Size::new(2, 2), [1, 2, 3, 4]).with_duration(3.0);
    let mut boxed: Box<dyn Layer> = Box::new(solid);
    assert_eq!(boxed.duration(), 3.0);
    assert_eq!(boxed.cache_key(0.0), LayerKey::Static);
    assert!(boxed.render(0.0).unwrap().is_some());
}

#[test]
fn solid_returns_the_same_allocation() {
    let mut s = SolidLayer::new(Size::new(3, 1), [9, 9, 9, 255]);
    let a = s.render(0.0).unwrap().unwrap();
    let b = s.render(5.0).unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(s.color(), Some([9, 9, 9, 255]));
}

#[test]
fn empty_solid_renders_nothing() {
    let mut s = SolidLayer::new(Size::new(0, 4), [9, 9, 9, 255]);
    assert!(s.render(0.0).unwrap().is_none());
}

#[test]
fn image_decodes_png_bytes() {
    let px = vec![255u8, 0, 0, 255, 0, 255, 0, 128];
    let img = ::image::RgbaImage::from_raw(2, 1, px.clone()).unwrap();
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, ::image::ImageFormat::Png).unwrap();

    let mut layer = ImageLayer::decode(bytes.get_ref()).unwrap();
    let frame = layer.render(0.0).unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (2, 1));
    assert_eq!(frame.data, px);
    assert_eq!(layer.cache_key(0.0), layer.cache_key(99.0));
}

#[test]
fn image_decode_failure_is_reported() {
    assert!(ImageLayer::decode(b"not an image").is_err());
    assert!(ImageLayer::open(std::path::Path::new("does/not/exist.png")).is_err());
}

#[test]
fn fn_layer_uses_custom_key_and_duration() {
    let mut l = FnLayer::new(|t: f64| {
        Ok(Some(Arc::new(Frame::filled(1, 1, [t as u8, 0, 0, 255]))))
    })
    .with_duration(4.0)
    .with_key(|t| LayerKey::of(&(t.floor() as i64)));
    assert_eq!(l.duration(), 4.0);
    assert_eq!(l.cache_key(1.2), l.cache_key(1.9));
    assert_ne!(l.cache_key(1.2), l.cache_key(2.1));
    assert_eq!(l.render(3.0).unwrap().unwrap().pixel(0, 0), Some([3, 0, 0, 255]));
}

#[test]
fn fn_layer_errors_propagate() {
    let mut l = FnLayer::new(|_t: f64| {
        Err(crate::StrataError::Other(anyhow::anyhow!("decoder exploded")))
    });
    let err = l.render(0.0).unwrap_err();
    assert!(err.to_string().contains("decoder exploded"));
}
