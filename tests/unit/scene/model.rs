use super::*;

const SCENE: &str = r#"{
    "size": { "width": 8, "height": 8 },
    "duration": 2.0,
    "cache_capacity": 4,
    "layers": [
        {
            "name": "bg",
            "source": { "kind": "solid", "width": 8, "height": 8, "rgba": [0, 0, 255, 255] }
        },
        {
            "name": "dot",
            "source": { "kind": "solid", "width": 2, "height": 2, "rgba": [255, 0, 0, 255] },
            "transform": { "position": { "constant": { "x": 1.0, "y": 1.0 } } },
            "start_time": 1.0,
            "blend_mode": "screen"
        }
    ]
}"#;

#[test]
fn parses_and_builds_a_scene() {
    let scene = SceneFile::from_reader(SCENE.as_bytes()).unwrap();
    assert_eq!(scene.layers.len(), 2);
    assert_eq!(scene.layers[1].blend_mode, BlendMode::Screen);
    assert!(scene.layers[0].visible);

    let mut comp = scene.build(Path::new(".")).unwrap();
    assert_eq!(comp.names(), vec!["bg", "dot"]);
    assert_eq!(comp.size(), Size::new(8, 8));

    let early = comp.render(0.5).unwrap();
    assert_eq!(early.pixel(0, 0), Some([0, 0, 255, 255]));
    let late = comp.render(1.5).unwrap();
    // screen of red over blue
    assert_eq!(late.pixel(0, 0), Some([255, 0, 255, 255]));
    assert_eq!(late.pixel(5, 5), Some([0, 0, 255, 255]));
}

#[test]
fn nested_scenes_and_image_sources_resolve() {
    let dir = tempfile::tempdir().unwrap();
    ::image::RgbaImage::from_pixel(2, 2, ::image::Rgba([0, 255, 0, 255]))
        .save(dir.path().join("green.png"))
        .unwrap();

    let json = r#"{
        "size": { "width": 4, "height": 4 },
        "duration": 1.0,
        "layers": [{
            "name": "inner",
            "source": { "kind": "composition", "scene": {
                "size": { "width": 4, "height": 4 },
                "duration": 1.0,
                "layers": [{ "source": { "kind": "image", "path": "green.png" } }]
            }}
        }]
    }"#;
    let mut comp = SceneFile::from_reader(json.as_bytes())
        .unwrap()
        .build(dir.path())
        .unwrap();
    assert_eq!(comp.component("inner").unwrap().end_time, 1.0);
    let frame = comp.render(0.0).unwrap();
    assert_eq!(frame.pixel(1, 1), Some([0, 255, 0, 255]));
    assert!(frame.pixel(0, 0).unwrap()[3] == 0);
}

#[test]
fn invalid_scenes_are_rejected() {
    let unknown = r#"{"size": {"width": 1, "height": 1}, "duration": 1.0, "extra": 1}"#;
    assert!(matches!(
        SceneFile::from_reader(unknown.as_bytes()),
        Err(StrataError::Serde(_))
    ));

    let zero = r#"{"size": {"width": 0, "height": 1}, "duration": 1.0}"#;
    let scene = SceneFile::from_reader(zero.as_bytes()).unwrap();
    assert!(scene.build(Path::new(".")).is_err());

    let missing = r#"{
        "size": {"width": 2, "height": 2}, "duration": 1.0,
        "layers": [{ "source": { "kind": "image", "path": "does-not-exist.png" } }]
    }"#;
    let scene = SceneFile::from_reader(missing.as_bytes()).unwrap();
    assert!(scene.build(Path::new("/nonexistent")).is_err());

    let dup = r#"{
        "size": {"width": 2, "height": 2}, "duration": 1.0,
        "layers": [
            { "name": "a", "source": { "kind": "solid", "width": 1, "height": 1, "rgba": [0,0,0,255] } },
            { "name": "a", "source": { "kind": "solid", "width": 1, "height": 1, "rgba": [0,0,0,255] } }
        ]
    }"#;
    let scene = SceneFile::from_reader(dup.as_bytes()).unwrap();
    assert!(matches!(
        scene.build(Path::new(".")),
        Err(StrataError::DuplicateName(_))
    ));
}

#[test]
fn json_round_trips_through_pretty_output() {
    let scene = SceneFile::from_reader(SCENE.as_bytes()).unwrap();
    let again = SceneFile::from_reader(scene.to_json_pretty().unwrap().as_bytes()).unwrap();
    assert_eq!(again, scene);
}
