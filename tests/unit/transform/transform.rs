use super::*;

#[test]
fn default_is_identity_placement() {
    let p = Transform::default().resolve(0.0);
    assert_eq!(p.position, Vec2::ZERO);
    assert_eq!(p.anchor_point, Vec2::ZERO);
    assert!(p.is_unit_scale());
    assert_eq!(p.opacity, 1.0);
}

#[test]
fn opacity_is_clamped() {
    let t = Transform::default().with_opacity(Motion::linear([(0.0, -1.0), (1.0, 2.0)]));
    assert_eq!(t.resolve(0.0).opacity, 0.0);
    assert_eq!(t.resolve(1.0).opacity, 1.0);
}

#[test]
fn top_left_matches_anchor_formula() {
    // 10x10 layer, anchor (5,5) from center, placed at (50,50).
    let p = Transform::at(Vec2::new(50.0, 50.0))
        .with_anchor_point(Vec2::new(5.0, 5.0))
        .resolve(0.0);
    assert_eq!(p.top_left(10, 10), (50, 50));

    let centered = Transform::at(Vec2::new(50.0, 50.0)).resolve(0.0);
    assert_eq!(centered.top_left(10, 10), (45, 45));
}

#[test]
fn top_left_accounts_for_scale() {
    let p = Transform::at(Vec2::new(50.0, 50.0))
        .with_scale(Vec2::new(2.0, 0.5))
        .resolve(0.0);
    assert_eq!(p.top_left(10, 10), (40, 48));
}

#[test]
fn scaled_size_rounds_and_detects_degenerate() {
    let p = Transform::default()
        .with_scale(Vec2::new(0.04, 1.0))
        .resolve(0.0);
    assert_eq!(p.scaled_size(10, 10), None);

    let p = Transform::default()
        .with_scale(Vec2::new(0.25, 1.5))
        .resolve(0.0);
    assert_eq!(p.scaled_size(10, 10), Some((3, 15)));

    let flipped = Transform::default()
        .with_scale(Vec2::new(-1.0, 1.0))
        .resolve(0.0);
    assert_eq!(flipped.scaled_size(10, 10), None);
}

#[test]
fn resolve_is_pure() {
    let t = Transform::default().with_scale(Motion::linear([
        (0.0, Vec2::new(1.0, 1.0)),
        (1.0, Vec2::new(3.0, 3.0)),
    ]));
    assert_eq!(t.resolve(0.37).key_bits(), t.resolve(0.37).key_bits());
}
