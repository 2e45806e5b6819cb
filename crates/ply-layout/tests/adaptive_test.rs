use ply_layout::forces::{JitterParams, OverlapParams};
use ply_layout::{
    AdaptiveController, Contributor, DetailLevel, ForceKind, ForceSet, GraphScale, LiveCounts,
    Tuning, alpha_decay_for,
};

#[test]
fn the_larger_bucket_wins() {
    let cases = [
        ((100, 100), GraphScale::Small),
        ((150, 600), GraphScale::Small),
        ((151, 0), GraphScale::Medium),
        ((0, 601), GraphScale::Medium),
        ((1500, 8000), GraphScale::Large),
        ((100, 9000), GraphScale::Huge),
        ((1501, 0), GraphScale::Huge),
    ];
    for ((nodes, edges), expected) in cases {
        assert_eq!(
            GraphScale::classify(nodes, edges),
            expected,
            "nodes={nodes} edges={edges}"
        );
    }
}

#[test]
fn tuning_follows_the_bucket() {
    let controller = AdaptiveController::default();

    let small = controller.tune(&LiveCounts::new(40, 80));
    assert_eq!(small.scale, GraphScale::Small);
    assert_eq!(small.alpha_decay, alpha_decay_for(400));
    assert_eq!(small.velocity_decay, 0.4);
    assert_eq!(small.strength_scale, 1.0);
    assert!(small.disabled.is_empty());
    assert_eq!(small.detail, DetailLevel::Full);

    let huge = controller.tune(&LiveCounts::new(2000, 100));
    assert_eq!(huge.alpha_decay, alpha_decay_for(120));
    assert_eq!(huge.strength_scale, 0.5);
    assert!(huge.disabled.is_empty());
    assert_eq!(huge.detail, DetailLevel::Minimal);

    let beyond = controller.tune(&LiveCounts::new(3001, 0).with_zoom(4.0));
    assert!(beyond.is_disabled(ForceKind::Overlap));
    assert!(beyond.is_disabled(ForceKind::Jitter));
    assert!(!beyond.is_disabled(ForceKind::WallAffinity));
    assert_eq!(beyond.detail, DetailLevel::Reduced);
}

#[test]
fn a_disabled_controller_is_neutral() {
    let tuning = AdaptiveController::disabled().tune(&LiveCounts::new(10_000, 50_000));
    assert_eq!(tuning, Tuning::neutral());
}

#[test]
fn tuning_apply_rescales_and_removes() {
    let mut forces = ForceSet::default()
        .with(Contributor::Overlap(OverlapParams::default()))
        .with(Contributor::Jitter(JitterParams { amplitude: 0.2 }));
    let tuning = Tuning {
        strength_scale: 0.5,
        disabled: vec![ForceKind::Overlap],
        ..Tuning::neutral()
    };
    tuning.apply(&mut forces);

    assert_eq!(forces.kinds().collect::<Vec<_>>(), vec![ForceKind::Jitter]);
    assert_eq!(
        forces.get(ForceKind::Jitter),
        Some(&Contributor::Jitter(JitterParams { amplitude: 0.1 }))
    );
}
