use ply::layout::{ForceKind, Integrator, mode_kinds};
use ply::{
    DetailLevel, Entity, Error, LayoutMode, LayoutOptions, PartitionOptions, Relation, Session,
    Side, Snapshot,
};

fn opening() -> Snapshot {
    Snapshot {
        move_label: Some("1. e4".to_string()),
        entities: vec![
            Entity::new("e4").with_groups(0, 0).with_centrality(0.9).at(470.0, 300.0),
            Entity::new("d5").with_groups(0, 0).with_centrality(0.4).at(490.0, 310.0),
            Entity::new("f3").with_groups(0, 1).with_centrality(0.2).at(500.0, 340.0),
            Entity::new("c6").with_groups(1, 0).with_centrality(0.1).at(460.0, 330.0),
            Entity::new("a1").inactive(Side::White).at(480.0, 320.0),
            Entity::new("h8").inactive(Side::Black).at(485.0, 325.0),
        ],
        relations: vec![
            Relation::new("e4", "d5"),
            Relation::new("d5", "f3"),
            Relation::new("f3", "e4"),
        ],
    }
}

#[test]
fn loading_a_state_resets_cooling_and_velocities() {
    let mut session = Session::new(LayoutOptions::default()).unwrap();
    session.load_state(opening());
    session.run(100);
    assert!(session.alpha() < 1.0);
    assert!(session.entities().iter().any(|e| e.vx != 0.0 || e.vy != 0.0));

    let mut next = opening();
    next.move_label = Some("1... c5".to_string());
    for e in &mut next.entities {
        e.vx = 5.0;
        e.vy = -5.0;
    }
    session.load_state(next);

    assert_eq!(session.alpha(), 1.0);
    assert!(session.integrator().is_running());
    assert!(session.entities().iter().all(|e| e.vx == 0.0 && e.vy == 0.0));
    assert_eq!(session.report().ticks, 0);
}

#[test]
fn switching_modes_is_a_full_reset() {
    let mut session = Session::new(LayoutOptions {
        mode: LayoutMode::BubbleForce,
        ..LayoutOptions::default()
    })
    .unwrap();
    session.load_state(opening());
    assert_eq!(
        session.integrator().installed_kinds(),
        mode_kinds(LayoutMode::BubbleForce)
    );
    session.run(40);

    let activation = session.set_mode(LayoutMode::Radial).clone();
    assert_eq!(activation.kinds, mode_kinds(LayoutMode::Radial));
    assert!(!session.integrator().installed_kinds().contains(&ForceKind::Overlap));
    assert_eq!(session.alpha(), 1.0);
    assert_eq!(session.mode(), LayoutMode::Radial);
}

#[test]
fn partitioning_assigns_groups_before_layout() {
    let snapshot = Snapshot {
        move_label: None,
        entities: ["a", "b", "c", "x", "y", "z"]
            .into_iter()
            .map(Entity::new)
            .collect(),
        relations: vec![
            Relation::new("a", "b"),
            Relation::new("b", "c"),
            Relation::new("x", "y"),
            Relation::new("y", "z"),
        ],
    };
    let mut session = Session::new(LayoutOptions::default())
        .unwrap()
        .with_partition(PartitionOptions::default());
    session.load_state(snapshot);

    let component = |id: &str| {
        session
            .entities()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.outer_group)
    };
    assert_eq!(component("a"), component("c"));
    assert_eq!(component("x"), component("z"));
    assert_ne!(component("a"), component("x"));
}

#[test]
fn report_carries_one_position_per_entity() {
    let mut session = Session::new(LayoutOptions::default()).unwrap();
    session.load_state(opening());
    let taken = session.run(2000);
    assert!(taken < 2000);

    let report = session.report();
    assert_eq!(report.positions.len(), 6);
    assert_eq!(report.ticks, taken);
    assert!(report.positions.iter().all(|p| p.x.is_finite() && p.y.is_finite()));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["move"], "1. e4");
    assert_eq!(json["mode"], "force");
    assert_eq!(json["positions"][4]["status"], "inactive");
}

#[test]
fn configuration_errors_are_reported() {
    let err = Session::new(LayoutOptions::default())
        .unwrap()
        .with_exact_limit(8)
        .err()
        .unwrap();
    assert!(matches!(err, Error::Layout(_)));

    let mut session = Session::new(LayoutOptions::default()).unwrap();
    let err = session.load_nth(vec![opening()], 3).err().unwrap();
    assert!(matches!(err, Error::StateOutOfRange { index: 3, len: 1 }));

    let bad = LayoutOptions {
        width: f64::NAN,
        ..LayoutOptions::default()
    };
    assert!(Session::new(bad).is_err());
}

#[test]
fn zoom_changes_detail_without_reheating() {
    let mut session = Session::new(LayoutOptions::default()).unwrap();
    assert_eq!(session.set_zoom(0.25), DetailLevel::Full);

    session.load_state(opening());
    assert_eq!(session.report().detail, DetailLevel::Reduced);
    session.run(50);
    let alpha = session.alpha();

    assert_eq!(session.set_zoom(4.0), DetailLevel::Full);
    assert_eq!(session.report().detail, DetailLevel::Full);
    assert_eq!(session.alpha(), alpha);
    assert_eq!(session.report().ticks, 50);

    assert_eq!(session.set_zoom(0.25), DetailLevel::Reduced);
    assert_eq!(session.set_zoom(f64::NAN), DetailLevel::Reduced);
}
