use ply_graph::{Entity, Relation, Side};
use ply_layout::{
    AdaptiveController, DetailLevel, Error, ForceKind, Integrator, LayoutMode, LayoutOptions, LayoutStrategy,
    Simulation, Vec2, compute_layout, mode_kinds,
};

fn two_components() -> (Vec<Entity>, Vec<Relation>) {
    let mut entities = Vec::new();
    for (i, (outer, inner)) in [(0, 0), (0, 0), (0, 1), (1, 0), (1, 0), (1, 1)]
        .into_iter()
        .enumerate()
    {
        let angle = i as f64;
        entities.push(
            Entity::new(format!("n{i}"))
                .with_groups(outer, inner)
                .with_centrality(0.2 * (i % 3) as f64)
                .at(480.0 + 20.0 * angle.cos(), 320.0 + 20.0 * angle.sin()),
        );
    }
    entities.push(Entity::new("idle-w").inactive(Side::White).at(100.0, 300.0));
    entities.push(Entity::new("idle-b").inactive(Side::Black).at(700.0, 300.0));

    let relations = vec![
        Relation::new("n0", "n1"),
        Relation::new("n1", "n2"),
        Relation::new("n3", "n4"),
        Relation::new("n4", "n5"),
    ];
    (entities, relations)
}

fn centroid(entities: &[Entity], outer: i64) -> Vec2 {
    let members = entities
        .iter()
        .filter(|e| e.is_active() && e.outer_group == outer)
        .collect::<Vec<_>>();
    members
        .iter()
        .fold(Vec2::zeros(), |acc, e| acc + Vec2::new(e.x, e.y))
        / members.len() as f64
}

#[test]
fn each_mode_installs_its_contributor_table() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::new(entities, relations);
    let strategy = LayoutStrategy::new(LayoutOptions::default(), None);

    for mode in LayoutMode::ALL {
        let activation = strategy.activate(mode, &mut sim);
        assert_eq!(activation.kinds, mode_kinds(mode));
        assert_eq!(sim.installed_kinds(), mode_kinds(mode));
    }
}

#[test]
fn unknown_mode_names_fall_back_to_force() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::new(entities, relations);
    let strategy = LayoutStrategy::new(LayoutOptions::default(), None);

    let activation = strategy.activate(LayoutMode::parse_or_default("hexagonal"), &mut sim);
    assert_eq!(activation.mode, LayoutMode::Force);
    assert_eq!(
        sim.installed_kinds(),
        vec![ForceKind::WallAffinity, ForceKind::CrossPopulation, ForceKind::Jitter]
    );
}

#[test]
fn switching_modes_replaces_forces_and_reheats() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::new(entities, relations);
    let options = LayoutOptions {
        restart_alpha: 0.8,
        ..LayoutOptions::default()
    };
    let strategy = LayoutStrategy::new(options, None);

    strategy.activate(LayoutMode::BubbleForce, &mut sim);
    sim.run(50);
    assert!(sim.alpha() < 0.8);

    strategy.activate(LayoutMode::Radial, &mut sim);
    assert_eq!(sim.alpha(), 0.8);
    assert!(sim.is_running());
    assert!(!sim.installed_kinds().contains(&ForceKind::Cohesion));
    assert!(sim.installed_kinds().contains(&ForceKind::Radial));
}

#[test]
fn radial_mode_separates_components() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::default();
    compute_layout(
        entities,
        relations,
        LayoutMode::Radial,
        &LayoutOptions::default(),
        &mut sim,
    )
    .unwrap();
    sim.run(1000);

    let gap = (centroid(sim.entities(), 0) - centroid(sim.entities(), 1)).norm();
    assert!(gap > 150.0, "component centroids only {gap} apart");
    for e in sim.entities() {
        assert!(e.x.is_finite() && e.y.is_finite(), "{} diverged", e.id);
    }
}

#[test]
fn bubble_force_keeps_positions_finite() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::default();
    compute_layout(
        entities,
        relations,
        LayoutMode::BubbleForce,
        &LayoutOptions::default(),
        &mut sim,
    )
    .unwrap();
    let taken = sim.run(5000);
    assert!(taken < 5000);
    for e in sim.entities() {
        assert!(e.x.is_finite() && e.y.is_finite(), "{} diverged", e.id);
    }
}

#[test]
fn huge_graphs_drop_quadratic_contributors() {
    let entities = (0..3001)
        .map(|i| Entity::new(format!("n{i}")).with_groups(0, (i % 7) as i64))
        .collect::<Vec<_>>();
    let mut sim = Simulation::new(entities, Vec::new());
    let activation =
        LayoutStrategy::new(LayoutOptions::default(), None).activate(LayoutMode::BubbleForce, &mut sim);

    for kind in [
        ForceKind::Overlap,
        ForceKind::CommunityRepulsion,
        ForceKind::CrossPopulation,
        ForceKind::Jitter,
    ] {
        assert!(!activation.kinds.contains(&kind), "{kind} still installed");
    }
    assert!(activation.kinds.contains(&ForceKind::ComponentContainment));
    assert_eq!(sim.velocity_decay(), 0.6);

    let neutral = LayoutStrategy::new(LayoutOptions::default(), None)
        .with_controller(AdaptiveController::disabled())
        .activate(LayoutMode::BubbleForce, &mut sim);
    assert_eq!(neutral.kinds, mode_kinds(LayoutMode::BubbleForce));
}

#[test]
fn configuration_errors_surface_at_the_boundary() {
    let options = LayoutOptions {
        height: -1.0,
        ..LayoutOptions::default()
    };
    let err = compute_layout(Vec::new(), Vec::new(), LayoutMode::Force, &options, &mut Simulation::default())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOption { name: "height", .. }));

    let err = LayoutStrategy::new(LayoutOptions::default(), None)
        .with_exact_limit(9)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Graph(ply_graph::Error::ExactLimitTooLarge { limit: 9 })
    ));
    assert!(err.to_string().contains('9'));
}

#[test]
fn zoom_level_reaches_the_adaptive_detail() {
    let (entities, relations) = two_components();
    let mut sim = Simulation::new(entities, relations);

    let strategy = LayoutStrategy::new(LayoutOptions::default(), None);
    assert_eq!(strategy.zoom_level(), 1.0);
    assert_eq!(strategy.activate(LayoutMode::Force, &mut sim).tuning.detail, DetailLevel::Full);

    let mut strategy = strategy.with_zoom(0.25);
    let activation = strategy.activate(LayoutMode::Force, &mut sim);
    assert_eq!(activation.tuning.detail, DetailLevel::Reduced);

    strategy.set_zoom(-1.0);
    assert_eq!(strategy.zoom_level(), 0.25);
    strategy.set_zoom(3.0);
    assert_eq!(strategy.tune(&sim).detail, DetailLevel::Full);
}

#[test]
fn compute_layout_discards_incoming_velocities() {
    let (mut entities, relations) = two_components();
    for e in &mut entities {
        e.vx = 7.0;
        e.vy = -3.0;
    }
    let mut sim = Simulation::default();
    compute_layout(
        entities,
        relations,
        LayoutMode::BubbleForce,
        &LayoutOptions::default(),
        &mut sim,
    )
    .unwrap();
    assert!(sim.entities().iter().all(|e| e.vx == 0.0 && e.vy == 0.0));
}
