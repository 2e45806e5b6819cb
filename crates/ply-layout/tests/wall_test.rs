use ply_graph::{Entity, Side};
use ply_layout::forces::{WallParams, explicit_columns, slot_of, wall_affinity};
use ply_layout::{
    Contributor, ForceSet, Integrator, LayoutMode, LayoutOptions, LayoutStrategy, Primitives,
    Simulation, TickContext, compute_layout,
};

struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn inactive_population(n: usize, width: f64, height: f64) -> Vec<Entity> {
    let mut rng = Lcg(42);
    (0..n)
        .map(|i| {
            let side = if i % 2 == 0 { Side::White } else { Side::Black };
            Entity::new(format!("sq{i}"))
                .inactive(side)
                .at(rng.next_f64() * width, height * 0.25 + rng.next_f64() * height * 0.5)
        })
        .collect()
}

fn assert_on_walls(entities: &[Entity], height: f64) {
    for e in entities {
        match e.side_or_default() {
            Side::White => assert!(
                (height - 40.0..=height).contains(&e.y),
                "{} (white) ended at y={}",
                e.id,
                e.y
            ),
            Side::Black => assert!(
                (0.0..=40.0).contains(&e.y),
                "{} (black) ended at y={}",
                e.id,
                e.y
            ),
        }
    }
}

#[test]
fn wall_affinity_pins_each_side_to_its_edge() {
    let (width, height) = (960.0, 640.0);
    let mut sim = Simulation::new(inactive_population(200, width, height), Vec::new()).with_seed(9);
    let params = WallParams {
        width,
        height,
        ..WallParams::default()
    };
    sim.install(
        Primitives::none(),
        ForceSet::default().with(Contributor::WallAffinity(params)),
    );
    sim.restart(1.0);
    sim.run(2000);

    assert!(!sim.is_running());
    assert_on_walls(sim.entities(), height);
}

#[test]
fn force_mode_pins_an_all_inactive_state() {
    let options = LayoutOptions::default();
    let mut sim = Simulation::default();
    compute_layout(
        inactive_population(200, options.width, options.height),
        Vec::new(),
        LayoutMode::Force,
        &options,
        &mut sim,
    )
    .unwrap();
    sim.run(2000);
    assert_on_walls(sim.entities(), options.height);
}

#[test]
fn explicit_slots_win_over_hashed_ones() {
    let params = WallParams::default();
    let mut e = Entity::new("e2").inactive(Side::White);
    let hashed = params.target(&e, 8);
    e.h_position = Some(0);
    assert_eq!(slot_of(&e), 0);
    let pinned = params.target(&e, 8);
    assert_eq!(pinned.x, params.margin + 0.5 * (params.width - 2.0 * params.margin) / 8.0);
    assert_eq!(pinned.y, hashed.y);
    assert_eq!(pinned.y, params.height - params.wall_offset);

    // Without a column count explicit positions fall back to spacing slots.
    assert_eq!(
        params.target(&e, 0).x,
        params.margin + 0.5 * (params.width - 2.0 * params.margin) / f64::from(params.slot_count())
    );
}

#[test]
fn explicit_files_span_the_whole_wall() {
    let params = WallParams::default();
    let files = (0..8u32)
        .map(|h| {
            let mut e = Entity::new(format!("f{h}")).inactive(Side::White).at(480.0, 600.0);
            e.h_position = Some(h);
            e
        })
        .collect::<Vec<_>>();
    assert_eq!(explicit_columns(&files), 8);
    assert_eq!(explicit_columns(&[Entity::new("x").inactive(Side::Black)]), 0);

    let xs = files.iter().map(|e| params.target(e, 8).x).collect::<Vec<_>>();
    let step = (params.width - 2.0 * params.margin) / 8.0;
    assert!(xs.windows(2).all(|w| (w[1] - w[0] - step).abs() < 1e-9));
    assert!(xs[0] < 100.0);
    assert!(xs[7] > params.width - 100.0);

    let delta = wall_affinity(TickContext::new(1.0), &files, &params);
    assert!(delta.velocity(0).x < 0.0);
    assert!(delta.velocity(7).x > 0.0);
}

#[test]
fn strategy_wires_canvas_size_into_the_walls() {
    let options = LayoutOptions {
        width: 300.0,
        height: 200.0,
        ..LayoutOptions::default()
    };
    let strategy = LayoutStrategy::new(options, None);
    let entities = vec![Entity::new("a").inactive(Side::Black)];
    let (_, forces) = strategy.plan(LayoutMode::Force, &entities, &[], &Default::default());
    match forces.get(ply_layout::ForceKind::WallAffinity) {
        Some(Contributor::WallAffinity(p)) => {
            assert_eq!(p.width, 300.0);
            assert_eq!(p.height, 200.0);
        }
        other => panic!("unexpected wall contributor {other:?}"),
    }
}
