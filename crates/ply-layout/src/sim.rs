//! In-process reference integrator with d3-force semantics: alpha cools geometrically toward
//! `alpha_target`, velocities decay by `velocity_decay` each tick, positions advance by velocity.

use crate::delta::{ForceDelta, reduce};
use crate::forces::{ForceKind, ForceSet, TickContext};
use crate::integrator::Integrator;
use crate::primitives::Primitives;
use ply_graph::{Entity, Relation};

/// Below this alpha the simulation stops.
pub const ALPHA_MIN: f64 = 0.001;
/// Cools from 1 to [`ALPHA_MIN`] in 300 ticks.
pub const DEFAULT_ALPHA_DECAY: f64 = 0.022_762_779_044_189_33;
pub const VELOCITY_DECAY: f64 = 0.4;

/// Alpha decay that cools from 1 to [`ALPHA_MIN`] in `iterations` ticks.
pub fn alpha_decay_for(iterations: u32) -> f64 {
    if iterations == 0 {
        return 1.0;
    }
    1.0 - ALPHA_MIN.powf(1.0 / f64::from(iterations))
}

#[derive(Debug, Clone)]
pub struct Simulation {
    entities: Vec<Entity>,
    relations: Vec<Relation>,
    primitives: Primitives,
    forces: ForceSet,
    alpha: f64,
    alpha_target: f64,
    alpha_decay: f64,
    velocity_decay: f64,
    seed: u64,
    tick: u64,
    running: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl Simulation {
    pub fn new(entities: Vec<Entity>, relations: Vec<Relation>) -> Self {
        Self {
            entities,
            relations,
            primitives: Primitives::none(),
            forces: ForceSet::default(),
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: DEFAULT_ALPHA_DECAY,
            velocity_decay: VELOCITY_DECAY,
            seed: 1,
            tick: 0,
            running: true,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
    }

    pub fn velocity_decay(&self) -> f64 {
        self.velocity_decay
    }

    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    pub fn primitives(&self) -> &Primitives {
        &self.primitives
    }

    pub fn installed_kinds(&self) -> Vec<ForceKind> {
        self.forces.kinds().collect()
    }

    /// Ticks until cooled or `max_ticks` is reached; returns the ticks taken.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let mut taken = 0;
        while taken < max_ticks && self.tick() {
            taken += 1;
        }
        taken
    }

    fn deltas(&self, ctx: TickContext) -> Vec<ForceDelta> {
        let mut deltas = self.primitives.contribute(ctx, &self.entities, &self.relations);
        deltas.extend(self.forces.contribute(ctx, &self.entities));
        deltas
    }
}

impl Integrator for Simulation {
    fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    fn relations(&self) -> &[Relation] {
        &self.relations
    }

    fn load(&mut self, entities: Vec<Entity>, relations: Vec<Relation>) {
        self.entities = entities;
        self.relations = relations;
        self.tick = 0;
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn restart(&mut self, alpha: f64) {
        self.alpha = if alpha.is_finite() { alpha.max(0.0) } else { 1.0 };
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_decay(&mut self, alpha_decay: f64, velocity_decay: f64) {
        if alpha_decay.is_finite() {
            self.alpha_decay = alpha_decay.clamp(0.0, 1.0);
        }
        if velocity_decay.is_finite() {
            self.velocity_decay = velocity_decay.clamp(0.0, 1.0);
        }
    }

    fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    fn install(&mut self, primitives: Primitives, forces: ForceSet) {
        self.primitives = primitives;
        self.forces = forces;
    }

    fn clear(&mut self) {
        self.primitives = Primitives::none();
        self.forces = ForceSet::default();
    }

    fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let ctx = TickContext::new(self.alpha)
            .at_tick(self.tick)
            .with_seed(self.seed);

        let deltas = self.deltas(ctx);
        reduce(&deltas, &mut self.entities);

        let keep = 1.0 - self.velocity_decay;
        for e in &mut self.entities {
            e.vx *= keep;
            e.vy *= keep;
            e.x += e.vx;
            e.y += e.vy;
        }

        tracing::trace!(tick = self.tick, alpha = self.alpha, "tick");
        self.tick += 1;

        if self.alpha < ALPHA_MIN {
            self.running = false;
        }
        true
    }
}
