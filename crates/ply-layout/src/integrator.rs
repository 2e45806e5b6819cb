use crate::forces::ForceSet;
use crate::primitives::Primitives;
use ply_graph::{Entity, Relation};

/// The particle simulation the layout drives.
///
/// The layout never integrates positions itself: it installs primitives and a [`ForceSet`], sets
/// cooling parameters, and reads positions back. Any engine with d3-force style cooling can sit
/// behind this trait; [`crate::Simulation`] is the in-process one.
pub trait Integrator {
    fn entities(&self) -> &[Entity];

    fn entities_mut(&mut self) -> &mut [Entity];

    fn relations(&self) -> &[Relation];

    /// Replaces the simulated state. Installed forces are kept; callers rebuild them when group
    /// membership changes.
    fn load(&mut self, entities: Vec<Entity>, relations: Vec<Relation>);

    fn alpha(&self) -> f64;

    /// Re-heats the simulation to `alpha` and resumes ticking.
    fn restart(&mut self, alpha: f64);

    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn set_decay(&mut self, alpha_decay: f64, velocity_decay: f64);

    /// Seed for the per-tick noise handed to contributors.
    fn set_seed(&mut self, seed: u64);

    /// Installs primitives and custom contributors as one batch, replacing anything installed.
    fn install(&mut self, primitives: Primitives, forces: ForceSet);

    /// Removes every installed force.
    fn clear(&mut self);

    /// Advances one tick. Returns `false` once the simulation has stopped.
    fn tick(&mut self) -> bool;
}
