use crate::error::{Error, Result};
use ply_graph::{
    Entity, GroupId, OrderOptimizer, PartitionOptions, Relation, Snapshot, Status, assign_partition,
};
use ply_layout::{
    Activation, DetailLevel, Integrator, LayoutMode, LayoutOptions, LayoutStrategy, Simulation,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub status: Status,
    pub component: GroupId,
    pub community: GroupId,
}

impl From<&Entity> for Placement {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id.clone(),
            x: e.x,
            y: e.y,
            status: e.status,
            component: e.outer_group,
            community: e.inner_group,
        }
    }
}

/// Laid-out positions for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutReport {
    #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_label: Option<String>,
    pub mode: LayoutMode,
    pub ticks: usize,
    pub alpha: f64,
    pub detail: DetailLevel,
    pub positions: Vec<Placement>,
}

/// Owns the current state and the simulation laying it out.
///
/// Every [`Session::load_state`] starts from scratch: the running simulation is stopped, groups
/// and ordering are rebuilt, velocities are zeroed and cooling restarts. Switching modes is a full
/// reset of the installed forces.
pub struct Session<I: Integrator = Simulation> {
    integrator: I,
    strategy: LayoutStrategy,
    mode: LayoutMode,
    partition: Option<PartitionOptions>,
    move_label: Option<String>,
    activation: Option<Activation>,
    ticks: usize,
}

impl Session<Simulation> {
    pub fn new(options: LayoutOptions) -> Result<Self> {
        Self::with_integrator(options, Simulation::default())
    }
}

impl<I: Integrator> Session<I> {
    pub fn with_integrator(options: LayoutOptions, integrator: I) -> Result<Self> {
        options.validate()?;
        let mode = options.mode;
        Ok(Self {
            integrator,
            strategy: LayoutStrategy::new(options, Some(OrderOptimizer::default())),
            mode,
            partition: None,
            move_label: None,
            activation: None,
            ticks: 0,
        })
    }

    /// Recomputes component/community ids on every loaded state.
    pub fn with_partition(mut self, options: PartitionOptions) -> Self {
        self.partition = Some(options);
        self
    }

    /// Fails when `limit` exceeds the exhaustive-ordering ceiling.
    pub fn with_exact_limit(mut self, limit: usize) -> Result<Self> {
        self.strategy = self.strategy.with_exact_limit(limit)?;
        Ok(self)
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn activation(&self) -> Option<&Activation> {
        self.activation.as_ref()
    }

    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    pub fn entities(&self) -> &[Entity] {
        self.integrator.entities()
    }

    pub fn alpha(&self) -> f64 {
        self.integrator.alpha()
    }

    /// Detail level of the current activation; [`DetailLevel::Full`] before any state is loaded.
    pub fn detail(&self) -> DetailLevel {
        self.activation
            .as_ref()
            .map(|a| a.tuning.detail)
            .unwrap_or_default()
    }

    /// Updates the viewer zoom and re-derives the detail level. The simulation keeps running
    /// untouched.
    pub fn set_zoom(&mut self, zoom_level: f64) -> DetailLevel {
        self.strategy.set_zoom(zoom_level);
        if let Some(activation) = self.activation.as_mut() {
            activation.tuning.detail = self.strategy.tune(&self.integrator).detail;
        }
        self.detail()
    }

    pub fn load_state(&mut self, snapshot: Snapshot) -> &Activation {
        self.integrator.stop();

        let Snapshot {
            move_label,
            mut entities,
            relations,
        } = snapshot;
        if let Some(opts) = &self.partition {
            assign_partition(&mut entities, &relations, opts);
        }
        for e in &mut entities {
            e.vx = 0.0;
            e.vy = 0.0;
        }
        tracing::debug!(
            move_label = move_label.as_deref().unwrap_or(""),
            entities = entities.len(),
            relations = relations.len(),
            "loading state"
        );

        self.move_label = move_label;
        self.load(entities, relations)
    }

    /// Loads state `index` of `states`.
    pub fn load_nth(&mut self, states: Vec<Snapshot>, index: usize) -> Result<&Activation> {
        let len = states.len();
        let snapshot = states
            .into_iter()
            .nth(index)
            .ok_or(Error::StateOutOfRange { index, len })?;
        Ok(self.load_state(snapshot))
    }

    pub fn set_mode(&mut self, mode: LayoutMode) -> &Activation {
        self.mode = mode;
        self.ticks = 0;
        self.activation
            .insert(self.strategy.activate(mode, &mut self.integrator))
    }

    pub fn step(&mut self) -> bool {
        let advanced = self.integrator.tick();
        if advanced {
            self.ticks += 1;
        }
        advanced
    }

    /// Ticks until the simulation cools or `max_ticks` have run; returns the ticks taken.
    pub fn run(&mut self, max_ticks: usize) -> usize {
        let timing_enabled = std::env::var("PLY_LAYOUT_TIMING").ok().as_deref() == Some("1");
        let start = timing_enabled.then(std::time::Instant::now);

        let mut taken = 0;
        while taken < max_ticks && self.step() {
            taken += 1;
        }

        if let Some(s) = start {
            eprintln!(
                "[ply-layout-timing] run={:?} mode={} ticks={} alpha={:.5} entities={}",
                s.elapsed(),
                self.mode,
                taken,
                self.integrator.alpha(),
                self.integrator.entities().len(),
            );
        }
        taken
    }

    pub fn positions(&self) -> Vec<Placement> {
        self.integrator.entities().iter().map(Placement::from).collect()
    }

    pub fn report(&self) -> LayoutReport {
        LayoutReport {
            move_label: self.move_label.clone(),
            mode: self.mode,
            ticks: self.ticks,
            alpha: self.integrator.alpha(),
            detail: self.detail(),
            positions: self.positions(),
        }
    }

    fn load(&mut self, entities: Vec<Entity>, relations: Vec<Relation>) -> &Activation {
        self.integrator.load(entities, relations);
        self.set_mode(self.mode)
    }
}
