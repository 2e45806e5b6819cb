use crate::adaptive::{AdaptiveController, LiveCounts, Tuning};
use crate::error::Result;
use crate::forces::{
    CohesionParams, ContainmentParams, Contributor, ForceKind, ForceSet, JitterParams, OverlapParams,
    RadialFrame, RadialParams, RadialPlacement, RepulsionParams, SeparationParams, WallParams,
};
use crate::geometry::GroupLevel;
use crate::integrator::Integrator;
use crate::options::{LayoutMode, LayoutOptions};
use crate::primitives::Primitives;
use ply_graph::{Entity, GroupIndex, OrderOptimizer, Relation};
use serde::{Deserialize, Serialize};

/// Contributor parameters before mode-specific wiring. Canvas size and attractions are taken
/// from [`LayoutOptions`] at plan time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceParams {
    pub cohesion: CohesionParams,
    pub component_containment: ContainmentParams,
    pub community_containment: ContainmentParams,
    pub component_repulsion: RepulsionParams,
    pub community_repulsion: RepulsionParams,
    pub overlap: OverlapParams,
    pub radial: RadialParams,
    pub wall: WallParams,
    pub separation: SeparationParams,
    pub jitter: JitterParams,
}

/// Contributors installed for `mode`, in execution order.
pub fn mode_kinds(mode: LayoutMode) -> &'static [ForceKind] {
    use ForceKind::*;
    match mode {
        LayoutMode::Force => &[WallAffinity, CrossPopulation, Jitter],
        LayoutMode::Radial => &[Radial, ComponentRepulsion, WallAffinity, CrossPopulation, Jitter],
        LayoutMode::BubbleForce => &[
            Cohesion,
            ComponentContainment,
            CommunityContainment,
            ComponentRepulsion,
            CommunityRepulsion,
            Overlap,
            WallAffinity,
            CrossPopulation,
            Jitter,
        ],
        LayoutMode::BubbleRadial => &[
            Radial,
            ComponentContainment,
            CommunityContainment,
            ComponentRepulsion,
            Overlap,
            WallAffinity,
            CrossPopulation,
            Jitter,
        ],
    }
}

/// What one activation installed.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub mode: LayoutMode,
    pub kinds: Vec<ForceKind>,
    pub tuning: Tuning,
}

/// Builds and installs the force configuration for a layout mode.
///
/// The optimizer, contributor parameters and adaptive controller are all fixed at construction;
/// nothing is looked up per tick. The zoom level only feeds the detail level of the tuning.
#[derive(Debug, Clone)]
pub struct LayoutStrategy {
    options: LayoutOptions,
    optimizer: Option<OrderOptimizer>,
    params: ForceParams,
    controller: AdaptiveController,
    zoom_level: f64,
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::new(LayoutOptions::default(), None)
    }
}

impl LayoutStrategy {
    pub fn new(options: LayoutOptions, optimizer: Option<OrderOptimizer>) -> Self {
        Self {
            options: options.normalized(),
            optimizer,
            params: ForceParams::default(),
            controller: AdaptiveController::default(),
            zoom_level: 1.0,
        }
    }

    pub fn with_params(mut self, params: ForceParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the optimizer with one searching up to `limit` groups exhaustively.
    pub fn with_exact_limit(mut self, limit: usize) -> Result<Self> {
        self.optimizer = Some(OrderOptimizer::new(limit)?);
        Ok(self)
    }

    pub fn with_controller(mut self, controller: AdaptiveController) -> Self {
        self.controller = controller;
        self
    }

    pub fn with_zoom(mut self, zoom_level: f64) -> Self {
        self.set_zoom(zoom_level);
        self
    }

    /// Zoom levels that are not finite and positive are ignored.
    pub fn set_zoom(&mut self, zoom_level: f64) {
        if zoom_level.is_finite() && zoom_level > 0.0 {
            self.zoom_level = zoom_level;
        } else {
            tracing::warn!(zoom_level, "ignoring invalid zoom level");
        }
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    /// Adaptive tuning for the state currently loaded in `integrator`.
    pub fn tune<I: Integrator + ?Sized>(&self, integrator: &I) -> Tuning {
        let counts = LiveCounts::of(integrator.entities(), integrator.relations())
            .with_zoom(self.zoom_level);
        self.controller.tune(&counts)
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn optimizer(&self) -> Option<&OrderOptimizer> {
        self.optimizer.as_ref()
    }

    /// Builds primitives and contributors for `mode` against the given state. Only active
    /// entities are grouped.
    pub fn plan(
        &self,
        mode: LayoutMode,
        entities: &[Entity],
        relations: &[Relation],
        tuning: &Tuning,
    ) -> (Primitives, ForceSet) {
        let index = GroupIndex::build_filtered(entities, Entity::is_active);
        let contributors = mode_kinds(mode)
            .iter()
            .filter(|kind| !tuning.is_disabled(**kind))
            .map(|&kind| self.contributor(kind, &index, entities, relations))
            .collect::<Vec<_>>();

        let mut forces = ForceSet::new(index);
        for c in contributors {
            forces.insert(c);
        }
        tuning.apply(&mut forces);

        (Primitives::for_mode(mode, &self.options), forces)
    }

    /// Clears the integrator, installs `mode` as one batch, applies the adaptive decay and
    /// restarts cooling from `restart_alpha`.
    pub fn activate<I: Integrator + ?Sized>(&self, mode: LayoutMode, integrator: &mut I) -> Activation {
        integrator.clear();

        let tuning = self.tune(integrator);
        let (primitives, forces) = self.plan(mode, integrator.entities(), integrator.relations(), &tuning);
        let kinds = forces.kinds().collect::<Vec<_>>();

        tracing::debug!(
            mode = mode.as_str(),
            components = forces.index().outer_len(),
            contributors = kinds.len(),
            "activating layout mode"
        );

        integrator.install(primitives, forces);
        integrator.set_decay(tuning.alpha_decay, tuning.velocity_decay);
        integrator.set_seed(self.options.seed);
        integrator.restart(self.options.restart_alpha);

        Activation { mode, kinds, tuning }
    }

    fn contributor(
        &self,
        kind: ForceKind,
        index: &GroupIndex,
        entities: &[Entity],
        relations: &[Relation],
    ) -> Contributor {
        let p = &self.params;
        match kind {
            ForceKind::Cohesion => Contributor::Cohesion(CohesionParams {
                component_attraction: self.options.component_attraction,
                community_attraction: self.options.community_attraction,
                ..p.cohesion
            }),
            ForceKind::ComponentContainment => Contributor::Containment {
                level: GroupLevel::Outer,
                params: p.component_containment,
            },
            ForceKind::CommunityContainment => Contributor::Containment {
                level: GroupLevel::Inner,
                params: p.community_containment,
            },
            ForceKind::ComponentRepulsion => Contributor::Repulsion {
                level: GroupLevel::Outer,
                params: p.component_repulsion,
            },
            ForceKind::CommunityRepulsion => Contributor::Repulsion {
                level: GroupLevel::Inner,
                params: p.community_repulsion,
            },
            ForceKind::Overlap => Contributor::Overlap(p.overlap),
            ForceKind::Radial => Contributor::Radial(RadialPlacement::plan(
                index,
                entities,
                relations,
                self.optimizer.as_ref(),
                RadialFrame::for_canvas(self.options.width, self.options.height),
                p.radial,
            )),
            ForceKind::WallAffinity => Contributor::WallAffinity(WallParams {
                width: self.options.width,
                height: self.options.height,
                ..p.wall
            }),
            ForceKind::CrossPopulation => Contributor::CrossPopulation(p.separation),
            ForceKind::Jitter => Contributor::Jitter(p.jitter),
        }
    }
}

/// Loads `entities`/`relations` into `integrator` and activates `mode` on it.
///
/// `options.mode` is ignored in favour of `mode`. Incoming velocities are discarded. Fails only
/// on invalid options.
pub fn compute_layout<I: Integrator + ?Sized>(
    mut entities: Vec<Entity>,
    relations: Vec<Relation>,
    mode: LayoutMode,
    options: &LayoutOptions,
    integrator: &mut I,
) -> Result<Activation> {
    options.validate()?;

    let timing_enabled = std::env::var("PLY_LAYOUT_TIMING").ok().as_deref() == Some("1");
    let start = timing_enabled.then(std::time::Instant::now);

    integrator.stop();
    for e in &mut entities {
        e.vx = 0.0;
        e.vy = 0.0;
    }
    integrator.load(entities, relations);
    let strategy = LayoutStrategy::new(options.clone(), Some(OrderOptimizer::default()));
    let activation = strategy.activate(mode, integrator);

    if let Some(s) = start {
        eprintln!(
            "[ply-layout-timing] activate={:?} mode={} entities={} relations={} contributors={}",
            s.elapsed(),
            mode,
            integrator.entities().len(),
            integrator.relations().len(),
            activation.kinds.len(),
        );
    }
    Ok(activation)
}
