mod anchors;
mod engine;
mod forces;
mod nodes;

pub use anchors::TagAnchor;
pub use nodes::LayoutNode;

use anchors::compute_anchors;
use nodes::init_nodes;

use eframe::egui::Vec2;
use rand::Rng;

use crate::data::{StartupRecord, TagRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPhase {
    /// No startups or no viewport; node and cluster lists are empty.
    Idle,
    /// Ticking toward a settled arrangement.
    Running,
    /// Alpha fell below the stop threshold; ticks are no-ops until a
    /// reheat or rebuild.
    Converged,
}

/// Owns the bubble simulation: the node buffer, the cluster anchors, and
/// the cooling schedule. The render layer reads `nodes()`/`clusters()`
/// after `tick()` within the same frame; nothing else touches the buffer.
pub struct BubbleLayout {
    phase: LayoutPhase,
    alpha: f32,
    width: f32,
    height: f32,
    nodes: Vec<LayoutNode>,
    clusters: Vec<TagAnchor>,
    force_scratch: Vec<Vec2>,
}

impl Default for BubbleLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleLayout {
    pub fn new() -> Self {
        Self {
            phase: LayoutPhase::Idle,
            alpha: 0.0,
            width: 0.0,
            height: 0.0,
            nodes: Vec::new(),
            clusters: Vec::new(),
            force_scratch: Vec::new(),
        }
    }

    /// Tears down the previous simulation and builds a fresh one from the
    /// given (already filtered) startups. Clearing the buffers here is the
    /// entire teardown: the old node set is singly owned, so no stale
    /// instance can ever tick or publish again. Degenerate input parks the
    /// layout in `Idle` with empty outputs.
    pub fn rebuild(
        &mut self,
        startups: &[StartupRecord],
        tags: &[TagRecord],
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) {
        self.nodes.clear();
        self.clusters.clear();
        self.width = width;
        self.height = height;

        if startups.is_empty() || width <= 0.0 || height <= 0.0 {
            self.phase = LayoutPhase::Idle;
            self.alpha = 0.0;
            return;
        }

        self.clusters = compute_anchors(startups, tags, width, height);
        self.nodes = init_nodes(startups, &self.clusters, width, height, rng);
        self.alpha = engine::ALPHA_INITIAL;
        self.phase = LayoutPhase::Running;
    }

    /// Advances the simulation by one step and reports whether the caller
    /// should schedule another. Positions are fully clamped when this
    /// returns, so the frame may read them directly.
    pub fn tick(&mut self) -> bool {
        if self.phase != LayoutPhase::Running {
            return false;
        }

        engine::step(
            &mut self.nodes,
            &mut self.force_scratch,
            self.alpha,
            self.width,
            self.height,
        );

        self.alpha *= 1.0 - engine::ALPHA_DECAY_RATE;
        if self.alpha < engine::ALPHA_MIN {
            self.phase = LayoutPhase::Converged;
            for node in &mut self.nodes {
                node.velocity = Vec2::ZERO;
            }
            return false;
        }

        true
    }

    /// Re-injects energy without moving or re-jittering anything. No-op
    /// unless a simulation is live.
    pub fn reheat(&mut self) {
        if matches!(self.phase, LayoutPhase::Running | LayoutPhase::Converged) {
            self.alpha = engine::REHEAT_ALPHA;
            self.phase = LayoutPhase::Running;
        }
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[TagAnchor] {
        &self.clusters
    }
}
