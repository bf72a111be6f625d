use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use rand::Rng;

use super::anchors::TagAnchor;
use crate::data::{StartupRecord, TagRecord};

/// Every bubble is drawn at the same size; the radius encodes nothing.
pub const NODE_RADIUS: f32 = 28.0;

/// Maximum per-axis offset applied to a node's starting position.
const PLACEMENT_JITTER: f32 = 20.0;

/// One startup in the running simulation.
#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub id: String,
    pub name: String,
    pub goal: String,
    /// Resolved tag records, in slug order; slugs without an anchor are dropped.
    pub tags: Vec<TagRecord>,
    pub pos: Vec2,
    pub(super) velocity: Vec2,
    pub target: Vec2,
    pub radius: f32,
    /// Index of the originating record in the startup slice the layout was
    /// built from, so consumers can get back to the full record.
    pub source: usize,
}

/// Builds simulation nodes for the given startups. Each node starts at its
/// target position (anchor, anchor midpoint, or viewport center) plus a
/// small random offset so coincident targets do not stack exactly.
pub fn init_nodes(
    startups: &[StartupRecord],
    anchors: &[TagAnchor],
    width: f32,
    height: f32,
    rng: &mut impl Rng,
) -> Vec<LayoutNode> {
    let anchor_by_slug = anchors
        .iter()
        .map(|anchor| (anchor.tag.slug.as_str(), anchor))
        .collect::<HashMap<_, _>>();
    let center = vec2(width, height) * 0.5;

    startups
        .iter()
        .enumerate()
        .map(|(source, startup)| {
            let resolved = startup
                .tags
                .iter()
                .take(2)
                .filter_map(|slug| anchor_by_slug.get(slug.as_str()).copied())
                .collect::<Vec<_>>();

            let target = match resolved.as_slice() {
                [] => center,
                [only] => only.pos,
                [first, second, ..] => (first.pos + second.pos) * 0.5,
            };

            let jitter = vec2(
                rng.gen_range(-PLACEMENT_JITTER..=PLACEMENT_JITTER),
                rng.gen_range(-PLACEMENT_JITTER..=PLACEMENT_JITTER),
            );

            LayoutNode {
                id: startup.id.clone(),
                name: startup.name.clone(),
                goal: startup.goal.clone(),
                tags: resolved.iter().map(|anchor| anchor.tag.clone()).collect(),
                pos: target + jitter,
                velocity: Vec2::ZERO,
                target,
                radius: NODE_RADIUS,
                source,
            }
        })
        .collect()
}
