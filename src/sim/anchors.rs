use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Vec2, vec2};

use crate::data::{StartupRecord, TagRecord};

/// Anchors sit on a ring of this fraction of the short viewport side.
const ANCHOR_RING_FACTOR: f32 = 0.32;

/// Fixed cluster point for one tag, exported to the render layer as-is.
#[derive(Clone, Debug)]
pub struct TagAnchor {
    pub tag: TagRecord,
    pub pos: Vec2,
}

/// Computes one anchor per tag that is referenced by at least one of the
/// given startups, spaced evenly on a ring around the viewport center,
/// starting at twelve o'clock. Tags nobody references get no anchor.
///
/// Deterministic in the iteration order of `tags`.
pub fn compute_anchors(
    startups: &[StartupRecord],
    tags: &[TagRecord],
    width: f32,
    height: f32,
) -> Vec<TagAnchor> {
    if width <= 0.0 || height <= 0.0 || tags.is_empty() {
        return Vec::new();
    }

    let referenced = startups
        .iter()
        .flat_map(|startup| startup.tags.iter())
        .map(String::as_str)
        .collect::<HashSet<_>>();

    let active = tags
        .iter()
        .filter(|tag| referenced.contains(tag.slug.as_str()))
        .collect::<Vec<_>>();

    let angle_step = TAU / active.len().max(1) as f32;
    let ring_radius = width.min(height) * ANCHOR_RING_FACTOR;
    let center = vec2(width, height) * 0.5;

    active
        .into_iter()
        .enumerate()
        .map(|(index, tag)| {
            let angle = index as f32 * angle_step - FRAC_PI_2;
            TagAnchor {
                tag: tag.clone(),
                pos: center + vec2(angle.cos(), angle.sin()) * ring_radius,
            }
        })
        .collect()
}
