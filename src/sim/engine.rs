use eframe::egui::{Vec2, vec2};

use super::forces::{accumulate_anchor_pull, accumulate_collisions, accumulate_repulsion};
use super::nodes::LayoutNode;

/// Fraction of velocity carried into the next tick; the rest is friction.
const VELOCITY_RETAIN: f32 = 0.3;

/// Pull of the field's centroid toward the viewport center. Decays with
/// alpha like the springs do, so a lone off-center cluster is not dragged
/// to the middle while the simulation cools.
const CENTER_STRENGTH: f32 = 0.01;

/// Nodes keep this much clearance beyond their radius from every edge.
const EDGE_MARGIN: f32 = 10.0;

pub(super) const ALPHA_INITIAL: f32 = 1.0;
pub(super) const ALPHA_DECAY_RATE: f32 = 0.02;
pub(super) const ALPHA_MIN: f32 = 0.001;
pub(super) const REHEAT_ALPHA: f32 = 0.5;

/// One simulation tick: accumulate forces, damp and integrate velocities,
/// nudge the centroid, then clamp every node into the viewport. Positions
/// are consistent and fully clamped when this returns.
pub(super) fn step(
    nodes: &mut [LayoutNode],
    forces: &mut Vec<Vec2>,
    alpha: f32,
    width: f32,
    height: f32,
) {
    forces.resize(nodes.len(), Vec2::ZERO);
    forces.fill(Vec2::ZERO);

    accumulate_repulsion(nodes, alpha, forces);
    accumulate_collisions(nodes, forces);
    accumulate_anchor_pull(nodes, alpha, forces);

    let centering = centering_nudge(nodes, alpha, width, height);

    for (node, force) in nodes.iter_mut().zip(forces.iter()) {
        node.velocity = (node.velocity + *force + centering) * VELOCITY_RETAIN;
        node.pos += node.velocity;
    }

    clamp_to_viewport(nodes, width, height);
}

/// Shared velocity correction that moves the whole field's centroid toward
/// the viewport center.
fn centering_nudge(nodes: &[LayoutNode], alpha: f32, width: f32, height: f32) -> Vec2 {
    if nodes.is_empty() {
        return Vec2::ZERO;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    (vec2(width, height) * 0.5 - centroid) * (CENTER_STRENGTH * alpha)
}

/// Keeps every node's full circle inside the drawable area. Runs after
/// integration and does not feed the correction back into velocity, so a
/// node pushed against the edge sticks there instead of bouncing.
pub(super) fn clamp_to_viewport(nodes: &mut [LayoutNode], width: f32, height: f32) {
    for node in nodes {
        let margin = node.radius + EDGE_MARGIN;
        let max_x = (width - margin).max(margin);
        let max_y = (height - margin).max(margin);
        node.pos.x = node.pos.x.clamp(margin, max_x);
        node.pos.y = node.pos.y.clamp(margin, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32, target: Vec2) -> LayoutNode {
        LayoutNode {
            id: String::new(),
            name: String::new(),
            goal: String::new(),
            tags: Vec::new(),
            pos: vec2(x, y),
            velocity: Vec2::ZERO,
            target,
            radius: 28.0,
            source: 0,
        }
    }

    #[test]
    fn clamp_keeps_full_circles_inside_the_viewport() {
        let mut nodes = vec![
            node_at(-500.0, 12.0, Vec2::ZERO),
            node_at(900.0, 700.0, Vec2::ZERO),
        ];
        clamp_to_viewport(&mut nodes, 800.0, 600.0);

        for node in &nodes {
            assert!(node.pos.x >= 38.0 && node.pos.x <= 762.0);
            assert!(node.pos.y >= 38.0 && node.pos.y <= 562.0);
        }
    }

    #[test]
    fn clamp_survives_a_viewport_smaller_than_one_node() {
        let mut nodes = vec![node_at(30.0, 30.0, Vec2::ZERO)];
        clamp_to_viewport(&mut nodes, 40.0, 40.0);
        assert!(nodes[0].pos.x.is_finite());
        assert!(nodes[0].pos.y.is_finite());
    }

    #[test]
    fn every_step_leaves_positions_clamped() {
        let target = vec2(400.0, 108.0);
        let mut nodes = (0..30)
            .map(|index| node_at(390.0 + index as f32, 110.0, target))
            .collect::<Vec<_>>();
        let mut forces = Vec::new();

        for _ in 0..200 {
            step(&mut nodes, &mut forces, 1.0, 800.0, 600.0);
            for node in &nodes {
                assert!(node.pos.x >= 38.0 && node.pos.x <= 762.0);
                assert!(node.pos.y >= 38.0 && node.pos.y <= 562.0);
            }
        }
    }

    #[test]
    fn a_single_node_is_drawn_toward_its_target() {
        let mut nodes = vec![node_at(200.0, 500.0, vec2(400.0, 108.0))];
        let mut forces = Vec::new();

        let before = (nodes[0].pos - nodes[0].target).length();
        for _ in 0..50 {
            step(&mut nodes, &mut forces, 1.0, 800.0, 600.0);
        }
        let after = (nodes[0].pos - nodes[0].target).length();
        assert!(after < before * 0.5, "before {before}, after {after}");
    }

    #[test]
    fn step_with_no_nodes_is_a_no_op() {
        let mut nodes: Vec<LayoutNode> = Vec::new();
        let mut forces = Vec::new();
        step(&mut nodes, &mut forces, 1.0, 800.0, 600.0);
        assert!(nodes.is_empty());
    }
}
