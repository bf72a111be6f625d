use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::nodes::LayoutNode;

/// Charge-like pairwise repulsion; mostly matters at very short range,
/// where it keeps coincident nodes from collapsing onto one point before
/// collision resolution separates them.
const REPULSION_STRENGTH: f32 = 8.0;
const REPULSION_SOFTENING: f32 = 1.0;

/// Nodes closer than the sum of their radii plus this buffer get pushed apart.
const COLLISION_PADDING: f32 = 4.0;
/// Fraction of the overlap corrected per tick; below 1.0 so the resolution
/// converges over several ticks instead of oscillating.
const COLLISION_STRENGTH: f32 = 0.9;

/// Per-axis spring toward the node's target. Weak relative to collision so
/// clustering biases the layout without fighting overlap resolution.
const ANCHOR_STRENGTH: f32 = 0.08;

fn pair_axis(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * TAU;
        vec2(angle.cos(), angle.sin())
    }
}

pub(super) fn accumulate_repulsion(nodes: &[LayoutNode], alpha: f32, forces: &mut [Vec2]) {
    for from in 0..nodes.len() {
        for to in (from + 1)..nodes.len() {
            let delta = nodes[from].pos - nodes[to].pos;
            let distance_sq = delta.length_sq();
            let direction = pair_axis(delta, distance_sq.sqrt(), from, to);

            let push =
                direction * (REPULSION_STRENGTH * alpha / (distance_sq + REPULSION_SOFTENING));
            forces[from] += push;
            forces[to] -= push;
        }
    }
}

pub(super) fn accumulate_collisions(nodes: &[LayoutNode], forces: &mut [Vec2]) {
    for from in 0..nodes.len() {
        for to in (from + 1)..nodes.len() {
            let delta = nodes[from].pos - nodes[to].pos;
            let distance = delta.length();

            let min_distance = nodes[from].radius + nodes[to].radius + COLLISION_PADDING;
            if distance >= min_distance {
                continue;
            }

            let direction = pair_axis(delta, distance, from, to);
            let correction = direction * ((min_distance - distance) * COLLISION_STRENGTH * 0.5);
            forces[from] += correction;
            forces[to] -= correction;
        }
    }
}

pub(super) fn accumulate_anchor_pull(nodes: &[LayoutNode], alpha: f32, forces: &mut [Vec2]) {
    for (node, force) in nodes.iter().zip(forces.iter_mut()) {
        *force += (node.target - node.pos) * (ANCHOR_STRENGTH * alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, y: f32) -> LayoutNode {
        LayoutNode {
            id: String::new(),
            name: String::new(),
            goal: String::new(),
            tags: Vec::new(),
            pos: vec2(x, y),
            velocity: Vec2::ZERO,
            target: Vec2::ZERO,
            radius: 28.0,
            source: 0,
        }
    }

    #[test]
    fn repulsion_pushes_a_pair_apart_symmetrically() {
        let nodes = vec![node_at(0.0, 0.0), node_at(10.0, 0.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, 1.0, &mut forces);

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        assert_eq!(forces[0].x, -forces[1].x);
        assert_eq!(forces[0].y, 0.0);
    }

    #[test]
    fn repulsion_scales_with_alpha() {
        let nodes = vec![node_at(0.0, 0.0), node_at(5.0, 0.0)];

        let mut hot = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, 1.0, &mut hot);
        let mut cold = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, 0.25, &mut cold);

        assert!((cold[1].x - hot[1].x * 0.25).abs() < 1e-6);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let nodes = vec![node_at(50.0, 50.0), node_at(50.0, 50.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_repulsion(&nodes, 1.0, &mut forces);
        accumulate_collisions(&nodes, &mut forces);

        assert!(forces[0].length() > 0.0);
        assert!((forces[0] + forces[1]).length() < 1e-4);
    }

    #[test]
    fn collision_ignores_separated_pairs() {
        // 28 + 28 + 4 = 60 is the contact distance
        let nodes = vec![node_at(0.0, 0.0), node_at(61.0, 0.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collisions(&nodes, &mut forces);
        assert_eq!(forces[0], Vec2::ZERO);
        assert_eq!(forces[1], Vec2::ZERO);
    }

    #[test]
    fn collision_corrects_a_fraction_of_the_overlap() {
        let nodes = vec![node_at(0.0, 0.0), node_at(40.0, 0.0)];
        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collisions(&nodes, &mut forces);

        // overlap 20, strength 0.9, split across the pair
        assert!((forces[0].x - (-9.0)).abs() < 1e-4);
        assert!((forces[1].x - 9.0).abs() < 1e-4);
    }

    #[test]
    fn anchor_pull_points_at_the_target_and_decays_with_alpha() {
        let mut node = node_at(100.0, 100.0);
        node.target = vec2(160.0, 20.0);
        let nodes = vec![node];

        let mut forces = vec![Vec2::ZERO];
        accumulate_anchor_pull(&nodes, 0.5, &mut forces);
        assert!((forces[0].x - 60.0 * 0.08 * 0.5).abs() < 1e-5);
        assert!((forces[0].y - -80.0 * 0.08 * 0.5).abs() < 1e-5);
    }
}
