use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use super::render_utils::{
    FALLBACK_BUBBLE_COLOR, blend_color, fade, parse_tag_color, truncate_label,
};
use super::{LayoutKey, ViewModel};
use crate::sim::LayoutNode;

/// Cluster halos are drawn at this fraction of the short canvas side,
/// independent of the anchor ring the physics uses.
const CLUSTER_HALO_FACTOR: f32 = 0.18;

impl ViewModel {
    pub(in crate::app) fn draw_map(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

        let width = rect.width().round();
        let height = rect.height().round();
        let key = LayoutKey {
            filter_revision: self.filter_revision,
            width: width as u32,
            height: height as u32,
        };
        if self.layout_key != Some(key) {
            let filtered = self.filtered_startups();
            self.layout
                .rebuild(&filtered, &self.directory.tags, width, height, &mut self.rng);
            self.layout_key = Some(key);
        }

        if self.layout.tick() {
            ui.ctx().request_repaint();
        }

        if self.layout.nodes().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No startups found",
                FontId::proportional(15.0),
                Color32::from_gray(150),
            );
            if self.filters_active() {
                painter.text(
                    rect.center() + vec2(0.0, 22.0),
                    Align2::CENTER_CENTER,
                    "Try adjusting your search or filters",
                    FontId::proportional(12.5),
                    Color32::from_gray(110),
                );
            }
            return;
        }

        let halo_radius = width.min(height) * CLUSTER_HALO_FACTOR;
        for cluster in self.layout.clusters() {
            let center = rect.left_top() + cluster.pos;
            let color = parse_tag_color(&cluster.tag.color);

            painter.circle_filled(center, halo_radius, fade(color, 14));
            painter.circle_stroke(center, halo_radius, Stroke::new(1.5, fade(color, 52)));
            painter.text(
                center - vec2(0.0, halo_radius + 14.0),
                Align2::CENTER_CENTER,
                &cluster.tag.name,
                FontId::proportional(13.0),
                fade(color, 235),
            );
        }

        let hovered = Self::hovered_index(ui, rect, self.layout.nodes());
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let pending_selection = if response.clicked_by(egui::PointerButton::Primary) {
            Some(hovered.and_then(|(index, _distance)| {
                self.layout.nodes().get(index).map(|node| node.id.clone())
            }))
        } else {
            None
        };

        let hovered_index = hovered.map(|(index, _)| index);
        for (index, node) in self.layout.nodes().iter().enumerate() {
            let center = rect.left_top() + node.pos;
            let is_hovered = hovered_index == Some(index);
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());

            let fill = bubble_color(node.tags.iter().map(|tag| tag.color.as_str()));
            let fill = if is_hovered {
                blend_color(fill, Color32::WHITE, 0.18)
            } else {
                fill
            };

            if is_selected {
                painter.circle_stroke(
                    center,
                    node.radius + 6.0,
                    Stroke::new(2.5, fade(fill, 130)),
                );
            }

            painter.circle_filled(center, node.radius, fill);
            painter.circle_stroke(
                center,
                node.radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            );

            painter.text(
                center,
                Align2::CENTER_CENTER,
                truncate_label(&node.name, 11).as_ref(),
                FontId::proportional(11.0),
                Color32::from_gray(240),
            );
        }

        if let Some((hovered_index, _)) = hovered {
            let node = &self.layout.nodes()[hovered_index];
            let founders = self
                .record_for_source(node.source)
                .map(|record| record.founders.len())
                .unwrap_or(0);
            let summary = if node.goal.is_empty() {
                format!("{}  |  {} founder(s)", node.name, founders)
            } else {
                format!("{}  |  {}  |  {} founder(s)", node.name, node.goal, founders)
            };
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                summary,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if let Some(selected) = pending_selection {
            self.selected = selected;
        }
    }

    fn hovered_index(ui: &Ui, rect: egui::Rect, nodes: &[LayoutNode]) -> Option<(usize, f32)> {
        let pointer_pos = ui.input(|input| input.pointer.hover_pos());
        pointer_pos.and_then(|pointer: Pos2| {
            if !rect.contains(pointer) {
                return None;
            }

            nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    let distance = (rect.left_top() + node.pos).distance(pointer);
                    (distance <= node.radius).then_some((index, distance))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1))
        })
    }
}

/// Primary tag color, blended halfway with the secondary when present.
fn bubble_color<'a>(mut colors: impl Iterator<Item = &'a str>) -> Color32 {
    let Some(primary) = colors.next() else {
        return FALLBACK_BUBBLE_COLOR;
    };

    let primary = parse_tag_color(primary);
    match colors.next() {
        Some(secondary) => blend_color(primary, parse_tag_color(secondary), 0.5),
        None => primary,
    }
}
