use eframe::egui::{self, Align, Button, Color32, Context, Layout, RichText, Ui};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::render_utils::{fade, parse_tag_color};
use super::ViewModel;
use crate::data::Directory;
use crate::sim::{BubbleLayout, LayoutPhase};

impl ViewModel {
    pub(in crate::app) fn new(directory: Directory) -> Self {
        Self {
            directory,
            search: String::new(),
            selected_tags: Vec::new(),
            selected: None,
            layout: BubbleLayout::new(),
            rng: SmallRng::from_entropy(),
            filter_revision: 0,
            filter_cache: None,
            layout_key: None,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_dir: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.ensure_filter();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("startup-atlas");
                    ui.separator();
                    ui.label(format!("data: {data_dir}"));
                    ui.separator();
                    ui.label("search:");
                    ui.text_edit_singleline(&mut self.search);
                    if !self.search.is_empty() && ui.small_button("✕").clicked() {
                        self.search.clear();
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui.add_enabled(!is_loading, Button::new("Reload")).clicked() {
                            *reload_requested = true;
                        }
                        if is_loading {
                            ui.spinner();
                        }
                    });
                });

                self.tag_chip_row(ui);
                ui.add_space(4.0);
            });

        if self.selected.is_some() {
            egui::SidePanel::right("startup_details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| {
                    self.show_details(ui);
                });
        }

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} of {} startups  ·  {} clusters",
                        self.visible_count(),
                        self.directory.startups.len(),
                        self.layout.clusters().len(),
                    ));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let live = matches!(
                            self.layout.phase(),
                            LayoutPhase::Running | LayoutPhase::Converged
                        );
                        if ui.add_enabled(live, Button::new("Reheat")).clicked() {
                            self.layout.reheat();
                            ui.ctx().request_repaint();
                        }

                        let phase_label = match self.layout.phase() {
                            LayoutPhase::Idle => "idle".to_owned(),
                            LayoutPhase::Running => {
                                format!("settling (alpha {:.2})", self.layout.alpha())
                            }
                            LayoutPhase::Converged => "settled".to_owned(),
                        };
                        ui.label(RichText::new(phase_label).color(Color32::from_gray(150)));
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_map(ui);
        });
    }

    fn tag_chip_row(&mut self, ui: &mut Ui) {
        let mut toggled = None;
        let mut clear_all = false;

        ui.horizontal_wrapped(|ui| {
            for tag in &self.directory.tags {
                let is_selected = self.selected_tags.contains(&tag.slug);
                let color = parse_tag_color(&tag.color);

                let chip = if is_selected {
                    Button::new(RichText::new(&tag.name).color(Color32::WHITE)).fill(color)
                } else {
                    Button::new(RichText::new(&tag.name).color(fade(color, 220)))
                        .fill(Color32::from_gray(32))
                };

                if ui.add(chip).clicked() {
                    toggled = Some(tag.slug.clone());
                }
            }

            if !self.selected_tags.is_empty() && ui.small_button("clear").clicked() {
                clear_all = true;
            }
        });

        if let Some(slug) = toggled {
            if let Some(position) = self.selected_tags.iter().position(|entry| *entry == slug) {
                self.selected_tags.remove(position);
            } else {
                self.selected_tags.push(slug);
            }
        }
        if clear_all {
            self.selected_tags.clear();
        }
    }

    fn show_details(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selected.clone() else {
            return;
        };
        let Some(startup) = self.directory.startup_by_id(&selected_id) else {
            self.selected = None;
            return;
        };

        let mut close = false;
        ui.horizontal(|ui| {
            ui.heading(&startup.name);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.small_button("✕").clicked() {
                    close = true;
                }
            });
        });

        ui.horizontal_wrapped(|ui| {
            for slug in &startup.tags {
                if let Some(tag) = self.directory.tags.iter().find(|tag| tag.slug == *slug) {
                    let color = parse_tag_color(&tag.color);
                    ui.label(RichText::new(&tag.name).color(color).strong());
                }
            }
        });

        if !startup.goal.is_empty() {
            ui.add_space(6.0);
            ui.label(RichText::new(&startup.goal).italics());
        }

        if !startup.description.is_empty() {
            ui.add_space(6.0);
            ui.label(&startup.description);
        }

        if let Some(url) = &startup.website_url {
            ui.add_space(6.0);
            ui.hyperlink_to(url.as_str(), url.as_str());
        }

        if !startup.founders.is_empty() {
            ui.add_space(10.0);
            ui.label(RichText::new("Founders").strong());
            for founder in &startup.founders {
                ui.horizontal(|ui| {
                    ui.label(&founder.name);
                    let role = if founder.is_primary {
                        "Founder"
                    } else {
                        "Co-Founder"
                    };
                    ui.label(RichText::new(role).color(Color32::from_gray(140)));
                    if !founder.linked_in_url.is_empty() {
                        ui.hyperlink_to("LinkedIn", founder.linked_in_url.as_str());
                    }
                });
            }
        }

        if close {
            self.selected = None;
        }
    }
}
