use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use rand::rngs::SmallRng;

use crate::data::{Directory, StartupRecord, load_directory};
use crate::sim::BubbleLayout;

mod map;
mod panels;
mod render_utils;

pub struct AtlasApp {
    data_dir: PathBuf,
    state: AppState,
    reload_rx: Option<Receiver<Result<Directory, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Directory, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    directory: Directory,
    search: String,
    selected_tags: Vec<String>,
    selected: Option<String>,
    layout: BubbleLayout,
    rng: SmallRng,
    filter_revision: u64,
    filter_cache: Option<FilterCache>,
    layout_key: Option<LayoutKey>,
}

struct FilterCache {
    query: String,
    tag_slugs: Vec<String>,
    indices: Vec<usize>,
}

/// Inputs the live layout was last built from; any mismatch forces a
/// full rebuild of anchors and nodes.
#[derive(Clone, Copy, PartialEq, Eq)]
struct LayoutKey {
    filter_revision: u64,
    width: u32,
    height: u32,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    fn ensure_filter(&mut self) {
        let query = self.search.trim();
        if let Some(cache) = &self.filter_cache
            && cache.query == query
            && cache.tag_slugs == self.selected_tags
        {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let indices = self
            .directory
            .startups
            .iter()
            .enumerate()
            .filter_map(|(index, startup)| {
                let matches_query = query.is_empty()
                    || fuzzy_match_score(&matcher, &startup.name, query).is_some()
                    || fuzzy_match_score(&matcher, &startup.goal, query).is_some()
                    || fuzzy_match_score(&matcher, &startup.description, query).is_some();

                let matches_tags = self.selected_tags.is_empty()
                    || startup
                        .tags
                        .iter()
                        .any(|slug| self.selected_tags.contains(slug));

                (matches_query && matches_tags).then_some(index)
            })
            .collect();

        self.filter_revision = self.filter_revision.wrapping_add(1);
        self.filter_cache = Some(FilterCache {
            query: query.to_owned(),
            tag_slugs: self.selected_tags.clone(),
            indices,
        });
    }

    fn filtered_startups(&self) -> Vec<StartupRecord> {
        self.filter_cache
            .as_ref()
            .map(|cache| {
                cache
                    .indices
                    .iter()
                    .map(|&index| self.directory.startups[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn visible_count(&self) -> usize {
        self.filter_cache
            .as_ref()
            .map(|cache| cache.indices.len())
            .unwrap_or(0)
    }

    /// Full record behind a layout node, via the node's index into the
    /// filtered slice the layout was built from.
    fn record_for_source(&self, source: usize) -> Option<&StartupRecord> {
        let cache = self.filter_cache.as_ref()?;
        let directory_index = *cache.indices.get(source)?;
        self.directory.startups.get(directory_index)
    }

    fn filters_active(&self) -> bool {
        !self.search.trim().is_empty() || !self.selected_tags.is_empty()
    }
}

impl AtlasApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_dir: PathBuf) -> Self {
        let state = Self::start_load(data_dir.clone());
        Self {
            data_dir,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_dir: PathBuf) -> Receiver<Result<Directory, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_directory(&data_dir).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_dir: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_dir),
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(directory) => AppState::Ready(Box::new(ViewModel::new(directory))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading startup directory...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load startup directory");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.data_dir.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let data_dir_label = self.data_dir.display().to_string();
                model.show(ctx, &data_dir_label, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_dir.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(directory) => {
                                    AppState::Ready(Box::new(ViewModel::new(directory)))
                                }
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
