use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use query_bubbles::PlacedCircle;
use query_bubbles::source::{LoadedSeries, Repository, WeightMetric, load_series};
use query_bubbles::store::ResultStore;

mod layout;
mod render_utils;
mod ui;

type LoadResult = Result<Vec<LoadedSeries>, String>;

/// A saved search response the viewer knows how to (re)load.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub label: Option<String>,
}

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub sources: Vec<SourceFile>,
    pub metric: WeightMetric,
    pub cap: i64,
    pub padding: f32,
    pub seed: Option<u64>,
}

pub struct BubbleApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: ResultStore<Repository>,
    sources: Vec<SourceFile>,
    metric: WeightMetric,
    cap_request: i64,
    padding: f32,
    search: String,
    path_input: String,
    add_rx: Option<Receiver<Result<LoadedSeries, String>>>,
    last_error: Option<String>,
    rng: StdRng,
    layout_dirty: bool,
    layout_cache: Option<LayoutCache>,
}

struct LayoutCache {
    canvas: Vec2,
    circles: Vec<PlacedCircle<Repository>>,
}

impl BubbleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(&options.sources, options.metric);
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(sources: Vec<SourceFile>, metric: WeightMetric) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = sources
                .iter()
                .map(|source| load_series(&source.path, source.label.as_deref(), metric))
                .collect::<anyhow::Result<Vec<_>>>()
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(sources: &[SourceFile], metric: WeightMetric) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(sources.to_vec(), metric),
        }
    }

    fn ready_state(&self, loaded: Vec<LoadedSeries>) -> AppState {
        info!(series = loaded.len(), "search results loaded");
        AppState::Ready(Box::new(ViewModel::new(&self.options, loaded)))
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                } else {
                    ctx.request_repaint();
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading search results...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load search results");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    // Reloading reads every file again, picking up a new metric.
                    self.options.sources = model.sources.clone();
                    self.options.metric = model.metric;
                    self.options.cap = model.cap_request;
                    self.options.padding = model.padding;
                    self.reload_rx = Some(Self::spawn_load(
                        self.options.sources.clone(),
                        self.options.metric,
                    ));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(&self.options.sources, self.options.metric);
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(loaded) => self.ready_state(loaded),
                Err(error) => {
                    warn!(%error, "loading search results failed");
                    AppState::Error(error)
                }
            };
        }
    }
}

impl ViewModel {
    fn new(options: &LaunchOptions, loaded: Vec<LoadedSeries>) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut model = Self {
            store: ResultStore::new(),
            sources: options.sources.clone(),
            metric: options.metric,
            cap_request: options.cap,
            padding: options.padding,
            search: String::new(),
            path_input: String::new(),
            add_rx: None,
            last_error: None,
            rng,
            layout_dirty: true,
            layout_cache: None,
        };
        model.store.set_cap(options.cap);
        model.cap_request = model.store.cap() as i64;

        for series in loaded {
            model.store.add_series(series.label, series.items);
        }

        model
    }
}
