use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2};
use log::warn;

use crate::layout::{InitialLayout, LayoutParams};
use crate::shader_data::{ShaderForest, load_shader_forest};
use crate::worker::{LayoutCommand, LayoutResponse, LayoutWorker};

mod camera;
mod graph;
mod render_utils;
mod ui;

use camera::Camera;

/// Where the two asset files are read from.
#[derive(Clone, Debug)]
pub struct ShaderSources {
    pub summary: PathBuf,
    pub links: PathBuf,
}

pub struct ForkTreeApp {
    sources: ShaderSources,
    params: LayoutParams,
    worker: Option<LayoutWorker>,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<ShaderForest, String>>,
    },
    LayingOut {
        forest: Arc<ShaderForest>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Requests raised from the graph view's controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ViewAction {
    Relayout,
    Optimize,
}

struct ViewModel {
    forest: Arc<ShaderForest>,
    layout: InitialLayout,
    camera: Camera,
    fit_pending: bool,
    request_pending: bool,
    screen_positions: Vec<Pos2>,
    hovered: Option<usize>,
    root_count: usize,
    creator_count: usize,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

impl ForkTreeApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        sources: ShaderSources,
        params: LayoutParams,
    ) -> Self {
        let (worker, state) = match LayoutWorker::spawn() {
            Ok(worker) => (Some(worker), Self::start_load(sources.clone())),
            Err(error) => (None, AppState::Error(format!("{error:#}"))),
        };

        Self {
            sources,
            params,
            worker,
            state,
        }
    }

    fn spawn_load(sources: ShaderSources) -> Receiver<Result<ShaderForest, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_shader_forest(&sources.summary, &sources.links)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(sources: ShaderSources) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(sources),
        }
    }

    fn request_layout(&self, forest: Arc<ShaderForest>, params: LayoutParams) -> AppState {
        let Some(worker) = &self.worker else {
            return AppState::Error("layout worker is not running".to_owned());
        };

        let command = LayoutCommand::Initialize {
            forest: Arc::clone(&forest),
            params,
        };
        match worker.send(command) {
            Ok(()) => AppState::LayingOut { forest },
            Err(error) => AppState::Error(format!("{error:#}")),
        }
    }

    fn apply_action(&mut self, action: ViewAction) -> Option<AppState> {
        let AppState::Ready(model) = &mut self.state else {
            return None;
        };
        let worker = self.worker.as_ref()?;

        let command = match action {
            ViewAction::Relayout => LayoutCommand::Initialize {
                forest: Arc::clone(&model.forest),
                params: LayoutParams {
                    seed: None,
                    ..self.params
                },
            },
            ViewAction::Optimize => LayoutCommand::Optimize {
                positions: model.layout.positions.clone(),
            },
        };

        match worker.send(command) {
            Ok(()) => {
                model.request_pending = true;
                None
            }
            Err(error) => Some(AppState::Error(format!("{error:#}"))),
        }
    }

    fn poll_worker(&mut self) -> Option<AppState> {
        let response = match self.worker.as_ref()?.try_recv() {
            Ok(response) => response,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                self.worker = None;
                return Some(AppState::Error("Layout worker disconnected".to_owned()));
            }
        };

        match response {
            LayoutResponse::InitialLayout(layout) => {
                let forest = match &self.state {
                    AppState::LayingOut { forest } => Arc::clone(forest),
                    AppState::Ready(model) => Arc::clone(&model.forest),
                    _ => {
                        warn!("dropping a layout that arrived with no forest loaded");
                        return None;
                    }
                };
                Some(AppState::Ready(Box::new(ViewModel::new(forest, layout))))
            }
            LayoutResponse::UpdatedLayout(update) => {
                if let AppState::Ready(model) = &mut self.state {
                    model.apply_update(update);
                } else {
                    warn!("dropping a layout update that arrived before the initial layout");
                }
                None
            }
            LayoutResponse::Failed(error) => Some(AppState::Error(error)),
        }
    }

    fn retry(&mut self) -> AppState {
        if self.worker.is_none() {
            match LayoutWorker::spawn() {
                Ok(worker) => self.worker = Some(worker),
                Err(error) => return AppState::Error(format!("{error:#}")),
            }
        }
        Self::start_load(self.sources.clone())
    }

    fn show_progress(ctx: &Context, message: &str) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.heading(message);
                ui.add_space(8.0);
                ui.spinner();
            });
        });
    }
}

impl eframe::App for ForkTreeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut loaded = None;
        let mut action = None;
        let mut retry_requested = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(forest)) => loaded = Some(Arc::new(forest)),
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }
                Self::show_progress(ctx, "Loading shader fork tree...");
            }
            AppState::LayingOut { forest } => {
                let message = format!("Laying out {} shaders...", forest.node_count());
                Self::show_progress(ctx, &message);
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to build the shader fork tree");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        retry_requested = true;
                    }
                });
            }
            AppState::Ready(model) => {
                let source = self.sources.summary.display().to_string();
                model.show(ctx, &source, &mut action);
                if model.request_pending {
                    ctx.request_repaint();
                }
            }
        }

        if let Some(forest) = loaded {
            transition = Some(self.request_layout(forest, self.params));
        }
        if let Some(action) = action {
            transition = transition.or_else(|| self.apply_action(action));
        }
        if transition.is_none() {
            transition = self.poll_worker();
        }
        if retry_requested {
            transition = Some(self.retry());
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
