use std::collections::VecDeque;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};

use crate::layout::{EDGE_STRIDE, InitialLayout, UpdatedLayout};
use crate::shader_data::ShaderForest;

use super::super::camera::Camera;
use super::super::{ViewAction, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(forest: Arc<ShaderForest>, layout: InitialLayout) -> Self {
        let root_count = forest.root_count();
        let creator_count = forest.creator_count();

        Self {
            forest,
            layout,
            camera: Camera::default(),
            fit_pending: true,
            request_pending: false,
            screen_positions: Vec::new(),
            hovered: None,
            root_count,
            creator_count,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    /// Swaps in refreshed positions and edges; colors never change.
    pub(in crate::app) fn apply_update(&mut self, update: UpdatedLayout) {
        self.layout.positions = update.positions;
        self.layout.edges = update.edges;
        self.request_pending = false;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        action: &mut Option<ViewAction>,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("fork-tree");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("shaders: {}", self.forest.node_count()));
                    ui.label(format!("forks: {}", self.layout.edges.len() / EDGE_STRIDE));
                    ui.label(format!("trees: {}", self.root_count));
                    ui.label(format!("creators: {}", self.creator_count));
                    ui.label(format!("seed: {}", self.layout.seed));

                    let relayout =
                        ui.add_enabled(!self.request_pending, egui::Button::new("Re-layout"));
                    if relayout.clicked() {
                        *action = Some(ViewAction::Relayout);
                    }
                    let optimize =
                        ui.add_enabled(!self.request_pending, egui::Button::new("Optimize layout"));
                    if optimize.clicked() {
                        *action = Some(ViewAction::Optimize);
                    }
                    if ui.button("Fit view").clicked() {
                        self.fit_pending = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }
}
