use eframe::egui::{self, Pos2, Rect, Ui};

use crate::layout::POSITION_STRIDE;

use super::super::ViewModel;
use super::super::render_utils::position_bounds;

const HOVER_SLACK_PX: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.camera.zoom_at(rect, pointer, -scroll.signum());
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, rect: Rect, response: &egui::Response) {
        if response.dragged() {
            self.camera.pan_by_pixels(rect, response.drag_delta());
        }
    }

    pub(in crate::app) fn fit_view(&mut self, rect: Rect) {
        if let Some((min, max)) = position_bounds(&self.layout.positions) {
            self.camera.fit(rect, min, max);
        }
        self.fit_pending = false;
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        rect: Rect,
        screen_positions: &[Pos2],
        node_radius: f32,
    ) -> Option<usize> {
        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))?;
        let pick_radius = node_radius + HOVER_SLACK_PX;

        screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                (distance <= pick_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub(in crate::app) fn hover_text(&self, index: usize) -> String {
        let creator = self.forest.creator(index).unwrap_or("unknown creator");
        let children = self.forest.child_count(index);
        let offset = index * POSITION_STRIDE;
        let (x, y) = self
            .layout
            .positions
            .get(offset..offset + POSITION_STRIDE)
            .map(|xy| (xy[0], xy[1]))
            .unwrap_or_default();
        let role = match self.forest.links.get(index) {
            Some(link) if link.is_root() => "root".to_owned(),
            Some(link) => format!("fork of #{}", link.parent_index),
            None => "detached".to_owned(),
        };

        format!("#{index}  |  {creator}  |  {role}  |  forks {children}  |  ({x:.2}, {y:.2})")
    }
}
