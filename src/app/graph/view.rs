use eframe::egui::{self, Align2, Color32, FontId, Sense, Shape, Stroke, Ui, vec2};

use crate::layout::{EDGE_STRIDE, POSITION_STRIDE};

use super::super::ViewModel;
use super::super::render_utils::{
    arrow_shape, circle_visible, draw_background, edge_visible, node_color,
};

// World-space sizes, matched to the default layout's edge length.
const NODE_SIZE: f32 = 0.04;
const EDGE_WIDTH: f32 = 0.005;
const EDGE_HEAD_WIDTH: f32 = 0.015;
const EDGE_HEAD_LENGTH: f32 = 0.035;
const EDGE_COLOR: Color32 = Color32::WHITE;

const MIN_NODE_RADIUS_PX: f32 = 1.5;
const MIN_EDGE_WIDTH_PX: f32 = 0.5;
const MIN_HEAD_LENGTH_PX: f32 = 3.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.fit_pending {
            self.fit_view(rect);
        }
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(rect, &response);

        draw_background(&painter, rect, &self.camera);

        let camera = self.camera;
        self.screen_positions.clear();
        self.screen_positions.extend(
            self.layout
                .positions
                .chunks_exact(POSITION_STRIDE)
                .map(|xy| camera.world_to_screen(rect, vec2(xy[0], xy[1]))),
        );

        let node_radius = camera
            .length_to_screen(rect, NODE_SIZE)
            .max(MIN_NODE_RADIUS_PX);
        let edge_width = camera
            .length_to_screen(rect, EDGE_WIDTH)
            .max(MIN_EDGE_WIDTH_PX);
        let head_length = camera.length_to_screen(rect, EDGE_HEAD_LENGTH);
        let head_half_width = camera.length_to_screen(rect, EDGE_HEAD_WIDTH);

        let mut visible_edge_count = 0usize;
        for quad in self.layout.edges.chunks_exact(EDGE_STRIDE) {
            let start = camera.world_to_screen(rect, vec2(quad[0], quad[1]));
            let end = camera.world_to_screen(rect, vec2(quad[2], quad[3]));
            if !edge_visible(rect, start, end, node_radius) {
                continue;
            }

            let Some(arrow) = arrow_shape(
                start,
                end,
                node_radius,
                head_length,
                head_half_width,
                MIN_HEAD_LENGTH_PX,
            ) else {
                continue;
            };

            painter.line_segment(arrow.shaft, Stroke::new(edge_width, EDGE_COLOR));
            if let Some(head) = arrow.head {
                painter.add(Shape::convex_polygon(head.to_vec(), EDGE_COLOR, Stroke::NONE));
            }
            visible_edge_count += 1;
        }
        self.visible_edge_count = visible_edge_count;

        let mut visible_node_count = 0usize;
        for (index, position) in self.screen_positions.iter().copied().enumerate() {
            if !circle_visible(rect, position, node_radius) {
                continue;
            }
            painter.circle_filled(position, node_radius, node_color(&self.layout.colors, index));
            visible_node_count += 1;
        }
        self.visible_node_count = visible_node_count;

        self.hovered = Self::hovered_index(ui, rect, &self.screen_positions, node_radius);
        if let Some(index) = self.hovered {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });

            let position = self.screen_positions[index];
            painter.circle_stroke(
                position,
                node_radius + 3.0,
                Stroke::new(1.5, Color32::from_rgb(245, 206, 93)),
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                self.hover_text(index),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
