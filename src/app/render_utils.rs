use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::layout::{COLOR_STRIDE, POSITION_STRIDE};

use super::camera::Camera;

const GRID_MIN_SPACING_PX: f32 = 48.0;
const GRID_MAX_LINES: i64 = 512;

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: &Camera) {
    painter.rect_filled(rect, 0.0, Color32::BLACK);

    let unit_px = camera.length_to_screen(rect, 1.0);
    if !unit_px.is_finite() || unit_px <= 0.0 {
        return;
    }

    let mut step = 10.0_f32.powf((GRID_MIN_SPACING_PX / unit_px).log10().ceil());
    if step * unit_px > GRID_MIN_SPACING_PX * 5.0 {
        step /= 2.0;
    }
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let top_left = camera.screen_to_world(rect, rect.left_top());
    let bottom_right = camera.screen_to_world(rect, rect.right_bottom());

    for x in grid_lines(top_left.x, bottom_right.x, step) {
        let screen_x = camera.world_to_screen(rect, vec2(x, 0.0)).x;
        painter.line_segment(
            [Pos2::new(screen_x, rect.top()), Pos2::new(screen_x, rect.bottom())],
            stroke,
        );
    }

    for y in grid_lines(bottom_right.y, top_left.y, step) {
        let screen_y = camera.world_to_screen(rect, vec2(0.0, y)).y;
        painter.line_segment(
            [Pos2::new(rect.left(), screen_y), Pos2::new(rect.right(), screen_y)],
            stroke,
        );
    }
}

fn grid_lines(from: f32, to: f32, step: f32) -> impl Iterator<Item = f32> {
    let first = (from / step).floor() as i64;
    let last = (to / step).ceil() as i64;
    let lines = if last - first > GRID_MAX_LINES { 0..0 } else { first..last + 1 };
    lines.map(move |line| line as f32 * step)
}

pub(super) fn node_color(colors: &[f32], index: usize) -> Color32 {
    let offset = index * COLOR_STRIDE;
    colors
        .get(offset..offset + COLOR_STRIDE)
        .map(|rgb| Color32::from_rgb(channel_byte(rgb[0]), channel_byte(rgb[1]), channel_byte(rgb[2])))
        .unwrap_or(Color32::GRAY)
}

fn channel_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// World-space bounding box of a flat position buffer.
pub(super) fn position_bounds(positions: &[f32]) -> Option<(Vec2, Vec2)> {
    positions
        .chunks_exact(POSITION_STRIDE)
        .map(|xy| vec2(xy[0], xy[1]))
        .fold(None, |bounds, point| match bounds {
            None => Some((point, point)),
            Some((min, max)) => Some((min.min(point), max.max(point))),
        })
}

pub(super) struct ArrowShape {
    pub(super) shaft: [Pos2; 2],
    pub(super) head: Option<[Pos2; 3]>,
}

/// Arrow from `start` to the rim of the target node at `end`.
///
/// The head is dropped when it would be smaller than `min_head_px`.
pub(super) fn arrow_shape(
    start: Pos2,
    end: Pos2,
    target_radius: f32,
    head_length: f32,
    head_half_width: f32,
    min_head_px: f32,
) -> Option<ArrowShape> {
    let delta = end - start;
    let length = delta.length();
    if length <= target_radius || length <= f32::EPSILON {
        return None;
    }

    let direction = delta / length;
    let tip = end - direction * target_radius;
    let available = length - target_radius;

    if head_length < min_head_px {
        return Some(ArrowShape {
            shaft: [start, tip],
            head: None,
        });
    }

    let head_length = head_length.min(available);
    let base = tip - direction * head_length;
    let normal = vec2(-direction.y, direction.x) * head_half_width;

    Some(ArrowShape {
        shaft: [start, base],
        head: Some([tip, base + normal, base - normal]),
    })
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0))
    }

    #[test]
    fn grid_lines_cover_the_range() {
        let lines = grid_lines(-1.0, 1.0, 0.5).collect::<Vec<_>>();
        assert_eq!(lines, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert_eq!(grid_lines(0.0, 1.0e6, 1.0).count(), 0);
    }

    #[test]
    fn colors_are_read_with_a_stride_of_three() {
        let colors = [0.0, 0.5, 1.0, 1.0, 0.0, 0.2];
        assert_eq!(node_color(&colors, 0), Color32::from_rgb(0, 128, 255));
        assert_eq!(node_color(&colors, 1), Color32::from_rgb(255, 0, 51));
        assert_eq!(node_color(&colors, 2), Color32::GRAY);
    }

    #[test]
    fn bounds_cover_every_node() {
        assert_eq!(position_bounds(&[]), None);

        let (min, max) = position_bounds(&[1.0, -2.0, -3.0, 4.0, 0.5, 0.5]).unwrap();
        assert_eq!(min, vec2(-3.0, -2.0));
        assert_eq!(max, vec2(1.0, 4.0));
    }

    #[test]
    fn arrow_stops_at_the_target_rim() {
        let arrow = arrow_shape(Pos2::ZERO, Pos2::new(100.0, 0.0), 10.0, 20.0, 5.0, 2.0).unwrap();
        let head = arrow.head.unwrap();

        assert_eq!(head[0], Pos2::new(90.0, 0.0));
        assert_eq!(arrow.shaft, [Pos2::ZERO, Pos2::new(70.0, 0.0)]);
        assert_eq!(head[1], Pos2::new(70.0, 5.0));
        assert_eq!(head[2], Pos2::new(70.0, -5.0));
    }

    #[test]
    fn tiny_heads_become_plain_lines() {
        let arrow = arrow_shape(Pos2::ZERO, Pos2::new(0.0, 50.0), 5.0, 1.0, 0.5, 2.0).unwrap();
        assert!(arrow.head.is_none());
        assert_eq!(arrow.shaft, [Pos2::ZERO, Pos2::new(0.0, 45.0)]);
    }

    #[test]
    fn overlapping_nodes_get_no_arrow() {
        assert!(arrow_shape(Pos2::ZERO, Pos2::new(3.0, 0.0), 5.0, 1.0, 0.5, 2.0).is_none());
        assert!(arrow_shape(Pos2::ZERO, Pos2::ZERO, 0.0, 1.0, 0.5, 2.0).is_none());
    }

    #[test]
    fn culling_keeps_edges_crossing_the_viewport() {
        let rect = viewport();
        assert!(edge_visible(rect, Pos2::new(-50.0, 150.0), Pos2::new(450.0, 150.0), 1.0));
        assert!(edge_visible(rect, Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0), 1.0));
        assert!(!edge_visible(rect, Pos2::new(-50.0, -50.0), Pos2::new(-10.0, -60.0), 1.0));
        assert!(!edge_visible(rect, Pos2::new(-100.0, 250.0), Pos2::new(250.0, 600.0), 1.0));
    }

    #[test]
    fn culling_keeps_circles_touching_the_viewport() {
        let rect = viewport();
        assert!(circle_visible(rect, Pos2::new(-3.0, 100.0), 5.0));
        assert!(!circle_visible(rect, Pos2::new(-6.0, 100.0), 5.0));
    }
}
