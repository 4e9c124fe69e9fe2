use eframe::egui::{Pos2, Rect, Vec2, vec2};

/// Scale change per wheel notch. Smaller zooms faster.
pub(super) const ZOOM_SCALE_FACTOR: f32 = 0.98;

const MIN_SCALE: f32 = 1.0e-4;
const MAX_SCALE: f32 = 1.0e4;
const FIT_MARGIN: f32 = 1.1;
const MIN_FIT_EXTENT: f32 = 1.0;

/// Pan/zoom state of the graph view.
///
/// World units are scaled so that one unit spans half the viewport height at
/// `scale == 1`; world y points up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Camera {
    pub(super) position: Vec2,
    pub(super) scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    fn pixels_per_unit(&self, rect: Rect) -> f32 {
        (self.scale * rect.height() * 0.5).max(f32::MIN_POSITIVE)
    }

    pub(super) fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        let offset = (world + self.position) * self.pixels_per_unit(rect);
        rect.center() + vec2(offset.x, -offset.y)
    }

    pub(super) fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        let offset = screen - rect.center();
        vec2(offset.x, -offset.y) / self.pixels_per_unit(rect) - self.position
    }

    pub(super) fn length_to_screen(&self, rect: Rect, length: f32) -> f32 {
        length * self.pixels_per_unit(rect)
    }

    pub(super) fn pan_by_pixels(&mut self, rect: Rect, delta: Vec2) {
        self.position += vec2(delta.x, -delta.y) / self.pixels_per_unit(rect);
    }

    /// Zooms by `ZOOM_SCALE_FACTOR` per notch (positive notches zoom out),
    /// keeping the world point under `anchor` fixed on screen.
    pub(super) fn zoom_at(&mut self, rect: Rect, anchor: Pos2, notches: f32) {
        let anchor_world = self.screen_to_world(rect, anchor);
        self.scale = (self.scale * ZOOM_SCALE_FACTOR.powf(notches)).clamp(MIN_SCALE, MAX_SCALE);

        let offset = anchor - rect.center();
        self.position = vec2(offset.x, -offset.y) / self.pixels_per_unit(rect) - anchor_world;
    }

    /// Centers the view on the world box `min..max` and scales it to fit.
    pub(super) fn fit(&mut self, rect: Rect, min: Vec2, max: Vec2) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let extent = (max - min).max(Vec2::splat(MIN_FIT_EXTENT)) * FIT_MARGIN;
        let scale_for_height = 2.0 / extent.y;
        let scale_for_width = 2.0 * rect.width() / (rect.height() * extent.x);

        self.scale = scale_for_height
            .min(scale_for_width)
            .clamp(MIN_SCALE, MAX_SCALE);
        self.position = -(min + max) * 0.5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::new(20.0, 40.0), vec2(800.0, 600.0))
    }

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn default_camera_maps_one_unit_to_half_the_height() {
        let camera = Camera::default();
        let rect = viewport();

        assert_eq!(camera.world_to_screen(rect, Vec2::ZERO), rect.center());
        let up = camera.world_to_screen(rect, vec2(0.0, 1.0));
        assert!((up.y - rect.top()).abs() < 1e-3);
        assert!((camera.length_to_screen(rect, 0.5) - 150.0).abs() < 1e-3);
    }

    #[test]
    fn screen_and_world_round_trip() {
        let camera = Camera {
            position: vec2(3.5, -12.0),
            scale: 0.37,
        };
        let rect = viewport();

        for world in [vec2(0.0, 0.0), vec2(-40.0, 17.5), vec2(99.0, -99.0)] {
            let screen = camera.world_to_screen(rect, world);
            assert!(close(camera.screen_to_world(rect, screen), world));
        }
    }

    #[test]
    fn panning_follows_the_pointer() {
        let mut camera = Camera {
            position: vec2(1.0, 2.0),
            scale: 2.0,
        };
        let rect = viewport();
        let world = vec2(-0.25, 0.4);
        let before = camera.world_to_screen(rect, world);

        camera.pan_by_pixels(rect, vec2(35.0, -12.0));
        let after = camera.world_to_screen(rect, world);
        assert!(close(after - before, vec2(35.0, -12.0)));
    }

    #[test]
    fn zoom_keeps_the_anchor_in_place() {
        let mut camera = Camera::default();
        let rect = viewport();
        let anchor = Pos2::new(600.0, 150.0);
        let world = camera.screen_to_world(rect, anchor);

        camera.zoom_at(rect, anchor, -10.0);
        assert!(camera.scale > 1.0);
        assert!(close(camera.world_to_screen(rect, world).to_vec2(), anchor.to_vec2()));

        camera.zoom_at(rect, anchor, 25.0);
        assert!(camera.scale < 1.0);
        assert!(close(camera.world_to_screen(rect, world).to_vec2(), anchor.to_vec2()));
    }

    #[test]
    fn one_notch_scales_by_the_zoom_factor() {
        let mut camera = Camera::default();
        camera.zoom_at(viewport(), viewport().center(), 1.0);
        assert!((camera.scale - ZOOM_SCALE_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn fit_shows_the_whole_box() {
        let rect = viewport();
        let min = vec2(-120.0, -30.0);
        let max = vec2(80.0, 95.0);
        let mut camera = Camera::default();
        camera.fit(rect, min, max);

        for corner in [min, max, vec2(min.x, max.y), vec2(max.x, min.y)] {
            let screen = camera.world_to_screen(rect, corner);
            assert!(rect.contains(screen), "{corner:?} -> {screen:?}");
        }
        assert!(close(
            camera.world_to_screen(rect, (min + max) * 0.5).to_vec2(),
            rect.center().to_vec2()
        ));
    }

    #[test]
    fn fit_ignores_empty_viewports() {
        let mut camera = Camera::default();
        camera.fit(Rect::NOTHING, Vec2::ZERO, Vec2::splat(5.0));
        assert_eq!(camera, Camera::default());
    }
}
