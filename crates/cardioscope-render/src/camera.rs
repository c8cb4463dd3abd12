//! Camera and view management.

use glam::{Mat4, Vec3};

/// A perspective camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Radius of the framed scene around the target; the clip planes enclose it.
    pub scene_radius: f32,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_6, // 30 degrees
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            scene_radius: 1.0,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Orbits the camera around the target.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Moves toward (positive `delta`) or away from the target.
    ///
    /// The clip planes follow the camera so the framed scene stays inside
    /// the depth range.
    pub fn zoom(&mut self, delta: f32) {
        let direction = self.forward();
        let distance = (self.position - self.target).length();
        if distance <= f32::EPSILON {
            return;
        }
        let new_distance = (distance - delta).max(distance * 0.01);
        self.position = self.target - direction * new_distance;
        self.update_clip_planes(new_distance);
    }

    /// Places the camera on +Z looking at the center of the box, far enough
    /// for the whole box to fit in the vertical field of view.
    pub fn look_at_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let radius = ((max - min).length() * 0.5).max(1e-3);
        let distance = radius / (self.fov * 0.5).sin();

        self.target = center;
        self.up = Vec3::Y;
        self.position = center + Vec3::new(0.0, 0.0, distance);
        self.scene_radius = radius;
        self.update_clip_planes(distance);
    }

    fn update_clip_planes(&mut self, distance: f32) {
        self.near = (distance - self.scene_radius).max(distance * 0.001);
        self.far = distance + self.scene_radius * 2.0;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_look_at_box_centers_target() {
        let mut camera = Camera::new(1.5);
        camera.look_at_box(Vec3::new(-50.0, -50.0, -70.0), Vec3::new(50.0, 50.0, 30.0));
        assert_eq!(camera.target, Vec3::new(0.0, 0.0, -20.0));
        assert!(camera.position.z > 30.0);
        assert!(camera.near > 0.0 && camera.near < camera.far);
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let mut camera = Camera::new(1.0);
        camera.orbit(0.4, -0.3);
        let radius = (camera.position - camera.target).length();
        assert!((radius - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_never_crosses_target() {
        let mut camera = Camera::new(1.0);
        camera.zoom(100.0);
        assert!(camera.position.z > 0.0);
        camera.zoom(-2.0);
        assert!(camera.position.z > 2.0);
    }

    #[test]
    fn test_box_fits_in_view() {
        let mut camera = Camera::new(1.0);
        let (lo, hi) = (Vec3::splat(-1.0), Vec3::splat(1.0));
        camera.look_at_box(lo, hi);
        let clip = camera.view_projection_matrix() * hi.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_zoom_out_keeps_box_within_far_plane() {
        let mut camera = Camera::new(1.0);
        let (lo, hi) = (Vec3::splat(-1.0), Vec3::splat(1.0));
        camera.look_at_box(lo, hi);
        camera.zoom(-50.0);

        let distance = (camera.position - camera.target).length();
        assert!(camera.far > distance + 3f32.sqrt());
        let clip = camera.view_projection_matrix() * lo.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_zoom_in_after_fit_moves_closer() {
        let mut camera = Camera::new(1.0);
        camera.look_at_box(Vec3::splat(-1.0), Vec3::splat(1.0));
        let before = (camera.position - camera.target).length();
        camera.zoom(2.0);
        let after = (camera.position - camera.target).length();
        assert!((before - after - 2.0).abs() < 1e-4);
        assert!(camera.near < after - 1.0);
    }

    proptest! {
        #[test]
        fn zoom_keeps_target_between_clip_planes(
            extent in 0.1f32..500.0,
            steps in proptest::collection::vec(-200.0f32..200.0, 1..10),
        ) {
            let mut camera = Camera::new(1.0);
            camera.look_at_box(Vec3::splat(-extent), Vec3::splat(extent));
            for delta in steps {
                camera.zoom(delta);
                let distance = (camera.position - camera.target).length();
                prop_assert!(camera.near > 0.0);
                prop_assert!(camera.near < distance);
                prop_assert!(distance < camera.far);
            }
        }
    }
}
