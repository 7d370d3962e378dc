use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::input::MouseButton;
use crate::options::CameraOptions;

/// Pitch is kept inside this many degrees of the horizon to avoid gimbal
/// flip when looking straight up or down.
const PITCH_LIMIT: f32 = 89.0;

/// Fly-speed bounds in world units per second.
const SPEED_MIN: f32 = 128.0;
const SPEED_MAX: f32 = 4096.0;

/// Distance ahead of the eye used as the look-at target in fly/look mode.
const LOOK_AHEAD: f32 = 10.0;

/// Squared trackball-axis length below which an arcball step is treated as
/// degenerate and applies no rotation.
const AXIS_EPSILON: f32 = 1e-12;

/// Fly-mode movement directions along the camera's local axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyDirection {
    /// Along the front vector.
    Forward,
    /// Against the front vector.
    Backward,
    /// Against the right vector.
    Left,
    /// Along the right vector.
    Right,
    /// Along the up vector.
    Up,
    /// Against the up vector.
    Down,
}

/// Single concrete camera controller combining three interaction modes:
///
/// - **Fly** — keyboard moves along the camera's local axes, scaled by a
///   scroll-adjustable speed and the frame delta time.
/// - **Look** — dragging with the secondary button integrates yaw/pitch
///   and rebuilds the front vector from spherical coordinates.
/// - **Arcball** — dragging with the primary button rotates the eye about
///   the scene origin via a virtual trackball.
///
/// The first motion sample after a button press only establishes the drag
/// reference point; rotation starts with the second sample, so stale
/// cursor deltas never cause a jump.
///
/// Invariants kept by every update: `front`/`up`/`right` stay mutually
/// orthonormal, pitch stays within ±89°, and speed stays in [128, 4096].
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    front: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,
    speed: f32,
    sensitivity: f32,
    primary_pressed: bool,
    secondary_pressed: bool,
    last_cursor: Option<Vec2>,
    viewport: Vec2,
    model: Mat4,
}

impl CameraController {
    /// Create a controller looking from the configured eye position toward
    /// the origin.
    #[must_use]
    pub fn new(options: &CameraOptions, viewport: Vec2) -> Self {
        let eye = Vec3::from_array(options.initial_eye);
        let up = Vec3::Y;
        let front = (Vec3::ZERO - eye).normalize();
        let right = front.cross(up).normalize();
        let up = right.cross(front).normalize();

        let camera = Camera {
            eye,
            target: eye + front * LOOK_AHEAD,
            up,
            aspect: viewport.x / viewport.y,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        Self {
            camera,
            front,
            right,
            pitch: front.y.asin().to_degrees(),
            yaw: front.z.atan2(front.x).to_degrees(),
            speed: options.speed.clamp(SPEED_MIN, SPEED_MAX),
            sensitivity: options.sensitivity,
            primary_pressed: false,
            secondary_pressed: false,
            last_cursor: None,
            viewport,
            model: Mat4::IDENTITY,
        }
    }

    /// The current view matrix; recomputed on every state change.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    /// The camera (for projection parameters and uniform upload).
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Set the model matrix of the rendered volume; arcball rotation needs
    /// it to carry the rotation axis from camera space into object space.
    pub fn set_model(&mut self, model: Mat4) {
        self.model = model;
    }

    /// Update the viewport used for trackball projection and aspect ratio.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.camera.aspect = width / height;
    }

    /// Move along a local camera axis by `speed * delta_time`.
    pub fn fly(&mut self, direction: FlyDirection, delta_time: f32) {
        let velocity = self.speed * delta_time;
        let step = match direction {
            FlyDirection::Forward => self.front * velocity,
            FlyDirection::Backward => -self.front * velocity,
            FlyDirection::Left => -self.right * velocity,
            FlyDirection::Right => self.right * velocity,
            FlyDirection::Up => self.camera.up * velocity,
            FlyDirection::Down => -self.camera.up * velocity,
        };
        self.camera.eye += step;
        self.camera.target = self.camera.eye + self.front * LOOK_AHEAD;
    }

    /// Record a mouse button transition. A press arms the drag reference
    /// capture; motion deltas are measured only from the next sample.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.primary_pressed = pressed,
            MouseButton::Right => self.secondary_pressed = pressed,
            MouseButton::Middle => return,
        }
        if pressed {
            self.last_cursor = None;
        }
    }

    /// Feed an absolute cursor position; dispatches to look or arcball
    /// depending on the held button. Returns `true` if the camera changed.
    pub fn cursor_moved(&mut self, position: Vec2) -> bool {
        if !self.primary_pressed && !self.secondary_pressed {
            return false;
        }
        let Some(last) = self.last_cursor else {
            // Reference sample only; no rotation from stale deltas.
            self.last_cursor = Some(position);
            return false;
        };
        self.last_cursor = Some(position);

        if self.secondary_pressed {
            self.look(position - last)
        } else {
            self.arcball(last, position)
        }
    }

    /// Adjust fly speed by scroll tick: doubles on scroll-up, halves on
    /// scroll-down, clamped to [128, 4096]. Only active while the
    /// secondary button is held.
    pub fn scroll(&mut self, delta: f32) {
        if !self.secondary_pressed {
            return;
        }
        self.speed = if delta > 0.0 {
            self.speed * 2.0
        } else {
            self.speed / 2.0
        };
        self.speed = self.speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    /// Mouse-look: integrate yaw/pitch and rebuild the basis.
    fn look(&mut self, delta: Vec2) -> bool {
        self.yaw += delta.x * self.sensitivity;
        // Screen y grows downward; pitch grows upward.
        self.pitch += -delta.y * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let (yaw, pitch) =
            (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        );
        self.set_front(front.normalize());
        true
    }

    /// Arcball: rotate the eye about the origin by the angle between the
    /// trackball projections of the previous and current cursor positions.
    fn arcball(&mut self, previous: Vec2, current: Vec2) -> bool {
        let va = Self::trackball_vector(previous, self.viewport);
        let vb = Self::trackball_vector(current, self.viewport);

        let axis_camera = va.cross(vb);
        if axis_camera.length_squared() < AXIS_EPSILON {
            // Coincident samples; applying acos/normalize here would
            // manufacture NaNs out of rounding noise.
            return false;
        }
        let angle = va.dot(vb).clamp(-1.0, 1.0).acos();

        // Carry the axis from camera space into object space through the
        // inverse of the current view-model rotation.
        let camera_to_object =
            Mat3::from_mat4(self.camera.view_matrix() * self.model)
                .inverse();
        let axis_object = (camera_to_object * axis_camera).normalize();

        let rotation = Quat::from_axis_angle(axis_object, -angle);
        self.camera.eye = rotation * self.camera.eye;
        self.camera.target = Vec3::ZERO;

        // Rebuild the basis looking back at the origin, then re-derive
        // yaw/pitch so a later look-mode drag continues from this pose.
        let front = (-self.camera.eye).normalize();
        self.camera.up = Vec3::Y;
        self.set_front(front);
        self.pitch = front.y.asin().to_degrees();
        self.yaw = front.z.atan2(front.x).to_degrees();
        true
    }

    /// Replace the front vector and re-orthonormalize right and up.
    fn set_front(&mut self, front: Vec3) {
        self.front = front;
        self.right = self.front.cross(self.camera.up).normalize();
        self.camera.up = self.right.cross(self.front).normalize();
        self.camera.target = self.camera.eye + self.front * LOOK_AHEAD;
    }

    /// Project a cursor position onto the virtual unit trackball:
    /// `z = sqrt(1 - x² - y²)` inside the unit disk, nearest edge point
    /// outside it.
    fn trackball_vector(position: Vec2, viewport: Vec2) -> Vec3 {
        let mut p = Vec3::new(
            2.0 * position.x / viewport.x - 1.0,
            // Screen and world y run in opposite directions.
            -(2.0 * position.y / viewport.y - 1.0),
            0.0,
        );
        let mag2 = p.x * p.x + p.y * p.y;
        if mag2 <= 1.0 {
            p.z = (1.0 - mag2).sqrt();
            p
        } else {
            p.normalize()
        }
    }

    /// Current eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.camera.eye
    }

    /// Current front vector.
    #[must_use]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Current up vector.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.camera.up
    }

    /// Current right vector.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    /// Current pitch in degrees.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current yaw in degrees.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current fly speed in world units per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether either drag button is currently held.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.primary_pressed || self.secondary_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn controller() -> CameraController {
        CameraController::new(
            &CameraOptions::default(),
            Vec2::new(1920.0, 1080.0),
        )
    }

    fn assert_orthonormal(c: &CameraController) {
        assert!((c.front().length() - 1.0).abs() < EPS);
        assert!((c.up().length() - 1.0).abs() < EPS);
        assert!((c.right().length() - 1.0).abs() < EPS);
        assert!(c.front().dot(c.up()).abs() < EPS);
        assert!(c.front().dot(c.right()).abs() < EPS);
        assert!(c.up().dot(c.right()).abs() < EPS);
    }

    #[test]
    fn initial_pose_looks_at_origin() {
        let c = controller();
        assert!((c.front() - Vec3::new(0.0, 0.0, -1.0)).length() < EPS);
        assert!((c.yaw() - -90.0).abs() < EPS);
        assert!(c.pitch().abs() < EPS);
        assert_orthonormal(&c);
    }

    #[test]
    fn fly_moves_along_local_axes() {
        let mut c = controller();
        let eye = c.eye();
        c.fly(FlyDirection::Forward, 0.5);
        let expected = eye + c.front() * c.speed() * 0.5;
        assert!((c.eye() - expected).length() < EPS);

        c.fly(FlyDirection::Left, 0.25);
        c.fly(FlyDirection::Up, 0.25);
        assert_orthonormal(&c);
    }

    #[test]
    fn pitch_stays_clamped_under_large_look_input() {
        let mut c = controller();
        c.set_button(MouseButton::Right, true);
        let _ = c.cursor_moved(Vec2::new(0.0, 0.0));
        // Drag far downward on screen => pitch up, way past the limit.
        for i in 1..=50 {
            let _ = c.cursor_moved(Vec2::new(0.0, -100.0 * i as f32));
        }
        assert!(c.pitch() <= PITCH_LIMIT);
        assert!(c.pitch() >= -PITCH_LIMIT);
        assert!((c.pitch() - PITCH_LIMIT).abs() < EPS);
        assert_orthonormal(&c);
    }

    #[test]
    fn first_motion_sample_is_reference_only() {
        let mut c = controller();
        let eye = c.eye();
        let front = c.front();
        c.set_button(MouseButton::Left, true);
        // A press followed by one (possibly far-away) sample must not move
        // the camera.
        assert!(!c.cursor_moved(Vec2::new(1900.0, 1000.0)));
        assert_eq!(c.eye(), eye);
        assert_eq!(c.front(), front);
    }

    #[test]
    fn arcball_preserves_distance_to_origin() {
        let mut c = controller();
        let radius = c.eye().length();
        c.set_button(MouseButton::Left, true);
        let _ = c.cursor_moved(Vec2::new(900.0, 500.0));
        for i in 0..20 {
            let _ = c.cursor_moved(Vec2::new(
                900.0 + 20.0 * i as f32,
                500.0 + 10.0 * i as f32,
            ));
        }
        assert!((c.eye().length() - radius).abs() < radius * 1e-3);
        assert_orthonormal(&c);
        // Still looking at the origin.
        assert!((c.front() - (-c.eye()).normalize()).length() < EPS);
    }

    #[test]
    fn arcball_with_coincident_samples_applies_no_rotation() {
        let mut c = controller();
        let eye = c.eye();
        c.set_button(MouseButton::Left, true);
        let _ = c.cursor_moved(Vec2::new(640.0, 360.0));
        assert!(!c.cursor_moved(Vec2::new(640.0, 360.0)));
        assert_eq!(c.eye(), eye);
        assert!(c.eye().is_finite());
        assert!(c.front().is_finite());
    }

    #[test]
    fn basis_survives_mixed_operation_sequences() {
        let mut c = controller();
        c.set_button(MouseButton::Left, true);
        let _ = c.cursor_moved(Vec2::new(400.0, 300.0));
        let _ = c.cursor_moved(Vec2::new(500.0, 350.0));
        c.set_button(MouseButton::Left, false);

        c.set_button(MouseButton::Right, true);
        let _ = c.cursor_moved(Vec2::new(500.0, 350.0));
        let _ = c.cursor_moved(Vec2::new(450.0, 420.0));
        c.set_button(MouseButton::Right, false);

        c.fly(FlyDirection::Backward, 0.1);
        c.fly(FlyDirection::Right, 0.1);
        assert_orthonormal(&c);
    }

    #[test]
    fn scroll_requires_secondary_button() {
        let mut c = controller();
        let speed = c.speed();
        c.scroll(1.0);
        c.scroll(-1.0);
        assert_eq!(c.speed(), speed);

        c.set_button(MouseButton::Right, true);
        c.scroll(1.0);
        assert_eq!(c.speed(), speed * 2.0);
        c.scroll(-1.0);
        assert_eq!(c.speed(), speed);
    }

    #[test]
    fn scroll_clamps_speed_to_bounds() {
        let mut c = controller();
        c.set_button(MouseButton::Right, true);
        for _ in 0..20 {
            c.scroll(1.0);
        }
        assert_eq!(c.speed(), SPEED_MAX);
        for _ in 0..20 {
            c.scroll(-1.0);
        }
        assert_eq!(c.speed(), SPEED_MIN);
    }

    #[test]
    fn trackball_projection_lands_on_the_unit_sphere() {
        let viewport = Vec2::new(800.0, 600.0);
        // Center of the screen maps to the sphere pole.
        let center =
            CameraController::trackball_vector(Vec2::new(400.0, 300.0), viewport);
        assert!((center - Vec3::Z).length() < EPS);
        // A corner is outside the disk and normalizes to the edge.
        let corner =
            CameraController::trackball_vector(Vec2::new(0.0, 0.0), viewport);
        assert!((corner.length() - 1.0).abs() < EPS);
        assert!(corner.z.abs() < EPS);
    }
}
