pub mod collision_queries;

use glam::{vec2, Vec2};

pub trait AngleTo where Self: Copy {
    /// Angle of the vector pointing from `self` towards `target`, as `atan2(dy, dx)`.
    fn angle_to(self, target: Self) -> f32;
}

impl AngleTo for Vec2 {
    fn angle_to(self, target: Self) -> f32 {
        let delta = target - self;
        delta.y.atan2(delta.x)
    }
}

/// Unit vector for an angle measured from the +x axis.
pub fn direction_from_angle(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    vec2(cos, sin)
}

/// Unit vector a body's nose points at. Angle zero points to -y (screen up),
/// positive angles turn clockwise.
pub fn nose_direction(angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    vec2(sin, -cos)
}
