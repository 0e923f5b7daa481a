//! Pointer-driven avatar tilt

use glam::Vec2;

/// Pointer distance from the centre inside which avatars tilt
pub const TILT_RADIUS_PX: f32 = 300.0;
/// Tilt magnitude in degrees
pub const MAX_TILT_DEG: f32 = 10.0;

/// Axis-aligned element bounds in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Rotation around the X and Y axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Tilt {
    pub const NEUTRAL: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// CSS `transform` value
    pub fn to_css(&self) -> String {
        format!(
            "perspective(1000px) rotateX({:.2}deg) rotateY({:.2}deg)",
            self.rotate_x, self.rotate_y
        )
    }
}

/// Tilt toward the pointer when it is near the element
pub fn tilt_for(pointer: Vec2, rect: Rect) -> Tilt {
    let delta = pointer - rect.center();
    if delta.length() >= TILT_RADIUS_PX {
        return Tilt::NEUTRAL;
    }
    let angle = delta.y.atan2(delta.x);
    Tilt {
        rotate_x: -angle.cos() * MAX_TILT_DEG,
        rotate_y: angle.sin() * MAX_TILT_DEG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: Rect = Rect {
        origin: Vec2::new(100.0, 100.0),
        size: Vec2::new(200.0, 200.0),
    };

    #[test]
    fn test_far_pointer_resets() {
        let tilt = tilt_for(Vec2::new(1000.0, 1000.0), CARD);
        assert_eq!(tilt, Tilt::NEUTRAL);
        assert_eq!(
            tilt.to_css(),
            "perspective(1000px) rotateX(0.00deg) rotateY(0.00deg)"
        );
    }

    #[test]
    fn test_pointer_right_of_center() {
        let tilt = tilt_for(Vec2::new(300.0, 200.0), CARD);
        assert!((tilt.rotate_x + 10.0).abs() < 1e-4);
        assert!(tilt.rotate_y.abs() < 1e-4);
    }

    #[test]
    fn test_pointer_below_center() {
        let tilt = tilt_for(Vec2::new(200.0, 350.0), CARD);
        assert!(tilt.rotate_x.abs() < 1e-4);
        assert!((tilt.rotate_y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_radius_is_exclusive() {
        let tilt = tilt_for(Vec2::new(500.0, 200.0), CARD);
        assert_eq!(tilt, Tilt::NEUTRAL);
    }
}
