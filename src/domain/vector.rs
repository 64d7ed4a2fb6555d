// 2D vector used for positions, orientations and velocities.

use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    /// Screen-space "up" (negative y), the orientation every ship spawns with.
    pub const UP: Vector2 = Vector2 { x: 0.0, y: -1.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Vector2> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Vector2::new(self.x / len, self.y / len))
    }

    /// Rotates clockwise (in screen space) by `degrees`.
    pub fn rotate(&mut self, degrees: f64) {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        let x = self.x * cos - self.y * sin;
        let y = self.x * sin + self.y * cos;
        self.x = x;
        self.y = y;
    }

    pub fn rotated(mut self, degrees: f64) -> Vector2 {
        self.rotate(degrees);
        self
    }

    /// Heading in degrees within (-180, 180], where `UP` is 0 and clockwise is positive.
    pub fn to_angle(self) -> f64 {
        let Some(unit) = self.normalized() else {
            return 0.0;
        };
        let theta = (-unit.y).clamp(-1.0, 1.0).acos().to_degrees();
        if unit.x < 0.0 { -theta } else { theta }
    }

    pub fn distance(self, other: Vector2) -> f64 {
        (self - other).length()
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}
