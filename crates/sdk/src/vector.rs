//! World-space vector
//!
//! Layout matches the engine's `Vector` (three packed `f32`), so values can be
//! passed by value straight into native functions.

use std::fmt;
use std::ops::{Add, Div, Sub};

/// A point or direction in map-world units
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    /// The origin
    pub const ZERO: Vector = Vector::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Vector) -> f32 {
        let d = *self - *other;
        (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
    }

    /// Per-axis average of two points
    pub fn midpoint(&self, other: &Vector) -> Vector {
        (*self + *other) / 2.0
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Div<f32> for Vector {
    type Output = Vector;

    fn div(self, rhs: f32) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector {
    fn from(v: [f32; 3]) -> Self {
        Vector::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_layout() {
        assert_eq!(std::mem::size_of::<Vector>(), 12);
        assert_eq!(std::mem::align_of::<Vector>(), 4);
    }

    #[test]
    fn test_distance() {
        let a = Vector::new(0.0, 0.0, 0.0);
        let b = Vector::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_midpoint() {
        let a = Vector::new(-100.0, 0.0, 50.0);
        let b = Vector::new(100.0, 200.0, 150.0);
        assert_eq!(a.midpoint(&b), Vector::new(0.0, 100.0, 100.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector::new(1.5, -2.0, 3.0).to_string(), "1.5 -2 3");
    }
}
