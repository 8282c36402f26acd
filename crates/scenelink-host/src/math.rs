//! Vector, rotator and quaternion math using the host's conventions.
//!
//! Rotators are in degrees (pitch about Y, yaw about Z, roll about X) and
//! convert to quaternions with the same formulas the host engine uses, so a
//! yaw of 90 rotates +X onto +Y.

use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

/// A 3D vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// The unit-scale vector.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Build a vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise product.
    pub fn scale_by(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise absolute value.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Cross product.
    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    /// Whether every component is within `tolerance` of `other`.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Euler rotation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotator {
    /// Rotation about the Y axis.
    pub pitch: f64,
    /// Rotation about the Z axis.
    pub yaw: f64,
    /// Rotation about the X axis.
    pub roll: f64,
}

impl Rotator {
    /// No rotation.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a rotator.
    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Convert to a unit quaternion.
    pub fn quaternion(self) -> Quat {
        let half = std::f64::consts::PI / 360.0;
        let (sp, cp) = (self.pitch % 360.0 * half).sin_cos();
        let (sy, cy) = (self.yaw % 360.0 * half).sin_cos();
        let (sr, cr) = (self.roll % 360.0 * half).sin_cos();
        Quat {
            x: cr * sp * sy - sr * cp * cy,
            y: -cr * sp * cy - sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
            w: cr * cp * cy + sr * sp * sy,
        }
    }

    /// Rotate a vector by this rotation.
    pub fn rotate_vector(self, v: Vector) -> Vector {
        self.quaternion().rotate_vector(v)
    }

    /// Whether every angle is within `tolerance` degrees of `other`.
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        angle_delta(self.pitch, other.pitch) <= tolerance
            && angle_delta(self.yaw, other.yaw) <= tolerance
            && angle_delta(self.roll, other.roll) <= tolerance
    }
}

impl Add for Rotator {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.pitch + o.pitch, self.yaw + o.yaw, self.roll + o.roll)
    }
}

impl AddAssign for Rotator {
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

fn angle_delta(a: f64, b: f64) -> f64 {
    normalize_axis(a - b).abs()
}

/// Wrap an angle into `(-180, 180]`.
pub fn normalize_axis(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a < 0.0 {
        a += 360.0;
    }
    if a > 180.0 { a - 360.0 } else { a }
}

/// Unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// W component.
    pub w: f64,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Convert back to Euler degrees.
    pub fn rotator(self) -> Rotator {
        const SINGULARITY_THRESHOLD: f64 = 0.499_999_5;
        let rad_to_deg = 180.0 / std::f64::consts::PI;

        let Self { x, y, z, w } = self;
        let singularity = z * x - w * y;
        let yaw_y = 2.0 * (w * z + x * y);
        let yaw_x = 1.0 - 2.0 * (y * y + z * z);
        let yaw = yaw_y.atan2(yaw_x) * rad_to_deg;

        if singularity < -SINGULARITY_THRESHOLD {
            Rotator::new(-90.0, yaw, normalize_axis(-yaw - 2.0 * x.atan2(w) * rad_to_deg))
        } else if singularity > SINGULARITY_THRESHOLD {
            Rotator::new(90.0, yaw, normalize_axis(yaw - 2.0 * x.atan2(w) * rad_to_deg))
        } else {
            let pitch = (2.0 * singularity).asin() * rad_to_deg;
            let roll =
                (-2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y)) * rad_to_deg;
            Rotator::new(pitch, yaw, roll)
        }
    }

    /// Rotate a vector.
    pub fn rotate_vector(self, v: Vector) -> Vector {
        let q = Vector::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }
}

impl Mul for Quat {
    type Output = Self;
    /// `self * o` applies `o` first, then `self`.
    fn mul(self, o: Self) -> Self {
        Self {
            x: self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            y: self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            z: self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
            w: self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
        }
    }
}

/// Location, rotation and scale of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World location.
    pub location: Vector,
    /// World rotation.
    pub rotation: Rotator,
    /// Per-axis scale.
    pub scale: Vector,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vector::ZERO,
            rotation: Rotator::ZERO,
            scale: Vector::ONE,
        }
    }
}

/// Floating point RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearColor {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl LinearColor {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn yaw_90_rotates_x_onto_y() {
        let rotated = Rotator::new(0.0, 90.0, 0.0).rotate_vector(Vector::new(100.0, 0.0, 0.0));
        assert!(rotated.approx_eq(Vector::new(0.0, 100.0, 0.0), 1e-9), "{rotated:?}");
    }

    #[test]
    fn pitch_90_rotates_x_onto_z() {
        let rotated = Rotator::new(90.0, 0.0, 0.0).rotate_vector(Vector::new(100.0, 0.0, 0.0));
        assert!(rotated.approx_eq(Vector::new(0.0, 0.0, 100.0), 1e-9), "{rotated:?}");
    }

    #[test]
    fn identity_quaternion() {
        let q = Rotator::ZERO.quaternion();
        assert!((q.w - 1.0).abs() < EPS);
        assert!(q.x.abs() < EPS && q.y.abs() < EPS && q.z.abs() < EPS);
    }

    #[test]
    fn composing_yaws_adds_them() {
        let q = Rotator::new(0.0, 30.0, 0.0).quaternion() * Rotator::new(0.0, 45.0, 0.0).quaternion();
        assert!(q.rotator().approx_eq(Rotator::new(0.0, 75.0, 0.0), 1e-6));
    }

    #[test]
    fn gimbal_lock_pitch_is_clamped() {
        let r = Rotator::new(90.0, 0.0, 0.0).quaternion().rotator();
        assert!((r.pitch - 90.0).abs() < 1e-3, "{r:?}");
    }

    #[test]
    fn normalize_axis_wraps() {
        assert!((normalize_axis(270.0) + 90.0).abs() < EPS);
        assert!((normalize_axis(-190.0) - 170.0).abs() < EPS);
        assert!((normalize_axis(180.0) - 180.0).abs() < EPS);
    }

    #[test]
    fn vector_ops() {
        let v = Vector::new(1.0, -2.0, 3.0);
        assert_eq!(v.abs(), Vector::new(1.0, 2.0, 3.0));
        assert_eq!(v.scale_by(Vector::new(2.0, 2.0, 0.0)), Vector::new(2.0, -4.0, 0.0));
        assert_eq!(v + Vector::ONE, Vector::new(2.0, -1.0, 4.0));
    }

    proptest! {
        #[test]
        fn rotator_quat_round_trip(
            pitch in -89.0f64..89.0,
            yaw in -179.0f64..179.0,
            roll in -179.0f64..179.0,
        ) {
            let r = Rotator::new(pitch, yaw, roll);
            let back = r.quaternion().rotator();
            prop_assert!(back.approx_eq(r, 1e-6), "{r:?} -> {back:?}");
        }

        #[test]
        fn rotation_preserves_length(
            yaw in -360.0f64..360.0,
            pitch in -80.0f64..80.0,
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
        ) {
            let v = Vector::new(x, y, 5.0);
            let out = Rotator::new(pitch, yaw, 0.0).rotate_vector(v);
            let len = |v: Vector| (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();
            prop_assert!((len(v) - len(out)).abs() < 1e-6);
        }
    }
}
