//! Plain vector math for the ground plane and the camera.
//!
//! World space is right-handed: the map lies on the `z = 0` ground plane with
//! `+y` pointing up the screen, and the camera hovers at positive `z` looking
//! down the `-z` axis.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::Deserialize;

/// Rays whose direction is this close to parallel with a plane never hit it.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// A point or offset on the ground plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Vec2 {
	/// East.
	pub x: f64,
	/// North.
	pub y: f64,
}

impl Vec2 {
	/// The origin, where the hub sits.
	pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

	/// Point from components.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Point at `distance` from the origin along `angle` (radians).
	pub fn from_polar(angle: f64, distance: f64) -> Self {
		Self::new(angle.cos() * distance, angle.sin() * distance)
	}

	/// Distance from the origin.
	pub fn length(self) -> f64 {
		self.x.hypot(self.y)
	}

	/// Euclidean distance.
	pub fn distance(self, other: Self) -> f64 {
		(self - other).length()
	}

	/// Unit vector in the same direction, or `None` for a zero-length vector.
	pub fn normalized(self) -> Option<Self> {
		let len = self.length();
		(len > f64::EPSILON).then(|| Self::new(self.x / len, self.y / len))
	}

	/// Lifts the point onto the plane at height `z`.
	pub fn with_z(self, z: f64) -> Vec3 {
		Vec3::new(self.x, self.y, z)
	}
}

impl Add for Vec2 {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Vec2 {
	fn add_assign(&mut self, rhs: Self) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Vec2 {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Self;

	fn mul(self, rhs: f64) -> Self {
		Self::new(self.x * rhs, self.y * rhs)
	}
}

impl Neg for Vec2 {
	type Output = Self;

	fn neg(self) -> Self {
		Self::new(-self.x, -self.y)
	}
}

/// A point or direction in 3D world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Vec3 {
	/// East.
	pub x: f64,
	/// North.
	pub y: f64,
	/// Height above the ground plane.
	pub z: f64,
}

impl Vec3 {
	/// Point from components.
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// Dot product.
	pub fn dot(self, other: Self) -> f64 {
		self.x * other.x + self.y * other.y + self.z * other.z
	}

	/// Euclidean norm.
	pub fn length(self) -> f64 {
		self.dot(self).sqrt()
	}

	/// Euclidean distance.
	pub fn distance(self, other: Self) -> f64 {
		(self - other).length()
	}

	/// Drops the height component.
	pub fn xy(self) -> Vec2 {
		Vec2::new(self.x, self.y)
	}

	/// Moves `t` of the way towards `target` (0.0 = stay, 1.0 = arrive).
	pub fn lerp(self, target: Self, t: f64) -> Self {
		self + (target - self) * t
	}
}

impl Add for Vec3 {
	type Output = Self;

	fn add(self, rhs: Self) -> Self {
		Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
	}
}

impl Sub for Vec3 {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self {
		Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
	}
}

impl Mul<f64> for Vec3 {
	type Output = Self;

	fn mul(self, rhs: f64) -> Self {
		Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
	}
}

/// A half-line cast from the camera into the scene.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
	/// Start point, usually the camera position.
	pub origin: Vec3,
	/// Not necessarily normalised.
	pub direction: Vec3,
}

impl Ray {
	/// Point at parameter `t`.
	pub fn at(&self, t: f64) -> Vec3 {
		self.origin + self.direction * t
	}

	/// Where the ray crosses the horizontal plane at height `z`.
	///
	/// Returns `None` when the ray runs parallel to the plane or the plane
	/// lies behind the origin.
	pub fn intersect_plane_z(&self, z: f64) -> Option<Vec2> {
		if self.direction.z.abs() < PARALLEL_EPSILON {
			return None;
		}
		let t = (z - self.origin.z) / self.direction.z;
		(t >= 0.0).then(|| self.at(t).xy())
	}

	/// Smallest non-negative ray parameter at which the ray enters the sphere.
	pub fn intersect_sphere(&self, center: Vec3, radius: f64) -> Option<f64> {
		let a = self.direction.dot(self.direction);
		if a < PARALLEL_EPSILON {
			return None;
		}
		let oc = self.origin - center;
		let b = oc.dot(self.direction);
		let c = oc.dot(oc) - radius * radius;
		let discriminant = b * b - a * c;
		if discriminant < 0.0 {
			return None;
		}
		let root = discriminant.sqrt();
		let near = (-b - root) / a;
		if near >= 0.0 {
			return Some(near);
		}
		let far = (-b + root) / a;
		(far >= 0.0).then_some(far)
	}
}
