use nalgebra::Vector3;

use std::ops::{Add, Neg, Sub};

use super::real::{Kernel, Real};

/// A point (or free vector) in space, in kilometres.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point3 {
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Point3 {
    pub fn new(x: Real, y: Real, z: Real) -> Self {
        Self { x, y, z }
    }

    pub fn origin(kernel: &Kernel) -> Self {
        Self::new(kernel.zero(), kernel.zero(), kernel.zero())
    }

    pub fn scale(&self, factor: &Real) -> Point3 {
        Point3::new(&self.x * factor, &self.y * factor, &self.z * factor)
    }

    pub fn dot(&self, other: &Point3) -> Real {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    pub fn norm_squared(&self) -> Real {
        self.dot(self)
    }

    /// Moves `distance` along `direction`.
    pub fn translate(&self, direction: &Point3, distance: &Real) -> Point3 {
        self + &direction.scale(distance)
    }

    /// Componentwise agreement to at least `digits` significant digits.
    pub fn approx_eq(&self, other: &Point3, digits: u64) -> bool {
        self.x.equal_digits(&other.x) >= digits
            && self.y.equal_digits(&other.y) >= digits
            && self.z.equal_digits(&other.z) >= digits
    }

    /// Boundary inclusive.
    pub fn is_inside_sphere(&self, center: &Point3, radius_squared: &Real) -> bool {
        (self - center).norm_squared() <= *radius_squared
    }

    pub fn to_vector3(&self) -> Vector3<f64> {
        Vector3::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

impl Add<&Point3> for &Point3 {
    type Output = Point3;

    fn add(self, rhs: &Point3) -> Point3 {
        Point3::new(&self.x + &rhs.x, &self.y + &rhs.y, &self.z + &rhs.z)
    }
}

impl Sub<&Point3> for &Point3 {
    type Output = Point3;

    fn sub(self, rhs: &Point3) -> Point3 {
        Point3::new(&self.x - &rhs.x, &self.y - &rhs.y, &self.z - &rhs.z)
    }
}

impl Neg for &Point3 {
    type Output = Point3;

    fn neg(self) -> Point3 {
        Point3::new(-&self.x, -&self.y, -&self.z)
    }
}

/// The displacement between two points, split into length and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedVector {
    pub magnitude: Real,
    /// Unit length, or exactly zero when the magnitude is zero.
    pub unit: Point3,
}

impl DirectedVector {
    pub fn between(from: &Point3, to: &Point3) -> Self {
        Self::from_direction(to - from)
    }

    pub fn from_direction(direction: Point3) -> Self {
        let magnitude = direction.norm_squared().sqrt();
        let unit = if magnitude.is_zero() {
            let zero = Real::zero(magnitude.precision());
            Point3::new(zero.clone(), zero.clone(), zero)
        } else {
            Point3::new(
                &direction.x / &magnitude,
                &direction.y / &magnitude,
                &direction.z / &magnitude,
            )
        };
        Self { magnitude, unit }
    }
}

/// Where a sphere sits relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Wholly on the side the normal points to.
    Above,
    Below,
    Straddling,
}

#[derive(Debug, Clone)]
pub struct Plane {
    pub point: Point3,
    /// Must have unit length.
    pub normal: Point3,
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub signed_distance: Real,
    /// Foot of the perpendicular dropped onto the plane.
    pub foot: Point3,
    /// From the foot back to the projected point.
    pub offset: DirectedVector,
    /// Whether `offset` points along the normal, to the tolerance given to
    /// [Plane::project].
    pub faces_normal: bool,
}

impl Plane {
    pub fn new(point: Point3, normal: Point3) -> Self {
        Self { point, normal }
    }

    pub fn project(&self, p: &Point3, digits: u64) -> Projection {
        let signed_distance = self.normal.dot(p) - self.normal.dot(&self.point);
        let foot = p.translate(&self.normal, &-&signed_distance);
        let offset = DirectedVector::between(&foot, p);
        let faces_normal = offset.unit.approx_eq(&self.normal, digits);
        Projection {
            signed_distance,
            foot,
            offset,
            faces_normal,
        }
    }
}

impl Projection {
    pub fn distance(&self) -> Real {
        self.signed_distance.abs()
    }

    /// Classifies a sphere of the given radius centred on the projected point.
    /// Tangent spheres count as wholly on one side.
    pub fn side(&self, radius: &Real) -> Side {
        if *radius > self.distance() {
            Side::Straddling
        } else if self.faces_normal {
            Side::Above
        } else {
            Side::Below
        }
    }
}
