use crate::math::{DirectedVector, Kernel, Point3, Real};

/// The test object: a solid sphere spinning about the z axis through its
/// centre.
#[derive(Debug, Clone)]
pub struct RotatingObject {
    pub center: Point3,
    pub radius: Real,
    pub rotations_per_second: Real,
    // 4π²·rate², so that |a| = factor·ρ
    factor: Real,
}

/// Centripetal acceleration of one point of the object, in km/s².
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceleration {
    pub magnitude: Real,
    /// Towards the axis, orthogonal to it. Zero on the axis.
    pub direction: Point3,
}

impl RotatingObject {
    pub fn new(kernel: &Kernel, center: Point3, radius: Real, rpm: &Real) -> Self {
        let rotations_per_second = rpm / kernel.int(60);
        let factor = kernel.int(4) * kernel.pi().square() * rotations_per_second.square();
        Self {
            center,
            radius,
            rotations_per_second,
            factor,
        }
    }

    pub fn factor(&self) -> &Real {
        &self.factor
    }

    pub fn acceleration_at(&self, p: &Point3) -> Acceleration {
        let relative = p - &self.center;
        let zero = Real::zero(relative.z.precision());
        let toward_axis = DirectedVector::from_direction(Point3::new(-&relative.x, -&relative.y, zero));
        Acceleration {
            magnitude: &toward_axis.magnitude * &self.factor,
            direction: toward_axis.unit,
        }
    }

    /// Acceleration at the rim, the largest anywhere on the object.
    pub fn rim_acceleration(&self) -> Real {
        &self.radius * &self.factor
    }
}

/// Distance to the horizon of an observer under the given acceleration:
/// c²/|a|, or `fallback` when there is no acceleration at all.
pub fn horizon_distance(light_speed_squared: &Real, acceleration: &Real, fallback: &Real) -> Real {
    if acceleration.is_zero() {
        fallback.clone()
    } else {
        light_speed_squared / acceleration
    }
}
