use crate::math::{Ball, Kernel, Point3, Real};

/// The distance range an orbit sweeps through, e.g. perigee to apogee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitalRange {
    pub near: Real,
    pub far: Real,
}

impl OrbitalRange {
    /// Linear interpolation; `position` 0 is the near end, 1 the far end.
    pub fn at(&self, position: &Real) -> Real {
        &self.near + (&self.far - &self.near) * position
    }
}

// All the configured info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub name: String,
    pub mean_radius: Real,
    pub density: Real,
}

/// A massive body, fixed in place for the whole run.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub ball: Ball,
}

impl Body {
    pub fn new(kernel: &Kernel, info: BodyInfo, center: Point3) -> Self {
        Self {
            name: info.name,
            ball: Ball::new(kernel, center, info.mean_radius, info.density),
        }
    }

    pub fn center(&self) -> &Point3 {
        &self.ball.center
    }

    pub fn radius(&self) -> &Real {
        &self.ball.radius
    }

    pub fn mass(&self) -> &Real {
        &self.ball.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::solids::sphere_volume;

    #[test]
    fn test_interpolation() {
        let k = Kernel::new(30);
        let range = OrbitalRange {
            near: k.int(363300),
            far: k.int(405500),
        };
        assert_eq!(range.at(&k.zero()), k.int(363300));
        assert_eq!(range.at(&k.int(1)), k.int(405500));
        assert_eq!(range.at(&k.ratio(1, 4)), k.int(373850));
    }

    #[test]
    fn test_mass() {
        let k = Kernel::new(60);
        let info = BodyInfo {
            name: "Moon".to_string(),
            mean_radius: k.parse("1737.4").unwrap(),
            density: k.parse("3344000000000").unwrap(),
        };
        let body = Body::new(&k, info, Point3::origin(&k));

        let expected = k.ratio(4, 3) * k.pi() * k.parse("1737.4").unwrap().pow(3) * k.int(3344000000000);
        assert_eq!(body.mass(), &expected);
        assert_eq!(body.mass(), &(sphere_volume(&k, body.radius()) * k.int(3344000000000)));
        approx::assert_relative_eq!(body.mass().to_f64(), 7.346057605083465e22, max_relative = 1e-12);
    }
}
