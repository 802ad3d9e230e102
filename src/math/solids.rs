//! Volumes and centroids of the solids the occlusion test cuts spheres into.

use super::geometry::{Point3, Projection};
use super::real::{Kernel, Real};

/// A mass concentrated at a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassPoint {
    pub mass: Real,
    pub centroid: Point3,
}

impl MassPoint {
    pub fn new(mass: Real, centroid: Point3) -> Self {
        Self { mass, centroid }
    }

    /// Combined mass at the mass-weighted centroid.
    pub fn join(&self, other: &MassPoint) -> MassPoint {
        let total = &self.mass + &other.mass;
        let weighted = &self.centroid.scale(&self.mass) + &other.centroid.scale(&other.mass);
        let centroid = Point3::new(
            &weighted.x / &total,
            &weighted.y / &total,
            &weighted.z / &total,
        );
        MassPoint::new(total, centroid)
    }
}

/// A uniform-density sphere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ball {
    pub center: Point3,
    pub radius: Real,
    pub density: Real,
    pub mass: Real,
}

impl Ball {
    pub fn new(kernel: &Kernel, center: Point3, radius: Real, density: Real) -> Self {
        let mass = sphere_volume(kernel, &radius) * &density;
        Self {
            center,
            radius,
            density,
            mass,
        }
    }

    pub fn mass_point(&self) -> MassPoint {
        MassPoint::new(self.mass.clone(), self.center.clone())
    }
}

pub fn sphere_volume(kernel: &Kernel, radius: &Real) -> Real {
    kernel.ratio(4, 3) * kernel.pi() * radius.pow(3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cap {
    pub volume: Real,
    /// Distance from the sphere's centre to the cap's centroid, towards the cap.
    pub centroid_offset: Real,
}

/// The piece of a sphere of `radius` cut off by a plane, where `height` is
/// measured from the plane to the sphere's surface (0 ≤ height ≤ 2·radius).
pub fn spherical_cap(kernel: &Kernel, radius: &Real, height: &Real) -> Cap {
    let three_r_minus_h = kernel.int(3) * radius - height;
    let volume = kernel.pi() * height.square() / kernel.int(3) * &three_r_minus_h;
    let centroid_offset = kernel.int(3) * (kernel.int(2) * radius - height).square()
        / (kernel.int(4) * &three_r_minus_h);
    Cap {
        volume,
        centroid_offset,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lens {
    pub volume: Real,
    /// Distance of the lens centre from the horizon centre, towards the body.
    pub centre_offset: Real,
    /// Radius of the sphere with the same volume as the lens.
    pub equivalent_radius: Real,
}

/// Intersection of a body sphere with the horizon sphere whose centres are
/// `distance` apart.
///
/// The centre offset is the one the rest of the model is calibrated against,
/// not the exact lens centroid. Coincident centres give the whole smaller
/// sphere.
pub fn sphere_sphere_lens(kernel: &Kernel, body_radius: &Real, horizon: &Real, distance: &Real) -> Lens {
    let (small, big) = if horizon > body_radius {
        (body_radius, horizon)
    } else {
        (horizon, body_radius)
    };

    if distance.is_zero() {
        let volume = sphere_volume(kernel, small);
        return Lens {
            volume,
            centre_offset: kernel.zero(),
            equivalent_radius: small.clone(),
        };
    }

    let three = kernel.int(3);
    let two_d = kernel.int(2) * distance;
    let volume = kernel.pi() * (big + small - distance).square()
        * (distance.square() + &two_d * small - &three * small.square() + &two_d * big
            + kernel.int(6) * small * big
            - &three * big.square())
        / (kernel.int(12) * distance);
    let equivalent_radius = (kernel.ratio(3, 4) * &volume / kernel.pi()).nth_root(3);
    let centre_offset = (distance.square() - small.square() + big.square()) / &two_d;

    Lens {
        volume,
        centre_offset,
        equivalent_radius,
    }
}

/// Which side of a plane is being kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// The side the plane's normal points to.
    Visible,
    Hidden,
}

/// How a plane divides a sphere, seen from the kept side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cut {
    /// The plane passes through the centre; half the mass is kept.
    Bisected,
    /// The centre lies on the kept side.
    Major,
    Minor,
}

/// Keeps the part of `ball` on one side of a plane that cuts it.
///
/// `projection` is the ball's centre projected onto the plane, and `normal` is
/// the plane's unit normal.
pub fn cut_straddling(
    kernel: &Kernel,
    ball: &Ball,
    projection: &Projection,
    normal: &Point3,
    keep: Half,
) -> (Cut, MassPoint) {
    let radius = &ball.radius;
    let radicand = radius.square() - projection.signed_distance.square();
    let circle_radius = radicand.max(kernel.zero()).sqrt();

    if circle_radius.equal_digits(radius) > kernel.half_precision() {
        let offset = kernel.ratio(3, 8) * radius;
        let offset = match keep {
            Half::Visible => offset,
            Half::Hidden => -offset,
        };
        let centroid = ball.center.translate(normal, &offset);
        return (
            Cut::Bisected,
            MassPoint::new(&ball.mass / kernel.int(2), centroid),
        );
    }

    let centre_kept = match keep {
        Half::Visible => projection.faces_normal,
        Half::Hidden => !projection.faces_normal,
    };
    let (cut, height) = if centre_kept {
        (Cut::Major, &projection.offset.magnitude + radius)
    } else {
        (Cut::Minor, radius - &projection.offset.magnitude)
    };

    let cap = spherical_cap(kernel, radius, &height);
    let offset = match cut {
        Cut::Minor => -cap.centroid_offset,
        _ => cap.centroid_offset,
    };
    let centroid = ball.center.translate(&projection.offset.unit, &offset);
    (cut, MassPoint::new(cap.volume * &ball.density, centroid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::Plane;

    fn kernel() -> Kernel {
        Kernel::new(50)
    }

    fn point(kernel: &Kernel, x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(kernel.int(x), kernel.int(y), kernel.int(z))
    }

    #[test]
    fn test_sphere_volume() {
        let k = kernel();
        let volume = sphere_volume(&k, &k.int(2));
        approx::assert_relative_eq!(
            volume.to_f64(),
            32.0 / 3.0 * std::f64::consts::PI,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_cap_extremes() {
        let k = kernel();
        let r = k.int(3);

        // A hemisphere: centroid at 3r/8
        let half = spherical_cap(&k, &r, &r);
        assert!(half.volume.equal_digits(&(sphere_volume(&k, &r) / k.int(2))) >= 48);
        assert_eq!(half.centroid_offset, k.ratio(9, 8));

        // The whole sphere: centroid at the centre
        let whole = spherical_cap(&k, &r, &k.int(6));
        assert!(whole.volume.equal_digits(&sphere_volume(&k, &r)) >= 48);
        assert!(whole.centroid_offset.is_zero());
    }

    #[test]
    fn test_cap_sizes_sum_to_sphere() {
        let k = kernel();
        let r = k.int(5);
        let minor = spherical_cap(&k, &r, &k.int(2));
        let major = spherical_cap(&k, &r, &k.int(8));
        let total = &minor.volume + &major.volume;
        assert!(total.equal_digits(&sphere_volume(&k, &r)) >= 48);

        // First moments balance about the centre
        let moment = &minor.volume * &minor.centroid_offset - &major.volume * &major.centroid_offset;
        assert!(moment.abs() < k.parse("1e-40").unwrap());
    }

    #[test]
    fn test_lens_volume() {
        let k = kernel();
        // Two unit spheres with centres one apart: V = 5π/12
        let lens = sphere_sphere_lens(&k, &k.int(1), &k.int(1), &k.int(1));
        approx::assert_relative_eq!(
            lens.volume.to_f64(),
            5.0 * std::f64::consts::PI / 12.0,
            max_relative = 1e-12
        );
        approx::assert_relative_eq!(lens.centre_offset.to_f64(), 0.5);
        approx::assert_relative_eq!(
            lens.equivalent_radius.to_f64(),
            (5.0f64 / 16.0).cbrt(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_lens_concentric() {
        let k = kernel();
        let lens = sphere_sphere_lens(&k, &k.int(2), &k.int(7), &k.zero());
        assert_eq!(lens.volume, sphere_volume(&k, &k.int(2)));
        assert_eq!(lens.equivalent_radius, k.int(2));
    }

    #[test]
    fn test_bisected_cut() {
        let k = kernel();
        let ball = Ball::new(&k, point(&k, 100, 0, 0), k.int(10), k.int(2));
        let normal = point(&k, 0, 1, 0);
        let plane = Plane::new(Point3::origin(&k), normal.clone());
        let projection = plane.project(&ball.center, k.half_precision());

        let (cut, visible) = cut_straddling(&k, &ball, &projection, &normal, Half::Visible);
        assert_eq!(cut, Cut::Bisected);
        assert_eq!(visible.mass, &ball.mass / k.int(2));
        assert_eq!(visible.centroid, Point3::new(k.int(100), k.ratio(15, 4), k.zero()));

        let (_, hidden) = cut_straddling(&k, &ball, &projection, &normal, Half::Hidden);
        assert_eq!(hidden.centroid, Point3::new(k.int(100), k.ratio(-15, 4), k.zero()));
    }

    #[test]
    fn test_halves_are_complementary() {
        let k = kernel();
        let ball = Ball::new(&k, point(&k, 7, 4, 0), k.int(10), k.int(3));
        let normal = point(&k, 0, 1, 0);
        let plane = Plane::new(Point3::origin(&k), normal.clone());
        let projection = plane.project(&ball.center, k.half_precision());

        let (visible_cut, visible) = cut_straddling(&k, &ball, &projection, &normal, Half::Visible);
        let (hidden_cut, hidden) = cut_straddling(&k, &ball, &projection, &normal, Half::Hidden);
        assert_eq!(visible_cut, Cut::Major);
        assert_eq!(hidden_cut, Cut::Minor);

        // Putting the halves back together recovers the whole ball
        let whole = visible.join(&hidden);
        assert!(whole.mass.equal_digits(&ball.mass) >= 45);
        assert!(whole.centroid.approx_eq(&ball.center, 40));
        assert!(visible.centroid.y > ball.center.y);
        assert!(hidden.centroid.y < k.zero());
    }

    #[test]
    fn test_join() {
        let k = kernel();
        let a = MassPoint::new(k.int(1), point(&k, 0, 0, 0));
        let b = MassPoint::new(k.int(3), point(&k, 4, 8, 0));
        let joined = a.join(&b);
        assert_eq!(joined.mass, k.int(4));
        assert_eq!(joined.centroid, point(&k, 3, 6, 0));
    }
}
