//! How much of a body one cell of the spinning object can still feel.
//!
//! A cell accelerating towards the axis has a horizon at c²/|a|, and a plane
//! through the cell, normal to its acceleration, splits space into the side it
//! accelerates towards (visible) and the side behind it. Mass behind the plane
//! counts only where it is within the horizon. [classify] works out which
//! part of a body survives, and where that part's centre of mass is.

mod path;

pub use path::{format_trace, Path, PathTally};

use crate::math::solids::{cut_straddling, sphere_sphere_lens};
use crate::math::{Ball, Cut, DirectedVector, Half, Kernel, MassPoint, Plane, Point3, Real, Side};
use crate::model::{Acceleration, Scene};

/// Everything about a cell that the classification needs.
#[derive(Debug, Clone)]
pub struct CellFrame {
    pub centroid: Point3,
    pub acceleration: Acceleration,
    pub horizon: Real,
}

impl CellFrame {
    pub fn new(scene: &Scene, centroid: Point3) -> Self {
        let acceleration = scene.object.acceleration_at(&centroid);
        let horizon = scene.horizon_for(&acceleration.magnitude);
        Self {
            centroid,
            acceleration,
            horizon,
        }
    }
}

/// The part of one body that one cell feels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// None when the body is hidden entirely.
    pub visible: Option<MassPoint>,
    pub outcome: Path,
    /// Intermediate branches, in the order they were taken.
    pub steps: Vec<Path>,
}

impl Contribution {
    fn direct(outcome: Path, visible: Option<MassPoint>) -> Self {
        Self {
            visible,
            outcome,
            steps: vec![],
        }
    }

    /// Every branch taken, ending with the outcome.
    pub fn trace(&self) -> Vec<Path> {
        let mut trace = self.steps.clone();
        trace.push(self.outcome);
        trace
    }
}

pub fn classify(kernel: &Kernel, frame: &CellFrame, body: &Ball) -> Contribution {
    let digits = kernel.half_precision();
    let normal = &frame.acceleration.direction;

    let sight = DirectedVector::between(&frame.centroid, &body.center);
    let inner_edge = &sight.magnitude - &body.radius;
    let outer_edge = &sight.magnitude + &body.radius;

    if frame.horizon >= outer_edge {
        return Contribution::direct(Path::InsideHorizon, Some(body.mass_point()));
    }

    let plane = Plane::new(frame.centroid.clone(), normal.clone());
    let projection = plane.project(&body.center, digits);
    let side = projection.side(&body.radius);
    if side == Side::Above {
        return Contribution::direct(Path::AbovePlane, Some(body.mass_point()));
    }

    if frame.horizon <= inner_edge {
        // Beyond the horizon; only the visible side of the plane counts
        if side == Side::Below {
            return Contribution::direct(Path::BelowPlane, None);
        }
        let (cut, cap) = cut_straddling(kernel, body, &projection, normal, Half::Visible);
        let path = match cut {
            Cut::Bisected => Path::CapBisected,
            Cut::Major => Path::CapMajor,
            Cut::Minor => Path::CapMinor,
        };
        return Contribution::direct(path, Some(cap));
    }

    // The body straddles the horizon. The part inside it is stood in for by a
    // sphere of the same volume at the lens centre.
    let lens = sphere_sphere_lens(kernel, &body.radius, &frame.horizon, &sight.magnitude);
    let lens_ball = Ball {
        center: frame.centroid.translate(&sight.unit, &lens.centre_offset),
        radius: lens.equivalent_radius,
        density: body.density.clone(),
        mass: lens.volume * &body.density,
    };
    if side == Side::Below {
        return Contribution::direct(Path::LensOnly, Some(lens_ball.mass_point()));
    }

    // Behind the plane only the lens counts; in front of it the whole cap does
    let lens_projection = plane.project(&lens_ball.center, digits);
    let (lens_path, hidden) = match lens_projection.side(&lens_ball.radius) {
        Side::Above => (Path::LensAbovePlane, None),
        Side::Below => (Path::LensBelowPlane, Some(lens_ball.mass_point())),
        Side::Straddling => {
            let (cut, part) = cut_straddling(kernel, &lens_ball, &lens_projection, normal, Half::Hidden);
            let path = match cut {
                Cut::Bisected => Path::LensBisected,
                Cut::Minor => Path::LensMinor,
                Cut::Major => Path::LensMajor,
            };
            (path, Some(part))
        }
    };

    let (cut, cap) = cut_straddling(kernel, body, &projection, normal, Half::Visible);
    let cap_path = match cut {
        Cut::Bisected => Path::SplitCapBisected,
        Cut::Major => Path::SplitCapMajor,
        Cut::Minor => Path::SplitCapMinor,
    };

    let steps = vec![lens_path, cap_path];
    match hidden {
        None => Contribution {
            visible: Some(cap),
            outcome: Path::CapOnly,
            steps,
        },
        Some(part) => Contribution {
            visible: Some(cap.join(&part)),
            outcome: Path::CapAndLens,
            steps,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel() -> Kernel {
        Kernel::new(50)
    }

    fn point(k: &Kernel, x: i64, y: i64, z: i64) -> Point3 {
        Point3::new(k.int(x), k.int(y), k.int(z))
    }

    // A cell at the origin accelerating along +y
    fn frame(k: &Kernel, horizon: i64) -> CellFrame {
        CellFrame {
            centroid: Point3::origin(k),
            acceleration: Acceleration {
                magnitude: k.int(1),
                direction: point(k, 0, 1, 0),
            },
            horizon: k.int(horizon),
        }
    }

    fn ball(k: &Kernel, x: i64, y: i64) -> Ball {
        Ball::new(k, point(k, x, y, 0), k.int(10), k.int(3))
    }

    #[test]
    fn test_inside_horizon() {
        let k = kernel();
        let body = ball(&k, 0, -100);
        let result = classify(&k, &frame(&k, 110), &body);
        assert_eq!(result.outcome, Path::InsideHorizon);
        assert_eq!(result.visible, Some(body.mass_point()));
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_whole_body_on_one_side() {
        let k = kernel();

        let above = ball(&k, 0, 100);
        let result = classify(&k, &frame(&k, 1), &above);
        assert_eq!(result.trace(), vec![Path::AbovePlane]);
        assert_eq!(result.visible, Some(above.mass_point()));

        // Tangent from above still counts as wholly above
        let tangent = ball(&k, 0, 10);
        assert_eq!(classify(&k, &frame(&k, 1), &tangent).outcome, Path::AbovePlane);

        let below = ball(&k, 0, -100);
        let result = classify(&k, &frame(&k, 1), &below);
        assert_eq!(result.outcome, Path::BelowPlane);
        assert_eq!(result.visible, None);
    }

    #[test]
    fn test_bisected_beyond_horizon() {
        let k = kernel();
        let body = ball(&k, 100, 0);
        let result = classify(&k, &frame(&k, 1), &body);
        assert_eq!(result.outcome, Path::CapBisected);

        let visible = result.visible.unwrap();
        assert_eq!(visible.mass, &body.mass / k.int(2));
        assert_eq!(visible.centroid, Point3::new(k.int(100), k.ratio(15, 4), k.zero()));
    }

    #[test]
    fn test_caps_beyond_horizon() {
        let k = kernel();
        let half = &ball(&k, 100, 0).mass / k.int(2);

        let mostly_above = ball(&k, 100, 5);
        let result = classify(&k, &frame(&k, 1), &mostly_above);
        assert_eq!(result.outcome, Path::CapMajor);
        let visible = result.visible.unwrap();
        assert!(visible.mass > half && visible.mass < mostly_above.mass);
        assert!(visible.centroid.y > k.int(5));

        let mostly_below = ball(&k, 100, -5);
        let result = classify(&k, &frame(&k, 1), &mostly_below);
        assert_eq!(result.outcome, Path::CapMinor);
        let visible = result.visible.unwrap();
        assert!(visible.mass < half);
        assert!(visible.centroid.y > k.zero());

        // The two caps are mirror images, so together they make one body
        let sum = &visible.mass + &classify(&k, &frame(&k, 1), &mostly_above).visible.unwrap().mass;
        assert!(sum.equal_digits(&mostly_above.mass) >= 45);
    }

    #[test]
    fn test_lens_only_below_plane() {
        let k = kernel();
        let body = ball(&k, 0, -100);
        let result = classify(&k, &frame(&k, 105), &body);
        assert_eq!(result.outcome, Path::LensOnly);

        let visible = result.visible.unwrap();
        assert!(visible.mass > k.zero() && visible.mass < body.mass);
        assert!(visible.centroid.y < k.int(-90));
    }

    #[test]
    fn test_split_evaluation() {
        let k = kernel();
        let body = ball(&k, 100, 5);
        let result = classify(&k, &frame(&k, 100), &body);
        assert_eq!(
            result.trace(),
            vec![Path::LensMinor, Path::SplitCapMajor, Path::CapAndLens]
        );

        // More than the cap alone, less than the whole body
        let cap = classify(&k, &frame(&k, 1), &body).visible.unwrap();
        let visible = result.visible.unwrap();
        assert!(visible.mass > cap.mass);
        assert!(visible.mass < body.mass);
    }

    #[test]
    fn test_split_bisected_on_both_sides() {
        let k = kernel();
        // Centre on the plane, and the horizon passing through the centre
        let body = ball(&k, 100, 0);
        let result = classify(&k, &frame(&k, 100), &body);
        assert_eq!(
            result.trace(),
            vec![Path::LensBisected, Path::SplitCapBisected, Path::CapAndLens]
        );

        let lens = sphere_sphere_lens(&k, &body.radius, &k.int(100), &k.int(100));
        let cap = MassPoint::new(
            &body.mass / k.int(2),
            Point3::new(k.int(100), k.ratio(3, 8) * &body.radius, k.zero()),
        );
        let hidden = MassPoint::new(
            lens.volume * &body.density / k.int(2),
            Point3::new(lens.centre_offset, -(k.ratio(3, 8) * &lens.equivalent_radius), k.zero()),
        );
        let expected = cap.join(&hidden);

        let visible = result.visible.unwrap();
        assert!(visible.mass.equal_digits(&expected.mass) >= 40);
        assert!(visible.centroid.approx_eq(&expected.centroid, 40));
        approx::assert_relative_eq!((&visible.mass / &body.mass).to_f64(), 0.740625, max_relative = 1e-12);
    }

    #[test]
    fn test_split_with_lens_above_plane() {
        let k = kernel();
        // Mostly above the plane, reaching only just into the horizon
        let body = ball(&k, 100, 8);
        let result = classify(&k, &frame(&k, 92), &body);
        assert_eq!(
            result.trace(),
            vec![Path::LensAbovePlane, Path::SplitCapMajor, Path::CapOnly]
        );
    }

    #[test]
    fn test_on_axis_sees_everything() {
        let config = crate::config::RunConfig::defaults(40);
        let scene = Scene::new(&config);
        let k = &scene.kernel;
        let cell = CellFrame::new(&scene, Point3::new(k.zero(), k.zero(), k.parse("0.0001").unwrap()));
        assert!(cell.acceleration.magnitude.is_zero());

        for body in &scene.bodies {
            let result = classify(k, &cell, &body.ball);
            assert_eq!(result.outcome, Path::InsideHorizon);
        }
    }

    #[test]
    fn test_idempotent() {
        let k = kernel();
        let body = ball(&k, 100, 5);
        let cell = frame(&k, 100);
        assert_eq!(classify(&k, &cell, &body), classify(&k, &cell, &body));
    }
}
