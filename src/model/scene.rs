use log::warn;

use crate::config::RunConfig;
use crate::math::{DirectedVector, Kernel, MassPoint, Point3, Real};

use super::body::{Body, BodyInfo};
use super::rotor::{horizon_distance, RotatingObject};

/// Gravitational pull on the object's centre with no occlusion at all.
#[derive(Debug, Clone)]
pub struct Newtonian {
    pub aggregate: Point3,
    pub per_body: Vec<Point3>,
    /// |per_body[i]|
    pub magnitudes: Vec<Real>,
}

/// Everything that stays fixed during a run: the spinning object, the bodies
/// pulling on it, and the physical constants.
///
/// The object sits at the origin and the bodies lie along the +x axis: the
/// Earth just touching the object, the Moon and the Sun beyond it at their
/// configured orbital distances from the Earth.
#[derive(Debug, Clone)]
pub struct Scene {
    pub kernel: Kernel,
    pub object: RotatingObject,
    pub bodies: Vec<Body>,
    pub gravitational_constant: Real,
    pub light_speed_squared: Real,
    horizon_fallback: Real,
}

impl Scene {
    pub fn new(config: &RunConfig) -> Self {
        let kernel = config.kernel.clone();
        let k = &kernel;

        if !config.moon_orbit.rotation.is_zero() || !config.earth_orbit.rotation.is_zero() {
            warn!("orbital rotation is not modelled; the bodies stay in a line along +x");
        }

        let object = RotatingObject::new(
            k,
            Point3::origin(k),
            config.object_radius.clone(),
            &config.rpm,
        );

        let on_axis = |x: Real| Point3::new(x, k.zero(), k.zero());
        let earth_x = &config.earth.mean_radius + &config.object_radius;
        let moon_x = &earth_x + &config.moon_orbit.distance();
        let sun_x = &earth_x + &config.earth_orbit.distance();

        let layout = [
            ("Earth", &config.earth, earth_x),
            ("Moon", &config.moon, moon_x),
            ("Sun", &config.sun, sun_x),
        ];
        let bodies: Vec<Body> = layout
            .into_iter()
            .map(|(name, settings, x)| {
                let info = BodyInfo {
                    name: name.to_string(),
                    mean_radius: settings.mean_radius.clone(),
                    density: settings.density.clone(),
                };
                Body::new(k, info, on_axis(x))
            })
            .collect();

        // Far enough out that every body is inside the horizon
        let farthest = bodies
            .iter()
            .map(|body| DirectedVector::between(&object.center, body.center()).magnitude + body.radius())
            .max()
            .unwrap_or_else(|| k.zero());
        let horizon_fallback = config
            .earth_orbit
            .range
            .far
            .square()
            .max(k.int(2) * farthest);

        Self {
            object,
            bodies,
            gravitational_constant: config.gravitational_constant.clone(),
            light_speed_squared: config.light_speed.square(),
            horizon_fallback,
            kernel,
        }
    }

    pub fn horizon_fallback(&self) -> &Real {
        &self.horizon_fallback
    }

    /// Horizon distance for an observer with acceleration of `magnitude`.
    pub fn horizon_for(&self, magnitude: &Real) -> Real {
        horizon_distance(&self.light_speed_squared, magnitude, &self.horizon_fallback)
    }

    /// The horizon seen from the rim, which is the closest anywhere.
    pub fn tightest_horizon(&self) -> Real {
        self.horizon_for(&self.object.rim_acceleration())
    }

    /// Acceleration at `from` due to a point mass. Zero if they coincide.
    pub fn pull(&self, from: &Point3, source: &MassPoint) -> Point3 {
        let line = DirectedVector::between(from, &source.centroid);
        if line.magnitude.is_zero() {
            return Point3::origin(&self.kernel);
        }
        let a = &self.gravitational_constant * &source.mass / line.magnitude.square();
        line.unit.scale(&a)
    }

    pub fn newtonian(&self) -> Newtonian {
        let per_body: Vec<Point3> = self
            .bodies
            .iter()
            .map(|body| self.pull(&self.object.center, &body.ball.mass_point()))
            .collect();
        let aggregate = per_body
            .iter()
            .fold(Point3::origin(&self.kernel), |sum, pull| &sum + pull);
        let magnitudes = per_body
            .iter()
            .map(|pull| pull.norm_squared().sqrt())
            .collect();
        Newtonian {
            aggregate,
            per_body,
            magnitudes,
        }
    }
}
