use std::fmt;

use crate::math::{Point3, Real};
use crate::model::{Newtonian, Scene};
use crate::occlusion::PathTally;

use super::accumulator::Totals;

// Significant digits shown for high-precision values
const DIGITS: usize = 20;

/// The final result of a scan: mean pulls per evaluated cell.
#[derive(Debug, Clone)]
pub struct Summary {
    pub candidates: u64,
    /// Cells inside the object; the means are taken over these
    pub inside: u64,
    pub tightest_horizon: Real,
    pub mean_aggregate: Point3,
    pub mean_per_body: Vec<Point3>,
    /// Mean mass felt per cell, per body
    pub mean_mass: Vec<Real>,
    pub body_names: Vec<String>,
    pub body_masses: Vec<Real>,
    pub newton: Newtonian,
    pub paths: PathTally,
}

impl Summary {
    pub fn new(scene: &Scene, candidates: u64, totals: Totals) -> Self {
        let k = &scene.kernel;
        let inside = totals.completed;
        let mean = |total: &Real| {
            if inside == 0 {
                k.zero()
            } else {
                total / k.int(inside as i64)
            }
        };
        let mean_point = |total: &Point3| Point3::new(mean(&total.x), mean(&total.y), mean(&total.z));

        Self {
            candidates,
            inside,
            tightest_horizon: scene.tightest_horizon(),
            mean_aggregate: mean_point(&totals.aggregate),
            mean_per_body: totals.per_body.iter().map(&mean_point).collect(),
            mean_mass: totals.included_mass.iter().map(&mean).collect(),
            body_names: scene.bodies.iter().map(|body| body.name.clone()).collect(),
            body_masses: scene.bodies.iter().map(|body| body.mass().clone()).collect(),
            newton: scene.newtonian(),
            paths: totals.paths,
        }
    }

    /// Fraction of each body's mass felt by the average cell.
    pub fn mass_fraction(&self, body: usize) -> f64 {
        let mass = &self.body_masses[body];
        if mass.is_zero() {
            return 0.0;
        }
        (&self.mean_mass[body] / mass).to_f64()
    }

    /// |mean pull| / |Newtonian pull|
    pub fn pull_ratio(&self) -> f64 {
        let newton = self.newton.aggregate.to_vector3().norm();
        if newton == 0.0 {
            return 0.0;
        }
        self.mean_aggregate.to_vector3().norm() / newton
    }
}

struct Vector<'a>(&'a Point3);

impl fmt::Display for Vector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.*}, {:.*}, {:.*})",
            DIGITS, self.0.x, DIGITS, self.0.y, DIGITS, self.0.z
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cells inside the object: {} of {}", self.inside, self.candidates)?;
        writeln!(f, "Tightest horizon: {:.*} km", DIGITS, self.tightest_horizon)?;
        writeln!(f, "Overall mean pull (km/s^2):")?;
        writeln!(f, "  occluded:  {}", Vector(&self.mean_aggregate))?;
        writeln!(f, "  Newtonian: {}", Vector(&self.newton.aggregate))?;
        writeln!(f, "  ratio:     {:.9}", self.pull_ratio())?;
        for (i, name) in self.body_names.iter().enumerate() {
            writeln!(f, "{} mean pull (km/s^2):", name)?;
            writeln!(f, "  occluded:  {}", Vector(&self.mean_per_body[i]))?;
            writeln!(f, "  Newtonian: {}", Vector(&self.newton.per_body[i]))?;
            writeln!(f, "  mass felt: {:.6}%", self.mass_fraction(i) * 100.0)?;
        }
        writeln!(f, "Paths:")?;
        write!(f, "{}", self.paths)
    }
}
