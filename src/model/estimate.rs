//! Quick double-precision estimates of how fast the object must spin before
//! its horizon starts to swallow each body.

use nalgebra::Vector3;

use std::f64::consts::PI;

use super::scene::Scene;

/// Horizon distance seen from the rim of an object of `radius` km spinning
/// at `rpm`. Infinite when it isn't spinning.
pub fn rim_horizon(light_speed: f64, radius: f64, rpm: f64) -> f64 {
    let rate = rpm / 60.0;
    let acceleration = 4.0 * PI * PI * rate * rate * radius;
    if acceleration == 0.0 {
        f64::INFINITY
    } else {
        light_speed * light_speed / acceleration
    }
}

/// The inverse of [rim_horizon]: the spin that puts the rim's horizon at
/// `horizon` km.
pub fn rpm_for_horizon(light_speed: f64, radius: f64, horizon: f64) -> f64 {
    let rate = (light_speed * light_speed / (horizon * radius)).sqrt() / (2.0 * PI);
    rate * 60.0
}

#[derive(Debug, Clone)]
pub struct HidingEstimate {
    pub name: String,
    /// Distance from the object's centre to the body's centre
    pub distance: f64,
    /// Spin at which the horizon reaches the near edge, the centre and the far
    /// edge of the body, as seen from the rim.
    pub near_edge_rpm: f64,
    pub centre_rpm: f64,
    pub far_edge_rpm: f64,
}

pub fn hiding_estimates(scene: &Scene) -> Vec<HidingEstimate> {
    let light_speed = scene.light_speed_squared.to_f64().sqrt();
    let radius = scene.object.radius.to_f64();
    let origin: Vector3<f64> = scene.object.center.to_vector3();

    scene
        .bodies
        .iter()
        .map(|body| {
            let distance = (body.center().to_vector3() - origin).norm();
            let body_radius = body.radius().to_f64();
            let rpm_at = |horizon: f64| rpm_for_horizon(light_speed, radius, horizon);
            HidingEstimate {
                name: body.name.clone(),
                distance,
                near_edge_rpm: rpm_at(distance - body_radius),
                centre_rpm: rpm_at(distance),
                far_edge_rpm: rpm_at(distance + body_radius),
            }
        })
        .collect()
}
