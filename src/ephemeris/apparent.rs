//! Apparent geocentric place: light time, solar light deflection and
//! annual aberration, reported as ICRF right ascension / declination.

use crate::ephemeris::spk::{SpkKernel, StateVector};
use crate::utils::error::Result;

pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Heliocentric gravitational constant, m^3/s^2.
const SUN_GM_M3_S2: f64 = 1.327_124_400_179_87e20;

pub const EARTH: i32 = 399;
pub const SUN: i32 = 10;

const LIGHT_TIME_ITERATIONS: usize = 10;
const LIGHT_TIME_TOLERANCE_S: f64 = 1e-9;

pub type Vec3 = [f64; 3];

fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: &Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaDec {
    pub ra_hours: f64,
    pub dec_degrees: f64,
}

/// Vector from the observer to the target as the light left it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Astrometric {
    pub position_km: Vec3,
    pub light_time_s: f64,
    /// Barycentric target position at the retarded time.
    pub target_ssb_km: Vec3,
}

pub fn light_time_corrected(
    kernel: &SpkKernel,
    target: i32,
    observer_ssb_km: &Vec3,
    epoch_tdb_s: f64,
) -> Result<Astrometric> {
    let mut light_time = 0.0;
    let mut target_ssb = kernel.state_relative_to_ssb(target, epoch_tdb_s)?.position_km;
    let mut position = sub(&target_ssb, observer_ssb_km);

    for _ in 0..LIGHT_TIME_ITERATIONS {
        let next = length(&position) / SPEED_OF_LIGHT_KM_S;
        if (next - light_time).abs() < LIGHT_TIME_TOLERANCE_S {
            break;
        }
        light_time = next;
        target_ssb = kernel
            .state_relative_to_ssb(target, epoch_tdb_s - light_time)?
            .position_km;
        position = sub(&target_ssb, observer_ssb_km);
    }

    Ok(Astrometric {
        position_km: position,
        light_time_s: light_time,
        target_ssb_km: target_ssb,
    })
}

/// Bends `position` (observer → target) for light passing the Sun.
pub fn deflect_by_sun(position: &Vec3, target_ssb: &Vec3, observer_ssb: &Vec3, sun_ssb: &Vec3) -> Vec3 {
    let pq = sub(target_ssb, sun_ssb);
    let pe = sub(observer_ssb, sun_ssb);

    let pmag = length(position);
    let qmag = length(&pq);
    let emag = length(&pe);
    if pmag == 0.0 || qmag == 0.0 || emag == 0.0 {
        return *position;
    }

    let phat = scale(position, 1.0 / pmag);
    let qhat = scale(&pq, 1.0 / qmag);
    let ehat = scale(&pe, 1.0 / emag);

    let pdotq = dot(&phat, &qhat);
    let qdote = dot(&qhat, &ehat);
    let edotp = dot(&ehat, &phat);

    // 目標在太陽正後方時不處理
    if edotp > 0.999_999_999_99 {
        return *position;
    }

    let fac1 = 2.0 * SUN_GM_M3_S2
        / (SPEED_OF_LIGHT_KM_S * SPEED_OF_LIGHT_KM_S * 1.0e6 * emag * 1.0e3);
    let fac2 = 1.0 + qdote;

    let mut out = *position;
    for i in 0..3 {
        out[i] += fac1 * (pdotq * ehat[i] - edotp * qhat[i]) / fac2 * pmag;
    }
    out
}

/// Relativistic annual aberration for an observer moving at `velocity_km_s`.
pub fn aberrate(position: &Vec3, velocity_km_s: &Vec3, light_time_s: f64) -> Vec3 {
    let pmag = length(position);
    let vmag = length(velocity_km_s);
    if pmag == 0.0 || vmag == 0.0 {
        return *position;
    }

    let beta = vmag / SPEED_OF_LIGHT_KM_S;
    let cosd = dot(position, velocity_km_s) / (pmag * vmag);
    let gamma_inv = (1.0 - beta * beta).sqrt();
    let p = beta * cosd;
    let q = (1.0 + p / (1.0 + gamma_inv)) * light_time_s;
    let r = 1.0 + p;

    let mut out = [0.0; 3];
    for i in 0..3 {
        out[i] = (gamma_inv * position[i] + q * velocity_km_s[i]) / r;
    }
    out
}

/// Right ascension in `[0, 24)` hours and declination in degrees.
pub fn to_radec(position: &Vec3) -> RaDec {
    let [x, y, z] = *position;
    let mut ra = y.atan2(x).to_degrees();
    if ra < 0.0 {
        ra += 360.0;
    }
    let dec = z.atan2((x * x + y * y).sqrt()).to_degrees();
    RaDec {
        ra_hours: ra / 15.0,
        dec_degrees: dec,
    }
}

/// Apparent RA/Dec of `target` seen from the geocenter at `epoch_tdb_s`.
pub fn apparent_radec(kernel: &SpkKernel, target: i32, epoch_tdb_s: f64) -> Result<RaDec> {
    let earth: StateVector = kernel.state_relative_to_ssb(EARTH, epoch_tdb_s)?;
    let astrometric = light_time_corrected(kernel, target, &earth.position_km, epoch_tdb_s)?;

    let position = if target == SUN {
        astrometric.position_km
    } else {
        let sun = kernel.state_relative_to_ssb(SUN, epoch_tdb_s)?;
        deflect_by_sun(
            &astrometric.position_km,
            &astrometric.target_ssb_km,
            &earth.position_km,
            &sun.position_km,
        )
    };

    let apparent = aberrate(&position, &earth.velocity_km_s, astrometric.light_time_s);
    Ok(to_radec(&apparent))
}
