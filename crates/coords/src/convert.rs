//! The conversion table between point entities.
//!
//! Conversions are ordinary `From` impls, so they are selected from the
//! static types of source and destination and resolved entirely at compile
//! time. The table is closed: a position+velocity converts to any other
//! position+velocity or to any bare position (the velocity is dropped), and
//! a bare position converts to any other bare position. There is no impl
//! that manufactures a velocity out of a bare position, so requesting one
//! fails to build with an unsatisfied `From` bound:
//!
//! ```compile_fail
//! use galax_coords::{PosCar, PosVelCar};
//! let p = PosCar::new(1.0, 2.0, 3.0);
//! let _: PosVelCar = p.into();
//! ```
//!
//! On-axis inputs are well defined: where the azimuth (or polar angle)
//! degenerates, the basis follows the `atan2(0, 0) = 0` limit instead of
//! dividing by zero.

use crate::{PosCar, PosCyl, PosSph, PosVelCar, PosVelCyl, PosVelSph};

/// Unit vector of the azimuthal angle for a point at distance `r` from the
/// axis, `(cos phi, sin phi)`; the x-axis limit when `r` is zero.
fn azimuth_basis(x: f64, y: f64, r: f64) -> (f64, f64) {
    if r > 0.0 { (x / r, y / r) } else { (1.0, 0.0) }
}

// ---- positions, cross-frame ----

impl From<PosCar> for PosCyl {
    fn from(p: PosCar) -> Self {
        PosCyl::new(p.x.hypot(p.y), p.z, p.y.atan2(p.x))
    }
}

impl From<PosCyl> for PosCar {
    fn from(p: PosCyl) -> Self {
        let (cos_phi, sin_phi) = (p.phi.cos(), p.phi.sin());
        PosCar::new(p.r * cos_phi, p.r * sin_phi, p.z)
    }
}

impl From<PosCyl> for PosSph {
    fn from(p: PosCyl) -> Self {
        PosSph::new(p.r.hypot(p.z), p.r.atan2(p.z), p.phi)
    }
}

impl From<PosSph> for PosCyl {
    fn from(p: PosSph) -> Self {
        let (sin_th, cos_th) = (p.theta.sin(), p.theta.cos());
        PosCyl::new(p.r * sin_th, p.r * cos_th, p.phi)
    }
}

impl From<PosCar> for PosSph {
    fn from(p: PosCar) -> Self {
        PosSph::from(PosCyl::from(p))
    }
}

impl From<PosSph> for PosCar {
    fn from(p: PosSph) -> Self {
        PosCar::from(PosCyl::from(p))
    }
}

// ---- positions with velocities, cross-frame ----

impl From<PosVelCar> for PosVelCyl {
    fn from(p: PosVelCar) -> Self {
        let r = p.x.hypot(p.y);
        let (cos_phi, sin_phi) = azimuth_basis(p.x, p.y, r);
        PosVelCyl::new(
            r,
            p.z,
            p.y.atan2(p.x),
            p.vx * cos_phi + p.vy * sin_phi,
            p.vz,
            p.vy * cos_phi - p.vx * sin_phi,
        )
    }
}

impl From<PosVelCyl> for PosVelCar {
    fn from(p: PosVelCyl) -> Self {
        let (cos_phi, sin_phi) = (p.phi.cos(), p.phi.sin());
        PosVelCar::new(
            p.r * cos_phi,
            p.r * sin_phi,
            p.z,
            p.vr * cos_phi - p.vphi * sin_phi,
            p.vr * sin_phi + p.vphi * cos_phi,
            p.vz,
        )
    }
}

impl From<PosVelCyl> for PosVelSph {
    fn from(p: PosVelCyl) -> Self {
        let r = p.r.hypot(p.z);
        // (cos theta, sin theta) for theta = atan2(r, z), with the
        // polar-axis limit theta = 0 when r vanishes.
        let (cos_th, sin_th) = azimuth_basis(p.z, p.r, r);
        PosVelSph::new(
            r,
            p.r.atan2(p.z),
            p.phi,
            p.vr * sin_th + p.vz * cos_th,
            p.vr * cos_th - p.vz * sin_th,
            p.vphi,
        )
    }
}

impl From<PosVelSph> for PosVelCyl {
    fn from(p: PosVelSph) -> Self {
        let (sin_th, cos_th) = (p.theta.sin(), p.theta.cos());
        PosVelCyl::new(
            p.r * sin_th,
            p.r * cos_th,
            p.phi,
            p.vr * sin_th + p.vtheta * cos_th,
            p.vr * cos_th - p.vtheta * sin_th,
            p.vphi,
        )
    }
}

impl From<PosVelCar> for PosVelSph {
    fn from(p: PosVelCar) -> Self {
        PosVelSph::from(PosVelCyl::from(p))
    }
}

impl From<PosVelSph> for PosVelCar {
    fn from(p: PosVelSph) -> Self {
        PosVelCar::from(PosVelCyl::from(p))
    }
}

// ---- velocity-dropping conversions ----

impl From<PosVelCar> for PosCar {
    fn from(p: PosVelCar) -> Self {
        p.position()
    }
}

impl From<PosVelCar> for PosCyl {
    fn from(p: PosVelCar) -> Self {
        PosCyl::from(p.position())
    }
}

impl From<PosVelCar> for PosSph {
    fn from(p: PosVelCar) -> Self {
        PosSph::from(p.position())
    }
}

impl From<PosVelCyl> for PosCyl {
    fn from(p: PosVelCyl) -> Self {
        p.position()
    }
}

impl From<PosVelCyl> for PosCar {
    fn from(p: PosVelCyl) -> Self {
        PosCar::from(p.position())
    }
}

impl From<PosVelCyl> for PosSph {
    fn from(p: PosVelCyl) -> Self {
        PosSph::from(p.position())
    }
}

impl From<PosVelSph> for PosSph {
    fn from(p: PosVelSph) -> Self {
        p.position()
    }
}

impl From<PosVelSph> for PosCar {
    fn from(p: PosVelSph) -> Self {
        PosCar::from(p.position())
    }
}

impl From<PosVelSph> for PosCyl {
    fn from(p: PosVelSph) -> Self {
        PosCyl::from(p.position())
    }
}
