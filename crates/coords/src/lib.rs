//! Point entities in the three standard coordinate frames.
//!
//! Two kinds of entity exist: a bare position, and a position with velocity.
//! Each kind comes in Cartesian, cylindrical, and spherical flavours, giving
//! six concrete types. All of them are plain `Copy` values with no identity
//! beyond their components.
//!
//! Conventions: cylindrical `r` is the distance from the z-axis, spherical
//! `theta` is the polar angle measured from the +z axis, and `phi` is the
//! azimuth in both curvilinear frames. Positions are in kpc and velocities
//! in km/s by library convention; nothing here enforces units.

mod convert;

/// A position in Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosCar {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A position in cylindrical coordinates (r, z, phi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosCyl {
    pub r: f64,
    pub z: f64,
    pub phi: f64,
}

/// A position in spherical coordinates (r, theta, phi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosSph {
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
}

/// A position and velocity in Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosVelCar {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

/// A position and velocity in cylindrical coordinates.
///
/// `vr` is the radial velocity in the equatorial plane and `vphi` the
/// azimuthal velocity (not an angular rate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosVelCyl {
    pub r: f64,
    pub z: f64,
    pub phi: f64,
    pub vr: f64,
    pub vz: f64,
    pub vphi: f64,
}

/// A position and velocity in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosVelSph {
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
    pub vr: f64,
    pub vtheta: f64,
    pub vphi: f64,
}

impl PosCar {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl PosCyl {
    pub fn new(r: f64, z: f64, phi: f64) -> Self {
        Self { r, z, phi }
    }
}

impl PosSph {
    pub fn new(r: f64, theta: f64, phi: f64) -> Self {
        Self { r, theta, phi }
    }
}

impl PosVelCar {
    pub fn new(x: f64, y: f64, z: f64, vx: f64, vy: f64, vz: f64) -> Self {
        Self { x, y, z, vx, vy, vz }
    }

    /// The position component, velocity discarded.
    pub fn position(&self) -> PosCar {
        PosCar::new(self.x, self.y, self.z)
    }
}

impl PosVelCyl {
    pub fn new(r: f64, z: f64, phi: f64, vr: f64, vz: f64, vphi: f64) -> Self {
        Self { r, z, phi, vr, vz, vphi }
    }

    /// The position component, velocity discarded.
    pub fn position(&self) -> PosCyl {
        PosCyl::new(self.r, self.z, self.phi)
    }
}

impl PosVelSph {
    pub fn new(r: f64, theta: f64, phi: f64, vr: f64, vtheta: f64, vphi: f64) -> Self {
        Self { r, theta, phi, vr, vtheta, vphi }
    }

    /// The position component, velocity discarded.
    pub fn position(&self) -> PosSph {
        PosSph::new(self.r, self.theta, self.phi)
    }
}
