//! Analytic gravitational potential models.
//!
//! Every model is immutable once constructed and evaluates pure quantities
//! at a Cartesian point: the potential, the local density, the potential
//! gradient, and the packed second-derivative matrix. The models here are
//! all spherically symmetric, so the Cartesian derivatives derive from the
//! radial profile through [`SphericalPotential`]; a [`Composite`] sums an
//! arbitrary list of components.
//!
//! Units follow the workspace convention: kpc, km/s, and solar masses, with
//! the gravitational constant from `galax_core`. Potentials are in (km/s)²
//! and densities in Msun/kpc³.

use galax_core::constants::G;
use galax_coords::PosCar;
use thiserror::Error;

/// Errors surfaced when constructing a model from parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("mass must be non-negative (got {0})")]
    NegativeMass(f64),
    #[error("scale radius must be positive (got {0})")]
    NonPositiveScaleRadius(f64),
}

/// A gravitational model evaluated at Cartesian points.
///
/// Implementations must be pure: evaluation never mutates the model, which
/// makes a shared reference safe to use from any number of concurrent
/// evaluation loops.
pub trait PotentialModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Potential Φ at the point, (km/s)².
    fn value(&self, pos: &PosCar) -> f64;

    /// Local mass density, Msun/kpc³.
    fn density(&self, pos: &PosCar) -> f64;

    /// Gradient (dΦ/dx, dΦ/dy, dΦ/dz).
    fn gradient(&self, pos: &PosCar) -> [f64; 3];

    /// Second derivatives of Φ packed as (xx, yy, zz, xy, yz, xz).
    fn hessian(&self, pos: &PosCar) -> [f64; 6];
}

/// Radial profile of a spherically symmetric model.
///
/// Implementors provide Φ(r) and its first two radial derivatives plus the
/// density profile; the Cartesian quantities of [`PotentialModel`] follow
/// generically.
pub trait SphericalPotential: Send + Sync {
    fn label(&self) -> &'static str;

    /// Φ(r), (km/s)².
    fn value_r(&self, r: f64) -> f64;

    /// dΦ/dr.
    fn derivative_r(&self, r: f64) -> f64;

    /// d²Φ/dr².
    fn second_derivative_r(&self, r: f64) -> f64;

    /// ρ(r), Msun/kpc³.
    fn density_r(&self, r: f64) -> f64;
}

impl<T: SphericalPotential> PotentialModel for T {
    fn name(&self) -> &'static str {
        self.label()
    }

    fn value(&self, pos: &PosCar) -> f64 {
        self.value_r(radius(pos))
    }

    fn density(&self, pos: &PosCar) -> f64 {
        self.density_r(radius(pos))
    }

    fn gradient(&self, pos: &PosCar) -> [f64; 3] {
        let r = radius(pos);
        if r == 0.0 {
            // the radial direction is undefined at the origin; the gradient
            // of a regular spherical profile vanishes there
            return [0.0; 3];
        }
        let slope = self.derivative_r(r) / r;
        [slope * pos.x, slope * pos.y, slope * pos.z]
    }

    fn hessian(&self, pos: &PosCar) -> [f64; 6] {
        let r = radius(pos);
        if r == 0.0 {
            let curvature = self.second_derivative_r(0.0);
            return [curvature, curvature, curvature, 0.0, 0.0, 0.0];
        }
        let n = [pos.x / r, pos.y / r, pos.z / r];
        let d2 = self.second_derivative_r(r);
        let slope = self.derivative_r(r) / r;
        let radial = d2 - slope;
        [
            radial * n[0] * n[0] + slope,
            radial * n[1] * n[1] + slope,
            radial * n[2] * n[2] + slope,
            radial * n[0] * n[1],
            radial * n[1] * n[2],
            radial * n[0] * n[2],
        ]
    }
}

fn radius(pos: &PosCar) -> f64 {
    (pos.x * pos.x + pos.y * pos.y + pos.z * pos.z).sqrt()
}

/// Keplerian point mass. Singular at the origin.
#[derive(Debug, Clone)]
pub struct PointMass {
    mass: f64,
}

impl PointMass {
    pub fn new(mass: f64) -> Result<Self, ModelError> {
        if mass < 0.0 {
            return Err(ModelError::NegativeMass(mass));
        }
        Ok(Self { mass })
    }
}

impl SphericalPotential for PointMass {
    fn label(&self) -> &'static str {
        "PointMass"
    }

    fn value_r(&self, r: f64) -> f64 {
        -G * self.mass / r
    }

    fn derivative_r(&self, r: f64) -> f64 {
        G * self.mass / (r * r)
    }

    fn second_derivative_r(&self, r: f64) -> f64 {
        -2.0 * G * self.mass / (r * r * r)
    }

    fn density_r(&self, _r: f64) -> f64 {
        0.0
    }
}

/// Plummer sphere with scale radius `b`:  Φ(r) = −GM / √(r² + b²).
#[derive(Debug, Clone)]
pub struct Plummer {
    mass: f64,
    scale_radius: f64,
}

impl Plummer {
    pub fn new(mass: f64, scale_radius: f64) -> Result<Self, ModelError> {
        if mass < 0.0 {
            return Err(ModelError::NegativeMass(mass));
        }
        if scale_radius <= 0.0 {
            return Err(ModelError::NonPositiveScaleRadius(scale_radius));
        }
        Ok(Self { mass, scale_radius })
    }
}

impl SphericalPotential for Plummer {
    fn label(&self) -> &'static str {
        "Plummer"
    }

    fn value_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        -G * self.mass / (r * r + b * b).sqrt()
    }

    fn derivative_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let s2 = r * r + b * b;
        G * self.mass * r / (s2 * s2.sqrt())
    }

    fn second_derivative_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let s2 = r * r + b * b;
        G * self.mass * (s2 - 3.0 * r * r) / (s2 * s2 * s2.sqrt())
    }

    fn density_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let s2 = r * r + b * b;
        3.0 * self.mass * b * b / (4.0 * std::f64::consts::PI * s2 * s2 * s2.sqrt())
    }
}

/// Isochrone sphere:  Φ(r) = −GM / (b + √(b² + r²)).
#[derive(Debug, Clone)]
pub struct Isochrone {
    mass: f64,
    scale_radius: f64,
}

impl Isochrone {
    pub fn new(mass: f64, scale_radius: f64) -> Result<Self, ModelError> {
        if mass < 0.0 {
            return Err(ModelError::NegativeMass(mass));
        }
        if scale_radius <= 0.0 {
            return Err(ModelError::NonPositiveScaleRadius(scale_radius));
        }
        Ok(Self { mass, scale_radius })
    }
}

impl SphericalPotential for Isochrone {
    fn label(&self) -> &'static str {
        "Isochrone"
    }

    fn value_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let a = (b * b + r * r).sqrt();
        -G * self.mass / (b + a)
    }

    fn derivative_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let a = (b * b + r * r).sqrt();
        let ba = b + a;
        G * self.mass * r / (a * ba * ba)
    }

    fn second_derivative_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let a = (b * b + r * r).sqrt();
        let ba = b + a;
        G * self.mass * (a * a * ba - r * r * (b + 3.0 * a)) / (a * a * a * ba * ba * ba)
    }

    fn density_r(&self, r: f64) -> f64 {
        let b = self.scale_radius;
        let a = (b * b + r * r).sqrt();
        let ba = b + a;
        self.mass * (3.0 * a * a * ba - r * r * (b + 3.0 * a))
            / (4.0 * std::f64::consts::PI * a * a * a * ba * ba * ba)
    }
}

/// Sum of an owned list of component models.
pub struct Composite {
    components: Vec<Box<dyn PotentialModel>>,
}

impl Composite {
    pub fn new(components: Vec<Box<dyn PotentialModel>>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> usize {
        self.components.len()
    }
}

impl PotentialModel for Composite {
    fn name(&self) -> &'static str {
        "Composite"
    }

    fn value(&self, pos: &PosCar) -> f64 {
        self.components.iter().map(|c| c.value(pos)).sum()
    }

    fn density(&self, pos: &PosCar) -> f64 {
        self.components.iter().map(|c| c.density(pos)).sum()
    }

    fn gradient(&self, pos: &PosCar) -> [f64; 3] {
        let mut total = [0.0; 3];
        for component in &self.components {
            let g = component.gradient(pos);
            for (slot, value) in total.iter_mut().zip(g) {
                *slot += value;
            }
        }
        total
    }

    fn hessian(&self, pos: &PosCar) -> [f64; 6] {
        let mut total = [0.0; 6];
        for component in &self.components {
            let h = component.hessian(pos);
            for (slot, value) in total.iter_mut().zip(h) {
                *slot += value;
            }
        }
        total
    }
}
