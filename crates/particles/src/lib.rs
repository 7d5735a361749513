//! Ordered sets of weighted point entities.
//!
//! A [`ParticleSet`] pairs each entity with a non-negative mass and keeps
//! insertion order. The entity type is any of the six point types from
//! `galax_coords`, so a set is homogeneous in both kind (position-only or
//! position+velocity) and coordinate frame.
//!
//! A set can be rebuilt in another representation wherever the conversion
//! table defines a strategy: across frames, and from position+velocity down
//! to position-only. The selection happens at compile time through the
//! `From` bound on the entity types; the reverse direction (synthesising a
//! velocity from a bare position) has no strategy and does not build:
//!
//! ```compile_fail
//! use galax_coords::{PosCar, PosVelSph};
//! use galax_particles::ParticleSet;
//!
//! let positions: ParticleSet<PosCar> = ParticleSet::new();
//! let _: ParticleSet<PosVelSph> = ParticleSet::from(&positions);
//! ```

use std::ops::Index;

use thiserror::Error;

/// Errors surfaced by particle-set mutation.
#[derive(Debug, Error, PartialEq)]
pub enum ParticleError {
    #[error("particle mass must be non-negative (got {0})")]
    NegativeMass(f64),
}

/// An entity paired with its mass.
pub type Particle<P> = (P, f64);

/// An ordered, homogeneous set of weighted point entities.
///
/// The set owns its storage; conversions build a new independent set and
/// never alias the source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSet<P> {
    data: Vec<Particle<P>>,
}

impl<P> Default for ParticleSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ParticleSet<P> {
    /// An empty set.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// An empty set with room for `capacity` particles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a particle. Rejects a negative mass and leaves the set
    /// untouched in that case.
    pub fn push(&mut self, point: P, mass: f64) -> Result<(), ParticleError> {
        if mass < 0.0 {
            return Err(ParticleError::NegativeMass(mass));
        }
        self.data.push((point, mass));
        Ok(())
    }

    /// The particle at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Particle<P>> {
        self.data.get(index)
    }

    /// The entity at `index`, mass discarded.
    pub fn point(&self, index: usize) -> Option<&P> {
        self.data.get(index).map(|(p, _)| p)
    }

    /// The mass at `index`.
    pub fn mass(&self, index: usize) -> Option<f64> {
        self.data.get(index).map(|(_, m)| *m)
    }

    /// Sum of all masses; 0 for an empty set. Recomputed on every call.
    pub fn total_mass(&self) -> f64 {
        self.data.iter().map(|(_, m)| m).sum()
    }

    /// Iterate over (entity, mass) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle<P>> {
        self.data.iter()
    }
}

impl<P> Index<usize> for ParticleSet<P> {
    type Output = Particle<P>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

/// Cross-representation construction: rebuild a set in another entity
/// representation, converting each entity through the compile-time table
/// and copying masses unchanged.
impl<SrcP, DstP> From<&ParticleSet<SrcP>> for ParticleSet<DstP>
where
    SrcP: Copy,
    DstP: From<SrcP>,
{
    fn from(src: &ParticleSet<SrcP>) -> Self {
        let mut out = ParticleSet::with_capacity(src.len());
        for (point, mass) in src.iter() {
            out.data.push((DstP::from(*point), *mass));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{ParticleError, ParticleSet};
    use approx::assert_relative_eq;
    use galax_coords::{PosCar, PosCyl, PosVelCar, PosVelSph};

    fn disc_sample() -> ParticleSet<PosVelCar> {
        let mut set = ParticleSet::new();
        set.push(PosVelCar::new(8.0, 0.0, 0.0, 0.0, 220.0, 0.0), 1.5)
            .unwrap();
        set.push(PosVelCar::new(0.0, 8.0, 0.1, -220.0, 0.0, 5.0), 2.5)
            .unwrap();
        set.push(PosVelCar::new(-4.0, 3.0, -0.2, 50.0, -180.0, 0.0), 0.0)
            .unwrap();
        set
    }

    #[test]
    fn push_and_access() {
        let set = disc_sample();
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert_eq!(set.mass(1), Some(2.5));
        assert_eq!(set.point(0).unwrap().x, 8.0);
        assert_eq!(set[2].1, 0.0);
        assert!(set.get(3).is_none());
    }

    #[test]
    fn total_mass_sums_and_handles_empty() {
        let set = disc_sample();
        assert_relative_eq!(set.total_mass(), 4.0);
        assert_eq!(ParticleSet::<PosCar>::new().total_mass(), 0.0);
    }

    #[test]
    fn negative_mass_is_rejected_and_set_unchanged() {
        let mut set = disc_sample();
        let err = set
            .push(PosVelCar::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0), -1.0)
            .unwrap_err();
        assert_eq!(err, ParticleError::NegativeMass(-1.0));
        assert_eq!(set.len(), 3);
        assert_relative_eq!(set.total_mass(), 4.0);
    }

    #[test]
    fn conversion_preserves_count_order_and_mass() {
        let set = disc_sample();
        let spherical: ParticleSet<PosVelSph> = ParticleSet::from(&set);
        assert_eq!(spherical.len(), set.len());
        assert_relative_eq!(spherical.total_mass(), set.total_mass(), max_relative = 1e-14);
        // order: the second particle sits at phi = pi/2
        assert_relative_eq!(
            spherical.point(1).unwrap().phi,
            std::f64::consts::FRAC_PI_2
        );
    }

    #[test]
    fn compound_conversion_changes_kind_and_frame_at_once() {
        let set = disc_sample();
        let flattened: ParticleSet<PosCyl> = ParticleSet::from(&set);
        assert_eq!(flattened.len(), 3);
        assert_relative_eq!(flattened.point(0).unwrap().r, 8.0);
        assert_relative_eq!(flattened.point(2).unwrap().r, 5.0);
        assert_relative_eq!(flattened.total_mass(), 4.0);
    }

    #[test]
    fn conversion_is_independent_of_the_source() {
        let mut set = disc_sample();
        let copy: ParticleSet<PosVelCar> = ParticleSet::from(&set);
        set.push(PosVelCar::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0), 9.0)
            .unwrap();
        assert_eq!(copy.len(), 3);
    }
}
