//! Galaxy model evaluation toolkit.
//!
//! The member crates provide the building blocks: point entities and their
//! conversions, weighted particle sets, the batch-evaluation dispatcher,
//! analytic potential models, and configuration/export plumbing. This
//! facade crate binds a potential model to the batch operations behind
//! [`model::GalaxyModel`], so front-ends (CLI, future bindings) share one
//! entry point.

pub mod model;

pub use galax_batch as batch;
pub use galax_config as config;
pub use galax_coords as coords;
pub use galax_core::{constants, time, units, vector};
pub use galax_export as export;
pub use galax_particles as particles;
pub use galax_potential as potential;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
