//! The evaluation facade: one potential model, many batch operations.
//!
//! Each public operation pairs the wrapped model with a fixed input arity
//! and output shape and hands the per-point computation to the batch
//! dispatcher, so callers pass a single point, a flat list of numbers, or
//! an N-row table interchangeably. The model is immutable for the duration
//! of every call.

use galax_batch::{EvalError, EvalInput, EvalOutput, InputArity, OutputShape, evaluate};
use galax_config::{ComponentConfig, ComponentModelConfig};
use galax_coords::{PosCar, PosVelCar, PosVelCyl};
use galax_core::vector;
use galax_potential::{Composite, Isochrone, ModelError, Plummer, PointMass, PotentialModel};
use thiserror::Error;

/// Errors surfaced when assembling a model from configuration.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("model catalog is empty")]
    EmptyCatalog,
    #[error("component '{name}' has an unsupported model type")]
    Unsupported { name: String },
    #[error("component '{name}' is invalid: {source}")]
    InvalidComponent {
        name: String,
        #[source]
        source: ModelError,
    },
}

/// A galaxy model bound to the batch-evaluation operations.
pub struct GalaxyModel {
    model: Box<dyn PotentialModel>,
}

impl std::fmt::Debug for GalaxyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalaxyModel")
            .field("model", &self.model.name())
            .finish()
    }
}

impl GalaxyModel {
    pub fn new(model: Box<dyn PotentialModel>) -> Self {
        Self { model }
    }

    /// Build the runtime model from parsed configuration components.
    ///
    /// A single component is used directly; several are summed into a
    /// composite. Unsupported or invalid components are rejected here, not
    /// at parse time.
    pub fn from_components(components: &[ComponentConfig]) -> Result<Self, BuildError> {
        if components.is_empty() {
            return Err(BuildError::EmptyCatalog);
        }
        let mut built: Vec<Box<dyn PotentialModel>> = Vec::with_capacity(components.len());
        for component in components {
            built.push(build_component(component)?);
        }
        let model: Box<dyn PotentialModel> = if built.len() == 1 {
            built.remove(0)
        } else {
            Box::new(Composite::new(built))
        };
        Ok(Self { model })
    }

    /// Name of the wrapped model.
    pub fn name(&self) -> &'static str {
        self.model.name()
    }

    /// Direct access to the wrapped model.
    pub fn potential_model(&self) -> &dyn PotentialModel {
        self.model.as_ref()
    }

    /// Potential Φ at (x, y, z). Scalar per point.
    pub fn potential(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            input,
            |point, out| {
                out[0] = self.model.value(&point_car(point));
                Ok(())
            },
        )
    }

    /// Mass density at (x, y, z). Scalar per point.
    pub fn density(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            input,
            |point, out| {
                out[0] = self.model.density(&point_car(point));
                Ok(())
            },
        )
    }

    /// Force per unit mass, −∇Φ, at (x, y, z). Triplet per point.
    pub fn force(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Triplet,
            OutputShape::Triplet,
            input,
            |point, out| {
                let grad = self.model.gradient(&point_car(point));
                for (slot, g) in out.iter_mut().zip(grad) {
                    *slot = -g;
                }
                Ok(())
            },
        )
    }

    /// Force and its derivatives at (x, y, z): a triplet (−∇Φ) and a
    /// sextet (−∂²Φ packed xx, yy, zz, xy, yz, xz), as two buffers.
    pub fn force_deriv(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Triplet,
            OutputShape::TripletSextet,
            input,
            |point, out| {
                let pos = point_car(point);
                let grad = self.model.gradient(&pos);
                let hess = self.model.hessian(&pos);
                for (slot, g) in out[..3].iter_mut().zip(grad) {
                    *slot = -g;
                }
                for (slot, h) in out[3..].iter_mut().zip(hess) {
                    *slot = -h;
                }
                Ok(())
            },
        )
    }

    /// Total specific energy Φ + |v|²/2 of a (position, velocity) point.
    /// Scalar per point.
    pub fn energy(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Sextet,
            OutputShape::Single,
            input,
            |point, out| {
                let pos = PosCar::new(point[0], point[1], point[2]);
                let kinetic =
                    0.5 * (point[3] * point[3] + point[4] * point[4] + point[5] * point[5]);
                out[0] = self.model.value(&pos) + kinetic;
                Ok(())
            },
        )
    }

    /// Specific angular momentum r × v of a (position, velocity) point.
    /// Triplet per point.
    pub fn angular_momentum(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Sextet,
            OutputShape::Triplet,
            input,
            |point, out| {
                let r = [point[0], point[1], point[2]];
                let v = [point[3], point[4], point[5]];
                out.copy_from_slice(&vector::cross(&r, &v));
                Ok(())
            },
        )
    }

    /// Rewrite a Cartesian (position, velocity) point in cylindrical
    /// components (r, z, phi, vr, vz, vphi). Sextet per point.
    pub fn to_cylindrical(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Sextet,
            OutputShape::Sextet,
            input,
            |point, out| {
                let cyl = PosVelCyl::from(PosVelCar::new(
                    point[0], point[1], point[2], point[3], point[4], point[5],
                ));
                out.copy_from_slice(&[cyl.r, cyl.z, cyl.phi, cyl.vr, cyl.vz, cyl.vphi]);
                Ok(())
            },
        )
    }

    /// Circular velocity at cylindrical radius r, sampled on the x-axis.
    /// Scalar per point.
    ///
    /// Off-domain input (negative radius, or an unbound force balance) is
    /// reported as a NaN sentinel for that point rather than aborting the
    /// batch; rows around it are still computed.
    pub fn circular_velocity(&self, input: EvalInput<'_>) -> Result<EvalOutput, EvalError> {
        evaluate(
            InputArity::Single,
            OutputShape::Single,
            input,
            |point, out| {
                let r = point[0];
                if r < 0.0 {
                    out[0] = f64::NAN;
                    return Ok(());
                }
                let grad = self.model.gradient(&PosCar::new(r, 0.0, 0.0));
                let vc2 = r * grad[0];
                out[0] = if vc2 >= 0.0 { vc2.sqrt() } else { f64::NAN };
                Ok(())
            },
        )
    }
}

fn point_car(point: &[f64]) -> PosCar {
    PosCar::new(point[0], point[1], point[2])
}

fn build_component(component: &ComponentConfig) -> Result<Box<dyn PotentialModel>, BuildError> {
    let invalid = |source| BuildError::InvalidComponent {
        name: component.name.clone(),
        source,
    };
    match &component.model {
        ComponentModelConfig::PointMass { mass_msun } => {
            Ok(Box::new(PointMass::new(*mass_msun).map_err(invalid)?))
        }
        ComponentModelConfig::Plummer {
            mass_msun,
            scale_radius_kpc,
        } => Ok(Box::new(
            Plummer::new(*mass_msun, *scale_radius_kpc).map_err(invalid)?,
        )),
        ComponentModelConfig::Isochrone {
            mass_msun,
            scale_radius_kpc,
        } => Ok(Box::new(
            Isochrone::new(*mass_msun, *scale_radius_kpc).map_err(invalid)?,
        )),
        ComponentModelConfig::Unsupported => Err(BuildError::Unsupported {
            name: component.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{BuildError, GalaxyModel};
    use galax_config::{ComponentConfig, ComponentModelConfig};

    fn plummer_config(name: &str) -> ComponentConfig {
        ComponentConfig {
            name: name.to_string(),
            model: ComponentModelConfig::Plummer {
                mass_msun: 1.0e10,
                scale_radius_kpc: 1.0,
            },
        }
    }

    #[test]
    fn single_component_keeps_its_model_name() {
        let model = GalaxyModel::from_components(&[plummer_config("bulge")]).unwrap();
        assert_eq!(model.name(), "Plummer");
    }

    #[test]
    fn several_components_become_a_composite() {
        let model =
            GalaxyModel::from_components(&[plummer_config("bulge"), plummer_config("halo")])
                .unwrap();
        assert_eq!(model.name(), "Composite");
    }

    #[test]
    fn unsupported_component_is_rejected_by_name() {
        let components = vec![
            plummer_config("bulge"),
            ComponentConfig {
                name: "bar".to_string(),
                model: ComponentModelConfig::Unsupported,
            },
        ];
        let err = GalaxyModel::from_components(&components).unwrap_err();
        assert!(matches!(err, BuildError::Unsupported { name } if name == "bar"));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            GalaxyModel::from_components(&[]),
            Err(BuildError::EmptyCatalog)
        ));
    }

    #[test]
    fn invalid_parameters_carry_the_component_name() {
        let components = vec![ComponentConfig {
            name: "thin".to_string(),
            model: ComponentModelConfig::Plummer {
                mass_msun: 1.0e10,
                scale_radius_kpc: -2.0,
            },
        }];
        let err = GalaxyModel::from_components(&components).unwrap_err();
        assert!(matches!(err, BuildError::InvalidComponent { name, .. } if name == "thin"));
    }
}
