//! Configuration models and loaders for galaxy model catalogs.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// One named component of a galaxy model, parsed from catalog manifests.
#[derive(Debug, Deserialize, Clone)]
pub struct ComponentConfig {
    pub name: String,
    pub model: ComponentModelConfig,
}

/// Model parameters in catalog manifests, tagged by model type.
///
/// Unknown model types deserialize to `Unsupported` and are rejected later,
/// when the runtime model is built.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ComponentModelConfig {
    #[serde(rename = "PointMass")]
    PointMass { mass_msun: f64 },
    #[serde(rename = "Plummer")]
    Plummer {
        mass_msun: f64,
        scale_radius_kpc: f64,
    },
    #[serde(rename = "Isochrone")]
    Isochrone {
        mass_msun: f64,
        scale_radius_kpc: f64,
    },
    #[serde(other)]
    Unsupported,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load model components from a YAML catalog, a single TOML record, or a
/// directory of TOML records (read in sorted order).
pub fn load_components<P: AsRef<Path>>(path: P) -> Result<Vec<ComponentConfig>, ConfigError> {
    load_records(path)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        return read_dir_records(path);
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            let record: T = toml::from_str(&std::fs::read_to_string(path)?)?;
            Ok(vec![record])
        }
        _ => Ok(serde_yaml::from_reader(File::open(path)?)?),
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("toml"))
        .collect();
    paths.sort();
    paths
        .into_iter()
        .map(|p| -> Result<T, ConfigError> {
            Ok(toml::from_str(&std::fs::read_to_string(&p)?)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn yaml_catalog_parses_all_model_types() {
        let yaml = r#"
- name: bulge
  model:
    type: Plummer
    mass_msun: 1.0e10
    scale_radius_kpc: 0.4
- name: halo
  model:
    type: Isochrone
    mass_msun: 8.0e11
    scale_radius_kpc: 15.0
- name: nucleus
  model:
    type: PointMass
    mass_msun: 4.0e6
"#;
        let components: Vec<ComponentConfig> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].name, "bulge");
        assert!(matches!(
            components[1].model,
            ComponentModelConfig::Isochrone { .. }
        ));
        assert!(matches!(
            components[2].model,
            ComponentModelConfig::PointMass { mass_msun } if mass_msun == 4.0e6
        ));
    }

    #[test]
    fn unknown_model_type_parses_as_unsupported() {
        let yaml = r#"
- name: bar
  model:
    type: Ferrers
"#;
        let components: Vec<ComponentConfig> = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            components[0].model,
            ComponentModelConfig::Unsupported
        ));
    }

    #[test]
    fn toml_record_parses() {
        let toml_src = r#"
name = "disc"

[model]
type = "Plummer"
mass_msun = 5.0e10
scale_radius_kpc = 3.0
"#;
        let component: ComponentConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(component.name, "disc");
        assert!(matches!(
            component.model,
            ComponentModelConfig::Plummer { scale_radius_kpc, .. } if scale_radius_kpc == 3.0
        ));
    }

    #[test]
    fn directory_of_toml_records_loads_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for (file, name) in [("b_halo.toml", "halo"), ("a_bulge.toml", "bulge")] {
            let mut f = std::fs::File::create(dir.path().join(file)).unwrap();
            writeln!(
                f,
                "name = \"{name}\"\n\n[model]\ntype = \"PointMass\"\nmass_msun = 1.0"
            )
            .unwrap();
        }
        let components = load_components(dir.path()).unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].name, "bulge");
        assert_eq!(components[1].name, "halo");
    }
}
