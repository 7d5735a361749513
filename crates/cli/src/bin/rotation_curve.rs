use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use galax_toolkit::batch::{BatchOutput, EvalInput, EvalOutput};
use galax_toolkit::config::load_components;
use galax_toolkit::export::{grid, rotation};
use galax_toolkit::model::GalaxyModel;
use ndarray::Array2;
use plotters::prelude::*;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sample the circular-velocity curve of a model and render it"
)]
struct Cli {
    /// Model catalog (YAML file, TOML file, or directory of TOML records)
    #[arg(long)]
    model: PathBuf,

    /// Innermost sampled radius (kpc)
    #[arg(long, default_value_t = 0.1)]
    rmin: f64,

    /// Outermost sampled radius (kpc)
    #[arg(long, default_value_t = 25.0)]
    rmax: f64,

    /// Number of radial samples
    #[arg(long, default_value_t = 200)]
    samples: usize,

    /// Output CSV path
    #[arg(long, default_value = "artifacts/rotation_curve.csv")]
    csv: PathBuf,

    /// Optional PNG chart path
    #[arg(long)]
    plot: Option<PathBuf>,

    /// JSON sidecar path (defaults to the CSV path with a _meta.json suffix)
    #[arg(long)]
    sidecar: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.samples < 2 {
        anyhow::bail!("need at least 2 samples");
    }
    if !(cli.rmin >= 0.0 && cli.rmax > cli.rmin) {
        anyhow::bail!("radial range must satisfy 0 <= rmin < rmax");
    }

    let components = load_components(&cli.model)?;
    let model = GalaxyModel::from_components(&components)?;

    let step = (cli.rmax - cli.rmin) / (cli.samples - 1) as f64;
    let radii: Vec<f64> = (0..cli.samples).map(|i| cli.rmin + step * i as f64).collect();
    let table = Array2::from_shape_vec((radii.len(), 1), radii.clone())?;

    let EvalOutput::Batch(BatchOutput::Scalars(speeds)) =
        model.circular_velocity(EvalInput::Table(table.view()))?
    else {
        anyhow::bail!("circular velocity did not return a scalar batch");
    };

    let mut writer = grid::writer_for_path(&cli.csv)?;
    grid::write_header(writer.as_mut(), &["r_kpc"], &["vc_km_s"])?;
    for (radius, speed) in radii.iter().zip(speeds.iter()) {
        grid::Record {
            inputs: std::slice::from_ref(radius),
            outputs: std::slice::from_ref(speed),
        }
        .write_to(writer.as_mut())?;
    }
    writer.flush()?;

    let samples: Vec<rotation::Sample> = radii
        .iter()
        .zip(speeds.iter())
        .map(|(r, v)| rotation::Sample {
            radius_kpc: *r,
            circular_velocity_km_s: *v,
        })
        .collect();
    let sidecar_path = cli.sidecar.clone().unwrap_or_else(|| {
        let stem = cli
            .csv
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("rotation_curve");
        cli.csv.with_file_name(format!("{stem}_meta.json"))
    });
    let generated = chrono::Utc::now().to_rfc3339();
    rotation::write_sidecar(
        &sidecar_path,
        &rotation::CurveSidecar {
            model: model.name(),
            generated_utc: &generated,
            samples: &samples,
        },
    )?;

    if let Some(plot_path) = &cli.plot {
        render_chart(plot_path, model.name(), &radii, speeds.as_slice().unwrap_or(&[]))?;
    }

    println!(
        "rotation curve: {} samples over [{:.2}, {:.2}] kpc -> {}",
        cli.samples,
        cli.rmin,
        cli.rmax,
        cli.csv.display()
    );
    Ok(())
}

fn render_chart(
    path: &PathBuf,
    model_name: &str,
    radii: &[f64],
    speeds: &[f64],
) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("plot path contains invalid UTF-8"))?;

    let vmax = speeds
        .iter()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, v| acc.max(*v));
    let rmin = radii.first().copied().unwrap_or(0.0);
    let rmax = radii.last().copied().unwrap_or(1.0);

    let root = BitMapBackend::new(path_str, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{model_name} rotation curve"),
            ("sans-serif", 24),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(rmin..rmax, 0.0..vmax * 1.1)?;
    chart
        .configure_mesh()
        .x_desc("r [kpc]")
        .y_desc("v_c [km/s]")
        .draw()?;
    chart.draw_series(LineSeries::new(
        radii
            .iter()
            .zip(speeds)
            .filter(|(_, v)| v.is_finite())
            .map(|(r, v)| (*r, *v)),
        &BLUE,
    ))?;
    root.present()?;
    Ok(())
}
