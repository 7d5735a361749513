use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use galax_toolkit::batch::{BatchOutput, EvalInput, EvalOutput, InputArity, PointOutput};
use galax_toolkit::config::load_components;
use galax_toolkit::export::grid;
use galax_toolkit::model::GalaxyModel;
use ndarray::Array2;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Evaluate a model quantity at one point or a CSV table of points"
)]
struct Cli {
    /// Model catalog (YAML file, TOML file, or directory of TOML records)
    #[arg(long)]
    model: PathBuf,

    /// Quantity to evaluate
    #[arg(long, value_enum)]
    quantity: Quantity,

    /// CSV table of points, one point per row, no header
    #[arg(long)]
    points: Option<PathBuf>,

    /// A single point given inline as comma-separated numbers
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    point: Option<Vec<f64>>,

    /// Output CSV path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Quantity {
    Potential,
    Density,
    Force,
    ForceDeriv,
    Energy,
    AngularMomentum,
    ToCylindrical,
    CircularVelocity,
}

impl Quantity {
    fn arity(self) -> InputArity {
        match self {
            Quantity::CircularVelocity => InputArity::Single,
            Quantity::Potential | Quantity::Density | Quantity::Force | Quantity::ForceDeriv => {
                InputArity::Triplet
            }
            Quantity::Energy | Quantity::AngularMomentum | Quantity::ToCylindrical => {
                InputArity::Sextet
            }
        }
    }

    fn input_columns(self) -> &'static [&'static str] {
        match self.arity() {
            InputArity::Single => &["r_kpc"],
            InputArity::Triplet => &["x_kpc", "y_kpc", "z_kpc"],
            InputArity::Sextet => &["x_kpc", "y_kpc", "z_kpc", "vx_km_s", "vy_km_s", "vz_km_s"],
        }
    }

    fn output_columns(self) -> &'static [&'static str] {
        match self {
            Quantity::Potential => &["phi_km2_s2"],
            Quantity::Density => &["rho_msun_kpc3"],
            Quantity::Force => &["fx", "fy", "fz"],
            Quantity::ForceDeriv => &[
                "fx", "fy", "fz", "dfx_dx", "dfy_dy", "dfz_dz", "dfx_dy", "dfy_dz", "dfx_dz",
            ],
            Quantity::Energy => &["e_km2_s2"],
            Quantity::AngularMomentum => &["lx", "ly", "lz"],
            Quantity::ToCylindrical => &[
                "r_kpc", "z_kpc", "phi_rad", "vr_km_s", "vz_km_s", "vphi_km_s",
            ],
            Quantity::CircularVelocity => &["vc_km_s"],
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let components = load_components(&cli.model)?;
    let model = GalaxyModel::from_components(&components)?;

    let arity = cli.quantity.arity();
    let (inputs, single): (Array2<f64>, bool) = match (&cli.point, &cli.points) {
        (Some(values), None) => {
            let table = Array2::from_shape_vec((1, values.len()), values.clone())?;
            (table, true)
        }
        (None, Some(path)) => (read_points(path, arity)?, false),
        _ => anyhow::bail!("provide exactly one of --point and --points"),
    };

    let output = if single {
        let row = inputs.row(0);
        dispatch(
            &model,
            cli.quantity,
            EvalInput::Args(row.as_slice().ok_or_else(|| {
                anyhow::anyhow!("inline point is not contiguous")
            })?),
        )?
    } else {
        dispatch(&model, cli.quantity, EvalInput::Table(inputs.view()))?
    };

    let mut writer = grid::writer_for_path(&cli.output)?;
    grid::write_header(
        writer.as_mut(),
        cli.quantity.input_columns(),
        cli.quantity.output_columns(),
    )?;
    match output {
        EvalOutput::Point(point) => {
            let values = point_values(&point);
            grid::Record {
                inputs: inputs.row(0).as_slice().unwrap_or(&[]),
                outputs: &values,
            }
            .write_to(writer.as_mut())?;
        }
        EvalOutput::Batch(batch) => {
            for (i, row) in inputs.rows().into_iter().enumerate() {
                let values = batch_row(&batch, i);
                grid::Record {
                    inputs: row.as_slice().unwrap_or(&[]),
                    outputs: &values,
                }
                .write_to(writer.as_mut())?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn dispatch(
    model: &GalaxyModel,
    quantity: Quantity,
    input: EvalInput<'_>,
) -> anyhow::Result<EvalOutput> {
    let output = match quantity {
        Quantity::Potential => model.potential(input)?,
        Quantity::Density => model.density(input)?,
        Quantity::Force => model.force(input)?,
        Quantity::ForceDeriv => model.force_deriv(input)?,
        Quantity::Energy => model.energy(input)?,
        Quantity::AngularMomentum => model.angular_momentum(input)?,
        Quantity::ToCylindrical => model.to_cylindrical(input)?,
        Quantity::CircularVelocity => model.circular_velocity(input)?,
    };
    Ok(output)
}

fn read_points(path: &PathBuf, arity: InputArity) -> anyhow::Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut values = Vec::new();
    let mut rows = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != arity.width() {
            anyhow::bail!(
                "row {} has {} columns, expected {}",
                line + 1,
                record.len(),
                arity.width()
            );
        }
        for field in record.iter() {
            values.push(field.parse::<f64>()?);
        }
        rows += 1;
    }
    Ok(Array2::from_shape_vec((rows, arity.width()), values)?)
}

fn point_values(point: &PointOutput) -> Vec<f64> {
    match point {
        PointOutput::Scalar(v) => vec![*v],
        PointOutput::Triplet(t) => t.to_vec(),
        PointOutput::Sextet(s) => s.to_vec(),
        PointOutput::TripletSextet(t, s) => {
            let mut out = t.to_vec();
            out.extend_from_slice(s);
            out
        }
    }
}

fn batch_row(batch: &BatchOutput, index: usize) -> Vec<f64> {
    match batch {
        BatchOutput::Scalars(a) => vec![a[index]],
        BatchOutput::Triplets(m) | BatchOutput::Sextets(m) => m.row(index).to_vec(),
        BatchOutput::TripletsSextets(t, s) => {
            let mut out = t.row(index).to_vec();
            out.extend(s.row(index).iter().copied());
            out
        }
    }
}
