use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use galax_toolkit::coords::{PosCar, PosCyl, PosSph, PosVelCar, PosVelCyl, PosVelSph};
use galax_toolkit::export::grid;
use galax_toolkit::particles::ParticleSet;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert an N-body snapshot between coordinate representations"
)]
struct Cli {
    /// Input snapshot CSV: x,y,z,vx,vy,vz,mass per row, no header
    #[arg(long)]
    input: PathBuf,

    /// Target coordinate frame
    #[arg(long, value_enum, default_value_t = Frame::Cylindrical)]
    frame: Frame,

    /// Drop velocities, keeping positions and masses only
    #[arg(long, default_value_t = false)]
    positions_only: bool,

    /// Output CSV path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Frame {
    Cartesian,
    Cylindrical,
    Spherical,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let snapshot = read_snapshot(&cli.input)?;

    let (columns, rows) = match (cli.frame, cli.positions_only) {
        (Frame::Cartesian, false) => {
            let set: ParticleSet<PosVelCar> = ParticleSet::from(&snapshot);
            (
                vec!["x_kpc", "y_kpc", "z_kpc", "vx_km_s", "vy_km_s", "vz_km_s"],
                set.iter()
                    .map(|(p, m)| (vec![p.x, p.y, p.z, p.vx, p.vy, p.vz], *m))
                    .collect::<Vec<_>>(),
            )
        }
        (Frame::Cartesian, true) => {
            let set: ParticleSet<PosCar> = ParticleSet::from(&snapshot);
            (
                vec!["x_kpc", "y_kpc", "z_kpc"],
                set.iter()
                    .map(|(p, m)| (vec![p.x, p.y, p.z], *m))
                    .collect(),
            )
        }
        (Frame::Cylindrical, false) => {
            let set: ParticleSet<PosVelCyl> = ParticleSet::from(&snapshot);
            (
                vec!["r_kpc", "z_kpc", "phi_rad", "vr_km_s", "vz_km_s", "vphi_km_s"],
                set.iter()
                    .map(|(p, m)| (vec![p.r, p.z, p.phi, p.vr, p.vz, p.vphi], *m))
                    .collect(),
            )
        }
        (Frame::Cylindrical, true) => {
            let set: ParticleSet<PosCyl> = ParticleSet::from(&snapshot);
            (
                vec!["r_kpc", "z_kpc", "phi_rad"],
                set.iter()
                    .map(|(p, m)| (vec![p.r, p.z, p.phi], *m))
                    .collect(),
            )
        }
        (Frame::Spherical, false) => {
            let set: ParticleSet<PosVelSph> = ParticleSet::from(&snapshot);
            (
                vec![
                    "r_kpc",
                    "theta_rad",
                    "phi_rad",
                    "vr_km_s",
                    "vtheta_km_s",
                    "vphi_km_s",
                ],
                set.iter()
                    .map(|(p, m)| (vec![p.r, p.theta, p.phi, p.vr, p.vtheta, p.vphi], *m))
                    .collect(),
            )
        }
        (Frame::Spherical, true) => {
            let set: ParticleSet<PosSph> = ParticleSet::from(&snapshot);
            (
                vec!["r_kpc", "theta_rad", "phi_rad"],
                set.iter()
                    .map(|(p, m)| (vec![p.r, p.theta, p.phi], *m))
                    .collect(),
            )
        }
    };

    let mut writer = grid::writer_for_path(&cli.output)?;
    grid::write_header(writer.as_mut(), &columns, &["mass_msun"])?;
    for (coords, mass) in &rows {
        grid::Record {
            inputs: coords,
            outputs: std::slice::from_ref(mass),
        }
        .write_to(writer.as_mut())?;
    }
    writer.flush()?;
    eprintln!(
        "converted {} particles (total mass {:.6e} Msun)",
        snapshot.len(),
        snapshot.total_mass()
    );
    Ok(())
}

fn read_snapshot(path: &PathBuf) -> anyhow::Result<ParticleSet<PosVelCar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut set = ParticleSet::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != 7 {
            anyhow::bail!(
                "row {} has {} columns, expected x,y,z,vx,vy,vz,mass",
                line + 1,
                record.len()
            );
        }
        let mut fields = [0.0_f64; 7];
        for (slot, field) in fields.iter_mut().zip(record.iter()) {
            *slot = field.parse()?;
        }
        set.push(
            PosVelCar::new(fields[0], fields[1], fields[2], fields[3], fields[4], fields[5]),
            fields[6],
        )?;
    }
    Ok(set)
}
