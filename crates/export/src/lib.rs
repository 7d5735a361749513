//! Export helpers for CSV and JSON artifacts.

pub mod grid {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write a CSV header from input and output column names.
    pub fn write_header(
        writer: &mut dyn Write,
        input_columns: &[&str],
        output_columns: &[&str],
    ) -> io::Result<()> {
        let mut columns = Vec::with_capacity(input_columns.len() + output_columns.len());
        columns.extend_from_slice(input_columns);
        columns.extend_from_slice(output_columns);
        writeln!(writer, "{}", columns.join(","))
    }

    /// One evaluated row: the input point followed by its outputs.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub inputs: &'a [f64],
        pub outputs: &'a [f64],
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let mut first = true;
            for value in self.inputs.iter().chain(self.outputs) {
                if !first {
                    write!(writer, ",")?;
                }
                write!(writer, "{value:.9e}")?;
                first = false;
            }
            writeln!(writer)
        }
    }
}

pub mod rotation {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// One sample of the rotation curve.
    #[derive(Debug, Clone, Serialize)]
    pub struct Sample {
        pub radius_kpc: f64,
        pub circular_velocity_km_s: f64,
    }

    /// JSON sidecar describing a rotation-curve run.
    #[derive(Debug, Serialize)]
    pub struct CurveSidecar<'a> {
        pub model: &'a str,
        pub generated_utc: &'a str,
        pub samples: &'a [Sample],
    }

    /// Write the JSON sidecar next to the main artifact.
    pub fn write_sidecar(path: &Path, sidecar: &CurveSidecar<'_>) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, sidecar)?;
        Ok(())
    }
}
