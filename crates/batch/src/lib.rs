//! Uniform dispatch of a numerical computation over one point or many.
//!
//! A computation is a function taking one point's coordinates (a slice of
//! 1, 3, or 6 numbers) and filling a fixed-width output slice. [`evaluate`]
//! applies it to an explicit argument list, a 1-D array describing a single
//! point, or a 2-D array of N points, and packages the results in the form
//! mandated by the output shape: a scalar/tuple for a single point, freshly
//! allocated column buffers for a batch.
//!
//! Rows of a batch are independent: the computation for row i reads only
//! row i and whatever read-only state the closure captured, and its result
//! lands in row i of every output buffer. The loop itself runs sequentially.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use thiserror::Error;

/// Widest input a single point can have (a position+velocity sextet).
pub const MAX_INPUT_LEN: usize = 6;

/// Widest flat output a computation can produce (a triplet plus a sextet).
pub const MAX_OUTPUT_LEN: usize = 9;

/// How many numbers describe one input point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputArity {
    /// One number (e.g. a radius).
    Single,
    /// Three numbers (a position).
    Triplet,
    /// Six numbers (a position and a velocity).
    Sextet,
}

impl InputArity {
    /// Numbers per point.
    pub const fn width(self) -> usize {
        match self {
            InputArity::Single => 1,
            InputArity::Triplet => 3,
            InputArity::Sextet => 6,
        }
    }

    /// Diagnostic for an array input of the wrong dimensionality.
    pub const fn invalid_array_message(self) -> &'static str {
        match self {
            InputArity::Single => "input does not contain a valid Nx1 array",
            InputArity::Triplet => "input does not contain a valid Nx3 array",
            InputArity::Sextet => "input does not contain a valid Nx6 array",
        }
    }

    /// Diagnostic for input that is neither a well-formed argument list nor
    /// a well-formed array.
    pub const fn invalid_input_message(self) -> &'static str {
        match self {
            InputArity::Single => {
                "input does not contain valid data (either 1 number for a single point or an Nx1 array)"
            }
            InputArity::Triplet => {
                "input does not contain valid data (either 3 numbers for a single point or an Nx3 array)"
            }
            InputArity::Sextet => {
                "input does not contain valid data (either 6 numbers for a single point or an Nx6 array)"
            }
        }
    }
}

/// Structure of one point's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// A scalar.
    Single,
    /// A triplet of numbers.
    Triplet,
    /// A sextet of numbers.
    Sextet,
    /// A triplet and a sextet, delivered as two separate buffers.
    TripletSextet,
}

impl OutputShape {
    /// Width of the flat scratch slice a computation fills for one point.
    pub const fn flat_len(self) -> usize {
        match self {
            OutputShape::Single => 1,
            OutputShape::Triplet => 3,
            OutputShape::Sextet => 6,
            OutputShape::TripletSextet => 9,
        }
    }

    fn alloc(self, rows: usize) -> BatchOutput {
        match self {
            OutputShape::Single => BatchOutput::Scalars(Array1::zeros(rows)),
            OutputShape::Triplet => BatchOutput::Triplets(Array2::zeros((rows, 3))),
            OutputShape::Sextet => BatchOutput::Sextets(Array2::zeros((rows, 6))),
            OutputShape::TripletSextet => BatchOutput::TripletsSextets(
                Array2::zeros((rows, 3)),
                Array2::zeros((rows, 6)),
            ),
        }
    }

    fn pack_point(self, flat: &[f64]) -> PointOutput {
        match self {
            OutputShape::Single => PointOutput::Scalar(flat[0]),
            OutputShape::Triplet => {
                let mut t = [0.0; 3];
                t.copy_from_slice(&flat[..3]);
                PointOutput::Triplet(t)
            }
            OutputShape::Sextet => {
                let mut s = [0.0; 6];
                s.copy_from_slice(&flat[..6]);
                PointOutput::Sextet(s)
            }
            OutputShape::TripletSextet => {
                let mut t = [0.0; 3];
                let mut s = [0.0; 6];
                t.copy_from_slice(&flat[..3]);
                s.copy_from_slice(&flat[3..9]);
                PointOutput::TripletSextet(t, s)
            }
        }
    }
}

/// Caller-supplied input for one evaluation call.
#[derive(Debug, Clone, Copy)]
pub enum EvalInput<'a> {
    /// An explicit flat list of exactly `arity` numbers (one point).
    Args(&'a [f64]),
    /// A 1-D array of length `arity` (one point).
    Flat(ArrayView1<'a, f64>),
    /// A 2-D array of N rows by `arity` columns (N points).
    Table(ArrayView2<'a, f64>),
}

impl<'a> From<&'a [f64]> for EvalInput<'a> {
    fn from(values: &'a [f64]) -> Self {
        EvalInput::Args(values)
    }
}

impl<'a> From<ArrayView1<'a, f64>> for EvalInput<'a> {
    fn from(view: ArrayView1<'a, f64>) -> Self {
        EvalInput::Flat(view)
    }
}

impl<'a> From<ArrayView2<'a, f64>> for EvalInput<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        EvalInput::Table(view)
    }
}

impl<'a> From<&'a Array1<f64>> for EvalInput<'a> {
    fn from(array: &'a Array1<f64>) -> Self {
        EvalInput::Flat(array.view())
    }
}

impl<'a> From<&'a Array2<f64>> for EvalInput<'a> {
    fn from(array: &'a Array2<f64>) -> Self {
        EvalInput::Table(array.view())
    }
}

/// Result for a single input point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointOutput {
    Scalar(f64),
    Triplet([f64; 3]),
    Sextet([f64; 6]),
    TripletSextet([f64; 3], [f64; 6]),
}

/// Result for a batch of N input points.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutput {
    /// Shape N.
    Scalars(Array1<f64>),
    /// Shape N x 3.
    Triplets(Array2<f64>),
    /// Shape N x 6.
    Sextets(Array2<f64>),
    /// Shapes N x 3 and N x 6, never interleaved.
    TripletsSextets(Array2<f64>, Array2<f64>),
}

impl BatchOutput {
    /// Number of points the buffers hold.
    pub fn rows(&self) -> usize {
        match self {
            BatchOutput::Scalars(a) => a.len(),
            BatchOutput::Triplets(m) | BatchOutput::Sextets(m) => m.nrows(),
            BatchOutput::TripletsSextets(t, _) => t.nrows(),
        }
    }

    fn store_row(&mut self, index: usize, flat: &[f64]) {
        match self {
            BatchOutput::Scalars(a) => a[index] = flat[0],
            BatchOutput::Triplets(m) | BatchOutput::Sextets(m) => {
                m.row_mut(index)
                    .iter_mut()
                    .zip(flat)
                    .for_each(|(slot, value)| *slot = *value);
            }
            BatchOutput::TripletsSextets(t, s) => {
                t.row_mut(index)
                    .iter_mut()
                    .zip(&flat[..3])
                    .for_each(|(slot, value)| *slot = *value);
                s.row_mut(index)
                    .iter_mut()
                    .zip(&flat[3..9])
                    .for_each(|(slot, value)| *slot = *value);
            }
        }
    }
}

/// Result of one evaluation call: a single formatted point, or per-point
/// buffers for a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutput {
    Point(PointOutput),
    Batch(BatchOutput),
}

/// A computation failure reported by the evaluated function for some point.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ComputeError(String);

impl ComputeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by [`evaluate`].
#[derive(Debug, Error)]
pub enum EvalError {
    /// The flat argument list did not hold exactly `arity` numbers.
    #[error("{0}")]
    InvalidArguments(&'static str),
    /// An array input had the wrong dimensionality or trailing dimension.
    #[error("{0}")]
    InvalidShape(&'static str),
    /// The computation function failed; the whole call is aborted and no
    /// partial output is returned.
    #[error("evaluation aborted: {0}")]
    Computation(#[from] ComputeError),
}

/// Apply `fnc` to one point or a batch of points.
///
/// `fnc` receives one point's coordinates (`arity.width()` numbers) and must
/// fill its output slice of `shape.flat_len()` numbers. For a single point
/// the result is formatted per `shape`; for an N-row table every output
/// buffer is allocated up front and row i holds the result for input row i.
/// An empty table is accepted and yields empty buffers.
///
/// Input values are never mutated. If `fnc` fails on any point the whole
/// call fails and partially filled buffers are dropped.
pub fn evaluate<F>(
    arity: InputArity,
    shape: OutputShape,
    input: EvalInput<'_>,
    mut fnc: F,
) -> Result<EvalOutput, EvalError>
where
    F: FnMut(&[f64], &mut [f64]) -> Result<(), ComputeError>,
{
    let mut scratch = [0.0_f64; MAX_OUTPUT_LEN];
    let width = shape.flat_len();
    match input {
        EvalInput::Args(values) => {
            if values.len() != arity.width() {
                return Err(EvalError::InvalidArguments(arity.invalid_input_message()));
            }
            fnc(values, &mut scratch[..width])?;
            Ok(EvalOutput::Point(shape.pack_point(&scratch[..width])))
        }
        EvalInput::Flat(view) => {
            if view.len() != arity.width() {
                return Err(EvalError::InvalidShape(arity.invalid_array_message()));
            }
            let mut point = [0.0_f64; MAX_INPUT_LEN];
            fill_point(&mut point, view);
            fnc(&point[..arity.width()], &mut scratch[..width])?;
            Ok(EvalOutput::Point(shape.pack_point(&scratch[..width])))
        }
        EvalInput::Table(view) => {
            if view.ncols() != arity.width() {
                return Err(EvalError::InvalidShape(arity.invalid_array_message()));
            }
            let mut out = shape.alloc(view.nrows());
            let mut point = [0.0_f64; MAX_INPUT_LEN];
            for (index, row) in view.rows().into_iter().enumerate() {
                fill_point(&mut point, row);
                fnc(&point[..arity.width()], &mut scratch[..width])?;
                out.store_row(index, &scratch[..width]);
            }
            Ok(EvalOutput::Batch(out))
        }
    }
}

/// Copy a (possibly strided) row into the contiguous point buffer.
fn fill_point(point: &mut [f64; MAX_INPUT_LEN], row: ArrayView1<'_, f64>) {
    for (slot, value) in point.iter_mut().zip(row.iter()) {
        *slot = *value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, Array2};

    /// Toy computation: out[0] = sum, out[1] = sum of squares, out[2..] = inputs.
    fn stats(input: &[f64], output: &mut [f64]) -> Result<(), ComputeError> {
        let sum: f64 = input.iter().sum();
        output[0] = sum;
        if output.len() > 1 {
            output[1] = input.iter().map(|v| v * v).sum();
        }
        for (slot, value) in output.iter_mut().skip(2).zip(input) {
            *slot = *value;
        }
        Ok(())
    }

    #[test]
    fn args_path_matches_direct_call() {
        let out = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::Args(&[1.0, 2.0, 3.0]),
            stats,
        )
        .unwrap();
        assert_eq!(out, EvalOutput::Point(PointOutput::Scalar(6.0)));
    }

    #[test]
    fn wrong_argument_count_is_invalid_arguments() {
        let err = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::Args(&[1.0, 2.0]),
            stats,
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidArguments(_)));
        assert!(err.to_string().contains("3 numbers"));
    }

    #[test]
    fn one_dimensional_array_is_a_single_point() {
        let point = arr1(&[1.0, 2.0, 3.0]);
        let out = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::from(&point),
            stats,
        )
        .unwrap();
        assert_eq!(out, EvalOutput::Point(PointOutput::Scalar(6.0)));
    }

    #[test]
    fn one_dimensional_array_of_wrong_length_is_invalid_shape() {
        let point = arr1(&[1.0, 2.0, 3.0, 4.0]);
        let err = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::from(&point),
            stats,
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidShape(_)));
    }

    #[test]
    fn batch_rows_match_single_point_results() {
        let table = arr2(&[
            [1.0, 2.0, 3.0],
            [0.0, 0.0, 0.0],
            [-1.0, 5.0, 2.5],
            [10.0, -10.0, 0.5],
        ]);
        let out = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::from(&table),
            stats,
        )
        .unwrap();
        let EvalOutput::Batch(BatchOutput::Scalars(values)) = out else {
            panic!("expected scalar batch");
        };
        assert_eq!(values.len(), 4);
        for (row, expected) in values.iter().zip([6.0, 0.0, 6.5, 0.5]) {
            assert_eq!(*row, expected);
        }
    }

    #[test]
    fn wrong_trailing_dimension_is_invalid_shape() {
        let table = Array2::<f64>::zeros((4, 4));
        let err = evaluate(
            InputArity::Triplet,
            OutputShape::Single,
            EvalInput::from(&table),
            stats,
        )
        .unwrap_err();
        assert!(matches!(err, EvalError::InvalidShape(_)));
        assert_eq!(
            err.to_string(),
            InputArity::Triplet.invalid_array_message()
        );
    }

    #[test]
    fn combined_shape_yields_two_buffers_split_three_six() {
        let table = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let fnc = |input: &[f64], output: &mut [f64]| {
            for (i, slot) in output.iter_mut().enumerate() {
                *slot = input[i % 3] + i as f64;
            }
            Ok(())
        };
        let out = evaluate(
            InputArity::Triplet,
            OutputShape::TripletSextet,
            EvalInput::from(&table),
            fnc,
        )
        .unwrap();
        let EvalOutput::Batch(BatchOutput::TripletsSextets(t, s)) = out else {
            panic!("expected paired batch");
        };
        assert_eq!(t.dim(), (2, 3));
        assert_eq!(s.dim(), (2, 6));
        // row 1: flat output is [4,6,8,7,9,11,10,12,14]
        assert_eq!(t.row(1).to_vec(), vec![4.0, 6.0, 8.0]);
        assert_eq!(s.row(1).to_vec(), vec![7.0, 9.0, 11.0, 10.0, 12.0, 14.0]);
    }

    #[test]
    fn empty_table_yields_empty_buffers() {
        let table = Array2::<f64>::zeros((0, 6));
        let out = evaluate(
            InputArity::Sextet,
            OutputShape::Sextet,
            EvalInput::from(&table),
            stats,
        )
        .unwrap();
        let EvalOutput::Batch(BatchOutput::Sextets(m)) = out else {
            panic!("expected sextet batch");
        };
        assert_eq!(m.dim(), (0, 6));
    }

    #[test]
    fn failure_mid_batch_aborts_the_whole_call() {
        let table = arr2(&[[1.0], [2.0], [3.0], [4.0]]);
        let mut calls = 0;
        let result = evaluate(
            InputArity::Single,
            OutputShape::Single,
            EvalInput::from(&table),
            |input, output| {
                calls += 1;
                if input[0] > 2.5 {
                    return Err(ComputeError::new("out of domain"));
                }
                output[0] = input[0];
                Ok(())
            },
        );
        assert!(matches!(result, Err(EvalError::Computation(_))));
        // rows after the failing one are never visited
        assert_eq!(calls, 3);
    }

    #[test]
    fn batch_of_one_equals_single_point() {
        let table = arr2(&[[2.0, 3.0, 4.0]]);
        let batch = evaluate(
            InputArity::Triplet,
            OutputShape::Triplet,
            EvalInput::from(&table),
            |input, output| {
                output.copy_from_slice(input);
                Ok(())
            },
        )
        .unwrap();
        let single = evaluate(
            InputArity::Triplet,
            OutputShape::Triplet,
            EvalInput::Args(&[2.0, 3.0, 4.0]),
            |input, output| {
                output.copy_from_slice(input);
                Ok(())
            },
        )
        .unwrap();
        let EvalOutput::Batch(BatchOutput::Triplets(m)) = batch else {
            panic!("expected triplet batch");
        };
        let EvalOutput::Point(PointOutput::Triplet(t)) = single else {
            panic!("expected triplet point");
        };
        assert_eq!(m.row(0).to_vec(), t.to_vec());
    }
}
