//! Rotation matrices.

use approx::AbsDiffEq;
use bytemuck::{Pod, Zeroable};
use std::{fmt, ops::Index};

/// A 3x3 matrix stored row-major on the stack, intended to hold a proper
/// rotation (orthonormal with determinant +1).
///
/// Nothing about the matrix is validated on construction. Use
/// [`RotationMatrix::is_rotation`] to check a matrix obtained from an
/// untrusted source before converting it into a
/// [`Quaternion`](crate::Quaternion).
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct RotationMatrix {
    rows: [[f64; 3]; 3],
}

/// The branch taken when converting a [`RotationMatrix`] into a
/// [`Quaternion`](crate::Quaternion).
///
/// The branch is chosen so that the square root in the conversion is taken of
/// the largest available quantity, which keeps the divisions that follow well
/// conditioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConversionBranch {
    /// The trace is positive, so the real component dominates.
    PositiveTrace,
    /// The first diagonal element is strictly the largest.
    XDominant,
    /// The second diagonal element is strictly larger than the third.
    YDominant,
    /// Fallback when neither of the other diagonal elements dominates.
    ZDominant,
}

impl RotationMatrix {
    /// Creates a matrix with the given rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::from_rows([[0.0; 3]; 3])
    }

    /// The element at the given row and column.
    ///
    /// # Panics
    /// If either index is 3 or larger.
    #[inline]
    pub const fn element(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }

    /// All rows of the matrix.
    #[inline]
    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// The row with the given index.
    #[inline]
    pub const fn row(&self, row: usize) -> [f64; 3] {
        self.rows[row]
    }

    /// The column with the given index.
    #[inline]
    pub const fn column(&self, column: usize) -> [f64; 3] {
        [
            self.rows[0][column],
            self.rows[1][column],
            self.rows[2][column],
        ]
    }

    /// The sum of the diagonal elements.
    #[inline]
    pub fn trace(&self) -> f64 {
        self.rows[0][0] + self.rows[1][1] + self.rows[2][2]
    }

    #[inline]
    pub fn transposed(&self) -> Self {
        Self::from_rows([self.column(0), self.column(1), self.column(2)])
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Computes the product of this matrix with the given column vector.
    pub fn transform_vector(&self, vector: &[f64; 3]) -> [f64; 3] {
        self.rows
            .map(|row| row[0] * vector[0] + row[1] * vector[1] + row[2] * vector[2])
    }

    /// Whether the matrix is orthonormal with determinant +1, with every
    /// element of `M * M^T - I` and the determinant allowed to deviate by at
    /// most `epsilon`.
    pub fn is_rotation(&self, epsilon: f64) -> bool {
        // Row `i` of `M * M^T` holds the dot products of row `i` with every row
        let orthonormal = self.rows.iter().enumerate().all(|(i, row)| {
            self.transform_vector(row)
                .iter()
                .enumerate()
                .all(|(j, dot)| dot.abs_diff_eq(&if i == j { 1.0 } else { 0.0 }, epsilon))
        });
        orthonormal && self.determinant().abs_diff_eq(&1.0, epsilon)
    }

    /// Determines which branch [`Quaternion::from_rotation_matrix`] takes for
    /// this matrix.
    ///
    /// The diagonal comparisons are strict, so ties between diagonal elements
    /// fall through to the later branches, ending in
    /// [`ConversionBranch::ZDominant`].
    ///
    /// [`Quaternion::from_rotation_matrix`]: crate::Quaternion::from_rotation_matrix
    pub fn conversion_branch(&self) -> ConversionBranch {
        let m = &self.rows;
        if self.trace() > 0.0 {
            ConversionBranch::PositiveTrace
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            ConversionBranch::XDominant
        } else if m[1][1] > m[2][2] {
            ConversionBranch::YDominant
        } else {
            ConversionBranch::ZDominant
        }
    }
}

impl From<[[f64; 3]; 3]> for RotationMatrix {
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<RotationMatrix> for [[f64; 3]; 3] {
    fn from(matrix: RotationMatrix) -> Self {
        matrix.rows
    }
}

impl From<nalgebra::Matrix3<f64>> for RotationMatrix {
    fn from(matrix: nalgebra::Matrix3<f64>) -> Self {
        Self::from_rows(std::array::from_fn(|i| {
            std::array::from_fn(|j| matrix[(i, j)])
        }))
    }
}

impl From<RotationMatrix> for nalgebra::Matrix3<f64> {
    fn from(matrix: RotationMatrix) -> Self {
        let m = &matrix.rows;
        nalgebra::Matrix3::new(
            m[0][0], m[0][1], m[0][2], //
            m[1][0], m[1][1], m[1][2], //
            m[2][0], m[2][1], m[2][2],
        )
    }
}

impl Index<(usize, usize)> for RotationMatrix {
    type Output = f64;

    #[inline]
    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        &self.rows[row][column]
    }
}

impl fmt::Display for RotationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

impl_approx_eq_by_components!(RotationMatrix, |m| m.rows.into_iter().flatten());

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq, assert_relative_eq};

    const EPSILON: f64 = 1e-12;

    fn diagonal(d0: f64, d1: f64, d2: f64) -> RotationMatrix {
        RotationMatrix::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    // 90 degrees about z
    fn quarter_turn_about_z() -> RotationMatrix {
        RotationMatrix::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn identity_matrix_has_ones_on_diagonal() {
        let identity = RotationMatrix::identity();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(identity.element(i, j), if i == j { 1.0 } else { 0.0 });
            }
        }
        assert_eq!(identity.trace(), 3.0);
        assert_eq!(identity.determinant(), 1.0);
    }

    #[test]
    fn default_matrix_is_zeros() {
        assert_eq!(RotationMatrix::default(), RotationMatrix::zeros());
    }

    #[test]
    fn row_and_column_accessors_work() {
        let matrix =
            RotationMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);

        assert_eq!(matrix.row(1), [4.0, 5.0, 6.0]);
        assert_eq!(matrix.column(2), [3.0, 6.0, 9.0]);
        assert_eq!(matrix[(2, 0)], 7.0);
        assert_eq!(matrix.element(0, 1), 2.0);
        assert_eq!(matrix.trace(), 15.0);
    }

    #[test]
    #[should_panic]
    fn indexing_out_of_range_panics() {
        let _ = RotationMatrix::identity()[(3, 0)];
    }

    #[test]
    fn transposing_swaps_rows_and_columns() {
        let matrix =
            RotationMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let transposed = matrix.transposed();

        assert_eq!(
            transposed,
            RotationMatrix::from_rows([[1.0, 4.0, 7.0], [2.0, 5.0, 8.0], [3.0, 6.0, 9.0]])
        );
        assert_eq!(transposed.transposed(), matrix);
    }

    #[test]
    fn determinant_works() {
        let matrix =
            RotationMatrix::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]]);
        assert_abs_diff_eq!(matrix.determinant(), 6.0, epsilon = EPSILON);
        assert_abs_diff_eq!(diagonal(1.0, -1.0, -1.0).determinant(), 1.0);
        assert_abs_diff_eq!(diagonal(1.0, 1.0, -1.0).determinant(), -1.0);
    }

    #[test]
    fn transforming_vector_works() {
        let rotated = quarter_turn_about_z().transform_vector(&[1.0, 0.0, 0.0]);
        assert_eq!(rotated, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn rotations_are_recognized() {
        assert!(RotationMatrix::identity().is_rotation(EPSILON));
        assert!(quarter_turn_about_z().is_rotation(EPSILON));
        assert!(diagonal(-1.0, -1.0, 1.0).is_rotation(EPSILON));
    }

    #[test]
    fn non_rotations_are_rejected() {
        assert!(!RotationMatrix::zeros().is_rotation(EPSILON));
        // Reflection
        assert!(!diagonal(1.0, 1.0, -1.0).is_rotation(EPSILON));
        // Scaled rotation
        assert!(!diagonal(2.0, 2.0, 2.0).is_rotation(EPSILON));
    }

    #[test]
    fn positive_trace_selects_positive_trace_branch() {
        assert_eq!(
            RotationMatrix::identity().conversion_branch(),
            ConversionBranch::PositiveTrace
        );
        assert_eq!(
            quarter_turn_about_z().conversion_branch(),
            ConversionBranch::PositiveTrace
        );
    }

    #[test]
    fn dominant_diagonal_element_selects_branch() {
        assert_eq!(
            diagonal(1.0, -1.0, -1.0).conversion_branch(),
            ConversionBranch::XDominant
        );
        assert_eq!(
            diagonal(-1.0, 1.0, -1.0).conversion_branch(),
            ConversionBranch::YDominant
        );
        assert_eq!(
            diagonal(-1.0, -1.0, 1.0).conversion_branch(),
            ConversionBranch::ZDominant
        );
    }

    #[test]
    fn zero_trace_does_not_select_positive_trace_branch() {
        assert_eq!(
            diagonal(1.0, -0.5, -0.5).conversion_branch(),
            ConversionBranch::XDominant
        );
    }

    #[test]
    fn diagonal_ties_fall_through_to_later_branches() {
        // x ties with y, so x is not strictly dominant
        assert_eq!(
            diagonal(0.5, 0.5, -1.0).conversion_branch(),
            ConversionBranch::YDominant
        );
        // x ties with z
        assert_eq!(
            diagonal(0.5, -1.0, 0.5).conversion_branch(),
            ConversionBranch::ZDominant
        );
        // y ties with z
        assert_eq!(
            diagonal(-1.0, 0.5, 0.5).conversion_branch(),
            ConversionBranch::ZDominant
        );
        assert_eq!(
            RotationMatrix::zeros().conversion_branch(),
            ConversionBranch::ZDominant
        );
    }

    #[test]
    fn nan_diagonal_falls_through_to_z_branch() {
        assert_eq!(
            diagonal(f64::NAN, 0.0, 0.0).conversion_branch(),
            ConversionBranch::ZDominant
        );
    }

    #[test]
    fn nalgebra_conversion_preserves_row_major_layout() {
        let matrix =
            RotationMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let converted: nalgebra::Matrix3<f64> = matrix.into();

        assert_eq!(converted[(0, 1)], 2.0);
        assert_eq!(converted[(1, 0)], 4.0);
        assert_eq!(converted[(2, 1)], 8.0);
        assert_eq!(RotationMatrix::from(converted), matrix);
    }

    #[test]
    fn array_conversion_roundtrips() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let matrix = RotationMatrix::from(rows);
        assert_eq!(<[[f64; 3]; 3]>::from(matrix), rows);
    }

    #[test]
    fn display_prints_one_row_per_line() {
        assert_eq!(
            quarter_turn_about_z().to_string(),
            "0 -1 0\n1 0 0\n0 0 1"
        );
    }

    #[test]
    fn approximate_comparison_tolerates_small_differences() {
        let a = RotationMatrix::identity();
        let mut rows = *a.rows();
        rows[1][2] += 1e-14;
        let b = RotationMatrix::from_rows(rows);

        assert_ne!(a, b);
        assert_abs_diff_eq!(a, b, epsilon = EPSILON);
    }

    #[test]
    fn approximate_comparison_checks_last_element() {
        let a = RotationMatrix::identity();
        let mut rows = *a.rows();
        rows[2][2] += 1e-3;
        let b = RotationMatrix::from_rows(rows);

        assert!(!abs_diff_eq!(a, b, epsilon = EPSILON));
        assert_relative_eq!(a, a.transposed(), max_relative = EPSILON);
    }
}
