//! Quaternions.

use crate::{
    error::{QuaternionError, Result},
    matrix::{ConversionBranch, RotationMatrix},
};
use bytemuck::{Pod, Zeroable};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A quaternion `w + xi + yj + zk` with double precision components.
///
/// Quaternions are plain values: every operation returns a new quaternion and
/// leaves its operands untouched. Equality through [`PartialEq`] is exact
/// component-wise floating point equality. For comparisons that tolerate
/// rounding errors, use the [`approx`] traits ([`approx::AbsDiffEq`] and
/// [`approx::RelativeEq`]).
#[repr(C)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct Quaternion {
    w: f64,
    x: f64,
    y: f64,
    z: f64,
}

impl Quaternion {
    /// Creates a quaternion with real component `w` and imaginary components
    /// `x`, `y` and `z`.
    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Creates a quaternion from its real part and the vector of its
    /// imaginary parts.
    #[inline]
    pub const fn from_parts(real: f64, imag: [f64; 3]) -> Self {
        Self::new(real, imag[0], imag[1], imag[2])
    }

    /// The multiplicative identity `(1, 0, 0, 0)`.
    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Creates the unit quaternion representing a rotation by `angle` radians
    /// about `axis`.
    ///
    /// The axis is assumed to have unit length. If it does not, the result
    /// is not a unit quaternion.
    pub fn from_axis_angle(axis: &[f64; 3], angle: f64) -> Self {
        let (sin_half_angle, cos_half_angle) = (0.5 * angle).sin_cos();
        Self::new(
            cos_half_angle,
            axis[0] * sin_half_angle,
            axis[1] * sin_half_angle,
            axis[2] * sin_half_angle,
        )
    }

    /// Converts the given rotation matrix into the corresponding unit
    /// quaternion.
    ///
    /// The matrix is assumed to be a proper rotation. This is not verified,
    /// and any other matrix yields a quaternion without geometric meaning.
    /// NaN and infinite elements propagate into the result. See
    /// [`RotationMatrix::conversion_branch`] for how the formula used for the
    /// conversion is selected.
    pub fn from_rotation_matrix(matrix: &RotationMatrix) -> Self {
        let m = matrix.rows();
        let branch = matrix.conversion_branch();

        log::trace!("Converting rotation matrix to quaternion using {branch:?} branch");

        match branch {
            ConversionBranch::PositiveTrace => {
                let s = 0.5 / (matrix.trace() + 1.0).sqrt();
                Self::new(
                    0.25 / s,
                    (m[2][1] - m[1][2]) * s,
                    (m[0][2] - m[2][0]) * s,
                    (m[1][0] - m[0][1]) * s,
                )
            }
            ConversionBranch::XDominant => {
                let s = 2.0 * (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt();
                Self::new(
                    (m[2][1] - m[1][2]) / s,
                    0.25 * s,
                    (m[0][1] + m[1][0]) / s,
                    (m[0][2] + m[2][0]) / s,
                )
            }
            ConversionBranch::YDominant => {
                let s = 2.0 * (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt();
                Self::new(
                    (m[0][2] - m[2][0]) / s,
                    (m[0][1] + m[1][0]) / s,
                    0.25 * s,
                    (m[1][2] + m[2][1]) / s,
                )
            }
            ConversionBranch::ZDominant => {
                let s = 2.0 * (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt();
                Self::new(
                    (m[1][0] - m[0][1]) / s,
                    (m[0][2] + m[2][0]) / s,
                    (m[1][2] + m[2][1]) / s,
                    0.25 * s,
                )
            }
        }
    }

    /// The real (scalar) component.
    #[inline]
    pub const fn w(&self) -> f64 {
        self.w
    }

    /// The `i` component.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// The `j` component.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// The `k` component.
    #[inline]
    pub const fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    pub const fn real(&self) -> f64 {
        self.w
    }

    #[inline]
    pub const fn imag(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// The components in the order `[w, x, y, z]`.
    #[inline]
    pub const fn to_array(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    #[inline]
    pub fn negated(&self) -> Self {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }

    /// Multiplies every component by the given scalar.
    #[inline]
    pub fn scaled(&self, scaling: f64) -> Self {
        Self::new(
            self.w * scaling,
            self.x * scaling,
            self.y * scaling,
            self.z * scaling,
        )
    }

    /// Computes the quaternion `(w, -x, -y, -z)`.
    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    #[inline]
    pub fn norm_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// The Euclidean length of the quaternion viewed as a 4-vector.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Computes the multiplicative inverse, which is the conjugate divided by
    /// the squared norm.
    ///
    /// # Errors
    /// Returns [`QuaternionError::ZeroNorm`] if the squared norm is exactly
    /// zero. Quaternions that are merely close to zero are inverted, even if
    /// the result overflows.
    pub fn inverse(&self) -> Result<Self> {
        let norm_squared = self.norm_squared();
        if norm_squared == 0.0 {
            log::debug!("Rejecting inversion of quaternion with zero norm");
            return Err(QuaternionError::ZeroNorm);
        }
        Ok(self.conjugate().scaled(1.0 / norm_squared))
    }

    /// Computes the rotation matrix corresponding to this quaternion.
    ///
    /// The quaternion is assumed to have unit norm. For any other quaternion
    /// the matrix is not orthonormal.
    pub fn to_rotation_matrix(&self) -> RotationMatrix {
        let Self { w, x, y, z } = *self;
        RotationMatrix::from_rows([
            [
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ],
            [
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ],
            [
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ],
        ])
    }

    /// Combines hashes of the four components into a single value, such that
    /// quaternions comparing equal have the same hash.
    pub fn combined_hash(&self) -> u64 {
        hash_component(self.w)
            ^ hash_component(self.x)
            ^ hash_component(self.y)
            ^ hash_component(self.z)
    }
}

fn hash_component(value: f64) -> u64 {
    // `-0.0 == 0.0`, so they must hash to the same value
    let value = if value == 0.0 { 0.0 } else { value };
    const_fnv1a_hash::fnv1a_hash_64(&value.to_bits().to_le_bytes(), None)
}

impl_binop!(Add, add, Quaternion, Quaternion, Quaternion, |a, b| {
    Quaternion::new(a.w + b.w, a.x + b.x, a.y + b.y, a.z + b.z)
});

impl_binop!(Sub, sub, Quaternion, Quaternion, Quaternion, |a, b| {
    Quaternion::new(a.w - b.w, a.x - b.x, a.y - b.y, a.z - b.z)
});

impl_binop!(Mul, mul, Quaternion, Quaternion, Quaternion, |a, b| {
    Quaternion::new(
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
        a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
    )
});

impl_binop!(Mul, mul, Quaternion, f64, Quaternion, |a, b| {
    a.scaled(*b)
});

impl_binop_assign!(AddAssign, add_assign, Quaternion, Quaternion, |a, b| {
    *a = *a + b;
});

impl_binop_assign!(SubAssign, sub_assign, Quaternion, Quaternion, |a, b| {
    *a = *a - b;
});

impl_binop_assign!(MulAssign, mul_assign, Quaternion, Quaternion, |a, b| {
    *a = *a * b;
});

impl_unary_op!(Neg, neg, Quaternion, Quaternion, |a| { a.negated() });

// Deriving `Hash` would hash `0.0` and `-0.0` differently even though they
// compare equal
impl Hash for Quaternion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.combined_hash().hash(state);
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from([w, x, y, z]: [f64; 4]) -> Self {
        Self::new(w, x, y, z)
    }
}

impl From<Quaternion> for [f64; 4] {
    fn from(quaternion: Quaternion) -> Self {
        quaternion.to_array()
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(quaternion: nalgebra::Quaternion<f64>) -> Self {
        Self::new(quaternion.w, quaternion.i, quaternion.j, quaternion.k)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(quaternion: Quaternion) -> Self {
        nalgebra::Quaternion::new(quaternion.w, quaternion.x, quaternion.y, quaternion.z)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}, {}", self.w, self.x, self.y, self.z)
    }
}

impl_approx_eq_by_components!(Quaternion, |q| [q.w, q.x, q.y, q.z]);
