//! Errors for quaternion operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuaternionError>;

#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuaternionError {
    /// The squared norm of the quaternion was exactly zero, so it has no
    /// multiplicative inverse.
    #[error("Cannot invert a quaternion with zero norm")]
    ZeroNorm,
}
