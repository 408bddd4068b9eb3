//! Quaternions with Hamilton algebra and conversion to and from 3x3 rotation
//! matrices.
//!
//! All operations are pure functions of their operands and return new values.
//! The only fallible operation is [`Quaternion::inverse`], which rejects
//! quaternions whose squared norm is exactly zero.

#[macro_use]
mod macros;

pub mod error;
pub mod matrix;
pub mod quaternion;

pub use error::{QuaternionError, Result};
pub use matrix::{ConversionBranch, RotationMatrix};
pub use quaternion::Quaternion;
