// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

use crate::Point;
use thiserror::Error;

/// Violated precondition of a kernel call.
///
/// Kernels check their inputs before touching any caller-owned array, so
/// receiving one of these means nothing was mutated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreconditionError {
    #[error("length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("degenerate box: upper bound {upper} is not above lower bound {lower} on axis {axis}")]
    DegenerateBox { axis: usize, lower: f32, upper: f32 },

    #[error("box bounds must be finite on axis {axis}")]
    NonFiniteBox { axis: usize },

    #[error("non-finite coordinate for particle {particle} on axis {axis}")]
    NonFiniteCoordinate { particle: usize, axis: usize },

    #[error("pair {pair} refers to particle {index}, but only {len} particles exist")]
    PairIndexOutOfRange {
        pair: usize,
        index: usize,
        len: usize,
    },

    #[error("pair {pair} couples particle {index} with itself")]
    SelfPair { pair: usize, index: usize },

    #[error("pair {pair}: particles {i} and {j} are at the same position")]
    CoincidentParticles { pair: usize, i: usize, j: usize },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("flat coordinate array of length {0} is not a multiple of 3")]
    FlatLength(usize),
}

/// Fails with [`PreconditionError::LengthMismatch`] unless `actual == expected`.
pub(crate) fn check_length(
    what: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), PreconditionError> {
    if actual != expected {
        return Err(PreconditionError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Fails with [`PreconditionError::NonFiniteCoordinate`] on the first NaN or infinite coordinate.
pub(crate) fn check_finite(positions: &[Point]) -> Result<(), PreconditionError> {
    for (particle, position) in positions.iter().enumerate() {
        if let Some(axis) = position.iter().position(|x| !x.is_finite()) {
            return Err(PreconditionError::NonFiniteCoordinate { particle, axis });
        }
    }
    Ok(())
}
