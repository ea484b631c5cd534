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

//! # Short-range pair forces
//!
//! Forces and energies are evaluated over a pair list supplied by the caller,
//! typically from a neighbour list. The displacement of a pair `(i, j)` is taken
//! as `x_i - x_j` as stored; no minimum image convention is applied, so pairs
//! spanning a periodic boundary must be given in unwrapped coordinates.

mod lennard_jones;

pub use lennard_jones::{LennardJones, LennardJonesKernel, Truncation};

use crate::{
    error::{check_finite, check_length},
    Pair, Point, PreconditionError,
};

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f32 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f32;
}

/// Isotropic pair interaction evaluated from the squared distance.
///
/// Both methods are only called for `0 < distance_squared < cutoff_squared`.
pub trait TwobodyForce: Cutoff {
    /// Scalar `f` such that the force on particle `i` is `f * (x_i - x_j)`
    fn force_factor(&self, distance_squared: f32) -> f32;

    /// Interaction energy of the pair
    fn twobody_energy(&self, distance_squared: f32) -> f32;
}

/// Add pair forces into `forces` and return the total potential energy.
///
/// Pairs are processed once each, in order. Pairs at or beyond the cutoff
/// contribute nothing. The force on `i` and the force on `j` of a pair are
/// exact negatives of each other.
///
/// `forces` is accumulated into and must be zeroed by the caller when a fresh
/// evaluation is wanted. All inputs are validated first; on error `forces`
/// is left untouched.
pub fn accumulate_forces<T: TwobodyForce + ?Sized>(
    potential: &T,
    positions: &[Point],
    pairs: &[Pair],
    forces: &mut [Point],
) -> Result<f32, PreconditionError> {
    check_length("forces", positions.len(), forces.len())?;
    check_finite(positions)?;
    validate_pairs(positions, pairs)?;

    let cutoff_squared = potential.cutoff_squared();
    let mut energy = 0.0;
    let mut interacting = 0;
    for &(i, j) in pairs {
        let delta = positions[i] - positions[j];
        let distance_squared = delta.norm_squared();
        if distance_squared >= cutoff_squared {
            continue;
        }
        let force = delta * potential.force_factor(distance_squared);
        forces[i] += force;
        forces[j] -= force;
        energy += potential.twobody_energy(distance_squared);
        interacting += 1;
    }
    log::trace!(
        "{} of {} pairs within cutoff, energy {}",
        interacting,
        pairs.len(),
        energy
    );
    Ok(energy)
}

/// Pair indices must be below `len` and distinct within each pair
pub(crate) fn validate_pair_indices(
    len: usize,
    pairs: &[Pair],
) -> Result<(), PreconditionError> {
    for (pair, &(i, j)) in pairs.iter().enumerate() {
        if let Some(index) = [i, j].into_iter().find(|&index| index >= len) {
            return Err(PreconditionError::PairIndexOutOfRange { pair, index, len });
        }
        if i == j {
            return Err(PreconditionError::SelfPair { pair, index: i });
        }
    }
    Ok(())
}

/// Valid pair indices referring to particles at different positions
fn validate_pairs(positions: &[Point], pairs: &[Pair]) -> Result<(), PreconditionError> {
    validate_pair_indices(positions.len(), pairs)?;
    for (pair, &(i, j)) in pairs.iter().enumerate() {
        if (positions[i] - positions[j]).norm_squared() == 0.0 {
            return Err(PreconditionError::CoincidentParticles { pair, i, j });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    /// Harmonic spring with zero rest length, u = k r² / 2
    struct Spring {
        k: f32,
        cutoff: f32,
    }

    impl Cutoff for Spring {
        fn cutoff(&self) -> f32 {
            self.cutoff
        }
    }

    impl TwobodyForce for Spring {
        fn force_factor(&self, _distance_squared: f32) -> f32 {
            -self.k
        }
        fn twobody_energy(&self, distance_squared: f32) -> f32 {
            0.5 * self.k * distance_squared
        }
    }

    #[test]
    fn test_accumulate_with_custom_potential() {
        let spring = Spring {
            k: 2.0,
            cutoff: 3.0,
        };
        let positions = [
            Point::zeros(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 5.0, 0.0),
        ];
        let mut forces = vec![Point::new(1.0, 1.0, 1.0); 3];
        let energy =
            accumulate_forces(&spring, &positions, &[(0, 1), (0, 2)], &mut forces).unwrap();
        assert_approx_eq!(f32, energy, 1.0);
        // accumulated on top of what was already there
        assert_eq!(forces[0], Point::new(3.0, 1.0, 1.0));
        assert_eq!(forces[1], Point::new(-1.0, 1.0, 1.0));
        assert_eq!(forces[2], Point::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_invalid_pairs() {
        let positions = [Point::zeros(), Point::new(1.0, 0.0, 0.0), Point::zeros()];
        assert_eq!(
            validate_pairs(&positions, &[(0, 1), (1, 3)]),
            Err(PreconditionError::PairIndexOutOfRange {
                pair: 1,
                index: 3,
                len: 3
            })
        );
        assert_eq!(
            validate_pairs(&positions, &[(1, 1)]),
            Err(PreconditionError::SelfPair { pair: 0, index: 1 })
        );
        assert_eq!(
            validate_pairs(&positions, &[(0, 1), (2, 0)]),
            Err(PreconditionError::CoincidentParticles {
                pair: 1,
                i: 2,
                j: 0
            })
        );
        assert!(validate_pairs(&positions, &[]).is_ok());
    }

    #[test]
    fn test_non_finite_position_is_refused() {
        let spring = Spring {
            k: 1.0,
            cutoff: 1.0,
        };
        let positions = [Point::zeros(), Point::new(f32::NAN, 0.0, 0.0)];
        let mut forces = vec![Point::new(1.0, 2.0, 3.0); 2];
        let err = accumulate_forces(&spring, &positions, &[(0, 1)], &mut forces).unwrap_err();
        assert_eq!(
            err,
            PreconditionError::NonFiniteCoordinate {
                particle: 1,
                axis: 0
            }
        );
        assert!(forces.iter().all(|f| *f == Point::new(1.0, 2.0, 3.0)));

        // also when the particle is in no pair
        let positions = [Point::zeros(), Point::new(0.5, 0.0, f32::INFINITY)];
        assert!(accumulate_forces(&spring, &positions, &[], &mut forces).is_err());
    }

    #[test]
    fn test_forces_length_mismatch() {
        let spring = Spring {
            k: 1.0,
            cutoff: 1.0,
        };
        let positions = [Point::zeros(), Point::new(0.5, 0.0, 0.0)];
        let mut forces = vec![Point::zeros(); 3];
        let err = accumulate_forces(&spring, &positions, &[(0, 1)], &mut forces).unwrap_err();
        assert_eq!(
            err,
            PreconditionError::LengthMismatch {
                what: "forces",
                expected: 2,
                actual: 3
            }
        );
        assert!(forces.iter().all(|f| *f == Point::zeros()));
    }
}
