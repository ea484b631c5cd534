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

//! # Simulation box with periodic or reflecting boundaries
//!
//! The simulation cell is an axis-aligned [`Cuboid`] described by its lower and upper corners.
//! Particles leaving the cell are brought back according to a [`BoundaryPolicy`]:
//!
//! | Policy | Positions | Velocities |
//! |--------|-----------|------------|
//! | [`BoundaryPolicy::Periodic`] | wrapped by whole box lengths | untouched |
//! | [`BoundaryPolicy::Reflecting`] | mirrored on the crossed walls | component negated per bounce |
//!
//! Coordinates lying exactly on a wall count as inside and are never moved.
//! Both operations handle displacements of several box lengths in a single call.

mod cuboid;

use crate::{
    error::{check_finite, check_length},
    Point, PreconditionError,
};
pub use cuboid::Cuboid;
use serde::{Deserialize, Serialize};

/// How particles crossing the cell walls are treated
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Positions wrap around to the opposite side of the cell
    #[default]
    Periodic,
    /// Positions bounce off the walls and the normal velocity component changes sign
    #[serde(alias = "fixed")]
    Reflecting,
}

/// Geometric shape of the cell
pub trait Shape {
    /// Get volume
    fn volume(&self) -> f32;
    /// Geometric center of the shape
    fn center(&self) -> Point;
    /// Determines if a point lies inside the boundaries of the shape, walls included
    fn is_inside(&self, point: &Point) -> bool;
    /// Determines if a point lies outside the boundaries of the shape
    #[inline(always)]
    fn is_outside(&self, point: &Point) -> bool {
        !self.is_inside(point)
    }
    /// Side lengths of the smallest enclosing cuboid
    fn bounding_box(&self) -> Point;
}

/// Interface for bringing escaped particles back into the cell
pub trait BoundaryConditions {
    /// Policy used by [`BoundaryConditions::apply`]
    fn policy(&self) -> BoundaryPolicy;

    /// Wrap a point periodically into the cell
    fn wrap(&self, point: &mut Point);

    /// Reflect a point on the cell walls, negating velocity components as it bounces.
    ///
    /// Returns the number of velocity components whose sign changed.
    fn reflect(&self, point: &mut Point, velocity: &mut Point) -> usize;

    /// Apply the cell policy to all particles.
    ///
    /// Velocities are only modified by the reflecting policy, but must match the
    /// number of positions in either case.
    fn apply(
        &self,
        positions: &mut [Point],
        velocities: &mut [Point],
    ) -> Result<(), PreconditionError> {
        check_length("velocities", positions.len(), velocities.len())?;
        match self.policy() {
            BoundaryPolicy::Periodic => wrap_periodic(self, positions),
            BoundaryPolicy::Reflecting => wrap_reflecting(self, positions, velocities),
        }
    }
}

/// Wrap all positions periodically into the cell.
///
/// Afterwards every coordinate lies within `[lower, upper]` of its axis.
/// Fails without touching `positions` if any coordinate is non-finite.
pub fn wrap_periodic<C: BoundaryConditions + ?Sized>(
    cell: &C,
    positions: &mut [Point],
) -> Result<(), PreconditionError> {
    check_finite(positions)?;
    positions.iter_mut().for_each(|position| cell.wrap(position));
    log::trace!("wrapped {} positions periodically", positions.len());
    Ok(())
}

/// Reflect all positions on the cell walls and flip the matching velocity components.
///
/// An odd number of bounces on an axis negates the velocity component on that axis;
/// an even number leaves it unchanged.
/// Fails without touching either slice if the lengths differ or a coordinate is non-finite.
pub fn wrap_reflecting<C: BoundaryConditions + ?Sized>(
    cell: &C,
    positions: &mut [Point],
    velocities: &mut [Point],
) -> Result<(), PreconditionError> {
    check_length("velocities", positions.len(), velocities.len())?;
    check_finite(positions)?;
    let flips: usize = positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .map(|(position, velocity)| cell.reflect(position, velocity))
        .sum();
    log::trace!(
        "reflected {} positions, {} velocity components flipped",
        positions.len(),
        flips
    );
    Ok(())
}
