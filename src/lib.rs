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

//! # Molecular dynamics kernels
//!
//! Two stateless building blocks for a time-stepping loop:
//!
//! - [`cell`]: box boundary conditions (periodic wrap and reflecting walls)
//!   applied in place to positions and velocities.
//! - [`energy`]: truncated and shifted Lennard-Jones forces and energy
//!   evaluated over an externally supplied pair list.
//!
//! Neither module keeps state between calls. All arrays are borrowed from the
//! caller and every entry point validates its inputs before mutating anything.

use nalgebra::Vector3;

/// A point (or displacement, velocity, force) in 3D space
pub type Point = Vector3<f32>;
pub type PositionVec = Vec<Point>;
/// Pair of particle indices as produced by a neighbour list
pub type Pair = (usize, usize);

pub mod cell;
pub mod cli;
pub mod energy;
mod error;
pub mod frame;

pub use cell::{wrap_periodic, wrap_reflecting, BoundaryConditions, BoundaryPolicy, Cuboid};
pub use energy::{LennardJones, Truncation};
pub use error::PreconditionError;
pub use frame::Frame;
