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

//! Truncated and shifted 12-6 Lennard-Jones potential

use std::path::Path;

use super::{accumulate_forces, Cutoff, TwobodyForce};
use crate::{Pair, Point, PreconditionError};
use serde::{Deserialize, Serialize};

/// How the potential is treated at the cutoff
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Truncation {
    /// Energy shifted by a constant so that it vanishes at the cutoff
    #[default]
    Shifted,
    /// Plain truncation; the energy jumps to zero at the cutoff
    Plain,
}

/// # Lennard-Jones potential
///
/// u(r) = 4ε [(σ/r)¹² - (σ/r)⁶] - u(r_cut) for r < r_cut, and zero beyond.
///
/// Originally by John Edward Lennard-Jones, see
/// [doi:10/cqhgm7](https://dx.doi.org/10/cqhgm7).
///
/// ## Examples:
/// ~~~
/// use mdkernel::{LennardJones, Point};
/// let lj = LennardJones::new(1.0, 1.0, 2.5);
/// let positions = [Point::zeros(), Point::new(1.0, 0.0, 0.0)];
/// let mut forces = vec![Point::zeros(); 2];
/// let energy = lj.forces(&positions, &[(0, 1)], &mut forces).unwrap();
/// assert_eq!(forces[0].x, -24.0);
/// assert_eq!(forces[1].x, 24.0);
/// assert!((energy - 0.016316891).abs() < 1e-6);
/// ~~~
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    /// Interaction strength, ε
    #[serde(alias = "ε")]
    epsilon: f32,
    /// Diameter, σ
    #[serde(alias = "σ")]
    sigma: f32,
    /// Cutoff distance
    cutoff: f32,
    #[serde(default)]
    truncation: Truncation,
}

impl LennardJones {
    /// Shifted Lennard-Jones potential with the given parameters
    pub fn new(epsilon: f32, sigma: f32, cutoff: f32) -> Self {
        Self {
            epsilon,
            sigma,
            cutoff,
            truncation: Truncation::default(),
        }
    }

    /// Construct using the Lorentz-Berthelot mixing rule
    pub fn lorentz_berthelot(epsilons: (f32, f32), sigmas: (f32, f32), cutoff: f32) -> Self {
        Self::new(
            (epsilons.0 * epsilons.1).sqrt(),
            0.5 * (sigmas.0 + sigmas.1),
            cutoff,
        )
    }

    pub fn with_truncation(mut self, truncation: Truncation) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn truncation(&self) -> Truncation {
        self.truncation
    }

    /// Validate the parameters and precompute the coefficients used per pair.
    pub fn prepare(&self) -> Result<LennardJonesKernel, PreconditionError> {
        let invalid = |name, value, reason| {
            Err(PreconditionError::InvalidParameter {
                name,
                value,
                reason,
            })
        };
        if !self.epsilon.is_finite() {
            return invalid("epsilon", self.epsilon, "must be finite");
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return invalid("sigma", self.sigma, "must be positive and finite");
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return invalid("cutoff", self.cutoff, "must be positive and finite");
        }

        let sigma6 = self.sigma.powi(6);
        let sigma12 = self.sigma.powi(12);
        let energy_repulsive = 4.0 * self.epsilon * sigma12;
        let energy_attractive = 4.0 * self.epsilon * sigma6;
        let cutoff_squared = self.cutoff * self.cutoff;
        let energy_shift = match self.truncation {
            Truncation::Shifted => {
                let rc6inv = cutoff_squared.powi(-3);
                rc6inv * (energy_repulsive * rc6inv - energy_attractive)
            }
            Truncation::Plain => 0.0,
        };
        Ok(LennardJonesKernel {
            force_repulsive: 48.0 * self.epsilon * sigma12,
            force_attractive: 24.0 * self.epsilon * sigma6,
            energy_repulsive,
            energy_attractive,
            cutoff_squared,
            energy_shift,
        })
    }

    /// Add Lennard-Jones forces for all `pairs` into `forces` and return the total energy.
    ///
    /// See [`accumulate_forces`] for the accumulation contract.
    pub fn forces(
        &self,
        positions: &[Point],
        pairs: &[Pair],
        forces: &mut [Point],
    ) -> Result<f32, PreconditionError> {
        let kernel = self.prepare()?;
        accumulate_forces(&kernel, positions, pairs, forces)
    }

    /// Get the potential from the `system.lennard_jones` section of a YAML input file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(&path)
            .map_err(|err| anyhow::anyhow!("Error reading file {:?}: {}", path.as_ref(), err))?;
        let full: serde_yaml::Value = serde_yaml::from_str(&yaml)?;
        let value = full
            .get("system")
            .and_then(|system| system.get("lennard_jones"))
            .ok_or_else(|| {
                anyhow::Error::msg("Could not find `system/lennard_jones` in the YAML file.")
            })?;
        let lj: Self = serde_yaml::from_value(value.clone()).map_err(anyhow::Error::msg)?;
        lj.prepare()?;
        Ok(lj)
    }
}

impl Cutoff for LennardJones {
    fn cutoff(&self) -> f32 {
        self.cutoff
    }
}

/// Lennard-Jones coefficients precomputed once per force evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJonesKernel {
    /// 48εσ¹²
    force_repulsive: f32,
    /// 24εσ⁶
    force_attractive: f32,
    /// 4εσ¹²
    energy_repulsive: f32,
    /// 4εσ⁶
    energy_attractive: f32,
    cutoff_squared: f32,
    /// Unshifted energy at the cutoff, zero for plain truncation
    energy_shift: f32,
}

impl LennardJonesKernel {
    /// Constant subtracted from every pair energy
    pub fn energy_shift(&self) -> f32 {
        self.energy_shift
    }

    /// Pair energy including the cutoff; zero at or beyond the cutoff
    pub fn pair_energy(&self, distance_squared: f32) -> f32 {
        if distance_squared >= self.cutoff_squared {
            return 0.0;
        }
        self.twobody_energy(distance_squared)
    }

    /// Force on the particle at `position_i` from the particle at `position_j`
    pub fn pair_force(&self, position_i: &Point, position_j: &Point) -> Point {
        let delta = position_i - position_j;
        let distance_squared = delta.norm_squared();
        if distance_squared >= self.cutoff_squared {
            return Point::zeros();
        }
        delta * self.force_factor(distance_squared)
    }
}

impl Cutoff for LennardJonesKernel {
    fn cutoff_squared(&self) -> f32 {
        self.cutoff_squared
    }
    fn cutoff(&self) -> f32 {
        self.cutoff_squared.sqrt()
    }
}

impl TwobodyForce for LennardJonesKernel {
    #[inline]
    fn force_factor(&self, distance_squared: f32) -> f32 {
        let r2inv = 1.0 / distance_squared;
        let r6inv = r2inv * r2inv * r2inv;
        r2inv * r6inv * (self.force_repulsive * r6inv - self.force_attractive)
    }

    #[inline]
    fn twobody_energy(&self, distance_squared: f32) -> f32 {
        let r2inv = 1.0 / distance_squared;
        let r6inv = r2inv * r2inv * r2inv;
        r6inv * (self.energy_repulsive * r6inv - self.energy_attractive) - self.energy_shift
    }
}
