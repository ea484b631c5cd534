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

//! Single simulation frame read from user input, plus conversion to and from
//! the interleaved `x0 y0 z0 x1 y1 z1 ...` coordinate layout.

use std::path::Path;

use crate::{
    cell::{BoundaryConditions, Cuboid},
    energy::{accumulate_forces, validate_pair_indices, LennardJones},
    Pair, Point, PositionVec, PreconditionError,
};
use serde::{Deserialize, Serialize};

/// Particles, cell, potential and pair list of one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub cell: Cuboid,
    pub lennard_jones: LennardJones,
    pub positions: PositionVec,
    /// Zero-filled when omitted
    #[serde(default)]
    pub velocities: PositionVec,
    #[serde(default)]
    pub pairs: Vec<Pair>,
}

/// Outcome of one force evaluation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Evaluation {
    pub forces: PositionVec,
    pub energy: f32,
}

impl Frame {
    /// Read the frame from the `system` section of a YAML input file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(&path)
            .map_err(|err| anyhow::anyhow!("Error reading file {:?}: {}", path.as_ref(), err))?;
        let full: serde_yaml::Value = serde_yaml::from_str(&yaml)?;
        let system = full
            .get("system")
            .ok_or_else(|| anyhow::Error::msg("Could not find `system` in the YAML file."))?;
        let mut frame: Frame = serde_yaml::from_value(system.clone()).map_err(anyhow::Error::msg)?;

        frame.lennard_jones.prepare()?;
        if frame.velocities.is_empty() && !frame.positions.is_empty() {
            log::warn!("No velocities given. Using zero velocities.");
            frame.velocities = vec![Point::zeros(); frame.positions.len()];
        }
        if frame.velocities.len() != frame.positions.len() {
            anyhow::bail!(
                "Got {} velocities for {} positions",
                frame.velocities.len(),
                frame.positions.len()
            );
        }
        log::info!(
            "Read {} particles and {} pairs from {:?}",
            frame.positions.len(),
            frame.pairs.len(),
            path.as_ref()
        );
        Ok(frame)
    }

    /// Bring particles back into the cell, then evaluate forces from scratch.
    ///
    /// The pair list and the potential are checked before the boundary is applied.
    /// Only coincident particles, which may first appear after wrapping, are reported
    /// once positions and velocities have been updated.
    pub fn step(&mut self) -> Result<Evaluation, PreconditionError> {
        validate_pair_indices(self.positions.len(), &self.pairs)?;
        let kernel = self.lennard_jones.prepare()?;
        self.cell.apply(&mut self.positions, &mut self.velocities)?;
        let mut forces = vec![Point::zeros(); self.positions.len()];
        let energy = accumulate_forces(&kernel, &self.positions, &self.pairs, &mut forces)?;
        log::debug!("Potential energy: {}", energy);
        Ok(Evaluation { forces, energy })
    }
}

/// Split an interleaved coordinate array into points
pub fn points_from_flat(flat: &[f32]) -> Result<PositionVec, PreconditionError> {
    if flat.len() % 3 != 0 {
        return Err(PreconditionError::FlatLength(flat.len()));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|xyz| Point::new(xyz[0], xyz[1], xyz[2]))
        .collect())
}

/// Interleave points into `x0 y0 z0 x1 y1 z1 ...`
pub fn points_to_flat(points: &[Point]) -> Vec<f32> {
    points.iter().flat_map(|point| point.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::BoundaryPolicy;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_layout() {
        let flat = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let points = points_from_flat(&flat).unwrap();
        assert_eq!(points, vec![Point::new(0.0, 1.0, 2.0), Point::new(3.0, 4.0, 5.0)]);
        assert_eq!(points_to_flat(&points), flat.to_vec());
        assert_eq!(
            points_from_flat(&flat[..4]),
            Err(PreconditionError::FlatLength(4))
        );
        assert!(points_from_flat(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_from_file() {
        let frame = Frame::from_file("tests/files/two_particles.yaml").unwrap();
        assert_eq!(frame.positions.len(), 2);
        assert_eq!(frame.velocities.len(), 2);
        assert_eq!(frame.pairs, vec![(0, 1)]);
        assert_eq!(frame.cell.policy(), BoundaryPolicy::Reflecting);
        assert!(Frame::from_file("tests/files/missing.yaml").is_err());
    }

    #[test]
    fn test_from_file_rejects_invalid_potential() {
        let err = Frame::from_file("tests/files/zero_sigma.yaml").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PreconditionError>(),
            Some(PreconditionError::InvalidParameter { name: "sigma", .. })
        ));
    }

    #[test]
    fn test_step_rejects_self_pair_before_wrapping() {
        let mut frame = Frame::from_file("tests/files/two_particles.yaml").unwrap();
        frame.pairs.push((1, 1));
        let (positions, velocities) = (frame.positions.clone(), frame.velocities.clone());
        assert_eq!(
            frame.step(),
            Err(PreconditionError::SelfPair { pair: 1, index: 1 })
        );
        assert_eq!(frame.positions, positions);
        assert_eq!(frame.velocities, velocities);
    }

    #[test]
    fn test_step() {
        let mut frame = Frame::from_file("tests/files/two_particles.yaml").unwrap();
        let evaluation = frame.step().unwrap();
        // second particle bounced off the upper x wall
        assert_relative_eq!(frame.positions[1].x, 9.0);
        assert_relative_eq!(frame.velocities[1].x, -2.0);
        assert_relative_eq!(evaluation.forces[0].x, -24.0);
        assert_eq!(evaluation.forces[0], -evaluation.forces[1]);
        assert_relative_eq!(evaluation.energy, 0.016316891, max_relative = 1e-5);
    }
}
