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

//! # Cuboidal, axis-aligned simulation box

use std::path::Path;

use crate::{
    cell::{BoundaryConditions, BoundaryPolicy, Shape},
    Point, PreconditionError,
};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Axis-aligned box spanning `lower` to `upper`.
///
/// The upper corner lies strictly above the lower corner on every axis,
/// which is checked on construction and when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Getters)]
#[serde(try_from = "RawCuboid")]
pub struct Cuboid {
    /// Lower corner
    lower: Point,
    /// Upper corner
    upper: Point,
    /// Boundary policy applied by [`BoundaryConditions::apply`]
    #[getter(skip)]
    boundary: BoundaryPolicy,
    /// Side lengths, `upper - lower`
    #[serde(skip)]
    #[getter(skip)]
    length: Point,
}

/// Unchecked user input
#[derive(Deserialize)]
struct RawCuboid {
    lower: Point,
    upper: Point,
    #[serde(default)]
    boundary: BoundaryPolicy,
}

impl TryFrom<RawCuboid> for Cuboid {
    type Error = PreconditionError;
    fn try_from(raw: RawCuboid) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.lower, raw.upper)?.with_boundary(raw.boundary))
    }
}

impl Cuboid {
    /// Create a periodic box with corners `lower` and `upper`
    pub fn new(lower: Point, upper: Point) -> Result<Self, PreconditionError> {
        for axis in 0..3 {
            if !lower[axis].is_finite() || !upper[axis].is_finite() {
                return Err(PreconditionError::NonFiniteBox { axis });
            }
            if upper[axis] <= lower[axis] {
                return Err(PreconditionError::DegenerateBox {
                    axis,
                    lower: lower[axis],
                    upper: upper[axis],
                });
            }
        }
        Ok(Self {
            lower,
            upper,
            boundary: BoundaryPolicy::default(),
            length: upper - lower,
        })
    }

    /// Create a cube with the same bounds on all axes
    pub fn cube(lower: f32, upper: f32) -> Result<Self, PreconditionError> {
        Self::new(Point::from_element(lower), Point::from_element(upper))
    }

    /// Set the boundary policy
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Side lengths of the box
    pub fn length(&self) -> Point {
        self.length
    }

    /// Get the box from the `system.cell` section of a YAML input file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(&path)
            .map_err(|err| anyhow::anyhow!("Error reading file {:?}: {}", path.as_ref(), err))?;
        let full: serde_yaml::Value = serde_yaml::from_str(&yaml)?;
        let value = full
            .get("system")
            .and_then(|system| system.get("cell"))
            .ok_or_else(|| anyhow::Error::msg("Could not find `system/cell` in the YAML file."))?;
        serde_yaml::from_value(value.clone()).map_err(anyhow::Error::msg)
    }
}

impl Shape for Cuboid {
    fn volume(&self) -> f32 {
        self.length.product()
    }
    fn center(&self) -> Point {
        (self.lower + self.upper) * 0.5
    }
    fn is_inside(&self, point: &Point) -> bool {
        (0..3).all(|k| point[k] >= self.lower[k] && point[k] <= self.upper[k])
    }
    fn bounding_box(&self) -> Point {
        self.length
    }
}

impl BoundaryConditions for Cuboid {
    fn policy(&self) -> BoundaryPolicy {
        self.boundary
    }

    #[inline]
    fn wrap(&self, point: &mut Point) {
        for k in 0..3 {
            point[k] = periodic_image(point[k], self.lower[k], self.upper[k], self.length[k]);
        }
    }

    #[inline]
    fn reflect(&self, point: &mut Point, velocity: &mut Point) -> usize {
        let mut flips = 0;
        for k in 0..3 {
            let (reflected, flipped) =
                mirror_image(point[k], self.lower[k], self.upper[k], self.length[k]);
            point[k] = reflected;
            if flipped {
                velocity[k] = -velocity[k];
                flips += 1;
            }
        }
        flips
    }
}

/// Image of `value` inside `[lower, upper]` after removing whole box lengths.
///
/// Same result as repeatedly subtracting `length` while above `upper` and adding it
/// while below `lower`, without iterating once per box length.
#[inline]
fn periodic_image(value: f32, lower: f32, upper: f32, length: f32) -> f32 {
    let image = if value > upper {
        value - length * ((value - upper) / length).ceil()
    } else if value < lower {
        value + length * ((lower - value) / length).ceil()
    } else {
        return value;
    };
    // rounding may leave the image one ulp outside
    image.clamp(lower, upper)
}

/// Position of `value` after bouncing between the walls at `lower` and `upper`.
///
/// Returns the new coordinate and whether the number of bounces was odd.
#[inline]
fn mirror_image(value: f32, lower: f32, upper: f32, length: f32) -> (f32, bool) {
    // wall crossed first, the opposite wall, and the direction pointing inwards from the first
    let (overshoot, near, far, inwards) = if value > upper {
        (value - upper, upper, lower, -1.0)
    } else if value < lower {
        (lower - value, lower, upper, 1.0)
    } else {
        return (value, false);
    };
    let bounces = (overshoot / length).ceil().max(1.0);
    let travel = overshoot - (bounces - 1.0) * length;
    let odd = bounces % 2.0 == 1.0;
    let image = if odd {
        near + inwards * travel
    } else {
        far - inwards * travel
    };
    (image.clamp(lower, upper), odd)
}
