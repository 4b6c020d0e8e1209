/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{
    ElementCoords, NonzeroInit, ObjectKind, ParameterId, PropItem, PropShape, Propagatable,
    StateElementId,
};
use crate::errors::{ElementOutOfRangeSnafu, ObjectError, UnknownParameterSnafu};
use crate::linalg::{Matrix6, Vector3, Vector6};
use crate::time::Epoch;
use snafu::ensure;
use std::fmt;

/// A spacecraft as seen by the propagation: its Cartesian orbit state (km and km/s), its orbit
/// state transition matrix and A-matrix, and its fuel mass (kg).
#[derive(Clone, Debug, PartialEq)]
pub struct Spacecraft {
    pub name: String,
    pub epoch: Epoch,
    /// Position (km) then velocity (km/s)
    pub orbit: Vector6<f64>,
    pub stm: Matrix6<f64>,
    pub a_matrix: Matrix6<f64>,
    pub dry_mass_kg: f64,
    pub fuel_mass_kg: f64,
}

impl Spacecraft {
    pub const CARTESIAN_STATE: ParameterId = ParameterId(0);
    pub const STM: ParameterId = ParameterId(1);
    pub const A_MATRIX: ParameterId = ParameterId(2);
    pub const MASS_FLOW: ParameterId = ParameterId(3);

    /// Initializes a new spacecraft from its position (km) and velocity (km/s), with an identity STM.
    #[allow(clippy::too_many_arguments)]
    pub fn cartesian(
        name: &str,
        x_km: f64,
        y_km: f64,
        z_km: f64,
        vx_km_s: f64,
        vy_km_s: f64,
        vz_km_s: f64,
        epoch: Epoch,
    ) -> Self {
        Self {
            name: name.to_string(),
            epoch,
            orbit: Vector6::new(x_km, y_km, z_km, vx_km_s, vy_km_s, vz_km_s),
            stm: Matrix6::identity(),
            a_matrix: Matrix6::zeros(),
            dry_mass_kg: 0.0,
            fuel_mass_kg: 0.0,
        }
    }

    /// Returns a copy of this spacecraft with the provided masses
    pub fn with_masses(mut self, dry_mass_kg: f64, fuel_mass_kg: f64) -> Self {
        self.dry_mass_kg = dry_mass_kg;
        self.fuel_mass_kg = fuel_mass_kg;
        self
    }

    /// Position vector in km
    pub fn radius(&self) -> Vector3<f64> {
        self.orbit.fixed_rows::<3>(0).into_owned()
    }

    /// Velocity vector in km/s
    pub fn velocity(&self) -> Vector3<f64> {
        self.orbit.fixed_rows::<3>(3).into_owned()
    }

    fn out_of_range(&self, parameter: ParameterId, coords: ElementCoords) -> ObjectError {
        ElementOutOfRangeSnafu {
            object: self.name.clone(),
            parameter,
            coords,
        }
        .build()
    }

    fn matrix_index(
        &self,
        parameter: ParameterId,
        coords: ElementCoords,
    ) -> Result<(usize, usize), ObjectError> {
        match coords {
            ElementCoords::Matrix { row, col } if row < 6 && col < 6 => Ok((row, col)),
            _ => Err(self.out_of_range(parameter, coords)),
        }
    }
}

impl Propagatable for Spacecraft {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Spacecraft
    }

    fn prop_item(&self, property: &str) -> Option<PropItem> {
        match property {
            "CartesianState" => Some(PropItem::new(
                StateElementId::CartesianState,
                Self::CARTESIAN_STATE,
                PropShape::Vector { len: 6 },
            )),
            "STM" => Some(PropItem {
                needs_final_update: true,
                nonzero_init: NonzeroInit::Diagonal(1.0),
                ..PropItem::new(
                    StateElementId::OrbitStm,
                    Self::STM,
                    PropShape::Matrix { rows: 6, cols: 6 },
                )
            }),
            "AMatrix" => Some(PropItem {
                dynamic_derivative: true,
                ..PropItem::new(
                    StateElementId::OrbitAMatrix,
                    Self::A_MATRIX,
                    PropShape::Matrix { rows: 6, cols: 6 },
                )
            }),
            "MassFlow" => Some(PropItem {
                dynamic_derivative: true,
                ..PropItem::new(StateElementId::MassFlow, Self::MASS_FLOW, PropShape::Real)
            }),
            _ => None,
        }
    }

    fn scalar(&self, parameter: ParameterId, coords: ElementCoords) -> Result<f64, ObjectError> {
        match parameter {
            Self::CARTESIAN_STATE => match coords {
                ElementCoords::Vector { row } if row < 6 => Ok(self.orbit[row]),
                _ => Err(self.out_of_range(parameter, coords)),
            },
            Self::STM => Ok(self.stm[self.matrix_index(parameter, coords)?]),
            Self::A_MATRIX => Ok(self.a_matrix[self.matrix_index(parameter, coords)?]),
            Self::MASS_FLOW => {
                ensure!(
                    coords == ElementCoords::Real,
                    ElementOutOfRangeSnafu {
                        object: self.name.clone(),
                        parameter,
                        coords
                    }
                );
                Ok(self.fuel_mass_kg)
            }
            _ => UnknownParameterSnafu {
                object: self.name.clone(),
                parameter,
            }
            .fail(),
        }
    }

    fn set_scalar(
        &mut self,
        parameter: ParameterId,
        coords: ElementCoords,
        value: f64,
    ) -> Result<(), ObjectError> {
        match parameter {
            Self::CARTESIAN_STATE => match coords {
                ElementCoords::Vector { row } if row < 6 => self.orbit[row] = value,
                _ => return Err(self.out_of_range(parameter, coords)),
            },
            Self::STM => {
                let idx = self.matrix_index(parameter, coords)?;
                self.stm[idx] = value;
            }
            Self::A_MATRIX => {
                let idx = self.matrix_index(parameter, coords)?;
                self.a_matrix[idx] = value;
            }
            Self::MASS_FLOW => {
                ensure!(
                    coords == ElementCoords::Real,
                    ElementOutOfRangeSnafu {
                        object: self.name.clone(),
                        parameter,
                        coords
                    }
                );
                self.fuel_mass_kg = value;
            }
            _ => {
                return UnknownParameterSnafu {
                    object: self.name.clone(),
                    parameter,
                }
                .fail()
            }
        }
        Ok(())
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch
    }
}

impl fmt::Display for Spacecraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}: [{}, {}, {}] km\t[{}, {}, {}] km/s\tfuel = {} kg",
            self.name,
            self.epoch,
            self.orbit[0],
            self.orbit[1],
            self.orbit[2],
            self.orbit[3],
            self.orbit[4],
            self.orbit[5],
            self.fuel_mass_kg
        )
    }
}
