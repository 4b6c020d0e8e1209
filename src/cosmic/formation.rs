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
    ElementCoords, ObjectKind, ParameterId, PropItem, PropShape, Propagatable, Spacecraft,
    StateElementId,
};
use crate::errors::{ElementOutOfRangeSnafu, ObjectError, UnknownParameterSnafu};
use crate::time::Epoch;

/// A set of spacecraft propagated together as a single object.
///
/// Each member contributes one block to the formation properties, and the elements of that block
/// are associated with the member rather than with the formation.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub name: String,
    pub members: Vec<Spacecraft>,
    epoch: Epoch,
}

impl Formation {
    /// Builds a formation at the provided epoch, all members are moved to that epoch.
    pub fn new(name: &str, epoch: Epoch, members: Vec<Spacecraft>) -> Self {
        let mut me = Self {
            name: name.to_string(),
            members,
            epoch,
        };
        me.set_epoch(epoch);
        me
    }

    fn locate(
        &self,
        parameter: ParameterId,
        coords: ElementCoords,
    ) -> Result<(usize, ElementCoords), ObjectError> {
        let row = match coords {
            ElementCoords::Vector { row } => row,
            _ => {
                return ElementOutOfRangeSnafu {
                    object: self.name.clone(),
                    parameter,
                    coords,
                }
                .fail()
            }
        };
        let (member, member_coords) = match parameter {
            Spacecraft::CARTESIAN_STATE => (row / 6, ElementCoords::Vector { row: row % 6 }),
            Spacecraft::MASS_FLOW => (row, ElementCoords::Real),
            _ => {
                return UnknownParameterSnafu {
                    object: self.name.clone(),
                    parameter,
                }
                .fail()
            }
        };
        if member >= self.members.len() {
            return ElementOutOfRangeSnafu {
                object: self.name.clone(),
                parameter,
                coords,
            }
            .fail();
        }
        Ok((member, member_coords))
    }
}

impl Propagatable for Formation {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ObjectKind {
        ObjectKind::Formation
    }

    fn prop_item(&self, property: &str) -> Option<PropItem> {
        let count = self.members.len();
        match property {
            "CartesianState" => Some(PropItem::new(
                StateElementId::CartesianState,
                Spacecraft::CARTESIAN_STATE,
                PropShape::Vector { len: 6 * count },
            )),
            "MassFlow" => Some(PropItem {
                dynamic_derivative: true,
                ..PropItem::new(
                    StateElementId::MassFlow,
                    Spacecraft::MASS_FLOW,
                    PropShape::Vector { len: count },
                )
            }),
            _ => None,
        }
    }

    fn associate(&self, element: StateElementId, index: usize) -> Option<String> {
        let member = match element {
            StateElementId::CartesianState => index / 6,
            StateElementId::MassFlow => index,
            _ => return None,
        };
        self.members.get(member).map(|sc| sc.name.clone())
    }

    fn scalar(&self, parameter: ParameterId, coords: ElementCoords) -> Result<f64, ObjectError> {
        let (member, member_coords) = self.locate(parameter, coords)?;
        self.members[member].scalar(parameter, member_coords)
    }

    fn set_scalar(
        &mut self,
        parameter: ParameterId,
        coords: ElementCoords,
        value: f64,
    ) -> Result<(), ObjectError> {
        let (member, member_coords) = self.locate(parameter, coords)?;
        self.members[member].set_scalar(parameter, member_coords, value)
    }

    fn epoch(&self) -> Epoch {
        self.epoch
    }

    fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
        for sc in &mut self.members {
            sc.epoch = epoch;
        }
    }
}

#[cfg(test)]
mod ut_formation {
    use super::*;

    #[test]
    fn member_blocks() {
        let epoch = Epoch::from_gregorian_utc_at_midnight(2024, 1, 1);
        let lead = Spacecraft::cartesian("Lead", 7000.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch);
        let chase = Spacecraft::cartesian("Chase", 7001.0, 0.0, 0.0, 0.0, 7.5, 0.0, epoch);
        let mut form = Formation::new("Form", epoch, vec![lead, chase]);

        assert_eq!(form.prop_item("CartesianState").unwrap().shape.width(), 12);
        assert_eq!(
            form.associate(StateElementId::CartesianState, 7),
            Some("Chase".to_string())
        );
        assert_eq!(
            form.scalar(Spacecraft::CARTESIAN_STATE, ElementCoords::Vector { row: 6 })
                .unwrap(),
            7001.0
        );
        form.set_scalar(Spacecraft::MASS_FLOW, ElementCoords::Vector { row: 1 }, 3.0)
            .unwrap();
        assert_eq!(form.members[1].fuel_mass_kg, 3.0);
        assert!(form
            .scalar(Spacecraft::CARTESIAN_STATE, ElementCoords::Vector { row: 12 })
            .is_err());
    }
}
