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

use super::param::{Apsis, CycleType, OrbitQuantity};
use crate::cosmic::{read_object, ElementCoords, ObjectKind, ParameterId, SharedObject};
use crate::errors::{
    MissingPropertySnafu, QuantityError, QuantityObjectSnafu, UndefinedSnafu, WrongOwnerSnafu,
};
use crate::linalg::Vector3;
use crate::time::{Epoch, Unit};
use crate::utils::between_0_360;
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Eccentricity below which an orbit is considered circular
const ECC_EPSILON: f64 = 1e-11;
/// Norm of the node vector below which an orbit is considered equatorial
const NODE_EPSILON: f64 = 1e-11;

/// A scalar which a stopping condition can monitor or use as its goal.
pub trait Quantity: fmt::Debug + fmt::Display + Send + Sync {
    /// Evaluates the current value of this quantity
    fn evaluate(&self) -> Result<f64, QuantityError>;

    /// Unit of this quantity if it is time valued
    fn time_unit(&self) -> Option<Unit> {
        None
    }

    fn cycle(&self) -> CycleType {
        CycleType::NotCyclic
    }

    /// Apsis detected by this pseudo quantity, if any
    fn apsis(&self) -> Option<Apsis> {
        None
    }

    /// Checks that this quantity can be evaluated on the object it is bound to
    fn validate(&self) -> Result<(), QuantityError> {
        Ok(())
    }

    /// Builds the provided orbital quantity bound to the same object, if the owner has an orbit
    fn orbit_helper(&self, _quantity: OrbitQuantity) -> Option<Arc<dyn Quantity>> {
        None
    }
}

fn object_name(object: &SharedObject, quantity: &str) -> Result<String, QuantityError> {
    Ok(read_object(object)
        .context(QuantityObjectSnafu { quantity })?
        .name()
        .to_string())
}

/// An orbital quantity of a spacecraft, computed from its Cartesian state.
#[derive(Clone, Debug)]
pub struct OrbitParameter {
    pub quantity: OrbitQuantity,
    object: SharedObject,
    object_name: String,
    /// Gravitational parameter of the central body (km^3/s^2)
    pub gm_km3_s2: f64,
}

impl OrbitParameter {
    pub fn new(
        quantity: OrbitQuantity,
        object: &SharedObject,
        gm_km3_s2: f64,
    ) -> Result<Self, QuantityError> {
        Ok(Self {
            quantity,
            object: Arc::clone(object),
            object_name: object_name(object, &format!("{quantity}"))?,
            gm_km3_s2,
        })
    }

    const fn needs_gm(&self) -> bool {
        matches!(
            self.quantity,
            OrbitQuantity::Eccentricity
                | OrbitQuantity::SMA
                | OrbitQuantity::AoP
                | OrbitQuantity::TrueAnomaly
        )
    }

    /// Reads the position (km) and velocity (km/s) of the owner
    fn cartesian(&self) -> Result<(Vector3<f64>, Vector3<f64>), QuantityError> {
        let obj = read_object(&self.object).context(QuantityObjectSnafu {
            quantity: self.to_string(),
        })?;
        let item = obj
            .prop_item("CartesianState")
            .context(MissingPropertySnafu {
                quantity: self.to_string(),
                object: self.object_name.as_str(),
                property: "CartesianState",
            })?;

        let mut rv = [0.0; 6];
        for (row, value) in rv.iter_mut().enumerate() {
            *value = obj
                .scalar(item.parameter, ElementCoords::Vector { row })
                .context(QuantityObjectSnafu {
                    quantity: self.to_string(),
                })?;
        }
        Ok((
            Vector3::new(rv[0], rv[1], rv[2]),
            Vector3::new(rv[3], rv[4], rv[5]),
        ))
    }

    fn undefined(&self, reason: &str) -> QuantityError {
        UndefinedSnafu {
            quantity: self.to_string(),
            reason,
        }
        .build()
    }

    /// Computes this quantity from a position (km) and velocity (km/s).
    pub fn compute(
        &self,
        radius: &Vector3<f64>,
        velocity: &Vector3<f64>,
    ) -> Result<f64, QuantityError> {
        let gm = self.gm_km3_s2;
        let rmag = radius.norm();
        if rmag < f64::EPSILON {
            return Err(self.undefined("position vector is zero"));
        }
        if self.needs_gm() && gm <= 0.0 {
            return Err(self.undefined("gravitational parameter must be positive"));
        }

        let vmag = velocity.norm();
        let rdotv = radius.dot(velocity);
        let hvec = radius.cross(velocity);
        let node = Vector3::new(-hvec[1], hvec[0], 0.0);
        let nmag = node.norm();
        let evec = if gm > 0.0 {
            (radius.scale(vmag.powi(2) - gm / rmag) - velocity.scale(rdotv)) / gm
        } else {
            Vector3::zeros()
        };
        let ecc = evec.norm();

        match self.quantity {
            OrbitQuantity::X => Ok(radius[0]),
            OrbitQuantity::Y => Ok(radius[1]),
            OrbitQuantity::Z => Ok(radius[2]),
            OrbitQuantity::VX => Ok(velocity[0]),
            OrbitQuantity::VY => Ok(velocity[1]),
            OrbitQuantity::VZ => Ok(velocity[2]),
            OrbitQuantity::Rmag => Ok(rmag),
            OrbitQuantity::Vmag => Ok(vmag),
            OrbitQuantity::RadialRate | OrbitQuantity::Apoapsis | OrbitQuantity::Periapsis => {
                Ok(rdotv / rmag)
            }
            OrbitQuantity::RightAscension => Ok(radius[1].atan2(radius[0]).to_degrees()),
            OrbitQuantity::Declination => Ok((radius[2] / rmag).asin().to_degrees()),
            OrbitQuantity::Eccentricity => Ok(ecc),
            OrbitQuantity::SMA => {
                let energy = 0.5 * vmag.powi(2) - gm / rmag;
                if energy.abs() < f64::EPSILON {
                    Err(self.undefined("parabolic orbits have no semi major axis"))
                } else {
                    Ok(-gm / (2.0 * energy))
                }
            }
            OrbitQuantity::Inclination => {
                let hmag = hvec.norm();
                if hmag < f64::EPSILON {
                    Err(self.undefined("rectilinear orbits have no orbital plane"))
                } else {
                    Ok((hvec[2] / hmag).clamp(-1.0, 1.0).acos().to_degrees())
                }
            }
            OrbitQuantity::RAAN => {
                if nmag < NODE_EPSILON {
                    Ok(0.0)
                } else {
                    let raan = (node[0] / nmag).clamp(-1.0, 1.0).acos().to_degrees();
                    Ok(if node[1] < 0.0 { 360.0 - raan } else { raan })
                }
            }
            OrbitQuantity::AoP => {
                if ecc < ECC_EPSILON {
                    Ok(0.0)
                } else if nmag < NODE_EPSILON {
                    // Equatorial: longitude of periapsis
                    Ok(between_0_360(evec[1].atan2(evec[0]).to_degrees()))
                } else {
                    let aop = (node.dot(&evec) / (nmag * ecc))
                        .clamp(-1.0, 1.0)
                        .acos()
                        .to_degrees();
                    Ok(if evec[2] < 0.0 { 360.0 - aop } else { aop })
                }
            }
            OrbitQuantity::TrueAnomaly => {
                if ecc < ECC_EPSILON {
                    // Circular: argument of latitude, or true longitude if also equatorial
                    if nmag < NODE_EPSILON {
                        Ok(between_0_360(radius[1].atan2(radius[0]).to_degrees()))
                    } else {
                        let aol = (node.dot(radius) / (nmag * rmag))
                            .clamp(-1.0, 1.0)
                            .acos()
                            .to_degrees();
                        Ok(if radius[2] < 0.0 { 360.0 - aol } else { aol })
                    }
                } else {
                    let ta = (evec.dot(radius) / (ecc * rmag))
                        .clamp(-1.0, 1.0)
                        .acos()
                        .to_degrees();
                    Ok(if rdotv < 0.0 { 360.0 - ta } else { ta })
                }
            }
        }
    }
}

impl Quantity for OrbitParameter {
    fn evaluate(&self) -> Result<f64, QuantityError> {
        let (radius, velocity) = self.cartesian()?;
        self.compute(&radius, &velocity)
    }

    fn cycle(&self) -> CycleType {
        self.quantity.cycle()
    }

    fn apsis(&self) -> Option<Apsis> {
        self.quantity.apsis()
    }

    fn validate(&self) -> Result<(), QuantityError> {
        let obj = read_object(&self.object).context(QuantityObjectSnafu {
            quantity: self.to_string(),
        })?;
        let kind = obj.kind();
        ensure!(
            kind == ObjectKind::Spacecraft,
            WrongOwnerSnafu {
                quantity: self.to_string(),
                expected: "Spacecraft",
                object: self.object_name.as_str(),
                kind: kind.to_string(),
            }
        );
        let width = obj
            .prop_item("CartesianState")
            .map(|item| item.shape.width());
        ensure!(
            width == Some(6),
            MissingPropertySnafu {
                quantity: self.to_string(),
                object: self.object_name.as_str(),
                property: "CartesianState",
            }
        );
        if self.needs_gm() && self.gm_km3_s2 <= 0.0 {
            return Err(self.undefined("gravitational parameter must be positive"));
        }
        Ok(())
    }

    fn orbit_helper(&self, quantity: OrbitQuantity) -> Option<Arc<dyn Quantity>> {
        Some(Arc::new(Self {
            quantity,
            ..self.clone()
        }))
    }
}

impl fmt::Display for OrbitParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object_name, self.quantity)
    }
}

/// Time elapsed since a reference epoch, in the provided unit.
#[derive(Clone, Debug)]
pub struct ElapsedTime {
    object: SharedObject,
    object_name: String,
    pub start: Epoch,
    pub unit: Unit,
}

impl ElapsedTime {
    pub fn new(object: &SharedObject, start: Epoch, unit: Unit) -> Result<Self, QuantityError> {
        Ok(Self {
            object: Arc::clone(object),
            object_name: object_name(object, "elapsed time")?,
            start,
            unit,
        })
    }

    /// Elapsed time since the current epoch of the object
    pub fn since_now(object: &SharedObject, unit: Unit) -> Result<Self, QuantityError> {
        let start = read_object(object)
            .context(QuantityObjectSnafu {
                quantity: "elapsed time",
            })?
            .epoch();
        Self::new(object, start, unit)
    }
}

impl Quantity for ElapsedTime {
    fn evaluate(&self) -> Result<f64, QuantityError> {
        let epoch = read_object(&self.object)
            .context(QuantityObjectSnafu {
                quantity: self.to_string(),
            })?
            .epoch();
        Ok((epoch - self.start).to_unit(self.unit))
    }

    fn time_unit(&self) -> Option<Unit> {
        Some(self.unit)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            Unit::Day => "Days",
            Unit::Hour => "Hours",
            Unit::Minute => "Minutes",
            Unit::Second => "Secs",
            _ => "Time",
        };
        write!(f, "{}.Elapsed{unit}", self.object_name)
    }
}

/// Epoch of an object as a TAI modified Julian date, in days.
#[derive(Clone, Debug)]
pub struct ModJulianEpoch {
    object: SharedObject,
    object_name: String,
}

impl ModJulianEpoch {
    pub fn new(object: &SharedObject) -> Result<Self, QuantityError> {
        Ok(Self {
            object: Arc::clone(object),
            object_name: object_name(object, "modified Julian epoch")?,
        })
    }
}

impl Quantity for ModJulianEpoch {
    fn evaluate(&self) -> Result<f64, QuantityError> {
        Ok(read_object(&self.object)
            .context(QuantityObjectSnafu {
                quantity: self.to_string(),
            })?
            .epoch()
            .to_mjd_tai_days())
    }

    fn time_unit(&self) -> Option<Unit> {
        Some(Unit::Day)
    }
}

impl fmt::Display for ModJulianEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.TAIModJulian", self.object_name)
    }
}

/// One scalar of a propagatable property, e.g. the fuel mass of a spacecraft.
#[derive(Clone, Debug)]
pub struct PropertyQuantity {
    object: SharedObject,
    object_name: String,
    pub property: String,
    parameter: ParameterId,
    pub coords: ElementCoords,
}

impl PropertyQuantity {
    pub fn new(
        object: &SharedObject,
        property: &str,
        coords: ElementCoords,
    ) -> Result<Self, QuantityError> {
        let obj = read_object(object).context(QuantityObjectSnafu { quantity: property })?;
        let item = obj.prop_item(property).context(MissingPropertySnafu {
            quantity: property,
            object: obj.name(),
            property,
        })?;
        Ok(Self {
            object: Arc::clone(object),
            object_name: obj.name().to_string(),
            property: property.to_string(),
            parameter: item.parameter,
            coords,
        })
    }
}

impl Quantity for PropertyQuantity {
    fn evaluate(&self) -> Result<f64, QuantityError> {
        read_object(&self.object)
            .context(QuantityObjectSnafu {
                quantity: self.to_string(),
            })?
            .scalar(self.parameter, self.coords)
            .context(QuantityObjectSnafu {
                quantity: self.to_string(),
            })
    }

    fn validate(&self) -> Result<(), QuantityError> {
        self.evaluate().map(|_| ())
    }
}

impl fmt::Display for PropertyQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.coords {
            ElementCoords::Real => write!(f, "{}.{}", self.object_name, self.property),
            coords => write!(f, "{}.{}{coords}", self.object_name, self.property),
        }
    }
}
