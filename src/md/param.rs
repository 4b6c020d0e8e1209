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

use crate::errors::QuantityError;
use core::fmt;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Orbital quantities computed from the Cartesian state of a spacecraft
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize)]
pub enum OrbitQuantity {
    /// Argument of Periapse (deg)
    AoP,
    /// Apoapsis, detected when the radial rate goes from positive to negative
    Apoapsis,
    /// Declination of the position vector (deg)
    Declination,
    /// Eccentricity (no unit)
    Eccentricity,
    /// Inclination (deg)
    Inclination,
    /// Periapsis, detected when the radial rate goes from negative to positive
    Periapsis,
    /// Radial rate, i.e. the projection of the velocity on the position direction (km/s)
    RadialRate,
    /// Right ascension of the position vector (deg)
    RightAscension,
    /// Right ascension of the ascending node (deg)
    RAAN,
    /// Norm of the radius vector (km)
    Rmag,
    /// Semi major axis (km)
    SMA,
    /// True anomaly (deg)
    TrueAnomaly,
    /// Norm of the velocity vector (km/s)
    Vmag,
    /// X component of the radius (km)
    X,
    /// Y component of the radius (km)
    Y,
    /// Z component of the radius (km)
    Z,
    /// X component of the velocity (km/s)
    VX,
    /// Y component of the velocity (km/s)
    VY,
    /// Z component of the velocity (km/s)
    VZ,
}

impl OrbitQuantity {
    /// Returns the range over which this quantity wraps around
    pub const fn cycle(&self) -> CycleType {
        match self {
            Self::AoP | Self::RAAN | Self::TrueAnomaly => CycleType::Zero360,
            Self::Inclination => CycleType::Zero180,
            Self::RightAscension => CycleType::PlusMinus180,
            Self::Declination => CycleType::PlusMinus90,
            _ => CycleType::NotCyclic,
        }
    }

    /// Returns the apsis this pseudo quantity detects, if any
    pub const fn apsis(&self) -> Option<Apsis> {
        match self {
            Self::Apoapsis => Some(Apsis::Apoapsis),
            Self::Periapsis => Some(Apsis::Periapsis),
            _ => None,
        }
    }

    pub const fn unit(&self) -> &'static str {
        match self {
            Self::AoP
            | Self::Declination
            | Self::Inclination
            | Self::RightAscension
            | Self::RAAN
            | Self::TrueAnomaly => "deg",

            Self::Rmag | Self::SMA | Self::X | Self::Y | Self::Z => "km",

            Self::Apoapsis
            | Self::Periapsis
            | Self::RadialRate
            | Self::Vmag
            | Self::VX
            | Self::VY
            | Self::VZ => "km/s",

            Self::Eccentricity => "",
        }
    }
}

impl FromStr for OrbitQuantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aop" => Ok(Self::AoP),
            "apoapsis" => Ok(Self::Apoapsis),
            "dec" | "declination" => Ok(Self::Declination),
            "ecc" => Ok(Self::Eccentricity),
            "inc" => Ok(Self::Inclination),
            "periapsis" => Ok(Self::Periapsis),
            "rdot" | "radial_rate" => Ok(Self::RadialRate),
            "ra" | "right_asc" => Ok(Self::RightAscension),
            "raan" => Ok(Self::RAAN),
            "rmag" => Ok(Self::Rmag),
            "sma" => Ok(Self::SMA),
            "ta" => Ok(Self::TrueAnomaly),
            "vmag" => Ok(Self::Vmag),
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            "vx" => Ok(Self::VX),
            "vy" => Ok(Self::VY),
            "vz" => Ok(Self::VZ),
            _ => Err(QuantityError::Undefined {
                quantity: s.to_string(),
                reason: "unknown orbit quantity".to_string(),
            }),
        }
    }
}

impl fmt::Display for OrbitQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match *self {
            Self::AoP => "aop",
            Self::Apoapsis => "apoapsis",
            Self::Declination => "dec",
            Self::Eccentricity => "ecc",
            Self::Inclination => "inc",
            Self::Periapsis => "periapsis",
            Self::RadialRate => "rdot",
            Self::RightAscension => "ra",
            Self::RAAN => "raan",
            Self::Rmag => "rmag",
            Self::SMA => "sma",
            Self::TrueAnomaly => "ta",
            Self::Vmag => "vmag",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::VX => "vx",
            Self::VY => "vy",
            Self::VZ => "vz",
        };
        write!(f, "{repr}")
    }
}

/// Range over which a cyclic quantity wraps around.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CycleType {
    #[default]
    NotCyclic,
    /// [0, 90]
    Zero90,
    /// [0, 180]
    Zero180,
    /// [0, 360]
    Zero360,
    /// [-90, 90]
    PlusMinus90,
    /// [-180, 180]
    PlusMinus180,
    /// Cyclic, but over a range which is not declared
    OtherCyclic,
}

impl CycleType {
    /// Returns the (min, max) of the range, if declared
    pub const fn range(&self) -> Option<(f64, f64)> {
        match self {
            Self::Zero90 => Some((0.0, 90.0)),
            Self::Zero180 => Some((0.0, 180.0)),
            Self::Zero360 => Some((0.0, 360.0)),
            Self::PlusMinus90 => Some((-90.0, 90.0)),
            Self::PlusMinus180 => Some((-180.0, 180.0)),
            Self::NotCyclic | Self::OtherCyclic => None,
        }
    }

    pub const fn is_cyclic(&self) -> bool {
        !matches!(self, Self::NotCyclic)
    }
}

/// Apsis detected by a stopping condition
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Apsis {
    Apoapsis,
    Periapsis,
}
