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

use crate::errors::ObjectError;
use crate::time::{Duration, Epoch};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// Re-Export spacecraft
mod spacecraft;
pub use self::spacecraft::*;

// Re-Export formation
mod formation;
pub use self::formation::*;

/// A propagated object shared between the caller and the propagation state manager.
pub type SharedObject = Arc<RwLock<dyn Propagatable>>;

/// Wraps a propagatable object so that it can be registered with a state manager.
pub fn share<P: Propagatable + 'static>(object: P) -> SharedObject {
    Arc::new(RwLock::new(object))
}

/// Acquires a read guard on a shared object.
pub fn read_object(
    object: &SharedObject,
) -> Result<RwLockReadGuard<'_, dyn Propagatable + 'static>, ObjectError> {
    object.read().map_err(|_| ObjectError::LockPoisoned)
}

/// Acquires a write guard on a shared object.
pub fn write_object(
    object: &SharedObject,
) -> Result<RwLockWriteGuard<'_, dyn Propagatable + 'static>, ObjectError> {
    object.write().map_err(|_| ObjectError::LockPoisoned)
}

/// Identifier of a parameter on a propagated object, resolved once when the layout is built.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterId(pub u32);

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Physical quantity stored in a block of the state vector.
///
/// The numeric identifier is the primary sort key of the state layout, so that the same quantity
/// of every object ends up contiguous in the state vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateElementId {
    /// Cartesian position and velocity
    CartesianState,
    /// Equinoctial elements
    EquinoctialState,
    /// Orbit state transition matrix
    OrbitStm,
    /// Orbit A-matrix, i.e. the partials of the dynamics
    OrbitAMatrix,
    /// Mass flow from the propulsion system
    MassFlow,
    /// Any other quantity, the offset is added to the user defined base identifier
    UserDefined(u32),
}

impl StateElementId {
    const USER_DEFINED_BASE: u32 = 10_000;

    /// Returns the stable numeric identifier of this element type
    pub const fn id(&self) -> u32 {
        match self {
            Self::CartesianState => 3700,
            Self::EquinoctialState => 3701,
            Self::OrbitStm => 3702,
            Self::OrbitAMatrix => 3703,
            Self::MassFlow => 3704,
            Self::UserDefined(offset) => Self::USER_DEFINED_BASE.saturating_add(*offset),
        }
    }
}

impl fmt::Display for StateElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserDefined(offset) => write!(f, "UserDefined{offset}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/// Declared numeric shape of a propagatable property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropShape {
    Real,
    Vector { len: usize },
    Matrix { rows: usize, cols: usize },
}

impl PropShape {
    /// Number of scalar elements in this property
    pub const fn width(&self) -> usize {
        match self {
            Self::Real => 1,
            Self::Vector { len } => *len,
            Self::Matrix { rows, cols } => *rows * *cols,
        }
    }

    /// Coordinates of the k-th element (1-based) of this property, row major for matrices.
    pub fn coords(&self, k: usize) -> ElementCoords {
        match self {
            Self::Real => ElementCoords::Real,
            Self::Vector { .. } => ElementCoords::Vector { row: k - 1 },
            Self::Matrix { cols, .. } => ElementCoords::Matrix {
                row: (k - 1) / cols,
                col: (k - 1) % cols,
            },
        }
    }
}

/// Location of one scalar within a property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementCoords {
    Real,
    Vector { row: usize },
    Matrix { row: usize, col: usize },
}

impl fmt::Display for ElementCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real => write!(f, "scalar"),
            Self::Vector { row } => write!(f, "[{row}]"),
            Self::Matrix { row, col } => write!(f, "[{row}, {col}]"),
        }
    }
}

/// Initial value of the time derivative of a property, when it is not zero.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum NonzeroInit {
    #[default]
    Zero,
    /// Every element starts at this value
    All(f64),
    /// Diagonal elements of a matrix start at this value, all others at zero
    Diagonal(f64),
}

impl NonzeroInit {
    /// Initial value of the element at the provided coordinates, if not zero
    pub fn at(&self, coords: ElementCoords) -> Option<f64> {
        match (self, coords) {
            (Self::Zero, _) => None,
            (Self::All(value), _) => Some(*value),
            (Self::Diagonal(value), ElementCoords::Matrix { row, col }) if row == col => {
                Some(*value)
            }
            (Self::Diagonal(_), _) => None,
        }
    }
}

/// Registry entry describing one propagatable property of an object.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropItem {
    /// Physical quantity, used to order the state vector
    pub element: StateElementId,
    /// Parameter used to read and write the values on the object
    pub parameter: ParameterId,
    pub shape: PropShape,
    /// Set if the property needs a completion pass after superposition
    pub needs_final_update: bool,
    /// Set if the derivative of this property is driven by dynamics which change during propagation
    pub dynamic_derivative: bool,
    pub nonzero_init: NonzeroInit,
}

impl PropItem {
    /// Initializes a property entry without final update, dynamic derivative or initial derivative
    pub const fn new(element: StateElementId, parameter: ParameterId, shape: PropShape) -> Self {
        Self {
            element,
            parameter,
            shape,
            needs_final_update: false,
            dynamic_derivative: false,
            nonzero_init: NonzeroInit::Zero,
        }
    }
}

/// The kind of a propagated object, used in diagnostics and to validate stop quantities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Spacecraft,
    Formation,
    Other(String),
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spacecraft => write!(f, "Spacecraft"),
            Self::Formation => write!(f, "Formation"),
            Self::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// Any object whose properties can be integrated.
///
/// Values are accessed by parameter identifier and element coordinates: the state manager resolves
/// property names to these once, when building the layout, and never looks names up per step.
pub trait Propagatable: fmt::Debug + Send + Sync {
    /// Name of this object, used in every diagnostic
    fn name(&self) -> &str;

    fn kind(&self) -> ObjectKind;

    /// Returns the registry entry of the named property, if this object has it
    fn prop_item(&self, property: &str) -> Option<PropItem>;

    /// Name of the associate owning the element at the zero-based `index` of `element`.
    /// Objects without sub structure return `None`, meaning that they are their own associate.
    fn associate(&self, _element: StateElementId, _index: usize) -> Option<String> {
        None
    }

    /// Reads a scalar
    fn scalar(&self, parameter: ParameterId, coords: ElementCoords) -> Result<f64, ObjectError>;

    /// Writes a scalar
    fn set_scalar(
        &mut self,
        parameter: ParameterId,
        coords: ElementCoords,
        value: f64,
    ) -> Result<(), ObjectError>;

    /// Retrieve the Epoch
    fn epoch(&self) -> Epoch;

    /// Set the Epoch
    fn set_epoch(&mut self, epoch: Epoch);

    /// Shift this epoch by a duration (can be negative)
    fn shift_by(&mut self, duration: Duration) {
        self.set_epoch(self.epoch() + duration);
    }
}
