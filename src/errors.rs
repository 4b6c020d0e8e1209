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

use crate::cosmic::{ElementCoords, ParameterId};
use crate::io::ConfigError;
use crate::time::Epoch;
use snafu::prelude::*;

/// Errors raised when reading or writing a property on a propagated object.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ObjectError {
    #[snafu(display("{object} has no propagatable parameter with id {parameter}"))]
    UnknownParameter {
        object: String,
        parameter: ParameterId,
    },
    #[snafu(display("{object} parameter {parameter} has no element at {coords}"))]
    ElementOutOfRange {
        object: String,
        parameter: ParameterId,
        coords: ElementCoords,
    },
    #[snafu(display("{object} parameter {parameter} is read only"))]
    ReadOnly {
        object: String,
        parameter: ParameterId,
    },
    #[snafu(display("lock on a propagated object was poisoned by a panicking thread"))]
    LockPoisoned,
}

/// Configuration errors raised while registering objects or building the state layout.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StateMapError {
    #[snafu(display("{name} is already registered for propagation"))]
    DuplicateObject { name: String },
    #[snafu(display("{name} is not registered for propagation"))]
    UnknownObject { name: String },
    #[snafu(display("no object registered at index {index} ({count} registered)"))]
    ObjectIndex { index: usize, count: usize },
    #[snafu(display("{object} (a {kind}) has no propagatable property named {property}"))]
    UnknownProperty {
        object: String,
        kind: String,
        property: String,
    },
    #[snafu(display("{object}.{property} declares a non-positive width and cannot be propagated"))]
    NonPositiveWidth { object: String, property: String },
    #[snafu(display("state layout building failed on {object}: {source}"))]
    LayoutObject { object: String, source: ObjectError },
}

/// Consistency violations raised while moving data between the state vector and the objects.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SyncError {
    #[snafu(display("the state layout must be (re)built before synchronizing objects"))]
    LayoutNotBuilt,
    #[snafu(display("state vector has {found} elements but the layout expects {expected}"))]
    SizeMismatch { expected: usize, found: usize },
    #[snafu(display("{object}.{property} element {index} is not finite ({value})"))]
    NonFiniteValue {
        object: String,
        property: String,
        index: usize,
        value: f64,
    },
    #[snafu(display(
        "epochs disagree: {first} is at {first_epoch} but {other} is at {other_epoch}"
    ))]
    EpochMismatch {
        first: String,
        first_epoch: Epoch,
        other: String,
        other_epoch: Epoch,
    },
    #[snafu(display("could not access {object}: {source}"))]
    ObjectLock { object: String, source: ObjectError },
    #[snafu(display("synchronizing {object}.{property} failed: {source}"))]
    SyncObject {
        object: String,
        property: String,
        source: ObjectError,
    },
}

/// Errors raised by stop quantities.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum QuantityError {
    #[snafu(display("{quantity} requires a {expected} but {object} is a {kind}"))]
    WrongOwner {
        quantity: String,
        expected: String,
        object: String,
        kind: String,
    },
    #[snafu(display("{quantity} requires {object} to expose the {property} property"))]
    MissingProperty {
        quantity: String,
        object: String,
        property: String,
    },
    #[snafu(display("{quantity} is undefined: {reason}"))]
    Undefined { quantity: String, reason: String },
    #[snafu(display("{quantity} could not be read: {source}"))]
    QuantityObject {
        quantity: String,
        source: ObjectError,
    },
}

/// Errors raised by interpolators.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum InterpolationError {
    #[snafu(display("{interpolator} requires {required} points but {provided} were provided"))]
    NotEnoughPoints {
        interpolator: String,
        required: usize,
        provided: usize,
    },
    #[snafu(display("{interpolator} samples do not bracket {target}"))]
    NotBracketed { interpolator: String, target: f64 },
    #[snafu(display("{interpolator} has repeated independent value {value}"))]
    RepeatedAbscissa { interpolator: String, value: f64 },
    #[snafu(display("{interpolator} produced a non finite result at {target}"))]
    NonFiniteInterpolant { interpolator: String, target: f64 },
}

/// Errors raised by the stopping condition evaluator.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StopConditionError {
    #[snafu(display("stopping condition {name} must be validated before use"))]
    NotValidated { name: String },
    #[snafu(display("stopping condition {name} has an invalid stop quantity: {source}"))]
    InvalidStopQuantity { name: String, source: QuantityError },
    #[snafu(display("stopping condition {name} has an invalid goal: {source}"))]
    InvalidGoal { name: String, source: QuantityError },
    #[snafu(display("stopping condition {name}: {quantity} is cyclic but declares no range"))]
    CycleUnavailable { name: String, quantity: String },
    #[snafu(display(
        "stopping condition {name}: apsis detection on {quantity} needs orbital helpers its owner cannot provide"
    ))]
    ApsisUnsupported { name: String, quantity: String },
    #[snafu(display("stopping condition {name} failed to evaluate: {source}"))]
    Evaluation { name: String, source: QuantityError },
    #[snafu(display("stopping condition {name} uses its internal epoch but none was provided"))]
    EpochUnavailable { name: String },
    #[snafu(display(
        "stopping condition {name} buffers {size} samples but its interpolator requires {required}"
    ))]
    BufferTooSmall {
        name: String,
        size: usize,
        required: usize,
    },
    #[snafu(display("stopping condition {name} is misconfigured: {source}"))]
    StopConfig { name: String, source: ConfigError },
    #[snafu(display("stopping condition {name} could not read its epoch source: {source}"))]
    EpochSource { name: String, source: ObjectError },
    #[snafu(display("stopping condition {name} has only {count} sample(s), at least two are needed"))]
    InsufficientSamples { name: String, count: usize },
    #[snafu(display("stopping condition {name} buffer does not bracket the goal {goal}"))]
    GoalNotBracketed { name: String, goal: f64 },
    #[snafu(display("stopping condition {name} detected a crossing but could not interpolate it: {source}"))]
    Interpolation {
        name: String,
        source: InterpolationError,
    },
}
