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

/*! # propstate

Propagation state management for mission analysis: assembles the flat state vector that an
integrator consumes from an arbitrary set of propagated objects, keeps that vector synchronized
with the objects at every sub-step, and decides when a propagation must stop by monitoring a
scalar quantity against a goal.
*/

/// Propagated objects and the property registry they expose.
pub mod cosmic;

/// State map building, the state vector and the propagation state manager.
pub mod propagators;

/// Mission design tools: stop quantities, stopping conditions and interpolators.
pub mod md;

/// Configuration loading.
pub mod io;

/// Utility functions shared by different modules.
pub mod utils;

mod errors;
pub use self::errors::*;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use self::cosmic::{Formation, Propagatable, SharedObject, Spacecraft};
pub use self::md::{StopCondition, StopKind};
pub use self::propagators::{PropagationStateManager, StateVector};
