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

use super::{CompletionItem, StateLayout, StateVector};
use crate::cosmic::{read_object, write_object, SharedObject, StateElementId};
use crate::errors::{
    DuplicateObjectSnafu, EpochMismatchSnafu, LayoutNotBuiltSnafu, LayoutObjectSnafu,
    NonFiniteValueSnafu, ObjectIndexSnafu, ObjectLockSnafu, SizeMismatchSnafu, StateMapError,
    SyncError, SyncObjectSnafu, UnknownObjectSnafu, UnknownPropertySnafu,
};
use crate::io::{ConfigError, ConfigRepr, InvalidConfigSnafu};
use crate::time::{Duration, Unit};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Configuration of a propagation state manager.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct StateManagerConfig {
    /// Largest epoch disagreement (in seconds) tolerated between objects sharing the state vector
    #[builder(default = 0.0)]
    #[serde(default)]
    pub epoch_tolerance_s: f64,
}

impl StateManagerConfig {
    pub fn epoch_tolerance(&self) -> Duration {
        self.epoch_tolerance_s * Unit::Second
    }
}

impl Default for StateManagerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for StateManagerConfig {
    fn check(&self) -> Result<(), ConfigError> {
        ensure!(
            self.epoch_tolerance_s >= 0.0 && self.epoch_tolerance_s.is_finite(),
            InvalidConfigSnafu {
                msg: format!(
                    "epoch tolerance must be a non negative number of seconds, got {}",
                    self.epoch_tolerance_s
                )
            }
        );
        Ok(())
    }
}

/// Owns the state vector of one propagation and keeps it synchronized with the propagated objects.
///
/// Usage: register the objects and their properties, build the layout, then call
/// [`pull_from_objects`](Self::pull_from_objects) before the integrator reads the state and
/// [`push_to_objects`](Self::push_to_objects) after it writes a new one.
#[derive(Debug, Default)]
pub struct PropagationStateManager {
    objects: Vec<SharedObject>,
    names: Vec<String>,
    properties: Vec<Vec<String>>,
    layout: Option<StateLayout>,
    state: StateVector,
    config: StateManagerConfig,
}

impl PropagationStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StateManagerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Registers an object for propagation and returns its index. An object may only be registered once.
    pub fn register_object(&mut self, object: &SharedObject) -> Result<usize, StateMapError> {
        let name = read_object(object)
            .context(LayoutObjectSnafu {
                object: format!("object #{}", self.objects.len()),
            })?
            .name()
            .to_string();

        ensure!(
            !self.objects.iter().any(|obj| Arc::ptr_eq(obj, object)),
            DuplicateObjectSnafu { name }
        );

        self.objects.push(Arc::clone(object));
        self.names.push(name);
        self.properties.push(Vec::new());
        self.layout = None;
        Ok(self.objects.len() - 1)
    }

    /// Requests the propagation of a property of a registered object.
    pub fn register_property(
        &mut self,
        object: &SharedObject,
        property: &str,
    ) -> Result<(), StateMapError> {
        match self.objects.iter().position(|obj| Arc::ptr_eq(obj, object)) {
            Some(index) => self.register_property_by_index(property, index),
            None => {
                let name = read_object(object)
                    .map(|obj| obj.name().to_string())
                    .unwrap_or_else(|_| "unnamed object".to_string());
                UnknownObjectSnafu { name }.fail()
            }
        }
    }

    /// Requests the propagation of a property of the object registered at `index`.
    pub fn register_property_by_index(
        &mut self,
        property: &str,
        index: usize,
    ) -> Result<(), StateMapError> {
        let object = self.objects.get(index).context(ObjectIndexSnafu {
            index,
            count: self.objects.len(),
        })?;

        {
            let obj = read_object(object).context(LayoutObjectSnafu {
                object: self.names[index].clone(),
            })?;
            ensure!(
                obj.prop_item(property).is_some(),
                UnknownPropertySnafu {
                    object: obj.name(),
                    kind: obj.kind().to_string(),
                    property,
                }
            );
        }

        if self.properties[index].iter().any(|p| p == property) {
            warn!(
                "{}.{property} is already registered for propagation, ignoring",
                self.names[index]
            );
            return Ok(());
        }

        self.properties[index].push(property.to_string());
        self.layout = None;
        Ok(())
    }

    /// Builds the layout of the state vector and returns its size.
    ///
    /// Must be called after all registrations, and again whenever the registrations change.
    pub fn build_layout(&mut self) -> Result<usize, StateMapError> {
        let layout = StateLayout::build(&self.objects, &self.properties)?;
        debug!(
            "state layout of {} object(s) built with {} elements and {} completion item(s)",
            self.objects.len(),
            layout.len(),
            layout.completion().len()
        );
        self.state = StateVector::zeros(&layout, self.state.epoch());
        let size = layout.len();
        self.layout = Some(layout);
        Ok(size)
    }

    /// Copies the values of every registered property into the state vector, and sets its epoch.
    pub fn pull_from_objects(&mut self) -> Result<(), SyncError> {
        let layout = self.layout.as_ref().context(LayoutNotBuiltSnafu)?;
        ensure!(
            self.state.len() == layout.len(),
            SizeMismatchSnafu {
                expected: layout.len(),
                found: self.state.len()
            }
        );

        let mut guards = Vec::with_capacity(self.objects.len());
        for (object, name) in self.objects.iter().zip(&self.names) {
            guards.push(read_object(object).context(ObjectLockSnafu {
                object: name.clone(),
            })?);
        }

        // All objects sharing this vector must agree on the epoch
        let mut epoch = self.state.epoch();
        if let Some(first) = guards.first() {
            epoch = first.epoch();
            let tolerance = self.config.epoch_tolerance();
            for other in guards.iter().skip(1) {
                if (other.epoch() - epoch).abs() > tolerance {
                    error!(
                        "cannot pull state: {} is at {} but {} is at {}",
                        first.name(),
                        epoch,
                        other.name(),
                        other.epoch()
                    );
                    return EpochMismatchSnafu {
                        first: first.name(),
                        first_epoch: epoch,
                        other: other.name(),
                        other_epoch: other.epoch(),
                    }
                    .fail();
                }
            }
        }

        let data = self.state.data_mut();
        for (index, elem) in layout.elements().iter().enumerate() {
            let value = guards[elem.object]
                .scalar(elem.parameter, elem.coords)
                .context(SyncObjectSnafu {
                    object: elem.object_name.as_str(),
                    property: elem.property.as_str(),
                })?;
            if !value.is_finite() {
                error!("{elem} is not finite ({value}), cannot pull state");
                return NonFiniteValueSnafu {
                    object: elem.object_name.as_str(),
                    property: elem.property.as_str(),
                    index,
                    value,
                }
                .fail();
            }
            data[index] = value;
        }

        self.state.set_epoch(epoch);
        Ok(())
    }

    /// Copies the state vector onto the registered objects, and moves them all to its epoch.
    pub fn push_to_objects(&mut self) -> Result<(), SyncError> {
        let layout = self.layout.as_ref().context(LayoutNotBuiltSnafu)?;
        ensure!(
            self.state.len() == layout.len(),
            SizeMismatchSnafu {
                expected: layout.len(),
                found: self.state.len()
            }
        );

        let mut guards = Vec::with_capacity(self.objects.len());
        for (object, name) in self.objects.iter().zip(&self.names) {
            guards.push(write_object(object).context(ObjectLockSnafu {
                object: name.clone(),
            })?);
        }

        for (index, elem) in layout.elements().iter().enumerate() {
            guards[elem.object]
                .set_scalar(elem.parameter, elem.coords, self.state[index])
                .context(SyncObjectSnafu {
                    object: elem.object_name.as_str(),
                    property: elem.property.as_str(),
                })?;
        }

        let epoch = self.state.epoch();
        for obj in guards.iter_mut() {
            obj.set_epoch(epoch);
        }

        Ok(())
    }

    /// Size of the state vector, zero until the layout is built
    pub fn state_size(&self) -> usize {
        self.layout.as_ref().map_or(0, |layout| layout.len())
    }

    pub fn layout(&self) -> Option<&StateLayout> {
        self.layout.as_ref()
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateVector {
        &mut self.state
    }

    pub fn objects(&self) -> &[SharedObject] {
        &self.objects
    }

    /// Properties requested for the object registered at `index`
    pub fn properties(&self, index: usize) -> Option<&[String]> {
        self.properties.get(index).map(|p| p.as_slice())
    }

    /// Returns whether any property of the layout needs the completion pass
    pub fn requires_completion_pass(&self) -> bool {
        self.completion_count() > 0
    }

    pub fn completion_count(&self) -> usize {
        self.layout
            .as_ref()
            .map_or(0, |layout| layout.completion().len())
    }

    /// Element type and width of the i-th property needing the completion pass
    pub fn completion_element(&self, index: usize) -> Option<(StateElementId, usize)> {
        self.completion_item(index)
            .map(|item| (item.element, item.width))
    }

    pub fn completion_item(&self, index: usize) -> Option<&CompletionItem> {
        self.layout
            .as_ref()
            .and_then(|layout| layout.completion().get(index))
    }

    /// Number of properties of the provided element type in the current layout
    pub fn count_of(&self, element: StateElementId) -> usize {
        self.layout
            .as_ref()
            .map_or(0, |layout| layout.count_of(element))
    }
}
