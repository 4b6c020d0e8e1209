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

use crate::cosmic::{read_object, ElementCoords, ParameterId, SharedObject, StateElementId};
use crate::errors::{
    LayoutObjectSnafu, NonPositiveWidthSnafu, StateMapError, UnknownPropertySnafu,
};
use crate::linalg::DVector;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use std::collections::HashMap;
use std::fmt;

/// Descriptor of one scalar slot of the state vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateElement {
    /// Index of the owning object in registration order
    pub object: usize,
    pub object_name: String,
    pub property: String,
    /// Physical quantity, primary sort key of the layout
    pub element: StateElementId,
    pub parameter: ParameterId,
    /// One-based index of this scalar within its property, secondary sort key
    pub subelement: usize,
    /// Name of the entity this element belongs to, the object itself unless it has sub structure
    pub associate: String,
    pub coords: ElementCoords,
    /// Width of the owning property
    pub width: usize,
    pub needs_final_update: bool,
    pub dynamic_derivative: bool,
    /// Initial value of the derivative of this element, if not zero
    pub initial_value: Option<f64>,
}

impl fmt::Display for StateElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.object_name, self.property, self.subelement
        )
    }
}

/// A property flagged for the completion pass that follows superposition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionItem {
    pub element: StateElementId,
    pub object_name: String,
    pub property: String,
    /// Index of the first element of this property in the state vector
    pub start: usize,
    pub width: usize,
}

/// Ordered layout of the state vector, immutable once built.
///
/// Elements are sorted by element type identifier, and within a given identifier by object
/// registration order then property declaration order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct StateLayout {
    elements: Vec<StateElement>,
    completion: Vec<CompletionItem>,
    associates: Vec<usize>,
}

impl StateLayout {
    /// Builds the layout of the provided objects, where `requests[i]` lists the properties
    /// requested for `objects[i]`.
    pub fn build(
        objects: &[SharedObject],
        requests: &[Vec<String>],
    ) -> Result<Self, StateMapError> {
        let mut elements = Vec::new();

        for (obj_idx, (object, properties)) in objects.iter().zip(requests).enumerate() {
            let obj = read_object(object).context(LayoutObjectSnafu {
                object: format!("object #{obj_idx}"),
            })?;

            for property in properties {
                let item = obj.prop_item(property).context(UnknownPropertySnafu {
                    object: obj.name(),
                    kind: obj.kind().to_string(),
                    property: property.clone(),
                })?;

                let width = item.shape.width();
                ensure!(
                    width > 0,
                    NonPositiveWidthSnafu {
                        object: obj.name(),
                        property: property.clone()
                    }
                );

                for k in 0..width {
                    let subelement = k + 1;
                    let coords = item.shape.coords(subelement);
                    elements.push(StateElement {
                        object: obj_idx,
                        object_name: obj.name().to_string(),
                        property: property.clone(),
                        element: item.element,
                        parameter: item.parameter,
                        subelement,
                        associate: obj
                            .associate(item.element, k)
                            .unwrap_or_else(|| obj.name().to_string()),
                        coords,
                        width,
                        needs_final_update: item.needs_final_update,
                        dynamic_derivative: item.dynamic_derivative,
                        initial_value: item.nonzero_init.at(coords),
                    });
                }
            }
        }

        // Stable sort: equal identifiers keep their registration order
        elements.sort_by_key(|elem| elem.element.id());

        let completion = elements
            .iter()
            .enumerate()
            .filter(|(_, elem)| elem.needs_final_update && elem.subelement == 1)
            .map(|(start, elem)| CompletionItem {
                element: elem.element,
                object_name: elem.object_name.clone(),
                property: elem.property.clone(),
                start,
                width: elem.width,
            })
            .collect();

        let mut anchors: HashMap<&str, usize> = HashMap::new();
        let associates = elements
            .iter()
            .enumerate()
            .map(|(i, elem)| *anchors.entry(elem.associate.as_str()).or_insert(i))
            .collect();

        Ok(Self {
            elements,
            completion,
            associates,
        })
    }

    /// Number of scalars in the state vector
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[StateElement] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&StateElement> {
        self.elements.get(index)
    }

    /// Properties which need the completion pass, in state order
    pub fn completion(&self) -> &[CompletionItem] {
        &self.completion
    }

    /// Index of the first element of the associate group of the element at `index`
    pub fn associate_index(&self, index: usize) -> Option<usize> {
        self.associates.get(index).copied()
    }

    pub fn associates(&self) -> &[usize] {
        &self.associates
    }

    /// Number of properties of the provided element type in this layout, e.g. the number of STMs
    pub fn count_of(&self, element: StateElementId) -> usize {
        self.elements
            .iter()
            .filter(|elem| elem.element == element && elem.subelement == 1)
            .count()
    }

    /// Initial derivatives, zero unless the owning property declares otherwise
    pub fn initial_derivatives(&self) -> DVector<f64> {
        DVector::from_iterator(
            self.len(),
            self.elements
                .iter()
                .map(|elem| elem.initial_value.unwrap_or(0.0)),
        )
    }

    /// Returns whether any element has a dynamically driven derivative
    pub fn has_dynamic_derivatives(&self) -> bool {
        self.elements.iter().any(|elem| elem.dynamic_derivative)
    }
}
