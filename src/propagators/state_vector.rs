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

use super::StateLayout;
use crate::errors::{SizeMismatchSnafu, SyncError};
use crate::linalg::DVector;
use crate::time::Epoch;
use snafu::ensure;
use std::fmt;
use std::ops::{Index, IndexMut};

/// The flat vector integrated by the propagator, with its single epoch.
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    epoch: Epoch,
    data: DVector<f64>,
    descriptions: Vec<String>,
    associates: Vec<usize>,
}

impl StateVector {
    /// An empty state vector, used before any layout is built
    pub fn empty() -> Self {
        Self {
            epoch: Epoch::from_tai_seconds(0.0),
            data: DVector::zeros(0),
            descriptions: Vec::new(),
            associates: Vec::new(),
        }
    }

    /// A zero filled state vector shaped after the provided layout
    pub fn zeros(layout: &StateLayout, epoch: Epoch) -> Self {
        Self {
            epoch,
            data: DVector::zeros(layout.len()),
            descriptions: layout.elements().iter().map(|e| format!("{e}")).collect(),
            associates: layout.associates().to_vec(),
        }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn set_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &DVector<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DVector<f64> {
        &mut self.data
    }

    /// Replaces the data of this vector, which must keep its size.
    pub fn set_data(&mut self, data: &DVector<f64>) -> Result<(), SyncError> {
        ensure!(
            data.len() == self.data.len(),
            SizeMismatchSnafu {
                expected: self.data.len(),
                found: data.len()
            }
        );
        self.data.copy_from(data);
        Ok(())
    }

    /// Description of the element at `index`, formatted as `Object.Property.k`
    pub fn description(&self, index: usize) -> Option<&str> {
        self.descriptions.get(index).map(|s| s.as_str())
    }

    /// Index of the first element sharing the associate of the element at `index`
    pub fn associate(&self, index: usize) -> Option<usize> {
        self.associates.get(index).copied()
    }
}

impl Default for StateVector {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<usize> for StateVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for StateVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state @ {} ({} elements)", self.epoch, self.len())?;
        for (desc, value) in self.descriptions.iter().zip(self.data.iter()) {
            write!(f, "\n  {desc} = {value}")?;
        }
        Ok(())
    }
}
