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

/// Fixed capacity ring of the most recent samples of a stopping condition.
///
/// The write position only ever increases, the slot of a position is `pos % capacity`, so only
/// the last `capacity` pushed samples are retained and no data is ever shifted.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRing<T: Copy> {
    slots: Vec<T>,
    write_pos: usize,
    capacity: usize,
}

impl<T: Copy> SampleRing<T> {
    /// Creates an empty ring. The capacity is at least one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            write_pos: 0,
            capacity,
        }
    }

    /// Stores a sample, returning the evicted oldest sample if the ring was full
    pub fn push(&mut self, sample: T) -> Option<T> {
        let idx = self.write_pos % self.capacity;
        self.write_pos += 1;
        if self.slots.len() < self.capacity {
            self.slots.push(sample);
            None
        } else {
            Some(std::mem::replace(&mut self.slots[idx], sample))
        }
    }

    /// Iterates from the oldest to the newest retained sample
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let start = self.write_pos - self.len();
        (start..self.write_pos).map(move |pos| self.slots[pos % self.capacity])
    }

    pub fn oldest(&self) -> Option<T> {
        self.iter().next()
    }

    pub fn newest(&self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[(self.write_pos - 1) % self.capacity])
        }
    }

    /// Forgets all samples, the capacity is kept
    pub fn clear(&mut self) {
        self.slots.clear();
        self.write_pos = 0;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
