// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Per-universe state of a source: the sequence counter and the 512 channel values.

extern crate alloc;
use alloc::collections::{
    BTreeMap,
    btree_map::{Iter, IterMut, Keys},
};

use crate::{
    e131_definitions::{DMX_CHANNEL_COUNT, STARTING_SEQUENCE_NUMBER},
    universe_id::UniverseId,
};

/// The state kept for a single universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniverseState {
    sequence_number: u8,
    payload: [u8; DMX_CHANNEL_COUNT],
}

impl Default for UniverseState {
    fn default() -> Self {
        Self {
            sequence_number: STARTING_SEQUENCE_NUMBER,
            payload: [0; DMX_CHANNEL_COUNT],
        }
    }
}

impl UniverseState {
    /// The sequence number the next packet of this universe carries.
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Moves on to the next sequence number, wrapping from 255 to 0.
    pub fn advance_sequence_number(&mut self) {
        self.sequence_number = self.sequence_number.wrapping_add(1);
    }

    /// The channel values, index 0 holds channel 1.
    pub fn payload(&self) -> &[u8; DMX_CHANNEL_COUNT] {
        &self.payload
    }

    /// The value of a single channel, `None` outside of 1 to 512.
    pub fn channel(&self, channel: u16) -> Option<u8> {
        let index = usize::from(channel).checked_sub(1)?;
        self.payload.get(index).copied()
    }

    /// Copies `values` starting at zero based `index`, values past the last channel are dropped.
    fn write(&mut self, index: usize, values: &[u8]) -> usize {
        let count = values.len().min(DMX_CHANNEL_COUNT - index);
        self.payload[index..index + count].copy_from_slice(&values[..count]);
        count
    }
}

/// All universes a source is sending on, ordered by universe id.
///
/// Universes are added on their first write and are never removed.
#[derive(Debug, Clone, Default)]
pub struct UniverseStore {
    universes: BTreeMap<UniverseId, UniverseState>,
}

impl UniverseStore {
    /// The first channel of a universe.
    pub const FIRST_CHANNEL: u16 = 1;
    /// The last channel of a universe.
    pub const LAST_CHANNEL: u16 = DMX_CHANNEL_COUNT as u16;

    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `values` to consecutive channels of `universe`, beginning at `start_channel`.
    ///
    /// The universe is created with all channels at 0 if it is not known yet, this happens even if `start_channel` is
    /// rejected. Values that would land behind channel 512 are dropped. Returns the number of channels written.
    ///
    /// # Errors
    /// StartChannelOutOfRange: Returned if `start_channel` is not within 1 to 512, nothing is written.
    pub fn set_channels(&mut self, start_channel: u16, values: &[u8], universe: UniverseId) -> Result<usize, ChannelError> {
        let state = self.universes.entry(universe).or_insert_with(|| {
            tracing::debug!(%universe, "universe added");
            UniverseState::default()
        });

        if !(Self::FIRST_CHANNEL..=Self::LAST_CHANNEL).contains(&start_channel) {
            tracing::warn!(%universe, "Channel must be between 1 and 512 for DMX protocol. {start_channel}");
            return Err(ChannelError::StartChannelOutOfRange(start_channel));
        }

        let written = state.write(usize::from(start_channel - 1), values);
        if written < values.len() {
            tracing::trace!(%universe, start_channel, dropped = values.len() - written, "channel values clipped");
        }
        Ok(written)
    }

    /// Writes a single channel, see [`Self::set_channels`].
    pub fn set_channel(&mut self, channel: u16, value: u8, universe: UniverseId) -> Result<usize, ChannelError> {
        self.set_channels(channel, &[value], universe)
    }

    /// The state of `universe`, if anything was written to it yet.
    pub fn get(&self, universe: UniverseId) -> Option<&UniverseState> {
        self.universes.get(&universe)
    }

    /// Mutable state of `universe`, if anything was written to it yet.
    pub fn get_mut(&mut self, universe: UniverseId) -> Option<&mut UniverseState> {
        self.universes.get_mut(&universe)
    }

    /// Returns true if `universe` is known.
    pub fn contains(&self, universe: UniverseId) -> bool {
        self.universes.contains_key(&universe)
    }

    /// Number of known universes
    pub fn len(&self) -> usize {
        self.universes.len()
    }

    /// Returns true if no universe is known
    pub fn is_empty(&self) -> bool {
        self.universes.is_empty()
    }

    /// Known universe ids in ascending order.
    pub fn universes(&self) -> Keys<'_, UniverseId, UniverseState> {
        self.universes.keys()
    }

    /// Iterates the universes in ascending order.
    pub fn iter(&self) -> Iter<'_, UniverseId, UniverseState> {
        self.universes.iter()
    }

    /// Iterates the universes mutably in ascending order.
    pub fn iter_mut(&mut self) -> IterMut<'_, UniverseId, UniverseState> {
        self.universes.iter_mut()
    }
}

impl<'a> IntoIterator for &'a mut UniverseStore {
    type Item = (&'a UniverseId, &'a mut UniverseState);
    type IntoIter = IterMut<'a, UniverseId, UniverseState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Error for writing channel values
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The first channel to write is outside of 1 to 512.
    ///
    /// # Arguments
    /// 0: The rejected start channel
    #[error("Channel must be between 1 and 512 for DMX protocol, got {0}")]
    StartChannelOutOfRange(u16),
}
