#![warn(missing_docs)]
//! The errors used within the sacn-stream crate.

// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::{
    packet::CidError, priority::PriorityError, source_name::SourceNameError, universe::ChannelError,
    universe_id::UniverseError,
};

/// Error
///
/// Rejected values never change the state of a client, the previous value stays in place.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO errors
    #[error("std error: {0:?}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Attempted to use a priority outside of the range allowed by ANSI E1.31-2018.
    #[error("priority error: {0:?}")]
    Priority(#[from] PriorityError),

    /// Error with source name
    #[error("source name error: {0:?}")]
    SourceName(#[from] SourceNameError),

    /// Error with universe
    #[error("universe error: {0:?}")]
    Universe(#[from] UniverseError),

    /// Attempted to write channels outside of a universe
    #[error("channel error: {0:?}")]
    Channel(#[from] ChannelError),

    /// Attempted to use a CID that is not 16 bytes long
    #[error("cid error: {0:?}")]
    Cid(#[from] CidError),
}
