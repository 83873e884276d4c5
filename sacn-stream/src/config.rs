// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration of a sending source.
//!
//! Every field has a default, so a TOML file only needs to list what differs:
//!
//! ```toml
//! source_name = "Stage Left"
//! priority = 150
//! local_address = "192.168.1.22"
//! netmask = "255.255.255.0"
//! framerate = 44.0
//! ```

use std::{fs, net::Ipv4Addr, path::Path};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    SacnResult,
    e131_definitions::{ACN_SDT_MULTICAST_PORT, E131_DEFAULT_MULTICAST_GROUP},
    scheduler::DEFAULT_FRAMERATE,
    sender::{AddressingMode, SequencePolicy},
};

/// Source name used when none is configured
pub const DEFAULT_SOURCE_NAME: &str = "sacn-stream";

/// Priority used when none is configured
pub const DEFAULT_SOURCE_PRIORITY: u8 = 200;

/// Component identifier used when none is configured.
///
/// Receivers tell sources apart by their CID, so it stays the same across restarts of a device.
pub const DEFAULT_CID: Uuid = Uuid::from_bytes([
    0x71, 0x2d, 0xfb, 0x4c, 0xe6, 0xa3, 0x4f, 0xeb, 0xaa, 0x99, 0xe5, 0x94, 0x84, 0xb4, 0x5b, 0x1d,
]);

/// Multicast TTL used when none is configured
pub const DEFAULT_MULTICAST_TTL: u32 = 1;

/// Everything needed to set up a [`crate::client::SacnClient`]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Name announced in every packet, cut down to 63 bytes.
    pub source_name: String,

    /// Component identifier of this source, stable per device.
    pub cid: Uuid,

    /// Priority of the data, 0 to 200.
    pub priority: u8,

    /// Address of the network interface to send from, the system picks one if missing.
    pub local_address: Option<Ipv4Addr>,

    /// Netmask of the sending interface, informational only.
    pub netmask: Option<Ipv4Addr>,

    /// Group used with [`AddressingMode::FixedGroup`].
    pub multicast_group: Ipv4Addr,

    /// Destination port.
    pub port: u16,

    /// How the destination of each universe is chosen.
    pub addressing: AddressingMode,

    /// Send passes per second while the framerate gate is enabled.
    pub framerate: f32,

    /// Limit sending to `framerate`, otherwise every update sends.
    pub use_framerate: bool,

    /// Send from `update`, otherwise only explicit sends go out.
    pub auto_send: bool,

    /// When sequence numbers move on.
    pub sequence_policy: SequencePolicy,

    /// Time to live of outgoing multicast datagrams.
    pub multicast_ttl: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            cid: DEFAULT_CID,
            priority: DEFAULT_SOURCE_PRIORITY,
            local_address: None,
            netmask: None,
            multicast_group: E131_DEFAULT_MULTICAST_GROUP,
            port: ACN_SDT_MULTICAST_PORT,
            addressing: AddressingMode::default(),
            framerate: DEFAULT_FRAMERATE,
            use_framerate: true,
            auto_send: true,
            sequence_policy: SequencePolicy::default(),
            multicast_ttl: DEFAULT_MULTICAST_TTL,
        }
    }
}

impl SourceConfig {
    /// Parses a configuration from TOML, missing fields take their default.
    pub fn from_toml_str(contents: &str) -> SacnResult<Self> {
        let config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    /// Io: Returned if the file could not be read.
    ///
    /// Config: Returned if the contents are not a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SacnResult<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading source config");
        Self::from_toml_str(&contents)
    }
}
