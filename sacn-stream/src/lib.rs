// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Streaming of DMX512 data with the sACN network protocol.
//!
//! This crate sends DMX512 universes as ANSI E1.31-2018 data packets over UDP multicast. Channel values are written
//! into a per-universe store at any time, the client then sends every known universe whenever its framerate gate
//! opens. Only sending is supported, there is no receiving, universe discovery, synchronisation or priority merging.
//!
//! # Examples
//!
//! Creating a client and streaming some channels on universe 1.
//!
//! ```no_run
//! use sacn_stream::client::SacnClient;
//! use sacn_stream::config::SourceConfig;
//!
//! let config = SourceConfig {
//!     source_name: "Stage Left".to_string(),
//!     ..SourceConfig::default()
//! };
//!
//! let mut client = SacnClient::new(&config).unwrap();
//!
//! // Channels 1 to 3 of universe 1, every other channel stays at 0.
//! client.set_channels(1, &[255, 0, 128], 1).unwrap();
//!
//! // Called once per frame of the host application, sends whenever the framerate gate opens.
//! loop {
//!     client.update();
//!     std::thread::sleep(std::time::Duration::from_millis(5));
//! }
//! ```
//!
//! Loading the configuration from a TOML file.
//!
//! ```no_run
//! use sacn_stream::config::SourceConfig;
//!
//! let config = SourceConfig::from_file("sacn.toml").unwrap();
//! println!("{}", config.source_name);
//! ```

#![doc(html_root_url = "https://docs.rs/sacn-stream/")]

pub use sacn_stream_core::{e131_definitions, packet, priority, scheduler, source_name, time, universe, universe_id};

pub mod client;
pub mod config;
pub mod error;
pub mod sender;
pub mod transport;

#[cfg(test)]
mod test_log;

pub type SacnResult<T> = Result<T, error::Error>;
