// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![no_std]
#![warn(missing_docs)]

//! Core types for the sacn-stream crate
//!
//! Everything in here is transport agnostic: the fixed 638 byte data packet, the per-universe
//! channel store and the framerate gate deciding when a send pass happens.

pub mod e131_definitions;
pub mod packet;
pub mod priority;
pub mod scheduler;
pub mod source_name;
pub mod time;
pub mod universe;
pub mod universe_id;
