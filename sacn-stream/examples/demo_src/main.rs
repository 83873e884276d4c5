// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Blinks the first three channels of universe 1.
//!
//! Usage: `cargo run --example demo_src [config.toml]`, log output is controlled with `RUST_LOG`.

mod error;

use std::{thread::sleep, time::Duration};

use sacn_stream::{client::SacnClient, config::SourceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use error::ExampleResult;

const UNIVERSE: u16 = 1;
const FRAME_TIME: Duration = Duration::from_millis(16);

fn main() -> ExampleResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SourceConfig::from_file(path)?,
        None => SourceConfig {
            source_name: "sacn-stream demo".to_string(),
            ..SourceConfig::default()
        },
    };

    let mut client = SacnClient::new(&config)?;
    client.set_use_framerate(false);

    let mut frame: u64 = 0;
    loop {
        let on = |bit: u64| -> u8 { if (frame >> bit) & 1 == 1 { 255 } else { 0 } };
        client.set_channels(1, &[on(4), on(5), on(6)], UNIVERSE)?;

        if let Some(report) = client.update() {
            if !report.is_success() {
                tracing::debug!(failed = report.failed, "frame {frame} not fully sent");
            }
        }

        frame = frame.wrapping_add(1);
        sleep(FRAME_TIME);
    }
}
