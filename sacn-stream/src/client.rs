// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A sending sACN source as seen by the host application.
//!
//! The client owns the packet buffer, the universe store, the framerate gate and the transport. The host writes
//! channels whenever it likes and calls [`SacnClient::update`] once per frame, sending happens from there.

use std::{
    net::{Ipv4Addr, SocketAddrV4},
    time::Duration,
};

use uuid::Uuid;

use crate::{
    SacnResult,
    config::SourceConfig,
    packet::SacnPacket,
    scheduler::SendScheduler,
    sender::{MulticastSender, SendReport},
    source_name::SourceName,
    time::{Clock, MonotonicClock},
    transport::{MulticastTransport, Transport},
    universe::UniverseStore,
    universe_id::UniverseId,
};

/// Universe the packet header carries until the first send pass
pub const INITIAL_UNIVERSE: UniverseId = UniverseId::new(1);

/// A source streaming DMX data
#[derive(Debug)]
pub struct SacnClient<T: Transport = MulticastTransport, C: Clock = MonotonicClock> {
    packet: SacnPacket,
    store: UniverseStore,
    scheduler: SendScheduler,
    sender: MulticastSender,
    transport: T,
    clock: C,
    last_update: Duration,
    local_address: Option<Ipv4Addr>,
    netmask: Option<Ipv4Addr>,
}

impl SacnClient {
    /// Creates a client sending through a new [`MulticastTransport`].
    ///
    /// # Errors
    /// Io: Returned if the socket could not be set up.
    ///
    /// Priority: Returned if the configured priority is above 200.
    pub fn new(config: &SourceConfig) -> SacnResult<Self> {
        let transport = MulticastTransport::new(config.local_address, config.multicast_ttl)?;
        Self::with_transport(config, transport, MonotonicClock::new())
    }
}

impl<T: Transport, C: Clock> SacnClient<T, C> {
    /// Creates a client sending through `transport` and measuring time with `clock`.
    ///
    /// The packet header is filled in the order source name, CID, priority, universe.
    ///
    /// # Errors
    /// Priority: Returned if the configured priority is above 200.
    pub fn with_transport(config: &SourceConfig, transport: T, mut clock: C) -> SacnResult<Self> {
        let mut packet = SacnPacket::new();

        packet.set_source_name(&config.source_name);

        let cid = config.cid;
        packet.set_cid_uuid(&cid);

        packet.set_priority(config.priority)?;
        packet.set_universe(INITIAL_UNIVERSE);

        let mut scheduler = SendScheduler::new(config.framerate);
        scheduler.set_use_framerate(config.use_framerate);
        scheduler.set_auto_send(config.auto_send);

        let sender = MulticastSender::new(
            SocketAddrV4::new(config.multicast_group, config.port),
            config.addressing,
            config.sequence_policy,
        );

        let last_update = clock.now();

        tracing::info!(source_name = %config.source_name, %cid, priority = config.priority, group = %sender.group(), "sACN source created");

        Ok(Self {
            packet,
            store: UniverseStore::new(),
            scheduler,
            sender,
            transport,
            clock,
            last_update,
            local_address: config.local_address,
            netmask: config.netmask,
        })
    }

    /// Selects the interface multicast leaves from.
    ///
    /// The netmask is only kept for reference, interface selection goes by address.
    pub fn set_local_address(&mut self, address: Ipv4Addr, netmask: Ipv4Addr) -> SacnResult<()> {
        self.transport.set_interface(address)?;
        self.local_address = Some(address);
        self.netmask = Some(netmask);
        Ok(())
    }

    /// Address of the sending interface, if one was selected
    pub fn local_address(&self) -> Option<Ipv4Addr> {
        self.local_address
    }

    /// Netmask of the sending interface, if one was given
    pub fn netmask(&self) -> Option<Ipv4Addr> {
        self.netmask
    }

    /// Sets the source name carried by every packet, cut down to 63 bytes.
    ///
    /// Returns the number of bytes of `name` that were kept.
    pub fn set_source_name(&mut self, name: &str) -> usize {
        self.packet.set_source_name(name)
    }

    /// Current source name
    pub fn source_name(&self) -> SacnResult<SourceName> {
        Ok(self.packet.source_name()?)
    }

    /// Sets the component identifier.
    ///
    /// # Errors
    /// Cid: Returned if `cid` is not exactly 16 bytes, the previous CID stays.
    pub fn set_cid(&mut self, cid: &[u8]) -> SacnResult<()> {
        self.packet.set_cid(cid)?;
        Ok(())
    }

    /// Current component identifier
    pub fn cid(&self) -> Uuid {
        self.packet.cid()
    }

    /// Sets the priority of the data.
    ///
    /// # Errors
    /// Priority: Returned if `priority` is above 200, the previous priority stays.
    pub fn set_priority(&mut self, priority: u8) -> SacnResult<()> {
        self.packet.set_priority(priority)?;
        Ok(())
    }

    /// Current priority
    pub fn priority(&self) -> u8 {
        self.packet.priority()
    }

    /// Limits sending from [`Self::update`] to the framerate if true, otherwise every update sends.
    pub fn set_use_framerate(&mut self, use_framerate: bool) {
        self.scheduler.set_use_framerate(use_framerate);
    }

    /// Sets the number of send passes per second while the framerate gate is used.
    pub fn set_framerate(&mut self, framerate: f32) {
        self.scheduler.set_framerate(framerate);
    }

    /// Enables or disables sending from [`Self::update`].
    pub fn set_auto_send(&mut self, auto_send: bool) {
        self.scheduler.set_auto_send(auto_send);
    }

    /// Writes a single channel of `universe`.
    ///
    /// # Errors
    /// Channel: Returned if `channel` is not within 1 to 512.
    pub fn set_channel(&mut self, channel: u16, value: u8, universe: u16) -> SacnResult<usize> {
        Ok(self.store.set_channel(channel, value, UniverseId::new(universe))?)
    }

    /// Writes `values` to consecutive channels of `universe`, beginning at `start_channel`.
    ///
    /// Values past channel 512 are dropped. Returns the number of channels written.
    ///
    /// # Errors
    /// Channel: Returned if `start_channel` is not within 1 to 512, nothing is written.
    pub fn set_channels(&mut self, start_channel: u16, values: &[u8], universe: u16) -> SacnResult<usize> {
        Ok(self.store.set_channels(start_channel, values, UniverseId::new(universe))?)
    }

    /// Advances the send scheduler by the time passed since the last update and sends if it is due.
    ///
    /// Returns the outcome of the send pass, `None` if nothing was sent.
    pub fn update(&mut self) -> Option<SendReport> {
        let now = self.clock.now();
        let delta = now.saturating_sub(self.last_update);
        self.last_update = now;

        if self.scheduler.tick(delta) {
            Some(self.send_dmx())
        } else {
            None
        }
    }

    /// Sends every known universe right away, regardless of the scheduler.
    pub fn send_dmx(&mut self) -> SendReport {
        self.sender.send_dmx(&mut self.packet, &mut self.store, &mut self.transport)
    }

    /// The packet as it was last sent
    pub fn packet(&self) -> &SacnPacket {
        &self.packet
    }

    /// The universe store
    pub fn universes(&self) -> &UniverseStore {
        &self.store
    }

    /// The send scheduler
    pub fn scheduler(&self) -> &SendScheduler {
        &self.scheduler
    }

    /// The multicast sender
    pub fn sender(&self) -> &MulticastSender {
        &self.sender
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the clock, for clocks driven by the host
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
