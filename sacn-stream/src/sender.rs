// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The send pass: one data packet per known universe.
//!
//! A single packet buffer is restamped for every universe right before it is handed to the transport. Universes go
//! out in ascending order. Send failures are counted but never abort the pass or reach the caller as an error, the
//! first failure of a sender is logged and later ones are not.

use std::net::SocketAddrV4;

use serde::{Deserialize, Serialize};

use crate::{
    e131_definitions::{ACN_SDT_MULTICAST_PORT, E131_DEFAULT_MULTICAST_GROUP},
    packet::SacnPacket,
    transport::Transport,
    universe::UniverseStore,
    universe_id::UniverseId,
};

/// When the sequence number of a universe moves on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// After every attempt, whether the transport accepted the packet or not.
    #[default]
    Always,
    /// Only after the transport accepted the packet.
    OnSuccess,
}

/// How the destination address of a universe is picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// All universes go to the one configured group.
    #[default]
    FixedGroup,
    /// Every universe goes to its own group, 239.255.hi.lo, as per ANSI E1.31-2018 Section 9.3.1.
    PerUniverse,
}

/// Outcome of a send pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SendReport {
    /// Packets the transport accepted
    pub sent: usize,
    /// Packets the transport rejected
    pub failed: usize,
}

impl SendReport {
    /// Number of universes visited
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }

    /// Returns true if no packet failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Sends the contents of a [`UniverseStore`] through a [`Transport`].
#[derive(Debug, Clone)]
pub struct MulticastSender {
    group: SocketAddrV4,
    addressing: AddressingMode,
    sequence_policy: SequencePolicy,
    failure_logged: bool,
}

impl Default for MulticastSender {
    fn default() -> Self {
        Self::new(
            SocketAddrV4::new(E131_DEFAULT_MULTICAST_GROUP, ACN_SDT_MULTICAST_PORT),
            AddressingMode::default(),
            SequencePolicy::default(),
        )
    }
}

impl MulticastSender {
    /// Creates a sender. `group` is the destination with [`AddressingMode::FixedGroup`], its port is used by both modes.
    pub fn new(group: SocketAddrV4, addressing: AddressingMode, sequence_policy: SequencePolicy) -> Self {
        if !group.ip().is_multicast() {
            tracing::warn!(%group, "destination group is not a multicast address");
        }

        Self {
            group,
            addressing,
            sequence_policy,
            failure_logged: false,
        }
    }

    /// Destination of the packets for `universe`
    pub fn destination(&self, universe: UniverseId) -> SocketAddrV4 {
        match self.addressing {
            AddressingMode::FixedGroup => self.group,
            AddressingMode::PerUniverse => universe.to_ipv4_multicast_addr(self.group.port()),
        }
    }

    /// Group used with [`AddressingMode::FixedGroup`]
    pub fn group(&self) -> SocketAddrV4 {
        self.group
    }

    /// Current addressing mode
    pub fn addressing(&self) -> AddressingMode {
        self.addressing
    }

    /// Current sequence policy
    pub fn sequence_policy(&self) -> SequencePolicy {
        self.sequence_policy
    }

    /// Returns true once a failed send was logged
    pub fn failure_logged(&self) -> bool {
        self.failure_logged
    }

    /// Sends one packet per universe in `store`, in ascending universe order.
    ///
    /// For each universe the universe number, the channel values and the sequence number are written into `packet`,
    /// all other fields are sent as they are.
    pub fn send_dmx<T: Transport + ?Sized>(
        &mut self,
        packet: &mut SacnPacket,
        store: &mut UniverseStore,
        transport: &mut T,
    ) -> SendReport {
        let mut report = SendReport::default();

        for (&universe, state) in store.iter_mut() {
            packet.set_universe(universe);
            packet.set_dmx_payload(state.payload());
            packet.set_sequence_number(state.sequence_number());

            let destination = self.destination(universe);
            let accepted = match transport.send_to(packet.as_bytes(), destination) {
                Ok(()) => {
                    report.sent += 1;
                    true
                }
                Err(e) => {
                    report.failed += 1;
                    if !self.failure_logged {
                        self.failure_logged = true;
                        tracing::warn!(%universe, %destination, error = %e, "sending sACN data failed, further failures are not logged");
                    }
                    false
                }
            };

            if accepted || self.sequence_policy == SequencePolicy::Always {
                state.advance_sequence_number();
            }
        }

        tracing::trace!(sent = report.sent, failed = report.failed, "send pass done");
        report
    }
}

#[cfg(test)]
mod test {
    use std::{
        io,
        net::{Ipv4Addr, SocketAddrV4},
    };

    use super::*;
    use crate::test_log::capture_warnings;

    /// Keeps a copy of everything sent.
    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<(Vec<u8>, SocketAddrV4)>,
    }

    impl Transport for RecordingTransport {
        fn send_to(&mut self, packet: &[u8], destination: SocketAddrV4) -> io::Result<()> {
            self.sent.push((packet.to_vec(), destination));
            Ok(())
        }
    }

    /// Rejects every packet.
    #[derive(Default)]
    struct FailingTransport {
        attempts: usize,
    }

    impl Transport for FailingTransport {
        fn send_to(&mut self, _packet: &[u8], _destination: SocketAddrV4) -> io::Result<()> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::WouldBlock, "send buffer full"))
        }
    }

    fn group() -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::new(239, 255, 0, 1), 5568)
    }

    #[test]
    fn test_universe_and_sequence_stamped() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        let mut transport = RecordingTransport::default();

        store.set_channels(1, &[255, 0, 128], UniverseId::new(5)).unwrap();

        let report = sender.send_dmx(&mut packet, &mut store, &mut transport);
        assert_eq!(report, SendReport { sent: 1, failed: 0 });

        let (bytes, destination) = &transport.sent[0];
        assert_eq!(bytes.len(), 638);
        assert_eq!(bytes[113..115], [0x00, 0x05]);
        assert_eq!(bytes[111], 0x00);
        assert_eq!(bytes[126..129], [255, 0, 128]);
        assert!(bytes[129..].iter().all(|&v| v == 0));
        assert_eq!(*destination, group());

        sender.send_dmx(&mut packet, &mut store, &mut transport);
        assert_eq!(transport.sent[1].0[111], 0x01);
    }

    #[test]
    fn test_ascending_universe_order() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        let mut transport = RecordingTransport::default();

        for universe in [7, 3, 42] {
            store.set_channel(1, universe as u8, UniverseId::new(universe)).unwrap();
        }

        let report = sender.send_dmx(&mut packet, &mut store, &mut transport);
        assert_eq!(report.attempted(), 3);

        let universes: Vec<u16> = transport.sent.iter().map(|(bytes, _)| u16::from_be_bytes([bytes[113], bytes[114]])).collect();
        assert_eq!(universes, [3, 7, 42]);

        let first_channels: Vec<u8> = transport.sent.iter().map(|(bytes, _)| bytes[126]).collect();
        assert_eq!(first_channels, [3, 7, 42]);
    }

    #[test]
    fn test_empty_store_sends_nothing() {
        let mut sender = MulticastSender::default();
        let mut transport = RecordingTransport::default();

        let report = sender.send_dmx(&mut SacnPacket::new(), &mut UniverseStore::new(), &mut transport);
        assert_eq!(report, SendReport::default());
        assert!(transport.sent.is_empty());
    }

    #[test]
    fn test_sequence_wraps_after_256_passes() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        let mut transport = RecordingTransport::default();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();

        for _ in 0..256 {
            sender.send_dmx(&mut packet, &mut store, &mut transport);
        }

        assert_eq!(transport.sent[255].0[111], 255);
        assert_eq!(store.get(UniverseId::new(1)).unwrap().sequence_number(), 0);
    }

    #[test]
    fn test_failures_advance_sequence_by_default() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        let mut transport = FailingTransport::default();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();
        store.set_channel(1, 1, UniverseId::new(2)).unwrap();

        let report = sender.send_dmx(&mut packet, &mut store, &mut transport);
        assert_eq!(report, SendReport { sent: 0, failed: 2 });
        assert!(!report.is_success());
        assert_eq!(transport.attempts, 2);
        assert_eq!(store.get(UniverseId::new(1)).unwrap().sequence_number(), 1);
        assert_eq!(store.get(UniverseId::new(2)).unwrap().sequence_number(), 1);
    }

    #[test]
    fn test_failures_keep_sequence_on_success_policy() {
        let mut sender = MulticastSender::new(group(), AddressingMode::FixedGroup, SequencePolicy::OnSuccess);
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();

        sender.send_dmx(&mut packet, &mut store, &mut FailingTransport::default());
        assert_eq!(store.get(UniverseId::new(1)).unwrap().sequence_number(), 0);

        sender.send_dmx(&mut packet, &mut store, &mut RecordingTransport::default());
        assert_eq!(store.get(UniverseId::new(1)).unwrap().sequence_number(), 1);
    }

    #[test]
    fn test_failure_latch_stays_set() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();
        assert!(!sender.failure_logged());

        sender.send_dmx(&mut packet, &mut store, &mut RecordingTransport::default());
        assert!(!sender.failure_logged());

        sender.send_dmx(&mut packet, &mut store, &mut FailingTransport::default());
        assert!(sender.failure_logged());

        sender.send_dmx(&mut packet, &mut store, &mut RecordingTransport::default());
        assert!(sender.failure_logged());
    }

    #[test]
    fn test_first_failure_logged_once() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        let mut store = UniverseStore::new();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();
        store.set_channel(1, 1, UniverseId::new(2)).unwrap();

        let (_, warnings) = capture_warnings(|| {
            sender.send_dmx(&mut packet, &mut store, &mut FailingTransport::default());
            sender.send_dmx(&mut packet, &mut store, &mut FailingTransport::default());
        });

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("WARN"));
        assert!(warnings[0].contains("sending sACN data failed"));
        assert!(warnings[0].contains("send buffer full"));
    }

    #[test]
    fn test_successful_pass_logs_nothing() {
        let mut sender = MulticastSender::default();
        let mut store = UniverseStore::new();
        store.set_channel(1, 1, UniverseId::new(1)).unwrap();

        let (report, warnings) =
            capture_warnings(|| sender.send_dmx(&mut SacnPacket::new(), &mut store, &mut RecordingTransport::default()));
        assert!(report.is_success());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_per_universe_destination() {
        let mut sender = MulticastSender::new(group(), AddressingMode::PerUniverse, SequencePolicy::Always);
        let mut store = UniverseStore::new();
        let mut transport = RecordingTransport::default();
        store.set_channel(1, 1, UniverseId::new(300)).unwrap();

        sender.send_dmx(&mut SacnPacket::new(), &mut store, &mut transport);
        assert_eq!(transport.sent[0].1, SocketAddrV4::new(Ipv4Addr::new(239, 255, 1, 44), 5568));
        assert_eq!(sender.destination(UniverseId::new(1)).ip(), &Ipv4Addr::new(239, 255, 0, 1));
    }

    #[test]
    fn test_header_fields_untouched() {
        let mut sender = MulticastSender::default();
        let mut packet = SacnPacket::new();
        packet.set_source_name("Example Device");
        packet.set_priority(150).unwrap();
        let header_before = packet.as_bytes()[..111].to_vec();

        let mut store = UniverseStore::new();
        store.set_channel(1, 1, UniverseId::new(9)).unwrap();
        let mut transport = RecordingTransport::default();
        sender.send_dmx(&mut packet, &mut store, &mut transport);

        assert_eq!(transport.sent[0].0[..111], header_before[..]);
    }
}
