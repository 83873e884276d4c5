// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The wire representation of an sACN data packet.
//!
//! A source here always sends a start code followed by all 512 channels, so the packet has a fixed length of 638 bytes
//! and every field sits at a fixed offset (see [`crate::e131_definitions`]). Instead of building a packet per send, one
//! [SacnPacket] is kept around and the per-universe fields are restamped right before each transmission.
//!
//! # Examples
//!
//! ```
//! # use sacn_stream_core::{packet::SacnPacket, universe_id::UniverseId};
//! let mut packet = SacnPacket::new();
//! packet.set_source_name("Example Device");
//! packet.set_priority(150).unwrap();
//! packet.set_universe(UniverseId::new(5));
//!
//! let mut channels = [0; 512];
//! channels[0] = 255;
//! packet.set_dmx_payload(&channels);
//!
//! assert_eq!(packet.as_bytes().len(), 638);
//! assert_eq!(packet.as_bytes()[113..115], [0x00, 0x05]);
//! assert_eq!(packet.as_bytes()[126], 255);
//! ```

/// The byteorder crate is used for marshalling data on/off the network in Network Byte Order.
use byteorder::{ByteOrder, NetworkEndian};
/// The uuid crate is used for the cid field in the protocol.
use uuid::Uuid;

use crate::{
    e131_definitions::{
        ACN_PACKET_IDENTIFIER_INDEX, ADDRESS_DATA_FIELD_INDEX, ADDRESS_INCREMENT_FIELD_INDEX, CID_INDEX, DMP_LAYER_INDEX,
        DMP_VECTOR_INDEX, DMX_CHANNEL_COUNT, DMX_DATA_INDEX, DMX_NULL_START_CODE, E131_ACN_PACKET_IDENTIFIER, E131_CID_FIELD_LENGTH,
        E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT, E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD, E131_DATA_PACKET_LENGTH,
        E131_DMP_LAYER_ADDRESS_DATA_FIELD, E131_PDU_FLAGS, E131_PDU_LENGTH_FLAGS_LENGTH, E131_PDU_LENGTH_MASK, E131_POSTAMBLE_SIZE,
        E131_PREAMBLE_SIZE, E131_SOURCE_NAME_FIELD_LENGTH, FIRST_PROPERTY_FIELD_INDEX, FRAMING_LAYER_INDEX, FRAMING_VECTOR_INDEX,
        OPTIONS_FIELD_INDEX, POSTAMBLE_SIZE_INDEX, PREAMBLE_SIZE_INDEX, PRIORITY_INDEX, PROPERTY_VALUE_COUNT_FIELD_INDEX,
        ROOT_LAYER_INDEX, ROOT_VECTOR_INDEX, SEQ_NUM_INDEX, SOURCE_NAME_INDEX, START_CODE_INDEX, SYNC_ADDR_INDEX,
        UNIVERSE_CHANNEL_CAPACITY, UNIVERSE_INDEX, VECTOR_DMP_SET_PROPERTY, VECTOR_E131_DATA_PACKET, VECTOR_ROOT_E131_DATA,
    },
    priority::{Priority, PriorityError},
    source_name::{SourceName, SourceNameError},
    universe_id::UniverseId,
};

/// Byte offsets of the three flags and length fields, outermost first.
const PDU_LENGTH_FLAGS_INDEXES: [usize; 3] = [ROOT_LAYER_INDEX, FRAMING_LAYER_INDEX, DMP_LAYER_INDEX];

/// A full-universe sACN data packet, ready to be handed to a socket.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SacnPacket {
    buf: [u8; E131_DATA_PACKET_LENGTH],
}

impl Default for SacnPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl SacnPacket {
    /// Length of the packet in bytes.
    pub const LENGTH: usize = E131_DATA_PACKET_LENGTH;

    /// Creates a packet with all constant protocol fields and the pdu lengths written.
    ///
    /// Cid, source name, universe, sequence number and channels are zero, the priority is [`Priority::DEFAULT`].
    pub fn new() -> Self {
        let mut packet = Self {
            buf: [0; E131_DATA_PACKET_LENGTH],
        };
        let buf = &mut packet.buf;

        // Root layer
        NetworkEndian::write_u16(&mut buf[PREAMBLE_SIZE_INDEX..POSTAMBLE_SIZE_INDEX], E131_PREAMBLE_SIZE);
        NetworkEndian::write_u16(&mut buf[POSTAMBLE_SIZE_INDEX..ACN_PACKET_IDENTIFIER_INDEX], E131_POSTAMBLE_SIZE);
        buf[ACN_PACKET_IDENTIFIER_INDEX..ROOT_LAYER_INDEX].copy_from_slice(&E131_ACN_PACKET_IDENTIFIER);
        NetworkEndian::write_u32(&mut buf[ROOT_VECTOR_INDEX..CID_INDEX], VECTOR_ROOT_E131_DATA);

        // Framing layer, no synchronization address and no options.
        NetworkEndian::write_u32(&mut buf[FRAMING_VECTOR_INDEX..SOURCE_NAME_INDEX], VECTOR_E131_DATA_PACKET);
        buf[PRIORITY_INDEX] = Priority::DEFAULT.get();
        NetworkEndian::write_u16(&mut buf[SYNC_ADDR_INDEX..SEQ_NUM_INDEX], 0);
        buf[OPTIONS_FIELD_INDEX] = 0;

        // DMP layer
        buf[DMP_VECTOR_INDEX] = VECTOR_DMP_SET_PROPERTY;
        buf[ADDRESS_DATA_FIELD_INDEX] = E131_DMP_LAYER_ADDRESS_DATA_FIELD;
        NetworkEndian::write_u16(
            &mut buf[FIRST_PROPERTY_FIELD_INDEX..ADDRESS_INCREMENT_FIELD_INDEX],
            E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD,
        );
        NetworkEndian::write_u16(
            &mut buf[ADDRESS_INCREMENT_FIELD_INDEX..PROPERTY_VALUE_COUNT_FIELD_INDEX],
            E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT,
        );
        NetworkEndian::write_u16(
            &mut buf[PROPERTY_VALUE_COUNT_FIELD_INDEX..START_CODE_INDEX],
            UNIVERSE_CHANNEL_CAPACITY as u16,
        );
        buf[START_CODE_INDEX] = DMX_NULL_START_CODE;

        packet.set_length_flags();
        packet
    }

    /// Writes the flags and length field of the root, framing and DMP layer.
    ///
    /// Each length counts from the start of its own flags and length field up to the end of the packet. The top 4 bits
    /// hold [`E131_PDU_FLAGS`] as per ANSI E1.31-2018 Section 4 Table 4-1.
    pub fn set_length_flags(&mut self) {
        for index in PDU_LENGTH_FLAGS_INDEXES {
            let length = (E131_DATA_PACKET_LENGTH - index) as u16;
            let flags_and_length = NetworkEndian::read_u16(&[E131_PDU_FLAGS, 0x0]) | length & E131_PDU_LENGTH_MASK;
            NetworkEndian::write_u16(&mut self.buf[index..index + E131_PDU_LENGTH_FLAGS_LENGTH], flags_and_length);
        }
    }

    /// Sets the cid from raw bytes.
    ///
    /// # Errors
    /// InvalidLength: Returned if `cid` isn't exactly 16 bytes long, the packet is left untouched.
    pub fn set_cid(&mut self, cid: &[u8]) -> Result<(), CidError> {
        let cid = Uuid::from_slice(cid).map_err(|_| {
            tracing::warn!(length = cid.len(), "CID must be of length {}", E131_CID_FIELD_LENGTH);
            CidError::InvalidLength(cid.len())
        })?;

        self.set_cid_uuid(&cid);
        Ok(())
    }

    /// Sets the cid.
    pub fn set_cid_uuid(&mut self, cid: &Uuid) {
        self.buf[CID_INDEX..FRAMING_LAYER_INDEX].copy_from_slice(cid.as_bytes());
    }

    /// The cid currently in the packet.
    pub fn cid(&self) -> Uuid {
        let mut bytes = [0; E131_CID_FIELD_LENGTH];
        bytes.copy_from_slice(&self.buf[CID_INDEX..FRAMING_LAYER_INDEX]);
        Uuid::from_bytes(bytes)
    }

    /// Writes the source name followed by a null terminator.
    ///
    /// Names longer than 63 bytes are cut, see [`SourceName::new_truncating`]. Bytes of the field behind the
    /// terminator are left as they are. Returns the number of name bytes written.
    pub fn set_source_name(&mut self, name: &str) -> usize {
        let source_name = SourceName::new_truncating(name);
        if source_name.len() < name.len() {
            tracing::debug!(name, written = source_name.len(), "source name truncated");
        }

        let end = SOURCE_NAME_INDEX + source_name.len();
        self.buf[SOURCE_NAME_INDEX..end].copy_from_slice(source_name.as_bytes());
        self.buf[end] = 0;
        source_name.len()
    }

    /// Parses the source name out of the packet.
    pub fn source_name(&self) -> Result<SourceName, SourceNameError> {
        SourceName::try_from(&self.buf[SOURCE_NAME_INDEX..SOURCE_NAME_INDEX + E131_SOURCE_NAME_FIELD_LENGTH])
    }

    /// Sets the priority.
    ///
    /// # Errors
    /// InvalidValue: Returned if `priority` is above [`Priority::MAX_RAW`], the previous priority stays.
    pub fn set_priority(&mut self, priority: u8) -> Result<(), PriorityError> {
        let priority = Priority::new(priority).inspect_err(|e| tracing::warn!("{e}"))?;
        self.buf[PRIORITY_INDEX] = priority.get();
        Ok(())
    }

    /// The priority currently in the packet.
    pub fn priority(&self) -> u8 {
        self.buf[PRIORITY_INDEX]
    }

    /// Writes the universe, high byte first. Any value is accepted.
    pub fn set_universe(&mut self, universe: UniverseId) {
        NetworkEndian::write_u16(&mut self.buf[UNIVERSE_INDEX..DMP_LAYER_INDEX], universe.get());
    }

    /// The universe currently in the packet.
    pub fn universe(&self) -> UniverseId {
        UniverseId::new(NetworkEndian::read_u16(&self.buf[UNIVERSE_INDEX..DMP_LAYER_INDEX]))
    }

    /// Writes the sequence number.
    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        self.buf[SEQ_NUM_INDEX] = sequence_number;
    }

    /// The sequence number currently in the packet.
    pub fn sequence_number(&self) -> u8 {
        self.buf[SEQ_NUM_INDEX]
    }

    /// Copies the 512 channel values behind the start code.
    pub fn set_dmx_payload(&mut self, channels: &[u8; DMX_CHANNEL_COUNT]) {
        self.buf[DMX_DATA_INDEX..].copy_from_slice(channels);
    }

    /// The 512 channel values, channel 1 first.
    pub fn dmx_payload(&self) -> &[u8] {
        &self.buf[DMX_DATA_INDEX..]
    }

    /// The raw value of the flags and length field of each layer, root layer first.
    pub fn length_flags(&self) -> [u16; 3] {
        PDU_LENGTH_FLAGS_INDEXES.map(|index| NetworkEndian::read_u16(&self.buf[index..index + E131_PDU_LENGTH_FLAGS_LENGTH]))
    }

    /// The bytes to put on the wire.
    pub fn as_bytes(&self) -> &[u8; E131_DATA_PACKET_LENGTH] {
        &self.buf
    }
}

impl AsRef<[u8]> for SacnPacket {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

/// Error for setting the cid of a [SacnPacket]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CidError {
    /// The cid wasn't 16 bytes long.
    ///
    /// # Arguments
    /// 0: Length of the given cid
    #[error("CID must be of length {}, got {}", E131_CID_FIELD_LENGTH, .0)]
    InvalidLength(usize),
}

#[cfg(test)]
mod test {
    use super::*;

    const TEST_CID: [u8; 16] = [
        0x71, 0x2d, 0xfb, 0x4c, 0xe6, 0xa3, 0x4f, 0xeb, 0xaa, 0x99, 0xe5, 0x94, 0x84, 0xb4, 0x5b, 0x1d,
    ];

    #[test]
    fn test_length_flags() {
        let packet = SacnPacket::new();
        let buf = packet.as_bytes();

        // Root layer 638 - 16 = 622 = 0x26e
        assert_eq!(buf[16..18], [0x72, 0x6e]);
        // Framing layer 638 - 38 = 600 = 0x258
        assert_eq!(buf[38..40], [0x72, 0x58]);
        // DMP layer 638 - 115 = 523 = 0x20b
        assert_eq!(buf[115..117], [0x72, 0x0b]);

        assert_eq!(packet.length_flags(), [0x726e, 0x7258, 0x720b]);
    }

    #[test]
    fn test_constant_fields() {
        let packet = SacnPacket::new();
        let buf = packet.as_bytes();

        assert_eq!(buf.len(), 638);
        assert_eq!(buf[0..2], [0x00, 0x10]);
        assert_eq!(buf[2..4], [0x00, 0x00]);
        assert_eq!(&buf[4..16], b"ASC-E1.17\x00\x00\x00");
        assert_eq!(buf[18..22], [0x00, 0x00, 0x00, 0x04]);
        assert_eq!(buf[40..44], [0x00, 0x00, 0x00, 0x02]);
        assert_eq!(buf[117], 0x02);
        assert_eq!(buf[118], 0xa1);
        assert_eq!(buf[119..121], [0x00, 0x00]);
        assert_eq!(buf[121..123], [0x00, 0x01]);
        assert_eq!(buf[123..125], [0x02, 0x01]);
        assert_eq!(buf[125], 0x00);
    }

    #[test]
    fn test_set_cid() {
        let mut packet = SacnPacket::new();
        packet.set_cid(&TEST_CID).unwrap();

        assert_eq!(packet.as_bytes()[22..38], TEST_CID);
        assert_eq!(packet.cid(), Uuid::from_bytes(TEST_CID));
    }

    #[test]
    fn test_set_cid_wrong_length_leaves_packet() {
        let mut packet = SacnPacket::new();
        packet.set_cid(&TEST_CID).unwrap();
        let before = packet.clone();

        assert_eq!(packet.set_cid(&TEST_CID[..15]), Err(CidError::InvalidLength(15)));
        assert_eq!(packet.set_cid(&[0xff; 17]), Err(CidError::InvalidLength(17)));
        assert_eq!(packet.set_cid(&[]), Err(CidError::InvalidLength(0)));
        assert_eq!(packet, before);
    }

    #[test]
    fn test_set_source_name() {
        let mut packet = SacnPacket::new();
        assert_eq!(packet.set_source_name("Example Device"), 14);

        let buf = packet.as_bytes();
        assert_eq!(&buf[44..58], b"Example Device");
        assert_eq!(buf[58], 0x00);
        assert_eq!(packet.source_name().unwrap().as_str(), "Example Device");
    }

    #[test]
    fn test_set_source_name_truncates_to_63_bytes() {
        let mut packet = SacnPacket::new();
        let long = [b'n'; 80];
        assert_eq!(packet.set_source_name(core::str::from_utf8(&long).unwrap()), 63);

        let buf = packet.as_bytes();
        assert_eq!(buf[44..107], [b'n'; 63]);
        assert_eq!(buf[107], 0x00);
        // The priority behind the field is untouched.
        assert_eq!(buf[108], Priority::DEFAULT_RAW);
    }

    #[test]
    fn test_shorter_source_name_keeps_tail() {
        let mut packet = SacnPacket::new();
        packet.set_source_name("A much longer first name");
        packet.set_source_name("Short");

        let buf = packet.as_bytes();
        assert_eq!(&buf[44..49], b"Short");
        assert_eq!(buf[49], 0x00);
        assert_eq!(buf[50..68], b"A much longer first name"[6..24]);
        assert_eq!(packet.source_name().unwrap().as_str(), "Short");
    }

    #[test]
    fn test_set_priority() {
        let mut packet = SacnPacket::new();
        packet.set_priority(0).unwrap();
        assert_eq!(packet.as_bytes()[108], 0);
        packet.set_priority(200).unwrap();
        assert_eq!(packet.as_bytes()[108], 200);

        assert_eq!(packet.set_priority(201), Err(PriorityError::InvalidValue(201)));
        assert_eq!(packet.priority(), 200);
    }

    #[test]
    fn test_set_universe_big_endian() {
        let mut packet = SacnPacket::new();
        packet.set_universe(UniverseId::new(5));
        assert_eq!(packet.as_bytes()[113..115], [0x00, 0x05]);

        packet.set_universe(UniverseId::new(0x1234));
        assert_eq!(packet.as_bytes()[113..115], [0x12, 0x34]);
        assert_eq!(packet.universe().get(), 0x1234);
    }

    #[test]
    fn test_set_universe_out_of_range_unchecked() {
        let mut packet = SacnPacket::new();
        packet.set_universe(UniverseId::new(0));
        assert_eq!(packet.as_bytes()[113..115], [0x00, 0x00]);

        packet.set_universe(UniverseId::new(u16::MAX));
        assert_eq!(packet.as_bytes()[113..115], [0xff, 0xff]);
    }

    #[test]
    fn test_sequence_number_and_payload() {
        let mut packet = SacnPacket::new();
        packet.set_sequence_number(42);
        assert_eq!(packet.as_bytes()[111], 42);
        assert_eq!(packet.sequence_number(), 42);

        let mut channels = [0; DMX_CHANNEL_COUNT];
        channels[0] = 1;
        channels[511] = 2;
        packet.set_dmx_payload(&channels);

        let buf = packet.as_bytes();
        assert_eq!(buf[125], DMX_NULL_START_CODE);
        assert_eq!(buf[126], 1);
        assert_eq!(buf[637], 2);
        assert_eq!(packet.dmx_payload(), &channels[..]);
    }
}
