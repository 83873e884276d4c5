// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Constants of ANSI E1.31-2018 needed to build a full-universe data packet.
//!
//! A data packet sent by this crate always carries a start code and all 512 channels, so every field lives
//! at a fixed offset. The offsets are derived from the field lengths of ANSI E1.31-2018 Section 4, Table 4-1.

use core::net::Ipv4Addr;

/// The port number used for the ACN family of protocols and therefore the sACN protocol.
/// As defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative)
pub const ACN_SDT_MULTICAST_PORT: u16 = 5568;

/// The multicast group all universes are sent to unless per-universe addressing is enabled.
pub const E131_DEFAULT_MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 0, 1);

/// Value of the highest byte of the IPV4 multicast address as specified in section 9.3.1 of ANSI E1.31-2018.
pub const E131_MULTICAST_IPV4_HIGHEST_BYTE: u8 = 239;

/// Value of the second highest byte of the IPV4 multicast address as specified in section 9.3.1 of ANSI E1.31-2018.
pub const E131_MULTICAST_IPV4_SECOND_BYTE: u8 = 255;

/// The size of the ACN root layer preamble, must be 0x0010 bytes as per ANSI E1.31-2018 Section 5.1.
pub const E131_PREAMBLE_SIZE: u16 = 0x0010;

/// The size of the ACN root layer postamble, must be 0x0 bytes as per ANSI E1.31-2018 Section 5.2.
pub const E131_POSTAMBLE_SIZE: u16 = 0x0;

/// The E131 ACN packet identifier field value. Must be 0x41 0x53 0x43 0x2d 0x45 0x31 0x2e 0x31 0x37 0x00 0x00 0x00 as per
/// ANSI E1.31-2018 Section 5.3.
pub const E131_ACN_PACKET_IDENTIFIER: [u8; 12] = [0x41, 0x53, 0x43, 0x2d, 0x45, 0x31, 0x2e, 0x31, 0x37, 0x00, 0x00, 0x00];

/// The pdu flags expected for an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4 Table 4-1, 4-2, 4-3.
pub const E131_PDU_FLAGS: u8 = 0x70;

/// Mask of the 12 bits of a flags and length field holding the pdu length.
pub const E131_PDU_LENGTH_MASK: u16 = 0x0fff;

/// The vector field value used to identify the ACN packet as an ANSI E1.31 data packet.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_ROOT_E131_DATA: u32 = 0x0000_0004;

/// The E1.31 framing layer vector field value used to identify the E1.31 packet as a data packet.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_E131_DATA_PACKET: u32 = 0x0000_0002;

/// Used at the DMP layer in E1.31 data packets to identify the packet as a set property message.
/// Value as defined in ANSI E1.31-2018 Appendix A: Defined Parameters (Normative).
pub const VECTOR_DMP_SET_PROPERTY: u8 = 0x02;

/// The value of the "Address Type and Data Type" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DMP_LAYER_ADDRESS_DATA_FIELD: u8 = 0xa1;

/// The value of the "First Property Address" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_FIELD: u16 = 0x0000;

/// The value of the "Address Increment" field within an ANSI E1.31-2018 data packet DMP layer as per ANSI E1.31-2018
/// Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT: u16 = 0x0001;

/// The null start code for dimmer data, carried in front of the channel values.
pub const DMX_NULL_START_CODE: u8 = 0x00;

/// The number of channels in one DMX universe.
pub const DMX_CHANNEL_COUNT: usize = 512;

/// The payload capacity for a sacn packet, for DMX data this is 512 channels + a start code byte.
pub const UNIVERSE_CHANNEL_CAPACITY: usize = DMX_CHANNEL_COUNT + 1;

/// The initial/starting sequence number used.
pub const STARTING_SEQUENCE_NUMBER: u8 = 0;

/// The length of the pdu flags and length field in bytes.
pub const E131_PDU_LENGTH_FLAGS_LENGTH: usize = 2;

/// The length in bytes of the root layer vector field as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_ROOT_LAYER_VECTOR_LENGTH: usize = 4;

/// The E131 CID field length in bytes as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_CID_FIELD_LENGTH: usize = 16;

/// The length in bytes of the E1.31 framing layer vector field as per ANSI E1.31-2018 Section 4 Table 4-1.
pub const E131_FRAMING_LAYER_VECTOR_LENGTH: usize = 4;

/// The length of the Source Name field in bytes in an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SOURCE_NAME_FIELD_LENGTH: usize = 64;

/// The length in bytes of the priority field as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_PRIORITY_FIELD_LENGTH: usize = 1;

/// The length of the Synchronisation Address field in bytes as per ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SYNC_ADDR_FIELD_LENGTH: usize = 2;

/// The length in bytes of the sequence number field as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_SEQ_NUM_FIELD_LENGTH: usize = 1;

/// The length in bytes of the options field as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_OPTIONS_FIELD_LENGTH: usize = 1;

/// The length in bytes of a universe field as defined in ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_UNIVERSE_FIELD_LENGTH: usize = 2;

/// The length in bytes of the Vector field within the DMP layer as per ANSI E1.31-2018 Section 4, Table 4-1.
pub const E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH: usize = 1;

/// The length in bytes of the "Address Type and Data Type" field within the DMP layer.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH: usize = 1;

/// The length in bytes of the "First Property Address" field within the DMP layer.
pub const E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH: usize = 2;

/// The length in bytes of the "Address Increment" field within the DMP layer.
pub const E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH: usize = 2;

/// The length in bytes of the "Property value count" field within the DMP layer.
pub const E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH: usize = 2;

// Calculate the indexes of the fields within the buffer based on the size of the fields previous.
// Theses indexes are only valid for a data packet carrying a full universe.

/// Index of the preamble size field.
pub const PREAMBLE_SIZE_INDEX: usize = 0;
/// Index of the post-amble size field.
pub const POSTAMBLE_SIZE_INDEX: usize = PREAMBLE_SIZE_INDEX + 2;
/// Index of the ACN packet identifier.
pub const ACN_PACKET_IDENTIFIER_INDEX: usize = POSTAMBLE_SIZE_INDEX + 2;
/// Index of the root layer flags and length field.
pub const ROOT_LAYER_INDEX: usize = ACN_PACKET_IDENTIFIER_INDEX + E131_ACN_PACKET_IDENTIFIER.len();
/// Index of the root layer vector.
pub const ROOT_VECTOR_INDEX: usize = ROOT_LAYER_INDEX + E131_PDU_LENGTH_FLAGS_LENGTH;
/// Index of the CID.
pub const CID_INDEX: usize = ROOT_VECTOR_INDEX + E131_ROOT_LAYER_VECTOR_LENGTH;
/// Index of the framing layer flags and length field.
pub const FRAMING_LAYER_INDEX: usize = CID_INDEX + E131_CID_FIELD_LENGTH;
/// Index of the framing layer vector.
pub const FRAMING_VECTOR_INDEX: usize = FRAMING_LAYER_INDEX + E131_PDU_LENGTH_FLAGS_LENGTH;
/// Index of the source name.
pub const SOURCE_NAME_INDEX: usize = FRAMING_VECTOR_INDEX + E131_FRAMING_LAYER_VECTOR_LENGTH;
/// Index of the priority.
pub const PRIORITY_INDEX: usize = SOURCE_NAME_INDEX + E131_SOURCE_NAME_FIELD_LENGTH;
/// Index of the synchronization address.
pub const SYNC_ADDR_INDEX: usize = PRIORITY_INDEX + E131_PRIORITY_FIELD_LENGTH;
/// Index of the sequence number.
pub const SEQ_NUM_INDEX: usize = SYNC_ADDR_INDEX + E131_SYNC_ADDR_FIELD_LENGTH;
/// Index of the options bit field.
pub const OPTIONS_FIELD_INDEX: usize = SEQ_NUM_INDEX + E131_SEQ_NUM_FIELD_LENGTH;
/// Index of the universe.
pub const UNIVERSE_INDEX: usize = OPTIONS_FIELD_INDEX + E131_OPTIONS_FIELD_LENGTH;
/// Index of the DMP layer flags and length field.
pub const DMP_LAYER_INDEX: usize = UNIVERSE_INDEX + E131_UNIVERSE_FIELD_LENGTH;
/// Index of the DMP layer vector.
pub const DMP_VECTOR_INDEX: usize = DMP_LAYER_INDEX + E131_PDU_LENGTH_FLAGS_LENGTH;
/// Index of the address type and data type field.
pub const ADDRESS_DATA_FIELD_INDEX: usize = DMP_VECTOR_INDEX + E131_DATA_PACKET_DMP_LAYER_VECTOR_FIELD_LENGTH;
/// Index of the first property address.
pub const FIRST_PROPERTY_FIELD_INDEX: usize = ADDRESS_DATA_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_ADDRESS_DATA_FIELD_LENGTH;
/// Index of the address increment.
pub const ADDRESS_INCREMENT_FIELD_INDEX: usize =
    FIRST_PROPERTY_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_FIRST_PROPERTY_ADDRESS_FIELD_LENGTH;
/// Index of the property value count.
pub const PROPERTY_VALUE_COUNT_FIELD_INDEX: usize =
    ADDRESS_INCREMENT_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_ADDRESS_INCREMENT_FIELD_LENGTH;
/// Index of the DMX start code, the first property value.
pub const START_CODE_INDEX: usize = PROPERTY_VALUE_COUNT_FIELD_INDEX + E131_DATA_PACKET_DMP_LAYER_PROPERTY_VALUE_COUNT_FIELD_LENGTH;
/// Index of DMX channel 1.
pub const DMX_DATA_INDEX: usize = START_CODE_INDEX + 1;

/// Total length of a data packet carrying a full universe, 638 bytes.
pub const E131_DATA_PACKET_LENGTH: usize = DMX_DATA_INDEX + DMX_CHANNEL_COUNT;
