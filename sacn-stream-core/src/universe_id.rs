// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! This module contains all things `Universe` according to ANSI E1.31-2018, Section 3.3.
//!
//! Unlike a receiver, a source here stamps whatever universe number it is handed into the packet. Validation against
//! the range of ANSI E1.31-2018 Section 9.1.1 is available through [`UniverseId::in_range`] but is never forced.

use core::{
    fmt::Display,
    net::{Ipv4Addr, SocketAddrV4},
};

use crate::e131_definitions::{E131_MULTICAST_IPV4_HIGHEST_BYTE, E131_MULTICAST_IPV4_SECOND_BYTE};

/// Universe identifier
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UniverseId(u16);

impl Display for UniverseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for UniverseId {
    fn from(raw_universe: u16) -> Self {
        Self(raw_universe)
    }
}

impl From<UniverseId> for u16 {
    fn from(universe: UniverseId) -> Self {
        universe.0
    }
}

impl PartialEq<u16> for UniverseId {
    fn eq(&self, other: &u16) -> bool {
        self.0.eq(other)
    }
}

impl UniverseId {
    /// The lowest / minimum universe number that can be used with the E1.31 protocol as specified in section 9.1.1 of ANSI E1.31-2018.
    pub const MIN_RAW: u16 = 1;
    /// See [Self::MIN_RAW]
    pub const MIN: Self = Self(Self::MIN_RAW);

    /// The maximum universe number that can be used with the E1.31 protocol as specified in section 9.1.1 of ANSI E1.31-2018.
    pub const MAX_RAW: u16 = 63999;
    /// See [Self::MAX_RAW]
    pub const MAX: Self = Self(Self::MAX_RAW);

    /// Create a new universe, any value is accepted
    pub const fn new(raw_universe: u16) -> Self {
        Self(raw_universe)
    }

    /// Create a new universe, rejecting values outside of [`Self::MIN_RAW`] to [`Self::MAX_RAW`]
    pub const fn checked(raw_universe: u16) -> Result<Self, UniverseError> {
        match Self::in_range(raw_universe) {
            Ok(()) => Ok(Self(raw_universe)),
            Err(e) => Err(e),
        }
    }

    /// Checks if the given universe is a valid universe to send on (within allowed range).
    ///
    /// # Errors
    /// InvalidValue: Returned if the universe is outside the allowed range of universes.
    pub const fn in_range(raw_universe: u16) -> Result<(), UniverseError> {
        if Self::MIN_RAW <= raw_universe && raw_universe <= Self::MAX_RAW {
            return Ok(());
        }

        Err(UniverseError::InvalidValue(raw_universe))
    }

    /// Returns true if this universe lies in the range allowed by ANSI E1.31-2018 Section 9.1.1
    pub const fn is_valid(&self) -> bool {
        Self::in_range(self.0).is_ok()
    }

    /// Converts the given ANSI E1.31-2018 universe into an Ipv4 multicast address with the given port.
    ///
    /// Conversion done as specified in section 9.3.1 of ANSI E1.31-2018
    pub const fn to_ipv4_multicast_addr(&self, port: u16) -> SocketAddrV4 {
        let [high_byte, low_byte] = self.0.to_be_bytes();

        // As per ANSI E1.31-2018 Section 9.3.1 Table 9-10.
        SocketAddrV4::new(
            Ipv4Addr::new(E131_MULTICAST_IPV4_HIGHEST_BYTE, E131_MULTICAST_IPV4_SECOND_BYTE, high_byte, low_byte),
            port,
        )
    }

    /// Create a new universe from bytes in big endian order
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self::new(u16::from_be_bytes(bytes))
    }

    /// Get the inner value
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Error for checked creation of [UniverseId]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    /// Attempted to use invalid value for universe. Allowed values are:
    /// - Range from [`UniverseId::MIN`] to [`UniverseId::MAX`] inclusive
    ///
    /// # Arguments
    /// 0: Value of invalid universe
    #[error("Invalid universe used. Must be in the range [{} - {}], universe: {}", UniverseId::MIN_RAW, UniverseId::MAX_RAW, .0)]
    InvalidValue(u16),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::e131_definitions::ACN_SDT_MULTICAST_PORT;

    /// The universe_to tests below check that the conversion from a universe to an IPv4 multicast address is done as
    /// per ANSI E1.31-2018 Section 9.3.1 Table 9-10.
    #[test]
    fn test_universe_to_ipv4_lowest_byte_normal() {
        let address = UniverseId::new(119).to_ipv4_multicast_addr(ACN_SDT_MULTICAST_PORT);
        assert!(address.ip().is_multicast());
        assert_eq!(address, SocketAddrV4::new(Ipv4Addr::new(239, 255, 0, 119), ACN_SDT_MULTICAST_PORT));
    }

    #[test]
    fn test_universe_to_ip_ipv4_both_bytes_normal() {
        let val: u16 = 300;
        let address = UniverseId::new(val).to_ipv4_multicast_addr(ACN_SDT_MULTICAST_PORT);
        assert_eq!(
            address,
            SocketAddrV4::new(Ipv4Addr::new(239, 255, (val / 256) as u8, (val % 256) as u8), ACN_SDT_MULTICAST_PORT)
        );
    }

    #[test]
    fn test_universe_to_ip_ipv4_limit_high() {
        let address = UniverseId::MAX.to_ipv4_multicast_addr(ACN_SDT_MULTICAST_PORT);
        assert_eq!(address.ip(), &Ipv4Addr::new(239, 255, 249, 255));
    }

    #[test]
    fn test_unchecked_accepts_out_of_range() {
        assert_eq!(UniverseId::new(0).get(), 0);
        assert!(!UniverseId::new(0).is_valid());
        assert!(!UniverseId::new(64000).is_valid());
        assert!(UniverseId::new(1).is_valid());
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert_eq!(UniverseId::checked(0), Err(UniverseError::InvalidValue(0)));
        assert_eq!(UniverseId::checked(64000), Err(UniverseError::InvalidValue(64000)));
        assert_eq!(UniverseId::checked(63999), Ok(UniverseId::MAX));
    }
}
