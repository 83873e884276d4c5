// Copyright 2020 sacn Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! This module contains all things `SourceName`

use core::{
    fmt::{self, Display},
    str::FromStr,
};

use heapless::{String, Vec};

use crate::e131_definitions::E131_SOURCE_NAME_FIELD_LENGTH;

/// The name of a source
///
/// Always short enough to fit the 64 byte source name field together with its null terminator.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceName {
    inner: String<{ Self::CAPACITY }>,
}

impl Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl core::ops::Deref for SourceName {
    type Target = String<{ Self::CAPACITY }>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl SourceName {
    /// The length of the Source Name field in bytes in an ANSI E1.31-2018 packet as per ANSI E1.31-2018 Section 4, Table 4-1, 4-2, 4-3.
    pub const CAPACITY: usize = E131_SOURCE_NAME_FIELD_LENGTH;

    /// The longest name in bytes, one byte of the field is reserved for the null terminator.
    pub const MAX_LEN: usize = Self::CAPACITY - 1;

    /// Creates a new [SourceName]
    ///
    /// # Errors
    /// SourceNameTooLong: Returned if the name is longer than [`Self::MAX_LEN`] bytes.
    pub fn new<S: AsRef<str>>(s: S) -> Result<Self, SourceNameError> {
        let value = s.as_ref();
        if value.len() > Self::MAX_LEN {
            return Err(SourceNameError::SourceNameTooLong(value.len()));
        }

        let inner = String::from_str(value).map_err(|_| SourceNameError::SourceNameTooLong(value.len()))?;
        Ok(Self { inner })
    }

    /// Creates a new [SourceName], cutting the name down to at most [`Self::MAX_LEN`] bytes.
    ///
    /// The cut is made on a char boundary so the result stays valid UTF-8.
    pub fn new_truncating<S: AsRef<str>>(s: S) -> Self {
        let mut inner = String::new();
        for c in s.as_ref().chars() {
            if inner.len() + c.len_utf8() > Self::MAX_LEN || inner.push(c).is_err() {
                break;
            }
        }
        Self { inner }
    }

    /// Returns a [str] reference
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the length of the source name
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the name is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the bytes this source name is made out of
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl FromStr for SourceName {
    type Err = SourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&[u8]> for SourceName {
    type Error = SourceNameError;

    /// Takes the given source name field and parses the null terminated name out of it.
    ///
    /// # Errors
    /// MissingNullTermination: Returned if the source name is not null terminated as required by ANSI E1.31-2018 Section 6.2.2
    /// SourceNameTooLong: Returned if the source name is too long
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let first_null_pos = value.iter().position(|&b| b == 0).ok_or(SourceNameError::MissingNullTermination)?;

        let as_vec = Vec::from_slice(&value[..first_null_pos]).map_err(|_| SourceNameError::SourceNameTooLong(first_null_pos))?;
        let inner = String::from_utf8(as_vec)?;

        Ok(Self { inner })
    }
}

/// For any source name specific errors
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceNameError {
    /// A source name that's too long was encountered.
    /// Maximum length is [`SourceName::MAX_LEN`]
    ///
    /// # Arguments
    /// Length of too long source name
    #[error("Given source name is too long. Maximum is {} but current name is: {}", SourceName::MAX_LEN, .0)]
    SourceNameTooLong(usize),

    /// A source name is invalid utf8
    #[error("Given source name is invalid utf-8 error: {0:?}")]
    Utf8(#[from] core::str::Utf8Error),

    /// Given source name is not null terminated
    #[error("Given source name is not null terminated")]
    MissingNullTermination,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_rejects_64_bytes() {
        let raw = [b'a'; 64];
        let name = core::str::from_utf8(&raw).unwrap();
        assert_eq!(SourceName::new(name), Err(SourceNameError::SourceNameTooLong(64)));
        assert_eq!(SourceName::new(&name[..63]).unwrap().len(), 63);
    }

    #[test]
    fn test_truncating_keeps_63_bytes() {
        let raw = [b'x'; 100];
        let name = SourceName::new_truncating(core::str::from_utf8(&raw).unwrap());
        assert_eq!(name.len(), SourceName::MAX_LEN);
    }

    #[test]
    fn test_truncating_respects_char_boundary() {
        // 62 ascii bytes followed by a 2 byte char would end on byte 64.
        let mut raw = [b'a'; 64];
        raw[62..].copy_from_slice("é".as_bytes());
        let raw = core::str::from_utf8(&raw).unwrap();
        let name = SourceName::new_truncating(raw);
        assert_eq!(name.len(), 62);
        assert_eq!(name.as_str(), &raw[..62]);
    }

    #[test]
    fn test_truncating_multi_byte_chars() {
        // 22 three byte chars, 21 of them fill the 63 bytes exactly.
        let mut raw = [0u8; 66];
        for chunk in raw.chunks_mut(3) {
            chunk.copy_from_slice("€".as_bytes());
        }
        let raw = core::str::from_utf8(&raw).unwrap();
        let name = SourceName::new_truncating(raw);
        assert_eq!(name.len(), 63);
        assert_eq!(name.as_str(), &raw[..63]);

        assert_eq!(SourceName::new_truncating("").len(), 0);
        assert_eq!(SourceName::new_truncating("Desk").as_str(), "Desk");
    }

    #[test]
    fn test_parse_from_field() {
        let mut field = [0u8; 64];
        field[..4].copy_from_slice(b"Desk");
        assert_eq!(SourceName::try_from(&field[..]).unwrap().as_str(), "Desk");

        let full = [b'a'; 64];
        assert_eq!(SourceName::try_from(&full[..]), Err(SourceNameError::MissingNullTermination));
    }
}
