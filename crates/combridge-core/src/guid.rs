//! 128-bit interface identifiers.
//!
//! A [`Guid`] stores the *logical* identifier as the four 32-bit groups that
//! appear in an identifier declaration such as
//! `DECLARE_CLASS_IID(IFoo, 0x11111111, 0x22222222, 0x33333333, 0x44444444)`.
//!
//! The foreign ABI passes identifiers as 16 raw bytes, and two serializations
//! of the same logical value are legal:
//!
//! - [`ByteOrder::ComCompatible`]: the first group little-endian, the second
//!   group as two little-endian 16-bit halves (high half first), the last two
//!   groups big-endian. Used when the executing platform is Windows.
//! - [`ByteOrder::BigEndian`]: all four groups big-endian. Used everywhere else.
//!
//! Encoding and decoding under the same order always round-trips to the same
//! logical value.
//!
//! # Examples
//!
//! ```
//! use combridge_core::{ByteOrder, Guid};
//!
//! let iid = Guid::from_words(0x11111111, 0x22223333, 0x44444444, 0x55555555);
//! let com = iid.to_bytes(ByteOrder::ComCompatible);
//! let be = iid.to_bytes(ByteOrder::BigEndian);
//! assert_ne!(com, be);
//! assert_eq!(Guid::from_bytes(com, ByteOrder::ComCompatible), iid);
//! assert_eq!(Guid::from_bytes(be, ByteOrder::BigEndian), iid);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serialization order of a [`Guid`] in its 16-byte ABI form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// COM-compatible layout (Windows).
    ComCompatible,
    /// Plain big-endian layout (every other platform).
    BigEndian,
}

impl ByteOrder {
    /// The byte order of the platform this code is executing on.
    ///
    /// This is decided by the target the calling crate is compiled for, never
    /// by the machine that generated the bindings.
    #[inline]
    pub const fn native() -> Self {
        if cfg!(target_os = "windows") {
            ByteOrder::ComCompatible
        } else {
            ByteOrder::BigEndian
        }
    }
}

/// A 128-bit interface identifier, stored as its logical value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Guid([u32; 4]);

impl Guid {
    /// The all-zero identifier.
    pub const NULL: Guid = Guid([0; 4]);

    /// Create an identifier from its four 32-bit groups, in declaration order.
    #[inline]
    pub const fn from_words(a: u32, b: u32, c: u32, d: u32) -> Self {
        Guid([a, b, c, d])
    }

    /// The four 32-bit groups, in declaration order.
    #[inline]
    pub const fn words(&self) -> [u32; 4] {
        self.0
    }

    /// Serialize to the 16-byte ABI form using `order`.
    pub const fn to_bytes(&self, order: ByteOrder) -> [u8; 16] {
        let [a, b, c, d] = self.0;
        let mut out = [0u8; 16];

        let head = match order {
            ByteOrder::ComCompatible => {
                let a = a.to_le_bytes();
                // Data2 is the high half of the second group, Data3 the low half.
                let hi = ((b >> 16) as u16).to_le_bytes();
                let lo = ((b & 0xFFFF) as u16).to_le_bytes();
                [a[0], a[1], a[2], a[3], hi[0], hi[1], lo[0], lo[1]]
            }
            ByteOrder::BigEndian => {
                let a = a.to_be_bytes();
                let b = b.to_be_bytes();
                [a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3]]
            }
        };

        let c = c.to_be_bytes();
        let d = d.to_be_bytes();
        let tail = [c[0], c[1], c[2], c[3], d[0], d[1], d[2], d[3]];

        let mut i = 0;
        while i < 8 {
            out[i] = head[i];
            out[i + 8] = tail[i];
            i += 1;
        }
        out
    }

    /// Decode the 16-byte ABI form written with `order`.
    pub const fn from_bytes(bytes: [u8; 16], order: ByteOrder) -> Self {
        let (a, b) = match order {
            ByteOrder::ComCompatible => {
                let a = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                let hi = u16::from_le_bytes([bytes[4], bytes[5]]) as u32;
                let lo = u16::from_le_bytes([bytes[6], bytes[7]]) as u32;
                (a, (hi << 16) | lo)
            }
            ByteOrder::BigEndian => (
                u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
                u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            ),
        };
        let c = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let d = u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        Guid([a, b, c, d])
    }

    /// Serialize using the executing platform's byte order.
    #[inline]
    pub const fn to_native_bytes(&self) -> [u8; 16] {
        self.to_bytes(ByteOrder::native())
    }

    /// Decode bytes written in the executing platform's byte order.
    #[inline]
    pub const fn from_native_bytes(bytes: [u8; 16]) -> Self {
        Self::from_bytes(bytes, ByteOrder::native())
    }

    /// Check if this is the all-zero identifier.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:08X}-{b:08X}-{c:08X}-{d:08X}")
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

/// Error parsing the textual `XXXXXXXX-XXXXXXXX-XXXXXXXX-XXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{text}': expected four groups of 8 hex digits")]
pub struct GuidParseError {
    /// The rejected input.
    pub text: String,
}

impl FromStr for Guid {
    type Err = GuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || GuidParseError {
            text: s.to_string(),
        };

        let mut words = [0u32; 4];
        let mut groups = s.split('-');
        for word in &mut words {
            let group = groups.next().ok_or_else(err)?;
            if group.len() != 8 {
                return Err(err());
            }
            *word = u32::from_str_radix(group, 16).map_err(|_| err())?;
        }
        if groups.next().is_some() {
            return Err(err());
        }
        Ok(Guid(words))
    }
}

impl TryFrom<String> for Guid {
    type Error = GuidParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Guid> for String {
    fn from(guid: Guid) -> Self {
        guid.to_string()
    }
}
