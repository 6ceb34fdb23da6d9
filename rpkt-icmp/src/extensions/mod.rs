//! ICMP extension structures (RFC 4884 section 7).
//!
//! An extension structure is a 4-byte header followed by zero or more
//! extension objects:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |Version|      (Reserved)       |           Checksum            |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |             Length            |   Class-Num   |   C-Type      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                                                               |
//! |                   // (Object payload) //                      |
//! |                                                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The checksum covers the whole structure, objects included.

use alloc::vec::Vec;

use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum_utils;
use crate::{Error, Result};

mod object;
pub use object::{IcmpExtension, MplsLabelEntry, EXTENSION_OBJECT_HEADER_LEN};

enum_sim! {
    /// The class number of an extension object.
    pub struct ExtensionClass (u8) {
        /// MPLS label stack, RFC 4950.
        MPLS_LABEL_STACK = 1,
        /// Interface information, RFC 5837.
        INTERFACE_INFORMATION = 2,
        /// Interface identification, RFC 8335.
        INTERFACE_IDENTIFICATION = 3,
        /// Extended information, RFC 8883.
        EXTENDED_INFORMATION = 4,
    }
}

/// Length of the extension structure header.
pub const EXTENSION_HEADER_LEN: usize = 4;

/// The extension structure version defined by RFC 4884.
pub const EXTENSION_VERSION: u8 = 2;

/// An ICMP extension structure: a versioned, checksummed list of extension
/// objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpExtensions {
    version: u8,
    reserved: u16,
    checksum: u16,
    objects: Vec<IcmpExtension>,
}

impl Default for IcmpExtensions {
    fn default() -> Self {
        Self::new()
    }
}

impl IcmpExtensions {
    /// Create an empty version 2 structure.
    pub fn new() -> Self {
        Self {
            version: EXTENSION_VERSION,
            reserved: 0,
            checksum: 0,
            objects: Vec::new(),
        }
    }

    /// Check whether `buf` holds a well-formed extension structure.
    ///
    /// The checksum must verify and the objects must tile the bytes after
    /// the header exactly. A structure that passes this check always
    /// parses.
    pub fn validate(buf: &[u8]) -> bool {
        if buf.len() < EXTENSION_HEADER_LEN || !checksum_utils::verify(buf) {
            return false;
        }

        let mut rest = &buf[EXTENSION_HEADER_LEN..];
        while !rest.is_empty() {
            if rest.len() < EXTENSION_OBJECT_HEADER_LEN {
                return false;
            }
            let obj_len = NetworkEndian::read_u16(&rest[0..2]) as usize;
            if obj_len < EXTENSION_OBJECT_HEADER_LEN || obj_len > rest.len() {
                return false;
            }
            rest = &rest[obj_len..];
        }
        true
    }

    /// Parse an extension structure occupying all of `buf`.
    ///
    /// The checksum is recorded but not checked, use
    /// [`IcmpExtensions::validate`] for that.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < EXTENSION_HEADER_LEN {
            return Err(Error::malformed(
                "icmp extension header",
                EXTENSION_HEADER_LEN,
                buf.len(),
            ));
        }

        let first = NetworkEndian::read_u16(&buf[0..2]);
        let mut ext = Self {
            version: (first >> 12) as u8,
            reserved: first & 0x0fff,
            checksum: NetworkEndian::read_u16(&buf[2..4]),
            objects: Vec::new(),
        };

        let mut rest = &buf[EXTENSION_HEADER_LEN..];
        while !rest.is_empty() {
            let obj = IcmpExtension::parse(rest)?;
            rest = &rest[obj.size()..];
            ext.objects.push(obj);
        }
        Ok(ext)
    }

    /// Bytes occupied on the wire.
    pub fn size(&self) -> usize {
        EXTENSION_HEADER_LEN + self.objects.iter().map(|o| o.size()).sum::<usize>()
    }

    /// Serialize into the front of `buf`, returning the number of bytes
    /// written. The checksum is recomputed and stored.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`IcmpExtensions::size`].
    pub fn write_to(&mut self, buf: &mut [u8]) -> usize {
        let size = self.size();
        assert!(buf.len() >= size);
        let buf = &mut buf[..size];

        let first = ((self.version as u16 & 0x0f) << 12) | (self.reserved & 0x0fff);
        NetworkEndian::write_u16(&mut buf[0..2], first);
        NetworkEndian::write_u16(&mut buf[2..4], 0);

        let mut offset = EXTENSION_HEADER_LEN;
        for obj in self.objects.iter() {
            offset += obj.write_to(&mut buf[offset..]);
        }

        self.checksum = checksum_utils::icmp_checksum(buf);
        NetworkEndian::write_u16(&mut buf[2..4], self.checksum);
        size
    }

    /// The structure version, 2 for RFC 4884.
    #[inline]
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Set the structure version, only the low 4 bits are kept.
    #[inline]
    pub fn set_version(&mut self, value: u8) {
        self.version = value & 0x0f;
    }

    /// The checksum read from the wire, or computed by the last
    /// [`IcmpExtensions::write_to`].
    #[inline]
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// The extension objects.
    #[inline]
    pub fn objects(&self) -> &[IcmpExtension] {
        &self.objects
    }

    /// Append an extension object.
    #[inline]
    pub fn add_object(&mut self, obj: IcmpExtension) {
        self.objects.push(obj);
    }

    /// Remove all extension objects.
    #[inline]
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Whether the structure holds no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
