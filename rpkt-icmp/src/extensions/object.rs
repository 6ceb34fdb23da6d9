use alloc::vec::Vec;

use byteorder::{ByteOrder, NetworkEndian};
use bytes::Bytes;

use super::ExtensionClass;
use crate::{Error, Result};

/// Length of an extension object header: length, class number and class
/// sub-type.
pub const EXTENSION_OBJECT_HEADER_LEN: usize = 4;

/// A single extension object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcmpExtension {
    class_num: ExtensionClass,
    class_subtype: u8,
    payload: Bytes,
}

impl IcmpExtension {
    /// Create an extension object.
    pub fn new(class_num: ExtensionClass, class_subtype: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            class_num,
            class_subtype,
            payload: payload.into(),
        }
    }

    /// Parse the object at the front of `buf`. Bytes past the object's
    /// length field are ignored.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        if buf.len() < EXTENSION_OBJECT_HEADER_LEN {
            return Err(Error::malformed(
                "icmp extension object",
                EXTENSION_OBJECT_HEADER_LEN,
                buf.len(),
            ));
        }
        let obj_len = NetworkEndian::read_u16(&buf[0..2]) as usize;
        if obj_len < EXTENSION_OBJECT_HEADER_LEN {
            return Err(Error::malformed(
                "icmp extension object",
                EXTENSION_OBJECT_HEADER_LEN,
                obj_len,
            ));
        }
        if obj_len > buf.len() {
            return Err(Error::malformed(
                "icmp extension object",
                obj_len,
                buf.len(),
            ));
        }

        Ok(Self {
            class_num: ExtensionClass::from(buf[2]),
            class_subtype: buf[3],
            payload: Bytes::copy_from_slice(&buf[EXTENSION_OBJECT_HEADER_LEN..obj_len]),
        })
    }

    /// Bytes occupied on the wire, header included.
    #[inline]
    pub fn size(&self) -> usize {
        EXTENSION_OBJECT_HEADER_LEN + self.payload.len()
    }

    /// Serialize into the front of `buf`, returning the number of bytes
    /// written.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is too short or the object does not fit the 16-bit
    /// length field.
    pub fn write_to(&self, buf: &mut [u8]) -> usize {
        let size = self.size();
        assert!(size <= u16::MAX as usize);
        assert!(buf.len() >= size);

        NetworkEndian::write_u16(&mut buf[0..2], size as u16);
        buf[2] = self.class_num.raw();
        buf[3] = self.class_subtype;
        buf[EXTENSION_OBJECT_HEADER_LEN..size].copy_from_slice(&self.payload);
        size
    }

    /// The class number.
    #[inline]
    pub fn class_num(&self) -> ExtensionClass {
        self.class_num
    }

    /// The class sub-type (C-Type).
    #[inline]
    pub fn class_subtype(&self) -> u8 {
        self.class_subtype
    }

    /// The object payload.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Build an RFC 4950 MPLS label stack object (class 1, sub-type 1).
    pub fn mpls_label_stack(entries: &[MplsLabelEntry]) -> Self {
        let mut payload = Vec::with_capacity(entries.len() * 4);
        for entry in entries {
            payload.extend_from_slice(&entry.to_bytes());
        }
        Self::new(ExtensionClass::MPLS_LABEL_STACK, 1, payload)
    }

    /// Iterate the label stack entries of an MPLS label stack object.
    ///
    /// Yields nothing for objects of other classes. A trailing partial
    /// entry is skipped.
    pub fn mpls_labels(&self) -> impl Iterator<Item = MplsLabelEntry> + '_ {
        let payload: &[u8] = if self.class_num == ExtensionClass::MPLS_LABEL_STACK
            && self.class_subtype == 1
        {
            &self.payload
        } else {
            &[]
        };
        payload.chunks_exact(4).map(MplsLabelEntry::from_bytes)
    }
}

/// One entry of an MPLS label stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MplsLabelEntry {
    /// 20-bit label value.
    pub label: u32,
    /// 3-bit traffic class (formerly EXP).
    pub traffic_class: u8,
    /// Set on the last entry of the stack.
    pub bottom_of_stack: bool,
    /// Time to live.
    pub ttl: u8,
}

impl MplsLabelEntry {
    fn from_bytes(buf: &[u8]) -> Self {
        let word = NetworkEndian::read_u32(buf);
        Self {
            label: word >> 12,
            traffic_class: ((word >> 9) & 0x07) as u8,
            bottom_of_stack: (word >> 8) & 0x01 == 1,
            ttl: word as u8,
        }
    }

    fn to_bytes(self) -> [u8; 4] {
        let word = ((self.label & 0x000f_ffff) << 12)
            | ((self.traffic_class as u32 & 0x07) << 9)
            | ((self.bottom_of_stack as u32) << 8)
            | self.ttl as u32;
        word.to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_object() {
        let buf = [0x00, 0x08, 0x01, 0x01, 0x04, 0xbb, 0x41, 0x01, 0xff];
        let obj = IcmpExtension::parse(&buf).unwrap();
        assert_eq!(obj.size(), 8);
        assert_eq!(obj.class_num(), ExtensionClass::MPLS_LABEL_STACK);
        assert_eq!(obj.class_num().name(), Some("MPLS_LABEL_STACK"));

        let labels: Vec<_> = obj.mpls_labels().collect();
        assert_eq!(
            labels,
            [MplsLabelEntry {
                label: 19380,
                traffic_class: 0,
                bottom_of_stack: true,
                ttl: 1,
            }]
        );
    }

    #[test]
    fn parse_minimum_length_object() {
        let buf = [0x00, 0x04, 0x02, 0x00];
        let obj = IcmpExtension::parse(&buf).unwrap();
        assert_eq!(obj.size(), 4);
        assert!(obj.payload().is_empty());
        assert_eq!(obj.mpls_labels().count(), 0);
    }

    #[test]
    fn parse_bad_lengths() {
        assert_eq!(
            IcmpExtension::parse(&[0x00, 0x03, 0x01, 0x01, 0x00]),
            Err(Error::malformed("icmp extension object", 4, 3))
        );
        assert_eq!(
            IcmpExtension::parse(&[0xa7, 0xdd, 0x01, 0x01, 0x00]),
            Err(Error::malformed("icmp extension object", 0xa7dd, 5))
        );
        assert!(IcmpExtension::parse(&[0x00, 0x04]).is_err());
    }

    #[test]
    fn label_stack_bits() {
        let entry = MplsLabelEntry {
            label: 0xfffff,
            traffic_class: 0x05,
            bottom_of_stack: false,
            ttl: 0x40,
        };
        assert_eq!(entry.to_bytes(), [0xff, 0xff, 0xfa, 0x40]);
        assert_eq!(MplsLabelEntry::from_bytes(&entry.to_bytes()), entry);

        let obj = IcmpExtension::mpls_label_stack(&[entry, MplsLabelEntry::default()]);
        let mut buf = [0; 12];
        assert_eq!(obj.write_to(&mut buf), 12);
        assert_eq!(&buf[..4], &[0x00, 0x0c, 0x01, 0x01]);
        assert_eq!(obj.mpls_labels().count(), 2);
    }

    #[test]
    fn labels_of_other_class() {
        let obj = IcmpExtension::new(ExtensionClass::from(9), 1, Bytes::from_static(&[0; 8]));
        assert_eq!(obj.class_num().name(), None);
        assert_eq!(obj.mpls_labels().count(), 0);
    }
}
