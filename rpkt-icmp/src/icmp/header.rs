use core::net::Ipv4Addr;

use byteorder::{ByteOrder, NetworkEndian};

use super::IcmpType;

/// Length of the fixed ICMP header.
pub const ICMP_HEADER_LEN: usize = 8;

/// An echo request header with every other field zeroed.
pub const ICMP_HEADER_TEMPLATE: IcmpHeader<[u8; ICMP_HEADER_LEN]> = IcmpHeader {
    buf: [0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
};

/// A view of the fixed 8-byte ICMP header over a byte buffer.
///
/// Bytes 4..8 hold the rest-of-header field, whose meaning depends on the
/// message type. The accessors below read it under every interpretation;
/// picking the right one is up to the caller.
#[derive(Clone, Copy, Debug)]
pub struct IcmpHeader<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> IcmpHeader<T> {
    /// Wrap `buf`, handing it back if it is shorter than the header.
    #[inline]
    pub fn new(buf: T) -> Result<Self, T> {
        if buf.as_ref().len() >= ICMP_HEADER_LEN {
            Ok(Self { buf })
        } else {
            Err(buf)
        }
    }

    /// Wrap `buf` without a length check.
    #[inline]
    pub fn new_unchecked(buf: T) -> Self {
        Self { buf }
    }

    /// Release the wrapped buffer.
    #[inline]
    pub fn release(self) -> T {
        self.buf
    }

    /// The header bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[0..ICMP_HEADER_LEN]
    }

    /// Copy the header into an owned array.
    #[inline]
    pub fn to_owned(&self) -> IcmpHeader<[u8; ICMP_HEADER_LEN]> {
        let mut buf = [0; ICMP_HEADER_LEN];
        buf.copy_from_slice(self.as_bytes());
        IcmpHeader { buf }
    }

    /// The message type.
    #[inline]
    pub fn icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.as_ref()[0])
    }

    /// The message code.
    #[inline]
    pub fn code(&self) -> u8 {
        self.buf.as_ref()[1]
    }

    /// The checksum field.
    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[2..4])
    }

    /// The raw rest-of-header bytes.
    #[inline]
    pub fn rest_of_header(&self) -> [u8; 4] {
        let mut data = [0; 4];
        data.copy_from_slice(&self.buf.as_ref()[4..8]);
        data
    }

    /// Echo-style identifier.
    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[4..6])
    }

    /// Echo-style sequence number.
    #[inline]
    pub fn seq_num(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[6..8])
    }

    /// Redirect gateway address.
    #[inline]
    pub fn gateway(&self) -> Ipv4Addr {
        Ipv4Addr::from(NetworkEndian::read_u32(&self.buf.as_ref()[4..8]))
    }

    /// Parameter-problem pointer.
    #[inline]
    pub fn pointer(&self) -> u8 {
        self.buf.as_ref()[4]
    }

    /// RFC 4884 length of the original datagram, in 32-bit words.
    #[inline]
    pub fn length(&self) -> u8 {
        self.buf.as_ref()[5]
    }

    /// Next-hop MTU of a fragmentation-needed message (RFC 1191).
    #[inline]
    pub fn next_hop_mtu(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[6..8])
    }
}

impl<T: AsMut<[u8]>> IcmpHeader<T> {
    /// Set the message type.
    #[inline]
    pub fn set_icmp_type(&mut self, value: IcmpType) {
        self.buf.as_mut()[0] = value.into();
    }

    /// Set the message code.
    #[inline]
    pub fn set_code(&mut self, value: u8) {
        self.buf.as_mut()[1] = value;
    }

    /// Set the checksum field.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[2..4], value);
    }

    /// Set the raw rest-of-header bytes.
    #[inline]
    pub fn set_rest_of_header(&mut self, value: [u8; 4]) {
        self.buf.as_mut()[4..8].copy_from_slice(&value);
    }

    /// Set the echo-style identifier.
    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[4..6], value);
    }

    /// Set the echo-style sequence number.
    #[inline]
    pub fn set_seq_num(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[6..8], value);
    }
}
