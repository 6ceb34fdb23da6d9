use core::net::Ipv4Addr;

use byteorder::{ByteOrder, NetworkEndian};

use super::IcmpType;

/// The 4-byte rest-of-header field, interpreted according to the message
/// type.
///
/// Every variant maps to and from the same 4 wire bytes, so re-reading a
/// field under another type never loses information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestOfHeader {
    /// Echo, timestamp, information and address mask messages.
    Echo {
        /// Identifier.
        ident: u16,
        /// Sequence number.
        seq_num: u16,
    },
    /// Redirect messages.
    Redirect {
        /// Gateway the datagram should be sent to.
        gateway: Ipv4Addr,
    },
    /// Destination-unreachable messages.
    Unreachable {
        /// Unused byte.
        unused: u8,
        /// RFC 4884 length of the original datagram, in 32-bit words.
        length: u8,
        /// Next-hop MTU of a fragmentation-needed message.
        next_hop_mtu: u16,
    },
    /// Time-exceeded and parameter-problem messages.
    Extended {
        /// Offending octet, meaningful for parameter-problem only.
        pointer: u8,
        /// RFC 4884 length of the original datagram, in 32-bit words.
        length: u8,
        /// Unused.
        unused: u16,
    },
    /// Any other type, kept verbatim.
    Raw([u8; 4]),
}

impl Default for RestOfHeader {
    fn default() -> Self {
        RestOfHeader::Raw([0; 4])
    }
}

impl RestOfHeader {
    /// Interpret `bytes` as the rest-of-header field of an `icmp_type`
    /// message.
    pub fn parse(icmp_type: IcmpType, bytes: [u8; 4]) -> Self {
        let fst_half = NetworkEndian::read_u16(&bytes[0..2]);
        let snd_half = NetworkEndian::read_u16(&bytes[2..4]);
        match icmp_type {
            IcmpType::ECHO_REQUEST
            | IcmpType::ECHO_REPLY
            | IcmpType::TIMESTAMP_REQUEST
            | IcmpType::TIMESTAMP_REPLY
            | IcmpType::INFO_REQUEST
            | IcmpType::INFO_REPLY
            | IcmpType::ADDRESS_MASK_REQUEST
            | IcmpType::ADDRESS_MASK_REPLY => RestOfHeader::Echo {
                ident: fst_half,
                seq_num: snd_half,
            },
            IcmpType::REDIRECT => RestOfHeader::Redirect {
                gateway: Ipv4Addr::from(bytes),
            },
            IcmpType::DEST_UNREACHABLE => RestOfHeader::Unreachable {
                unused: bytes[0],
                length: bytes[1],
                next_hop_mtu: snd_half,
            },
            IcmpType::TIME_EXCEEDED | IcmpType::PARAM_PROBLEM => RestOfHeader::Extended {
                pointer: bytes[0],
                length: bytes[1],
                unused: snd_half,
            },
            _ => RestOfHeader::Raw(bytes),
        }
    }

    /// The wire bytes of the field.
    pub fn to_bytes(&self) -> [u8; 4] {
        let mut bytes = [0; 4];
        match *self {
            RestOfHeader::Echo { ident, seq_num } => {
                NetworkEndian::write_u16(&mut bytes[0..2], ident);
                NetworkEndian::write_u16(&mut bytes[2..4], seq_num);
            }
            RestOfHeader::Redirect { gateway } => {
                bytes = gateway.octets();
            }
            RestOfHeader::Unreachable {
                unused,
                length,
                next_hop_mtu,
            } => {
                bytes[0] = unused;
                bytes[1] = length;
                NetworkEndian::write_u16(&mut bytes[2..4], next_hop_mtu);
            }
            RestOfHeader::Extended {
                pointer,
                length,
                unused,
            } => {
                bytes[0] = pointer;
                bytes[1] = length;
                NetworkEndian::write_u16(&mut bytes[2..4], unused);
            }
            RestOfHeader::Raw(raw) => {
                bytes = raw;
            }
        }
        bytes
    }

    /// The RFC 4884 length field, for the variants that have one.
    #[inline]
    pub fn length(&self) -> Option<u8> {
        match *self {
            RestOfHeader::Unreachable { length, .. } | RestOfHeader::Extended { length, .. } => {
                Some(length)
            }
            _ => None,
        }
    }
}
