//! ICMP (Internet Control Message Protocol) for IPv4, RFC 792.
//!
//! This module decodes and encodes complete ICMP messages: the fixed 8-byte
//! header, the type-specific extra words of timestamp and address mask
//! messages, the nested payload and, for destination-unreachable,
//! time-exceeded and parameter-problem messages, the RFC 4884 extension
//! structure that follows the payload.
//!
//! # Example
//!
//! ```rust
//! use rpkt_icmp::icmp::*;
//! use rpkt_icmp::Pdu;
//!
//! let mut msg = Icmp::new(IcmpType::ECHO_REQUEST);
//! msg.set_ident(0x1234);
//! msg.set_seq_num(1);
//!
//! let bytes = msg.to_bytes();
//! assert_eq!(&bytes[..], &[0x08, 0x00, 0xe5, 0xca, 0x12, 0x34, 0x00, 0x01]);
//!
//! let decoded = Icmp::parse(&bytes)?;
//! assert_eq!(decoded.ident(), 0x1234);
//! assert!(Icmp::verify_checksum(&bytes));
//! # Ok::<(), rpkt_icmp::Error>(())
//! ```

enum_sim! {
    /// The ICMP message type.
    pub struct IcmpType (u8) {
        /// Echo reply.
        ECHO_REPLY = 0,
        /// Destination unreachable.
        DEST_UNREACHABLE = 3,
        /// Source quench.
        SOURCE_QUENCH = 4,
        /// Redirect.
        REDIRECT = 5,
        /// Echo request.
        ECHO_REQUEST = 8,
        /// Router advertisement.
        ROUTER_ADVERTISEMENT = 9,
        /// Router solicitation.
        ROUTER_SOLICITATION = 10,
        /// Time exceeded.
        TIME_EXCEEDED = 11,
        /// Parameter problem.
        PARAM_PROBLEM = 12,
        /// Timestamp request.
        TIMESTAMP_REQUEST = 13,
        /// Timestamp reply.
        TIMESTAMP_REPLY = 14,
        /// Information request.
        INFO_REQUEST = 15,
        /// Information reply.
        INFO_REPLY = 16,
        /// Address mask request.
        ADDRESS_MASK_REQUEST = 17,
        /// Address mask reply.
        ADDRESS_MASK_REPLY = 18,
    }
}

impl IcmpType {
    /// Whether messages of this type carry the three timestamp words.
    #[inline]
    pub fn is_timestamp(&self) -> bool {
        *self == Self::TIMESTAMP_REQUEST || *self == Self::TIMESTAMP_REPLY
    }

    /// Whether messages of this type carry the address mask word.
    #[inline]
    pub fn is_address_mask(&self) -> bool {
        *self == Self::ADDRESS_MASK_REQUEST || *self == Self::ADDRESS_MASK_REPLY
    }

    /// Whether messages of this type may carry an RFC 4884 extension
    /// structure.
    #[inline]
    pub fn allows_extensions(&self) -> bool {
        *self == Self::DEST_UNREACHABLE
            || *self == Self::TIME_EXCEEDED
            || *self == Self::PARAM_PROBLEM
    }

    /// The type that answers a request of this type, if it is one of the
    /// request types that are matched against replies.
    #[inline]
    pub fn reply_type(&self) -> Option<IcmpType> {
        match *self {
            Self::ECHO_REQUEST => Some(Self::ECHO_REPLY),
            Self::TIMESTAMP_REQUEST => Some(Self::TIMESTAMP_REPLY),
            Self::ADDRESS_MASK_REQUEST => Some(Self::ADDRESS_MASK_REPLY),
            _ => None,
        }
    }
}

mod header;
pub use header::{IcmpHeader, ICMP_HEADER_LEN, ICMP_HEADER_TEMPLATE};

mod rest;
pub use rest::RestOfHeader;

mod message;
pub use message::{
    Icmp, Timestamps, ADDRESS_MASK_LEN, EXTENSION_PAYLOAD_LIMIT, MAX_ORIGINAL_DATAGRAM_LEN,
    TIMESTAMPS_LEN,
};
