use core::net::Ipv4Addr;

use byteorder::{ByteOrder, NetworkEndian};
use bytes::Buf;

use super::{IcmpHeader, IcmpType, RestOfHeader, ICMP_HEADER_LEN};
use crate::checksum_utils;
use crate::extensions::IcmpExtensions;
use crate::{Error, Pdu, RawPayload, Result};

/// Minimum length of the original datagram once an extension structure
/// follows it (RFC 4884 section 5.1).
pub const EXTENSION_PAYLOAD_LIMIT: usize = 128;

/// Longest original datagram the 8-bit RFC 4884 length field can describe.
pub const MAX_ORIGINAL_DATAGRAM_LEN: usize = u8::MAX as usize * 4;

/// Length of the three timestamp words of timestamp messages.
pub const TIMESTAMPS_LEN: usize = 12;

/// Length of the address mask word of address mask messages.
pub const ADDRESS_MASK_LEN: usize = 4;

/// The originate, receive and transmit timestamps of a timestamp message,
/// in milliseconds since midnight UT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamps {
    /// Time the sender last touched the request.
    pub originate: u32,
    /// Time the echoer first touched it.
    pub receive: u32,
    /// Time the echoer last touched the reply.
    pub transmit: u32,
}

/// An ICMP message.
///
/// The message owns its nested payload and its extension structure. An
/// extension structure is only ever attached to destination-unreachable,
/// time-exceeded and parameter-problem messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icmp {
    icmp_type: IcmpType,
    code: u8,
    checksum: u16,
    rest: RestOfHeader,
    // Timestamp words, the address mask lives in the first one.
    extra: [u32; 3],
    use_length_field: bool,
    payload: Option<RawPayload>,
    extensions: Option<IcmpExtensions>,
}

impl Icmp {
    /// Create a message of `icmp_type` with every field zeroed.
    pub fn new(icmp_type: IcmpType) -> Self {
        Self {
            icmp_type,
            code: 0,
            checksum: 0,
            rest: RestOfHeader::parse(icmp_type, [0; 4]),
            extra: [0; 3],
            use_length_field: false,
            payload: None,
            extensions: None,
        }
    }

    /// Decode a message from `buf`.
    ///
    /// The checksum is read but not verified. For the extension-capable
    /// types, trailing bytes that validate as an extension structure are
    /// split off from the payload; bytes that do not validate stay in the
    /// payload.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let header = IcmpHeader::new(buf)
            .map_err(|buf| Error::malformed("icmp header", ICMP_HEADER_LEN, buf.len()))?;

        let icmp_type = header.icmp_type();
        let mut msg = Self {
            icmp_type,
            code: header.code(),
            checksum: header.checksum(),
            rest: RestOfHeader::parse(icmp_type, header.rest_of_header()),
            extra: [0; 3],
            use_length_field: false,
            payload: None,
            extensions: None,
        };

        let mut rest = &buf[ICMP_HEADER_LEN..];
        if icmp_type.is_timestamp() {
            if rest.remaining() < TIMESTAMPS_LEN {
                return Err(Error::malformed(
                    "icmp timestamps",
                    TIMESTAMPS_LEN,
                    rest.remaining(),
                ));
            }
            for word in msg.extra.iter_mut() {
                *word = rest.get_u32();
            }
        } else if icmp_type.is_address_mask() {
            if rest.remaining() < ADDRESS_MASK_LEN {
                return Err(Error::malformed(
                    "icmp address mask",
                    ADDRESS_MASK_LEN,
                    rest.remaining(),
                ));
            }
            msg.extra[0] = rest.get_u32();
        }

        if icmp_type.allows_extensions() {
            let length = msg.rest.length().unwrap_or(0);
            msg.use_length_field = length != 0;
            if let Some(offset) = msg.try_parse_extensions(rest, length) {
                rest = &rest[..offset];
            }
        }

        if !rest.is_empty() {
            msg.payload = Some(RawPayload::from_slice(rest));
        }
        Ok(msg)
    }

    // Look for an extension structure after the original datagram in
    // `rest`. On success the structure is attached and the offset where it
    // starts is returned.
    fn try_parse_extensions(&mut self, rest: &[u8], length: u8) -> Option<usize> {
        let offset = extension_offset(length, rest.len())?;
        let candidate = &rest[offset..];
        if !IcmpExtensions::validate(candidate) {
            log::debug!(
                "icmp: {} bytes at offset {} are not an extension structure",
                candidate.len(),
                offset
            );
            return None;
        }

        let ext = IcmpExtensions::parse(candidate).ok()?;
        if ext.is_empty() {
            log::debug!("icmp: extension structure at offset {} has no objects", offset);
            return None;
        }
        log::trace!(
            "icmp: {} extension objects at offset {}",
            ext.objects().len(),
            offset
        );
        self.extensions = Some(ext);
        Some(offset)
    }

    /// Check the checksum of the encoded message in `buf` without decoding
    /// it.
    #[inline]
    pub fn verify_checksum(buf: &[u8]) -> bool {
        buf.len() >= ICMP_HEADER_LEN && checksum_utils::verify(buf)
    }

    /// The message type.
    #[inline]
    pub fn icmp_type(&self) -> IcmpType {
        self.icmp_type
    }

    /// Change the message type.
    ///
    /// The rest-of-header bytes are kept and re-read under the new type.
    /// The extension structure is dropped if the new type cannot carry
    /// one.
    pub fn set_icmp_type(&mut self, value: IcmpType) {
        self.icmp_type = value;
        self.rest = RestOfHeader::parse(value, self.rest.to_bytes());
        if !value.allows_extensions() {
            self.extensions = None;
        }
    }

    /// The message code.
    #[inline]
    pub fn code(&self) -> u8 {
        self.code
    }

    /// Set the message code.
    #[inline]
    pub fn set_code(&mut self, value: u8) {
        self.code = value;
    }

    /// The checksum, as decoded or as computed by the last encode.
    #[inline]
    pub fn checksum(&self) -> u16 {
        self.checksum
    }

    /// Set the checksum. Encoding always overwrites it.
    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        self.checksum = value;
    }

    /// The rest-of-header field under the message type's interpretation.
    #[inline]
    pub fn rest_of_header(&self) -> RestOfHeader {
        self.rest
    }

    /// Replace the rest-of-header field. Its wire bytes are re-read under
    /// the message type.
    #[inline]
    pub fn set_rest_of_header(&mut self, value: RestOfHeader) {
        self.rest = RestOfHeader::parse(self.icmp_type, value.to_bytes());
    }

    fn modify_rest(&mut self, f: impl FnOnce(&mut [u8; 4])) {
        let mut bytes = self.rest.to_bytes();
        f(&mut bytes);
        self.rest = RestOfHeader::parse(self.icmp_type, bytes);
    }

    /// Echo-style identifier.
    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(&self.rest.to_bytes()[0..2])
    }

    /// Set the echo-style identifier.
    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        self.modify_rest(|b| NetworkEndian::write_u16(&mut b[0..2], value));
    }

    /// Echo-style sequence number.
    #[inline]
    pub fn seq_num(&self) -> u16 {
        NetworkEndian::read_u16(&self.rest.to_bytes()[2..4])
    }

    /// Set the echo-style sequence number.
    #[inline]
    pub fn set_seq_num(&mut self, value: u16) {
        self.modify_rest(|b| NetworkEndian::write_u16(&mut b[2..4], value));
    }

    /// Redirect gateway address.
    #[inline]
    pub fn gateway(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.rest.to_bytes())
    }

    /// Set the redirect gateway address.
    #[inline]
    pub fn set_gateway(&mut self, value: Ipv4Addr) {
        self.modify_rest(|b| *b = value.octets());
    }

    /// Next-hop MTU of a fragmentation-needed message.
    #[inline]
    pub fn next_hop_mtu(&self) -> u16 {
        NetworkEndian::read_u16(&self.rest.to_bytes()[2..4])
    }

    /// Set the next-hop MTU.
    #[inline]
    pub fn set_next_hop_mtu(&mut self, value: u16) {
        self.modify_rest(|b| NetworkEndian::write_u16(&mut b[2..4], value));
    }

    /// Parameter-problem pointer.
    #[inline]
    pub fn pointer(&self) -> u8 {
        self.rest.to_bytes()[0]
    }

    /// Set the parameter-problem pointer.
    #[inline]
    pub fn set_pointer(&mut self, value: u8) {
        self.modify_rest(|b| b[0] = value);
    }

    /// RFC 4884 length of the original datagram, in 32-bit words.
    #[inline]
    pub fn length(&self) -> u8 {
        self.rest.to_bytes()[1]
    }

    /// The timestamps, for timestamp messages only.
    #[inline]
    pub fn timestamps(&self) -> Option<Timestamps> {
        self.icmp_type.is_timestamp().then(|| Timestamps {
            originate: self.extra[0],
            receive: self.extra[1],
            transmit: self.extra[2],
        })
    }

    /// Set the timestamps. They are only encoded for timestamp messages.
    #[inline]
    pub fn set_timestamps(&mut self, value: Timestamps) {
        self.extra = [value.originate, value.receive, value.transmit];
    }

    /// The address mask, for address mask messages only.
    #[inline]
    pub fn address_mask(&self) -> Option<Ipv4Addr> {
        self.icmp_type
            .is_address_mask()
            .then(|| Ipv4Addr::from(self.extra[0]))
    }

    /// Set the address mask. It is only encoded for address mask messages,
    /// and shares its storage with the originate timestamp.
    #[inline]
    pub fn set_address_mask(&mut self, value: Ipv4Addr) {
        self.extra[0] = u32::from(value);
    }

    /// The nested payload.
    #[inline]
    pub fn payload(&self) -> Option<&RawPayload> {
        self.payload.as_ref()
    }

    /// Replace the nested payload.
    #[inline]
    pub fn set_payload(&mut self, value: Option<RawPayload>) {
        self.payload = value;
    }

    /// Detach the nested payload.
    #[inline]
    pub fn take_payload(&mut self) -> Option<RawPayload> {
        self.payload.take()
    }

    /// Whether the message type may carry an extension structure.
    #[inline]
    pub fn are_extensions_allowed(&self) -> bool {
        self.icmp_type.allows_extensions()
    }

    /// Whether an extension structure holding at least one object is
    /// attached. An empty structure is never encoded.
    #[inline]
    pub fn has_extensions(&self) -> bool {
        self.attached_extensions().is_some()
    }

    /// The extension structure, possibly still empty.
    #[inline]
    pub fn extensions(&self) -> Option<&IcmpExtensions> {
        self.extensions.as_ref()
    }

    /// The attached extension structure, created empty on first use.
    /// `None` if the message type cannot carry one.
    pub fn extensions_mut(&mut self) -> Option<&mut IcmpExtensions> {
        if !self.are_extensions_allowed() {
            return None;
        }
        Some(self.extensions.get_or_insert_with(IcmpExtensions::new))
    }

    /// Attach an extension structure, handing it back if the message type
    /// cannot carry one.
    pub fn set_extensions(
        &mut self,
        value: IcmpExtensions,
    ) -> core::result::Result<(), IcmpExtensions> {
        if !self.are_extensions_allowed() {
            return Err(value);
        }
        self.extensions = Some(value);
        Ok(())
    }

    /// Detach the extension structure.
    #[inline]
    pub fn take_extensions(&mut self) -> Option<IcmpExtensions> {
        self.extensions.take()
    }

    /// Whether encoding always writes the RFC 4884 length field, even when
    /// the payload is short enough not to need it.
    #[inline]
    pub fn uses_length_field(&self) -> bool {
        self.use_length_field
    }

    /// Ask for the RFC 4884 length field to be written on every encode.
    #[inline]
    pub fn use_length_field(&mut self, value: bool) {
        self.use_length_field = value;
    }

    /// Turn this into an echo request.
    pub fn set_echo_request(&mut self, ident: u16, seq_num: u16) {
        self.set_icmp_type(IcmpType::ECHO_REQUEST);
        self.set_ident(ident);
        self.set_seq_num(seq_num);
    }

    /// Turn this into an echo reply.
    pub fn set_echo_reply(&mut self, ident: u16, seq_num: u16) {
        self.set_icmp_type(IcmpType::ECHO_REPLY);
        self.set_ident(ident);
        self.set_seq_num(seq_num);
    }

    /// Turn this into an information request.
    pub fn set_info_request(&mut self, ident: u16, seq_num: u16) {
        self.set_icmp_type(IcmpType::INFO_REQUEST);
        self.code = 0;
        self.set_ident(ident);
        self.set_seq_num(seq_num);
    }

    /// Turn this into an information reply.
    pub fn set_info_reply(&mut self, ident: u16, seq_num: u16) {
        self.set_icmp_type(IcmpType::INFO_REPLY);
        self.code = 0;
        self.set_ident(ident);
        self.set_seq_num(seq_num);
    }

    /// Turn this into a destination-unreachable message.
    pub fn set_dest_unreachable(&mut self) {
        self.set_icmp_type(IcmpType::DEST_UNREACHABLE);
    }

    /// Turn this into a time-exceeded message: code 0 for TTL exceeded in
    /// transit, code 1 for fragment reassembly time exceeded.
    pub fn set_time_exceeded(&mut self, ttl_exceeded: bool) {
        self.set_icmp_type(IcmpType::TIME_EXCEEDED);
        self.code = if ttl_exceeded { 0 } else { 1 };
    }

    /// Turn this into a parameter-problem message. With `set_pointer` the
    /// code is 0 and the pointer is `bad_octet`, otherwise the code is 1
    /// (missing a required option).
    pub fn set_param_problem(&mut self, set_pointer: bool, bad_octet: u8) {
        self.set_icmp_type(IcmpType::PARAM_PROBLEM);
        if set_pointer {
            self.code = 0;
            self.set_pointer(bad_octet);
        } else {
            self.code = 1;
        }
    }

    /// Turn this into a source quench message.
    pub fn set_source_quench(&mut self) {
        self.set_icmp_type(IcmpType::SOURCE_QUENCH);
    }

    /// Turn this into a redirect message.
    pub fn set_redirect(&mut self, code: u8, gateway: Ipv4Addr) {
        self.set_icmp_type(IcmpType::REDIRECT);
        self.code = code;
        self.set_gateway(gateway);
    }

    fn attached_extensions(&self) -> Option<&IcmpExtensions> {
        self.extensions.as_ref().filter(|ext| !ext.is_empty())
    }

    // Payload bytes that go on the wire. With extensions the original
    // datagram is cut to what the length field can describe.
    fn encoded_payload_len(&self) -> usize {
        let len = self.payload.as_ref().map_or(0, |p| p.len());
        if self.attached_extensions().is_some() {
            len.min(MAX_ORIGINAL_DATAGRAM_LEN)
        } else {
            len
        }
    }

    // Encoded payload length rounded up to a 32-bit boundary.
    fn adjusted_payload_size(&self) -> usize {
        (self.encoded_payload_len() + 3) & !3
    }

    fn extra_size(&self) -> usize {
        if self.icmp_type.is_timestamp() {
            TIMESTAMPS_LEN
        } else if self.icmp_type.is_address_mask() {
            ADDRESS_MASK_LEN
        } else {
            0
        }
    }
}

// Where the extension structure of an RFC 4884 message starts within the
// `remaining` bytes after the header, given the length field.
fn extension_offset(length: u8, remaining: usize) -> Option<usize> {
    let declared = length as usize * 4;
    if declared < remaining && declared >= EXTENSION_PAYLOAD_LIMIT {
        Some(declared)
    } else if remaining > EXTENSION_PAYLOAD_LIMIT {
        // Non-compliant senders leave the length field zeroed or garbage
        // but still pad the original datagram to 128 bytes.
        log::debug!(
            "icmp: length field {} unusable with {} bytes, looking for extensions at {}",
            length,
            remaining,
            EXTENSION_PAYLOAD_LIMIT
        );
        Some(EXTENSION_PAYLOAD_LIMIT)
    } else {
        None
    }
}

impl Pdu for Icmp {
    #[inline]
    fn header_size(&self) -> usize {
        ICMP_HEADER_LEN + self.extra_size()
    }

    fn trailer_size(&self) -> usize {
        match self.attached_extensions() {
            None => 0,
            Some(ext) if self.payload.is_none() => ext.size(),
            Some(ext) => {
                let padded = self.adjusted_payload_size().max(EXTENSION_PAYLOAD_LIMIT);
                ext.size() + padded - self.encoded_payload_len()
            }
        }
    }

    #[inline]
    fn payload_size(&self) -> usize {
        self.encoded_payload_len()
    }

    fn write_to(&mut self, buf: &mut [u8]) {
        let size = self.size();
        assert!(buf.len() >= size);
        let buf = &mut buf[..size];
        let header_len = self.header_size();

        if self.icmp_type.is_timestamp() {
            NetworkEndian::write_u32_into(&self.extra, &mut buf[ICMP_HEADER_LEN..header_len]);
        } else if self.icmp_type.is_address_mask() {
            NetworkEndian::write_u32(&mut buf[ICMP_HEADER_LEN..header_len], self.extra[0]);
        }

        let payload_len = self.encoded_payload_len();
        let adjusted = self.adjusted_payload_size();
        // A non-zero length left by an earlier encode is always refreshed.
        if self.icmp_type.allows_extensions()
            && (self.use_length_field || adjusted > EXTENSION_PAYLOAD_LIMIT || self.length() != 0)
        {
            let declared = match adjusted {
                0 => 0,
                // Too long to describe, only possible without extensions.
                n if n > MAX_ORIGINAL_DATAGRAM_LEN => 0,
                n => n.max(EXTENSION_PAYLOAD_LIMIT),
            };
            self.modify_rest(|b| b[1] = (declared / 4) as u8);
        }

        let mut offset = header_len;
        if let Some(payload) = &self.payload {
            buf[offset..offset + payload_len].copy_from_slice(&payload.as_slice()[..payload_len]);
            offset += payload_len;
        }

        let has_payload = self.payload.is_some();
        if let Some(ext) = self.extensions.as_mut().filter(|ext| !ext.is_empty()) {
            if has_payload {
                let padded = adjusted.max(EXTENSION_PAYLOAD_LIMIT);
                buf[offset..header_len + padded].fill(0);
                offset = header_len + padded;
            }
            ext.write_to(&mut buf[offset..]);
        }

        let mut header = IcmpHeader::new_unchecked(&mut buf[..ICMP_HEADER_LEN]);
        header.set_icmp_type(self.icmp_type);
        header.set_code(self.code);
        header.set_checksum(0);
        header.set_rest_of_header(self.rest.to_bytes());

        self.checksum = checksum_utils::icmp_checksum(buf);
        NetworkEndian::write_u16(&mut buf[2..4], self.checksum);
    }

    fn matches_response(&self, buf: &[u8]) -> bool {
        let Ok(header) = IcmpHeader::new(buf) else {
            return false;
        };
        if self.icmp_type.reply_type() != Some(header.icmp_type()) {
            return false;
        }
        let ours = self.rest.to_bytes();
        let theirs = header.rest_of_header();
        ours[0..2] == theirs[0..2] && ours[2..4] == theirs[2..4]
    }
}
