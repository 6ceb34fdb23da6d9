use bytes::Bytes;

use crate::Pdu;

/// An opaque payload, typically the leading bytes of the datagram that
/// triggered an ICMP error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawPayload {
    data: Bytes,
}

impl RawPayload {
    /// Wrap `data` without copying it.
    #[inline]
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Copy `data` into a new payload.
    #[inline]
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            data: Bytes::copy_from_slice(data),
        }
    }

    /// The payload bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Length of the payload in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Release the underlying buffer.
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }
}

impl From<Bytes> for RawPayload {
    #[inline]
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for RawPayload {
    #[inline]
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl Pdu for RawPayload {
    #[inline]
    fn header_size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn payload_size(&self) -> usize {
        0
    }

    #[inline]
    fn write_to(&mut self, buf: &mut [u8]) {
        assert!(buf.len() >= self.data.len());
        buf[..self.data.len()].copy_from_slice(&self.data);
    }
}
