use bytes::{Bytes, BytesMut};

/// The contract between a protocol data unit and the layer that stacks it
/// into a packet.
///
/// A PDU occupies `header_size() + payload_size() + trailer_size()` bytes
/// on the wire. The caller sizes the output buffer with [`Pdu::size`]
/// before calling [`Pdu::write_to`].
pub trait Pdu {
    /// Bytes written before the payload.
    fn header_size(&self) -> usize;

    /// Bytes written after the payload.
    fn trailer_size(&self) -> usize {
        0
    }

    /// Bytes taken by the nested payload.
    fn payload_size(&self) -> usize;

    /// Total bytes on the wire.
    #[inline]
    fn size(&self) -> usize {
        self.header_size() + self.payload_size() + self.trailer_size()
    }

    /// Serialize into `buf`.
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`Pdu::size`].
    fn write_to(&mut self, buf: &mut [u8]);

    /// Check whether the raw bytes in `buf` answer this PDU.
    fn matches_response(&self, _buf: &[u8]) -> bool {
        false
    }

    /// Serialize into a freshly allocated buffer.
    fn to_bytes(&mut self) -> Bytes {
        let mut buf = BytesMut::zeroed(self.size());
        self.write_to(&mut buf[..]);
        buf.freeze()
    }
}

impl<T: Pdu + ?Sized> Pdu for &mut T {
    #[inline]
    fn header_size(&self) -> usize {
        (**self).header_size()
    }

    #[inline]
    fn trailer_size(&self) -> usize {
        (**self).trailer_size()
    }

    #[inline]
    fn payload_size(&self) -> usize {
        (**self).payload_size()
    }

    #[inline]
    fn write_to(&mut self, buf: &mut [u8]) {
        (**self).write_to(buf)
    }

    #[inline]
    fn matches_response(&self, buf: &[u8]) -> bool {
        (**self).matches_response(buf)
    }
}
