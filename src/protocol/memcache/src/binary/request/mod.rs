//! Composing requests. The header layout and its length bookkeeping live in
//! `RequestHeader` and `Encode::encode`; commands only describe their
//! lengths and fill in the body.

use super::*;
use protocol_common::BufMut;

mod header;
mod store;

pub use header::RequestHeader;

pub trait Encode: BinaryCommand {
    /// Length of the extras section in bytes.
    fn extras_len(&self) -> u8;

    /// Length of the key in bytes.
    fn key_len(&self) -> usize;

    /// Length of the value in bytes.
    fn value_len(&self) -> usize;

    /// Checks command specific limits before anything is written.
    fn validate(&self) -> Result<(), EncodeError> {
        Ok(())
    }

    fn fill_extras(&self, buffer: &mut dyn BufMut);

    fn fill_key(&self, buffer: &mut dyn BufMut);

    fn fill_value(&self, buffer: &mut dyn BufMut);

    /// Compose the full request into a buffer from the allocator. The result
    /// is exactly `24 + extras + key + value` bytes long.
    fn encode(&self, allocator: &dyn BufferAllocator) -> Result<Bytes, EncodeError> {
        self.validate()?;

        let header = RequestHeader::request(
            self.opcode(),
            self.extras_len(),
            self.key_len(),
            self.value_len(),
        )?;

        let mut buffer = allocator.allocate(header.request_len());
        header.write_to(&mut buffer);
        self.fill_extras(&mut buffer);
        self.fill_key(&mut buffer);
        self.fill_value(&mut buffer);

        debug_assert_eq!(buffer.len(), header.request_len());

        Ok(buffer.freeze())
    }
}
