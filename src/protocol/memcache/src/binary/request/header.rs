use crate::binary::{MagicValue, Opcode, HEADER_LEN};
use crate::EncodeError;
use protocol_common::BufMut;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub(crate) magic: MagicValue,
    pub(crate) opcode: Opcode,
    pub(crate) key_len: u16,
    pub(crate) extras_len: u8,
    pub(crate) data_type: u8,
    pub(crate) _reserved: u16,
    pub(crate) total_body_len: u32,
    pub(crate) opaque: u32,
    pub(crate) cas: u64,
}

impl RequestHeader {
    fn with_opcode(opcode: Opcode) -> Self {
        Self {
            magic: MagicValue::Request,
            opcode,
            key_len: 0,
            extras_len: 0,
            data_type: 0,
            _reserved: 0,
            total_body_len: 0,
            opaque: 0,
            cas: 0,
        }
    }

    /// Try to create a request header. Returns an error if the key does not
    /// fit the 16bit key length or the body does not fit the 32bit body
    /// length.
    pub fn request(
        opcode: Opcode,
        extras_len: u8,
        key_len: usize,
        value_len: usize,
    ) -> Result<Self, EncodeError> {
        let key_len: u16 = key_len.try_into().map_err(|_| EncodeError::KeyTooLarge {
            len: key_len,
            max: u16::MAX as usize,
        })?;

        let total_body_len: u32 = (key_len as u64 + value_len as u64 + extras_len as u64)
            .try_into()
            .map_err(|_| EncodeError::BodyTooLarge)?;

        let mut header = Self::with_opcode(opcode);
        header.key_len = key_len;
        header.extras_len = extras_len;
        header.total_body_len = total_body_len;

        Ok(header)
    }

    /// Writes 24 bytes to the buffer
    pub fn write_to(&self, buffer: &mut dyn BufMut) {
        buffer.put_u8(self.magic.to_u8());
        buffer.put_u8(self.opcode.to_u8());
        buffer.put_u16(self.key_len);
        buffer.put_u8(self.extras_len);
        buffer.put_u8(self.data_type);
        buffer.put_u16(self._reserved);
        buffer.put_u32(self.total_body_len);
        buffer.put_u32(self.opaque);
        buffer.put_u64(self.cas);
    }

    /// Returns the total request length which is the header length plus the
    /// request body length.
    pub fn request_len(&self) -> usize {
        HEADER_LEN + self.total_body_len as usize
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn key_len(&self) -> u16 {
        self.key_len
    }

    pub fn extras_len(&self) -> u8 {
        self.extras_len
    }

    pub fn total_body_len(&self) -> u32 {
        self.total_body_len
    }
}
