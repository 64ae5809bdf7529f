use crate::binary::{MagicValue, Opcode, HEADER_LEN};
use protocol_common::{Buf, BufMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub(crate) magic: MagicValue,
    pub(crate) opcode: Opcode,
    pub(crate) key_len: u16,
    pub(crate) extras_len: u8,
    pub(crate) data_type: u8,
    pub(crate) status: ResponseStatus,
    pub(crate) total_body_len: u32,
    pub(crate) opaque: u32,
    pub(crate) cas: u64,
}

impl ResponseHeader {
    /// Reads 24 bytes from the buffer. Returns `None`, without consuming
    /// anything, if fewer than `HEADER_LEN` bytes remain. No validation is
    /// done here.
    pub fn read(buffer: &mut dyn Buf) -> Option<Self> {
        if buffer.remaining() < HEADER_LEN {
            return None;
        }

        Some(Self {
            magic: MagicValue::from_u8(buffer.get_u8()),
            opcode: Opcode::from_u8(buffer.get_u8()),
            key_len: buffer.get_u16(),
            extras_len: buffer.get_u8(),
            data_type: buffer.get_u8(),
            status: ResponseStatus::from_u16(buffer.get_u16()),
            total_body_len: buffer.get_u32(),
            opaque: buffer.get_u32(),
            cas: buffer.get_u64(),
        })
    }

    /// Writes 24 bytes to the buffer
    pub fn write_to(&self, buffer: &mut dyn BufMut) {
        buffer.put_u8(self.magic.to_u8());
        buffer.put_u8(self.opcode.to_u8());
        buffer.put_u16(self.key_len);
        buffer.put_u8(self.extras_len);
        buffer.put_u8(self.data_type);
        buffer.put_u16(self.status.to_u16());
        buffer.put_u32(self.total_body_len);
        buffer.put_u32(self.opaque);
        buffer.put_u64(self.cas);
    }

    pub fn magic(&self) -> MagicValue {
        self.magic
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
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

    pub fn cas(&self) -> u64 {
        self.cas
    }

    /// Declare a body with the given section lengths. The total body length
    /// is their sum.
    pub fn with_body(mut self, extras_len: u8, key_len: u16, value_len: u32) -> Self {
        self.extras_len = extras_len;
        self.key_len = key_len;
        self.total_body_len = extras_len as u32 + key_len as u32 + value_len;
        self
    }

    pub fn with_cas(mut self, cas: u64) -> Self {
        self.cas = cas;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Unknown(u16),
    NoError,
    KeyNotFound,
    KeyExists,
    ValueTooLarge,
    InvalidArguments,
    ItemNotStored,
    IncrDecrOnNonNumericValue,
    VBucketBelongsToAnotherServer,
    AuthenticationError,
    AuthenticationContinue,
    UnknownCommand,
    OutOfMemory,
    NotSupported,
    InternalError,
    Busy,
    TemporaryFailure,
}

impl ResponseStatus {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0000 => ResponseStatus::NoError,
            0x0001 => ResponseStatus::KeyNotFound,
            0x0002 => ResponseStatus::KeyExists,
            0x0003 => ResponseStatus::ValueTooLarge,
            0x0004 => ResponseStatus::InvalidArguments,
            0x0005 => ResponseStatus::ItemNotStored,
            0x0006 => ResponseStatus::IncrDecrOnNonNumericValue,
            0x0007 => ResponseStatus::VBucketBelongsToAnotherServer,
            0x0008 => ResponseStatus::AuthenticationError,
            0x0009 => ResponseStatus::AuthenticationContinue,
            0x0081 => ResponseStatus::UnknownCommand,
            0x0082 => ResponseStatus::OutOfMemory,
            0x0083 => ResponseStatus::NotSupported,
            0x0084 => ResponseStatus::InternalError,
            0x0085 => ResponseStatus::Busy,
            0x0086 => ResponseStatus::TemporaryFailure,
            other => ResponseStatus::Unknown(other),
        }
    }

    pub fn to_u16(self) -> u16 {
        match self {
            ResponseStatus::Unknown(other) => other,
            ResponseStatus::NoError => 0x0000,
            ResponseStatus::KeyNotFound => 0x0001,
            ResponseStatus::KeyExists => 0x0002,
            ResponseStatus::ValueTooLarge => 0x0003,
            ResponseStatus::InvalidArguments => 0x0004,
            ResponseStatus::ItemNotStored => 0x0005,
            ResponseStatus::IncrDecrOnNonNumericValue => 0x0006,
            ResponseStatus::VBucketBelongsToAnotherServer => 0x0007,
            ResponseStatus::AuthenticationError => 0x0008,
            ResponseStatus::AuthenticationContinue => 0x0009,
            ResponseStatus::UnknownCommand => 0x0081,
            ResponseStatus::OutOfMemory => 0x0082,
            ResponseStatus::NotSupported => 0x0083,
            ResponseStatus::InternalError => 0x0084,
            ResponseStatus::Busy => 0x0085,
            ResponseStatus::TemporaryFailure => 0x0086,
        }
    }

    /// A header for a response with this status and no body.
    pub fn as_empty_response(&self, opcode: Opcode) -> ResponseHeader {
        ResponseHeader {
            magic: MagicValue::Response,
            opcode,
            key_len: 0,
            extras_len: 0,
            data_type: 0,
            status: *self,
            total_body_len: 0,
            opaque: 0,
            cas: 0,
        }
    }
}
