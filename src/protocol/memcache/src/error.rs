// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::binary::Opcode;
use thiserror::Error;

/// The outcome of a store command. `Ok(true)` means the value was stored,
/// `Ok(false)` means the server declined to store it (for example the key
/// already exists for an `add`, or is missing for a `replace`).
pub type StoreResult = Result<bool, StoreError>;

/// A response which cannot be decoded. The connection is no longer in sync
/// with the server and must not be reused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a proper response: bad magic 0x{0:02x}")]
    BadMagic(u8),
    #[error("not a proper {expected} response: opcode 0x{actual:02x}")]
    OpcodeMismatch { expected: Opcode, actual: u8 },
    #[error("response body of {len} bytes exceeds the limit of {max} bytes")]
    BodyTooLarge { len: u32, max: u64 },
    #[error("extras ({extras_len}) and key ({key_len}) exceed the body length ({total_body_len})")]
    InvalidLengths {
        extras_len: u8,
        key_len: u16,
        total_body_len: u32,
    },
    #[error("buffer remaining {remaining} < body length {len}")]
    Truncated { remaining: usize, len: usize },
}

/// A request which cannot be represented in the binary protocol or which
/// exceeds the configured limits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("key must not be empty")]
    EmptyKey,
    #[error("key of {len} bytes exceeds the limit of {max} bytes")]
    KeyTooLarge { len: usize, max: usize },
    #[error("value of {len} bytes exceeds the limit of {max} bytes")]
    ValueTooLarge { len: usize, max: usize },
    #[error("request body too large for binary protocol")]
    BodyTooLarge,
}

/// Why a store command failed, as seen by the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("server does not recognize the command")]
    UnknownCommand,
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl From<EncodeError> for std::io::Error {
    fn from(value: EncodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, value)
    }
}

impl From<DecodeError> for std::io::Error {
    fn from(value: DecodeError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value)
    }
}
