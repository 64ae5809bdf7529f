//! A submodule containing the relevant parts of the Memcache binary protocol
//! for issuing store commands and decoding their responses.
//!
//! Requests are composed in a single pass into a buffer of the exact request
//! length. Responses are decoded by a resumable state machine (see
//! `response::Decode`) which never consumes part of a message it cannot yet
//! finish, so that the receive buffer of a pipelined connection stays aligned
//! on message boundaries.

use crate::*;
use config::Binary;
use core::fmt::{Display, Formatter};

pub mod request;
pub mod response;

#[cfg(test)]
mod test;

pub use request::{Encode, RequestHeader};
pub use response::{Decode, DecodeContext, DecodeState, ResponseHeader, ResponseStatus};

/// Length of both the request and the response header.
pub const HEADER_LEN: usize = 24;

/// Length of the extras (flags and expiration) for store commands.
pub const STORE_EXTRAS_LEN: u8 = 8;

/// Body length allowance, on top of key and value, for extras.
const EXTRAS_ALLOWANCE: u64 = 32;

/// Holds the limits applied when composing requests and decoding responses,
/// and creates commands which carry those limits.
#[derive(Debug, Clone, Copy)]
pub struct BinaryProtocol {
    max_value_size: u32,
    max_key_len: u16,
}

impl Default for BinaryProtocol {
    fn default() -> Self {
        Self {
            max_value_size: u32::MAX,
            max_key_len: u16::MAX,
        }
    }
}

impl From<&Binary> for BinaryProtocol {
    fn from(config: &Binary) -> Self {
        Self::new(config.max_key_len(), config.max_value_size())
    }
}

impl BinaryProtocol {
    pub fn new(max_key_len: u16, max_value_size: u32) -> Self {
        Self {
            max_value_size,
            max_key_len,
        }
    }

    pub fn max_key_len(&self) -> u16 {
        self.max_key_len
    }

    pub fn max_value_size(&self) -> u32 {
        self.max_value_size
    }

    /// The largest response body that will be accepted. A header declaring a
    /// larger body is treated as a desynchronized stream.
    pub fn max_body_len(&self) -> u64 {
        self.max_key_len as u64 + self.max_value_size as u64 + EXTRAS_ALLOWANCE
    }

    pub fn store(&self, command: Command, key: &[u8], data: CachedData, exptime: u32) -> StoreCommand {
        StoreCommand::with_protocol(*self, command, key, data, exptime)
    }

    pub fn set(&self, key: &[u8], data: CachedData, exptime: u32) -> StoreCommand {
        self.store(Command::Set, key, data, exptime)
    }

    pub fn add(&self, key: &[u8], data: CachedData, exptime: u32) -> StoreCommand {
        self.store(Command::Add, key, data, exptime)
    }

    pub fn replace(&self, key: &[u8], data: CachedData, exptime: u32) -> StoreCommand {
        self.store(Command::Replace, key, data, exptime)
    }

    /// Transcode the value and create a command for it.
    pub fn store_value<T: ?Sized>(
        &self,
        command: Command,
        key: &[u8],
        value: &T,
        transcoder: &dyn Transcoder<T>,
        exptime: u32,
    ) -> StoreCommand {
        self.store(command, key, transcoder.encode(value), exptime)
    }
}

/// Identifies the request/response pair a command represents. Shared by the
/// encoding and decoding halves of a command.
pub trait BinaryCommand {
    fn opcode(&self) -> Opcode;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicValue {
    Unknown(u8),
    Request,
    Response,
}

impl MagicValue {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x80 => MagicValue::Request,
            0x81 => MagicValue::Response,
            other => MagicValue::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            MagicValue::Unknown(other) => other,
            MagicValue::Request => 0x80,
            MagicValue::Response => 0x81,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Unknown(u8),
    Set,
    Add,
    Replace,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => Opcode::Set,
            0x02 => Opcode::Add,
            0x03 => Opcode::Replace,
            other => Opcode::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Opcode::Unknown(other) => other,
            Opcode::Set => 0x01,
            Opcode::Add => 0x02,
            Opcode::Replace => 0x03,
        }
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Opcode::Unknown(other) => write!(f, "UNKNOWN(0x{other:02x})"),
            Opcode::Set => write!(f, "SET"),
            Opcode::Add => write!(f, "ADD"),
            Opcode::Replace => write!(f, "REPLACE"),
        }
    }
}

impl From<Command> for Opcode {
    fn from(command: Command) -> Self {
        match command {
            Command::Add => Opcode::Add,
            Command::Replace => Opcode::Replace,
            Command::Set => Opcode::Set,
        }
    }
}
