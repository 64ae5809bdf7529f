//! Decoding responses.
//!
//! A response is decoded by a state machine which is held on the command
//! and resumed every time new bytes are appended to the receive buffer:
//!
//! ```text
//! None -> ReadHeader -> ReadExtras -> ReadKey -> ReadValue -> Done
//! ```
//!
//! Each step either completes and falls through to the next one, or reports
//! that more data is needed, in which case nothing has been consumed for
//! that step. The header is consumed only once all 24 bytes are present and
//! the body only once the entire declared body is present.

use super::*;
use protocol_common::Buf;

mod header;
mod store;

pub use header::{ResponseHeader, ResponseStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    #[default]
    None,
    ReadHeader,
    ReadExtras,
    ReadKey,
    ReadValue,
    Done,
}

/// Resumable decode position and the body lengths captured from the
/// response header.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    state: DecodeState,
    key_len: u16,
    extras_len: u8,
    total_body_len: u32,
    max_body_len: u64,
    error: Option<DecodeError>,
}

impl DecodeContext {
    pub fn new(max_body_len: u64) -> Self {
        Self {
            state: DecodeState::None,
            key_len: 0,
            extras_len: 0,
            total_body_len: 0,
            max_body_len,
            error: None,
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
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

    /// Length of the value section, which is whatever the extras and key
    /// leave of the body.
    pub fn value_len(&self) -> u32 {
        self.total_body_len - self.extras_len as u32 - self.key_len as u32
    }

    /// Bytes on the wire for the current response, header included.
    pub fn response_len(&self) -> usize {
        HEADER_LEN + self.total_body_len as usize
    }

    /// The fatal error which stopped decoding, if any.
    pub fn error(&self) -> Option<&DecodeError> {
        self.error.as_ref()
    }
}

pub trait Decode: BinaryCommand {
    fn context(&self) -> &DecodeContext;

    fn context_mut(&mut self) -> &mut DecodeContext;

    /// Called with the response status while the header is consumed, before
    /// any of the body is read.
    fn read_status(&mut self, status: ResponseStatus);

    /// Called with the CAS value from the response header. Discarded unless
    /// overridden.
    fn read_cas(&mut self, _cas: u64) {}

    /// Read the extras section. Returns `Ok(false)` if more data is needed.
    ///
    /// By default nothing is consumed here and `read_value` consumes the whole
    /// body. Implementations which consume the extras must also override
    /// `read_value`.
    fn read_extras(&mut self, _buffer: &mut dyn Buf, _extras_len: u8) -> Result<bool, DecodeError> {
        Ok(true)
    }

    /// Read the key section. Returns `Ok(false)` if more data is needed.
    ///
    /// The default behaves like `read_extras` and leaves the bytes in place.
    fn read_key(&mut self, _buffer: &mut dyn Buf, _key_len: u16) -> Result<bool, DecodeError> {
        Ok(true)
    }

    /// Read the value section. Returns `Ok(false)` if more data is needed.
    ///
    /// The default consumes the entire body (extras, key, and value) in one
    /// step, and only once all of it is buffered.
    fn read_value(&mut self, buffer: &mut dyn Buf) -> Result<bool, DecodeError> {
        let len = self.context().total_body_len() as usize;
        if buffer.remaining() < len {
            return Ok(false);
        }
        skip(buffer, len)?;
        Ok(true)
    }

    /// Called once the whole response has been consumed. Returns `false` if
    /// the command expects another response packet, in which case decoding
    /// restarts with the next header.
    fn finish(&mut self) -> bool;

    /// Called once when decoding fails with a fatal error.
    fn fail(&mut self, _error: &DecodeError) {}

    /// Decode as much of the response as the buffer holds. Returns `Ok(true)`
    /// once the response is complete and `Ok(false)` if more data is needed.
    ///
    /// An error means the stream is out of sync with the requests. The error
    /// is sticky: later calls return it again without touching the buffer.
    fn decode(&mut self, buffer: &mut dyn Buf) -> Result<bool, DecodeError> {
        if let Some(e) = self.context().error() {
            return Err(e.clone());
        }

        match run(self, buffer) {
            Ok(complete) => {
                #[cfg(feature = "metrics")]
                if !complete {
                    BINARY_DECODE_INCOMPLETE.increment();
                }
                Ok(complete)
            }
            Err(e) => {
                #[cfg(feature = "metrics")]
                BINARY_DECODE_EX.increment();

                warn!("failed to decode {} response: {}", self.opcode(), e);
                self.context_mut().error = Some(e.clone());
                self.fail(&e);
                Err(e)
            }
        }
    }
}

/// Advance the buffer by `len` bytes, failing if fewer remain.
pub fn skip(buffer: &mut dyn Buf, len: usize) -> Result<(), DecodeError> {
    if buffer.remaining() < len {
        return Err(DecodeError::Truncated {
            remaining: buffer.remaining(),
            len,
        });
    }
    buffer.advance(len);
    Ok(())
}

fn run<D: Decode + ?Sized>(decoder: &mut D, buffer: &mut dyn Buf) -> Result<bool, DecodeError> {
    loop {
        let state = decoder.context().state;
        match state {
            DecodeState::None => {
                if buffer.remaining() < HEADER_LEN {
                    trace!(
                        "{} response needs a header, have {} bytes",
                        decoder.opcode(),
                        buffer.remaining()
                    );
                    return Ok(false);
                }
                decoder.context_mut().state = DecodeState::ReadHeader;
            }
            DecodeState::ReadHeader => {
                read_header(decoder, buffer)?;
                decoder.context_mut().state = DecodeState::ReadExtras;
            }
            DecodeState::ReadExtras => {
                let extras_len = decoder.context().extras_len;
                if !decoder.read_extras(buffer, extras_len)? {
                    return Ok(false);
                }
                decoder.context_mut().state = DecodeState::ReadKey;
            }
            DecodeState::ReadKey => {
                let key_len = decoder.context().key_len;
                if !decoder.read_key(buffer, key_len)? {
                    return Ok(false);
                }
                decoder.context_mut().state = DecodeState::ReadValue;
            }
            DecodeState::ReadValue => {
                if !decoder.read_value(buffer)? {
                    trace!(
                        "{} response needs {} body bytes, have {}",
                        decoder.opcode(),
                        decoder.context().total_body_len,
                        buffer.remaining()
                    );
                    return Ok(false);
                }
                decoder.context_mut().state = DecodeState::Done;
            }
            DecodeState::Done => {
                if decoder.finish() {
                    return Ok(true);
                }
                decoder.context_mut().state = DecodeState::None;
            }
        }
    }
}

/// Consume and validate the 24 byte header. The status is only handed to the
/// decoder once the header is known to belong to it.
fn read_header<D: Decode + ?Sized>(decoder: &mut D, buffer: &mut dyn Buf) -> Result<(), DecodeError> {
    let header = ResponseHeader::read(buffer).ok_or(DecodeError::Truncated {
        remaining: buffer.remaining(),
        len: HEADER_LEN,
    })?;

    if header.magic != MagicValue::Response {
        return Err(DecodeError::BadMagic(header.magic.to_u8()));
    }

    if header.opcode != decoder.opcode() {
        return Err(DecodeError::OpcodeMismatch {
            expected: decoder.opcode(),
            actual: header.opcode.to_u8(),
        });
    }

    let context = decoder.context_mut();

    if header.total_body_len as u64 > context.max_body_len {
        return Err(DecodeError::BodyTooLarge {
            len: header.total_body_len,
            max: context.max_body_len,
        });
    }

    if header.extras_len as u32 + header.key_len as u32 > header.total_body_len {
        return Err(DecodeError::InvalidLengths {
            extras_len: header.extras_len,
            key_len: header.key_len,
            total_body_len: header.total_body_len,
        });
    }

    context.key_len = header.key_len;
    context.extras_len = header.extras_len;
    context.total_body_len = header.total_body_len;

    trace!(
        "{} response header: status {:?} body {}",
        header.opcode,
        header.status,
        header.total_body_len
    );

    decoder.read_status(header.status);
    decoder.read_cas(header.cas);

    Ok(())
}
