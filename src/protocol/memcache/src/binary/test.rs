//! Tests for composing store requests and decoding their responses.

use super::response::skip;
use super::*;
use crate::binary::request::Encode;
use protocol_common::{Buf, BufMut};

fn value(data: &'static [u8], flag: u32) -> CachedData {
    CachedData::new(data, flag)
}

fn empty_response(opcode: Opcode, status: ResponseStatus) -> BytesMut {
    let mut buffer = BytesMut::new();
    status.as_empty_response(opcode).write_to(&mut buffer);
    buffer
}

fn response_with_body(opcode: Opcode, status: ResponseStatus, extras: &[u8], key: &[u8], value: &[u8]) -> BytesMut {
    let mut buffer = BytesMut::new();
    status
        .as_empty_response(opcode)
        .with_body(extras.len() as u8, key.len() as u16, value.len() as u32)
        .write_to(&mut buffer);
    buffer.put_slice(extras);
    buffer.put_slice(key);
    buffer.put_slice(value);
    buffer
}

#[test]
fn encode_set() {
    let command = StoreCommand::new(Command::Set, b"foo", value(b"hello", 0xDEADBEEF), 3600);
    let request = command.encode(&HeapAllocator::new()).expect("failed to encode");

    assert_eq!(request.len(), 40);
    assert_eq!(
        &request[..],
        &[
            0x80, 0x01, 0x00, 0x03, // magic, opcode, key length
            0x08, 0x00, 0x00, 0x00, // extras length, data type, reserved
            0x00, 0x00, 0x00, 0x10, // total body length
            0x00, 0x00, 0x00, 0x00, // opaque
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // cas
            0xDE, 0xAD, 0xBE, 0xEF, // flags
            0x00, 0x00, 0x0E, 0x10, // expiration
            b'f', b'o', b'o', // key
            b'h', b'e', b'l', b'l', b'o', // value
        ][..]
    );
}

#[test]
fn encode_opcodes() {
    for (command, opcode) in [
        (Command::Set, 0x01),
        (Command::Add, 0x02),
        (Command::Replace, 0x03),
    ] {
        let request = StoreCommand::new(command, b"k", value(b"v", 0), 0)
            .encode(&HeapAllocator::new())
            .expect("failed to encode");
        assert_eq!(request[0], 0x80);
        assert_eq!(request[1], opcode);
        assert_eq!(request.len(), 24 + 8 + 1 + 1);
    }
}

#[test]
fn encode_ignores_cas_and_noreply() {
    let plain = StoreCommand::new(Command::Set, b"key", value(b"value", 1), 0)
        .encode(&HeapAllocator::new())
        .unwrap();
    let decorated = StoreCommand::new(Command::Set, b"key", value(b"value", 1), 0)
        .with_cas(0x0102030405060708)
        .with_noreply(true)
        .encode(&HeapAllocator::new())
        .unwrap();
    assert_eq!(plain, decorated);
    assert_eq!(&decorated[16..24], &[0; 8]);
}

#[test]
fn encode_empty_value() {
    let request = StoreCommand::new(Command::Set, b"key", value(b"", 0), 0)
        .encode(&HeapAllocator::new())
        .unwrap();
    assert_eq!(request.len(), 24 + 8 + 3);
    assert_eq!(&request[8..12], &[0x00, 0x00, 0x00, 0x0B]);
}

#[test]
fn encode_limits() {
    let protocol = BinaryProtocol::new(4, 8);
    let allocator = HeapAllocator::new();

    assert_eq!(
        protocol.set(b"", value(b"v", 0), 0).encode(&allocator),
        Err(EncodeError::EmptyKey)
    );
    assert_eq!(
        protocol.set(b"toolong", value(b"v", 0), 0).encode(&allocator),
        Err(EncodeError::KeyTooLarge { len: 7, max: 4 })
    );
    assert_eq!(
        protocol.add(b"key", value(b"123456789", 0), 0).encode(&allocator),
        Err(EncodeError::ValueTooLarge { len: 9, max: 8 })
    );
    assert!(protocol.replace(b"key", value(b"12345678", 0), 0).encode(&allocator).is_ok());

    let key = vec![b'k'; u16::MAX as usize + 1];
    assert_eq!(
        StoreCommand::new(Command::Set, &key, value(b"v", 0), 0).encode(&allocator),
        Err(EncodeError::KeyTooLarge {
            len: u16::MAX as usize + 1,
            max: u16::MAX as usize,
        })
    );
}

#[test]
fn store_value_with_transcoder() {
    let protocol = BinaryProtocol::default();
    let command = protocol.store_value(
        Command::Add,
        b"greeting",
        "hello",
        &protocol_common::StringTranscoder::default(),
        60,
    );
    assert_eq!(command.command(), Command::Add);
    assert_eq!(command.value(), b"hello");
    assert_eq!(command.flags(), 0);
    assert_eq!(command.exptime(), 60);
}

#[test]
fn round_trip() {
    for command in [Command::Set, Command::Add, Command::Replace] {
        let (completion, pending) = completion();
        let mut store = StoreCommand::new(command, b"key", value(b"value", 7), 100)
            .with_completion(completion);

        let request = store.encode(&HeapAllocator::new()).unwrap();
        assert_eq!(request[1], Opcode::from(command).to_u8());

        let mut buffer = empty_response(command.into(), ResponseStatus::NoError);
        assert_eq!(store.decode(&mut buffer), Ok(true));
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(store.outcome(), Some(&Ok(true)));
        assert_eq!(store.context().state(), DecodeState::Done);
        assert!(store.is_finished());
        assert_eq!(pending.wait(), Ok(Ok(true)));
    }
}

#[test]
fn status_mapping() {
    let cases = [
        (ResponseStatus::NoError, Ok(true)),
        (ResponseStatus::KeyExists, Ok(false)),
        (ResponseStatus::KeyNotFound, Ok(false)),
        (ResponseStatus::ItemNotStored, Ok(false)),
        (ResponseStatus::ValueTooLarge, Ok(false)),
        (ResponseStatus::InvalidArguments, Ok(false)),
        (ResponseStatus::OutOfMemory, Ok(false)),
        (ResponseStatus::Unknown(0x1234), Ok(false)),
        (ResponseStatus::UnknownCommand, Err(StoreError::UnknownCommand)),
    ];

    for (status, expected) in cases {
        let mut store = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);
        let mut buffer = empty_response(Opcode::Set, status);
        assert_eq!(store.decode(&mut buffer), Ok(true), "status: {:?}", status);
        assert_eq!(store.outcome(), Some(&expected), "status: {:?}", status);
        assert_eq!(store.status(), Some(status));
    }
}

#[test]
fn status_codes() {
    for code in 0..=u16::MAX {
        assert_eq!(ResponseStatus::from_u16(code).to_u16(), code);
    }
    assert_eq!(ResponseStatus::from_u16(0x0002), ResponseStatus::KeyExists);
    assert_eq!(ResponseStatus::from_u16(0x0081), ResponseStatus::UnknownCommand);
    assert_eq!(ResponseStatus::from_u16(0x0100), ResponseStatus::Unknown(0x0100));
}

#[test]
fn bad_magic() {
    let (completion, pending) = completion();
    let mut store =
        StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0).with_completion(completion);

    let mut buffer = empty_response(Opcode::Set, ResponseStatus::NoError);
    buffer[0] = 0x80;

    assert_eq!(store.decode(&mut buffer), Err(DecodeError::BadMagic(0x80)));
    assert_eq!(
        pending.wait(),
        Ok(Err(StoreError::Decode(DecodeError::BadMagic(0x80))))
    );

    // the error is sticky and the buffer is left alone
    buffer.put_slice(&empty_response(Opcode::Set, ResponseStatus::NoError));
    let remaining = buffer.remaining();
    assert_eq!(store.decode(&mut buffer), Err(DecodeError::BadMagic(0x80)));
    assert_eq!(buffer.remaining(), remaining);
}

#[test]
fn opcode_mismatch() {
    let mut store = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);
    let mut buffer = empty_response(Opcode::Add, ResponseStatus::NoError);

    assert_eq!(
        store.decode(&mut buffer),
        Err(DecodeError::OpcodeMismatch {
            expected: Opcode::Set,
            actual: 0x02,
        })
    );
    assert!(matches!(
        store.outcome(),
        Some(Err(StoreError::Decode(DecodeError::OpcodeMismatch { .. })))
    ));
    assert_eq!(store.context().error().cloned(), Some(DecodeError::OpcodeMismatch {
        expected: Opcode::Set,
        actual: 0x02,
    }));
}

#[test]
fn body_too_large() {
    let protocol = BinaryProtocol::new(8, 8);
    let mut store = protocol.set(b"key", value(b"value", 0), 0);

    let mut buffer = BytesMut::new();
    ResponseStatus::NoError
        .as_empty_response(Opcode::Set)
        .with_body(0, 0, 100)
        .write_to(&mut buffer);

    assert_eq!(
        store.decode(&mut buffer),
        Err(DecodeError::BodyTooLarge { len: 100, max: 48 })
    );
}

#[test]
fn invalid_lengths() {
    let mut store = StoreCommand::new(Command::Replace, b"key", value(b"value", 0), 0);

    let mut header = ResponseStatus::NoError.as_empty_response(Opcode::Replace);
    header.extras_len = 8;
    header.key_len = 4;
    header.total_body_len = 10;

    let mut buffer = BytesMut::new();
    header.write_to(&mut buffer);
    buffer.put_slice(&[0; 10]);

    assert_eq!(
        store.decode(&mut buffer),
        Err(DecodeError::InvalidLengths {
            extras_len: 8,
            key_len: 4,
            total_body_len: 10,
        })
    );
}

#[test]
fn incomplete_header() {
    let mut store = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);
    let response = empty_response(Opcode::Set, ResponseStatus::NoError);

    let mut buffer = BytesMut::from(&response[..23]);
    assert_eq!(store.decode(&mut buffer), Ok(false));
    assert_eq!(buffer.remaining(), 23);
    assert_eq!(store.context().state(), DecodeState::None);
    assert!(store.outcome().is_none());

    buffer.put_slice(&response[23..]);
    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(buffer.remaining(), 0);
}

#[test]
fn length_accounting() {
    let mut store = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);

    // 8 bytes of extras, no key, and a 2 byte value
    let response = response_with_body(
        Opcode::Set,
        ResponseStatus::NoError,
        &[0, 0, 0, 1, 0, 0, 0, 2],
        b"",
        b"ok",
    );
    assert_eq!(response.len(), 34);

    let mut buffer = BytesMut::from(&response[..33]);
    assert_eq!(store.decode(&mut buffer), Ok(false));
    assert_eq!(buffer.remaining(), 9);
    assert_eq!(store.context().state(), DecodeState::ReadValue);
    assert_eq!(store.context().total_body_len(), 10);
    assert_eq!(store.context().value_len(), 2);
    assert!(!store.is_finished());

    // the status is known but nothing is delivered until the body is read
    assert_eq!(store.status(), Some(ResponseStatus::NoError));
    assert!(store.outcome().is_none());

    // nothing changes until the last byte arrives
    assert_eq!(store.decode(&mut buffer), Ok(false));
    assert_eq!(buffer.remaining(), 9);

    buffer.put_u8(response[33]);
    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(buffer.remaining(), 0);
    assert_eq!(store.outcome(), Some(&Ok(true)));
}

#[test]
fn partial_delivery() {
    let responses = [
        empty_response(Opcode::Set, ResponseStatus::NoError),
        empty_response(Opcode::Set, ResponseStatus::KeyExists),
        empty_response(Opcode::Set, ResponseStatus::UnknownCommand),
        response_with_body(Opcode::Set, ResponseStatus::ItemNotStored, &[], b"", b"Not stored"),
    ];

    for response in responses.iter() {
        let mut whole = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);
        let mut buffer = response.clone();
        assert_eq!(whole.decode(&mut buffer), Ok(true));
        let expected = whole.outcome().cloned();

        for chunk in 1..=response.len() {
            let mut store = StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0);
            let mut buffer = BytesMut::new();
            let mut fed = 0;
            let mut complete = false;

            for piece in response.chunks(chunk) {
                assert!(!complete, "completed before all bytes were delivered");
                buffer.put_slice(piece);
                fed += piece.len();

                complete = store.decode(&mut buffer).expect("decode failed");

                // only whole steps are ever consumed
                let consumed = fed - buffer.remaining();
                assert!(
                    consumed == 0 || consumed == HEADER_LEN || consumed == response.len(),
                    "chunk {} consumed {} of {} bytes",
                    chunk,
                    consumed,
                    fed
                );
            }

            assert!(complete);
            assert_eq!(buffer.remaining(), 0);
            assert_eq!(store.outcome().cloned(), expected, "chunk size {}", chunk);
        }
    }
}

#[test]
fn outcome_waits_for_body() {
    let (completion, mut pending) = completion();
    let mut store = StoreCommand::new(Command::Replace, b"key", value(b"value", 0), 0)
        .with_completion(completion);

    let response = response_with_body(
        Opcode::Replace,
        ResponseStatus::KeyNotFound,
        &[],
        b"",
        b"Not found!",
    );

    let mut buffer = BytesMut::from(&response[..HEADER_LEN]);
    assert_eq!(store.decode(&mut buffer), Ok(false));
    assert_eq!(store.context().state(), DecodeState::ReadValue);
    assert_eq!(store.status(), Some(ResponseStatus::KeyNotFound));
    assert!(store.outcome().is_none());
    assert_eq!(pending.try_take(), Ok(None));

    buffer.put_slice(&response[HEADER_LEN..]);
    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(store.outcome(), Some(&Ok(false)));
    assert_eq!(pending.try_take(), Ok(Some(Ok(false))));
}

#[test]
fn completes_once() {
    let (completion, mut pending) = completion();
    let mut store =
        StoreCommand::new(Command::Add, b"key", value(b"value", 0), 0).with_completion(completion);

    assert_eq!(pending.try_take(), Ok(None));

    let mut buffer = empty_response(Opcode::Add, ResponseStatus::KeyExists);
    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(store.decode(&mut buffer), Ok(true));

    assert_eq!(pending.try_take(), Ok(Some(Ok(false))));
    assert_eq!(pending.try_take(), Err(CompletionError::Abandoned));
}

#[test]
fn caller_gone() {
    let (completion, pending) = completion();
    let mut store =
        StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0).with_completion(completion);
    drop(pending);

    let mut buffer = empty_response(Opcode::Set, ResponseStatus::NoError);
    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(store.outcome(), Some(&Ok(true)));
}

#[test]
fn cas_is_discarded() {
    let mut store =
        StoreCommand::new(Command::Set, b"key", value(b"value", 0), 0).with_cas(5);

    let mut buffer = BytesMut::new();
    ResponseStatus::NoError
        .as_empty_response(Opcode::Set)
        .with_cas(0xCAFE)
        .write_to(&mut buffer);

    assert_eq!(store.decode(&mut buffer), Ok(true));
    assert_eq!(store.cas(), Some(5));
    assert_eq!(store.outcome(), Some(&Ok(true)));
}

#[test]
fn read_short_header() {
    let response = empty_response(Opcode::Set, ResponseStatus::KeyExists);

    let mut buffer = &response[..HEADER_LEN - 1];
    assert!(ResponseHeader::read(&mut buffer).is_none());
    assert_eq!(buffer.remaining(), HEADER_LEN - 1);

    let mut buffer = &response[..];
    let header = ResponseHeader::read(&mut buffer).expect("complete header");
    assert_eq!(header.status(), ResponseStatus::KeyExists);
    assert_eq!(header.opcode(), Opcode::Set);
    assert_eq!(buffer.remaining(), 0);
}

#[test]
fn skip_truncated() {
    let mut buffer = &b"abc"[..];
    assert_eq!(
        skip(&mut buffer, 4),
        Err(DecodeError::Truncated {
            remaining: 3,
            len: 4
        })
    );
    assert_eq!(buffer.remaining(), 3);
    assert_eq!(skip(&mut buffer, 2), Ok(()));
    assert_eq!(buffer, b"c");
}

/// A decoder for a keyed response which parses its extras and key instead
/// of skipping the body, and which expects two packets per command.
struct Keyed {
    context: DecodeContext,
    packets: usize,
    flags: Vec<u32>,
    keys: Vec<Vec<u8>>,
}

impl Keyed {
    fn new() -> Self {
        Self {
            context: DecodeContext::new(u32::MAX as u64),
            packets: 0,
            flags: Vec::new(),
            keys: Vec::new(),
        }
    }
}

impl BinaryCommand for Keyed {
    fn opcode(&self) -> Opcode {
        Opcode::Set
    }
}

impl Decode for Keyed {
    fn context(&self) -> &DecodeContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut DecodeContext {
        &mut self.context
    }

    fn read_status(&mut self, _status: ResponseStatus) {}

    fn read_extras(&mut self, buffer: &mut dyn Buf, extras_len: u8) -> Result<bool, DecodeError> {
        if buffer.remaining() < extras_len as usize {
            return Ok(false);
        }
        self.flags.push(buffer.get_u32());
        skip(buffer, extras_len as usize - 4)?;
        Ok(true)
    }

    fn read_key(&mut self, buffer: &mut dyn Buf, key_len: u16) -> Result<bool, DecodeError> {
        if buffer.remaining() < key_len as usize {
            return Ok(false);
        }
        let mut key = vec![0; key_len as usize];
        buffer.copy_to_slice(&mut key);
        self.keys.push(key);
        Ok(true)
    }

    fn read_value(&mut self, buffer: &mut dyn Buf) -> Result<bool, DecodeError> {
        let len = self.context.value_len() as usize;
        if buffer.remaining() < len {
            return Ok(false);
        }
        skip(buffer, len)?;
        Ok(true)
    }

    fn finish(&mut self) -> bool {
        self.packets += 1;
        self.packets == 2
    }
}

#[test]
fn overridden_steps_and_continuation() {
    let mut stream = response_with_body(Opcode::Set, ResponseStatus::NoError, &[0, 0, 0, 1], b"a", b"xyz");
    stream.put_slice(&response_with_body(
        Opcode::Set,
        ResponseStatus::NoError,
        &[0, 0, 0, 2],
        b"bc",
        b"",
    ));
    let trailing = empty_response(Opcode::Set, ResponseStatus::NoError);
    stream.put_slice(&trailing);

    let total = stream.len() - trailing.len();

    for chunk in 1..=total {
        let mut keyed = Keyed::new();
        let mut buffer = BytesMut::new();
        let mut complete = false;

        for piece in stream[..total].chunks(chunk) {
            buffer.put_slice(piece);
            complete = keyed.decode(&mut buffer).expect("decode failed");
        }

        assert!(complete, "chunk size {}", chunk);
        assert_eq!(keyed.flags, vec![1, 2]);
        assert_eq!(keyed.keys, vec![b"a".to_vec(), b"bc".to_vec()]);
        assert_eq!(buffer.remaining(), 0);
    }

    // the response after the continuation is left for the next command
    let mut keyed = Keyed::new();
    let mut buffer = stream.clone();
    assert_eq!(keyed.decode(&mut buffer), Ok(true));
    assert_eq!(&buffer[..], &trailing[..]);
}
