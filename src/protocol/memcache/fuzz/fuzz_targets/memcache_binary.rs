//! Fuzz test target for the Memcache binary store response decoder.

#![no_main]
use libfuzzer_sys::fuzz_target;

use protocol_memcache::binary::*;
use protocol_memcache::*;

const MAX_KEY_LEN: u16 = 250;
const MAX_VALUE_SIZE: u32 = 1024 * 1024;

fuzz_target!(|data: &[u8]| {
    let protocol = BinaryProtocol::new(MAX_KEY_LEN, MAX_VALUE_SIZE);

    // the first byte selects the fragment size, the rest is the stream
    let (fragment, stream) = match data.split_first() {
        Some((fragment, stream)) => ((*fragment as usize).max(1), stream),
        None => return,
    };

    for command in [Command::Set, Command::Add, Command::Replace] {
        let mut store = protocol.store(command, b"key", CachedData::new(&b"value"[..], 0), 0);
        let mut buffer = BytesMut::new();
        let mut fed = 0;

        for piece in stream.chunks(fragment) {
            buffer.extend_from_slice(piece);
            fed += piece.len();

            match store.decode(&mut buffer) {
                Ok(true) => {
                    let consumed = fed - buffer.len();
                    let expected = store.context().response_len();
                    if consumed != expected {
                        panic!("consumed {} bytes for a {} byte response", consumed, expected);
                    }
                    if store.outcome().is_none() {
                        panic!("complete without an outcome");
                    }
                    break;
                }
                Ok(false) => {
                    let consumed = fed - buffer.len();
                    if consumed != 0 && consumed != HEADER_LEN {
                        panic!("partially consumed {} bytes", consumed);
                    }
                }
                Err(_) => {
                    if store.outcome().is_none() || !store.is_finished() {
                        panic!("failed without delivering an outcome");
                    }
                    break;
                }
            }
        }
    }
});
