// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bytes::Bytes;

/// An encoded value: the bytes which go on the wire and the flag word which
/// tells a reader how to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedData {
    data: Bytes,
    flag: u32,
}

impl CachedData {
    pub fn new(data: impl Into<Bytes>, flag: u32) -> Self {
        Self {
            data: data.into(),
            flag,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn flag(&self) -> u32 {
        self.flag
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Converts application values into `CachedData`.
pub trait Transcoder<T: ?Sized> {
    fn encode(&self, value: &T) -> CachedData;
}

/// Passes raw bytes through unchanged with a zero flag.
#[derive(Default, Clone, Copy, Debug)]
pub struct BytesTranscoder {
    _unused: (),
}

impl Transcoder<[u8]> for BytesTranscoder {
    fn encode(&self, value: &[u8]) -> CachedData {
        CachedData::new(Bytes::copy_from_slice(value), 0)
    }
}

impl Transcoder<Bytes> for BytesTranscoder {
    fn encode(&self, value: &Bytes) -> CachedData {
        CachedData::new(value.clone(), 0)
    }
}

/// Stores strings as their UTF-8 bytes with a zero flag.
#[derive(Default, Clone, Copy, Debug)]
pub struct StringTranscoder {
    _unused: (),
}

impl Transcoder<str> for StringTranscoder {
    fn encode(&self, value: &str) -> CachedData {
        CachedData::new(Bytes::copy_from_slice(value.as_bytes()), 0)
    }
}
