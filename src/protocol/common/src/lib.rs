// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Traits shared between protocol implementations and the layers around
//! them: the buffer cursor used for decoding, the allocator used for
//! encoding, and the transcoder which turns application values into opaque
//! byte blobs.

pub use bytes::{Buf, BufMut, Bytes, BytesMut};

mod allocator;
mod transcoder;

pub use allocator::*;
pub use transcoder::*;
