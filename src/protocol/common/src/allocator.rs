// Copyright 2023 Pelikan Foundation LLC.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use bytes::BytesMut;

/// Hands out writable buffers for outbound requests. Encoders ask for the
/// exact length of the message they are about to write.
pub trait BufferAllocator {
    fn allocate(&self, len: usize) -> BytesMut;
}

/// Allocates each buffer on the heap.
#[derive(Default, Clone, Copy, Debug)]
pub struct HeapAllocator {
    _unused: (),
}

impl HeapAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BufferAllocator for HeapAllocator {
    fn allocate(&self, len: usize) -> BytesMut {
        BytesMut::with_capacity(len)
    }
}
