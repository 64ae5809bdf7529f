// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Client side of the Memcache binary protocol for store commands
//! (`set`, `add`, and `replace`).
//!
//! A `StoreCommand` is encoded once into a request and then decodes its
//! response incrementally from the connection's receive buffer. Decoding is
//! resumable: when the buffer does not yet hold the full response the
//! command keeps its position and reports that it needs more data. Once the
//! response is complete, the outcome is recorded on the command and handed
//! to the waiting caller through its `Completion`.

#[macro_use]
extern crate logger;

pub mod binary;

mod error;
mod request;

pub use binary::BinaryProtocol;
pub use error::*;
pub use request::*;

pub use protocol_common::{
    Buf, BufMut, BufferAllocator, Bytes, BytesMut, CachedData, HeapAllocator, Transcoder,
};
pub use queues::{completion, Completion, CompletionError, Pending};

#[cfg(feature = "metrics")]
pub use stats::*;

#[cfg(feature = "metrics")]
mod stats {
    use metriken::*;

    /*
     * SET
     */

    #[metric(name = "set", description = "the number of set requests issued")]
    pub static SET: Counter = Counter::new();

    #[metric(name = "set_ex", description = "the number of set requests which failed")]
    pub static SET_EX: Counter = Counter::new();

    #[metric(name = "set_stored")]
    pub static SET_STORED: Counter = Counter::new();

    #[metric(name = "set_not_stored")]
    pub static SET_NOT_STORED: Counter = Counter::new();

    /*
     * ADD
     */

    #[metric(name = "add", description = "the number of add requests issued")]
    pub static ADD: Counter = Counter::new();

    #[metric(name = "add_ex", description = "the number of add requests which failed")]
    pub static ADD_EX: Counter = Counter::new();

    #[metric(name = "add_stored")]
    pub static ADD_STORED: Counter = Counter::new();

    #[metric(name = "add_not_stored")]
    pub static ADD_NOT_STORED: Counter = Counter::new();

    /*
     * REPLACE
     */

    #[metric(name = "replace", description = "the number of replace requests issued")]
    pub static REPLACE: Counter = Counter::new();

    #[metric(
        name = "replace_ex",
        description = "the number of replace requests which failed"
    )]
    pub static REPLACE_EX: Counter = Counter::new();

    #[metric(name = "replace_stored")]
    pub static REPLACE_STORED: Counter = Counter::new();

    #[metric(name = "replace_not_stored")]
    pub static REPLACE_NOT_STORED: Counter = Counter::new();

    /*
     * DECODER
     */

    #[metric(
        name = "binary_decode_ex",
        description = "the number of responses which could not be decoded"
    )]
    pub static BINARY_DECODE_EX: Counter = Counter::new();

    #[metric(
        name = "binary_decode_incomplete",
        description = "the number of decode attempts which needed more data"
    )]
    pub static BINARY_DECODE_INCOMPLETE: Counter = Counter::new();

    common::metrics::test_no_duplicates!();
}
